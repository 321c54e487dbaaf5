use arrow_schema::{DataType, Field, Schema, TimeUnit};
use std::sync::Arc;

pub const ID: &str = "id";
pub const LOCALITY: &str = "locality";
pub const QUESTION: &str = "question";
pub const ANSWER: &str = "answer";
pub const VECTOR: &str = "vector";
pub const DISTANCE: &str = "_distance";

/// Collection schema; `dim` is fixed for the lifetime of the table.
pub fn build_collection_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new(ID, DataType::UInt64, false),
		Field::new(LOCALITY, DataType::Utf8, false),
		Field::new(QUESTION, DataType::Utf8, false),
		Field::new(ANSWER, DataType::Utf8, false),
		Field::new(VECTOR, DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), false),
	]))
}

pub fn build_meta_schema() -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new("key", DataType::Utf8, false),
		Field::new("value", DataType::Utf8, false),
		Field::new("updated_at", DataType::Timestamp(TimeUnit::Millisecond, None), false),
	]))
}

/// Vector width declared by a collection schema, if it has a vector column.
pub fn vector_dimension(schema: &Schema) -> Option<usize> {
	match schema.field_with_name(VECTOR).ok()?.data_type() {
		DataType::FixedSizeList(_, n) => usize::try_from(*n).ok(),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dimension_round_trips_through_schema() {
		assert_eq!(vector_dimension(&build_collection_schema(384)), Some(384));
		assert_eq!(vector_dimension(&build_meta_schema()), None);
	}
}
