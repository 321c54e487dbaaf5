use faqdb_core::config::Settings;
use faqdb_vector::VectorStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let store = VectorStore::open(&settings.store_path(), &settings.store.collection, &settings.store.meta_table).await?;
    if !store.exists().await? {
        println!("collection '{}' has not been created", store.collection());
        return Ok(());
    }
    println!("collection={} records={} dim={}", store.collection(), store.count().await?, store.dimension().await?);
    if let Some(info) = store.info().await? {
        println!("embedder={} indexed_at={} corpus={}", info.embedder_id, info.indexed_at, info.corpus_fingerprint);
    }
    Ok(())
}
