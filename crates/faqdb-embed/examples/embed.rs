use faqdb_core::config::Settings;
use faqdb_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let embedder = get_default_embedder(&settings.embedding)?;
    let texts = vec!["When is rent due?".to_string(), "Who fixes the boiler?".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("embedder={} B={} dim={}", embedder.id(), embs.len(), embedder.dim());
    Ok(())
}
