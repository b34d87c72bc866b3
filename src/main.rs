use std::sync::Arc;

use shop_assist::{models::ItemCode, Config, HttpRecommendationApi, ShopSession};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shop_assist=info")),
        )
        .init();

    let config = Config::from_env()?;
    let api = HttpRecommendationApi::from_config(&config)?;
    let session = ShopSession::from_config(Arc::new(api), &config);

    session.load_catalog().await;

    // Item codes on the command line go into the cart
    let codes: Vec<ItemCode> = std::env::args().skip(1).map(ItemCode::new).collect();
    if codes.is_empty() {
        let state = session.snapshot().await;
        println!(
            "{} items, {}: {}",
            state.catalog.items().len(),
            match state.taxonomy_kind() {
                shop_assist::state::TaxonomyKind::Category => "categories",
                shop_assist::state::TaxonomyKind::Brand => "brands",
            },
            state.catalog.taxonomy().join(", ")
        );
        return Ok(());
    }

    for code in codes {
        match session.read(|state| state.catalog.find(&code).cloned()).await {
            Some(item) => session.toggle(item).await,
            None => tracing::warn!(code = %code, "Unknown item code, skipping"),
        }
    }

    let strategy = session.read(|state| state.strategy).await;
    let recommendations = session.submit().await?;
    println!("Recommendations ({}):", strategy);
    for rec in &recommendations {
        println!("  {} - {}  {}", rec.kode, rec.nama, rec.display_price());
    }

    Ok(())
}
