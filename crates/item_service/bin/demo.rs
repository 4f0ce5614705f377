//! # Item Service Demo
//!
//! End-to-end demonstration: seeds the primary collection, starts the
//! capped feed, exercises every handler including the error-propagation
//! path, then shuts down cleanly.
//!
//! ## Running
//!
//! ```bash
//! cargo run -p item_service --bin demo
//!
//! # With per-tick logging from the feed task
//! RUST_LOG=debug cargo run -p item_service --bin demo
//! ```

use item_service::{
    bootstrap, Body, CappedRecord, FeedConfig, Item, ItemHandlers, ItemPatch, MemoryStore, Reply,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn show(label: &str, reply: &Reply) {
    let body = match &reply.body {
        Body::Json(json) => json.to_string(),
        Body::Text(text) => text.clone(),
        Body::Empty => "<empty>".to_string(),
    };
    println!("  {label}: {} {body}", reply.status);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Bootstrap: seed, provision, start the feed ---

    let store = MemoryStore::new();
    let config = FeedConfig::default().with_tick_period(Duration::from_millis(250));
    let (service, feed) = bootstrap::run(&store, config.clone()).await?;
    let handlers = ItemHandlers::new(service);

    // --- CRUD round through the boundary contract ---

    println!("CRUD round:");
    show("list", &handlers.list().await);
    show(
        "create",
        &handlers.create(Item::new(None, "Iphone X", 999.99)).await,
    );
    show("get ABC", &handlers.get("ABC").await);
    show(
        "update ABC",
        &handlers
            .update(
                "ABC",
                ItemPatch {
                    description: "Beats HeadPhones".to_string(),
                    price: 234.87,
                },
            )
            .await,
    );
    show(
        "update EDF (missing)",
        &handlers
            .update(
                "EDF",
                ItemPatch {
                    description: "nope".to_string(),
                    price: 1.0,
                },
            )
            .await,
    );
    show("delete ABC", &handlers.delete("ABC").await);
    show("delete ABC again", &handlers.delete("ABC").await);

    // --- Forced error propagation ---

    println!("error propagation:");
    show("diagnostic failure", &handlers.diagnostic_failure().await);

    // --- Let the capped feed run for a while ---

    tokio::time::sleep(Duration::from_secs(2)).await;
    let records = store
        .collection::<CappedRecord>(&config.collection)
        .count()
        .await?;
    println!(
        "capped collection after 2s: {records} records ({} inserted, {} failures)",
        feed.metrics().records_inserted(),
        feed.metrics().insert_failures()
    );

    feed.shutdown().await?;
    println!("feed shut down cleanly");

    Ok(())
}
