//! Process startup: seed the primary collection, provision the capped
//! collection, start the feed.

use crate::capped::{CappedFeed, FeedConfig, FeedError};
use crate::document::Item;
use crate::memory::{MemoryCollection, MemoryStore};
use crate::service::ItemService;
use crate::store::{DocumentStore, StoreError};
use seqflow::{iter_ok, SequenceExt, StreamExt};

/// Name of the primary item collection.
pub const ITEM_COLLECTION: &str = "item";

/// The initial item data set.
pub fn seed_items() -> Vec<Item> {
    vec![
        Item::new(None, "Samsung TV", 399.99),
        Item::new(None, "LG TV", 329.99),
        Item::new(None, "Apple TV", 349.99),
        Item::new(Some("ABC".to_string()), "Beats HeadPhones", 19.99),
    ]
}

/// Wires the system up at process start.
///
/// Clears and reseeds the primary collection, provisions the capped
/// collection (destroying any prior records), and starts the feed. Returns
/// the service over the seeded collection and the running feed handle.
pub async fn run(
    store: &MemoryStore,
    config: FeedConfig,
) -> Result<(ItemService<MemoryCollection<Item>>, CappedFeed), FeedError> {
    let items = store.collection::<Item>(ITEM_COLLECTION);
    items.delete_all().await?;

    {
        let seeded = iter_ok::<_, StoreError>(seed_items())
            .flat_map(|item| futures_util::stream::once(items.save(item)));
        tokio::pin!(seeded);
        while let Some(item) = seeded.next().await {
            let item = item?;
            tracing::info!(id = ?item.id, description = %item.description, "seeded item");
        }
    }

    let capped = CappedFeed::provision(store, &config).await?;
    let feed = CappedFeed::start(capped, config);
    tracing::info!("capped feed started");

    Ok((ItemService::new(items), feed))
}
