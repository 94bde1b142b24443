use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pokegrid::application::{BatchOutcome, CatalogPager, DeriveAccentUseCase, PagerConfig};
use pokegrid::domain::{ImageCachePort, Item, ItemId};
use pokegrid::infrastructure::{
    AppConfig, CliArgs, HttpImageTransport, ImageLoadedEvent, ImageLoader, ImageLoaderConfig,
    MemoryImageCache, PokeApiClient, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

/// Walks the visible index down the list the way a scrolling grid would,
/// letting the prefetch trigger pull in pages until `pages` have loaded.
async fn scroll(pager: &CatalogPager, pages: usize) {
    let mut loaded_pages = usize::from(!pager.is_empty());
    let mut index = 0;

    while loaded_pages < pages && index < pager.len() {
        if let Some(BatchOutcome::Loaded(summary)) = pager.request_load_more(index).await {
            loaded_pages += 1;
            debug!(index, offset = summary.offset, "Scrolled into next page");
            if !summary.has_more {
                break;
            }
        }
        index += 1;
    }
}

async fn collect_images(
    rx: &mut mpsc::UnboundedReceiver<ImageLoadedEvent>,
    expected: usize,
) -> HashMap<ItemId, bool> {
    let mut results = HashMap::with_capacity(expected);
    while results.len() < expected {
        let Some(event) = rx.recv().await else {
            break;
        };
        results.insert(event.id, event.image.is_some());
    }
    results
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(&args);

    init_logging(&config)?;

    info!(version = pokegrid::VERSION, "Starting pokegrid");

    let catalog = Arc::new(PokeApiClient::with_base_url(
        config.catalog.base_url.clone(),
        config.catalog.timeout_secs,
    )?);
    let pager = CatalogPager::new(
        catalog,
        PagerConfig {
            page_size: config.catalog.page_size,
            prefetch_margin: config.catalog.prefetch_margin,
            image_url_template: config.image_url_template(),
        },
    );

    let cache = Arc::new(MemoryImageCache::new(config.images.cache_capacity));
    let transport = Arc::new(HttpImageTransport::new(config.images.timeout_secs)?);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let loader = ImageLoader::new(
        ImageLoaderConfig {
            max_concurrent_downloads: config.images.max_concurrent_downloads,
        },
        cache.clone(),
        transport,
        &event_tx,
    );

    pager.load_next_batch().await;
    scroll(&pager, args.pages).await;

    let items = pager.items();
    loader.prefetch(items.iter().cloned());
    let distinct: HashSet<ItemId> = items.iter().map(Item::id).collect();
    let images = collect_images(&mut event_rx, distinct.len()).await;

    for item in &items {
        let status = match images.get(&item.id()) {
            Some(true) => "ok",
            Some(false) => "failed",
            None => "pending",
        };
        println!("#{:<5} {:<24} [{status}]", item.id().as_i64(), item.display_name());
    }

    let state = pager.state();
    println!(
        "{} items loaded (offset {}, more: {})",
        items.len(),
        state.offset,
        state.has_more
    );

    if let Some(id) = args.select.map(ItemId) {
        match pager.find(id) {
            Some(item) => {
                if loader.resolve(&item).await.is_none() {
                    warn!(id = %id, "Selected item has no image");
                }
                let accent = DeriveAccentUseCase::new(cache.clone()).execute(&item);
                match accent {
                    Some(color) => println!("{} accent color: {color}", item.display_name()),
                    None => println!("{} has no accent color", item.display_name()),
                }
            }
            None => println!("#{id} is not loaded"),
        }
    }

    println!("{} (capacity {})", cache.stats(), cache.capacity());
    debug!(cached = cache.len(), "Exiting");

    Ok(())
}
