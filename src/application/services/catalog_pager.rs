//! Single-flight catalog pagination.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::application::dto::{BatchOutcome, PageSummary, SkipReason};
use crate::domain::entities::{ImageUrlTemplate, Item, ItemId, PagingState, capitalize_words};
use crate::domain::ports::{CatalogPort, RawEntry};

/// Entries requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Distance from the end of the list at which the next page is requested.
pub const PREFETCH_MARGIN: usize = 6;

/// Pager tuning.
#[derive(Debug, Clone)]
pub struct PagerConfig {
    /// Entries requested per page. Must be positive.
    pub page_size: usize,
    /// Lookahead from the end of the list that triggers the next batch.
    pub prefetch_margin: usize,
    /// Pattern used to derive image URLs from ids.
    pub image_url_template: ImageUrlTemplate,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prefetch_margin: PREFETCH_MARGIN,
            image_url_template: ImageUrlTemplate::default(),
        }
    }
}

#[derive(Debug)]
struct PagerInner {
    items: Vec<Item>,
    state: PagingState,
}

/// Loads the catalog page by page into an append-only item list.
///
/// At most one page fetch is in flight at any time; overlapping requests are
/// rejected rather than queued. The lock is never held across an await: the
/// guard check happens before the fetch and the result is applied after it.
pub struct CatalogPager {
    catalog: Arc<dyn CatalogPort>,
    config: PagerConfig,
    inner: Mutex<PagerInner>,
    state_tx: watch::Sender<PagingState>,
}

impl std::fmt::Debug for CatalogPager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogPager")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CatalogPager {
    /// Creates a pager with an empty item list.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogPort>, config: PagerConfig) -> Self {
        let page_size = config.page_size.max(1);
        let config = PagerConfig { page_size, ..config };
        let state = PagingState::new(page_size);
        let (state_tx, _) = watch::channel(state);

        Self {
            catalog,
            config,
            inner: Mutex::new(PagerInner {
                items: Vec::new(),
                state,
            }),
            state_tx,
        }
    }

    /// Current paging state.
    #[must_use]
    pub fn state(&self) -> PagingState {
        self.inner.lock().state
    }

    /// Subscribes to paging state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PagingState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of every item loaded so far, in fetch order.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.inner.lock().items.clone()
    }

    /// Loaded item at `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<Item> {
        self.inner.lock().items.get(index).cloned()
    }

    /// Loaded item with the given id.
    #[must_use]
    pub fn find(&self, id: ItemId) -> Option<Item> {
        self.inner
            .lock()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Number of items loaded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Returns true if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether showing `visible_index` should request the next page.
    ///
    /// True only when the index sits exactly `prefetch_margin` items from the
    /// end of the list.
    #[must_use]
    pub fn should_load_more(&self, visible_index: usize) -> bool {
        self.len().checked_sub(self.config.prefetch_margin) == Some(visible_index)
    }

    /// Loads the next batch if `visible_index` hits the prefetch trigger.
    pub async fn request_load_more(&self, visible_index: usize) -> Option<BatchOutcome> {
        if self.should_load_more(visible_index) {
            trace!(visible_index, "Prefetch trigger hit");
            Some(self.load_next_batch().await)
        } else {
            None
        }
    }

    /// Like [`request_load_more`](Self::request_load_more), but runs the batch
    /// on a background task and returns its handle.
    pub fn spawn_load_more(
        self: &Arc<Self>,
        visible_index: usize,
    ) -> Option<JoinHandle<BatchOutcome>> {
        if !self.should_load_more(visible_index) {
            return None;
        }
        let pager = Arc::clone(self);
        Some(tokio::spawn(async move { pager.load_next_batch().await }))
    }

    /// Fetches, transforms and appends the next page.
    ///
    /// Returns immediately without effect while another batch is in flight or
    /// once the catalog is exhausted. A failed fetch is logged and treated as
    /// an empty page, which also ends pagination.
    pub async fn load_next_batch(&self) -> BatchOutcome {
        let offset = {
            let mut inner = self.inner.lock();
            if inner.state.is_loading {
                return BatchOutcome::Skipped(SkipReason::InFlight);
            }
            if !inner.state.has_more {
                return BatchOutcome::Skipped(SkipReason::Exhausted);
            }
            inner.state.is_loading = true;
            inner.state.offset
        };
        let _loading = LoadingGuard { pager: self };
        self.publish();

        let page_size = self.config.page_size;
        debug!(offset, page_size, "Loading next batch");

        let (entries, fetch_failed) = match self.catalog.fetch_page(page_size, offset).await {
            Ok(entries) => (entries, false),
            Err(e) => {
                // TODO: a transient failure ends pagination for good; retry
                // once product decides how to tell it apart from end-of-data.
                warn!(offset, error = %e, "Failed to load catalog page");
                (Vec::new(), true)
            }
        };

        let page = transform_entries(entries, &self.config.image_url_template);
        let appended = page.len();

        let summary = {
            let mut inner = self.inner.lock();
            inner.items.extend(page);
            inner.state.offset += appended;
            if appended < page_size {
                inner.state.has_more = false;
            }
            PageSummary {
                appended,
                offset: inner.state.offset,
                has_more: inner.state.has_more,
                fetch_failed,
            }
        };

        info!(
            appended,
            offset = summary.offset,
            has_more = summary.has_more,
            "Catalog batch applied"
        );

        BatchOutcome::Loaded(summary)
    }

    fn publish(&self) {
        let state = self.state();
        self.state_tx.send_replace(state);
    }
}

/// Clears `is_loading` when the batch ends, including when its future is dropped.
struct LoadingGuard<'a> {
    pager: &'a CatalogPager,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.pager.inner.lock().state.is_loading = false;
        self.pager.publish();
    }
}

/// Turns raw catalog entries into items, preserving order.
///
/// Entries whose URL has no integer id, or whose id yields no valid image
/// URL, are dropped.
#[must_use]
pub fn transform_entries(entries: Vec<RawEntry>, template: &ImageUrlTemplate) -> Vec<Item> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let Some(id) = ItemId::from_resource_url(&entry.url) else {
                trace!(url = %entry.url, "Dropping entry without numeric id");
                return None;
            };
            let image_url = template.url_for(id)?;
            Some(Item::new(id, capitalize_words(&entry.name), image_url))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FetchError;
    use crate::domain::ports::mocks::MockCatalogPort;
    use async_trait::async_trait;
    use mockall::Sequence;
    use std::collections::VecDeque;
    use std::time::Duration;
    use tokio_test::assert_ok;

    fn entries(range: std::ops::Range<i64>) -> Vec<RawEntry> {
        range
            .map(|id| {
                RawEntry::new(
                    format!("mon-{id}"),
                    format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
                )
            })
            .collect()
    }

    /// Catalog that replays scripted pages after a delay and records requests.
    struct ScriptedCatalog {
        pages: Mutex<VecDeque<Result<Vec<RawEntry>, FetchError>>>,
        requests: Mutex<Vec<(usize, usize)>>,
        delay: Duration,
    }

    impl ScriptedCatalog {
        fn new(pages: Vec<Result<Vec<RawEntry>, FetchError>>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into()),
                requests: Mutex::new(Vec::new()),
                delay,
            })
        }

        fn requests(&self) -> Vec<(usize, usize)> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl CatalogPort for ScriptedCatalog {
        async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<RawEntry>, FetchError> {
            self.requests.lock().push((limit, offset));
            tokio::time::sleep(self.delay).await;
            self.pages.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn pager(catalog: Arc<dyn CatalogPort>) -> CatalogPager {
        CatalogPager::new(catalog, PagerConfig::default())
    }

    #[test]
    fn test_initial_state() {
        let pager = pager(Arc::new(MockCatalogPort::new()));

        assert_eq!(pager.state(), PagingState::new(DEFAULT_PAGE_SIZE));
        assert!(pager.state().can_load());
        assert!(pager.is_empty());
    }

    #[tokio::test]
    async fn test_full_page_then_short_page() {
        let mut catalog = MockCatalogPort::new();
        let mut seq = Sequence::new();
        catalog
            .expect_fetch_page()
            .withf(|limit, offset| *limit == 20 && *offset == 0)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(entries(1..21)));
        catalog
            .expect_fetch_page()
            .withf(|limit, offset| *limit == 20 && *offset == 20)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(entries(21..28)));
        let pager = pager(Arc::new(catalog));

        pager.load_next_batch().await;
        let state = pager.state();
        assert_eq!((pager.len(), state.offset, state.has_more), (20, 20, true));

        pager.load_next_batch().await;
        let state = pager.state();
        assert_eq!((pager.len(), state.offset, state.has_more), (27, 27, false));

        // Exhausted: no further fetch, no growth.
        assert_eq!(
            pager.load_next_batch().await,
            BatchOutcome::Skipped(SkipReason::Exhausted)
        );
        assert_eq!(pager.len(), 27);
        assert!(!pager.state().is_loading);
    }

    #[tokio::test]
    async fn test_offset_after_full_batches() {
        let catalog = ScriptedCatalog::new(
            vec![Ok(entries(1..21)), Ok(entries(21..41)), Ok(entries(41..61))],
            Duration::ZERO,
        );
        let pager = pager(catalog.clone());

        for _ in 0..3 {
            assert!(!pager.load_next_batch().await.is_skipped());
        }

        assert_eq!(pager.state().offset, 3 * DEFAULT_PAGE_SIZE);
        assert_eq!(catalog.requests(), vec![(20, 0), (20, 20), (20, 40)]);
        let ids: Vec<i64> = pager.items().iter().map(|item| item.id().as_i64()).collect();
        assert_eq!(ids, (1..61).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_malformed_entry_is_dropped() {
        let mut page = entries(1..21);
        page[4] = RawEntry::new("missingno", "https://pokeapi.co/api/v2/pokemon/abc/");
        let catalog = ScriptedCatalog::new(vec![Ok(page)], Duration::ZERO);
        let pager = pager(catalog);

        let outcome = pager.load_next_batch().await;

        assert_eq!(
            outcome.summary().map(|s| (s.appended, s.offset)),
            Some((19, 19))
        );
        assert!(pager.find(ItemId(5)).is_none());
        // 19 < page size, so the pager considers the catalog exhausted.
        assert!(!pager.state().has_more);
    }

    #[tokio::test]
    async fn test_items_are_transformed() {
        let catalog = ScriptedCatalog::new(
            vec![Ok(vec![RawEntry::new(
                "pikachu",
                "https://pokeapi.co/api/v2/pokemon/25/",
            )])],
            Duration::ZERO,
        );
        let pager = pager(catalog);

        pager.load_next_batch().await;

        let item = pager.item(0).unwrap();
        assert_eq!(item.id(), ItemId(25));
        assert_eq!(item.display_name(), "Pikachu");
        assert_eq!(
            item.image_url().as_str(),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_loading_and_ends_paging() {
        let mut catalog = MockCatalogPort::new();
        catalog
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Err(FetchError::transport("connection refused")));
        let pager = pager(Arc::new(catalog));

        let outcome = pager.load_next_batch().await;

        assert_eq!(
            outcome,
            BatchOutcome::Loaded(PageSummary {
                appended: 0,
                offset: 0,
                has_more: false,
                fetch_failed: true,
            })
        );
        assert!(!pager.state().is_loading);
        assert!(pager.load_next_batch().await.is_skipped());
    }

    #[tokio::test]
    async fn test_concurrent_calls_fetch_once() {
        let catalog = ScriptedCatalog::new(
            vec![Ok(entries(1..21)), Ok(entries(21..41))],
            Duration::from_millis(20),
        );
        let pager = pager(catalog.clone());

        let outcomes =
            futures_util::future::join_all((0..8).map(|_| pager.load_next_batch())).await;

        let loaded = outcomes.iter().filter(|o| !o.is_skipped()).count();
        let in_flight = outcomes
            .iter()
            .filter(|o| **o == BatchOutcome::Skipped(SkipReason::InFlight))
            .count();
        assert_eq!((loaded, in_flight), (1, 7));
        assert_eq!(catalog.requests(), vec![(20, 0)]);
        assert_eq!(pager.len(), 20);
    }

    #[tokio::test]
    async fn test_concurrent_tasks_fetch_once() {
        let catalog = ScriptedCatalog::new(vec![Ok(entries(1..21))], Duration::from_millis(20));
        let pager = Arc::new(pager(catalog.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pager = Arc::clone(&pager);
                tokio::spawn(async move { pager.load_next_batch().await })
            })
            .collect();
        for handle in handles {
            assert_ok!(handle.await);
        }

        assert_eq!(catalog.requests().len(), 1);
        assert_eq!(pager.state().offset, 20);
    }

    #[tokio::test]
    async fn test_request_load_more_trigger() {
        let catalog = ScriptedCatalog::new(
            vec![Ok(entries(1..21)), Ok(entries(21..41))],
            Duration::ZERO,
        );
        let pager = pager(catalog.clone());
        pager.load_next_batch().await;

        for index in [0, 13, 15, 19, 20] {
            assert!(pager.request_load_more(index).await.is_none());
        }
        assert_eq!(catalog.requests().len(), 1);

        let outcome = pager.request_load_more(20 - PREFETCH_MARGIN).await;
        assert!(outcome.is_some_and(|o| !o.is_skipped()));
        assert_eq!(catalog.requests(), vec![(20, 0), (20, 20)]);
    }

    #[tokio::test]
    async fn test_short_list_never_triggers() {
        let catalog = ScriptedCatalog::new(vec![Ok(entries(1..4))], Duration::ZERO);
        let pager = pager(catalog);
        pager.load_next_batch().await;

        assert!((0..10).all(|index| !pager.should_load_more(index)));
    }

    #[tokio::test]
    async fn test_spawn_load_more() {
        let catalog = ScriptedCatalog::new(
            vec![Ok(entries(1..21)), Ok(entries(21..41))],
            Duration::ZERO,
        );
        let pager = Arc::new(pager(catalog));
        pager.load_next_batch().await;

        assert!(pager.spawn_load_more(3).is_none());
        let handle = pager.spawn_load_more(14).unwrap();

        let outcome = assert_ok!(handle.await);
        assert_eq!(outcome.summary().map(|s| s.offset), Some(40));
    }

    #[tokio::test]
    async fn test_dropped_batch_clears_loading() {
        let catalog = ScriptedCatalog::new(vec![Ok(entries(1..21))], Duration::from_secs(60));
        let pager = pager(catalog);

        let timed_out =
            tokio::time::timeout(Duration::from_millis(10), pager.load_next_batch()).await;

        assert!(timed_out.is_err());
        assert!(!pager.state().is_loading);
        assert!(pager.state().has_more);
    }

    #[tokio::test]
    async fn test_subscribers_see_state() {
        let catalog = ScriptedCatalog::new(vec![Ok(entries(1..21))], Duration::ZERO);
        let pager = pager(catalog);
        let mut rx = pager.subscribe();

        pager.load_next_batch().await;

        assert!(rx.has_changed().unwrap_or(false));
        let state = *rx.borrow_and_update();
        assert_eq!(state.offset, 20);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let config = PagerConfig {
            page_size: 0,
            ..PagerConfig::default()
        };
        let pager = CatalogPager::new(Arc::new(MockCatalogPort::new()), config);
        assert_eq!(pager.state().page_size, 1);
    }
}
