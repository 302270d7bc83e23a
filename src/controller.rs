//! Per-entity pagination driver.
//!
//! A [`ListController`] owns one [`ListAggregator`] and walks it through the
//! list lifecycle: `Idle → LoadingFirst → Ready ⇄ LoadingMore`. Fetch
//! failures are non-fatal — they are logged and the state machine returns to
//! where it was, with nothing appended and nothing notified.
//!
//! Mutable state (aggregator, state, progress marker) lives behind one
//! mutex that is only ever held for synchronous sections, never across the
//! network await. That gives the single-writer discipline the data model
//! needs: every mutation happens in one logical turn, and the collaborator
//! is notified after the mutation completes. It also makes the in-flight
//! guard real — a `fetch_more` that arrives while another is awaiting the
//! network observes `LoadingMore` and returns without issuing a second call.
//!
//! The UI collaborator is held weakly. A screen dismissed mid-fetch drops
//! its [`ListEvents`] and the completion quietly skips the notification.

use std::ops::Range;
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, warn};

use crate::aggregator::ListAggregator;
use crate::endpoint::Endpoint;
use crate::mapper::{CharacterMapper, EpisodeMapper, LocationMapper, RecordMapper};
use crate::models::PageEnvelope;
use crate::request::ApiRequest;
use crate::service::ApiService;

/// Where a controller is in the list lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing loaded, no fetch in flight.
    Idle,
    /// The first page is being fetched.
    LoadingFirst,
    /// At least the first page is loaded; no fetch in flight.
    Ready,
    /// A next page is being fetched.
    LoadingMore,
}

/// Notifications the controller sends to its UI collaborator.
pub trait ListEvents: Send + Sync {
    /// Fired exactly once, after the first page lands.
    fn initial_data_ready(&self);
    /// Fired after a next page lands, with the exact contiguous range of
    /// newly appended positions.
    fn items_inserted(&self, range: Range<usize>);
}

struct Inner<M: RecordMapper> {
    aggregator: ListAggregator<M>,
    state: ControllerState,
    /// Snapshot of the item count taken when a fetch-more begins; the start
    /// of the next announced insertion range. Never decremented.
    marker: usize,
    events: Option<Weak<dyn ListEvents>>,
}

/// Pagination controller for one entity kind.
pub struct ListController<M: RecordMapper> {
    endpoint: Endpoint,
    /// Query parameters applied to the first-page request (list filters).
    query: Vec<(String, String)>,
    service: Arc<ApiService>,
    inner: Mutex<Inner<M>>,
}

/// Convenience aliases for the three entity kinds.
pub type CharacterListController = ListController<CharacterMapper>;
pub type LocationListController = ListController<LocationMapper>;
pub type EpisodeListController = ListController<EpisodeMapper>;

impl ListController<CharacterMapper> {
    pub fn characters(service: Arc<ApiService>) -> Self {
        Self::new(Endpoint::Character, CharacterMapper, service)
    }
}

impl ListController<LocationMapper> {
    pub fn locations(service: Arc<ApiService>) -> Self {
        Self::new(Endpoint::Location, LocationMapper, service)
    }
}

impl ListController<EpisodeMapper> {
    pub fn episodes(service: Arc<ApiService>) -> Self {
        Self::new(Endpoint::Episode, EpisodeMapper, service)
    }
}

impl<M: RecordMapper> ListController<M> {
    pub fn new(endpoint: Endpoint, mapper: M, service: Arc<ApiService>) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            service,
            inner: Mutex::new(Inner {
                aggregator: ListAggregator::new(mapper),
                state: ControllerState::Idle,
                marker: 0,
                events: None,
            }),
        }
    }

    /// Apply list filters (`?name=rick&status=alive`) to the first-page
    /// request. Order is preserved.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach the UI collaborator. Held weakly; if the collaborator is gone
    /// by the time a fetch completes, the notification is skipped.
    pub fn set_events(&self, events: &Arc<dyn ListEvents>) {
        self.lock().events = Some(Arc::downgrade(events));
    }

    pub fn state(&self) -> ControllerState {
        self.lock().state
    }

    pub fn len(&self) -> usize {
        self.lock().aggregator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().aggregator.is_empty()
    }

    /// The current display rows, in item order.
    pub fn view_models(&self) -> Vec<M::ViewModel> {
        self.lock().aggregator.view_models().to_vec()
    }

    /// Whether the cursor says another page exists.
    pub fn has_next_page(&self) -> bool {
        self.lock().aggregator.next_page_url().is_some()
    }

    /// The cursor's `next` URL, if any.
    pub fn next_page_url(&self) -> Option<String> {
        self.lock().aggregator.next_page_url().map(str::to_string)
    }

    /// Trigger-policy input: a next page exists, nothing is in flight, and
    /// the list is non-empty.
    pub fn ready_for_more(&self) -> bool {
        let inner = self.lock();
        inner.state == ControllerState::Ready
            && inner.aggregator.next_page_url().is_some()
            && !inner.aggregator.is_empty()
    }

    /// UI-to-controller direction: the item at `index` was activated.
    /// Returns the record for the collaborator to resolve into navigation;
    /// out-of-range returns `None`.
    pub fn item_selected(&self, index: usize) -> Option<M::Record> {
        self.lock().aggregator.item_at(index).cloned()
    }

    /// Fetch the very first page. No-op once the controller has left `Idle`.
    pub async fn fetch_first(&self) {
        {
            let mut inner = self.lock();
            if inner.state != ControllerState::Idle {
                return;
            }
            inner.state = ControllerState::LoadingFirst;
        }

        let request = ApiRequest::new(self.endpoint, Vec::new(), self.query.clone());
        match self
            .service
            .execute::<PageEnvelope<M::Record>>(&request)
            .await
        {
            Ok(envelope) => {
                let events = {
                    let mut inner = self.lock();
                    inner.aggregator.apply_first_page(envelope);
                    inner.state = ControllerState::Ready;
                    inner.events.clone()
                };
                if let Some(events) = events.and_then(|w| w.upgrade()) {
                    events.initial_data_ready();
                }
            }
            Err(err) => {
                warn!(endpoint = %self.endpoint, error = %err, "first page fetch failed");
                self.lock().state = ControllerState::Idle;
            }
        }
    }

    /// Fetch the next page, from `url` if given, otherwise from the cursor's
    /// stored `next`.
    ///
    /// Guards, in order:
    /// - another fetch in flight → silent no-op (at most one concurrent
    ///   pagination request per controller);
    /// - no next-page URL available → no network call, state unchanged;
    /// - the URL does not parse into a request → treated as "no next page",
    ///   back to `Ready` without a network call.
    pub async fn fetch_more(&self, url: Option<&str>) {
        let (request, marker) = {
            let mut inner = self.lock();
            match inner.state {
                ControllerState::Ready => {}
                // Idle: no cursor exists yet; Loading*: already in flight.
                _ => return,
            }
            let target = match url {
                Some(u) => u.to_string(),
                None => match inner.aggregator.next_page_url() {
                    Some(u) => u.to_string(),
                    None => return,
                },
            };
            inner.state = ControllerState::LoadingMore;
            inner.marker = inner.aggregator.len();
            let marker = inner.marker;
            match ApiRequest::parse(&target) {
                Some(request) => (request, marker),
                None => {
                    // A malformed next URL means "no next page", not an error.
                    debug!(url = %target, "next-page URL did not parse, stopping pagination");
                    inner.state = ControllerState::Ready;
                    return;
                }
            }
        };

        match self
            .service
            .execute::<PageEnvelope<M::Record>>(&request)
            .await
        {
            Ok(envelope) => {
                let appended = envelope.results.len();
                let events = {
                    let mut inner = self.lock();
                    inner.aggregator.apply_next_page(envelope);
                    inner.state = ControllerState::Ready;
                    inner.events.clone()
                };
                if let Some(events) = events.and_then(|w| w.upgrade()) {
                    events.items_inserted(marker..marker + appended);
                }
            }
            Err(err) => {
                warn!(endpoint = %self.endpoint, error = %err, "next page fetch failed");
                self.lock().state = ControllerState::Ready;
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<M>> {
        // Inner sections never panic while holding the lock; treat poisoning
        // as recoverable rather than propagating it.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::service::{ServiceError, Transport};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn episode_json(id: u64) -> String {
        format!(
            r#"{{"id": {id}, "name": "Episode {id}", "air_date": "December 2, 2013",
                "episode": "S01E{id:02}", "characters": [],
                "url": "https://rickandmortyapi.com/api/episode/{id}"}}"#
        )
    }

    fn page_json(ids: std::ops::Range<u64>, next: Option<&str>) -> String {
        let results: Vec<String> = ids.map(episode_json).collect();
        let next = match next {
            Some(u) => format!(r#""{}""#, u),
            None => "null".to_string(),
        };
        format!(
            r#"{{"info": {{"count": 51, "pages": 3, "next": {next}, "prev": null}},
                "results": [{}]}}"#,
            results.join(",")
        )
    }

    /// Transport keyed by URL, counting calls, optionally holding responses
    /// until released.
    struct FixtureTransport {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl FixtureTransport {
        fn new(pages: Vec<(&str, String)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }
    }

    #[async_trait]
    impl Transport for FixtureTransport {
        async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.pages
                .get(url)
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| ServiceError::Transport(format!("no fixture for {}", url)))
        }
    }

    fn controller_with(
        transport: Arc<FixtureTransport>,
    ) -> ListController<EpisodeMapper> {
        let service = Arc::new(ApiService::with_transport(
            transport,
            Arc::new(ResponseCache::new()),
        ));
        ListController::episodes(service)
    }

    /// Collaborator that records every notification it receives.
    #[derive(Default)]
    struct RecordingEvents {
        ready_count: AtomicUsize,
        inserted: Mutex<Vec<Range<usize>>>,
    }

    impl ListEvents for RecordingEvents {
        fn initial_data_ready(&self) {
            self.ready_count.fetch_add(1, Ordering::SeqCst);
        }
        fn items_inserted(&self, range: Range<usize>) {
            self.inserted.lock().unwrap().push(range);
        }
    }

    const PAGE_ONE: &str = "https://rickandmortyapi.com/api/episode";
    const PAGE_TWO: &str = "https://rickandmortyapi.com/api/episode?page=2";

    #[tokio::test]
    async fn test_fetch_first_loads_and_notifies_once() {
        let transport = Arc::new(FixtureTransport::new(vec![(
            PAGE_ONE,
            page_json(1..21, Some(PAGE_TWO)),
        )]));
        let controller = controller_with(transport.clone());
        let events = Arc::new(RecordingEvents::default());
        let dyn_events: Arc<dyn ListEvents> = events.clone();
        controller.set_events(&dyn_events);

        controller.fetch_first().await;

        assert_eq!(controller.state(), ControllerState::Ready);
        assert_eq!(controller.len(), 20);
        assert!(controller.has_next_page());
        assert_eq!(events.ready_count.load(Ordering::SeqCst), 1);

        // Re-entry is a no-op once past Idle.
        controller.fetch_first().await;
        assert_eq!(events.ready_count.load(Ordering::SeqCst), 1);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_first_failure_returns_to_idle() {
        let transport = Arc::new(FixtureTransport::new(vec![]));
        let controller = controller_with(transport);
        let events = Arc::new(RecordingEvents::default());
        let dyn_events: Arc<dyn ListEvents> = events.clone();
        controller.set_events(&dyn_events);

        controller.fetch_first().await;

        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.is_empty());
        assert_eq!(events.ready_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_more_appends_and_reports_exact_range() {
        let transport = Arc::new(FixtureTransport::new(vec![
            (PAGE_ONE, page_json(1..21, Some(PAGE_TWO))),
            (PAGE_TWO, page_json(21..34, None)),
        ]));
        let controller = controller_with(transport);
        let events = Arc::new(RecordingEvents::default());
        let dyn_events: Arc<dyn ListEvents> = events.clone();
        controller.set_events(&dyn_events);

        controller.fetch_first().await;
        controller.fetch_more(None).await;

        assert_eq!(controller.len(), 33);
        assert_eq!(controller.state(), ControllerState::Ready);
        assert_eq!(*events.inserted.lock().unwrap(), vec![20..33]);
        assert!(!controller.has_next_page());
    }

    #[tokio::test]
    async fn test_fetch_more_without_cursor_is_inert() {
        let transport = Arc::new(FixtureTransport::new(vec![(
            PAGE_ONE,
            page_json(1..21, None),
        )]));
        let controller = controller_with(transport.clone());
        controller.fetch_first().await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        controller.fetch_more(None).await;

        // No next page: no network call, no state change.
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state(), ControllerState::Ready);
        assert_eq!(controller.len(), 20);
    }

    #[tokio::test]
    async fn test_malformed_next_url_stops_pagination() {
        let transport = Arc::new(FixtureTransport::new(vec![(
            PAGE_ONE,
            page_json(1..21, Some("https://elsewhere.example/api/episode?page=2")),
        )]));
        let controller = controller_with(transport.clone());
        controller.fetch_first().await;

        controller.fetch_more(None).await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state(), ControllerState::Ready);
    }

    #[tokio::test]
    async fn test_concurrent_fetch_more_issues_one_call() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(
            FixtureTransport::new(vec![
                (PAGE_ONE, page_json(1..21, Some(PAGE_TWO))),
                (PAGE_TWO, page_json(21..41, None)),
            ])
            .gated(gate.clone()),
        );
        let controller = Arc::new(controller_with(transport.clone()));

        gate.notify_one();
        controller.fetch_first().await;
        let calls_after_first = transport.calls.load(Ordering::SeqCst);

        let a = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.fetch_more(None).await })
        };
        // Let the first fetch_more reach the gated transport call.
        tokio::task::yield_now().await;
        let b = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.fetch_more(None).await })
        };
        tokio::task::yield_now().await;
        gate.notify_one();
        a.await.unwrap();
        b.await.unwrap();

        assert_eq!(
            transport.calls.load(Ordering::SeqCst),
            calls_after_first + 1
        );
        assert_eq!(controller.len(), 40);
    }

    #[tokio::test]
    async fn test_fetch_more_failure_keeps_items_and_returns_ready() {
        let transport = Arc::new(FixtureTransport::new(vec![(
            PAGE_ONE,
            // Next URL parses but has no fixture, so the transport errors.
            page_json(1..21, Some(PAGE_TWO)),
        )]));
        let controller = controller_with(transport);
        let events = Arc::new(RecordingEvents::default());
        let dyn_events: Arc<dyn ListEvents> = events.clone();
        controller.set_events(&dyn_events);

        controller.fetch_first().await;
        controller.fetch_more(None).await;

        assert_eq!(controller.state(), ControllerState::Ready);
        assert_eq!(controller.len(), 20);
        assert!(events.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_collaborator_skips_notification() {
        let transport = Arc::new(FixtureTransport::new(vec![(
            PAGE_ONE,
            page_json(1..21, None),
        )]));
        let controller = controller_with(transport);
        {
            let events = Arc::new(RecordingEvents::default());
            let dyn_events: Arc<dyn ListEvents> = events.clone();
            controller.set_events(&dyn_events);
            // Screen dismissed: collaborator dropped before the fetch.
        }

        controller.fetch_first().await;

        // Data still landed; the notification just had nowhere to go.
        assert_eq!(controller.state(), ControllerState::Ready);
        assert_eq!(controller.len(), 20);
    }

    #[tokio::test]
    async fn test_item_selected_bounds() {
        let transport = Arc::new(FixtureTransport::new(vec![(
            PAGE_ONE,
            page_json(1..4, None),
        )]));
        let controller = controller_with(transport);
        controller.fetch_first().await;

        assert_eq!(controller.item_selected(0).map(|e| e.id), Some(1));
        assert!(controller.item_selected(3).is_none());
    }
}
