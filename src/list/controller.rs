//! State behind one list screen: items, page metadata, filters, loading and error.
//!
//! Every fetch is tagged with a sequence number. A response older than one already
//! applied is dropped, so out-of-order completions never overwrite newer data.

use serde::Serialize;

use crate::errors::FetchError;
use crate::list::debounce::Debouncer;
use crate::list::pager::{self, PageItem, PageNav};
use crate::models::pagination::{Page, PaginationMeta};
use crate::models::query::{self, FilterQuery};
use crate::models::{apply_patch, Entity};
use crate::services::resource::{CollectionService, FieldToggle};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListViewState<T> {
    pub items: Vec<T>,
    pub meta: Option<PaginationMeta>,
    #[serde(skip)]
    pub query: FilterQuery,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> ListViewState<T> {
    fn new(query: FilterQuery) -> Self {
        Self {
            items: Vec::new(),
            meta: None,
            query,
            is_loading: false,
            error: None,
        }
    }
}

/// A fetch that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: FilterQuery,
}

pub struct ListController<S: CollectionService> {
    service: S,
    state: ListViewState<S::Item>,
    issued: u64,
    applied: u64,
}

impl<S: CollectionService> ListController<S> {
    pub fn new(service: S, query: FilterQuery) -> Self {
        Self {
            service,
            state: ListViewState::new(query),
            issued: 0,
            applied: 0,
        }
    }

    pub fn state(&self) -> &ListViewState<S::Item> {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn items(&self) -> &[S::Item] {
        &self.state.items
    }

    pub fn meta(&self) -> Option<&PaginationMeta> {
        self.state.meta.as_ref()
    }

    pub fn query(&self) -> &FilterQuery {
        &self.state.query
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Navigation bounds for the page on screen; `None` before the first load.
    pub fn nav(&self) -> Option<PageNav> {
        self.state.meta.as_ref().map(PageNav::from)
    }

    pub fn page_sequence(&self) -> Vec<PageItem> {
        self.nav().map(|nav| nav.sequence()).unwrap_or_default()
    }

    pub fn result_range(&self) -> Option<(u64, u64)> {
        let meta = self.state.meta.as_ref()?;
        pager::result_range(meta, self.state.items.len())
    }

    // ---- fetch lifecycle ----

    /// Issue a fetch for the current query.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.state.is_loading = true;
        FetchTicket {
            seq: self.issued,
            query: self.state.query.clone(),
        }
    }

    /// Merge `patch` into the query, return to page 1, and issue a fetch.
    pub fn update_query(&mut self, patch: FilterQuery) -> FetchTicket {
        self.state.query.merge(patch);
        self.state.query.set_page(1);
        self.begin_fetch()
    }

    /// Apply the outcome of a ticket. Returns `false` if it was stale and dropped.
    pub fn complete_fetch(&mut self, seq: u64, result: Result<Page<S::Item>, FetchError>) -> bool {
        if seq < self.applied {
            tracing::debug!(seq, applied = self.applied, "Dropping stale list response");
            return false;
        }
        self.applied = seq;
        if seq >= self.issued {
            self.state.is_loading = false;
        }

        match result {
            Ok(page) => {
                self.state.items = page.items;
                self.state.meta = Some(page.meta);
                self.state.error = None;
            }
            Err(e) => self.record_error(&e),
        }
        true
    }

    /// Run a ticket against the service without applying the result.
    ///
    /// Several may be in flight at once; hand each outcome to [`Self::complete_fetch`] in
    /// whatever order they finish.
    pub async fn fetch(&self, ticket: FetchTicket) -> (u64, Result<Page<S::Item>, FetchError>) {
        (ticket.seq, self.service.list(&ticket.query).await)
    }

    /// Run a ticket against the service and apply the result.
    pub async fn run(&mut self, ticket: FetchTicket) -> Result<(), FetchError> {
        let (seq, result) = self.fetch(ticket).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.complete_fetch(seq, result);
        outcome
    }

    /// Like [`Self::run`], but put `previous` back as the query if the fetch fails so the
    /// query keeps describing what is on screen.
    async fn run_or_restore(&mut self, ticket: FetchTicket, previous: FilterQuery) -> Result<(), FetchError> {
        let outcome = self.run(ticket).await;
        if outcome.is_err() {
            self.state.query = previous;
        }
        outcome
    }

    /// Fetch the current query again.
    pub async fn reload(&mut self) -> Result<(), FetchError> {
        let ticket = self.begin_fetch();
        self.run(ticket).await
    }

    // ---- user actions ----

    /// Merge filter changes and fetch page 1. A `None` value in `patch` clears that filter.
    pub async fn set_filter(&mut self, patch: FilterQuery) -> Result<(), FetchError> {
        let previous = self.state.query.clone();
        let ticket = self.update_query(patch);
        self.run_or_restore(ticket, previous).await
    }

    /// Set the search term; a blank term clears it.
    pub async fn set_search(&mut self, term: &str) -> Result<(), FetchError> {
        let term = term.trim();
        let patch = if term.is_empty() {
            FilterQuery::new().without(query::SEARCH)
        } else {
            FilterQuery::new().with(query::SEARCH, term)
        };
        self.set_filter(patch).await
    }

    /// Wait for the next settled search term and fetch page 1 for it.
    ///
    /// Returns `None` once every input feeding `terms` has been dropped.
    pub async fn next_search(&mut self, terms: &mut Debouncer<String>) -> Option<Result<(), FetchError>> {
        let term = terms.next().await?;
        Some(self.set_search(&term).await)
    }

    /// Fetch page `page`. Returns `Ok(false)` without fetching when `page` is out of range.
    pub async fn go_to_page(&mut self, page: u32) -> Result<bool, FetchError> {
        let pages = self.state.meta.map(|m| m.pages).unwrap_or(0);
        if page < 1 || page > pages {
            return Ok(false);
        }
        let previous = self.state.query.clone();
        self.state.query.set_page(page);
        let ticket = self.begin_fetch();
        self.run_or_restore(ticket, previous).await?;
        Ok(true)
    }

    pub async fn next_page(&mut self) -> Result<bool, FetchError> {
        match self.nav().and_then(|nav| nav.next()) {
            Some(page) => self.go_to_page(page).await,
            None => Ok(false),
        }
    }

    pub async fn previous_page(&mut self) -> Result<bool, FetchError> {
        match self.nav().and_then(|nav| nav.previous()) {
            Some(page) => self.go_to_page(page).await,
            None => Ok(false),
        }
    }

    /// Delete an item, then refetch to reconcile the totals.
    ///
    /// The item is removed locally only to tell whether the page is now empty; if it is
    /// and the page is past the first, the previous page is fetched instead. A failed
    /// delete changes nothing except the recorded error.
    pub async fn delete(&mut self, id: &str) -> Result<(), FetchError> {
        if let Err(e) = self.service.delete(id).await {
            self.record_error(&e);
            return Err(e);
        }

        self.state.items.retain(|item| item.id() != id);
        let page = self.state.query.page();
        if self.state.items.is_empty() && page > 1 {
            self.state.query.set_page(page - 1);
        }
        self.reload().await
    }

    /// Apply a toggle and patch the item with what the server returned.
    ///
    /// Returns the updated item, or `None` if it is no longer on screen.
    pub async fn toggle(&mut self, id: &str, field: &FieldToggle) -> Result<Option<S::Item>, FetchError> {
        let patch = match self.service.toggle(id, field).await {
            Ok(patch) => patch,
            Err(e) => {
                self.record_error(&e);
                return Err(e);
            }
        };

        let Some(slot) = self.state.items.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };
        let updated = match apply_patch(slot, &patch) {
            Ok(updated) => updated,
            Err(e) => {
                self.state.error = Some(e.user_message());
                return Err(e);
            }
        };
        *slot = updated.clone();
        self.state.error = None;
        Ok(Some(updated))
    }

    fn record_error(&mut self, error: &FetchError) {
        if error.is_session_expired() {
            self.state.items.clear();
            self.state.meta = None;
        }
        tracing::warn!(error = %error, "List action failed");
        self.state.error = Some(error.user_message());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use tokio::sync::{mpsc, oneshot};
    use tokio::time::sleep;

    use super::*;
    use crate::list::debounce::debounce;
    use crate::models::pagination::RawPagination;
    use crate::models::query::QueryValue;
    use crate::models::Record;

    /// In-memory collection with server-side paging.
    struct FakeService {
        rows: Mutex<Vec<Record>>,
        fail_next: Mutex<Option<FetchError>>,
        requested_pages: Mutex<Vec<u32>>,
    }

    impl FakeService {
        fn with_rows(n: usize) -> Self {
            let rows = (1..=n)
                .map(|i| record(json!({"_id": format!("r{i}"), "isActive": true})))
                .collect();
            Self {
                rows: Mutex::new(rows),
                fail_next: Mutex::new(None),
                requested_pages: Mutex::new(Vec::new()),
            }
        }

        fn fail_next(&self, err: FetchError) {
            *self.fail_next.lock().unwrap() = Some(err);
        }

        fn take_failure(&self) -> Result<(), FetchError> {
            match self.fail_next.lock().unwrap().take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CollectionService for FakeService {
        type Item = Record;

        async fn list(&self, query: &FilterQuery) -> Result<Page<Record>, FetchError> {
            self.take_failure()?;
            let page = query.page();
            let limit = query.limit().unwrap_or(10);
            self.requested_pages.lock().unwrap().push(page);

            let rows = self.rows.lock().unwrap();
            let items = rows
                .iter()
                .skip(((page - 1) * limit) as usize)
                .take(limit as usize)
                .cloned()
                .collect();
            let meta = RawPagination {
                total: rows.len() as u64,
                current: Some(page),
                limit: Some(limit),
                ..Default::default()
            }
            .normalize(limit);
            Ok(Page { items, meta })
        }

        async fn delete(&self, id: &str) -> Result<(), FetchError> {
            self.take_failure()?;
            self.rows.lock().unwrap().retain(|r| r.id() != id);
            Ok(())
        }

        async fn toggle(&self, id: &str, _field: &FieldToggle) -> Result<Map<String, Value>, FetchError> {
            self.take_failure()?;
            // The server decides the new value; here it always deactivates and stamps.
            Ok(json!({"_id": id, "isActive": false, "toggledBy": "server"})
                .as_object()
                .cloned()
                .unwrap())
        }
    }

    /// Each search term's list call waits until its gate is opened.
    struct GatedService {
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl CollectionService for GatedService {
        type Item = Record;

        async fn list(&self, query: &FilterQuery) -> Result<Page<Record>, FetchError> {
            let term = query.search().unwrap_or_default().to_string();
            let gate = self.gates.lock().unwrap().remove(&term);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(page_of(&[term.as_str()], 1))
        }

        async fn delete(&self, _id: &str) -> Result<(), FetchError> {
            Ok(())
        }

        async fn toggle(&self, _id: &str, _field: &FieldToggle) -> Result<Map<String, Value>, FetchError> {
            Ok(Map::new())
        }
    }

    fn record(v: Value) -> Record {
        serde_json::from_value(v).unwrap()
    }

    fn page_of(ids: &[&str], current: u32) -> Page<Record> {
        Page {
            items: ids.iter().map(|id| record(json!({"_id": id}))).collect(),
            meta: PaginationMeta {
                current,
                pages: 5,
                total: 50,
                limit: 10,
            },
        }
    }

    fn controller(rows: usize) -> ListController<FakeService> {
        ListController::new(
            FakeService::with_rows(rows),
            FilterQuery::new().with(query::LIMIT, 10u32),
        )
    }

    fn ids(c: &ListController<FakeService>) -> Vec<String> {
        c.items().iter().map(|r| r.id().to_string()).collect()
    }

    #[tokio::test]
    async fn first_load_of_23_items() {
        let mut c = controller(23);
        c.reload().await.unwrap();

        assert_eq!(c.items().len(), 10);
        assert_eq!(
            c.meta(),
            Some(&PaginationMeta {
                current: 1,
                pages: 3,
                total: 23,
                limit: 10
            })
        );
        assert!(!c.is_loading());
        assert_eq!(c.result_range(), Some((1, 10)));
    }

    #[tokio::test]
    async fn deleting_last_item_on_page_goes_back_a_page() {
        let mut c = controller(21);
        c.reload().await.unwrap();
        assert!(c.go_to_page(3).await.unwrap());
        assert_eq!(ids(&c), vec!["r21"]);

        c.delete("r21").await.unwrap();

        assert_eq!(c.query().page(), 2);
        assert_eq!(c.meta().map(|m| m.current), Some(2));
        assert_eq!(c.meta().map(|m| m.pages), Some(2));
        assert_eq!(c.items().len(), 10);
        let requested = c.service().requested_pages.lock().unwrap().clone();
        assert_eq!(requested, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn delete_on_non_empty_page_refetches_same_page() {
        let mut c = controller(23);
        c.reload().await.unwrap();
        c.delete("r1").await.unwrap();

        assert_eq!(c.query().page(), 1);
        assert_eq!(c.meta().map(|m| m.total), Some(22));
        assert_eq!(ids(&c)[0], "r2");
    }

    #[tokio::test]
    async fn failed_delete_leaves_items_and_query() {
        let mut c = controller(5);
        c.reload().await.unwrap();
        c.service().fail_next(FetchError::Transport {
            status: Some(500),
            message: "boom".to_string(),
        });

        let err = c.delete("r1").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(c.items().len(), 5);
        assert_eq!(c.query().page(), 1);
        assert!(c.error().is_some());
    }

    #[tokio::test]
    async fn toggle_uses_server_value() {
        let mut c = controller(3);
        c.reload().await.unwrap();

        let updated = c.toggle("r2", &FieldToggle::Active).await.unwrap().unwrap();

        assert_eq!(updated.get("isActive"), Some(&json!(false)));
        assert_eq!(c.items()[1].get("toggledBy"), Some(&json!("server")));
        assert_eq!(c.items()[0].get("isActive"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn failed_toggle_leaves_item_unchanged() {
        let mut c = controller(3);
        c.reload().await.unwrap();
        c.service().fail_next(FetchError::ApiRejected {
            message: "Not allowed".to_string(),
            errors: Vec::new(),
        });

        assert!(c.toggle("r1", &FieldToggle::Active).await.is_err());
        assert_eq!(c.items()[0].get("isActive"), Some(&json!(true)));
        assert_eq!(c.error(), Some("Not allowed"));
    }

    #[tokio::test]
    async fn out_of_range_page_is_a_no_op() {
        let mut c = controller(23);
        assert!(!c.go_to_page(1).await.unwrap());
        c.reload().await.unwrap();
        assert!(!c.go_to_page(0).await.unwrap());
        assert!(!c.go_to_page(4).await.unwrap());
        assert!(!c.previous_page().await.unwrap());
        assert!(c.next_page().await.unwrap());
        assert_eq!(c.meta().map(|m| m.current), Some(2));
    }

    #[tokio::test]
    async fn filter_change_resets_to_first_page() {
        let mut c = controller(23);
        c.reload().await.unwrap();
        c.go_to_page(3).await.unwrap();

        c.set_filter(FilterQuery::new().with("isActive", true)).await.unwrap();
        assert_eq!(c.query().page(), 1);
        assert_eq!(c.query().get("isActive"), Some(&QueryValue::Bool(true)));

        c.set_search("  ").await.unwrap();
        assert_eq!(c.query().search(), None);
    }

    #[test]
    fn late_response_does_not_overwrite_newer_one() {
        let mut c = controller(0);
        let first = c.update_query(FilterQuery::new().with(query::SEARCH, "ru"));
        let second = c.update_query(FilterQuery::new().with(query::SEARCH, "rust"));
        assert_eq!(second.query.search(), Some("rust"));
        assert!(c.is_loading());

        assert!(c.complete_fetch(second.seq, Ok(page_of(&["new"], 1))));
        assert!(!c.is_loading());
        assert!(!c.complete_fetch(first.seq, Ok(page_of(&["old"], 1))));

        assert_eq!(ids(&c), vec!["new"]);
        assert!(!c.is_loading());
    }

    #[test]
    fn in_order_responses_keep_loading_until_latest() {
        let mut c = controller(0);
        let first = c.begin_fetch();
        let second = c.begin_fetch();

        assert!(c.complete_fetch(first.seq, Ok(page_of(&["a"], 1))));
        assert!(c.is_loading());
        assert!(c.complete_fetch(
            second.seq,
            Err(FetchError::Transport {
                status: None,
                message: "offline".to_string()
            })
        ));
        assert!(!c.is_loading());
        // Failed fetch keeps the earlier data on screen.
        assert_eq!(ids(&c), vec!["a"]);
        assert!(c.error().is_some());
    }

    #[tokio::test]
    async fn session_expiry_clears_list() {
        let mut c = controller(5);
        c.reload().await.unwrap();
        c.service().fail_next(FetchError::SessionExpired);

        assert_eq!(c.reload().await, Err(FetchError::SessionExpired));
        assert!(c.items().is_empty());
        assert!(c.meta().is_none());
    }

    #[tokio::test]
    async fn failed_page_change_keeps_query_on_visible_page() {
        let mut c = controller(23);
        c.reload().await.unwrap();
        c.service().fail_next(FetchError::Transport {
            status: None,
            message: "offline".to_string(),
        });

        assert!(c.go_to_page(2).await.is_err());
        assert_eq!(c.query().page(), 1);
        assert_eq!(c.meta().map(|m| m.current), Some(1));

        c.delete("r1").await.unwrap();

        assert_eq!(c.query().page(), 1);
        assert_eq!(c.meta().map(|m| m.current), Some(1));
        assert_eq!(ids(&c)[0], "r2");
        let requested = c.service().requested_pages.lock().unwrap().clone();
        assert_eq!(requested, vec![1, 1]);
    }

    #[tokio::test]
    async fn failed_filter_change_keeps_previous_filters() {
        let mut c = controller(23);
        c.reload().await.unwrap();
        c.go_to_page(2).await.unwrap();
        c.service().fail_next(FetchError::Transport {
            status: Some(503),
            message: "unavailable".to_string(),
        });

        assert!(c.set_filter(FilterQuery::new().with("isActive", false)).await.is_err());

        assert_eq!(c.query().get("isActive"), None);
        assert_eq!(c.query().page(), 2);
        assert_eq!(c.meta().map(|m| m.current), Some(2));
    }

    #[tokio::test]
    async fn reordered_completions_keep_the_later_query() {
        let (open_ru, ru_gate) = oneshot::channel();
        let (open_rust, rust_gate) = oneshot::channel();
        let service = GatedService {
            gates: Mutex::new(HashMap::from([
                ("ru".to_string(), ru_gate),
                ("rust".to_string(), rust_gate),
            ])),
        };
        let mut c = ListController::new(service, FilterQuery::new());
        let first = c.update_query(FilterQuery::new().with(query::SEARCH, "ru"));
        let second = c.update_query(FilterQuery::new().with(query::SEARCH, "rust"));
        let (first_seq, second_seq) = (first.seq, second.seq);

        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let (second_done, second_settled) = oneshot::channel::<()>();
        {
            let c = &c;
            let done_first = done_tx.clone();
            tokio::join!(
                async move {
                    let _ = done_first.send(c.fetch(first).await);
                },
                async move {
                    let _ = done_tx.send(c.fetch(second).await);
                    let _ = second_done.send(());
                },
                async move {
                    let _ = open_rust.send(());
                    let _ = second_settled.await;
                    let _ = open_ru.send(());
                },
            );
        }

        let mut applied = Vec::new();
        while let Ok((seq, result)) = done_rx.try_recv() {
            applied.push((seq, c.complete_fetch(seq, result)));
        }

        assert_eq!(applied, vec![(second_seq, true), (first_seq, false)]);
        let shown: Vec<&str> = c.items().iter().map(|r| r.id()).collect();
        assert_eq!(shown, vec!["rust"]);
        assert_eq!(c.query().search(), Some("rust"));
        assert!(!c.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_search_terms_fetches_once() {
        let mut c = controller(23);
        let (input, mut terms) = debounce(Duration::from_millis(300));
        tokio::spawn(async move {
            for term in ["r", "r1", "r12"] {
                input.push(term.to_string());
                sleep(Duration::from_millis(100)).await;
            }
        });

        assert_eq!(c.next_search(&mut terms).await, Some(Ok(())));
        assert_eq!(c.query().search(), Some("r12"));
        assert_eq!(c.service().requested_pages.lock().unwrap().len(), 1);

        assert_eq!(c.next_search(&mut terms).await, None);
        assert_eq!(c.service().requested_pages.lock().unwrap().len(), 1);
    }
}
