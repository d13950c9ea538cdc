//! Paginated, filterable list state
//!
//! One [`ListController`] exists per resource. Mutations return a
//! [`FetchTicket`] describing the request to make; the result comes back
//! through [`ListController::apply`]. Each ticket carries a generation, and
//! only the most recently issued one is ever applied, so a slow response can
//! never overwrite a newer one.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use log::{debug, warn};

use super::pagination::{clamp_page, page_bounds, step, total_pages};
use super::resource::Resource;
use crate::api::wire::Page;
use crate::api::{ApiError, SessionClient, with_query};

/// Fallback when an error carries no message
const GENERIC_ERROR: &str = "请求错误";

/// Load lifecycle of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    LoadFailed { message: String },
}

/// A list request to run. `path` already carries the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub path: String,
    pub page: u32,
}

/// What [`ListController::apply`] did with a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// A newer request was issued after this one; the result was dropped
    Stale,
    /// The page was clamped and must be fetched again
    Refetch(FetchTicket),
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    Item { id: i64, cells: Vec<String> },
    /// A full-width message row (inline load error)
    Message(String),
}

/// Pager controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Everything a table needs to draw itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<ListRow>,
    /// "共 N 条"
    pub summary: String,
    /// Only present when there is more than one page
    pub pagination: Option<PaginationView>,
    pub status: Option<String>,
}

/// List state for resource `R`
pub struct ListController<R: Resource> {
    filters: BTreeMap<String, String>,
    page: u32,
    /// Rows per page; server-paged lists adopt the size the backend reports
    page_size: u32,
    total: u64,
    /// Server-paged: the current page. Otherwise: the whole list.
    items: Vec<R::Item>,
    state: LoadState,
    generation: u64,
    _resource: PhantomData<R>,
}

impl<R: Resource> Default for ListController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ListController<R> {
    pub fn new() -> Self {
        Self {
            filters: BTreeMap::new(),
            page: 1,
            page_size: R::PAGE_SIZE,
            total: 0,
            items: Vec::new(),
            state: LoadState::Idle,
            generation: 0,
            _resource: PhantomData,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Active filters as query pairs
    pub fn filter_pairs(&self) -> Vec<(&str, &str)> {
        self.filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Rows on the current page
    pub fn items(&self) -> &[R::Item] {
        if R::SERVER_PAGED {
            &self.items
        } else {
            &self.items[page_bounds(self.page, self.page_size, self.items.len())]
        }
    }

    /// Look up a visible row by id
    pub fn find(&self, id: i64) -> Option<&R::Item> {
        self.items().iter().find(|item| R::id(item) == id)
    }

    /// Set or clear a filter. Always returns to page 1.
    pub fn set_filter(&mut self, key: &str, value: &str) -> FetchTicket {
        let value = value.trim();
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
        debug!("{}: filter {}={:?}", R::NAME, key, value);
        self.page = 1;
        self.issue()
    }

    /// Move `delta` pages. `None` when not loaded or already at the edge.
    pub fn set_page(&mut self, delta: i32) -> Option<FetchTicket> {
        if self.state != LoadState::Loaded {
            return None;
        }
        let target = step(self.page, delta, self.total_pages());
        if target == self.page {
            return None;
        }
        self.page = target;
        Some(self.issue())
    }

    /// Fetch again with the current filters and page
    pub fn reload(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Apply a fetch result. Results from superseded tickets are dropped.
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<Page<R::Item>, ApiError>) -> Applied {
        if ticket.generation != self.generation {
            warn!(
                "{}: dropping stale response (generation {} < {})",
                R::NAME,
                ticket.generation,
                self.generation
            );
            return Applied::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                let message = e.display_or(GENERIC_ERROR);
                debug!("{}: load failed: {}", R::NAME, message);
                if R::CLEAR_ON_FAILURE {
                    self.items.clear();
                    self.total = 0;
                }
                self.state = LoadState::LoadFailed { message };
                return Applied::Applied;
            }
        };

        let mut items = page.items;
        if R::SERVER_PAGED {
            self.total = page.total.unwrap_or(items.len() as u64);
            if let Some(size) = page.page_size.filter(|size| *size > 0) {
                self.page_size = size;
            }
            items.truncate(self.page_size as usize);
        } else {
            self.total = items.len() as u64;
        }
        self.items = items;
        self.state = LoadState::Loaded;

        let clamped = clamp_page(self.page, self.total_pages());
        if clamped != self.page {
            debug!("{}: page {} out of range, clamped to {}", R::NAME, self.page, clamped);
            self.page = clamped;
            if R::SERVER_PAGED {
                return Applied::Refetch(self.issue());
            }
        }
        Applied::Applied
    }

    /// Run a ticket against the backend
    pub fn load(client: &SessionClient, ticket: &FetchTicket) -> Result<Page<R::Item>, ApiError> {
        client.list_page(&ticket.path)
    }

    /// Run a ticket and apply the result, following any clamp refetches
    pub fn fetch(&mut self, client: &SessionClient, ticket: FetchTicket) -> Applied {
        let mut ticket = ticket;
        loop {
            let result = Self::load(client, &ticket);
            match self.apply(&ticket, result) {
                Applied::Refetch(next) => ticket = next,
                other => return other,
            }
        }
    }

    /// Render the table. Pure function of the current state.
    pub fn render(&self) -> ListView {
        let total_pages = self.total_pages();

        let rows = match (&self.state, R::CLEAR_ON_FAILURE) {
            (LoadState::LoadFailed { message }, true) => {
                vec![ListRow::Message(format!("加载失败：{}", message))]
            }
            _ => self
                .items()
                .iter()
                .map(|item| ListRow::Item {
                    id: R::id(item),
                    cells: R::row(item),
                })
                .collect(),
        };

        let status = match &self.state {
            LoadState::Loading => Some("加载中…".to_string()),
            LoadState::LoadFailed { message } if !R::CLEAR_ON_FAILURE => {
                Some(format!("加载失败：{}", message))
            }
            _ => None,
        };

        let pagination = (total_pages > 1).then(|| PaginationView {
            page: self.page,
            total_pages,
            prev_enabled: self.page > 1,
            next_enabled: self.page < total_pages,
        });

        ListView {
            columns: R::columns().to_vec(),
            rows,
            summary: format!("共 {} 条", self.total),
            pagination,
            status,
        }
    }

    fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;

        let page = self.page.to_string();
        let page_size = R::PAGE_SIZE.to_string();
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if R::SERVER_PAGED {
            pairs.push(("page", &page));
            pairs.push(("page_size", &page_size));
        }
        pairs.extend(self.filter_pairs());

        FetchTicket {
            generation: self.generation,
            path: with_query(R::PATH, &pairs),
            page: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::resource::{Accounts, Mailboxes, Phones};
    use crate::models::{Account, Mailbox};

    fn accounts(ids: std::ops::Range<i64>) -> Vec<Account> {
        ids.map(|id| Account {
            id,
            email: format!("user{}@example.com", id),
            ..Default::default()
        })
        .collect()
    }

    fn mailboxes(n: i64) -> Vec<Mailbox> {
        (1..=n)
            .map(|id| Mailbox {
                id,
                email: format!("box{}@outlook.com", id),
                ..Default::default()
            })
            .collect()
    }

    fn page<T>(items: Vec<T>, total: Option<u64>) -> Page<T> {
        Page {
            items,
            total,
            page: None,
            page_size: None,
        }
    }

    #[test]
    fn test_filter_query_and_page_reset() {
        let mut list = ListController::<Accounts>::new();
        let ticket = list.reload();
        list.apply(&ticket, Ok(page(accounts(0..20), Some(45))));
        let ticket = list.set_page(1).unwrap();
        assert_eq!(ticket.page, 2);
        list.apply(&ticket, Ok(page(accounts(20..40), Some(45))));

        let ticket = list.set_filter("status", "active");
        assert_eq!(list.page(), 1);
        assert_eq!(list.state(), &LoadState::Loading);
        assert_eq!(ticket.path, "/api/accounts?page=1&page_size=20&status=active");

        let ticket = list.set_filter("status", "");
        assert_eq!(ticket.path, "/api/accounts?page=1&page_size=20");
    }

    #[test]
    fn test_local_resource_query_has_no_paging() {
        let mut list = ListController::<Mailboxes>::new();
        assert_eq!(list.reload().path, "/api/emails");
    }

    #[test]
    fn test_set_page_requires_loaded() {
        let mut list = ListController::<Accounts>::new();
        assert_eq!(list.set_page(1), None);
        let _ticket = list.reload();
        assert_eq!(list.set_page(1), None);
    }

    #[test]
    fn test_set_page_noop_at_edges() {
        let mut list = ListController::<Accounts>::new();
        let ticket = list.reload();
        list.apply(&ticket, Ok(page(accounts(0..20), Some(25))));

        assert_eq!(list.set_page(-1), None);
        let ticket = list.set_page(5).unwrap();
        assert_eq!(ticket.page, 2);
        list.apply(&ticket, Ok(page(accounts(20..25), Some(25))));
        assert_eq!(list.set_page(1), None);
    }

    #[test]
    fn test_backend_page_size_drives_page_count() {
        let mut list = ListController::<Accounts>::new();
        let ticket = list.reload();
        let mut first = page(accounts(0..10), Some(25));
        first.page_size = Some(10);
        list.apply(&ticket, Ok(first));

        assert_eq!(list.page_size(), 10);
        assert_eq!(list.total_pages(), 3);
        let ticket = list.set_page(5).unwrap();
        assert_eq!(ticket.page, 3);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut list = ListController::<Accounts>::new();
        let first = list.set_filter("status", "active");
        let second = list.set_filter("status", "banned");

        assert_eq!(list.apply(&second, Ok(page(accounts(0..3), Some(3)))), Applied::Applied);
        assert_eq!(list.apply(&first, Ok(page(accounts(0..20), Some(99)))), Applied::Stale);
        assert_eq!(list.total(), 3);
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn test_server_paged_clamp_refetches() {
        let mut list = ListController::<Accounts>::new();
        let ticket = list.reload();
        list.apply(&ticket, Ok(page(accounts(0..20), Some(60))));
        let ticket = list.set_page(2).unwrap();
        assert_eq!(ticket.page, 3);

        // Rows were deleted elsewhere; page 3 no longer exists
        let applied = list.apply(&ticket, Ok(page(Vec::new(), Some(30))));
        let Applied::Refetch(next) = applied else {
            panic!("expected refetch, got {:?}", applied);
        };
        assert_eq!(next.page, 2);
        assert_eq!(list.page(), 2);
        assert!(next.path.contains("page=2"));
    }

    #[test]
    fn test_local_paging_slices_items() {
        let mut list = ListController::<Mailboxes>::new();
        let ticket = list.reload();
        list.apply(&ticket, Ok(page(mailboxes(25), None)));

        assert_eq!(list.total(), 25);
        assert_eq!(list.total_pages(), 2);
        assert_eq!(list.items().len(), 20);

        let ticket = list.set_page(1).unwrap();
        list.apply(&ticket, Ok(page(mailboxes(25), None)));
        assert_eq!(list.page(), 2);
        assert_eq!(list.items().len(), 5);
        assert_eq!(list.items()[0].id, 21);

        // Shrinks below the current page: clamp locally, no refetch
        let ticket = list.reload();
        assert_eq!(list.apply(&ticket, Ok(page(mailboxes(4), None))), Applied::Applied);
        assert_eq!(list.page(), 1);
        assert_eq!(list.items().len(), 4);
    }

    #[test]
    fn test_failure_keeps_items_except_phones() {
        let mut list = ListController::<Mailboxes>::new();
        let ticket = list.reload();
        list.apply(&ticket, Ok(page(mailboxes(3), None)));
        let ticket = list.reload();
        list.apply(&ticket, Err(ApiError::Timeout));

        assert_eq!(
            list.state(),
            &LoadState::LoadFailed {
                message: "请求超时".to_string()
            }
        );
        assert_eq!(list.items().len(), 3);
        let view = list.render();
        assert_eq!(view.status.as_deref(), Some("加载失败：请求超时"));
        assert_eq!(view.rows.len(), 3);

        let mut phones = ListController::<Phones>::new();
        let ticket = phones.reload();
        phones.apply(
            &ticket,
            Err(ApiError::RequestFailed {
                status: 500,
                body: "boom".to_string(),
            }),
        );
        let view = phones.render();
        assert_eq!(view.rows, vec![ListRow::Message("加载失败：boom".to_string())]);
        assert_eq!(view.summary, "共 0 条");
    }

    #[test]
    fn test_render_pagination() {
        let mut list = ListController::<Accounts>::new();
        let ticket = list.set_filter("status", "active");
        list.apply(&ticket, Ok(page(accounts(0..20), Some(25))));

        let view = list.render();
        assert_eq!(view.summary, "共 25 条");
        assert_eq!(
            view.pagination,
            Some(PaginationView {
                page: 1,
                total_pages: 2,
                prev_enabled: false,
                next_enabled: true,
            })
        );

        let ticket = list.reload();
        list.apply(&ticket, Ok(page(accounts(0..5), Some(5))));
        assert_eq!(list.render().pagination, None);
    }
}
