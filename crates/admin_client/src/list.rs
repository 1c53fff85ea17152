use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use shared::{
    error::{ApiError, ApiResult},
    protocol::PageResponse,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Displayed page state. Replaced atomically by a resolved fetch; never
/// merged incrementally.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub fetching: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            fetching: false,
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Applied { total_pages: u32 },
    Superseded,
    Failed(ApiError),
}

/// Runs list fetches and keeps the most recently *issued* call authoritative:
/// a slower, superseded response must never overwrite the newer state, so
/// every fetch takes a ticket from a monotonic sequence and the result is
/// applied only if no newer ticket has been handed out by resolution time.
pub struct ListFetcher<T> {
    state: Mutex<ListState<T>>,
    seq: AtomicU64,
}

impl<T> Default for ListFetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListFetcher<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ListState::default()),
            seq: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> ListState<T>
    where
        T: Clone,
    {
        self.state.lock().await.clone()
    }

    pub async fn fetch_with<F>(&self, load: F) -> FetchOutcome
    where
        F: Future<Output = ApiResult<PageResponse<T>>>,
    {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().await.fetching = true;

        let result = load.await;

        let mut state = self.state.lock().await;
        if self.seq.load(Ordering::SeqCst) != ticket {
            // A newer fetch owns the fetching flag and the next state update.
            info!(ticket, "list: discarding superseded fetch result");
            return FetchOutcome::Superseded;
        }

        state.fetching = false;
        match result {
            Ok(page) => {
                let total_pages = page.total_pages;
                state.items = page.items;
                state.total_pages = total_pages;
                state.total_elements = page.total_elements;
                FetchOutcome::Applied { total_pages }
            }
            Err(err) => {
                // Stale-but-visible: the previous page stays on screen.
                warn!(status = err.status, "list: fetch failed: {}", err.message);
                FetchOutcome::Failed(err)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailState<T> {
    pub record: Option<T>,
    pub fetching: bool,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            record: None,
            fetching: false,
        }
    }
}

/// Single-record variant of [`ListFetcher`] with the same supersession
/// guard. A refetch keeps the previously loaded record visible until the new
/// one resolves.
pub struct DetailFetcher<T> {
    state: Mutex<DetailState<T>>,
    seq: AtomicU64,
}

impl<T> Default for DetailFetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DetailFetcher<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DetailState::default()),
            seq: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> DetailState<T>
    where
        T: Clone,
    {
        self.state.lock().await.clone()
    }

    pub async fn fetch_with<F>(&self, load: F) -> Result<(), ApiError>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().await.fetching = true;

        let result = load.await;

        let mut state = self.state.lock().await;
        if self.seq.load(Ordering::SeqCst) != ticket {
            info!(ticket, "detail: discarding superseded fetch result");
            return Ok(());
        }

        state.fetching = false;
        match result {
            Ok(record) => {
                state.record = Some(record);
                Ok(())
            }
            Err(err) => {
                warn!(status = err.status, "detail: fetch failed: {}", err.message);
                Err(err)
            }
        }
    }
}
