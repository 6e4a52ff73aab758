//! Cursor pager over the `createdAt`-descending lead stream.
//!
//! `PagerState` is an explicit value with two pure steps:
//! - `plan` decides which query to issue and which state changes are pending
//!   (a backtrack pop, a page decrement), without committing them;
//! - `apply` combines a plan with the fetched batch into the next state.
//!
//! `CursorPager` drives those steps against a `LeadStore` and commits the new
//! state only after the fetch succeeded, so a failed fetch leaves the previous
//! state untouched.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::DashboardError;
use crate::source::{
    DocumentCursor, LeadStore, PageQuery, PageSnapshot, StartPosition, StoredDocument,
};

/// Paging direction requested by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Initial load or "next".
    Forward,
    /// "Previous".
    Backward,
}

/// Which pager buttons are enabled after a fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Navigation {
    /// "Previous" is enabled.
    pub has_prev: bool,
    /// "Next" is enabled.
    pub has_next: bool,
}

/// Page number, resume cursor and backtrack stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagerState {
    page: usize,
    last_seen: Option<DocumentCursor>,
    backtrack: Vec<DocumentCursor>,
}

impl Default for PagerState {
    fn default() -> Self {
        Self {
            page: 1,
            last_seen: None,
            backtrack: Vec::new(),
        }
    }
}

/// A query position plus the state changes it implies once it succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagePlan {
    direction: Direction,
    start: Option<StartPosition>,
    pending: PagerState,
}

impl PagePlan {
    /// Direction this plan pages in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Position the query must start from.
    pub fn start(&self) -> Option<&StartPosition> {
        self.start.as_ref()
    }
}

/// Result of applying a fetched batch to a plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State to commit.
    pub state: PagerState,
    /// Buttons enabled after the batch.
    pub navigation: Navigation,
}

impl PagerState {
    /// Current page number (at least 1).
    pub fn page(&self) -> usize {
        self.page
    }

    /// Cursor of the last document shown, if any.
    pub fn last_seen(&self) -> Option<&DocumentCursor> {
        self.last_seen.as_ref()
    }

    /// Number of page-start cursors available for backward navigation.
    pub fn depth(&self) -> usize {
        self.backtrack.len()
    }

    /// Plan the next query in `direction` without mutating `self`.
    ///
    /// Backward pops the backtrack stack: an empty stack restarts from the
    /// newest document on page 1; otherwise the query starts at the popped
    /// cursor and the page number drops by one (never below 1).
    pub fn plan(&self, direction: Direction) -> PagePlan {
        let mut pending = self.clone();
        let start = match direction {
            Direction::Forward => pending.last_seen.clone().map(StartPosition::After),
            Direction::Backward => match pending.backtrack.pop() {
                None => {
                    pending.page = 1;
                    pending.last_seen = None;
                    None
                }
                Some(cursor) => {
                    pending.page = pending.page.saturating_sub(1).max(1);
                    Some(StartPosition::At(cursor))
                }
            },
        };
        PagePlan {
            direction,
            start,
            pending,
        }
    }

    /// Combine `plan` with the fetched `snapshot`.
    ///
    /// An empty batch commits the planned changes and disables both
    /// directions. A forward batch pushes its first cursor; the page number
    /// stays at 1 when already there (the initial load) and otherwise grows by
    /// one. Every non-empty batch moves `last_seen` to its last document.
    pub fn apply(plan: PagePlan, snapshot: &PageSnapshot, page_size: usize) -> Transition {
        let PagePlan {
            direction,
            pending: mut state,
            ..
        } = plan;
        if snapshot.is_empty() {
            return Transition {
                state,
                navigation: Navigation::default(),
            };
        }
        if direction == Direction::Forward {
            if let Some(first) = snapshot.first_cursor() {
                state.backtrack.push(first.clone());
            }
            state.page = if state.page == 1 { 1 } else { state.page + 1 };
        }
        state.last_seen = snapshot.last_cursor().cloned();
        let navigation = Navigation {
            has_prev: state.backtrack.len() > 1,
            has_next: snapshot.len() == page_size,
        };
        Transition { state, navigation }
    }
}

/// One successfully loaded page.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedPage {
    /// Committed page number.
    pub page: usize,
    /// Buttons enabled for this page.
    pub navigation: Navigation,
    /// Raw documents in stream order.
    pub documents: Vec<StoredDocument>,
}

/// Drives `PagerState` against a `LeadStore`.
pub struct CursorPager<S: LeadStore> {
    store: S,
    page_size: usize,
    created_from: Option<DateTime<Utc>>,
    created_to: Option<DateTime<Utc>>,
    state: PagerState,
}

impl<S: LeadStore> CursorPager<S> {
    /// Create a pager over `store` requesting `page_size` documents per page.
    pub fn new(store: S, page_size: usize) -> Self {
        Self {
            store,
            page_size,
            created_from: None,
            created_to: None,
            state: PagerState::default(),
        }
    }

    /// Current committed state.
    pub fn state(&self) -> &PagerState {
        &self.state
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Documents requested per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the base query bounds and clear all paging state.
    pub fn reset(
        &mut self,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) {
        self.created_from = created_from;
        self.created_to = created_to;
        self.state = PagerState::default();
    }

    /// Fetch the page in `direction`.
    ///
    /// On error the committed state is unchanged and the error is returned.
    pub fn load(&mut self, direction: Direction) -> Result<LoadedPage, DashboardError> {
        let plan = self.state.plan(direction);
        let query = PageQuery::base(self.created_from, self.created_to, self.page_size)
            .starting(plan.start().cloned());
        let snapshot = match self.store.fetch_page(&query) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    collection = self.store.collection(),
                    ?direction,
                    page = self.state.page(),
                    error = %err,
                    "[leads:pager] page fetch failed; keeping previous state"
                );
                return Err(err);
            }
        };
        let transition = PagerState::apply(plan, &snapshot, self.page_size);
        debug!(
            collection = self.store.collection(),
            ?direction,
            fetched = snapshot.len(),
            page = transition.state.page(),
            depth = transition.state.depth(),
            "[leads:pager] page loaded"
        );
        self.state = transition.state;
        Ok(LoadedPage {
            page: self.state.page(),
            navigation: transition.navigation,
            documents: snapshot.documents,
        })
    }
}
