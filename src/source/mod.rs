//! Lead store interfaces and cursor types.
//!
//! Ownership model:
//! - `LeadStore` is the dashboard-facing query interface over a remote,
//!   `createdAt`-descending ordered collection.
//! - `DocumentCursor` is an opaque position issued by the store; callers only
//!   hand it back to resume (`After`) or rewind (`At`).
//! - `InMemoryLeadStore` implements the same ordering/range/cursor contract
//!   for tests and small datasets.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::{Ordering, Reverse};
use std::sync::Arc;

use crate::errors::DashboardError;
use crate::normalize::created_at_of;
use crate::types::LeadId;

/// Opaque position of a document inside the ordered result stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentCursor {
    document_id: LeadId,
    order_key: Option<DateTime<Utc>>,
}

impl DocumentCursor {
    /// Build a cursor for `document_id` ordered by `order_key`.
    ///
    /// Stores call this; the dashboard never inspects the contents.
    pub fn new(document_id: impl Into<LeadId>, order_key: Option<DateTime<Utc>>) -> Self {
        Self {
            document_id: document_id.into(),
            order_key,
        }
    }

    /// Document the cursor points at.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Ordering value (`createdAt`) captured when the cursor was issued.
    pub fn order_key(&self) -> Option<DateTime<Utc>> {
        self.order_key
    }

    /// Stream order: newest first, ties by ascending document id.
    fn stream_order(&self, other: &Self) -> Ordering {
        (Reverse(self.order_key), &self.document_id)
            .cmp(&(Reverse(other.order_key), &other.document_id))
    }
}

/// A raw stored document plus the cursor the store issued for it.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    /// Document identifier.
    pub id: LeadId,
    /// Loosely-typed document body.
    pub data: Value,
    /// Position of this document in the result stream.
    pub cursor: DocumentCursor,
}

/// Where a page query starts relative to a cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartPosition {
    /// Strictly after the cursor (forward paging).
    After(DocumentCursor),
    /// At the cursor, inclusive (backward seek).
    At(DocumentCursor),
}

/// Base query plus paging position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageQuery {
    /// Inclusive lower bound on `createdAt`.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `createdAt`.
    pub created_to: Option<DateTime<Utc>>,
    /// Maximum documents returned.
    pub limit: usize,
    /// Paging position; `None` starts at the newest document.
    pub start: Option<StartPosition>,
}

impl PageQuery {
    /// Base query with no paging position.
    pub fn base(
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Self {
        Self {
            created_from,
            created_to,
            limit,
            start: None,
        }
    }

    /// Same base query starting at `start`.
    pub fn starting(mut self, start: Option<StartPosition>) -> Self {
        self.start = start;
        self
    }
}

/// Ordered batch returned by one page query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageSnapshot {
    /// Documents in stream order.
    pub documents: Vec<StoredDocument>,
}

impl PageSnapshot {
    /// `true` when the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents in the batch.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Cursor of the first document of the batch.
    pub fn first_cursor(&self) -> Option<&DocumentCursor> {
        self.documents.first().map(|document| &document.cursor)
    }

    /// Cursor of the last document of the batch.
    pub fn last_cursor(&self) -> Option<&DocumentCursor> {
        self.documents.last().map(|document| &document.cursor)
    }
}

/// Remote lead collection queried by the dashboard.
///
/// Results are ordered by `createdAt` descending. For a fixed dataset and
/// query, output must be deterministic; nothing is guaranteed when the data
/// changes between calls.
pub trait LeadStore: Send + Sync {
    /// Collection name used in logs and errors.
    fn collection(&self) -> &str;

    /// Run one page query.
    fn fetch_page(&self, query: &PageQuery) -> Result<PageSnapshot, DashboardError>;
}

impl<T: LeadStore + ?Sized> LeadStore for Arc<T> {
    fn collection(&self) -> &str {
        (**self).collection()
    }

    fn fetch_page(&self, query: &PageQuery) -> Result<PageSnapshot, DashboardError> {
        (**self).fetch_page(query)
    }
}

/// In-memory lead store for tests and small datasets.
///
/// Documents without a readable `createdAt` are excluded from every query,
/// as a remote store ordering by that field would do. A start cursor naming a
/// document the store does not hold fails with `StoreInconsistent`.
pub struct InMemoryLeadStore {
    collection: String,
    documents: Arc<Vec<StoredDocument>>,
}

impl InMemoryLeadStore {
    /// Create a store from `(id, data)` pairs.
    pub fn new<I>(collection: impl Into<String>, documents: I) -> Self
    where
        I: IntoIterator<Item = (LeadId, Value)>,
    {
        let mut ordered: Vec<StoredDocument> = documents
            .into_iter()
            .filter_map(|(id, data)| {
                let created_at = created_at_of(&data)?;
                Some(StoredDocument {
                    cursor: DocumentCursor::new(id.clone(), Some(created_at)),
                    id,
                    data,
                })
            })
            .collect();
        ordered.sort_by(|a, b| a.cursor.stream_order(&b.cursor));
        Self {
            collection: collection.into(),
            documents: Arc::new(ordered),
        }
    }

    /// Number of queryable documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// `true` when no document is queryable.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl LeadStore for InMemoryLeadStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn fetch_page(&self, query: &PageQuery) -> Result<PageSnapshot, DashboardError> {
        if let Some(StartPosition::After(cursor) | StartPosition::At(cursor)) = &query.start {
            let known = self
                .documents
                .iter()
                .any(|document| document.id == cursor.document_id());
            if !known {
                return Err(DashboardError::StoreInconsistent {
                    collection: self.collection.clone(),
                    details: format!("cursor document '{}' not found", cursor.document_id()),
                });
            }
        }
        let in_range = |document: &&StoredDocument| {
            let Some(created_at) = document.cursor.order_key() else {
                return false;
            };
            query.created_from.is_none_or(|from| created_at >= from)
                && query.created_to.is_none_or(|to| created_at <= to)
        };
        let past_start = |document: &&StoredDocument| match &query.start {
            None => true,
            Some(StartPosition::After(cursor)) => {
                document.cursor.stream_order(cursor) == Ordering::Greater
            }
            Some(StartPosition::At(cursor)) => {
                document.cursor.stream_order(cursor) != Ordering::Less
            }
        };
        let documents = self
            .documents
            .iter()
            .filter(in_range)
            .filter(past_start)
            .take(query.limit)
            .cloned()
            .collect();
        Ok(PageSnapshot { documents })
    }
}
