use std::io;

use thiserror::Error;

use crate::types::UserId;

/// Error type for store access, access checks, exports, and configuration.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The store query could not be served.
    #[error("lead store '{collection}' is unavailable: {reason}")]
    StoreUnavailable {
        /// Queried collection.
        collection: String,
        /// Backend message.
        reason: String,
    },
    /// The query referenced state the store does not hold (e.g. a stale cursor).
    #[error("lead store '{collection}' returned inconsistent state: {details}")]
    StoreInconsistent {
        /// Queried collection.
        collection: String,
        /// What did not match.
        details: String,
    },
    /// The role directory could not answer.
    #[error("role lookup for '{user_id}' failed: {reason}")]
    RoleLookup {
        /// User whose role was requested.
        user_id: UserId,
        /// Backend message.
        reason: String,
    },
    /// Signed-in user is not a manager; carries the user notice.
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// Export requested with no shown rows.
    #[error("nothing to export")]
    NothingToExport,
    /// Filesystem failure while writing an export.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Invalid dashboard configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
