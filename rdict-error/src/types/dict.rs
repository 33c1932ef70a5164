use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Errors produced by the dictionary's mutation, resize and iteration API.
///
/// These map directly onto the refusal classes a chained hash table can
/// report: none of them indicate a memory error, only that an invariant
/// blocked the requested operation.
#[derive(Debug, Clone)]
pub enum DictError {
    /// Expand or bulk rehash was refused because a rehash is already in
    /// progress, or a bulk rehash was attempted while an iterator is live.
    Busy { operation: &'static str },
    /// The request would violate a structural invariant (e.g. expanding to
    /// a capacity smaller than the number of live entries, or to the same
    /// capacity as the current primary table).
    InvariantViolation { reason: String },
    /// Lookup or delete target is absent. Not exceptional, just a distinct
    /// outcome the caller is expected to branch on.
    NotFound,
}

impl std::fmt::Display for DictError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Busy { operation } => write!(f, "dict busy: {operation} refused while rehashing or iterating"),
            Self::InvariantViolation { reason } => write!(f, "dict invariant violated: {reason}"),
            Self::NotFound => write!(f, "key not found"),
        }
    }
}

impl std::error::Error for DictError {}

impl ErrorExt for DictError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Busy { .. } => StatusCode::LockError,
            Self::InvariantViolation { .. } => StatusCode::InvalidArgs,
            Self::NotFound => StatusCode::NotFound,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::Busy { .. } => "operation refused: dictionary busy".to_string(),
            Self::InvariantViolation { .. } => "operation refused: invariant violation".to_string(),
            Self::NotFound => "key not found".to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "dict".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Self::Busy { operation } = self {
            tags.push(("operation", operation.to_string()));
        }
        tags
    }
}
