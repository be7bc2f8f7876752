//! Build errors for flow and session builders.

use crate::core::{CatalogError, InvalidFlow};
use thiserror::Error;

/// Errors that can occur when building flows and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Catalog not specified. Call .playlist(..) or .catalog(..) before .build()")]
    MissingCatalog,

    #[error("Flow not specified. Call .flow(steps) before .build()")]
    MissingFlow,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    InvalidFlow(#[from] InvalidFlow),
}
