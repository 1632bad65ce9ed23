use stride_core::CoreError;

use crate::catalog::CatalogError;

/// Errors surfaced by the engine services.
///
/// Email failures never appear here: delivery is fire-and-forget for
/// enrollment and recorded per-enrollment by the sweep, so no operation
/// fails because of the mail provider.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),
}
