//! Source-to-replica reconciliation.

mod ops;
pub mod reconciler;
pub mod summary;

pub use reconciler::{Reconciler, DEFAULT_MAX_CONCURRENT_OPS};
pub use summary::{PassOutcome, PassReport, PassSummary};
