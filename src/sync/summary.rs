//! Per-pass aggregation of reconciliation results.

use std::fmt;
use std::time::Duration;

/// Counts of what one directory visit (or a whole pass) did.
///
/// Every recursive call returns one of these; parents merge the summaries of
/// their children so the top-level call holds the totals for the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub dirs_created: usize,
    pub files_copied: usize,
    pub files_unchanged: usize,
    pub files_deleted: usize,
    pub dirs_deleted: usize,
    pub errors: usize,
    /// Operations not started because the pass was cancelled
    pub skipped: usize,
    pub cancelled: bool,
}

impl PassSummary {
    pub fn merge(&mut self, other: PassSummary) {
        self.dirs_created += other.dirs_created;
        self.files_copied += other.files_copied;
        self.files_unchanged += other.files_unchanged;
        self.files_deleted += other.files_deleted;
        self.dirs_deleted += other.dirs_deleted;
        self.errors += other.errors;
        self.skipped += other.skipped;
        self.cancelled |= other.cancelled;
    }

    /// Number of filesystem mutations performed.
    pub fn mutations(&self) -> usize {
        self.dirs_created + self.files_copied + self.files_deleted + self.dirs_deleted
    }

    pub fn outcome(&self) -> PassOutcome {
        if self.cancelled {
            PassOutcome::Cancelled
        } else if self.errors > 0 {
            PassOutcome::PartialFailure
        } else {
            PassOutcome::Success
        }
    }
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} unchanged, {} dirs created, {} files deleted, {} dirs deleted, {} errors",
            self.files_copied,
            self.files_unchanged,
            self.dirs_created,
            self.files_deleted,
            self.dirs_deleted,
            self.errors
        )?;
        if self.cancelled {
            write!(f, " (cancelled, {} skipped)", self.skipped)?;
        }
        Ok(())
    }
}

/// Aggregate status of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Success,
    PartialFailure,
    Cancelled,
}

impl PassOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassOutcome::Success => "success",
            PassOutcome::PartialFailure => "partial_failure",
            PassOutcome::Cancelled => "cancelled",
        }
    }
}

/// Result of one top-level reconcile call.
#[derive(Debug, Clone, Copy)]
pub struct PassReport {
    pub summary: PassSummary,
    pub elapsed: Duration,
}

impl PassReport {
    pub fn outcome(&self) -> PassOutcome {
        self.summary.outcome()
    }
}
