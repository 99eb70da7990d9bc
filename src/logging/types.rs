//! Run summary entries and the [`Log`] trait.
use std::fmt;

/// Final state of one (platform, brand) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PairStatus {
    /// Every artifact was written or already current.
    Ok,
    /// The sources held no tokens; nothing was rendered.
    Skipped,
    /// Rendered in dry-run mode; nothing was written.
    DryRun,
    /// Loading, rendering or committing failed, or `check` found drift.
    Failed,
}

impl PairStatus {
    /// Every status in summary order.
    pub const ALL: [Self; 4] = [Self::Ok, Self::Skipped, Self::DryRun, Self::Failed];

    /// Single-character marker shown before the pair name.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Ok => '✓',
            Self::Skipped => '·',
            Self::DryRun => '~',
            Self::Failed => '✗',
        }
    }

    /// SGR colour prefix for console output.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::Skipped => "\x1b[2m",
            Self::DryRun => "\x1b[37m",
            Self::Failed => "\x1b[31m",
        }
    }
}

impl fmt::Display for PairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        })
    }
}

/// One line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Pair label, e.g. `web/brand#1`.
    pub pair: String,
    /// Final status.
    pub status: PairStatus,
    /// File counts or the error that stopped the pair.
    pub detail: Option<String>,
}

/// Logging backend used by the build orchestrator.
///
/// [`Logger`](super::Logger) routes everything through `tracing`; tests
/// supply a recorder instead.
pub trait Log: Send + Sync {
    /// Section header, rendered as `==> msg`.
    fn stage(&self, msg: &str);
    /// Informational message.
    fn info(&self, msg: &str);
    /// Detail shown only with `--verbose`, always kept in the log file.
    fn debug(&self, msg: &str);
    /// Warning.
    fn warn(&self, msg: &str);
    /// Error.
    fn error(&self, msg: &str);
    /// Action skipped because of `--dry-run`.
    fn dry_run(&self, msg: &str);
    /// Record the final state of a pair for the summary.
    fn record_pair(&self, pair: &str, status: PairStatus, detail: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_display_as_summary_labels() {
        let labels: Vec<String> = PairStatus::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["ok", "skipped", "dry-run", "failed"]);
    }

    #[test]
    fn failed_pairs_are_marked_red() {
        assert_eq!(PairStatus::Failed.marker(), '✗');
        assert_eq!(PairStatus::Failed.color(), "\x1b[31m");
    }
}
