//! The console/file logger and the end-of-run summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, PairStatus, SummaryEntry};
use super::utils::log_file_path;

/// Target of stage header events.
pub(super) const STAGE_TARGET: &str = "tokens::stage";
/// Target of dry-run events.
pub(super) const DRY_RUN_TARGET: &str = "tokens::dry_run";

/// Logger backed by the global `tracing` subscriber.
///
/// Besides forwarding messages it collects one [`SummaryEntry`] per pair and
/// prints them at the end of the run. Everything it emits also lands in
/// `$XDG_CACHE_HOME/tokens/<command>.log` once
/// [`init_subscriber`](super::init_subscriber) has run.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<SummaryEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Log file shown at the end of the summary.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Snapshot of the recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<SummaryEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log an action that `--dry-run` suppressed.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record the final state of a pair.
    pub fn record_pair(&self, pair: &str, status: PairStatus, detail: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(SummaryEntry {
                pair: pair.to_string(),
                status,
                detail: detail.map(String::from),
            });
        }
    }

    /// Number of failed pairs.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries().iter().filter(|e| e.status == PairStatus::Failed).count()
    }

    /// Print one line per recorded pair followed by the totals.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for line in summary_lines(&entries) {
            self.info(&line);
        }
        println!();
        self.info(&totals(&entries));
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        self.stage(msg);
    }

    fn info(&self, msg: &str) {
        self.info(msg);
    }

    fn debug(&self, msg: &str) {
        self.debug(msg);
    }

    fn warn(&self, msg: &str) {
        self.warn(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }

    fn dry_run(&self, msg: &str) {
        self.dry_run(msg);
    }

    fn record_pair(&self, pair: &str, status: PairStatus, detail: Option<&str>) {
        self.record_pair(pair, status, detail);
    }
}

/// Coloured `✓ web/brand#1 (5 files, 2 written)` lines.
fn summary_lines(entries: &[SummaryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let detail = entry
                .detail
                .as_deref()
                .map_or_else(String::new, |d| format!(" ({d})"));
            format!(
                "{}{} {}{detail}\x1b[0m",
                entry.status.color(),
                entry.status.marker(),
                entry.pair
            )
        })
        .collect()
}

/// `6 pairs: 4 ok, 1 skipped, 1 failed`, leaving out statuses nobody has.
fn totals(entries: &[SummaryEntry]) -> String {
    let counts: Vec<String> = PairStatus::ALL
        .iter()
        .filter_map(|&status| {
            let n = entries.iter().filter(|e| e.status == status).count();
            (n > 0).then(|| format!("{}{n} {status}\x1b[0m", status.color()))
        })
        .collect();
    let noun = if entries.len() == 1 { "pair" } else { "pairs" };
    format!("{} {noun}: {}", entries.len(), counts.join(", "))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use crate::logging::utils::strip_ansi;
    use std::fs;

    fn entry(pair: &str, status: PairStatus, detail: Option<&str>) -> SummaryEntry {
        SummaryEntry {
            pair: pair.to_string(),
            status,
            detail: detail.map(String::from),
        }
    }

    #[test]
    fn record_pair_keeps_order_and_detail() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_pair("web/brand#1", PairStatus::Ok, Some("5 files, 5 written"));
        log.record_pair("web/brand#2", PairStatus::Skipped, None);
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pair, "web/brand#1");
        assert_eq!(entries[0].detail.as_deref(), Some("5 files, 5 written"));
        assert_eq!(entries[1].status, PairStatus::Skipped);
    }

    #[test]
    fn failure_count_counts_failed_pairs_only() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failure_count(), 0);
        log.record_pair("web/a", PairStatus::Ok, None);
        log.record_pair("ios/a", PairStatus::Failed, Some("missing template"));
        log.record_pair("ios/b", PairStatus::Failed, Some("cycle"));
        log.record_pair("android/a", PairStatus::DryRun, None);
        assert_eq!(log.failure_count(), 2);
    }

    #[test]
    fn recording_through_the_trait_object() {
        let (log, _tmp, _guard) = isolated_logger();
        let dyn_log: &dyn Log = &log;
        dyn_log.record_pair("flutter/a", PairStatus::Ok, None);
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn summary_lines_and_totals() {
        let entries = vec![
            entry("web/a", PairStatus::Ok, Some("5 files, 1 written")),
            entry("ios/a", PairStatus::Failed, Some("Target 'ios': missing template")),
            entry("ios/b", PairStatus::Skipped, None),
        ];
        let lines: Vec<String> = summary_lines(&entries).iter().map(|l| strip_ansi(l)).collect();
        insta::assert_snapshot!(lines.join("\n"), @r"
        ✓ web/a (5 files, 1 written)
        ✗ ios/a (Target 'ios': missing template)
        · ios/b
        ");
        assert_eq!(strip_ansi(&totals(&entries)), "3 pairs: 1 ok, 1 skipped, 1 failed");
    }

    #[test]
    fn totals_for_a_single_pair() {
        let entries = vec![entry("web/a", PairStatus::DryRun, None)];
        assert_eq!(strip_ansi(&totals(&entries)), "1 pair: 1 dry-run");
    }

    #[test]
    fn every_level_reaches_the_log_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Processing [web] [brand#1]");
        log.debug("12 tokens resolved");
        log.warn("stale: output/web/brand#1/tokens.scss");
        log.error("[ios] [brand#1] Target 'ios': missing template");
        log.dry_run("would write output/web/brand#1/tokens.json");

        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("==> Processing [web] [brand#1]"));
        assert!(contents.contains("[debug] 12 tokens resolved"));
        assert!(contents.contains("[warn] stale: output/web/brand#1/tokens.scss"));
        assert!(contents.contains("[error] [ios] [brand#1]"));
        assert!(contents.contains("[dry run] would write output/web/brand#1/tokens.json"));
    }
}
