//! Build orchestration: (platform, brand) pairs through the token pipeline.
//!
//! For each pair the sources are loaded and resolved once, then every target
//! of the platform transforms the tokens, renders all of its files in memory
//! and commits them. A target whose rendering fails writes nothing; targets
//! committed before it stay on disk. A failing pair is logged and recorded,
//! and the run moves on to the next pair.
pub mod writer;

use std::path::PathBuf;

use crate::config::targets::Target;
use crate::config::{Config, Pair, interpolate};
use crate::error::{BuildError, TokenError};
use crate::formats::{RenderContext, Renderer};
use crate::logging::{Log, PairStatus};
use crate::tokens::{Token, loader, resolver};
use crate::transforms::apply_all;

use self::writer::DiskState;

/// What the builder does with rendered artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Commit changed artifacts to disk.
    Write,
    /// Report what would change without writing.
    DryRun,
    /// Compare with disk and report missing or stale artifacts.
    Check,
}

/// An artifact rendered in memory.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Absolute destination path.
    pub path: PathBuf,
    /// Full file content.
    pub content: String,
    /// Number of tokens that passed the file's filter.
    pub tokens: usize,
}

/// Outcome for one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Written to disk.
    Written,
    /// Already up to date; not touched.
    Unchanged,
    /// Would be written (dry run).
    WouldWrite,
    /// Absent on disk (check).
    Missing,
    /// Differs from disk (check).
    Stale,
}

/// Outcome for one artifact, with its path.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Destination path.
    pub path: PathBuf,
    /// What happened.
    pub status: FileStatus,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Every artifact of every successful target.
    pub files: Vec<FileReport>,
    /// Pairs that failed.
    pub failed: Vec<String>,
}

impl RunReport {
    /// Artifacts with the given status.
    pub fn with_status(&self, status: FileStatus) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(move |f| f.status == status)
    }
}

/// Drives the pipeline for a validated configuration.
#[derive(Debug)]
pub struct Builder<'a> {
    config: &'a Config,
    renderer: Renderer,
    mode: Mode,
}

impl<'a> Builder<'a> {
    /// Create a builder over `config`.
    #[must_use]
    pub fn new(config: &'a Config, mode: Mode) -> Self {
        Self {
            config,
            renderer: Renderer::new(&config.templates_dir),
            mode,
        }
    }

    /// Build every pair in order, recording one summary entry per pair.
    pub fn run(&self, pairs: &[Pair], log: &dyn Log) -> RunReport {
        let mut report = RunReport::default();

        for pair in pairs {
            let _span =
                tracing::info_span!("pair", platform = %pair.platform, brand = %pair.brand)
                    .entered();
            log.stage(&format!("Processing [{}] [{}]", pair.platform, pair.brand));
            match self.build_pair(pair, log) {
                Ok(None) => {
                    log.warn(&format!("{pair}: no source tokens"));
                    log.record_pair(&pair.to_string(), PairStatus::Skipped, Some("no tokens"));
                }
                Ok(Some(files)) => {
                    self.record_pair(pair, &files, log, &mut report);
                    report.files.extend(files);
                }
                Err(e) => {
                    log.error(&format!("[{}] [{}] {e}", pair.platform, pair.brand));
                    log.record_pair(&pair.to_string(), PairStatus::Failed, Some(&e.to_string()));
                    report.failed.push(pair.to_string());
                }
            }
        }
        report
    }

    fn record_pair(
        &self,
        pair: &Pair,
        files: &[FileReport],
        log: &dyn Log,
        report: &mut RunReport,
    ) {
        let count = |status| files.iter().filter(|f| f.status == status).count();
        let name = pair.to_string();
        match self.mode {
            Mode::Write => {
                let written = count(FileStatus::Written);
                let message = format!("{} files, {written} written", files.len());
                log.record_pair(&name, PairStatus::Ok, Some(&message));
            }
            Mode::DryRun => {
                let changed = count(FileStatus::WouldWrite);
                let message = format!("{} files, {changed} would change", files.len());
                log.record_pair(&name, PairStatus::DryRun, Some(&message));
            }
            Mode::Check => {
                let missing = count(FileStatus::Missing);
                let stale = count(FileStatus::Stale);
                if missing + stale == 0 {
                    log.record_pair(&name, PairStatus::Ok, Some("up to date"));
                } else {
                    let message = format!("{missing} missing, {stale} stale");
                    log.record_pair(&name, PairStatus::Failed, Some(&message));
                    report.failed.push(name);
                }
            }
        }
    }

    /// Build one pair. Returns `None` when the sources hold no tokens.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Token`] if loading or resolution fails, and
    /// [`BuildError::Target`] naming the first target that fails. Targets
    /// before it have already been committed.
    pub fn build_pair(
        &self,
        pair: &Pair,
        log: &dyn Log,
    ) -> Result<Option<Vec<FileReport>>, BuildError> {
        let tokens = self.load(pair, log)?;
        if tokens.is_empty() {
            return Ok(None);
        }

        let mut reports = Vec::new();
        for target in self.config.targets_for(&pair.platform)? {
            log.debug(&format!("target {}", target.name));
            let rendered =
                self.render_target(pair, target, &tokens)
                    .map_err(|source| BuildError::Target {
                        target: target.name.clone(),
                        source,
                    })?;
            for artifact in rendered {
                let status = self
                    .settle(&artifact, log)
                    .map_err(|source| BuildError::Target {
                        target: target.name.clone(),
                        source,
                    })?;
                reports.push(FileReport {
                    path: artifact.path,
                    status,
                });
            }
        }
        Ok(Some(reports))
    }

    /// Load and resolve the sources of one pair.
    ///
    /// # Errors
    ///
    /// Returns the loader or resolver error.
    pub fn load(&self, pair: &Pair, log: &dyn Log) -> Result<Vec<Token>, TokenError> {
        let patterns = self.config.sources_for(pair);
        let tree = loader::load(&self.config.root, &patterns)?;
        let tokens = resolver::resolve(&tree)?;
        log.debug(&format!("{} tokens resolved", tokens.len()));
        Ok(tokens)
    }

    /// Transform `tokens` for `target` and render all of its files.
    ///
    /// # Errors
    ///
    /// Returns the first transform or render error; nothing is written.
    pub fn render_target(
        &self,
        pair: &Pair,
        target: &Target,
        tokens: &[Token],
    ) -> Result<Vec<Rendered>, TokenError> {
        let transformed = apply_all(&target.transforms, tokens.to_vec(), target.prefix.as_deref())?;
        let dir = self.config.root.join(interpolate(&target.build_path, pair));

        target
            .files
            .iter()
            .map(|file| -> Result<Rendered, TokenError> {
                let destination = interpolate(&file.destination, pair);
                let selected = file.filter.apply(&transformed);
                let ctx = RenderContext {
                    brand: &pair.brand,
                    platform: &pair.platform,
                    target: &target.name,
                    destination: &destination,
                    class_name: file.class_name.as_deref(),
                };
                let content = self.renderer.render(file.format, &selected, &ctx)?;
                Ok(Rendered {
                    path: dir.join(&destination),
                    content,
                    tokens: selected.len(),
                })
            })
            .collect()
    }

    fn settle(&self, artifact: &Rendered, log: &dyn Log) -> Result<FileStatus, TokenError> {
        let shown = artifact
            .path
            .strip_prefix(&self.config.root)
            .unwrap_or(&artifact.path)
            .display()
            .to_string();
        let state = writer::disk_state(&artifact.path, &artifact.content);

        let status = match (self.mode, state) {
            (_, DiskState::Current) => FileStatus::Unchanged,
            (Mode::Write, _) => {
                writer::commit(&artifact.path, &artifact.content)?;
                log.info(&format!("{shown} ({} tokens)", artifact.tokens));
                FileStatus::Written
            }
            (Mode::DryRun, _) => {
                log.dry_run(&format!("would write {shown} ({} tokens)", artifact.tokens));
                FileStatus::WouldWrite
            }
            (Mode::Check, DiskState::Missing) => {
                log.warn(&format!("missing: {shown}"));
                FileStatus::Missing
            }
            (Mode::Check, DiskState::Stale) => {
                log.warn(&format!("stale: {shown}"));
                FileStatus::Stale
            }
        };
        if status == FileStatus::Unchanged {
            log.debug(&format!("unchanged: {shown}"));
        }
        Ok(status)
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records summary entries and swallows output.
    #[derive(Debug, Default)]
    struct RecordingLog {
        pairs: Mutex<Vec<(String, PairStatus)>>,
    }

    impl Log for RecordingLog {
        fn stage(&self, _msg: &str) {}
        fn info(&self, _msg: &str) {}
        fn debug(&self, _msg: &str) {}
        fn warn(&self, _msg: &str) {}
        fn error(&self, _msg: &str) {}
        fn dry_run(&self, _msg: &str) {}
        fn record_pair(&self, pair: &str, status: PairStatus, _detail: Option<&str>) {
            self.pairs.lock().unwrap().push((pair.to_string(), status));
        }
    }

    fn project(config: &str, files: &[(&str, &str)]) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, content).unwrap();
        }
        let config = Config::from_toml(dir.path(), config).unwrap();
        (dir, config)
    }

    const WEB_ONLY: &str = "brands = [\"acme\"]\nplatforms = [\"web\"]\n";

    #[test]
    fn web_pair_writes_all_web_artifacts() {
        let (dir, config) = project(
            WEB_ONLY,
            &[(
                "tokens/brands/acme/color.json",
                r##"{ "color": { "brand": { "value": "#336699" } } }"##,
            )],
        );
        let log = RecordingLog::default();
        let report = Builder::new(&config, Mode::Write).run(&config.pairs(&[], &[]).unwrap(), &log);

        assert!(report.failed.is_empty());
        for file in [
            "output/web/acme/tokens.es6.js",
            "output/web/acme/tokens.json",
            "output/web/acme/tokens.scss",
            "output/styleguide/web_acme.json",
            "output/styleguide/web_acme.scss",
        ] {
            assert!(dir.path().join(file).is_file(), "{file} not written");
        }
        let recorded = log.pairs.lock().unwrap();
        assert_eq!(recorded[0], ("web/acme".to_string(), PairStatus::Ok));
    }

    #[test]
    fn failing_target_writes_nothing_and_run_continues() {
        let (dir, config) = project(
            "brands = [\"a\", \"b\"]\nplatforms = [\"ios\"]\n",
            &[
                ("tokens/brands/a/c.json", r##"{ "color": { "x": "#fff" } }"##),
                ("tokens/brands/b/c.json", r##"{ "color": { "x": "{color.y}" } }"##),
            ],
        );
        let log = RecordingLog::default();
        let report = Builder::new(&config, Mode::Write).run(&config.pairs(&[], &[]).unwrap(), &log);

        // ios-plist.template is missing: the ios target of pair a fails before
        // writing, b fails on its unresolved alias.
        assert_eq!(report.failed, vec!["ios/a", "ios/b"]);
        assert!(!dir.path().join("output/ios/a/tokens-all.plist").exists());
        assert!(!dir.path().join("output/styleguide/ios_a.json").exists());
        let recorded = log.pairs.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|(_, s)| *s == PairStatus::Failed));
    }

    #[test]
    fn empty_sources_are_not_applicable() {
        let (_dir, config) = project(WEB_ONLY, &[]);
        let log = RecordingLog::default();
        let report = Builder::new(&config, Mode::Write).run(&config.pairs(&[], &[]).unwrap(), &log);
        assert!(report.failed.is_empty());
        assert!(report.files.is_empty());
        assert_eq!(log.pairs.lock().unwrap()[0].1, PairStatus::Skipped);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (dir, config) = project(
            WEB_ONLY,
            &[("tokens/globals/size.json", r#"{ "size": { "small": 4 } }"#)],
        );
        let log = RecordingLog::default();
        let report =
            Builder::new(&config, Mode::DryRun).run(&config.pairs(&[], &[]).unwrap(), &log);
        assert_eq!(report.with_status(FileStatus::WouldWrite).count(), 5);
        assert!(!dir.path().join("output").exists());
        assert_eq!(log.pairs.lock().unwrap()[0].1, PairStatus::DryRun);
    }

    #[test]
    fn filters_apply_after_transforms() {
        let (_dir, config) = project(
            r#"
            brands = ["acme"]
            platforms = ["web"]

            [platform_targets]
            web = ["web/colors"]

            [targets."web/colors"]
            transform_group = "tokens-json"
            build_path = "out/"

            [[targets."web/colors".files]]
            destination = "colors.json"
            format = "json/flat"
            filter = [{ field = "attributes.category", value = "color" }]
            "#,
            &[(
                "tokens/globals/all.json",
                r##"{ "color": { "a": "#000" }, "size": { "b": 2 } }"##,
            )],
        );
        let builder = Builder::new(&config, Mode::Write);
        let pairs = config.pairs(&[], &[]).unwrap();
        let pair = &pairs[0];
        let tokens = builder.load(pair, &RecordingLog::default()).unwrap();
        let target = config.targets_for("web").unwrap()[0];
        let rendered = builder.render_target(pair, target, &tokens).unwrap();
        assert_eq!(rendered[0].tokens, 1);
        assert!(rendered[0].content.contains("\"color\""));
        assert!(!rendered[0].content.contains("\"size\""));
    }
}
