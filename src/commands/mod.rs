//! Subcommand handlers and the setup they share.
pub mod build;
pub mod check;
pub mod list;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;

use crate::build::{Builder, Mode, RunReport};
use crate::cli::{BuildOpts, GlobalOpts};
use crate::config::{Config, Pair};
use crate::logging::Logger;

/// Environment variable naming the project root when `--root` is absent.
pub const ROOT_ENV: &str = "TOKENS_ROOT";

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root resolution, configuration loading and pair selection so
/// that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Validated project configuration.
    pub config: Config,
    /// Selected pairs, platforms outermost.
    pub pairs: Vec<Pair>,
}

impl CommandSetup {
    /// Resolve the project root, load the configuration and select pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be determined, the configuration
    /// fails to load or validate, or the selection names an unknown brand or
    /// platform.
    pub fn init(global: &GlobalOpts, opts: &BuildOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("{} transform groups", config.registry.group_names().count()));
        log.info(&format!(
            "{} brands, {} platforms, {} targets",
            config.brands.len(),
            config.platforms.len(),
            config.targets.len()
        ));

        if !config.warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                config.warnings.len()
            ));
            for warning in &config.warnings {
                log.warn(&format!("  {warning}"));
            }
        }

        let pairs = config.pairs(&opts.platforms, &opts.brands)?;
        Ok(Self { config, pairs })
    }

    /// Run the builder over every selected pair, print the summary, and bail
    /// if any pair failed.
    ///
    /// # Errors
    ///
    /// Returns an error if one or more pairs recorded a failure.
    pub fn run_to_completion(&self, mode: Mode, log: &Logger) -> Result<RunReport> {
        let report = Builder::new(&self.config, mode).run(&self.pairs, log);

        log.print_summary();

        let count = log.failure_count();
        if count > 0 {
            anyhow::bail!("{count} build(s) failed: {}", report.failed.join(", "));
        }
        Ok(report)
    }
}

/// Resolve the project root from `--root`, `$TOKENS_ROOT` or the current
/// directory, in that order.
///
/// # Errors
///
/// Returns an error if the chosen directory does not exist.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = global
        .root
        .clone()
        .or_else(|| std::env::var_os(ROOT_ENV).map(PathBuf::from))
        .map_or_else(std::env::current_dir, Ok)?;

    if !root.is_dir() {
        anyhow::bail!(
            "project root {} is not a directory. Use --root or set {ROOT_ENV}",
            root.display()
        );
    }
    Ok(root)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resolve_root_uses_explicit_root() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            root: Some(dir.path().to_path_buf()),
            dry_run: false,
        };
        assert_eq!(resolve_root(&global).unwrap(), dir.path());
    }

    #[test]
    fn resolve_root_rejects_missing_directory() {
        let global = GlobalOpts {
            root: Some(PathBuf::from("/nonexistent/design-system")),
            dry_run: false,
        };
        let err = resolve_root(&global).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn setup_rejects_unknown_brand() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            root: Some(dir.path().to_path_buf()),
            dry_run: false,
        };
        let opts = BuildOpts {
            brands: vec!["brand#9".to_string()],
            platforms: Vec::new(),
        };
        let (log, _tmp, _guard) = crate::logging::isolated_logger();
        let err = CommandSetup::init(&global, &opts, &log).unwrap_err();
        assert!(err.to_string().contains("brand#9"), "{err}");
    }

    #[test]
    fn setup_selects_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            root: Some(dir.path().to_path_buf()),
            dry_run: false,
        };
        let opts = BuildOpts {
            brands: vec!["brand#2".to_string()],
            platforms: vec!["web".to_string(), "android".to_string()],
        };
        let (log, _tmp, _guard) = crate::logging::isolated_logger();
        let setup = CommandSetup::init(&global, &opts, &log).unwrap();
        let names: Vec<String> = setup.pairs.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["web/brand#2", "android/brand#2"]);
    }
}
