//! Command: verify that generated artifacts are up to date.
use anyhow::Result;

use crate::build::Mode;
use crate::cli::{BuildOpts, GlobalOpts};
use crate::logging::Logger;

use super::CommandSetup;

/// Run the check command. Nothing is written, `--dry-run` or not.
///
/// # Errors
///
/// Returns an error if configuration loading fails, a pair fails to render,
/// or any artifact on disk is missing or stale.
pub fn run(global: &GlobalOpts, opts: &BuildOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, opts, log)?;
    let report = setup.run_to_completion(Mode::Check, log)?;
    log.info(&format!("{} artifact(s) up to date", report.files.len()));
    Ok(())
}
