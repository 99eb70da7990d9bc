//! Command: build artifacts for the selected pairs.
use anyhow::Result;

use crate::build::{FileStatus, Mode};
use crate::cli::{BuildOpts, GlobalOpts};
use crate::logging::Logger;

use super::CommandSetup;

/// Run the build command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any pair fails to build.
pub fn run(global: &GlobalOpts, opts: &BuildOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, opts, log)?;
    let (mode, changed) = if global.dry_run {
        (Mode::DryRun, FileStatus::WouldWrite)
    } else {
        (Mode::Write, FileStatus::Written)
    };

    let report = setup.run_to_completion(mode, log)?;
    log.info(&format!(
        "{} of {} artifact(s) changed",
        report.with_status(changed).count(),
        report.files.len()
    ));
    Ok(())
}
