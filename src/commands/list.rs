//! Command: show what a build would produce.
use std::fmt::Write as _;

use anyhow::Result;

use crate::cli::{BuildOpts, GlobalOpts};
use crate::config::{Config, Pair, interpolate};
use crate::logging::Logger;

use super::CommandSetup;

/// Print every selected pair with its targets and output files.
///
/// # Errors
///
/// Returns an error if configuration loading fails.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, opts: &BuildOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, opts, log)?;
    print!("{}", describe(&setup.config, &setup.pairs)?);
    Ok(())
}

/// Render the listing for `pairs`.
///
/// # Errors
///
/// Returns an error if a pair's platform has no valid targets.
pub fn describe(config: &Config, pairs: &[Pair]) -> Result<String> {
    let mut out = String::new();
    for pair in pairs {
        writeln!(out, "{pair}")?;
        for target in config.targets_for(&pair.platform)? {
            let transforms: Vec<&str> = target.transforms.iter().map(|t| t.name()).collect();
            writeln!(out, "  {} [{}]", target.name, transforms.join(", "))?;
            let dir = interpolate(&target.build_path, pair);
            for file in &target.files {
                let filtered = if file.filter.is_empty() {
                    ""
                } else {
                    " (filtered)"
                };
                writeln!(
                    out,
                    "    {}/{} ({}){filtered}",
                    dir.trim_end_matches('/'),
                    interpolate(&file.destination, pair),
                    file.format
                )?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn describe_lists_targets_and_files() {
        let config =
            Config::from_toml(Path::new("/nonexistent"), "brands = [\"acme\"]\nplatforms = [\"ios\"]\n")
                .unwrap();
        let pairs = config.pairs(&[], &[]).unwrap();
        insta::assert_snapshot!(describe(&config, &pairs).unwrap(), @r"
        ios/acme
          ios [attribute/cti, name/cti/camel, size/pxToPt]
            output/ios/acme/tokens-all.plist (ios/plist)
            output/ios/acme/tokens-colors.plist (ios/plist) (filtered)
          styleguide [attribute/cti, name/cti/kebab, size/px, color/css]
            output/styleguide/ios_acme.json (json/flat)
            output/styleguide/ios_acme.scss (scss/variables)
        ");
    }
}
