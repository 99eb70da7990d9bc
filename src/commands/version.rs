//! Command: print version information.

/// Version string, overridable at build time through `TOKENS_VERSION`.
#[must_use]
pub fn version() -> &'static str {
    option_env!("TOKENS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the tokens version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("tokens {}", version());
}
