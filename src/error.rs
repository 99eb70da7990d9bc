//! Domain-specific error types for the token compiler.
//!
//! Pipeline stages return typed errors ([`TokenError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! BuildError
//! ├── Config(ConfigError)       : tokens.toml parsing and validation
//! ├── Token(TokenError)         : loading and alias resolution
//! └── Target { target, source } : transforms and rendering of one target
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for one pipeline run.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Configuration-related error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Token pipeline error.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A pipeline error raised while building one target.
    #[error("Target '{target}': {source}")]
    Target {
        /// Target name.
        target: String,
        /// Underlying pipeline failure.
        #[source]
        source: TokenError,
    },
}

/// Errors raised by the token pipeline stages.
#[derive(Error, Debug)]
pub enum TokenError {
    /// A source document is not valid JSON or violates the token schema.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Document that failed to parse.
        path: PathBuf,
        /// Human-readable reason.
        message: String,
    },

    /// Two documents define the same path with different content.
    #[error("Duplicate token '{path}' defined in {first} and {second}")]
    DuplicateToken {
        /// Dotted token path.
        path: String,
        /// Document that defined the path first.
        first: PathBuf,
        /// Document that redefined it.
        second: PathBuf,
    },

    /// An alias names a path with no token.
    #[error("Token '{token}' references unknown token '{reference}'")]
    UnresolvedReference {
        /// Token holding the reference.
        token: String,
        /// The reference that could not be found.
        reference: String,
    },

    /// Alias resolution revisited a path already on the resolution stack.
    #[error("Cyclic reference: {}", chain.join(" -> "))]
    CyclicReference {
        /// Paths in resolution order, ending with the repeated path.
        chain: Vec<String>,
    },

    /// Substituting embedded references produced new reference syntax.
    #[error("Token '{token}' resolves to '{value}', which still contains a reference")]
    ResidualReference {
        /// Token holding the reference.
        token: String,
        /// Value after substitution.
        value: String,
    },

    /// No formatter is registered under the requested name.
    #[error("Unknown format '{0}'")]
    UnknownFormat(String),

    /// No transform is registered under the requested name.
    #[error("Unknown transform '{0}'")]
    UnknownTransform(String),

    /// No transform group is registered under the requested name.
    #[error("Unknown transform group '{0}'")]
    UnknownTransformGroup(String),

    /// A template file is missing or its markers are malformed.
    #[error("Template error in {template}: {message}")]
    TemplateRender {
        /// Template file name.
        template: String,
        /// Human-readable reason.
        message: String,
    },

    /// A transform produced an invalid value.
    #[error("Transform '{transform}' failed on '{token}': {message}")]
    Transform {
        /// Transform name.
        transform: String,
        /// Dotted token path.
        token: String,
        /// Human-readable reason.
        message: String,
    },

    /// A source glob pattern is malformed.
    #[error("Invalid source pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Human-readable reason.
        message: String,
    },

    /// An I/O error occurred while reading sources or writing outputs.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl TokenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that arise from loading and validating `tokens.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// File that failed to parse.
        file: String,
        /// Parser message.
        message: String,
    },

    /// A platform name has no entry in `platform_targets`.
    #[error("Unknown platform '{0}'")]
    UnknownPlatform(String),

    /// A requested brand is not configured.
    #[error("Unknown brand '{0}'")]
    UnknownBrand(String),

    /// A custom transform group lists an unknown transform.
    #[error("Transform group '{group}': {source}")]
    TransformGroup {
        /// Group name.
        group: String,
        /// Underlying lookup failure.
        #[source]
        source: TokenError,
    },

    /// A platform maps to a target name that is not defined.
    #[error("Platform '{platform}' refers to undefined target '{target}'")]
    UnknownTarget {
        /// Platform name.
        platform: String,
        /// Missing target name.
        target: String,
    },

    /// A platform maps to no targets at all.
    #[error("Platform '{0}' has no targets")]
    EmptyPlatform(String),

    /// Two file specs of the same build would write the same path.
    #[error("Output collision on '{path}' between targets '{first}' and '{second}'")]
    OutputCollision {
        /// Colliding output path (uninterpolated).
        path: String,
        /// First target writing the path.
        first: String,
        /// Second target writing the path.
        second: String,
    },

    /// A target, transform or format name failed to resolve.
    #[error("Target '{target}': {source}")]
    Target {
        /// Target name.
        target: String,
        /// Underlying lookup failure.
        #[source]
        source: TokenError,
    },
}
