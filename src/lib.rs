//! Multi-platform design token compiler.
//!
//! Reads brand-specific and global token documents, resolves aliases between
//! them, and emits one set of artifacts per (platform, brand) pair: SCSS,
//! JavaScript and JSON for the web, plists for iOS, resource XML for Android
//! and Dart classes for Flutter.
//!
//! The pipeline is organised into layers:
//!
//! - **[`tokens`]**: load JSON documents into a tree and resolve `{a.b}` aliases
//! - **[`transforms`]**: rewrite names and values per platform
//! - **[`formats`]**: render token lists to text, natively or through templates
//! - **[`config`]**: `tokens.toml` layered over built-in defaults
//! - **[`build`]**: drive every pair through the pipeline and commit artifacts
//! - **[`commands`]**: top-level subcommand orchestration (`build`, `check`, `list`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod build;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formats;
pub mod logging;
pub mod tokens;
pub mod transforms;
