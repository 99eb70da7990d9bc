// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed token project and a fluent builder so
// each integration test can set up an isolated project without repeating
// filesystem boilerplate.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tokens_cli::cli::{BuildOpts, GlobalOpts};
use tokens_cli::config::Config;
use tokens_cli::logging::Logger;

/// The placeholder-only templates every template-backed format needs.
const TEMPLATES: &[(&str, &str)] = &[
    (
        "ios-plist.template",
        "<dict>\n{{#each tokens}}\n<key>{{name}}</key><{{kind}}>{{literal}}</{{kind}}>\n{{/each}}\n</dict>\n",
    ),
    (
        "android-xml.template",
        "<resources>\n{{#each tokens}}\n<{{kind}} name=\"{{name}}\">{{literal}}</{{kind}}>\n{{/each}}\n</resources>\n",
    ),
    (
        "class-dart.template",
        "class {{class_name}} {\n{{#each tokens}}\n  static const {{kind}} {{name}} = {{literal}};\n{{/each}}\n}\n",
    ),
    (
        "dimensions-dart.template",
        "class {{class_name}} {\n{{#each tokens}}\n  static const double {{name}} = {{literal}};\n{{/each}}\n}\n",
    ),
    (
        "radii-dart.template",
        "class {{class_name}} {\n{{#each tokens}}\n  static const Radius {{name}} = Radius.circular({{literal}});\n{{/each}}\n}\n",
    ),
    (
        "text-styles-dart.template",
        "class {{class_name}} {\n{{#each tokens}}\n  static const {{kind}} {{name}} = {{literal}};\n{{/each}}\n}\n",
    ),
];

/// An isolated token project backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory containing the project.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of a project-relative file.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Read a generated artifact.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    /// Load the project configuration.
    pub fn load_config(&self) -> Config {
        Config::load(self.root.path()).expect("load config")
    }

    /// Global options pointing at this project.
    pub fn global(&self, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            root: Some(self.root.path().to_path_buf()),
        }
    }
}

/// Pair selection for `brands` and `platforms`; empty means all.
pub fn select(brands: &[&str], platforms: &[&str]) -> BuildOpts {
    BuildOpts {
        brands: brands.iter().map(ToString::to_string).collect(),
        platforms: platforms.iter().map(ToString::to_string).collect(),
    }
}

/// A logger whose summary is printed to the test output.
pub fn logger(command: &str) -> Logger {
    Logger::new(command)
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building an empty project.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext {
                root: tempfile::tempdir().expect("create temp dir"),
            },
        }
    }

    /// Write `content` to a project-relative path, creating directories.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write project file");
        self
    }

    /// Write `tokens.toml`.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("tokens.toml", content)
    }

    /// Write a brand token document.
    pub fn with_brand_tokens(self, brand: &str, file: &str, content: &str) -> Self {
        self.with_file(&format!("tokens/brands/{brand}/{file}"), content)
    }

    /// Write a global token document.
    pub fn with_global_tokens(self, file: &str, content: &str) -> Self {
        self.with_file(&format!("tokens/globals/{file}"), content)
    }

    /// Install minimal templates for every template-backed format.
    pub fn with_templates(mut self) -> Self {
        for (name, content) in TEMPLATES {
            self = self.with_file(&format!("templates/{name}"), content);
        }
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
