//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

/// `{A:30, B:70}` catch-all split.
pub const WEIGHTED_SPLIT: &str = r#"
[[routes]]
name = "split"
[[routes.route.weighted_clusters.clusters]]
name = "A"
weight = 30
[[routes.route.weighted_clusters.clusters]]
name = "B"
weight = 70
"#;

/// `env=prod` rule followed by a catch-all to `default`.
pub const PROD_THEN_DEFAULT: &str = r#"
[[routes]]
name = "prod"
route = { cluster = "prod" }
[[routes.match.metadata]]
name = "env"
exact = "prod"

[[routes]]
name = "fallback"
route = { cluster = "default" }
"#;

/// Overwrite `path` with `content` in one write.
pub fn write_config(path: &Path, content: &str) {
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.sync_all().unwrap();
}
