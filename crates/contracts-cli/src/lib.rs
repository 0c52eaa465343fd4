//! # contracts-cli — Batch Contract Validation
//!
//! Provides the `validate-contracts` command: every example document under
//! `contracts/examples` is validated against the schema in
//! `contracts/schemas` whose name appears in the example's file name.
//!
//! ```bash
//! validate-contracts
//! validate-contracts --schemas path/to/schemas --examples path/to/examples -v
//! ```
//!
//! Output is one `[OK]` or `[FAIL]` line per example, followed by an
//! indented line per violation. The exit code is 0 only if every example
//! passed.

pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to the working root.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
