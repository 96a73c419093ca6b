// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Path constants and utilities for the persisted storage layout.

use std::path::{Path, PathBuf};

use crate::config::DEFAULT_DATA_DIR;

/// Storage path utilities for the data directory.
///
/// Two independent namespaces live under the root: the user directory and
/// the session's vault list. Each namespace is one JSON document.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the user directory document.
    pub fn users_file(&self) -> PathBuf {
        self.root.join("users.json")
    }

    /// Path to the session vault document.
    pub fn vault_file(&self) -> PathBuf {
        self.root.join("vault.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("./data"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.users_file(), PathBuf::from("/tmp/test-data/users.json"));
        assert_eq!(paths.vault_file(), PathBuf::from("/tmp/test-data/vault.json"));
    }
}
