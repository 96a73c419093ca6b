// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Session vault repository.
//!
//! The vault is the session's working collection of items destined for
//! bundling. It lives in its own namespace, separate from the user
//! directory, and has no server-side counterpart.

use tracing::warn;

use crate::models::VaultItem;

use super::{LocalStore, StoreError, StoreResult};

/// Repository for the session's collected-item list.
#[derive(Debug, Clone)]
pub struct VaultRepository {
    store: LocalStore,
}

impl VaultRepository {
    /// Create a vault repository over an opened document store.
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// List all collected items, newest first.
    ///
    /// An absent or unreadable document is an empty vault.
    pub fn list(&self) -> Vec<VaultItem> {
        let path = self.store.paths().vault_file();
        if !self.store.exists(&path) {
            return Vec::new();
        }
        match self.store.read_json(&path) {
            Ok(items) => items,
            Err(err) => {
                warn!(%err, "vault document unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Add an item to the front of the vault.
    pub fn add(&self, item: VaultItem) -> StoreResult<Vec<VaultItem>> {
        let mut items = self.list();
        items.insert(0, item);
        self.persist(&items)?;
        Ok(items)
    }

    /// Remove one item by id.
    pub fn remove(&self, item_id: &str) -> StoreResult<Vec<VaultItem>> {
        let mut items = self.list();
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Err(StoreError::NotFound(format!("Vault item {item_id}")));
        }
        self.persist(&items)?;
        Ok(items)
    }

    /// Drop every item.
    pub fn clear(&self) -> StoreResult<()> {
        self.persist(&[])
    }

    fn persist(&self, items: &[VaultItem]) -> StoreResult<()> {
        self.store
            .write_json(self.store.paths().vault_file(), &items)
    }
}
