// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Durable user directory.
//!
//! The full record set lives in one JSON document. A missing document is
//! seeded with a single administrator record; an unreadable or unparsable
//! document is healed the same way, trading the corrupt data for
//! availability instead of raising to the caller.

use tracing::warn;

use crate::models::{AccountClass, StoredUser, Tier};

use super::{LocalStore, StoreResult};

/// Durable mapping from user identifier/email to [`StoredUser`].
///
/// Callers own the store's lifetime; there is no global instance and no
/// implicit teardown. `load()`/`persist()` form a read-modify-write pair
/// with no isolation: a loaded snapshot may be stale by the time the
/// matching persist runs, and the later persist wins.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    store: LocalStore,
}

impl DirectoryStore {
    /// Create a directory store over an opened document store.
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The seeded administrator record present in every fresh directory.
    pub fn seed_admin() -> StoredUser {
        StoredUser {
            id: "ds_admin_01".to_string(),
            email: "admin@go-service.pl".into(),
            credential_secret: "admin".to_string(),
            display_name: "System Administrator".to_string(),
            avatar_ref: avatar_ref_for("admin"),
            directory_id: "DS-ADM-0001".to_string(),
            account_class: AccountClass::Business,
            storage_quota: 10240,
            storage_consumed: 50,
            tier: Tier::Paranoia,
            agreement_accepted: true,
        }
    }

    /// Load the current record set.
    ///
    /// Never returns an empty set: an absent document seeds the
    /// administrator record and persists it, and a corrupt document falls
    /// back to the seeded state without overwriting what is on disk.
    pub fn load(&self) -> StoreResult<Vec<StoredUser>> {
        let path = self.store.paths().users_file();

        if !self.store.exists(&path) {
            let initial = vec![Self::seed_admin()];
            self.store.write_json(&path, &initial)?;
            return Ok(initial);
        }

        match self.store.read_json::<Vec<StoredUser>>(&path) {
            Ok(records) if !records.is_empty() => Ok(records),
            Ok(_) => {
                warn!("user directory document was empty, falling back to seed state");
                Ok(vec![Self::seed_admin()])
            }
            Err(err) => {
                warn!(%err, "user directory document unreadable, falling back to seed state");
                Ok(vec![Self::seed_admin()])
            }
        }
    }

    /// Atomically overwrite the durable record set.
    pub fn persist(&self, records: &[StoredUser]) -> StoreResult<()> {
        self.store
            .write_json(self.store.paths().users_file(), &records)
    }
}

/// Avatar reference scheme used for generated accounts.
pub fn avatar_ref_for(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/bottts-neutral/svg?seed={seed}")
}
