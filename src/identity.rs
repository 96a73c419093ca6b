// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Identity service: registration, authentication and profile updates over
//! the durable user directory.
//!
//! Every operation is a load-then-persist read-modify-write against the
//! directory store. There is no locking; a single logical caller is
//! assumed, and when two logically concurrent updates interleave the later
//! persist wins.
//!
//! Secrets are stored and compared in plaintext. Known security defect:
//! nothing here hashes or salts credentials before they hit disk.

use std::time::Duration;

use tracing::info;

use crate::error::IdentityError;
use crate::models::{short_token, short_token_upper, AccountClass, Email, StoredUser, Tier, UserRecord, UserUpdate};
use crate::storage::directory::avatar_ref_for;
use crate::storage::DirectoryStore;

/// Authentication and profile operations over the [`DirectoryStore`].
///
/// The store is passed in at construction; the service owns no global
/// state.
#[derive(Debug, Clone)]
pub struct IdentityService {
    directory: DirectoryStore,
    simulated_latency: Option<Duration>,
}

impl IdentityService {
    /// Create a new identity service over the given directory store.
    pub fn new(directory: DirectoryStore) -> Self {
        Self {
            directory,
            simulated_latency: None,
        }
    }

    /// Add an artificial minimum latency to every operation.
    ///
    /// The source system delayed each directory call by 200-1000 ms to feel
    /// like a remote API. Operation order as seen by a single caller is the
    /// same with or without the delay.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    /// Register a new account.
    ///
    /// Fails with [`IdentityError::DuplicateEmail`] when an existing
    /// record's email matches case-insensitively.
    pub async fn register(
        &self,
        name: &str,
        email: impl Into<Email>,
        secret: &str,
        account_class: AccountClass,
    ) -> Result<UserRecord, IdentityError> {
        self.pause().await;
        let email = email.into();
        let mut records = self.directory.load()?;

        if records.iter().any(|record| record.email.matches(&email.0)) {
            return Err(IdentityError::DuplicateEmail);
        }

        let user = StoredUser {
            id: format!("ds_{}", short_token(9)),
            email,
            credential_secret: secret.to_string(),
            display_name: name.to_string(),
            avatar_ref: avatar_ref_for(name),
            directory_id: format!("DS-DIR-{}", short_token_upper(4)),
            account_class,
            storage_quota: crate::config::DEFAULT_STORAGE_QUOTA_MB,
            storage_consumed: 0,
            tier: Tier::Standard,
            agreement_accepted: false,
        };

        records.push(user.clone());
        self.directory.persist(&records)?;

        info!(user_id = %user.id, directory_id = %user.directory_id, "registered new account");
        Ok(user.into())
    }

    /// Authenticate with email and secret.
    ///
    /// Fails with [`IdentityError::NoSuchAccount`] when no record matches
    /// the email, and [`IdentityError::InvalidCredential`] when the record
    /// exists but the secret differs. The returned record never contains
    /// the secret.
    pub async fn authenticate(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<UserRecord, IdentityError> {
        self.pause().await;
        let records = self.directory.load()?;

        let user = records
            .into_iter()
            .find(|record| record.email.matches(email))
            .ok_or(IdentityError::NoSuchAccount)?;

        if user.credential_secret != secret {
            return Err(IdentityError::InvalidCredential);
        }

        info!(user_id = %user.id, "authenticated");
        Ok(user.into())
    }

    /// Find the full record for an email, secret included.
    ///
    /// Drives the register-vs-login decision; must not be exposed to the
    /// UI with the secret intact.
    pub(crate) fn lookup_by_email(&self, email: &str) -> Result<Option<StoredUser>, IdentityError> {
        let records = self.directory.load()?;
        Ok(records.into_iter().find(|record| record.email.matches(email)))
    }

    /// Merge the given fields onto an existing record and persist.
    ///
    /// Shallow merge: a provided field always replaces the stored value.
    /// Fails with [`IdentityError::NotFound`] when no record matches.
    pub async fn update(
        &self,
        user_id: &str,
        updates: UserUpdate,
    ) -> Result<UserRecord, IdentityError> {
        self.pause().await;
        let mut records = self.directory.load()?;

        let user = records
            .iter_mut()
            .find(|record| record.id == user_id)
            .ok_or_else(|| IdentityError::NotFound(user_id.to_string()))?;

        if let Some(display_name) = updates.display_name {
            user.display_name = display_name;
        }
        if let Some(avatar_ref) = updates.avatar_ref {
            user.avatar_ref = avatar_ref;
        }
        if let Some(secret) = updates.credential_secret {
            user.credential_secret = secret;
        }
        if let Some(tier) = updates.tier {
            user.tier = tier;
        }
        if let Some(storage_consumed) = updates.storage_consumed {
            user.storage_consumed = storage_consumed;
        }
        if let Some(agreement_accepted) = updates.agreement_accepted {
            user.agreement_accepted = agreement_accepted;
        }

        let updated = user.clone();
        self.directory.persist(&records)?;
        Ok(updated.into())
    }

    /// Set a new secret for the account with the given email.
    ///
    /// Assumes the caller already passed the out-of-band verification step
    /// (the fixed recovery code); no verification happens here. Fails with
    /// [`IdentityError::NotFound`] when no such account exists.
    pub async fn reset_credential(
        &self,
        email: &str,
        new_secret: &str,
    ) -> Result<UserRecord, IdentityError> {
        self.pause().await;
        let user = self
            .lookup_by_email(email)?
            .ok_or_else(|| IdentityError::NotFound(email.to_string()))?;

        self.update(
            &user.id,
            UserUpdate {
                credential_secret: Some(new_secret.to_string()),
                ..UserUpdate::default()
            },
        )
        .await
    }

    async fn pause(&self) {
        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStore, StoragePaths};
    use tempfile::tempdir;

    fn test_service(root: &std::path::Path) -> IdentityService {
        let store = LocalStore::open(StoragePaths::new(root)).unwrap();
        IdentityService::new(DirectoryStore::new(store))
    }

    #[tokio::test]
    async fn register_issues_fresh_identifiers() {
        let dir = tempdir().unwrap();
        let service = test_service(dir.path());

        let ana = service
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();
        let bob = service
            .register("Bob", "bob@x.io", "pw2", AccountClass::Business)
            .await
            .unwrap();

        assert!(ana.id.starts_with("ds_"));
        assert!(ana.directory_id.starts_with("DS-DIR-"));
        assert!(!ana.id.is_empty() && !ana.directory_id.is_empty());
        assert_ne!(ana.id, bob.id);
        assert_ne!(ana.directory_id, bob.directory_id);

        assert_eq!(ana.tier, Tier::Standard);
        assert_eq!(ana.storage_quota, crate::config::DEFAULT_STORAGE_QUOTA_MB);
        assert_eq!(ana.storage_consumed, 0);
        assert!(!ana.agreement_accepted);

        let found = service.lookup_by_email("ana@x.io").unwrap().unwrap();
        assert_eq!(found.id, ana.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_mutating_the_store() {
        let dir = tempdir().unwrap();
        let service = test_service(dir.path());

        service
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();

        let err = service
            .register("Imposter", "ANA@X.IO", "pw2", AccountClass::Personal)
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::DuplicateEmail));

        // Seeded admin + Ana, nothing else.
        let records = DirectoryStore::new(
            LocalStore::open(StoragePaths::new(dir.path())).unwrap(),
        )
        .load()
        .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn authenticate_matches_secret_exactly() {
        let dir = tempdir().unwrap();
        let service = test_service(dir.path());

        service
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();

        let ok = service.authenticate("ana@x.io", "pw1").await.unwrap();
        assert_eq!(ok.display_name, "Ana");
        let json = serde_json::to_string(&ok).unwrap();
        assert!(!json.contains("pw1"));

        let err = service.authenticate("ana@x.io", "wrong").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredential));

        let err = service.authenticate("nobody@x.io", "pw1").await.unwrap_err();
        assert!(matches!(err, IdentityError::NoSuchAccount));
    }

    #[tokio::test]
    async fn seeded_admin_can_authenticate() {
        let dir = tempdir().unwrap();
        let service = test_service(dir.path());

        let admin = service
            .authenticate("admin@go-service.pl", "admin")
            .await
            .unwrap();
        assert_eq!(admin.directory_id, "DS-ADM-0001");
        assert!(admin.agreement_accepted);
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let dir = tempdir().unwrap();
        let service = test_service(dir.path());

        let ana = service
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();

        let updated = service
            .update(
                &ana.id,
                UserUpdate {
                    display_name: Some("Ana Nowak".to_string()),
                    agreement_accepted: Some(true),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.display_name, "Ana Nowak");
        assert!(updated.agreement_accepted);
        // Untouched fields kept their values.
        assert_eq!(updated.email, ana.email);
        assert_eq!(updated.tier, ana.tier);

        // An empty update is a no-op merge.
        let unchanged = service.update(&ana.id, UserUpdate::default()).await.unwrap();
        assert_eq!(unchanged, updated);
    }

    #[tokio::test]
    async fn update_unknown_user_fails() {
        let dir = tempdir().unwrap();
        let service = test_service(dir.path());

        let err = service
            .update("ds_missing", UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NotFound(_)));
    }

    #[tokio::test]
    async fn reset_credential_changes_the_secret() {
        let dir = tempdir().unwrap();
        let service = test_service(dir.path());

        service
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();
        service.reset_credential("ana@x.io", "pw2").await.unwrap();

        assert!(service.authenticate("ana@x.io", "pw1").await.is_err());
        assert!(service.authenticate("ana@x.io", "pw2").await.is_ok());

        let err = service
            .reset_credential("nobody@x.io", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NotFound(_)));
    }

    #[tokio::test]
    async fn register_then_login_preserves_order_with_latency() {
        let dir = tempdir().unwrap();
        let service =
            test_service(dir.path()).with_simulated_latency(Duration::from_millis(5));

        service
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();
        // A login issued after register completes always sees the record.
        assert!(service.authenticate("ana@x.io", "pw1").await.is_ok());
    }
}
