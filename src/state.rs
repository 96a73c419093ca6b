// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Application state: the explicitly constructed composition root.
//!
//! Every store and service is built here from a data-dir path and a
//! resolver; nothing is a global singleton and nothing tears itself down.
//! The session-level helpers enforce the preconditions the bundler itself
//! assumes (agreement accepted, non-empty vault).

use std::sync::Arc;

use crate::config::RECOVERY_CODE;
use crate::deploy::DeploymentBundler;
use crate::error::DeployError;
use crate::identity::IdentityService;
use crate::models::{DeploymentDescriptor, ResolvedItem, UserRecord, VaultItem};
use crate::search::{ContentResolver, ResultCache, SearchService};
use crate::storage::{DirectoryStore, LocalStore, StoragePaths, StoreResult, VaultRepository};

/// One tab's worth of application state.
#[derive(Clone)]
pub struct AppState {
    /// Authentication and profile operations.
    pub identity: IdentityService,
    /// The session's collected items.
    pub vault: VaultRepository,
    /// Cache-fronted search.
    pub search: Arc<SearchService>,
    /// Archive assembly.
    pub bundler: DeploymentBundler,
}

impl AppState {
    /// Build the full state over one data directory and a resolver.
    pub fn new(paths: StoragePaths, resolver: Arc<dyn ContentResolver>) -> StoreResult<Self> {
        let store = LocalStore::open(paths)?;
        let identity = IdentityService::new(DirectoryStore::new(store.clone()));
        let vault = VaultRepository::new(store);
        let search = Arc::new(SearchService::new(ResultCache::with_defaults(), resolver));
        let bundler = DeploymentBundler::new(identity.clone());

        Ok(Self {
            identity,
            vault,
            search,
            bundler,
        })
    }

    /// Whether a recovery code passes the out-of-band verification step.
    ///
    /// This is the fixed-code check the UI performs before it may call
    /// `reset_credential`.
    pub fn verify_recovery_code(code: &str) -> bool {
        code == RECOVERY_CODE
    }

    /// Collect a search result into the vault and charge storage for it.
    ///
    /// Requires an accepted agreement, like every collection action in the
    /// UI. Returns the updated vault and the user with refreshed usage.
    pub async fn collect(
        &self,
        user: &UserRecord,
        result: &ResolvedItem,
    ) -> Result<(Vec<VaultItem>, UserRecord), DeployError> {
        if !user.agreement_accepted {
            return Err(DeployError::AgreementRequired);
        }

        let items = self.vault.add(VaultItem::from_resolved(result))?;
        let updated = self.bundler.sync_storage_usage(user, 1).await?;
        Ok((items, updated))
    }

    /// Bundle the current vault for the given user.
    ///
    /// Enforces the bundler's preconditions, derives the package name from
    /// the user's directory id, and hands off to the bundler.
    pub async fn deploy_vault(
        &self,
        user: &UserRecord,
    ) -> Result<(Vec<u8>, DeploymentDescriptor), DeployError> {
        if !user.agreement_accepted {
            return Err(DeployError::AgreementRequired);
        }

        let items = self.vault.list();
        if items.is_empty() {
            return Err(DeployError::NothingToDeploy);
        }

        let package_name = format!("DriveSearch_App_{}", user.directory_id.replace('-', "_"));
        self.bundler.deploy(user, &package_name, &items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountClass, InterpretedQuery, LinkAnalysis, UserUpdate};
    use crate::search::ResolverError;
    use async_trait::async_trait;
    use tempfile::tempdir;

    struct CannedResolver;

    #[async_trait]
    impl ContentResolver for CannedResolver {
        async fn interpret(&self, text: &str) -> Result<InterpretedQuery, ResolverError> {
            Ok(InterpretedQuery {
                keywords: vec![text.to_string()],
                intent: "General".to_string(),
                priority: 1,
            })
        }

        async fn resolve(&self, text: &str) -> Result<Vec<ResolvedItem>, ResolverError> {
            Ok(vec![ResolvedItem {
                id: "node_canned".to_string(),
                title: format!("Result for {text}"),
                url: "https://example.com".to_string(),
                snippet: "Data node identified.".to_string(),
                source_label: "Global Distributed Node".to_string(),
                content_type: "text/html".to_string(),
            }])
        }

        async fn analyze_link(&self, _url: &str) -> Result<LinkAnalysis, ResolverError> {
            Ok(LinkAnalysis {
                title: "Canned".to_string(),
                snippet: "Canned summary.".to_string(),
            })
        }
    }

    fn test_state(root: &std::path::Path) -> AppState {
        AppState::new(StoragePaths::new(root), Arc::new(CannedResolver)).unwrap()
    }

    #[test]
    fn recovery_code_check_matches_fixed_code() {
        assert!(AppState::verify_recovery_code("123456"));
        assert!(!AppState::verify_recovery_code("000000"));
    }

    #[tokio::test]
    async fn collect_requires_accepted_agreement() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        let user = state
            .identity
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();
        let result = &state.search.resolve("query").await.unwrap()[0];

        let err = state.collect(&user, result).await.unwrap_err();
        assert!(matches!(err, DeployError::AgreementRequired));
        assert!(state.vault.list().is_empty());
    }

    #[tokio::test]
    async fn deploy_requires_a_non_empty_vault() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        let user = state
            .identity
            .authenticate("admin@go-service.pl", "admin")
            .await
            .unwrap();

        let err = state.deploy_vault(&user).await.unwrap_err();
        assert!(matches!(err, DeployError::NothingToDeploy));
    }

    #[tokio::test]
    async fn register_collect_deploy_end_to_end() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        let user = state
            .identity
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap();
        let user = state
            .identity
            .update(
                &user.id,
                UserUpdate {
                    agreement_accepted: Some(true),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();

        let results = state.search.search("rust archive tools").await.unwrap();
        let (items, user) = state.collect(&user, &results[0]).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            user.storage_consumed,
            crate::config::STORAGE_COST_PER_ITEM_MB
        );

        let (bytes, descriptor) = state.deploy_vault(&user).await.unwrap();
        assert!(!bytes.is_empty());
        assert!(descriptor.success);
        assert_eq!(descriptor.status, "LIVE");
        let expected_package = format!("DriveSearch_App_{}", user.directory_id.replace('-', "_"));
        assert!(!expected_package.contains('-'));
    }
}
