// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! # Deployment Module
//!
//! Transforms an identity plus a list of vault items into one downloadable
//! archive and a [`DeploymentDescriptor`]. Any failed step aborts the whole
//! operation; a partial archive is never returned.

pub mod archive;
pub mod artifacts;

use tracing::info;

use crate::config::{DISTRIBUTION_HOST, STORAGE_COST_PER_ITEM_MB};
use crate::error::DeployError;
use crate::identity::IdentityService;
use crate::models::{short_token, short_token_upper, DeploymentDescriptor, UserRecord, UserUpdate, VaultItem};

use archive::ArchiveBuilder;
use artifacts::{control_panel, install_script, manifest, BundleMetadata};

/// Fixed payload of the placeholder binary shipped in every bundle.
const BINARY_PLACEHOLDER: &[u8] = b"BINARY_PLACEHOLDER";

/// Assembles vault items plus generated artifacts into one exportable
/// archive.
///
/// Holds the identity service only for storage-usage accounting; bundling
/// itself persists nothing.
#[derive(Debug, Clone)]
pub struct DeploymentBundler {
    identity: IdentityService,
}

impl DeploymentBundler {
    /// Create a bundler over the given identity service.
    pub fn new(identity: IdentityService) -> Self {
        Self { identity }
    }

    /// Build the distributable archive for a user's collected items.
    ///
    /// Assumes the caller verified that the user accepted the agreement and
    /// that `items` is non-empty; preconditions are enforced one level up,
    /// at the session boundary.
    ///
    /// Returns the archive bytes and the descriptor for the current UI
    /// turn. The manifest lists items in input order.
    pub async fn deploy(
        &self,
        user: &UserRecord,
        package_name: &str,
        items: &[VaultItem],
    ) -> Result<(Vec<u8>, DeploymentDescriptor), DeployError> {
        info!(package = package_name, items = items.len(), "assembling deployment package");

        let extraction_id = short_token_upper(8);
        let script = install_script(user, package_name, items.len(), &extraction_id);
        let metadata = BundleMetadata::new(user, package_name, items.len());
        let metadata_json = serde_json::to_vec_pretty(&metadata)
            .map_err(|err| DeployError::BundleAssemblyFailed(std::io::Error::other(err)))?;
        let listing = manifest(items);
        let panel = control_panel(package_name, items);

        let folder = package_folder_name(package_name);
        let bytes = (|| -> std::io::Result<Vec<u8>> {
            let mut archive = ArchiveBuilder::new();
            archive.dir(&folder)?;
            archive.file(&format!("{folder}/installer.bat"), script.as_bytes())?;
            archive.file(&format!("{folder}/app_config.json"), &metadata_json)?;
            archive.file(&format!("{folder}/manifest.txt"), listing.as_bytes())?;
            archive.file(&format!("{folder}/index.html"), panel.as_bytes())?;
            archive.dir(&format!("{folder}/bin"))?;
            archive.file(&format!("{folder}/bin/core_service.exe"), BINARY_PLACEHOLDER)?;
            archive.finish()
        })()
        .map_err(DeployError::BundleAssemblyFailed)?;

        let descriptor = DeploymentDescriptor {
            success: true,
            url: format!("{DISTRIBUTION_HOST}/ds/{}", short_token(10)),
            status: "LIVE".to_string(),
            size: size_label(bytes.len()),
        };

        info!(size = %descriptor.size, url = %descriptor.url, "deployment package ready");
        Ok((bytes, descriptor))
    }

    /// Charge storage for newly collected items, clamped to the quota.
    ///
    /// Decoupled from bundling: invoked whenever items land in the vault,
    /// not only at deployment time. Persists through the identity service's
    /// update path, so the usual read-modify-write caveats apply.
    pub async fn sync_storage_usage(
        &self,
        user: &UserRecord,
        new_item_count: usize,
    ) -> Result<UserRecord, DeployError> {
        let additional = new_item_count as u64 * STORAGE_COST_PER_ITEM_MB;
        let consumed = user
            .storage_consumed
            .saturating_add(additional)
            .min(user.storage_quota);

        let updated = self
            .identity
            .update(
                &user.id,
                UserUpdate {
                    storage_consumed: Some(consumed),
                    ..UserUpdate::default()
                },
            )
            .await?;
        Ok(updated)
    }
}

/// Top-level archive folder: the package name with spaces replaced by
/// underscores.
fn package_folder_name(package_name: &str) -> String {
    package_name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Human-readable size label for an archive byte length.
fn size_label(byte_len: usize) -> String {
    format!("{:.2} KB", byte_len as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountClass;
    use crate::storage::{DirectoryStore, LocalStore, StoragePaths};
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn test_identity(root: &std::path::Path) -> IdentityService {
        IdentityService::new(DirectoryStore::new(
            LocalStore::open(StoragePaths::new(root)).unwrap(),
        ))
    }

    fn test_items(count: usize) -> Vec<VaultItem> {
        (0..count)
            .map(|index| VaultItem {
                id: format!("item_{index}"),
                name: format!("Node_{index}.DLG"),
                size_label: "156KB".into(),
                kind_tag: "Scraped-Node".into(),
                created_at: chrono::Utc::now(),
                is_encrypted: true,
            })
            .collect()
    }

    async fn registered_user(identity: &IdentityService) -> UserRecord {
        identity
            .register("Ana", "ana@x.io", "pw1", AccountClass::Personal)
            .await
            .unwrap()
    }

    fn archive_entries(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let path = entry
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .to_string();
                let mut payload = String::new();
                entry.read_to_string(&mut payload).unwrap();
                (path, payload)
            })
            .collect()
    }

    #[tokio::test]
    async fn deploy_lays_out_the_expected_tree() {
        let dir = tempdir().unwrap();
        let identity = test_identity(dir.path());
        let user = registered_user(&identity).await;
        let bundler = DeploymentBundler::new(identity);

        let (bytes, descriptor) = bundler
            .deploy(&user, "DriveSearch App", &test_items(3))
            .await
            .unwrap();

        let entries = archive_entries(&bytes);
        let paths: Vec<&str> = entries.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "DriveSearch_App",
                "DriveSearch_App/installer.bat",
                "DriveSearch_App/app_config.json",
                "DriveSearch_App/manifest.txt",
                "DriveSearch_App/index.html",
                "DriveSearch_App/bin",
                "DriveSearch_App/bin/core_service.exe",
            ]
        );
        assert!(paths.iter().all(|path| !path.contains(' ')));

        assert!(descriptor.success);
        assert_eq!(descriptor.status, "LIVE");
        assert!(descriptor.url.starts_with("go-service.pl/ds/"));
        assert!(descriptor.size.ends_with(" KB"));
    }

    #[tokio::test]
    async fn manifest_inside_the_archive_matches_the_items() {
        let dir = tempdir().unwrap();
        let identity = test_identity(dir.path());
        let user = registered_user(&identity).await;
        let bundler = DeploymentBundler::new(identity);
        let items = test_items(5);

        let (bytes, _) = bundler.deploy(&user, "Pack", &items).await.unwrap();

        let entries = archive_entries(&bytes);
        let (_, manifest_text) = entries
            .iter()
            .find(|(path, _)| path.ends_with("manifest.txt"))
            .unwrap();

        let lines: Vec<&str> = manifest_text.lines().collect();
        assert_eq!(lines.len(), 5);
        for (index, line) in lines.iter().enumerate() {
            assert_eq!(*line, format!("- Node_{index}.DLG (Scraped-Node)"));
        }
    }

    #[tokio::test]
    async fn placeholder_binary_is_the_fixed_literal() {
        let dir = tempdir().unwrap();
        let identity = test_identity(dir.path());
        let user = registered_user(&identity).await;
        let bundler = DeploymentBundler::new(identity);

        let (bytes, _) = bundler.deploy(&user, "Pack", &test_items(1)).await.unwrap();

        let entries = archive_entries(&bytes);
        let (_, payload) = entries
            .iter()
            .find(|(path, _)| path.ends_with("core_service.exe"))
            .unwrap();
        assert_eq!(payload, "BINARY_PLACEHOLDER");
    }

    #[tokio::test]
    async fn sync_storage_usage_charges_per_item() {
        let dir = tempdir().unwrap();
        let identity = test_identity(dir.path());
        let user = registered_user(&identity).await;
        let bundler = DeploymentBundler::new(identity);

        let updated = bundler.sync_storage_usage(&user, 3).await.unwrap();
        assert_eq!(updated.storage_consumed, 3 * STORAGE_COST_PER_ITEM_MB);
    }

    #[tokio::test]
    async fn sync_storage_usage_never_exceeds_the_quota() {
        let dir = tempdir().unwrap();
        let identity = test_identity(dir.path());
        let user = registered_user(&identity).await;
        let bundler = DeploymentBundler::new(identity);

        let updated = bundler
            .sync_storage_usage(&user, usize::MAX / STORAGE_COST_PER_ITEM_MB as usize)
            .await
            .unwrap();
        assert_eq!(updated.storage_consumed, updated.storage_quota);

        // A further sync stays clamped.
        let again = bundler.sync_storage_usage(&updated, 10).await.unwrap();
        assert_eq!(again.storage_consumed, again.storage_quota);
    }

    #[test]
    fn package_folder_name_strips_spaces() {
        assert_eq!(package_folder_name("My Cool App"), "My_Cool_App");
        assert_eq!(package_folder_name("  padded   name "), "padded_name");
        assert_eq!(package_folder_name("solo"), "solo");
    }

    #[test]
    fn size_label_formats_two_decimals() {
        assert_eq!(size_label(1024), "1.00 KB");
        assert_eq!(size_label(1536), "1.50 KB");
        assert_eq!(size_label(0), "0.00 KB");
    }
}
