// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! # Core Data Models
//!
//! This module defines the data structures shared by the identity service,
//! the search pipeline and the deployment bundler. All persisted types derive
//! `Serialize` and `Deserialize` for JSON storage.
//!
//! ## Email Type
//!
//! The [`Email`] newtype wraps account email addresses. Uniqueness across the
//! directory is case-insensitive, so comparisons go through
//! [`Email::matches`] rather than `==`.
//!
//! ## Model Categories
//!
//! - **Users**: directory records and their public projections
//! - **Vault**: the session's collected items
//! - **Search**: resolver call results
//! - **Deployment**: the descriptor returned after bundling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Email Type
// =============================================================================

/// Account email address wrapper.
///
/// Directory lookups are case-insensitive; use [`Email::matches`] when
/// comparing against stored records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(pub String);

impl Email {
    /// Case-insensitive comparison against another address.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Email {
    fn from(value: String) -> Self {
        Email(value)
    }
}

impl From<&str> for Email {
    fn from(value: &str) -> Self {
        Email(value.to_string())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

// =============================================================================
// User Models
// =============================================================================

/// Account class, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountClass {
    /// Individual account
    Personal,
    /// Account managed by a guardian
    Supervised,
    /// Organization account
    Business,
}

impl Default for AccountClass {
    fn default() -> Self {
        Self::Personal
    }
}

/// Service tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// Default tier for new registrations
    Standard,
    /// Paid tier
    Elite,
    /// Maximum-privacy tier
    Paranoia,
}

impl Default for Tier {
    fn default() -> Self {
        Self::Standard
    }
}

/// Full user record as persisted in the directory store.
///
/// `credential_secret` never leaves the identity service boundary; anything
/// returned to callers is a [`UserRecord`].
///
/// The secret is stored and compared in plaintext. Known security defect:
/// no hashing or salting is applied before persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Opaque unique identifier, immutable after registration.
    pub id: String,
    /// Primary lookup key; unique case-insensitively.
    pub email: Email,
    /// Plaintext authentication secret.
    pub credential_secret: String,
    /// Display name shown in the UI and deployment metadata.
    pub display_name: String,
    /// Avatar image reference.
    pub avatar_ref: String,
    /// Human-facing secondary identifier, immutable after registration.
    pub directory_id: String,
    /// Account class, fixed at registration.
    pub account_class: AccountClass,
    /// Storage capacity in MB.
    pub storage_quota: u64,
    /// Storage usage in MB; never exceeds `storage_quota`.
    pub storage_consumed: u64,
    /// Service tier.
    pub tier: Tier,
    /// Whether the user accepted the service agreement.
    pub agreement_accepted: bool,
}

/// Public projection of a user record (never includes the secret).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    /// Opaque unique identifier.
    pub id: String,
    /// Account email address.
    pub email: Email,
    /// Display name.
    pub display_name: String,
    /// Avatar image reference.
    pub avatar_ref: String,
    /// Human-facing secondary identifier.
    pub directory_id: String,
    /// Account class.
    pub account_class: AccountClass,
    /// Storage capacity in MB.
    pub storage_quota: u64,
    /// Storage usage in MB.
    pub storage_consumed: u64,
    /// Service tier.
    pub tier: Tier,
    /// Whether the user accepted the service agreement.
    pub agreement_accepted: bool,
}

impl From<StoredUser> for UserRecord {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar_ref: user.avatar_ref,
            directory_id: user.directory_id,
            account_class: user.account_class,
            storage_quota: user.storage_quota,
            storage_consumed: user.storage_consumed,
            tier: user.tier,
            agreement_accepted: user.agreement_accepted,
        }
    }
}

/// Closed set of fields an update may touch.
///
/// `id`, `email`, `directory_id` and `account_class` are immutable after
/// registration and deliberately absent here; unknown fields are rejected at
/// deserialization rather than silently merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New avatar reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
    /// New authentication secret (credential update or reset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_secret: Option<String>,
    /// New service tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    /// New storage usage in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_consumed: Option<u64>,
    /// New agreement state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement_accepted: Option<bool>,
}

// =============================================================================
// Vault Models
// =============================================================================

/// An item in the session's vault, destined for bundling.
///
/// Vault items exist only in the session's local collection; they have no
/// server-side counterpart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultItem {
    /// Unique item identifier.
    pub id: String,
    /// Display name, also used in the bundle manifest.
    pub name: String,
    /// Human-readable size label.
    pub size_label: String,
    /// Item kind, used in the bundle manifest.
    pub kind_tag: String,
    /// When the item was collected.
    pub created_at: DateTime<Utc>,
    /// Whether the item is stored encrypted.
    pub is_encrypted: bool,
}

impl VaultItem {
    /// Build a vault item from a collected search result.
    ///
    /// The name is the result title with whitespace runs collapsed to `_`,
    /// truncated to 30 characters, with a `.DLG` suffix.
    pub fn from_resolved(result: &ResolvedItem) -> Self {
        let mut name: String = result
            .title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .take(30)
            .collect();
        name.push_str(".DLG");

        Self {
            id: short_token(9),
            name,
            size_label: "156KB".to_string(),
            kind_tag: if result.content_type.is_empty() {
                "Scraped-Node".to_string()
            } else {
                result.content_type.clone()
            },
            created_at: Utc::now(),
            is_encrypted: true,
        }
    }
}

// =============================================================================
// Search Models
// =============================================================================

/// Structured interpretation of a vague query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterpretedQuery {
    /// Technical keywords extracted from the query.
    pub keywords: Vec<String>,
    /// Classified intent.
    pub intent: String,
    /// Relative priority assigned by the resolver.
    pub priority: u32,
}

impl InterpretedQuery {
    /// Degraded interpretation derived purely from the raw query.
    ///
    /// Used when the resolver is unavailable; a weaker hint is still useful
    /// where a fabricated search result would not be.
    pub fn fallback(raw_query: &str) -> Self {
        Self {
            keywords: vec![raw_query.to_string()],
            intent: "General".to_string(),
            priority: 1,
        }
    }
}

/// A single resolved content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedItem {
    /// Unique result identifier.
    pub id: String,
    /// Result title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Short content summary.
    pub snippet: String,
    /// Where the result came from.
    pub source_label: String,
    /// MIME-like content type tag.
    pub content_type: String,
}

/// Raw gateway output for a direct-link analysis.
///
/// The search service wraps this into exactly one [`ResolvedItem`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkAnalysis {
    /// Title extracted from the target.
    pub title: String,
    /// Summary of the resources found at the target.
    pub snippet: String,
}

// =============================================================================
// Deployment Models
// =============================================================================

/// Result of a bundling call, held only for the current UI turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentDescriptor {
    /// Whether bundling succeeded.
    pub success: bool,
    /// Synthesized distribution URL.
    pub url: String,
    /// Deployment status label.
    pub status: String,
    /// Human-readable archive size.
    pub size: String,
}

// =============================================================================
// Identifier Helpers
// =============================================================================

/// Random lowercase token of the given length (max 32).
pub(crate) fn short_token(len: usize) -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(len);
    token
}

/// Random uppercase token of the given length (max 32).
pub(crate) fn short_token_upper(len: usize) -> String {
    short_token(len).to_ascii_uppercase()
}
