// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Crate-wide error taxonomy.
//!
//! Identity errors are expected and recoverable by retrying with different
//! input, so each variant carries a user-facing message. Search and deploy
//! errors are surfaced with a generic message; retry is a caller decision.
//! Corrupt durable state is healed inside the storage layer by reseeding and
//! never reaches these types.

use crate::storage::StoreError;

/// Errors surfaced by the identity service.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The email is already registered (case-insensitive match).
    #[error("This email address is already registered.")]
    DuplicateEmail,

    /// No account matches the given email.
    #[error("No account was found for this email address.")]
    NoSuchAccount,

    /// The account exists but the secret does not match.
    #[error("Invalid credentials. Try again or reset your password.")]
    InvalidCredential,

    /// An update targeted a user id with no matching record.
    #[error("User {0} does not exist in the directory.")]
    NotFound(String),

    /// Durable storage failed while persisting.
    #[error("directory storage failed: {0}")]
    Storage(#[from] StoreError),
}

/// Errors surfaced by the search service.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The external resolver failed for a call that must not degrade.
    #[error("The content resolver is unavailable. Try again later.")]
    ResolverUnavailable,

    /// The direct-link target could not be parsed as a URL.
    #[error("Failed to analyze the specified link. Ensure the URL is valid.")]
    InvalidTarget,
}

/// Errors surfaced by the deployment bundler and the session around it.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Assembling or compressing the archive failed; no partial output.
    #[error("Deployment package assembly failed.")]
    BundleAssemblyFailed(#[source] std::io::Error),

    /// The user has not accepted the service agreement.
    #[error("The service agreement must be accepted first.")]
    AgreementRequired,

    /// The vault holds nothing to bundle.
    #[error("The vault is empty. Collect items before deploying.")]
    NothingToDeploy,

    /// Persisting the vault failed.
    #[error("vault storage failed: {0}")]
    Storage(#[from] StoreError),

    /// Updating the deployer's storage usage failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
