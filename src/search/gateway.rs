// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Content resolution gateway.
//!
//! [`ContentResolver`] is the seam between the search service and the
//! external resolver. [`HttpResolver`] is a thin JSON adapter to a remote
//! endpoint; what the remote side does with the text is not this crate's
//! concern.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::RESOLVER_URL_ENV;
use crate::models::{InterpretedQuery, LinkAnalysis, ResolvedItem};

/// Errors from the external resolver boundary.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// Resolver configuration missing.
    #[error("resolver configuration missing: {0}")]
    MissingConfig(String),

    /// The request itself failed (network, timeout, non-2xx status).
    #[error("resolver request failed: {0}")]
    Request(String),

    /// The resolver answered with something unusable.
    #[error("resolver response was invalid: {0}")]
    InvalidResponse(String),
}

/// External content-resolution capability.
///
/// All three calls may fail; how failure propagates differs per call and is
/// decided by the search service, not here.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Interpret a vague query into keywords, intent and priority.
    async fn interpret(&self, text: &str) -> Result<InterpretedQuery, ResolverError>;

    /// Resolve a query into a list of content items.
    async fn resolve(&self, text: &str) -> Result<Vec<ResolvedItem>, ResolverError>;

    /// Analyze one specific link target.
    async fn analyze_link(&self, url: &str) -> Result<LinkAnalysis, ResolverError>;
}

/// Thin HTTP adapter to a remote resolver endpoint.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    base_url: String,
    http: Client,
}

impl HttpResolver {
    /// Create a resolver against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ResolverError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ResolverError::Request(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Create a resolver from the `RESOLVER_URL` environment variable.
    pub fn from_env() -> Result<Self, ResolverError> {
        let base_url = env::var(RESOLVER_URL_ENV)
            .map_err(|_| ResolverError::MissingConfig(RESOLVER_URL_ENV.to_string()))?;
        Self::new(base_url)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        text: &str,
    ) -> Result<T, ResolverError> {
        let response = self
            .http
            .post(format!("{}/{endpoint}", self.base_url))
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|err| ResolverError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::Request(format!(
                "{endpoint} returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| ResolverError::InvalidResponse(err.to_string()))
    }
}

#[async_trait]
impl ContentResolver for HttpResolver {
    async fn interpret(&self, text: &str) -> Result<InterpretedQuery, ResolverError> {
        self.post_json("interpret", text).await
    }

    async fn resolve(&self, text: &str) -> Result<Vec<ResolvedItem>, ResolverError> {
        self.post_json("resolve", text).await
    }

    async fn analyze_link(&self, url: &str) -> Result<LinkAnalysis, ResolverError> {
        self.post_json("analyze", url).await
    }
}
