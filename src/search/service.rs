// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Search orchestration: cache first, resolver on miss.
//!
//! Failure semantics differ per call kind. A degraded search result is
//! misleading, so full resolution and direct-link analysis propagate
//! resolver failure. A degraded keyword interpretation is merely a weaker
//! hint, so interpretation falls back to one derived from the raw query
//! and never errors.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::error::SearchError;
use crate::models::{short_token, InterpretedQuery, LinkAnalysis, ResolvedItem};

use super::cache::{CallKind, ResultCache};
use super::gateway::ContentResolver;

/// Cache-fronted entry point for all resolver calls.
pub struct SearchService {
    cache: ResultCache,
    resolver: Arc<dyn ContentResolver>,
}

impl SearchService {
    /// Create a search service over the given cache and resolver.
    ///
    /// The cache is owned by the service for its whole lifetime; a caller
    /// that abandons a pending call still lets the eventual write land,
    /// since a late overwrite of the same key is harmless.
    pub fn new(cache: ResultCache, resolver: Arc<dyn ContentResolver>) -> Self {
        Self { cache, resolver }
    }

    /// Interpret a vague query into keywords and intent.
    ///
    /// Never fails: resolver unavailability degrades to a fallback
    /// interpretation derived purely from the raw query. Only genuine
    /// resolver results are cached.
    pub async fn interpret(&self, raw_query: &str) -> InterpretedQuery {
        if let Some(hit) = self.cache.get(CallKind::Interpret, raw_query) {
            if let Ok(cached) = serde_json::from_value(hit) {
                debug!(query = raw_query, "interpretation served from cache");
                return cached;
            }
        }

        match self.resolver.interpret(raw_query).await {
            Ok(interpretation) => {
                self.cache
                    .put(CallKind::Interpret, raw_query, json!(interpretation));
                interpretation
            }
            Err(err) => {
                warn!(%err, query = raw_query, "interpretation degraded to fallback");
                InterpretedQuery::fallback(raw_query)
            }
        }
    }

    /// Resolve a query into content items.
    ///
    /// Resolver failure is reported, not degraded.
    pub async fn resolve(&self, raw_query: &str) -> Result<Vec<ResolvedItem>, SearchError> {
        if let Some(hit) = self.cache.get(CallKind::Resolve, raw_query) {
            if let Ok(cached) = serde_json::from_value(hit) {
                debug!(query = raw_query, "resolution served from cache");
                return Ok(cached);
            }
        }

        let results = self.resolver.resolve(raw_query).await.map_err(|err| {
            warn!(%err, query = raw_query, "resolver unavailable for full resolution");
            SearchError::ResolverUnavailable
        })?;

        self.cache.put(CallKind::Resolve, raw_query, json!(results));
        Ok(results)
    }

    /// Analyze one link target, producing exactly one result item.
    ///
    /// Keyed by the literal target reference, not by derived keywords.
    pub async fn analyze_link(&self, target_url: &str) -> Result<ResolvedItem, SearchError> {
        if let Some(hit) = self.cache.get(CallKind::AnalyzeLink, target_url) {
            if let Ok(cached) = serde_json::from_value(hit) {
                debug!(target = target_url, "link analysis served from cache");
                return Ok(cached);
            }
        }

        let host = Url::parse(target_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or(SearchError::InvalidTarget)?;

        let analysis: LinkAnalysis =
            self.resolver.analyze_link(target_url).await.map_err(|err| {
                warn!(%err, target = target_url, "resolver unavailable for link analysis");
                SearchError::ResolverUnavailable
            })?;

        let item = ResolvedItem {
            id: format!("link_{}", short_token(6)),
            title: format!("Analyzed Resource: {host}"),
            url: target_url.to_string(),
            snippet: if analysis.snippet.is_empty() {
                "No detailed summary available.".to_string()
            } else {
                analysis.snippet
            },
            source_label: "Direct Link Scrape".to_string(),
            content_type: "application/node-resource".to_string(),
        };

        self.cache.put(CallKind::AnalyzeLink, target_url, json!(item));
        Ok(item)
    }

    /// Full search flow: interpret the raw query, then resolve using the
    /// extracted keywords (falling back to the raw query when none).
    pub async fn search(&self, raw_query: &str) -> Result<Vec<ResolvedItem>, SearchError> {
        let interpretation = self.interpret(raw_query).await;
        let refined = if interpretation.keywords.is_empty() {
            raw_query.to_string()
        } else {
            interpretation.keywords.join(" ")
        };
        self.resolve(&refined).await
    }
}
