// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Scripted demo session: sign in, collect a couple of items, deploy.
//!
//! With `RESOLVER_URL` set the search runs against the live resolver;
//! without it an offline stand-in is used, which exercises the degraded
//! interpretation path and skips full resolution.

use std::{env, fs, sync::Arc};

use async_trait::async_trait;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use drivesearch::config::{DATA_DIR_ENV, DEFAULT_DATA_DIR};
use drivesearch::error::IdentityError;
use drivesearch::models::{
    AccountClass, InterpretedQuery, LinkAnalysis, ResolvedItem, UserUpdate,
};
use drivesearch::search::{ContentResolver, HttpResolver, ResolverError};
use drivesearch::state::AppState;
use drivesearch::storage::StoragePaths;

/// Resolver stand-in for running without a configured endpoint.
struct OfflineResolver;

#[async_trait]
impl ContentResolver for OfflineResolver {
    async fn interpret(&self, _text: &str) -> Result<InterpretedQuery, ResolverError> {
        Err(ResolverError::Request("resolver offline".to_string()))
    }

    async fn resolve(&self, _text: &str) -> Result<Vec<ResolvedItem>, ResolverError> {
        Err(ResolverError::Request("resolver offline".to_string()))
    }

    async fn analyze_link(&self, _url: &str) -> Result<LinkAnalysis, ResolverError> {
        Err(ResolverError::Request("resolver offline".to_string()))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let resolver: Arc<dyn ContentResolver> = match HttpResolver::from_env() {
        Ok(resolver) => Arc::new(resolver),
        Err(err) => {
            warn!(%err, "no resolver configured, running offline");
            Arc::new(OfflineResolver)
        }
    };

    let state = AppState::new(StoragePaths::new(&data_dir), resolver)
        .expect("failed to open data directory");

    // Register-or-login, the way the auth gateway decides it.
    let email = "demo@go-service.pl";
    let user = match state.identity.authenticate(email, "demo").await {
        Ok(user) => user,
        Err(IdentityError::NoSuchAccount) => state
            .identity
            .register("Demo Operator", email, "demo", AccountClass::Personal)
            .await
            .expect("registration failed"),
        Err(err) => panic!("login failed: {err}"),
    };
    info!(directory_id = %user.directory_id, "session started for {}", user.display_name);

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
        .expect("agreement update failed");

    // Search; offline this degrades to the fallback interpretation and
    // reports the resolver as unavailable for full resolution.
    let query = "open source disk tools";
    let interpretation = state.search.interpret(query).await;
    info!(keywords = ?interpretation.keywords, intent = %interpretation.intent, "query interpreted");

    let mut user = user;
    match state.search.search(query).await {
        Ok(results) => {
            for result in results.iter().take(2) {
                let (items, refreshed) = state
                    .collect(&user, result)
                    .await
                    .expect("collect failed");
                user = refreshed;
                info!(vault_items = items.len(), "collected {}", result.title);
            }
        }
        Err(err) => {
            warn!(%err, "live search unavailable, collecting a canned item");
            let canned = ResolvedItem {
                id: "node_offline".to_string(),
                title: "Offline Sample Node".to_string(),
                url: "https://example.com/sample".to_string(),
                snippet: "Data node identified.".to_string(),
                source_label: "Global Distributed Node".to_string(),
                content_type: "text/html".to_string(),
            };
            let (_, refreshed) = state.collect(&user, &canned).await.expect("collect failed");
            user = refreshed;
        }
    }

    let (bytes, descriptor) = state.deploy_vault(&user).await.expect("deployment failed");
    let out_path = format!(
        "{data_dir}/DriveSearch_App_{}_DRIVESEARCH_v1.0X.tar.gz",
        user.directory_id.replace('-', "_")
    );
    fs::write(&out_path, &bytes).expect("failed to write archive");

    info!(
        url = %descriptor.url,
        status = %descriptor.status,
        size = %descriptor.size,
        "deployment complete, archive at {out_path}"
    );
}
