// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! Generated bundle artifacts: install script, metadata document, manifest
//! and control panel.
//!
//! All four are display/record artifacts. Nothing in them is executable
//! logic and nothing calls back into the bundler; the extraction id in the
//! install script exists for display only and takes no part in integrity
//! checking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{SERVICE_NAME, SERVICE_NODE, SERVICE_PROTOCOL, SERVICE_VERSION};
use crate::models::{UserRecord, VaultItem};

/// Structured metadata document written as `app_config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleMetadata {
    /// Service name.
    pub service: String,
    /// Fixed version tag.
    pub version: String,
    /// Display name of the deploying user.
    pub deployed_by: String,
    /// Directory id of the deploying user.
    pub deploy_id: String,
    /// When the bundle was produced.
    pub timestamp: DateTime<Utc>,
    /// Node tag.
    pub node: String,
    /// Package name.
    pub app_name: String,
    /// Number of bundled items.
    pub files_count: usize,
    /// Protocol tag.
    pub protocol: String,
}

impl BundleMetadata {
    /// Metadata for one bundling call.
    pub fn new(user: &UserRecord, package_name: &str, item_count: usize) -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            deployed_by: user.display_name.clone(),
            deploy_id: user.directory_id.clone(),
            timestamp: Utc::now(),
            node: SERVICE_NODE.to_string(),
            app_name: package_name.to_string(),
            files_count: item_count,
            protocol: SERVICE_PROTOCOL.to_string(),
        }
    }
}

/// Human-readable install script for the bundle root.
pub fn install_script(
    user: &UserRecord,
    package_name: &str,
    item_count: usize,
    extraction_id: &str,
) -> String {
    format!(
        "@echo off\n\
         title {SERVICE_NAME} v{SERVICE_VERSION} Installer - {package_name}\n\
         color 0b\n\
         echo ===================================================\n\
         echo   DRIVESEARCH v{SERVICE_VERSION} ^| NEURAL DEPLOYMENT\n\
         echo ===================================================\n\
         echo [SYSTEM] Node Identity: {directory_id}\n\
         echo [SYSTEM] Package: {package_name}\n\
         echo [SYSTEM] Resources: {item_count} node entities\n\
         echo [SYSTEM] Extraction ID: {extraction_id}\n\
         echo.\n\
         echo [!] DEPLOYMENT COMPLETE. Open index.html for GUI control.\n\
         echo ===================================================\n\
         pause\n",
        directory_id = user.directory_id,
    )
}

/// Plain-text manifest: one `- <name> (<kind>)` line per item, input order.
pub fn manifest(items: &[VaultItem]) -> String {
    items
        .iter()
        .map(|item| format!("- {} ({})", item.name, item.kind_tag))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Static control-panel page embedded in the bundle.
///
/// Lists every item with an inert install affordance; purely a display
/// artifact for whoever unpacks the archive.
pub fn control_panel(package_name: &str, items: &[VaultItem]) -> String {
    let item_blocks: String = items
        .iter()
        .map(|item| {
            format!(
                "        <div class=\"file-row\">\n\
                             <div class=\"file-info\">\n\
                                 <div class=\"file-name\">{}</div>\n\
                                 <div class=\"file-kind\">Type: {}</div>\n\
                             </div>\n\
                             <button onclick=\"alert('Starting install for: {}')\">Install</button>\n\
                         </div>\n",
                item.name, item.kind_tag, item.name
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>Install Panel | {SERVICE_NAME}</title>\n\
         <style>\n\
         body {{ background: #020617; color: #f8fafc; font-family: sans-serif; display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; padding: 20px; }}\n\
         .card {{ background: rgba(30, 41, 59, 0.5); padding: 40px; border-radius: 32px; text-align: center; max-width: 500px; width: 100%; }}\n\
         .logo {{ font-weight: 900; font-style: italic; font-size: 28px; margin-bottom: 8px; }}\n\
         .tagline {{ font-size: 10px; opacity: 0.4; text-transform: uppercase; letter-spacing: 4px; margin-bottom: 30px; }}\n\
         .file-row {{ background: rgba(255,255,255,0.05); padding: 15px; border-radius: 12px; margin-bottom: 10px; display: flex; justify-content: space-between; align-items: center; }}\n\
         .file-name {{ font-weight: bold; font-size: 14px; text-align: left; }}\n\
         .file-kind {{ font-size: 10px; opacity: 0.5; text-transform: uppercase; text-align: left; }}\n\
         button {{ background: #6366f1; color: white; border: none; padding: 8px 16px; border-radius: 8px; font-size: 12px; cursor: pointer; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <div class=\"card\">\n\
         <div class=\"logo\">{SERVICE_NAME}</div>\n\
         <div class=\"tagline\">Neural Deployment Node</div>\n\
         <h2>Package: {package_name}</h2>\n\
         <p>{item_count} resources ready for system integration.</p>\n\
         <div class=\"files\">\n{item_blocks}    </div>\n\
         <button onclick=\"alert('Running global installer...')\">Install all</button>\n\
         </div>\n\
         </body>\n\
         </html>\n",
        item_count = items.len(),
    )
}
