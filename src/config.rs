// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and fixed service values
//! used throughout the application. Configuration is loaded from the
//! environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for persisted documents | `./data` |
//! | `RESOLVER_URL` | Base URL of the external content resolver | Required for live search |
//! | `RUST_LOG` | Log level filter | `info` |

use std::time::Duration;

/// Environment variable name for the persisted data directory path.
///
/// Both durable namespaces (the user directory and the session vault) are
/// stored as JSON documents under this directory.
///
/// # Default
/// `./data`
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Environment variable name for the content resolver base URL.
pub const RESOLVER_URL_ENV: &str = "RESOLVER_URL";

/// Service name embedded in generated deployment metadata.
pub const SERVICE_NAME: &str = "DriveSearch";

/// Fixed version tag embedded in generated artifacts.
pub const SERVICE_VERSION: &str = "1.0X";

/// Node tag embedded in deployment metadata.
pub const SERVICE_NODE: &str = "DRIVE_SEARCH_NODE_01";

/// Protocol tag embedded in deployment metadata.
pub const SERVICE_PROTOCOL: &str = "DS-PRO-1.0X";

/// Base host for synthesized distribution URLs.
pub const DISTRIBUTION_HOST: &str = "go-service.pl";

/// Storage quota granted to newly registered accounts, in MB.
pub const DEFAULT_STORAGE_QUOTA_MB: u64 = 2048;

/// Storage cost charged per collected vault item, in MB.
pub const STORAGE_COST_PER_ITEM_MB: u64 = 12;

/// Time-to-live for cached resolver results.
pub const RESULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Maximum number of entries held by the result cache.
///
/// The cache expires lazily, so the capacity bound is what keeps it from
/// growing without limit in a long-lived process.
pub const RESULT_CACHE_CAPACITY: usize = 256;

/// Fixed one-time code the recovery flow checks before a credential reset.
///
/// The identity service itself performs no verification; callers must gate
/// `reset_credential` behind this out-of-band step.
pub const RECOVERY_CODE: &str = "123456";
