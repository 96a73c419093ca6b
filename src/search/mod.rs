// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DriveCorp

//! # Search Module
//!
//! The result cache, the content-resolution gateway and the orchestration
//! service tying them together. The cache is session-scoped and bounded;
//! the gateway is the only place that talks to the outside world.

pub mod cache;
pub mod gateway;
pub mod service;

pub use cache::{CallKind, ResultCache};
pub use gateway::{ContentResolver, HttpResolver, ResolverError};
pub use service::SearchService;
