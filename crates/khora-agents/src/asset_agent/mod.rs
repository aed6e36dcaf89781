// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Acts as the **[A]gent** for the asset subsystem.
//!
//! This module provides the tactical logic for asset management in Khora. It is
//! the public-facing API for requesting assets and querying their state, but it
//! delegates the type-specific work of decoding and installing to the loaders
//! registered from the `asset_lane`.
//!
//! The primary entry point is [`AssetService`]:
//! - [`AssetService::load`] and [`AssetService::unload`] adjust the reference
//!   count of an asset and enqueue a request when the count leaves or reaches zero.
//!   They may be called from any thread.
//! - [`AssetService::update`] advances the pipeline by one tick: pending requests
//!   are promoted (at most one active request per asset), then every active
//!   request's state machine takes one step.
//!
//! Failures never escape as errors: they are recorded on the asset's record
//! (`AssetStatus::LoadingFailed`), logged, and published as [`AssetEvent`]s.

mod cache;
mod config;
mod event;
mod loader;
mod request;
mod service;

pub use config::AssetServiceConfig;
pub use event::AssetEvent;
pub use request::{AssetRequestError, RequestKind, RequestState};
pub use service::AssetService;
