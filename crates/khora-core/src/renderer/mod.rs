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

//! The backend-agnostic slice of the rendering contracts that the asset
//! pipeline depends on.
//!
//! Loaders upload buffers and images through a [`GpuUploadContext`] while an
//! asset is being installed. Every upload yields a [`GpuSyncPoint`]: a timeline
//! semaphore and the value it must reach before the uploaded data may be used.
//! The asset pipeline never blocks on these points; it polls them once per tick.
//! How the queues, staging memory and semaphores are actually implemented is
//! left to the concrete graphics backend.

pub mod error;
pub mod sync;

pub use self::error::UploadError;
pub use self::sync::{
    AtomicTimelineSemaphore, GpuQueue, GpuSyncPoint, GpuUploadContext, ImageUpload,
    TimelineSemaphore,
};
