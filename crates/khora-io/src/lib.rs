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

//! # Khora IO
//!
//! I/O services for the asset pipeline:
//! - [`asset_file`]: the binary asset file layout produced by the content
//!   converter (a header declaring type and dependencies, then an opaque body).
//! - [`vfs`]: the virtual file system resolving an
//!   [`AssetId`](khora_core::asset::AssetId) path to bytes.

#![warn(missing_docs)]

pub mod asset_file;
pub mod error;
pub mod vfs;

pub use asset_file::{AssetFile, AssetFileHeader, CompressionMode, ASSET_FILE_VERSION};
pub use error::AssetIoError;
pub use vfs::VirtualFileSystem;
