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

use super::{InstallContext, LoadContext};
use khora_core::asset::{Asset, AssetId};
use std::{error::Error, sync::Arc};

/// The error type returned by loaders. It must be thread-safe.
pub type LoaderError = Box<dyn Error + Send + Sync>;

/// A trait for types that can load a specific kind of asset.
///
/// This represents the "Data Plane" part of asset loading. Implementors of this
/// trait are responsible for the potentially CPU-intensive work of parsing and
/// decoding file data into a usable, engine-ready asset type, and for wiring the
/// result to its dependencies and to the GPU.
///
/// Each `AssetLoader` is specialized for a single asset type `A`. Loaders are
/// shared between requests and must not keep per-asset state of their own.
pub trait AssetLoader<A: Asset>: Send + Sync {
    /// Allocates an empty instance for the asset `id`.
    fn create(&self, id: &AssetId) -> A;

    /// Decodes the asset file into `asset`.
    ///
    /// The context exposes the file's header and uncompressed body. Its
    /// dependency list starts with the dependencies declared by the header; the
    /// loader may add more.
    ///
    /// # Errors
    /// Returning an error fails the load; `install` is never called for it.
    fn load(&self, ctx: &mut LoadContext<'_>, asset: &mut A) -> Result<(), LoaderError>;

    /// Wires `asset` to its dependencies and schedules any GPU uploads.
    ///
    /// Called once, after every dependency handle reports loaded. Sync points
    /// registered with [`InstallContext::wait_for`] hold the asset back until
    /// the GPU has reached them.
    ///
    /// # Errors
    /// Returning an error fails the load.
    fn install(&self, ctx: &mut InstallContext<'_>, asset: &mut A) -> Result<(), LoaderError> {
        let _ = (ctx, asset);
        Ok(())
    }

    /// Releases the type-specific resources held by `asset`, including GPU ones.
    ///
    /// Clients may still hold the `Arc` for a while; the default implementation
    /// simply drops the pipeline's reference.
    fn unload(&self, id: &AssetId, asset: Arc<A>) {
        let _ = id;
        drop(asset);
    }
}
