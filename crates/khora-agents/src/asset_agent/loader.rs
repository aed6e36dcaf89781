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

//! A registry for asset loaders, dispatching on the asset's four-byte type tag.

use anyhow::anyhow;
use khora_core::asset::{Asset, AssetId, AssetTypeId, ErasedAsset};
use khora_lanes::asset_lane::{AssetLoader, InstallContext, LoadContext, LoaderError};
use std::{
    any::{type_name, Any},
    collections::HashMap,
    marker::PhantomData,
    sync::Arc,
};

/// An instance under construction, before it is attached to its record.
pub(crate) type PendingInstance = Box<dyn Any + Send + Sync>;

/// Internal trait driving any asset type through the loader steps.
pub(crate) trait ErasedAssetLoader: Send + Sync {
    fn asset_type_name(&self) -> &'static str;
    fn create_any(&self, id: &AssetId) -> PendingInstance;
    fn load_any(
        &self,
        ctx: &mut LoadContext<'_>,
        asset: &mut (dyn Any + Send + Sync),
    ) -> Result<(), LoaderError>;
    fn install_any(
        &self,
        ctx: &mut InstallContext<'_>,
        asset: &mut (dyn Any + Send + Sync),
    ) -> Result<(), LoaderError>;
    fn unload_any(&self, id: &AssetId, asset: ErasedAsset);
}

/// A "wrapper" that takes a generic `AssetLoader<A>` and implements `ErasedAssetLoader`.
struct AssetLoaderWrapper<A: Asset, L: AssetLoader<A>>(L, PhantomData<A>);

impl<A: Asset, L: AssetLoader<A>> AssetLoaderWrapper<A, L> {
    fn downcast<'a>(&self, asset: &'a mut (dyn Any + Send + Sync)) -> anyhow::Result<&'a mut A> {
        asset.downcast_mut::<A>().ok_or_else(|| {
            anyhow!(
                "Loader for '{}' received an instance of another type",
                type_name::<A>()
            )
        })
    }
}

impl<A: Asset, L: AssetLoader<A>> ErasedAssetLoader for AssetLoaderWrapper<A, L> {
    fn asset_type_name(&self) -> &'static str {
        type_name::<A>()
    }

    fn create_any(&self, id: &AssetId) -> PendingInstance {
        Box::new(self.0.create(id))
    }

    fn load_any(
        &self,
        ctx: &mut LoadContext<'_>,
        asset: &mut (dyn Any + Send + Sync),
    ) -> Result<(), LoaderError> {
        let asset = self.downcast(asset)?;
        self.0.load(ctx, asset)
    }

    fn install_any(
        &self,
        ctx: &mut InstallContext<'_>,
        asset: &mut (dyn Any + Send + Sync),
    ) -> Result<(), LoaderError> {
        let asset = self.downcast(asset)?;
        self.0.install(ctx, asset)
    }

    fn unload_any(&self, id: &AssetId, asset: ErasedAsset) {
        match asset.downcast::<A>() {
            Ok(asset) => self.0.unload(id, asset),
            Err(_) => log::error!(
                "Asset {} is not a '{}', skipping loader unload",
                id,
                type_name::<A>()
            ),
        }
    }
}

/// The registry mapping each asset type tag to its loader.
#[derive(Default)]
pub(crate) struct AssetLoaderRegistry {
    loaders: HashMap<AssetTypeId, Arc<dyn ErasedAssetLoader>>,
}

impl AssetLoaderRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers the loader for assets tagged `type_id`, replacing any previous one.
    pub(crate) fn register<A: Asset>(
        &mut self,
        type_id: AssetTypeId,
        loader: impl AssetLoader<A> + 'static,
    ) {
        let wrapped = AssetLoaderWrapper(loader, PhantomData);
        if let Some(previous) = self.loaders.insert(type_id, Arc::new(wrapped)) {
            log::warn!(
                "Replacing loader for asset type '{}' (was producing '{}')",
                type_id,
                previous.asset_type_name()
            );
        } else {
            log::debug!(
                "Registered loader for asset type '{}' producing '{}'",
                type_id,
                type_name::<A>()
            );
        }
    }

    /// Returns the loader for `type_id`.
    pub(crate) fn get(&self, type_id: AssetTypeId) -> Option<Arc<dyn ErasedAssetLoader>> {
        self.loaders.get(&type_id).cloned()
    }

    /// Checks if a loader is registered for `type_id`.
    pub(crate) fn contains(&self, type_id: AssetTypeId) -> bool {
        self.loaders.contains_key(&type_id)
    }
}
