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

use super::AssetId;
use std::{
    any::Any,
    fmt,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

/// A loaded asset instance with its concrete type erased.
pub type ErasedAsset = Arc<dyn Any + Send + Sync>;

/// The load status of an [`AssetRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssetStatus {
    /// Nothing is loaded. This is the state of a fresh record and of a record
    /// whose unload request has completed.
    #[default]
    Unloaded,
    /// The asset and all of its dependencies are loaded and installed.
    Loaded,
    /// The last load attempt failed, or the record refers to no asset at all.
    LoadingFailed,
}

#[derive(Default)]
struct RecordState {
    status: AssetStatus,
    dependencies: Vec<AssetId>,
    asset: Option<ErasedAsset>,
}

/// The runtime cache entry for one asset.
///
/// Records are created by the asset service the first time an [`AssetId`] is
/// requested and are never freed or moved afterwards, so requests and handles
/// may keep references to them across ticks. All mutation goes through the
/// service and its requests; client code only observes a record through an
/// [`AssetHandle`](super::AssetHandle).
///
/// Invariant: `status == Loaded` implies an asset instance is attached.
pub struct AssetRecord {
    id: AssetId,
    reference_count: AtomicU32,
    state: RwLock<RecordState>,
}

impl AssetRecord {
    /// Creates an unloaded record with no references.
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            reference_count: AtomicU32::new(0),
            state: RwLock::new(RecordState::default()),
        }
    }

    /// The identifier this record caches.
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    /// The number of live references to the asset.
    pub fn reference_count(&self) -> u32 {
        self.reference_count.load(Ordering::Acquire)
    }

    /// Adds a reference and returns the new count.
    pub fn add_reference(&self) -> u32 {
        self.reference_count.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Removes a reference and returns the new count.
    ///
    /// The count saturates at zero. Releasing a record that holds no reference
    /// is a caller defect and panics in debug builds.
    pub fn remove_reference(&self) -> u32 {
        let previous = self
            .reference_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                Some(count.saturating_sub(1))
            })
            .unwrap_or_else(|count| count);
        debug_assert!(
            previous > 0,
            "reference count underflow on asset record {}",
            self.id
        );
        if previous == 0 {
            log::error!("Reference count underflow on asset record {}", self.id);
        }
        previous.saturating_sub(1)
    }

    /// The current load status.
    pub fn status(&self) -> AssetStatus {
        self.read().status
    }

    /// Sets the load status.
    pub fn set_status(&self, status: AssetStatus) {
        let mut state = self.write();
        debug_assert!(
            status != AssetStatus::Loaded || state.asset.is_some(),
            "asset record {} marked loaded without an attached asset",
            self.id
        );
        state.status = status;
    }

    /// Returns `true` if the loader reported at least one dependency.
    pub fn has_dependencies(&self) -> bool {
        !self.read().dependencies.is_empty()
    }

    /// The dependencies reported by the loader, in declaration order.
    pub fn dependencies(&self) -> Vec<AssetId> {
        self.read().dependencies.clone()
    }

    /// Replaces the dependency list.
    pub fn set_dependencies(&self, dependencies: Vec<AssetId>) {
        self.write().dependencies = dependencies;
    }

    /// Removes and returns the dependency list.
    pub fn take_dependencies(&self) -> Vec<AssetId> {
        std::mem::take(&mut self.write().dependencies)
    }

    /// Attaches the loaded instance.
    ///
    /// An asset may only be attached once between two unloads; attaching over an
    /// existing instance panics in debug builds and replaces it in release builds.
    pub fn set_asset(&self, asset: ErasedAsset) {
        let mut state = self.write();
        debug_assert!(
            state.asset.is_none(),
            "asset record {} already holds an asset",
            self.id
        );
        if state.asset.is_some() {
            log::error!("Asset record {} installed twice, replacing instance", self.id);
        }
        state.asset = Some(asset);
    }

    /// Detaches and returns the loaded instance, if any.
    pub fn take_asset(&self) -> Option<ErasedAsset> {
        self.write().asset.take()
    }

    /// Returns a shared reference to the type-erased instance.
    pub fn asset(&self) -> Option<ErasedAsset> {
        self.read().asset.clone()
    }

    /// Returns the loaded instance if it is of type `T`.
    pub fn asset_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.asset()?.downcast::<T>().ok()
    }

    fn read(&self) -> RwLockReadGuard<'_, RecordState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RecordState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for AssetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("AssetRecord")
            .field("id", &self.id)
            .field("status", &state.status)
            .field("reference_count", &self.reference_count())
            .field("dependencies", &state.dependencies)
            .field("has_asset", &state.asset.is_some())
            .finish()
    }
}
