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

use super::{AssetId, AssetRecord, AssetStatus};
use std::{
    any::Any,
    sync::{Arc, Weak},
};

/// A lightweight, non-owning reference to an asset.
///
/// A handle carries the [`AssetId`] it was created for and, once the asset
/// service has loaded it, a weak link to the shared [`AssetRecord`]. Handles
/// never own the record. Each load taken through a handle is counted on the
/// handle, so only that handle can give it back.
///
/// Cloning is cheap. A clone observes the same record but holds no load of
/// its own.
#[derive(Debug, Default)]
pub struct AssetHandle {
    id: AssetId,
    record: Option<Weak<AssetRecord>>,
    loads: u32,
}

impl Clone for AssetHandle {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            record: self.record.clone(),
            loads: 0,
        }
    }
}

impl AssetHandle {
    /// Creates a detached handle for `id`.
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            record: None,
            loads: 0,
        }
    }

    /// Creates a detached handle for the asset at `path`.
    pub fn from_path(path: impl AsRef<str>) -> Self {
        Self::new(AssetId::new(path))
    }

    /// The identifier this handle refers to.
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    /// Links the handle to its record and counts one load taken through it.
    /// Called by the asset service.
    pub fn attach(&mut self, record: &Arc<AssetRecord>) {
        debug_assert_eq!(record.id(), &self.id, "handle attached to a foreign record");
        self.record = Some(Arc::downgrade(record));
        self.loads = self.loads.saturating_add(1);
    }

    /// Gives back one load taken through this handle, unlinking it from its
    /// record once none remain. Called by the asset service.
    ///
    /// Returns `false`, leaving the handle untouched, if it holds no load.
    pub fn detach(&mut self) -> bool {
        if self.loads == 0 {
            return false;
        }
        self.loads -= 1;
        if self.loads == 0 {
            self.record = None;
        }
        true
    }

    /// The number of loads taken through this handle and not yet given back.
    pub fn load_count(&self) -> u32 {
        self.loads
    }

    /// Returns `true` while the handle is linked to a record.
    pub fn is_attached(&self) -> bool {
        self.record().is_some()
    }

    /// Upgrades the weak link to the record, if attached.
    pub fn record(&self) -> Option<Arc<AssetRecord>> {
        self.record.as_ref().and_then(Weak::upgrade)
    }

    /// The record's status, or [`AssetStatus::Unloaded`] for a detached handle.
    pub fn status(&self) -> AssetStatus {
        self.record()
            .map_or(AssetStatus::Unloaded, |record| record.status())
    }

    /// Returns `true` if the asset can be used.
    pub fn is_loaded(&self) -> bool {
        self.status() == AssetStatus::Loaded
    }

    /// The record's reference count, or zero for a detached handle.
    pub fn reference_count(&self) -> u32 {
        self.record().map_or(0, |record| record.reference_count())
    }

    /// Returns the loaded asset as `T`.
    ///
    /// Returns `None` if the handle is detached, the asset is not loaded yet, or
    /// the asset is of another type.
    pub fn asset<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let record = self.record()?;
        if record.status() != AssetStatus::Loaded {
            return None;
        }
        record.asset_as::<T>()
    }
}
