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

//! An append-only, index-stable arena of asset records.

use khora_core::asset::{AssetId, AssetRecord};
use std::{collections::HashMap, sync::Arc};

/// The stable index of a record inside [`AssetRecords`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RecordIndex(u32);

impl RecordIndex {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The central cache of asset records, one per distinct [`AssetId`].
///
/// Slots are only ever appended: a record keeps its index and its address for
/// the lifetime of the storage, so requests and handles can keep references to
/// it while the lookup map grows and rehashes. The `AssetId → RecordIndex` map is
/// kept separate from the slots for that reason.
#[derive(Debug, Default)]
pub struct AssetRecords {
    slots: Vec<Arc<AssetRecord>>,
    lookup: HashMap<AssetId, RecordIndex>,
}

impl AssetRecords {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `id`, creating an unloaded one if absent.
    pub fn get_or_insert(&mut self, id: &AssetId) -> &Arc<AssetRecord> {
        if let Some(&index) = self.lookup.get(id) {
            return &self.slots[index.index()];
        }

        let index = RecordIndex(self.slots.len() as u32);
        log::debug!("Creating asset record {} at slot {}", id, index.0);
        self.slots.push(Arc::new(AssetRecord::new(id.clone())));
        self.lookup.insert(id.clone(), index);
        &self.slots[index.index()]
    }

    /// Looks up the record for `id`.
    pub fn get(&self, id: &AssetId) -> Option<&Arc<AssetRecord>> {
        self.lookup
            .get(id)
            .map(|index| &self.slots[index.index()])
    }

    /// The number of records ever created.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no record has been created yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
