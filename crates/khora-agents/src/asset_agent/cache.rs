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

//! The shared half of the service: the record arena and the pending queue.

use super::request::{AssetRequest, RequestScheduler};
use khora_core::asset::{AssetHandle, AssetId, AssetRecord};
use khora_data::assets::AssetRecords;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

/// Records and queued requests, guarded together by the service's cache lock.
#[derive(Debug, Default)]
pub(crate) struct AssetCache {
    records: AssetRecords,
    pending: VecDeque<AssetRequest>,
}

impl AssetCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attaches `handle` to its record and takes a reference on it.
    ///
    /// The first reference queues a load request.
    pub(crate) fn acquire(&mut self, handle: &mut AssetHandle) -> Arc<AssetRecord> {
        let record = Arc::clone(self.records.get_or_insert(handle.id()));
        handle.attach(&record);

        if record.add_reference() == 1 {
            log::trace!("Queueing load of {}", record.id());
            self.pending.push_back(AssetRequest::load(Arc::clone(&record)));
        }
        record
    }

    /// Releases one reference on `id`. The last reference queues an unload
    /// request.
    ///
    /// Releasing an asset that holds no reference is a caller defect: it
    /// panics in debug builds and is ignored otherwise. Returns `false` in that
    /// case.
    pub(crate) fn release(&mut self, id: &AssetId) -> bool {
        let record = self.records.get(id).cloned();
        debug_assert!(record.is_some(), "release of unknown asset {id}");
        let Some(record) = record else {
            log::error!("Ignoring release of unknown asset {}", id);
            return false;
        };

        let references = record.reference_count();
        debug_assert!(references > 0, "release of unreferenced asset {id}");
        if references == 0 {
            log::error!("Ignoring release of unreferenced asset {}", id);
            return false;
        }

        if record.remove_reference() == 0 {
            log::trace!("Queueing unload of {}", id);
            self.pending.push_back(AssetRequest::unload(record));
        }
        true
    }

    pub(crate) fn record(&self, id: &AssetId) -> Option<&Arc<AssetRecord>> {
        self.records.get(id)
    }

    pub(crate) fn records(&self) -> &AssetRecords {
        &self.records
    }

    pub(crate) fn pending(&self) -> &VecDeque<AssetRequest> {
        &self.pending
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Hands the whole pending queue over to the promotion pass.
    pub(crate) fn take_pending(&mut self) -> VecDeque<AssetRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Puts back the requests the promotion pass left pending, ahead of the
    /// ones queued meanwhile.
    pub(crate) fn restore_pending(&mut self, mut kept: VecDeque<AssetRequest>) {
        kept.append(&mut self.pending);
        self.pending = kept;
    }
}

impl RequestScheduler for Mutex<AssetCache> {
    fn load_dependency(&self, id: &AssetId) -> AssetHandle {
        let mut handle = AssetHandle::new(id.clone());
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .acquire(&mut handle);
        handle
    }

    fn release_dependency(&self, id: &AssetId) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .release(id);
    }
}
