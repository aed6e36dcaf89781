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

//! The views of the pipeline handed to loaders during `load` and `install`.

use khora_core::{
    asset::{AssetHandle, AssetId},
    renderer::{GpuSyncPoint, GpuUploadContext},
};
use khora_io::{AssetFile, AssetFileHeader};

/// What a loader sees while decoding an asset file.
pub struct LoadContext<'a> {
    id: &'a AssetId,
    file: &'a AssetFile,
    dependencies: &'a mut Vec<AssetId>,
}

impl<'a> LoadContext<'a> {
    /// Creates a context for decoding `file` as the asset `id`.
    ///
    /// `dependencies` should already hold the dependencies declared by the
    /// file header; the loader appends to it.
    pub fn new(id: &'a AssetId, file: &'a AssetFile, dependencies: &'a mut Vec<AssetId>) -> Self {
        Self {
            id,
            file,
            dependencies,
        }
    }

    /// The asset being loaded.
    pub fn id(&self) -> &AssetId {
        self.id
    }

    /// The file's header.
    pub fn header(&self) -> &AssetFileHeader {
        self.file.header()
    }

    /// The uncompressed file body.
    pub fn body(&self) -> &[u8] {
        self.file.body()
    }

    /// The dependencies collected so far.
    pub fn dependencies(&self) -> &[AssetId] {
        self.dependencies.as_slice()
    }

    /// Declares an additional dependency, unless it is already listed.
    pub fn add_dependency(&mut self, id: AssetId) {
        if !self.dependencies.contains(&id) {
            log::trace!("{} declares dependency on {}", self.id, id);
            self.dependencies.push(id);
        }
    }
}

/// What a loader sees while installing an asset.
pub struct InstallContext<'a> {
    id: &'a AssetId,
    dependencies: &'a [AssetHandle],
    gpu: Option<&'a dyn GpuUploadContext>,
    sync_points: &'a mut Vec<GpuSyncPoint>,
}

impl<'a> InstallContext<'a> {
    /// Creates a context for installing the asset `id`.
    pub fn new(
        id: &'a AssetId,
        dependencies: &'a [AssetHandle],
        gpu: Option<&'a dyn GpuUploadContext>,
        sync_points: &'a mut Vec<GpuSyncPoint>,
    ) -> Self {
        Self {
            id,
            dependencies,
            gpu,
            sync_points,
        }
    }

    /// The asset being installed.
    pub fn id(&self) -> &AssetId {
        self.id
    }

    /// Handles to the dependencies, one per entry of the record's dependency
    /// list, in the same order. Every valid dependency is loaded.
    pub fn dependencies(&self) -> &[AssetHandle] {
        self.dependencies
    }

    /// Returns the handle for dependency `id`, if it was declared.
    pub fn dependency(&self, id: &AssetId) -> Option<&AssetHandle> {
        self.dependencies.iter().find(|handle| handle.id() == id)
    }

    /// The GPU upload context, if the pipeline runs with a graphics backend.
    pub fn gpu(&self) -> Option<&'a dyn GpuUploadContext> {
        self.gpu
    }

    /// Holds the asset back until `sync_point` is reached.
    pub fn wait_for(&mut self, sync_point: GpuSyncPoint) {
        self.sync_points.push(sync_point);
    }
}
