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

use super::error::UploadError;
use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// A monotonically increasing GPU timeline, as exposed by the graphics backend.
pub trait TimelineSemaphore: Send + Sync + Debug {
    /// Returns the last value the GPU signalled. Must not block.
    fn current_value(&self) -> u64;
}

/// The queue a submission runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuQueue {
    /// The main graphics queue.
    Graphics,
    /// The dedicated transfer queue, if the device has one.
    Transfer,
}

/// A `(semaphore, target value)` pair marking the completion of GPU work.
#[derive(Debug, Clone)]
pub struct GpuSyncPoint {
    semaphore: Arc<dyn TimelineSemaphore>,
    target: u64,
}

impl GpuSyncPoint {
    /// Creates a sync point that is reached once `semaphore` reaches `target`.
    pub fn new(semaphore: Arc<dyn TimelineSemaphore>, target: u64) -> Self {
        Self { semaphore, target }
    }

    /// The value the semaphore must reach.
    pub fn target(&self) -> u64 {
        self.target
    }

    /// Returns `true` once the GPU work guarded by this point has finished.
    pub fn is_reached(&self) -> bool {
        self.semaphore.current_value() >= self.target
    }
}

/// Describes the layout of an image upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageUpload {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Size of one texel in bytes.
    pub bytes_per_texel: u32,
}

impl ImageUpload {
    /// The number of bytes this image occupies.
    pub fn byte_size(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_texel as usize
    }
}

/// The capability handed to loaders to stage GPU uploads during installation.
pub trait GpuUploadContext: Send + Sync {
    /// Copies `data` into a GPU buffer through staging memory.
    /// ## Arguments
    /// * `label` - A debug label for the upload.
    /// * `data` - The bytes to upload.
    /// ## Returns
    /// The sync point that is reached once the copy has completed on the GPU.
    /// ## Errors
    /// * `UploadError` - If the data could not be staged or submitted.
    fn upload_buffer(&self, label: &str, data: &[u8]) -> Result<GpuSyncPoint, UploadError>;

    /// Copies `data` into a GPU image through staging memory.
    /// ## Arguments
    /// * `label` - A debug label for the upload.
    /// * `image` - The layout of the destination image.
    /// * `data` - The texel data, tightly packed.
    /// ## Returns
    /// The sync point that is reached once the copy has completed on the GPU.
    /// ## Errors
    /// * `UploadError` - If the data does not match `image` or could not be submitted.
    fn upload_image(
        &self,
        label: &str,
        image: ImageUpload,
        data: &[u8],
    ) -> Result<GpuSyncPoint, UploadError>;

    /// Returns the sync point of the submission currently being recorded on `queue`.
    fn current_submission(&self, queue: GpuQueue) -> GpuSyncPoint;
}

/// A CPU-side timeline semaphore.
///
/// Used by headless backends and tests in place of a real GPU timeline.
#[derive(Debug, Default)]
pub struct AtomicTimelineSemaphore {
    value: AtomicU64,
}

impl AtomicTimelineSemaphore {
    /// Creates a semaphore starting at `initial`.
    pub fn new(initial: u64) -> Self {
        Self {
            value: AtomicU64::new(initial),
        }
    }

    /// Advances the timeline to `value`. Lower values are ignored.
    pub fn signal(&self, value: u64) {
        self.value.fetch_max(value, Ordering::AcqRel);
    }
}

impl TimelineSemaphore for AtomicTimelineSemaphore {
    fn current_value(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }
}
