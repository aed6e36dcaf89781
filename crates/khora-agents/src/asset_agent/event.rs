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

use khora_core::asset::AssetId;

/// A notification published when a request finishes.
///
/// Polling a handle's status remains authoritative; events only save clients
/// from polling every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetEvent {
    /// The asset and all of its dependencies are loaded and installed.
    Loaded(AssetId),
    /// Loading ended in `LoadingFailed`.
    Failed(AssetId),
    /// The asset was torn down after its last reference was released.
    Unloaded(AssetId),
}

impl AssetEvent {
    /// The asset the event is about.
    pub fn id(&self) -> &AssetId {
        match self {
            Self::Loaded(id) | Self::Failed(id) | Self::Unloaded(id) => id,
        }
    }
}
