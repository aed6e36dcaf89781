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

use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A four-byte tag identifying the kind of an asset (e.g. `smsh`, `skel`).
///
/// The tag is derived from the fixed-width extension at the end of an asset
/// path and is used to select the loader responsible for the asset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AssetTypeId([u8; 4]);

impl AssetTypeId {
    /// The "no type" tag. Never valid.
    pub const NONE: Self = Self([0; 4]);

    /// Creates a type tag from its four raw bytes.
    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }

    /// Derives the type tag from the trailing four bytes of `path`.
    ///
    /// Paths shorter than four bytes have no extension and yield [`AssetTypeId::NONE`].
    pub fn from_path(path: &str) -> Self {
        let bytes = path.as_bytes();
        if bytes.len() < 4 {
            return Self::NONE;
        }
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&bytes[bytes.len() - 4..]);
        Self(tag)
    }

    /// Returns `true` if the tag is non-zero.
    pub const fn is_valid(&self) -> bool {
        u32::from_le_bytes(self.0) != 0
    }

    /// Returns the raw bytes of the tag.
    pub const fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Returns the tag packed into a little-endian `u32`.
    pub const fn to_u32(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl fmt::Display for AssetTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "<none>");
        }
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for AssetTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetTypeId({self})")
    }
}

/// The identity of an asset: its path inside the content root and the type tag
/// derived from that path.
///
/// Equality, ordering and hashing only consider the path; the type tag is a pure
/// function of it. A default-constructed `AssetId` is the explicit "no asset"
/// sentinel and reports `false` from [`AssetId::is_valid`].
///
/// Cloning is cheap: the path is shared behind an `Arc<str>`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AssetId {
    path: Arc<str>,
    type_id: AssetTypeId,
}

impl AssetId {
    /// Creates an identifier from an asset path.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        Self {
            type_id: AssetTypeId::from_path(path),
            path: Arc::from(path),
        }
    }

    /// The asset's path, relative to the content root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The type tag derived from the path.
    pub fn type_id(&self) -> AssetTypeId {
        self.type_id
    }

    /// Returns `true` if the path is non-empty and the type tag is non-zero.
    pub fn is_valid(&self) -> bool {
        !self.path.is_empty() && self.type_id.is_valid()
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self {
            path: Arc::from(""),
            type_id: AssetTypeId::NONE,
        }
    }
}

impl PartialEq for AssetId {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for AssetId {}

impl Hash for AssetId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for AssetId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AssetId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl From<&str> for AssetId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for AssetId {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.path.to_string()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<none>")
        } else {
            write!(f, "{}", self.path)
        }
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({:?})", &*self.path)
    }
}
