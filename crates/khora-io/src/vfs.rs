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

//! Virtual File System (VFS) module mapping asset identifiers to file contents.
//!
//! This module provides the [`VirtualFileSystem`] struct, the single place the
//! asset pipeline reads asset files from. Paths carried by an
//! [`AssetId`] are resolved against an optional content root on disk. Files can
//! also be mounted in memory, which takes precedence over the disk; this is used
//! for generated content and by tests.

use crate::{asset_file::AssetFile, error::AssetIoError};
use khora_core::asset::AssetId;
use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

/// The runtime view of the asset content available to the engine.
#[derive(Debug, Default)]
pub struct VirtualFileSystem {
    /// The directory asset paths are resolved against, if any.
    root: Option<PathBuf>,
    /// Files mounted in memory. Looked up before the disk.
    overlay: RwLock<HashMap<AssetId, Arc<[u8]>>>,
}

impl VirtualFileSystem {
    /// Creates a VFS resolving asset paths against the `root` directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        log::info!("VirtualFileSystem rooted at '{}'", root.display());
        Self {
            root: Some(root),
            overlay: RwLock::default(),
        }
    }

    /// Creates a VFS with no backing directory; only mounted files exist.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// The content root, if the VFS is backed by a directory.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Mounts `bytes` in memory under `id`, replacing any previous mount.
    pub fn mount(&self, id: AssetId, bytes: impl Into<Arc<[u8]>>) {
        log::trace!("Mounting '{}' in memory", id);
        self.overlay
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, bytes.into());
    }

    /// Removes an in-memory mount. Returns `true` if one existed.
    pub fn unmount(&self, id: &AssetId) -> bool {
        self.overlay
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Returns the on-disk location of `id`, if the VFS has a content root.
    ///
    /// Paths that are absolute or climb out of the root with `..` have no
    /// location.
    pub fn resolve_path(&self, id: &AssetId) -> Option<PathBuf> {
        let root = self.root.as_ref()?;
        let relative = Path::new(id.path());
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            log::warn!("Asset path '{}' escapes the content root", id);
            return None;
        }
        Some(root.join(relative))
    }

    /// Checks if a file exists for `id`, in memory or on disk.
    pub fn exists(&self, id: &AssetId) -> bool {
        if !id.is_valid() {
            return false;
        }
        if self.mounted(id).is_some() {
            return true;
        }
        self.resolve_path(id).is_some_and(|path| path.is_file())
    }

    /// Reads the raw bytes of the file behind `id`.
    ///
    /// # Errors
    /// Returns [`AssetIoError::NotFound`] if neither a mount nor a file exists, or
    /// [`AssetIoError::Io`] if the file could not be read.
    pub fn read(&self, id: &AssetId) -> Result<Arc<[u8]>, AssetIoError> {
        if !id.is_valid() {
            return Err(AssetIoError::NotFound(id.clone()));
        }
        if let Some(bytes) = self.mounted(id) {
            return Ok(bytes);
        }

        let path = self
            .resolve_path(id)
            .ok_or_else(|| AssetIoError::NotFound(id.clone()))?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes.into()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AssetIoError::NotFound(id.clone())),
            Err(source) => Err(AssetIoError::Io {
                id: id.clone(),
                source,
            }),
        }
    }

    /// Reads and decodes the asset file behind `id`.
    ///
    /// # Errors
    /// Returns any error from [`VirtualFileSystem::read`] or [`AssetFile::decode`].
    pub fn read_asset_file(&self, id: &AssetId) -> Result<AssetFile, AssetIoError> {
        let bytes = self.read(id)?;
        AssetFile::decode(&bytes)
    }

    fn mounted(&self, id: &AssetId) -> Option<Arc<[u8]>> {
        self.overlay
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}
