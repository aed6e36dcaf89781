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

//! A single load or unload of one asset, driven one step per service tick.

use super::loader::{AssetLoaderRegistry, ErasedAssetLoader, PendingInstance};
use khora_core::{
    asset::{AssetHandle, AssetId, AssetRecord, AssetStatus, AssetTypeId},
    renderer::{GpuSyncPoint, GpuUploadContext},
};
use khora_io::VirtualFileSystem;
use khora_lanes::asset_lane::{InstallContext, LoadContext};
use std::{collections::HashSet, fmt, sync::Arc};
use thiserror::Error;

/// The operation a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Bring the asset and its dependencies in memory.
    Load,
    /// Tear the asset down and release its dependencies.
    Unload,
}

/// Where a request stands in its state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// Queued, waiting to be promoted to the active set.
    Pending,
    /// Decoding the asset file.
    Loading,
    /// Polling the dependencies until every one of them is loaded.
    WaitingForDependencies,
    /// Wiring the asset to its dependencies and waiting on GPU uploads.
    Installing,
    /// Tearing the asset down.
    Unloading,
    /// Finished.
    Complete,
    /// Finished without producing an asset.
    Failed(AssetRequestError),
}

/// Why a load request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetRequestError {
    /// No loader is registered for the asset's type tag.
    #[error("no loader registered for asset type '{0}'")]
    NoLoader(AssetTypeId),
    /// The asset file could not be read or its header could not be decoded.
    #[error("cannot read asset file for {id}: {reason}")]
    File {
        /// The asset being loaded.
        id: AssetId,
        /// The underlying I/O or codec error.
        reason: String,
    },
    /// The file header declares another asset type than the identifier.
    #[error("asset file for {id} holds a '{found}' asset, expected '{expected}'")]
    TypeMismatch {
        /// The asset being loaded.
        id: AssetId,
        /// The type derived from the identifier.
        expected: AssetTypeId,
        /// The type found in the file header.
        found: AssetTypeId,
    },
    /// The loader rejected the file body.
    #[error("loader failed to decode {id}: {reason}")]
    Decode {
        /// The asset being loaded.
        id: AssetId,
        /// The error reported by the loader.
        reason: String,
    },
    /// The loader failed to install the asset.
    #[error("loader failed to install {id}: {reason}")]
    Install {
        /// The asset being loaded.
        id: AssetId,
        /// The error reported by the loader.
        reason: String,
    },
    /// A dependency ended up in `LoadingFailed`.
    #[error("dependency {dependency} failed to load")]
    DependencyFailed {
        /// The dependency that failed.
        dependency: AssetId,
    },
    /// The asset waits, directly or transitively, on itself.
    #[error("asset is part of a dependency cycle")]
    DependencyCycle,
}

/// Issues the nested loads and unloads of dependencies.
///
/// Nested requests are only queued; they run on a later tick.
pub(crate) trait RequestScheduler {
    /// Takes a reference on `id` and returns a handle attached to its record.
    fn load_dependency(&self, id: &AssetId) -> AssetHandle;
    /// Releases a reference taken by [`RequestScheduler::load_dependency`].
    fn release_dependency(&self, id: &AssetId);
}

/// Everything a request needs to advance by one step.
pub(crate) struct RequestContext<'a> {
    pub(crate) loaders: &'a AssetLoaderRegistry,
    pub(crate) vfs: &'a VirtualFileSystem,
    pub(crate) gpu: Option<&'a dyn GpuUploadContext>,
    pub(crate) scheduler: &'a dyn RequestScheduler,
    /// Assets with a request queued or running at the start of the tick.
    pub(crate) in_flight: &'a HashSet<AssetId>,
}

/// One load or unload operation targeting one asset record.
pub(crate) struct AssetRequest {
    record: Arc<AssetRecord>,
    kind: RequestKind,
    state: RequestState,
    loader: Option<Arc<dyn ErasedAssetLoader>>,
    instance: Option<PendingInstance>,
    /// One handle per entry of the record's dependency list.
    dependency_handles: Vec<AssetHandle>,
    sync_points: Vec<GpuSyncPoint>,
    installed: bool,
}

impl AssetRequest {
    pub(crate) fn load(record: Arc<AssetRecord>) -> Self {
        Self::new(record, RequestKind::Load)
    }

    pub(crate) fn unload(record: Arc<AssetRecord>) -> Self {
        Self::new(record, RequestKind::Unload)
    }

    fn new(record: Arc<AssetRecord>, kind: RequestKind) -> Self {
        Self {
            record,
            kind,
            state: RequestState::Pending,
            loader: None,
            instance: None,
            dependency_handles: Vec::new(),
            sync_points: Vec::new(),
            installed: false,
        }
    }

    pub(crate) fn id(&self) -> &AssetId {
        self.record.id()
    }

    pub(crate) fn kind(&self) -> RequestKind {
        self.kind
    }

    pub(crate) fn state(&self) -> &RequestState {
        &self.state
    }

    pub(crate) fn record(&self) -> &Arc<AssetRecord> {
        &self.record
    }

    pub(crate) fn is_finished(&self) -> bool {
        matches!(self.state, RequestState::Complete | RequestState::Failed(_))
    }

    pub(crate) fn is_waiting(&self) -> bool {
        self.state == RequestState::WaitingForDependencies
    }

    /// Checks if the operation still makes sense for the record.
    ///
    /// A load is stale once every reference is gone or the asset is already
    /// loaded; an unload is stale once a reference came back or the asset is
    /// already unloaded.
    pub(crate) fn is_consistent(&self) -> bool {
        let references = self.record.reference_count();
        let status = self.record.status();
        match self.kind {
            RequestKind::Load => references > 0 && status != AssetStatus::Loaded,
            RequestKind::Unload => references == 0 && status != AssetStatus::Unloaded,
        }
    }

    /// Moves a promoted request out of `Pending`.
    pub(crate) fn begin(&mut self) {
        debug_assert_eq!(self.state, RequestState::Pending);
        let next = match self.kind {
            RequestKind::Load => RequestState::Loading,
            RequestKind::Unload => RequestState::Unloading,
        };
        self.transition(next);
    }

    /// The valid dependencies this request holds a reference on.
    pub(crate) fn dependency_ids(&self) -> impl Iterator<Item = &AssetId> {
        self.dependency_handles
            .iter()
            .map(AssetHandle::id)
            .filter(|id| id.is_valid())
    }

    /// Advances the state machine by one step.
    pub(crate) fn step(&mut self, ctx: &RequestContext<'_>) {
        match self.state {
            RequestState::Loading => self.run_load(ctx),
            RequestState::WaitingForDependencies => self.poll_dependencies(ctx),
            RequestState::Installing => self.run_install(ctx),
            RequestState::Unloading => self.run_unload(ctx),
            RequestState::Pending | RequestState::Complete | RequestState::Failed(_) => {}
        }
    }

    /// Terminates a load, undoing everything it did to the cache.
    ///
    /// Dependency references taken by the request are released and the record
    /// is marked `LoadingFailed`. The caller's references are left untouched.
    pub(crate) fn fail(&mut self, ctx: &RequestContext<'_>, error: AssetRequestError) {
        log::warn!("Loading {} failed: {}", self.record.id(), error);

        for handle in self.dependency_handles.drain(..) {
            if handle.id().is_valid() {
                ctx.scheduler.release_dependency(handle.id());
            }
        }
        self.record.set_dependencies(Vec::new());
        self.sync_points.clear();

        if let Some(instance) = self.instance.take() {
            // Install may have started GPU work that needs tearing down.
            if let (true, Some(loader)) = (self.installed, &self.loader) {
                loader.unload_any(self.record.id(), Arc::from(instance));
            }
        }

        if self.kind == RequestKind::Load {
            self.record.set_status(AssetStatus::LoadingFailed);
        }
        self.transition(RequestState::Failed(error));
    }

    fn run_load(&mut self, ctx: &RequestContext<'_>) {
        let id = self.record.id().clone();
        if !id.is_valid() {
            log::debug!("Empty asset reference, nothing to load");
            self.record.set_status(AssetStatus::LoadingFailed);
            self.transition(RequestState::Complete);
            return;
        }

        if let Err(error) = self.decode(ctx, &id) {
            self.fail(ctx, error);
            return;
        }

        let dependencies = self.record.dependencies();
        if dependencies.is_empty() {
            self.transition(RequestState::Installing);
            return;
        }

        self.dependency_handles = dependencies
            .iter()
            .map(|dependency| {
                if dependency.is_valid() {
                    ctx.scheduler.load_dependency(dependency)
                } else {
                    AssetHandle::new(dependency.clone())
                }
            })
            .collect();
        self.transition(RequestState::WaitingForDependencies);
    }

    fn decode(&mut self, ctx: &RequestContext<'_>, id: &AssetId) -> Result<(), AssetRequestError> {
        let loader = ctx
            .loaders
            .get(id.type_id())
            .ok_or(AssetRequestError::NoLoader(id.type_id()))?;

        let file = ctx
            .vfs
            .read_asset_file(id)
            .map_err(|e| AssetRequestError::File {
                id: id.clone(),
                reason: e.to_string(),
            })?;

        let found = file.header().type_id;
        if found != id.type_id() {
            return Err(AssetRequestError::TypeMismatch {
                id: id.clone(),
                expected: id.type_id(),
                found,
            });
        }

        let mut instance = loader.create_any(id);
        let mut dependencies = file.header().dependencies.clone();
        let mut load_ctx = LoadContext::new(id, &file, &mut dependencies);
        loader
            .load_any(&mut load_ctx, instance.as_mut())
            .map_err(|e| AssetRequestError::Decode {
                id: id.clone(),
                reason: e.to_string(),
            })?;

        log::trace!("{} decoded with {} dependencies", id, dependencies.len());
        self.record.set_dependencies(dependencies);
        self.loader = Some(loader);
        self.instance = Some(instance);
        Ok(())
    }

    fn poll_dependencies(&mut self, ctx: &RequestContext<'_>) {
        let mut ready = true;
        let mut failed = None;

        for handle in &self.dependency_handles {
            let dependency = handle.id();
            if !dependency.is_valid() {
                continue;
            }
            // A queued or running request may still change the status.
            if ctx.in_flight.contains(dependency) {
                ready = false;
                continue;
            }
            match handle.status() {
                AssetStatus::Loaded => {}
                AssetStatus::LoadingFailed => {
                    failed = Some(dependency.clone());
                    break;
                }
                AssetStatus::Unloaded => ready = false,
            }
        }

        if let Some(dependency) = failed {
            self.fail(ctx, AssetRequestError::DependencyFailed { dependency });
        } else if ready {
            self.transition(RequestState::Installing);
        }
    }

    fn run_install(&mut self, ctx: &RequestContext<'_>) {
        if !self.installed {
            self.installed = true;
            if let Err(error) = self.install(ctx) {
                self.fail(ctx, error);
                return;
            }
        }

        let outstanding = self.sync_points.iter().filter(|p| !p.is_reached()).count();
        if outstanding > 0 {
            log::trace!(
                "{} waiting on {} GPU sync point(s)",
                self.record.id(),
                outstanding
            );
            return;
        }
        self.sync_points.clear();

        let Some(instance) = self.instance.take() else {
            let error = AssetRequestError::Install {
                id: self.record.id().clone(),
                reason: "no decoded instance".to_owned(),
            };
            self.fail(ctx, error);
            return;
        };
        self.record.set_asset(Arc::from(instance));
        self.record.set_status(AssetStatus::Loaded);
        self.dependency_handles.clear();
        self.transition(RequestState::Complete);
    }

    fn install(&mut self, ctx: &RequestContext<'_>) -> Result<(), AssetRequestError> {
        let id = self.record.id();
        let install_error = |reason: String| AssetRequestError::Install {
            id: id.clone(),
            reason,
        };

        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| install_error("no loader attached".to_owned()))?;
        let instance = self
            .instance
            .as_mut()
            .ok_or_else(|| install_error("no decoded instance".to_owned()))?;

        let mut install_ctx =
            InstallContext::new(id, &self.dependency_handles, ctx.gpu, &mut self.sync_points);
        loader
            .install_any(&mut install_ctx, instance.as_mut())
            .map_err(|e| install_error(e.to_string()))
    }

    fn run_unload(&mut self, ctx: &RequestContext<'_>) {
        let id = self.record.id().clone();

        if let Some(asset) = self.record.take_asset() {
            match ctx.loaders.get(id.type_id()) {
                Some(loader) => loader.unload_any(&id, asset),
                None => log::warn!(
                    "No loader for asset type '{}' to unload {}, dropping it",
                    id.type_id(),
                    id
                ),
            }
        }

        for dependency in self.record.take_dependencies() {
            if dependency.is_valid() {
                ctx.scheduler.release_dependency(&dependency);
            }
        }
        self.record.set_status(AssetStatus::Unloaded);
        self.transition(RequestState::Complete);
    }

    fn transition(&mut self, next: RequestState) {
        log::trace!(
            "{:?} {}: {:?} -> {:?}",
            self.kind,
            self.record.id(),
            self.state,
            next
        );
        self.state = next;
    }
}

impl fmt::Debug for AssetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRequest")
            .field("id", self.record.id())
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("dependencies", &self.dependency_handles.len())
            .field("sync_points", &self.sync_points.len())
            .finish()
    }
}
