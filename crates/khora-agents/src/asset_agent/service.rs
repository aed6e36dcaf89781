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

//! The orchestrator of the asset pipeline.

use super::{
    cache::AssetCache,
    config::AssetServiceConfig,
    event::AssetEvent,
    loader::AssetLoaderRegistry,
    request::{AssetRequest, AssetRequestError, RequestContext, RequestKind, RequestState},
};
use flume::{Receiver, Sender};
use khora_core::{
    asset::{Asset, AssetHandle, AssetId, AssetRecord, AssetStatus, AssetTypeId},
    graph::topological_sort,
    renderer::GpuUploadContext,
};
use khora_io::VirtualFileSystem;
use khora_lanes::asset_lane::AssetLoader;
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

/// Loads, reference-counts and unloads assets along with their dependencies.
///
/// [`AssetService::load`] and [`AssetService::unload`] can be called from any
/// thread; they only touch the record cache and queue requests. Nothing
/// progresses until [`AssetService::update`] runs, which advances every active
/// request by one step. At most one request per asset is active at a time,
/// and requests targeting the same asset run in the order they were queued.
pub struct AssetService {
    config: AssetServiceConfig,
    vfs: VirtualFileSystem,
    loaders: AssetLoaderRegistry,
    gpu: Option<Arc<dyn GpuUploadContext>>,
    /// Records and pending requests. Never held while a loader runs.
    cache: Mutex<AssetCache>,
    /// Requests being driven by `update`. Locked before `cache`.
    active: Mutex<Vec<AssetRequest>>,
    event_sender: Sender<AssetEvent>,
    event_receiver: Receiver<AssetEvent>,
    tick_count: AtomicU64,
}

impl AssetService {
    /// Creates a service reading asset files below `config.content_root`.
    pub fn new(config: AssetServiceConfig) -> Self {
        let vfs = VirtualFileSystem::new(&config.content_root);
        let (event_sender, event_receiver) = flume::unbounded();
        Self {
            config,
            vfs,
            loaders: AssetLoaderRegistry::new(),
            gpu: None,
            cache: Mutex::new(AssetCache::new()),
            active: Mutex::new(Vec::new()),
            event_sender,
            event_receiver,
            tick_count: AtomicU64::new(0),
        }
    }

    /// Replaces the file system the service reads from.
    pub fn with_vfs(mut self, vfs: VirtualFileSystem) -> Self {
        self.vfs = vfs;
        self
    }

    /// Gives loaders access to GPU uploads during installation.
    pub fn with_gpu_context(mut self, gpu: Arc<dyn GpuUploadContext>) -> Self {
        self.gpu = Some(gpu);
        self
    }

    /// Registers the loader for assets whose identifier ends in `type_id`.
    pub fn register_loader<A: Asset>(
        &mut self,
        type_id: AssetTypeId,
        loader: impl AssetLoader<A> + 'static,
    ) {
        self.loaders.register::<A>(type_id, loader);
    }

    /// Checks if a loader is registered for `type_id`.
    pub fn has_loader(&self, type_id: AssetTypeId) -> bool {
        self.loaders.contains(type_id)
    }

    /// The configuration the service was created with.
    pub fn config(&self) -> &AssetServiceConfig {
        &self.config
    }

    /// The file system asset files are read from.
    pub fn vfs(&self) -> &VirtualFileSystem {
        &self.vfs
    }

    /// A receiver for the lifecycle events, if enabled in the configuration.
    pub fn events(&self) -> Receiver<AssetEvent> {
        self.event_receiver.clone()
    }

    /// Takes a reference on the handle's asset and attaches the handle to its
    /// record.
    ///
    /// The first reference queues a load. Each call must be matched by one
    /// [`AssetService::unload`].
    pub fn load(&self, handle: &mut AssetHandle) {
        self.lock_cache().acquire(handle);
    }

    /// Creates a handle for `path` and loads it.
    pub fn load_path(&self, path: impl AsRef<str>) -> AssetHandle {
        let mut handle = AssetHandle::from_path(path);
        self.load(&mut handle);
        handle
    }

    /// Releases one reference taken through `handle` by a previous
    /// [`AssetService::load`]. The handle detaches once all its loads are
    /// given back.
    ///
    /// Releasing the last reference queues an unload. Unloading a handle that
    /// holds no load (never loaded, already unloaded, or a clone) is a caller
    /// defect: it panics in debug builds and is ignored otherwise.
    pub fn unload(&self, handle: &mut AssetHandle) {
        let held = handle.detach();
        debug_assert!(held, "unload of handle {} holding no load", handle.id());
        if !held {
            log::error!("Ignoring unload of handle {} holding no load", handle.id());
            return;
        }
        self.lock_cache().release(handle.id());
    }

    /// Advances the pipeline by one tick.
    ///
    /// Promotes pending requests to the active set, steps every active request
    /// once, fails dependency cycles and retires finished requests.
    pub fn update(&self) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        let in_flight = {
            let mut cache = self.lock_cache();
            self.promote(&mut cache, &mut active);

            let in_flight: HashSet<AssetId> = active
                .iter()
                .chain(cache.pending())
                .map(|request| request.id().clone())
                .collect();
            in_flight
        };

        let ctx = RequestContext {
            loaders: &self.loaders,
            vfs: &self.vfs,
            gpu: self.gpu.as_deref(),
            scheduler: &self.cache,
            in_flight: &in_flight,
        };

        for request in active.iter_mut() {
            request.step(&ctx);
        }

        if self.config.detect_dependency_cycles {
            fail_dependency_cycles(&mut active, &ctx);
        }

        let mut finished = Vec::new();
        active.retain(|request| {
            if request.is_finished() {
                finished.push(self.finished_event(request));
                false
            } else {
                true
            }
        });
        drop(active);

        if !finished.is_empty() {
            log::trace!("Tick {}: {} request(s) finished", tick, finished.len());
        }
        if self.config.emit_events {
            for event in finished {
                if self.event_sender.send(event).is_err() {
                    log::warn!("Asset event channel closed");
                    break;
                }
            }
        }
    }

    /// Moves pending requests to the active set, in queue order.
    ///
    /// A request stays pending while another request for the same asset is
    /// active or queued ahead of it, or once the promotion budget is spent.
    /// Requests the record no longer calls for are dropped.
    fn promote(&self, cache: &mut AssetCache, active: &mut Vec<AssetRequest>) {
        let mut blocked: HashSet<AssetId> =
            active.iter().map(|request| request.id().clone()).collect();
        let mut kept = VecDeque::new();
        let mut promoted = 0;

        for mut request in cache.take_pending() {
            if promoted >= self.config.promotion_budget_per_tick
                || blocked.contains(request.id())
            {
                blocked.insert(request.id().clone());
                kept.push_back(request);
                continue;
            }

            if !request.is_consistent() {
                log::debug!(
                    "Dropping stale {:?} request for {} ({:?}, {} reference(s))",
                    request.kind(),
                    request.id(),
                    request.record().status(),
                    request.record().reference_count()
                );
                continue;
            }

            log::debug!("Starting {:?} of {}", request.kind(), request.id());
            request.begin();
            blocked.insert(request.id().clone());
            active.push(request);
            promoted += 1;
        }

        cache.restore_pending(kept);
        debug_assert!(
            has_exclusive_requests(active),
            "more than one active request for an asset"
        );
    }

    fn finished_event(&self, request: &AssetRequest) -> AssetEvent {
        let id = request.id().clone();
        match (request.kind(), request.state()) {
            (RequestKind::Unload, _) => {
                log::debug!("Unloaded {}", id);
                AssetEvent::Unloaded(id)
            }
            (RequestKind::Load, RequestState::Complete)
                if request.record().status() == AssetStatus::Loaded =>
            {
                log::debug!("Loaded {}", id);
                AssetEvent::Loaded(id)
            }
            (RequestKind::Load, _) => AssetEvent::Failed(id),
        }
    }

    /// The status of `id`, or `Unloaded` if it was never requested.
    pub fn status(&self, id: &AssetId) -> AssetStatus {
        self.record(id)
            .map_or(AssetStatus::Unloaded, |record| record.status())
    }

    /// The number of live references to `id`.
    pub fn reference_count(&self, id: &AssetId) -> u32 {
        self.record(id).map_or(0, |record| record.reference_count())
    }

    /// The cached record of `id`, if it was ever requested.
    pub fn record(&self, id: &AssetId) -> Option<Arc<AssetRecord>> {
        self.lock_cache().record(id).cloned()
    }

    /// The number of distinct assets ever requested.
    pub fn record_count(&self) -> usize {
        self.lock_cache().records().len()
    }

    /// The number of requests waiting to be promoted.
    pub fn pending_request_count(&self) -> usize {
        self.lock_cache().pending_len()
    }

    /// The number of requests being driven.
    pub fn active_request_count(&self) -> usize {
        self.lock_active().len()
    }

    /// The assets targeted by the active requests.
    pub fn active_request_ids(&self) -> Vec<AssetId> {
        self.lock_active()
            .iter()
            .map(|request| request.id().clone())
            .collect()
    }

    /// The state of the active request targeting `id`, if any.
    pub fn active_request_state(&self, id: &AssetId) -> Option<RequestState> {
        self.lock_active()
            .iter()
            .find(|request| request.id() == id)
            .map(|request| request.state().clone())
    }

    /// Checks if no request is queued or running.
    pub fn is_idle(&self) -> bool {
        let active = self.lock_active();
        active.is_empty() && self.lock_cache().pending_len() == 0
    }

    /// The number of `update` calls so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    fn lock_cache(&self) -> MutexGuard<'_, AssetCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_active(&self) -> MutexGuard<'_, Vec<AssetRequest>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AssetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetService")
            .field("config", &self.config)
            .field("vfs", &self.vfs)
            .field("gpu", &self.gpu.is_some())
            .field("tick_count", &self.tick_count())
            .finish_non_exhaustive()
    }
}

fn has_exclusive_requests(active: &[AssetRequest]) -> bool {
    let mut seen = HashSet::with_capacity(active.len());
    active.iter().all(|request| seen.insert(request.id()))
}

/// Fails the waiting requests that can never be satisfied because their
/// dependencies wait on them in turn.
///
/// Requests downstream of a cycle fail with it; they would fail one tick
/// later on the cycle's `LoadingFailed` status anyway.
fn fail_dependency_cycles(active: &mut [AssetRequest], ctx: &RequestContext<'_>) {
    let waiting: HashMap<AssetId, usize> = active
        .iter()
        .enumerate()
        .filter(|(_, request)| request.is_waiting())
        .map(|(index, request)| (request.id().clone(), index))
        .collect();
    if waiting.is_empty() {
        return;
    }

    // (dependency, dependent) pairs between waiting requests.
    let edges: Vec<(usize, usize)> = waiting
        .values()
        .flat_map(|&index| {
            active[index]
                .dependency_ids()
                .filter_map(|dependency| waiting.get(dependency).copied())
                .map(move |before| (before, index))
                .collect::<Vec<_>>()
        })
        .collect();

    let Err(cycle) = topological_sort(waiting.values().copied(), edges) else {
        return;
    };
    for index in cycle.unresolved {
        log::error!(
            "Dependency cycle through {}, failing its load",
            active[index].id()
        );
        active[index].fail(ctx, AssetRequestError::DependencyCycle);
    }
}
