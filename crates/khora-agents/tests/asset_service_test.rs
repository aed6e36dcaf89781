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

use khora_agents::asset_agent::{
    AssetEvent, AssetRequestError, AssetService, AssetServiceConfig, RequestState,
};
use khora_core::{
    asset::{Asset, AssetHandle, AssetId, AssetStatus, AssetTypeId},
    renderer::{
        AtomicTimelineSemaphore, GpuQueue, GpuSyncPoint, GpuUploadContext, ImageUpload,
        UploadError,
    },
};
use khora_io::{AssetFile, CompressionMode, VirtualFileSystem};
use khora_lanes::asset_lane::{AssetLoader, InstallContext, LoadContext, LoaderError};
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

// --- Test Setup: a generic asset and a loader journaling its calls ---
type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Default)]
struct Blob {
    body: Vec<u8>,
    installed_dependencies: usize,
}
impl Asset for Blob {}

#[derive(Clone)]
struct BlobLoader {
    journal: Journal,
}

impl BlobLoader {
    fn record(&self, entry: String) {
        self.journal.lock().unwrap().push(entry);
    }
}

impl AssetLoader<Blob> for BlobLoader {
    fn create(&self, _id: &AssetId) -> Blob {
        Blob::default()
    }

    fn load(&self, ctx: &mut LoadContext<'_>, asset: &mut Blob) -> Result<(), LoaderError> {
        self.record(format!("load {}", ctx.id().path()));
        if ctx.body() == b"corrupt" {
            return Err("corrupt body".into());
        }
        asset.body = ctx.body().to_vec();
        Ok(())
    }

    fn install(&self, ctx: &mut InstallContext<'_>, asset: &mut Blob) -> Result<(), LoaderError> {
        self.record(format!("install {}", ctx.id().path()));
        if let Some(missing) = ctx
            .dependencies()
            .iter()
            .find(|handle| handle.id().is_valid() && !handle.is_loaded())
        {
            return Err(format!("dependency {} is not loaded", missing.id()).into());
        }
        asset.installed_dependencies = ctx.dependencies().iter().filter(|h| h.is_loaded()).count();

        if let Some(gpu) = ctx.gpu() {
            let sync_point = gpu.upload_buffer(ctx.id().path(), &asset.body)?;
            ctx.wait_for(sync_point);
        }
        Ok(())
    }

    fn unload(&self, id: &AssetId, _asset: Arc<Blob>) {
        self.record(format!("unload {}", id.path()));
    }
}

/// Uploads complete when the test signals the timeline.
#[derive(Debug, Default)]
struct MockGpu {
    timeline: Arc<AtomicTimelineSemaphore>,
    submitted: AtomicU64,
}

impl GpuUploadContext for MockGpu {
    fn upload_buffer(&self, _label: &str, _data: &[u8]) -> Result<GpuSyncPoint, UploadError> {
        let target = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GpuSyncPoint::new(self.timeline.clone(), target))
    }

    fn upload_image(
        &self,
        label: &str,
        image: ImageUpload,
        data: &[u8],
    ) -> Result<GpuSyncPoint, UploadError> {
        if image.byte_size() != data.len() {
            return Err(UploadError::InvalidImageSize {
                label: label.to_owned(),
                expected: image.byte_size(),
                actual: data.len(),
            });
        }
        self.upload_buffer(label, data)
    }

    fn current_submission(&self, _queue: GpuQueue) -> GpuSyncPoint {
        GpuSyncPoint::new(self.timeline.clone(), self.submitted.load(Ordering::SeqCst))
    }
}

const TYPES: [AssetTypeId; 3] = [
    AssetTypeId::new(*b"smsh"),
    AssetTypeId::new(*b"skel"),
    AssetTypeId::new(*b"btex"),
];

fn service_with(config: AssetServiceConfig, journal: &Journal) -> AssetService {
    let mut service = AssetService::new(config).with_vfs(VirtualFileSystem::in_memory());
    let loader = BlobLoader {
        journal: journal.clone(),
    };
    for type_id in TYPES {
        service.register_loader::<Blob>(type_id, loader.clone());
    }
    service
}

fn new_service(journal: &Journal) -> AssetService {
    service_with(AssetServiceConfig::default(), journal)
}

fn mount(service: &AssetService, path: &str, dependencies: &[&str], body: &[u8]) {
    let id = AssetId::new(path);
    let dependencies = dependencies.iter().map(|d| AssetId::new(*d)).collect();
    let bytes = AssetFile::encode(id.type_id(), dependencies, body, CompressionMode::None).unwrap();
    service.vfs().mount(id, bytes);
}

/// Runs one tick and checks that no asset has two active requests.
fn tick(service: &AssetService) {
    service.update();
    let ids = service.active_request_ids();
    let unique: HashSet<&AssetId> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate active requests: {ids:?}");
}

fn run_until_idle(service: &AssetService) {
    for _ in 0..64 {
        tick(service);
        if service.is_idle() {
            return;
        }
    }
    panic!("asset service did not settle");
}

fn count(journal: &Journal, entry: &str) -> usize {
    journal.lock().unwrap().iter().filter(|e| *e == entry).count()
}

fn id(path: &str) -> AssetId {
    AssetId::new(path)
}
// ---

#[test]
fn mesh_waits_for_its_skeleton() {
    let _ = env_logger::builder().is_test(true).try_init();
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "hero.smsh", &["hero.skel"], b"vertices");
    mount(&service, "hero.skel", &[], b"bones");

    let mesh = service.load_path("hero.smsh");
    assert_eq!(service.pending_request_count(), 1);

    // The mesh decodes and issues a nested load for its skeleton.
    tick(&service);
    assert_eq!(
        service.active_request_state(&id("hero.smsh")),
        Some(RequestState::WaitingForDependencies)
    );
    assert_eq!(service.pending_request_count(), 1);
    assert_eq!(service.reference_count(&id("hero.skel")), 1);

    tick(&service);
    assert_eq!(
        service.active_request_state(&id("hero.skel")),
        Some(RequestState::Installing)
    );
    assert_eq!(
        service.active_request_state(&id("hero.smsh")),
        Some(RequestState::WaitingForDependencies)
    );

    tick(&service);
    assert_eq!(service.status(&id("hero.skel")), AssetStatus::Loaded);
    assert_eq!(service.active_request_state(&id("hero.skel")), None);
    assert_eq!(
        service.active_request_state(&id("hero.smsh")),
        Some(RequestState::WaitingForDependencies)
    );

    tick(&service);
    assert_eq!(
        service.active_request_state(&id("hero.smsh")),
        Some(RequestState::Installing)
    );
    assert!(!mesh.is_loaded());

    tick(&service);
    assert!(mesh.is_loaded());
    assert!(service.is_idle());
    assert_eq!(mesh.asset::<Blob>().unwrap().installed_dependencies, 1);
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "load hero.smsh",
            "load hero.skel",
            "install hero.skel",
            "install hero.smsh"
        ]
    );
}

#[test]
fn handles_to_one_asset_share_a_single_request() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut first = AssetHandle::from_path("rock.smsh");
    let mut second = AssetHandle::from_path("rock.smsh");
    service.load(&mut first);
    service.load(&mut second);

    assert_eq!(service.record_count(), 1);
    assert_eq!(service.reference_count(&id("rock.smsh")), 2);
    assert_eq!(service.pending_request_count(), 1);

    run_until_idle(&service);
    assert!(first.is_loaded() && second.is_loaded());
    assert_eq!(count(&journal, "load rock.smsh"), 1);
    assert_eq!(count(&journal, "install rock.smsh"), 1);
}

#[test]
fn only_the_last_unload_tears_the_asset_down() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut first = service.load_path("rock.smsh");
    let mut second = service.load_path("rock.smsh");
    run_until_idle(&service);

    service.unload(&mut first);
    assert!(!first.is_attached());
    assert_eq!(service.reference_count(&id("rock.smsh")), 1);
    assert_eq!(service.pending_request_count(), 0);
    assert!(second.is_loaded());

    service.unload(&mut second);
    assert_eq!(service.pending_request_count(), 1);
    run_until_idle(&service);

    assert_eq!(service.status(&id("rock.smsh")), AssetStatus::Unloaded);
    assert_eq!(service.reference_count(&id("rock.smsh")), 0);
    assert_eq!(service.record_count(), 1);
    assert_eq!(count(&journal, "unload rock.smsh"), 1);
}

#[test]
fn a_handle_loaded_twice_needs_two_unloads() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut handle = service.load_path("rock.smsh");
    service.load(&mut handle);
    run_until_idle(&service);
    assert_eq!(handle.load_count(), 2);

    service.unload(&mut handle);
    assert!(handle.is_loaded());
    assert_eq!(service.reference_count(&id("rock.smsh")), 1);

    service.unload(&mut handle);
    assert!(!handle.is_attached());
    run_until_idle(&service);
    assert_eq!(service.status(&id("rock.smsh")), AssetStatus::Unloaded);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "holding no load")]
fn unloading_a_handle_twice_panics() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut first = service.load_path("rock.smsh");
    let _second = service.load_path("rock.smsh");
    run_until_idle(&service);

    service.unload(&mut first);
    service.unload(&mut first);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "holding no load")]
fn unloading_a_never_loaded_handle_panics() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let _owner = service.load_path("rock.smsh");
    run_until_idle(&service);

    let mut stranger = AssetHandle::from_path("rock.smsh");
    service.unload(&mut stranger);
}

#[cfg(not(debug_assertions))]
#[test]
fn unloads_without_a_load_leave_other_holders_alone() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut owner = service.load_path("rock.smsh");
    run_until_idle(&service);

    let mut observer = owner.clone();
    service.unload(&mut observer);
    service.unload(&mut AssetHandle::from_path("rock.smsh"));

    assert!(owner.is_loaded());
    assert_eq!(service.reference_count(&id("rock.smsh")), 1);
    assert_eq!(service.pending_request_count(), 0);

    service.unload(&mut owner);
    service.unload(&mut owner);
    assert_eq!(service.reference_count(&id("rock.smsh")), 0);
    assert_eq!(service.pending_request_count(), 1);
}

#[test]
fn decode_failure_never_installs() {
    let journal = Journal::default();
    let service = new_service(&journal);
    let events = service.events();
    mount(&service, "broken.smsh", &[], b"corrupt");

    let mesh = service.load_path("broken.smsh");
    run_until_idle(&service);

    assert_eq!(mesh.status(), AssetStatus::LoadingFailed);
    assert_eq!(mesh.reference_count(), 1);
    assert!(mesh.asset::<Blob>().is_none());
    assert_eq!(count(&journal, "load broken.smsh"), 1);
    assert_eq!(count(&journal, "install broken.smsh"), 0);
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![AssetEvent::Failed(id("broken.smsh"))]
    );
}

#[test]
fn reloading_after_an_unload_runs_the_loader_again() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut handle = AssetHandle::from_path("rock.smsh");
    service.load(&mut handle);
    run_until_idle(&service);
    service.unload(&mut handle);
    run_until_idle(&service);

    assert_eq!(service.status(&id("rock.smsh")), AssetStatus::Unloaded);
    assert_eq!(service.reference_count(&id("rock.smsh")), 0);

    service.load(&mut handle);
    assert_eq!(service.pending_request_count(), 1);
    run_until_idle(&service);

    assert!(handle.is_loaded());
    assert_eq!(count(&journal, "load rock.smsh"), 2);
    assert_eq!(count(&journal, "install rock.smsh"), 2);
}

#[test]
fn unloading_releases_dependencies() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "hero.smsh", &["hero.skel"], b"vertices");
    mount(&service, "hero.skel", &[], b"bones");

    let mut mesh = service.load_path("hero.smsh");
    run_until_idle(&service);
    assert_eq!(service.status(&id("hero.skel")), AssetStatus::Loaded);

    service.unload(&mut mesh);
    run_until_idle(&service);

    assert_eq!(service.status(&id("hero.smsh")), AssetStatus::Unloaded);
    assert_eq!(service.status(&id("hero.skel")), AssetStatus::Unloaded);
    assert_eq!(service.reference_count(&id("hero.skel")), 0);
    assert!(service.record(&id("hero.smsh")).unwrap().dependencies().is_empty());
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "load hero.smsh",
            "load hero.skel",
            "install hero.skel",
            "install hero.smsh",
            "unload hero.smsh",
            "unload hero.skel"
        ]
    );
}

#[test]
fn shared_dependencies_outlive_one_dependent() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "hero.smsh", &["shared.skel"], b"hero");
    mount(&service, "villain.smsh", &["shared.skel"], b"villain");
    mount(&service, "shared.skel", &[], b"bones");

    let mut hero = service.load_path("hero.smsh");
    let villain = service.load_path("villain.smsh");
    run_until_idle(&service);
    assert_eq!(service.reference_count(&id("shared.skel")), 2);

    service.unload(&mut hero);
    run_until_idle(&service);

    assert!(villain.is_loaded());
    assert_eq!(service.status(&id("shared.skel")), AssetStatus::Loaded);
    assert_eq!(service.reference_count(&id("shared.skel")), 1);
    assert_eq!(count(&journal, "load shared.skel"), 1);
}

#[test]
fn empty_references_always_fail_immediately() {
    let journal = Journal::default();
    let service = new_service(&journal);

    let mut first = service.load_path("");
    tick(&service);
    assert_eq!(first.status(), AssetStatus::LoadingFailed);
    assert!(service.is_idle());

    let mut second = AssetHandle::default();
    service.load(&mut second);
    assert_eq!(service.pending_request_count(), 0);
    assert_eq!(second.status(), AssetStatus::LoadingFailed);

    service.unload(&mut first);
    service.unload(&mut second);
    run_until_idle(&service);
    assert_eq!(service.status(&AssetId::default()), AssetStatus::Unloaded);

    let third = service.load_path("");
    tick(&service);
    assert_eq!(third.status(), AssetStatus::LoadingFailed);
    assert!(journal.lock().unwrap().is_empty());
}

#[test]
fn failed_dependency_fails_the_dependent() {
    let journal = Journal::default();
    let service = new_service(&journal);
    let events = service.events();
    mount(&service, "hero.smsh", &["broken.skel"], b"vertices");
    mount(&service, "broken.skel", &[], b"corrupt");

    let mesh = service.load_path("hero.smsh");
    run_until_idle(&service);

    assert_eq!(mesh.status(), AssetStatus::LoadingFailed);
    assert_eq!(mesh.reference_count(), 1);
    assert_eq!(count(&journal, "install hero.smsh"), 0);
    assert!(service.record(&id("hero.smsh")).unwrap().dependencies().is_empty());

    // The dependent's reference was the only one on the skeleton.
    assert_eq!(service.reference_count(&id("broken.skel")), 0);
    assert_eq!(service.status(&id("broken.skel")), AssetStatus::Unloaded);

    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![
            AssetEvent::Failed(id("broken.skel")),
            AssetEvent::Failed(id("hero.smsh")),
            AssetEvent::Unloaded(id("broken.skel")),
        ]
    );
}

#[test]
fn empty_dependencies_count_as_satisfied() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "hero.smsh", &["", "hero.skel"], b"vertices");
    mount(&service, "hero.skel", &[], b"bones");

    let mesh = service.load_path("hero.smsh");
    run_until_idle(&service);

    assert!(mesh.is_loaded());
    assert_eq!(mesh.asset::<Blob>().unwrap().installed_dependencies, 1);
    assert!(service.record(&AssetId::default()).is_none());
    assert_eq!(service.record_count(), 2);
}

#[test]
fn dependency_cycles_are_failed() {
    let journal = Journal::default();
    let service = new_service(&journal);
    let events = service.events();
    mount(&service, "a.smsh", &["b.smsh"], b"a");
    mount(&service, "b.smsh", &["a.smsh"], b"b");

    let a = service.load_path("a.smsh");
    run_until_idle(&service);

    assert_eq!(a.status(), AssetStatus::LoadingFailed);
    assert_eq!(a.reference_count(), 1);
    assert_eq!(service.status(&id("b.smsh")), AssetStatus::Unloaded);
    assert_eq!(service.reference_count(&id("b.smsh")), 0);
    assert_eq!(count(&journal, "install a.smsh"), 0);
    assert_eq!(count(&journal, "install b.smsh"), 0);

    let received: Vec<AssetEvent> = events.try_iter().collect();
    assert!(received.contains(&AssetEvent::Failed(id("a.smsh"))));
    assert!(received.contains(&AssetEvent::Failed(id("b.smsh"))));
}

#[test]
fn self_dependency_is_a_cycle() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "loop.smsh", &["loop.smsh"], b"loop");

    let mesh = service.load_path("loop.smsh");
    tick(&service);

    assert_eq!(mesh.status(), AssetStatus::LoadingFailed);
    assert_eq!(mesh.reference_count(), 1);
    assert!(service.is_idle());
}

#[test]
fn cycles_wait_forever_when_detection_is_off() {
    let journal = Journal::default();
    let config = AssetServiceConfig {
        detect_dependency_cycles: false,
        ..AssetServiceConfig::default()
    };
    let service = service_with(config, &journal);
    mount(&service, "a.smsh", &["b.smsh"], b"a");
    mount(&service, "b.smsh", &["a.smsh"], b"b");

    let a = service.load_path("a.smsh");
    for _ in 0..10 {
        tick(&service);
    }

    assert_eq!(service.active_request_count(), 2);
    assert_eq!(a.status(), AssetStatus::Unloaded);
    assert_eq!(
        service.active_request_state(&id("b.smsh")),
        Some(RequestState::WaitingForDependencies)
    );
}

#[test]
fn install_waits_for_gpu_uploads() {
    let journal = Journal::default();
    let gpu = Arc::new(MockGpu::default());
    let service = new_service(&journal).with_gpu_context(gpu.clone());
    mount(&service, "albedo.btex", &[], b"texels");

    let texture = service.load_path("albedo.btex");
    tick(&service);
    tick(&service);
    tick(&service);

    assert_eq!(
        service.active_request_state(&id("albedo.btex")),
        Some(RequestState::Installing)
    );
    assert!(!texture.is_loaded());
    assert_eq!(gpu.submitted.load(Ordering::SeqCst), 1);

    gpu.timeline.signal(1);
    tick(&service);

    assert!(texture.is_loaded());
    assert!(service.is_idle());
    assert_eq!(count(&journal, "install albedo.btex"), 1);
}

#[test]
fn opposite_requests_run_in_queue_order() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut handle = service.load_path("rock.smsh");
    tick(&service);
    assert_eq!(
        service.active_request_state(&id("rock.smsh")),
        Some(RequestState::Installing)
    );

    // The unload waits behind the active load.
    service.unload(&mut handle);
    tick(&service);
    assert_eq!(service.status(&id("rock.smsh")), AssetStatus::Loaded);
    assert_eq!(service.pending_request_count(), 1);

    tick(&service);
    assert_eq!(service.status(&id("rock.smsh")), AssetStatus::Unloaded);
    assert_eq!(count(&journal, "unload rock.smsh"), 1);
    assert!(service.is_idle());
}

#[test]
fn stale_requests_are_dropped() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let mut handle = service.load_path("rock.smsh");
    run_until_idle(&service);

    // Unload then reload before the next tick: neither request is needed.
    service.unload(&mut handle);
    service.load(&mut handle);
    assert_eq!(service.pending_request_count(), 2);

    tick(&service);
    assert!(service.is_idle());
    assert!(handle.is_loaded());
    assert_eq!(count(&journal, "load rock.smsh"), 1);
    assert_eq!(count(&journal, "unload rock.smsh"), 0);
}

#[test]
fn failed_loads_can_be_retried() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"corrupt");

    let mut handle = service.load_path("rock.smsh");
    run_until_idle(&service);
    assert_eq!(handle.status(), AssetStatus::LoadingFailed);

    mount(&service, "rock.smsh", &[], b"rock");
    service.unload(&mut handle);
    service.load(&mut handle);
    run_until_idle(&service);

    assert!(handle.is_loaded());
    assert_eq!(count(&journal, "load rock.smsh"), 2);
}

#[test]
fn promotion_budget_limits_new_requests_per_tick() {
    let journal = Journal::default();
    let config = AssetServiceConfig::from_ron_str("(promotion_budget_per_tick: 1)").unwrap();
    let service = service_with(config, &journal);
    for name in ["a.smsh", "b.smsh", "c.smsh"] {
        mount(&service, name, &[], b"data");
    }

    let handles: Vec<AssetHandle> = ["a.smsh", "b.smsh", "c.smsh"]
        .into_iter()
        .map(|path| service.load_path(path))
        .collect();

    tick(&service);
    assert_eq!(service.active_request_count(), 1);
    assert_eq!(service.pending_request_count(), 2);

    tick(&service);
    assert_eq!(service.pending_request_count(), 1);

    run_until_idle(&service);
    assert!(handles.iter().all(AssetHandle::is_loaded));
}

#[test]
fn events_can_be_disabled() {
    let journal = Journal::default();
    let config = AssetServiceConfig {
        emit_events: false,
        ..AssetServiceConfig::default()
    };
    let service = service_with(config, &journal);
    let events = service.events();
    mount(&service, "rock.smsh", &[], b"rock");

    let rock = service.load_path("rock.smsh");
    run_until_idle(&service);

    assert!(rock.is_loaded());
    assert!(events.is_empty());
}

#[test]
fn missing_loader_fails_the_load() {
    let journal = Journal::default();
    let service = new_service(&journal);
    assert!(!service.has_loader(AssetTypeId::new(*b"wave")));

    let sound = service.load_path("boom.wave");
    run_until_idle(&service);
    assert_eq!(sound.status(), AssetStatus::LoadingFailed);
}

#[test]
fn loads_from_many_threads_share_one_request() {
    let journal = Journal::default();
    let service = new_service(&journal);
    mount(&service, "rock.smsh", &[], b"rock");

    let handles: Vec<AssetHandle> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| service.load_path("rock.smsh")))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(service.reference_count(&id("rock.smsh")), 8);
    assert_eq!(service.pending_request_count(), 1);

    run_until_idle(&service);
    assert!(handles.iter().all(AssetHandle::is_loaded));
    assert_eq!(count(&journal, "load rock.smsh"), 1);
}

#[test]
fn request_errors_describe_the_failure() {
    let error = AssetRequestError::DependencyFailed {
        dependency: id("hero.skel"),
    };
    assert_eq!(error.to_string(), "dependency hero.skel failed to load");
    assert_eq!(
        AssetRequestError::NoLoader(AssetTypeId::new(*b"wave")).to_string(),
        "no loader registered for asset type 'wave'"
    );
}
