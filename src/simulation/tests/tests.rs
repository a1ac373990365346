use super::*;

use std::collections::{HashMap, HashSet};

use crate::domain::{RegistryError, Transform};
use crate::systems::physics::{BodyDesc, BodyHandle, BodyPoses, SubStepper};

const FRAME: f64 = 1.0 / 60.0;

/// Deterministic stand-in for the physics engine: bodies sink 1cm per
/// sub-step and collisions are whatever the test scripts.
#[derive(Default)]
struct ScriptedPoses(HashMap<BodyHandle, Transform>);

impl BodyPoses for ScriptedPoses {
    fn transform(&self, handle: BodyHandle) -> Option<Transform> {
        self.0.get(&handle).copied()
    }
}

#[derive(Default)]
struct ScriptedWorld {
    poses: ScriptedPoses,
    next_index: u32,
    listeners: HashSet<BodyHandle>,
    script: Vec<CollisionEvent>,
    reported: Vec<CollisionEvent>,
    stepper: SubStepper,
}

impl ScriptedWorld {
    /// Report a hit on `body` at the end of the next step.
    fn script_hit(&mut self, body: BodyHandle, speed: f32) {
        self.script.push(CollisionEvent {
            body_a: body,
            body_b: None,
            contact_normal: Vec3::Y,
            relative_velocity_along_normal: speed,
        });
    }

    fn forget_body(&mut self, body: BodyHandle) {
        self.poses.0.remove(&body);
    }
}

impl PhysicsWorld for ScriptedWorld {
    type Poses = ScriptedPoses;

    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle::new(self.next_index, 0);
        self.next_index += 1;
        self.poses.0.insert(handle, desc.transform);
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.listeners.remove(&handle);
        self.poses.0.remove(&handle).is_some()
    }

    fn step(&mut self, fixed_dt: f32, actual_dt: f64, max_sub_steps: u32) -> StepReport {
        let plan = self.stepper.plan(fixed_dt, actual_dt, max_sub_steps);
        for _ in 0..plan.sub_steps {
            for t in self.poses.0.values_mut() {
                t.position.y -= 0.01;
            }
        }
        let listeners = &self.listeners;
        self.reported
            .extend(self.script.drain(..).filter(|e| listeners.contains(&e.body_a)));
        StepReport {
            sub_steps: plan.sub_steps,
            dropped_time: plan.dropped_time,
        }
    }

    fn set_collision_listener(&mut self, handle: BodyHandle, enabled: bool) -> bool {
        if !self.poses.0.contains_key(&handle) {
            return false;
        }
        if enabled {
            self.listeners.insert(handle);
        } else {
            self.listeners.remove(&handle);
        }
        true
    }

    fn drain_collisions(&mut self, out: &mut Vec<CollisionEvent>) {
        out.append(&mut self.reported);
    }

    fn poses(&self) -> &ScriptedPoses {
        &self.poses
    }

    fn body_count(&self) -> usize {
        self.poses.0.len()
    }

    fn dynamic_body_count(&self) -> usize {
        self.poses.0.len()
    }
}

fn scripted() -> SimulationCore<ScriptedWorld, HostClock> {
    SimulationCore::with_parts(SimulationConfig::default(), ScriptedWorld::default(), HostClock::new())
}

/// Run `frames` frames of 1/60s each, continuing from the current host time.
fn run_frames<W: PhysicsWorld>(
    sim: &mut SimulationCore<W, HostClock>,
    driver: &mut AnimationDriver,
    frames: u32,
) {
    for _ in 0..frames {
        let now = sim.clock.previous_elapsed() + FRAME;
        sim.clock.source_mut().set_seconds(now);
        assert_eq!(driver.frame(sim), FrameOutcome::Continue);
    }
}

fn body_of<W: PhysicsWorld, S: TimeSource>(sim: &SimulationCore<W, S>, id: ObjectId) -> BodyHandle {
    sim.registry().get(id).unwrap().body
}

#[test]
fn reset_after_hundred_spawns_leaves_empty_scene() {
    let mut sim = SimulationCore::new();
    let mut driver = AnimationDriver::new();
    for i in 0..100 {
        let x = (i % 10) as f32 - 5.0;
        let z = (i / 10) as f32 - 5.0;
        sim.spawn_sphere(0.2, Vec3::new(x, 3.0, z)).unwrap();
    }
    run_frames(&mut sim, &mut driver, 5);
    assert_eq!(sim.object_count(), 100);
    assert_eq!(sim.dynamic_body_count(), 100);

    assert_eq!(sim.reset(), 100);
    assert_eq!(sim.object_count(), 0);
    assert_eq!(sim.dynamic_body_count(), 0);
    assert_eq!(sim.impacts().listener_count(), 0);
    assert!(sim.render().transforms().is_empty());

    // Second reset is a no-op.
    assert_eq!(sim.reset(), 0);

    run_frames(&mut sim, &mut driver, 3);
    assert!(sim.take_audio_cues().is_empty());
    assert_eq!(sim.render().object_count(), 0);
}

#[test]
fn reset_drops_pending_commands_and_cues() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::new(0.0, 3.0, 0.0)).unwrap();
    let body = body_of(&sim, id);
    sim.world_mut().script_hit(body, 5.0);
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.impacts().queue().len(), 1);

    sim.defer(DeferredCommand::Spawn {
        shape: ShapeDescriptor::sphere(0.3),
        position: Vec3::Y,
    });
    sim.reset();
    assert_eq!(sim.pending_commands(), 0);
    assert!(sim.take_audio_cues().is_empty());

    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.object_count(), 0);
}

#[test]
fn stalled_frame_is_capped_at_three_sub_steps() {
    let mut sim = SimulationCore::new();
    let mut driver = AnimationDriver::new();
    sim.spawn_sphere(0.5, Vec3::new(0.0, 3.0, 0.0)).unwrap();

    sim.set_host_time_seconds(10.0);
    driver.frame(&mut sim);

    let stats = sim.stats();
    assert_eq!(stats.sub_steps, 3);
    assert!((stats.delta - 10.0).abs() < 1e-9);
    assert!(stats.dropped_time > 9.0);
}

#[test]
fn backwards_timestamp_runs_a_zero_delta_frame() {
    let mut sim = SimulationCore::new();
    let mut driver = AnimationDriver::new();
    sim.set_host_time_ms(1000.0);
    driver.frame(&mut sim);
    sim.set_host_time_ms(900.0);
    assert_eq!(driver.frame(&mut sim), FrameOutcome::Continue);
    assert_eq!(sim.stats().delta, 0.0);
    assert_eq!(sim.stats().sub_steps, 0);
    assert_eq!(sim.frame(), 2);
}

#[test]
fn stop_handle_halts_until_resume() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    assert_eq!(driver.state(), DriverState::Idle);
    run_frames(&mut sim, &mut driver, 2);
    assert_eq!(driver.state(), DriverState::Running);

    let handle = driver.stop_handle();
    handle.request_stop();
    assert_eq!(driver.frame(&mut sim), FrameOutcome::Stopped);
    assert_eq!(driver.state(), DriverState::Stopped);
    assert_eq!(driver.frame(&mut sim), FrameOutcome::Stopped);
    assert_eq!(sim.frame(), 2);

    driver.resume();
    assert!(!handle.is_stop_requested());
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.frame(), 3);
}

#[test]
fn deferred_commands_apply_at_next_frame() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    sim.defer(DeferredCommand::Spawn {
        shape: ShapeDescriptor::cuboid(1.0, 1.0, 1.0),
        position: Vec3::new(0.0, 2.0, 0.0),
    });
    sim.defer(DeferredCommand::Spawn {
        shape: ShapeDescriptor::sphere(-1.0),
        position: Vec3::ZERO,
    });
    assert_eq!(sim.object_count(), 0);
    assert_eq!(sim.pending_commands(), 2);

    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.object_count(), 1);
    assert_eq!(sim.pending_commands(), 0);
    assert_eq!(sim.stats().deferred_applied, 1);

    let id = sim.registry().iter().next().unwrap().id;
    sim.defer(DeferredCommand::Remove(id));
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.object_count(), 0);
    assert_eq!(sim.world().body_count(), 0);
}

#[test]
fn invalid_sphere_is_rejected_without_side_effects() {
    let mut sim = SimulationCore::new();
    let revision = sim.registry().scene_revision();
    assert_eq!(
        sim.spawn_sphere(0.0, Vec3::Y),
        Err(SpawnError::InvalidRadius(0.0))
    );
    assert_eq!(
        sim.spawn_sphere(0.5, Vec3::new(f32::NAN, 0.0, 0.0)),
        Err(SpawnError::InvalidPosition)
    );
    assert_eq!(sim.object_count(), 0);
    assert_eq!(sim.dynamic_body_count(), 0);
    assert_eq!(sim.impacts().listener_count(), 0);
    assert_eq!(sim.registry().scene_revision(), revision);
}

#[test]
fn proxies_track_bodies_exactly_every_frame() {
    let mut sim = SimulationCore::new();
    let mut driver = AnimationDriver::new();
    sim.spawn_sphere(0.4, Vec3::new(-1.0, 3.0, 0.0)).unwrap();
    sim.spawn_box(Vec3::new(0.5, 1.0, 0.5), Vec3::new(1.0, 4.0, 0.3)).unwrap();

    for _ in 0..60 {
        run_frames(&mut sim, &mut driver, 1);
        for obj in sim.registry().iter() {
            let body = sim.world().body_transform(obj.body).unwrap();
            assert_eq!(obj.proxy.transform, body);
        }
        assert_eq!(sim.stats().synced_objects, 2);
    }
}

#[test]
fn render_buffer_matches_registry() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let sphere = sim.spawn_sphere(0.25, Vec3::new(1.0, 3.0, 2.0)).unwrap();
    let cube = sim.spawn_box(Vec3::new(2.0, 1.0, 0.5), Vec3::new(0.0, 5.0, 0.0)).unwrap();
    run_frames(&mut sim, &mut driver, 1);

    let render = sim.render();
    assert_eq!(render.object_count(), 2);
    assert_eq!(render.transforms().len(), 2 * FLOATS_PER_OBJECT);
    assert_eq!(render.scene_revision(), sim.registry().scene_revision());

    for (i, chunk) in render.transforms().chunks(FLOATS_PER_OBJECT).enumerate() {
        let id = ObjectId {
            index: render.ids()[2 * i],
            generation: render.ids()[2 * i + 1],
        };
        let proxy = &sim.registry().get(id).unwrap().proxy;
        assert_eq!(chunk[1], proxy.transform.position.y);
        assert_eq!(chunk[6], proxy.transform.orientation.w);
        if id == sphere {
            assert_eq!(&chunk[7..10], &[0.25, 0.25, 0.25]);
            assert_eq!(chunk[10], 0.0);
        } else {
            assert_eq!(id, cube);
            assert_eq!(&chunk[7..10], &[2.0, 1.0, 0.5]);
            assert_eq!(chunk[10], 1.0);
        }
    }
}

#[test]
fn hard_hit_above_threshold_plays_one_cue() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::new(0.0, 3.0, 0.0)).unwrap();
    let body = body_of(&sim, id);

    sim.world_mut().script_hit(body, 1.8);
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.stats().collisions, 1);
    assert_eq!(sim.stats().cues, 1);
    let cues = sim.take_audio_cues();
    assert_eq!(cues.len(), 1);
    assert!((0.0..1.0).contains(&cues[0]));

    sim.set_impact_threshold(2.0);
    sim.world_mut().script_hit(body, 1.8);
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.stats().collisions, 1);
    assert_eq!(sim.stats().cues, 0);
    assert!(sim.take_audio_cues().is_empty());
}

#[test]
fn threshold_is_strict() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::Y).unwrap();
    let body = body_of(&sim, id);
    sim.world_mut().script_hit(body, 1.5);
    run_frames(&mut sim, &mut driver, 1);
    assert!(sim.take_audio_cues().is_empty());
}

#[test]
fn removed_object_no_longer_reports_impacts() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::Y).unwrap();
    let body = body_of(&sim, id);
    assert!(sim.impacts().is_subscribed(body));
    assert!(sim.remove(id));
    assert!(!sim.remove(id));
    assert!(!sim.impacts().is_subscribed(body));

    sim.world_mut().script_hit(body, 9.0);
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.stats().collisions, 0);
    assert!(sim.take_audio_cues().is_empty());
}

#[test]
fn cue_burst_is_bounded_per_frame() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::Y).unwrap();
    let body = body_of(&sim, id);
    for _ in 0..20 {
        sim.world_mut().script_hit(body, 4.0);
    }
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.stats().collisions, 20);
    assert_eq!(sim.stats().cues, 8);
    assert_eq!(sim.stats().cues_dropped, 12);
    assert_eq!(sim.take_audio_cues().len(), 8);
    assert_eq!(sim.impacts().queue().dropped(), 0);
}

#[test]
fn untaken_cues_do_not_carry_into_next_frame() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::Y).unwrap();
    let body = body_of(&sim, id);

    for _ in 0..5 {
        sim.world_mut().script_hit(body, 4.0);
    }
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.stats().cues, 5);

    // Host skipped take_audio_cues; the next frame still gets the full budget.
    for _ in 0..5 {
        sim.world_mut().script_hit(body, 4.0);
    }
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.stats().cues, 5);
    assert_eq!(sim.stats().cues_dropped, 0);
    assert_eq!(sim.take_audio_cues().len(), 5);

    // A quiet frame leaves nothing stale behind.
    run_frames(&mut sim, &mut driver, 1);
    assert!(sim.take_audio_cues().is_empty());
}

#[test]
fn muted_audio_detects_but_does_not_play() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::Y).unwrap();
    let body = body_of(&sim, id);
    sim.set_audio_enabled(false);
    sim.world_mut().script_hit(body, 4.0);
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.stats().collisions, 1);
    assert!(sim.take_audio_cues().is_empty());

    sim.set_audio_enabled(true);
    sim.world_mut().script_hit(body, 4.0);
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.take_audio_cues().len(), 1);
}

#[test]
fn lost_body_is_logged_and_frame_continues() {
    let mut sim = scripted();
    let mut driver = AnimationDriver::new();
    let id = sim.spawn_sphere(0.3, Vec3::Y).unwrap();
    sim.spawn_sphere(0.3, Vec3::X).unwrap();
    let body = body_of(&sim, id);
    sim.world_mut().forget_body(body);

    assert!(matches!(
        sim.registry.sync_all(&sim.world),
        Err(RegistryError::MissingBody { count: 1, .. })
    ));
    run_frames(&mut sim, &mut driver, 1);
    assert_eq!(sim.frame(), 1);
    // Only the intact pair counts as synced.
    assert_eq!(sim.stats().synced_objects, 1);
}

#[test]
fn falling_sphere_hits_ground_audibly() {
    let mut sim = SimulationCore::new();
    let mut driver = AnimationDriver::new();
    sim.spawn_sphere(0.3, Vec3::new(0.0, 3.0, 0.0)).unwrap();

    let mut cues = Vec::new();
    for _ in 0..120 {
        run_frames(&mut sim, &mut driver, 1);
        cues.extend(sim.take_audio_cues());
    }
    assert!(!cues.is_empty());
    assert!(cues.iter().all(|v| (0.0..1.0).contains(v)));
    assert!(sim.impacts().total_cues() >= 1);
}

#[test]
fn scatter_is_reproducible_for_a_seed() {
    let mut a = scripted();
    let mut b = scripted();
    assert_eq!(a.scatter_spheres(25, 42), b.scatter_spheres(25, 42));

    let pa: Vec<_> = a.registry().iter().map(|o| (o.proxy.transform.position, o.proxy.scale)).collect();
    let pb: Vec<_> = b.registry().iter().map(|o| (o.proxy.transform.position, o.proxy.scale)).collect();
    assert_eq!(pa, pb);

    let extent = a.config().scatter_extent;
    for (pos, scale) in pa {
        assert_eq!(pos.y, a.config().spawn_height);
        assert!(pos.x.abs() <= extent && pos.z.abs() <= extent);
        assert!(scale.x > 0.0 && scale.x < a.config().scatter_max_radius);
    }
}

#[test]
fn non_finite_threshold_is_ignored() {
    let mut sim = scripted();
    sim.set_impact_threshold(f32::NAN);
    assert_eq!(sim.impacts().threshold(), 1.5);
    sim.set_impact_threshold(3.0);
    assert_eq!(sim.impacts().threshold(), 3.0);
    assert_eq!(sim.config().impact_threshold, 3.0);
}

#[test]
fn config_json_builds_custom_scene() {
    let sim = SimulationCore::from_config_json(r#"{"max_sub_steps": 5, "impact_threshold": 0.5}"#)
        .unwrap();
    assert_eq!(sim.config().max_sub_steps, 5);
    assert_eq!(sim.impacts().threshold(), 0.5);
    assert_eq!(sim.config().fixed_dt, 1.0 / 60.0);

    assert!(SimulationCore::from_config_json("{not json").is_err());
}
