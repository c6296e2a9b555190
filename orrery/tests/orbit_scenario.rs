use glam::Vec3;
use orrery::{
    AnimationControls, AnimatorConfig, BodyId, BodySpec, Catalog, FrameDriver, OrbitAnimator,
    Projection, Scene, SceneGraph, ViewportScale,
};
use std::time::{Duration, Instant};

const EPS: f32 = 1e-3;
const ANGLE_EPS: f64 = 1e-6;

fn assert_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

fn run(animator: &mut OrbitAnimator, scene: &mut SceneGraph, controls: &AnimationControls, ticks: usize) {
    for _ in 0..ticks {
        animator.tick(controls, None).publish(scene);
    }
}

#[test]
fn pause_and_speed_scenario() {
    let catalog = Catalog::new(vec![BodySpec::new("comet", 100.0, 1.0, 4.0)]);
    let mut animator = OrbitAnimator::new(&catalog, ViewportScale::UNIT, AnimatorConfig::default());
    let mut scene = SceneGraph::mount_catalog(&catalog);
    let comet = BodyId(0);
    let mut controls = AnimationControls::default();

    run(&mut animator, &mut scene, &controls, 90);
    assert!((animator.bodies()[0].angle - 90.0).abs() < ANGLE_EPS);
    assert_near(scene.node(comet).unwrap().position, Vec3::new(0.0, 100.0, 0.0));

    controls.paused = true;
    run(&mut animator, &mut scene, &controls, 50);
    assert!((animator.bodies()[0].angle - 90.0).abs() < ANGLE_EPS);
    assert_near(scene.node(comet).unwrap().position, Vec3::new(0.0, 100.0, 0.0));

    controls.speed_multiplier = 2.0;
    controls.paused = false;
    run(&mut animator, &mut scene, &controls, 45);
    assert!((animator.bodies()[0].angle - 180.0).abs() < ANGLE_EPS);
    assert_near(scene.node(comet).unwrap().position, Vec3::new(-100.0, 0.0, 0.0));
}

#[test]
fn orbital_projection_moves_in_the_xz_plane() {
    let catalog = Catalog::new(vec![BodySpec::new("comet", 100.0, 1.0, 4.0)]);
    let config = AnimatorConfig {
        projection: Projection::Orbital,
        ..Default::default()
    };
    let mut animator = OrbitAnimator::new(&catalog, ViewportScale::UNIT, config);
    let mut scene = SceneGraph::mount_catalog(&catalog);

    run(&mut animator, &mut scene, &AnimationControls::default(), 90);
    let node = scene.node(BodyId(0)).unwrap();
    assert_near(node.position, Vec3::new(0.0, 0.0, 100.0));
    assert!((node.rotation - 0.09).abs() < 1e-5);
}

#[test]
fn resize_rescales_without_losing_phase() {
    let catalog = Catalog::solar_system();
    let config = orrery::ScaleConfig::default();
    let reference = config.reference_extent(catalog.max_base_orbit_radius());
    let scale = ViewportScale::fit(reference, reference, catalog.max_base_orbit_radius(), &config);
    let mut animator = OrbitAnimator::new(&catalog, scale, AnimatorConfig::default());
    let mut scene = SceneGraph::mount_catalog(&catalog);
    let (earth, _) = catalog.find("earth").unwrap();

    run(&mut animator, &mut scene, &AnimationControls::default(), 90);
    assert_near(scene.node(earth).unwrap().position, Vec3::new(0.0, 145.0, 0.0));

    // Half the reference edge plus half the padding halves the scale
    let smaller = ViewportScale::fit(600.0, 800.0, catalog.max_base_orbit_radius(), &config);
    assert!((smaller.value() - 0.5).abs() < 1e-6);
    animator.rescale(smaller);
    animator.tick(&AnimationControls { paused: true, ..Default::default() }, None).publish(&mut scene);
    assert_near(scene.node(earth).unwrap().position, Vec3::new(0.0, 72.5, 0.0));
}

/// Scene that records which bodies it was told about
#[derive(Default)]
struct Recorder {
    positions: Vec<(BodyId, Vec3)>,
    rotations: usize,
    guides: Vec<bool>,
}

impl Scene for Recorder {
    fn set_position(&mut self, body: BodyId, position: Vec3) {
        self.positions.push((body, position));
    }

    fn set_rotation(&mut self, _body: BodyId, _angle: f32) {
        self.rotations += 1;
    }

    fn set_orbit_guide_visible(&mut self, _body: BodyId, visible: bool) {
        self.guides.push(visible);
    }
}

#[test]
fn every_body_is_published_each_tick() {
    let catalog = Catalog::solar_system();
    let mut animator = OrbitAnimator::new(&catalog, ViewportScale::UNIT, AnimatorConfig::default());
    let mut recorder = Recorder::default();
    let controls = AnimationControls {
        orbits_visible: false,
        ..Default::default()
    };

    animator.tick(&controls, None).publish(&mut recorder);

    let ids: Vec<BodyId> = recorder.positions.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, (0..catalog.len()).map(BodyId).collect::<Vec<_>>());
    assert_eq!(recorder.rotations, catalog.len());
    assert!(recorder.guides.iter().all(|visible| !visible));
}

#[test]
fn driver_paces_the_animator_and_stops_on_cancel() {
    let catalog = Catalog::new(vec![BodySpec::new("comet", 100.0, 1.0, 4.0)]);
    let mut animator = OrbitAnimator::new(&catalog, ViewportScale::UNIT, AnimatorConfig::default());
    let mut scene = SceneGraph::mount_catalog(&catalog);
    let controls = AnimationControls::default();
    let mut driver = FrameDriver::new();

    let start = Instant::now();
    for i in 0..10u64 {
        // The host may deliver several redraws per request; only one ticks
        driver.request();
        for _ in 0..3 {
            if let Some(elapsed) = driver.begin(start + Duration::from_millis(16 * i)) {
                animator.tick(&controls, Some(elapsed)).publish(&mut scene);
            }
        }
    }
    assert_eq!(animator.ticks(), 10);
    assert!((animator.bodies()[0].angle - 10.0).abs() < ANGLE_EPS);

    driver.request();
    driver.cancel();
    assert!(driver.begin(Instant::now()).is_none());
    assert_eq!(driver.frames(), 10);
}
