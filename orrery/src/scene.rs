//! CPU-side scene the animator publishes into
//!
//! Render handles are established once, indexed by [`BodyId`]. Commands for
//! bodies that are not (or no longer) mounted are dropped silently, since
//! mount order between the animator and the renderer is not guaranteed.

use glam::{Mat4, Vec2, Vec3};

use common::world_to_screen;

use crate::catalog::{Appearance, BodyId, BodySpec, Catalog};

/// Receiver of per-tick body updates
pub trait Scene {
    fn set_position(&mut self, body: BodyId, position: Vec3);
    fn set_rotation(&mut self, body: BodyId, angle: f32);
    fn set_orbit_guide_visible(&mut self, body: BodyId, visible: bool);
}

/// Drawable state of one mounted body
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub position: Vec3,
    pub rotation: f32,
    pub guide_visible: bool,
    pub size: f32,
    pub appearance: Appearance,
}

impl SceneNode {
    pub fn from_spec(spec: &BodySpec) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            guide_visible: true,
            size: spec.size,
            appearance: spec.appearance,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<SceneNode>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a node for every catalog entry
    pub fn mount_catalog(catalog: &Catalog) -> Self {
        let mut scene = Self::new();
        for (id, spec) in catalog.iter() {
            scene.mount(id, SceneNode::from_spec(spec));
        }
        scene
    }

    pub fn mount(&mut self, body: BodyId, node: SceneNode) {
        let index = body.index();
        if index >= self.nodes.len() {
            self.nodes.resize(index + 1, None);
        }
        self.nodes[index] = Some(node);
    }

    pub fn unmount(&mut self, body: BodyId) -> Option<SceneNode> {
        self.nodes.get_mut(body.index()).and_then(Option::take)
    }

    pub fn node(&self, body: BodyId) -> Option<&SceneNode> {
        self.nodes.get(body.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, body: BodyId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(body.index()).and_then(Option::as_mut)
    }

    /// Mounted nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = (BodyId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.as_ref().map(|n| (BodyId(i), n)))
    }

    pub fn mounted(&self) -> usize {
        self.nodes.iter().flatten().count()
    }
}

impl Scene for SceneGraph {
    fn set_position(&mut self, body: BodyId, position: Vec3) {
        if let Some(node) = self.node_mut(body) {
            node.position = position;
        }
    }

    fn set_rotation(&mut self, body: BodyId, angle: f32) {
        if let Some(node) = self.node_mut(body) {
            node.rotation = angle;
        }
    }

    fn set_orbit_guide_visible(&mut self, body: BodyId, visible: bool) {
        if let Some(node) = self.node_mut(body) {
            node.guide_visible = visible;
        }
    }
}

/// Smallest on-screen pick radius in pixels, so tiny bodies stay clickable
const MIN_PICK_RADIUS: f32 = 8.0;

/// Body under `cursor` (window pixels, top-left origin), nearest to the cursor if several overlap.
///
/// `pixels_per_unit` converts a node's world-space size into an on-screen
/// radius; for perspective views pass the scale at the orbit plane.
pub fn pick(
    scene: &SceneGraph,
    cursor: Vec2,
    view_proj: Mat4,
    viewport: Vec2,
    pixels_per_unit: f32,
) -> Option<BodyId> {
    scene
        .nodes()
        .filter_map(|(id, node)| {
            let screen = world_to_screen(view_proj, node.position, viewport)?;
            let distance = screen.distance(cursor);
            let radius = (node.size * pixels_per_unit).max(MIN_PICK_RADIUS);
            (distance <= radius).then_some((id, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{AnimatorConfig, OrbitAnimator};
    use crate::controls::AnimationControls;
    use crate::viewport::ViewportScale;
    use common::Camera2D;

    #[test]
    fn unmounted_bodies_are_skipped() {
        let catalog = Catalog::solar_system();
        let mut scene = SceneGraph::mount_catalog(&catalog);
        let (mars, _) = catalog.find("mars").unwrap();
        scene.unmount(mars);

        let mut animator =
            OrbitAnimator::new(&catalog, ViewportScale::UNIT, AnimatorConfig::default());
        let frame = animator.tick(&AnimationControls::default(), None);
        frame.publish(&mut scene);

        assert!(scene.node(mars).is_none());
        assert_eq!(scene.mounted(), 8);
        let (earth, _) = catalog.find("earth").unwrap();
        assert_eq!(scene.node(earth).map(|n| n.position), animator.position_of(earth));
    }

    #[test]
    fn commands_for_unknown_ids_are_no_ops() {
        let mut scene = SceneGraph::new();
        scene.set_position(BodyId(42), Vec3::ONE);
        scene.set_rotation(BodyId(42), 1.0);
        scene.set_orbit_guide_visible(BodyId(42), false);
        assert_eq!(scene.mounted(), 0);
        assert!(scene.unmount(BodyId(42)).is_none());
    }

    #[test]
    fn mounting_out_of_order_fills_gaps() {
        let spec = BodySpec::new("late", 10.0, 1.0, 2.0);
        let mut scene = SceneGraph::new();
        scene.mount(BodyId(3), SceneNode::from_spec(&spec));
        assert_eq!(scene.mounted(), 1);
        assert_eq!(scene.nodes().map(|(id, _)| id).collect::<Vec<_>>(), vec![BodyId(3)]);
    }

    #[test]
    fn guide_visibility_is_published() {
        let catalog = Catalog::solar_system();
        let mut scene = SceneGraph::mount_catalog(&catalog);
        let mut animator =
            OrbitAnimator::new(&catalog, ViewportScale::UNIT, AnimatorConfig::default());
        let controls = AnimationControls {
            orbits_visible: false,
            ..Default::default()
        };
        animator.tick(&controls, None).publish(&mut scene);
        assert!(scene.nodes().all(|(_, n)| !n.guide_visible));
    }

    #[test]
    fn picking_finds_the_body_under_the_cursor() {
        let catalog = Catalog::solar_system();
        let mut scene = SceneGraph::mount_catalog(&catalog);
        let animator =
            OrbitAnimator::new(&catalog, ViewportScale::UNIT, AnimatorConfig::default());
        for body in animator.bodies() {
            scene.set_position(body.id, body.position(animator.projection()));
        }

        let camera = Camera2D::new(1200, 1200);
        let viewport = Vec2::new(1200.0, 1200.0);
        let vp = camera.view_projection();

        // Jupiter sits at (280, 0) -> screen (880, 600)
        let picked = pick(&scene, Vec2::new(884.0, 603.0), vp, viewport, 1.0);
        assert_eq!(picked, catalog.find("jupiter").map(|(id, _)| id));

        assert_eq!(pick(&scene, Vec2::new(600.0, 100.0), vp, viewport, 1.0), None);
    }
}
