//! Orbit guide rings and the background starfield

use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::animator::{orbit_position, Projection};

pub const ORBIT_SEGMENTS: usize = 64;

/// Closed polyline of `segments + 1` points; the last point repeats the first.
pub fn orbit_ring(radius: f32, projection: Projection, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = i as f64 / segments as f64 * 360.0;
            orbit_position(angle, radius, projection)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub brightness: f32,
    pub size: f32,
}

/// Static background stars, generated once from a seed
#[derive(Debug, Clone)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    /// Stars on a square plane of half-extent `radius` behind the flat view,
    /// or on a shell of `radius` around the origin for the orbital view.
    pub fn generate(count: usize, seed: u64, radius: f32, projection: Projection) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let stars = (0..count)
            .map(|_| {
                let position = match projection {
                    Projection::Flat => Vec3::new(
                        rng.gen_range(-radius..=radius),
                        rng.gen_range(-radius..=radius),
                        -100.0,
                    ),
                    Projection::Orbital => {
                        // Uniform direction on the unit sphere
                        let z: f32 = rng.gen_range(-1.0..=1.0);
                        let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
                        let r = (1.0 - z * z).sqrt();
                        Vec3::new(r * theta.cos(), z, r * theta.sin()) * radius
                    }
                };
                let brightness = rng.gen_range(0.3..=1.0);
                let size = if rng.gen_bool(0.05) { 1.6 } else { 0.8 };
                Star {
                    position,
                    brightness,
                    size,
                }
            })
            .collect();

        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_closed_and_on_the_orbit() {
        let ring = orbit_ring(145.0, Projection::Orbital, ORBIT_SEGMENTS);
        assert_eq!(ring.len(), ORBIT_SEGMENTS + 1);
        assert!((ring[0] - ring[ORBIT_SEGMENTS]).length() < 1e-3);
        for point in &ring {
            assert!((point.length() - 145.0).abs() < 1e-2);
            assert_eq!(point.y, 0.0);
        }
    }

    #[test]
    fn flat_ring_lies_in_xy() {
        let ring = orbit_ring(70.0, Projection::Flat, 8);
        assert!(ring.iter().all(|p| p.z == 0.0));
        assert!((ring[2] - Vec3::new(0.0, 70.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn starfield_is_deterministic_per_seed() {
        let a = Starfield::generate(64, 7, 1000.0, Projection::Orbital);
        let b = Starfield::generate(64, 7, 1000.0, Projection::Orbital);
        let c = Starfield::generate(64, 8, 1000.0, Projection::Orbital);
        assert_eq!(a.stars, b.stars);
        assert_ne!(a.stars, c.stars);
        assert!(a.stars.iter().all(|s| (s.position.length() - 1000.0).abs() < 0.5));
    }

    #[test]
    fn flat_stars_sit_behind_the_orbits() {
        let field = Starfield::generate(32, 1, 600.0, Projection::Flat);
        assert_eq!(field.len(), 32);
        assert!(field
            .stars
            .iter()
            .all(|s| s.position.z < 0.0 && s.position.x.abs() <= 600.0));
    }
}
