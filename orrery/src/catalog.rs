//! Static catalog of orbiting bodies
//!
//! Orbit radii are in pixels at the reference viewport scale and angular
//! speeds in degrees per frame, so the flat view at scale 1 reproduces the
//! classic CSS orrery layout exactly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Descriptive facts shown in the info panel
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyInfo {
    pub diameter: String,
    pub day_length: String,
    pub year_length: String,
    pub temperature: String,
    pub description: String,
}

/// Material preset for a body
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Appearance {
    /// Linear RGBA base color
    pub color: [f32; 4],
    /// Linear RGBA self-illumination added on the night side
    pub emissive: [f32; 4],
    pub roughness: f32,
    pub has_rings: bool,
    pub has_atmosphere: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: [0.8, 0.8, 0.8, 1.0],
            emissive: [0.0, 0.0, 0.0, 1.0],
            roughness: 0.5,
            has_rings: false,
            has_atmosphere: false,
        }
    }
}

impl Appearance {
    /// Build from sRGB hex colors such as `0x8C8C8C`
    pub fn from_hex(color: u32, emissive: u32, roughness: f32) -> Self {
        Self {
            color: srgb_hex_to_linear(color),
            emissive: srgb_hex_to_linear(emissive),
            roughness,
            ..Default::default()
        }
    }

    pub fn with_rings(mut self) -> Self {
        self.has_rings = true;
        self
    }

    pub fn with_atmosphere(mut self) -> Self {
        self.has_atmosphere = true;
        self
    }
}

fn srgb_hex_to_linear(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0), 1.0]
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodySpec {
    pub name: String,
    /// Distance from the center at viewport scale 1
    pub base_orbit_radius: f32,
    /// Degrees advanced per frame at speed multiplier 1
    pub angular_speed: f32,
    /// Visual radius in pixels
    pub size: f32,
    pub info: BodyInfo,
    pub appearance: Appearance,
}

impl BodySpec {
    pub fn new(name: &str, base_orbit_radius: f32, angular_speed: f32, size: f32) -> Self {
        Self {
            name: name.to_string(),
            base_orbit_radius,
            angular_speed,
            size,
            info: BodyInfo::default(),
            appearance: Appearance::default(),
        }
    }

    pub fn with_info(
        mut self,
        diameter: &str,
        day_length: &str,
        year_length: &str,
        temperature: &str,
        description: &str,
    ) -> Self {
        self.info = BodyInfo {
            diameter: diameter.to_string(),
            day_length: day_length.to_string(),
            year_length: year_length.to_string(),
            temperature: temperature.to_string(),
            description: description.to_string(),
        };
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Name with the first letter upper-cased, e.g. "saturn" -> "Saturn"
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dense index of a body, stable for the lifetime of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub usize);

impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered, read-only list of bodies loaded once at startup
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Catalog {
    bodies: Vec<BodySpec>,
}

impl Catalog {
    /// Entries are taken as given; negative radii or zero speeds are not rejected.
    pub fn new(bodies: Vec<BodySpec>) -> Self {
        Self { bodies }
    }

    /// The nine classic bodies, Mercury through Pluto
    pub fn solar_system() -> Self {
        let bodies = vec![
            BodySpec::new("mercury", 70.0, 4.1, 4.0)
                .with_info(
                    "4,879 km",
                    "59 Earth days",
                    "88 Earth days",
                    "-180°C to 430°C",
                    "The smallest planet and closest to the Sun, with a cratered surface and almost no atmosphere.",
                )
                .with_appearance(Appearance::from_hex(0x8C8C8C, 0x1C1C1C, 0.5)),
            BodySpec::new("venus", 100.0, 1.6, 7.0)
                .with_info(
                    "12,104 km",
                    "243 Earth days",
                    "225 Earth days",
                    "465°C",
                    "Wrapped in thick clouds of sulfuric acid, Venus is the hottest planet and spins backwards.",
                )
                .with_appearance(Appearance::from_hex(0xE6B87C, 0x4A3829, 0.7).with_atmosphere()),
            BodySpec::new("earth", 145.0, 1.0, 8.0)
                .with_info(
                    "12,742 km",
                    "24 hours",
                    "365.25 days",
                    "-88°C to 58°C",
                    "Our home world, the only known planet with liquid surface water and life.",
                )
                .with_appearance(Appearance::from_hex(0x4B6995, 0x1B2839, 0.6).with_atmosphere()),
            BodySpec::new("mars", 190.0, 0.5, 6.0)
                .with_info(
                    "6,779 km",
                    "24.6 hours",
                    "687 Earth days",
                    "-153°C to 20°C",
                    "The Red Planet, home to Olympus Mons, the largest volcano in the solar system.",
                )
                .with_appearance(Appearance::from_hex(0xC1440E, 0x3B1505, 0.7)),
            BodySpec::new("jupiter", 280.0, 0.08, 18.0)
                .with_info(
                    "139,820 km",
                    "9.9 hours",
                    "11.9 Earth years",
                    "-110°C",
                    "The largest planet, a gas giant whose Great Red Spot is a storm wider than Earth.",
                )
                .with_appearance(Appearance::from_hex(0xC88B3A, 0x46321B, 0.4).with_atmosphere()),
            BodySpec::new("saturn", 350.0, 0.03, 15.0)
                .with_info(
                    "116,460 km",
                    "10.7 hours",
                    "29.5 Earth years",
                    "-140°C",
                    "Famous for its bright ring system made of ice and rock.",
                )
                .with_appearance(
                    Appearance::from_hex(0xC5AB6E, 0x46321B, 0.5)
                        .with_rings()
                        .with_atmosphere(),
                ),
            BodySpec::new("uranus", 410.0, 0.01, 11.0)
                .with_info(
                    "50,724 km",
                    "17.2 hours",
                    "84 Earth years",
                    "-195°C",
                    "An ice giant that rotates on its side, tilted by about 98 degrees.",
                )
                .with_appearance(Appearance::from_hex(0x4FD0E7, 0x1B4B52, 0.6).with_atmosphere()),
            BodySpec::new("neptune", 460.0, 0.006, 11.0)
                .with_info(
                    "49,244 km",
                    "16.1 hours",
                    "165 Earth years",
                    "-200°C",
                    "The windiest planet, with supersonic storms sweeping its deep blue atmosphere.",
                )
                .with_appearance(Appearance::from_hex(0x4B70DD, 0x1B2D52, 0.6).with_atmosphere()),
            BodySpec::new("pluto", 500.0, 0.004, 3.0)
                .with_info(
                    "2,377 km",
                    "6.4 Earth days",
                    "248 Earth years",
                    "-230°C",
                    "A dwarf planet in the Kuiper Belt with a heart-shaped nitrogen ice plain.",
                )
                .with_appearance(Appearance::from_hex(0x936C5A, 0x2D1F1B, 0.8)),
        ];

        Self::new(bodies)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&BodySpec> {
        self.bodies.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<(BodyId, &BodySpec)> {
        self.iter().find(|(_, spec)| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &BodySpec)> {
        self.bodies.iter().enumerate().map(|(i, spec)| (BodyId(i), spec))
    }

    /// Largest base radius, 0 for an empty catalog
    pub fn max_base_orbit_radius(&self) -> f32 {
        self.bodies
            .iter()
            .map(|b| b.base_orbit_radius)
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_system_is_ordered_by_distance() {
        let catalog = Catalog::solar_system();
        assert_eq!(catalog.len(), 9);

        let radii: Vec<f32> = catalog.iter().map(|(_, b)| b.base_orbit_radius).collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(catalog.max_base_orbit_radius(), 500.0);
    }

    #[test]
    fn ids_are_positional() {
        let catalog = Catalog::solar_system();
        let (id, earth) = catalog.find("earth").unwrap();
        assert_eq!(id, BodyId(2));
        assert_eq!(earth.angular_speed, 1.0);
        assert_eq!(catalog.get(id).map(|b| b.name.as_str()), Some("earth"));
        assert!(catalog.find("vulcan").is_none());
    }

    #[test]
    fn only_saturn_has_rings() {
        let catalog = Catalog::solar_system();
        let ringed: Vec<&str> = catalog
            .iter()
            .filter(|(_, b)| b.appearance.has_rings)
            .map(|(_, b)| b.name.as_str())
            .collect();
        assert_eq!(ringed, vec!["saturn"]);
    }

    #[test]
    fn display_name_capitalizes_first_letter() {
        assert_eq!(display_name("mercury"), "Mercury");
        assert_eq!(display_name(""), "");
        assert_eq!(display_name("X"), "X");
    }

    #[test]
    fn hex_colors_are_linearized() {
        let white = srgb_hex_to_linear(0xFFFFFF);
        assert!((white[0] - 1.0).abs() < 1e-6);
        let grey = srgb_hex_to_linear(0x808080);
        assert!(grey[1] > 0.2 && grey[1] < 0.23);
    }

    #[test]
    fn malformed_entries_are_accepted() {
        let catalog = Catalog::new(vec![BodySpec::new("rogue", -10.0, 0.0, 1.0)]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.max_base_orbit_radius(), 0.0);
    }
}
