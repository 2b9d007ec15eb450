//! Texture locations and the loader seam the scene hands them to.

use aurora_planet::MaterialMap;

use crate::body::BodyId;

/// Blue-marble topography and bathymetry.
pub const EARTH_COLOR_URL: &str = "https://eoimages.gsfc.nasa.gov/images/imagerecords/73000/73909/world.topo.bathy.200412.3x5400x2700.jpg";
pub const EARTH_NORMAL_URL: &str =
    "https://www.solarsystemscope.com/textures/download/2k_earth_normal_map.png";
pub const EARTH_SPECULAR_URL: &str =
    "https://www.solarsystemscope.com/textures/download/2k_earth_specular_map.png";
/// City lights.
pub const EARTH_EMISSIVE_URL: &str =
    "https://www.solarsystemscope.com/textures/download/2k_earth_nightmap.jpg";
pub const EARTH_CLOUDS_URL: &str =
    "https://www.solarsystemscope.com/textures/download/2k_earth_clouds.jpg";

/// One texture a body's material wants, and where it comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub body: BodyId,
    pub map: MaterialMap,
    pub location: &'static str,
}

impl TextureRef {
    /// The file name at the end of the location.
    pub fn file_name(&self) -> &'static str {
        self.location
            .rsplit('/')
            .next()
            .unwrap_or(self.location)
    }
}

/// Every texture the scene requests.
pub fn scene_textures() -> [TextureRef; 5] {
    [
        TextureRef {
            body: BodyId::Planet,
            map: MaterialMap::Color,
            location: EARTH_COLOR_URL,
        },
        TextureRef {
            body: BodyId::Planet,
            map: MaterialMap::Normal,
            location: EARTH_NORMAL_URL,
        },
        TextureRef {
            body: BodyId::Planet,
            map: MaterialMap::Specular,
            location: EARTH_SPECULAR_URL,
        },
        TextureRef {
            body: BodyId::Planet,
            map: MaterialMap::Emissive,
            location: EARTH_EMISSIVE_URL,
        },
        TextureRef {
            body: BodyId::Clouds,
            map: MaterialMap::Color,
            location: EARTH_CLOUDS_URL,
        },
    ]
}

/// Fire-and-forget texture loading. Results, if any, reach the renderer
/// through a channel of the implementor's choosing; a failed load leaves the
/// material on its fallback.
pub trait AssetLoader {
    fn load(&self, texture: &TextureRef);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let names: Vec<&str> = scene_textures().iter().map(TextureRef::file_name).collect();
        assert_eq!(
            names,
            vec![
                "world.topo.bathy.200412.3x5400x2700.jpg",
                "2k_earth_normal_map.png",
                "2k_earth_specular_map.png",
                "2k_earth_nightmap.jpg",
                "2k_earth_clouds.jpg",
            ]
        );
    }

    #[test]
    fn test_planet_requests_every_map_once() {
        let textures = scene_textures();
        for map in MaterialMap::ALL {
            let count = textures
                .iter()
                .filter(|t| t.body == BodyId::Planet && t.map == map)
                .count();
            assert_eq!(count, 1, "{map:?}");
        }
    }
}
