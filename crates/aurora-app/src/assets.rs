//! Background texture loading.
//!
//! Requests are queued to a single worker thread that resolves each location
//! against the asset root and decodes it to RGBA8. Decoded images come back
//! over a channel that the renderer drains between frames. Images larger than
//! the device's texture limit are scaled down before they are sent. A failed
//! load is logged and dropped, leaving the material on its fallback texel.

use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{info, warn};

use image::RgbaImage;
use image::imageops::{self, FilterType};

use aurora_scene::{AssetLoader, TextureRef};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to spawn texture loader thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Remote location with no bundled copy under the asset root.
    #[error("remote location {0} is not bundled and network loading is unsupported")]
    RemoteUnsupported(String),
}

/// A decoded texture ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTexture {
    pub texture: TextureRef,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub rgba: Vec<u8>,
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Map a texture location to a file on disk.
///
/// Remote locations resolve to a bundled copy named after the URL's last
/// path segment. Relative paths are joined to `root`; absolute ones are kept.
pub fn resolve_location(root: &Path, texture: &TextureRef) -> Result<PathBuf, AssetError> {
    if is_remote(texture.location) {
        let bundled = root.join(texture.file_name());
        return if bundled.is_file() {
            Ok(bundled)
        } else {
            Err(AssetError::RemoteUnsupported(texture.location.to_string()))
        };
    }
    Ok(root.join(texture.location))
}

/// Shrink `image` so neither side exceeds `max_dimension`, keeping its
/// aspect ratio. Images already within the limit are returned unchanged.
pub fn fit_within(image: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_dimension {
        return image;
    }
    let scale = |side: u32| (side as u64 * max_dimension as u64 / longest as u64).max(1) as u32;
    let (fit_width, fit_height) = (scale(width), scale(height));
    warn!("Scaling {width}x{height} texture down to {fit_width}x{fit_height}");
    imageops::resize(&image, fit_width, fit_height, FilterType::Triangle)
}

/// Resolve and decode one texture on the calling thread.
pub fn load_texture(
    root: &Path,
    texture: &TextureRef,
    max_dimension: u32,
) -> Result<LoadedTexture, AssetError> {
    let path = resolve_location(root, texture)?;
    let image = image::open(&path)
        .map_err(|source| AssetError::Decode {
            path: path.clone(),
            source,
        })?
        .into_rgba8();
    let image = fit_within(image, max_dimension);

    let (width, height) = image.dimensions();
    Ok(LoadedTexture {
        texture: *texture,
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// [`AssetLoader`] backed by one named worker thread.
///
/// The worker exits once the loader is dropped and its queue is drained.
pub struct ThreadedTextureLoader {
    requests: Sender<TextureRef>,
    results: Receiver<LoadedTexture>,
}

impl ThreadedTextureLoader {
    /// Start the worker. Decoded images are limited to `max_dimension`
    /// texels per side.
    pub fn spawn(root: PathBuf, max_dimension: u32) -> Result<Self, AssetError> {
        let (requests, request_rx) = unbounded::<TextureRef>();
        let (result_tx, results) = unbounded();

        std::thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                while let Ok(texture) = request_rx.recv() {
                    match load_texture(&root, &texture, max_dimension) {
                        Ok(loaded) => {
                            info!(
                                "Loaded {} {} map ({}x{})",
                                texture.body.name(),
                                texture.map.label(),
                                loaded.width,
                                loaded.height
                            );
                            if result_tx.send(loaded).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!(
                            "{} {} map unavailable, keeping fallback: {e}",
                            texture.body.name(),
                            texture.map.label()
                        ),
                    }
                }
            })
            .map_err(AssetError::WorkerSpawn)?;

        Ok(Self { requests, results })
    }

    /// Receiving end for decoded textures. Clones share one queue.
    pub fn results(&self) -> Receiver<LoadedTexture> {
        self.results.clone()
    }
}

impl AssetLoader for ThreadedTextureLoader {
    fn load(&self, texture: &TextureRef) {
        if self.requests.send(*texture).is_err() {
            warn!("Texture loader stopped; {} not requested", texture.file_name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_planet::MaterialMap;
    use aurora_scene::{BodyId, EARTH_NORMAL_URL};
    use std::time::Duration;

    const LIMIT: u32 = 8192;

    fn normal_map() -> TextureRef {
        TextureRef {
            body: BodyId::Planet,
            map: MaterialMap::Normal,
            location: EARTH_NORMAL_URL,
        }
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([128, 128, 255, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_remote_without_bundle_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_location(dir.path(), &normal_map()).unwrap_err();
        assert!(matches!(err, AssetError::RemoteUnsupported(url) if url == EARTH_NORMAL_URL));
    }

    #[test]
    fn test_remote_resolves_to_bundled_copy() {
        let dir = tempfile::tempdir().unwrap();
        let bundled = dir.path().join("2k_earth_normal_map.png");
        write_png(&bundled, 2, 2);

        assert_eq!(resolve_location(dir.path(), &normal_map()).unwrap(), bundled);
    }

    #[test]
    fn test_relative_location_joins_root() {
        let texture = TextureRef {
            location: "textures/clouds.png",
            ..normal_map()
        };
        let path = resolve_location(Path::new("/srv/aurora"), &texture).unwrap();
        assert_eq!(path, Path::new("/srv/aurora/textures/clouds.png"));
    }

    #[test]
    fn test_load_texture_decodes_rgba() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("2k_earth_normal_map.png"), 4, 2);

        let loaded = load_texture(dir.path(), &normal_map(), LIMIT).unwrap();

        assert_eq!((loaded.width, loaded.height), (4, 2));
        assert_eq!(loaded.rgba.len(), 4 * 2 * 4);
        assert_eq!(&loaded.rgba[..4], &[128, 128, 255, 255]);
        assert_eq!(loaded.texture, normal_map());
    }

    #[test]
    fn test_fit_within_keeps_small_images() {
        let image = RgbaImage::new(64, 32);
        assert_eq!(fit_within(image, 64).dimensions(), (64, 32));
    }

    #[test]
    fn test_fit_within_preserves_aspect_ratio() {
        assert_eq!(fit_within(RgbaImage::new(64, 32), 16).dimensions(), (16, 8));
        assert_eq!(fit_within(RgbaImage::new(10, 40), 20).dimensions(), (5, 20));
        assert_eq!(fit_within(RgbaImage::new(100, 1), 10).dimensions(), (10, 1));
    }

    #[test]
    fn test_oversized_texture_is_scaled_on_load() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("2k_earth_normal_map.png"), 32, 16);

        let loaded = load_texture(dir.path(), &normal_map(), 8).unwrap();

        assert_eq!((loaded.width, loaded.height), (8, 4));
        assert_eq!(loaded.rgba.len(), 8 * 4 * 4);
        assert!(loaded.rgba[..4].iter().zip([128u8, 128, 255, 255]).all(|(&a, b)| a.abs_diff(b) <= 1));
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("2k_earth_normal_map.png"), b"not a png").unwrap();

        let err = load_texture(dir.path(), &normal_map(), LIMIT).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn test_worker_delivers_loaded_textures() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("2k_earth_normal_map.png"), 2, 2);

        let loader = ThreadedTextureLoader::spawn(dir.path().to_path_buf(), LIMIT).unwrap();
        let results = loader.results();
        loader.load(&normal_map());

        let loaded = results.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(loaded.texture.map, MaterialMap::Normal);
        assert_eq!((loaded.width, loaded.height), (2, 2));
    }

    #[test]
    fn test_worker_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("2k_earth_normal_map.png"), 2, 2);

        let loader = ThreadedTextureLoader::spawn(dir.path().to_path_buf(), LIMIT).unwrap();
        let results = loader.results();
        let missing = TextureRef {
            location: "missing.png",
            ..normal_map()
        };
        loader.load(&missing);
        loader.load(&normal_map());
        drop(loader);

        // Only the good texture arrives; the channel then disconnects.
        let received: Vec<_> = results.iter().collect();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].texture.location, EARTH_NORMAL_URL);
    }
}
