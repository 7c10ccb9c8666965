//! Fetching and decoding thumbnails and full images

use crate::constants::{DECODED_CACHE_ENTRIES, DECODED_CACHE_MB};
use crate::fetch::{Fetch, FetchError, Location};
use crate::types::ImageRecord;
use crate::utils::placeholder_image;
use image::{DynamicImage, RgbaImage};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not decode {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: image::ImageError,
    },
}

/// Which link of the preview chain produced the pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSource {
    Thumbnail,
    FullImage,
    Placeholder,
}

pub struct LoadedImage {
    pub image: RgbaImage,
    pub source: PreviewSource,
}

/// Fetch and decode one resource relative to the manifest location
pub fn fetch_image(fetcher: &dyn Fetch, base: &Location, reference: &str) -> Result<DynamicImage, LoadError> {
    let location = base.resolve(reference)?;
    let bytes = fetcher.fetch(&location)?;
    image::load_from_memory(&bytes).map_err(|source| LoadError::Decode {
        location: location.to_string(),
        source,
    })
}

/// Tile preview: thumbnail, then the full image, then the placeholder graphic.
/// Never fails.
pub fn load_preview(fetcher: &dyn Fetch, base: &Location, record: &ImageRecord, max_edge: u32) -> LoadedImage {
    let has_thumbnail = record.thumbnail.as_deref().is_some_and(|t| !t.is_empty());

    if has_thumbnail {
        let source = record.preview_source();
        match fetch_image(fetcher, base, &source) {
            Ok(img) => {
                return LoadedImage {
                    image: shrink(img, max_edge),
                    source: PreviewSource::Thumbnail,
                }
            }
            Err(e) => debug!(name = %record.name, error = %e, "Thumbnail failed, trying full image"),
        }
    }

    match fetch_image(fetcher, base, &record.path) {
        Ok(img) => LoadedImage {
            image: shrink(img, max_edge),
            source: PreviewSource::FullImage,
        },
        Err(e) => {
            warn!(name = %record.name, error = %e, "Image unavailable, using placeholder");
            LoadedImage {
                image: placeholder_image(),
                source: PreviewSource::Placeholder,
            }
        }
    }
}

/// Full-resolution image for the lightbox
pub fn load_full(fetcher: &dyn Fetch, base: &Location, record: &ImageRecord) -> Result<RgbaImage, LoadError> {
    Ok(fetch_image(fetcher, base, &record.path)?.to_rgba8())
}

fn shrink(img: DynamicImage, max_edge: u32) -> RgbaImage {
    if img.width() > max_edge || img.height() > max_edge {
        img.thumbnail(max_edge, max_edge).to_rgba8()
    } else {
        img.to_rgba8()
    }
}

/// Full images already decoded for display, keyed by record path.
/// The re-encode download reuses these pixels instead of fetching again.
/// Bounded by entry count and total pixel bytes; least recently used go first.
pub struct DecodedImages {
    max_memory_bytes: usize,
    inner: Mutex<DecodedInner>,
}

struct DecodedInner {
    images: LruCache<String, Arc<RgbaImage>>,
    current_bytes: usize,
}

fn image_bytes(image: &RgbaImage) -> usize {
    image.as_raw().len()
}

impl Default for DecodedImages {
    fn default() -> Self {
        Self::new(DECODED_CACHE_ENTRIES, DECODED_CACHE_MB)
    }
}

impl DecodedImages {
    pub fn new(max_entries: usize, max_memory_mb: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_memory_bytes: max_memory_mb * 1024 * 1024,
            inner: Mutex::new(DecodedInner {
                images: LruCache::new(capacity),
                current_bytes: 0,
            }),
        }
    }

    pub fn insert(&self, path: &str, image: Arc<RgbaImage>) {
        let size = image_bytes(&image);
        if size > self.max_memory_bytes {
            debug!(path, size, "Decoded image larger than cache budget, not kept");
            return;
        }

        let mut inner = self.inner.lock();
        // Either the replaced entry for this path or the entry pushed out by the count cap
        if let Some((_, old)) = inner.images.push(path.to_string(), image) {
            inner.current_bytes = inner.current_bytes.saturating_sub(image_bytes(&old));
        }
        inner.current_bytes += size;

        while inner.current_bytes > self.max_memory_bytes {
            let Some((evicted_path, evicted)) = inner.images.pop_lru() else {
                break;
            };
            inner.current_bytes = inner.current_bytes.saturating_sub(image_bytes(&evicted));
            trace!(path = %evicted_path, current_bytes = inner.current_bytes, "Evicted decoded image");
        }
    }

    pub fn get(&self, path: &str) -> Option<Arc<RgbaImage>> {
        self.inner.lock().images.get(path).cloned()
    }

    /// Drop everything (the manifest was replaced)
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.images.clear();
        inner.current_bytes = 0;
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().images.len()
    }

    #[cfg(test)]
    fn memory_usage(&self) -> usize {
        self.inner.lock().current_bytes
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::PathBuf;

    /// In-memory fetcher keyed by the resolved location string
    #[derive(Default)]
    pub(crate) struct MemoryFetcher {
        pub files: HashMap<String, Vec<u8>>,
    }

    impl MemoryFetcher {
        pub fn with(mut self, location: &str, bytes: Vec<u8>) -> Self {
            self.files.insert(location.to_string(), bytes);
            self
        }
    }

    impl Fetch for MemoryFetcher {
        fn fetch(&self, location: &Location) -> Result<Vec<u8>, FetchError> {
            self.files
                .get(&location.to_string())
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: location.to_string(),
                    status: 404,
                })
        }
    }

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 120, 200, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn base() -> Location {
        Location::File(PathBuf::from("gallery/images_data.json"))
    }

    fn record(thumbnail: Option<&str>) -> ImageRecord {
        ImageRecord {
            name: "a.png".into(),
            path: "./a.png".into(),
            thumbnail: thumbnail.map(String::from),
            date: None,
            size: None,
            width: None,
            height: None,
        }
    }

    #[test]
    fn thumbnail_preferred() {
        let fetcher = MemoryFetcher::default()
            .with("gallery/thumbs/a.png", png_bytes(20, 10))
            .with("gallery/a.png", png_bytes(800, 400));
        let loaded = load_preview(&fetcher, &base(), &record(Some("thumbs/a.png")), 480);
        assert_eq!(loaded.source, PreviewSource::Thumbnail);
        assert_eq!(loaded.image.dimensions(), (20, 10));
    }

    #[test]
    fn broken_thumbnail_falls_back_to_full_image() {
        let fetcher = MemoryFetcher::default().with("gallery/a.png", png_bytes(800, 400));
        let loaded = load_preview(&fetcher, &base(), &record(Some("thumbs/a.png")), 480);
        assert_eq!(loaded.source, PreviewSource::FullImage);
        // Downscaled to fit the edge limit, aspect kept
        assert_eq!(loaded.image.dimensions(), (480, 240));
    }

    #[test]
    fn undecodable_thumbnail_falls_back() {
        let fetcher = MemoryFetcher::default()
            .with("gallery/thumbs/a.png", b"not an image".to_vec())
            .with("gallery/a.png", png_bytes(40, 40));
        let loaded = load_preview(&fetcher, &base(), &record(Some("thumbs/a.png")), 480);
        assert_eq!(loaded.source, PreviewSource::FullImage);
    }

    #[test]
    fn everything_missing_gives_placeholder() {
        let fetcher = MemoryFetcher::default();
        let loaded = load_preview(&fetcher, &base(), &record(None), 480);
        assert_eq!(loaded.source, PreviewSource::Placeholder);
        assert_eq!(loaded.image.width(), 300);
    }

    #[test]
    fn full_image_errors_propagate() {
        let fetcher = MemoryFetcher::default();
        assert!(matches!(
            load_full(&fetcher, &base(), &record(None)),
            Err(LoadError::Fetch(FetchError::Status { status: 404, .. }))
        ));
    }

    #[test]
    fn decoded_cache_shares_pixels() {
        let cache = DecodedImages::default();
        let img = Arc::new(RgbaImage::new(2, 2));
        cache.insert("./a.png", img.clone());
        assert!(Arc::ptr_eq(&cache.get("./a.png").unwrap(), &img));
        assert!(cache.get("./b.png").is_none());
    }

    #[test]
    fn decoded_cache_respects_entry_cap() {
        let cache = DecodedImages::new(4, 64);
        for i in 0..300 {
            cache.insert(&format!("./{i}.png"), Arc::new(RgbaImage::new(256, 256)));
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.memory_usage(), 4 * 256 * 256 * 4);
        // Oldest gone, newest kept
        assert!(cache.get("./0.png").is_none());
        assert!(cache.get("./299.png").is_some());
    }

    #[test]
    fn decoded_cache_respects_memory_budget() {
        // 1 MiB budget holds four 256x256 RGBA images
        let cache = DecodedImages::new(100, 1);
        for i in 0..10 {
            cache.insert(&format!("./{i}.png"), Arc::new(RgbaImage::new(256, 256)));
        }
        assert_eq!(cache.len(), 4);
        assert!(cache.memory_usage() <= 1024 * 1024);

        // Touching an entry protects it from the next eviction
        assert!(cache.get("./6.png").is_some());
        cache.insert("./10.png", Arc::new(RgbaImage::new(256, 256)));
        assert!(cache.get("./6.png").is_some());
        assert!(cache.get("./7.png").is_none());
    }

    #[test]
    fn decoded_cache_skips_oversized_and_replaces() {
        let cache = DecodedImages::new(8, 1);
        cache.insert("./huge.png", Arc::new(RgbaImage::new(1024, 1024)));
        assert!(cache.get("./huge.png").is_none());
        assert_eq!(cache.memory_usage(), 0);

        cache.insert("./a.png", Arc::new(RgbaImage::new(10, 10)));
        cache.insert("./a.png", Arc::new(RgbaImage::new(20, 20)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.memory_usage(), 20 * 20 * 4);
    }

    #[test]
    fn decoded_cache_clear() {
        let cache = DecodedImages::default();
        cache.insert("./a.png", Arc::new(RgbaImage::new(4, 4)));
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.memory_usage(), 0);
        assert!(cache.get("./a.png").is_none());
    }
}
