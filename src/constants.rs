//! Application constants and configuration

use std::time::Duration;

pub const APP_NAME: &str = "Image Gallery";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Manifest looked up in the working directory when nothing else is configured
pub const DEFAULT_MANIFEST: &str = "images_data.json";
pub const MANIFEST_ENV: &str = "GALLERY_MANIFEST";

/// Quiet period before a search query is applied
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// How far outside the viewport a tile may be and still start loading its thumbnail
pub const LAZY_LOAD_MARGIN: f32 = 50.0;

/// Longest edge of decoded thumbnails kept in memory
pub const THUMBNAIL_MAX_EDGE: u32 = 480;

pub const TOAST_VISIBLE: Duration = Duration::from_secs(3);
pub const TOAST_FADE: Duration = Duration::from_millis(300);

/// Decoded full images kept for re-encoding downloads
pub const DECODED_CACHE_ENTRIES: usize = 32;
pub const DECODED_CACHE_MB: usize = 256;

/// Lightbox textures kept on each side of the current image
pub const FULL_TEXTURE_RADIUS: usize = 1;

/// JPEG quality for re-encoded downloads
pub const REENCODE_JPEG_QUALITY: u8 = 98;

// Built-in record shown when the manifest cannot be loaded
pub const FALLBACK_NAME: &str = "微信图片_20250331172746.jpg";
pub const FALLBACK_PATH: &str = "./微信图片_20250331172746.jpg";
pub const FALLBACK_DATE: &str = "2025-03-31";
pub const FALLBACK_SIZE: &str = "381KB";
