//! Utility functions

use crate::constants::APP_NAME;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// Shown in place of thumbnails and images that fail to load
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="200" viewBox="0 0 300 200"><rect width="300" height="200" fill="#dddddd"/><g fill="none" stroke="#999999" stroke-width="6" stroke-linejoin="round"><rect x="110" y="65" width="80" height="64" rx="6"/><path d="M116 121l22-26 16 18 12-12 18 20"/></g><circle cx="172" cy="84" r="7" fill="#999999"/><path d="M105 140L195 55" stroke="#d32f2f" stroke-width="6" stroke-linecap="round"/></svg>"##;

// Square window/taskbar icon
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect x="4" y="10" width="56" height="44" rx="8" fill="#2dd4bf"/><circle cx="22" cy="26" r="6" fill="#09090b"/><path d="M8 50l16-16 10 10 8-8 18 14z" fill="#09090b"/></svg>"##;

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xdd, 0xdd, 0xdd, 0xff]);

/// Rasterize an SVG at the given width, preserving aspect ratio.
pub fn rasterize_svg(svg: &str, width: u32) -> Option<RgbaImage> {
    let tree = resvg::usvg::Tree::from_str(svg, &resvg::usvg::Options::default()).ok()?;
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    RgbaImage::from_raw(width, height, premul_to_straight(&pixmap))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Generated placeholder graphic (300x200)
pub fn placeholder_image() -> RgbaImage {
    rasterize_svg(PLACEHOLDER_SVG, 300)
        .unwrap_or_else(|| RgbaImage::from_pixel(300, 200, PLACEHOLDER_FILL))
}

/// Get the application data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Format bytes the way the manifest scanner labels sizes ("381.0KB")
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", size, UNITS[unit])
}

/// Strip anything that would escape the target directory
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed.to_string()
    }
}

/// First free path for `file_name` in `dir`: `a.jpg`, `a (1).jpg`, `a (2).jpg`, ...
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let file_name = sanitize_file_name(file_name);
    let candidate = dir.join(&file_name);
    if !candidate.exists() {
        return candidate;
    }
    let path = Path::new(&file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.clone());
    let ext = path.extension().map(|e| e.to_string_lossy().to_string());
    (1..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes_match_scanner_labels() {
        assert_eq!(format_file_size(0), "0B");
        assert_eq!(format_file_size(512), "512.0B");
        assert_eq!(format_file_size(390_144), "381.0KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0MB");
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("微信图片.jpg"), "微信图片.jpg");
        assert_eq!(sanitize_file_name("  "), "image");
    }

    #[test]
    fn destinations_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let first = unique_destination(dir.path(), "a.jpg");
        assert_eq!(first, dir.path().join("a.jpg"));
        std::fs::write(&first, b"x").unwrap();

        let second = unique_destination(dir.path(), "a.jpg");
        assert_eq!(second, dir.path().join("a (1).jpg"));
        std::fs::write(&second, b"x").unwrap();

        assert_eq!(unique_destination(dir.path(), "a.jpg"), dir.path().join("a (2).jpg"));
    }

    #[test]
    fn placeholder_has_expected_size() {
        let img = placeholder_image();
        assert_eq!((img.width(), img.height()), (300, 200));
    }
}
