//! Re-encoding decoded pixels for download

use crate::constants::REENCODE_JPEG_QUALITY;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReencodeFormat {
    /// Lossless
    Png,
    Jpeg { quality: u8 },
}

fn extension(file: &str) -> Option<String> {
    Path::new(file)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// PNG stays PNG; everything else becomes high quality JPEG.
pub fn format_for(file: &str) -> ReencodeFormat {
    match extension(file).as_deref() {
        Some("png") => ReencodeFormat::Png,
        _ => ReencodeFormat::Jpeg {
            quality: REENCODE_JPEG_QUALITY,
        },
    }
}

/// Download name matching the encoded format
pub fn output_name(name: &str, format: ReencodeFormat) -> String {
    let ext = extension(name);
    match (format, ext.as_deref()) {
        (ReencodeFormat::Png, Some("png")) => name.to_string(),
        (ReencodeFormat::Jpeg { .. }, Some("jpg" | "jpeg")) => name.to_string(),
        (format, _) => {
            let stem = Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| name.to_string());
            match format {
                ReencodeFormat::Png => format!("{}.png", stem),
                ReencodeFormat::Jpeg { .. } => format!("{}.jpg", stem),
            }
        }
    }
}

pub fn encode(image: &RgbaImage, format: ReencodeFormat) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ReencodeFormat::Png => image.write_to(&mut out, ImageFormat::Png)?,
        ReencodeFormat::Jpeg { quality } => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
        }
    }
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_format_from_extension() {
        assert_eq!(format_for("./photos/A.PNG"), ReencodeFormat::Png);
        assert_eq!(format_for("a.jpeg"), ReencodeFormat::Jpeg { quality: 98 });
        assert_eq!(format_for("a.webp"), ReencodeFormat::Jpeg { quality: 98 });
        assert_eq!(format_for("noext"), ReencodeFormat::Jpeg { quality: 98 });
    }

    #[test]
    fn names_follow_format() {
        let jpeg = ReencodeFormat::Jpeg { quality: 98 };
        assert_eq!(output_name("a.png", ReencodeFormat::Png), "a.png");
        assert_eq!(output_name("微信图片.JPG", jpeg), "微信图片.JPG");
        assert_eq!(output_name("a.webp", jpeg), "a.jpg");
        assert_eq!(output_name("scan", jpeg), "scan.jpg");
    }

    #[test]
    fn encodes_both_formats() {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([200, 40, 40, 128]));

        let png = encode(&img, ReencodeFormat::Png).unwrap();
        let back = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(back, img);

        let jpeg = encode(&img, ReencodeFormat::Jpeg { quality: 98 }).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }
}
