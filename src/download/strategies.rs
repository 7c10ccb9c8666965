use super::reencode::{encode, format_for, output_name};
use super::{DownloadContext, DownloadError, DownloadOutcome, DownloadStrategy, Environment};
use crate::image_loader::{load_full, LoadError};
use crate::types::ImageRecord;
use crate::utils::unique_destination;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// File name offered for a record: its display name, else the last path segment
fn download_name(record: &ImageRecord) -> String {
    if !record.name.trim().is_empty() {
        return record.name.clone();
    }
    Path::new(&record.path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string())
}

fn fetch_bytes(record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<Vec<u8>, DownloadError> {
    let location = ctx.base.resolve(&record.path)?;
    Ok(ctx.fetcher.fetch(&location)?)
}

fn prepare_destination(dir: &Path, file_name: &str) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(dir).map_err(|source| DownloadError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(unique_destination(dir, file_name))
}

fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    let dest = prepare_destination(dir, file_name)?;
    fs::write(&dest, bytes).map_err(|source| DownloadError::Write {
        path: dest.clone(),
        source,
    })?;
    Ok(dest)
}

/// Embedded browsers block downloads; explain how to reopen the page instead.
pub struct InAppGuide;

impl DownloadStrategy for InAppGuide {
    fn name(&self) -> &'static str {
        "in-app-guide"
    }

    fn is_applicable(&self, env: &Environment) -> bool {
        env.in_app_browser().is_some()
    }

    fn attempt(&self, _record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<DownloadOutcome, DownloadError> {
        match ctx.env.in_app_browser() {
            Some(browser) => Ok(DownloadOutcome::GuideShown { browser }),
            None => Err(DownloadError::NoStrategy),
        }
    }
}

/// Mobile: hand the fetched file to the native share target
pub struct NativeShare;

impl DownloadStrategy for NativeShare {
    fn name(&self) -> &'static str {
        "native-share"
    }

    fn is_applicable(&self, env: &Environment) -> bool {
        env.is_mobile() && env.share_available
    }

    fn attempt(&self, record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<DownloadOutcome, DownloadError> {
        let bytes = fetch_bytes(record, ctx)?;
        let name = download_name(record);
        let path = ctx
            .share
            .share(&name, &bytes)
            .map_err(|source| DownloadError::Share { name, source })?;
        Ok(DownloadOutcome::SavedToGallery { path })
    }
}

/// Mobile: fetch the bytes and save them as a file
pub struct BlobDownload;

impl DownloadStrategy for BlobDownload {
    fn name(&self) -> &'static str {
        "blob-download"
    }

    fn is_applicable(&self, env: &Environment) -> bool {
        env.is_mobile()
    }

    fn attempt(&self, record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<DownloadOutcome, DownloadError> {
        let bytes = fetch_bytes(record, ctx)?;
        let path = write_file(ctx.download_dir, &download_name(record), &bytes)?;
        Ok(DownloadOutcome::Downloaded { path })
    }
}

/// Mobile last resort: re-encode decoded pixels. Prefers pixels already decoded
/// for display over a fresh fetch.
pub struct CanvasReencode;

impl CanvasReencode {
    fn pixels(record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<Arc<image::RgbaImage>, DownloadError> {
        if let Some(cached) = ctx.decoded.get(&record.path) {
            debug!(name = %record.name, "Re-encoding cached pixels");
            return Ok(cached);
        }
        match load_full(ctx.fetcher, ctx.base, record) {
            Ok(img) => Ok(Arc::new(img)),
            Err(LoadError::Fetch(e)) => Err(DownloadError::Fetch(e)),
            Err(LoadError::Decode { source, .. }) => Err(DownloadError::Decode {
                name: record.name.clone(),
                source,
            }),
        }
    }
}

impl DownloadStrategy for CanvasReencode {
    fn name(&self) -> &'static str {
        "canvas-reencode"
    }

    fn is_applicable(&self, env: &Environment) -> bool {
        env.is_mobile()
    }

    fn attempt(&self, record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<DownloadOutcome, DownloadError> {
        let pixels = Self::pixels(record, ctx)?;
        let format = format_for(&record.path);
        let name = output_name(&download_name(record), format);
        let bytes = encode(&pixels, format).map_err(|source| DownloadError::Encode {
            name: name.clone(),
            source,
        })?;
        let path = write_file(ctx.download_dir, &name, &bytes)?;
        Ok(DownloadOutcome::Downloaded { path })
    }
}

/// Desktop: copy the original resource untouched
pub struct DirectLink;

impl DownloadStrategy for DirectLink {
    fn name(&self) -> &'static str {
        "direct-link"
    }

    fn is_applicable(&self, env: &Environment) -> bool {
        !env.is_mobile()
    }

    fn attempt(&self, record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<DownloadOutcome, DownloadError> {
        let location = ctx.base.resolve(&record.path)?;
        let dest = prepare_destination(ctx.download_dir, &download_name(record))?;
        match ctx.fetcher.fetch_to(&location, &dest) {
            Ok(bytes) => {
                debug!(path = %dest.display(), bytes, "Saved original");
                Ok(DownloadOutcome::Downloaded { path: dest })
            }
            Err(e) => {
                // Drop the partial file
                let _ = fs::remove_file(&dest);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_name_falls_back_to_path() {
        let mut record = ImageRecord {
            name: "  ".into(),
            path: "./photos/b.jpg".into(),
            thumbnail: None,
            date: None,
            size: None,
            width: None,
            height: None,
        };
        assert_eq!(download_name(&record), "b.jpg");
        record.name = "Beach.jpg".into();
        assert_eq!(download_name(&record), "Beach.jpg");
    }

    #[test]
    fn applicability_by_platform() {
        let desktop = Environment::detect(Some("Mozilla/5.0 (Windows NT 10.0)"), Some(true));
        assert!(DirectLink.is_applicable(&desktop));
        assert!(!NativeShare.is_applicable(&desktop));
        assert!(!CanvasReencode.is_applicable(&desktop));
        assert!(!InAppGuide.is_applicable(&desktop));

        let phone = Environment::detect(Some("Mozilla/5.0 (Linux; Android 14) Mobile"), Some(true));
        assert!(!DirectLink.is_applicable(&phone));
        assert!(NativeShare.is_applicable(&phone));
        assert!(BlobDownload.is_applicable(&phone));
    }
}
