//! Manifest loading with a built-in fallback record

use crate::constants::*;
use crate::fetch::{Fetch, FetchError, Location};
use crate::types::{ImageRecord, Manifest, ManifestImage};
use crate::utils::format_file_size;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the displayed records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestOrigin {
    Manifest,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub records: Vec<ImageRecord>,
    pub origin: ManifestOrigin,
    pub last_updated: Option<String>,
    pub total_size: Option<u64>,
}

impl LoadedManifest {
    pub fn fallback() -> Self {
        Self {
            records: vec![fallback_record()],
            origin: ManifestOrigin::Fallback,
            last_updated: None,
            total_size: None,
        }
    }
}

impl From<Manifest> for LoadedManifest {
    fn from(manifest: Manifest) -> Self {
        let declared = manifest.images.len();
        let records: Vec<ImageRecord> = manifest
            .images
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| parse_entry(position, entry))
            .filter_map(into_record)
            .collect();
        if records.len() != declared {
            warn!(
                declared = declared,
                accepted = records.len(),
                "Dropped manifest entries without name or path"
            );
        }
        if let Some(total) = manifest.total_images {
            if total != declared {
                debug!(total_images = total, entries = declared, "Manifest count mismatch");
            }
        }
        Self {
            records,
            origin: ManifestOrigin::Manifest,
            last_updated: manifest.last_updated,
            total_size: manifest.total_size,
        }
    }
}

/// The single record shown when no manifest could be loaded
pub fn fallback_record() -> ImageRecord {
    ImageRecord {
        name: FALLBACK_NAME.to_string(),
        path: FALLBACK_PATH.to_string(),
        thumbnail: None,
        date: parse_timestamp(FALLBACK_DATE),
        size: Some(FALLBACK_SIZE.to_string()),
        width: None,
        height: None,
    }
}

/// Fetch and parse the manifest. Never fails: any error yields the fallback record.
pub fn load_manifest(fetcher: &dyn Fetch, location: &Location) -> LoadedManifest {
    match fetch_manifest(fetcher, location) {
        Ok(manifest) => {
            let loaded = LoadedManifest::from(manifest);
            info!(location = %location, count = loaded.records.len(), "Manifest loaded");
            loaded
        }
        Err(e) => {
            warn!(location = %location, error = %e, "Manifest unavailable, using fallback record");
            LoadedManifest::fallback()
        }
    }
}

pub fn fetch_manifest(fetcher: &dyn Fetch, location: &Location) -> Result<Manifest, ManifestError> {
    let bytes = fetcher.fetch(location)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Entries that are not JSON objects are skipped on their own
fn parse_entry(position: usize, entry: serde_json::Value) -> Option<ManifestImage> {
    match serde_json::from_value(entry) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(entry = position, error = %e, "Skipping malformed manifest entry");
            None
        }
    }
}

fn into_record(image: ManifestImage) -> Option<ImageRecord> {
    let name = image.name.filter(|n| !n.is_empty())?;
    let path = image.path.filter(|p| !p.is_empty())?;
    let date = image
        .modified_time
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| image.modified_date.as_deref().and_then(parse_timestamp));
    let size = image
        .size
        .or_else(|| image.size_bytes.map(format_file_size));
    Some(ImageRecord {
        name,
        path,
        thumbnail: image.thumbnail.filter(|t| !t.is_empty()),
        date,
        size,
        width: image.width,
        height: image.height,
    })
}

/// Accepts RFC 3339, ISO local timestamps (with or without fraction),
/// `YYYY-MM-DD HH:MM[:SS]` and bare dates.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
