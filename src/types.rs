//! Common types and data structures

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// Manifest structure as produced by the image scanner.
/// Entries stay raw JSON so one malformed entry cannot sink the rest.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "lenient")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_images: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_size: Option<u64>,
    pub images: Vec<serde_json::Value>,
}

/// Individual image entry in the manifest. Everything is optional at this level;
/// entries without a name or path are dropped when converted to [`ImageRecord`].
/// A field of the wrong type reads as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManifestImage {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub modified_time: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub modified_date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub size_bytes: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub width: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub height: Option<u32>,
}

/// Optional field that turns a value of the wrong type into `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<T>>(value).ok().flatten())
}

/// One image accepted into the gallery
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub name: String,
    pub path: String,
    pub thumbnail: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub size: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRecord {
    /// Source used for the tile preview: the thumbnail when present, else the full image.
    pub fn preview_source(&self) -> Cow<'_, str> {
        match self.thumbnail.as_deref() {
            Some(thumb) if !thumb.is_empty() => normalize_relative(thumb),
            _ => Cow::Borrowed(self.path.as_str()),
        }
    }

    /// Width and height, only when both are known
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }
}

/// Relative paths get a leading `./`; absolute paths and URLs are kept as-is.
fn normalize_relative(path: &str) -> Cow<'_, str> {
    if path.starts_with("./")
        || path.starts_with("../")
        || path.starts_with('/')
        || path.contains("://")
        || path.starts_with("data:")
    {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("./{}", path))
    }
}

/// Gallery layout. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, thumbnail: Option<&str>) -> ImageRecord {
        ImageRecord {
            name: "a.jpg".into(),
            path: path.into(),
            thumbnail: thumbnail.map(String::from),
            date: None,
            size: None,
            width: None,
            height: None,
        }
    }

    #[test]
    fn preview_falls_back_to_path() {
        assert_eq!(record("./a.jpg", None).preview_source(), "./a.jpg");
        assert_eq!(record("./a.jpg", Some("")).preview_source(), "./a.jpg");
    }

    #[test]
    fn thumbnail_paths_are_normalized() {
        assert_eq!(
            record("a.jpg", Some("thumbnails/a.jpg")).preview_source(),
            "./thumbnails/a.jpg"
        );
        assert_eq!(
            record("a.jpg", Some("./thumbnails/a.jpg")).preview_source(),
            "./thumbnails/a.jpg"
        );
        assert_eq!(
            record("a.jpg", Some("https://cdn.example.com/a.jpg")).preview_source(),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn dimensions_need_both_sides() {
        let mut r = record("a.jpg", None);
        r.width = Some(640);
        assert_eq!(r.dimensions(), None);
        r.height = Some(480);
        assert_eq!(r.dimensions(), Some((640, 480)));
    }

    #[test]
    fn off_type_fields_read_as_absent() {
        let image: ManifestImage = serde_json::from_str(
            r#"{"name": "b.jpg", "path": "b.jpg", "width": "1920", "height": 1080, "size_bytes": -3}"#,
        )
        .unwrap();
        assert_eq!(image.name.as_deref(), Some("b.jpg"));
        assert_eq!(image.width, None);
        assert_eq!(image.height, Some(1080));
        assert_eq!(image.size_bytes, None);

        let image: ManifestImage = serde_json::from_str(r#"{"name": 7, "path": null}"#).unwrap();
        assert_eq!(image.name, None);
        assert_eq!(image.path, None);
    }

    #[test]
    fn view_mode_toggles() {
        assert_eq!(ViewMode::Grid.toggled(), ViewMode::List);
        assert_eq!(ViewMode::List.toggled(), ViewMode::Grid);
    }
}
