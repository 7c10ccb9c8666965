//! Resource locations and byte fetching (HTTP or local files)

use reqwest::Url;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a manifest or image lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(Url),
    File(PathBuf),
}

impl Location {
    pub fn parse(s: &str) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidLocation {
            location: s.to_string(),
            reason,
        };
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s)
                .map(Location::Url)
                .map_err(|e| invalid(e.to_string()))
        } else if s.starts_with("file://") {
            let url = Url::parse(s).map_err(|e| invalid(e.to_string()))?;
            url.to_file_path()
                .map(Location::File)
                .map_err(|_| invalid("not a local path".into()))
        } else if s.contains("://") {
            Err(invalid("unsupported scheme".into()))
        } else {
            Ok(Location::File(PathBuf::from(s)))
        }
    }

    /// Resolve a manifest-relative reference (`./a.jpg`, `thumbs/a.jpg`, absolute URL)
    /// against this location.
    pub fn resolve(&self, reference: &str) -> Result<Location, FetchError> {
        if reference.contains("://") {
            return Location::parse(reference);
        }
        match self {
            Location::Url(base) => base.join(reference).map(Location::Url).map_err(|e| {
                FetchError::InvalidLocation {
                    location: reference.to_string(),
                    reason: e.to_string(),
                }
            }),
            Location::File(base) => {
                let reference = Path::new(reference);
                if reference.is_absolute() {
                    return Ok(Location::File(reference.to_path_buf()));
                }
                let reference = reference.strip_prefix("./").unwrap_or(reference);
                let dir = base.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::File(dir.join(reference)))
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{}", url),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Byte source for manifests and images
pub trait Fetch: Send + Sync {
    fn fetch(&self, location: &Location) -> Result<Vec<u8>, FetchError>;

    /// Copy the resource to `dest` without interpreting it. Returns bytes written.
    fn fetch_to(&self, location: &Location, dest: &Path) -> Result<u64, FetchError> {
        let bytes = self.fetch(location)?;
        std::fs::write(dest, &bytes).map_err(|source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(bytes.len() as u64)
    }
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &Url) -> Result<reqwest::blocking::Response, FetchError> {
        let response = self.client.get(url.clone()).send()?;
        debug!(url = %url, status = %response.status(), "Response received");
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, location: &Location) -> Result<Vec<u8>, FetchError> {
        match location {
            Location::Url(url) => Ok(self.get(url)?.bytes()?.to_vec()),
            Location::File(path) => std::fs::read(path).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            }),
        }
    }

    fn fetch_to(&self, location: &Location, dest: &Path) -> Result<u64, FetchError> {
        let io_err = |source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        };
        match location {
            Location::Url(url) => {
                let mut response = self.get(url)?;
                let mut file = File::create(dest).map_err(io_err)?;
                Ok(response.copy_to(&mut file)?)
            }
            Location::File(path) => std::fs::copy(path, dest).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urls_and_paths() {
        assert!(matches!(
            Location::parse("https://example.com/gallery/images_data.json"),
            Ok(Location::Url(_))
        ));
        assert_eq!(
            Location::parse("images_data.json").unwrap(),
            Location::File(PathBuf::from("images_data.json"))
        );
        assert!(Location::parse("ftp://example.com/x").is_err());
    }

    #[test]
    fn resolves_against_url_directory() {
        let base = Location::parse("https://example.com/gallery/images_data.json").unwrap();
        assert_eq!(
            base.resolve("./a.jpg").unwrap().to_string(),
            "https://example.com/gallery/a.jpg"
        );
        assert_eq!(
            base.resolve("thumbs/a.jpg").unwrap().to_string(),
            "https://example.com/gallery/thumbs/a.jpg"
        );
        assert_eq!(
            base.resolve("https://cdn.example.com/b.png").unwrap().to_string(),
            "https://cdn.example.com/b.png"
        );
    }

    #[test]
    fn resolves_against_file_directory() {
        let base = Location::File(PathBuf::from("/srv/gallery/images_data.json"));
        assert_eq!(
            base.resolve("./a.jpg").unwrap(),
            Location::File(PathBuf::from("/srv/gallery/a.jpg"))
        );
        assert_eq!(
            base.resolve("/tmp/b.jpg").unwrap(),
            Location::File(PathBuf::from("/tmp/b.jpg"))
        );

        let bare = Location::File(PathBuf::from("images_data.json"));
        assert_eq!(
            bare.resolve("./a.jpg").unwrap(),
            Location::File(PathBuf::from("a.jpg"))
        );
    }

    #[test]
    fn local_fetch_and_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.bin");
        std::fs::write(&src, b"abc").unwrap();

        let fetcher = HttpFetcher::new("test").unwrap();
        let location = Location::File(src);
        assert_eq!(fetcher.fetch(&location).unwrap(), b"abc");

        let dest = dir.path().join("copy.bin");
        assert_eq!(fetcher.fetch_to(&location, &dest).unwrap(), 3);
        assert_eq!(std::fs::read(dest).unwrap(), b"abc");

        let missing = Location::File(dir.path().join("missing"));
        assert!(matches!(fetcher.fetch(&missing), Err(FetchError::Io { .. })));
    }
}
