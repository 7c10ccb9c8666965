//! Download dispatcher: an ordered list of strategies, first success wins

mod platform;
mod reencode;
mod strategies;

pub use platform::{default_user_agent, Environment, GalleryFolder, InAppBrowser, ShareTarget};
pub use reencode::{encode, format_for, output_name, ReencodeFormat};
pub use strategies::{BlobDownload, CanvasReencode, DirectLink, InAppGuide, NativeShare};

use crate::fetch::{Fetch, FetchError, Location};
use crate::image_loader::DecodedImages;
use crate::types::ImageRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("could not encode {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("share target rejected {name}: {source}")]
    Share {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no download strategy applies")]
    NoStrategy,
    #[error("all download strategies failed ({})", attempted.join(", "))]
    Exhausted { attempted: Vec<&'static str> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf },
    SavedToGallery { path: PathBuf },
    /// Downloads are blocked here; the user was shown how to reopen elsewhere
    GuideShown { browser: InAppBrowser },
}

/// Everything a strategy may touch
pub struct DownloadContext<'a> {
    pub fetcher: &'a dyn Fetch,
    /// Manifest location; record paths resolve against it
    pub base: &'a Location,
    pub env: &'a Environment,
    pub download_dir: &'a Path,
    pub share: &'a dyn ShareTarget,
    pub decoded: &'a DecodedImages,
}

pub trait DownloadStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_applicable(&self, env: &Environment) -> bool;
    fn attempt(&self, record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<DownloadOutcome, DownloadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub strategy: &'static str,
    pub outcome: DownloadOutcome,
    /// Strategies tried, in order, including the one that succeeded
    pub attempted: Vec<&'static str>,
}

pub struct Dispatcher {
    strategies: Vec<Box<dyn DownloadStrategy>>,
}

impl Dispatcher {
    pub fn new(strategies: Vec<Box<dyn DownloadStrategy>>) -> Self {
        Self { strategies }
    }

    /// Guide, share, blob, re-encode, direct link
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(InAppGuide),
            Box::new(NativeShare),
            Box::new(BlobDownload),
            Box::new(CanvasReencode),
            Box::new(DirectLink),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn dispatch(&self, record: &ImageRecord, ctx: &DownloadContext<'_>) -> Result<DispatchReport, DownloadError> {
        let mut attempted = Vec::new();
        for strategy in self.strategies.iter().filter(|s| s.is_applicable(ctx.env)) {
            attempted.push(strategy.name());
            debug!(name = %record.name, strategy = strategy.name(), "Trying download strategy");
            match strategy.attempt(record, ctx) {
                Ok(outcome) => {
                    info!(name = %record.name, strategy = strategy.name(), "Download finished");
                    return Ok(DispatchReport {
                        strategy: strategy.name(),
                        outcome,
                        attempted,
                    });
                }
                Err(e) => {
                    warn!(name = %record.name, strategy = strategy.name(), error = %e, "Download strategy failed, falling back");
                }
            }
        }

        if attempted.is_empty() {
            Err(DownloadError::NoStrategy)
        } else {
            Err(DownloadError::Exhausted { attempted })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_loader::tests::{png_bytes, MemoryFetcher};
    use parking_lot::Mutex;
    use std::fs;
    use std::sync::Arc;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
    const WECHAT: &str = "Mozilla/5.0 (iPhone) Mobile MicroMessenger/8.0.42";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0";

    fn record(path: &str) -> ImageRecord {
        ImageRecord {
            name: path.trim_start_matches("./").to_string(),
            path: path.to_string(),
            thumbnail: None,
            date: None,
            size: None,
            width: None,
            height: None,
        }
    }

    fn base() -> Location {
        Location::File(PathBuf::from("site/images_data.json"))
    }

    /// Records what was shared; optionally refuses
    #[derive(Default)]
    struct RecordingShare {
        fail: bool,
        shared: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl ShareTarget for RecordingShare {
        fn share(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
            if self.fail {
                return Err(std::io::Error::other("share sheet dismissed"));
            }
            self.shared.lock().push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from("/gallery").join(file_name))
        }
    }

    struct Fixture {
        fetcher: MemoryFetcher,
        env: Environment,
        share: RecordingShare,
        decoded: DecodedImages,
        dir: tempfile::TempDir,
        base: Location,
    }

    impl Fixture {
        fn new(user_agent: &str, share_available: bool) -> Self {
            Self {
                fetcher: MemoryFetcher::default(),
                env: Environment::detect(Some(user_agent), Some(share_available)),
                share: RecordingShare::default(),
                decoded: DecodedImages::default(),
                dir: tempfile::tempdir().unwrap(),
                base: base(),
            }
        }

        fn ctx(&self) -> DownloadContext<'_> {
            DownloadContext {
                fetcher: &self.fetcher,
                base: &self.base,
                env: &self.env,
                download_dir: self.dir.path(),
                share: &self.share,
                decoded: &self.decoded,
            }
        }
    }

    #[test]
    fn desktop_png_is_copied_verbatim() {
        let mut fx = Fixture::new(DESKTOP, false);
        // Deliberately not a valid PNG: the desktop path must not decode or re-encode
        let original = b"\x89PNG raw bytes".to_vec();
        fx.fetcher = MemoryFetcher::default().with("site/photo.png", original.clone());

        let report = Dispatcher::standard().dispatch(&record("./photo.png"), &fx.ctx()).unwrap();

        assert_eq!(report.strategy, "direct-link");
        assert_eq!(report.attempted, vec!["direct-link"]);
        let DownloadOutcome::Downloaded { path } = report.outcome else {
            panic!("expected a download");
        };
        assert_eq!(path, fx.dir.path().join("photo.png"));
        assert_eq!(fs::read(path).unwrap(), original);
    }

    #[test]
    fn in_app_browser_gets_guide() {
        let fx = Fixture::new(WECHAT, true);
        let report = Dispatcher::standard().dispatch(&record("./a.jpg"), &fx.ctx()).unwrap();
        assert_eq!(
            report.outcome,
            DownloadOutcome::GuideShown {
                browser: InAppBrowser::WeChat
            }
        );
        assert_eq!(report.attempted, vec!["in-app-guide"]);
        assert!(fx.share.shared.lock().is_empty());
    }

    #[test]
    fn mobile_shares_when_available() {
        let mut fx = Fixture::new(IPHONE, true);
        fx.fetcher = MemoryFetcher::default().with("site/a.jpg", b"jpeg bytes".to_vec());

        let report = Dispatcher::standard().dispatch(&record("./a.jpg"), &fx.ctx()).unwrap();

        assert_eq!(report.strategy, "native-share");
        assert!(matches!(report.outcome, DownloadOutcome::SavedToGallery { .. }));
        assert_eq!(fx.share.shared.lock()[0], ("a.jpg".to_string(), b"jpeg bytes".to_vec()));
    }

    #[test]
    fn failed_share_falls_back_to_blob() {
        let mut fx = Fixture::new(IPHONE, true);
        fx.share.fail = true;
        fx.fetcher = MemoryFetcher::default().with("site/a.jpg", b"jpeg bytes".to_vec());

        let report = Dispatcher::standard().dispatch(&record("./a.jpg"), &fx.ctx()).unwrap();

        assert_eq!(report.attempted, vec!["native-share", "blob-download"]);
        let DownloadOutcome::Downloaded { path } = report.outcome else {
            panic!("expected a download");
        };
        assert_eq!(fs::read(path).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn mobile_without_share_skips_it() {
        let mut fx = Fixture::new(IPHONE, false);
        fx.fetcher = MemoryFetcher::default().with("site/a.jpg", b"jpeg bytes".to_vec());
        let report = Dispatcher::standard().dispatch(&record("./a.jpg"), &fx.ctx()).unwrap();
        assert_eq!(report.attempted, vec!["blob-download"]);
    }

    #[test]
    fn fetch_failure_reencodes_cached_pixels() {
        // Nothing fetchable, but the lightbox already decoded the image
        let fx = Fixture::new(IPHONE, false);
        let pixels = image::load_from_memory(&png_bytes(6, 4)).unwrap().to_rgba8();
        fx.decoded.insert("./a.png", Arc::new(pixels.clone()));

        let report = Dispatcher::standard().dispatch(&record("./a.png"), &fx.ctx()).unwrap();

        assert_eq!(report.attempted, vec!["blob-download", "canvas-reencode"]);
        let DownloadOutcome::Downloaded { path } = report.outcome else {
            panic!("expected a download");
        };
        assert_eq!(path.file_name().unwrap(), "a.png");
        let written = image::load_from_memory(&fs::read(path).unwrap()).unwrap().to_rgba8();
        assert_eq!(written, pixels);
    }

    #[test]
    fn reencode_renames_non_jpeg_output() {
        let fx = Fixture::new(IPHONE, false);
        fx.decoded
            .insert("./a.webp", Arc::new(image::RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255]))));

        let report = Dispatcher::standard().dispatch(&record("./a.webp"), &fx.ctx()).unwrap();
        let DownloadOutcome::Downloaded { path } = report.outcome else {
            panic!("expected a download");
        };
        assert_eq!(path.file_name().unwrap(), "a.jpg");
        assert_eq!(
            image::guess_format(&fs::read(path).unwrap()).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn exhausted_chain_reports_attempts() {
        let fx = Fixture::new(IPHONE, true);
        let err = Dispatcher::standard()
            .dispatch(&record("./missing.jpg"), &fx.ctx())
            .unwrap_err();
        match err {
            DownloadError::Exhausted { attempted } => {
                assert_eq!(attempted, vec!["native-share", "blob-download", "canvas-reencode"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_dispatcher_has_no_strategy() {
        let fx = Fixture::new(DESKTOP, false);
        assert!(matches!(
            Dispatcher::new(Vec::new()).dispatch(&record("./a.jpg"), &fx.ctx()),
            Err(DownloadError::NoStrategy)
        ));
    }

    #[test]
    fn standard_order() {
        assert_eq!(
            Dispatcher::standard().strategy_names(),
            vec!["in-app-guide", "native-share", "blob-download", "canvas-reencode", "direct-link"]
        );
    }
}
