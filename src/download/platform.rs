//! Runtime environment probe and share targets

use crate::constants::{APP_NAME, APP_VERSION};
use crate::utils::unique_destination;
use std::fs;
use std::path::PathBuf;

const MOBILE_MARKERS: &[&str] = &[
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
    "Mobile",
];

/// Embedded browsers that block file downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InAppBrowser {
    WeChat,
    Qq,
    Weibo,
    DingTalk,
    Alipay,
    Facebook,
    Instagram,
    Line,
}

impl InAppBrowser {
    const MARKERS: &'static [(&'static str, InAppBrowser)] = &[
        ("MicroMessenger", InAppBrowser::WeChat),
        ("QQ/", InAppBrowser::Qq),
        ("Weibo", InAppBrowser::Weibo),
        ("DingTalk", InAppBrowser::DingTalk),
        ("AlipayClient", InAppBrowser::Alipay),
        ("FBAN", InAppBrowser::Facebook),
        ("FBAV", InAppBrowser::Facebook),
        ("Instagram", InAppBrowser::Instagram),
        ("Line/", InAppBrowser::Line),
    ];

    pub fn detect(user_agent: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| user_agent.contains(marker))
            .map(|&(_, browser)| browser)
    }

    pub fn label(self) -> &'static str {
        match self {
            InAppBrowser::WeChat => "WeChat",
            InAppBrowser::Qq => "QQ",
            InAppBrowser::Weibo => "Weibo",
            InAppBrowser::DingTalk => "DingTalk",
            InAppBrowser::Alipay => "Alipay",
            InAppBrowser::Facebook => "Facebook",
            InAppBrowser::Instagram => "Instagram",
            InAppBrowser::Line => "LINE",
        }
    }
}

/// Read-only capability probe consulted by the download dispatcher
#[derive(Debug, Clone)]
pub struct Environment {
    pub user_agent: String,
    pub share_available: bool,
    pub clipboard_available: bool,
}

impl Environment {
    /// Probe the host. Overrides come from settings.
    pub fn detect(user_agent: Option<&str>, share_available: Option<bool>) -> Self {
        let user_agent = user_agent
            .filter(|ua| !ua.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_user_agent);
        let mobile = is_mobile_agent(&user_agent);
        Self {
            share_available: share_available.unwrap_or(mobile),
            clipboard_available: true,
            user_agent,
        }
    }

    pub fn is_mobile(&self) -> bool {
        is_mobile_agent(&self.user_agent)
    }

    pub fn in_app_browser(&self) -> Option<InAppBrowser> {
        InAppBrowser::detect(&self.user_agent)
    }
}

pub fn default_user_agent() -> String {
    format!("{}/{} ({})", APP_NAME.replace(' ', ""), APP_VERSION, std::env::consts::OS)
}

fn is_mobile_agent(user_agent: &str) -> bool {
    MOBILE_MARKERS.iter().any(|m| user_agent.contains(m))
}

/// Native "share with file attached" capability
pub trait ShareTarget: Send + Sync {
    fn share(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

/// Shares by saving into the user's pictures folder
pub struct GalleryFolder {
    dir: PathBuf,
}

impl GalleryFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ShareTarget for GalleryFolder {
    fn share(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let dest = unique_destination(&self.dir, file_name);
        fs::write(&dest, bytes)?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
    const WECHAT: &str = "Mozilla/5.0 (Linux; Android 13) Mobile Safari/537.36 MicroMessenger/8.0.42";
    const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/126.0 Safari/537.36";

    #[test]
    fn classifies_agents() {
        let phone = Environment::detect(Some(IPHONE), None);
        assert!(phone.is_mobile());
        assert!(phone.share_available);
        assert_eq!(phone.in_app_browser(), None);

        let wechat = Environment::detect(Some(WECHAT), None);
        assert_eq!(wechat.in_app_browser(), Some(InAppBrowser::WeChat));

        let desktop = Environment::detect(Some(DESKTOP), None);
        assert!(!desktop.is_mobile());
        assert!(!desktop.share_available);
    }

    #[test]
    fn blank_override_uses_native_agent() {
        let env = Environment::detect(Some("  "), Some(false));
        assert!(env.user_agent.starts_with("ImageGallery/"));
        assert!(!env.is_mobile());
        assert!(!env.share_available);
    }

    #[test]
    fn gallery_folder_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = GalleryFolder::new(dir.path().join("Pictures"));
        let first = gallery.share("a.jpg", b"one").unwrap();
        let second = gallery.share("a.jpg", b"two").unwrap();
        assert_ne!(first, second);
        assert_eq!(fs::read(&first).unwrap(), b"one");
        assert_eq!(fs::read(&second).unwrap(), b"two");
    }
}
