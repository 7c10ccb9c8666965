//! User-facing strings for the supported locales

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

pub struct Strings {
    pub unknown_name: &'static str,
    pub unknown_time: &'static str,
    pub unknown_size: &'static str,
    pub taken_at: &'static str,
    pub file_size: &'static str,
    pub dimensions: &'static str,
    pub search_hint: &'static str,
    pub loading: &'static str,
    pub no_images_title: &'static str,
    pub no_images_body: &'static str,
    pub no_matches: &'static str,
    pub clear_search: &'static str,
    pub load_failed_title: &'static str,
    pub load_failed_body: &'static str,
    pub download: &'static str,
    pub open: &'static str,
    pub copy_image_link: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub close: &'static str,
    pub grid_view: &'static str,
    pub list_view: &'static str,
    pub open_download_folder: &'static str,
    pub settings: &'static str,
    pub guide_title: &'static str,
    pub guide_intro: &'static str,
    pub guide_steps: [&'static str; 3],
    pub copy_link: &'static str,
    pub open_in_browser: &'static str,
    pub link_copied: &'static str,
    pub fallback_notice: &'static str,
    pub view_section: &'static str,
    pub large_thumbnails: &'static str,
    pub download_path: &'static str,
    pub gallery_path: &'static str,
    pub open_folder: &'static str,
    pub language: &'static str,
    pub updated: &'static str,
    pub total_size: &'static str,
    pub browse: &'static str,
    pub reload: &'static str,
}

static ZH_CN: Strings = Strings {
    unknown_name: "未知图片",
    unknown_time: "未知时间",
    unknown_size: "未知",
    taken_at: "拍摄时间",
    file_size: "文件大小",
    dimensions: "尺寸",
    search_hint: "搜索图片...",
    loading: "正在加载图片...",
    no_images_title: "暂无图片",
    no_images_body: "请上传图片到项目目录中，刷新页面即可看到。",
    no_matches: "没有匹配的图片",
    clear_search: "清除搜索",
    load_failed_title: "加载失败",
    load_failed_body: "加载图片时出现错误，请刷新页面重试。",
    download: "下载图片",
    open: "查看",
    copy_image_link: "复制图片链接",
    previous: "上一张",
    next: "下一张",
    close: "关闭",
    grid_view: "网格视图",
    list_view: "列表视图",
    open_download_folder: "打开下载文件夹",
    settings: "设置",
    guide_title: "请在浏览器中打开",
    guide_intro: "当前应用内置浏览器不支持直接下载图片，请按以下步骤操作：",
    guide_steps: [
        "点击右上角的「···」菜单",
        "选择「在浏览器中打开」",
        "在浏览器中再次点击下载按钮",
    ],
    copy_link: "复制页面链接",
    open_in_browser: "在浏览器中打开",
    link_copied: "链接已复制",
    fallback_notice: "图片清单不可用，显示默认图片",
    view_section: "视图",
    large_thumbnails: "大缩略图",
    download_path: "下载位置",
    gallery_path: "相册位置",
    open_folder: "打开文件夹",
    language: "语言",
    updated: "更新于",
    total_size: "总大小",
    browse: "浏览...",
    reload: "重新加载",
};

static EN: Strings = Strings {
    unknown_name: "Unknown image",
    unknown_time: "Unknown time",
    unknown_size: "Unknown",
    taken_at: "Taken",
    file_size: "Size",
    dimensions: "Dimensions",
    search_hint: "Search images...",
    loading: "Loading images...",
    no_images_title: "No images yet",
    no_images_body: "Add images to the gallery directory and reload to see them.",
    no_matches: "No images match your search",
    clear_search: "Clear search",
    load_failed_title: "Failed to load",
    load_failed_body: "Something went wrong while loading images. Please reload.",
    download: "Download image",
    open: "Open",
    copy_image_link: "Copy image link",
    previous: "Previous",
    next: "Next",
    close: "Close",
    grid_view: "Grid view",
    list_view: "List view",
    open_download_folder: "Open download folder",
    settings: "Settings",
    guide_title: "Open in your browser",
    guide_intro: "This in-app browser blocks downloads. To save images:",
    guide_steps: [
        "Tap the \"···\" menu in the top-right corner",
        "Choose \"Open in browser\"",
        "Tap the download button again in the browser",
    ],
    copy_link: "Copy page link",
    open_in_browser: "Open in browser",
    link_copied: "Link copied",
    fallback_notice: "Image manifest unavailable, showing the default image",
    view_section: "View",
    large_thumbnails: "Large thumbnails",
    download_path: "Download folder",
    gallery_path: "Gallery folder",
    open_folder: "Open folder",
    language: "Language",
    updated: "Updated",
    total_size: "Total size",
    browse: "Browse...",
    reload: "Reload",
};

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::ZhCn, Locale::En];

    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::ZhCn => &ZH_CN,
            Locale::En => &EN,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Locale::ZhCn => "简体中文",
            Locale::En => "English",
        }
    }

    pub fn format_date(self, date: Option<NaiveDateTime>) -> String {
        let Some(dt) = date else {
            return self.strings().unknown_time.to_string();
        };
        match self {
            Locale::ZhCn => format!(
                "{}年{}月{}日 {:02}:{:02}",
                dt.year(),
                dt.month(),
                dt.day(),
                dt.hour(),
                dt.minute()
            ),
            Locale::En => dt.format("%B %-d, %Y %H:%M").to_string(),
        }
    }

    pub fn downloaded(self, name: &str) -> String {
        match self {
            Locale::ZhCn => format!("{} 下载成功！", name),
            Locale::En => format!("{} downloaded", name),
        }
    }

    pub fn saved_to_gallery(self, name: &str) -> String {
        match self {
            Locale::ZhCn => format!("{} 已保存到相册！", name),
            Locale::En => format!("{} saved to gallery", name),
        }
    }

    pub fn showing(self, shown: usize, total: usize) -> String {
        match self {
            Locale::ZhCn => format!("显示 {} / {} 张图片", shown, total),
            Locale::En => format!("Showing {} of {} images", shown, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn formats_dates_per_locale() {
        let dt = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(17, 27, 46)
            .unwrap();
        assert_eq!(Locale::ZhCn.format_date(Some(dt)), "2025年3月31日 17:27");
        assert_eq!(Locale::En.format_date(Some(dt)), "March 31, 2025 17:27");
    }

    #[test]
    fn missing_date_uses_placeholder() {
        assert_eq!(Locale::ZhCn.format_date(None), "未知时间");
        assert_eq!(Locale::En.format_date(None), "Unknown time");
    }

    #[test]
    fn locale_round_trips_through_settings_names() {
        assert_eq!(serde_json::to_string(&Locale::ZhCn).unwrap(), "\"zh-CN\"");
        assert_eq!(serde_json::from_str::<Locale>("\"en\"").unwrap(), Locale::En);
    }
}
