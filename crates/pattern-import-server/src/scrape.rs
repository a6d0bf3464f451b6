//! Share-link scraping
//!
//! Pulls content image URLs out of a post page. Pages embed their data as
//! JSON with `\u002F` escaped slashes, so the text is unescaped before
//! matching.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};

pub const SOURCE_HOST: &str = "xiaohongshu.com";

pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148";

/// Second-pass profile. Desktop pages embed the full note state as JSON.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const REJECTED_FRAGMENTS: &[&str] = &[
    "avatar/",
    "icon/",
    "search/trends/",
    "emoji/",
    "sticker/",
    "w/120",
    "w/60",
    "w/40",
];

const LARGE_FRAGMENTS: &[&str] = &["w/1080", "w/720", "w/480"];

fn content_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)sns-img.*\.(jpg|jpeg|png|webp)").expect("valid regex"))
}

fn img_src_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("valid regex")
    })
}

fn url_literal_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)https://[^"'\s<>]*\.(?:jpg|jpeg|png|webp)"#).expect("valid regex")
    })
}

/// Whether `url` looks like a post's content image rather than UI chrome
pub fn is_valid_content_image(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    if !url.contains("sns-img") && !url.contains("xhscdn") {
        return false;
    }
    if REJECTED_FRAGMENTS.iter().any(|f| url.contains(f)) {
        return false;
    }
    if LARGE_FRAGMENTS.iter().any(|f| url.contains(f)) {
        return true;
    }
    content_pattern().is_match(url)
}

/// Content images in a page, de-duplicated and sorted
pub fn extract_image_urls(html: &str) -> Vec<String> {
    let text = html.replace("\\u002F", "/").replace("\\u002f", "/");

    let from_tags = img_src_pattern()
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));
    let from_literals = url_literal_pattern().find_iter(&text).map(|m| m.as_str());

    from_tags
        .chain(from_literals)
        .filter(|url| is_valid_content_image(url))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Downloads a page's HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> ServiceResult<String>;
}

/// Fetches pages over HTTP posing as a browser
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Mobile browser profile
    pub fn new(timeout: Duration) -> ServiceResult<Self> {
        Self::with_user_agent(MOBILE_USER_AGENT, timeout)
    }

    pub fn with_user_agent(user_agent: &str, timeout: Duration) -> ServiceResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::FetchFailed(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> ServiceResult<String> {
        let resp = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8")
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ServiceError::FetchFailed(e.to_string()))?;

        resp.text()
            .await
            .map_err(|e| ServiceError::FetchFailed(e.to_string()))
    }
}
