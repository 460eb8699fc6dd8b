use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use reqwest::Client;
use url::Url;

use crate::{
    error::{Error, ResponseContext},
    http,
    markup::{self, Tag},
    opt::Resolution,
};

/// Suffix Bing gives the thumbnail-sized image it advertises on the homepage
pub const THUMBNAIL_SUFFIX: &str = "_tmb.jpg";

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(["']?(.*?)["']?\)"#).unwrap());

type Strategy = fn(&[Tag]) -> Option<String>;

/// Tried in order; the first hit wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("open graph image", open_graph_image),
    ("background style", background_style),
];

/// Fetch the homepage and work out the full-resolution URL of today's image
pub async fn resolve(client: &Client, homepage: &Url, resolution: Resolution) -> Result<Url, Error> {
    info!("Fetching Bing homepage...");
    let response = http::get(client, homepage).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.map_err(|source| Error::Request {
        url: homepage.clone(),
        source,
    })?;

    let raw = find_image_url(&body).ok_or_else(|| Error::UrlNotFound {
        url: homepage.clone(),
        response: ResponseContext::new(status, headers, &body),
    })?;

    let url = normalize(homepage, &raw, resolution)?;
    info!("Found image URL: {url}");
    Ok(url)
}

/// The image URL as it appears in the page, before normalization
#[must_use]
pub fn find_image_url(html: &str) -> Option<String> {
    let tags = markup::start_tags(html);
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(&tags)?;
        debug!("Found {found:?} using the {name} strategy");
        Some(found)
    })
}

fn open_graph_image(tags: &[Tag]) -> Option<String> {
    tags.iter()
        .filter(|tag| tag.name == "meta" && tag.attr("property") == Some("og:image"))
        .find_map(|tag| non_empty(tag.attr("content")?))
}

fn background_style(tags: &[Tag]) -> Option<String> {
    tags.iter()
        .filter(|tag| tag.attr("class").is_some_and(|class| class.contains("background")))
        .filter_map(|tag| tag.attr("style"))
        .find_map(|style| non_empty(CSS_URL.captures(style)?.get(1)?.as_str()))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Make `raw` absolute and ask for the requested resolution
pub fn normalize(homepage: &Url, raw: &str, resolution: Resolution) -> Result<Url, Error> {
    let absolute = make_absolute(homepage, raw)?;
    let upgraded = upgrade_resolution(absolute.as_str(), resolution);
    Url::parse(&upgraded).map_err(|source| Error::InvalidUrl {
        url: upgraded,
        source,
    })
}

/// Resolve a scheme-less URL against the homepage. Absolute URLs are kept as they are.
pub fn make_absolute(homepage: &Url, raw: &str) -> Result<Url, Error> {
    let invalid = |source| Error::InvalidUrl {
        url: raw.to_string(),
        source,
    };

    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => homepage.join(raw).map_err(invalid),
        Err(source) => Err(invalid(source)),
    }
}

/// Swap the thumbnail suffix for the one naming `resolution`.
///
/// This only knows Bing's current naming scheme. A URL without the thumbnail
/// suffix is returned untouched, with a warning if it doesn't look like it's
/// already at the right size.
#[must_use]
pub fn upgrade_resolution(url: &str, resolution: Resolution) -> String {
    let full = format!("_{resolution}.jpg");
    if url.contains(THUMBNAIL_SUFFIX) {
        url.replace(THUMBNAIL_SUFFIX, &full)
    } else {
        if !url.contains(&full) {
            warn!("{url} has no {THUMBNAIL_SUFFIX} suffix to replace; the image may not be {resolution}");
        }
        url.to_string()
    }
}
