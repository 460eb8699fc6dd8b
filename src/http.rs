use std::time::Duration;

use log::debug;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Response,
};
use url::Url;

use crate::error::{Error, ResponseContext};

// Bing serves a stripped-down page (or nothing) to clients that don't look like a browser
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

pub fn client(timeout: Duration) -> Result<Client, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(Error::Client)
}

/// Send a GET, turning anything but a 2xx into [`Error::Status`]
pub async fn get(client: &Client, url: &Url) -> Result<Response, Error> {
    debug!("GET {url}");
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| Error::Request {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    debug!("{url} responded with {status}");
    if !status.is_success() {
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Status {
            url: url.clone(),
            response: ResponseContext::new(status, headers, &body),
        });
    }

    Ok(response)
}
