#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use reqwest::StatusCode;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use url::Url;

pub const JPEG: &[u8] = b"\xff\xd8\xff\xe0 not really a jpeg";

pub const PROXY_VARS: &[&str] = &[
    "http_proxy",
    "HTTP_PROXY",
    "https_proxy",
    "HTTPS_PROXY",
    "all_proxy",
    "ALL_PROXY",
];

static CLEAR_PROXY_VARS: Once = Once::new();

/// A canned response for one request target (path and query)
#[derive(Debug, Clone)]
pub struct Route {
    pub target: String,
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Read the request, then never answer
    pub stall: bool,
}

impl Route {
    pub fn html(target: &str, body: &str) -> Self {
        Self::new(target, 200, "text/html; charset=utf-8", body.as_bytes())
    }

    pub fn new(target: &str, status: u16, content_type: &'static str, body: &[u8]) -> Self {
        Self {
            target: target.to_string(),
            status,
            content_type,
            body: body.to_vec(),
            stall: false,
        }
    }

    pub fn stalled(target: &str) -> Self {
        Self {
            stall: true,
            ..Self::new(target, 200, "image/jpeg", b"")
        }
    }
}

/// The request line target and headers of one request
#[derive(Debug, Clone)]
pub struct Request {
    pub target: String,
    headers: Vec<(String, String)>,
}

impl Request {
    fn parse(head: &str) -> Self {
        let mut lines = head.split("\r\n");
        let target = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or("/")
            .to_string();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        Self { target, headers }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Minimal HTTP/1.1 server answering GETs from a fixed route table
pub struct TestServer {
    pub url: Url,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl TestServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        // reqwest would otherwise send loopback requests through a proxy set in the
        // environment. Every test starts a server before building a client.
        CLEAR_PROXY_VARS.call_once(|| {
            for var in PROXY_VARS {
                std::env::remove_var(var);
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        tokio::spawn({
            let requests = requests.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let routes = routes.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let _ = respond(stream, &routes, &requests).await;
                    });
                }
            }
        });

        Self {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            requests,
        }
    }

    /// Request targets received so far, in order
    pub fn hits(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.target)
            .collect()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn join(&self, target: &str) -> Url {
        self.url.join(target).unwrap()
    }
}

async fn respond(
    mut stream: TcpStream,
    routes: &[Route],
    requests: &Mutex<Vec<Request>>,
) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }

    let request = Request::parse(&String::from_utf8_lossy(&request));
    let target = request.target.clone();
    requests.lock().unwrap().push(request);

    let route = routes
        .iter()
        .find(|route| route.target == target)
        .cloned()
        .unwrap_or_else(|| Route::new(&target, 404, "text/plain", b"not found"));

    if route.stall {
        // keep the connection open without ever sending a response
        std::future::pending::<()>().await;
    }

    let reason = StatusCode::from_u16(route.status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown");
    let head = format!(
        "HTTP/1.1 {} {reason}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        route.content_type,
        route.body.len(),
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&route.body).await?;
    stream.shutdown().await
}

/// The Bing homepage as far as the resolver cares
pub fn homepage_with_og_image(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="en"><head>
<meta property="og:title" content="Today on Bing">
<meta property="og:image" content="{content}">
</head><body><div class="hp_top_cover background" style="background-image: url(/th?id=OHR.Other_tmb.jpg)"></div></body></html>"#
    )
}
