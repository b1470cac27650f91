use log::{error, info, warn};
use rocket::data::{ByteUnit, Data};
use rocket::http::{Method, Status};
use rocket::response::{self, Responder, Response};
use rocket::route::{Handler, Outcome, Route};
use rocket::Request;
use std::io::Cursor;
use thiserror::Error;
use url::Url;

/// Request headers that only make sense on a single connection, plus `Host`,
/// which is replaced by the upstream's own.
const SKIPPED_REQUEST_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

const PROXIED_METHODS: [Method; 5] = [
    Method::Get,
    Method::Post,
    Method::Put,
    Method::Patch,
    Method::Delete,
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Path {0} is outside this proxy mount")]
    Unmounted(String),
    #[error("Request body is larger than {0}")]
    BodyTooLarge(ByteUnit),
    #[error("Failed to read request body: {0}")]
    Body(#[from] std::io::Error),
    #[error("Unsupported method {0}")]
    Method(String),
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("HTTP client is not configured")]
    MissingClient,
}

impl ProxyError {
    pub fn status(&self) -> Status {
        match self {
            ProxyError::Unmounted(_) => Status::NotFound,
            ProxyError::BodyTooLarge(_) => Status::PayloadTooLarge,
            ProxyError::Method(_) => Status::MethodNotAllowed,
            ProxyError::Body(_) => Status::BadRequest,
            ProxyError::Url(_) | ProxyError::Upstream(_) | ProxyError::MissingClient => {
                Status::BadGateway
            }
        }
    }
}

impl<'r> Responder<'r, 'static> for ProxyError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        error!("Proxy error for {}: {self}", request.uri());
        (self.status(), self.to_string()).respond_to(request)
    }
}

/// One upstream origin and the path prefix it is mounted under.
#[derive(Debug, Clone, PartialEq)]
pub struct Upstream {
    mount: String,
    base: Url,
}

impl Upstream {
    pub fn new(mount: &str, base: &str) -> Result<Self, ProxyError> {
        Ok(Self {
            mount: mount.trim_end_matches('/').to_string(),
            base: Url::parse(base)?,
        })
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Maps an incoming path and query onto the upstream, dropping the mount
    /// prefix and keeping the query string as-is.
    pub fn target(&self, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
        let rest = strip_mount(path, &self.mount)
            .ok_or_else(|| ProxyError::Unmounted(path.to_string()))?;

        let mut url = self.base.clone();
        let joined = format!("{}{}", self.base.path().trim_end_matches('/'), rest);
        url.set_path(if joined.is_empty() { "/" } else { &joined });
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }
}

/// The path left after removing `mount`, only on a segment boundary.
pub fn strip_mount<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

fn forwards_request_header(name: &str) -> bool {
    !SKIPPED_REQUEST_HEADERS
        .iter()
        .any(|skipped| name.eq_ignore_ascii_case(skipped))
}

fn forwards_response_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    // The CORS fairing writes its own access-control headers.
    forwards_request_header(&name) && !name.starts_with("access-control-")
}

/// Upstream reply, buffered so it can be handed back through Rocket.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl<'r> Responder<'r, 'static> for ProxiedResponse {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        let mut builder = Response::build();
        builder.status(Status::new(self.status));
        for (name, value) in self.headers {
            builder.raw_header_adjoin(name, value);
        }
        builder.sized_body(self.body.len(), Cursor::new(self.body));
        Ok(builder.finalize())
    }
}

/// Forwards every request under its mount to one upstream. Mounted once per
/// prefix; a lower rank wins when two mounts overlap.
#[derive(Debug, Clone)]
pub struct ProxyHandler {
    upstream: Upstream,
    rank: isize,
    body_limit: ByteUnit,
}

impl ProxyHandler {
    pub fn new(upstream: Upstream, rank: isize, body_limit: ByteUnit) -> Self {
        Self {
            upstream,
            rank,
            body_limit,
        }
    }

    async fn forward(
        &self,
        client: &reqwest::Client,
        request: &Request<'_>,
        data: Data<'_>,
    ) -> Result<ProxiedResponse, ProxyError> {
        let uri = request.uri();
        let target = self
            .upstream
            .target(uri.path().as_str(), uri.query().map(|q| q.as_str()))?;

        let method = reqwest::Method::from_bytes(request.method().as_str().as_bytes())
            .map_err(|_| ProxyError::Method(request.method().to_string()))?;

        let body = data.open(self.body_limit).into_bytes().await?;
        if !body.is_complete() {
            return Err(ProxyError::BodyTooLarge(self.body_limit));
        }

        let mut outgoing = client.request(method, target.clone());
        for header in request.headers().iter() {
            if forwards_request_header(header.name().as_str()) {
                outgoing = outgoing.header(header.name().as_str(), header.value());
            }
        }

        info!("{} {} -> {target}", request.method(), uri);
        let reply = outgoing.body(body.into_inner()).send().await?;

        let status = reply.status().as_u16();
        let headers = reply
            .headers()
            .iter()
            .filter(|(name, _)| forwards_response_header(name.as_str()))
            .filter_map(|(name, value)| match value.to_str() {
                Ok(value) => Some((name.as_str().to_string(), value.to_string())),
                Err(_) => {
                    warn!("Dropping non-text upstream header {name}");
                    None
                }
            })
            .collect();
        let body = reply.bytes().await?.to_vec();

        Ok(ProxiedResponse {
            status,
            headers,
            body,
        })
    }
}

#[rocket::async_trait]
impl Handler for ProxyHandler {
    async fn handle<'r>(&self, request: &'r Request<'_>, data: Data<'r>) -> Outcome<'r> {
        let Some(client) = request.rocket().state::<reqwest::Client>() else {
            return Outcome::from(request, ProxyError::MissingClient);
        };

        match self.forward(client, request, data).await {
            Ok(response) => Outcome::from(request, response),
            Err(e) => Outcome::from(request, e),
        }
    }
}

impl From<ProxyHandler> for Vec<Route> {
    fn from(handler: ProxyHandler) -> Vec<Route> {
        PROXIED_METHODS
            .iter()
            .map(|method| {
                let mut route = Route::ranked(handler.rank, *method, "/<path..>", handler.clone());
                route.name = Some(format!("proxy {}", handler.upstream.mount()).into());
                route
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::data::ToByteUnit;

    #[test]
    fn api_prefix_is_replaced_by_the_upstream_path() {
        let upstream = Upstream::new("/api", "https://maverick-server1.onrender.com/api").unwrap();
        let url = upstream.target("/api/posts/like", None).unwrap();
        assert_eq!(url.as_str(), "https://maverick-server1.onrender.com/api/posts/like");
    }

    #[test]
    fn py_prefix_is_removed_entirely() {
        let upstream = Upstream::new("/api/py", "http://localhost:5102").unwrap();
        let url = upstream.target("/api/py/generate", Some("lang=en")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5102/generate?lang=en");
    }

    #[test]
    fn bare_mount_maps_to_the_upstream_root() {
        let upstream = Upstream::new("/api/py", "http://localhost:5102").unwrap();
        let url = upstream.target("/api/py", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5102/");
    }

    #[test]
    fn mount_only_matches_whole_segments() {
        assert_eq!(strip_mount("/api/posts", "/api"), Some("/posts"));
        assert_eq!(strip_mount("/api", "/api"), Some(""));
        assert_eq!(strip_mount("/apiary", "/api"), None);

        let upstream = Upstream::new("/api", "http://localhost:8000").unwrap();
        assert!(matches!(
            upstream.target("/apiary", None),
            Err(ProxyError::Unmounted(_))
        ));
    }

    #[test]
    fn connection_headers_stay_behind() {
        assert!(forwards_request_header("Authorization"));
        assert!(forwards_request_header("Content-Type"));
        assert!(!forwards_request_header("Host"));
        assert!(!forwards_request_header("Transfer-Encoding"));
        assert!(!forwards_response_header("Access-Control-Allow-Origin"));
        assert!(forwards_response_header("Set-Cookie"));
    }

    #[test]
    fn failures_map_to_gateway_statuses() {
        assert_eq!(ProxyError::MissingClient.status(), Status::BadGateway);
        assert_eq!(
            ProxyError::BodyTooLarge(1.mebibytes()).status(),
            Status::PayloadTooLarge
        );
    }
}
