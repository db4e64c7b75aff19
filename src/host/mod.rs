pub mod resolver;

use actix_web::dev::RequestHead;
use actix_web::http::header;
use actix_web::HttpRequest;

pub use resolver::{HostResolver, PageData, RenderDecision};

/// Raw `Host` value, falling back to the URI authority for HTTP/2 requests.
pub fn raw_host(req: &RequestHead) -> Option<String> {
    req.headers
        .get(header::HOST)
        .and_then(|header_value| header_value.to_str().ok())
        .map(ToOwned::to_owned)
        .or_else(|| req.uri.authority().map(ToString::to_string))
        .filter(|host| !host.is_empty())
}

/// The parts of a request the resolver looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub host: Option<String>,
    pub path: String,
}

impl RequestContext {
    pub fn new(host: Option<&str>, path: &str) -> Self {
        Self {
            host: host.map(ToOwned::to_owned),
            path: path.to_owned(),
        }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        Self::new(raw_host(req.head()).as_deref(), req.path())
    }
}
