use axum::{
    extract::{self},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;

/// Scheme, host and path prefix under which the client reached us, so links
/// stay valid behind a reverse proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    proto: String,
    host: String,
    prefix: String,
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

impl BaseUrl {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let proto = header_value(headers, "x-forwarded-proto").unwrap_or("http");
        let host = header_value(headers, "x-forwarded-host")
            .or_else(|| header_value(headers, "host"))
            .unwrap_or("localhost");
        let prefix = header_value(headers, "x-forwarded-prefix")
            .unwrap_or("")
            .trim_end_matches('/');

        BaseUrl {
            proto: proto.to_owned(),
            host: host.to_owned(),
            prefix: prefix.to_owned(),
        }
    }

    pub fn full_url<S: Into<String>>(&self, path: S) -> String {
        format!(
            "{}://{}{}{}",
            self.proto,
            self.host,
            self.prefix,
            path.into()
        )
    }
}

pub async fn base_url_middleware(req: extract::Request, next: Next) -> impl IntoResponse {
    let base_url = BaseUrl::from_headers(req.headers());

    let mut req = req;
    req.extensions_mut().insert(Arc::new(base_url));

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn defaults_to_localhost() {
        let base_url = BaseUrl::from_headers(&HeaderMap::new());
        assert_eq!(base_url.full_url("/api/ping"), "http://localhost/api/ping");
    }

    #[test]
    fn honors_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("internal:8080"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("whogotnext.app"));
        headers.insert("x-forwarded-prefix", HeaderValue::from_static("/next/"));
        let base_url = BaseUrl::from_headers(&headers);
        assert_eq!(
            base_url.full_url("/api/v1/games"),
            "https://whogotnext.app/next/api/v1/games"
        );
    }
}
