use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::HOST, request::Parts, HeaderMap, Uri},
};

/// Full URL of the current request, as echoed in the not-found body.
#[derive(Debug, Clone)]
pub struct RequestUrl(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequestUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestUrl(request_url(&parts.uri, &parts.headers)))
    }
}

pub(crate) fn request_url(uri: &Uri, headers: &HeaderMap) -> String {
    // absolute-form targets already carry scheme and authority
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    match headers.get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, path),
        None => path.to_string(),
    }
}
