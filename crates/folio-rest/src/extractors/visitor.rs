//! Reader identity extractor.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header::USER_AGENT, request::Parts, HeaderMap},
};
use folio_core::Visitor;
use std::net::SocketAddr;

/// Proxy headers carrying the client address, most trusted first.
const ADDRESS_HEADERS: [&str; 5] = [
    "cf-connecting-ip",
    "true-client-ip",
    "x-forwarded-for",
    "x-real-ip",
    "x-client-ip",
];

/// The [`Visitor`] behind a request.
///
/// The address comes from the first usable proxy header, then from the
/// socket when the router was served with `ConnectInfo`. Never rejects.
#[derive(Debug, Clone, Default)]
pub struct ClientVisitor(pub Visitor);

impl std::ops::Deref for ClientVisitor {
    type Target = Visitor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn header_address(headers: &HeaderMap) -> Option<String> {
    ADDRESS_HEADERS.iter().find_map(|name| {
        let value = headers.get(*name)?.to_str().ok()?;
        // X-Forwarded-For lists the client first.
        let first = value.split(',').next()?.trim();
        (!first.is_empty() && !first.eq_ignore_ascii_case("unknown")).then(|| first.to_string())
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientVisitor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = header_address(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(ClientVisitor(Visitor::new(ip, user_agent)))
    }
}
