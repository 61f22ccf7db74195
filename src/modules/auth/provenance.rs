use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use conclave_models::Provenance;

/// Login origin recorded alongside a new session. Never used for authorization.
#[derive(Debug, Clone, Default)]
pub struct ClientProvenance(pub Provenance);

impl<S> FromRequestParts<S> for ClientProvenance
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientProvenance(provenance_from(&parts.headers, peer)))
    }
}

/// First `X-Forwarded-For` hop wins over the socket peer.
pub fn provenance_from(headers: &HeaderMap, peer: Option<String>) -> Provenance {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string);

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Provenance {
        ip_address: forwarded.or(peer),
        user_agent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static("portal/1.0"));

        let provenance = provenance_from(&headers, Some("127.0.0.1".to_string()));
        assert_eq!(provenance.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(provenance.user_agent.as_deref(), Some("portal/1.0"));
    }

    #[test]
    fn test_falls_back_to_peer() {
        let provenance = provenance_from(&HeaderMap::new(), Some("198.51.100.2".to_string()));
        assert_eq!(provenance.ip_address.as_deref(), Some("198.51.100.2"));
        assert!(provenance.user_agent.is_none());
    }

    #[test]
    fn test_nothing_known() {
        assert_eq!(provenance_from(&HeaderMap::new(), None), Provenance::default());
    }
}
