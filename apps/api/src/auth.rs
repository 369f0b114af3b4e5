//! Authentication handlers.

use axum::http::HeaderMap;

mod login;
mod session;

pub use login::{hq_login_handler, login_handler, org_login_handler};
pub use session::{logout_handler, me_handler};

pub(crate) fn extract_request_context(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    (ip_address, user_agent)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::extract_request_context;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        let (ip_address, user_agent) = extract_request_context(&headers);
        assert_eq!(ip_address.as_deref(), Some("203.0.113.9"));
        assert!(user_agent.is_none());
    }

    #[test]
    fn empty_headers_yield_nothing() {
        let (ip_address, user_agent) = extract_request_context(&HeaderMap::new());
        assert!(ip_address.is_none());
        assert!(user_agent.is_none());
    }
}
