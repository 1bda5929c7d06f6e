// ── Core error types ──
//
// User-facing errors from tgstat-core. Consumers never see reqwest errors
// or handshake JSON directly; `From<tgstat_api::Error>` translates them.

use thiserror::Error;

use tgstat_api::{ErrorKind, PageKind};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to modem at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// `page` is `None` when the handshake timed out.
    #[error("Request to modem timed out")]
    Timeout { page: Option<PageKind> },

    #[error("Invalid modem address: {message}")]
    InvalidAddress { message: String },

    // ── Handshake errors ─────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Page errors ──────────────────────────────────────────────────
    #[error("Could not fetch the {page} (HTTP {status})")]
    PageUnavailable { page: PageKind, status: u16 },
}

impl CoreError {
    /// Which stage of a poll cycle failed.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed { .. } | Self::Timeout { page: None } => ErrorKind::Auth,
            Self::PageUnavailable { .. } | Self::Timeout { page: Some(_) } => ErrorKind::Fetch,
            Self::ConnectionFailed { .. } | Self::InvalidAddress { .. } => ErrorKind::Transport,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tgstat_api::Error> for CoreError {
    fn from(err: tgstat_api::Error) -> Self {
        match err {
            tgstat_api::Error::BadToken { len } => CoreError::AuthenticationFailed {
                message: format!("device returned a {len}-character CSRF token"),
            },
            tgstat_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            tgstat_api::Error::Deserialization { message, body: _ } => {
                CoreError::AuthenticationFailed {
                    message: format!("unreadable handshake response: {message}"),
                }
            }
            tgstat_api::Error::Fetch { page, status } => {
                CoreError::PageUnavailable { page, status }
            }
            tgstat_api::Error::Timeout { page } => CoreError::Timeout { page },
            tgstat_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { page: None }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            tgstat_api::Error::InvalidUrl(e) => CoreError::InvalidAddress {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_their_kind() {
        let cases = [
            tgstat_api::Error::BadToken { len: 3 },
            tgstat_api::Error::Authentication {
                message: "wrong password".into(),
            },
            tgstat_api::Error::Deserialization {
                message: "bad json".into(),
                body: "<html>".into(),
            },
            tgstat_api::Error::Fetch {
                page: PageKind::Gateway,
                status: 500,
            },
            tgstat_api::Error::Timeout { page: None },
            tgstat_api::Error::Timeout {
                page: Some(PageKind::Broadband),
            },
        ];
        for err in cases {
            let expected = err.kind();
            assert_eq!(CoreError::from(err).kind(), expected);
        }
    }

    #[test]
    fn fetch_error_names_the_page() {
        let err = CoreError::from(tgstat_api::Error::Fetch {
            page: PageKind::Broadband,
            status: 404,
        });
        assert_eq!(err.to_string(), "Could not fetch the broadband page (HTTP 404)");
    }

    #[test]
    fn bad_url_is_invalid_address() {
        let parse_err = url::Url::parse("http://[::1").unwrap_err();
        let err = CoreError::from(tgstat_api::Error::InvalidUrl(parse_err));
        assert!(matches!(err, CoreError::InvalidAddress { .. }));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
