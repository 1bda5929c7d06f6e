use thiserror::Error;

use crate::pages::PageKind;

/// Top-level error type for the `tgstat-api` crate.
///
/// Covers every failure mode of a poll cycle's network half:
/// the SRP handshake, the modal page fetches, and the transport under both.
/// `tgstat-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The CSRF endpoint returned something that is not a 64-char token.
    #[error("Bad CSRF token: expected 64 characters, got {len}")]
    BadToken { len: usize },

    /// Either SRP phase was rejected (non-200, `{error}` body, bad challenge).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Fetch ───────────────────────────────────────────────────────
    /// A modal page request came back with a non-200 status.
    #[error("Fetching {page} failed (HTTP {status})")]
    Fetch { page: PageKind, status: u16 },

    // ── Timeout ─────────────────────────────────────────────────────
    /// A request outlived the transport timeout. `page` is the modal being
    /// fetched, or `None` while the handshake was still running.
    #[error("{} timed out", .page.map_or_else(|| "Login".to_owned(), |p| format!("Fetching {p}")))]
    Timeout { page: Option<PageKind> },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON or hex decoding of a handshake response failed, with the raw body.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Coarse classification used by poll drivers to branch on failures
/// without inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Handshake rejected or malformed. Not retried within a call.
    Auth,
    /// A diagnostic page could not be fetched; the session is suspect.
    Fetch,
    /// Connection-level failure; fatal to the current cycle only.
    Transport,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadToken { .. } | Self::Authentication { .. } | Self::Deserialization { .. } => {
                ErrorKind::Auth
            }
            Self::Fetch { .. } | Self::Timeout { page: Some(_) } => ErrorKind::Fetch,
            Self::Timeout { page: None } => ErrorKind::Auth,
            Self::Transport(_) | Self::InvalidUrl(_) => ErrorKind::Transport,
        }
    }

    /// Returns `true` if the session used for the failed call must be
    /// discarded and rebuilt by a fresh handshake.
    pub fn invalidates_session(&self) -> bool {
        matches!(self.kind(), ErrorKind::Fetch | ErrorKind::Transport)
    }

    /// Returns `true` if the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Wrap a reqwest failure raised during the handshake.
    pub(crate) fn handshake(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { page: None }
        } else {
            Self::Transport(err)
        }
    }

    /// Wrap a reqwest failure raised while fetching `page`.
    pub(crate) fn fetching(page: PageKind) -> impl FnOnce(reqwest::Error) -> Self {
        move |err| {
            if err.is_timeout() {
                Self::Timeout { page: Some(page) }
            } else {
                Self::Transport(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_token_is_auth_kind() {
        let err = Error::BadToken { len: 12 };
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(!err.invalidates_session());
        assert_eq!(
            err.to_string(),
            "Bad CSRF token: expected 64 characters, got 12"
        );
    }

    #[test]
    fn fetch_error_invalidates_session() {
        let err = Error::Fetch {
            page: PageKind::Gateway,
            status: 403,
        };
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.invalidates_session());
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeouts_take_the_kind_of_their_stage() {
        let login = Error::Timeout { page: None };
        assert_eq!(login.kind(), ErrorKind::Auth);
        assert!(login.is_timeout());
        assert_eq!(login.to_string(), "Login timed out");

        let fetch = Error::Timeout {
            page: Some(PageKind::Broadband),
        };
        assert_eq!(fetch.kind(), ErrorKind::Fetch);
        assert!(fetch.invalidates_session());
        assert_eq!(fetch.to_string(), "Fetching broadband page timed out");
    }
}
