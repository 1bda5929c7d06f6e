use url::Url;

/// An authenticated HTTP context: a `reqwest::Client` whose cookie jar
/// holds the device's session cookie, plus the origin it belongs to.
///
/// There is no expiry tracking. A session is assumed good until a request
/// made with it fails, after which it must be dropped and a new one built
/// with [`ModemClient::authenticate`](crate::ModemClient::authenticate).
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    origin: Url,
}

impl Session {
    pub(crate) fn new(http: reqwest::Client, origin: Url) -> Self {
        Self { http, origin }
    }

    /// The device origin this session is bound to.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
