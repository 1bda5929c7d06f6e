// SRP login against `/authenticate`
//
// Three requests: fetch a CSRF token, send `I`/`A`, send `M`. Every
// request rides on a fresh cookie jar; the server-issued session cookie
// ends up in that jar and the whole client becomes the `Session`.

use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::client::{ModemClient, device_origin};
use crate::error::Error;
use crate::session::Session;
use crate::srp::{SrpClient, SrpProof};

const CSRF_PATH: &str = "/login.lp?action=getcsrf";
const AUTHENTICATE_PATH: &str = "/authenticate";
const CSRF_TOKEN_LEN: usize = 64;

/// Login details for one modem. Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Host or origin of the web interface, e.g. `10.1.1.1`.
    pub address: String,
    pub username: String,
    pub password: SecretString,
}

/// Phase-one reply: `{s, B}` or `{error}`.
#[derive(Deserialize)]
struct ChallengeResponse {
    s: Option<String>,
    #[serde(rename = "B")]
    b: Option<String>,
    error: Option<serde_json::Value>,
}

/// Phase-two reply: success body (possibly carrying the server proof) or `{error}`.
#[derive(Deserialize)]
struct VerifyResponse {
    #[serde(rename = "M")]
    m: Option<String>,
    error: Option<serde_json::Value>,
}

/// Decoded phase-one challenge.
struct Challenge {
    salt: Vec<u8>,
    server_public: Vec<u8>,
}

impl ModemClient {
    /// Run the full SRP handshake and return an authenticated session.
    ///
    /// Fails with [`Error::BadToken`] or [`Error::Authentication`] when the
    /// device rejects any step, [`Error::Timeout`] when it stops answering
    /// midway, and [`Error::Transport`] when it cannot be reached at all.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, Error> {
        let origin = device_origin(&credentials.address)?;
        let http = self.transport().clone().with_cookie_jar().build_client()?;

        debug!(origin = %origin, user = %credentials.username, "starting SRP handshake");

        let token = fetch_csrf_token(&http, &origin).await?;

        let srp = SrpClient::new(
            &credentials.username,
            &credentials.password,
            self.handshake().multiplier_override.as_ref(),
        );
        let challenge = send_identity(&http, &origin, &srp, &token).await?;

        let proof = srp
            .process_challenge(&challenge.salt, &challenge.server_public)
            .map_err(|e| Error::Authentication {
                message: e.to_string(),
            })?;
        send_evidence(&http, &origin, &proof, &token).await?;

        debug!("handshake complete");
        Ok(Session::new(http, origin))
    }
}

/// `GET /login.lp?action=getcsrf`; the raw body must be exactly 64 chars.
async fn fetch_csrf_token(http: &reqwest::Client, origin: &url::Url) -> Result<String, Error> {
    let url = origin.join(CSRF_PATH)?;
    debug!("fetching CSRF token from {}", url);

    let token = http
        .get(url)
        .send()
        .await
        .map_err(Error::handshake)?
        .text()
        .await
        .map_err(Error::handshake)?;

    let len = token.chars().count();
    if len != CSRF_TOKEN_LEN {
        trace!(token = %token, "rejecting CSRF response");
        return Err(Error::BadToken { len });
    }
    trace!(token = %token, "CSRF token");
    Ok(token)
}

/// Phase one: `POST /authenticate` with `I`, `A`, `CSRFtoken`.
async fn send_identity(
    http: &reqwest::Client,
    origin: &url::Url,
    srp: &SrpClient,
    token: &str,
) -> Result<Challenge, Error> {
    let url = origin.join(AUTHENTICATE_PATH)?;
    let public = srp.public_ephemeral_hex();
    trace!(len = public.len(), a = %public, "client public ephemeral");

    let form = [
        ("I", srp.identity()),
        ("A", public.as_str()),
        ("CSRFtoken", token),
    ];
    let resp = http
        .post(url)
        .form(&form)
        .send()
        .await
        .map_err(Error::handshake)?;

    let status = resp.status();
    let body = resp.text().await.map_err(Error::handshake)?;
    if !status.is_success() {
        debug!(body = %body, "challenge request rejected");
        return Err(Error::Authentication {
            message: format!("challenge request failed (HTTP {status})"),
        });
    }

    let reply: ChallengeResponse = parse_json(&body)?;
    if let Some(error) = reply.error {
        return Err(Error::Authentication {
            message: format!("device refused identity: {error}"),
        });
    }
    let (Some(s), Some(b)) = (reply.s, reply.b) else {
        return Err(Error::Deserialization {
            message: "challenge is missing `s` or `B`".into(),
            body,
        });
    };
    trace!(s = %s, b = %b, "server challenge");

    Ok(Challenge {
        salt: decode_hex("s", &s, &body)?,
        server_public: decode_hex("B", &b, &body)?,
    })
}

/// Phase two: `POST /authenticate` with `M`, `CSRFtoken`.
async fn send_evidence(
    http: &reqwest::Client,
    origin: &url::Url,
    proof: &SrpProof,
    token: &str,
) -> Result<(), Error> {
    let url = origin.join(AUTHENTICATE_PATH)?;
    let evidence = proof.evidence_hex();
    trace!(m = %evidence, "client evidence");

    let form = [("M", evidence.as_str()), ("CSRFtoken", token)];
    let resp = http
        .post(url)
        .form(&form)
        .send()
        .await
        .map_err(Error::handshake)?;

    let status = resp.status();
    let body = resp.text().await.map_err(Error::handshake)?;
    if !status.is_success() {
        debug!(body = %body, "evidence rejected");
        return Err(Error::Authentication {
            message: format!("verification failed (HTTP {status})"),
        });
    }

    let reply: VerifyResponse = parse_json(&body)?;
    if let Some(error) = reply.error {
        return Err(Error::Authentication {
            message: format!("wrong password? ({error})"),
        });
    }

    // Older firmware omits the server proof; only a mismatch is worth noting.
    if let Some(server_proof) = reply.m.and_then(|m| hex::decode(m).ok()) {
        if !proof.verify_server(&server_proof) {
            warn!("server proof did not match the derived session key");
        }
    }
    Ok(())
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

fn decode_hex(field: &str, value: &str, body: &str) -> Result<Vec<u8>, Error> {
    hex::decode(value).map_err(|e| Error::Deserialization {
        message: format!("`{field}` is not hex: {e}"),
        body: body.to_owned(),
    })
}
