// Modem HTTP client
//
// Holds the transport and handshake settings shared by every login. The
// client itself carries no session state: each successful handshake
// yields a `Session` with its own cookie jar, which the caller owns.

use num_bigint::BigUint;
use url::Url;

use crate::error::Error;
use crate::srp::device_multiplier;
use crate::transport::TransportConfig;

/// Parameters of the SRP exchange.
#[derive(Debug, Clone)]
pub struct HandshakeConfig {
    /// Replaces the SRP-6a multiplier `k = H(N, g)`. TG-series firmware
    /// needs [`DEVICE_MULTIPLIER_HEX`](crate::srp::DEVICE_MULTIPLIER_HEX);
    /// `None` runs textbook SRP-6a.
    pub multiplier_override: Option<BigUint>,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            multiplier_override: Some(device_multiplier()),
        }
    }
}

/// Entry point for talking to a modem: performs handshakes and hands out
/// authenticated [`Session`](crate::Session)s.
#[derive(Debug, Clone, Default)]
pub struct ModemClient {
    transport: TransportConfig,
    handshake: HandshakeConfig,
}

impl ModemClient {
    pub fn new(transport: TransportConfig) -> Self {
        Self {
            transport,
            handshake: HandshakeConfig::default(),
        }
    }

    pub fn with_handshake(mut self, handshake: HandshakeConfig) -> Self {
        self.handshake = handshake;
        self
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    pub fn handshake(&self) -> &HandshakeConfig {
        &self.handshake
    }
}

/// Turn a configured device address into its HTTP origin.
///
/// Bare hosts (`10.1.1.1`, `modem.lan:8080`) get `http://` prepended;
/// anything that already carries a scheme is parsed as is.
pub fn device_origin(address: &str) -> Result<Url, Error> {
    let address = address.trim().trim_end_matches('/');
    if address.contains("://") {
        Ok(Url::parse(address)?)
    } else {
        Ok(Url::parse(&format!("http://{address}"))?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let url = device_origin("10.1.1.1").unwrap();
        assert_eq!(url.as_str(), "http://10.1.1.1/");
    }

    #[test]
    fn explicit_scheme_and_port_kept() {
        let url = device_origin("http://127.0.0.1:8080/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn garbage_address_is_invalid_url() {
        let err = device_origin("http://[::1").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn default_handshake_overrides_multiplier() {
        let client = ModemClient::default();
        assert_eq!(
            client.handshake().multiplier_override,
            Some(device_multiplier())
        );
    }
}
