// SRP-6a client for the modem's `/authenticate` endpoint
//
// SHA-256 over the RFC 5054 2048-bit group. Integers are hashed as minimal
// big-endian byte strings with no padding, which is what the firmware
// expects. The only deviation from textbook SRP-6a is the multiplier `k`:
// the firmware uses a fixed constant instead of `H(N, g)`.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// RFC 5054 appendix A, 2048-bit group prime.
const RFC5054_N_2048: &str = concat!(
    "AC6BDB41324A9A9BF166DE5E1389582FAF72B6651987EE07FC3192943DB56050",
    "A37329CBB4A099ED8193E0757767A13DD52312AB4B03310DCD7F48A9DA04FD50",
    "E8083969EDB767B0CF6095179A163AB3661A05FBD5FAAAE82918A9962F0B93B8",
    "55F97993EC975EEAA80D740ADBF4FF747359D041D5C33EA71D281E446B14773B",
    "CA97B43A23FB801676BD207A436C6481F1D2B9078717461A5B9D32E688F87748",
    "544523B524B0D57D5EA77A2775D2ECFA032CFBDBF52FB3786160279004E57AE6",
    "AF874E7303CE53299CCC041C7BC308D82A5698F3A8D0C38271AE35F8E9DBFBB6",
    "94B5C803D89F7AE435DE236D525F54759B65E372FCD68EF20FA7111F9E4AFF73",
);

/// Multiplier hard-coded in TG-series firmware. Using `H(N, g)` instead
/// makes the device reject the evidence.
pub const DEVICE_MULTIPLIER_HEX: &str =
    "05b9e8ef059c6b32ea59fc1d322d37f04aa30bae5aa9003b8321e21ddb04e300";

/// Private exponent length in bytes.
const EPHEMERAL_BYTES: usize = 32;

static GROUP_2048: LazyLock<SrpGroup> = LazyLock::new(|| SrpGroup {
    n: BigUint::parse_bytes(RFC5054_N_2048.as_bytes(), 16).expect("valid RFC 5054 prime"),
    g: BigUint::from(2u32),
});

/// Parsed [`DEVICE_MULTIPLIER_HEX`].
pub fn device_multiplier() -> BigUint {
    BigUint::parse_bytes(DEVICE_MULTIPLIER_HEX.as_bytes(), 16).expect("valid multiplier constant")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SrpError {
    /// `B mod N == 0`; a server sending this is broken or hostile.
    #[error("server public value is zero modulo N")]
    IllegalServerValue,

    /// `H(A | B) == 0`.
    #[error("scrambling parameter is zero")]
    IllegalScrambler,
}

/// A safe-prime group `(N, g)`.
#[derive(Debug)]
pub struct SrpGroup {
    n: BigUint,
    g: BigUint,
}

impl SrpGroup {
    pub fn rfc5054_2048() -> &'static Self {
        &GROUP_2048
    }

    pub fn prime(&self) -> &BigUint {
        &self.n
    }

    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// The textbook SRP-6a multiplier `k = H(N | g)`.
    pub fn standard_multiplier(&self) -> BigUint {
        hash_int(&[&self.n.to_bytes_be(), &self.g.to_bytes_be()])
    }
}

/// Client half of one SRP exchange. Single use: build a new one per login.
pub struct SrpClient {
    identity: String,
    password: SecretString,
    group: &'static SrpGroup,
    k: BigUint,
    a: BigUint,
    public: BigUint,
}

impl SrpClient {
    /// Start an exchange with a fresh random private exponent.
    ///
    /// `multiplier_override` replaces the derived `k`; `None` means
    /// textbook SRP-6a.
    pub fn new(
        identity: &str,
        password: &SecretString,
        multiplier_override: Option<&BigUint>,
    ) -> Self {
        let mut bytes = [0u8; EPHEMERAL_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self::with_private_exponent(
            identity,
            password,
            multiplier_override,
            BigUint::from_bytes_be(&bytes),
        )
    }

    pub(crate) fn with_private_exponent(
        identity: &str,
        password: &SecretString,
        multiplier_override: Option<&BigUint>,
        a: BigUint,
    ) -> Self {
        let group = SrpGroup::rfc5054_2048();
        let k = multiplier_override.map_or_else(|| group.standard_multiplier(), Clone::clone);
        let public = group.g.modpow(&a, &group.n);
        Self {
            identity: identity.to_owned(),
            password: password.clone(),
            group,
            k,
            a,
            public,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// `A = g^a mod N`, lowercase hex.
    pub fn public_ephemeral_hex(&self) -> String {
        hex::encode(self.public.to_bytes_be())
    }

    /// Derive the session key and client evidence from the server's salt
    /// and public ephemeral value (raw bytes, already hex-decoded).
    pub fn process_challenge(&self, salt: &[u8], server_public: &[u8]) -> Result<SrpProof, SrpError> {
        let n = &self.group.n;
        let b = BigUint::from_bytes_be(server_public);
        if (&b % n).is_zero() {
            return Err(SrpError::IllegalServerValue);
        }

        let a_bytes = self.public.to_bytes_be();
        let b_bytes = b.to_bytes_be();
        let u = hash_int(&[&a_bytes, &b_bytes]);
        if u.is_zero() {
            return Err(SrpError::IllegalScrambler);
        }

        let salt_bytes = BigUint::from_bytes_be(salt).to_bytes_be();
        let x = self.private_key(&salt_bytes);
        let v = self.group.g.modpow(&x, n);

        // (B - k*v) mod N, kept non-negative
        let kv = (&self.k * &v) % n;
        let base = ((&b % n) + n - kv) % n;
        let exponent = &self.a + &u * &x;
        let shared = base.modpow(&exponent, n);
        let session_key: [u8; 32] = Sha256::digest(shared.to_bytes_be()).into();

        let evidence = hash(&[
            &self.group_digest(),
            &Sha256::digest(self.identity.as_bytes()),
            &salt_bytes,
            &a_bytes,
            &b_bytes,
            &session_key,
        ]);
        let server_proof = hash(&[&a_bytes, &evidence, &session_key]);

        Ok(SrpProof {
            evidence,
            session_key,
            server_proof,
        })
    }

    /// `x = H(s | H(I ":" P))`, inner digest re-encoded as a minimal integer.
    fn private_key(&self, salt: &[u8]) -> BigUint {
        let inner = hash(&[
            self.identity.as_bytes(),
            b":",
            self.password.expose_secret().as_bytes(),
        ]);
        let inner = BigUint::from_bytes_be(&inner).to_bytes_be();
        hash_int(&[salt, &inner])
    }

    /// `H(N) xor H(g)`.
    fn group_digest(&self) -> [u8; 32] {
        let hn = Sha256::digest(self.group.n.to_bytes_be());
        let hg = Sha256::digest(self.group.g.to_bytes_be());
        let mut out = [0u8; 32];
        for (o, (x, y)) in out.iter_mut().zip(hn.iter().zip(hg.iter())) {
            *o = x ^ y;
        }
        out
    }
}

/// Result of a processed challenge.
pub struct SrpProof {
    evidence: [u8; 32],
    session_key: [u8; 32],
    server_proof: [u8; 32],
}

impl SrpProof {
    /// Client evidence `M`, lowercase hex.
    pub fn evidence_hex(&self) -> String {
        hex::encode(self.evidence)
    }

    pub fn session_key(&self) -> &[u8; 32] {
        &self.session_key
    }

    /// Check the server's `H(A | M | K)` proof, if the device sent one.
    pub fn verify_server(&self, proof: &[u8]) -> bool {
        proof == self.server_proof.as_slice()
    }
}

fn hash(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn hash_int(parts: &[&[u8]]) -> BigUint {
    BigUint::from_bytes_be(&hash(parts))
}
