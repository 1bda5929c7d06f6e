// tgstat-api: Async client for the Technicolor TG-series modem web interface
//
// SRP-6a login with the firmware's multiplier override, and retrieval of the
// broadband / gateway modal pages over the resulting cookie session.

pub mod auth;
pub mod client;
pub mod error;
pub mod pages;
pub mod session;
pub mod srp;
pub mod transport;

pub use auth::Credentials;
pub use client::{HandshakeConfig, ModemClient, device_origin};
pub use error::{Error, ErrorKind};
pub use pages::{PageKind, RawPage};
pub use session::Session;
pub use transport::TransportConfig;
