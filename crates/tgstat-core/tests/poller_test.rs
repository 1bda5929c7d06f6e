#![allow(clippy::unwrap_used)]
// Poll-cycle tests against a mocked modem.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tgstat_api::{Credentials, ErrorKind, ModemClient, TransportConfig};
use tgstat_core::{CoreError, FIELD_ORDER, StatValue, StatsPoller};

// ── Helpers ─────────────────────────────────────────────────────────

const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
const SALT: &str = "bea6e6c8f1ab7d3c3e5f0b1c2d3e4f50";
const SERVER_B: &str = concat!(
    "6af5a84588463fc5ea52575133a6b2b7d632c2a8280e7aa7b865085d7f808cc3",
    "db059f154e922052ebb7d8e9fe6268ffa7bf35fd4c6a7c58b8ca7076937c8633",
    "34daa1c20ea3bf31eb5adeef6d1fc5ee773529bb71fb782c8b618a5c925edf58",
    "27deede69bbd7954c53c701709709fda97b42237862247140769e6621d4d478e",
    "75dc63b756bab35a2f53556aa524be9936da1a07fd202b1e794cdde51d9764be",
    "5181e5c3a952eb3a2b27cad06fbfdc64075c51486b2007c7c172797d3792b620",
    "4d7032160c157205724f386a7cee955efb16b5ac769daccda4f5636f62c83f8f",
    "c2f56df0b61737800db7914af15501e3d471f1d774b81436a6d9a3ccd2525286",
);

const BROADBAND: &str = include_str!("fixtures/broadband-bridge-modal.html");
const GATEWAY: &str = include_str!("fixtures/gateway-modal.html");

fn poller(server: &MockServer) -> StatsPoller {
    let client = ModemClient::new(TransportConfig::with_timeout(Duration::from_secs(5)));
    StatsPoller::new(
        client,
        Credentials {
            address: server.uri(),
            username: "admin".into(),
            password: "password".to_string().into(),
        },
    )
}

/// Full handshake; the token endpoint must be hit `logins` times.
async fn mount_handshake(server: &MockServer, logins: u64) {
    Mock::given(method("GET"))
        .and(path("/login.lp"))
        .and(query_param("action", "getcsrf"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN))
        .expect(logins)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .and(body_string_contains("I=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "s": SALT, "B": SERVER_B })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .and(body_string_contains("M="))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sessionID=abc123; Path=/")
                .set_body_json(json!({ "M": "00" })),
        )
        .mount(server)
        .await;
}

async fn mount_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/modals/broadband-bridge-modal.lp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BROADBAND))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/modals/gateway-modal.lp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GATEWAY))
        .mount(server)
        .await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_poll_produces_full_record() {
    let server = MockServer::start().await;
    mount_handshake(&server, 1).await;
    mount_pages(&server).await;

    let mut poller = poller(&server);
    let out = poller.poll().await.unwrap();

    assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    assert_eq!(out.record.names().collect::<Vec<_>>(), FIELD_ORDER.to_vec());
    assert_eq!(out.record.get("up_rate"), Some(&StatValue::Int(4850)));
    assert_eq!(out.record.get("product_name"), Some(&StatValue::Text("TG799vac".into())));
    assert!(poller.has_session());
    assert_eq!(poller.counter_state().last_uptime, Some(184_542));
}

#[tokio::test]
async fn test_session_is_reused_between_polls() {
    let server = MockServer::start().await;
    mount_handshake(&server, 1).await;
    mount_pages(&server).await;

    let mut poller = poller(&server);
    poller.poll().await.unwrap();
    poller.poll().await.unwrap();
    // `expect(1)` on the token endpoint is checked when the server drops.
}

#[tokio::test]
async fn test_fetch_failure_drops_session_and_relogs() {
    let server = MockServer::start().await;
    mount_handshake(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/modals/broadband-bridge-modal.lp"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_pages(&server).await;

    let mut poller = poller(&server);
    let err = poller.poll().await.unwrap_err();
    assert!(matches!(err, CoreError::PageUnavailable { status: 500, .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(!poller.has_session());
    assert_eq!(poller.counter_state().last_uptime, None);

    let out = poller.poll().await.unwrap();
    assert_eq!(out.record.get("dsl_status"), Some(&StatValue::Text("Up".into())));
    assert!(poller.has_session());
}

#[tokio::test]
async fn test_rejected_login_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login.lp"))
        .respond_with(ResponseTemplate::new(200).set_body_string("short"))
        .mount(&server)
        .await;

    let mut poller = poller(&server);
    let err = poller.poll().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(!poller.has_session());
}
