#![allow(clippy::unwrap_used)]
// Extraction against captured modal markup.

use pretty_assertions::assert_eq;

use tgstat_api::PageKind;
use tgstat_core::{
    CounterReconciler, CounterState, FIELD_ORDER, StatValue, WarningReason, assemble_record,
    extract,
};

const BROADBAND: &str = include_str!("fixtures/broadband-bridge-modal.html");
const GATEWAY: &str = include_str!("fixtures/gateway-modal.html");

fn float(v: f64) -> StatValue {
    StatValue::Float(v)
}

#[test]
fn broadband_fields() {
    let out = extract(BROADBAND, PageKind::Broadband);
    assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);

    let got: Vec<(&str, &StatValue)> = out.record.iter().collect();
    let expected: Vec<(&str, StatValue)> = vec![
        ("up_rate", StatValue::Int(4850)),
        ("down_rate", StatValue::Int(12300)),
        ("up_maxrate", StatValue::Int(37120)),
        ("down_maxrate", StatValue::Int(105_430)),
        ("up_power", float(6.9)),
        ("down_power", float(14.2)),
        ("up_noisemargin", float(8.9)),
        ("down_noisemargin", float(6.1)),
        ("up_transferred", float(1234.56)),
        ("down_transferred", float(3210.98)),
        ("up_attenuation1", float(2.8)),
        ("up_attenuation2", float(12.8)),
        ("up_attenuation3", float(18.9)),
        ("down_attenuation1", float(7.8)),
        ("down_attenuation2", float(16.7)),
        ("down_attenuation3", float(24.3)),
        ("dsl_uptime", StatValue::Int(184_542)),
        ("dsl_mode", "VDSL2".into()),
        ("dsl_type", "17a".into()),
        ("dsl_status", "Up".into()),
    ];
    let expected: Vec<(&str, &StatValue)> = expected.iter().map(|(k, v)| (*k, v)).collect();
    assert_eq!(got, expected);
}

#[test]
fn gateway_fields() {
    let out = extract(GATEWAY, PageKind::Gateway);
    assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);

    let text = |name: &str| out.record.get(name).and_then(StatValue::as_str).unwrap();
    assert_eq!(text("product_vendor"), "Technicolor");
    assert_eq!(text("product_name"), "TG799vac");
    assert_eq!(text("software_version"), "16.3.7636-2921001-20170228140919");
    assert_eq!(text("firmware_version"), "16.3.7636-2921001");
    assert_eq!(text("hardware_version"), "VANT-6");
    assert_eq!(text("serial_number"), "CP1712TA2JK");
    assert_eq!(text("mac_address"), "d4:35:1d:12:34:56");
    assert_eq!(out.record.get("uptime"), Some(&StatValue::Int(471_729)));
}

#[test]
fn full_record_follows_field_order() {
    let (out, state) = assemble_record(
        BROADBAND,
        GATEWAY,
        "2026-10-19 12:00:00",
        &CounterReconciler::default(),
        &CounterState::default(),
    );
    assert_eq!(out.record.names().collect::<Vec<_>>(), FIELD_ORDER.to_vec());
    assert_eq!(state.last_uptime, Some(184_542));
    assert_eq!(out.record.get("up_transferred"), Some(&float(1234.56)));
}

#[test]
fn wrapped_counter_between_two_polls() {
    let r = CounterReconciler::default();
    let later = BROADBAND
        .replace(">1234.56<", ">10.00<")
        .replace("15min 42sec", "16min 42sec");

    let (_, state) = assemble_record(BROADBAND, GATEWAY, "t0", &r, &CounterState::default());
    let (out, state) = assemble_record(&later, GATEWAY, "t1", &r, &state);

    assert_eq!(state.up_wraps, 1);
    assert_eq!(state.down_wraps, 0);
    assert_eq!(out.record.get("up_transferred"), Some(&float(4106.0)));
    assert_eq!(out.record.get("down_transferred"), Some(&float(3210.98)));
}

#[test]
fn empty_page_yields_defaults_with_warnings() {
    let out = extract("<html><body><p>Session expired</p></body></html>", PageKind::Broadband);

    assert_eq!(out.record.len(), 20);
    assert_eq!(out.record.get("up_rate"), Some(&StatValue::Int(0)));
    assert_eq!(out.record.get("down_noisemargin"), Some(&float(0.0)));
    assert_eq!(out.record.get("dsl_status"), Some(&StatValue::Text(String::new())));
    assert!(!out.warnings.is_empty());
    assert!(
        out.warnings
            .iter()
            .all(|w| w.reason == WarningReason::MissingLabel)
    );
}

#[test]
fn one_sided_pair_defaults_the_other_direction() {
    let markup = r#"
        <div class="control-group">
          <label class="control-label">Noise Margin</label>
          <div class="controls"><span class="simple-desc">8.9&nbsp;dB</span></div>
        </div>"#;
    let out = extract(markup, PageKind::Broadband);

    assert_eq!(out.record.get("up_noisemargin"), Some(&float(8.9)));
    assert_eq!(out.record.get("down_noisemargin"), Some(&float(0.0)));
    assert!(out.warnings.iter().any(|w| w.field == "up_noisemargin"
        && w.reason
            == WarningReason::Incomplete {
                unit: "dB".into(),
                found: 1
            }));
}
