// ── Poll cycle ──
//
// One cycle: handshake if no session is held, fetch both modals, extract,
// then fold the transfer counters through the reconciler. The session is
// kept across cycles until a fetch or transport failure makes it suspect.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use tgstat_api::{Credentials, ModemClient, RawPage, Session};

use crate::counters::{CounterReconciler, CounterSample, CounterState};
use crate::error::CoreError;
use crate::extract::{Extraction, MarkupDocument, extract_broadband, extract_gateway};
use crate::record::StatRecord;

/// Timestamp layout of the `datetime` field.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(now: &DateTime<Local>) -> String {
    now.format(DATETIME_FORMAT).to_string()
}

/// Build a full record from both pages and reconcile its counters.
///
/// `datetime` comes first, then broadband fields, then gateway fields.
/// The transfer fields are replaced in place by their wrap-corrected
/// totals; the returned state is the one to pass next time.
pub fn assemble_record(
    broadband: &str,
    gateway: &str,
    timestamp: &str,
    reconciler: &CounterReconciler,
    state: &CounterState,
) -> (Extraction, CounterState) {
    let mut out = Extraction::default();
    out.record.insert("datetime", timestamp);
    out.merge(extract_broadband(&MarkupDocument::parse(broadband)));
    out.merge(extract_gateway(&MarkupDocument::parse(gateway)));

    let sample = counter_sample(&out.record);
    let (corrected, next) = reconciler.reconcile(sample, state);
    out.record.insert("up_transferred", corrected.up_transferred);
    out.record.insert("down_transferred", corrected.down_transferred);

    (out, next)
}

fn counter_sample(record: &StatRecord) -> CounterSample {
    let float = |name: &str| record.get(name).and_then(|v| v.as_f64()).unwrap_or(0.0);
    CounterSample {
        uptime: record
            .get("dsl_uptime")
            .and_then(|v| v.as_i64())
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(0),
        up_transferred: float("up_transferred"),
        down_transferred: float("down_transferred"),
    }
}

/// Drives repeated poll cycles against one modem.
pub struct StatsPoller {
    client: ModemClient,
    credentials: Credentials,
    reconciler: CounterReconciler,
    session: Option<Session>,
    state: CounterState,
}

impl StatsPoller {
    pub fn new(client: ModemClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            reconciler: CounterReconciler::default(),
            session: None,
            state: CounterState::default(),
        }
    }

    pub fn with_reconciler(mut self, reconciler: CounterReconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    pub fn counter_state(&self) -> &CounterState {
        &self.state
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Run one cycle and return the reconciled record.
    ///
    /// Failures are not retried here. A failed cycle leaves the counter
    /// state untouched.
    pub async fn poll(&mut self) -> Result<Extraction, CoreError> {
        let (broadband, gateway) = self.fetch_pages().await?;
        let timestamp = format_timestamp(&Local::now());
        let (out, next) = assemble_record(
            &broadband.markup,
            &gateway.markup,
            &timestamp,
            &self.reconciler,
            &self.state,
        );
        self.state = next;
        debug!(fields = out.record.len(), warnings = out.warnings.len(), "poll complete");
        Ok(out)
    }

    async fn fetch_pages(&mut self) -> Result<(RawPage, RawPage), CoreError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                info!(address = %self.credentials.address, "logging in");
                self.client.authenticate(&self.credentials).await?
            }
        };

        match session.fetch().await {
            Ok(pages) => {
                self.session = Some(session);
                Ok(pages)
            }
            Err(e) if e.invalidates_session() => {
                warn!(error = %e, "dropping session");
                Err(e.into())
            }
            Err(e) => {
                self.session = Some(session);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::record::StatValue;

    const BROADBAND: &str = r#"
        <div class="control-group"><label>Data Transferred</label>
          <div class="controls"><span>10.5 MBytes 20.25 MBytes</span></div></div>
        <div class="control-group"><label>DSL Uptime</label>
          <div class="controls"><span>1min 40sec</span></div></div>
    "#;

    #[test]
    fn datetime_leads_the_record() {
        let (out, _) = assemble_record(
            BROADBAND,
            "",
            "2026-01-02 03:04:05",
            &CounterReconciler::default(),
            &CounterState::default(),
        );
        assert_eq!(out.record.names().next(), Some("datetime"));
        assert_eq!(
            out.record.get("datetime"),
            Some(&StatValue::Text("2026-01-02 03:04:05".into()))
        );
    }

    #[test]
    fn counters_are_reconciled_in_place() {
        let state = CounterState {
            last_uptime: Some(90),
            last_up_transferred: 4000.0,
            last_down_transferred: 5.0,
            up_wraps: 0,
            down_wraps: 0,
        };
        let (out, next) = assemble_record(
            BROADBAND,
            "",
            "now",
            &CounterReconciler::default(),
            &state,
        );

        assert_eq!(next.last_uptime, Some(100));
        assert_eq!(next.up_wraps, 1);
        assert_eq!(
            out.record.get("up_transferred"),
            Some(&StatValue::Float(10.5 + 4096.0))
        );
        assert_eq!(
            out.record.get("down_transferred"),
            Some(&StatValue::Float(20.25))
        );

        let names: Vec<&str> = out.record.names().collect();
        let up = names.iter().position(|n| *n == "up_transferred");
        let power = names.iter().position(|n| *n == "down_power");
        assert!(up > power);
    }

    #[test]
    fn timestamp_layout() {
        use chrono::TimeZone;
        let t = Local
            .with_ymd_and_hms(2026, 10, 19, 7, 5, 9)
            .single()
            .unwrap();
        assert_eq!(format_timestamp(&t), "2026-10-19 07:05:09");
    }
}
