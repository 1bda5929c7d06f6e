// ── Counter wraparound reconciliation ──
//
// The modem's "Data Transferred" counters are fixed-width and wrap at
// 4096 MBytes. Polling often enough to see every wrap lets us rebuild
// monotonic totals. A poll interval long enough for two wraps between
// observations under-counts; that is not detectable from the raw values.

use tracing::{debug, info};

/// Counter modulus observed on TG-series firmware, in MBytes.
pub const WRAP_MODULUS: f64 = 4096.0;

/// Cross-poll state for wrap correction. Owned by the polling driver and
/// kept in memory only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterState {
    /// `dsl_uptime` of the previous poll; `None` before the first one.
    pub last_uptime: Option<u64>,
    pub last_up_transferred: f64,
    pub last_down_transferred: f64,
    pub up_wraps: u32,
    pub down_wraps: u32,
}

/// Raw counter values from one poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterSample {
    pub uptime: u64,
    pub up_transferred: f64,
    pub down_transferred: f64,
}

/// Wrap-corrected totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corrected {
    pub up_transferred: f64,
    pub down_transferred: f64,
}

/// Applies the wrap policy with a configurable modulus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterReconciler {
    modulus: f64,
}

impl Default for CounterReconciler {
    fn default() -> Self {
        Self {
            modulus: WRAP_MODULUS,
        }
    }
}

impl CounterReconciler {
    pub fn with_modulus(modulus: f64) -> Self {
        Self { modulus }
    }

    /// Correct one sample against the previous state.
    ///
    /// Pure: the caller replaces its state with the returned one. An uptime
    /// lower than the last one means the line or device restarted, so wrap
    /// counts and baselines start again from zero. Otherwise each direction
    /// whose raw value went down gains one wrap.
    pub fn reconcile(&self, sample: CounterSample, state: &CounterState) -> (Corrected, CounterState) {
        let mut next = match state.last_uptime {
            Some(last) if sample.uptime >= last => state.clone(),
            Some(last) => {
                info!(last, now = sample.uptime, "uptime went backwards, resetting counters");
                CounterState::default()
            }
            None => CounterState::default(),
        };

        if sample.up_transferred < next.last_up_transferred {
            next.up_wraps += 1;
            debug!(wraps = next.up_wraps, "upstream counter wrapped");
        }
        if sample.down_transferred < next.last_down_transferred {
            next.down_wraps += 1;
            debug!(wraps = next.down_wraps, "downstream counter wrapped");
        }

        let corrected = Corrected {
            up_transferred: sample.up_transferred + f64::from(next.up_wraps) * self.modulus,
            down_transferred: sample.down_transferred + f64::from(next.down_wraps) * self.modulus,
        };

        next.last_uptime = Some(sample.uptime);
        next.last_up_transferred = sample.up_transferred;
        next.last_down_transferred = sample.down_transferred;

        (corrected, next)
    }
}
