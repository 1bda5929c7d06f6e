// tgstat-core: Turns modem modal pages into ordered statistic records.

pub mod counters;
pub mod error;
pub mod extract;
pub mod poller;
pub mod record;

// ── Primary re-exports ──────────────────────────────────────────────
pub use counters::{CounterReconciler, CounterSample, CounterState, Corrected, WRAP_MODULUS};
pub use error::CoreError;
pub use extract::{
    Extraction, ExtractionWarning, FieldExtractor, LabelSource, MarkupDocument, WarningReason,
    extract,
};
pub use poller::{DATETIME_FORMAT, StatsPoller, assemble_record, format_timestamp};
pub use record::{FIELD_ORDER, StatRecord, StatValue};
