// ── Label-driven field extraction ──
//
// The modal pages have no ids or stable classes, only human-readable
// labels next to their values. Extraction is split in two:
//
// - a `LabelSource` answers "what follows this label" and "what text does
//   this label's region hold" for some markup back end;
// - `FieldExtractor` turns those answers into typed record fields and
//   applies the fallback policy: a missing or unparseable field becomes a
//   zero / empty value plus an `ExtractionWarning`, never an error.

pub mod broadband;
pub mod duration;
pub mod gateway;
pub mod markup;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use tgstat_api::PageKind;

use crate::record::StatRecord;

pub use broadband::extract_broadband;
pub use duration::parse_duration;
pub use gateway::extract_gateway;
pub use markup::MarkupDocument;

/// A number, optionally negative, with an optional fractional part.
const NUMBER: &str = r"-?[0-9]+(?:\.[0-9]+)?";
/// Placeholders the firmware prints for bands it does not use.
const SENTINEL: &str = r"N/A|-";

/// Raw text lookups keyed by a visible label.
pub trait LabelSource {
    /// Text of the first value after the label's own container, or `None`
    /// when the label does not occur.
    fn value_after(&self, label: &str) -> Option<String>;

    /// All text in the region enclosing the label (its container's parent),
    /// whitespace-collapsed, or `None` when the label does not occur.
    fn region_text(&self, label: &str) -> Option<String>;
}

/// Why a field fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningReason {
    /// The label text is not in the page at all.
    MissingLabel,
    /// The label exists but nothing in its region carries the unit.
    NoValues { unit: String },
    /// Fewer values than expected carried the unit.
    Incomplete { unit: String, found: usize },
    /// A value was found but could not be parsed.
    Unparseable { text: String },
}

/// A field that could not be read from the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionWarning {
    pub field: String,
    pub label: String,
    pub reason: WarningReason,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            field,
            label,
            reason,
        } = self;
        match reason {
            WarningReason::MissingLabel => write!(f, "{field}: label '{label}' not found"),
            WarningReason::NoValues { unit } => {
                write!(f, "{field}: no '{unit}' values under '{label}'")
            }
            WarningReason::Incomplete { unit, found } => {
                write!(f, "{field}: only {found} '{unit}' value(s) under '{label}'")
            }
            WarningReason::Unparseable { text } => {
                write!(f, "{field}: cannot parse '{text}' under '{label}'")
            }
        }
    }
}

/// A record plus the warnings raised while building it.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub record: StatRecord,
    pub warnings: Vec<ExtractionWarning>,
}

impl Extraction {
    /// Append another page's fields and warnings.
    pub fn merge(&mut self, other: Self) {
        self.record.extend(other.record);
        self.warnings.extend(other.warnings);
    }
}

/// Extract every field a page kind is known to carry.
pub fn extract(markup: &str, kind: PageKind) -> Extraction {
    let doc = MarkupDocument::parse(markup);
    match kind {
        PageKind::Broadband => extract_broadband(&doc),
        PageKind::Gateway => extract_gateway(&doc),
    }
}

/// Builds a record field by field from a [`LabelSource`].
pub struct FieldExtractor<'s, S: LabelSource + ?Sized> {
    source: &'s S,
    out: Extraction,
}

impl<'s, S: LabelSource + ?Sized> FieldExtractor<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            out: Extraction::default(),
        }
    }

    /// Free text following a label, e.g. `DSL Status` -> `Up`.
    pub fn text(&mut self, field: &str, label: &str) {
        let value = match self.source.value_after(label) {
            Some(v) => v,
            None => {
                self.warn(field, label, WarningReason::MissingLabel);
                String::new()
            }
        };
        self.out.record.insert(field, value);
    }

    /// Up/down pair of unit-suffixed numbers in the label's region.
    pub fn pair(&mut self, (up, down): (&str, &str), label: &str, unit: &str) {
        let (u, d) = self.read_pair(up, label, unit);
        self.out.record.insert(up, u);
        self.out.record.insert(down, d);
    }

    /// Like [`pair`](Self::pair) for `Mbps` rates, stored as integer kbps.
    pub fn rate_pair(&mut self, (up, down): (&str, &str), label: &str) {
        let (u, d) = self.read_pair(up, label, "Mbps");
        self.out.record.insert(up, mbps_to_kbps(u));
        self.out.record.insert(down, mbps_to_kbps(d));
    }

    /// Two comma-separated triples (per-band attenuation), stored as
    /// `{up,down}_attenuation{1,2,3}`.
    pub fn attenuation(&mut self, label: &str, unit: &str) {
        let groups = match self.source.region_text(label) {
            Some(text) => unit_groups(&text, unit),
            None => {
                self.warn("up_attenuation1", label, WarningReason::MissingLabel);
                Vec::new()
            }
        };

        for (idx, direction) in ["up", "down"].into_iter().enumerate() {
            let values = match groups.get(idx) {
                Some(group) => self.parse_triple(direction, label, group),
                None => [0.0; 3],
            };
            for (n, value) in values.into_iter().enumerate() {
                self.out
                    .record
                    .insert(format!("{direction}_attenuation{}", n + 1), value);
            }
        }

        if let Some(found) = self.region_found(label, groups.len(), 2) {
            let reason = if found == 0 {
                WarningReason::NoValues { unit: unit.into() }
            } else {
                WarningReason::Incomplete {
                    unit: unit.into(),
                    found,
                }
            };
            self.warn("down_attenuation1", label, reason);
        }
    }

    /// `2days 03hours 15min 42sec` style text, stored as whole seconds.
    pub fn duration(&mut self, field: &str, label: &str) {
        let seconds = match self.source.value_after(label) {
            Some(text) => parse_duration(&text).unwrap_or_else(|| {
                self.warn(field, label, WarningReason::Unparseable { text });
                0
            }),
            None => {
                self.warn(field, label, WarningReason::MissingLabel);
                0
            }
        };
        self.out
            .record
            .insert(field, i64::try_from(seconds).unwrap_or(i64::MAX));
    }

    /// Finish, logging every warning.
    pub fn finish(self) -> Extraction {
        for w in &self.out.warnings {
            warn!(field = %w.field, "{w}");
        }
        self.out
    }

    fn read_pair(&mut self, field: &str, label: &str, unit: &str) -> (f64, f64) {
        let Some(text) = self.source.region_text(label) else {
            self.warn(field, label, WarningReason::MissingLabel);
            return (0.0, 0.0);
        };
        let values = unit_values(&text, unit);
        match values.as_slice() {
            [] => {
                self.warn(field, label, WarningReason::NoValues { unit: unit.into() });
                (0.0, 0.0)
            }
            [up] => {
                self.warn(
                    field,
                    label,
                    WarningReason::Incomplete {
                        unit: unit.into(),
                        found: 1,
                    },
                );
                (*up, 0.0)
            }
            [up, down, ..] => (*up, *down),
        }
    }

    fn parse_triple(&mut self, direction: &str, label: &str, group: &str) -> [f64; 3] {
        let mut out = [0.0; 3];
        let entries = group.split(',').map(str::trim).take(3);
        for (n, (slot, entry)) in out.iter_mut().zip(entries).enumerate() {
            match entry.parse::<f64>() {
                Ok(v) => *slot = v,
                Err(_) => self.warn(
                    &format!("{direction}_attenuation{}", n + 1),
                    label,
                    WarningReason::Unparseable {
                        text: entry.to_owned(),
                    },
                ),
            }
        }
        out
    }

    /// `Some(found)` when the label exists but fewer than `want` groups matched.
    fn region_found(&self, label: &str, found: usize, want: usize) -> Option<usize> {
        (found < want && self.source.region_text(label).is_some()).then_some(found)
    }

    fn warn(&mut self, field: &str, label: &str, reason: WarningReason) {
        self.out.warnings.push(ExtractionWarning {
            field: field.to_owned(),
            label: label.to_owned(),
            reason,
        });
    }
}

/// Every number immediately followed by `unit`, in order. The unit is
/// matched as a whole word so `dB` does not match inside `dBm`.
pub fn unit_values(text: &str, unit: &str) -> Vec<f64> {
    static VALUE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(r"({NUMBER})\s*([A-Za-z]+)\b")).expect("value pattern is valid")
    });
    VALUE
        .captures_iter(text)
        .filter(|c| c.get(2).is_some_and(|u| u.as_str() == unit))
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect()
}

/// Every comma-separated group of numbers / sentinels followed by `unit`,
/// e.g. `2.8, 12.8, 18.9,N/A,N/A dB`.
pub fn unit_groups(text: &str, unit: &str) -> Vec<String> {
    static GROUP: LazyLock<Regex> = LazyLock::new(|| {
        let entry = format!("(?:{NUMBER}|{SENTINEL})");
        Regex::new(&format!(r"({entry}(?:\s*,\s*{entry})*)\s*([A-Za-z]+)\b"))
            .expect("group pattern is valid")
    });
    GROUP
        .captures_iter(text)
        .filter(|c| c.get(2).is_some_and(|u| u.as_str() == unit))
        .filter_map(|c| Some(c.get(1)?.as_str().to_owned()))
        .collect()
}

/// Mbps to whole kbps, truncating.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn mbps_to_kbps(mbps: f64) -> i64 {
    (mbps * 1000.0) as i64
}
