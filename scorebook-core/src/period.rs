//! Periods and the end-of-period quarter table
//!
//! Period labels are kept as plain strings in the game state (the current
//! period may be set to anything); [`Period`] is the parsed view used for
//! ordering and for the advisory next/previous sequencing.

use crate::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Number of regulation quarters
pub const REGULATION_QUARTERS: u32 = 4;

/// A parsed period label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Regulation quarter `Q1`..`Q4`
    Quarter(u32),
    /// Overtime `OT1`, `OT2`, ...
    Overtime(u32),
}

impl Period {
    /// Parse `Qn` (1..=4) or `OTn` (n >= 1)
    pub fn parse(label: &str) -> Option<Self> {
        if let Some(n) = label.strip_prefix("OT") {
            return match parse_digits(n) {
                Some(n) if n >= 1 => Some(Period::Overtime(n)),
                _ => None,
            };
        }
        if let Some(n) = label.strip_prefix('Q') {
            return match parse_digits(n) {
                Some(n) if (1..=REGULATION_QUARTERS).contains(&n) => Some(Period::Quarter(n)),
                _ => None,
            };
        }
        None
    }

    /// Whether `label` names an overtime period
    pub fn is_overtime_label(label: &str) -> bool {
        matches!(Period::parse(label), Some(Period::Overtime(_)))
    }
}

/// Number suffix of a label: ASCII digits only, no sign
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Period::Quarter(a), Period::Quarter(b)) => a.cmp(b),
            (Period::Overtime(a), Period::Overtime(b)) => a.cmp(b),
            (Period::Quarter(_), Period::Overtime(_)) => Ordering::Less,
            (Period::Overtime(_), Period::Quarter(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Quarter(n) => write!(f, "Q{}", n),
            Period::Overtime(n) => write!(f, "OT{}", n),
        }
    }
}

/// Period that follows `current`
///
/// `Q1..Q3` advance to the next quarter; `Q4` and every overtime advance to
/// `OT{next_ot_num}`.
pub fn next_period(current: &str, next_ot_num: u32) -> Result<String> {
    match Period::parse(current) {
        Some(Period::Quarter(n)) if n < REGULATION_QUARTERS => {
            Ok(Period::Quarter(n + 1).to_string())
        }
        Some(_) => Ok(Period::Overtime(next_ot_num).to_string()),
        None => Err(Error::InvalidPeriod(current.to_string())),
    }
}

/// Period that precedes `current`, `None` at `Q1`
pub fn previous_period(current: &str) -> Result<Option<String>> {
    match Period::parse(current) {
        Some(Period::Quarter(1)) => Ok(None),
        Some(Period::Quarter(n)) => Ok(Some(Period::Quarter(n - 1).to_string())),
        Some(Period::Overtime(1)) => Ok(Some(Period::Quarter(REGULATION_QUARTERS).to_string())),
        Some(Period::Overtime(n)) => Ok(Some(Period::Overtime(n - 1).to_string())),
        None => Err(Error::InvalidPeriod(current.to_string())),
    }
}

/// End-of-period record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodScore {
    /// Home points scored in this period
    #[serde(rename = "Team1")]
    pub home_delta: i32,

    /// Opponent points scored in this period
    #[serde(rename = "Team2")]
    pub opponent_delta: i32,

    /// Home cumulative score at the end of this period
    #[serde(rename = "Cumulative1")]
    pub home_cumulative: i32,

    /// Opponent cumulative score at the end of this period
    #[serde(rename = "Cumulative2")]
    pub opponent_cumulative: i32,
}

/// Quarter table in insertion order
///
/// Serialized as a JSON object whose key order is the table order; the
/// previous-period lookup depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterTable {
    entries: Vec<(String, PeriodScore)>,
}

impl QuarterTable {
    /// Empty `Q1..Q4`
    pub fn regulation() -> Self {
        let entries = (1..=REGULATION_QUARTERS)
            .map(|n| (Period::Quarter(n).to_string(), PeriodScore::default()))
            .collect();
        Self { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `label`
    pub fn get(&self, label: &str) -> Option<&PeriodScore> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, s)| s)
    }

    /// Labels in table (insertion) order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Append an empty entry unless `label` already exists
    pub fn insert_empty(&mut self, label: &str) {
        if self.get(label).is_none() {
            self.entries.push((label.to_string(), PeriodScore::default()));
        }
    }

    /// Record the cumulative score at the end of `label`
    ///
    /// The delta is taken against the entry that precedes `label` in table
    /// order, `(0, 0)` for the first entry. Missing overtime entries are
    /// appended; a missing regulation label is an error and leaves the
    /// table untouched.
    pub fn record(&mut self, label: &str, home_cumulative: i32, opponent_cumulative: i32) -> Result<()> {
        let index = match self.entries.iter().position(|(l, _)| l == label) {
            Some(index) => index,
            None if Period::is_overtime_label(label) => {
                self.entries.push((label.to_string(), PeriodScore::default()));
                self.entries.len() - 1
            }
            None => return Err(Error::UnknownPeriod(label.to_string())),
        };

        let (prev_home, prev_opponent) = match index {
            0 => (0, 0),
            i => {
                let prev = &self.entries[i - 1].1;
                (prev.home_cumulative, prev.opponent_cumulative)
            }
        };

        self.entries[index].1 = PeriodScore {
            home_delta: home_cumulative.saturating_sub(prev_home),
            opponent_delta: opponent_cumulative.saturating_sub(prev_opponent),
            home_cumulative,
            opponent_cumulative,
        };
        Ok(())
    }

    /// Entries in natural period order: quarters, then overtimes by number
    ///
    /// Labels that are not valid periods are left out.
    pub fn ordered(&self) -> Vec<(Period, &PeriodScore)> {
        let mut ordered: Vec<(Period, &PeriodScore)> = self
            .entries
            .iter()
            .filter_map(|(label, score)| Period::parse(label).map(|p| (p, score)))
            .collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
        ordered
    }
}

impl Serialize for QuarterTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, score) in &self.entries {
            map.serialize_entry(label, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QuarterTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = QuarterTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of period label to period score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<QuarterTable, A::Error> {
                let mut entries: Vec<(String, PeriodScore)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(4));
                while let Some((label, score)) = access.next_entry::<String, PeriodScore>()? {
                    match entries.iter_mut().find(|(l, _)| *l == label) {
                        Some(existing) => existing.1 = score,
                        None => entries.push((label, score)),
                    }
                }
                Ok(QuarterTable { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!(Period::parse("Q1"), Some(Period::Quarter(1)));
        assert_eq!(Period::parse("OT12"), Some(Period::Overtime(12)));
        assert_eq!(Period::parse("Q5"), None);
        assert_eq!(Period::parse("OT0"), None);
        assert_eq!(Period::parse("halftime"), None);
    }

    #[test]
    fn test_parse_rejects_signed_suffix() {
        assert_eq!(Period::parse("OT+1"), None);
        assert_eq!(Period::parse("Q+2"), None);
        assert_eq!(Period::parse("OT"), None);
        assert_eq!(Period::parse("OT 1"), None);

        let mut table = QuarterTable::regulation();
        assert!(matches!(table.record("OT+1", 90, 90), Err(Error::UnknownPeriod(_))));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_next_period() {
        assert_eq!(next_period("Q1", 1).unwrap(), "Q2");
        assert_eq!(next_period("Q3", 1).unwrap(), "Q4");
        assert_eq!(next_period("Q4", 1).unwrap(), "OT1");
        assert_eq!(next_period("OT1", 2).unwrap(), "OT2");
        // Overtime advances to the counter, not to its own successor
        assert_eq!(next_period("OT1", 1).unwrap(), "OT1");
        assert!(next_period("bogus", 1).is_err());
    }

    #[test]
    fn test_previous_period() {
        assert_eq!(previous_period("Q1").unwrap(), None);
        assert_eq!(previous_period("Q3").unwrap(), Some("Q2".to_string()));
        assert_eq!(previous_period("OT1").unwrap(), Some("Q4".to_string()));
        assert_eq!(previous_period("OT3").unwrap(), Some("OT2".to_string()));
    }

    #[test]
    fn test_record_delta_against_previous_entry() {
        let mut table = QuarterTable::regulation();
        table.record("Q1", 18, 16).unwrap();
        table.record("Q2", 35, 30).unwrap();

        let q2 = table.get("Q2").unwrap();
        assert_eq!((q2.home_delta, q2.opponent_delta), (17, 14));
        assert_eq!((q2.home_cumulative, q2.opponent_cumulative), (35, 30));
    }

    #[test]
    fn test_record_unknown_regular_label() {
        let mut table = QuarterTable::regulation();
        let before = table.clone();
        assert!(matches!(table.record("Q9", 1, 1), Err(Error::UnknownPeriod(_))));
        assert_eq!(table, before);
    }

    #[test]
    fn test_record_creates_overtime() {
        let mut table = QuarterTable::regulation();
        table.record("Q4", 80, 80).unwrap();
        table.record("OT1", 88, 85).unwrap();
        let ot = table.get("OT1").unwrap();
        assert_eq!((ot.home_delta, ot.opponent_delta), (8, 5));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_ordered_ignores_insertion_order() {
        let mut table = QuarterTable::default();
        for label in ["Q1", "OT2", "Q3", "OT1"] {
            table.insert_empty(label);
        }
        let labels: Vec<String> = table.ordered().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(labels, vec!["Q1", "Q3", "OT1", "OT2"]);
    }

    #[test]
    fn test_serde_keeps_table_order() {
        let mut table = QuarterTable::default();
        for label in ["Q2", "Q1", "OT1"] {
            table.insert_empty(label);
        }
        let json = serde_json::to_string(&table).unwrap();
        let parsed: QuarterTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.labels().collect::<Vec<_>>(), vec!["Q2", "Q1", "OT1"]);
    }
}
