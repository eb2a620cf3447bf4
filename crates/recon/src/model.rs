use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A single field value as supplied by the upstream parser.
///
/// Absent values are never represented here: a field with no value is simply
/// not present on the [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub const ID: &str = "id";
pub const REFERENCE: &str = "reference";
pub const DATE: &str = "date";
pub const AMOUNT: &str = "amount";
pub const DESCRIPTION: &str = "description";
pub const CATEGORY: &str = "category";

/// Field names that own a dedicated slot on [`Record`], in canonical order.
pub const WELL_KNOWN_FIELDS: [&str; 6] = [ID, REFERENCE, DATE, AMOUNT, DESCRIPTION, CATEGORY];

/// One transaction entry from either input collection.
///
/// The six well-known fields live in their own slots; every other column is
/// carried in `extra` in the order it was first set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub id: Option<Value>,
    pub reference: Option<Value>,
    pub date: Option<Value>,
    pub amount: Option<Value>,
    pub description: Option<Value>,
    pub category: Option<Value>,
    pub extra: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field. Well-known names go to their slot, anything else replaces
    /// an existing extra of the same name or is appended.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        if let Some(slot) = self.slot_mut(&field) {
            *slot = Some(value);
            return;
        }
        match self.extra.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.extra.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        match field {
            ID => self.id.as_ref(),
            REFERENCE => self.reference.as_ref(),
            DATE => self.date.as_ref(),
            AMOUNT => self.amount.as_ref(),
            DESCRIPTION => self.description.as_ref(),
            CATEGORY => self.category.as_ref(),
            _ => self
                .extra
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, v)| v),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Present fields: well-known slots in canonical order, then extras.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        let known = [
            (ID, &self.id),
            (REFERENCE, &self.reference),
            (DATE, &self.date),
            (AMOUNT, &self.amount),
            (DESCRIPTION, &self.description),
            (CATEGORY, &self.category),
        ];
        known
            .into_iter()
            .filter_map(|(name, slot)| slot.as_ref().map(|v| (name, v)))
            .chain(self.extra.iter().map(|(name, v)| (name.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.fields().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut Option<Value>> {
        match field {
            ID => Some(&mut self.id),
            REFERENCE => Some(&mut self.reference),
            DATE => Some(&mut self.date),
            AMOUNT => Some(&mut self.amount),
            DESCRIPTION => Some(&mut self.description),
            CATEGORY => Some(&mut self.category),
            _ => None,
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat map of field name to string, number or bool")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((name, value)) = access.next_entry::<String, Option<Value>>()? {
                    // null is "absent", not a value
                    if let Some(value) = value {
                        record.set(name, value);
                    }
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

// ---------------------------------------------------------------------------
// Pair evaluation
// ---------------------------------------------------------------------------

/// A shared field whose similarity fell below the field-match threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDifference {
    pub field: String,
    /// Value from the left-hand record.
    pub value1: Value,
    /// Value from the right-hand record.
    pub value2: Value,
}

/// Result of comparing two records field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairEvaluation {
    /// Mean similarity over the fields present in both records, in [0, 1].
    pub confidence: f64,
    pub matched_fields: Vec<String>,
    pub differences: Vec<FieldDifference>,
}

impl PairEvaluation {
    /// Number of fields that were compared.
    pub fn compared_fields(&self) -> usize {
        self.matched_fields.len() + self.differences.len()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A paired result with zero field differences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub record1: Record,
    pub record2: Record,
    pub confidence: f64,
    pub matched_fields: Vec<String>,
}

/// A paired result with one or more field differences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchResult {
    pub record1: Record,
    pub record2: Record,
    pub confidence: f64,
    pub differences: Vec<FieldDifference>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_records1: usize,
    pub total_records2: usize,
    pub total_matches: usize,
    pub total_mismatches: usize,
    pub total_missing_in1: usize,
    pub total_missing_in2: usize,
    /// Matches as a percentage of the left collection, two decimal places.
    pub match_rate: f64,
}

impl ReconSummary {
    /// True when every record on both sides paired without differences.
    pub fn is_reconciled(&self) -> bool {
        self.total_mismatches == 0 && self.total_missing_in1 == 0 && self.total_missing_in2 == 0
    }
}

/// Terminal output of one reconciliation run.
///
/// Bucket names follow the report convention: `missing_in_dataset1` holds
/// records from the right-hand collection that dataset 1 lacks, and
/// `missing_in_dataset2` holds left-hand records that dataset 2 lacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult {
    pub matches: Vec<MatchResult>,
    pub mismatches: Vec<MismatchResult>,
    pub missing_in_dataset1: Vec<Record>,
    pub missing_in_dataset2: Vec<Record>,
    pub summary: ReconSummary,
}

impl ReconResult {
    /// Unpaired records that came from the left-hand collection.
    pub fn missing_from_left(&self) -> &[Record] {
        &self.missing_in_dataset2
    }

    /// Unpaired records that came from the right-hand collection.
    pub fn missing_from_right(&self) -> &[Record] {
        &self.missing_in_dataset1
    }
}
