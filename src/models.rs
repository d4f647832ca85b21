//! Data model shared by the components: records, column descriptors and sort state

use std::cmp::Ordering;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, TermblocksError};

/// One row of table data. Attributes are arbitrary JSON values keyed by field name.
///
/// Tables hold records as `Rc<Record>` and never mutate them; selection is
/// tracked by pointer identity, so callers must keep handing the same `Rc`s
/// back across updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from a JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value, index: usize) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(TermblocksError::RecordNotObject { index }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Text shown in a cell for `key`. Missing fields and nulls are blank.
    pub fn cell_text(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Maps a record field to a header. Order in the column list is display order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    pub key: String,
    pub header: String,
}

impl Column {
    pub fn new(key: &str, header: &str) -> Self {
        Self {
            key: key.to_string(),
            header: header.to_string(),
        }
    }

    /// Parse `key` or `key:Header`. A bare key is used as its own header.
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let (key, header) = match spec.split_once(':') {
            Some((key, header)) => (key.trim(), header.trim()),
            None => (spec, spec),
        };

        if key.is_empty() || header.is_empty() {
            return Err(TermblocksError::InvalidColumnSpec(spec.to_string()));
        }

        Ok(Self::new(key, header))
    }

    /// Parse a comma separated list of column specs.
    pub fn parse_list(specs: &str) -> Result<Vec<Self>> {
        specs
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Self::parse_spec)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Header glyph for the active sort column
    pub fn indicator(&self) -> &str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// The single active sort column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortState {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(key: &str) -> Self {
        Self {
            key: key.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: &str) -> Self {
        Self {
            key: key.to_string(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse `key`, `key:asc` or `key:desc`.
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let (key, direction) = match spec.split_once(':') {
            Some((key, dir)) => {
                let direction = match dir.trim().to_lowercase().as_str() {
                    "asc" | "ascending" => SortDirection::Ascending,
                    "desc" | "descending" => SortDirection::Descending,
                    _ => return Err(TermblocksError::InvalidSortSpec(spec.to_string())),
                };
                (key.trim(), direction)
            }
            None => (spec, SortDirection::Ascending),
        };

        if key.is_empty() {
            return Err(TermblocksError::InvalidSortSpec(spec.to_string()));
        }

        Ok(Self {
            key: key.to_string(),
            direction,
        })
    }
}

/// Compare two field values. Strings compare lexicographically, numbers by
/// difference; any other pairing (including a missing side) compares equal.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).partial_cmp(&0.0).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

/// Return a freshly sorted copy of `records`. The input slice is untouched and
/// the output holds the same `Rc`s. Without a sort state, input order is kept.
pub fn sorted_records(records: &[Rc<Record>], sort: Option<&SortState>) -> Vec<Rc<Record>> {
    let mut sorted = records.to_vec();

    if let Some(sort) = sort {
        sorted.sort_by(|a, b| {
            let (a, b) = (a.get(&sort.key), b.get(&sort.key));
            match sort.direction {
                SortDirection::Ascending => compare_values(a, b),
                SortDirection::Descending => compare_values(b, a),
            }
        });
    }

    sorted
}

/// A set of records loaded from disk, with columns and an initial sort if the
/// document named them.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub columns: Vec<Column>,
    pub records: Vec<Rc<Record>>,
    pub sort: Option<SortState>,
}

impl RecordSet {
    /// Parse either a bare array of objects or
    /// `{"columns": [...], "records": [...], "sort": {"key": ..., "direction": ...}}`.
    /// Columns are inferred from the first record when the document has none.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;

        let (columns, sort, rows) = match document {
            Value::Array(rows) => (None, None, rows),
            Value::Object(mut object) => {
                let rows = match object.remove("records") {
                    Some(Value::Array(rows)) => rows,
                    _ => return Err(TermblocksError::RecordsNotArray),
                };
                let columns = match object.remove("columns") {
                    Some(columns) => Some(serde_json::from_value::<Vec<Column>>(columns)?),
                    None => None,
                };
                let sort = match object.remove("sort") {
                    Some(Value::Null) | None => None,
                    Some(sort) => Some(serde_json::from_value::<SortState>(sort)?),
                };
                (columns, sort, rows)
            }
            _ => return Err(TermblocksError::RecordsNotArray),
        };

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| Record::from_value(row, index).map(Rc::new))
            .collect::<Result<Vec<_>>>()?;

        let columns = columns.unwrap_or_else(|| infer_columns(&records));

        Ok(Self { columns, records, sort })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// One column per key of the first record, header equal to the key.
pub fn infer_columns(records: &[Rc<Record>]) -> Vec<Column> {
    records
        .first()
        .map(|record| record.keys().map(|key| Column::new(key, key)).collect())
        .unwrap_or_default()
}
