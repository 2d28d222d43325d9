//! Store predicates and result shaping.
//!
//! A [`Filter`] is a conjunction of field-equality constraints over the JSON
//! form of a document. [`FindOptions`] adds an optional sort and a result cap.
//! Both backends evaluate these with the helpers below so they agree on
//! matching, ordering and truncation.

use serde_json::Value;
use std::cmp::Ordering;

/// Field-equality constraints. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the document with the given id.
    pub fn by_id(id: &str) -> Self {
        Self::all().eq("id", id)
    }

    /// Requires `field` to equal `value` exactly.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((field.to_string(), value.into()));
        self
    }

    /// Adds an equality constraint only when a value is present.
    #[must_use]
    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Returns the id when this filter is exactly an id lookup.
    pub fn id_lookup(&self) -> Option<&str> {
        match self.clauses.as_slice() {
            [(field, Value::String(id))] if field == "id" => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Sorting and truncation for a find.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl FindOptions {
    #[must_use]
    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            order,
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A matched document with its insertion sequence number.
pub(crate) struct Candidate {
    pub seq: u64,
    pub body: Value,
}

/// Orders and truncates matched documents.
///
/// Without a sort, documents come back in insertion order. With a sort, ties
/// on the sort field are broken by insertion order in the same direction, so
/// the result is stable for a given store state.
pub(crate) fn shape(mut candidates: Vec<Candidate>, options: &FindOptions) -> Vec<Value> {
    match &options.sort {
        Some(sort) => candidates.sort_by(|a, b| {
            let ordering = compare_values(a.body.get(&sort.field), b.body.get(&sort.field))
                .then(a.seq.cmp(&b.seq));
            match sort.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        }),
        None => candidates.sort_by_key(|c| c.seq),
    }

    if let Some(limit) = options.limit {
        candidates.truncate(limit);
    }

    candidates.into_iter().map(|c| c.body).collect()
}

/// Total order over JSON values: missing/null < bool < number < string < other.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_) | Value::Object(_)) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
