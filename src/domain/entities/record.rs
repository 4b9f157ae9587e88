use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl FieldValue {
    /// Numbers order numerically, text case-insensitively, numbers before text.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .to_string()
                .to_lowercase()
                .cmp(&other.to_string().to_lowercase()),
        }
    }

    pub fn matches_exact(&self, needle: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(needle.trim())
    }

    pub fn contains(&self, needle_lower: &str) -> bool {
        self.to_string().to_lowercase().contains(needle_lower)
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Decimal(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Decimal(value) => write!(f, "{value:.2}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// A row a CRUD screen can list, search, sort and edit.
pub trait Record: Clone + PartialEq + Send + Sync + 'static {
    type Draft: Clone + Send + 'static;
    type Patch: Clone + Send + 'static;

    fn id(&self) -> &str;

    /// Looks up a field by its column key.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Column keys the free-text query runs against.
    fn searchable_fields() -> &'static [&'static str];

    fn from_draft(id: String, draft: Self::Draft) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);

    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        Self::searchable_fields()
            .iter()
            .filter_map(|key| self.field(key))
            .any(|value| value.contains(&needle))
    }

    fn cell(&self, key: &str) -> String {
        self.field(key)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }
}
