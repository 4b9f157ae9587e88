//! Create and edit forms: raw text values in, validated drafts and patches out.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::entities::record::Record;

/// Raw input keyed by field key, as typed into the form.
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
        }
    }

    pub const fn number(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Number,
        }
    }

    pub const fn choice(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Choice(options),
        }
    }
}

/// One message per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, message: impl Into<String>) {
        self.0.entry(key.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, message)| (key.as_str(), message.as_str()))
    }

    /// `Ok(value)` when nothing was reported.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A record that can be created and edited through a form.
pub trait Editable: Record {
    fn form_fields() -> &'static [FormField];

    /// Current values, used to prefill the edit form.
    fn form_values(&self) -> FormValues;

    /// Every field must be present and valid.
    fn parse_draft(values: &FormValues) -> Result<Self::Draft, FieldErrors>;

    /// Only the keys present in `values` are validated and changed.
    fn parse_patch(values: &FormValues) -> Result<Self::Patch, FieldErrors>;
}

/// Keys of `values` whose text differs from `initial`.
pub fn changed_values(initial: &FormValues, values: &FormValues) -> FormValues {
    values
        .iter()
        .filter(|(key, value)| initial.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Reads fields out of a [`FormValues`] map, collecting every problem instead
/// of stopping at the first.
pub struct FieldReader<'a> {
    values: &'a FormValues,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(values: &'a FormValues) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    fn raw(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).map(|value| value.trim())
    }

    /// Trimmed text of at least `min_chars` characters.
    pub fn text(&mut self, key: &str, min_chars: usize, message: &str) -> Option<String> {
        let value = self.raw(key)?;
        if value.chars().count() < min_chars.max(1) {
            self.errors.insert(key, message);
            return None;
        }
        Some(value.to_string())
    }

    pub fn email(&mut self, key: &str) -> Option<String> {
        let value = self.raw(key)?;
        if !is_email(value) {
            self.errors.insert(key, "Invalid email");
            return None;
        }
        Some(value.to_string())
    }

    pub fn phone(&mut self, key: &str) -> Option<String> {
        let value = self.raw(key)?;
        if !is_phone(value) {
            self.errors.insert(key, "Invalid phone");
            return None;
        }
        Some(value.to_string())
    }

    pub fn positive_decimal(&mut self, key: &str, message: &str) -> Option<f64> {
        let value = self.raw(key)?;
        match value.parse::<f64>() {
            Ok(number) if number.is_finite() && number > 0.0 => Some(number),
            _ => {
                self.errors.insert(key, message);
                None
            }
        }
    }

    pub fn count(&mut self, key: &str, message: &str) -> Option<u32> {
        let value = self.raw(key)?;
        match value.parse::<u32>() {
            Ok(number) => Some(number),
            Err(_) => {
                self.errors.insert(key, message);
                None
            }
        }
    }

    pub fn choice<T>(&mut self, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let value = self.raw(key)?;
        let parsed = parse(value);
        if parsed.is_none() {
            self.errors.insert(key, "Choose one of the listed values");
        }
        parsed
    }

    /// Unwraps a value for a field that must be present, reporting it otherwise.
    pub fn require<T>(&mut self, key: &str, value: Option<T>) -> Option<T> {
        if value.is_none() && self.raw(key).is_none() {
            self.errors.insert(key, "Required");
        }
        value
    }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        self.errors.into_result(value)
    }

    /// Like [`FieldReader::finish`] for a value that only exists when every
    /// field was read.
    pub fn finish_complete<T>(mut self, value: Option<T>) -> Result<T, FieldErrors> {
        match value {
            Some(value) => self.errors.into_result(value),
            None => {
                if self.errors.is_empty() {
                    self.errors.insert("form", "Incomplete form");
                }
                Err(self.errors)
            }
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, rest)| !host.is_empty() && !rest.is_empty() && !rest.ends_with('.'))
}

fn is_phone(value: &str) -> bool {
    let len = value.chars().count();
    (6..=20).contains(&len)
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | '.' | ' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn reader_collects_every_error() {
        let input = values(&[("name", "  "), ("email", "not-an-email"), ("phone", "12")]);
        let mut reader = FieldReader::new(&input);

        let name = reader.text("name", 1, "Name cannot be empty");
        let email = reader.email("email");
        let phone = reader.phone("phone");
        let errors = reader.finish(()).expect_err("should fail");

        assert!(name.is_none() && email.is_none() && phone.is_none());
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some("Name cannot be empty"));
    }

    #[test]
    fn email_and_phone_shapes() {
        assert!(is_email("ada@company.com"));
        assert!(!is_email("ada@company"));
        assert!(!is_email("a da@company.com"));
        assert!(is_phone("+1 (555) 010-2030"));
        assert!(!is_phone("555-CALL-NOW"));
    }

    #[test]
    fn changed_values_keeps_only_edits() {
        let initial = values(&[("name", "Ada"), ("country", "UK")]);
        let edited = values(&[("name", "Ada"), ("country", "Ireland")]);

        assert_eq!(
            changed_values(&initial, &edited),
            values(&[("country", "Ireland")])
        );
    }
}
