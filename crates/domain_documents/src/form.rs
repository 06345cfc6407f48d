//! Form data and template field schemas

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value for a single AcroForm field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Checkbox(bool),
    Choice(String),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Checkbox(_) => "checkbox",
            FieldValue::Choice(_) => "choice",
        }
    }
}

/// Field name to value, in a stable order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: BTreeMap<String, FieldValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Text(value.into()));
        self
    }

    /// Dates are written `MM/DD/YYYY`
    pub fn date(self, name: &str, value: NaiveDate) -> Self {
        self.text(name, format_date(value))
    }

    pub fn checkbox(mut self, name: &str, checked: bool) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Checkbox(checked));
        self
    }

    pub fn choice(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Choice(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Checkbox,
    Choice(Vec<String>),
}

impl FieldKind {
    /// The `/FT` name for the field
    pub fn pdf_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "Tx",
            FieldKind::Checkbox => "Btn",
            FieldKind::Choice(_) => "Ch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

/// The template file a generator fills and the fields it expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub file_name: String,
    /// Heading drawn on a synthesised blank form
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl TemplateSpec {
    pub fn new(file_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn text(mut self, names: &[&str]) -> Self {
        self.fields.extend(names.iter().map(|name| FieldSpec {
            name: name.to_string(),
            kind: FieldKind::Text,
        }));
        self
    }

    pub fn checkbox(mut self, names: &[&str]) -> Self {
        self.fields.extend(names.iter().map(|name| FieldSpec {
            name: name.to_string(),
            kind: FieldKind::Checkbox,
        }));
        self
    }

    pub fn choice(mut self, name: &str, options: &[&str]) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            kind: FieldKind::Choice(options.iter().map(|o| o.to_string()).collect()),
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
