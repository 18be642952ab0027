use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder of any field that couldn't be extracted.
pub const NOT_FOUND: &str = "not found";

/// Star ratings, as encoded in the class list of the rating marker.
pub const RATINGS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];

/// Data extracted from one book detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub availability: String,
    pub description: String,
    /// Product information table, in table order
    pub attributes: IndexMap<String, String>,
    /// Set when the detail page couldn't be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Record {
    pub fn not_found() -> Self {
        Self {
            title: NOT_FOUND.into(),
            price: NOT_FOUND.into(),
            rating: NOT_FOUND.into(),
            availability: NOT_FOUND.into(),
            description: NOT_FOUND.into(),
            attributes: IndexMap::new(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::not_found()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::not_found()
    }
}

/// Renders the record as a block of `key: value` lines without blank lines.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "title: {}", one_line(&self.title))?;
        writeln!(f, "price: {}", one_line(&self.price))?;
        writeln!(f, "rating: {}", one_line(&self.rating))?;
        writeln!(f, "availability: {}", one_line(&self.availability))?;
        writeln!(f, "description: {}", one_line(&self.description))?;
        if let Some(error) = &self.error {
            writeln!(f, "error: {}", one_line(error))?;
        }
        write!(f, "attributes:")?;
        for (label, value) in &self.attributes {
            write!(f, "\n  {}: {}", one_line(label), one_line(value))?;
        }
        Ok(())
    }
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
