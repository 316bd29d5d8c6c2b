//! Search criteria: the four supported search dimensions and the request parameters they map to.

use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown search type '{0}': choose 1 (name), 2 (cuisine), 3 (diet) or 4 (intolerances)")]
    UnknownMode(String),

    #[error("invalid {field} '{value}': expected a non-negative whole number")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Name,
    Cuisine,
    Diet,
    Intolerance,
}

impl SearchMode {
    /// Parse a menu selector: `1`-`4` or the mode name, case-insensitive.
    pub fn from_selector(selector: &str) -> Result<Self, QueryError> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "1" | "name" => Ok(Self::Name),
            "2" | "cuisine" => Ok(Self::Cuisine),
            "3" | "diet" => Ok(Self::Diet),
            "4" | "intolerance" | "intolerances" => Ok(Self::Intolerance),
            _ => Err(QueryError::UnknownMode(selector.trim().to_string())),
        }
    }

    /// Query parameter carrying the search value on `complexSearch`.
    pub fn param_name(self) -> &'static str {
        match self {
            Self::Name => "query",
            Self::Cuisine => "cuisine",
            Self::Diet => "diet",
            Self::Intolerance => "intolerances",
        }
    }

    pub fn prompt_label(self) -> &'static str {
        match self {
            Self::Name => "Enter name",
            Self::Cuisine => "Enter cuisine",
            Self::Diet => "Enter diet",
            Self::Intolerance => "Enter intolerance",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Cuisine => "cuisine",
            Self::Diet => "diet",
            Self::Intolerance => "intolerance",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub value: String,
    pub number: u32,
    pub offset: u32,
}

impl SearchQuery {
    pub fn new(mode: SearchMode, value: impl Into<String>, number: u32, offset: u32) -> Self {
        Self {
            mode,
            value: value.into(),
            number,
            offset,
        }
    }

    /// Search parameters, excluding the API key which the client appends.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            (self.mode.param_name(), self.value.clone()),
            ("number", self.number.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

pub fn parse_count(field: &'static str, raw: &str) -> Result<u32, QueryError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| QueryError::InvalidNumber {
            field,
            value: raw.trim().to_string(),
        })
}
