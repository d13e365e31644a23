//! `{{ key }}` placeholder substitution
//!
//! Replacement happens in a single scan of the input, so a replacement value
//! is never re-scanned. Placeholders whose key is absent are left verbatim
//! for a later pass.

use crate::error::{Result, ScaffoldError};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([^\s{}]+)\s*\}\}").expect("valid placeholder regex"))
}

/// Placeholder key to replacement value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    values: BTreeMap<String, String>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys must be non-empty and free of whitespace and braces
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == '{' || c == '}') {
            return Err(ScaffoldError::validation(format!(
                "Invalid template variable name: \"{}\"",
                key
            )));
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Replace every `{{ key }}` whose key is in `variables`
pub fn substitute(content: &str, variables: &SubstitutionMap) -> String {
    if variables.is_empty() {
        return content.to_string();
    }

    placeholder_regex()
        .replace_all(content, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
