//! TeamCity service messages.
//!
//! A message renders as `##teamcity[<name> <key>='<value>' ...]`. Keys are
//! written in insertion order and values are escaped on render, so callers
//! always pass raw text.

use crate::escape::escape;
use std::fmt;

pub const PREFIX: &str = "##teamcity[";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMessage {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
}

impl ServiceMessage {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw (unescaped) value of the first attribute named `key`.
    #[cfg(test)]
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.name)?;
        for (key, value) in &self.attrs {
            write!(f, " {}='{}'", key, escape(value))?;
        }
        f.write_str("]")
    }
}
