//! Outlet Registry
//!
//! Parses the outlet configuration string into the fixed list of devices polled on
//! every scrape. The list is built once at startup and never mutated afterwards.
//!
//! # Format
//!
//! ```text
//! livingroom:192.168.1.100, bedroom : 192.168.1.101
//! ```
//!
//! Entries are separated by `,`, name and address by `:`. Whitespace around entries
//! and around either part is ignored. Malformed entries are skipped with a warning.

use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// A configured Tasmota smart plug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outlet {
    /// Value of the `outlet` label on every metric for this device
    pub name: String,
    /// Host (optionally with port) of the device's web server
    pub address: String,
}

impl Outlet {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.address)
    }
}

/// Immutable, ordered set of outlets shared by all probe tasks
#[derive(Debug, Clone, Default)]
pub struct OutletRegistry {
    outlets: Vec<Outlet>,
}

impl OutletRegistry {
    pub fn new(outlets: Vec<Outlet>) -> Self {
        Self { outlets }
    }

    /// Builds a registry from a configuration string, see [`parse_outlets`]
    pub fn parse(input: &str) -> Self {
        Self::new(parse_outlets(input))
    }

    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outlet> {
        self.outlets.iter()
    }

    pub fn len(&self) -> usize {
        self.outlets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }

    /// Names configured more than once, in first-seen order
    ///
    /// Duplicates are kept in the registry; their metrics share one label.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for outlet in &self.outlets {
            let name = outlet.name.as_str();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a OutletRegistry {
    type Item = &'a Outlet;
    type IntoIter = std::slice::Iter<'a, Outlet>;

    fn into_iter(self) -> Self::IntoIter {
        self.outlets.iter()
    }
}

/// Parses comma-separated `name:address` pairs
///
/// Invalid entries are dropped (logged as warnings) rather than failing the whole
/// string. Input order is preserved and duplicates are kept.
pub fn parse_outlets(input: &str) -> Vec<Outlet> {
    let mut outlets = Vec::new();

    for entry in input.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() != 2 {
            warn!(
                config = entry,
                expected_format = "name:address",
                "invalid outlet configuration"
            );
            continue;
        }

        let name = parts[0].trim();
        let address = parts[1].trim();

        if name.is_empty() || address.is_empty() {
            warn!(
                config = entry,
                reason = "name and address cannot be empty",
                "invalid outlet configuration"
            );
            continue;
        }

        outlets.push(Outlet::new(name, address));
    }

    outlets
}
