//! Option profiles.
//!
//! A profile is an ordered list of option assignments, built in code or parsed
//! from the `key=value&key=value` query form used in SRT URIs:
//!
//! ```text
//! streamid=abc&latency=200&transtype=file
//! ```
//!
//! Applying a profile runs each entry through the validation engine, with
//! `transtype` first so explicit entries override the profile it selects.

use std::str::FromStr;
use std::time::Duration;

use crate::core::{OptionError, OptionResult};
use crate::options::{OptionId, OptionKind, OptionValue, resolve_name, set_value_tracked};

use super::socket::SocketConfig;
use super::state::ConfigState;

/// Ordered set of option assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionProfile {
    entries: Vec<(OptionId, OptionValue)>,
}

impl OptionProfile {
    /// Empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an assignment.
    pub fn set(mut self, id: OptionId, value: impl Into<OptionValue>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(e, _)| *e == id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((id, value)),
        }
        self
    }

    /// Parse a query string.
    ///
    /// Keys are option names or aliases. Empty segments are ignored.
    pub fn parse(query: &str) -> OptionResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut profile = Self::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, text) = pair.split_once('=').unwrap_or((pair, ""));
            let id = resolve_name(key)?;
            let value = parse_value(id, text)?;
            profile = profile.set(id, value);
        }
        Ok(profile)
    }

    /// Assignments in application order.
    pub fn entries(&self) -> impl Iterator<Item = &(OptionId, OptionValue)> {
        let (first, rest): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .partition(|(id, _)| *id == OptionId::TransType);
        first.into_iter().chain(rest)
    }

    /// Check if the profile has no assignments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every assignment to `config`, stopping at the first failure.
    pub fn apply(&self, config: &SocketConfig) -> OptionResult<()> {
        self.entries()
            .try_for_each(|(id, value)| config.set(*id, value.clone()))
    }

    /// Apply every assignment to a bare state.
    pub fn apply_to_state(&self, state: &mut ConfigState) -> OptionResult<()> {
        for (id, value) in self.entries() {
            set_value_tracked(state, *id, value)?;
        }
        Ok(())
    }
}

impl FromStr for OptionProfile {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_value(id: OptionId, text: &str) -> OptionResult<OptionValue> {
    let desc = id.descriptor();
    let invalid = || OptionError::InvalidValue {
        option: desc.name,
        reason: "unparsable value",
    };

    let value = match desc.kind {
        OptionKind::Bool => match text {
            "1" | "true" | "yes" | "on" => OptionValue::Bool(true),
            "0" | "false" | "no" | "off" => OptionValue::Bool(false),
            _ => return Err(invalid()),
        },
        OptionKind::Int32 => OptionValue::Int32(text.parse().map_err(|_| invalid())?),
        OptionKind::Int64 => OptionValue::Int64(text.parse().map_err(|_| invalid())?),
        OptionKind::Duration => {
            let ms: u64 = text.parse().map_err(|_| invalid())?;
            OptionValue::Duration(Duration::from_millis(ms))
        }
        OptionKind::Enum => match desc.variant_value(text) {
            Some(v) => OptionValue::Enum(v),
            None => OptionValue::Enum(text.parse().map_err(|_| invalid())?),
        },
        OptionKind::Bytes => OptionValue::from(text),
    };
    Ok(value)
}
