use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Matches the leading `{ "NAME", MIN, MAX,` of a parameter-info record.
static RECORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{ "(.+?)", (.*?), (.*?),"#).expect("record pattern is valid")
});

/// Raw value bounds of a single synth parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Linear rescale of `value` into the unit range, `None` when `min == max`.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if self.is_degenerate() {
            None
        } else {
            Some((value - self.min) / (self.max - self.min))
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        value >= low && value <= high
    }
}

/// Parameter name to bounds, extracted from a parameter-info dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
    ranges: BTreeMap<String, ParameterRange>,
}

impl RangeTable {
    /// Extract every `{ "NAME", MIN, MAX, ...}` record from `text`.
    ///
    /// Text that does not have the record shape is skipped. A record whose
    /// bounds are not finite numbers is an error. Later records replace earlier ones
    /// with the same name.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut ranges = BTreeMap::new();
        for captures in RECORD.captures_iter(text) {
            let name = &captures[1];
            let min = parse_bound(name, &captures[2])?;
            let max = parse_bound(name, &captures[3])?;
            ranges.insert(name.to_string(), ParameterRange::new(min, max));
        }
        Ok(Self { ranges })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| MapError::io(path, err))?;
        let table = Self::parse(&text)?;
        tracing::debug!(
            "loaded {} parameter ranges from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<ParameterRange> {
        self.ranges.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, range: ParameterRange) {
        self.ranges.insert(name.into(), range);
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParameterRange)> {
        self.ranges
            .iter()
            .map(|(name, range)| (name.as_str(), *range))
    }
}

fn parse_bound(name: &str, raw: &str) -> Result<f64, MapError> {
    let trimmed = raw.trim();
    // C float literals such as `1.0f` show up in generated dumps.
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| {
            trimmed
                .strip_suffix(|c: char| c == 'f' || c == 'F')
                .and_then(|number| number.parse::<f64>().ok())
        })
        .filter(|bound| bound.is_finite())
        .ok_or_else(|| MapError::InvalidBound {
            name: name.to_string(),
            value: trimmed.to_string(),
        })
}
