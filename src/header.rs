//! Line-oriented `Key: value` header binding a file digest to its proof of work.
//!
//! ```text
//! File: <name>
//! Initial-hash: <64-hex>
//! Proof-of-work: <token>
//! Hash: <64-hex>
//! Leading-zero-bits: <integer>
//! Iterations: <integer>
//! Compute-time: <float>
//! ```
//!
//! Blank lines are ignored, lines without a colon are skipped, and a repeated
//! key overwrites the earlier value.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FILE: &str = "File";
pub const INITIAL_HASH: &str = "Initial-hash";
pub const PROOF_OF_WORK: &str = "Proof-of-work";
pub const HASH: &str = "Hash";
pub const LEADING_ZERO_BITS: &str = "Leading-zero-bits";
pub const ITERATIONS: &str = "Iterations";
pub const COMPUTE_TIME: &str = "Compute-time";

/// Fields a header must carry to be verifiable, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 4] = [INITIAL_HASH, PROOF_OF_WORK, LEADING_ZERO_BITS, HASH];

/// Raw `key -> value` view of a header in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    entries: Vec<(String, String)>,
}

impl HeaderFields {
    pub fn parse(text: &str) -> Self {
        let mut fields = HeaderFields::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                fields.insert(key.trim(), value.trim());
            }
        }
        fields
    }

    /// Insert or overwrite `key`; an overwritten key keeps its original position.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_owned(),
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The proof-of-work record exchanged between generation and verification.
///
/// A parsed record is untrusted: nothing ties its fields together until it
/// has been through [`crate::verify::verify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowRecord {
    pub file: Option<String>,
    pub initial_hash: String,
    pub proof_of_work: String,
    pub hash: String,
    /// Declared bit count. Any decimal integer is accepted; values outside
    /// `i64` saturate, which can never match a real count of 0..=256.
    pub leading_zero_bits: i64,
    pub iterations: Option<u64>,
    /// Seconds spent searching; written with four decimals.
    pub compute_time: Option<f64>,
}

impl PowRecord {
    /// Parse header text into a typed record.
    ///
    /// Fails with [`Error::MissingField`] for the first absent required field
    /// and [`Error::InvalidInteger`] when `Leading-zero-bits` is not base-10.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_fields(&HeaderFields::parse(text))
    }

    pub fn from_fields(fields: &HeaderFields) -> Result<Self> {
        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|name| fields.get(name).is_none())
        {
            return Err(Error::MissingField(*missing));
        }
        let required = |name: &'static str| {
            fields
                .get(name)
                .map(str::to_owned)
                .ok_or(Error::MissingField(name))
        };

        let leading_zero_bits = parse_declared_bits(&required(LEADING_ZERO_BITS)?)?;

        Ok(PowRecord {
            file: fields.get(FILE).map(str::to_owned),
            initial_hash: required(INITIAL_HASH)?,
            proof_of_work: required(PROOF_OF_WORK)?,
            hash: required(HASH)?,
            leading_zero_bits,
            iterations: fields.get(ITERATIONS).and_then(|v| v.parse().ok()),
            compute_time: fields.get(COMPUTE_TIME).and_then(|v| v.parse().ok()),
        })
    }

    /// Present fields as `(key, value)` pairs in header order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(7);
        if let Some(file) = &self.file {
            out.push((FILE, file.clone()));
        }
        out.push((INITIAL_HASH, self.initial_hash.clone()));
        out.push((PROOF_OF_WORK, self.proof_of_work.clone()));
        out.push((HASH, self.hash.clone()));
        out.push((LEADING_ZERO_BITS, self.leading_zero_bits.to_string()));
        if let Some(iterations) = self.iterations {
            out.push((ITERATIONS, iterations.to_string()));
        }
        if let Some(seconds) = self.compute_time {
            out.push((COMPUTE_TIME, format!("{seconds:.4}")));
        }
        out
    }

    /// Render as header text, one field per line with blank lines between.
    pub fn to_header(&self) -> String {
        let mut text = self
            .fields()
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        text.push('\n');
        text
    }
}

/// Base-10 integer with an optional sign, saturating at the `i64` bounds.
fn parse_declared_bits(text: &str) -> Result<i64> {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidInteger {
            field: LEADING_ZERO_BITS,
            value: text.to_owned(),
        });
    }
    Ok(text.parse::<i64>().unwrap_or(if text.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

impl fmt::Display for PowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header())
    }
}

impl FromStr for PowRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PowRecord::parse(s)
    }
}
