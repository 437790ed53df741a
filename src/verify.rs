//! Three independent checks of a header against a data file.
//!
//! 1. the file digest equals the header's `Initial-hash`;
//! 2. `Hash` equals the digest of the header's own `Initial-hash ++ Proof-of-work`;
//! 3. `Leading-zero-bits` equals the bit count of the digest recomputed in check 2.
//!
//! Checks 2 and 3 only use the header's stated initial hash, never the file
//! digest, so binding the header to the file is entirely check 1's job.
use crate::bits::leading_zero_bits_bytes;
use crate::digest::{digest, digest_concat_raw};
use crate::error::{Error, Result};
use crate::header::PowRecord;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One check: what the header declares against what was recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub declared: String,
    pub computed: String,
}

impl CheckOutcome {
    fn compare(declared: String, computed: String) -> Self {
        CheckOutcome {
            passed: declared == computed,
            declared,
            computed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub initial_hash: CheckOutcome,
    pub hash: CheckOutcome,
    pub leading_zero_bits: CheckOutcome,
}

impl Report {
    /// Overall verdict: every check passed.
    pub fn passed(&self) -> bool {
        self.initial_hash.passed && self.hash.passed && self.leading_zero_bits.passed
    }

    /// Human-readable lines, one block per check, ending in `pass` or `fail`.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();

        if self.initial_hash.passed {
            out.push("PASSED: initial file hashes match".to_owned());
        } else {
            out.push("ERROR: initial hashes don't match".to_owned());
            out.push(format!("   hash in header: {}", self.initial_hash.declared));
            out.push(format!("   file hash: {}", self.initial_hash.computed));
        }

        if self.hash.passed {
            out.push("PASSED: pow hash matches Hash header".to_owned());
        } else {
            out.push("ERROR: pow hash does not match Hash header".to_owned());
            out.push(format!("    expected: {}", self.hash.computed));
            out.push(format!("    header has: {}", self.hash.declared));
        }

        if self.leading_zero_bits.passed {
            out.push("PASSED: leading bits is correct".to_owned());
        } else {
            out.push(format!(
                "ERROR: Leading-zero-bits value: {}, but hash has {} leading zero bits",
                self.leading_zero_bits.declared, self.leading_zero_bits.computed
            ));
        }

        out.push(if self.passed() { "pass" } else { "fail" }.to_owned());
        out
    }
}

/// Exit status when verification could not run: unreadable file or unusable header.
pub const EXIT_STRUCTURAL: u8 = 1;
/// Exit status for a completed `fail` verdict in strict mode.
pub const EXIT_FAILED_STRICT: u8 = 2;

/// Everything a checker run prints, plus its exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRun {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub exit_code: u8,
}

impl CheckRun {
    /// Fold a verification result into a run.
    ///
    /// A completed verdict exits 0, or [`EXIT_FAILED_STRICT`] when `strict` and
    /// a check failed. Structural errors become a `fail` run exiting
    /// [`EXIT_STRUCTURAL`]; any other error is handed back.
    pub fn from_result(result: Result<Report>, strict: bool) -> Result<Self> {
        match result {
            Ok(report) => {
                let passed = report.passed();
                Ok(CheckRun {
                    passed,
                    exit_code: if strict && !passed {
                        EXIT_FAILED_STRICT
                    } else {
                        0
                    },
                    report: Some(report),
                    error: None,
                })
            }
            Err(err) if err.is_structural() => Ok(CheckRun {
                passed: false,
                report: None,
                error: Some(err.to_string()),
                exit_code: EXIT_STRUCTURAL,
            }),
            Err(err) => Err(err),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match (&self.report, &self.error) {
            (Some(report), _) => report.lines(),
            (None, Some(error)) => vec![format!("ERROR: {error}"), "fail".to_owned()],
            (None, None) => vec!["fail".to_owned()],
        }
    }
}

/// Run all three checks of `record` against `data`. None short-circuits.
pub fn verify(record: &PowRecord, data: &[u8]) -> Report {
    let initial_hash = CheckOutcome::compare(record.initial_hash.clone(), digest(data));

    let recomputed = digest_concat_raw(&record.initial_hash, &record.proof_of_work);
    let hash = CheckOutcome::compare(record.hash.clone(), hex::encode(recomputed));

    let leading_zero_bits = CheckOutcome::compare(
        record.leading_zero_bits.to_string(),
        i64::from(leading_zero_bits_bytes(&recomputed)).to_string(),
    );

    let report = Report {
        initial_hash,
        hash,
        leading_zero_bits,
    };
    debug!(
        initial_hash = report.initial_hash.passed,
        hash = report.hash.passed,
        leading_zero_bits = report.leading_zero_bits.passed,
        "verification finished"
    );
    report
}

/// Read and parse the header, then read the data file and verify.
///
/// Header problems surface before the data file is touched or anything is hashed.
pub fn verify_paths(header_path: &Path, data_path: &Path) -> Result<Report> {
    let text = fs::read_to_string(header_path).map_err(|e| Error::io(header_path, e))?;
    let record = PowRecord::parse(&text)?;
    let data = fs::read(data_path).map_err(|e| Error::io(data_path, e))?;
    Ok(verify(&record, &data))
}
