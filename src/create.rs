use crate::digest::digest;
use crate::error::{Error, Result};
use crate::header::PowRecord;
use crate::search::{self, SearchConfig};
use crate::time::Clock;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Digest `data`, search for a proof and assemble the full record.
///
/// The clock is read around the search only, so `compute_time` excludes hashing the file.
pub fn create_record(
    file_name: Option<&str>,
    data: &[u8],
    config: &SearchConfig,
    clock: &dyn Clock,
) -> Result<PowRecord> {
    config.validate()?;
    let initial_hash = digest(data);
    debug!(%initial_hash, bytes = data.len(), "hashed input");

    let started = clock.now_seconds();
    let solution = search::run(&initial_hash, config)?;
    let compute_time = (clock.now_seconds() - started).max(0.0);

    Ok(PowRecord {
        file: file_name.map(str::to_owned),
        initial_hash,
        proof_of_work: solution.token,
        hash: solution.hash,
        leading_zero_bits: i64::from(solution.bits),
        iterations: Some(solution.iterations),
        compute_time: Some(compute_time),
    })
}

/// Read `path` and create its record; `File` is set to the path as given.
pub fn create_record_from_path(
    path: &Path,
    config: &SearchConfig,
    clock: &dyn Clock,
) -> Result<PowRecord> {
    let data = fs::read(path).map_err(|e| Error::io(path, e))?;
    let name = path.to_string_lossy();
    create_record(Some(&name), &data, config, clock)
}
