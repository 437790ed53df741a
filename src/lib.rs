//! Bind a data file to a claimed difficulty with a short proof-of-work token.
//!
//! Generation digests the file, searches for a random alphanumeric token whose
//! `SHA-256(initial_hash ++ token)` has at least the requested number of
//! leading zero bits, and writes the result as a `Key: value` header.
//! Verification parses that header and runs three independent checks against
//! the file.
//!
//! This is not a sound work function: the search space is `62^token_length`,
//! so the token length caps the reachable difficulty.
pub mod bits;
pub mod create;
pub mod digest;
pub mod error;
pub mod header;
pub mod logging;
pub mod search;
pub mod stream;
pub mod time;
pub mod token;
pub mod verify;

pub use bits::{leading_zero_bits, leading_zero_bits_bytes, meets_target};
pub use create::{create_record, create_record_from_path};
pub use digest::{digest, digest_concat};
pub use error::{Error, Result};
pub use header::{HeaderFields, PowRecord};
pub use logging::init_tracing;
pub use search::{
    run as run_search, ParallelSearch, ProofSearch, SearchConfig, SearchConfigBuilder,
    SequentialSearch, Solution, DEFAULT_MAX_ITERATIONS,
};
pub use time::{Clock, SystemClock};
pub use token::{TokenGenerator, DEFAULT_TOKEN_LENGTH};
pub use verify::{verify, verify_paths, CheckOutcome, CheckRun, Report};
