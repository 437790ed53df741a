//! Randomized token search for a combined digest with enough leading zero bits.
//!
//! Each draw hashes `initial_hash ++ token` and stops on the first token whose
//! digest meets the target. The token space is only `62^token_length`, so the
//! token length, not the digest, bounds which targets are reachable.
use crate::bits::{leading_zero_bits_bytes, parse_digest};
use crate::digest::digest_concat_raw;
use crate::error::{Error, Result};
use crate::stream::{IterationBudget, StopFlag};
use crate::token::{TokenGenerator, DEFAULT_TOKEN_LENGTH};
use derive_builder::Builder;
use flume::{Receiver, Sender};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Draw cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(pattern = "owned")]
pub struct SearchConfig {
    pub target_bits: u32,
    #[builder(default = "DEFAULT_MAX_ITERATIONS")]
    pub max_iterations: u64,
    #[builder(default = "DEFAULT_TOKEN_LENGTH")]
    pub token_length: usize,
    #[builder(default = "1")]
    pub workers: usize,
    /// Fixes the token streams for reproducible runs.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_bits > 256 {
            return Err(Error::InvalidConfig("target_bits must be <= 256".into()));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be >= 1".into()));
        }
        if self.token_length == 0 {
            return Err(Error::InvalidConfig("token_length must be >= 1".into()));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be >= 1".into()));
        }
        Ok(())
    }

    fn exhausted(&self) -> Error {
        Error::Exhausted {
            target_bits: self.target_bits,
            max_iterations: self.max_iterations,
        }
    }

    /// Token generator for worker `index`, seeded from `seed + index` when a seed is set.
    fn generator(&self, index: usize) -> Result<TokenGenerator> {
        match self.seed {
            Some(seed) => {
                TokenGenerator::from_seed(seed.wrapping_add(index as u64), self.token_length)
            }
            None => TokenGenerator::from_entropy(self.token_length),
        }
    }
}

impl SearchConfigBuilder {
    pub fn build_validated(self) -> Result<SearchConfig> {
        let config = self
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// A qualifying token together with its combined digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub token: String,
    /// Lowercase hex digest of `initial_hash ++ token`.
    pub hash: String,
    pub bits: u32,
    /// Draws used, counting the successful one.
    pub iterations: u64,
}

/// A bounded search over random tokens.
pub trait ProofSearch {
    fn search(&mut self, initial_hash: &str) -> Result<Solution>;
}

/// Single-threaded search over one injected token stream.
#[derive(Debug)]
pub struct SequentialSearch<R: RngCore> {
    config: SearchConfig,
    tokens: TokenGenerator<R>,
}

impl<R: RngCore> SequentialSearch<R> {
    pub fn new(config: SearchConfig, tokens: TokenGenerator<R>) -> Result<Self> {
        config.validate()?;
        if tokens.length() != config.token_length {
            return Err(Error::InvalidConfig(
                "token generator length does not match token_length".into(),
            ));
        }
        Ok(Self { config, tokens })
    }
}

impl<R: RngCore> ProofSearch for SequentialSearch<R> {
    fn search(&mut self, initial_hash: &str) -> Result<Solution> {
        search(initial_hash, &self.config, &mut self.tokens)
    }
}

/// Multi-worker search; each worker owns its token stream.
#[derive(Debug, Clone)]
pub struct ParallelSearch {
    config: SearchConfig,
}

impl ParallelSearch {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl ProofSearch for ParallelSearch {
    fn search(&mut self, initial_hash: &str) -> Result<Solution> {
        search_parallel(initial_hash, &self.config)
    }
}

/// Run the search described by `config`: one worker searches inline, more
/// workers race on separate threads.
pub fn run(initial_hash: &str, config: &SearchConfig) -> Result<Solution> {
    config.validate()?;
    if config.workers == 1 {
        let mut tokens = config.generator(0)?;
        search(initial_hash, config, &mut tokens)
    } else {
        search_parallel(initial_hash, config)
    }
}

/// Draw tokens from `tokens` until one meets `config.target_bits` or the cap is hit.
pub fn search<R: RngCore>(
    initial_hash: &str,
    config: &SearchConfig,
    tokens: &mut TokenGenerator<R>,
) -> Result<Solution> {
    config.validate()?;
    parse_digest(initial_hash)?;
    debug!(
        target_bits = config.target_bits,
        max_iterations = config.max_iterations,
        token_length = tokens.length(),
        "starting sequential search"
    );

    for iteration in 1..=config.max_iterations {
        let token = tokens.next_token();
        let raw = digest_concat_raw(initial_hash, &token);
        let bits = leading_zero_bits_bytes(&raw);
        if bits >= config.target_bits {
            info!(%token, bits, iterations = iteration, "proof of work found");
            return Ok(Solution {
                token,
                hash: hex::encode(raw),
                bits,
                iterations: iteration,
            });
        }
    }

    warn!(
        target_bits = config.target_bits,
        max_iterations = config.max_iterations,
        "search exhausted"
    );
    Err(config.exhausted())
}

/// Race `config.workers` threads over a shared draw budget; the first
/// published solution wins and the rest are discarded.
pub fn search_parallel(initial_hash: &str, config: &SearchConfig) -> Result<Solution> {
    let budget = Arc::new(IterationBudget::new(config.max_iterations));
    search_parallel_with(initial_hash, config, budget)
}

fn search_parallel_with(
    initial_hash: &str,
    config: &SearchConfig,
    budget: Arc<IterationBudget>,
) -> Result<Solution> {
    config.validate()?;
    parse_digest(initial_hash)?;
    debug!(
        target_bits = config.target_bits,
        max_iterations = config.max_iterations,
        workers = config.workers,
        "starting parallel search"
    );

    let stop = Arc::new(StopFlag::new());
    let (tx, rx): (Sender<Solution>, Receiver<Solution>) = flume::bounded(config.workers);
    let mut joins = Vec::with_capacity(config.workers);

    for index in 0..config.workers {
        let tokens = config.generator(index)?;
        let worker_hash = initial_hash.to_owned();
        let worker_budget = budget.clone();
        let worker_stop = stop.clone();
        let worker_tx = tx.clone();
        let target_bits = config.target_bits;
        let join = thread::spawn(move || {
            worker_loop(
                &worker_hash,
                target_bits,
                tokens,
                worker_budget,
                worker_stop,
                worker_tx,
            );
        });
        joins.push(join);
    }
    drop(tx);

    let winner = rx.recv().ok();
    stop.force_stop();
    let panicked = join_handles(joins);

    match winner {
        Some(solution) => {
            info!(
                token = %solution.token,
                bits = solution.bits,
                iterations = solution.iterations,
                "proof of work found"
            );
            Ok(solution)
        }
        None if panicked > 0 => Err(Error::WorkerPanicked(panicked)),
        None => {
            warn!(
                target_bits = config.target_bits,
                spent = budget.spent(),
                "search exhausted"
            );
            Err(config.exhausted())
        }
    }
}

fn worker_loop<R: RngCore>(
    initial_hash: &str,
    target_bits: u32,
    mut tokens: TokenGenerator<R>,
    budget: Arc<IterationBudget>,
    stop: Arc<StopFlag>,
    tx: Sender<Solution>,
) {
    while !stop.should_stop() {
        let Some(iteration) = budget.reserve() else {
            break;
        };
        let token = tokens.next_token();
        let raw = digest_concat_raw(initial_hash, &token);
        let bits = leading_zero_bits_bytes(&raw);
        if bits >= target_bits {
            stop.force_stop();
            // capacity equals the worker count, so this only fails once the receiver is gone
            let _ = tx.try_send(Solution {
                token,
                hash: hex::encode(raw),
                bits,
                iterations: iteration,
            });
            break;
        }
    }
}

/// Join every worker, returning how many of them panicked.
fn join_handles(joins: Vec<thread::JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for handle in joins {
        if handle.join().is_err() {
            panicked += 1;
        }
    }
    if panicked > 0 {
        warn!(panicked, "search workers panicked");
    }
    panicked
}
