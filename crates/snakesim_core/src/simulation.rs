use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info};

use crate::board::BoardGraph;
use crate::config::GameConfig;
use crate::error::{Result, SimulationError};
use crate::model::{RunStatus, SimulationResults, TransitionUsage};
use crate::walk::{RunOutcome, WalkParams, Walker};

/// Runs per batch; each batch owns one RNG and one walker
const MAX_BATCH_SIZE: u64 = 1_000;

/// Run `config.iterations` games on `board` with a seed drawn from OS entropy
pub fn simulate(board: &BoardGraph, config: &GameConfig) -> Result<SimulationResults> {
    let seed = rand::rng().random();
    simulate_seeded(board, config, seed)
}

/// Run `config.iterations` games on `board`.
///
/// The same seed always yields the same results, whether or not batches run
/// in parallel.
pub fn simulate_seeded(
    board: &BoardGraph,
    config: &GameConfig,
    seed: u64,
) -> Result<SimulationResults> {
    let started = Instant::now();
    let num_batches = config.iterations.div_ceil(MAX_BATCH_SIZE);

    info!(
        iterations = config.iterations,
        batches = num_batches,
        seed,
        "Starting simulation"
    );

    let batches = run_batches(board, config, seed, num_batches)?;

    let mut total = ResultsAccumulator::new(board.transitions().len())?;
    for batch in batches {
        total.merge(batch)?;
    }
    let results = total.finish(board, config.iterations, started.elapsed(), seed);

    info!(
        completed = results.completed_runs,
        aborted = results.aborted_runs,
        average_rolls = results.average_rolls,
        elapsed_ms = results.elapsed.as_millis() as u64,
        "Simulation finished"
    );
    Ok(results)
}

#[cfg(feature = "parallel")]
fn run_batches(
    board: &BoardGraph,
    config: &GameConfig,
    seed: u64,
    num_batches: u64,
) -> Result<Vec<ResultsAccumulator>> {
    (0..num_batches)
        .into_par_iter()
        .map(|i| run_batch(board, config, seed, i, num_batches))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_batches(
    board: &BoardGraph,
    config: &GameConfig,
    seed: u64,
    num_batches: u64,
) -> Result<Vec<ResultsAccumulator>> {
    (0..num_batches)
        .map(|i| run_batch(board, config, seed, i, num_batches))
        .collect()
}

fn batch_seed(seed: u64, batch: u64) -> u64 {
    seed ^ batch.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn run_batch(
    board: &BoardGraph,
    config: &GameConfig,
    seed: u64,
    batch: u64,
    num_batches: u64,
) -> Result<ResultsAccumulator> {
    let batch_size = if batch == num_batches - 1 {
        config.iterations - batch * MAX_BATCH_SIZE
    } else {
        MAX_BATCH_SIZE
    };

    let mut rng = SmallRng::seed_from_u64(batch_seed(seed, batch));
    let mut walker = Walker::new(board, WalkParams::from(config))?;
    let mut acc = ResultsAccumulator::new(board.transitions().len())?;

    for _ in 0..batch_size {
        let outcome = walker.walk(&mut rng)?;
        acc.record(&outcome)?;
    }

    debug!(
        batch,
        runs = batch_size,
        completed = acc.completed_runs,
        aborted = acc.aborted_runs,
        "Finished batch"
    );
    Ok(acc)
}

/// Streaming aggregation of run outcomes.
///
/// Accumulators of consecutive batches are combined with [`merge`](Self::merge)
/// in batch order; the shortest winning sequence is only replaced by a
/// strictly shorter one, so the earliest run wins ties.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsAccumulator {
    completed_runs: u64,
    aborted_runs: u64,
    overshoot_wins: u64,
    winning_rolls: u64,
    shortest: Option<Vec<u32>>,
    usage: Vec<u64>,
}

impl ResultsAccumulator {
    pub fn new(num_transitions: usize) -> Result<Self> {
        let mut usage = Vec::new();
        usage
            .try_reserve_exact(num_transitions)
            .map_err(SimulationError::alloc("usage totals", num_transitions))?;
        usage.resize(num_transitions, 0);

        Ok(Self {
            completed_runs: 0,
            aborted_runs: 0,
            overshoot_wins: 0,
            winning_rolls: 0,
            shortest: None,
            usage,
        })
    }

    /// Fold a single run into the totals
    pub fn record(&mut self, outcome: &RunOutcome<'_>) -> Result<()> {
        for (total, used) in self.usage.iter_mut().zip(outcome.transition_usage) {
            *total += u64::from(*used);
        }

        match outcome.status {
            RunStatus::Won => {
                self.completed_runs += 1;
                self.winning_rolls += outcome.rolls.len() as u64;
                if outcome.won_by_overshoot {
                    self.overshoot_wins += 1;
                }
                let len = outcome.rolls.len();
                if self.is_new_shortest(len) {
                    let shortest = self.shortest.get_or_insert_with(Vec::new);
                    shortest.clear();
                    shortest
                        .try_reserve_exact(len)
                        .map_err(SimulationError::alloc("shortest roll sequence", len))?;
                    shortest.extend_from_slice(outcome.rolls);
                }
            }
            RunStatus::Aborted(_) => {
                self.aborted_runs += 1;
            }
        }
        Ok(())
    }

    /// Combine with the accumulator of a later batch
    pub fn merge(&mut self, later: ResultsAccumulator) -> Result<()> {
        self.completed_runs += later.completed_runs;
        self.aborted_runs += later.aborted_runs;
        self.overshoot_wins += later.overshoot_wins;
        self.winning_rolls += later.winning_rolls;

        if self.usage.len() < later.usage.len() {
            let len = later.usage.len();
            self.usage
                .try_reserve_exact(len - self.usage.len())
                .map_err(SimulationError::alloc("usage totals", len))?;
            self.usage.resize(len, 0);
        }
        for (total, used) in self.usage.iter_mut().zip(later.usage) {
            *total += used;
        }

        if let Some(candidate) = later.shortest
            && self.is_new_shortest(candidate.len())
        {
            self.shortest = Some(candidate);
        }
        Ok(())
    }

    fn is_new_shortest(&self, len: usize) -> bool {
        self.shortest.as_ref().is_none_or(|s| len < s.len())
    }

    #[must_use]
    pub fn completed_runs(&self) -> u64 {
        self.completed_runs
    }

    #[must_use]
    pub fn aborted_runs(&self) -> u64 {
        self.aborted_runs
    }

    /// Mean rolls of completed runs; `0.0` if none completed
    #[must_use]
    pub fn average_rolls(&self) -> f64 {
        if self.completed_runs == 0 {
            0.0
        } else {
            self.winning_rolls as f64 / self.completed_runs as f64
        }
    }

    /// Freeze the totals into results labelled with `board`'s transitions
    #[must_use]
    pub fn finish(
        self,
        board: &BoardGraph,
        iterations: u64,
        elapsed: Duration,
        seed: u64,
    ) -> SimulationResults {
        let average_rolls = self.average_rolls();
        let transitions = board
            .transitions()
            .iter()
            .zip(self.usage.iter().copied().chain(std::iter::repeat(0)))
            .map(|(spec, times_used)| TransitionUsage {
                id: spec.id,
                kind: spec.kind,
                start: spec.start,
                end: spec.end,
                times_used,
            })
            .collect();

        SimulationResults {
            iterations,
            completed_runs: self.completed_runs,
            aborted_runs: self.aborted_runs,
            overshoot_wins: self.overshoot_wins,
            average_rolls,
            shortest_roll_sequence: self.shortest,
            transitions,
            elapsed,
            seed,
        }
    }
}
