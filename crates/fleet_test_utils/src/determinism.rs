//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a battle produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Replays and fleet scores are only meaningful if a battle is a pure
//! function of its two fleets, the content and the seed. Sources of
//! non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Tiles are always visited in tile-key order.
//!
//! - **System randomness**: every draw goes through the runtime's
//!   `RandomSource`, seeded from the config.
//!
//! - **Clock drift**: accumulators use fixed-point time so the number of
//!   steps per `tick` never depends on float rounding.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: one phase at a time (battle, production)
//! 2. **Property tests**: random fleets still produce deterministic outcomes
//! 3. **Integration tests**: full battles are reproducible
//! 4. **Parallel tests**: N runtimes on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use fleet_core::game_state::GameState;
use fleet_core::grid::Side;
use fleet_core::math::Seconds;
use fleet_core::runtime::{Runtime, SpeedContext};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    tracing::debug!(runs, ticks, is_deterministic, "determinism check");

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Advance a runtime by one battle interval.
pub fn step_battle(runtime: &mut Runtime) {
    let dt: Seconds = runtime.config().battle_interval();
    let mut speed = SpeedContext::default();
    runtime.tick(dt, &mut speed);
}

/// Hash of everything a battle outcome depends on.
///
/// Covers both fleets' layouts, ledgers and counters, every live tile's
/// damage and effects, projectiles in flight and the battle status.
#[must_use]
pub fn runtime_hash(runtime: &Runtime) -> u64 {
    let mut hasher = DefaultHasher::new();

    for side in Side::ALL {
        let state = runtime.state(side);
        state.state_hash().hash(&mut hasher);
        state.production_ticks.hash(&mut hasher);
        for (kind, amount) in state.resources.iter() {
            kind.hash(&mut hasher);
            amount.to_bits().hash(&mut hasher);
        }
        for &tile in state.tiles.keys() {
            if let Some(rt) = runtime.tile(tile) {
                rt.damage_taken.to_bits().hash(&mut hasher);
                rt.cooldown.to_bits().hash(&mut hasher);
                rt.target.hash(&mut hasher);
                rt.status_effects.len().hash(&mut hasher);
            }
        }
        for projectile in runtime.projectiles(side) {
            projectile.destination.hash(&mut hasher);
            projectile.damage.to_bits().hash(&mut hasher);
            projectile.elapsed.to_bits().hash(&mut hasher);
        }
        let stats = runtime.stats(side);
        stats.destroyed_hp.to_bits().hash(&mut hasher);
        stats.damage_dealt.total_actual().to_bits().hash(&mut hasher);
    }
    runtime.status().hash(&mut hasher);

    hasher.finish()
}

/// Run a battle twice from the same setup and compare the final hashes.
pub fn verify_battle_determinism<F>(setup_fn: F, num_ticks: u64) -> DeterminismResult
where
    F: Fn() -> Runtime,
{
    verify_determinism(2, num_ticks, &setup_fn, step_battle, runtime_hash)
}

/// Result of parallel simulation runs.
#[derive(Debug, Clone)]
pub struct ParallelSimResult {
    /// Final state hash from each simulation.
    pub hashes: Vec<u64>,
    /// Number of ticks each simulation ran.
    pub ticks: u64,
    /// Number of simulations run.
    pub num_sims: usize,
}

impl ParallelSimResult {
    /// Check if all simulations produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all simulations matched.
    ///
    /// # Panics
    ///
    /// Panics if simulations produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel simulations diverged!\n\
                 Simulations: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_sims,
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run N battles on N scoped threads and collect their final hashes.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_battles<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> ParallelSimResult
where
    F: Fn() -> Runtime + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut runtime = setup_fn();
                    for _ in 0..num_ticks {
                        step_battle(&mut runtime);
                    }
                    runtime_hash(&runtime)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelSimResult {
        hashes,
        ticks: num_ticks,
        num_sims,
    }
}

/// Compare two battles tick-by-tick, finding the first divergence.
///
/// # Returns
///
/// `None` if the battles stay identical, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Runtime,
{
    let mut a = setup_fn();
    let mut b = setup_fn();

    if runtime_hash(&a) != runtime_hash(&b) {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        step_battle(&mut a);
        step_battle(&mut b);

        if runtime_hash(&a) != runtime_hash(&b) {
            return Some(tick);
        }
    }

    None
}

/// Verify that a fleet state survives a bincode round trip after a battle.
///
/// This is what a save after a fight goes through.
pub fn verify_serialization_roundtrip<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Runtime,
{
    let mut runtime = setup_fn();
    for _ in 0..num_ticks {
        step_battle(&mut runtime);
    }

    Side::ALL.iter().all(|&side| {
        let state = runtime.state(side);
        let Ok(bytes) = state.to_bytes() else {
            return false;
        };
        GameState::from_bytes(&bytes).is_ok_and(|restored| restored == *state)
    })
}
