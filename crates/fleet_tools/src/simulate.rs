//! Headless battles and fleet scores.

use std::sync::Arc;

use serde::Serialize;

use fleet_core::config::SimConfig;
use fleet_core::data::Registry;
use fleet_core::error::Result;
use fleet_core::game_state::GameState;
use fleet_core::grid::Side;
use fleet_core::math::to_f64;
use fleet_core::runtime::{BattleStatus, Runtime};
use fleet_core::score::{estimate_fleet_score, FleetScore};

/// Outcome of one fleet in a headless battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideReport {
    /// Tiles still standing.
    pub tiles_left: usize,
    /// Max HP of enemy tiles destroyed.
    pub destroyed_hp: f64,
    /// Max HP of own tiles lost.
    pub lost_hp: f64,
    /// Damage dealt before mitigation.
    pub raw_damage: f64,
    /// Damage dealt after mitigation.
    pub actual_damage: f64,
}

/// Outcome of a headless bounded battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    /// Final status (`InProgress` if the tick budget ran out).
    pub status: BattleStatus,
    /// Game time simulated.
    pub seconds: f64,
    /// Left fleet.
    pub left: SideReport,
    /// Right fleet.
    pub right: SideReport,
}

fn side_report(runtime: &Runtime, side: Side) -> SideReport {
    let stats = runtime.stats(side);
    SideReport {
        tiles_left: runtime.state(side).tiles.len(),
        destroyed_hp: stats.destroyed_hp,
        lost_hp: stats.lost_hp,
        raw_damage: stats.damage_dealt.total_raw(),
        actual_damage: stats.damage_dealt.total_actual(),
    }
}

/// Fight `left` against `right` for at most `max_ticks` battle steps.
///
/// # Errors
///
/// Returns an error if the config is rejected by the runtime.
pub fn run_battle(
    left: &GameState,
    right: &GameState,
    registry: Arc<Registry>,
    config: SimConfig,
    max_ticks: u32,
) -> Result<BattleReport> {
    let mut runtime = Runtime::new(left, right, registry, config)?.without_events();
    let status = runtime.run_battle(max_ticks);

    let report = BattleReport {
        status,
        seconds: to_f64(runtime.elapsed()),
        left: side_report(&runtime, Side::Left),
        right: side_report(&runtime, Side::Right),
    };
    tracing::info!(status = ?report.status, seconds = report.seconds, "battle finished");
    Ok(report)
}

/// Score a fleet with the configured tick budget.
///
/// # Errors
///
/// Returns an error if the config is rejected by the runtime.
pub fn score(state: &GameState, registry: Arc<Registry>, config: &SimConfig) -> Result<FleetScore> {
    let score = estimate_fleet_score(state, registry, config)?;
    tracing::info!(score = score.score, max_hp = score.max_hp, dps = score.dps, "fleet scored");
    Ok(score)
}
