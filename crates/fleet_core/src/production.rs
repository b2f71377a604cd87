//! Production resolution: multipliers, resource consumption and output.
//!
//! Runs once per production tick for each fleet. Consumption is fully
//! resolved across every tile before anything is produced, so a building
//! never runs on resources made later in the same tick. Power does not
//! stockpile: whatever was produced last tick is consumed, then the pool
//! resets before this tick's generators refill it.

use std::sync::Arc;

use crate::data::{BoosterEffect, BuildingTypeId};
use crate::economy::ResourceKind;
use crate::grid::{neighbors, Side, Tile};
use crate::math::{Fixed, Seconds};
use crate::runtime::Runtime;
use crate::status_effect::EffectCommand;

impl Runtime {
    /// Rebuild every tile's modifiers from booster auras and status effects.
    pub(crate) fn apply_multipliers(&mut self) {
        let registry = Arc::clone(&self.registry);

        for rt in self.arena.iter_mut() {
            rt.modifiers.clear();
        }

        let boosters: Vec<(Tile, BuildingTypeId, u32)> = self
            .arena
            .iter()
            .map(|rt| (rt.tile, rt.building, rt.level))
            .collect();
        for (tile, building, level) in boosters {
            let Some(def) = registry.building(building) else {
                continue;
            };
            let Some(booster) = &def.booster else {
                continue;
            };
            let scale = f64::from(level);
            let mut area = Vec::new();
            neighbors(tile, booster.range, |t| area.push(t));
            for target in area {
                let Some(rt) = self.arena.get_mut(target) else {
                    continue;
                };
                match booster.effect {
                    BoosterEffect::ProductionBoost(v) => {
                        rt.modifiers.production_multiplier.add(v * scale, def.name.as_str());
                    }
                    BoosterEffect::HpBoost(v) => {
                        rt.modifiers.hp_multiplier.add(v * scale, def.name.as_str());
                    }
                    BoosterEffect::DamageBoost(v) => {
                        rt.modifiers.damage_multiplier.add(v * scale, def.name.as_str());
                    }
                    BoosterEffect::Repair(_) => {}
                }
            }
        }

        for rt in self.arena.iter_mut() {
            rt.apply_effect_modifiers();
        }
    }

    /// Run one production tick for `side`.
    pub(crate) fn tick_production(&mut self, side: Side, interval: Seconds) {
        let registry = Arc::clone(&self.registry);
        let idx = side.index();
        let first = self.states[idx].production_ticks == 0;
        let cycles = f64::from(self.config.battle_start_ammo_cycles);
        self.stats[idx].resources.clear();

        let order = self.states[idx].production_order();
        let mut running = Vec::with_capacity(order.len());

        // consumption
        for tile in order {
            let Some(data) = self.states[idx].get(tile).copied() else {
                continue;
            };
            let Some(def) = registry.building(data.building) else {
                tracing::error!(
                    ?tile,
                    building = ?data.building,
                    "placed building has no definition, skipping"
                );
                continue;
            };
            let Some(rt) = self.arena.get_mut(tile) else {
                continue;
            };
            let state = &mut self.states[idx];
            let stats = &mut self.stats[idx].resources;

            for tech in &state.unlocked_techs {
                if let Some(tech) = registry.tech(*tech) {
                    let bonus = tech.production_bonus(def.id);
                    if bonus != 0.0 {
                        rt.modifiers.production_multiplier.add(bonus, tech.name.as_str());
                    }
                }
            }
            if let Some(element) = def.element.and_then(|id| registry.element(id)) {
                let held = state.elements.get(&element.id).copied().unwrap_or(0.0);
                if held > 0.0 {
                    rt.modifiers
                        .production_multiplier
                        .add(held * element.production_per_unit, element.name.as_str());
                }
                let kept = state.permanent_elements.get(&element.id).copied().unwrap_or(0.0);
                if kept > 0.0 {
                    rt.modifiers
                        .xp_multiplier
                        .add(kept * element.xp_per_unit, element.name.as_str());
                }
            }

            let scale = f64::from(rt.level) * data.capacity;
            let mut sufficient = true;
            for input in &def.inputs {
                let need = input.amount * scale;
                if first {
                    state.resources.add(input.resource, need * cycles);
                }
                if !state.resources.has(input.resource, need) {
                    sufficient = false;
                    if input.resource == ResourceKind::Power {
                        stats.add_consumed(ResourceKind::Power, need);
                    }
                }
            }
            if sufficient {
                for input in &def.inputs {
                    let need = input.amount * scale;
                    state.resources.deduct(input.resource, need);
                    stats.add_consumed(input.resource, need);
                }
                running.push(tile);
            }
            rt.insufficient = !sufficient;
        }

        self.states[idx].resources.set(ResourceKind::Power, 0.0);

        // production
        let mut repairs = Vec::new();
        for tile in running {
            let Some(rt) = self.arena.get(tile) else {
                continue;
            };
            let Some(data) = self.states[idx].get(tile).copied() else {
                continue;
            };
            let Some(def) = registry.building(data.building) else {
                continue;
            };
            let level = f64::from(rt.level);
            let production = rt.modifiers.production_multiplier.value();
            let xp_multiplier = rt.modifiers.xp_multiplier.value();
            let state = &mut self.states[idx];
            let stats = &mut self.stats[idx].resources;

            for output in &def.outputs {
                let amount = output.amount * level * data.capacity * production;
                state.resources.add(output.resource, amount);
                stats.add_produced(output.resource, amount);
            }

            if let Some(booster) = &def.booster {
                if let BoosterEffect::Repair(v) = booster.effect {
                    neighbors(tile, booster.range, |target| {
                        repairs.push(EffectCommand::Heal {
                            target,
                            amount: v * level,
                        });
                    });
                }
            }

            if def.is_weapon() {
                for input in &def.inputs {
                    let rate = input.amount * level * data.capacity;
                    *stats
                        .theoretical_consumed
                        .entry(input.resource)
                        .or_insert(0.0) += rate;
                    stats.theoretical_xp += rate * registry.resource_value(input.resource);
                }
            } else if xp_multiplier > 1.0 {
                let value: f64 = def
                    .outputs
                    .iter()
                    .map(|o| o.amount * level * registry.resource_value(o.resource))
                    .sum();
                let xp = value * data.capacity * production * (xp_multiplier - 1.0);
                if xp > 0.0 {
                    state.resources.add(ResourceKind::XP, xp);
                    stats.add_produced(ResourceKind::XP, xp);
                }
            }
        }
        self.pending.extend(repairs);
        self.flush_commands();

        let (current, max) = self.states[idx]
            .tiles
            .keys()
            .filter_map(|&tile| self.arena.get(tile))
            .fold((0.0, 0.0), |(current, max), rt| {
                (current + rt.current_hp(), max + rt.props.hp)
            });
        let stats = &mut self.stats[idx];
        stats.current_hp = current;
        stats.max_hp = max + stats.lost_hp;
        if stats.previous_hp.map_or(true, |previous| current >= previous) {
            stats.undamaged_seconds += interval;
        } else {
            stats.undamaged_seconds = Fixed::ZERO;
        }
        stats.previous_hp = Some(current);

        self.states[idx].production_ticks += 1;
    }
}
