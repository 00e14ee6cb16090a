//! The tick pipeline — one pass through the system chain per in-game week.
//!
//! Order is total and fixed; each system completes before the next begins,
//! and deferred commands (new entities, Dead markers) are applied between
//! chained systems. Systems never fail: entities missing a prerequisite are
//! skipped. Only `spread_check` creates entities.

pub mod companions;
pub mod disease;
pub mod frost;
pub mod growth;
pub mod harvest;
pub mod pest_pressure;
pub mod soil;
pub mod spread;
pub mod stress;
pub mod treatment;

use bevy::ecs::schedule::Schedule;
use bevy::prelude::*;

use crate::shared::*;

/// Build the weekly tick schedule. The chain is the ordering contract of
/// the whole engine: soil before growth before stress before disease, and
/// frost dead last.
pub fn build_tick_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            soil::soil_update,
            companions::companion_effects,
            growth::growth_tick,
            stress::stress_accumulate,
            disease::disease_check,
            treatment::treatment_feedback,
            pest_pressure::pest_check,
            spread::spread_check,
            harvest::harvest_check,
            frost::frost_check,
        )
            .chain(),
    );
    schedule
}

/// Run one tick. The context is inserted fresh; the report is reset, filled
/// by the systems, and returned by clone so the caller can keep it past the
/// next tick.
pub fn run_tick(world: &mut World, schedule: &mut Schedule, ctx: TickContext) -> TickReport {
    let week = ctx.week;
    world.resource_mut::<TickReport>().reset(week);
    world.insert_resource(ctx);
    schedule.run(world);
    world.resource::<TickReport>().clone()
}
