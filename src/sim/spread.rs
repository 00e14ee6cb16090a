//! Spread system — disease spread, runner spreading, self-seed flagging,
//! and weed pressure, in that order.
//!
//! This is the only system that creates entities. New plants and weeds are
//! buffered through Commands and registered in the map immediately, so the
//! rest of the tick (harvest, frost) sees them.

use bevy::prelude::*;

use crate::rng::GardenRng;
use crate::shared::*;

pub fn spread_check(
    ctx: Res<TickContext>,
    mut rng: ResMut<GardenRng>,
    species: Res<SpeciesRegistry>,
    mut map: ResMut<GardenMap>,
    mut report: ResMut<TickReport>,
    mut commands: Commands,
    mut plants: Query<
        (
            Entity,
            &PlotSlot,
            &PlantSpecies,
            &Growth,
            &mut ActiveConditions,
            Option<&SelfSeeded>,
            Option<&Perennial>,
        ),
        Without<Dead>,
    >,
    mut plots: Query<(&PlotSlot, &mut Soil)>,
    mut weeds: Query<(&PlotSlot, &mut Weed)>,
) {
    let week = ctx.week;

    // ── 1. Disease spread ──────────────────────────────────────────────
    // Snapshot sources and targets first; infections apply afterwards so
    // a plant infected this pass cannot relay in the same tick.
    struct SpreadSource {
        pos: (i32, i32),
        condition: ConditionId,
        severity: f32,
        radius: i32,
    }
    struct SpreadTarget {
        entity: Entity,
        pos: (i32, i32),
        species: SpeciesId,
        stage: Stage,
    }

    let mut sources: Vec<SpreadSource> = Vec::new();
    let mut targets: Vec<SpreadTarget> = Vec::new();
    for (entity, slot, plant, growth, conditions, _, _) in plants.iter() {
        let Some(def) = species.get(&plant.0) else {
            continue;
        };
        for entry in &conditions.0 {
            let Some(vuln) = def.vulnerability(&entry.condition_id) else {
                continue;
            };
            if let Some(radius) = vuln.spread_radius {
                sources.push(SpreadSource {
                    pos: slot.pos(),
                    condition: entry.condition_id.clone(),
                    severity: entry.severity,
                    radius,
                });
            }
        }
        targets.push(SpreadTarget {
            entity,
            pos: slot.pos(),
            species: plant.0.clone(),
            stage: growth.stage,
        });
    }

    let mut infections: Vec<(Entity, (i32, i32), ConditionId)> = Vec::new();
    for source in &sources {
        for target in &targets {
            if target.pos == source.pos {
                continue;
            }
            if chebyshev(target.pos, source.pos) > source.radius {
                continue;
            }
            let Some(def) = species.get(&target.species) else {
                continue;
            };
            let Some(vuln) = def.vulnerability(&source.condition) else {
                continue;
            };
            if matches!(target.stage, Stage::Seed | Stage::Germination)
                || target.stage < vuln.effective_min_stage()
            {
                continue;
            }
            let already = plants
                .get(target.entity)
                .map(|(_, _, _, _, conditions, _, _)| conditions.has(&source.condition))
                .unwrap_or(true)
                || infections
                    .iter()
                    .any(|(e, _, c)| *e == target.entity && *c == source.condition);
            if already {
                continue;
            }
            let probability = source.severity * vuln.susceptibility * 0.5;
            if rng.chance(f64::from(probability)) {
                infections.push((target.entity, target.pos, source.condition.clone()));
            }
        }
    }
    for (entity, pos, condition) in infections {
        if let Ok((_, _, _, _, mut conditions, _, _)) = plants.get_mut(entity) {
            conditions.0.push(ConditionEntry::onset(condition.clone(), week));
            report.spread_infections.push((pos.0, pos.1, condition));
        }
    }

    // ── 2. Runner spread ───────────────────────────────────────────────
    let runners: Vec<((i32, i32), SpeciesId)> = plants
        .iter()
        .filter(|(_, _, _, _, _, _, perennial)| !perennial.is_some_and(|p| p.dormant))
        .filter_map(|(_, slot, plant, growth, _, _, _)| {
            let def = species.get(&plant.0)?;
            let runner = def.spreading.as_ref()?.runner?;
            (growth.stage >= runner.min_stage).then(|| (slot.pos(), plant.0.clone()))
        })
        .collect();

    for (pos, species_id) in runners {
        let Some(def) = species.get(&species_id) else {
            continue;
        };
        let Some(runner) = def.spreading.as_ref().and_then(|s| s.runner) else {
            continue;
        };
        if !rng.chance(f64::from(runner.rate)) {
            continue;
        }
        // Empty means plant-free AND weed-free.
        let mut candidates: Vec<(i32, i32)> = Vec::new();
        for dr in -runner.radius..=runner.radius {
            for dc in -runner.radius..=runner.radius {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let target = (pos.0 + dr, pos.1 + dc);
                if map.in_bounds(target.0, target.1)
                    && !map.plants.contains_key(&target)
                    && !map.weeds.contains_key(&target)
                {
                    candidates.push(target);
                }
            }
        }
        if candidates.is_empty() {
            continue;
        }
        let idx = rng.next_int(0, candidates.len() as i64 - 1) as usize;
        let target = candidates[idx];

        let mut spawn = commands.spawn((
            PlotSlot {
                row: target.0,
                col: target.1,
            },
            PlantSpecies(species_id.clone()),
            Growth {
                progress: 0.15,
                stage: Stage::Seedling,
                rate_modifier: 1.0,
            },
            Health {
                value: 0.8,
                stress: 0.1,
            },
            ActiveConditions::default(),
            ActiveTreatments::default(),
            CompanionBuffs::default(),
        ));
        if def.plant_type == PlantType::Perennial {
            spawn.insert(Perennial {
                years_established: 0,
                dormant: false,
            });
        }
        let entity = spawn.id();
        map.plants.insert(target, entity);
        report
            .runner_spawns
            .push((target.0, target.1, species_id.clone()));
        info!("[Spread] {} ran to ({}, {})", species_id, target.0, target.1);
    }

    // ── 3. Self-seed flagging ──────────────────────────────────────────
    for (entity, _, plant, growth, _, marked, _) in plants.iter() {
        if marked.is_some() {
            continue;
        }
        if !matches!(growth.stage, Stage::Fruiting | Stage::Senescence) {
            continue;
        }
        let Some(rate) = species
            .get(&plant.0)
            .and_then(|d| d.spreading.as_ref())
            .and_then(|s| s.self_seed)
        else {
            continue;
        };
        if rng.chance(f64::from(rate.rate)) {
            commands.entity(entity).insert(SelfSeeded);
            report.self_seeded.push(plant.0.clone());
        }
    }

    // ── 4. Weed pressure ───────────────────────────────────────────────
    // Established weeds thicken and drain their plot.
    for (slot, mut weed) in &mut weeds {
        weed.severity = (weed.severity + 0.05).min(1.0);
        if let Some(plot_entity) = map.plots.get(&slot.pos()) {
            if let Ok((_, mut soil)) = plots.get_mut(*plot_entity) {
                let drain = 0.02 * weed.severity;
                soil.nitrogen -= drain;
                soil.phosphorus -= drain;
                soil.potassium -= drain;
                soil.moisture -= 0.015 * weed.severity;
                soil.clamp_all();
            }
        }
    }

    // Bare plots sprout new weeds; fertile, warm soil is the most
    // inviting.
    let mut sprouted: Vec<((i32, i32), f32)> = Vec::new();
    for (slot, soil) in plots.iter() {
        let pos = slot.pos();
        if map.plants.contains_key(&pos) || map.weeds.contains_key(&pos) {
            continue;
        }
        let fertility = (soil.nitrogen + soil.phosphorus + soil.potassium) / 3.0;
        let warmth = (soil.temperature_c / 30.0).clamp(0.0, 1.0);
        let probability = 0.08 * (1.0 + fertility * 0.6) * (1.0 + warmth * 0.4);
        if rng.chance(f64::from(probability)) {
            sprouted.push((pos, 0.1));
        }
    }
    for (pos, severity) in sprouted {
        let entity = commands
            .spawn((
                PlotSlot {
                    row: pos.0,
                    col: pos.1,
                },
                Weed { severity },
            ))
            .id();
        map.weeds.insert(pos, entity);
        report.new_weeds.push(pos);
    }
}
