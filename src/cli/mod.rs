//! Text REPL over the session API.
//!
//! Every command is a thin wrapper: parse arguments, call one session
//! method, format the result. Failed actions print `Error: <message>` and
//! leave all state untouched, energy included. `run_command` is pure
//! string-in/string-out so the `cmd` subcommand and the tests reuse it.

use crate::session::{GameSession, PlantView};
use crate::save;
use crate::shared::*;
use std::path::Path;

const DEFAULT_SAVE_PATH: &str = "rootbound_save.json";

pub enum CommandOutcome {
    Output(String),
    Quit,
}

pub fn run_command(session: &mut GameSession, line: &str) -> CommandOutcome {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return CommandOutcome::Output(String::new());
    };
    let args: Vec<&str> = parts.collect();

    let output = match command {
        "status" => status(session),
        "grid" => grid(session),
        "weather" => weather(session),
        "plants" => plants(session),
        "species" => species(session, &args),
        "amendments" => amendments(session),
        "log" => log_tail(session, &args),
        "score" => format!("Score: {}", session.score()),
        "help" => help_text(),
        "inspect" => with_coords(&args, |r, c| inspect(session, r, c)),
        "soil" => with_coords(&args, |r, c| soil(session, r, c)),
        "advance" => advance(session),
        "week" => full_week(session),
        "plant" => {
            let Some((id, rest)) = args.split_first() else {
                return CommandOutcome::Output("Error: usage: plant SPECIES ROW COL".into());
            };
            let id = id.to_string();
            with_coords(rest, |r, c| act(session, |s| s.plant_action(&id, r, c)))
        }
        "amend" => {
            let Some((id, rest)) = args.split_first() else {
                return CommandOutcome::Output("Error: usage: amend AMENDMENT ROW COL".into());
            };
            let id = id.to_string();
            with_coords(rest, |r, c| act(session, |s| s.amend_action(r, c, &id)))
        }
        "diagnose" => with_coords(&args, |r, c| diagnose(session, r, c)),
        "intervene" => intervene(session, &args),
        "scout" => {
            if args.is_empty() {
                "Error: usage: scout TARGET".into()
            } else {
                act(session, |s| s.scout_action(&args.join(" ")))
            }
        }
        "harvest" => with_coords(&args, |r, c| harvest(session, r, c)),
        "wait" => wait(session),
        "save" => {
            let path = args.first().copied().unwrap_or(DEFAULT_SAVE_PATH);
            match save::save_to_path(session, Path::new(path)) {
                Ok(()) => format!("Saved to {path}"),
                Err(e) => format!("Error: {e}"),
            }
        }
        "quit" => return CommandOutcome::Quit,
        other => format!("Error: unknown command `{other}` (try `help`)"),
    };

    CommandOutcome::Output(output)
}

// ─────────────────────────────────────────────────────────────────────────
// Argument plumbing
// ─────────────────────────────────────────────────────────────────────────

fn with_coords(args: &[&str], f: impl FnOnce(i32, i32) -> String) -> String {
    match (
        args.first().and_then(|a| a.parse::<i32>().ok()),
        args.get(1).and_then(|a| a.parse::<i32>().ok()),
    ) {
        (Some(row), Some(col)) => f(row, col),
        _ => "Error: expected ROW COL".into(),
    }
}

/// Run an action; on success report the remaining energy (and any tick
/// that an exhausted budget just triggered).
fn act(session: &mut GameSession, f: impl FnOnce(&mut GameSession) -> GameResult<()>) -> String {
    match f(session) {
        Ok(()) => {
            let mut out = String::from("Done.");
            if let Some(report) = session.consume_last_dusk_result() {
                out.push_str("\nOut of energy — the week rolls on.\n");
                out.push_str(&tick_summary(&report));
            } else {
                out.push_str(&format!(
                    " Energy: {}/{}",
                    session.energy(),
                    session.energy_max()
                ));
            }
            out
        }
        Err(e) => format!("Error: {e}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────

fn display_week(week: u32) -> u32 {
    week + 1
}

fn status(session: &mut GameSession) -> String {
    let energy = if session.phase() == Phase::Act {
        format!("{}/{}", session.energy(), session.energy_max())
    } else {
        // Stale outside ACT; show a placeholder instead of the old number.
        "-".into()
    };
    let score = session.score();
    let mut out = format!(
        "{} | Week {}/{} | {} | Energy {} | Score {}",
        session.zone().name,
        display_week(session.current_week()).min(SEASON_WEEKS),
        SEASON_WEEKS,
        session.phase(),
        energy,
        score,
    );
    if session.is_run_ended() {
        let reason = session
            .end_reason()
            .map(|r| r.label())
            .unwrap_or("unknown");
        out.push_str(&format!("\nThe run has ended ({reason})."));
    }
    out
}

fn grid(session: &mut GameSession) -> String {
    let (rows, cols) = session.grid_size();
    let plants = session.plants();
    let weeds = session.weeds();
    let mut out = String::new();
    out.push_str("    ");
    for col in 0..cols {
        out.push_str(&format!("{col} "));
    }
    out.push('\n');
    for row in 0..rows {
        out.push_str(&format!("  {row} "));
        for col in 0..cols {
            let plant = plants.iter().find(|p| p.row == row && p.col == col);
            let weedy = weeds.iter().any(|w| w.row == row && w.col == col);
            let symbol = match plant {
                Some(p) if p.dead => 'x',
                Some(p) if p.dormant => 'z',
                Some(p) => p
                    .species
                    .chars()
                    .next()
                    .unwrap_or('?')
                    .to_ascii_uppercase(),
                None if weedy => 'w',
                None => '.',
            };
            out.push(symbol);
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str("  (capital = plant, w = weed, x = dead, z = dormant)");
    out
}

fn weather(session: &mut GameSession) -> String {
    let Some(w) = session.current_weather() else {
        return "The season is over; no forecast left.".into();
    };
    let mut out = format!(
        "Week {}: high {:.1} °C, low {:.1} °C, {:.1} mm rain, humidity {:.0}%, wind {}",
        display_week(w.week),
        w.temp_high_c,
        w.temp_low_c,
        w.precipitation_mm,
        w.humidity * 100.0,
        w.wind.label(),
    );
    if let Some(event) = &w.special {
        out.push_str(&format!("\n  ! {} in effect", event.label()));
    }
    if w.frost {
        out.push_str("\n  ! frost warning");
    }
    out
}

fn plant_line(p: &PlantView) -> String {
    let mut line = format!(
        "({}, {}) {} — {} | progress {:.0}% | health {:.0}% | stress {:.0}%",
        p.row,
        p.col,
        p.name,
        p.stage,
        p.progress * 100.0,
        p.health * 100.0,
        p.stress * 100.0,
    );
    if p.dead {
        line.push_str(" | DEAD");
    } else if p.dormant {
        line.push_str(" | dormant");
    }
    if let Some(h) = &p.harvest {
        if h.ripe {
            line.push_str(&format!(
                " | RIPE ({} left, quality {:.0}%)",
                h.remaining,
                h.quality * 100.0
            ));
        }
    }
    if !p.conditions.is_empty() {
        let names: Vec<&str> = p.conditions.iter().map(|c| c.condition_id.as_str()).collect();
        line.push_str(&format!(" | {}", names.join(", ")));
    }
    line
}

fn plants(session: &mut GameSession) -> String {
    let views = session.plants();
    if views.is_empty() {
        return "Nothing planted yet.".into();
    }
    views
        .iter()
        .map(plant_line)
        .collect::<Vec<String>>()
        .join("\n")
}

fn species(session: &mut GameSession, args: &[&str]) -> String {
    let registry = session.world_mut().resource::<SpeciesRegistry>().clone();
    match args.first() {
        None => {
            let mut ids: Vec<&String> = registry.species.keys().collect();
            ids.sort();
            ids.iter()
                .map(|id| {
                    let def = &registry.species[*id];
                    format!("{id} — {}", def.name)
                })
                .collect::<Vec<String>>()
                .join("\n")
        }
        Some(id) => match registry.get(id) {
            None => format!("Error: unknown species `{id}`"),
            Some(def) => {
                let spreading = match &def.spreading {
                    Some(s) if s.runner.is_some() => " | spreads by runners",
                    Some(s) if s.self_seed.is_some() => " | self-seeds",
                    _ => "",
                };
                format!(
                    "{} ({})\n  family {:?}, {:?} | frost {:?}{spreading}\n  \
                     harvest weeks {}-{}, yield {}{}\n  vulnerabilities: {}",
                    def.name,
                    def.id,
                    def.family,
                    def.plant_type,
                    def.frost_tolerance,
                    display_week(def.harvest.window.0),
                    display_week(def.harvest.window.1),
                    def.harvest.yield_potential,
                    if def.harvest.continuous_harvest {
                        " (continuous)"
                    } else {
                        ""
                    },
                    def.vulnerabilities
                        .iter()
                        .map(|v| v.condition.as_str())
                        .collect::<Vec<&str>>()
                        .join(", "),
                )
            }
        },
    }
}

fn amendments(session: &mut GameSession) -> String {
    let registry = session.world_mut().resource::<AmendmentRegistry>().clone();
    let mut ids: Vec<&String> = registry.amendments.keys().collect();
    ids.sort();
    ids.iter()
        .map(|id| {
            let def = &registry.amendments[*id];
            format!(
                "{id} — {} (takes effect after {} week{})",
                def.name,
                def.effect_delay_weeks,
                if def.effect_delay_weeks == 1 { "" } else { "s" }
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn log_tail(session: &mut GameSession, args: &[&str]) -> String {
    let count = args
        .first()
        .and_then(|a| a.parse::<usize>().ok())
        .unwrap_or(10);
    let entries = session.log().entries();
    let start = entries.len().saturating_sub(count);
    entries[start..]
        .iter()
        .map(|e| format!("#{:<3} {}", e.index, e.event.label()))
        .collect::<Vec<String>>()
        .join("\n")
}

fn inspect(session: &mut GameSession, row: i32, col: i32) -> String {
    match session.plant_at(row, col) {
        None => format!("Error: {}", GameError::NoPlantHere { row, col }),
        Some(p) => {
            let mut out = plant_line(&p);
            for condition in &p.conditions {
                out.push_str(&format!(
                    "\n  {} — severity {:.0}%, since week {}",
                    condition.condition_id,
                    condition.severity * 100.0,
                    display_week(condition.onset_week),
                ));
            }
            out
        }
    }
}

fn soil(session: &mut GameSession, row: i32, col: i32) -> String {
    match session.soil_at(row, col) {
        None => format!("Error: {}", GameError::OutOfBounds { row, col }),
        Some(s) => {
            let sun = match session.sun_exposure_at(row, col) {
                Some(SunExposure::Full) => "full sun",
                Some(SunExposure::Partial) => "partial sun",
                Some(SunExposure::Shade) => "shade",
                None => "unknown light",
            };
            format!(
                "pH {:.1} | N {:.2} P {:.2} K {:.2}\norganic matter {:.2} | moisture {:.2} | \
                 compaction {:.2} | biology {:.2}\nsoil temperature {:.1} °C | {sun}",
                s.ph,
                s.nitrogen,
                s.phosphorus,
                s.potassium,
                s.organic_matter,
                s.moisture,
                s.compaction,
                s.biology,
                s.temperature_c,
            )
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Phase driving
// ─────────────────────────────────────────────────────────────────────────

fn advance(session: &mut GameSession) -> String {
    if session.is_run_ended() {
        return format!("Error: {}", GameError::RunEnded);
    }
    let mut out = String::new();
    // ACT is the only interactive phase; everything else rolls through.
    loop {
        if let Err(e) = session.advance_one_phase() {
            return format!("Error: {e}");
        }
        if let Some(report) = session.consume_last_dusk_result() {
            out.push_str(&tick_summary(&report));
            out.push('\n');
        }
        if session.is_run_ended() || session.phase() == Phase::Act {
            break;
        }
    }
    out.push_str(&status(session));
    out
}

fn full_week(session: &mut GameSession) -> String {
    if session.is_run_ended() {
        return format!("Error: {}", GameError::RunEnded);
    }
    let mut out = String::new();
    if let Err(e) = session.advance_until_act() {
        return format!("Error: {e}");
    }
    if let Some(report) = session.consume_last_dusk_result() {
        out.push_str(&tick_summary(&report));
        out.push('\n');
    }
    out.push_str(&status(session));
    out
}

fn wait(session: &mut GameSession) -> String {
    match session.end_actions() {
        Err(e) => format!("Error: {e}"),
        Ok(()) => {
            let mut out = String::from("Tools down for the week.\n");
            if let Some(report) = session.consume_last_dusk_result() {
                out.push_str(&tick_summary(&report));
            }
            out
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Actions with output
// ─────────────────────────────────────────────────────────────────────────

fn diagnose(session: &mut GameSession, row: i32, col: i32) -> String {
    match session.diagnose_action(row, col) {
        Err(e) => format!("Error: {e}"),
        Ok(report) => {
            let mut out = String::new();
            if report.observations.is_empty() {
                out.push_str("No visible symptoms.");
            } else {
                out.push_str("Observations:");
                for obs in &report.observations {
                    out.push_str(&format!("\n  - {obs}"));
                }
            }
            if !report.hypotheses.is_empty() {
                out.push_str("\nHypotheses:");
                for h in &report.hypotheses {
                    out.push_str(&format!(
                        "\n  {:>3.0}%  {}",
                        h.confidence * 100.0,
                        h.condition
                    ));
                }
            }
            if let Some(r) = session.consume_last_dusk_result() {
                out.push_str("\nOut of energy — the week rolls on.\n");
                out.push_str(&tick_summary(&r));
            }
            out
        }
    }
}

fn intervene(session: &mut GameSession, args: &[&str]) -> String {
    let Some((action, rest)) = args.split_first() else {
        return "Error: usage: intervene ACTION ROW COL [CONDITION]".into();
    };
    let action = action.to_string();
    let target = rest.get(2).map(|s| s.to_string());
    with_coords(&rest[..rest.len().min(2)], |r, c| {
        act(session, |s| {
            s.intervene_action(&action, r, c, target.as_deref())
        })
    })
}

fn harvest(session: &mut GameSession, row: i32, col: i32) -> String {
    match session.harvest_action(row, col) {
        Err(e) => format!("Error: {e}"),
        Ok(quality) => {
            let mut out = format!("Harvested (quality {:.0}%).", quality * 100.0);
            if let Some(r) = session.consume_last_dusk_result() {
                out.push_str("\nOut of energy — the week rolls on.\n");
                out.push_str(&tick_summary(&r));
            } else {
                out.push_str(&format!(
                    " Energy: {}/{}",
                    session.energy(),
                    session.energy_max()
                ));
            }
            out
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Tick summary
// ─────────────────────────────────────────────────────────────────────────

pub fn tick_summary(report: &TickReport) -> String {
    let mut lines: Vec<String> = vec![format!("— Week {} dusk —", display_week(report.week))];
    for (row, col, condition) in &report.new_conditions {
        lines.push(format!("  {condition} appeared at ({row}, {col})"));
    }
    for (row, col, condition) in &report.spread_infections {
        lines.push(format!("  {condition} spread to ({row}, {col})"));
    }
    for outcome in &report.treatment_outcomes {
        lines.push(format!(
            "  {} on ({}, {}): {}",
            outcome.action,
            outcome.row,
            outcome.col,
            outcome.result.label()
        ));
    }
    for (row, col, species) in &report.ripened {
        lines.push(format!("  {species} is ready to pick at ({row}, {col})"));
    }
    for (row, col, species) in &report.runner_spawns {
        lines.push(format!("  {species} sent a runner to ({row}, {col})"));
    }
    for (row, col) in &report.new_weeds {
        lines.push(format!("  weeds sprouted at ({row}, {col})"));
    }
    for (row, col, species, cause) in &report.deaths {
        let cause = match cause {
            DeathCause::Disease => "disease",
            DeathCause::Frost => "frost",
            DeathCause::Pulled => "pulled",
        };
        lines.push(format!("  {species} died at ({row}, {col}) ({cause})"));
    }
    if report.frost.killing_frost {
        lines.push("  A killing frost swept the garden.".into());
    }
    if lines.len() == 1 {
        lines.push("  A quiet week.".into());
    }
    lines.join("\n")
}

fn help_text() -> String {
    "Queries (any phase):\n\
     \x20 status | grid | weather | plants | species [ID] | amendments | log [N] | score\n\
     \x20 inspect ROW COL | soil ROW COL\n\
     Phases:\n\
     \x20 advance            step to the next interactive phase\n\
     \x20 week               run full weeks until the next ACT\n\
     Actions (ACT, 1 energy each):\n\
     \x20 plant SPECIES ROW COL\n\
     \x20 amend AMENDMENT ROW COL\n\
     \x20 diagnose ROW COL\n\
     \x20 intervene ACTION ROW COL [CONDITION]\n\
     \x20 scout TARGET\n\
     \x20 harvest ROW COL\n\
     \x20 wait               end actions early\n\
     Session:\n\
     \x20 save [PATH] | quit"
        .into()
}
