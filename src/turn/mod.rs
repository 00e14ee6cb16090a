//! Turn manager — the weekly phase cycle and the energy budget.
//!
//! Phases run DAWN → PLAN → ACT → DUSK → ADVANCE → DAWN; the week counter
//! increments on the ADVANCE → DAWN wrap. `begin_work` is the only legal
//! way out of PLAN because it is what sets the week's energy. Energy is not
//! refreshed on DAWN or PLAN — it goes stale until the next `begin_work`,
//! and displays should show a placeholder instead of the stale number.

use crate::shared::*;

/// What a phase transition did, for the session to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub week_incremented: bool,
}

#[derive(Debug, Clone)]
pub struct TurnManager {
    phase: Phase,
    week: u32,
    energy: u32,
    energy_max: u32,
    ended: bool,
}

impl TurnManager {
    pub fn new() -> Self {
        Self {
            phase: Phase::Dawn,
            week: 0,
            energy: 0,
            energy_max: 0,
            ended: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn energy_max(&self) -> u32 {
        self.energy_max
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn end_run(&mut self) {
        self.ended = true;
    }

    fn ensure_live(&self) -> GameResult<()> {
        if self.ended {
            return Err(GameError::RunEnded);
        }
        Ok(())
    }

    fn transition(&mut self, to: Phase) -> Transition {
        let from = self.phase;
        self.phase = to;
        let week_incremented = from == Phase::Advance && to == Phase::Dawn;
        if week_incremented {
            self.week += 1;
        }
        Transition {
            from,
            to,
            week_incremented,
        }
    }

    /// PLAN → ACT, setting this week's energy from the season and the
    /// forecast.
    pub fn begin_work(&mut self, weather: &WeekWeather) -> GameResult<Transition> {
        self.ensure_live()?;
        if self.phase != Phase::Plan {
            return Err(GameError::WrongPhase {
                expected: Phase::Plan,
                actual: self.phase,
            });
        }
        let budget = energy_budget(self.week, weather);
        self.energy = budget;
        self.energy_max = budget;
        Ok(self.transition(Phase::Act))
    }

    /// Spend energy during ACT. Hitting zero auto-transitions to DUSK and
    /// the returned transition tells the session to run the tick.
    pub fn spend_energy(&mut self, cost: u32) -> GameResult<Option<Transition>> {
        self.ensure_live()?;
        if self.phase != Phase::Act {
            return Err(GameError::WrongPhase {
                expected: Phase::Act,
                actual: self.phase,
            });
        }
        if self.energy < cost {
            return Err(GameError::InsufficientEnergy {
                have: self.energy,
                need: cost,
            });
        }
        self.energy -= cost;
        if self.energy == 0 {
            return Ok(Some(self.transition(Phase::Dusk)));
        }
        Ok(None)
    }

    /// Check the budget without spending, so actions can validate before
    /// mutating anything.
    pub fn ensure_energy(&self, cost: u32) -> GameResult<()> {
        self.ensure_live()?;
        if self.phase != Phase::Act {
            return Err(GameError::WrongPhase {
                expected: Phase::Act,
                actual: self.phase,
            });
        }
        if self.energy < cost {
            return Err(GameError::InsufficientEnergy {
                have: self.energy,
                need: cost,
            });
        }
        Ok(())
    }

    /// End the work phase early. ACT → DUSK.
    pub fn end_actions(&mut self) -> GameResult<Transition> {
        self.ensure_live()?;
        if self.phase != Phase::Act {
            return Err(GameError::WrongPhase {
                expected: Phase::Act,
                actual: self.phase,
            });
        }
        Ok(self.transition(Phase::Dusk))
    }

    /// Generic next-phase transition for every edge that needs no inputs.
    /// PLAN is the exception: leaving it requires `begin_work`.
    pub fn advance_phase(&mut self) -> GameResult<Transition> {
        self.ensure_live()?;
        if self.phase == Phase::Plan {
            return Err(GameError::WrongPhase {
                expected: Phase::Act,
                actual: Phase::Plan,
            });
        }
        let next = self.phase.next();
        Ok(self.transition(next))
    }
}

impl Default for TurnManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Weekly energy: a base of four, adjusted by season and forecast, never
/// below one.
pub fn energy_budget(week: u32, weather: &WeekWeather) -> u32 {
    let season_mod: i32 = if week <= 7 {
        1
    } else if (25..=29).contains(&week) {
        -1
    } else {
        0
    };

    let heavy_rain = matches!(weather.special, Some(SpecialEvent::HeavyRain { .. }));
    let weather_mod: i32 = if weather.precipitation_mm > 25.0 || heavy_rain {
        -1
    } else if weather.precipitation_mm < 5.0
        && (18.0..=28.0).contains(&weather.temp_high_c)
        && weather.special.is_none()
    {
        1
    } else {
        0
    };

    (4 + season_mod + weather_mod).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mild_week(week: u32) -> WeekWeather {
        WeekWeather {
            week,
            temp_high_c: 22.0,
            temp_low_c: 12.0,
            precipitation_mm: 10.0,
            humidity: 0.5,
            wind: Wind::Light,
            frost: false,
            special: None,
        }
    }

    #[test]
    fn the_cycle_wraps_and_counts_weeks() {
        let mut turn = TurnManager::new();
        assert_eq!(turn.phase(), Phase::Dawn);

        turn.advance_phase().unwrap(); // DAWN → PLAN
        turn.begin_work(&mild_week(0)).unwrap(); // PLAN → ACT
        turn.end_actions().unwrap(); // ACT → DUSK
        turn.advance_phase().unwrap(); // DUSK → ADVANCE
        let t = turn.advance_phase().unwrap(); // ADVANCE → DAWN
        assert!(t.week_incremented);
        assert_eq!(turn.week(), 1);
        assert_eq!(turn.phase(), Phase::Dawn);
    }

    #[test]
    fn begin_work_is_the_only_way_out_of_plan() {
        let mut turn = TurnManager::new();
        turn.advance_phase().unwrap();
        assert_eq!(turn.phase(), Phase::Plan);
        assert!(matches!(
            turn.advance_phase(),
            Err(GameError::WrongPhase { .. })
        ));
        turn.begin_work(&mild_week(0)).unwrap();
        assert_eq!(turn.phase(), Phase::Act);
    }

    #[test]
    fn exhausting_energy_falls_into_dusk() {
        let mut turn = TurnManager::new();
        turn.advance_phase().unwrap();
        turn.begin_work(&mild_week(0)).unwrap();
        let budget = turn.energy();
        for _ in 0..budget - 1 {
            assert!(turn.spend_energy(1).unwrap().is_none());
        }
        let transition = turn.spend_energy(1).unwrap().unwrap();
        assert_eq!(transition.to, Phase::Dusk);
        assert!(matches!(
            turn.spend_energy(1),
            Err(GameError::WrongPhase { .. })
        ));
    }

    #[test]
    fn energy_budget_tracks_season_and_weather() {
        // Early season, pleasant week: 4 + 1 + 1.
        let mut nice = mild_week(2);
        nice.precipitation_mm = 2.0;
        assert_eq!(energy_budget(2, &nice), 6);

        // Late season downpour: 4 - 1 - 1.
        let mut storm = mild_week(27);
        storm.precipitation_mm = 40.0;
        assert_eq!(energy_budget(27, &storm), 2);

        // A heavy-rain event forces the penalty even with little rain.
        let mut squall = mild_week(12);
        squall.precipitation_mm = 3.0;
        squall.special = Some(SpecialEvent::HeavyRain { flood_risk: 0.5 });
        assert_eq!(energy_budget(12, &squall), 3);
    }

    #[test]
    fn an_ended_run_rejects_everything() {
        let mut turn = TurnManager::new();
        turn.end_run();
        assert!(matches!(turn.advance_phase(), Err(GameError::RunEnded)));
        assert!(matches!(
            turn.begin_work(&mild_week(0)),
            Err(GameError::RunEnded)
        ));
    }
}
