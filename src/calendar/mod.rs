//! Calendar domain — the day counter, the weather roll, and the sleep flow.
//!
//! Responsible for:
//! - Advancing the day when the player sleeps
//! - Rolling each day's rain via a seedable policy
//! - Sending DayEndEvent with the new day's weather attached

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shared::*;

/// How rain is decided. A policy rather than a constant so tests (and future
/// content) can pin the roll: `seeded` gives a deterministic sequence, and a
/// rain chance of 0.0 or 1.0 forces the outcome outright.
#[derive(Resource, Debug)]
pub struct WeatherPolicy {
    pub rain_chance: f64,
    rng: StdRng,
}

impl WeatherPolicy {
    pub fn new(rain_chance: f64) -> Self {
        Self {
            rain_chance,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(rain_chance: f64, seed: u64) -> Self {
        Self {
            rain_chance,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roll whether the next day is rainy.
    pub fn roll(&mut self) -> bool {
        self.rng.gen_bool(self.rain_chance)
    }
}

impl Default for WeatherPolicy {
    fn default() -> Self {
        // 4 rainy days in 10, same odds the farm has always had.
        Self::new(0.4)
    }
}

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeatherPolicy>()
            .add_systems(OnEnter(GameState::Playing), roll_initial_weather)
            .add_systems(
                Update,
                (trigger_sleep, process_day_end)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// The first day's weather is rolled once when play begins.
fn roll_initial_weather(mut calendar: ResMut<Calendar>, mut policy: ResMut<WeatherPolicy>) {
    calendar.raining = policy.roll();
    info!(
        "[Calendar] day {} begins (raining: {})",
        calendar.day, calendar.raining
    );
}

/// Player presses B to go to bed.
fn trigger_sleep(keys: Res<ButtonInput<KeyCode>>, mut sleep_events: EventWriter<SleepEvent>) {
    if keys.just_pressed(KeyCode::KeyB) {
        sleep_events.send(SleepEvent);
    }
}

/// Turn a sleep into the day transition: advance the counter, roll the new
/// day's rain, and broadcast both so the day-end handlers see a consistent
/// picture without re-reading the calendar mid-roll.
pub fn process_day_end(
    mut sleep_events: EventReader<SleepEvent>,
    mut calendar: ResMut<Calendar>,
    mut policy: ResMut<WeatherPolicy>,
    mut day_end_events: EventWriter<DayEndEvent>,
) {
    for _ in sleep_events.read() {
        calendar.day += 1;
        calendar.raining = policy.roll();

        day_end_events.send(DayEndEvent {
            day: calendar.day,
            raining: calendar.raining,
        });

        info!(
            "[Calendar] day {} begins (raining: {})",
            calendar.day, calendar.raining
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
