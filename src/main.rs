//! Interstellar headless runner
//!
//! Plays one autopilot round through the same input path a real host uses
//! and logs a summary. Usage: `interstellar [TUNING.json] [SEED]`.
//! Verbosity follows `RUST_LOG`.

use std::process::ExitCode;

use interstellar::audio::{AudioManager, SilentSound};
use interstellar::sim::input::JOY_BUTTON_RT;
use interstellar::sim::{
    Entity, GameEvent, GamePhase, GameState, InputEvent, InputSource, TickInput, tick,
};
use interstellar::{Settings, Tuning};

const DEFAULT_SEED: u64 = 12345;
const SETTINGS_PATH: &str = "interstellar-settings.json";
/// Safety stop for rounds the autopilot survives indefinitely
const MAX_TICKS: u64 = 20_000;
/// How close a rock may get above the ship before the autopilot backs off
const DANGER_ZONE: f32 = 80.0;

/// Round statistics gathered from events
#[derive(Debug, Default)]
struct Tally {
    volleys: u32,
    hits: u32,
    kills: u32,
    granted: u32,
    denied: u32,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ProjectilesFired { .. } => self.volleys += 1,
            GameEvent::ProjectileHit { .. } => self.hits += 1,
            GameEvent::ObstacleDestroyed { exploded: true, .. } => self.kills += 1,
            GameEvent::AttachmentGranted { .. } => self.granted += 1,
            GameEvent::AttachmentDenied { .. } => self.denied += 1,
            _ => {}
        }
    }
}

/// Stick position that lines the ship up under the nearest obstacle
fn autopilot(state: &GameState) -> InputEvent {
    let ship = state.player.bounds();

    let target = state
        .obstacles
        .iter()
        .filter(|o| o.is_alive() && o.sprite.bounds.bottom() < ship.top())
        .min_by(|a, b| {
            let da = a.sprite.bounds.center.distance_squared(ship.center);
            let db = b.sprite.bounds.center.distance_squared(ship.center);
            da.total_cmp(&db)
        });
    let x = match target {
        Some(o) if (o.sprite.bounds.center.x - ship.center.x).abs() > 4.0 => {
            (o.sprite.bounds.center.x - ship.center.x).signum()
        }
        _ => 0.0,
    };

    let threatened = state.obstacles.iter().any(|o| {
        o.is_alive()
            && !o.kind.is_carrier()
            && o.sprite.bounds.bottom() > ship.top() - DANGER_ZONE
            && o.sprite.bounds.top() < ship.bottom()
            && (o.sprite.bounds.center.x - ship.center.x).abs() < ship.size.x
    });
    let y = if threatened { 1.0 } else { 0.0 };

    InputEvent::JoyAxis { x, y }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("Cannot load tuning from {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            log::error!("Invalid seed: {err}");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_SEED,
    };

    let settings = Settings::load_or_default(SETTINGS_PATH);
    let mut audio = AudioManager::new(&settings, |_, _| SilentSound::default());
    let mut input = InputSource::new(settings.joystick_deadzone);

    let mut state = match GameState::new(seed, tuning) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Cannot start round: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut tally = Tally::default();
    input.handle(InputEvent::JoyButtonDown(JOY_BUTTON_RT));

    while state.phase == GamePhase::Playing && state.time_ticks < MAX_TICKS {
        input.handle(autopilot(&state));
        let tick_input = TickInput {
            intents: input.snapshot(),
            ..Default::default()
        };

        let result = tick(&mut state, &tick_input);
        let events = state.drain_events();
        audio.handle_all(&events);
        for event in &events {
            tally.record(event);
        }
        if let Err(err) = result {
            log::error!("Round aborted: {err}");
            return ExitCode::FAILURE;
        }
    }

    input.release_all();
    log::info!(
        "Seed {seed}: {:?} after {} ticks, distance {:.0}, health {}",
        state.phase,
        state.time_ticks,
        state.distance(),
        state.player.sprite.health
    );
    log::info!(
        "{} volleys, {} hits, {} kills, {} attachments ({} denied)",
        tally.volleys,
        tally.hits,
        tally.kills,
        tally.granted,
        tally.denied
    );

    state.destroy();
    audio.destroy();
    ExitCode::SUCCESS
}
