//! Amazing Ball entry point
//!
//! Headless native runner: loads settings, wires services and drives the
//! fixed-step loop with the autopilot. A windowed host would replace
//! `PrimitiveCounter` with a real backend and feed keyboard input instead.
//!
//! Usage: `amazing-ball [settings.json] [frames]`

use glam::Vec2;

use amazing_ball::audio::AudioManager;
use amazing_ball::consts::*;
use amazing_ball::renderer::{Color, DrawPrimitive, draw_frame};
use amazing_ball::settings::DEFAULT_SETTINGS_FILE;
use amazing_ball::sim::TickInput;
use amazing_ball::{FileScoreStore, Session, Settings};

/// Default run length: one minute of frames
const DEFAULT_FRAMES: u64 = 60 * 60;

/// Draw target that only counts what it is asked to draw
#[derive(Debug, Default)]
struct PrimitiveCounter {
    primitives: u64,
}

impl DrawPrimitive for PrimitiveCounter {
    fn fill_circle(&mut self, _: Vec2, _: f32, _: Color) {
        self.primitives += 1;
    }
    fn stroke_circle(&mut self, _: Vec2, _: f32, _: f32, _: Color) {
        self.primitives += 1;
    }
    fn fill_rect(&mut self, _: Vec2, _: Vec2, _: Color) {
        self.primitives += 1;
    }
    fn line(&mut self, _: Vec2, _: Vec2, _: Color) {
        self.primitives += 1;
    }
    fn point(&mut self, _: Vec2, _: Color) {
        self.primitives += 1;
    }
}

/// Game instance holding the session and loop timing
struct Game {
    session: Session,
    accumulator: f32,
    input: TickInput,
    frames: u64,
}

impl Game {
    fn new(session: Session) -> Self {
        Self {
            session,
            accumulator: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            frames: 0,
        }
    }

    /// Run simulation ticks for `dt` seconds of wall time
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.session.update(&self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pressed.clear();
        }
        self.frames += 1;
    }

    fn render(&self, out: &mut PrimitiveCounter) {
        draw_frame(&self.session.state, &self.session.high_scores(), out);
    }
}

fn main() {
    env_logger::init();
    log::info!("Amazing Ball (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string());
    let frames = args
        .next()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let settings = Settings::load(&settings_path);

    let mut audio = AudioManager::default();
    audio.load_assets(&settings.asset_dir);
    let scores = Box::new(FileScoreStore::new(&settings.score_file));

    let mut game = Game::new(Session::new(&settings, scores, audio));
    let mut counter = PrimitiveCounter::default();

    while game.frames < frames && !game.session.should_quit() {
        game.update(SIM_DT);
        game.render(&mut counter);
    }

    let state = &game.session.state;
    let best = game.session.high_scores();
    log::info!(
        "Ran {} frames ({} ticks, {} primitives): level {}, total {}, lives {}",
        game.frames,
        state.time_ticks,
        counter.primitives,
        state.progress.current_level,
        state.progress.total_score,
        state.progress.player_lives
    );
    log::info!(
        "Best scores: easy {} / medium {} / hard {} (top {})",
        best.easy,
        best.medium,
        best.hard,
        best.top_score()
    );
}
