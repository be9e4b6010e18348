//! Condor Flight headless runner
//!
//! Plays a scripted session without any rendering and logs what happens.
//!
//! Usage: `condor-flight [easy|normal|hard] [slingshot|survival] [seed]`

use std::error::Error;

use condor_flight::consts::SIM_DT;
use condor_flight::sim::{
    Level, LevelSpec, Outcome, SlingshotEvent, SlingshotInput, SlingshotScene, SpawnPolicy,
    SurvivalConfig, SurvivalInput, SurvivalScene,
};
use condor_flight::{Difficulty, Mode, Tuning};
use glam::Vec2;

/// Upper bound on fixed steps run for a single frame
const MAX_SUBSTEPS: u32 = 8;
/// Wall-clock length of the simulated session
const SESSION_SECONDS: f32 = 120.0;

/// Uneven frame times, as a real display loop would produce
const FRAME_TIMES: [f32; 4] = [1.0 / 50.0, 1.0 / 70.0, 1.0 / 60.0, 1.0 / 45.0];

/// Shots the scripted player cycles through
const SHOTS: [Vec2; 4] = [
    Vec2::new(700.0, 500.0),
    Vec2::new(900.0, 1100.0),
    Vec2::new(450.0, 1250.0),
    Vec2::new(1100.0, 300.0),
];

/// Fixed-step driver: feeds variable frame times into whole simulation ticks
struct FrameClock {
    accumulator: f32,
    frame: usize,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            accumulator: 0.0,
            frame: 0,
        }
    }

    /// Ticks to run for the next frame
    fn next_frame(&mut self) -> u32 {
        let dt = FRAME_TIMES[self.frame % FRAME_TIMES.len()];
        self.frame += 1;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }
}

fn run_slingshot(difficulty: Difficulty, tuning: Tuning) -> Result<(), Box<dyn Error>> {
    let level = Level::build(LevelSpec::staircase())?;
    let mut scene = SlingshotScene::new(level, tuning, difficulty.params())?;
    let mut clock = FrameClock::new();
    let mut ticks: u64 = 0;
    let mut shot = 0;

    while scene.outcome() == Outcome::Playing && (ticks as f32) * SIM_DT < SESSION_SECONDS {
        for _ in 0..clock.next_frame() {
            let mut input = SlingshotInput::default();
            // One shot in flight at a time
            if scene.projectiles().is_empty() && scene.attempts_left() > 0 {
                input.launch = Some(SHOTS[shot % SHOTS.len()]);
                shot += 1;
            }
            scene.tick(&input, SIM_DT);
            ticks += 1;

            for event in scene.events() {
                match event {
                    SlingshotEvent::AgentHit { agent, projectile } => {
                        log::info!("Projectile {projectile} took down agent {agent}");
                    }
                    SlingshotEvent::Impact { projectile, point } => {
                        log::debug!("Projectile {projectile} burst at {point:?}");
                    }
                    _ => {}
                }
            }
        }
    }

    log::info!(
        "Slingshot result: {:?} after {} ticks, {} kills, {} attempts left",
        scene.outcome(),
        ticks,
        scene.kills(),
        scene.attempts_left()
    );
    Ok(())
}

fn run_survival(difficulty: Difficulty, tuning: Tuning, seed: u64) -> Result<(), Box<dyn Error>> {
    let mut scene = SurvivalScene::new(
        seed,
        &tuning,
        difficulty.params(),
        SurvivalConfig::default(),
        SpawnPolicy::default(),
    )?;
    let mut clock = FrameClock::new();
    let mut ticks: u64 = 0;
    let width = tuning.field_width;

    while scene.game_over().is_none() && (ticks as f32) * SIM_DT < SESSION_SECONDS {
        for _ in 0..clock.next_frame() {
            // Sweep the bird back and forth along the bottom of the field
            let t = ticks as f32 * SIM_DT;
            let touch = Vec2::new(width / 2.0 + (t * 0.8).sin() * (width / 2.0 - 80.0), 150.0);
            scene.tick(&SurvivalInput { touch: Some(touch) }, SIM_DT);
            ticks += 1;
        }
    }

    log::info!(
        "Survival result: score {} after {:.1}s ({:?})",
        scene.score(),
        scene.elapsed(),
        scene.game_over()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(name) => Difficulty::parse(&name)?,
        None => Difficulty::default(),
    };
    let mode = match args.next() {
        Some(name) => Mode::parse(&name)?,
        None => Mode::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => 0x5eed,
    };

    log::info!(
        "Condor Flight starting ({}, {})",
        difficulty.as_str(),
        mode.as_str()
    );
    let tuning = Tuning::default();
    match mode {
        Mode::Survival => run_survival(difficulty, tuning, seed),
        Mode::Slingshot => run_slingshot(difficulty, tuning),
    }
}
