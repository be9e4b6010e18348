//! Survival mode: dodge raiders and their bolts for as long as possible

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bolt::Bolt;
use super::flocking::{FlockConfig, FlockWeights, flock_forces};
use super::geometry::Rect;
use super::raider::{Blaster, Raider, RaiderKind};
use super::spawn::SpawnPolicy;
use crate::consts::TICK_HZ;
use crate::error::ConfigError;
use crate::settings::{DifficultyParams, Tuning};

/// Sizes, speeds and contact factors for survival mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    pub player_size: f32,
    /// Per-axis player speed in px/s
    pub player_speed: f32,
    pub raider_size: f32,
    /// Base raider speed in px/s, before the difficulty scale
    pub raider_speed: f32,
    pub bolt_speed: f32,
    pub bolt_radius: f32,
    /// Seconds between shots for armed raiders
    pub blaster_cooldown: f32,
    /// Contact radius as a fraction of half the sprite size
    pub raider_contact: f32,
    pub bolt_contact: f32,
    pub flock: FlockConfig,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            player_size: 160.0,
            player_speed: 15.0 * TICK_HZ,
            raider_size: 120.0,
            raider_speed: 4.0 * TICK_HZ,
            bolt_speed: Bolt::DEFAULT_SPEED,
            bolt_radius: Bolt::DEFAULT_RADIUS,
            blaster_cooldown: 1.5,
            raider_contact: 0.8,
            bolt_contact: 0.7,
            flock: FlockConfig {
                weights: FlockWeights {
                    seek: 0.5,
                    ..FlockWeights::default()
                },
                ..FlockConfig::default()
            },
        }
    }
}

/// The player's bird, steered toward the last touch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub target: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, size: f32, speed: f32) -> Self {
        Self {
            pos,
            target: pos,
            size,
            speed,
        }
    }

    /// Step each axis toward the target independently, snapping when close
    pub fn update(&mut self, dt: f32) {
        let step = self.speed * dt;
        let approach = |from: f32, to: f32| {
            let d = to - from;
            if d.abs() > step { from + step.copysign(d) } else { to }
        };
        self.pos.x = approach(self.pos.x, self.target.x);
        self.pos.y = approach(self.pos.y, self.target.y);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SurvivalInput {
    /// Touch position this tick, if any
    pub touch: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Raider(u32),
    Bolt(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurvivalEvent {
    Spawned { raider: u32, kind: RaiderKind },
    Fired { raider: u32, bolt: u32 },
    Retired { raider: u32 },
    GameOver { by: Hazard, score: u64 },
}

#[derive(Debug)]
pub struct SurvivalScene {
    config: SurvivalConfig,
    policy: SpawnPolicy,
    bounds: Rect,
    margin: f32,
    speed_scale: f32,
    seed: u64,
    rng: Pcg32,
    player: Player,
    raiders: Vec<Raider>,
    bolts: Vec<Bolt>,
    spawn_timer: f32,
    score_timer: f32,
    score: u64,
    elapsed: f32,
    game_over: Option<Hazard>,
    events: Vec<SurvivalEvent>,
    next_id: u32,
}

impl SurvivalScene {
    pub fn new(
        seed: u64,
        tuning: &Tuning,
        params: DifficultyParams,
        config: SurvivalConfig,
        policy: SpawnPolicy,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        params.validate()?;
        if policy.interval.is_nan() || policy.interval <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "interval",
                value: policy.interval,
            });
        }

        let bounds = tuning.bounds();
        let player = Player::new(
            Vec2::new(bounds.center().x, bounds.y + 50.0 + config.player_size / 2.0),
            config.player_size,
            config.player_speed,
        );
        log::info!("Survival scene ready (seed {seed})");
        Ok(Self {
            config,
            policy,
            bounds,
            margin: tuning.cull_margin,
            speed_scale: params.enemy_speed_scale,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player,
            raiders: Vec::new(),
            bolts: Vec::new(),
            spawn_timer: 0.0,
            score_timer: 0.0,
            score: 0,
            elapsed: 0.0,
            game_over: None,
            events: Vec::new(),
            next_id: 1,
        })
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn raiders(&self) -> &[Raider] {
        &self.raiders
    }

    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn game_over(&self) -> Option<Hazard> {
        self.game_over
    }

    pub fn events(&self) -> &[SurvivalEvent] {
        &self.events
    }

    /// Add a raider directly, bypassing the spawn policy
    pub fn insert_raider(&mut self, raider: Raider) {
        self.raiders.push(raider);
        self.raiders.sort_by_key(|r| r.id);
    }

    /// Allocate an id for a raider built outside the scene
    pub fn allocate_id(&mut self) -> u32 {
        self.next_entity_id()
    }

    /// Advance the scene by one fixed timestep
    pub fn tick(&mut self, input: &SurvivalInput, dt: f32) {
        self.events.clear();
        if self.game_over.is_some() {
            return;
        }

        if let Some(touch) = input.touch {
            self.player.target = touch;
        }
        self.player.update(dt);

        self.spawn_timer += dt;
        while self.spawn_timer >= self.policy.interval {
            self.spawn_timer -= self.policy.interval;
            self.spawn();
        }

        self.update_raiders(dt);
        self.update_bolts(dt);

        self.raiders.retain(Raider::alive);
        self.bolts.retain(Bolt::alive);

        if let Some(hazard) = self.check_contact() {
            self.game_over = Some(hazard);
            self.events.push(SurvivalEvent::GameOver {
                by: hazard,
                score: self.score,
            });
            log::info!(
                "Survival over after {:.1}s: hit by {:?}, score {}",
                self.elapsed,
                hazard,
                self.score
            );
            return;
        }

        self.elapsed += dt;
        self.score_timer += dt;
        while self.score_timer >= 1.0 {
            self.score_timer -= 1.0;
            self.score += 1;
        }
    }

    fn spawn(&mut self) {
        let homing = self
            .raiders
            .iter()
            .filter(|r| r.kind() == RaiderKind::Homing)
            .count();
        let kind = self.policy.choose_kind(&mut self.rng, homing);

        let size = self.config.raider_size;
        let y = self.bounds.top() + self.margin + size / 2.0;
        let occupied: Vec<Vec2> = self.raiders.iter().map(Raider::pos).collect();
        let pos = self
            .policy
            .place(&mut self.rng, self.bounds.w, y, size, &occupied);

        let id = self.next_entity_id();
        let speed = self.config.raider_speed * self.speed_scale;
        let raider = match kind {
            RaiderKind::Falling => Raider::falling(id, pos, speed, size).with_weapon(Box::new(
                Blaster::new(
                    self.config.blaster_cooldown,
                    self.config.bolt_speed,
                    self.config.bolt_radius,
                ),
            )),
            RaiderKind::Homing => Raider::homing(id, pos, speed, size),
            RaiderKind::Flocking => Raider::flocking(id, pos, speed, size),
        };
        log::debug!("spawned raider {} ({:?}) at {:?}", id, kind, pos);
        self.events.push(SurvivalEvent::Spawned { raider: id, kind });
        self.raiders.push(raider);
    }

    fn update_raiders(&mut self, dt: f32) {
        let player = self.player.pos;
        let forces = flock_forces(
            self.raiders.iter().filter_map(Raider::flock_agent),
            Some(player),
            &self.config.flock,
        );
        let mut forces = forces.into_iter();

        let mut fired = Vec::new();
        for raider in &mut self.raiders {
            let force = if raider.flock_agent().is_some() {
                forces.next().unwrap_or(Vec2::ZERO)
            } else {
                Vec2::ZERO
            };
            if !raider.update(dt, player, force, &self.bounds, self.margin) {
                self.events.push(SurvivalEvent::Retired { raider: raider.id });
                continue;
            }
            if let Some(bolt) = raider.fire(dt, player) {
                fired.push((raider.id, bolt));
            }
        }

        for (raider, mut bolt) in fired {
            bolt.id = self.next_entity_id();
            self.events.push(SurvivalEvent::Fired {
                raider,
                bolt: bolt.id,
            });
            self.bolts.push(bolt);
        }
    }

    fn update_bolts(&mut self, dt: f32) {
        for bolt in &mut self.bolts {
            bolt.update(dt, &self.bounds, self.margin);
        }
    }

    /// First hazard touching the player, raiders before bolts, lowest id first
    fn check_contact(&self) -> Option<Hazard> {
        let half = self.player.size / 2.0;
        let raider_reach = half * self.config.raider_contact;
        let bolt_reach = half * self.config.bolt_contact;

        self.raiders
            .iter()
            .find(|r| {
                let r_radius = r.size / 2.0 * self.config.raider_contact;
                self.player.pos.distance(r.pos()) < raider_reach + r_radius
            })
            .map(|r| Hazard::Raider(r.id))
            .or_else(|| {
                self.bolts
                    .iter()
                    .find(|b| self.player.pos.distance(b.pos) < bolt_reach + b.radius)
                    .map(|b| Hazard::Bolt(b.id))
            })
    }
}
