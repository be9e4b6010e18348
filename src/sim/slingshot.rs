//! Slingshot level: launch projectiles at patrolling agents
//!
//! One [`SlingshotScene::tick`] runs the phases in a fixed order:
//! launch input, patrol motion, projectile flight against walls, hit tests,
//! fade bookkeeping and purge, then the session clock and outcome.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::level::Level;
use super::patrol::PatrolAgent;
use super::projectile::Projectile;
use super::trajectory::{DOT_COUNT, DOT_SPACING, DragState, trajectory_points};
use crate::error::ConfigError;
use crate::settings::{DifficultyParams, Tuning};

/// Where projectiles leave the slingshot
pub const DEFAULT_LAUNCH_POINT: Vec2 = Vec2::new(100.0, 200.0);

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct SlingshotInput {
    /// Pointer pressed here (starts a drag)
    pub press: Option<Vec2>,
    /// Pointer moved here
    pub drag: Option<Vec2>,
    /// Pointer released (fires if a drag is in progress)
    pub release: bool,
    /// Fire with this velocity directly, without a drag gesture
    pub launch: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    Timeout,
    OutOfShots,
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Playing,
    Won,
    Lost(LossReason),
}

/// Things that happened during the last tick, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum SlingshotEvent {
    Launched { projectile: u32, velocity: Vec2 },
    /// A projectile burst against a wall
    Impact { projectile: u32, point: Vec2 },
    AgentHit { agent: u32, projectile: u32 },
    AgentRemoved { agent: u32 },
    Finished(Outcome),
}

#[derive(Debug, Clone)]
pub struct SlingshotScene {
    level: Level,
    tuning: Tuning,
    pub launch_point: Vec2,
    agents: Vec<PatrolAgent>,
    projectiles: Vec<Projectile>,
    /// Seconds each dead agent has been fading, by agent id
    fading: Vec<(u32, f32)>,
    drag: DragState,
    attempts_left: u32,
    time_left: f32,
    kills: u32,
    outcome: Outcome,
    events: Vec<SlingshotEvent>,
    /// Events raised between ticks, reported by the next tick
    queued: Vec<SlingshotEvent>,
    next_id: u32,
}

impl SlingshotScene {
    /// Build a scene with one patrol agent per level path
    pub fn new(
        level: Level,
        tuning: Tuning,
        params: DifficultyParams,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        params.validate()?;

        let mut scene = Self {
            level,
            tuning,
            launch_point: DEFAULT_LAUNCH_POINT,
            agents: Vec::new(),
            projectiles: Vec::new(),
            fading: Vec::new(),
            drag: DragState::default(),
            attempts_left: params.attempts,
            time_left: params.time_limit,
            kills: 0,
            outcome: Outcome::Playing,
            events: Vec::new(),
            queued: Vec::new(),
            next_id: 1,
        };

        let speed = scene.tuning.patrol_speed * params.enemy_speed_scale;
        let size = Vec2::splat(scene.tuning.agent_size);
        for path in scene.level.paths().to_vec() {
            let id = scene.next_entity_id();
            let agent = PatrolAgent::new(id, path, scene.level.waypoints(), speed, size);
            scene.agents.push(agent);
        }

        log::info!(
            "Slingshot scene ready: {} agents, {} attempts, {:.0}s",
            scene.agents.len(),
            scene.attempts_left,
            scene.time_left
        );
        Ok(scene)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn agents(&self) -> &[PatrolAgent] {
        &self.agents
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Events produced by the most recent tick
    pub fn events(&self) -> &[SlingshotEvent] {
        &self.events
    }

    /// Preview dots for the drag in progress, using the same gravity as the projectiles
    pub fn trajectory_preview(&self) -> Option<Vec<Vec2>> {
        let velocity = self
            .drag
            .pending_velocity(self.tuning.max_drag_distance, self.tuning.launch_power)?;
        Some(trajectory_points(
            self.launch_point,
            velocity,
            self.tuning.gravity,
            DOT_COUNT,
            DOT_SPACING,
        ))
    }

    /// The presentation layer finished fading agent `id`: Dead -> Removed
    ///
    /// Returns false if there is no dead agent with that id.
    pub fn acknowledge_fade(&mut self, id: u32) -> bool {
        match self.agents.iter_mut().find(|a| a.id == id) {
            Some(agent) if agent.is_dead() && !agent.removed() => {
                agent.mark_removed();
                true
            }
            _ => false,
        }
    }

    /// Advance the scene by one fixed timestep
    pub fn tick(&mut self, input: &SlingshotInput, dt: f32) {
        self.events.clear();
        self.events.append(&mut self.queued);
        if self.outcome != Outcome::Playing {
            self.advance_fades(dt);
            self.purge();
            return;
        }

        self.apply_input(input);

        let waypoints = self.level.waypoints();
        for agent in &mut self.agents {
            agent.update(dt, waypoints);
        }

        let burst = self.update_projectiles(dt);
        self.resolve_hits(&burst);
        self.advance_fades(dt);
        self.purge();
        self.advance_clock(dt);
    }

    fn apply_input(&mut self, input: &SlingshotInput) {
        if let Some(start) = input.press {
            self.drag.begin(start);
        }
        if let Some(current) = input.drag {
            self.drag.update(current);
        }
        if input.release {
            if let Some(velocity) = self
                .drag
                .release(self.tuning.max_drag_distance, self.tuning.launch_power)
            {
                self.fire(velocity);
            }
        }
        if let Some(velocity) = input.launch {
            self.fire(velocity);
        }
    }

    /// Fire from the launch point; consumes an attempt. Returns the projectile id.
    ///
    /// The `Launched` event is reported by the next [`SlingshotScene::tick`].
    pub fn launch(&mut self, velocity: Vec2) -> Option<u32> {
        let id = self.spawn_projectile(velocity)?;
        self.queued.push(SlingshotEvent::Launched {
            projectile: id,
            velocity,
        });
        Some(id)
    }

    fn fire(&mut self, velocity: Vec2) {
        if let Some(id) = self.spawn_projectile(velocity) {
            self.events.push(SlingshotEvent::Launched {
                projectile: id,
                velocity,
            });
        }
    }

    fn spawn_projectile(&mut self, velocity: Vec2) -> Option<u32> {
        if self.outcome != Outcome::Playing || self.attempts_left == 0 {
            log::debug!("launch ignored, {} attempts left", self.attempts_left);
            return None;
        }
        self.attempts_left -= 1;
        let id = self.next_entity_id();
        self.projectiles
            .push(Projectile::launch(id, self.launch_point, velocity, &self.tuning));
        log::info!(
            "Launched projectile {} at {:?} ({} attempts left)",
            id,
            velocity,
            self.attempts_left
        );
        Some(id)
    }

    /// Move every projectile; returns the ids that burst on a wall this tick
    fn update_projectiles(&mut self, dt: f32) -> Vec<u32> {
        let ttl = self.tuning.ttl_for(self.attempts_left);
        let bounds = self.tuning.bounds();
        let walls = self.level.walls();
        let mut burst = Vec::new();
        for projectile in &mut self.projectiles {
            if let Some(point) = projectile.update_with_walls(dt, walls, None) {
                self.events.push(SlingshotEvent::Impact {
                    projectile: projectile.id,
                    point,
                });
                burst.push(projectile.id);
            } else {
                projectile.cull(ttl, &bounds, self.tuning.cull_margin);
            }
        }
        burst
    }

    /// Hit-test flying projectiles and those that burst this tick
    fn resolve_hits(&mut self, burst: &[u32]) {
        for projectile in self
            .projectiles
            .iter_mut()
            .filter(|p| p.alive() || burst.contains(&p.id))
        {
            let rect = projectile.rect();
            let Some(agent) = self
                .agents
                .iter_mut()
                .find(|a| !a.is_dead() && a.rect().intersects(&rect))
            else {
                continue;
            };
            agent.destroy();
            projectile.kill();
            self.kills += 1;
            self.fading.push((agent.id, 0.0));
            self.events.push(SlingshotEvent::AgentHit {
                agent: agent.id,
                projectile: projectile.id,
            });
        }
    }

    fn advance_fades(&mut self, dt: f32) {
        let fade_duration = self.tuning.fade_duration;
        let mut expired = Vec::new();
        for (id, elapsed) in &mut self.fading {
            *elapsed += dt;
            if *elapsed >= fade_duration {
                expired.push(*id);
            }
        }
        for agent in self.agents.iter_mut().filter(|a| expired.contains(&a.id)) {
            agent.mark_removed();
        }
    }

    /// Drop retired projectiles and removed agents, after every phase has run
    fn purge(&mut self) {
        let removed: Vec<u32> = self
            .agents
            .iter()
            .filter(|a| a.removed())
            .map(|a| a.id)
            .collect();
        for &agent in &removed {
            self.events.push(SlingshotEvent::AgentRemoved { agent });
        }
        self.agents.retain(|a| !a.removed());
        self.fading.retain(|(id, _)| !removed.contains(id));
        self.projectiles.retain(Projectile::alive);
    }

    fn advance_clock(&mut self, dt: f32) {
        self.time_left = (self.time_left - dt).max(0.0);

        let outcome = if self.agents.iter().all(PatrolAgent::is_dead) {
            Outcome::Won
        } else if self.time_left <= 0.0 {
            Outcome::Lost(LossReason::Timeout)
        } else if self.attempts_left == 0 && self.projectiles.is_empty() {
            Outcome::Lost(LossReason::OutOfShots)
        } else {
            Outcome::Playing
        };

        if outcome != Outcome::Playing {
            self.outcome = outcome;
            self.drag.cancel();
            self.events.push(SlingshotEvent::Finished(outcome));
            log::info!(
                "Slingshot session finished: {:?} ({} kills, {:.1}s left)",
                outcome,
                self.kills,
                self.time_left
            );
        }
    }

    /// Playfield rectangle
    pub fn bounds(&self) -> Rect {
        self.tuning.bounds()
    }
}
