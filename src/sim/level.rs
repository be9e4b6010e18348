//! Level descriptions: walls, waypoints and patrol paths
//!
//! A [`LevelSpec`] is plain data (JSON-friendly). [`Level::build`] validates
//! it and resolves each path's waypoint identifiers to table indices.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::patrol::Waypoint;
use crate::error::LevelError;

/// Raw level description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelSpec {
    pub walls: Vec<Rect>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    /// Each path is an ordered list of waypoint identifiers
    #[serde(default)]
    pub paths: Vec<Vec<String>>,
}

impl LevelSpec {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The first slingshot level: a staircase of walls climbing to the right
    pub fn staircase() -> Self {
        let walls = vec![
            Rect::new(0.0, 60.0, 460.0, 30.0),
            Rect::new(420.0, 90.0, 40.0, 180.0),
            Rect::new(320.0, 340.0, 160.0, 30.0),
            Rect::new(260.0, 480.0, 40.0, 220.0),
            Rect::new(60.0, 580.0, 40.0, 180.0),
        ];
        let waypoints = vec![
            Waypoint::new("low_left", Vec2::new(180.0, 250.0)),
            Waypoint::new("low_right", Vec2::new(360.0, 250.0)),
            Waypoint::new("ledge", Vec2::new(400.0, 450.0)),
            Waypoint::new("high_right", Vec2::new(420.0, 820.0)),
            Waypoint::new("high_left", Vec2::new(180.0, 860.0)),
            Waypoint::new("middle", Vec2::new(160.0, 430.0)),
        ];
        let path = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let paths = vec![
            path(&["low_left", "low_right"]),
            path(&["ledge", "high_right", "high_left"]),
            path(&["middle", "ledge"]),
        ];
        Self {
            walls,
            waypoints,
            paths,
        }
    }
}

/// A validated level, ready to be shared by every entity in a scene
#[derive(Debug, Clone)]
pub struct Level {
    walls: Vec<Rect>,
    waypoints: Vec<Waypoint>,
    paths: Vec<Vec<usize>>,
}

impl Level {
    pub fn build(desc: LevelSpec) -> Result<Self, LevelError> {
        for (index, wall) in desc.walls.iter().enumerate() {
            if !wall.is_finite() {
                return Err(LevelError::NonFiniteWall { index });
            }
            if wall.w < 0.0 || wall.h < 0.0 {
                return Err(LevelError::NegativeWallSize {
                    index,
                    w: wall.w,
                    h: wall.h,
                });
            }
        }

        let mut lookup = HashMap::with_capacity(desc.waypoints.len());
        for (i, wp) in desc.waypoints.iter().enumerate() {
            if lookup.insert(wp.id.as_str(), i).is_some() {
                return Err(LevelError::DuplicateWaypoint { id: wp.id.clone() });
            }
        }

        let paths = desc
            .paths
            .iter()
            .enumerate()
            .map(|(path, ids)| {
                ids.iter()
                    .map(|id| {
                        lookup.get(id.as_str()).copied().ok_or_else(|| LevelError::UnknownWaypoint {
                            path,
                            id: id.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Level built: {} walls, {} waypoints, {} paths",
            desc.walls.len(),
            desc.waypoints.len(),
            paths.len()
        );

        Ok(Self {
            walls: desc.walls,
            waypoints: desc.waypoints,
            paths,
        })
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Patrol paths as indices into [`Level::waypoints`]
    pub fn paths(&self) -> &[Vec<usize>] {
        &self.paths
    }
}
