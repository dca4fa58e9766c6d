use core::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("View size must be positive, got {width}x{height}")]
    InvalidViewSize { width: f32, height: f32 },

    #[error("Platform height {platform} does not fit in a view of height {view}")]
    PlatformTooTall { platform: f32, view: f32 },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("At least one jump must be allowed")]
    NoJumps,

    #[error("Points per speed step must be at least 1")]
    NoSpeedSteps,

    #[error("Recycle gap {min}..={max} is empty or negative")]
    InvalidRecycleGap { min: f32, max: f32 },

    #[error("Score interval must be longer than zero")]
    ZeroScoreInterval,

    #[error("Death animation must last longer than zero")]
    ZeroDeathDuration,
}

/// Tunables of a run. Speeds are in pixels per second and accelerations in
/// pixels per second squared.
#[derive(Reflect, Resource, Clone, Debug, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct RunnerSettings {
    pub width: f32,
    pub height: f32,
    pub platform_height: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub max_jumps: u32,
    pub fast_fall_velocity: f32,
    pub initial_speed: f32,
    pub speed_step: f32,
    pub points_per_speed_step: u32,
    pub score_interval: Duration,
    pub platform_speed_factor: f32,
    pub background_speed: f32,
    pub player_x: f32,
    pub recycle_gap_min: f32,
    pub recycle_gap_max: f32,
    pub obstacle_count: usize,
    pub death_duration: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 420.0,
            platform_height: 100.0,
            gravity: 2000.0,
            jump_velocity: 700.0,
            max_jumps: 2,
            fast_fall_velocity: 900.0,
            initial_speed: 300.0,
            speed_step: 60.0,
            points_per_speed_step: 100,
            score_interval: Duration::from_millis(100),
            platform_speed_factor: 0.5,
            background_speed: 120.0,
            player_x: 200.0,
            recycle_gap_min: 100.0,
            recycle_gap_max: 600.0,
            obstacle_count: 4,
            death_duration: Duration::from_secs(1),
        }
    }
}

impl RunnerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(SettingsError::InvalidViewSize {
                width: self.width,
                height: self.height,
            });
        }

        if self.platform_height >= self.height {
            return Err(SettingsError::PlatformTooTall {
                platform: self.platform_height,
                view: self.height,
            });
        }

        for (name, value) in [
            ("platform_height", self.platform_height),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("initial_speed", self.initial_speed),
            ("speed_step", self.speed_step),
            ("fast_fall_velocity", self.fast_fall_velocity),
            ("platform_speed_factor", self.platform_speed_factor),
            ("background_speed", self.background_speed),
        ] {
            if value <= 0.0 {
                return Err(SettingsError::NotPositive { name, value });
            }
        }

        if self.max_jumps == 0 {
            return Err(SettingsError::NoJumps);
        }

        if self.points_per_speed_step == 0 {
            return Err(SettingsError::NoSpeedSteps);
        }

        if self.recycle_gap_min < 0.0 || self.recycle_gap_min > self.recycle_gap_max {
            return Err(SettingsError::InvalidRecycleGap {
                min: self.recycle_gap_min,
                max: self.recycle_gap_max,
            });
        }

        if self.score_interval.is_zero() {
            return Err(SettingsError::ZeroScoreInterval);
        }

        if self.death_duration.is_zero() {
            return Err(SettingsError::ZeroDeathDuration);
        }

        Ok(())
    }

    /// Returns these settings if they are valid, the defaults otherwise.
    pub fn or_default_if_invalid(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                tracing::error!(%err, "Invalid runner settings, falling back to defaults");
                Self::default()
            }
        }
    }

    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn left_edge(&self) -> f32 {
        -self.width / 2.0
    }

    pub fn right_edge(&self) -> f32 {
        self.width / 2.0
    }

    pub fn bottom_edge(&self) -> f32 {
        -self.height / 2.0
    }

    /// Top of the platform, where the player and obstacles stand.
    pub fn ground_y(&self) -> f32 {
        self.bottom_edge() + self.platform_height
    }
}
