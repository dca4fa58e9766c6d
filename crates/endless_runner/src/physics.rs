use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;

use crate::settings::RunnerSettings;

/// Gravity, the floor and a pause switch for everything that moves on its own.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ArcadePhysics {
    pub gravity: f32,
    pub ground_y: f32,
    pub paused: bool,
}

impl ArcadePhysics {
    pub fn from_settings(settings: &RunnerSettings) -> Self {
        Self {
            gravity: settings.gravity,
            ground_y: settings.ground_y(),
            paused: false,
        }
    }

    pub const fn pause(&mut self) {
        self.paused = true;
    }

    pub const fn resume(&mut self) {
        self.paused = false;
    }
}

#[derive(Component, Debug, Default, Clone, Copy, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

/// Bodies pulled down by [`ArcadePhysics::gravity`] and stopped by the floor.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Grounded(pub bool);

/// Hit box relative to the entity's bottom-left anchored translation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    pub size: Vec2,
    pub offset: Vec2,
}

impl CollisionBox {
    pub const fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
        }
    }

    pub const fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn aabb(&self, anchor: Vec2) -> Aabb2d {
        let half_size = self.size / 2.0;
        Aabb2d::new(anchor + self.offset + half_size, half_size)
    }

    /// Bottom of the box for an entity anchored at `anchor_y`.
    pub fn bottom(&self, anchor_y: f32) -> f32 {
        anchor_y + self.offset.y
    }
}

pub fn overlaps(a: &Aabb2d, b: &Aabb2d) -> bool {
    a.intersects(b)
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsSet;

pub struct ArcadePhysicsPlugin;

impl Plugin for ArcadePhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_gravity, integrate_velocity, resolve_ground)
                .chain()
                .in_set(PhysicsSet)
                .run_if(physics_running),
        );
    }
}

pub fn physics_running(physics: Option<Res<ArcadePhysics>>) -> bool {
    physics.is_some_and(|physics| !physics.paused)
}

fn apply_gravity(
    physics: Res<ArcadePhysics>,
    time: Res<Time>,
    mut query: Query<(&mut Velocity, &Grounded)>,
) {
    let dt = time.delta_secs();
    for (mut velocity, grounded) in &mut query {
        if !grounded.0 || velocity.y > 0.0 {
            velocity.y -= physics.gravity * dt;
        }
    }
}

fn integrate_velocity(time: Res<Time>, mut query: Query<(&Velocity, &mut Transform)>) {
    let dt = time.delta_secs();
    for (velocity, mut transform) in &mut query {
        transform.translation += velocity.extend(0.0) * dt;
    }
}

fn resolve_ground(
    physics: Res<ArcadePhysics>,
    mut query: Query<(&mut Transform, &mut Velocity, &mut Grounded, &CollisionBox)>,
) {
    for (mut transform, mut velocity, mut grounded, collision_box) in &mut query {
        let bottom = collision_box.bottom(transform.translation.y);
        if bottom <= physics.ground_y && velocity.y <= 0.0 {
            transform.translation.y += physics.ground_y - bottom;
            velocity.y = 0.0;
            grounded.0 = true;
        } else {
            grounded.0 = false;
        }
    }
}
