use core::time::Duration;

use bevy::prelude::*;

/// A strip of frames in a texture atlas, played at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClip {
    pub frames: usize,
    pub fps: f32,
    pub looping: bool,
}

#[derive(Component, Debug)]
pub struct SpriteAnimation {
    clip: AnimationClip,
    timer: Timer,
    finished: bool,
}

impl SpriteAnimation {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            timer: Timer::new(
                Duration::from_secs_f64(1.0 / f64::from(clip.fps.max(f32::EPSILON))),
                TimerMode::Repeating,
            ),
            finished: false,
        }
    }

    pub const fn clip(&self) -> AnimationClip {
        self.clip
    }

    /// A clip that doesn't loop is finished once its last frame is shown.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the frame to show after `delta` more time, starting from `index`.
    pub fn advance(&mut self, delta: Duration, index: usize) -> usize {
        if self.finished || self.clip.frames == 0 {
            return index;
        }

        self.timer.tick(delta);
        let steps = self.timer.times_finished_this_tick() as usize;
        let next = index + steps;
        let last = self.clip.frames - 1;

        if next <= last {
            if !self.clip.looping && next == last {
                self.finished = true;
            }
            next
        } else if self.clip.looping {
            next % self.clip.frames
        } else {
            self.finished = true;
            last
        }
    }
}

pub fn animate_sprites(time: Res<Time>, mut query: Query<(&mut SpriteAnimation, &mut Sprite)>) {
    for (mut animation, mut sprite) in &mut query {
        let Some(texture_atlas) = &mut sprite.texture_atlas else {
            continue;
        };

        let next = animation.advance(time.delta(), texture_atlas.index);
        if next != texture_atlas.index {
            texture_atlas.index = next;
        }
    }
}
