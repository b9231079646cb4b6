//! Sound cue playback driven by simulation events
//!
//! The simulation never touches audio. The host drains `GameEvent`s each
//! frame and hands them to an `AudioManager`, which drives whatever
//! `SoundHandle` backend the platform provides.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Number of laser variants cycled through on fire
pub const LASER_VARIANTS: usize = 4;

/// A loaded, playable sound owned by the platform layer
pub trait SoundHandle {
    fn play(&mut self, volume: f32);
    fn stop(&mut self);
    fn playing(&self) -> bool;
    /// Release the underlying resource; called exactly once
    fn destroy(&mut self);
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile pair fired
    LaserFire,
    /// Attachment accepted
    AttachmentGranted,
    /// Attachment refused (slot already taken)
    AttachmentDenied,
    /// Obstacle or ship blew up
    Explosion,
}

/// Handle that plays nothing (headless runs and tests)
#[derive(Debug, Default)]
pub struct SilentSound {
    playing: bool,
}

impl SoundHandle for SilentSound {
    fn play(&mut self, _volume: f32) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn playing(&self) -> bool {
        self.playing
    }

    fn destroy(&mut self) {
        self.playing = false;
    }
}

/// Stop the handle if it is still sounding, then play it from the start
fn restart<H: SoundHandle>(handle: &mut H, volume: f32) {
    if handle.playing() {
        handle.stop();
    }
    handle.play(volume);
}

/// Audio manager for the game
pub struct AudioManager<H: SoundHandle> {
    lasers: Vec<H>,
    next_laser: usize,
    current_laser: Option<usize>,
    granted: H,
    denied: H,
    explosion: H,
    volume: f32,
    destroyed: bool,
}

impl<H: SoundHandle> AudioManager<H> {
    /// Open every handle through `open(effect, variant)`
    pub fn new(settings: &Settings, mut open: impl FnMut(SoundEffect, usize) -> H) -> Self {
        let lasers = (0..LASER_VARIANTS)
            .map(|variant| open(SoundEffect::LaserFire, variant))
            .collect();
        Self {
            lasers,
            next_laser: 0,
            current_laser: None,
            granted: open(SoundEffect::AttachmentGranted, 0),
            denied: open(SoundEffect::AttachmentDenied, 0),
            explosion: open(SoundEffect::Explosion, 0),
            volume: settings.effective_volume(),
            destroyed: false,
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.destroyed || self.volume <= 0.0 {
            return;
        }

        match effect {
            SoundEffect::LaserFire => self.play_laser(),
            SoundEffect::AttachmentGranted => restart(&mut self.granted, self.volume),
            SoundEffect::AttachmentDenied => restart(&mut self.denied, self.volume),
            SoundEffect::Explosion => restart(&mut self.explosion, self.volume),
        }
    }

    /// Cycle to the next laser variant, cutting off the previous one
    fn play_laser(&mut self) {
        if let Some(previous) = self.current_laser.take() {
            self.lasers[previous].stop();
        }
        let Some(laser) = self.lasers.get_mut(self.next_laser) else {
            return;
        };
        laser.play(self.volume);
        self.current_laser = Some(self.next_laser);
        self.next_laser = (self.next_laser + 1) % self.lasers.len();
    }

    /// Map one simulation event to its cue, if it has one
    pub fn handle(&mut self, event: &GameEvent) {
        let effect = match event {
            GameEvent::ProjectilesFired { .. } => SoundEffect::LaserFire,
            GameEvent::AttachmentGranted { .. } => SoundEffect::AttachmentGranted,
            GameEvent::AttachmentDenied { .. } => SoundEffect::AttachmentDenied,
            GameEvent::Explosion { .. } => SoundEffect::Explosion,
            _ => return,
        };
        self.play(effect);
    }

    pub fn handle_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Release every handle; later calls are no-ops
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.current_laser = None;
        for handle in self
            .lasers
            .iter_mut()
            .chain([&mut self.granted, &mut self.denied, &mut self.explosion])
        {
            handle.destroy();
        }
        log::debug!("Audio handles released");
    }
}

impl<H: SoundHandle> Drop for AudioManager<H> {
    fn drop(&mut self) {
        self.destroy();
    }
}
