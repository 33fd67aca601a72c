//! Audio front end
//!
//! Sounds are procedural: each effect maps to a short oscillator recipe
//! (`Tone`) that a backend can synthesize. The game only talks to
//! `AudioManager`, which applies the volume settings and silently drops
//! everything when no backend is available. Audio never feeds back into
//! game state.

use crate::screen::ScreenId;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player leaves the ground
    Jump,
    /// Projectile fired
    Shoot,
    /// Blocked by a wall or prop
    Bump,
    /// Currency pickup collected
    PickupCollect,
    /// Chest opened
    ChestOpen,
    /// Player took contact damage
    PlayerHurt,
    /// NPC destroyed
    NpcDefeat,
    /// Drill block cracked
    BlockCrack,
    /// Drill block broken
    BlockBreak,
    /// Pursuit mode engaged
    Danger,
    /// Menu cursor moved
    MenuMove,
    /// Menu item accepted
    MenuSelect,
    /// Screen fade started
    Transition,
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Title,
    Dungeon,
    Drill,
    Ending,
}

impl MusicTrack {
    /// Track for a screen, if it has one
    pub fn for_screen(screen: ScreenId) -> Option<Self> {
        match screen {
            ScreenId::Title | ScreenId::Options => Some(MusicTrack::Title),
            ScreenId::Gameplay => Some(MusicTrack::Dungeon),
            ScreenId::Drill => Some(MusicTrack::Drill),
            ScreenId::Ending => Some(MusicTrack::Ending),
            ScreenId::Logo | ScreenId::Unknown => None,
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single swept oscillator with an exponential decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Peak gain before the volume is applied
    pub gain: f32,
    pub duration_s: f32,
}

impl SoundEffect {
    /// Synthesis recipe
    pub fn tone(&self) -> Tone {
        let (waveform, start_hz, end_hz, gain, duration_s) = match self {
            SoundEffect::Jump => (Waveform::Sine, 220.0, 440.0, 0.4, 0.12),
            SoundEffect::Shoot => (Waveform::Square, 880.0, 220.0, 0.2, 0.08),
            SoundEffect::Bump => (Waveform::Sine, 150.0, 60.0, 0.6, 0.1),
            SoundEffect::PickupCollect => (Waveform::Triangle, 660.0, 1320.0, 0.35, 0.15),
            SoundEffect::ChestOpen => (Waveform::Triangle, 330.0, 990.0, 0.5, 0.4),
            SoundEffect::PlayerHurt => (Waveform::Sawtooth, 200.0, 80.0, 0.5, 0.25),
            SoundEffect::NpcDefeat => (Waveform::Square, 400.0, 50.0, 0.4, 0.3),
            SoundEffect::BlockCrack => (Waveform::Triangle, 300.0, 300.0, 0.25, 0.05),
            SoundEffect::BlockBreak => (Waveform::Sawtooth, 100.0, 3500.0, 0.35, 0.2),
            SoundEffect::Danger => (Waveform::Sawtooth, 110.0, 55.0, 0.3, 0.6),
            SoundEffect::MenuMove => (Waveform::Sine, 400.0, 400.0, 0.2, 0.05),
            SoundEffect::MenuSelect => (Waveform::Sine, 500.0, 750.0, 0.3, 0.1),
            SoundEffect::Transition => (Waveform::Sine, 300.0, 150.0, 0.15, 0.5),
        };
        Tone {
            waveform,
            start_hz,
            end_hz,
            gain,
            duration_s,
        }
    }

    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Fired => Some(SoundEffect::Shoot),
            GameEvent::Bumped => Some(SoundEffect::Bump),
            GameEvent::PickedUp { .. } => Some(SoundEffect::PickupCollect),
            GameEvent::ChestOpened { .. } => Some(SoundEffect::ChestOpen),
            GameEvent::PlayerHit => Some(SoundEffect::PlayerHurt),
            GameEvent::NpcDefeated => Some(SoundEffect::NpcDefeat),
            GameEvent::BlockCracked => Some(SoundEffect::BlockCrack),
            GameEvent::BlockBroken => Some(SoundEffect::BlockBreak),
            GameEvent::DangerStarted => Some(SoundEffect::Danger),
            GameEvent::WaveRespawned => None,
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play_sound(&mut self, effect: SoundEffect, volume: f32);
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn stop_music(&mut self) {}
}

/// Backend that only traces what it would synthesize (headless runs)
#[derive(Debug, Default)]
pub struct TraceBackend;

impl AudioBackend for TraceBackend {
    fn play_sound(&mut self, effect: SoundEffect, volume: f32) {
        let tone = effect.tone();
        log::trace!(
            "sfx {:?}: {:?} {:.0}->{:.0}Hz for {:.2}s at {:.2}",
            effect,
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            tone.duration_s,
            tone.gain * volume
        );
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::trace!("music {:?} at {:.2}", track, volume);
    }

    fn stop_music(&mut self) {
        log::trace!("music stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    sfx_volume: f32,
    music_volume: f32,
    current_track: Option<MusicTrack>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("enabled", &self.is_enabled())
            .field("sfx_volume", &self.sfx_volume)
            .field("music_volume", &self.music_volume)
            .field("current_track", &self.current_track)
            .finish()
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        let settings = Settings::default();
        Self {
            backend,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            current_track: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Pick up volume and mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        let music_volume = settings.effective_music_volume();
        if music_volume != self.music_volume {
            self.music_volume = music_volume;
            // Restart the current track at the new level
            if let (Some(track), Some(backend)) = (self.current_track, self.backend.as_mut()) {
                backend.play_music(track, music_volume);
            }
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.play_sound(effect, self.sfx_volume);
        }
    }

    /// Play the sounds for a tick's events
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Switch tracks; asking for the current track does not restart it
    pub fn play_music(&mut self, track: Option<MusicTrack>) {
        if track == self.current_track {
            return;
        }
        self.current_track = track;
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        match track {
            Some(track) => backend.play_music(track, self.music_volume),
            None => backend.stop_music(),
        }
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Played {
        Sound(SoundEffect, f32),
        Music(MusicTrack),
        Stop,
    }

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<Played>>>);

    impl AudioBackend for Recorder {
        fn play_sound(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push(Played::Sound(effect, volume));
        }
        fn play_music(&mut self, track: MusicTrack, _volume: f32) {
            self.0.borrow_mut().push(Played::Music(track));
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().push(Played::Stop);
        }
    }

    fn recording_manager() -> (AudioManager, Recorder) {
        let recorder = Recorder::default();
        (AudioManager::new(Some(Box::new(recorder.clone()))), recorder)
    }

    #[test]
    fn test_disabled_manager_is_silent() {
        let mut audio = AudioManager::default();
        assert!(!audio.is_enabled());
        audio.play(SoundEffect::Jump);
        audio.play_music(Some(MusicTrack::Title));
        assert_eq!(audio.current_track(), Some(MusicTrack::Title));
    }

    #[test]
    fn test_mute_drops_sounds() {
        let (mut audio, recorder) = recording_manager();
        audio.play(SoundEffect::Shoot);
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        audio.apply_settings(&settings);
        audio.play(SoundEffect::Shoot);
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[test]
    fn test_music_not_restarted() {
        let (mut audio, recorder) = recording_manager();
        audio.play_music(Some(MusicTrack::Dungeon));
        audio.play_music(Some(MusicTrack::Dungeon));
        audio.play_music(None);
        assert_eq!(
            *recorder.0.borrow(),
            vec![Played::Music(MusicTrack::Dungeon), Played::Stop]
        );
    }

    #[test]
    fn test_events_map_to_sounds() {
        let (mut audio, recorder) = recording_manager();
        audio.play_events(&[GameEvent::Jumped, GameEvent::WaveRespawned, GameEvent::PlayerHit]);
        let played = recorder.0.borrow();
        assert_eq!(played.len(), 2);
        assert!(matches!(played[0], Played::Sound(SoundEffect::Jump, _)));
        assert!(matches!(played[1], Played::Sound(SoundEffect::PlayerHurt, _)));
    }

    #[test]
    fn test_every_screen_with_music_has_a_track() {
        assert_eq!(MusicTrack::for_screen(ScreenId::Logo), None);
        assert_eq!(MusicTrack::for_screen(ScreenId::Drill), Some(MusicTrack::Drill));
    }
}
