//! Audio policy
//!
//! The simulation only raises `GameEvent`s; this module decides what they
//! sound like. Output goes through an `AudioBackend` so the same policy
//! drives a real mixer, the log, or a test recorder.

use crate::consts::{GEM_ECHO_TICKS, LOWERED_MUSIC_VOLUME, MUSIC_DUCK_TICKS, NORMAL_MUSIC_VOLUME};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Gem picked up
    GemCollect,
    /// Player took a hit
    Hurt,
    /// Health ran out
    GameOver,
    /// Every gem collected
    Win,
    /// Menu action accepted
    Select,
}

impl SoundEffect {
    /// Asset name, stable across versions
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::GemCollect => "gem_collect",
            SoundEffect::Hurt => "hurt",
            SoundEffect::GameOver => "game_over",
            SoundEffect::Win => "win",
            SoundEffect::Select => "select",
        }
    }

    pub fn from_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::GemCollected { .. } => SoundEffect::GemCollect,
            GameEvent::PlayerHurt { .. } => SoundEffect::Hurt,
            GameEvent::Select => SoundEffect::Select,
            GameEvent::GameOver => SoundEffect::GameOver,
            GameEvent::Win => SoundEffect::Win,
        }
    }

    /// Effects that pull the music down while they play
    fn ducks_music(self) -> bool {
        matches!(self, SoundEffect::GemCollect | SoundEffect::Hurt)
    }
}

/// Whatever actually makes the noise
pub trait AudioBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
    /// Cut an effect short if it is still playing
    fn stop_effect(&mut self, effect: SoundEffect);
    fn play_music(&mut self, volume: f32);
    fn stop_music(&mut self);
    fn set_music_volume(&mut self, volume: f32);
}

/// Backend that writes every call to the log
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::info!("sfx {} (volume {volume:.2})", effect.name());
    }

    fn stop_effect(&mut self, effect: SoundEffect) {
        log::debug!("sfx {} stopped", effect.name());
    }

    fn play_music(&mut self, volume: f32) {
        log::info!("music start (volume {volume:.2})");
    }

    fn stop_music(&mut self) {
        log::info!("music stop");
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("music volume {volume:.2}");
    }
}

/// Audio manager for the game
///
/// Call `handle_event` for each drained event and `tick` once per frame.
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    settings: Settings,
    /// Phase seen on the last `tick`
    phase: GamePhase,
    music_playing: bool,
    /// Frames left before the music comes back up
    duck_ticks: u32,
    /// Frames left on each pending gem echo
    echoes: Vec<u32>,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, settings: Settings) -> Self {
        Self {
            backend,
            settings,
            phase: GamePhase::Menu,
            music_playing: false,
            duck_ticks: 0,
            echoes: Vec::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    #[inline]
    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    #[inline]
    pub fn is_ducked(&self) -> bool {
        self.duck_ticks > 0
    }

    /// React to one simulation event
    pub fn handle_event(&mut self, event: &GameEvent) {
        let effect = SoundEffect::from_event(event);
        self.play(effect);

        match event {
            GameEvent::GemCollected { .. } => self.echoes.push(GEM_ECHO_TICKS),
            GameEvent::GameOver | GameEvent::Win => self.stop_music(),
            GameEvent::PlayerHurt { .. } | GameEvent::Select => {}
        }

        if effect.ducks_music() && self.music_playing {
            if self.duck_ticks == 0 {
                self.backend
                    .set_music_volume(LOWERED_MUSIC_VOLUME * self.settings.music_level());
            }
            self.duck_ticks = MUSIC_DUCK_TICKS;
        }
    }

    /// Play an effect at the configured volume; dropped when sound is off
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.settings.effect_volume();
        if volume <= 0.0 {
            return;
        }
        self.backend.play_effect(effect, volume);
    }

    /// Per-frame housekeeping: music follows the phase, duck and echo
    /// timers count down
    pub fn tick(&mut self, phase: GamePhase) {
        // Leaving the end screen silences its jingle
        let jingle = match self.phase {
            GamePhase::GameOver => Some(SoundEffect::GameOver),
            GamePhase::Win => Some(SoundEffect::Win),
            GamePhase::Menu | GamePhase::Playing => None,
        };
        if let Some(effect) = jingle {
            if phase != self.phase {
                self.backend.stop_effect(effect);
            }
        }
        self.phase = phase;
        match phase {
            GamePhase::Menu | GamePhase::Playing => {
                if self.settings.music_on && !self.music_playing {
                    self.start_music();
                }
            }
            GamePhase::GameOver | GamePhase::Win => self.stop_music(),
        }

        if self.duck_ticks > 0 {
            self.duck_ticks -= 1;
            if self.duck_ticks == 0 && self.music_playing {
                self.backend.set_music_volume(self.normal_music_volume());
            }
        }

        let mut due = 0;
        self.echoes.retain_mut(|left| {
            *left -= 1;
            if *left == 0 {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            self.play(SoundEffect::GemCollect);
        }
    }

    /// Flip background music; starts it right away if the phase allows
    pub fn toggle_music(&mut self) -> bool {
        let on = self.settings.toggle_music();
        self.play(SoundEffect::Select);
        if !on {
            self.stop_music();
        } else if matches!(self.phase, GamePhase::Menu | GamePhase::Playing) {
            self.start_music();
        }
        on
    }

    /// Flip sound effects. The click is heard only when turning them on.
    pub fn toggle_sound(&mut self) -> bool {
        let on = self.settings.toggle_sound();
        self.play(SoundEffect::Select);
        on
    }

    fn normal_music_volume(&self) -> f32 {
        NORMAL_MUSIC_VOLUME * self.settings.music_level()
    }

    fn start_music(&mut self) {
        if self.music_playing {
            return;
        }
        self.duck_ticks = 0;
        self.backend.play_music(self.normal_music_volume());
        self.music_playing = true;
    }

    fn stop_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.backend.stop_music();
        self.music_playing = false;
        self.duck_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Effect(SoundEffect),
        StopEffect(SoundEffect),
        MusicOn,
        MusicOff,
        Volume(f32),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl AudioBackend for Recorder {
        fn play_effect(&mut self, effect: SoundEffect, _volume: f32) {
            self.calls.push(Call::Effect(effect));
        }
        fn stop_effect(&mut self, effect: SoundEffect) {
            self.calls.push(Call::StopEffect(effect));
        }
        fn play_music(&mut self, _volume: f32) {
            self.calls.push(Call::MusicOn);
        }
        fn stop_music(&mut self) {
            self.calls.push(Call::MusicOff);
        }
        fn set_music_volume(&mut self, volume: f32) {
            self.calls.push(Call::Volume(volume));
        }
    }

    fn flat_settings() -> Settings {
        Settings {
            master_volume: 1.0,
            music_volume: 1.0,
            ..Settings::default()
        }
    }

    fn manager() -> AudioManager<Recorder> {
        let mut audio = AudioManager::new(Recorder::default(), flat_settings());
        audio.tick(GamePhase::Playing);
        audio.backend.calls.clear();
        audio
    }

    fn gem() -> GameEvent {
        GameEvent::GemCollected {
            cell: IVec2::new(5, 5),
        }
    }

    #[test]
    fn test_effect_names() {
        assert_eq!(SoundEffect::GemCollect.name(), "gem_collect");
        assert_eq!(SoundEffect::from_event(&GameEvent::Win).name(), "win");
        assert_eq!(
            SoundEffect::from_event(&GameEvent::PlayerHurt { health: 1 }),
            SoundEffect::Hurt
        );
    }

    #[test]
    fn test_music_starts_on_menu() {
        let mut audio = AudioManager::new(Recorder::default(), Settings::default());
        audio.tick(GamePhase::Menu);
        audio.tick(GamePhase::Menu);
        assert_eq!(audio.backend().calls, vec![Call::MusicOn]);
        assert!(audio.is_music_playing());
    }

    #[test]
    fn test_gem_echoes_after_six_frames() {
        let mut audio = manager();
        audio.handle_event(&gem());
        for _ in 0..GEM_ECHO_TICKS - 1 {
            audio.tick(GamePhase::Playing);
        }
        let effects = |audio: &AudioManager<Recorder>| {
            audio
                .backend()
                .calls
                .iter()
                .filter(|c| **c == Call::Effect(SoundEffect::GemCollect))
                .count()
        };
        assert_eq!(effects(&audio), 1);
        audio.tick(GamePhase::Playing);
        assert_eq!(effects(&audio), 2);
    }

    #[test]
    fn test_hurt_ducks_and_restores() {
        let mut audio = manager();
        audio.handle_event(&GameEvent::PlayerHurt { health: 2 });
        assert!(audio.is_ducked());
        assert_eq!(
            audio.backend().calls,
            vec![
                Call::Effect(SoundEffect::Hurt),
                Call::Volume(LOWERED_MUSIC_VOLUME)
            ]
        );

        for _ in 0..MUSIC_DUCK_TICKS - 1 {
            audio.tick(GamePhase::Playing);
        }
        assert!(audio.is_ducked());
        audio.tick(GamePhase::Playing);
        assert!(!audio.is_ducked());
        assert_eq!(
            audio.backend().calls.last(),
            Some(&Call::Volume(NORMAL_MUSIC_VOLUME))
        );
    }

    #[test]
    fn test_second_duck_extends_window() {
        let mut audio = manager();
        audio.handle_event(&GameEvent::PlayerHurt { health: 2 });
        for _ in 0..50 {
            audio.tick(GamePhase::Playing);
        }
        audio.handle_event(&gem());
        for _ in 0..MUSIC_DUCK_TICKS - 1 {
            audio.tick(GamePhase::Playing);
        }
        assert!(audio.is_ducked());
        let lowered = audio
            .backend()
            .calls
            .iter()
            .filter(|c| **c == Call::Volume(LOWERED_MUSIC_VOLUME))
            .count();
        assert_eq!(lowered, 1);
    }

    #[test]
    fn test_sound_off_drops_effects_but_keeps_music() {
        let mut audio = manager();
        audio.toggle_sound();
        audio.handle_event(&GameEvent::Select);
        audio.handle_event(&gem());
        for _ in 0..GEM_ECHO_TICKS {
            audio.tick(GamePhase::Playing);
        }
        assert!(
            !audio
                .backend()
                .calls
                .iter()
                .any(|c| matches!(c, Call::Effect(_)))
        );
        assert!(audio.is_music_playing());
    }

    #[test]
    fn test_game_over_stops_music_until_menu() {
        let mut audio = manager();
        audio.handle_event(&GameEvent::GameOver);
        audio.tick(GamePhase::GameOver);
        assert_eq!(
            audio.backend().calls,
            vec![Call::Effect(SoundEffect::GameOver), Call::MusicOff]
        );
        audio.tick(GamePhase::Menu);
        assert_eq!(
            audio.backend().calls[2..],
            [Call::StopEffect(SoundEffect::GameOver), Call::MusicOn]
        );
    }

    #[test]
    fn test_win_jingle_stops_once_on_dismiss() {
        let mut audio = manager();
        audio.handle_event(&GameEvent::Win);
        audio.tick(GamePhase::Win);
        audio.tick(GamePhase::Win);
        audio.tick(GamePhase::Menu);
        audio.tick(GamePhase::Menu);
        let stops: Vec<_> = audio
            .backend()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::StopEffect(_)))
            .collect();
        assert_eq!(stops, vec![&Call::StopEffect(SoundEffect::Win)]);
    }

    #[test]
    fn test_toggle_music() {
        let mut audio = manager();
        assert!(!audio.toggle_music());
        audio.tick(GamePhase::Playing);
        assert!(!audio.is_music_playing());
        assert!(audio.toggle_music());
        assert!(audio.is_music_playing());
        assert_eq!(
            audio.into_backend().calls,
            vec![
                Call::Effect(SoundEffect::Select),
                Call::MusicOff,
                Call::Effect(SoundEffect::Select),
                Call::MusicOn,
            ]
        );
    }

    #[test]
    fn test_toggle_sound_clicks_only_when_turned_on() {
        let mut audio = manager();
        assert!(!audio.toggle_sound());
        assert!(audio.backend().calls.is_empty());
        assert!(audio.toggle_sound());
        assert_eq!(
            audio.backend().calls,
            vec![Call::Effect(SoundEffect::Select)]
        );
    }
}
