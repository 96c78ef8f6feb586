// Cue dispatcher - Best-effort cue playback for the sequencer
// Applies enable/voice/volume settings and swallows backend failures

use super::player::{Cue, CuePlayer, NullCuePlayer};
use serde::{Deserialize, Serialize};

/// When a step with sub-iterations replays its cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CuePolicy {
    /// Cue plays once when the step is entered
    #[default]
    OncePerStep,
    /// Cue plays again at the start of every sub-iteration
    EverySubIteration,
}

/// Dispatcher settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueSettings {
    pub enabled: bool,
    pub voice_enabled: bool,
    pub volume: f32,
    pub policy: CuePolicy,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            voice_enabled: true,
            volume: 0.7,
            policy: CuePolicy::OncePerStep,
        }
    }
}

/// Wraps a `CuePlayer` so that cue playback can never fail the sequencer
pub struct CueDispatcher {
    player: Box<dyn CuePlayer>,
    settings: CueSettings,
    played: u64,
    failed: u64,
}

impl CueDispatcher {
    /// Create a dispatcher around a player
    pub fn new(player: Box<dyn CuePlayer>, settings: CueSettings) -> Self {
        let mut dispatcher = Self {
            player,
            settings,
            played: 0,
            failed: 0,
        };
        dispatcher.set_volume(settings.volume);
        dispatcher
    }

    /// Dispatcher that never produces sound
    pub fn silent() -> Self {
        Self::new(Box::new(NullCuePlayer), CueSettings::default())
    }

    /// Play a cue identifier, best-effort
    ///
    /// Returns true if the player accepted the cue.
    pub fn play(&mut self, cue_id: &str) -> bool {
        if !self.settings.enabled {
            return false;
        }

        let cue = Cue::parse(cue_id);
        if cue.is_speech() && !self.settings.voice_enabled {
            tracing::trace!(%cue, "Voice disabled, skipping speech cue");
            return false;
        }

        match self.player.play(&cue, self.settings.volume) {
            Ok(()) => {
                self.played += 1;
                true
            }
            Err(e) => {
                self.failed += 1;
                tracing::warn!(%cue, error = %e, "Cue playback failed");
                false
            }
        }
    }

    /// Stop any in-flight cue
    pub fn silence(&mut self) {
        self.player.silence();
    }

    /// Current replay policy
    pub fn policy(&self) -> CuePolicy {
        self.settings.policy
    }

    /// Enable/disable all cues
    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        if !enabled {
            self.player.silence();
        }
    }

    /// Check if cues are enabled
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Enable/disable speech cues
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.settings.voice_enabled = enabled;
    }

    /// Set cue volume (0.0 to 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.settings.volume = volume.clamp(0.0, 1.0);
    }

    /// Get cue volume
    pub fn volume(&self) -> f32 {
        self.settings.volume
    }

    /// Number of cues accepted by the player
    pub fn played_count(&self) -> u64 {
        self.played
    }

    /// Number of cues the player rejected
    pub fn failed_count(&self) -> u64 {
        self.failed
    }
}

impl Default for CueDispatcher {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for CueDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueDispatcher")
            .field("settings", &self.settings)
            .field("played", &self.played)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::player::CueError;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Recorder {
        played: Arc<Mutex<Vec<(Cue, f32)>>>,
        silenced: Arc<Mutex<u32>>,
        fail: bool,
    }

    impl CuePlayer for Recorder {
        fn play(&mut self, cue: &Cue, volume: f32) -> Result<(), CueError> {
            if self.fail {
                return Err(CueError::Blocked("autoplay".into()));
            }
            self.played.lock().unwrap().push((cue.clone(), volume));
            Ok(())
        }

        fn silence(&mut self) {
            *self.silenced.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_dispatch_plays_cue() {
        let recorder = Recorder::default();
        let mut dispatcher = CueDispatcher::new(Box::new(recorder.clone()), CueSettings::default());

        assert!(dispatcher.play("inhale-sound"));
        assert_eq!(dispatcher.played_count(), 1);

        let played = recorder.played.lock().unwrap();
        assert_eq!(played[0].0, Cue::Sound("inhale-sound".into()));
        assert_eq!(played[0].1, 0.7);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut dispatcher = CueDispatcher::new(Box::new(recorder), CueSettings::default());

        assert!(!dispatcher.play("exhale-sound"));
        assert!(!dispatcher.play("exhale-sound"));
        assert_eq!(dispatcher.failed_count(), 2);
        assert_eq!(dispatcher.played_count(), 0);
    }

    #[test]
    fn test_voice_disabled_skips_speech() {
        let recorder = Recorder::default();
        let settings = CueSettings {
            voice_enabled: false,
            ..Default::default()
        };
        let mut dispatcher = CueDispatcher::new(Box::new(recorder.clone()), settings);

        assert!(!dispatcher.play("speak:Welcome"));
        assert!(dispatcher.play("hold-sound"));
        assert_eq!(recorder.played.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_disable_silences() {
        let recorder = Recorder::default();
        let mut dispatcher = CueDispatcher::new(Box::new(recorder.clone()), CueSettings::default());

        dispatcher.set_enabled(false);
        assert!(!dispatcher.is_enabled());
        assert!(!dispatcher.play("inhale-sound"));
        assert_eq!(*recorder.silenced.lock().unwrap(), 1);
    }

    #[test]
    fn test_volume_clamped() {
        let mut dispatcher = CueDispatcher::silent();
        dispatcher.set_volume(1.5);
        assert_eq!(dispatcher.volume(), 1.0);
        dispatcher.set_volume(-0.2);
        assert_eq!(dispatcher.volume(), 0.0);
    }
}
