use anyhow::Result;
use tracing::{debug, info, warn};

use crate::system::{AudioSystemInterface, Capabilities};

use super::types::{
    RingerMode, SessionCategory, SessionMode, SetVolumeOptions, StreamType, VolumeResult,
};

/// Query/command surface over an injected audio backend.
///
/// Every operation degrades to a documented neutral result on backends
/// without the relevant capability; callers never see an "unsupported
/// platform" error from this type.
pub struct VolumeManager<A: AudioSystemInterface> {
    backend: A,
}

impl<A: AudioSystemInterface> VolumeManager<A> {
    pub fn new(backend: A) -> Self {
        Self { backend }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.backend.capabilities()
    }

    /// Normalized volume for `stream`, plus a per-stream breakdown when the
    /// backend has graded streams. Neutral `{volume: 1.0}` otherwise.
    pub fn get_volume(&self, stream: StreamType) -> Result<VolumeResult> {
        if !self.backend.capabilities().stream_volume {
            return Ok(VolumeResult::neutral());
        }

        let mut result = VolumeResult::neutral();
        result.volume = self.normalized_volume(stream)?;
        for stream in StreamType::ALL {
            result.set_stream(stream, self.normalized_volume(stream)?);
        }
        Ok(result)
    }

    /// Set a stream's volume from a normalized 0..1 value. Values outside
    /// the range are clamped. No-op on backends without stream volumes.
    pub fn set_volume(&self, value: f64, options: SetVolumeOptions) -> Result<()> {
        if !self.backend.capabilities().stream_volume {
            debug!("set_volume on backend without stream volume, ignoring");
            return Ok(());
        }

        let value = value.clamp(0.0, 1.0);
        let max = self.backend.stream_max_volume(options.stream)?;
        let level = (value * f64::from(max)).round() as u32;

        info!(
            "Setting {} volume to {}/{} (requested {:.2})",
            options.stream, level, max, value
        );
        self.backend.set_stream_volume(
            options.stream,
            level,
            options.play_sound,
            options.show_ui,
        )
    }

    /// Current ringer mode, or `None` on backends without a ringer concept.
    pub fn get_ringer_mode(&self) -> Result<Option<RingerMode>> {
        if !self.backend.capabilities().ringer_mode {
            return Ok(None);
        }
        Ok(Some(self.backend.ringer_mode()?))
    }

    /// Request a ringer mode and return the mode the OS actually applied,
    /// which is ground truth: without Do-Not-Disturb access the OS may keep
    /// or substitute another mode.
    pub fn set_ringer_mode(&self, mode: RingerMode) -> Result<Option<RingerMode>> {
        if !self.backend.capabilities().ringer_mode {
            debug!("set_ringer_mode on backend without ringer mode, ignoring");
            return Ok(None);
        }

        let applied = self.backend.set_ringer_mode(mode)?;
        if applied != mode {
            warn!("Requested ringer mode {mode} but OS applied {applied}");
        } else {
            info!("Ringer mode set to {applied}");
        }
        Ok(Some(applied))
    }

    /// Whether ringer mode writes are expected to be honored.
    pub fn can_modify_ringer(&self) -> bool {
        let capabilities = self.backend.capabilities();
        capabilities.ringer_mode && capabilities.can_modify_ringer
    }

    /// Show or hide the native volume UI.
    pub fn show_native_volume_ui(&self, enabled: bool) -> Result<()> {
        debug!("Native volume UI {}", if enabled { "enabled" } else { "disabled" });
        self.backend.set_native_volume_ui(enabled)
    }

    /// Activate or deactivate the audio session. No-op on backends without
    /// a configurable session.
    pub fn set_session_active(&self, active: bool) -> Result<()> {
        if !self.backend.capabilities().audio_session {
            debug!("set_session_active on backend without a session, ignoring");
            return Ok(());
        }
        info!("Audio session {}", if active { "activated" } else { "deactivated" });
        self.backend.set_session_active(active)
    }

    /// Configure the session category, optionally mixing with other
    /// applications' audio.
    pub fn set_session_category(
        &self,
        category: SessionCategory,
        mix_with_others: bool,
    ) -> Result<()> {
        if !self.backend.capabilities().audio_session {
            debug!("set_session_category on backend without a session, ignoring");
            return Ok(());
        }
        info!("Session category set to {category} (mix_with_others: {mix_with_others})");
        self.backend.set_session_category(category, mix_with_others)
    }

    /// Refine the active session with a mode.
    pub fn set_session_mode(&self, mode: SessionMode) -> Result<()> {
        if !self.backend.capabilities().audio_session {
            debug!("set_session_mode on backend without a session, ignoring");
            return Ok(());
        }
        info!("Session mode set to {mode}");
        self.backend.set_session_mode(mode)
    }

    /// Keep playback audible while the hardware mute switch is engaged.
    pub fn enable_in_silence_mode(&self, enabled: bool) -> Result<()> {
        if !self.backend.capabilities().audio_session {
            debug!("enable_in_silence_mode on backend without a session, ignoring");
            return Ok(());
        }
        self.backend.set_playback_in_silence_mode(enabled)
    }

    /// Ask the OS for the access needed to honor ringer mode writes.
    /// No-op when the backend has no ringer concept or already holds it.
    pub fn request_ringer_access(&self) -> Result<()> {
        let capabilities = self.backend.capabilities();
        if !capabilities.ringer_mode || capabilities.can_modify_ringer {
            return Ok(());
        }
        info!("Requesting ringer access from the OS");
        self.backend.request_ringer_access()
    }

    fn normalized_volume(&self, stream: StreamType) -> Result<f64> {
        let current = self.backend.stream_volume(stream)?;
        let max = self.backend.stream_max_volume(stream)?;
        if max == 0 {
            return Ok(0.0);
        }
        Ok(f64::from(current) / f64::from(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mocks::MockAudioSystem;

    #[test]
    fn get_volume_includes_breakdown() {
        let mock = MockAudioSystem::new();
        mock.set_mock_volume(StreamType::Music, 15, 15);
        mock.set_mock_volume(StreamType::Ring, 3, 15);
        let manager = VolumeManager::new(mock);

        let result = manager.get_volume(StreamType::Music).unwrap();
        assert!((result.volume - 1.0).abs() < 1e-9);
        assert!((result.ring.unwrap() - 0.2).abs() < 1e-9);
        assert!(result.alarm.is_some());
    }

    #[test]
    fn set_volume_scales_and_clamps() {
        let mock = MockAudioSystem::new();
        let control = mock.handle();
        let manager = VolumeManager::new(mock);

        manager.set_volume(0.5, SetVolumeOptions::default()).unwrap();
        manager
            .set_volume(
                3.0,
                SetVolumeOptions {
                    stream: StreamType::Ring,
                    play_sound: true,
                    show_ui: true,
                },
            )
            .unwrap();

        let calls = control.get_set_volume_calls();
        assert_eq!(calls[0], (StreamType::Music, 8, false, false));
        assert_eq!(calls[1], (StreamType::Ring, 15, true, true));
    }

    #[test]
    fn applied_ringer_mode_is_ground_truth() {
        let mock = MockAudioSystem::new();
        *mock.applied_ringer_override.lock().unwrap() = Some(RingerMode::Vibrate);
        let manager = VolumeManager::new(mock);

        let applied = manager.set_ringer_mode(RingerMode::Silent).unwrap();
        assert_eq!(applied, Some(RingerMode::Vibrate));
        assert_eq!(manager.get_ringer_mode().unwrap(), Some(RingerMode::Vibrate));
    }

    #[test]
    fn unsupported_backend_returns_neutral_defaults() {
        let mock = MockAudioSystem::unsupported();
        let control = mock.handle();
        let manager = VolumeManager::new(mock);

        let result = manager.get_volume(StreamType::Music).unwrap();
        assert!((result.volume - 1.0).abs() < 1e-9);
        assert!(result.music.is_none());

        manager.set_volume(0.5, SetVolumeOptions::default()).unwrap();
        assert!(control.get_set_volume_calls().is_empty());

        assert_eq!(manager.get_ringer_mode().unwrap(), None);
        assert_eq!(manager.set_ringer_mode(RingerMode::Silent).unwrap(), None);
        assert!(!manager.can_modify_ringer());
    }
}
