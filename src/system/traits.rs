use anyhow::Result;
use std::path::Path;

use crate::volume::{RingerMode, SessionCategory, SessionMode, StreamType};

/// Capability flags reported by an audio backend. Operations gated on a
/// capability the backend lacks become neutral no-ops instead of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Graded per-stream volume (Android-style stream volumes).
    pub stream_volume: bool,
    /// Device-wide ringer mode (silent / vibrate / normal).
    pub ringer_mode: bool,
    /// Hardware mute switch readable by polling (iOS-style).
    pub mute_switch: bool,
    /// Whether ringer mode writes are expected to be honored (e.g. the host
    /// holds Do-Not-Disturb access). Reads stay available either way.
    pub can_modify_ringer: bool,
    /// Configurable audio session (iOS-style category/mode/activation).
    pub audio_session: bool,
}

/// Trait for audio system operations - abstracts the native volume/ringer
/// surface so the bridge logic can run against a real platform backend, the
/// no-op backend, or mocks.
pub trait AudioSystemInterface: Send + Sync {
    /// Report what this backend can actually do.
    fn capabilities(&self) -> Capabilities;

    /// Current volume of a stream in native steps.
    fn stream_volume(&self, stream: StreamType) -> Result<u32>;

    /// Maximum volume of a stream in native steps.
    fn stream_max_volume(&self, stream: StreamType) -> Result<u32>;

    /// Set a stream's volume in native steps, optionally playing a feedback
    /// sound or showing the system volume UI.
    fn set_stream_volume(
        &self,
        stream: StreamType,
        level: u32,
        play_sound: bool,
        show_ui: bool,
    ) -> Result<()>;

    /// Current device-wide ringer mode.
    fn ringer_mode(&self) -> Result<RingerMode>;

    /// Request a ringer mode change and return the mode actually applied.
    /// The OS may refuse the request; the return value is ground truth.
    fn set_ringer_mode(&self, mode: RingerMode) -> Result<RingerMode>;

    /// Sample the hardware mute switch. Only meaningful when the backend
    /// reports the `mute_switch` capability.
    fn mute_switch_engaged(&self) -> Result<bool>;

    /// Register the single ringer-mode-changed callback slot. Registering
    /// while already registered is a backend-level error the notifier
    /// swallows.
    fn add_ringer_change_listener(&self, callback: Box<dyn Fn() + Send + Sync>) -> Result<()>;

    /// Deregister the ringer-mode-changed callback. Removing while not
    /// registered is a backend-level error the notifier swallows.
    fn remove_ringer_change_listener(&self) -> Result<()>;

    /// Register the single volume-changed callback slot. The callback
    /// receives the stream whose volume changed.
    fn add_volume_change_listener(
        &self,
        callback: Box<dyn Fn(StreamType) + Send + Sync>,
    ) -> Result<()>;

    /// Deregister the volume-changed callback.
    fn remove_volume_change_listener(&self) -> Result<()>;

    /// Show or hide the native volume UI on subsequent volume changes.
    fn set_native_volume_ui(&self, enabled: bool) -> Result<()>;

    /// Activate or deactivate the shared audio session.
    fn set_session_active(&self, active: bool) -> Result<()>;

    /// Configure the session category, optionally mixing with audio from
    /// other applications.
    fn set_session_category(
        &self,
        category: SessionCategory,
        mix_with_others: bool,
    ) -> Result<()>;

    /// Refine the active session with a mode.
    fn set_session_mode(&self, mode: SessionMode) -> Result<()>;

    /// Keep playback audible while the hardware mute switch is engaged.
    fn set_playback_in_silence_mode(&self, enabled: bool) -> Result<()>;

    /// Ask the OS for the access needed to honor ringer mode writes.
    fn request_ringer_access(&self) -> Result<()>;
}

// Shared backends: one audio system feeds the manager and every monitor.
impl<T: AudioSystemInterface + ?Sized> AudioSystemInterface for std::sync::Arc<T> {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn stream_volume(&self, stream: StreamType) -> Result<u32> {
        (**self).stream_volume(stream)
    }

    fn stream_max_volume(&self, stream: StreamType) -> Result<u32> {
        (**self).stream_max_volume(stream)
    }

    fn set_stream_volume(
        &self,
        stream: StreamType,
        level: u32,
        play_sound: bool,
        show_ui: bool,
    ) -> Result<()> {
        (**self).set_stream_volume(stream, level, play_sound, show_ui)
    }

    fn ringer_mode(&self) -> Result<RingerMode> {
        (**self).ringer_mode()
    }

    fn set_ringer_mode(&self, mode: RingerMode) -> Result<RingerMode> {
        (**self).set_ringer_mode(mode)
    }

    fn mute_switch_engaged(&self) -> Result<bool> {
        (**self).mute_switch_engaged()
    }

    fn add_ringer_change_listener(&self, callback: Box<dyn Fn() + Send + Sync>) -> Result<()> {
        (**self).add_ringer_change_listener(callback)
    }

    fn remove_ringer_change_listener(&self) -> Result<()> {
        (**self).remove_ringer_change_listener()
    }

    fn add_volume_change_listener(
        &self,
        callback: Box<dyn Fn(StreamType) + Send + Sync>,
    ) -> Result<()> {
        (**self).add_volume_change_listener(callback)
    }

    fn remove_volume_change_listener(&self) -> Result<()> {
        (**self).remove_volume_change_listener()
    }

    fn set_native_volume_ui(&self, enabled: bool) -> Result<()> {
        (**self).set_native_volume_ui(enabled)
    }

    fn set_session_active(&self, active: bool) -> Result<()> {
        (**self).set_session_active(active)
    }

    fn set_session_category(
        &self,
        category: SessionCategory,
        mix_with_others: bool,
    ) -> Result<()> {
        (**self).set_session_category(category, mix_with_others)
    }

    fn set_session_mode(&self, mode: SessionMode) -> Result<()> {
        (**self).set_session_mode(mode)
    }

    fn set_playback_in_silence_mode(&self, enabled: bool) -> Result<()> {
        (**self).set_playback_in_silence_mode(enabled)
    }

    fn request_ringer_access(&self) -> Result<()> {
        (**self).request_ringer_access()
    }
}

/// Trait for file system operations - abstracts std::fs for testability
pub trait FileSystemInterface {
    /// Read the entire contents of a configuration file
    fn read_config_file(&self, path: &Path) -> Result<String>;

    /// Write configuration content to a file
    fn write_config_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a configuration file exists
    fn config_file_exists(&self, path: &Path) -> bool;

    /// Create the directory structure for config files
    fn create_config_dir(&self, path: &Path) -> Result<()>;
}
