use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::system::traits::{AudioSystemInterface, Capabilities, FileSystemInterface};
use crate::volume::{RingerMode, SessionCategory, SessionMode, StreamType};

/// Neutral backend for hosts without a native volume/ringer surface.
///
/// Every operation succeeds and returns the documented neutral default: the
/// capability model treats an absent platform as "nothing to do", never as an
/// error. Callers that need to know whether anything real happened consult
/// `capabilities()`.
pub struct NoopAudioSystem;

impl NoopAudioSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopAudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSystemInterface for NoopAudioSystem {
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn stream_volume(&self, _stream: StreamType) -> Result<u32> {
        Ok(0)
    }

    fn stream_max_volume(&self, _stream: StreamType) -> Result<u32> {
        Ok(0)
    }

    fn set_stream_volume(
        &self,
        stream: StreamType,
        level: u32,
        _play_sound: bool,
        _show_ui: bool,
    ) -> Result<()> {
        debug!("No-op backend ignoring set_stream_volume({stream}, {level})");
        Ok(())
    }

    fn ringer_mode(&self) -> Result<RingerMode> {
        Ok(RingerMode::Normal)
    }

    fn set_ringer_mode(&self, mode: RingerMode) -> Result<RingerMode> {
        debug!("No-op backend ignoring set_ringer_mode({mode})");
        Ok(mode)
    }

    fn mute_switch_engaged(&self) -> Result<bool> {
        Ok(false)
    }

    fn add_ringer_change_listener(&self, _callback: Box<dyn Fn() + Send + Sync>) -> Result<()> {
        Ok(())
    }

    fn remove_ringer_change_listener(&self) -> Result<()> {
        Ok(())
    }

    fn add_volume_change_listener(
        &self,
        _callback: Box<dyn Fn(StreamType) + Send + Sync>,
    ) -> Result<()> {
        Ok(())
    }

    fn remove_volume_change_listener(&self) -> Result<()> {
        Ok(())
    }

    fn set_native_volume_ui(&self, _enabled: bool) -> Result<()> {
        Ok(())
    }

    fn set_session_active(&self, active: bool) -> Result<()> {
        debug!("No-op backend ignoring set_session_active({active})");
        Ok(())
    }

    fn set_session_category(
        &self,
        _category: SessionCategory,
        _mix_with_others: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn set_session_mode(&self, _mode: SessionMode) -> Result<()> {
        Ok(())
    }

    fn set_playback_in_silence_mode(&self, _enabled: bool) -> Result<()> {
        Ok(())
    }

    fn request_ringer_access(&self) -> Result<()> {
        Ok(())
    }
}

/// Which backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Pick whatever the current host supports.
    Auto,
    /// Neutral no-op backend.
    Noop,
}

/// Select the audio backend once at startup.
///
/// The selection happens here and nowhere else; the rest of the crate only
/// sees `AudioSystemInterface`. Hosts embedding the library on a platform
/// with a native surface pass their own implementation instead. Requesting
/// a backend this build cannot provide fails fast with a descriptive error
/// rather than deferring the failure to first use.
pub fn select_backend(kind: BackendKind) -> Result<Arc<dyn AudioSystemInterface>> {
    match kind {
        BackendKind::Auto | BackendKind::Noop => {
            info!("Using no-op audio backend (no native volume surface on this host)");
            Ok(Arc::new(NoopAudioSystem::new()))
        }
    }
}

/// Production implementation of FileSystemInterface using std::fs
pub struct StdFileSystem;

impl FileSystemInterface for StdFileSystem {
    fn read_config_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))
    }

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_config_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create config directory: {}", path.display()))
    }
}
