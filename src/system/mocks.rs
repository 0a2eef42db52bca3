use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::system::traits::{AudioSystemInterface, Capabilities, FileSystemInterface};
use crate::volume::{RingerMode, SessionCategory, SessionMode, StreamType};

type RingerCallback = Box<dyn Fn() + Send + Sync>;
type VolumeCallback = Box<dyn Fn(StreamType) + Send + Sync>;

/// Mock audio system for testing - fully controllable volume/ringer state.
///
/// Holds at most one ringer callback and one volume callback, matching the
/// single-slot contract of the production backends: a second registration
/// fails the same way a duplicate OS receiver registration would.
pub struct MockAudioSystem {
    pub capabilities: Arc<Mutex<Capabilities>>,
    pub ringer_mode: Arc<Mutex<RingerMode>>,
    /// Mode the backend actually applies on set, when different from the
    /// requested one (simulates missing Do-Not-Disturb access).
    pub applied_ringer_override: Arc<Mutex<Option<RingerMode>>>,
    pub volumes: Arc<Mutex<HashMap<StreamType, (u32, u32)>>>,
    pub mute_switch: Arc<Mutex<bool>>,
    pub native_ui_enabled: Arc<Mutex<bool>>,
    pub session_active: Arc<Mutex<bool>>,
    pub session_category: Arc<Mutex<Option<(SessionCategory, bool)>>>,
    pub session_mode: Arc<Mutex<Option<SessionMode>>>,
    pub silence_mode_playback: Arc<Mutex<bool>>,
    pub ringer_access_requests: Arc<Mutex<u32>>,
    ringer_callback: Arc<Mutex<Option<RingerCallback>>>,
    volume_callback: Arc<Mutex<Option<VolumeCallback>>>,
    pub ringer_register_calls: Arc<Mutex<u32>>,
    pub ringer_deregister_calls: Arc<Mutex<u32>>,
    pub set_volume_calls: Arc<Mutex<Vec<(StreamType, u32, bool, bool)>>>,
    pub should_fail_registration: Arc<Mutex<bool>>,
}

impl MockAudioSystem {
    /// Mock with every capability, a 7/15 music volume, normal ringer mode.
    pub fn new() -> Self {
        let mut volumes = HashMap::new();
        for stream in StreamType::ALL {
            volumes.insert(stream, (7, 15));
        }

        Self {
            capabilities: Arc::new(Mutex::new(Capabilities {
                stream_volume: true,
                ringer_mode: true,
                mute_switch: true,
                can_modify_ringer: true,
                audio_session: true,
            })),
            ringer_mode: Arc::new(Mutex::new(RingerMode::Normal)),
            applied_ringer_override: Arc::new(Mutex::new(None)),
            volumes: Arc::new(Mutex::new(volumes)),
            mute_switch: Arc::new(Mutex::new(false)),
            native_ui_enabled: Arc::new(Mutex::new(true)),
            session_active: Arc::new(Mutex::new(false)),
            session_category: Arc::new(Mutex::new(None)),
            session_mode: Arc::new(Mutex::new(None)),
            silence_mode_playback: Arc::new(Mutex::new(false)),
            ringer_access_requests: Arc::new(Mutex::new(0)),
            ringer_callback: Arc::new(Mutex::new(None)),
            volume_callback: Arc::new(Mutex::new(None)),
            ringer_register_calls: Arc::new(Mutex::new(0)),
            ringer_deregister_calls: Arc::new(Mutex::new(0)),
            set_volume_calls: Arc::new(Mutex::new(Vec::new())),
            should_fail_registration: Arc::new(Mutex::new(false)),
        }
    }

    /// Mock that reports no capabilities at all (unsupported platform).
    pub fn unsupported() -> Self {
        let mock = Self::new();
        *mock.capabilities.lock().unwrap() = Capabilities::default();
        mock
    }

    /// Clone sharing all interior state, so tests can keep a control handle
    /// after handing the mock to a monitor.
    pub fn handle(&self) -> Self {
        Self {
            capabilities: self.capabilities.clone(),
            ringer_mode: self.ringer_mode.clone(),
            applied_ringer_override: self.applied_ringer_override.clone(),
            volumes: self.volumes.clone(),
            mute_switch: self.mute_switch.clone(),
            native_ui_enabled: self.native_ui_enabled.clone(),
            session_active: self.session_active.clone(),
            session_category: self.session_category.clone(),
            session_mode: self.session_mode.clone(),
            silence_mode_playback: self.silence_mode_playback.clone(),
            ringer_access_requests: self.ringer_access_requests.clone(),
            ringer_callback: self.ringer_callback.clone(),
            volume_callback: self.volume_callback.clone(),
            ringer_register_calls: self.ringer_register_calls.clone(),
            ringer_deregister_calls: self.ringer_deregister_calls.clone(),
            set_volume_calls: self.set_volume_calls.clone(),
            should_fail_registration: self.should_fail_registration.clone(),
        }
    }

    /// Change the ringer mode and fire the broadcast callback if registered.
    pub fn set_mock_ringer_mode(&self, mode: RingerMode) {
        *self.ringer_mode.lock().unwrap() = mode;
        self.trigger_ringer_change();
    }

    /// Set a stream's (current, max) volume without firing callbacks.
    pub fn set_mock_volume(&self, stream: StreamType, current: u32, max: u32) {
        self.volumes.lock().unwrap().insert(stream, (current, max));
    }

    /// Flip the mute switch sample returned to pollers.
    pub fn set_mock_mute_switch(&self, engaged: bool) {
        *self.mute_switch.lock().unwrap() = engaged;
    }

    /// Fire the registered ringer callback, if any.
    pub fn trigger_ringer_change(&self) {
        let callback = self.ringer_callback.lock().unwrap();
        if let Some(callback) = callback.as_ref() {
            callback();
        }
    }

    /// Fire the registered volume callback for a stream, if any.
    pub fn trigger_volume_change(&self, stream: StreamType) {
        let callback = self.volume_callback.lock().unwrap();
        if let Some(callback) = callback.as_ref() {
            callback(stream);
        }
    }

    pub fn is_ringer_listener_registered(&self) -> bool {
        self.ringer_callback.lock().unwrap().is_some()
    }

    pub fn is_volume_listener_registered(&self) -> bool {
        self.volume_callback.lock().unwrap().is_some()
    }

    /// Configure the mock to fail listener registration.
    pub fn set_registration_failure(&self, should_fail: bool) {
        *self.should_fail_registration.lock().unwrap() = should_fail;
    }

    pub fn get_set_volume_calls(&self) -> Vec<(StreamType, u32, bool, bool)> {
        self.set_volume_calls.lock().unwrap().clone()
    }
}

impl AudioSystemInterface for MockAudioSystem {
    fn capabilities(&self) -> Capabilities {
        *self.capabilities.lock().unwrap()
    }

    fn stream_volume(&self, stream: StreamType) -> Result<u32> {
        Ok(self
            .volumes
            .lock()
            .unwrap()
            .get(&stream)
            .map(|(current, _)| *current)
            .unwrap_or(0))
    }

    fn stream_max_volume(&self, stream: StreamType) -> Result<u32> {
        Ok(self
            .volumes
            .lock()
            .unwrap()
            .get(&stream)
            .map(|(_, max)| *max)
            .unwrap_or(0))
    }

    fn set_stream_volume(
        &self,
        stream: StreamType,
        level: u32,
        play_sound: bool,
        show_ui: bool,
    ) -> Result<()> {
        self.set_volume_calls
            .lock()
            .unwrap()
            .push((stream, level, play_sound, show_ui));

        let mut volumes = self.volumes.lock().unwrap();
        let max = volumes.get(&stream).map(|(_, max)| *max).unwrap_or(0);
        volumes.insert(stream, (level.min(max), max));
        Ok(())
    }

    fn ringer_mode(&self) -> Result<RingerMode> {
        Ok(*self.ringer_mode.lock().unwrap())
    }

    fn set_ringer_mode(&self, mode: RingerMode) -> Result<RingerMode> {
        let applied = (*self.applied_ringer_override.lock().unwrap()).unwrap_or(mode);
        *self.ringer_mode.lock().unwrap() = applied;
        Ok(applied)
    }

    fn mute_switch_engaged(&self) -> Result<bool> {
        Ok(*self.mute_switch.lock().unwrap())
    }

    fn add_ringer_change_listener(&self, callback: Box<dyn Fn() + Send + Sync>) -> Result<()> {
        if *self.should_fail_registration.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock registration failure"));
        }

        *self.ringer_register_calls.lock().unwrap() += 1;

        let mut slot = self.ringer_callback.lock().unwrap();
        if slot.is_some() {
            return Err(anyhow::anyhow!("Ringer listener already registered"));
        }
        *slot = Some(callback);
        Ok(())
    }

    fn remove_ringer_change_listener(&self) -> Result<()> {
        *self.ringer_deregister_calls.lock().unwrap() += 1;

        let mut slot = self.ringer_callback.lock().unwrap();
        if slot.is_none() {
            return Err(anyhow::anyhow!("Ringer listener not registered"));
        }
        *slot = None;
        Ok(())
    }

    fn add_volume_change_listener(
        &self,
        callback: Box<dyn Fn(StreamType) + Send + Sync>,
    ) -> Result<()> {
        if *self.should_fail_registration.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock registration failure"));
        }

        let mut slot = self.volume_callback.lock().unwrap();
        if slot.is_some() {
            return Err(anyhow::anyhow!("Volume listener already registered"));
        }
        *slot = Some(callback);
        Ok(())
    }

    fn remove_volume_change_listener(&self) -> Result<()> {
        let mut slot = self.volume_callback.lock().unwrap();
        if slot.is_none() {
            return Err(anyhow::anyhow!("Volume listener not registered"));
        }
        *slot = None;
        Ok(())
    }

    fn set_native_volume_ui(&self, enabled: bool) -> Result<()> {
        *self.native_ui_enabled.lock().unwrap() = enabled;
        Ok(())
    }

    fn set_session_active(&self, active: bool) -> Result<()> {
        *self.session_active.lock().unwrap() = active;
        Ok(())
    }

    fn set_session_category(
        &self,
        category: SessionCategory,
        mix_with_others: bool,
    ) -> Result<()> {
        *self.session_category.lock().unwrap() = Some((category, mix_with_others));
        Ok(())
    }

    fn set_session_mode(&self, mode: SessionMode) -> Result<()> {
        *self.session_mode.lock().unwrap() = Some(mode);
        Ok(())
    }

    fn set_playback_in_silence_mode(&self, enabled: bool) -> Result<()> {
        *self.silence_mode_playback.lock().unwrap() = enabled;
        Ok(())
    }

    fn request_ringer_access(&self) -> Result<()> {
        *self.ringer_access_requests.lock().unwrap() += 1;
        Ok(())
    }
}

impl Default for MockAudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock file system for testing - provides controllable file operations
pub struct MockFileSystem {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    pub should_fail_read: Arc<Mutex<bool>>,
    pub should_fail_write: Arc<Mutex<bool>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            should_fail_read: Arc::new(Mutex::new(false)),
            should_fail_write: Arc::new(Mutex::new(false)),
        }
    }

    /// Add a file to the mock file system
    pub fn add_file<P: AsRef<Path>>(&self, path: P, content: String) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), content);
    }

    /// Configure the mock to fail read operations
    pub fn set_read_failure(&self, should_fail: bool) {
        *self.should_fail_read.lock().unwrap() = should_fail;
    }

    /// Configure the mock to fail write operations
    pub fn set_write_failure(&self, should_fail: bool) {
        *self.should_fail_write.lock().unwrap() = should_fail;
    }

    /// Check if a file exists in the mock system
    pub fn file_exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.files
            .lock()
            .unwrap()
            .contains_key(&path.as_ref().to_path_buf())
    }
}

impl FileSystemInterface for MockFileSystem {
    fn read_config_file(&self, path: &Path) -> Result<String> {
        if *self.should_fail_read.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock read failure"));
        }

        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))
    }

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()> {
        if *self.should_fail_write.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock write failure"));
        }

        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(&path.to_path_buf())
    }

    fn create_config_dir(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}
