use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use crate::events::Subscription;
use crate::system::{AudioSystemInterface, BackendKind, Capabilities, select_backend};

use super::manager::VolumeManager;
use super::mute_switch::MuteSwitchMonitor;
use super::ringer_monitor::RingerMonitor;
use super::types::{
    MuteSwitchStatus, RingerMode, SessionCategory, SessionMode, SetVolumeOptions, SilentStatus,
    StreamType, VolumeEvent, VolumeResult,
};
use super::volume_monitor::VolumeMonitor;

/// The full bridge surface: query/command passthrough plus the three
/// change notifiers, all sharing one backend.
///
/// This is the one place backend selection happens; everything downstream
/// only sees `AudioSystemInterface`.
pub struct VolumeBridge<A: AudioSystemInterface + ?Sized + 'static> {
    manager: VolumeManager<Arc<A>>,
    ringer: RingerMonitor<Arc<A>>,
    volume: VolumeMonitor<Arc<A>>,
    mute_switch: MuteSwitchMonitor<Arc<A>>,
}

pub type DynVolumeBridge = VolumeBridge<dyn AudioSystemInterface>;

impl DynVolumeBridge {
    /// Build a bridge over the backend selected for this host.
    pub fn for_host(kind: BackendKind) -> Result<Self> {
        let backend = select_backend(kind)?;
        Ok(Self::from_shared(backend))
    }
}

impl<A: AudioSystemInterface + 'static> VolumeBridge<A> {
    pub fn new(backend: A) -> Self {
        Self::from_shared(Arc::new(backend))
    }
}

impl<A: AudioSystemInterface + ?Sized + 'static> VolumeBridge<A> {
    pub fn from_shared(backend: Arc<A>) -> Self {
        info!("Creating volume bridge (capabilities: {:?})", backend.capabilities());
        Self {
            manager: VolumeManager::new(backend.clone()),
            ringer: RingerMonitor::new(backend.clone()),
            volume: VolumeMonitor::new(backend.clone()),
            mute_switch: MuteSwitchMonitor::new(backend),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.manager.capabilities()
    }

    // Query/command passthrough

    pub fn get_volume(&self, stream: StreamType) -> Result<VolumeResult> {
        self.manager.get_volume(stream)
    }

    pub fn set_volume(&self, value: f64, options: SetVolumeOptions) -> Result<()> {
        self.manager.set_volume(value, options)
    }

    pub fn get_ringer_mode(&self) -> Result<Option<RingerMode>> {
        self.manager.get_ringer_mode()
    }

    pub fn set_ringer_mode(&self, mode: RingerMode) -> Result<Option<RingerMode>> {
        self.manager.set_ringer_mode(mode)
    }

    pub fn can_modify_ringer(&self) -> bool {
        self.manager.can_modify_ringer()
    }

    pub fn is_device_silent(&self) -> Result<Option<bool>> {
        self.ringer.is_device_silent()
    }

    pub fn silent_status(&self) -> Result<Option<SilentStatus>> {
        self.ringer.silent_status()
    }

    pub fn show_native_volume_ui(&self, enabled: bool) -> Result<()> {
        self.manager.show_native_volume_ui(enabled)
    }

    // Audio session passthrough

    pub fn set_session_active(&self, active: bool) -> Result<()> {
        self.manager.set_session_active(active)
    }

    pub fn set_session_category(
        &self,
        category: SessionCategory,
        mix_with_others: bool,
    ) -> Result<()> {
        self.manager.set_session_category(category, mix_with_others)
    }

    pub fn set_session_mode(&self, mode: SessionMode) -> Result<()> {
        self.manager.set_session_mode(mode)
    }

    pub fn enable_in_silence_mode(&self, enabled: bool) -> Result<()> {
        self.manager.enable_in_silence_mode(enabled)
    }

    pub fn request_ringer_access(&self) -> Result<()> {
        self.manager.request_ringer_access()
    }

    // Subscriptions

    pub fn add_volume_listener<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&VolumeEvent) + Send + Sync + 'static,
    {
        self.volume.subscribe(callback)
    }

    pub fn add_ringer_listener<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SilentStatus) + Send + Sync + 'static,
    {
        self.ringer.subscribe(callback)
    }

    pub fn add_silent_listener<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&MuteSwitchStatus) + Send + Sync + 'static,
    {
        self.mute_switch.subscribe(callback)
    }

    /// Restrict volume events to one stream.
    pub fn set_volume_category(&self, category: Option<StreamType>) {
        self.volume.set_category(category);
    }

    /// Adjust the mute-switch poll interval.
    pub fn set_silence_check_interval(&self, interval: Duration) {
        self.mute_switch.set_check_interval(interval);
    }

    /// Start the mute-switch poll loop on the current tokio runtime.
    pub fn spawn_mute_switch_poller(&self) -> JoinHandle<()> {
        self.mute_switch.spawn()
    }

    // Host lifecycle, fanned out to the broadcast-style monitors.

    pub fn on_host_resume(&self) {
        self.ringer.on_host_resume();
        self.volume.on_host_resume();
    }

    pub fn on_host_pause(&self) {
        self.ringer.on_host_pause();
        self.volume.on_host_pause();
    }

    pub fn on_host_destroy(&self) {
        self.ringer.on_host_destroy();
        self.volume.on_host_destroy();
    }
}
