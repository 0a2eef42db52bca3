pub mod bridge;
pub mod classifier;
pub mod manager;
pub mod mute_switch;
pub mod ringer_monitor;
pub mod types;
pub mod volume_monitor;

pub use bridge::{DynVolumeBridge, VolumeBridge};
pub use classifier::{classify, classify_raw};
pub use manager::VolumeManager;
pub use mute_switch::MuteSwitchMonitor;
pub use ringer_monitor::RingerMonitor;
pub use types::{
    Mode, MuteSwitchStatus, RingerMode, SessionCategory, SessionMode, SetVolumeOptions,
    SilentStatus, StreamType, VolumeEvent, VolumeResult,
};
pub use volume_monitor::VolumeMonitor;
