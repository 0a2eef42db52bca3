pub mod config;
pub mod events;
pub mod logging;
pub mod system;
pub mod volume;

pub use config::Config;
pub use events::Subscription;
pub use volume::{DynVolumeBridge, VolumeBridge, VolumeManager};
