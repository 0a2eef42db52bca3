use serde::{Deserialize, Serialize};
use std::fmt;

/// Device-wide audio policy as reported by the OS.
///
/// The numeric values follow the platform contract (0 = silent, 1 = vibrate,
/// 2 = normal) so they survive round-trips through the CLI and config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingerMode {
    Silent,
    Vibrate,
    Normal,
}

impl RingerMode {
    /// Map a raw platform integer to a ringer mode.
    ///
    /// Unknown values return `None`; `classifier::classify_raw` turns those
    /// into the defensive audible-normal verdict without inspecting volume.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(RingerMode::Silent),
            1 => Some(RingerMode::Vibrate),
            2 => Some(RingerMode::Normal),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> i32 {
        match self {
            RingerMode::Silent => 0,
            RingerMode::Vibrate => 1,
            RingerMode::Normal => 2,
        }
    }
}

impl fmt::Display for RingerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingerMode::Silent => write!(f, "silent"),
            RingerMode::Vibrate => write!(f, "vibrate"),
            RingerMode::Normal => write!(f, "normal"),
        }
    }
}

/// Semantic classification of the device's audible state.
///
/// `Muted` is distinct from `Silent`: the ringer mode is still normal but the
/// media stream volume is effectively inaudible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Silent,
    Vibrate,
    Normal,
    Muted,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Silent => write!(f, "SILENT"),
            Mode::Vibrate => write!(f, "VIBRATE"),
            Mode::Normal => write!(f, "NORMAL"),
            Mode::Muted => write!(f, "MUTED"),
        }
    }
}

/// Result of one classification pass: is the device effectively silenced,
/// and which mode produced that verdict. Created fresh on every call,
/// never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilentStatus {
    pub status: bool,
    pub mode: Mode,
}

impl fmt::Display for SilentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            if self.status { "silenced" } else { "audible" },
            self.mode
        )
    }
}

/// Hardware mute-switch observation delivered by the poll-based notifier.
///
/// `initial_query` is true exactly once per observation session: the first
/// event delivered after observation (re)starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteSwitchStatus {
    pub is_muted: bool,
    pub initial_query: bool,
}

/// Audio session category, mirroring the platform session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCategory {
    Ambient,
    SoloAmbient,
    Playback,
    Record,
    PlayAndRecord,
    MultiRoute,
}

impl fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Audio session mode refining the active category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    Default,
    VoiceChat,
    VideoChat,
    GameChat,
    Measurement,
    MoviePlayback,
    SpokenAudio,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-category volume stream. Backends without graded streams treat every
/// variant as the single device volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Music,
    Call,
    System,
    Ring,
    Alarm,
    Notification,
}

impl StreamType {
    pub const ALL: [StreamType; 6] = [
        StreamType::Music,
        StreamType::Call,
        StreamType::System,
        StreamType::Ring,
        StreamType::Alarm,
        StreamType::Notification,
    ];
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamType::Music => write!(f, "music"),
            StreamType::Call => write!(f, "call"),
            StreamType::System => write!(f, "system"),
            StreamType::Ring => write!(f, "ring"),
            StreamType::Alarm => write!(f, "alarm"),
            StreamType::Notification => write!(f, "notification"),
        }
    }
}

/// Normalized volume snapshot. `volume` is always present (0.0..=1.0); the
/// per-stream breakdown is populated only by backends with graded streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeResult {
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<f64>,
}

impl VolumeResult {
    /// Neutral default for backends without an addressable volume.
    pub fn neutral() -> Self {
        Self {
            volume: 1.0,
            music: None,
            call: None,
            system: None,
            ring: None,
            alarm: None,
            notification: None,
        }
    }

    pub fn set_stream(&mut self, stream: StreamType, value: f64) {
        match stream {
            StreamType::Music => self.music = Some(value),
            StreamType::Call => self.call = Some(value),
            StreamType::System => self.system = Some(value),
            StreamType::Ring => self.ring = Some(value),
            StreamType::Alarm => self.alarm = Some(value),
            StreamType::Notification => self.notification = Some(value),
        }
    }
}

/// One volume-change event as delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeEvent {
    pub volume: f64,
    pub stream: StreamType,
}

/// Options for `set_volume`. Defaults match the platform contract:
/// no feedback sound, music stream, no system volume UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetVolumeOptions {
    pub play_sound: bool,
    pub stream: StreamType,
    pub show_ui: bool,
}

impl Default for SetVolumeOptions {
    fn default() -> Self {
        Self {
            play_sound: false,
            stream: StreamType::Music,
            show_ui: false,
        }
    }
}
