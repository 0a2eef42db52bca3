use super::types::{Mode, RingerMode, SilentStatus};

/// Classify the device's silent state from raw audio-system readings.
///
/// Silent and vibrate modes decide the answer on their own. In normal mode
/// the media stream volume is mapped through a logarithmic perceived-loudness
/// heuristic: linear volume steps near zero are treated as inaudible even
/// though the OS still reports a normal ringer mode.
///
/// Boundary rules (the raw formula is undefined here, so they are explicit):
/// - `max == 0`: no addressable volume at all, classified as muted.
/// - `current == 0`: muted, without consulting the formula.
/// - `current >= max`: full volume, never muted.
pub fn classify(mode: RingerMode, current_volume: u32, max_volume: u32) -> SilentStatus {
    match mode {
        RingerMode::Silent => SilentStatus {
            status: true,
            mode: Mode::Silent,
        },
        RingerMode::Vibrate => SilentStatus {
            status: true,
            mode: Mode::Vibrate,
        },
        RingerMode::Normal => classify_normal(current_volume, max_volume),
    }
}

/// Classify from a raw platform ringer value.
///
/// A value outside the platform contract short-circuits to the audible
/// `{false, NORMAL}` verdict without inspecting volume: an unrecognized
/// reading is not evidence enough to declare the device silenced.
pub fn classify_raw(raw: i32, current_volume: u32, max_volume: u32) -> SilentStatus {
    match RingerMode::from_raw(raw) {
        Some(mode) => classify(mode, current_volume, max_volume),
        None => SilentStatus {
            status: false,
            mode: Mode::Normal,
        },
    }
}

fn classify_normal(current_volume: u32, max_volume: u32) -> SilentStatus {
    if max_volume == 0 || current_volume == 0 {
        return SilentStatus {
            status: true,
            mode: Mode::Muted,
        };
    }

    if current_volume >= max_volume {
        return SilentStatus {
            status: false,
            mode: Mode::Normal,
        };
    }

    if perceived_loudness(current_volume, max_volume) > 0.0 {
        SilentStatus {
            status: false,
            mode: Mode::Normal,
        }
    } else {
        SilentStatus {
            status: true,
            mode: Mode::Muted,
        }
    }
}

/// Perceived-loudness fraction `1 - ln(max - current) / ln(max)`.
///
/// Only meaningful for `0 < current < max`; callers guard the boundaries.
/// Values at or below zero mean the volume is effectively inaudible.
pub fn perceived_loudness(current_volume: u32, max_volume: u32) -> f64 {
    let remaining = f64::from(max_volume - current_volume);
    1.0 - remaining.ln() / f64::from(max_volume).ln()
}
