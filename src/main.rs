use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::{Level, info};

mod config;
mod events;
mod logging;
mod system;
mod volume;

use config::Config;
use system::BackendKind;
use volume::{DynVolumeBridge, RingerMode, SetVolumeOptions, StreamType};

#[derive(Parser)]
#[command(name = "volume-bridge")]
#[command(about = "Cross-platform bridge for device volume and ringer/silent state")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current silent status, ringer mode and volumes
    Status,
    /// Print the normalized volume of a stream
    GetVolume {
        /// Stream to read (music, call, system, ring, alarm, notification)
        #[arg(short, long, default_value = "music")]
        stream: String,
    },
    /// Set the normalized volume of a stream
    SetVolume {
        /// Volume between 0.0 and 1.0
        value: f64,
        /// Stream to change
        #[arg(short, long, default_value = "music")]
        stream: String,
        /// Play a feedback sound
        #[arg(long)]
        play_sound: bool,
        /// Show the system volume UI
        #[arg(long)]
        show_ui: bool,
    },
    /// Print the current ringer mode
    GetRingerMode,
    /// Set the ringer mode (0 = silent, 1 = vibrate, 2 = normal)
    SetRingerMode { mode: i32 },
    /// Watch ringer, volume and mute-switch change events
    Watch,
    /// Validate configuration file
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _guard = logging::initialize_logging(logging::LoggingConfig {
        level,
        ..Default::default()
    })?;

    info!("Starting volume bridge");

    let config = Config::load(cli.config.as_deref())?;
    info!("Configuration loaded successfully");

    let bridge = DynVolumeBridge::for_host(BackendKind::Auto)?;
    bridge.set_volume_category(config.monitor.volume_stream);
    bridge.set_silence_check_interval(config.monitor.silence_check_interval());
    bridge.show_native_volume_ui(config.monitor.show_native_volume_ui)?;

    match cli.command {
        Some(Commands::Status) | None => show_status(&bridge)?,
        Some(Commands::GetVolume { stream }) => {
            let stream = parse_stream(&stream)?;
            let result = bridge.get_volume(stream)?;
            println!("{stream}: {:.2}", result.volume);
        }
        Some(Commands::SetVolume {
            value,
            stream,
            play_sound,
            show_ui,
        }) => {
            let stream = parse_stream(&stream)?;
            bridge.set_volume(
                value,
                SetVolumeOptions {
                    play_sound,
                    stream,
                    show_ui,
                },
            )?;
            println!("Set {stream} volume to {:.2}", value.clamp(0.0, 1.0));
        }
        Some(Commands::GetRingerMode) => match bridge.get_ringer_mode()? {
            Some(mode) => println!("Ringer mode: {mode} ({})", mode.as_raw()),
            None => println!("Ringer mode: not supported on this host"),
        },
        Some(Commands::SetRingerMode { mode }) => {
            let requested = parse_ringer_mode(mode)?;
            match bridge.set_ringer_mode(requested)? {
                Some(applied) if applied == requested => println!("Ringer mode set to {applied}"),
                Some(applied) => println!("Requested {requested}, OS applied {applied}"),
                None => println!("Ringer mode: not supported on this host"),
            }
        }
        Some(Commands::Watch) => watch(&bridge).await?,
        Some(Commands::CheckConfig) => check_config(&config)?,
    }

    Ok(())
}

fn show_status(bridge: &DynVolumeBridge) -> Result<()> {
    println!("Capabilities: {:?}", bridge.capabilities());

    match bridge.silent_status()? {
        Some(status) => println!("Silent status: {status}"),
        None => println!("Silent status: not supported on this host"),
    }

    match bridge.get_ringer_mode()? {
        Some(mode) => println!("Ringer mode: {mode}"),
        None => println!("Ringer mode: not supported on this host"),
    }
    println!("Can modify ringer: {}", bridge.can_modify_ringer());

    let result = bridge.get_volume(StreamType::Music)?;
    println!("Volume: {:.2}", result.volume);
    for (name, value) in [
        ("music", result.music),
        ("call", result.call),
        ("system", result.system),
        ("ring", result.ring),
        ("alarm", result.alarm),
        ("notification", result.notification),
    ] {
        if let Some(value) = value {
            println!("  {name}: {value:.2}");
        }
    }

    Ok(())
}

async fn watch(bridge: &DynVolumeBridge) -> Result<()> {
    println!("Watching for volume, ringer and mute-switch changes");
    println!("Press Ctrl+C to stop");

    let volume_sub = bridge.add_volume_listener(|event| {
        println!("volume: {} -> {:.2}", event.stream, event.volume);
    });
    let ringer_sub = bridge.add_ringer_listener(|status| {
        println!("ringer: {status}");
    });
    let silent_sub = bridge.add_silent_listener(|status| {
        println!(
            "mute switch: muted={} initial={}",
            status.is_muted, status.initial_query
        );
    });

    let poller = bridge.spawn_mute_switch_poller();

    tokio::signal::ctrl_c().await?;
    println!("Watch stopped");

    volume_sub.remove();
    ringer_sub.remove();
    silent_sub.remove();
    poller.abort();

    Ok(())
}

fn check_config(config: &Config) -> Result<()> {
    println!("Configuration validation:");
    println!("  ✓ Configuration file parsed successfully");
    println!("  ✓ Log level: {}", config.general.log_level);
    println!(
        "  ✓ Silence check interval: {:?}",
        config.monitor.silence_check_interval()
    );
    match config.monitor.volume_stream {
        Some(stream) => println!("  ✓ Volume events filtered to: {stream}"),
        None => println!("  ✓ Volume events: all streams"),
    }

    Ok(())
}

fn parse_stream(value: &str) -> Result<StreamType> {
    match value {
        "music" => Ok(StreamType::Music),
        "call" => Ok(StreamType::Call),
        "system" => Ok(StreamType::System),
        "ring" => Ok(StreamType::Ring),
        "alarm" => Ok(StreamType::Alarm),
        "notification" => Ok(StreamType::Notification),
        other => Err(anyhow!("Unknown stream type: {other}")),
    }
}

fn parse_ringer_mode(raw: i32) -> Result<RingerMode> {
    RingerMode::from_raw(raw)
        .ok_or_else(|| anyhow!("Invalid ringer mode {raw} (expected 0, 1 or 2)"))
}
