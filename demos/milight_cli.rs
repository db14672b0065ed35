//! CLI application for controlling Milight lights through the Wifi bridge.
//!
//! Run with: cargo run --example milight_cli -- --help

use clap::{Parser, Subcommand};
use milight_bridge_rs::{Bridge, BridgeConfig, CommandKind, Zone};

#[derive(Parser)]
#[command(name = "milight-cli")]
#[command(about = "Control Milight lights through a Wifi bridge (LimitlessLED v6)", long_about = None)]
struct Cli {
    /// IP address of the Wifi bridge
    #[arg(short, long, global = true)]
    ip: Option<String>,

    /// UDP port of the Wifi bridge
    #[arg(short, long, global = true, default_value_t = BridgeConfig::DEFAULT_PORT)]
    port: u16,

    /// Timeout in seconds for each reply of the bridge
    #[arg(short, long, global = true, default_value_t = BridgeConfig::DEFAULT_TIMEOUT_SECS)]
    timeout: f64,

    /// Zone to control (0 for all zones, or 1 to 4)
    #[arg(short, long, global = true, default_value = "0",
          value_parser = clap::value_parser!(u8).range(0..=4))]
    zone: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the MAC address of the bridge
    MacAddress,

    /// Link lights to the zone (switch them on at most 3s before)
    Link,

    /// Unlink lights (switch them on at most 3s before)
    Unlink,

    /// Turn lights on
    On,

    /// Turn lights off
    Off,

    /// Turn the bridge lamp on
    LampOn,

    /// Turn the bridge lamp off
    LampOff,

    /// Set night mode
    NightMode,

    /// Set white mode
    WhiteMode,

    /// Set white mode on the bridge lamp
    LampWhiteMode,

    /// Speed up the disco animation
    DiscoSpeedUp,

    /// Slow down the disco animation
    DiscoSlowDown,

    /// Speed up the disco animation of the bridge lamp
    LampDiscoSpeedUp,

    /// Slow down the disco animation of the bridge lamp
    LampDiscoSlowDown,

    /// Set color (0-255, e.g. 255 red, 186 blue, 122 green)
    Color { value: i32 },

    /// Set color of the bridge lamp (0-255)
    LampColor { value: i32 },

    /// Set brightness (0-100)
    Brightness { value: i32 },

    /// Set brightness of the bridge lamp (0-100)
    LampBrightness { value: i32 },

    /// Set saturation (0-100)
    Saturation { value: i32 },

    /// Set white temperature (0 warm to 100 cool)
    Temperature { value: i32 },

    /// Set disco mode (1-9)
    DiscoMode { value: i32 },

    /// Set disco mode of the bridge lamp (1-9)
    LampDiscoMode { value: i32 },

    /// Show connection and frame history diagnostics after a handshake
    Diagnostics,
}

impl Commands {
    fn to_request(&self) -> Option<(CommandKind, i32)> {
        let request = match *self {
            Commands::MacAddress | Commands::Diagnostics => return None,
            Commands::Link => (CommandKind::Link, 0),
            Commands::Unlink => (CommandKind::Unlink, 0),
            Commands::On => (CommandKind::On, 0),
            Commands::Off => (CommandKind::Off, 0),
            Commands::LampOn => (CommandKind::LampOn, 0),
            Commands::LampOff => (CommandKind::LampOff, 0),
            Commands::NightMode => (CommandKind::NightMode, 0),
            Commands::WhiteMode => (CommandKind::WhiteMode, 0),
            Commands::LampWhiteMode => (CommandKind::LampWhiteMode, 0),
            Commands::DiscoSpeedUp => (CommandKind::DiscoSpeedUp, 0),
            Commands::DiscoSlowDown => (CommandKind::DiscoSlowDown, 0),
            Commands::LampDiscoSpeedUp => (CommandKind::LampDiscoSpeedUp, 0),
            Commands::LampDiscoSlowDown => (CommandKind::LampDiscoSlowDown, 0),
            Commands::Color { value } => (CommandKind::Color, value),
            Commands::LampColor { value } => (CommandKind::LampColor, value),
            Commands::Brightness { value } => (CommandKind::Brightness, value),
            Commands::LampBrightness { value } => (CommandKind::LampBrightness, value),
            Commands::Saturation { value } => (CommandKind::Saturation, value),
            Commands::Temperature { value } => (CommandKind::Temperature, value),
            Commands::DiscoMode { value } => (CommandKind::DiscoMode, value),
            Commands::LampDiscoMode { value } => (CommandKind::LampDiscoMode, value),
        };
        Some(request)
    }
}

fn require_mac(mac: String, ip: &str) -> Result<String, String> {
    if mac.is_empty() {
        Err(format!("No answer from the bridge at {}", ip))
    } else {
        Ok(mac)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let ip = cli
        .ip
        .ok_or("IP address is required for this command. Use --ip <IP>")?;
    let zone = Zone::try_from(cli.zone)?;

    let mut bridge = Bridge::new();
    if !bridge.setup(&ip, cli.port, cli.timeout).await {
        return Err(format!("Could not open a connection to {}:{}", ip, cli.port).into());
    }

    let outcome = match cli.command.to_request() {
        Some((kind, param)) => {
            let ok = bridge.run(kind, param, zone).await;
            println!("{}: {}", kind, if ok { "ok" } else { "failed" });
            if ok {
                Ok(())
            } else {
                Err(bridge
                    .last_error()
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| format!("{} failed", kind)))
            }
        }
        None => {
            let mac = require_mac(bridge.get_mac_address().await, &ip);
            if let Ok(mac) = &mac {
                println!("MAC address: {}", mac);
            }

            if matches!(cli.command, Commands::Diagnostics) {
                let diag = bridge.diagnostics();
                println!("\nDiagnostics:\n{}", serde_json::to_string_pretty(&diag)?);
            }
            mac.map(|_| ())
        }
    };

    bridge.close();
    Ok(outcome?)
}
