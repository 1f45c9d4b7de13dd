//! Command-line control for the laser illumination board.
//!
//! Small operator tool around the adapter: list the module's devices and
//! properties, set a channel voltage, or toggle an enable line. Reaching a
//! real board requires building with the `hardware` feature; without it every
//! hardware subcommand reports the missing feature.

use anyhow::Result;
use clap::{Parser, Subcommand};

use laser_driver::adapter::{DEVICE_NAME, OFF, ON};
use laser_driver::config::AdapterConfig;
use laser_driver::device::DeviceHost;
use laser_driver::module::{self, AVAILABLE_DEVICES};

#[derive(Parser)]
#[command(name = "laserctl", version, about = "Drive the K8061 laser illumination board")]
struct Cli {
    /// Configuration file (TOML); defaults are used when absent.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the acquisition device path.
    #[arg(long)]
    device: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available devices and their properties.
    List,
    /// Set the voltage of one analog channel (1-based, as in the property names).
    SetVoltage {
        /// Channel number, 1-based.
        channel: usize,
        /// Target voltage in volts.
        volts: f64,
    },
    /// Switch one digital enable line on or off (1-based).
    Enable {
        /// Channel number, 1-based.
        channel: usize,
        /// "on" or "off".
        #[arg(value_parser = parse_switch)]
        state: bool,
    },
    /// Switch every enable line off.
    Off,
}

fn parse_switch(text: &str) -> Result<bool, String> {
    match text.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected 'on' or 'off', got '{other}'")),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AdapterConfig::load(path)?,
        None => AdapterConfig::default(),
    };
    if let Some(device) = cli.device {
        config.device_path = device;
    }
    config.validate()?;

    match cli.command {
        Command::List => {
            for descriptor in AVAILABLE_DEVICES {
                println!("{}: {}", descriptor.name, descriptor.description);
            }
            for channel in 1..=config.analog_channels {
                println!("  Voltage Analog {channel}  (0.0 .. {} V)", config.max_voltage);
            }
            for channel in 1..=config.digital_channels {
                println!("  Enable Digital {channel}  ({OFF}/{ON})");
            }
        }
        command => {
            let device = module::create_device(DEVICE_NAME, &config)?;
            let mut host = DeviceHost::new(device);
            host.initialize()?;

            match command {
                Command::List => {}
                Command::SetVoltage { channel, volts } => {
                    let name = format!("Voltage Analog {channel}");
                    host.set_property(&name, volts)?;
                    println!("{name} -> {volts} V");
                }
                Command::Enable { channel, state } => {
                    let name = format!("Enable Digital {channel}");
                    let value = if state { ON } else { OFF };
                    host.set_property(&name, value)?;
                    println!("{name} -> {value}");
                }
                Command::Off => {
                    for channel in 1..=config.digital_channels {
                        host.set_property(&format!("Enable Digital {channel}"), OFF)?;
                    }
                    println!("all enable lines off");
                }
            }

            host.shutdown()?;
        }
    }

    Ok(())
}
