use std::path::PathBuf;

use clap::Parser;

use rigolscope::{CaptureConfiguration, ChannelSet, Destination, DEFAULT_DEVICE_PATH};

/// Capture the on-screen waveform of a Rigol DS1000 series oscilloscope as a table of
/// time and voltage.
#[derive(Parser, Debug)]
#[command(name = "rigolscope-capture")]
#[command(version)]
struct Args {
    /// usbtmc device node of the oscilloscope
    #[arg(short, long, default_value = DEFAULT_DEVICE_PATH)]
    device: PathBuf,

    /// Channels to capture: 1, 2, 3 or both
    #[arg(short, long, default_value = "3")]
    channels: ChannelSet,

    /// Output file; blank writes to standard output
    #[arg(short, long, default_value = "")]
    output: String,
}

impl From<Args> for CaptureConfiguration {
    fn from(args: Args) -> Self {
        CaptureConfiguration {
            device_path: args.device,
            channels: args.channels,
            destination: Destination::from_name(&args.output),
        }
    }
}

fn main() -> rigolscope::Result<()> {
    env_logger::init();
    let config = CaptureConfiguration::from(Args::parse());
    log::debug!("{:?}", config);
    rigolscope::Scope::with(&config.device_path, |scope| {
        scope.write_waveform(&config.destination, config.channels)
    })
}
