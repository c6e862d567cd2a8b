use rigolscope::{Channel, DEFAULT_DEVICE_PATH};

fn main() -> rigolscope::Result<()> {
    env_logger::init();
    let device_path = std::env::args().nth(1).unwrap_or(DEFAULT_DEVICE_PATH.to_owned());

    let mut scope = rigolscope::Scope::open(&device_path)?;
    println!("# connected to: {}", scope.identity());
    println!("trigger status: {}", scope.trigger_status());
    match scope.wave_points_mode() {
        Ok(mode) => println!("points mode:    {:?}", mode),
        Err(error) => println!("points mode:    {}", error),
    }
    println!("timebase:       {:e} s/div, offset {:e} s", scope.time_scale()?, scope.time_offset()?);
    for channel in Channel::ALL {
        println!("{}:          {:e} V/div, offset {:e} V",
            channel, scope.volt_scale(channel)?, scope.volt_offset(channel)?);
    }

    scope.stop()?;
    let raw = scope.read_waveform(Channel::Ch1);
    println!("got {} bytes, first 32 samples: {:02X?}",
        raw.as_bytes().len(), &raw.samples()[..raw.samples().len().min(32)]);
    scope.run()?;

    scope.shutdown()
}
