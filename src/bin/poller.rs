use humidity_monitors::sensor::{parse_interval, Bme680Sensor, Poller};
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::PathBuf,
    sync::mpsc,
    time::Duration,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "humidity-poller",
    about = "Displays date, time, temperature, and humidity from a BME680 sensor"
)]
struct Opt {
    /// I2C bus device
    #[structopt(short, long, default_value = "/dev/i2c-1")]
    device: PathBuf,
    /// Polling interval [s], at least 1
    #[structopt(short, long, default_value = "30", parse(try_from_str = parse_interval))]
    interval: Duration,
    /// Appends the readings to this file instead of the standard output
    #[structopt(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })?;
    log::info!("Press Ctrl+C to exit");

    let sensor = Bme680Sensor::open(&opt.device)?;
    let out: Box<dyn Write> = match &opt.output {
        Some(path) => Box::new(OpenOptions::new().create(true).append(true).open(path)?),
        None => Box::new(io::stdout()),
    };
    log::info!("Data sensing");
    Poller::new(sensor)
        .interval(opt.interval)
        .run(out, &rx)?;
    log::info!("Bye");

    Ok(())
}
