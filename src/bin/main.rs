use humidity_monitors::{Catalog, Driver, SvgPlot};
use std::{io, path::PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "humidity-plot",
    about = "Plotting temperature & humidity log files"
)]
struct Opt {
    /// Path to the "<YYYY-MM-DD> humiditydata.txt" files directory
    #[structopt(long, default_value = ".")]
    path: PathBuf,
    /// Charts directory
    #[structopt(short, long, default_value = ".")]
    output: PathBuf,
    /// Program to open the charts with, waits for it to exit before the next command
    #[structopt(short, long)]
    viewer: Option<String>,
    /// Directory to also save the plotted data to, as CSV files
    #[structopt(long)]
    csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opt = Opt::from_args();
    log::debug!("{:?}", opt);

    let catalog = Catalog::discover(&opt.path)?;

    let mut plotter = SvgPlot::default().output_dir(&opt.output);
    if let Some(viewer) = opt.viewer {
        plotter = plotter.viewer(viewer);
    }
    let stdin = io::stdin();
    let mut driver = Driver::new(&catalog, stdin.lock(), io::stdout(), plotter);
    if let Some(csv) = opt.csv {
        driver = driver.export(csv);
    }
    driver.run()?;

    Ok(())
}
