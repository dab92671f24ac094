//! Interactive plotting menu
//!
//! The driver reads commands line by line and moves between 3 states:
//! [State::AwaitCommand], [State::ListSelection] and [State::Done].
//! `quit` or the end of the input is the only way to [State::Done].

use crate::{
    aggregate,
    catalog::Catalog,
    chart::{Chart, Plot},
    Error,
};
use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

const MENU: &str = "Enter: \"list\" - to plot a particular day\n\
    Leave blank - to plot the current day\n\
    \"Daily\" - to plot the daily averages\n\
    \"Hourly\" - to plot the hourly averages\n\
    \"Continuous\" - to plot every reading\n\
    \"Quit\" - to exit";

/// Menu commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Plot the most recent day
    Latest,
    /// Pick a day from the list of data files
    List,
    Daily,
    Hourly,
    Continuous,
    Quit,
}
impl Command {
    /// Parses a menu entry, unknown entries return `None`
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Some(Command::Latest);
        }
        [
            ("list", Command::List),
            ("daily", Command::Daily),
            ("hourly", Command::Hourly),
            ("continuous", Command::Continuous),
            ("quit", Command::Quit),
            ("exit", Command::Quit),
            ("q", Command::Quit),
        ]
        .into_iter()
        .find_map(|(key, command)| input.eq_ignore_ascii_case(key).then_some(command))
    }
}

/// Driver states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitCommand,
    ListSelection,
    Done,
}

/// Interactive plotting session over a data files [Catalog]
pub struct Driver<'a, R, W, P> {
    catalog: &'a Catalog,
    input: R,
    output: W,
    plotter: P,
    export: Option<PathBuf>,
    state: State,
}
impl<'a, R, W, P> Driver<'a, R, W, P>
where
    R: BufRead,
    W: Write,
    P: Plot,
{
    pub fn new(catalog: &'a Catalog, input: R, output: W, plotter: P) -> Self {
        Self {
            catalog,
            input,
            output,
            plotter,
            export: None,
            state: State::AwaitCommand,
        }
    }
    /// Also writes the plotted data as CSV files into `path`
    pub fn export<S: Into<PathBuf>>(self, path: S) -> Self {
        Self {
            export: Some(path.into()),
            ..self
        }
    }
    pub fn state(&self) -> State {
        self.state
    }
    /// Gives back the plotter and the output
    pub fn into_inner(self) -> (P, W) {
        (self.plotter, self.output)
    }
    /// Runs the session until [State::Done]
    pub fn run(&mut self) -> Result<(), Error> {
        writeln!(self.output, "{}\n", self.catalog.summary())?;
        writeln!(self.output, "{}", MENU)?;
        while self.step()? != State::Done {}
        writeln!(self.output, "Bye")?;
        Ok(())
    }
    /// Processes one input line
    pub fn step(&mut self) -> Result<State, Error> {
        self.state = match self.state {
            State::AwaitCommand => match self.prompt("Plot: ")? {
                None => State::Done,
                Some(line) => match Command::parse(&line) {
                    Some(Command::Latest) => {
                        self.day(self.catalog.len() - 1)?;
                        State::AwaitCommand
                    }
                    Some(Command::List) => {
                        for (i, file) in self.catalog.iter().enumerate() {
                            writeln!(self.output, "{}: {}", i, file)?;
                        }
                        State::ListSelection
                    }
                    Some(Command::Quit) => State::Done,
                    Some(command) => {
                        self.aggregate(command)?;
                        State::AwaitCommand
                    }
                    None => {
                        log::debug!("ignoring {:?}", line.trim());
                        State::AwaitCommand
                    }
                },
            },
            State::ListSelection => match self.prompt("Select day number: ")? {
                None => State::Done,
                Some(line) => match self.select(&line) {
                    Ok(index) => {
                        self.day(index)?;
                        State::AwaitCommand
                    }
                    Err(message) => {
                        writeln!(self.output, "{}", message)?;
                        State::ListSelection
                    }
                },
            },
            State::Done => State::Done,
        };
        Ok(self.state)
    }
    // `None` at end of input, invalid UTF-8 is replaced
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>, Error> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut buf = vec![];
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(self.output)?;
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
        }
    }
    fn select(&self, line: &str) -> Result<usize, String> {
        let line = line.trim();
        let index = line
            .parse::<usize>()
            .map_err(|e| format!("invalid day number {:?}: {}", line, e))?;
        if index < self.catalog.len() {
            Ok(index)
        } else {
            Err(format!(
                "day number {} out of range [0,{}]",
                index,
                self.catalog.len() - 1
            ))
        }
    }
    fn day(&mut self, index: usize) -> Result<(), Error> {
        let catalog = self.catalog;
        let file = &catalog[index];
        let chart = aggregate::single_day(file).map(|points| Chart::day(file, points));
        self.show(chart.map_err(Error::from))
    }
    fn aggregate(&mut self, command: Command) -> Result<(), Error> {
        let catalog = self.catalog;
        let chart = match command {
            Command::Daily => {
                aggregate::daily_average(catalog).map(|points| Chart::daily(catalog, points))
            }
            Command::Hourly => {
                aggregate::hourly_average(catalog).map(|points| Chart::hourly(catalog, points))
            }
            Command::Continuous => {
                aggregate::continuous(catalog).map(|points| Chart::continuous(catalog, points))
            }
            _ => return Ok(()),
        };
        self.show(chart.map_err(Error::from))
    }
    // a failed chart is reported and the session goes on
    fn show(&mut self, chart: Result<Chart, Error>) -> Result<(), Error> {
        match chart.and_then(|chart| self.render(&chart)) {
            Ok(path) => writeln!(self.output, "Chart: {}\n", path.display())?,
            Err(e) => {
                log::error!("{:?}", e);
                writeln!(self.output, "Plot aborted: {}\n", e.report())?;
            }
        }
        writeln!(self.output, "{}", MENU)?;
        Ok(())
    }
    fn render(&mut self, chart: &Chart) -> Result<PathBuf, Error> {
        if let Some(dir) = &self.export {
            let path = dir.join(&chart.name).with_extension("csv");
            chart.to_csv(&path)?;
            log::info!("{} data exported to {:?}", chart.title, path);
        }
        Ok(self.plotter.plot(chart)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PlotError;

    #[derive(Default)]
    struct Recorder(Vec<Chart>);
    impl Plot for Recorder {
        fn plot(&mut self, chart: &Chart) -> Result<PathBuf, PlotError> {
            self.0.push(chart.clone());
            Ok(PathBuf::from(format!("{}.svg", chart.name)))
        }
    }

    #[test]
    fn commands() {
        assert_eq!(Command::parse(""), Some(Command::Latest));
        assert_eq!(Command::parse("\n"), Some(Command::Latest));
        assert_eq!(Command::parse("List\n"), Some(Command::List));
        assert_eq!(Command::parse("list"), Some(Command::List));
        assert_eq!(Command::parse("DAILY"), Some(Command::Daily));
        assert_eq!(Command::parse("Hourly"), Some(Command::Hourly));
        assert_eq!(Command::parse("continuous"), Some(Command::Continuous));
        assert_eq!(Command::parse("Quit"), Some(Command::Quit));
        assert_eq!(Command::parse("monthly"), None);
        assert_eq!(Command::parse("7"), None);
    }

    #[test]
    fn unknown_command_then_eof() {
        let catalog = Catalog::from_names(".", ["2024-10-30 humiditydata.txt"]).unwrap();
        let mut driver = Driver::new(
            &catalog,
            "monthly\n".as_bytes(),
            Vec::new(),
            Recorder::default(),
        );
        assert_eq!(driver.step().unwrap(), State::AwaitCommand);
        assert_eq!(driver.step().unwrap(), State::Done);
        assert_eq!(driver.step().unwrap(), State::Done);
        let (recorder, _) = driver.into_inner();
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn list_selection_reprompts() {
        let catalog = Catalog::from_names(
            ".",
            ["2024-10-30 humiditydata.txt", "2024-10-31 humiditydata.txt"],
        )
        .unwrap();
        let mut driver = Driver::new(
            &catalog,
            "list\n99\nabc\nquit\n".as_bytes(),
            Vec::new(),
            Recorder::default(),
        );
        assert_eq!(driver.step().unwrap(), State::ListSelection);
        assert_eq!(driver.step().unwrap(), State::ListSelection);
        assert_eq!(driver.step().unwrap(), State::ListSelection);
        // "quit" is not a day number either
        assert_eq!(driver.step().unwrap(), State::ListSelection);
        assert_eq!(driver.step().unwrap(), State::Done);
        let (_, output) = driver.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("0: 2024-10-30 humiditydata.txt"));
        assert!(output.contains("1: 2024-10-31 humiditydata.txt"));
        assert!(output.contains("day number 99 out of range [0,1]"));
        assert!(output.contains("invalid day number \"abc\""));
    }

    #[test]
    fn invalid_utf8_is_ignored() {
        let catalog = Catalog::from_names(
            ".",
            ["2024-10-30 humiditydata.txt", "2024-10-31 humiditydata.txt"],
        )
        .unwrap();
        let mut driver = Driver::new(
            &catalog,
            &b"\xff\xfe\nlist\n\xff\nquit\n"[..],
            Vec::new(),
            Recorder::default(),
        );
        assert_eq!(driver.step().unwrap(), State::AwaitCommand);
        assert_eq!(driver.step().unwrap(), State::ListSelection);
        assert_eq!(driver.step().unwrap(), State::ListSelection);
        assert_eq!(driver.step().unwrap(), State::ListSelection);
        assert_eq!(driver.step().unwrap(), State::Done);
        let (recorder, output) = driver.into_inner();
        assert!(recorder.0.is_empty());
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("invalid day number \"\u{fffd}\""));

        let mut driver = Driver::new(
            &catalog,
            &b"\xff\xfe\nquit\n"[..],
            Vec::new(),
            Recorder::default(),
        );
        driver.run().unwrap();
        assert_eq!(driver.state(), State::Done);
    }

    #[test]
    fn missing_file_aborts_plot() {
        let dir = tempfile::tempdir().unwrap();
        let catalog =
            Catalog::from_names(dir.path(), ["2024-10-30 humiditydata.txt"]).unwrap();
        let mut driver = Driver::new(
            &catalog,
            "\nquit\n".as_bytes(),
            Vec::new(),
            Recorder::default(),
        );
        assert_eq!(driver.step().unwrap(), State::AwaitCommand);
        assert_eq!(driver.step().unwrap(), State::Done);
        let (recorder, output) = driver.into_inner();
        assert!(recorder.0.is_empty());
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("Plot aborted: failed to read"));
    }
}
