use std::ffi::OsString;
use std::io::{Read, Write};
use std::time::Duration;

use clap::Parser;
use embedded_hal::delay::DelayNs;

use crate::address::SlaveAddress;
use crate::delay;
use crate::resolver::{self, BusSelector};
use crate::sensor::{Hyt, Reading};
use crate::sysfs::I2cSystem;
use crate::{Error, Result};

pub const USAGE: &str =
    "usage: hyt-read [-h] [-T|-H] [-i interval] [-b bus name | device] [slave address]";

/// Reads a HYT221/HYT271 humidity and temperature sensor.
#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(name = "hyt-read", disable_help_flag = true)]
pub struct Cli {
    /// I2C bus, by label (as in /sys/class/i2c-dev/*/name) or device name
    #[arg(short = 'b', value_name = "NAME")]
    pub bus: Option<String>,

    /// Repeat every SECONDS seconds; 0 reads once
    #[arg(short = 'i', value_name = "SECONDS", default_value_t = 0)]
    pub interval: u64,

    /// Print the temperature only
    #[arg(short = 'T')]
    pub temperature: bool,

    /// Print the humidity only
    #[arg(short = 'H')]
    pub humidity: bool,

    /// Print usage
    #[arg(short = 'h')]
    pub help: bool,

    /// [device] [slave address]
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Which values go on each output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub humidity: bool,
    pub temperature: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            humidity: true,
            temperature: true,
        }
    }
}

impl Output {
    /// Formats the selected values of `reading`, humidity first, with six decimals each.
    pub fn format(&self, reading: &Reading) -> String {
        let mut fields = Vec::with_capacity(2);
        if self.humidity {
            fields.push(format!("{:.6}", reading.humidity));
        }
        if self.temperature {
            fields.push(format!("{:.6}", reading.temperature));
        }
        fields.join(" ")
    }
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub selector: BusSelector,
    pub address: SlaveAddress,
    /// `None` reads once.
    pub interval: Option<Duration>,
    pub output: Output,
}

impl Cli {
    /// Checks the arguments and turns them into [`Settings`]. Nothing is opened yet.
    pub fn settings(&self) -> Result<Settings> {
        let mut args = self.args.iter();

        let selector = match &self.bus {
            Some(name) => BusSelector::Label(name.clone()),
            None => BusSelector::Device(args.next().ok_or(Error::MissingBus)?.clone()),
        };

        let address = match args.next() {
            Some(s) => s.parse()?,
            None => SlaveAddress::default(),
        };

        if let Some(extra) = args.next() {
            return Err(Error::UnexpectedArgument(extra.clone()));
        }

        // -T and -H narrow the output; giving both is the same as giving neither
        let output = if self.temperature || self.humidity {
            Output {
                humidity: self.humidity,
                temperature: self.temperature,
            }
        } else {
            Output::default()
        };

        Ok(Settings {
            selector,
            address,
            interval: (self.interval > 0).then(|| Duration::from_secs(self.interval)),
            output,
        })
    }
}

/// Opens the bus, configures the sensor and prints readings to `out`.
///
/// Returns after a single reading when no interval is set. Otherwise it keeps reading until an
/// error occurs. The bus is closed before returning.
pub fn run<S, D, W>(settings: &Settings, system: &S, delay: D, out: &mut W) -> Result<()>
where
    S: I2cSystem,
    S::Bus: i2c::Address<Error = std::io::Error> + Read + Write,
    D: DelayNs,
    W: Write,
{
    let bus = resolver::resolve(system, &settings.selector)?;
    log::debug!("using {} at {}", settings.selector, settings.address);

    let mut hyt = Hyt::new(bus, delay);
    hyt.configure(settings.address)?;

    loop {
        let reading = hyt.take_reading()?;
        writeln!(out, "{}", settings.output.format(&reading)).map_err(Error::Output)?;
        out.flush().map_err(Error::Output)?;

        match settings.interval {
            None => return Ok(()),
            Some(interval) => delay::sleep(hyt.delay_mut(), interval),
        }
    }
}

/// Exit status of a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status of every failure: usage errors, bad arguments, OS and sensor errors.
pub const EXIT_FAILURE: i32 = 1;

/// The whole command: parses `args` (program name first), runs, and reports problems on `err`.
/// Returns the process exit status.
pub fn execute<I, T, S, D, W, E>(
    args: I,
    system: &S,
    delay: D,
    out: &mut W,
    err: &mut E,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    S: I2cSystem,
    S::Bus: i2c::Address<Error = std::io::Error> + Read + Write,
    D: DelayNs,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = write!(err, "{e}");
            return EXIT_FAILURE;
        }
    };
    if cli.help {
        let _ = writeln!(err, "{USAGE}");
        return EXIT_FAILURE;
    }

    match cli.settings().and_then(|settings| run(&settings, system, delay, out)) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "{e}");
            if matches!(e, Error::MissingBus | Error::UnexpectedArgument(_)) {
                let _ = writeln!(err, "{USAGE}");
            }
            log::debug!("{e:?} ({:?})", e.kind());
            EXIT_FAILURE
        }
    }
}
