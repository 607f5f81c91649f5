use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::unix::ffi::OsStrExt;

use crate::sysfs::I2cSystem;
use crate::{Error, Result};

/// How the user named the bus to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusSelector {
    /// A device file name under `/dev`, e.g. `i2c-1`.
    Device(String),
    /// A bus label as found in `/sys/class/i2c-dev/*/name`, e.g. `bcm2708_i2c.1`.
    Label(String),
}

impl fmt::Display for BusSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusSelector::Device(name) => write!(f, "device {name}"),
            BusSelector::Label(label) => write!(f, "bus {label}"),
        }
    }
}

/// Opens the bus named by `selector`. Labels are looked up afresh on every call.
pub fn resolve<S: I2cSystem>(system: &S, selector: &BusSelector) -> Result<S::Bus> {
    match selector {
        BusSelector::Device(name) => system.open_bus(OsStr::new(name)),
        BusSelector::Label(label) => {
            let device = find_bus(system, label)?;
            system.open_bus(&device)
        }
    }
}

/// Returns the device name of the first bus whose `name` file holds `label`.
///
/// Entries are visited in the order the system lists them, so if several buses carry the same
/// label, which one wins is unspecified. A `name` file without a token never matches. When no
/// label matches, an entry that is itself called `label` is accepted, so kernel device names
/// such as `i2c-1` work as well. Entry names are compared as bytes and need not be UTF-8.
pub fn find_bus<S: I2cSystem>(system: &S, label: &str) -> Result<OsString> {
    let mut same_name = None;
    for entry in system.bus_entries()? {
        if entry.as_bytes().first() == Some(&b'.') {
            continue;
        }

        let contents = system.bus_name(&entry)?;
        match first_token(&contents) {
            Some(token) if token == label.as_bytes() => {
                log::debug!("bus {label} is {}", entry.to_string_lossy());
                return Ok(entry);
            }
            Some(token) => log::trace!(
                "{} is {}, not {label}",
                entry.to_string_lossy(),
                String::from_utf8_lossy(token)
            ),
            None => log::debug!(
                "ignoring {}: name file has no usable contents",
                entry.to_string_lossy()
            ),
        }

        if same_name.is_none() && entry == label {
            same_name = Some(entry);
        }
    }

    match same_name {
        Some(entry) => {
            log::debug!(
                "no bus labelled {label}, using device {}",
                entry.to_string_lossy()
            );
            Ok(entry)
        }
        None => Err(Error::BusNotFound(label.into())),
    }
}

/// First whitespace-delimited token, if there is one.
fn first_token(contents: &[u8]) -> Option<&[u8]> {
    let is_space = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r');
    let start = contents.iter().position(|b| !is_space(b))?;
    let rest = &contents[start..];
    let end = rest.iter().position(is_space).unwrap_or(rest.len());
    Some(&rest[..end])
}
