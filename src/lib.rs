//! Reads HYT221/HYT271 humidity and temperature sensors attached to a Linux I2C bus.
//!
//! The bus is found either by its device name (`i2c-1`) or by the label the kernel exposes in
//! `/sys/class/i2c-dev/*/name` (`bcm2708_i2c.1`), see [`resolver`]. [`Hyt`] then runs the
//! trigger, wait and read cycle and decodes the frame into a [`Reading`].

pub mod address;
mod bus;
pub mod cli;
pub mod delay;
mod error;
pub mod resolver;
pub mod sensor;
pub mod sysfs;


pub use address::SlaveAddress;
pub use bus::*;
pub use error::*;
pub use resolver::BusSelector;
pub use sensor::{Frame, Hyt, Reading};
pub use i2c;
