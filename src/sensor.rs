//! Measurement cycle and frame decoding for HYT221/HYT271 sensors.
//!
//! A measurement is started by writing a single byte to the sensor. After the conversion time the
//! sensor returns four bytes: two big-endian bytes of humidity followed by two big-endian bytes
//! of temperature. The top two bits of the humidity word and the bottom two bits of the
//! temperature word are status bits; both quantities span the full range of the remaining 14
//! bits.

use std::io::{Read, Write};
use std::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::address::SlaveAddress;
use crate::delay;
use crate::{Error, Result};

/// Conversion time between triggering a measurement and reading it back.
pub const SETTLE_TIME: Duration = Duration::from_millis(60);

pub const FRAME_LEN: usize = 4;

const CMD_MEASURE: u8 = 0x00;

const HUMIDITY_MASK: u16 = 0x3fff;
const TEMPERATURE_MASK: u16 = 0xfffc;
const HUMIDITY_SPAN: f64 = 100.0;
const TEMPERATURE_SPAN: f64 = 165.0;
const TEMPERATURE_OFFSET: f64 = -40.0;

/// The four bytes returned by one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame(pub [u8; FRAME_LEN]);

impl Frame {
    /// Humidity count with the status bits cleared, 0..=0x3fff.
    #[inline]
    pub fn humidity_raw(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]]) & HUMIDITY_MASK
    }

    /// Temperature count with the status bits cleared, 0..=0xfffc in steps of 4.
    #[inline]
    pub fn temperature_raw(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]]) & TEMPERATURE_MASK
    }

    /// The two status bits of the humidity word, unused by the conversion.
    pub fn humidity_status(&self) -> u8 {
        self.0[0] >> 6
    }

    /// The two status bits of the temperature word, unused by the conversion.
    pub fn temperature_status(&self) -> u8 {
        self.0[3] & 0x03
    }

    pub fn decode(&self) -> Reading {
        Reading {
            humidity: f64::from(self.humidity_raw()) * (HUMIDITY_SPAN / f64::from(HUMIDITY_MASK)),
            temperature: f64::from(self.temperature_raw())
                * (TEMPERATURE_SPAN / f64::from(TEMPERATURE_MASK))
                + TEMPERATURE_OFFSET,
        }
    }
}

impl From<[u8; FRAME_LEN]> for Frame {
    fn from(value: [u8; FRAME_LEN]) -> Self {
        Frame(value)
    }
}

/// A calibrated measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Relative humidity in percent, 0 to 100.
    pub humidity: f64,
    /// Temperature in degrees Celsius, -40 to 125.
    pub temperature: f64,
}

/// A HYT sensor on an open bus.
///
/// The bus type only needs slave address selection and plain reads and writes, so it can be an
/// [`I2cBus`](crate::I2cBus) or anything else implementing the `i2c` traits.
pub struct Hyt<B, D> {
    bus: B,
    delay: D,
}

impl<B, D> Hyt<B, D>
where
    B: i2c::Address<Error = std::io::Error> + Read + Write,
    D: DelayNs,
{
    pub fn new(bus: B, delay: D) -> Self {
        Self { bus, delay }
    }

    /// Directs all further transfers on the bus to `address`.
    pub fn configure(&mut self, address: SlaveAddress) -> Result<()> {
        self.bus
            .set_slave_address(address.get(), false)
            .map_err(Error::SetAddress)?;
        log::debug!("slave address set to {address}");
        Ok(())
    }

    /// Triggers a measurement, waits for the conversion and reads the frame back.
    pub fn read_frame(&mut self) -> Result<Frame> {
        self.bus.write(&[CMD_MEASURE]).map_err(Error::Write)?;

        delay::sleep(&mut self.delay, SETTLE_TIME);

        let mut buf = [0u8; FRAME_LEN];
        let n_read = self.bus.read(&mut buf).map_err(Error::Read)?;
        if n_read < FRAME_LEN {
            return Err(Error::ShortRead(n_read));
        }
        log::trace!("frame {:02x?}", buf);
        Ok(buf.into())
    }

    /// Performs a full measurement cycle. Each call starts a new measurement.
    pub fn take_reading(&mut self) -> Result<Reading> {
        let frame = self.read_frame()?;
        let reading = frame.decode();
        log::debug!(
            "humidity {:.2}% temperature {:.2}C (status {:#x}/{:#x})",
            reading.humidity,
            reading.temperature,
            frame.humidity_status(),
            frame.temperature_status()
        );
        Ok(reading)
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_inner(self) -> (B, D) {
        (self.bus, self.delay)
    }
}
