use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// An open Linux I2C bus character device (`/dev/i2c-N`).
///
/// The descriptor is closed when the value is dropped.
pub struct I2cBus {
    dev: i2c_linux::I2c<File>,
    path: PathBuf,
}

impl I2cBus {
    /// Opens the device file for reading and writing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::Open {
                path: path.into(),
                source,
            })?;
        log::debug!("opened i2c bus {}", path.display());
        Ok(Self {
            dev: i2c_linux::I2c::new(file),
            path: path.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for I2cBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I2cBus").field("path", &self.path).finish()
    }
}

impl i2c::Master for I2cBus {
    type Error = io::Error;
}

impl i2c::Address for I2cBus {
    fn set_slave_address(&mut self, addr: u16, tenbit: bool) -> io::Result<()> {
        // issues the I2C_SLAVE (or I2C_TENBIT + I2C_SLAVE) ioctl
        self.dev.smbus_set_slave_address(addr, tenbit)
    }
}

impl Read for I2cBus {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.dev.read(buf)
    }
}

impl Write for I2cBus {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.dev.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(()) // noop since no buffering is performed
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_open_missing_device() {
        let err = I2cBus::open("/nonexistent/i2c-42").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Os);
        assert_eq!(
            err.to_string(),
            "opening /nonexistent/i2c-42: No such file or directory"
        );
    }

    #[test]
    fn test_open_regular_file() {
        let path = std::env::temp_dir().join(format!("hyt-read-bus-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();
        let bus = I2cBus::open(&path).unwrap();
        assert_eq!(bus.path(), path.as_path());
        drop(bus);
        std::fs::remove_file(&path).unwrap();
    }
}
