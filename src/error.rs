use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("opening {}: {}", .path.display(), strerror(.source))]
    Open { path: PathBuf, source: io::Error },

    #[error("reading {}: {}", .path.display(), strerror(.source))]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("opening directory {}: {}", .path.display(), strerror(.source))]
    OpenDir { path: PathBuf, source: io::Error },

    #[error("reading directory {}: {}", .path.display(), strerror(.source))]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("could not find i2c bus {0}")]
    BusNotFound(String),

    #[error("bad slave address '{0}'")]
    BadAddress(String),

    #[error("slave address {0} out of range")]
    AddressOutOfRange(i64),

    #[error("missing i2c bus or device argument")]
    MissingBus,

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("ioctl(I2C_SLAVE): {}", strerror(.0))]
    SetAddress(#[source] io::Error),

    #[error("writing to i2c: {}", strerror(.0))]
    Write(#[source] io::Error),

    #[error("reading from i2c: {}", strerror(.0))]
    Read(#[source] io::Error),

    #[error("short read ({0} bytes)")]
    ShortRead(usize),

    #[error("writing output: {}", strerror(.0))]
    Output(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The C library's description of an OS error, without the ` (os error N)` that `io::Error`
/// appends to it.
fn strerror(e: &io::Error) -> String {
    let text = e.to_string();
    match e.raw_os_error() {
        Some(code) => match text.strip_suffix(&format!(" (os error {code})")) {
            Some(stripped) => stripped.to_owned(),
            None => text,
        },
        None => text,
    }
}

/// Broad classification of an [`Error`], used by callers that want to react differently to bad
/// input than to a failing bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The command line was wrong; no OS operation was involved.
    UserInput,
    /// An OS call failed; the underlying `io::Error` is available as the source.
    Os,
    /// The sensor answered with less data than a frame.
    Protocol,
    /// Label lookup finished without finding the requested bus.
    NotFound,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadAddress(_)
            | Error::AddressOutOfRange(_)
            | Error::MissingBus
            | Error::UnexpectedArgument(_) => ErrorKind::UserInput,
            Error::ShortRead(_) => ErrorKind::Protocol,
            Error::BusNotFound(_) => ErrorKind::NotFound,
            Error::Open { .. }
            | Error::ReadFile { .. }
            | Error::OpenDir { .. }
            | Error::ReadDir { .. }
            | Error::SetAddress(_)
            | Error::Write(_)
            | Error::Read(_)
            | Error::Output(_) => ErrorKind::Os,
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        use std::io::ErrorKind as IoKind;
        match value {
            Error::Open { source, .. }
            | Error::ReadFile { source, .. }
            | Error::OpenDir { source, .. }
            | Error::ReadDir { source, .. } => source,
            Error::SetAddress(e) | Error::Write(e) | Error::Read(e) | Error::Output(e) => e,
            Error::BusNotFound(_) => IoKind::NotFound.into(),
            Error::ShortRead(_) => IoKind::UnexpectedEof.into(),
            Error::BadAddress(_)
            | Error::AddressOutOfRange(_)
            | Error::MissingBus
            | Error::UnexpectedArgument(_) => IoKind::InvalidInput.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = Error::Open {
            path: "/dev/i2c-9".into(),
            source: io::ErrorKind::NotFound.into(),
        };
        assert_eq!(e.to_string(), "opening /dev/i2c-9: entity not found");
        let e = Error::Open {
            path: "/dev/i2c-9".into(),
            source: io::Error::from_raw_os_error(2),
        };
        assert_eq!(e.to_string(), "opening /dev/i2c-9: No such file or directory");
        let e = Error::ReadDir {
            path: "/sys/class/i2c-dev".into(),
            source: io::Error::from_raw_os_error(5),
        };
        assert_eq!(
            e.to_string(),
            "reading directory /sys/class/i2c-dev: Input/output error"
        );
        assert_eq!(
            Error::BusNotFound("bcm2708_i2c.1".into()).to_string(),
            "could not find i2c bus bcm2708_i2c.1"
        );
        assert_eq!(Error::ShortRead(3).to_string(), "short read (3 bytes)");
        assert_eq!(
            Error::BadAddress("0x2g".into()).to_string(),
            "bad slave address '0x2g'"
        );
        assert_eq!(
            Error::AddressOutOfRange(120).to_string(),
            "slave address 120 out of range"
        );
    }

    #[test]
    fn test_os_text_has_no_code() {
        let e = Error::SetAddress(io::Error::from_raw_os_error(16));
        assert_eq!(e.to_string(), "ioctl(I2C_SLAVE): Device or resource busy");
        let e = Error::Write(io::Error::from_raw_os_error(6));
        assert_eq!(e.to_string(), "writing to i2c: No such device or address");
        let e = Error::Read(io::Error::new(io::ErrorKind::Other, "bus wedged"));
        assert_eq!(e.to_string(), "reading from i2c: bus wedged");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::MissingBus.kind(), ErrorKind::UserInput);
        assert_eq!(Error::AddressOutOfRange(2).kind(), ErrorKind::UserInput);
        assert_eq!(Error::ShortRead(0).kind(), ErrorKind::Protocol);
        assert_eq!(Error::BusNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::Read(io::Error::from_raw_os_error(5)).kind(),
            ErrorKind::Os
        );
    }

    #[test]
    fn test_into_io_error() {
        let e: io::Error = Error::ShortRead(2).into();
        assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);
        let e: io::Error = Error::SetAddress(io::Error::from_raw_os_error(16)).into();
        assert_eq!(e.raw_os_error(), Some(16));
    }
}
