use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::{Error, I2cBus, Result};

/// Directory with one subdirectory per registered I2C bus, each holding a `name` file.
pub const SYSFS_DIR: &str = "/sys/class/i2c-dev";
/// Directory holding the bus character devices.
pub const DEV_DIR: &str = "/dev";

/// The parts of the operating system the bus resolver needs: listing bus descriptors, reading
/// their `name` files and opening bus devices. Can be replaced with `MockSysfs` for testing.
pub trait I2cSystem {
    type Bus;

    /// Entry names of the bus descriptor directory in the order the OS lists them.
    fn bus_entries(&self) -> Result<Vec<OsString>>;

    /// Raw contents of `<entry>/name`.
    fn bus_name(&self, entry: &OsStr) -> Result<Vec<u8>>;

    /// Opens the bus device called `device` for reading and writing.
    fn open_bus(&self, device: &OsStr) -> Result<Self::Bus>;
}

/// The real sysfs and `/dev` trees.
#[derive(Debug, Clone)]
pub struct LinuxSysfs {
    sys_dir: PathBuf,
    dev_dir: PathBuf,
}

impl Default for LinuxSysfs {
    fn default() -> Self {
        Self::with_dirs(SYSFS_DIR, DEV_DIR)
    }
}

impl LinuxSysfs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dirs<S: Into<PathBuf>, D: Into<PathBuf>>(sys_dir: S, dev_dir: D) -> Self {
        Self {
            sys_dir: sys_dir.into(),
            dev_dir: dev_dir.into(),
        }
    }

    pub fn sys_dir(&self) -> &Path {
        &self.sys_dir
    }

    /// Path of the device file for `device`. Absolute names are kept as they are.
    pub fn device_path<P: AsRef<Path>>(&self, device: P) -> PathBuf {
        self.dev_dir.join(device)
    }
}

impl I2cSystem for LinuxSysfs {
    type Bus = I2cBus;

    fn bus_entries(&self) -> Result<Vec<OsString>> {
        let dir = fs::read_dir(&self.sys_dir).map_err(|source| Error::OpenDir {
            path: self.sys_dir.clone(),
            source,
        })?;

        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|source| Error::ReadDir {
                path: self.sys_dir.clone(),
                source,
            })?;
            entries.push(entry.file_name());
        }
        Ok(entries)
    }

    fn bus_name(&self, entry: &OsStr) -> Result<Vec<u8>> {
        let path = self.sys_dir.join(entry).join("name");
        let mut file = File::open(&path).map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|source| Error::ReadFile { path, source })?;
        Ok(contents)
    }

    fn open_bus(&self, device: &OsStr) -> Result<I2cBus> {
        I2cBus::open(self.device_path(device))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver;
    use crate::ErrorKind;
    use std::os::unix::ffi::OsStrExt;

    /// Scratch directory laid out like `/sys/class/i2c-dev` plus a matching `/dev`.
    struct Fixture {
        root: PathBuf,
    }

    impl Fixture {
        fn new(tag: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "hyt-read-sysfs-{}-{}",
                tag,
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(root.join("sys")).unwrap();
            fs::create_dir_all(root.join("dev")).unwrap();
            Self { root }
        }

        fn add_bus<E: AsRef<OsStr>>(&self, entry: E, name: &str) {
            let dir = self.root.join("sys").join(entry.as_ref());
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("name"), name).unwrap();
            fs::write(self.root.join("dev").join(entry.as_ref()), b"").unwrap();
        }

        fn sysfs(&self) -> LinuxSysfs {
            LinuxSysfs::with_dirs(self.root.join("sys"), self.root.join("dev"))
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn test_entries_and_names() {
        let fixture = Fixture::new("entries");
        fixture.add_bus("i2c-0", "bcm2708_i2c.0\n");
        fixture.add_bus("i2c-1", "bcm2708_i2c.1\n");
        let sysfs = fixture.sysfs();

        let mut entries = sysfs.bus_entries().unwrap();
        entries.sort();
        assert_eq!(entries, ["i2c-0", "i2c-1"]);
        assert_eq!(sysfs.bus_name(OsStr::new("i2c-1")).unwrap(), b"bcm2708_i2c.1\n");
    }

    #[test]
    fn test_open_bus() {
        let fixture = Fixture::new("open");
        fixture.add_bus("i2c-3", "faux0");
        let bus = fixture.sysfs().open_bus(OsStr::new("i2c-3")).unwrap();
        assert_eq!(bus.path(), fixture.root.join("dev").join("i2c-3"));
    }

    #[test]
    fn test_missing_directory() {
        let sysfs = LinuxSysfs::with_dirs("/nonexistent/i2c-dev", "/nonexistent/dev");
        let err = sysfs.bus_entries().unwrap_err();
        assert!(matches!(err, Error::OpenDir { .. }));
        assert_eq!(
            err.to_string(),
            "opening directory /nonexistent/i2c-dev: No such file or directory"
        );
    }

    #[test]
    fn test_missing_name_file() {
        let fixture = Fixture::new("noname");
        fs::create_dir_all(fixture.root.join("sys").join("i2c-7")).unwrap();
        let err = fixture.sysfs().bus_name(OsStr::new("i2c-7")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Os);
        assert!(matches!(err, Error::Open { ref path, .. } if path.ends_with("i2c-7/name")));
    }

    #[test]
    fn test_non_utf8_entry() {
        let fixture = Fixture::new("bytes");
        let entry = OsStr::from_bytes(b"i2c-\xff");
        fixture.add_bus("i2c-0", "bcm2708_i2c.0\n");
        fixture.add_bus(entry, "faux0\n");
        let sysfs = fixture.sysfs();

        let found = resolver::find_bus(&sysfs, "faux0").unwrap();
        assert_eq!(found.as_bytes(), b"i2c-\xff");
        let bus = sysfs.open_bus(&found).unwrap();
        assert_eq!(bus.path(), fixture.root.join("dev").join(entry));
    }

    #[test]
    fn test_device_path() {
        let sysfs = LinuxSysfs::new();
        assert_eq!(sysfs.sys_dir(), Path::new("/sys/class/i2c-dev"));
        assert_eq!(sysfs.device_path("i2c-1"), Path::new("/dev/i2c-1"));
        assert_eq!(sysfs.device_path("/dev/i2c-2"), Path::new("/dev/i2c-2"));
    }
}
