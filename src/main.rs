use std::process;

use hyt_read::cli;
use hyt_read::delay::StdDelay;
use hyt_read::sysfs::LinuxSysfs;

fn main() {
    env_logger::init();

    let status = cli::execute(
        std::env::args_os(),
        &LinuxSysfs::new(),
        StdDelay,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    process::exit(status);
}
