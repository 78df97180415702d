use clap::Parser;
use kiuas_monitor::StdinSource;
use kiuas_monitor::app::{Options, run_with_io};
use log::{info, warn};
use std::panic::{self, PanicHookInfo};

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PANIC: i32 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up panic hook to ensure clean exit codes for process managers
    // (e.g., systemd) that monitor exit status
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    let options = Options::parse();

    let default_filter = if options.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    info!(
        "reading advertisements from stdin (on above {} °C, off below {} °C)",
        options.activate_temperature, options.deactivate_temperature
    );

    if options.deactivate_temperature >= options.activate_temperature {
        warn!("deactivate temperature is not below activate temperature; the status may flap");
    }

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();

    match run_with_io(options, &StdinSource, &mut out, &mut err).await {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(why) => {
            eprintln!("error: {}", why);
            std::process::exit(EXIT_ERROR);
        }
    }
}
