//! EPOS register shell

use std::{io, process::ExitCode};

use tracing::{error, info};

use epos::{clock::SystemClock, fixtures, register::Register, shell::Shell};

use crate::config::Config;

mod config;
mod observability;

/// Register entry point
fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            // Prints help and version too, which are not failures
            _ = err.print();

            return ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1));
        }
    };

    if let Err(err) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    let time_zone = match config.time_zone() {
        Ok(time_zone) => time_zone,
        Err(err) => {
            error!("invalid time zone: {err}");

            return ExitCode::FAILURE;
        }
    };

    let catalog = match fixtures::load_catalog(&config.catalog) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(path = %config.catalog.display(), "failed to load catalog: {err}");

            return ExitCode::FAILURE;
        }
    };

    info!(
        path = %config.catalog.display(),
        products = catalog.products().len(),
        customers = catalog.customers().len(),
        time_zone = time_zone.iana_name().unwrap_or("local"),
        "loaded catalog"
    );

    let register = match Register::new(catalog, SystemClock::with_time_zone(time_zone)) {
        Ok(register) => register,
        Err(err) => {
            error!("failed to open register: {err}");

            return ExitCode::FAILURE;
        }
    };

    let mut shell = Shell::new(register);

    if let Err(err) = shell.run(io::stdin().lock(), io::stdout().lock()) {
        error!("terminal error: {err}");

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
