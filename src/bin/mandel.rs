extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandel;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use mandel::config::parse_setting;
use mandel::input::read_grid_size;
use mandel::{Config, Exit, MandelError};
use std::env;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const CPUS: &str = "cpus";
const DEBUG: &str = "debug";
const MAX_ROW_BYTES: &str = "max-row-bytes";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders the Mandelbrot set as text. Reads ROWS COLUMNS ITERATIONS from stdin.")
        .arg(
            Arg::with_name(CPUS)
                .required(false)
                .long(CPUS)
                .short("c")
                .takes_value(true)
                .validator(|s| validate_number::<usize>(&s, "Could not parse CPU count"))
                .help("Plan for this many CPUs instead of the detected count (overrides MAX_CPUS)"),
        )
        .arg(
            Arg::with_name(DEBUG)
                .required(false)
                .long(DEBUG)
                .short("d")
                .help("Print the execution plan to stderr (same as MANDELDEBUG=true)"),
        )
        .arg(
            Arg::with_name(MAX_ROW_BYTES)
                .required(false)
                .long(MAX_ROW_BYTES)
                .takes_value(true)
                .validator(|s| validate_number::<usize>(&s, "Could not parse row size ceiling"))
                .help("Largest row buffer, in bytes, a worker may allocate"),
        )
        .get_matches()
}

/// Environment first, then the command line on top of it.
fn configure(matches: &ArgMatches) -> Result<Config, MandelError> {
    let mut config = Config::from_env(|key| env::var(key).ok())?;
    if matches.is_present(DEBUG) {
        config.debug = true;
    }
    if let Some(cpus) = matches.value_of(CPUS) {
        config.cpus = Some(parse_setting(CPUS, cpus)?);
    }
    if let Some(bytes) = matches.value_of(MAX_ROW_BYTES) {
        config.max_row_bytes = parse_setting(MAX_ROW_BYTES, bytes)?;
    }
    Ok(config)
}

fn init_logging(config: &Config) {
    let level = if config.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), MandelError> {
    let config = configure(matches)?;
    init_logging(&config);
    debug!("=== Starting run of Mandelbrot ===");

    let stdin = io::stdin();
    let size = read_grid_size(stdin.lock())?;
    let cpus = config.cpu_count(num_cpus::get())?;

    let grid = mandel::render(size, &config, cpus)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    grid.write_to(&mut out)?;

    debug!("End of Run with {} CPUs", cpus.get());
    Ok(())
}

fn main() {
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        match e.exit() {
            Exit::Code(code) => std::process::exit(code),
            Exit::Abort => std::process::abort(),
        }
    }
}
