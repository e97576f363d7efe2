use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use chrono::{NaiveDate, Weekday};
use getopts::Options;

const ADDRESS_VAR: &str = "HUB_CALENDAR_ADDR";

pub struct Args {
    pub address: SocketAddr,
    pub events: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub week_start: Weekday,
    pub today: Option<NaiveDate>,
    pub enable_cache: bool,
    pub cache_size: usize,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: $HUB_CALENDAR_ADDR or 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "e",
        "events",
        "JSON file with semester events [Default: built-in academic calendar]",
        "FILE",
    );
    opts.optopt(
        "d",
        "data-dir",
        "Directory holding saved personal events",
        "DIR",
    );
    opts.optopt(
        "w",
        "week-start",
        "First day of the week in month grids [Default: sunday]",
        "WEEKDAY",
    );
    opts.optopt(
        "",
        "today",
        "Pin the current date instead of reading the system clock",
        "YYYY-MM-DD",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of built month grids [Default: false]",
    );
    opts.optopt(
        "s",
        "cache-size",
        "Maximum number of cached month grids [Default: 64]",
        "COUNT",
    );
    opts
}

fn default_address() -> SocketAddr {
    let fallback = SocketAddr::from(([127, 0, 0, 1], 8080));

    match env::var(ADDRESS_VAR) {
        Ok(value) => value.parse().unwrap_or_else(|err| {
            eprintln!("Failed to parse `{ADDRESS_VAR}` environment variable: {err}");
            process::exit(1);
        }),
        Err(_) => fallback,
    }
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let address = match matches.opt_get::<SocketAddr>("address") {
        Ok(address) => address.unwrap_or_else(default_address),
        Err(err) => {
            eprintln!("Provided value for option 'address' is invalid: {err}");
            process::exit(1);
        }
    };

    let week_start = match matches.opt_get_default("week-start", Weekday::Sun) {
        Ok(weekday) => weekday,
        Err(err) => {
            eprintln!("Provided value for option 'week-start' is invalid: {err}");
            process::exit(1);
        }
    };

    let today = match matches.opt_get::<NaiveDate>("today") {
        Ok(today) => today,
        Err(err) => {
            eprintln!("Provided value for option 'today' is invalid: {err}");
            process::exit(1);
        }
    };

    let cache_size = match matches.opt_get_default::<usize>("cache-size", 64) {
        Ok(size) => size,
        Err(err) => {
            eprintln!("Provided value for option 'cache-size' is invalid: {err}");
            process::exit(1);
        }
    };

    Args {
        address,
        events: matches.opt_str("events").map(PathBuf::from),
        data_dir: matches.opt_str("data-dir").map(PathBuf::from),
        week_start,
        today,
        enable_cache: matches.opt_present("enable-cache"),
        cache_size,
    }
}
