#![forbid(unsafe_code)]

use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::env;

// DEX Utilities
use crate::utils::errors::Errors;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Environment variables read once at startup.
const ENV_ADDR        : &str = "ADDR";
const ENV_PORT        : &str = "PORT";
const ENV_VERSION     : &str = "VERSION";

// Networking.
const DEFAULT_ADDR    : &str = "0.0.0.0";
const DEFAULT_PORT    : &str = "8080";

// Display label shown on rendered pages, no runtime semantics.
const DEFAULT_VERSION : &str = "cafard-edition";

// Log line format.
const LOG_PATTERN     : &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
/** Process-wide configuration, read from the environment exactly once at
 * startup and passed down through the runtime context.  The address and port
 * are kept as strings since they are only ever joined into a listen address.
 */
#[derive(Debug)]
pub struct Config {
    pub addr: String,
    pub port: String,
    pub version: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            addr: env_or(ENV_ADDR, DEFAULT_ADDR),
            port: env_or(ENV_PORT, DEFAULT_PORT),
            version: env_or(ENV_VERSION, DEFAULT_VERSION),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            port: DEFAULT_PORT.to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct RuntimeCtx {
    pub config: Config,
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// env_or:
// ---------------------------------------------------------------------------
/** Return the value of an environment variable, or the default when the
 * variable is unset or empty.
 */
fn env_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    RuntimeCtx { config: Config::from_env() }
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs with a console appender.  There is no managed config
 * directory in this service, so the appender is built in code rather than
 * loaded from a log4rs configuration file.
 *
 * Any failure results in a panic, since running without a log is not useful.
 */
pub fn init_log() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let logconfig = log4rs::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));

    let logconfig = match logconfig {
        Ok(c) => c,
        Err(e) => {
            let s = format!("{}", Errors::Log4rsInitialization(e.to_string()));
            panic!("{}", s);
        },
    };
    match log4rs::init_config(logconfig) {
        Ok(_) => (),
        Err(e) => {
            let s = format!("{}", Errors::Log4rsInitialization(e.to_string()));
            panic!("{}", s);
        },
    }
    info!("Log4rs initialized with console appender.");
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_config() {
        println!("{:?}", Config::default());
    }

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.addr, "0.0.0.0");
        assert_eq!(config.port, "8080");
        assert_eq!(config.version, "cafard-edition");
    }

    #[test]
    fn env_or_unset_yields_default() {
        assert_eq!(env_or("DEX_SERVER_TEST_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn env_or_set_yields_value() {
        env::set_var("DEX_SERVER_TEST_SET_VAR", "value");
        assert_eq!(env_or("DEX_SERVER_TEST_SET_VAR", "fallback"), "value");
        env::remove_var("DEX_SERVER_TEST_SET_VAR");
    }

    #[test]
    fn env_or_empty_yields_default() {
        env::set_var("DEX_SERVER_TEST_EMPTY_VAR", "");
        assert_eq!(env_or("DEX_SERVER_TEST_EMPTY_VAR", "fallback"), "fallback");
        env::remove_var("DEX_SERVER_TEST_EMPTY_VAR");
    }
}
