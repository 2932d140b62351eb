//! Command line / environment configuration

use std::path::PathBuf;

use clap::Parser;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::DebugCliArgs;

pub const FEED_URL: &str = "https://mock.pages.academy/weather_report/db";
pub const GEO_URL: &str = "https://ipinfo.io/json";

/// Weather board - drag cities into favorites and see them on the map
#[derive(Parser, Debug)]
#[command(name = "weather-board")]
#[command(about = "A city weather dashboard with favorites and a map")]
pub struct Args {
    /// City feed returning `{ "cities": [...] }`
    #[arg(long, env = "WEATHER_BOARD_FEED_URL", default_value = FEED_URL)]
    pub feed_url: String,

    /// Geolocation lookup returning `{ "loc": "lat,lon" }`
    #[arg(long, env = "WEATHER_BOARD_GEO_URL", default_value = GEO_URL)]
    pub geo_url: String,

    /// Where to write the log (the terminal belongs to the UI)
    #[arg(long, env = "WEATHER_BOARD_LOG", default_value = "weather-board.log")]
    pub log_file: PathBuf,

    /// Log filter, e.g. `info` or `weather_board=debug` (RUST_LOG wins)
    #[arg(long, env = "WEATHER_BOARD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(flatten)]
    pub debug: DebugCliArgs,
}

/// Remote endpoints the dashboard talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Endpoints {
    pub feed_url: String,
    pub geo_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            geo_url: GEO_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

/// Resolved runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub endpoints: Endpoints,
    pub log: LogConfig,
}

impl Args {
    /// Split into runtime configuration and the debug session arguments.
    pub fn into_parts(self) -> (Config, DebugCliArgs) {
        let config = Config {
            endpoints: Endpoints {
                feed_url: self.feed_url,
                geo_url: self.geo_url,
            },
            log: LogConfig {
                file: self.log_file,
                level: self.log_level,
            },
        };
        (config, self.debug)
    }
}
