use std::path::PathBuf;

use clap::Parser;

use crate::fetch::SOURCE_URL;

/// COVID-19 importer for InfluxDB - downloads the JHU CSSE confirmed-cases
/// time series and writes one point per location and day
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// InfluxDB URL
    #[arg(short, long, default_value = "http://localhost:8086/")]
    pub url: String,

    /// Use the InfluxDB 2 bucket/organization API
    #[arg(long)]
    pub v2: bool,

    /// InfluxDB username
    #[arg(long, default_value = "")]
    pub user: String,

    /// InfluxDB password
    #[arg(long, default_value = "")]
    pub password: String,

    /// CSV time series to import
    #[arg(long, default_value = SOURCE_URL)]
    pub source: String,

    /// Attach v2 credentials only when no username is given, as older
    /// releases did
    #[arg(long, hide = true)]
    pub v2_inverted_auth: bool,

    /// Path to log file (logs go to stderr when not set)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
