use log::info;
use reqwest::Client;

use crate::config::{Config, Protocol};
use crate::error::{Error, Result};
use crate::fetch::fetch_rows;
use crate::reshape::reshape;
use crate::writer::writer_for;

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub protocol: Protocol,
    pub points: usize,
}

impl Report {
    /// Line printed on success. Only the v2 path reports a count.
    pub fn summary(&self) -> Option<String> {
        match self.protocol {
            Protocol::V1 => None,
            Protocol::V2 => Some(format!("{} written", self.points)),
        }
    }
}

/// Fetch, reshape, write. The first failure ends the run; nothing is
/// written unless the whole CSV was fetched and reshaped.
pub async fn run(config: &Config) -> Result<Report> {
    let client = Client::builder().build().map_err(|source| Error::Network {
        url: config.source.to_string(),
        source,
    })?;

    let rows = fetch_rows(&client, &config.source).await?;
    let records = reshape(&rows)?;

    let writer = writer_for(config)?;
    writer.connect().await?;
    let points = writer.write_points(&records).await?;

    info!("Import finished: {} points", points);
    Ok(Report {
        protocol: config.protocol,
        points,
    })
}
