use async_trait::async_trait;
use influxdb::Client;
use log::{debug, info};

use super::{batch, Writer};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::record::Record;

pub const DATABASE: &str = "covid";
pub const MEASUREMENT: &str = "cases";

/// Writes to the `covid` database of an InfluxDB 1.x server.
pub struct V1Writer {
    client: Client,
    url: String,
}

impl V1Writer {
    pub fn new(url: &str, credentials: &Credentials) -> Self {
        let mut client = Client::new(url, DATABASE);
        if let Some(credentials) = credentials.for_v1() {
            debug!("Authenticating as {}", credentials.username);
            client = client.with_auth(&credentials.username, &credentials.password);
        }
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl Writer for V1Writer {
    async fn connect(&self) -> Result<()> {
        let (build, version) = self.client.ping().await.map_err(|e| Error::Connection {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        info!("Connected to InfluxDB {} ({}) at {}", version, build, self.url);
        Ok(())
    }

    async fn write_points(&self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            info!("No records to write");
            return Ok(0);
        }

        let points = batch(records, MEASUREMENT)?;
        let count = points.len();
        debug!("Writing {} points to database {}", count, DATABASE);

        self.client.query(points).await.map_err(|e| Error::Write {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        info!("Wrote {} points to {}", count, DATABASE);
        Ok(count)
    }
}
