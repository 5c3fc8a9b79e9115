//! Writers push the reshaped records to InfluxDB in a single batch.

pub mod v1;
pub mod v2;

use async_trait::async_trait;
use influxdb::WriteQuery;

use crate::config::{Config, Protocol};
use crate::error::Result;
use crate::record::Record;

pub use v1::V1Writer;
pub use v2::V2Writer;

#[async_trait]
pub trait Writer: Send + Sync {
    /// Checks that the server answers, signing in first if the protocol
    /// needs it.
    async fn connect(&self) -> Result<()>;

    /// Sends every record in one request and returns the number of points
    /// written. Nothing is sent for an empty slice.
    async fn write_points(&self, records: &[Record]) -> Result<usize>;
}

/// Point mapping shared by both protocols; only the measurement differs.
pub fn batch(records: &[Record], measurement: &str) -> Result<Vec<WriteQuery>> {
    records
        .iter()
        .map(|record| Ok(record.to_point(measurement)?))
        .collect()
}

pub fn writer_for(config: &Config) -> Result<Box<dyn Writer>> {
    let writer: Box<dyn Writer> = match config.protocol {
        Protocol::V1 => Box::new(V1Writer::new(&config.target, &config.credentials)),
        Protocol::V2 => Box::new(V2Writer::new(
            &config.target,
            config.credentials.for_v2(config.v2_auth).cloned(),
        )?),
    };
    Ok(writer)
}
