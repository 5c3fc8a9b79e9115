use async_trait::async_trait;
use influxdb::Query;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::{batch, Writer};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::record::Record;

pub const BUCKET: &str = "covid-bucket";
pub const ORG: &str = "covid-org";
pub const MEASUREMENT: &str = "covid-19";

/// Writes to the `covid-bucket` bucket of an InfluxDB 2.x server.
pub struct V2Writer {
    client: Client,
    url: String,
    credentials: Option<Credentials>,
}

impl V2Writer {
    /// `credentials` are used for a session sign-in when present.
    pub fn new(url: &str, credentials: Option<Credentials>) -> Result<Self> {
        // The sign-in session lives in a cookie.
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Connection {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            credentials,
        })
    }

    fn connection_error(&self, e: reqwest::Error) -> Error {
        Error::Connection {
            url: self.url.clone(),
            message: e.to_string(),
        }
    }

    fn write_error(&self, message: String) -> Error {
        Error::Write {
            url: self.url.clone(),
            message,
        }
    }
}

#[async_trait]
impl Writer for V2Writer {
    async fn connect(&self) -> Result<()> {
        self.client
            .get(format!("{}/ping", self.url))
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| self.connection_error(e))?;
        info!("Connected to InfluxDB at {}", self.url);

        if let Some(credentials) = &self.credentials {
            debug!("Signing in as {:?}", credentials.username);
            self.client
                .post(format!("{}/api/v2/signin", self.url))
                .basic_auth(&credentials.username, Some(&credentials.password))
                .send()
                .await
                .and_then(|resp| resp.error_for_status())
                .map_err(|e| self.connection_error(e))?;
        }
        Ok(())
    }

    async fn write_points(&self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            info!("No records to write");
            return Ok(0);
        }

        let points = batch(records, MEASUREMENT)?;
        let count = points.len();
        let body = points
            .build()
            .map_err(|e| self.write_error(e.to_string()))?
            .get();
        debug!("Writing {} points ({} bytes) to {}/{}", count, body.len(), ORG, BUCKET);

        let resp = self
            .client
            .post(format!("{}/api/v2/write", self.url))
            .query(&[("org", ORG), ("bucket", BUCKET), ("precision", "s")])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| self.write_error(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(self.write_error(format!("{status}: {text}")));
        }

        info!("Wrote {} points to {}/{}", count, ORG, BUCKET);
        Ok(count)
    }
}
