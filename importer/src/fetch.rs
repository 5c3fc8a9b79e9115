use csv::ReaderBuilder;
use log::{debug, info};
use reqwest::Client;
use url::Url;

use crate::error::{Error, ParseError, Result};

/// JHU CSSE confirmed-cases time series, one column per day.
pub const SOURCE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_19-covid-Confirmed.csv";

/// Downloads the CSV at `url` and splits it into rows of string fields.
///
/// A non-success status is reported as a network error; the body of an
/// error page is never handed to the parser.
pub async fn fetch_rows(client: &Client, url: &Url) -> Result<Vec<Vec<String>>> {
    let network = |source: reqwest::Error| Error::Network {
        url: url.to_string(),
        source,
    };

    info!("Fetching {}", url);
    let body = client
        .get(url.clone())
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(network)?
        .text()
        .await
        .map_err(network)?;
    debug!("Received {} bytes", body.len());

    let rows = parse_csv(&body)?;
    info!("Parsed {} CSV rows", rows.len());
    Ok(rows)
}

/// Every row, header included, must have the same number of fields.
pub fn parse_csv(body: &str) -> std::result::Result<Vec<Vec<String>>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(body.as_bytes());

    reader
        .records()
        .map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(ParseError::from)
        })
        .collect()
}
