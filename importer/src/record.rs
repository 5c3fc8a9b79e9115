use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use influxdb::{Timestamp, WriteQuery};

use crate::error::ParseError;

/// One cumulative case count for a location on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub country: String,
    pub province: String,
    /// Never negative when produced by `reshape`.
    pub count: i64,
    pub date: NaiveDate,
}

impl Record {
    /// Seconds since the Unix epoch at 00:00 UTC of the record's date.
    pub fn epoch_seconds(&self) -> i64 {
        Utc.from_utc_datetime(&self.date.and_time(NaiveTime::default()))
            .timestamp()
    }

    /// Builds the line protocol point for this record under `measurement`.
    ///
    /// Empty tag values are not valid line protocol, so an empty country or
    /// province is left off the point instead. Point timestamps are
    /// unsigned, so dates before 1970 are an error; `reshape::parse_date`
    /// already refuses them for header dates.
    pub fn to_point(&self, measurement: &str) -> Result<WriteQuery, ParseError> {
        let seconds = u128::try_from(self.epoch_seconds())
            .map_err(|_| ParseError::DateBeforeEpoch(self.date))?;
        let mut query = WriteQuery::new(Timestamp::Seconds(seconds), measurement);

        if !self.country.is_empty() {
            query = query.add_tag("country", self.country.clone());
        }
        if !self.province.is_empty() {
            query = query.add_tag("province", self.province.clone());
        }

        // Written as a signed integer so v1 servers accept it.
        Ok(query.add_field("count", self.count))
    }
}
