use chrono::NaiveDate;
use log::{debug, info};

use crate::error::ParseError;
use crate::record::Record;

/// Province, country, latitude, longitude precede the date columns.
pub const METADATA_COLUMNS: usize = 4;

/// Parses a header label of the form `M/D/YY`, e.g. `1/22/20`.
///
/// Month and day take one or two digits, the year exactly two. Years 69-99
/// fall in the 1900s and 00-68 in the 2000s. Nothing else is accepted, not
/// even surrounding whitespace. Dates before 1970 are rejected since a
/// point cannot carry them.
pub fn parse_date(value: &str, column: usize) -> Result<NaiveDate, ParseError> {
    let invalid = |reason| ParseError::Date {
        column,
        value: value.to_string(),
        reason,
    };

    let mut parts = value.split('/');
    let (Some(month), Some(day), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid("expected M/D/YY"));
    };

    let month = digits(month, 1..=2).ok_or_else(|| invalid("month is not 1-2 digits"))?;
    let day = digits(day, 1..=2).ok_or_else(|| invalid("day is not 1-2 digits"))?;
    let year = digits(year, 2..=2).ok_or_else(|| invalid("year is not 2 digits"))?;
    let century = if year >= 69 { 1900 } else { 2000 };
    let year = century + year as i32;
    if year < 1970 {
        return Err(invalid("precedes 1970-01-01"));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("no such calendar date"))
}

fn digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Turns the wide table (one column per day) into one record per
/// location and day.
///
/// Records come out date-major: every row for the first date, in input
/// order, then every row for the next date. Empty cells mean "no data" and
/// produce no record; `0` is data.
pub fn reshape(rows: &[Vec<String>]) -> Result<Vec<Record>, ParseError> {
    let (header, data) = rows.split_first().ok_or(ParseError::MissingHeader)?;
    if header.len() < METADATA_COLUMNS {
        return Err(ParseError::ShortHeader(header.len()));
    }

    // Rows are indexed as they appear in the file, header being row 0.
    for (i, row) in data.iter().enumerate() {
        if row.len() < header.len() {
            return Err(ParseError::ShortRow {
                row: i + 1,
                len: row.len(),
                expected: header.len(),
            });
        }
    }

    let mut records = Vec::with_capacity((header.len() - METADATA_COLUMNS) * data.len());
    let mut skipped = 0usize;

    for (column, label) in header.iter().enumerate().skip(METADATA_COLUMNS) {
        let date = parse_date(label, column)?;

        for (i, row) in data.iter().enumerate() {
            let cell = row[column].as_str();
            if cell.is_empty() {
                skipped += 1;
                continue;
            }

            let count = parse_count(cell, i + 1, column)?;
            records.push(Record {
                country: row[1].clone(),
                province: row[0].clone(),
                count,
                date,
            });
        }
        debug!("Reshaped column {} ({})", column, date);
    }

    info!(
        "Reshaped {} records from {} rows, skipped {} empty cells",
        records.len(),
        data.len(),
        skipped
    );
    Ok(records)
}

/// Counts must fit a line protocol integer field.
fn parse_count(cell: &str, row: usize, column: usize) -> Result<i64, ParseError> {
    if cell.starts_with('-') {
        return Err(ParseError::NegativeCount {
            row,
            column,
            value: cell.to_string(),
        });
    }
    cell.parse::<i64>().map_err(|source| ParseError::Count {
        row,
        column,
        value: cell.to_string(),
        source,
    })
}
