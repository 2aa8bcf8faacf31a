use std::{fs::File, path::Path};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{error::DataError, types::PriceBar};

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const OFFSET_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// A CSV row as exported by most exchanges. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct HistoricalRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: Option<f64>,
    #[serde(rename = "High")]
    high: Option<f64>,
    #[serde(rename = "Low")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: Option<f64>,
}

impl HistoricalRow {
    fn bar(&self) -> Option<PriceBar> {
        let bar = PriceBar::new(self.open?, self.high?, self.low?, self.close?, self.volume?);
        bar.is_complete().then_some(bar)
    }
}

/// Dates carrying an offset are converted to UTC so mixed offsets still sort chronologically
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, OFFSET_DATE_TIME_FORMAT))
        .map(|date| date.naive_utc())
        .ok()
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Load bars sorted ascending by date. Rows with missing values, a blank date included, are skipped.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<PriceBar>, DataError> {
    let file = File::open(path.as_ref())?;
    read_csv(file)
}

pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<PriceBar>, DataError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut dated = Vec::new();
    let mut skipped = 0;

    for (index, row) in reader.deserialize::<HistoricalRow>().enumerate() {
        let row = row?;
        // header is line 1
        let line = index + 2;

        if row.date.trim().is_empty() {
            debug!(line, "skipping row without date");
            skipped += 1;
            continue;
        }

        let date = parse_date(&row.date).ok_or_else(|| DataError::InvalidDate {
            row: line,
            value: row.date.clone(),
        })?;

        match row.bar() {
            Some(bar) => dated.push((date, bar)),
            None => {
                debug!(line, "skipping incomplete row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = dated.len(), "dropped incomplete rows");
    }
    if dated.is_empty() {
        return Err(DataError::Empty);
    }

    dated.sort_by_key(|(date, _)| *date);

    Ok(dated.into_iter().map(|(_, bar)| bar).collect())
}

/// The test split is the last `test_bars` plus one lookback window, so its first step has full history
pub fn split_train_test(
    bars: &[PriceBar],
    test_bars: usize,
    lookback: usize,
) -> (Vec<PriceBar>, Vec<PriceBar>) {
    let split = bars.len().saturating_sub(test_bars + lookback);
    let (train, test) = bars.split_at(split);

    (train.to_vec(), test.to_vec())
}
