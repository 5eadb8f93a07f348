use crate::data_formats::tripdata::{RawTrip, TripData, TripRecord};
use crate::traits::EqualLen;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

pub const DEFAULT_SOURCE: &str =
    "https://download.mlcc.google.com/mledu-datasets/chicago_taxi_train.csv";

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn mk_rdr<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().delimiter(b',').has_headers(true).from_reader(reader)
}

/// Loads the trip table from a URL or a local csv file.
pub fn load_trips(source: &str) -> Result<TripData, LoadError> {
    let data = if is_url(source) {
        info!("Fetching {}", source);
        let body = reqwest::blocking::get(source)?.error_for_status()?.bytes()?;
        read_trips(body.as_ref())?
    } else {
        read_trips(File::open(Path::new(source))?)?
    };
    info!("Loaded {} rows from {}", data.len(), source);
    Ok(data)
}

pub fn read_trips<R: Read>(reader: R) -> Result<TripData, LoadError> {
    let mut rdr = mk_rdr(reader);
    let mut data = TripData::new();
    for row in rdr.deserialize::<RawTrip>() {
        data.push(TripRecord::from(row?));
    }
    debug_assert!(data.validate_lengths());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
TRIP_START_TIMESTAMP,TRIP_SECONDS,TRIP_MILES,PAYMENT_TYPE,COMPANY,FARE,TIP_RATE,TIPS
01/31/2022 09:00:00 PM,2341,19.49,Mobile,Flash Cab,52.5,0.0,0
01/31/2022 08:45:00 PM,,17.21,Prcard,Flash Cab,48.0,9.1,4.4
01/31/2022 08:45:00 PM,1728,17.0,Cash,Sun Taxi,abc,0.0,0
";

    #[test]
    fn test_read_projects_columns() {
        let data = read_trips(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.trip_miles, vec![19.49, 17.21, 17.0]);
        assert_eq!(data.company[2], "Sun Taxi");
        assert_eq!(data.payment_type[1], "Prcard");
        assert_eq!(data.tip_rate[1], 9.1);
    }

    #[test]
    fn test_bad_numeric_cells_are_nan() {
        let data = read_trips(SAMPLE.as_bytes()).unwrap();
        assert!(data.trip_seconds[1].is_nan());
        assert!(data.fare[2].is_nan());
        assert_eq!(data.fare[0], 52.5);
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "TRIP_MILES,FARE\n1.0,5.0\n";
        assert!(matches!(read_trips(csv.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_is_url() {
        assert!(is_url(DEFAULT_SOURCE));
        assert!(!is_url("data/chicago_taxi_train.csv"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let res = load_trips("/nonexistent/taxi.csv");
        assert!(matches!(res, Err(LoadError::Io(_))));
    }
}
