use crate::traits::EqualLen;

use serde::Deserialize;

pub const TRIP_MILES: &str = "TRIP_MILES";
pub const TRIP_SECONDS: &str = "TRIP_SECONDS";
pub const FARE: &str = "FARE";
pub const COMPANY: &str = "COMPANY";
pub const PAYMENT_TYPE: &str = "PAYMENT_TYPE";
pub const TIP_RATE: &str = "TIP_RATE";

/// Numeric columns in the order they appear in the projected table.
pub const NUMERIC_COLUMNS: [&str; 4] = [TRIP_MILES, TRIP_SECONDS, FARE, TIP_RATE];

/// One row of the taxi dataset, projected onto the six working columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub trip_miles: f64,
    pub trip_seconds: f64,
    pub fare: f64,
    pub company: String,
    pub payment_type: String,
    pub tip_rate: f64,
}

// csv row as it comes off the wire; any column not named here is dropped
#[derive(Debug, Deserialize)]
pub(crate) struct RawTrip {
    #[serde(rename = "TRIP_MILES", deserialize_with = "csv::invalid_option")]
    trip_miles: Option<f64>,
    #[serde(rename = "TRIP_SECONDS", deserialize_with = "csv::invalid_option")]
    trip_seconds: Option<f64>,
    #[serde(rename = "FARE", deserialize_with = "csv::invalid_option")]
    fare: Option<f64>,
    #[serde(rename = "COMPANY")]
    company: String,
    #[serde(rename = "PAYMENT_TYPE")]
    payment_type: String,
    #[serde(rename = "TIP_RATE", deserialize_with = "csv::invalid_option")]
    tip_rate: Option<f64>,
}

impl From<RawTrip> for TripRecord {
    fn from(raw: RawTrip) -> Self {
        TripRecord {
            trip_miles: raw.trip_miles.unwrap_or(f64::NAN),
            trip_seconds: raw.trip_seconds.unwrap_or(f64::NAN),
            fare: raw.fare.unwrap_or(f64::NAN),
            company: raw.company,
            payment_type: raw.payment_type,
            tip_rate: raw.tip_rate.unwrap_or(f64::NAN),
        }
    }
}

/// Columnar trip table. Missing numeric cells are stored as NaN.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TripData {
    pub trip_miles: Vec<f64>,
    pub trip_seconds: Vec<f64>,
    pub fare: Vec<f64>,
    pub company: Vec<String>,
    pub payment_type: Vec<String>,
    pub tip_rate: Vec<f64>,
}

impl EqualLen for TripData {
    fn validate_lengths(&self) -> bool {
        let len = self.fare.len();
        [
            self.trip_miles.len(),
            self.trip_seconds.len(),
            self.company.len(),
            self.payment_type.len(),
            self.tip_rate.len(),
        ]
        .iter()
        .all(|&l| l == len)
    }
}

impl FromIterator<TripRecord> for TripData {
    fn from_iter<I: IntoIterator<Item = TripRecord>>(iter: I) -> Self {
        let mut data = TripData::default();
        for record in iter {
            data.push(record);
        }
        data
    }
}

impl TripData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fare.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fare.is_empty()
    }

    pub fn push(&mut self, record: TripRecord) {
        self.trip_miles.push(record.trip_miles);
        self.trip_seconds.push(record.trip_seconds);
        self.fare.push(record.fare);
        self.company.push(record.company);
        self.payment_type.push(record.payment_type);
        self.tip_rate.push(record.tip_rate);
    }

    pub fn record(&self, idx: usize) -> Option<TripRecord> {
        if idx >= self.len() {
            return None;
        }
        Some(TripRecord {
            trip_miles: self.trip_miles[idx],
            trip_seconds: self.trip_seconds[idx],
            fare: self.fare[idx],
            company: self.company[idx].clone(),
            payment_type: self.payment_type[idx].clone(),
            tip_rate: self.tip_rate[idx],
        })
    }

    /// Looks up a numeric column by its CSV header name.
    pub fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        match name {
            TRIP_MILES => Some(&self.trip_miles),
            TRIP_SECONDS => Some(&self.trip_seconds),
            FARE => Some(&self.fare),
            TIP_RATE => Some(&self.tip_rate),
            _ => None,
        }
    }

    pub fn numeric_columns(&self) -> Vec<(&'static str, &[f64])> {
        NUMERIC_COLUMNS
            .iter()
            .filter_map(|&name| self.numeric_column(name).map(|col| (name, col)))
            .collect()
    }

    /// Copies the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> TripData {
        indices.iter().filter_map(|&i| self.record(i)).collect()
    }
}
