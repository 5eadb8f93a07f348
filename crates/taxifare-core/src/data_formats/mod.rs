pub mod tripdata;

pub use tripdata::{TripData, TripRecord};
