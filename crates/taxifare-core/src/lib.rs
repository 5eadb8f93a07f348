pub mod cmd;
pub mod csv_parse;
pub mod data_formats;
pub mod experiment;
pub mod model;
pub mod model_info;
pub mod plot;
pub mod report;
pub mod stats;
pub mod traits;
