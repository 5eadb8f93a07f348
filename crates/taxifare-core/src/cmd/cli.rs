use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

use crate::cmd::config::Config;
use crate::csv_parse::DEFAULT_SOURCE;
use crate::data_formats::tripdata::{FARE, TRIP_MILES};
use crate::experiment::ExperimentConfig;
use crate::plot::DEFAULT_SAMPLE_SIZE;

#[derive(Debug, Parser)]
#[command(
    name = "taxifare",
    about = "Fit a linear fare model on the Chicago taxi trip dataset",
    version
)]
pub struct Cli {
    /// CSV to load, either an http(s) URL or a local path
    #[arg(
        long,
        value_name = "URL|PATH",
        value_hint = ValueHint::AnyPath,
        default_value = DEFAULT_SOURCE
    )]
    pub source: String,

    /// Feature column; repeat to fit on two features
    #[arg(
        short = 'f',
        long = "feature",
        value_name = "NAME",
        action = ArgAction::Append,
        default_value = TRIP_MILES
    )]
    pub features: Vec<String>,

    /// Label column
    #[arg(short = 'l', long, value_name = "NAME", default_value = FARE)]
    pub label: String,

    #[arg(long = "learning-rate", default_value_t = 0.001)]
    pub learning_rate: f64,

    #[arg(short = 'e', long, default_value_t = 20)]
    pub epochs: usize,

    #[arg(short = 'b', long = "batch-size", default_value_t = 50)]
    pub batch_size: usize,

    /// Rows drawn in the model plot
    #[arg(long = "sample-size", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Seed for initialisation, shuffling and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory the svg figures are written to
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = "plots")]
    pub output_dir: PathBuf,

    /// Skip the exploratory scatter grid
    #[arg(long = "no-pairplot")]
    pub no_pairplot: bool,

    /// Log per-epoch progress
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            source: self.source,
            experiment: ExperimentConfig {
                feature_names: self.features,
                label_name: self.label,
                learning_rate: self.learning_rate,
                epochs: self.epochs,
                batch_size: self.batch_size,
                sample_size: self.sample_size,
            },
            seed: self.seed,
            output_dir: self.output_dir,
            pairplot: !self.no_pairplot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_experiment() {
        let cfg = Cli::try_parse_from(["taxifare"]).unwrap().into_config();
        assert_eq!(cfg.source, DEFAULT_SOURCE);
        assert_eq!(cfg.experiment, ExperimentConfig::default());
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.output_dir, PathBuf::from("plots"));
        assert!(cfg.pairplot);
    }

    #[test]
    fn test_two_features_and_overrides() {
        let cli = Cli::try_parse_from([
            "taxifare",
            "--source",
            "trips.csv",
            "-f",
            "TRIP_MILES",
            "-f",
            "TRIP_SECONDS",
            "--learning-rate",
            "0.01",
            "-e",
            "5",
            "--seed",
            "3",
            "--no-pairplot",
        ])
        .unwrap();
        let cfg = cli.into_config();
        assert_eq!(cfg.source, "trips.csv");
        assert_eq!(cfg.experiment.feature_names, vec!["TRIP_MILES", "TRIP_SECONDS"]);
        assert_eq!(cfg.experiment.learning_rate, 0.01);
        assert_eq!(cfg.experiment.epochs, 5);
        assert_eq!(cfg.seed, Some(3));
        assert!(!cfg.pairplot);
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(Cli::try_parse_from(["taxifare", "--epochs", "many"]).is_err());
    }
}
