use crate::csv_parse::{load_trips, LoadError};
use crate::data_formats::TripData;
use crate::experiment::{run_experiment, ExperimentConfig, ExperimentError};
use crate::model::DenseBackend;
use crate::plot::{PlotError, Plotter, SvgPlotter};
use crate::report::{render_pairplot, ExploratoryReport};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

/* =================== Public configuration types =================== */

#[derive(Debug, Clone)]
pub struct Config {
    pub source: String,
    pub experiment: ExperimentConfig,
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    pub pairplot: bool,
}

/* =================== Error type (no process::exit) =================== */

#[derive(thiserror::Error, Debug)]
pub enum CmdError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("plot failed: {0}")]
    Plot(#[from] PlotError),
    #[error("experiment failed: {0}")]
    Experiment(#[from] ExperimentError),
}

/* =================== Entry point =================== */

impl Config {
    /// Loads the dataset and runs the whole walkthrough, writing figures as svg.
    pub fn run(&self) -> Result<(), CmdError> {
        let data = load_trips(&self.source)?;
        let mut plotter = SvgPlotter::new(&self.output_dir);
        self.process(&data, &mut plotter)
    }

    pub fn process<P: Plotter>(&self, data: &TripData, plotter: &mut P) -> Result<(), CmdError> {
        println!("{}", ExploratoryReport::from_data(data));

        if self.pairplot {
            render_pairplot(data, plotter)?;
        }

        let mut backend = DenseBackend::new(self.seed);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        };
        let (_model, output) =
            run_experiment(data, &self.experiment, &mut backend, plotter, &mut rng)?;
        info!("Done, final params: {}", output.params);
        Ok(())
    }
}
