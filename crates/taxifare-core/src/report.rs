use crate::data_formats::tripdata::{TripData, FARE, TRIP_MILES, TRIP_SECONDS};
use crate::plot::{PairPlot, PlotResult, Plotter};
use crate::stats::{finite_max, CorrelationMatrix};

use std::fmt;

/// Columns of the exploratory scatter grid.
pub const PAIRPLOT_COLUMNS: [&str; 3] = [FARE, TRIP_MILES, TRIP_SECONDS];

/// Summary statistics printed before training.
#[derive(Debug, Clone)]
pub struct ExploratoryReport {
    pub row_count: usize,
    pub max_fare: f64,
    pub correlation: CorrelationMatrix,
}

impl ExploratoryReport {
    pub fn from_data(data: &TripData) -> Self {
        Self {
            row_count: data.len(),
            max_fare: finite_max(&data.fare),
            correlation: CorrelationMatrix::from_columns(&data.numeric_columns()),
        }
    }
}

impl fmt::Display for ExploratoryReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Read dataset completed successfully")?;
        writeln!(f, "Total number of row {}", self.row_count)?;
        writeln!(f, "Maximum fare: {:.2}", self.max_fare)?;
        write!(f, "{}", self.correlation)
    }
}

pub fn render_pairplot<P: Plotter>(data: &TripData, plotter: &mut P) -> PlotResult<()> {
    let pairplot = PairPlot::from_data(data, &PAIRPLOT_COLUMNS)?;
    plotter.render_pairplot(&pairplot)
}
