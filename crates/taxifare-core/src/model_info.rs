use crate::model::params::ModelParams;

use itertools::Itertools;

pub const BANNER_WIDTH: usize = 80;

pub fn banner() -> String {
    let header = "-".repeat(BANNER_WIDTH);
    format!("{header}\n|{:^w$}|\n{header}", "MODEL INFO", w = BANNER_WIDTH - 2)
}

/// The fitted model as a linear equation, e.g. `FARE = 2.000 * TRIP_MILES + 1.000`.
pub fn equation(feature_names: &[String], label_name: &str, params: &ModelParams) -> String {
    debug_assert_eq!(feature_names.len(), params.weights.len(), "one name per weight");
    let terms = feature_names
        .iter()
        .zip(&params.weights)
        .map(|(feature, w)| format!("{:.3} * {} + ", w, feature))
        .join("");
    format!("{} = {}{:.3}", label_name, terms, params.bias)
}

/// Banner, one line per weight, the bias and the equation.
pub fn model_info(feature_names: &[String], label_name: &str, params: &ModelParams) -> String {
    let mut info = String::new();
    for (feature, w) in feature_names.iter().zip(&params.weights) {
        info.push_str(&format!("Weight for feature[{}]: {:.3}\n", feature, w));
    }
    info.push_str(&format!("Bias: {:.3}\n", params.bias));

    format!("{}\n{}\n{}\n", banner(), info, equation(feature_names, label_name, params))
}
