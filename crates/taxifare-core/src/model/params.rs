use std::fmt;

/// Learned coefficients of the single-output linear unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl fmt::Display for ModelParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "weights: {:?}, bias: {}", self.weights, self.bias)
    }
}

impl ModelParams {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn num_features(&self) -> usize {
        self.weights.len()
    }

    /// Prediction for one row of features, in feature order.
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + self.bias
    }
}

/// Per-epoch training metric, appended once per epoch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub epochs: Vec<usize>,
    pub rmse: Vec<f64>,
}

impl TrainingHistory {
    pub fn push(&mut self, epoch: usize, rmse: f64) {
        self.epochs.push(epoch);
        self.rmse.push(rmse);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn last_rmse(&self) -> Option<f64> {
        self.rmse.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub params: ModelParams,
    pub history: TrainingHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict() {
        let p = ModelParams::new(vec![2., -1.], 0.5);
        assert_eq!(p.predict(&[3., 4.]), 2.5);
        assert_eq!(p.num_features(), 2);
    }

    #[test]
    fn test_history_push() {
        let mut h = TrainingHistory::default();
        assert_eq!(h.last_rmse(), None);
        h.push(0, 4.);
        h.push(1, 3.);
        assert_eq!(h.epochs, vec![0, 1]);
        assert_eq!(h.last_rmse(), Some(3.));
    }
}
