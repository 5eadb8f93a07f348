use crate::stats::stats::pearson_correlation;

use nalgebra::DMatrix;
use std::fmt;

/// Pairwise Pearson correlations between named columns. Undefined entries are NaN.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: DMatrix<f64>,
}

impl CorrelationMatrix {
    pub fn from_columns(columns: &[(&str, &[f64])]) -> Self {
        let n = columns.len();
        let values = DMatrix::from_fn(n, n, |i, j| {
            pearson_correlation(columns[i].1, columns[j].1).unwrap_or(f64::NAN)
        });
        Self { names: columns.iter().map(|(name, _)| name.to_string()).collect(), values }
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == row)?;
        let j = self.names.iter().position(|n| n == col)?;
        Some(self.values[(i, j)])
    }
}

fn fmt_cell(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_owned()
    } else {
        format!("{:.6}", v)
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label_w = self.names.iter().map(|n| n.len()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let cell_w =
                    self.values.column(j).iter().map(|&v| fmt_cell(v).len()).max().unwrap_or(0);
                name.len().max(cell_w)
            })
            .collect();

        write!(f, "{:label_w$}", "")?;
        for (name, w) in self.names.iter().zip(&widths) {
            write!(f, "  {:>w$}", name, w = w)?;
        }
        for (i, name) in self.names.iter().enumerate() {
            write!(f, "\n{:<label_w$}", name)?;
            for (j, w) in widths.iter().enumerate() {
                write!(f, "  {:>w$}", fmt_cell(self.values[(i, j)]), w = w)?;
            }
        }
        Ok(())
    }
}
