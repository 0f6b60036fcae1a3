use crate::index::error::IndexError;

/// The standardization seam of the pipeline.
///
/// A fitter turns an accumulated water-balance series into a standardized
/// index series of the same length. Implementations may emit leading `None`
/// values for observations they cannot score yet (distribution-fitting
/// warm-up), and must keep nulls in the input as nulls in the output.
pub trait IndexFitter {
    fn fit(&self, balance: &[Option<f64>]) -> Result<Vec<Option<f64>>, IndexError>;
}

/// Standardizes against the sample mean and standard deviation of the
/// non-null balance values.
///
/// This is a deliberately simple stand-in for a full SPEI distribution fit;
/// swap in another [`IndexFitter`] for log-logistic or gamma fitting. With
/// `min_history` set, the first `min_history` scored observations come back
/// as `None`, mimicking the warm-up period of a real fit.
#[derive(Debug, Clone)]
pub struct ZScoreFitter {
    min_history: usize,
}

impl ZScoreFitter {
    pub fn new() -> Self {
        Self { min_history: 0 }
    }

    pub fn with_min_history(min_history: usize) -> Self {
        Self { min_history }
    }
}

impl Default for ZScoreFitter {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexFitter for ZScoreFitter {
    fn fit(&self, balance: &[Option<f64>]) -> Result<Vec<Option<f64>>, IndexError> {
        if balance.is_empty() {
            return Ok(Vec::new());
        }
        let finite: Vec<f64> = balance
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if finite.len() < 2 {
            return Err(IndexError::NotEnoughData(finite.len()));
        }
        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        if variance == 0.0 {
            return Err(IndexError::ZeroVariance);
        }
        let std_dev = variance.sqrt();

        let mut scored = 0usize;
        Ok(balance
            .iter()
            .map(|value| match value {
                Some(v) if v.is_finite() => {
                    scored += 1;
                    if scored <= self.min_history {
                        None
                    } else {
                        Some((v - mean) / std_dev)
                    }
                }
                _ => None,
            })
            .collect())
    }
}
