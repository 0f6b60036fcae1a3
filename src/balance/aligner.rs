//! Merges the two monthly observation series and derives the rolling
//! water-balance aggregate the index fitter consumes.

use crate::balance::frames::{AlignedLazyFrame, ObservationLazyFrame, WaterBalanceLazyFrame};
use crate::error::SpeiError;
use polars::prelude::*;

/// Stateless transforms from raw observation series to the accumulated
/// water-balance series. Every run invokes these once, in order:
/// [`align`](TimeSeriesAligner::align) →
/// [`water_balance`](TimeSeriesAligner::water_balance) →
/// [`rolling_sum`](TimeSeriesAligner::rolling_sum), or the composed
/// [`prepare`](TimeSeriesAligner::prepare).
pub struct TimeSeriesAligner;

impl TimeSeriesAligner {
    /// Inner-joins the evapotranspiration and precipitation series on their
    /// date key, ascending.
    ///
    /// Dates present in only one source are silently dropped; upstream
    /// exports routinely differ in coverage and the mismatch is not an
    /// error. Empty inputs simply produce an empty frame.
    pub fn align(etp: &ObservationLazyFrame, prp: &ObservationLazyFrame) -> AlignedLazyFrame {
        let etp = etp
            .frame
            .clone()
            .select([col("date"), col("value").alias("etp")]);
        let prp = prp
            .frame
            .clone()
            .select([col("date"), col("value").alias("prp")]);
        let frame = etp
            .join(prp, [col("date")], [col("date")], JoinArgs::new(JoinType::Inner))
            .sort(["date"], SortMultipleOptions::default());
        AlignedLazyFrame::new(frame)
    }

    /// Water balance per row: precipitation minus evapotranspiration.
    /// A null component yields a null balance; no interpolation.
    pub fn water_balance(aligned: &AlignedLazyFrame) -> WaterBalanceLazyFrame {
        let frame = aligned
            .frame
            .clone()
            .select([col("date"), (col("prp") - col("etp")).alias("balance")]);
        WaterBalanceLazyFrame::new(frame)
    }

    /// Trailing sum over `window` consecutive months.
    ///
    /// Only fully-populated windows are emitted: the first `window - 1`
    /// dates are dropped, so the output holds `max(0, len - window + 1)`
    /// rows. A null anywhere inside a window nulls that window's sum, which
    /// keeps the output numerically identical to the historical reports.
    /// `window == 1` is the identity transform.
    ///
    /// # Errors
    ///
    /// Returns [`SpeiError::InvalidAccumulation`] when `window == 0`.
    pub fn rolling_sum(
        balance: &WaterBalanceLazyFrame,
        window: usize,
    ) -> Result<WaterBalanceLazyFrame, SpeiError> {
        if window == 0 {
            return Err(SpeiError::InvalidAccumulation(window));
        }
        if window == 1 {
            return Ok(balance.clone());
        }
        let frame = balance
            .frame
            .clone()
            .with_column(col("balance").rolling_sum(RollingOptionsFixedWindow {
                window_size: window,
                min_periods: window,
                ..Default::default()
            }))
            .slice((window - 1) as i64, IdxSize::MAX);
        Ok(WaterBalanceLazyFrame::new(frame))
    }

    /// The full preparation pipeline: align, subtract, accumulate.
    pub fn prepare(
        etp: &ObservationLazyFrame,
        prp: &ObservationLazyFrame,
        window: usize,
    ) -> Result<WaterBalanceLazyFrame, SpeiError> {
        let aligned = Self::align(etp, prp);
        let balance = Self::water_balance(&aligned);
        Self::rolling_sum(&balance, window)
    }
}
