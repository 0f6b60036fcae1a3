//! The closed set of drought/humidity classes a standardized index value
//! maps onto, with the fixed thresholds used by the historical reports.

use serde::Serialize;
use std::fmt;

/// Drought/humidity class of a standardized index value, ordered from the
/// driest to the wettest extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    ExtremeDrought = 0,
    SevereDrought = 1,
    ModerateDrought = 2,
    WeakDrought = 3,
    WeakHumidity = 4,
    ModerateHumidity = 5,
    SevereHumidity = 6,
    ExtremeHumidity = 7,
}

impl Category {
    pub const COUNT: usize = 8;

    /// All categories, driest first. This is the presentation order of every
    /// stacked chart downstream.
    pub const ALL: [Category; Category::COUNT] = [
        Category::ExtremeDrought,
        Category::SevereDrought,
        Category::ModerateDrought,
        Category::WeakDrought,
        Category::WeakHumidity,
        Category::ModerateHumidity,
        Category::SevereHumidity,
        Category::ExtremeHumidity,
    ];

    /// Ordered half-open intervals `lower <= value < upper`, checked
    /// top-down; the first match wins and anything left over is
    /// `ExtremeDrought`.
    ///
    /// The drought side keeps the historical `-0.99` cutoff, so values in
    /// `[-1.00, -0.99)` match no interval and fall through to the
    /// `ExtremeDrought` catch-all. That asymmetry is inherited from the
    /// reports this crate reproduces and must not be "fixed" without
    /// breaking parity with them.
    const BOUNDS: [(f64, f64, Category); 7] = [
        (2.00, f64::INFINITY, Category::ExtremeHumidity),
        (1.50, 2.00, Category::SevereHumidity),
        (1.00, 1.50, Category::ModerateHumidity),
        (0.00, 1.00, Category::WeakHumidity),
        (-0.99, 0.00, Category::WeakDrought),
        (-1.50, -1.00, Category::ModerateDrought),
        (-1.99, -1.50, Category::SevereDrought),
    ];

    /// Maps a finite index value to its category. Total over the real line;
    /// `NaN` also lands on the catch-all, so callers that must treat `NaN`
    /// as missing (the classifier does) filter it out first.
    pub fn from_value(value: f64) -> Category {
        for (lower, upper, category) in Self::BOUNDS {
            if value >= lower && (value < upper || (upper.is_infinite() && value.is_infinite())) {
                return category;
            }
        }
        Category::ExtremeDrought
    }

    /// Position in [`Category::ALL`], usable as an array index.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::ExtremeDrought => "Extreme drought",
            Category::SevereDrought => "Severe drought",
            Category::ModerateDrought => "Moderate drought",
            Category::WeakDrought => "Weak drought",
            Category::WeakHumidity => "Weak humidity",
            Category::ModerateHumidity => "Moderate humidity",
            Category::SevereHumidity => "Severe humidity",
            Category::ExtremeHumidity => "Extreme humidity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_reference_values() {
        assert_eq!(Category::from_value(2.5), Category::ExtremeHumidity);
        assert_eq!(Category::from_value(-0.5), Category::WeakDrought);
        assert_eq!(Category::from_value(-1.2), Category::ModerateDrought);
        assert_eq!(Category::from_value(-2.5), Category::ExtremeDrought);
    }

    #[test]
    fn lower_bounds_are_inclusive() {
        assert_eq!(Category::from_value(2.00), Category::ExtremeHumidity);
        assert_eq!(Category::from_value(1.50), Category::SevereHumidity);
        assert_eq!(Category::from_value(1.00), Category::ModerateHumidity);
        assert_eq!(Category::from_value(0.00), Category::WeakHumidity);
        assert_eq!(Category::from_value(-0.99), Category::WeakDrought);
        assert_eq!(Category::from_value(-1.50), Category::ModerateDrought);
        assert_eq!(Category::from_value(-1.99), Category::SevereDrought);
    }

    #[test]
    fn upper_bounds_are_exclusive() {
        assert_eq!(Category::from_value(1.999), Category::SevereHumidity);
        assert_eq!(Category::from_value(0.999), Category::WeakHumidity);
        assert_eq!(Category::from_value(-0.001), Category::WeakDrought);
        assert_eq!(Category::from_value(-1.001), Category::ModerateDrought);
        assert_eq!(Category::from_value(-1.501), Category::SevereDrought);
    }

    #[test]
    fn historical_boundary_gap_falls_through_to_extreme_drought() {
        // [-1.00, -0.99) matches no drought interval in the historical
        // scheme: -0.99 opens WeakDrought and ModerateDrought closes below
        // -1.00. Those values have always been reported as extreme drought,
        // -1.00 itself included.
        assert_eq!(Category::from_value(-0.995), Category::ExtremeDrought);
        assert_eq!(Category::from_value(-1.00), Category::ExtremeDrought);
        assert_eq!(Category::from_value(-1.001), Category::ModerateDrought);
        assert_eq!(Category::from_value(-2.00), Category::ExtremeDrought);
    }

    #[test]
    fn every_finite_value_maps_to_exactly_one_category() {
        let mut value = -4.0;
        while value < 4.0 {
            let category = Category::from_value(value);
            let matches = Category::BOUNDS
                .iter()
                .filter(|(lower, upper, _)| value >= *lower && value < *upper)
                .count();
            // Either exactly one interval matched, or the catch-all did.
            assert!(matches <= 1);
            if matches == 0 {
                assert_eq!(category, Category::ExtremeDrought);
            }
            value += 0.013;
        }
    }

    #[test]
    fn infinities_land_on_the_extremes() {
        assert_eq!(Category::from_value(f64::INFINITY), Category::ExtremeHumidity);
        assert_eq!(
            Category::from_value(f64::NEG_INFINITY),
            Category::ExtremeDrought
        );
    }

    #[test]
    fn display_uses_the_report_labels() {
        assert_eq!(Category::ExtremeHumidity.to_string(), "Extreme humidity");
        assert_eq!(Category::WeakDrought.to_string(), "Weak drought");
    }

    #[test]
    fn all_is_ordered_and_indexable() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }
}
