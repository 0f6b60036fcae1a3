//! Period keys for occurrence aggregation: calendar years, pooled months
//! and the four fixed decade windows of the study period.

use serde::Serialize;
use std::fmt;

/// The four fixed decade windows of the study period. Years outside
/// 1981..=2020 carry no decade bucket and are excluded from decade-based
/// aggregation (they still count toward year and month groupings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Decade {
    D1981To1990,
    D1991To2000,
    D2001To2010,
    D2011To2020,
}

impl Decade {
    pub const ALL: [Decade; 4] = [
        Decade::D1981To1990,
        Decade::D1991To2000,
        Decade::D2001To2010,
        Decade::D2011To2020,
    ];

    pub fn from_year(year: i32) -> Option<Decade> {
        match year {
            1981..=1990 => Some(Decade::D1981To1990),
            1991..=2000 => Some(Decade::D1991To2000),
            2001..=2010 => Some(Decade::D2001To2010),
            2011..=2020 => Some(Decade::D2011To2020),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decade::D1981To1990 => "1981-1990",
            Decade::D1991To2000 => "1991-2000",
            Decade::D2001To2010 => "2001-2010",
            Decade::D2011To2020 => "2011-2020",
        }
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grouping granularity for occurrence aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodGranularity {
    Year,
    Month,
    Decade,
}

/// Key of one aggregation bucket. Orders chronologically within a
/// granularity, which keeps grouped output tables sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PeriodKey {
    Year(i32),
    /// Calendar month 1-12, pooled across all years.
    Month(u32),
    Decade(Decade),
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Year(year) => write!(f, "{year}"),
            PeriodKey::Month(month) => write!(f, "{month}"),
            PeriodKey::Decade(decade) => write!(f, "{decade}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_decade_years_bucket_by_label() {
        assert_eq!(Decade::from_year(1995), Some(Decade::D1991To2000));
        assert_eq!(Decade::from_year(2003), Some(Decade::D2001To2010));
    }

    #[test]
    fn decade_edges_match_their_labels() {
        assert_eq!(Decade::from_year(1981), Some(Decade::D1981To1990));
        assert_eq!(Decade::from_year(1990), Some(Decade::D1981To1990));
        assert_eq!(Decade::from_year(1991), Some(Decade::D1991To2000));
        assert_eq!(Decade::from_year(2020), Some(Decade::D2011To2020));
    }

    #[test]
    fn years_outside_the_study_period_have_no_bucket() {
        assert_eq!(Decade::from_year(1980), None);
        assert_eq!(Decade::from_year(2021), None);
    }

    #[test]
    fn period_keys_order_chronologically() {
        assert!(PeriodKey::Year(1995) < PeriodKey::Year(2001));
        assert!(PeriodKey::Month(1) < PeriodKey::Month(12));
        assert!(
            PeriodKey::Decade(Decade::D1981To1990) < PeriodKey::Decade(Decade::D2011To2020)
        );
    }
}
