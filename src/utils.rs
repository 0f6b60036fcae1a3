use chrono::NaiveDate;

// Polars Date values are days since 1970-01-01; chrono counts days from
// 0001-01-01, offset by 719_163 days.
pub(crate) const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn date_from_days_since_epoch(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}
