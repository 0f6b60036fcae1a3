//! Prints the per-decade category occurrence table as JSON rows, one per
//! decade, from two observation spreadsheets.
//!
//! Usage: `cargo run --example drought_report -- <etp file> <prp file>`
//! The accumulation window can be set with `SPEI_ACCUMULATION` (default 1).

use spei::{PeriodGranularity, SpeiPipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let etp_path = args.next().unwrap_or_else(|| "data/etp.xlsx".to_string());
    let prp_path = args.next().unwrap_or_else(|| "data/prp.xlsx".to_string());
    let accumulation = std::env::var("SPEI_ACCUMULATION")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let pipeline = SpeiPipeline::builder().accumulation(accumulation).build()?;
    let run = pipeline.run(&etp_path, &prp_path)?;

    if run.is_empty() {
        println!("no data");
        return Ok(());
    }

    for row in run.occurrence_percentages(PeriodGranularity::Decade) {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}
