//! Prints annual precipitation totals from one observation spreadsheet.
//!
//! Usage: `cargo run --example annual_precipitation -- <prp file>`

use spei::SeriesLoader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/prp.xlsx".to_string());

    let precipitation = SeriesLoader::from_path(&path)?;
    for (year, total) in precipitation.annual_sum()? {
        println!("{year}: {total:.1} mm");
    }
    Ok(())
}
