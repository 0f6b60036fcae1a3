use crate::balance::frames::ObservationLazyFrame;
use crate::series_data::error::SeriesDataError;
use calamine::{open_workbook, Reader, Xlsx};
use log::{info, warn};
use polars::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads one observation spreadsheet (date + value columns) into an
/// [`ObservationLazyFrame`].
///
/// Upstream TerraClimate exports share a fixed shape regardless of the
/// variable they carry: a verbose header row, then a first data row that is
/// a header artifact (units), then one row per calendar month with an
/// ISO `YYYY-MM-DD` date and a numeric value. The loader takes the first two
/// columns positionally, renames them to `date` / `value`, drops the
/// artifact row and parses the rest strictly. Malformed dates or values
/// abort the run when the frame is collected.
pub struct SeriesLoader;

impl SeriesLoader {
    /// Loads a spreadsheet, dispatching on the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesDataError::UnsupportedFormat`] for anything other
    /// than `.csv` or `.xlsx`, and the format-specific variants when the
    /// file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<ObservationLazyFrame, SeriesDataError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Self::from_csv(path),
            Some("xlsx") => Self::from_xlsx(path),
            _ => Err(SeriesDataError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Loads a CSV export. All columns are read as strings; date parsing and
    /// the numeric cast happen lazily after the artifact row is dropped.
    pub fn from_csv(path: &Path) -> Result<ObservationLazyFrame, SeriesDataError> {
        info!("Reading observation series from CSV {:?}", path);
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| SeriesDataError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?
            .finish()
            .map_err(|e| SeriesDataError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::prepare(df, path)
    }

    /// Loads the first sheet of an `.xlsx` workbook.
    pub fn from_xlsx(path: &Path) -> Result<ObservationLazyFrame, SeriesDataError> {
        info!("Reading observation series from workbook {:?}", path);
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook(path).map_err(|e: calamine::XlsxError| SeriesDataError::WorkbookRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SeriesDataError::WorkbookRead {
                path: path.to_path_buf(),
                message: "workbook has no sheets".to_string(),
            })?;
        let range =
            workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| SeriesDataError::WorkbookRead {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;

        let mut dates: Vec<String> = Vec::new();
        let mut values: Vec<Option<String>> = Vec::new();
        // Row 0 is the column header; the artifact data row below it is
        // dropped in `prepare`, same as on the CSV path.
        for row in range.rows().skip(1) {
            if row.len() < 2 {
                return Err(SeriesDataError::SchemaMismatch {
                    path: path.to_path_buf(),
                    found: row.len(),
                });
            }
            // Date cells may be stored as real datetimes or as ISO text.
            let date = match row[0].as_datetime() {
                Some(dt) => dt.date().format("%Y-%m-%d").to_string(),
                None => row[0].to_string(),
            };
            dates.push(date);
            let value = row[1].to_string();
            let trimmed = value.trim();
            values.push(if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            });
        }

        let df = df!("date" => dates, "value" => values).map_err(|e| {
            SeriesDataError::FrameBuild {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        Self::prepare(df, path)
    }

    /// Common tail of both loaders: positional rename, artifact-row drop,
    /// strict date parse, numeric cast, ascending sort.
    fn prepare(df: DataFrame, path: &Path) -> Result<ObservationLazyFrame, SeriesDataError> {
        if df.width() < 2 {
            warn!(
                "Spreadsheet {:?} has {} columns, expected at least 2",
                path,
                df.width()
            );
            return Err(SeriesDataError::SchemaMismatch {
                path: path.to_path_buf(),
                found: df.width(),
            });
        }
        let names = df.get_column_names_owned();
        let frame = df
            .lazy()
            .select([
                col(names[0].as_str()).alias("date"),
                col(names[1].as_str()).alias("value"),
            ])
            .slice(1, IdxSize::MAX)
            .with_column(col("date").str().to_date(StrptimeOptions {
                format: Some("%Y-%m-%d".into()),
                strict: true,
                exact: false,
                cache: true,
            }))
            .with_column(col("value").strict_cast(DataType::Float64))
            .sort(["date"], SortMultipleOptions::default());
        Ok(ObservationLazyFrame::new(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write temp csv");
        file.flush().expect("flush temp csv");
        file
    }

    #[test]
    fn reads_csv_and_drops_artifact_row() {
        let file = write_csv(
            "Precipitation (TerraClimate),Unnamed: 1\n\
             data,dados\n\
             1981-01-01,120.5\n\
             1981-02-01,80.25\n",
        );

        let frame = SeriesLoader::from_path(file.path()).expect("load csv");
        let points = frame.collect_points().expect("collect points");

        assert_eq!(
            points,
            vec![
                (NaiveDate::from_ymd_opt(1981, 1, 1).unwrap(), Some(120.5)),
                (NaiveDate::from_ymd_opt(1981, 2, 1).unwrap(), Some(80.25)),
            ]
        );
    }

    #[test]
    fn empty_value_cells_become_nulls() {
        let file = write_csv(
            "Hargreaves Potential Evapotranspiration (TerraClimate),Unnamed: 1\n\
             data,dados\n\
             1981-01-01,\n\
             1981-02-01,42.0\n",
        );

        let frame = SeriesLoader::from_path(file.path()).expect("load csv");
        let points = frame.collect_points().expect("collect points");

        assert_eq!(points[0].1, None);
        assert_eq!(points[1].1, Some(42.0));
    }

    #[test]
    fn malformed_value_is_fatal_on_collect() {
        // A bad cell must abort the run, not degrade to a null that flows
        // through the pipeline as missing data.
        let file = write_csv(
            "Precipitation (TerraClimate),Unnamed: 1\n\
             data,dados\n\
             1981-01-01,100.0\n\
             1981-02-01,not-a-number\n",
        );

        let frame = SeriesLoader::from_path(file.path()).expect("load csv");
        assert!(frame.collect_points().is_err());
    }

    #[test]
    fn malformed_date_is_fatal_on_collect() {
        let file = write_csv(
            "Precipitation (TerraClimate),Unnamed: 1\n\
             data,dados\n\
             January 1981,10.0\n",
        );

        let frame = SeriesLoader::from_path(file.path()).expect("load csv");
        assert!(frame.collect_points().is_err());
    }

    #[test]
    fn rejects_unknown_extension() {
        let result = SeriesLoader::from_path("observations.parquet");
        assert!(matches!(
            result,
            Err(SeriesDataError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_single_column_spreadsheet() {
        let file = write_csv("Precipitation (TerraClimate)\ndata\n1981-01-01\n");
        let result = SeriesLoader::from_path(file.path());
        assert!(matches!(
            result,
            Err(SeriesDataError::SchemaMismatch { found: 1, .. })
        ));
    }
}
