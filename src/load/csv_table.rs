use anyhow::{Context, Result};
use polars::prelude::*;
use std::{fs::File, path::Path};
use tracing::{debug, warn};

/// Trim whitespace, a leading BOM, and outer quotes from a header cell.
pub fn clean_header(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Load a whole comma-delimited file with a header row into one `DataFrame`.
///
/// Schema inference is switched off so every column is `String`; empty
/// fields become nulls.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let opts = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0));
    let mut df = match opts.into_reader_with_file_handle(file).finish() {
        Ok(df) => df,
        Err(e) => {
            warn!("CSV parsing failed for {}", path.display());
            return Err(e).with_context(|| format!("reading rows of {}", path.display()));
        }
    };

    let cleaned: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(clean_header)
        .collect();
    df.set_column_names(cleaned)
        .with_context(|| format!("renaming header columns of {}", path.display()))?;

    debug!(file = %path.display(), shape = ?df.shape(), "read CSV table");
    Ok(df)
}
