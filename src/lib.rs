pub mod aggregate;
pub mod derive;
pub mod join;
pub mod load;
pub mod pipeline;
pub mod render;

pub use aggregate::{Aggregations, CategoryCount};
pub use join::Views;
pub use load::{DataSet, REQUIRED_FILES};
pub use pipeline::{run, Config, Report};
pub use render::Dashboard;

/// Shared fixture helpers for the per-module test suites.
#[cfg(test)]
pub(crate) mod testutil {
    use polars::prelude::*;

    /// Build an all-String frame from `(column, values)` pairs.
    pub fn frame(cols: &[(&str, Vec<Option<&str>>)]) -> DataFrame {
        let columns: Vec<Column> = cols
            .iter()
            .map(|(name, vals)| Series::new((*name).into(), vals.clone()).into_column())
            .collect();
        DataFrame::new(columns).unwrap()
    }

    /// Read a String column back as owned options.
    pub fn column(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }
}
