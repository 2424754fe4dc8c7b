// src/load/mod.rs
use anyhow::{anyhow, bail, Context, Result};
use polars::prelude::DataFrame;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, info, instrument};

pub mod csv_table;

pub use csv_table::read_csv_table;

pub const ORDER_ITEMS: &str = "olist_order_items_dataset.csv";
pub const ORDER_PAYMENTS: &str = "olist_order_payments_dataset.csv";
pub const CUSTOMERS: &str = "olist_customers_dataset.csv";
pub const ORDERS: &str = "olist_orders_dataset.csv";
pub const PRODUCTS: &str = "olist_products_dataset.csv";
pub const CATEGORY_TRANSLATION: &str = "product_category_name_translation.csv";

/// Every file the dashboard reads, in load order.
pub const REQUIRED_FILES: [&str; 6] = [
    ORDER_ITEMS,
    ORDER_PAYMENTS,
    CUSTOMERS,
    ORDERS,
    PRODUCTS,
    CATEGORY_TRANSLATION,
];

/// The raw tables, keyed by source file name.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    tables: BTreeMap<String, DataFrame>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_name: impl Into<String>, table: DataFrame) {
        self.tables.insert(file_name.into(), table);
    }

    /// Look up a table by file name.
    pub fn table(&self, file_name: &str) -> Result<&DataFrame> {
        self.tables
            .get(file_name)
            .ok_or_else(|| anyhow!("table {} not loaded", file_name))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Paths of all required files under `data_dir`.
pub fn required_paths(data_dir: &Path) -> Vec<PathBuf> {
    REQUIRED_FILES.iter().map(|f| data_dir.join(f)).collect()
}

/// Create `data_dir` if needed, check every required file is present, then
/// read each one into memory.
#[instrument(level = "debug", skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn load_dataset(data_dir: &Path) -> Result<DataSet> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let missing: Vec<String> = required_paths(data_dir)
        .iter()
        .filter(|p| !p.is_file())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        bail!("missing required data files: {}", missing.join(", "));
    }

    let mut data = DataSet::new();
    for file in REQUIRED_FILES {
        let path = data_dir.join(file);
        let start = Instant::now();
        let table = read_csv_table(&path).with_context(|| format!("loading {}", file))?;
        info!(
            file,
            rows = table.height(),
            columns = table.width(),
            "loaded table"
        );
        debug!(file, elapsed = ?start.elapsed(), "load timing");
        data.insert(file, table);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_all(dir: &Path) {
        for file in REQUIRED_FILES {
            fs::write(dir.join(file), "id,name\n1,a\n2,b\n").unwrap();
        }
    }

    #[test]
    fn test_loads_one_table_per_file() {
        let tmp = tempdir().unwrap();
        write_all(tmp.path());

        let data = load_dataset(tmp.path()).unwrap();
        assert_eq!(data.len(), REQUIRED_FILES.len());
        for file in REQUIRED_FILES {
            let t = data.table(file).unwrap();
            assert_eq!(t.height(), 2);
            assert_eq!(t.get_column_names_str(), vec!["id", "name"]);
        }
    }

    #[test]
    fn test_creates_directory_and_reports_all_missing() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("olist_data");

        let err = load_dataset(&dir).unwrap_err().to_string();
        assert!(dir.is_dir());
        for file in REQUIRED_FILES {
            assert!(err.contains(file), "{} not named in {}", file, err);
        }
    }

    #[test]
    fn test_single_missing_file() {
        let tmp = tempdir().unwrap();
        write_all(tmp.path());
        fs::remove_file(tmp.path().join(PRODUCTS)).unwrap();

        let err = load_dataset(tmp.path()).unwrap_err().to_string();
        assert!(err.contains(PRODUCTS));
        assert!(!err.contains(ORDERS));
    }

    #[test]
    fn test_unknown_table_lookup() {
        let data = DataSet::new();
        assert!(data.is_empty());
        assert!(data.table(ORDERS).is_err());
    }
}
