use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;

use crate::aggregate::{aggregate, Aggregations, TOP_CATEGORIES};
use crate::join::build_views;
use crate::load::load_dataset;
use crate::render::Dashboard;

pub const DEFAULT_DATA_DIR: &str = "./olist_data";
pub const DEFAULT_OUTPUT: &str = "./dashboard.html";

/// Where to read from, where to write to, and how many categories to chart.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub output: PathBuf,
    /// Also dump the aggregations as JSON here.
    pub summary: Option<PathBuf>,
    pub top: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            summary: None,
            top: TOP_CATEGORIES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub aggregations: Aggregations,
    pub output: PathBuf,
}

/// One page load: read the files, join, aggregate, render, write.
pub fn run(config: &Config) -> Result<Report> {
    let start = Instant::now();

    let data = load_dataset(&config.data_dir)?;
    let views = build_views(&data)?;
    let aggregations = aggregate(&views, config.top)?;

    let dashboard = Dashboard::build(&views, &aggregations, config.top);
    dashboard.write_html(&config.output)?;

    if let Some(path) = &config.summary {
        write_summary(&aggregations, path)?;
    }

    info!(elapsed = ?start.elapsed(), "dashboard complete");
    Ok(Report {
        aggregations,
        output: config.output.clone(),
    })
}

fn write_summary(aggregations: &Aggregations, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating summary directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, aggregations)
        .with_context(|| format!("writing summary to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing summary to {}", path.display()))?;
    info!(path = %path.display(), "wrote summary");
    Ok(())
}
