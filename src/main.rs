use anyhow::Result;
use clap::Parser;
use olist_dashboard::{
    aggregate::TOP_CATEGORIES,
    pipeline::{DEFAULT_DATA_DIR, DEFAULT_OUTPUT},
    run, Config,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Render the Olist e-commerce dashboard to a static HTML page"
)]
struct Args {
    /// Directory holding the six Olist CSV files (created if absent)
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Where to write the HTML page
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Optional JSON dump of the four aggregations
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Number of product categories to chart
    #[arg(long, default_value_t = TOP_CATEGORIES)]
    top: usize,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    info!(data_dir = %args.data_dir.display(), "startup");

    let report = run(&Config {
        data_dir: args.data_dir,
        output: args.output,
        summary: args.summary,
        top: args.top,
    })?;

    info!(
        output = %report.output.display(),
        categories = report.aggregations.top_products.len(),
        "all done"
    );
    Ok(())
}
