// src/render/mod.rs
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use std::{borrow::Cow, fs, path::Path};
use tracing::{info, warn};

use crate::aggregate::{Aggregations, CategoryCount};
use crate::join::Views;

pub mod palette;
pub mod svg;

pub use palette::Palette;
pub use svg::{BarChart, Orientation};

pub const PAGE_TITLE: &str = "E-Commerce Data Analysis Dashboard";

/// Fixed wording and styling of one dashboard section.
#[derive(Debug, Clone)]
pub struct SectionLayout {
    pub heading: Cow<'static, str>,
    pub title: Cow<'static, str>,
    pub value_label: &'static str,
    pub category_label: &'static str,
    pub orientation: Orientation,
    pub palette: Palette,
    pub warning: &'static str,
}

/// The product sales section, worded for the `top` categories it shows.
pub fn top_products(top: usize) -> SectionLayout {
    SectionLayout {
        heading: Cow::Owned(format!("Top {} Best Selling Product Categories", top)),
        title: Cow::Owned(format!("Top {} Product Categories by Orders", top)),
        value_label: "Number of Orders",
        category_label: "Product Category",
        orientation: Orientation::Horizontal,
        palette: Palette::Viridis,
        warning: "No data available for product sales.",
    }
}

pub const PAYMENT_METHODS: SectionLayout = SectionLayout {
    heading: Cow::Borrowed("Most Used Payment Methods"),
    title: Cow::Borrowed("Top Payment Methods"),
    value_label: "Number of Transactions",
    category_label: "Payment Method",
    orientation: Orientation::Horizontal,
    palette: Palette::Magma,
    warning: "No data available for payment analysis.",
};

pub const CUSTOMER_PROVINCES: SectionLayout = SectionLayout {
    heading: Cow::Borrowed("Customer Distribution by Province"),
    title: Cow::Borrowed("Customer Distribution by Province"),
    value_label: "Number of Customers",
    category_label: "Province",
    orientation: Orientation::Horizontal,
    palette: Palette::CoolWarm,
    warning: "No data available for customer distribution.",
};

pub const SHOPPING_DAYS: SectionLayout = SectionLayout {
    heading: Cow::Borrowed("Most Popular Shopping Days"),
    title: Cow::Borrowed("Shopping Frequency by Day"),
    value_label: "Number of Orders",
    category_label: "Day of the Week",
    orientation: Orientation::Vertical,
    palette: Palette::Blues,
    warning: "No data available for shopping frequency.",
};

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Chart(BarChart),
    Warning(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub body: SectionBody,
}

impl Section {
    /// A chart of `counts`, or the section's warning when `view` has no rows.
    pub fn build(layout: &SectionLayout, view: &DataFrame, counts: &[CategoryCount]) -> Self {
        let body = if view.height() == 0 {
            warn!(section = %layout.heading, "view is empty, showing warning");
            SectionBody::Warning(layout.warning.to_string())
        } else {
            SectionBody::Chart(BarChart {
                title: layout.title.to_string(),
                value_label: layout.value_label.to_string(),
                category_label: layout.category_label.to_string(),
                orientation: layout.orientation,
                palette: layout.palette,
                bars: counts.to_vec(),
            })
        };
        Self {
            heading: layout.heading.to_string(),
            body,
        }
    }

    fn to_html(&self) -> String {
        let body = match &self.body {
            SectionBody::Chart(chart) => format!("<div class=\"chart\">\n{}</div>", chart.to_svg()),
            SectionBody::Warning(msg) => format!("<p class=\"warning\">{}</p>", escape(msg)),
        };
        format!(
            "<section>\n<h2>{}</h2>\n{}\n</section>\n",
            escape(&self.heading),
            body
        )
    }
}

/// The whole page: a title and four sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Dashboard {
    /// `top` is the category limit the product sales counts were cut to.
    pub fn build(views: &Views, aggs: &Aggregations, top: usize) -> Self {
        let sections = vec![
            Section::build(&top_products(top), &views.product_sales, &aggs.top_products),
            Section::build(
                &PAYMENT_METHODS,
                &views.payment_analysis,
                &aggs.payment_counts,
            ),
            Section::build(
                &CUSTOMER_PROVINCES,
                &views.customer_distribution,
                &aggs.customer_counts,
            ),
            Section::build(
                &SHOPPING_DAYS,
                &views.customer_distribution,
                &aggs.order_days,
            ),
        ];
        Self {
            title: PAGE_TITLE.to_string(),
            sections,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape(&self.title)));
        for section in &self.sections {
            html.push_str(&section.to_html());
        }
        html.push_str("</body>\n</html>\n");
        html
    }

    pub fn write_html(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        fs::write(path, self.to_html())
            .with_context(|| format!("writing dashboard to {}", path.display()))?;
        info!(path = %path.display(), sections = self.sections.len(), "wrote dashboard");
        Ok(())
    }
}

const STYLE: &str = "<style>
body { font-family: sans-serif; max-width: 800px; margin: 2em auto; color: #222; }
h1 { font-size: 1.8em; }
h2 { font-size: 1.3em; margin-top: 1.6em; }
.warning { background: #fff8e1; border-left: 4px solid #f0b400; padding: 0.8em 1em; }
</style>
";

/// Escape text for HTML/SVG content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
