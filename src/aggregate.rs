use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::derive::ORDER_DAY;
use crate::join::{
    string_column,
    views::{CUSTOMER_STATE, ORDER_ID, PAYMENT_TYPE, PRODUCT_CATEGORY_ENGLISH},
    Views,
};

/// Categories kept in the product sales chart.
pub const TOP_CATEGORIES: usize = 10;

/// One bar of a chart: a category label and how many rows it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// The four chart inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregations {
    pub top_products: Vec<CategoryCount>,
    pub payment_counts: Vec<CategoryCount>,
    pub customer_counts: Vec<CategoryCount>,
    pub order_days: Vec<CategoryCount>,
}

const COUNT: &str = "count";

/// Count rows per non-null `group` value, highest count first and equal counts
/// by label, keeping at most `limit` groups.
fn counts_by(
    df: &DataFrame,
    group: &str,
    counted: Expr,
    limit: Option<usize>,
) -> Result<Vec<CategoryCount>> {
    let mut query = df
        .clone()
        .lazy()
        .filter(col(group).is_not_null())
        .group_by([col(group)])
        .agg([counted.alias(COUNT)])
        .sort_by_exprs(
            [col(COUNT), col(group)],
            SortMultipleOptions {
                descending: vec![true, false],
                ..Default::default()
            },
        );
    if let Some(n) = limit {
        query = query.limit(n as IdxSize);
    }
    let out = query
        .collect()
        .with_context(|| format!("aggregating by {}", group))?;

    let labels = string_column(&out, group)?;
    let counts = out.column(COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;
    Ok(labels
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(label, count)| Some(CategoryCount::new(label?, count? as usize)))
        .collect())
}

/// Rows per distinct non-null value of `column`.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<CategoryCount>> {
    string_column(df, column).with_context(|| format!("counting values of {}", column))?;
    counts_by(df, column, len(), None)
}

/// Per non-null `group_column` value, the number of non-null `counted_column` values.
pub fn group_count(
    df: &DataFrame,
    group_column: &str,
    counted_column: &str,
) -> Result<Vec<CategoryCount>> {
    top_n(df, group_column, counted_column, None)
}

/// [`group_count`] cut to the `n` largest groups inside the query.
pub fn top_n(
    df: &DataFrame,
    group_column: &str,
    counted_column: &str,
    n: Option<usize>,
) -> Result<Vec<CategoryCount>> {
    string_column(df, group_column).with_context(|| format!("grouping by {}", group_column))?;
    string_column(df, counted_column).with_context(|| format!("counting {}", counted_column))?;
    counts_by(df, group_column, col(counted_column).count(), n)
}

/// Compute all four aggregations from the views.
pub fn aggregate(views: &Views, top: usize) -> Result<Aggregations> {
    Ok(Aggregations {
        top_products: top_n(
            &views.product_sales,
            PRODUCT_CATEGORY_ENGLISH,
            ORDER_ID,
            Some(top),
        )?,
        payment_counts: value_counts(&views.payment_analysis, PAYMENT_TYPE)?,
        customer_counts: value_counts(&views.customer_distribution, CUSTOMER_STATE)?,
        order_days: value_counts(&views.customer_distribution, ORDER_DAY)?,
    })
}
