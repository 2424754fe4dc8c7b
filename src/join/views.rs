use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::info;

use crate::derive::{with_order_day, ORDER_DAY};
use crate::join::inner_join;
use crate::load::{
    DataSet, CATEGORY_TRANSLATION, CUSTOMERS, ORDERS, ORDER_ITEMS, ORDER_PAYMENTS, PRODUCTS,
};

pub const PRODUCT_ID: &str = "product_id";
pub const PRODUCT_CATEGORY: &str = "product_category_name";
pub const PRODUCT_CATEGORY_ENGLISH: &str = "product_category_name_english";
pub const ORDER_ID: &str = "order_id";
pub const CUSTOMER_ID: &str = "customer_id";
pub const CUSTOMER_STATE: &str = "customer_state";
pub const PAYMENT_TYPE: &str = "payment_type";
pub const PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";

/// The three derived views behind the dashboard.
#[derive(Debug, Clone)]
pub struct Views {
    /// Order line items with product and English category name.
    pub product_sales: DataFrame,
    /// One row per payment record, with its order.
    pub payment_analysis: DataFrame,
    /// One row per order, with its customer and `order_day`.
    pub customer_distribution: DataFrame,
}

/// order_items ⋈ products on product_id ⋈ translation on product_category_name
pub fn product_sales(data: &DataSet) -> Result<DataFrame> {
    let items_products = inner_join(
        data.table(ORDER_ITEMS)?,
        data.table(PRODUCTS)?,
        PRODUCT_ID,
        PRODUCT_ID,
    )
    .context("joining order items with products")?;

    inner_join(
        &items_products,
        data.table(CATEGORY_TRANSLATION)?,
        PRODUCT_CATEGORY,
        PRODUCT_CATEGORY,
    )
    .context("joining products with category translations")
}

/// orders ⋈ order_payments on order_id
pub fn payment_analysis(data: &DataSet) -> Result<DataFrame> {
    inner_join(
        data.table(ORDERS)?,
        data.table(ORDER_PAYMENTS)?,
        ORDER_ID,
        ORDER_ID,
    )
    .context("joining orders with payments")
}

/// customers ⋈ orders on customer_id, plus `order_day`
pub fn customer_distribution(data: &DataSet) -> Result<DataFrame> {
    let joined = inner_join(
        data.table(CUSTOMERS)?,
        data.table(ORDERS)?,
        CUSTOMER_ID,
        CUSTOMER_ID,
    )
    .context("joining customers with orders")?;

    with_order_day(&joined, PURCHASE_TIMESTAMP)
        .with_context(|| format!("deriving {}", ORDER_DAY))
}

pub fn build_views(data: &DataSet) -> Result<Views> {
    let views = Views {
        product_sales: product_sales(data)?,
        payment_analysis: payment_analysis(data)?,
        customer_distribution: customer_distribution(data)?,
    };
    info!(
        product_sales = views.product_sales.height(),
        payment_analysis = views.payment_analysis.height(),
        customer_distribution = views.customer_distribution.height(),
        "built views"
    );
    Ok(views)
}
