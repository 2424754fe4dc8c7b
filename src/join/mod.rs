use anyhow::{Context, Result};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

pub mod views;

pub use views::{build_views, customer_distribution, payment_analysis, product_sales, Views};

/// Suffixes given to non-key columns that appear on both sides of a join.
pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

const LEFT_ROW: &str = "__left_row";
const RIGHT_ROW: &str = "__right_row";

/// Borrow a named column as a string chunked array.
pub fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .with_context(|| format!("column {} not found", name))?
        .str()
        .with_context(|| format!("column {} is not a string column", name))
}

/// `(source, output)` column names for one side of a join.
fn renamed(df: &DataFrame, clash: &HashSet<String>, suffix: &str) -> Vec<(String, String)> {
    df.get_column_names_str()
        .into_iter()
        .map(|name| {
            let out = if clash.contains(name) {
                format!("{}{}", name, suffix)
            } else {
                name.to_string()
            };
            (name.to_string(), out)
        })
        .collect()
}

fn output_name<'a>(names: &'a [(String, String)], source: &'a str) -> &'a str {
    names
        .iter()
        .find(|(src, _)| src == source)
        .map(|(_, out)| out.as_str())
        .unwrap_or(source)
}

fn aliased(names: &[(String, String)]) -> Vec<Expr> {
    names
        .iter()
        .map(|(src, out)| col(src.as_str()).alias(out.as_str()))
        .collect()
}

/// Inner equi-join of `left` and `right` on `left[left_on] == right[right_on]`.
///
/// Rows come out in left order; within one left row, matches keep right order.
/// Duplicate keys produce every pairing, null keys never match. When both key
/// columns share a name only the left one is kept; any other shared column
/// name is suffixed `_x`/`_y`.
pub fn inner_join(
    left: &DataFrame,
    right: &DataFrame,
    left_on: &str,
    right_on: &str,
) -> Result<DataFrame> {
    string_column(left, left_on).context("left join key")?;
    string_column(right, right_on).context("right join key")?;

    let shared_key = left_on == right_on;
    let skip = shared_key.then_some(right_on);

    let left_names: HashSet<String> = left
        .get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect();
    let clash: HashSet<String> = right
        .get_column_names_str()
        .into_iter()
        .filter(|name| Some(*name) != skip && left_names.contains(*name))
        .map(str::to_string)
        .collect();

    let left_cols = renamed(left, &clash, LEFT_SUFFIX);
    let right_cols = renamed(right, &clash, RIGHT_SUFFIX);
    let left_key = output_name(&left_cols, left_on).to_string();
    let right_key = output_name(&right_cols, right_on).to_string();

    let left_lf = left
        .clone()
        .lazy()
        .select(aliased(&left_cols))
        .with_row_index(LEFT_ROW, None);
    let right_lf = right
        .clone()
        .lazy()
        .select(aliased(&right_cols))
        .with_row_index(RIGHT_ROW, None);

    let coalesce = if shared_key {
        JoinCoalesce::CoalesceColumns
    } else {
        JoinCoalesce::KeepColumns
    };
    let columns: Vec<Expr> = left_cols
        .iter()
        .chain(right_cols.iter().filter(|(src, _)| Some(src.as_str()) != skip))
        .map(|(_, out)| col(out.as_str()))
        .collect();

    let out = left_lf
        .join(
            right_lf,
            [col(left_key.as_str())],
            [col(right_key.as_str())],
            JoinArgs::new(JoinType::Inner).with_coalesce(coalesce),
        )
        .sort_by_exprs([col(LEFT_ROW), col(RIGHT_ROW)], SortMultipleOptions::default())
        .select(columns)
        .collect()
        .with_context(|| format!("joining on {}={}", left_on, right_on))?;

    debug!(
        left_rows = left.height(),
        right_rows = right.height(),
        out_rows = out.height(),
        on = %format!("{}={}", left_on, right_on),
        "inner join"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{column, frame};

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names_str()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_basic_match_and_drop() {
        let orders = frame(&[
            ("order_id", vec![Some("o1"), Some("o2"), Some("o3")]),
            ("customer_id", vec![Some("c1"), Some("c2"), Some("c3")]),
        ]);
        let payments = frame(&[
            ("order_id", vec![Some("o3"), Some("o1"), Some("o9")]),
            ("payment_type", vec![Some("boleto"), Some("credit_card"), Some("voucher")]),
        ]);

        let out = inner_join(&orders, &payments, "order_id", "order_id").unwrap();
        assert_eq!(names(&out), vec!["order_id", "customer_id", "payment_type"]);
        assert_eq!(
            column(&out, "order_id"),
            vec![Some("o1".to_string()), Some("o3".to_string())]
        );
        assert_eq!(
            column(&out, "payment_type"),
            vec![Some("credit_card".to_string()), Some("boleto".to_string())]
        );
    }

    #[test]
    fn test_duplicate_keys_cross_product() {
        let left = frame(&[
            ("k", vec![Some("a"), Some("a"), Some("b")]),
            ("l", vec![Some("1"), Some("2"), Some("3")]),
        ]);
        let right = frame(&[
            ("k", vec![Some("a"), Some("a"), Some("a")]),
            ("r", vec![Some("x"), Some("y"), Some("z")]),
        ]);

        let out = inner_join(&left, &right, "k", "k").unwrap();
        assert_eq!(out.height(), 6);
        let pairs: Vec<(String, String)> = column(&out, "l")
            .into_iter()
            .zip(column(&out, "r"))
            .map(|(l, r)| (l.unwrap(), r.unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "x".to_string()),
                ("1".to_string(), "y".to_string()),
                ("1".to_string(), "z".to_string()),
                ("2".to_string(), "x".to_string()),
                ("2".to_string(), "y".to_string()),
                ("2".to_string(), "z".to_string()),
            ]
        );
    }

    #[test]
    fn test_null_keys_never_match() {
        let left = frame(&[("k", vec![None, Some("a")])]);
        let right = frame(&[("k", vec![None, Some("a")]), ("v", vec![Some("n"), Some("x")])]);

        let out = inner_join(&left, &right, "k", "k").unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(column(&out, "v"), vec![Some("x".to_string())]);
    }

    #[test]
    fn test_overlapping_columns_get_suffixes() {
        let left = frame(&[
            ("id", vec![Some("1")]),
            ("status", vec![Some("left")]),
        ]);
        let right = frame(&[
            ("ref", vec![Some("1")]),
            ("status", vec![Some("right")]),
            ("id", vec![Some("other")]),
        ]);

        let out = inner_join(&left, &right, "id", "ref").unwrap();
        assert_eq!(
            names(&out),
            vec!["id_x", "status_x", "ref", "status_y", "id_y"]
        );
    }

    #[test]
    fn test_missing_key_column() {
        let left = frame(&[("a", vec![Some("1")])]);
        let right = frame(&[("b", vec![Some("1")])]);

        let err = inner_join(&left, &right, "a", "missing").unwrap_err();
        assert!(format!("{:#}", err).contains("missing"));
    }

    #[test]
    fn test_no_matches_keeps_schema() {
        let left = frame(&[("k", vec![Some("a")]), ("l", vec![Some("1")])]);
        let right = frame(&[("k", vec![Some("b")]), ("r", vec![Some("2")])]);

        let out = inner_join(&left, &right, "k", "k").unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(names(&out), vec!["k", "l", "r"]);
    }
}
