//! Property and snapshot tests for naming and DDL.

use std::collections::HashSet;
use std::path::Path;

use proptest::prelude::*;
use tabload_schema::{build_column_mappings, build_table_spec, create_table_sql, sanitize_identifier};

fn is_identifier(name: &str) -> bool {
    name.chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
}

proptest! {
    #[test]
    fn sanitized_names_are_clean_and_bounded(raw in any::<String>(), max_len in 0usize..80) {
        let name = sanitize_identifier(&raw, max_len);
        prop_assert!(name.len() <= max_len);
        prop_assert!(is_identifier(&name));
    }

    #[test]
    fn long_ascii_names_fill_the_limit(raw in "[A-Za-z0-9 ]{65,200}") {
        let name = sanitize_identifier(&raw, 64);
        prop_assert!(name.len() <= 64);
        prop_assert!(is_identifier(&name));
    }

    #[test]
    fn column_names_never_collide(
        headers in prop::collection::vec(
            prop_oneof![
                Just("Amount".to_string()),
                Just("amount".to_string()),
                Just("amount_1".to_string()),
                Just("ID".to_string()),
                Just(String::new()),
                "[a-c_ -]{0,6}",
                "[A-Za-z ]{60,90}",
            ],
            0..120,
        ),
        max_ident_len in 8usize..=64,
    ) {
        let mappings = build_column_mappings(&headers, max_ident_len);
        prop_assert_eq!(mappings.len(), headers.len());

        let mut seen = HashSet::new();
        seen.insert("id".to_string());
        for column in &mappings {
            prop_assert!(!column.sanitized.is_empty());
            prop_assert!(
                column.sanitized.len() <= max_ident_len,
                "{} is over {max_ident_len}",
                column.sanitized
            );
            prop_assert!(is_identifier(&column.sanitized));
            prop_assert!(seen.insert(column.sanitized.clone()), "duplicate {}", column.sanitized);
        }
    }
}

#[test]
fn create_table_ddl() {
    let long_header = format!(
        "Total amount invoiced to the customer during the reporting period {}",
        "excluding tax"
    );
    let headers = vec![
        "Order ID".to_string(),
        "Customer".to_string(),
        "customer".to_string(),
        long_header,
    ];
    let spec = build_table_spec(Path::new("exports/Orders 2024.csv"), &headers, 64)
        .expect("build spec");

    insta::assert_snapshot!(create_table_sql(&spec), @r#"
    CREATE TABLE "orders_2024" ( -- Imported from Orders 2024.csv
        "id" INTEGER PRIMARY KEY AUTOINCREMENT,
        "order_id" TEXT,
        "customer" TEXT,
        "customer_2" TEXT,
        "total_amount_invoiced_to_the_c_eporting_period_excluding_tax" TEXT -- Total amount invoiced to the customer during the reporting period excluding tax
    )
    "#);
}
