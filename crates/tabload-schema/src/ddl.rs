//! SQL text for (re)creating and filling a destination table.
//!
//! Column and table annotations are written as `--` comments inside the
//! `CREATE TABLE` statement. SQLite stores the statement text verbatim in
//! `sqlite_master`, so the annotations survive alongside the schema.

use tabload_model::TableSpec;

/// Quotes an identifier for use in SQL.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `DROP TABLE IF EXISTS` for `table`.
#[must_use]
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(table))
}

/// `CREATE TABLE` with the surrogate key and one nullable text column per mapping.
#[must_use]
pub fn create_table_sql(spec: &TableSpec) -> String {
    let mut sql = format!(
        "CREATE TABLE {} ( -- {}\n",
        quote_identifier(&spec.name),
        comment_text(&spec.comment())
    );
    sql.push_str(&format!(
        "    {} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_identifier(spec.key_column())
    ));
    for column in &spec.columns {
        sql.push_str(",\n");
        sql.push_str(&format!("    {} TEXT", quote_identifier(&column.sanitized)));
        if let Some(comment) = column.comment() {
            // The comma for the next column goes on the next line so the
            // comment cannot swallow it.
            sql.push_str(" -- ");
            sql.push_str(&comment_text(&comment));
        }
    }
    sql.push_str("\n)");
    sql
}

/// Parameterized `INSERT` covering every mapped column, in mapping order.
#[must_use]
pub fn insert_sql(spec: &TableSpec) -> String {
    let columns: Vec<String> = spec
        .columns
        .iter()
        .map(|column| quote_identifier(&column.sanitized))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("?{n}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(&spec.name),
        columns.join(", "),
        placeholders.join(", ")
    )
}

// Line breaks would end a `--` comment early.
fn comment_text(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}
