use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use tabload_model::{FileReport, RunReport};

pub fn print_summary(report: &RunReport) {
    println!("Database: {}", report.database);
    if report.files.is_empty() {
        println!("No source files found.");
    } else {
        println!("{}", files_table(report));
    }
    if !report.tables.is_empty() {
        println!();
        println!("Tables:");
        println!("{}", tables_table(report));
    }
    let truncated: usize = report.files.iter().map(|file| file.truncated_headers).sum();
    if truncated > 0 {
        println!(
            "Note: {truncated} column name(s) were shortened; the original headers are kept \
             as comments in the table definitions."
        );
    }
    println!(
        "Successfully imported: {}/{} files",
        report.succeeded(),
        report.attempted()
    );
    let failed: Vec<&FileReport> = report.files.iter().filter(|f| !f.succeeded()).collect();
    if !failed.is_empty() {
        eprintln!("Errors:");
        for file in failed {
            let message = file
                .failure
                .as_ref()
                .map_or("unknown error", |failure| failure.message.as_str());
            eprintln!("- {}: {message}", file.file_name());
        }
    }
}

fn files_table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Delimiter"),
        header_cell("Rows"),
        header_cell("Skipped"),
        header_cell("Columns"),
        header_cell("Table"),
        header_cell("Inserted"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [2, 3, 4, 6] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);

    let mut total_inserted = 0usize;
    for file in &report.files {
        total_inserted += file.rows_inserted;
        table.add_row(vec![
            Cell::new(file.file_name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            file.delimiter
                .map_or_else(|| dim_cell("-"), |delimiter| Cell::new(delimiter.name())),
            Cell::new(file.rows_read),
            count_cell(file.rows_skipped, Color::Yellow),
            Cell::new(file.columns),
            file.table.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(file.rows_inserted),
            status_cell(file),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_inserted).add_attribute(Attribute::Bold),
        Cell::new(format!("{}/{}", report.succeeded(), report.attempted()))
            .add_attribute(Attribute::Bold),
    ]);
    table
}

fn tables_table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for summary in &report.tables {
        table.add_row(vec![
            Cell::new(&summary.name),
            Cell::new(summary.rows),
            Cell::new(summary.columns),
        ]);
    }
    table
}

fn status_cell(file: &FileReport) -> Cell {
    match &file.failure {
        None if file.succeeded() => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(failure) => Cell::new(format!("✗ {}", failure.kind))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => dim_cell(file.stage),
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
