use std::path::PathBuf;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use recode_cli::config::ProtocolCatalog;

pub struct RunSummary {
    pub protocol: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub tree_output: Option<PathBuf>,
    pub rows: usize,
    pub columns: usize,
    pub subjects: Option<usize>,
    pub distinct_warnings: usize,
}

pub fn print_summary(summary: &RunSummary) {
    println!("Protocol: {}", summary.protocol);
    println!("Input: {}", summary.input.display());
    println!("Output: {}", summary.output.display());
    if let Some(path) = &summary.tree_output {
        println!("Tree sheet: {}", path.display());
    }
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec!["Lines", "Columns", "Subjects", "Warnings"]);
    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.rows),
        Cell::new(summary.columns),
        match summary.subjects {
            Some(count) => Cell::new(count),
            None => Cell::new("-"),
        },
        Cell::new(summary.distinct_warnings),
    ]);
    println!("{table}");
}

pub fn print_protocols(catalog: &ProtocolCatalog) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec!["Protocol", "Prefix"]);
    for (name, prefix) in catalog.protocols() {
        table.add_row(vec![name, prefix]);
    }
    println!("{table}");
    println!("Languages: {}", catalog.languages().join(", "));
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
