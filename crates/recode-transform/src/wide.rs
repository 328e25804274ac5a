//! Wide-format pivot: one output row per subject.
//!
//! Warehouse imports require a unique subject identifier per row, so
//! every further line for an already-seen subject becomes repeat 2, 3,
//! and so on, in line-arrival order. Whether a (repeat, position) slot
//! survives depends on every subject: a slot with no data for any
//! subject is dropped from the header and the rows, which makes the
//! pivot a two-pass operation over the collected data.

use std::collections::BTreeMap;

use recode_model::OutputHeaderItem;

use crate::error::TransformError;
use crate::pipeline::TranslatedTable;

/// Pivoted table: the subject identifier column first, then surviving
/// (repeat, column) slots in repeat order.
#[derive(Debug)]
pub struct WideTable {
    pub header: Vec<OutputHeaderItem>,
    pub rows: Vec<Vec<String>>,
}

pub fn pivot(table: &TranslatedTable, subject_column: &str) -> Result<WideTable, TransformError> {
    let id_pos = table
        .header
        .iter()
        .position(|item| item.original().eq_ignore_ascii_case(subject_column))
        .ok_or_else(|| TransformError::MissingSubjectColumn(subject_column.to_string()))?;
    let id_item = table.header[id_pos].clone();
    let repeating: Vec<OutputHeaderItem> = table
        .header
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != id_pos)
        .map(|(_, item)| item.clone())
        .collect();

    // subjects in first-appearance order, repeats in line-arrival order
    let mut subjects: Vec<String> = Vec::new();
    let mut lines_per_subject: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();
    let mut slot_has_data: Vec<Vec<bool>> = Vec::new();

    for row in &table.rows {
        let id = row[id_pos].clone();
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != id_pos)
            .map(|(_, value)| value.clone())
            .collect();

        let lines = lines_per_subject.entry(id.clone()).or_default();
        if lines.is_empty() {
            subjects.push(id);
        }
        let repeat = lines.len() + 1;
        if slot_has_data.len() < repeat {
            slot_has_data.push(vec![false; repeating.len()]);
        }
        let has_data = &mut slot_has_data[repeat - 1];
        for (index, value) in line.iter().enumerate() {
            if !value.is_empty() {
                has_data[index] = true;
            }
        }
        lines.push(line);
    }

    let mut header = vec![id_item];
    for (repeat_index, has_data) in slot_has_data.iter().enumerate() {
        for (index, item) in repeating.iter().enumerate() {
            if has_data[index] {
                header.push(item.with_repeat(repeat_index + 1));
            }
        }
    }

    let mut rows = Vec::with_capacity(subjects.len());
    for subject in &subjects {
        let lines = &lines_per_subject[subject];
        let mut cells = vec![subject.clone()];
        for (repeat_index, has_data) in slot_has_data.iter().enumerate() {
            for (index, surviving) in has_data.iter().enumerate() {
                if !surviving {
                    continue;
                }
                match lines.get(repeat_index) {
                    Some(line) => cells.push(line[index].clone()),
                    None => cells.push(String::new()),
                }
            }
        }
        rows.push(cells);
    }
    Ok(WideTable { header, rows })
}

#[cfg(test)]
mod tests {
    use recode_model::OutputHeaderItem;

    use super::pivot;
    use crate::pipeline::TranslatedTable;

    fn table(rows: Vec<Vec<&str>>) -> TranslatedTable {
        TranslatedTable {
            header: vec![
                OutputHeaderItem::new("id", "id", false),
                OutputHeaderItem::new("lokalisatie", "Localization", false),
                OutputHeaderItem::new("uitslag", "Result", false),
            ],
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    fn header_cells(wide: &super::WideTable) -> Vec<String> {
        wide.header
            .iter()
            .map(|item| format!("{}_{}", item.repeat(), item.translated()))
            .collect()
    }

    #[test]
    fn repeats_number_in_arrival_order() {
        let wide = pivot(
            &table(vec![
                vec!["p1", "coecum", "benign"],
                vec!["p1", "rectum", "malignant"],
            ]),
            "id",
        )
        .expect("pivot");
        assert_eq!(
            header_cells(&wide),
            [
                "1_id",
                "1_Localization",
                "1_Result",
                "2_Localization",
                "2_Result"
            ]
        );
        assert_eq!(
            wide.rows,
            [["p1", "coecum", "benign", "rectum", "malignant"]]
        );
    }

    #[test]
    fn empty_slots_for_every_subject_are_dropped() {
        let wide = pivot(
            &table(vec![
                vec!["p1", "coecum", ""],
                vec!["p1", "rectum", ""],
                vec!["p2", "sigmoid", ""],
            ]),
            "id",
        )
        .expect("pivot");
        // the result column never has data in any repeat
        assert_eq!(
            header_cells(&wide),
            ["1_id", "1_Localization", "2_Localization"]
        );
        assert_eq!(wide.rows[0], ["p1", "coecum", "rectum"]);
        assert_eq!(wide.rows[1], ["p2", "sigmoid", ""]);
    }

    #[test]
    fn missing_repeats_fill_with_empty_cells() {
        let wide = pivot(
            &table(vec![
                vec!["p1", "coecum", "benign"],
                vec!["p2", "rectum", ""],
                vec!["p2", "sigmoid", "malignant"],
            ]),
            "id",
        )
        .expect("pivot");
        assert_eq!(wide.rows[0], ["p1", "coecum", "benign", "", ""]);
        assert_eq!(wide.rows[1], ["p2", "rectum", "", "sigmoid", "malignant"]);
    }

    #[test]
    fn survivorship_is_independent_of_subject_arrival_order() {
        let forward = pivot(
            &table(vec![
                vec!["p1", "coecum", ""],
                vec!["p1", "", "malignant"],
                vec!["p2", "rectum", ""],
            ]),
            "id",
        )
        .expect("pivot");
        let backward = pivot(
            &table(vec![
                vec!["p2", "rectum", ""],
                vec!["p1", "coecum", ""],
                vec!["p1", "", "malignant"],
            ]),
            "id",
        )
        .expect("pivot");
        assert_eq!(header_cells(&forward), header_cells(&backward));
        let find = |wide: &super::WideTable, id: &str| {
            wide.rows
                .iter()
                .find(|row| row[0] == id)
                .cloned()
                .expect("subject row")
        };
        assert_eq!(find(&forward, "p1"), find(&backward, "p1"));
        assert_eq!(find(&forward, "p2"), find(&backward, "p2"));
    }

    #[test]
    fn unknown_subject_column_is_an_error() {
        assert!(pivot(&table(vec![]), "patient").is_err());
    }
}
