//! Header and value translation over an ingested dataset.
//!
//! Headers are translated with the column's max observed protocol
//! version, values with the version their own line was recorded under.
//! Housekeeping columns translate through the version-less housekeeping
//! registry. Warehouse mode collapses merge groups: only the group's
//! first column emits, joining member headers with `_` and member values
//! with `&`.

use recode_codebook::{HousekeepingRegistry, ProtocolRegistry, WarnDedupe};
use recode_ingest::{Dataset, romans};
use recode_model::{OutputFormat, OutputHeaderItem};

use crate::paths::PathMap;

/// Placeholder value dropped when merging group members.
const MERGE_DROP: &str = "other";

pub struct TranslateContext<'a> {
    pub protocol: &'a ProtocolRegistry,
    pub housekeeping: &'a HousekeepingRegistry,
    pub format: OutputFormat,
    pub warnings: &'a WarnDedupe,
}

/// Translated header plus rows, ready for a writer.
#[derive(Debug)]
pub struct TranslatedTable {
    pub header: Vec<OutputHeaderItem>,
    pub rows: Vec<Vec<String>>,
}

/// Text mode: one output column per eligible input column.
pub fn translate_text(dataset: &Dataset, ctx: &TranslateContext) -> TranslatedTable {
    let mut header = Vec::new();
    for (index, original) in dataset.headers().iter().enumerate() {
        if !dataset.has_data(index) {
            continue;
        }
        let base = dataset.base_name(index);
        if ctx.housekeeping.contains_header(base) {
            header.push(OutputHeaderItem::new(
                original,
                ctx.housekeeping.translate_concept(base),
                true,
            ));
        } else {
            let translated =
                ctx.protocol
                    .translate_concept(base, &dataset.max_version(index), ctx.format);
            header.push(OutputHeaderItem::new(
                original,
                with_marker(translated, dataset.marker(index)),
                false,
            ));
        }
    }

    let mut rows = Vec::with_capacity(dataset.rows().len());
    for row in dataset.rows() {
        let version = dataset.row_version(row);
        let mut translated = Vec::with_capacity(header.len());
        for (index, value) in row.iter().enumerate() {
            if !dataset.has_data(index) {
                continue;
            }
            let base = dataset.base_name(index);
            if ctx.housekeeping.contains_header(base) {
                translated.push(ctx.housekeeping.translate_value(base, value));
            } else {
                translated.push(ctx.protocol.translate_value(base, value, version, ctx.format));
            }
        }
        rows.push(translated);
    }
    TranslatedTable { header, rows }
}

/// Warehouse mode: merge groups collapse into their representative.
pub fn translate_tree(
    dataset: &Dataset,
    paths: &PathMap,
    ctx: &TranslateContext,
) -> TranslatedTable {
    let mut header = Vec::new();
    for (index, original) in dataset.headers().iter().enumerate() {
        if !dataset.has_data(index) {
            continue;
        }
        let base = dataset.base_name(index);
        if ctx.housekeeping.contains_header(base) {
            header.push(OutputHeaderItem::new(
                original,
                ctx.housekeeping.translate_concept(base),
                true,
            ));
        } else if paths.is_representative(original) {
            let version = dataset.max_version(index);
            let group = paths
                .merge_group(original, ctx.warnings)
                .map(<[String]>::to_vec)
                .unwrap_or_else(|| vec![original.clone()]);
            let translated = group
                .iter()
                .filter_map(|member| column_index(dataset, member))
                .map(|member_index| {
                    ctx.protocol.translate_concept(
                        dataset.base_name(member_index),
                        &version,
                        ctx.format,
                    )
                })
                .collect::<Vec<_>>()
                .join("_");
            header.push(OutputHeaderItem::new(
                original,
                with_marker(translated, dataset.marker(index)),
                false,
            ));
        }
    }

    let mut rows = Vec::with_capacity(dataset.rows().len());
    for row in dataset.rows() {
        let version = dataset.row_version(row);
        let mut translated = Vec::with_capacity(header.len());
        for (index, value) in row.iter().enumerate() {
            if !dataset.has_data(index) {
                continue;
            }
            let base = dataset.base_name(index);
            if ctx.housekeeping.contains_header(base) {
                translated.push(ctx.housekeeping.translate_value(base, value));
            } else if paths.is_representative(&dataset.headers()[index]) {
                let group = paths
                    .merge_group(&dataset.headers()[index], ctx.warnings)
                    .map(<[String]>::to_vec)
                    .unwrap_or_else(|| vec![dataset.headers()[index].clone()]);
                translated.push(merge_values(dataset, &group, row, version, ctx));
            }
        }
        rows.push(translated);
    }
    TranslatedTable { header, rows }
}

/// Translate each group member's value and join survivors with `&`,
/// dropping empties and the `other` placeholder.
fn merge_values(
    dataset: &Dataset,
    group: &[String],
    row: &[String],
    version: &str,
    ctx: &TranslateContext,
) -> String {
    let mut parts = Vec::new();
    for member in group {
        let Some(index) = column_index(dataset, member) else {
            continue;
        };
        let value = ctx
            .protocol
            .translate_value(dataset.base_name(index), &row[index], version, ctx.format)
            .trim()
            .to_string();
        if !value.is_empty() && !value.eq_ignore_ascii_case(MERGE_DROP) {
            parts.push(value);
        }
    }
    parts.join("&")
}

fn with_marker(translated: String, marker: &str) -> String {
    let rendered = romans::render(marker);
    if rendered.is_empty() {
        translated
    } else {
        format!("{translated}_{rendered}")
    }
}

fn column_index(dataset: &Dataset, original: &str) -> Option<usize> {
    dataset
        .headers()
        .iter()
        .position(|header| header.eq_ignore_ascii_case(original))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use recode_codebook::{Codebook, HousekeepingRegistry, ProtocolRegistry, WarnDedupe};
    use recode_ingest::Dataset;
    use recode_model::{Concept, OutputFormat, Terminology, ValueEntry};

    use super::{TranslateContext, translate_text, translate_tree};
    use crate::paths::PathMap;

    fn protocol() -> ProtocolRegistry {
        let mut codebook = Codebook::new("5");
        let mut concept = Concept::new("con-1", "colonbiopt");
        concept.set_terminology(Terminology {
            code: "C100".to_string(),
            code_system: "SNOMED CT".to_string(),
            display_name: "Colon biopt".to_string(),
        });
        concept.insert_value(
            "adenoma",
            ValueEntry {
                code: "C1".to_string(),
                code_system: "SNOMED CT".to_string(),
                display_name: "Adenoma".to_string(),
            },
        );
        codebook.insert(concept);

        let mut site = Concept::new("con-2", "lokalisatie");
        site.set_terminology(Terminology {
            code: "C200".to_string(),
            code_system: "SNOMED CT".to_string(),
            display_name: "Localization".to_string(),
        });
        codebook.insert(site);
        ProtocolRegistry::preloaded("nl-NL", vec![codebook], WarnDedupe::new())
    }

    fn housekeeping() -> HousekeepingRegistry {
        let mut codebook = Codebook::new("1");
        let mut concept = Concept::new("hk-1", "depvenr");
        concept.set_terminology(Terminology {
            code: "H1".to_string(),
            code_system: "PALGA".to_string(),
            display_name: "Protocol version".to_string(),
        });
        codebook.insert(concept);
        HousekeepingRegistry::preloaded(codebook, WarnDedupe::new())
    }

    fn dataset(content: &str, protocol: &ProtocolRegistry) -> Dataset {
        let mut dataset =
            Dataset::read(content.as_bytes(), "depvenr", &WarnDedupe::new()).expect("read dataset");
        dataset.resolve_columns(&housekeeping(), protocol);
        dataset
    }

    #[test]
    fn text_mode_end_to_end() {
        let protocol = protocol();
        let housekeeping = housekeeping();
        let warnings = WarnDedupe::new();
        let ctx = TranslateContext {
            protocol: &protocol,
            housekeeping: &housekeeping,
            format: OutputFormat::Descriptions,
            warnings: &warnings,
        };
        let dataset = dataset(
            "id\tdepvenr\tcolonbioptiii\np1\t5\tadenoma\np1\t5\tother\n",
            &protocol,
        );
        let table = translate_text(&dataset, &ctx);

        let names: Vec<&str> = table
            .header
            .iter()
            .map(|item| item.translated())
            .collect();
        assert_eq!(names, ["id", "Protocol version", "Colon biopt_3"]);
        assert!(table.header[1].is_housekeeping());
        assert_eq!(table.rows[0], ["p1", "5", "Adenoma"]);
        // "other" is absent from the value set, so it passes through
        assert_eq!(table.rows[1], ["p1", "5", "other"]);
    }

    #[test]
    fn first_repeat_header_has_no_suffix() {
        let protocol = protocol();
        let housekeeping = housekeeping();
        let warnings = WarnDedupe::new();
        let ctx = TranslateContext {
            protocol: &protocol,
            housekeeping: &housekeeping,
            format: OutputFormat::Descriptions,
            warnings: &warnings,
        };
        let dataset = dataset("id\tdepvenr\tcolonbiopti\np1\t5\tadenoma\n", &protocol);
        let table = translate_text(&dataset, &ctx);
        assert_eq!(table.header[2].translated(), "Colon biopt");
    }

    #[test]
    fn values_translate_with_their_own_line_version() {
        let protocol = protocol();
        let housekeeping = housekeeping();
        let warnings = WarnDedupe::new();
        let ctx = TranslateContext {
            protocol: &protocol,
            housekeeping: &housekeeping,
            format: OutputFormat::Descriptions,
            warnings: &warnings,
        };
        // version 7 has no codebook, so the second line passes through
        let dataset = dataset(
            "id\tdepvenr\tcolonbiopt\np1\t5\tadenoma\np2\t7\tadenoma\n",
            &protocol,
        );
        let table = translate_text(&dataset, &ctx);
        assert_eq!(table.rows[0][2], "Adenoma");
        assert_eq!(table.rows[1][2], "adenoma");
    }

    #[test]
    fn tree_mode_merges_group_columns() {
        let protocol = protocol();
        let housekeeping = housekeeping();
        let warnings = WarnDedupe::new();
        let ctx = TranslateContext {
            protocol: &protocol,
            housekeeping: &housekeeping,
            format: OutputFormat::Descriptions,
            warnings: &warnings,
        };
        let dataset = dataset(
            "id\tdepvenr\tcolonbiopti\tcolonbioptii\np1\t5\tother\t\np1\t5\tadenoma\tother\n",
            &protocol,
        );
        let mut template = BTreeMap::new();
        template.insert("colonbiopt".to_string(), "Biopsy/".to_string());
        let paths = PathMap::build(&dataset, &template, &protocol, "id", &warnings);
        let table = translate_tree(&dataset, &paths, &ctx);

        // both roman columns share Biopsy/Colon biopt, so one merged column
        assert_eq!(table.header.len(), 3);
        assert_eq!(table.header[2].translated(), "Colon biopt_Colon biopt");
        assert_eq!(table.header[2].original(), "colonbiopti");
        // "other" and empty member values are dropped
        assert_eq!(table.rows[0][2], "");
        assert_eq!(table.rows[1][2], "Adenoma");
    }
}
