//! Command implementations: run a translation, list protocols.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use recode_codebook::{DirSource, HousekeepingRegistry, ProtocolRegistry, WarnDedupe};
use recode_ingest::Dataset;
use recode_model::OutputFormat;
use recode_output::{write_text, write_tree_sheet, write_wide};
use recode_transform::{
    PathMap, TranslateContext, pivot, read_tree_template, translate_text, translate_tree,
};
use tracing::info;

use recode_cli::config::ProtocolCatalog;

use crate::cli::{ModeArg, ProtocolsArgs, RecodeArgs};
use crate::summary::RunSummary;

pub fn run_recode(args: &RecodeArgs) -> Result<RunSummary> {
    let catalog = ProtocolCatalog::load(args.protocols_file.as_deref())?;
    let prefix = catalog.prefix(&args.protocol).with_context(|| {
        format!(
            "unknown protocol \"{}\"; run `recode protocols` to list the configured ones",
            args.protocol
        )
    })?;
    if !args.input.is_file() {
        bail!("input file {} does not exist", args.input.display());
    }

    let warnings = WarnDedupe::new();
    let source = DirSource::new(&args.terminology_dir);
    let protocol = ProtocolRegistry::discover(
        prefix,
        &args.language,
        Box::new(source.clone()),
        warnings.clone(),
    )
    .with_context(|| format!("failed to discover versions for protocol \"{}\"", args.protocol))?;
    let housekeeping = HousekeepingRegistry::discover(&source, &args.language, warnings.clone());

    let mut dataset = Dataset::read_path(&args.input, &args.version_column, &warnings)?;
    dataset.resolve_columns(&housekeeping, &protocol);

    let format = OutputFormat::from(args.format);
    let ctx = TranslateContext {
        protocol: &protocol,
        housekeeping: &housekeeping,
        format,
        warnings: &warnings,
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| derived_name(&args.input, "_out.txt"));
    let rows = dataset.rows().len();

    let mut summary = RunSummary {
        protocol: args.protocol.clone(),
        input: args.input.clone(),
        output: output.clone(),
        tree_output: None,
        rows,
        columns: 0,
        subjects: None,
        distinct_warnings: 0,
    };

    match args.mode {
        ModeArg::Text => {
            let table = translate_text(&dataset, &ctx);
            write_text(&table, &output)?;
            summary.columns = table.header.len();
        }
        ModeArg::Warehouse => {
            let subject = args
                .subject_id
                .as_deref()
                .context("warehouse mode requires --subject-id")?;
            if !dataset
                .headers()
                .iter()
                .any(|header| header.eq_ignore_ascii_case(subject))
            {
                bail!("the subject identifier column \"{subject}\" was not found in the data");
            }
            let template_path = args
                .tree_template
                .as_deref()
                .context("warehouse mode requires --tree-template")?;
            let template = read_tree_template(template_path)?;
            let paths = PathMap::build(&dataset, &template, &protocol, subject, &warnings);
            let table = translate_tree(&dataset, &paths, &ctx);

            let tree_output = args
                .tree_output
                .clone()
                .unwrap_or_else(|| derived_name(&args.input, "_treeOut.txt"));
            let file_name = short_file_name(&output);
            if args.wide {
                let wide = pivot(&table, subject)?;
                write_wide(&wide, &output)?;
                write_tree_sheet(
                    &wide.header,
                    &paths,
                    &args.study_name,
                    &file_name,
                    subject,
                    &tree_output,
                )?;
                summary.columns = wide.header.len();
                summary.subjects = Some(wide.rows.len());
            } else {
                write_text(&table, &output)?;
                write_tree_sheet(
                    &table.header,
                    &paths,
                    &args.study_name,
                    &file_name,
                    subject,
                    &tree_output,
                )?;
                summary.columns = table.header.len();
            }
            summary.tree_output = Some(tree_output);
        }
    }
    summary.distinct_warnings = warnings.distinct_count();
    info!(
        rows = summary.rows,
        columns = summary.columns,
        warnings = summary.distinct_warnings,
        "translation finished"
    );
    Ok(summary)
}

pub fn run_protocols(args: &ProtocolsArgs) -> Result<ProtocolCatalog> {
    ProtocolCatalog::load(args.protocols_file.as_deref())
}

fn derived_name(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}{suffix}"))
}

fn short_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
