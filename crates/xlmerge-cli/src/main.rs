//! xlmerge CLI - merge spreadsheets into one workbook, one sheet per file

mod logger;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xlmerge::{MergeInput, MergeOptions, Merger, ReadOptions, SourceDocument};

#[derive(Parser)]
#[command(name = "xlmerge")]
#[command(
    author,
    version,
    about = "Merge spreadsheets into one workbook, keeping every sheet's formatting"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the first sheet of every input into one workbook
    Merge {
        /// Input spreadsheet files (xlsx, xlsm), merged in the order given
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "merged.xlsx")]
        output: PathBuf,

        /// Replace formulas by their cached results
        #[arg(long)]
        data_only: bool,

        /// Parse inputs in parallel
        #[arg(long)]
        parallel: bool,

        /// Write the output even when no input could be merged
        #[arg(long)]
        allow_empty: bool,
    },

    /// Show the structure of a spreadsheet's first sheet
    Inspect {
        /// Input spreadsheet file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose).context("Failed to install logger")?;

    match cli.command {
        Commands::Merge {
            inputs,
            output,
            data_only,
            parallel,
            allow_empty,
        } => {
            let options = MergeOptions::new()
                .with_data_only(data_only)
                .with_parallel(parallel);
            merge_files(&inputs, &output, options, allow_empty)
        }
        Commands::Inspect { input } => inspect(&input),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn merge_files(
    paths: &[PathBuf],
    output: &Path,
    options: MergeOptions,
    allow_empty: bool,
) -> Result<()> {
    let mut inputs = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();

    for path in paths {
        match std::fs::read(path) {
            Ok(bytes) => inputs.push(MergeInput::new(display_name(path), bytes)),
            Err(err) => {
                log::warn!("cannot read '{}': {}", path.display(), err);
                unreadable.push(format!("{}: {}", display_name(path), err));
            }
        }
    }

    let result = Merger::new(options)
        .merge(&inputs)
        .context("Failed to build the merged workbook")?;

    let merged = result.merged_count();
    if merged == 0 && !allow_empty {
        report_failures(&unreadable, &result.failures);
        bail!(
            "none of the {} input files could be merged (pass --allow-empty to write an empty workbook)",
            paths.len()
        );
    }

    std::fs::write(output, &result.bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    println!(
        "{} of {} files merged into {}",
        merged,
        paths.len(),
        output.display()
    );
    report_failures(&unreadable, &result.failures);

    Ok(())
}

fn report_failures(unreadable: &[String], failures: &[xlmerge::InputFailure]) {
    for line in unreadable {
        eprintln!("{}", line);
    }
    for failure in failures {
        eprintln!("{}", failure);
    }
}

fn inspect(input: &Path) -> Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read '{}'", input.display()))?;
    let mut document = SourceDocument::open_with_options(&bytes, ReadOptions::default())
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", input.display());
    println!("Sheets: {}", document.sheet_count());
    for (i, name) in document.sheet_names().iter().enumerate() {
        println!("  {}\t{}", i, name);
    }

    let sheet = document
        .first_sheet()
        .with_context(|| format!("Failed to read the first sheet of '{}'", input.display()))?;

    println!();
    println!("First sheet: \"{}\"", sheet.name());
    match sheet.used_range() {
        Some(range) => println!(
            "  Extent: {} ({} rows x {} columns)",
            range,
            sheet.max_row(),
            sheet.max_column()
        ),
        None => println!("  Extent: empty"),
    }

    let styled = sheet
        .iter_cells()
        .filter(|(_, _, cell)| cell.has_style())
        .count();
    println!("  Cells: {} ({} styled)", sheet.cell_count(), styled);

    let format = sheet.format();
    println!(
        "  Defaults: row height {}, column width {}",
        format.default_row_height, format.default_column_width
    );
    println!("  Column records: {}", sheet.column_dims().count());
    println!("  Row records: {}", sheet.row_dims().count());

    let merges = sheet.merged_regions();
    if merges.is_empty() {
        println!("  Merged ranges: none");
    } else {
        let ranges: Vec<String> = merges.iter().map(|r| r.to_string()).collect();
        println!("  Merged ranges: {}", ranges.join(", "));
    }

    match sheet.freeze_panes() {
        Some(panes) => println!(
            "  Frozen pane: {} ({} rows, {} columns)",
            panes.top_left_cell(),
            panes.row,
            panes.col
        ),
        None => println!("  Frozen pane: none"),
    }

    Ok(())
}
