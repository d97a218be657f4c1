//! Merge orchestration
//!
//! Every input contributes its first sheet to one output document, in input
//! order. A bad input is recorded as an [`InputFailure`] and skipped; the run
//! only fails when the finished document cannot be serialized.

use std::fmt;

use xlmerge_core::{Workbook, Worksheet};
use xlmerge_xlsx::{ReadOptions, XlsxWriter};

use crate::composer::compose;
use crate::error::{FailureReason, MergeError, ReadError};
use crate::options::MergeOptions;
use crate::reader::SourceDocument;
use crate::sanitize::SheetTitles;

/// One document to merge
#[derive(Debug, Clone)]
pub struct MergeInput {
    /// Display name, usually the file name; becomes the sheet title
    pub name: String,
    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl MergeInput {
    /// Create an input from a display name and its bytes
    pub fn new<S: Into<String>, B: Into<Vec<u8>>>(name: S, bytes: B) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// An input that was left out of the output, and why
#[derive(Debug)]
pub struct InputFailure {
    /// Display name of the input
    pub name: String,
    /// What went wrong
    pub reason: FailureReason,
}

impl fmt::Display for InputFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Result of a merge run
#[derive(Debug)]
pub struct MergeOutput {
    /// The serialized output document
    pub bytes: Vec<u8>,
    /// Titles of the output sheets, in order
    pub sheet_titles: Vec<String>,
    /// Inputs that were skipped, in input order
    pub failures: Vec<InputFailure>,
}

impl MergeOutput {
    /// Number of inputs that made it into the output
    pub fn merged_count(&self) -> usize {
        self.sheet_titles.len()
    }

    /// True when every input was merged
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Merge engine carrying the options of a run
#[derive(Debug, Clone, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    /// Create a merger with explicit options
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// The options this merger runs with
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `inputs` and serialize the result
    pub fn merge(&self, inputs: &[MergeInput]) -> Result<MergeOutput, MergeError> {
        let (workbook, failures) = self.merge_documents(inputs);

        let bytes = XlsxWriter::to_bytes(&workbook).map_err(MergeError::Serialize)?;
        let sheet_titles = workbook.sheet_names();

        log::info!(
            "merged {} of {} inputs ({} bytes written)",
            sheet_titles.len(),
            inputs.len(),
            bytes.len()
        );

        Ok(MergeOutput {
            bytes,
            sheet_titles,
            failures,
        })
    }

    /// Merge `inputs` into an unserialized document
    pub fn merge_documents(&self, inputs: &[MergeInput]) -> (Workbook, Vec<InputFailure>) {
        let read_options = self.options.read_options();
        let mut run = Run::new(&self.options.fallback_title);

        if self.options.parallel {
            if let Some(sheets) = read_parallel(inputs, read_options) {
                for (input, sheet) in inputs.iter().zip(sheets) {
                    run.place(input, sheet);
                }
                return run.finish();
            }
        }

        for input in inputs {
            run.place(input, read_input(input, read_options));
        }
        run.finish()
    }
}

/// Merge with default options
pub fn merge(inputs: &[MergeInput]) -> Result<MergeOutput, MergeError> {
    Merger::default().merge(inputs)
}

/// Merge with default options, without serializing
pub fn merge_documents(inputs: &[MergeInput]) -> (Workbook, Vec<InputFailure>) {
    Merger::default().merge_documents(inputs)
}

/// Output state of one merge run
struct Run {
    workbook: Workbook,
    titles: SheetTitles,
    failures: Vec<InputFailure>,
}

impl Run {
    fn new(fallback_title: &str) -> Self {
        Self {
            workbook: Workbook::empty(),
            titles: SheetTitles::new(fallback_title),
            failures: Vec::new(),
        }
    }

    fn place(&mut self, input: &MergeInput, sheet: Result<Worksheet, ReadError>) {
        match self.compose_input(input, sheet) {
            Ok(title) => log::debug!("'{}' merged as sheet '{}'", input.name, title),
            Err(reason) => {
                log::warn!("skipping '{}': {}", input.name, reason);
                self.failures.push(InputFailure {
                    name: input.name.clone(),
                    reason,
                });
            }
        }
    }

    fn compose_input(
        &mut self,
        input: &MergeInput,
        sheet: Result<Worksheet, ReadError>,
    ) -> Result<String, FailureReason> {
        let sheet = sheet?;
        let title = self.titles.propose(&input.name);
        compose(&mut self.workbook, &title, &sheet)?;
        self.titles.reserve(&title);
        Ok(title)
    }

    fn finish(self) -> (Workbook, Vec<InputFailure>) {
        (self.workbook, self.failures)
    }
}

fn read_input(input: &MergeInput, options: ReadOptions) -> Result<Worksheet, ReadError> {
    log::debug!("reading '{}' ({} bytes)", input.name, input.bytes.len());
    SourceDocument::read_first_sheet(&input.bytes, options)
}

/// Parse every input on the rayon pool; results keep input order
#[cfg(feature = "parallel")]
fn read_parallel(
    inputs: &[MergeInput],
    options: ReadOptions,
) -> Option<Vec<Result<Worksheet, ReadError>>> {
    use rayon::prelude::*;

    Some(
        inputs
            .par_iter()
            .map(|input| read_input(input, options))
            .collect(),
    )
}

#[cfg(not(feature = "parallel"))]
fn read_parallel(
    _inputs: &[MergeInput],
    _options: ReadOptions,
) -> Option<Vec<Result<Worksheet, ReadError>>> {
    log::debug!("built without the `parallel` feature, reading inputs sequentially");
    None
}
