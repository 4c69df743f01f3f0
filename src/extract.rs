//! Extraction pipeline.
//!
//! Parses the markup once, runs every enabled detector over the shared tree
//! (in parallel when allowed) and hands all candidates to the assembler.
//! Detector failures are isolated: an error or a panic costs that detector's
//! candidates and leaves a warning, nothing more.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use crate::assembler;
use crate::detectors::{self, Detector};
use crate::dom::{self, Tree};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::result::{CandidateTable, ExtractResult};

/// Main entry point for table extraction.
pub(crate) fn extract_tables(html: &str, options: &Options) -> Result<ExtractResult> {
    tracing::debug!(html_len = html.len(), "starting table extraction");

    let tree = dom::parse(html)?;
    let mut warnings = Vec::new();

    let recovered = dom::markup_recovery_signal(html);
    if recovered > 0 {
        tracing::debug!(unbalanced_tags = recovered, "markup needed recovery");
        warnings.push(format!("malformed markup: {recovered} unbalanced tag(s) recovered"));
    }

    tracing::debug!(
        nodes = tree.len(),
        max_depth = tree.max_depth(),
        "parsed document"
    );

    let enabled = detectors::enabled(options);
    let outcomes: Vec<Result<Vec<CandidateTable>>> = if options.parallel {
        enabled
            .par_iter()
            .map(|detector| run_detector(*detector, &tree, options))
            .collect()
    } else {
        enabled
            .iter()
            .map(|detector| run_detector(*detector, &tree, options))
            .collect()
    };

    let mut candidates = Vec::new();
    for (detector, outcome) in enabled.iter().zip(outcomes) {
        match outcome {
            Ok(tables) => {
                tracing::debug!(
                    detector = detector.name(),
                    candidates = tables.len(),
                    "detector finished"
                );
                candidates.extend(tables);
            }
            Err(err) => {
                tracing::warn!(detector = detector.name(), error = %err, "detector failed");
                warnings.push(format!("{} detector skipped: {err}", detector.name()));
            }
        }
    }

    let proposed = candidates.len();
    let tables = assembler::assemble(candidates, options);
    tracing::debug!(
        proposed,
        kept = tables.len(),
        warnings = warnings.len(),
        "extraction complete"
    );

    Ok(ExtractResult { tables, warnings })
}

/// Run one detector, turning a panic into [`Error::DetectorPanicked`].
fn run_detector(detector: &dyn Detector, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>> {
    panic::catch_unwind(AssertUnwindSafe(|| detector.detect(tree, options))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::warn!(detector = detector.name(), %message, "detector panicked");
        Err(Error::DetectorPanicked {
            detector: detector.name(),
        })
    })
}
