//! Parallel parsing of many documents.
//!
//! Every input gets its own [`Parser`](xrst_core::Parser) and
//! [`SharedEnvironment`], built from one shared [`ParserBuilder`].

use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use xrst_core::{DocumentNode, ParserBuilder, SharedEnvironment};

/// Input for batch processing: a single document to parse.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markup source.
    pub source: String,
    /// Optional filename override; defaults to `id`.
    pub filename: Option<String>,
}

impl BatchInput {
    /// Creates an input whose filename is its id.
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            filename: None,
        }
    }
}

/// Result for a single document in a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Parsed tree (present unless the parse itself failed).
    pub document: Option<DocumentNode>,
    /// First error, when the parse failed or reported recoverable errors.
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Total number of documents submitted.
    pub total: u32,
    /// Number of documents parsed without errors.
    pub succeeded: u32,
    /// Number of documents with errors.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<u32>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: Option<bool>,
}

/// Result of batch processing containing all results and statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Parses `inputs` in parallel.
///
/// With `continue_on_error` off, documents are parsed one after another and
/// processing stops after the first document with errors.
pub fn parse_batch(
    builder: &ParserBuilder,
    inputs: Vec<BatchInput>,
    options: Option<BatchOptions>,
) -> BatchProcessingResult {
    let start = Instant::now();
    let opts = options.unwrap_or_default();
    let continue_on_error = opts.continue_on_error.unwrap_or(true);

    // Configure thread pool if max_threads is specified
    let pool = opts.max_threads.and_then(|max_threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads as usize)
            .build()
            .map_err(|err| log::warn!("Falling back to the global thread pool: {}", err))
            .ok()
    });

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let mut parser = builder.build();
        parser.set_filename(input.filename.unwrap_or_else(|| input.id.clone()));
        let environment = SharedEnvironment::default();

        let (document, error) = match parser.parse(&environment, &input.source) {
            Ok(document) => {
                let error = document.diagnostics.errors.first().map(ToString::to_string);
                (Some(document.clone()), error)
            }
            Err(err) => (None, Some(err.to_string())),
        };
        if error.is_some() {
            failed.fetch_add(1, Ordering::Relaxed);
        } else {
            succeeded.fetch_add(1, Ordering::Relaxed);
        }
        BatchResult {
            id: input.id,
            document,
            error,
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let stop = result.error.is_some();
            results.push(result);
            if stop {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();
    log::debug!("Parsed {} of {} documents in {:?}", results.len(), total, elapsed);

    BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}
