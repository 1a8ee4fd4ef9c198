//! Run address queries against HCL input

use tracing::{debug, warn};

use super::CliError;
use crate::{Document, Query, ReadHandler, convert_results, format, output::DEFAULT_OUTPUT_FORMAT};

/// Options for the read command
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Address query, e.g. `resource.google_container_node_pool.nodes.node_count`
    pub query: String,
    /// HCL source text
    pub input: Option<String>,
    /// `go-template='<TEMPLATE>'`, `json` or `yaml`
    pub output_format: String,
    /// Read unevaluable expressions as their raw source text
    pub fallback: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            query: String::new(),
            input: None,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            fallback: false,
        }
    }
}

/// Execute a read and return the formatted output.
///
/// With `fallback` set, a resolution error is logged and whatever was
/// resolved before it is still formatted.
pub fn execute_read(options: &ReadOptions) -> Result<String, CliError> {
    let source = options.input.as_deref().ok_or(CliError::NoInput)?;
    let doc = Document::parse(source).map_err(CliError::Document)?;
    let query = Query::parse(&options.query)?;

    let mut handler = ReadHandler::new(options.fallback);
    if let Err(err) = query.walk(&doc, &mut handler) {
        if !options.fallback {
            return Err(err.into());
        }
        warn!(%err, "continuing with partially resolved results");
    }

    let results = convert_results(handler.into_results());
    debug!(entries = results.len(), format = %options.output_format, "formatting results");
    Ok(format(&results, &options.output_format)?)
}
