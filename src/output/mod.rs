mod csv;
mod tree;

pub use self::csv::CsvSink;
pub use self::tree::TreeSink;

use anyhow::Result;
use std::io::Write;
use tracing::warn;

use crate::filter::Filter;
use crate::kubernetes::{ObjectSnapshot, ResourceDescriptor};

/// Index columns, in output order
pub const INDEX_COLUMNS: &[&str] = &[
    "kind",
    "plural",
    "apiversion",
    "namespace",
    "name",
    "creationtimestamp",
];

/// Extra column carrying the full JSON payload
pub const DATA_COLUMN: &str = "data";

/// Which sink a filter sends objects to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// One YAML file per object under the output directory
    Tree,
    /// CSV index with the JSON payload as the last column
    CsvWithData,
    /// CSV index only
    Csv,
}

impl SinkKind {
    pub fn for_filter(filter: &Filter) -> Self {
        if !filter.output_dir().is_empty() {
            SinkKind::Tree
        } else if filter.inline_data() {
            SinkKind::CsvWithData
        } else {
            SinkKind::Csv
        }
    }

    /// Header columns written before any row, `None` when nothing goes to stdout
    pub fn header(&self) -> Option<Vec<&'static str>> {
        match self {
            SinkKind::Tree => None,
            SinkKind::Csv => Some(INDEX_COLUMNS.to_vec()),
            SinkKind::CsvWithData => {
                let mut columns = INDEX_COLUMNS.to_vec();
                columns.push(DATA_COLUMN);
                Some(columns)
            }
        }
    }
}

/// The single terminal consumer chosen for a run
pub enum OutputSink<W: Write> {
    Csv(CsvSink<W>),
    Tree(TreeSink),
}

impl<W: Write> OutputSink<W> {
    /// Pick the sink for `filter` and write its header, if it has one, to `out`
    pub fn for_filter(filter: &Filter, out: W) -> Result<Self> {
        match SinkKind::for_filter(filter) {
            SinkKind::Tree => Ok(OutputSink::Tree(TreeSink::new(filter.output_dir()))),
            kind => {
                let mut sink = CsvSink::new(out, kind == SinkKind::CsvWithData);
                if let Some(header) = kind.header() {
                    sink.write_header(&header)?;
                }
                Ok(OutputSink::Csv(sink))
            }
        }
    }

    /// Hand one object to the sink; failures are logged and the object is skipped
    pub fn emit(&mut self, resource: &ResourceDescriptor, object: &ObjectSnapshot) {
        let result = match self {
            OutputSink::Csv(sink) => sink.write_object(resource, object),
            OutputSink::Tree(sink) => sink.write_object(resource, object),
        };

        if let Err(e) = result {
            warn!(
                kind = %object.kind(),
                namespace = %object.namespace(),
                name = %object.name(),
                error = %e,
                "Failed to write resource"
            );
        }
    }

    /// Flush buffered output
    pub fn finish(self) -> Result<()> {
        match self {
            OutputSink::Csv(sink) => sink.finish(),
            OutputSink::Tree(_) => Ok(()),
        }
    }
}
