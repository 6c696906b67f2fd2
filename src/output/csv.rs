use anyhow::Result;
use chrono::SecondsFormat;
use std::io::Write;

use crate::kubernetes::{ObjectSnapshot, ResourceDescriptor};

/// Comma-separated index of collected objects
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    inline_data: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W, inline_data: bool) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
            inline_data,
        }
    }

    pub fn write_header(&mut self, columns: &[&str]) -> Result<()> {
        self.writer.write_record(columns)?;
        Ok(())
    }

    pub fn write_object(
        &mut self,
        resource: &ResourceDescriptor,
        object: &ObjectSnapshot,
    ) -> Result<()> {
        let created = object
            .creation_timestamp()
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut record = vec![
            object.kind().to_string(),
            resource.plural.clone(),
            object.api_version().to_string(),
            object.namespace().to_string(),
            object.name().to_string(),
            created,
        ];
        if self.inline_data {
            record.push(object.to_json()?);
        }

        self.writer.write_record(&record)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
