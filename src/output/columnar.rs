// src/output/columnar.rs

use arrow::{
    array::{ArrayRef, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{io::Write, sync::Arc};

use crate::error::Result;
use crate::process::{enrich::DERIVED_COLUMNS, OutputTable, Value};

/// Map the table's column union onto Arrow.
///
/// A column holding only integers (where present) becomes `Int64`, anything
/// else `Utf8`. Every column is nullable since rows may lack keys. A table
/// without columns gets the derived timing columns so the file still has a
/// schema.
pub fn build_record_batch(table: &OutputTable) -> Result<RecordBatch> {
    let mut columns = table.columns();
    if columns.is_empty() {
        columns = DERIVED_COLUMNS.iter().map(|c| c.to_string()).collect();
    }

    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

    for name in &columns {
        let cells: Vec<Option<&Value>> = table.rows().iter().map(|r| r.get(name)).collect();
        let all_int = cells.iter().flatten().all(|v| v.as_int().is_some());

        if all_int {
            let values: Int64Array = cells.iter().map(|c| c.and_then(Value::as_int)).collect();
            fields.push(Field::new(name, DataType::Int64, true));
            arrays.push(Arc::new(values));
        } else {
            let values: StringArray = cells
                .iter()
                .map(|c| c.map(|v| v.to_string()))
                .collect();
            fields.push(Field::new(name, DataType::Utf8, true));
            arrays.push(Arc::new(values));
        }
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    Ok(batch)
}

/// Encode the whole table as a single-row-group Parquet file.
pub fn write_parquet<W: Write + Send>(table: &OutputTable, writer: W) -> Result<()> {
    let batch = build_record_batch(table)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();

    let mut writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
