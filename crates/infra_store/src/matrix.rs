//! Parquet correlation matrix table.
//!
//! Columns `Asset1`, `Asset2` (Utf8) and one nullable Float64 `Corr_<label>`
//! column per lookback. A null cell means insufficient data.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, Float64Builder, StringBuilder};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use corr_core::Correlation;
use corr_engine::horizons::Lookback;
use corr_engine::matrix::{CorrelationMatrix, CorrelationMatrixRow};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::atomic::write_atomic;
use crate::error::{Result, StoreError};
use crate::prices::read_batch;

pub const ASSET1_COLUMN: &str = "Asset1";
pub const ASSET2_COLUMN: &str = "Asset2";
const CORR_PREFIX: &str = "Corr_";

/// Replace the matrix table at `path` with `matrix`.
pub fn write_correlation_matrix(path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
    let mut fields = vec![
        Field::new(ASSET1_COLUMN, DataType::Utf8, false),
        Field::new(ASSET2_COLUMN, DataType::Utf8, false),
    ];
    fields.extend(
        matrix
            .lookbacks()
            .iter()
            .map(|lb| Field::new(lb.column_name(), DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let num_rows = matrix.len();
    let mut asset1 = StringBuilder::with_capacity(num_rows, num_rows * 8);
    let mut asset2 = StringBuilder::with_capacity(num_rows, num_rows * 8);
    let mut values: Vec<Float64Builder> = matrix
        .lookbacks()
        .iter()
        .map(|_| Float64Builder::with_capacity(num_rows))
        .collect();

    for row in matrix.rows() {
        asset1.append_value(&row.asset_a);
        asset2.append_value(&row.asset_b);
        for (builder, value) in values.iter_mut().zip(&row.values) {
            builder.append_option(value.value());
        }
    }

    let mut arrays: Vec<ArrayRef> = vec![Arc::new(asset1.finish()), Arc::new(asset2.finish())];
    arrays.extend(values.iter_mut().map(|b| Arc::new(b.finish()) as ArrayRef));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    write_atomic(path, |file| {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    })?;

    info!(
        path = %path.display(),
        pairs = num_rows,
        lookbacks = matrix.lookbacks().len(),
        "Saved correlation matrix"
    );
    Ok(())
}

/// Read a whole matrix table.
///
/// Lookbacks are taken from the `Corr_<label>` column names in file order.
/// NaN cells are read as insufficient data.
///
/// # Errors
///
/// * `StoreError::NotFound` - `path` does not exist
/// * `StoreError::Schema` - missing asset columns, null asset names, or a
///   column that is neither an asset nor a `Corr_` column
/// * `StoreError::Engine` - unparsable or repeated lookback labels
pub fn read_correlation_matrix(path: &Path) -> Result<CorrelationMatrix> {
    let batch = read_batch(path)?;
    let schema = batch.schema();

    let asset1 = string_column(path, &batch, ASSET1_COLUMN)?;
    let asset2 = string_column(path, &batch, ASSET2_COLUMN)?;

    let mut lookbacks = Vec::new();
    let mut columns = Vec::new();
    for (index, field) in schema.fields().iter().enumerate() {
        let name = field.name();
        if name == ASSET1_COLUMN || name == ASSET2_COLUMN {
            continue;
        }
        let label = name.strip_prefix(CORR_PREFIX).ok_or_else(|| {
            StoreError::schema(path, format!("unexpected column {}", name))
        })?;
        lookbacks.push(Lookback::parse(label)?);

        let values = cast(batch.column(index), &DataType::Float64)?;
        let values: Vec<Correlation> = values
            .as_primitive::<Float64Type>()
            .iter()
            .map(Correlation::from_estimate)
            .collect();
        columns.push(values);
    }

    let rows = asset1
        .into_iter()
        .zip(asset2)
        .enumerate()
        .map(|(i, (asset_a, asset_b))| CorrelationMatrixRow {
            asset_a,
            asset_b,
            values: columns.iter().map(|c| c[i]).collect(),
        })
        .collect();

    let matrix = CorrelationMatrix::new(lookbacks, rows)?;
    info!(
        path = %path.display(),
        pairs = matrix.len(),
        lookbacks = matrix.lookbacks().len(),
        "Loaded correlation matrix"
    );
    Ok(matrix)
}

fn string_column(path: &Path, batch: &RecordBatch, name: &str) -> Result<Vec<String>> {
    let index = batch
        .schema()
        .index_of(name)
        .map_err(|_| StoreError::schema(path, format!("missing column {}", name)))?;
    let array = cast(batch.column(index), &DataType::Utf8)?;
    array
        .as_string::<i32>()
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(str::to_string)
                .ok_or_else(|| StoreError::schema(path, format!("null {} at row {}", name, row)))
        })
        .collect()
}
