//! Parquet price table.
//!
//! Layout: a `Date` column (Date32) followed by one nullable Float64 column
//! per symbol, snappy-compressed. Files written by other tools are accepted
//! when the dates sit in a Date64 or Timestamp column, or in a pandas index
//! column; integer price columns are widened to Float64 and NaN is read as
//! missing.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Date32Array, Float64Array};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Date32Type, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use corr_core::{PriceColumn, PriceTable, TradingDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::{debug, info, warn};

use crate::atomic::write_atomic;
use crate::error::{Result, StoreError};

/// Name of the date column written by this crate.
pub const DATE_COLUMN: &str = "Date";

/// Column names searched, in order, for the date index.
const DATE_COLUMN_CANDIDATES: [&str; 4] = [DATE_COLUMN, "date", "__index_level_0__", "index"];

/// Days from 0001-01-01 to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Read a whole price table.
///
/// Rows are sorted by date when the file is not already in order.
///
/// # Errors
///
/// * `StoreError::NotFound` - `path` does not exist
/// * `StoreError::Schema` - no date column, null dates, or a non-numeric
///   price column
/// * `StoreError::Core` - duplicate dates or invalid prices
pub fn read_price_table(path: &Path) -> Result<PriceTable> {
    let batch = read_batch(path)?;
    let schema = batch.schema();

    let date_index = date_column_index(&schema)
        .ok_or_else(|| StoreError::schema(path, "no date column found"))?;
    let dates = decode_dates(path, batch.column(date_index))?;

    let mut columns = Vec::with_capacity(schema.fields().len().saturating_sub(1));
    for (index, field) in schema.fields().iter().enumerate() {
        if index == date_index {
            continue;
        }
        if !field.data_type().is_numeric() {
            return Err(StoreError::schema(
                path,
                format!("column {} has non-numeric type {}", field.name(), field.data_type()),
            ));
        }
        let values = cast(batch.column(index), &DataType::Float64)?;
        let values: Vec<Option<f64>> = values
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        columns.push(PriceColumn::new(field.name().clone(), values));
    }

    let (dates, columns) = sort_rows(dates, columns);
    let table = PriceTable::new(dates, columns)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        assets = table.num_assets(),
        "Loaded price table"
    );
    Ok(table)
}

/// Replace the price table at `path` with `table`.
pub fn write_price_table(path: &Path, table: &PriceTable) -> Result<()> {
    let mut fields = vec![Field::new(DATE_COLUMN, DataType::Date32, false)];
    fields.extend(
        table
            .symbols()
            .map(|symbol| Field::new(symbol, DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let days: Vec<i32> = table.dates().iter().map(|d| encode_date(*d)).collect();
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(days))];
    arrays.extend(
        table
            .columns()
            .iter()
            .map(|c| Arc::new(Float64Array::from(c.values().to_vec())) as ArrayRef),
    );
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
        rows = table.len(),
        assets = table.num_assets(),
        "Saved price table"
    );
    Ok(())
}

/// Read every row group of a Parquet file into one batch.
pub(crate) fn read_batch(path: &Path) -> Result<RecordBatch> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let batches = builder
        .build()?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!(path = %path.display(), batches = batches.len(), "Read parquet batches");
    Ok(concat_batches(&schema, &batches)?)
}

fn date_column_index(schema: &Schema) -> Option<usize> {
    DATE_COLUMN_CANDIDATES
        .iter()
        .find_map(|name| schema.index_of(name).ok())
        .or_else(|| {
            schema.fields().iter().position(|f| {
                matches!(
                    f.data_type(),
                    DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _)
                )
            })
        })
}

fn decode_dates(path: &Path, array: &ArrayRef) -> Result<Vec<TradingDate>> {
    let days = cast(array, &DataType::Date32)?;
    let days = days.as_primitive::<Date32Type>();
    if days.null_count() > 0 {
        return Err(StoreError::schema(
            path,
            format!("date column has {} null entries", days.null_count()),
        ));
    }
    days.values()
        .iter()
        .map(|&d| {
            decode_date(d)
                .ok_or_else(|| StoreError::schema(path, format!("date value {} out of range", d)))
        })
        .collect()
}

fn sort_rows(
    dates: Vec<TradingDate>,
    columns: Vec<PriceColumn>,
) -> (Vec<TradingDate>, Vec<PriceColumn>) {
    if dates.windows(2).all(|w| w[0] <= w[1]) {
        return (dates, columns);
    }
    warn!(rows = dates.len(), "Price table rows out of date order; sorting");

    let mut order: Vec<usize> = (0..dates.len()).collect();
    order.sort_by_key(|&i| dates[i]);
    let sorted_dates = order.iter().map(|&i| dates[i]).collect();
    let sorted_columns = columns
        .into_iter()
        .map(|c| {
            let values = order.iter().map(|&i| c.values()[i]).collect();
            PriceColumn::new(c.symbol(), values)
        })
        .collect();
    (sorted_dates, sorted_columns)
}

pub(crate) fn encode_date(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub(crate) fn decode_date(days: i32) -> Option<NaiveDate> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}
