//! Parquet serialization.

use arrow::array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use snafu::prelude::*;

use crate::config::ParquetCompression;
use crate::error::{ParquetSnafu, WriteError};

/// Serialize a record batch into a single in-memory Parquet file.
pub fn serialize_batch(
    batch: &RecordBatch,
    compression: ParquetCompression,
) -> Result<Vec<u8>, WriteError> {
    let properties = WriterProperties::builder()
        .set_compression(codec(compression))
        .build();

    let mut buffer = Vec::new();
    let mut writer =
        ArrowWriter::try_new(&mut buffer, batch.schema(), Some(properties)).context(ParquetSnafu)?;
    writer.write(batch).context(ParquetSnafu)?;
    writer.close().context(ParquetSnafu)?;

    Ok(buffer)
}

fn codec(compression: ParquetCompression) -> Compression {
    match compression {
        ParquetCompression::Uncompressed => Compression::UNCOMPRESSED,
        ParquetCompression::Snappy => Compression::SNAPPY,
        ParquetCompression::Gzip => Compression::GZIP(GzipLevel::default()),
        ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
        ParquetCompression::Lz4 => Compression::LZ4,
    }
}
