//! Flate (zlib) compression for stream payloads

use crate::error::{PdfError, Result};
use flate2::Compression;

/// Compress data with the default zlib level
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_level(data, Compression::default().level())
}

/// Compress data using Flate/Zlib compression at the given level (0-9)
pub fn compress_with_level(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    if level > 9 {
        return Err(PdfError::CompressionError(format!(
            "compression level {level} out of range 0-9"
        )));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| PdfError::CompressionError(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| PdfError::CompressionError(e.to_string()))?;

    tracing::trace!(
        input = data.len(),
        output = compressed.len(),
        level,
        "flate encoded payload"
    );
    Ok(compressed)
}

/// Decompress data using Flate/Zlib decompression
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PdfError::CompressionError(e.to_string()))?;
    Ok(decompressed)
}
