//! Brotli decompression of the WOFF2 table data stream.

use std::io::{self, Write};

use brotli_decompressor::BrotliDecompressCustomDict;

use crate::ReadError;

const BUFFER_SIZE: usize = 4096;

/// Decompresses the table data stream, which must expand to exactly
/// `expected_len` bytes and be fully consumed.
///
/// Output is allocated as it is produced, not up front.
pub(crate) fn decompress(encoded: &[u8], expected_len: usize) -> Result<Vec<u8>, ReadError> {
    let mut input = io::Cursor::new(encoded);
    let mut output = LimitedWriter::new(expected_len);
    let mut input_buffer = [0u8; BUFFER_SIZE];
    let mut output_buffer = [0u8; BUFFER_SIZE];
    let result = BrotliDecompressCustomDict(
        &mut input,
        &mut output,
        &mut input_buffer,
        &mut output_buffer,
        Vec::new(),
    );
    if output.exceeded {
        return Err(ReadError::Brotli(format!(
            "stream expands beyond the {expected_len} bytes of the table directory"
        )));
    }
    result.map_err(|err| ReadError::Brotli(err.to_string()))?;
    if input.position() < encoded.len() as u64 {
        return Err(ReadError::Brotli("trailing data after the brotli stream".into()));
    }
    if output.data.len() != expected_len {
        return Err(ReadError::MalformedData(
            "decompressed size does not match table directory",
        ));
    }
    Ok(output.data)
}

/// Collects output until `remaining` runs out.
struct LimitedWriter {
    data: Vec<u8>,
    remaining: usize,
    exceeded: bool,
}

impl LimitedWriter {
    fn new(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            remaining: limit,
            exceeded: false,
        }
    }
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.remaining {
            self.exceeded = true;
            return Err(io::Error::new(io::ErrorKind::InvalidData, "output limit reached"));
        }
        self.remaining -= buf.len();
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
