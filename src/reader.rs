//! File opening with transparent gzip decompression.
//!
//! Compression is sniffed from the first bytes of the stream (gzip magic
//! `1f 8b`), not from the file name, so renamed or extension-less archives
//! are still decompressed.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

const READ_BUFFER_SIZE: usize = 64 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Opens a file for reading, decompressing on the fly when the content looks
/// gzipped. Returns a buffered line-oriented reader over the plain bytes.
pub fn open(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    if is_gzip(&mut reader)? {
        let decoder = GzDecoder::new(reader);
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Peeks at the buffered head of the stream without consuming it.
fn is_gzip<R: BufRead>(reader: &mut R) -> Result<bool> {
    let head = reader.fill_buf()?;
    Ok(head.len() >= 2 && head[..2] == GZIP_MAGIC)
}
