//! Transparent gzip decompression for structure input.

use flate2::bufread::MultiGzDecoder;
use std::io::{self, BufRead, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// `true` when the path carries a `.gz` extension.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case("gz"))
}

pub enum MaybeGzReader<R: BufRead> {
    Plain(R),
    Gzip(MultiGzDecoder<R>),
}

impl<R: BufRead> MaybeGzReader<R> {
    pub fn is_compressed(&self) -> bool {
        matches!(self, MaybeGzReader::Gzip(_))
    }
}

impl<R: BufRead> Read for MaybeGzReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MaybeGzReader::Plain(r) => r.read(buf),
            MaybeGzReader::Gzip(r) => r.read(buf),
        }
    }
}

/// Wraps `reader` in a gzip decoder when its first bytes are the gzip magic.
///
/// Concatenated gzip members are decoded as one stream.
pub fn open_maybe_gzip<R: BufRead>(mut reader: R) -> io::Result<MaybeGzReader<R>> {
    if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        Ok(MaybeGzReader::Gzip(MultiGzDecoder::new(reader)))
    } else {
        Ok(MaybeGzReader::Plain(reader))
    }
}
