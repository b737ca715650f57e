//! Binary snapshot export/import.
//!
//! Layout, little-endian throughout, no magic or version marker:
//!
//! `[estimated_elements: u64][elements_added: u64][false_positive_rate: f32][bit buffer]`
//!
//! The bit buffer is exactly `byte_length` bytes. Derived sizing is never
//! read from the stream: import re-derives `(m, k, byte_length)` from the
//! two leading scalars, so corrupt scalars fail parameter validation and a
//! short bit buffer fails with [`FilterError::CorruptData`].

use crate::bitarray::BitArray;
use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::filter::BloomFilter;
use crate::hash::{ChainedDigestHasher, IndexHasher};
use crate::params::FilterParams;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

impl BloomFilter {
    /// Writes the snapshot layout to `writer`.
    pub fn export<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.estimated_elements().to_le_bytes())?;
        writer.write_all(&self.elements_added().to_le_bytes())?;
        writer.write_all(&self.false_positive_rate().to_le_bytes())?;
        writer.write_all(self.raw_bits())?;
        Ok(())
    }

    /// Exports to a file, creating or truncating it.
    pub fn export_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.export(&mut writer)?;
        writer.flush()?;
        debug!(
            path = %path.as_ref().display(),
            bytes = self.byte_length(),
            "exported filter snapshot"
        );
        Ok(())
    }

    /// Rebuilds a filter from a snapshot stream, installing the default
    /// chained-digest hasher.
    pub fn import<R: Read>(reader: &mut R) -> Result<Self> {
        Self::import_with_hasher(reader, Box::new(ChainedDigestHasher))
    }

    /// Rebuilds a filter from a snapshot stream with a caller-supplied
    /// hasher. The hasher must match the one used when the snapshot was
    /// populated or queries may report inserted items as absent.
    pub fn import_with_hasher<R: Read>(
        reader: &mut R,
        hasher: Box<dyn IndexHasher>,
    ) -> Result<Self> {
        let estimated_elements = read_u64(reader)?;
        let elements_added = read_u64(reader)?;
        let false_positive_rate = read_f32(reader)?;

        let params = FilterParams::derive(
            estimated_elements,
            f64::from(false_positive_rate),
        )?;
        let byte_length = usize::try_from(params.byte_length).map_err(|_| {
            FilterError::AllocationFailure {
                bytes: params.byte_length,
            }
        })?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(byte_length).map_err(|_| {
            FilterError::AllocationFailure {
                bytes: params.byte_length,
            }
        })?;
        buf.resize(byte_length, 0u8);

        let filled = read_fully(reader, &mut buf)?;
        if filled != byte_length {
            return Err(FilterError::CorruptData {
                expected: params.byte_length,
                actual: filled as u64,
            });
        }

        let config = FilterConfig {
            estimated_elements,
            false_positive_rate,
        };
        let bits = BitArray::from_vec(buf, params.number_bits);
        Ok(Self::from_parts(config, params, bits, elements_added, hasher))
    }

    /// Imports from a file, installing the default hasher.
    pub fn import_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path.as_ref())?);
        let filter = Self::import(&mut reader)?;
        info!(
            path = %path.as_ref().display(),
            elements_added = filter.elements_added(),
            "imported filter snapshot"
        );
        Ok(filter)
    }
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    read_scalar(reader, &mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_f32<R: Read>(reader: &mut R) -> Result<f32> {
    let mut buf = [0u8; 4];
    read_scalar(reader, &mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_scalar<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let filled = read_fully(reader, buf)?;
    if filled != buf.len() {
        return Err(FilterError::CorruptData {
            expected: buf.len() as u64,
            actual: filled as u64,
        });
    }
    Ok(())
}

/// Reads until `buf` is full or the stream ends, returning the byte count.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
