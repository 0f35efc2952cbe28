//! Fingerprints for parameters and finished layouts.
//!
//! A value is serialized as compact JSON straight into an xxh64 hasher, so
//! nothing is buffered. Callers hash plain records only: ids, ranks, enums
//! and floats already quantized to `i64`. Vectors keep index order and
//! relation sets are `BTreeSet`, so equal layouts feed the hasher equal
//! bytes.

use std::io;

use serde::Serialize;
use xxhash_rust::xxh64::Xxh64;

/// Seed shared by every fingerprint in the crate.
const FINGERPRINT_SEED: u64 = 0;

/// Forwards serializer output into the hasher.
struct HashWriter(Xxh64);

impl io::Write for HashWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// xxh64 of the compact JSON form of `value`.
///
/// Serialization only fails for maps with non-string keys, which no
/// fingerprinted record contains.
pub fn fingerprint<T: Serialize>(value: &T) -> u64 {
    let mut writer = HashWriter(Xxh64::new(FINGERPRINT_SEED));
    serde_json::to_writer(&mut writer, value).expect("fingerprinted records serialize");
    writer.0.digest()
}

/// [`fingerprint`] as 16 lowercase hex digits.
pub fn fingerprint_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", fingerprint(value))
}
