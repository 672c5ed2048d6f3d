//! Decoder for Perl's Storable binary serialization format.
//!
//! Given a byte buffer produced by Storable's `freeze`/`nfreeze` (or a file
//! written by `store`), [`thaw`] parses the magic header and recursively
//! decodes the type-tagged record stream into [`StorableValue`]s: scalars,
//! integers, doubles, arrays, hashes, references, and blessed objects, with
//! backreferences resolved against the values already decoded in the call.
//!
//! # Example
//!
//! ```
//! use storable::{thaw, StorableValue};
//!
//! // v2.11 little-endian header followed by SX_BYTE 0x81.
//! let mut data = vec![0x04, 0x0b, 0x08];
//! data.extend_from_slice(b"12345678");
//! data.extend_from_slice(&[0x04, 0x08, 0x08, 0x08]);
//! data.extend_from_slice(&[0x08, 0x81]);
//!
//! assert_eq!(thaw(&data).unwrap(), StorableValue::Integer(1));
//! ```
//!
//! Decoding is synchronous, allocation-only work with no shared state
//! between calls; concurrent `thaw` calls need no synchronization. Nesting
//! depth is bounded by [`ThawOptions::max_depth`].

pub mod constants;
mod convert;
mod decoder;
mod error;
mod header;
mod registry;
mod values;

use std::path::Path;

pub use convert::to_json;
pub use decoder::{Converter, ThawDecoder, ThawOptions};
pub use error::ThawError;
pub use header::{read_header, Header};
pub use registry::{BlessFn, ClassRegistry};
pub use values::{Blessed, StorableValue};

/// Decodes a frozen Storable buffer with default options.
pub fn thaw(data: &[u8]) -> Result<StorableValue, ThawError> {
    thaw_with(data, &ThawOptions::default())
}

/// Decodes a frozen Storable buffer.
///
/// Validates the header, decodes exactly one root record, and fails with
/// [`ThawError::TrailingData`] if any bytes remain. Any failure aborts the
/// whole call; there is no partial result.
pub fn thaw_with(data: &[u8], options: &ThawOptions) -> Result<StorableValue, ThawError> {
    let mut decoder = ThawDecoder::new(data, options);
    decoder.decode()
}

/// Reads and decodes a file written by Storable's `store`.
///
/// Unlike [`thaw`], the `pst0` file magic is required here and its absence
/// fails with [`ThawError::BadMagic`].
pub fn retrieve(path: impl AsRef<Path>) -> Result<StorableValue, ThawError> {
    retrieve_with(path, &ThawOptions::default())
}

/// [`retrieve`] with explicit options.
pub fn retrieve_with(
    path: impl AsRef<Path>,
    options: &ThawOptions,
) -> Result<StorableValue, ThawError> {
    let data = std::fs::read(path)?;
    if !data.starts_with(constants::MAGIC) {
        return Err(ThawError::BadMagic);
    }
    thaw_with(&data, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frozen(body: &[u8]) -> Vec<u8> {
        let mut data = vec![0x04, 0x0b, 0x08];
        data.extend_from_slice(b"12345678");
        data.extend_from_slice(&[0x04, 0x08, 0x08, 0x08]);
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn thaw_smoke() {
        // ARRAY of two SX_BYTE records.
        let data = frozen(&[0x02, 2, 0, 0, 0, 0x08, 0x81, 0x08, 0x82]);
        let value = thaw(&data).unwrap();
        assert_eq!(
            value,
            StorableValue::Array(vec![1.into(), 2.into()])
        );
    }

    #[test]
    fn thaw_rejects_trailing_bytes() {
        let mut data = frozen(&[0x08, 0x81]);
        data.push(0x00);
        assert!(matches!(thaw(&data), Err(ThawError::TrailingData(1))));
    }

    #[test]
    fn retrieve_requires_magic() {
        let dir = std::env::temp_dir();
        let path = dir.join("storable_retrieve_requires_magic.bin");
        std::fs::write(&path, frozen(&[0x08, 0x81])).unwrap();
        assert!(matches!(retrieve(&path), Err(ThawError::BadMagic)));

        let mut with_magic = b"pst0".to_vec();
        with_magic.extend_from_slice(&frozen(&[0x08, 0x81]));
        std::fs::write(&path, with_magic).unwrap();
        assert_eq!(retrieve(&path).unwrap(), StorableValue::Integer(1));
        std::fs::remove_file(&path).ok();
    }
}
