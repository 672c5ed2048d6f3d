//! Magic and header validation.

use storable_buffers::Reader;

use crate::constants::{
    BYTEORDER, DOUBLE_SIZE, INT_SIZE, LONG_SIZE, MAGIC, PTR_SIZE, SUPPORTED_MAJOR, SUPPORTED_MINOR,
};
use crate::error::ThawError;

/// Validated format header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub major: u8,
    pub minor: u8,
    /// Short header variant: no byte-order/size section follows the
    /// version byte(s).
    pub network_order: bool,
}

/// Consumes and validates the stream header.
///
/// The optional `pst0` magic is skipped when present. The version byte
/// carries the network-order flag in bit 0 and the major version in bits
/// 1-7; a minor version byte follows only when the flag is clear and the
/// major version is above 1. Unless the network-order flag is set, the
/// byte-order marker and the declared primitive sizes must exactly match
/// this decoder's fixed platform assumptions.
pub fn read_header(reader: &mut Reader<'_>) -> Result<Header, ThawError> {
    if reader.starts_with(MAGIC) {
        reader.skip(MAGIC.len())?;
    }

    let version = reader.u8()?;
    let network_order = version & 0x01 != 0;
    let major = version >> 1;
    let minor = if !network_order && major > 1 {
        reader.u8()?
    } else {
        0
    };

    if major > SUPPORTED_MAJOR || (major == SUPPORTED_MAJOR && minor > SUPPORTED_MINOR) {
        return Err(ThawError::UnsupportedVersion(major, minor));
    }

    if network_order {
        return Ok(Header {
            major,
            minor,
            network_order,
        });
    }

    let len = reader.u8()? as usize;
    let byteorder = reader.bytes(len)?;
    if byteorder != BYTEORDER {
        return Err(ThawError::ByteOrderMismatch);
    }

    let int_size = reader.u8()?;
    if int_size != INT_SIZE {
        return Err(ThawError::IncompatibleSize("int", int_size));
    }
    let long_size = reader.u8()?;
    if long_size != LONG_SIZE {
        return Err(ThawError::IncompatibleSize("long", long_size));
    }
    let ptr_size = reader.u8()?;
    if ptr_size != PTR_SIZE {
        return Err(ThawError::IncompatibleSize("pointer", ptr_size));
    }
    if minor >= 2 {
        let double_size = reader.u8()?;
        if double_size != DOUBLE_SIZE {
            return Err(ThawError::IncompatibleSize("double", double_size));
        }
    }

    Ok(Header {
        major,
        minor,
        network_order,
    })
}
