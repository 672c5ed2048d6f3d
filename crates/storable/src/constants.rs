//! Wire constants for the Storable binary format.
//!
//! Tag bytes and flag bits follow Perl's `Storable.xs`.

/// Optional file magic written by `store`/`nstore`.
pub const MAGIC: &[u8; 4] = b"pst0";

/// Highest format major version this decoder accepts.
pub const SUPPORTED_MAJOR: u8 = 2;
/// Highest format minor version this decoder accepts.
pub const SUPPORTED_MINOR: u8 = 11;

/// Byte-order marker this decoder expects (64-bit little-endian perl).
pub const BYTEORDER: &[u8] = b"12345678";

/// Expected `sizeof(int)` declared in the header.
pub const INT_SIZE: u8 = 4;
/// Expected `sizeof(long)` declared in the header.
pub const LONG_SIZE: u8 = 8;
/// Expected pointer size declared in the header.
pub const PTR_SIZE: u8 = 8;
/// Expected `sizeof(double)` declared in the header (minor >= 2).
pub const DOUBLE_SIZE: u8 = 8;

// Record tags (closed enumeration, 0-34).
pub const SX_OBJECT: u8 = 0;
pub const SX_LSCALAR: u8 = 1;
pub const SX_ARRAY: u8 = 2;
pub const SX_HASH: u8 = 3;
pub const SX_REF: u8 = 4;
pub const SX_UNDEF: u8 = 5;
pub const SX_INTEGER: u8 = 6;
pub const SX_DOUBLE: u8 = 7;
pub const SX_BYTE: u8 = 8;
pub const SX_NETINT: u8 = 9;
pub const SX_SCALAR: u8 = 10;
pub const SX_TIED_ARRAY: u8 = 11;
pub const SX_TIED_HASH: u8 = 12;
pub const SX_TIED_SCALAR: u8 = 13;
pub const SX_SV_UNDEF: u8 = 14;
pub const SX_SV_YES: u8 = 15;
pub const SX_SV_NO: u8 = 16;
pub const SX_BLESS: u8 = 17;
pub const SX_IX_BLESS: u8 = 18;
pub const SX_HOOK: u8 = 19;
pub const SX_OVERLOAD: u8 = 20;
pub const SX_TIED_KEY: u8 = 21;
pub const SX_TIED_IDX: u8 = 22;
pub const SX_UTF8STR: u8 = 23;
pub const SX_LUTF8STR: u8 = 24;
pub const SX_FLAG_HASH: u8 = 25;
pub const SX_CODE: u8 = 26;
pub const SX_WEAKREF: u8 = 27;
pub const SX_WEAKOVERLOAD: u8 = 28;
pub const SX_VSTRING: u8 = 29;
pub const SX_LVSTRING: u8 = 30;
pub const SX_SVUNDEF_ELEM: u8 = 31;
pub const SX_REGEXP: u8 = 32;
pub const SX_LOBJECT: u8 = 33;
pub const SX_LAST: u8 = 34;

/// Bias subtracted from an `SX_BYTE` payload to recover the signed value.
pub const BYTE_BIAS: i64 = 128;

/// High bit of the short bless length/index byte: a 4-byte value follows.
pub const LG_BLESS: u8 = 0x80;

// Flagged-hash flag bits.
/// Hash-level: the hash was restricted (accepted, no behavioral effect).
pub const SHV_RESTRICTED: u8 = 0x01;
/// Entry-level: key bytes are UTF-8.
pub const SHV_K_UTF8: u8 = 0x01;
/// Entry-level: key was UTF-8 before downgrade (treated as UTF-8).
pub const SHV_K_WASUTF8: u8 = 0x02;
/// Entry-level: key was locked (accepted, no behavioral effect).
pub const SHV_K_LOCKED: u8 = 0x04;
/// Entry-level: key is stored as a full record, not a plain string.
pub const SHV_K_ISSV: u8 = 0x08;

/// Default recursion depth limit for one `thaw` call.
pub const DEFAULT_MAX_DEPTH: usize = 512;
