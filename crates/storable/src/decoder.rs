//! Recursive-descent decoder for the Storable record stream.

use storable_buffers::Reader;

use crate::constants::{
    BYTE_BIAS, DEFAULT_MAX_DEPTH, LG_BLESS, SHV_K_ISSV, SHV_K_UTF8, SHV_K_WASUTF8, SX_ARRAY,
    SX_BLESS, SX_BYTE, SX_DOUBLE, SX_FLAG_HASH, SX_HASH, SX_INTEGER, SX_IX_BLESS, SX_LSCALAR,
    SX_LUTF8STR, SX_NETINT, SX_OBJECT, SX_OVERLOAD, SX_REF, SX_SCALAR, SX_SV_NO, SX_SV_UNDEF,
    SX_SV_YES, SX_UNDEF, SX_UTF8STR, SX_WEAKOVERLOAD, SX_WEAKREF,
};
use crate::error::ThawError;
use crate::header::read_header;
use crate::registry::ClassRegistry;
use crate::values::StorableValue;
use indexmap::IndexMap;

/// Caller-supplied byte-to-text converter for non-ASCII opaque scalars.
/// Returning `None` keeps the raw bytes unchanged.
pub type Converter = dyn Fn(&[u8]) -> Option<String> + Send + Sync;

/// Options for one `thaw` call.
pub struct ThawOptions {
    /// Constructors for blessed class names.
    pub classes: ClassRegistry,
    /// Converter applied to non-ASCII opaque scalars and hash keys.
    pub converter: Option<Box<Converter>>,
    /// Maximum record nesting depth before decoding fails.
    pub max_depth: usize,
}

impl Default for ThawOptions {
    fn default() -> Self {
        Self {
            classes: ClassRegistry::new(),
            converter: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// SeenTable slot. Containers reserve their slot before decoding children,
/// so a backreference can observe a target that is not finished yet.
enum Slot {
    Pending,
    Done(StorableValue),
}

/// Storable stream decoder.
///
/// Holds the two per-call side tables (SeenTable and ClassNameTable) and a
/// depth counter. One decoder decodes one buffer; there is no state carried
/// across calls.
pub struct ThawDecoder<'a> {
    reader: Reader<'a>,
    options: &'a ThawOptions,
    seen: Vec<Slot>,
    classnames: Vec<String>,
    depth: usize,
}

impl<'a> ThawDecoder<'a> {
    pub fn new(data: &'a [u8], options: &'a ThawOptions) -> Self {
        Self {
            reader: Reader::new(data),
            options,
            seen: Vec::new(),
            classnames: Vec::new(),
            depth: 0,
        }
    }

    /// Decodes the whole buffer: header, exactly one root record, and an
    /// end-of-buffer check.
    pub fn decode(&mut self) -> Result<StorableValue, ThawError> {
        read_header(&mut self.reader)?;
        let value = self.read_any()?;
        let rest = self.reader.remaining();
        if rest != 0 {
            return Err(ThawError::TrailingData(rest));
        }
        Ok(value)
    }

    /// Reads one tagged record.
    pub fn read_any(&mut self) -> Result<StorableValue, ThawError> {
        if self.depth >= self.options.max_depth {
            return Err(ThawError::DepthLimitExceeded(self.options.max_depth));
        }
        self.depth += 1;
        let tag = self.reader.u8()?;
        let value = match tag {
            SX_OBJECT => self.read_backref(),
            SX_LSCALAR => {
                let len = self.reader.u32_le()? as usize;
                self.read_binary_scalar(len)
            }
            SX_ARRAY => self.read_array(),
            SX_HASH => self.read_hash(),
            SX_REF | SX_OVERLOAD | SX_WEAKREF | SX_WEAKOVERLOAD => self.read_ref(),
            SX_UNDEF | SX_SV_UNDEF => Ok(self.record(StorableValue::Undef)),
            SX_INTEGER => {
                let v = self.reader.i64_le()?;
                Ok(self.record(StorableValue::Integer(v)))
            }
            SX_DOUBLE => {
                let v = self.reader.f64_le()?;
                Ok(self.record(StorableValue::Double(v)))
            }
            SX_BYTE => {
                let b = self.reader.u8()?;
                Ok(self.record(StorableValue::Integer(b as i64 - BYTE_BIAS)))
            }
            SX_NETINT => {
                let v = self.reader.i32_be()?;
                Ok(self.record(StorableValue::Integer(v as i64)))
            }
            SX_SCALAR => {
                let len = self.reader.u8()? as usize;
                self.read_binary_scalar(len)
            }
            SX_SV_YES => Ok(self.record(StorableValue::Bool(true))),
            SX_SV_NO => Ok(self.record(StorableValue::Bool(false))),
            SX_BLESS => self.read_bless(),
            SX_IX_BLESS => self.read_ix_bless(),
            SX_UTF8STR => {
                let len = self.reader.u8()? as usize;
                self.read_utf8_scalar(len)
            }
            SX_LUTF8STR => {
                let len = self.reader.u32_le()? as usize;
                self.read_utf8_scalar(len)
            }
            SX_FLAG_HASH => self.read_flag_hash(),
            other => Err(ThawError::UnknownTag(other)),
        }?;
        self.depth -= 1;
        Ok(value)
    }

    /// Appends a completed value to the SeenTable and returns it.
    fn record(&mut self, value: StorableValue) -> StorableValue {
        self.seen.push(Slot::Done(value.clone()));
        value
    }

    fn read_backref(&mut self) -> Result<StorableValue, ThawError> {
        // Backreference indexes are big-endian, unlike every other
        // multi-byte field in the body.
        let index = self.reader.u32_be()? as usize;
        match self.seen.get(index) {
            Some(Slot::Done(value)) => Ok(value.clone()),
            Some(Slot::Pending) => Ok(StorableValue::Backref(index)),
            None => Err(ThawError::BackrefOutOfRange {
                index,
                len: self.seen.len(),
            }),
        }
    }

    fn read_binary_scalar(&mut self, len: usize) -> Result<StorableValue, ThawError> {
        let bytes = self.reader.bytes(len)?;
        let value = if bytes.is_ascii() {
            StorableValue::Str(String::from_utf8_lossy(bytes).into_owned())
        } else if let Some(converter) = &self.options.converter {
            match converter(bytes) {
                Some(text) => StorableValue::Str(text),
                None => StorableValue::Bytes(bytes.to_vec()),
            }
        } else {
            StorableValue::Bytes(bytes.to_vec())
        };
        Ok(self.record(value))
    }

    fn read_utf8_scalar(&mut self, len: usize) -> Result<StorableValue, ThawError> {
        let bytes = self.reader.bytes(len)?;
        let text = std::str::from_utf8(bytes).map_err(|_| ThawError::InvalidUtf8)?;
        Ok(self.record(StorableValue::Str(text.to_owned())))
    }

    fn read_array(&mut self) -> Result<StorableValue, ThawError> {
        let count = self.reader.u32_le()? as usize;
        let slot = self.reserve();
        let mut items = Vec::new();
        for _ in 0..count {
            items.push(self.read_any()?);
        }
        let value = StorableValue::Array(items);
        self.complete(slot, value.clone());
        Ok(value)
    }

    fn read_hash(&mut self) -> Result<StorableValue, ThawError> {
        let count = self.reader.u32_le()? as usize;
        let slot = self.reserve();
        let mut map = IndexMap::new();
        for _ in 0..count {
            // The value record precedes the key bytes in the stream.
            let value = self.read_any()?;
            let key_len = self.reader.u32_le()? as usize;
            let key_bytes = self.reader.bytes(key_len)?;
            let key = self.key_text(key_bytes, false)?;
            map.insert(key, value);
        }
        let value = StorableValue::Hash(map);
        self.complete(slot, value.clone());
        Ok(value)
    }

    fn read_flag_hash(&mut self) -> Result<StorableValue, ThawError> {
        // Hash-level flags: SHV_RESTRICTED is accepted and ignored.
        let _hash_flags = self.reader.u8()?;
        let count = self.reader.u32_le()? as usize;
        let slot = self.reserve();
        let mut map = IndexMap::new();
        for _ in 0..count {
            let value = self.read_any()?;
            let flags = self.reader.u8()?;
            let key = if flags & SHV_K_ISSV != 0 {
                let key_value = self.read_any()?;
                self.key_from_value(key_value)?
            } else {
                let key_len = self.reader.u32_le()? as usize;
                let key_bytes = self.reader.bytes(key_len)?;
                let force_utf8 = flags & (SHV_K_UTF8 | SHV_K_WASUTF8) != 0;
                self.key_text(key_bytes, force_utf8)?
            };
            map.insert(key, value);
        }
        let value = StorableValue::Hash(map);
        self.complete(slot, value.clone());
        Ok(value)
    }

    fn read_ref(&mut self) -> Result<StorableValue, ThawError> {
        // Reference semantics collapse to the referent; the decoded value
        // is recorded a second time under this record's own slot.
        let value = self.read_any()?;
        Ok(self.record(value))
    }

    fn read_bless(&mut self) -> Result<StorableValue, ThawError> {
        let len = self.read_flex_len()?;
        let name = self.reader.bytes(len)?;
        let class = std::str::from_utf8(name)
            .map_err(|_| ThawError::InvalidUtf8)?
            .to_owned();
        self.classnames.push(class.clone());
        self.read_blessed(class)
    }

    fn read_ix_bless(&mut self) -> Result<StorableValue, ThawError> {
        let index = self.read_flex_len()?;
        let class = match self.classnames.get(index) {
            Some(class) => class.clone(),
            None => {
                return Err(ThawError::ClassIndexOutOfRange {
                    index,
                    len: self.classnames.len(),
                })
            }
        };
        self.read_blessed(class)
    }

    fn read_blessed(&mut self, class: String) -> Result<StorableValue, ThawError> {
        let slot = self.seen.len();
        let underlying = self.read_any()?;
        let value = self.options.classes.construct(&class, underlying);
        // Blessing happens on the same scalar in the source format, so the
        // underlying value's slot must observe the blessed result.
        if slot < self.seen.len() {
            self.seen[slot] = Slot::Done(value.clone());
        }
        Ok(value)
    }

    /// Reads a bless length or class index: one byte, or a 4-byte
    /// little-endian value when the high bit is set.
    fn read_flex_len(&mut self) -> Result<usize, ThawError> {
        let b = self.reader.u8()?;
        if b & LG_BLESS != 0 {
            Ok(self.reader.u32_le()? as usize)
        } else {
            Ok(b as usize)
        }
    }

    fn reserve(&mut self) -> usize {
        self.seen.push(Slot::Pending);
        self.seen.len() - 1
    }

    fn complete(&mut self, slot: usize, value: StorableValue) {
        self.seen[slot] = Slot::Done(value);
    }

    fn key_text(&self, bytes: &[u8], force_utf8: bool) -> Result<String, ThawError> {
        if force_utf8 {
            return std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| ThawError::InvalidUtf8);
        }
        if bytes.is_ascii() {
            return Ok(String::from_utf8_lossy(bytes).into_owned());
        }
        if let Some(converter) = &self.options.converter {
            if let Some(text) = converter(bytes) {
                return Ok(text);
            }
        }
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ThawError::InvalidKey)
    }

    /// Coerces a key stored as a full record (SHV_K_ISSV) to key text.
    fn key_from_value(&self, value: StorableValue) -> Result<String, ThawError> {
        match value {
            StorableValue::Str(s) => Ok(s),
            StorableValue::Bytes(b) => self.key_text(&b, false),
            StorableValue::Integer(i) => Ok(i.to_string()),
            StorableValue::Double(d) => Ok(d.to_string()),
            _ => Err(ThawError::InvalidKey),
        }
    }
}
