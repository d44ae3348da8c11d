use std::io;

use byteorder::{BigEndian, ReadBytesExt};

use super::{ProtocolError, tag};

/// Sizes (in bytes) of the variable-width IDs used by a debuggee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdSizes {
    pub field: u8,
    pub method: u8,
    pub object: u8,
    pub reference_type: u8,
    pub frame: u8,
}

impl Default for IdSizes {
    fn default() -> Self {
        Self {
            field: 8,
            method: 8,
            object: 8,
            reference_type: 8,
            frame: 8,
        }
    }
}

impl IdSizes {
    /// Parses the reply of the `VirtualMachine.IDSizes` command.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let default = Self::default();
        let mut r = WireReader::new(data, &default);

        let mut size = || -> Result<u8, ProtocolError> {
            let size = r.i32()?;

            match u8::try_from(size) {
                Ok(s @ 1..=8) => Ok(s),
                _ => Err(ProtocolError::BadIdSize(size)),
            }
        };

        Ok(Self {
            field: size()?,
            method: size()?,
            object: size()?,
            reference_type: size()?,
            frame: size()?,
        })
    }
}

/// Executable location within a method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub class: u64,
    pub method: u64,
    pub index: u64,
}

/// Value tagged with its type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Void,
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Object { tag: u8, id: u64 },
}

/// Reader of the big-endian JDWP data types.
pub struct WireReader<'a> {
    buf: &'a [u8],
    sizes: &'a IdSizes,
}

impl<'a> WireReader<'a> {
    pub const fn new(buf: &'a [u8], sizes: &'a IdSizes) -> Self {
        Self { buf, sizes }
    }

    pub fn u8(&mut self) -> Result<u8, ProtocolError> {
        self.buf.read_u8().map_err(truncated)
    }

    pub fn bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.u8()? != 0)
    }

    pub fn i32(&mut self) -> Result<i32, ProtocolError> {
        self.buf.read_i32::<BigEndian>().map_err(truncated)
    }

    pub fn u64(&mut self) -> Result<u64, ProtocolError> {
        self.buf.read_u64::<BigEndian>().map_err(truncated)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn string(&mut self) -> Result<String, ProtocolError> {
        let len = self.i32()?;
        let len = usize::try_from(len).map_err(|_| ProtocolError::Truncated)?;

        if self.buf.len() < len {
            return Err(ProtocolError::Truncated);
        }

        let (bytes, rest) = self.buf.split_at(len);
        self.buf = rest;

        Ok(String::from_utf8(bytes.to_vec())?)
    }

    fn id(&mut self, size: u8) -> Result<u64, ProtocolError> {
        self.buf
            .read_uint::<BigEndian>(size.into())
            .map_err(truncated)
    }

    pub fn object_id(&mut self) -> Result<u64, ProtocolError> {
        self.id(self.sizes.object)
    }

    pub fn reference_type_id(&mut self) -> Result<u64, ProtocolError> {
        self.id(self.sizes.reference_type)
    }

    pub fn method_id(&mut self) -> Result<u64, ProtocolError> {
        self.id(self.sizes.method)
    }

    pub fn field_id(&mut self) -> Result<u64, ProtocolError> {
        self.id(self.sizes.field)
    }

    pub fn location(&mut self) -> Result<Location, ProtocolError> {
        let _type_tag = self.u8()?;

        Ok(Location {
            class: self.reference_type_id()?,
            method: self.method_id()?,
            index: self.u64()?,
        })
    }

    /// Reads a value preceded by its tag.
    pub fn value(&mut self) -> Result<Value, ProtocolError> {
        let tag = self.u8()?;
        self.untagged_value(tag)
    }

    /// Reads a value whose tag is already known.
    pub fn untagged_value(&mut self, tag: u8) -> Result<Value, ProtocolError> {
        let value = match tag {
            tag::VOID => Value::Void,
            tag::BOOLEAN => Value::Boolean(self.bool()?),
            tag::BYTE => Value::Byte(self.buf.read_i8().map_err(truncated)?),
            tag::CHAR => Value::Char(self.buf.read_u16::<BigEndian>().map_err(truncated)?),
            tag::SHORT => Value::Short(self.buf.read_i16::<BigEndian>().map_err(truncated)?),
            tag::INT => Value::Int(self.i32()?),
            tag::LONG => Value::Long(self.buf.read_i64::<BigEndian>().map_err(truncated)?),
            tag::FLOAT => Value::Float(self.buf.read_f32::<BigEndian>().map_err(truncated)?),
            tag::DOUBLE => Value::Double(self.buf.read_f64::<BigEndian>().map_err(truncated)?),
            tag::OBJECT
            | tag::ARRAY
            | tag::STRING
            | tag::THREAD
            | tag::THREAD_GROUP
            | tag::CLASS_LOADER
            | tag::CLASS_OBJECT => Value::Object {
                tag,
                id: self.object_id()?,
            },
            other => return Err(ProtocolError::UnknownTag(other)),
        };

        Ok(value)
    }
}

fn truncated(_: io::Error) -> ProtocolError {
    ProtocolError::Truncated
}

/// Writer of the big-endian JDWP data types.
pub struct WireWriter<'a> {
    buf: Vec<u8>,
    sizes: &'a IdSizes,
}

impl<'a> WireWriter<'a> {
    pub const fn new(sizes: &'a IdSizes) -> Self {
        Self {
            buf: Vec::new(),
            sizes,
        }
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(value.into())
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn string(&mut self, value: &str) -> &mut Self {
        self.i32(value.len() as i32);
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    fn id(&mut self, size: u8, value: u64) -> &mut Self {
        // sizes are checked to be within 1..=8
        let bytes = value.to_be_bytes();
        self.buf.extend_from_slice(&bytes[bytes.len() - usize::from(size)..]);
        self
    }

    pub fn object_id(&mut self, value: u64) -> &mut Self {
        self.id(self.sizes.object, value)
    }

    pub fn reference_type_id(&mut self, value: u64) -> &mut Self {
        self.id(self.sizes.reference_type, value)
    }

    pub fn method_id(&mut self, value: u64) -> &mut Self {
        self.id(self.sizes.method, value)
    }

    pub fn field_id(&mut self, value: u64) -> &mut Self {
        self.id(self.sizes.field, value)
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::{IdSizes, Location, Value, WireReader, WireWriter};
    use crate::protocol::ProtocolError;

    #[test]
    fn id_sizes_reply() {
        let data = [0, 0, 0, 8, 0, 0, 0, 8, 0, 0, 0, 4, 0, 0, 0, 8, 0, 0, 0, 8];

        let sizes = IdSizes::decode(&data).expect("id sizes");
        assert_eq!(sizes.object, 4);
        assert_eq!(sizes.method, 8);

        let bad = [0, 0, 0, 9, 0, 0, 0, 8, 0, 0, 0, 4, 0, 0, 0, 8, 0, 0, 0, 8];
        assert!(matches!(IdSizes::decode(&bad), Err(ProtocolError::BadIdSize(9))));
    }

    #[test]
    fn read_narrow_ids() {
        let sizes = IdSizes {
            object: 4,
            ..IdSizes::default()
        };

        let data = [0, 0, 0, 5, b's', 0, 0, 0, 9];
        let mut r = WireReader::new(&data, &sizes);

        assert_eq!(r.object_id().expect("object id"), 5);
        assert_eq!(r.value().expect("value"), Value::Object { tag: b's', id: 9 });
    }

    #[test]
    fn read_location() {
        let sizes = IdSizes::default();
        let mut data = vec![1];
        data.extend_from_slice(&2u64.to_be_bytes());
        data.extend_from_slice(&3u64.to_be_bytes());
        data.extend_from_slice(&4u64.to_be_bytes());

        let location = WireReader::new(&data, &sizes).location().expect("location");
        assert_eq!(
            location,
            Location {
                class: 2,
                method: 3,
                index: 4
            }
        );
    }

    #[test]
    fn read_primitive_values() {
        let sizes = IdSizes::default();
        let data = [b'Z', 1, b'I', 0xff, 0xff, 0xff, 0xfe, b'C', 0, b'x', b'V'];
        let mut r = WireReader::new(&data, &sizes);

        assert_eq!(r.value().expect("value"), Value::Boolean(true));
        assert_eq!(r.value().expect("value"), Value::Int(-2));
        assert_eq!(r.value().expect("value"), Value::Char(u16::from(b'x')));
        assert_eq!(r.value().expect("value"), Value::Void);
    }

    #[test]
    fn read_errors() {
        let sizes = IdSizes::default();

        assert!(matches!(
            WireReader::new(&[b'?'], &sizes).value(),
            Err(ProtocolError::UnknownTag(b'?'))
        ));
        assert!(matches!(
            WireReader::new(&[0, 0, 0, 4, b'a'], &sizes).string(),
            Err(ProtocolError::Truncated)
        ));
    }

    #[test]
    fn write_string_and_ids() {
        let sizes = IdSizes {
            field: 4,
            ..IdSizes::default()
        };

        let data = WireWriter::new(&sizes).string("ab").field_id(7).finish();
        assert_eq!(data, [0, 0, 0, 2, b'a', b'b', 0, 0, 0, 7]);
    }
}
