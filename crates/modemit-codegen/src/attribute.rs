use std::ops::{Deref, DerefMut};

use crate::bytes::ByteWriter;
use crate::error::CodegenError;

/// Buffers an attribute body so `attribute_length` is taken from the bytes
/// actually written.
#[derive(Debug)]
pub struct AttributeBuilder {
    name_index: u16,
    body: ByteWriter,
}

impl AttributeBuilder {
    pub fn new(name_index: u16) -> Self {
        Self {
            name_index,
            body: ByteWriter::new(),
        }
    }

    /// Write `attribute_name_index`, `attribute_length`, and the body to `out`.
    /// Returns the body length.
    pub fn finish(self, out: &mut ByteWriter) -> Result<u32, CodegenError> {
        let len = u32::try_from(self.body.len())
            .map_err(|_| CodegenError::AttributeTooLong { len: self.body.len() })?;
        out.write_u2(self.name_index);
        out.write_u4(len);
        out.write_bytes(self.body.as_slice());
        Ok(len)
    }
}

impl Deref for AttributeBuilder {
    type Target = ByteWriter;

    fn deref(&self) -> &ByteWriter {
        &self.body
    }
}

impl DerefMut for AttributeBuilder {
    fn deref_mut(&mut self) -> &mut ByteWriter {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_prefix_matches_body() {
        let mut attr = AttributeBuilder::new(4);
        attr.write_u2(2);
        attr.write_u2(10);
        attr.write_u2(12);

        let mut out = ByteWriter::new();
        let len = attr.finish(&mut out).unwrap();
        assert_eq!(len, 6);
        assert_eq!(
            out.as_slice(),
            &[0, 4, 0, 0, 0, 6, 0, 2, 0, 10, 0, 12]
        );
    }

    #[test]
    fn test_empty_body() {
        let mut out = ByteWriter::new();
        AttributeBuilder::new(9).finish(&mut out).unwrap();
        assert_eq!(out.as_slice(), &[0, 9, 0, 0, 0, 0]);
    }
}
