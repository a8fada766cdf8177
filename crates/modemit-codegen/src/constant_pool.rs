use crate::bytes::{encode_modified_utf8, ByteWriter};
use crate::error::CodegenError;

pub const TAG_UTF8: u8 = 1;
pub const TAG_CLASS: u8 = 7;
pub const TAG_MODULE: u8 = 19;
pub const TAG_PACKAGE: u8 = 20;

/// A constant-pool entry the emitters produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Constant {
    pub fn tag(&self) -> u8 {
        match self {
            Constant::Utf8(_) => TAG_UTF8,
            Constant::Class { .. } => TAG_CLASS,
            Constant::Module { .. } => TAG_MODULE,
            Constant::Package { .. } => TAG_PACKAGE,
        }
    }
}

/// Append-only constant pool. Each entry's index is its 1-based append
/// position; index 0 stays reserved. Entries are never deduplicated, so
/// numbering depends only on the order of calls.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, constant: Constant) -> Result<u16, CodegenError> {
        // constant_pool_count is a u2 holding len + 1
        let index = u16::try_from(self.entries.len() + 1)
            .ok()
            .filter(|&i| i < u16::MAX)
            .ok_or(CodegenError::ConstantPoolOverflow)?;
        self.entries.push(constant);
        Ok(index)
    }

    pub fn utf8(&mut self, value: &str) -> Result<u16, CodegenError> {
        let len = encode_modified_utf8(value).len();
        if len > usize::from(u16::MAX) {
            return Err(CodegenError::Utf8TooLong { len });
        }
        self.push(Constant::Utf8(value.to_string()))
    }

    pub fn class(&mut self, name_index: u16) -> Result<u16, CodegenError> {
        self.push(Constant::Class { name_index })
    }

    /// Append a Utf8 holding `name` followed by a Module entry pointing at it.
    pub fn module(&mut self, name: &str) -> Result<u16, CodegenError> {
        let name_index = self.utf8(name)?;
        self.push(Constant::Module { name_index })
    }

    /// Append a Utf8 holding `path` followed by a Package entry pointing at it.
    pub fn package(&mut self, path: &str) -> Result<u16, CodegenError> {
        let name_index = self.utf8(path)?;
        self.push(Constant::Package { name_index })
    }

    /// Value of `constant_pool_count`.
    pub fn count(&self) -> u16 {
        // push() keeps len + 1 within u16
        (self.entries.len() + 1) as u16
    }

    pub fn get(&self, index: u16) -> Option<&Constant> {
        usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write `constant_pool_count` followed by every entry.
    pub fn write_to(&self, out: &mut ByteWriter) -> Result<(), CodegenError> {
        out.write_u2(self.count());
        for constant in &self.entries {
            out.write_u1(constant.tag());
            match constant {
                Constant::Utf8(value) => out.write_utf(value)?,
                Constant::Class { name_index }
                | Constant::Module { name_index }
                | Constant::Package { name_index } => out.write_u2(*name_index),
            }
        }
        Ok(())
    }
}
