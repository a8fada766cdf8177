//! Minimal classfile reader.
//!
//! Reads just enough of a classfile to check emitted module descriptors and
//! to locate constant-pool entries for in-place rewriting. It does not verify
//! anything beyond what it needs to decode.

use std::ops::Range;

use thiserror::Error;

use crate::bytes::decode_modified_utf8;
use crate::emitters::module_info::{ATTR_MODULE, ATTR_MODULE_PACKAGES, MAGIC};

#[derive(Debug, Error)]
pub enum ClassParseError {
    #[error("unexpected end of class file")]
    UnexpectedEof,
    #[error("invalid class file magic header")]
    InvalidMagic,
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("invalid modified UTF-8 in constant pool entry {index}")]
    InvalidUtf8 { index: u16 },
    #[error("module-info missing Module attribute")]
    MissingModuleAttribute,
}

/// Contents of a parsed `module-info.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub major_version: u16,
    pub access_flags: u16,
    pub name: String,
    pub flags: u16,
    pub version: Option<String>,
    pub requires: Vec<Requires>,
    /// Exported package paths, '/' separated
    pub exports: Vec<String>,
    /// `ModulePackages` contents, if the attribute is present
    pub packages: Option<Vec<String>>,
    pub attribute_count: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requires {
    pub name: String,
    pub flags: u16,
    pub version: Option<String>,
}

/// Everything up to and including `super_class`.
#[derive(Debug, Clone)]
pub struct ClassHeader {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    /// Offset of `interfaces_count`
    pub body_offset: usize,
}

impl ClassHeader {
    /// Internal name of `this_class`, e.g. `org/example/Foo`.
    pub fn this_class_name(&self) -> Result<&str, ClassParseError> {
        self.constant_pool.class_name(self.this_class)
    }
}

pub fn parse_header(bytes: &[u8]) -> Result<ClassHeader, ClassParseError> {
    let mut reader = ClassReader::new(bytes);
    reader.expect_magic()?;
    let minor_version = reader.read_u2()?;
    let major_version = reader.read_u2()?;
    let constant_pool = ConstantPool::parse(&mut reader)?;
    let access_flags = reader.read_u2()?;
    let this_class = reader.read_u2()?;
    let super_class = reader.read_u2()?;

    Ok(ClassHeader {
        minor_version,
        major_version,
        constant_pool,
        access_flags,
        this_class,
        super_class,
        body_offset: reader.position(),
    })
}

pub fn parse_module_info(bytes: &[u8]) -> Result<ModuleInfo, ClassParseError> {
    let header = parse_header(bytes)?;
    let pool = &header.constant_pool;
    let mut reader = ClassReader::new(bytes);
    reader.skip(header.body_offset)?;

    let interfaces_count = reader.read_u2()?;
    reader.skip(usize::from(interfaces_count) * 2)?;
    let fields = reader.read_u2()?;
    for _ in 0..fields {
        skip_member(&mut reader)?;
    }
    let methods = reader.read_u2()?;
    for _ in 0..methods {
        skip_member(&mut reader)?;
    }

    let attribute_count = reader.read_u2()?;
    let mut module: Option<ModuleInfo> = None;
    let mut packages: Option<Vec<String>> = None;

    for _ in 0..attribute_count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let body = reader.read_slice(length)?;
        let mut sub = ClassReader::new(body);

        match pool.utf8(name_index)? {
            ATTR_MODULE => {
                let name = pool.module_name(sub.read_u2()?)?.to_string();
                let flags = sub.read_u2()?;
                let version = pool.optional_utf8(sub.read_u2()?)?;

                let requires_count = sub.read_u2()?;
                let mut requires = Vec::with_capacity(usize::from(requires_count));
                for _ in 0..requires_count {
                    let name = pool.module_name(sub.read_u2()?)?.to_string();
                    let flags = sub.read_u2()?;
                    let version = pool.optional_utf8(sub.read_u2()?)?;
                    requires.push(Requires {
                        name,
                        flags,
                        version,
                    });
                }

                let exports_count = sub.read_u2()?;
                let mut exports = Vec::with_capacity(usize::from(exports_count));
                for _ in 0..exports_count {
                    exports.push(pool.package_name(sub.read_u2()?)?.to_string());
                    sub.read_u2()?; // exports_flags
                    let to_count = sub.read_u2()?;
                    sub.skip(usize::from(to_count) * 2)?;
                }

                // opens, uses and provides are not read back

                module = Some(ModuleInfo {
                    major_version: header.major_version,
                    access_flags: header.access_flags,
                    name,
                    flags,
                    version,
                    requires,
                    exports,
                    packages: None,
                    attribute_count,
                });
            }
            ATTR_MODULE_PACKAGES => {
                let count = sub.read_u2()?;
                let mut list = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    list.push(pool.package_name(sub.read_u2()?)?.to_string());
                }
                packages = Some(list);
            }
            _ => {}
        }
    }

    let mut module = module.ok_or(ClassParseError::MissingModuleAttribute)?;
    module.packages = packages;
    Ok(module)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
    Other,
    Unusable,
}

#[derive(Debug, Clone)]
struct Slot {
    constant: Constant,
    /// Byte range of the entry, tag included
    span: Range<usize>,
}

/// Parsed constant pool with the byte span of every entry.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    slots: Vec<Slot>,
}

impl ConstantPool {
    fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassParseError> {
        let count = reader.read_u2()? as usize;
        let mut slots = Vec::with_capacity(count);
        slots.push(Slot {
            constant: Constant::Unusable,
            span: 0..0,
        }); // index 0 unused

        while slots.len() < count {
            let start = reader.position();
            let index = slots.len() as u16;
            let tag = reader.read_u1()?;
            let mut wide = false;
            let constant = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    let value = decode_modified_utf8(bytes)
                        .ok_or(ClassParseError::InvalidUtf8 { index })?;
                    Constant::Utf8(value)
                }
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                19 => Constant::Module {
                    name_index: reader.read_u2()?,
                },
                20 => Constant::Package {
                    name_index: reader.read_u2()?,
                },
                // String, MethodType
                8 | 16 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                // MethodHandle
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                // Integer, Float, refs, NameAndType, Dynamic, InvokeDynamic
                3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // Long, Double take two slots
                5 | 6 => {
                    reader.skip(8)?;
                    wide = true;
                    Constant::Other
                }
                other => return Err(ClassParseError::UnsupportedConstant { tag: other }),
            };

            slots.push(Slot {
                constant,
                span: start..reader.position(),
            });
            if wide {
                slots.push(Slot {
                    constant: Constant::Unusable,
                    span: 0..0,
                });
            }
        }

        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.len() <= 1
    }

    pub fn get(&self, index: u16) -> Result<&Constant, ClassParseError> {
        self.slots
            .get(usize::from(index))
            .map(|slot| &slot.constant)
            .ok_or(ClassParseError::InvalidConstantIndex { index })
    }

    /// Byte range of entry `index` within the classfile, tag included.
    pub fn span(&self, index: u16) -> Result<Range<usize>, ClassParseError> {
        match self.slots.get(usize::from(index)) {
            Some(slot) if !matches!(slot.constant, Constant::Unusable) => Ok(slot.span.clone()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    fn optional_utf8(&self, index: u16) -> Result<Option<String>, ClassParseError> {
        if index == 0 {
            return Ok(None);
        }
        self.utf8(index).map(|s| Some(s.to_string()))
    }

    /// Index of the Utf8 entry a Class entry points at.
    pub fn class_name_index(&self, index: u16) -> Result<u16, ClassParseError> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(*name_index),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    pub fn class_name(&self, index: u16) -> Result<&str, ClassParseError> {
        self.utf8(self.class_name_index(index)?)
    }

    pub fn module_name(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Module { name_index } => self.utf8(*name_index),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    pub fn package_name(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Package { name_index } => self.utf8(*name_index),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }
}

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn expect_magic(&mut self) -> Result<(), ClassParseError> {
        if self.read_u4()? != MAGIC {
            return Err(ClassParseError::InvalidMagic);
        }
        Ok(())
    }

    fn read_u1(&mut self) -> Result<u8, ClassParseError> {
        Ok(self.read_slice(1)?[0])
    }

    fn read_u2(&mut self) -> Result<u16, ClassParseError> {
        let b = self.read_slice(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u4(&mut self) -> Result<u32, ClassParseError> {
        let b = self.read_slice(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassParseError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(ClassParseError::UnexpectedEof)?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassParseError> {
        self.read_slice(len).map(|_| ())
    }
}

fn skip_member(reader: &mut ClassReader<'_>) -> Result<(), ClassParseError> {
    reader.skip(6)?; // access_flags, name_index, descriptor_index
    let attributes_count = reader.read_u2()?;
    for _ in 0..attributes_count {
        reader.read_u2()?; // attribute_name_index
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModuleDescriptor;
    use crate::emitters::module_info::ModuleInfoEmitter;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejects_bad_magic() {
        let err = parse_header(&[0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 53]).unwrap_err();
        assert!(matches!(err, ClassParseError::InvalidMagic));
    }

    #[test]
    fn test_truncated_input() {
        let bytes = ModuleInfoEmitter::default()
            .emit(&ModuleDescriptor::new("m", "1"))
            .unwrap();
        let err = parse_module_info(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, ClassParseError::UnexpectedEof));
    }

    #[test]
    fn test_header_of_emitted_descriptor() {
        let bytes = ModuleInfoEmitter::default()
            .emit(&ModuleDescriptor::new("m", "1"))
            .unwrap();
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.major_version, 53);
        assert_eq!(header.access_flags, 0x8000);
        assert_eq!(header.this_class_name().unwrap(), "module-info");
        assert_eq!(header.super_class, 0);
        assert_eq!(header.constant_pool.len(), 10);
        // #1 Utf8 "module-info" is the first entry after magic, version and count
        assert_eq!(header.constant_pool.span(1).unwrap(), 10..24);
    }

    #[test]
    fn test_wide_constants_take_two_slots() {
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52, 0, 5];
        bytes.extend_from_slice(&[5, 0, 0, 0, 0, 0, 0, 0, 1]); // #1 Long, #2 unusable
        bytes.extend_from_slice(&[1, 0, 1, b'A']); // #3 Utf8
        bytes.extend_from_slice(&[7, 0, 3]); // #4 Class
        bytes.extend_from_slice(&[0, 0x21, 0, 4, 0, 0]);

        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.this_class_name().unwrap(), "A");
        assert!(header.constant_pool.span(2).is_err());
        assert_eq!(header.constant_pool.get(2).unwrap(), &Constant::Unusable);
    }
}
