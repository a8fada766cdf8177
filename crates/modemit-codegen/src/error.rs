use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(
        "capacity exceeded: {requires} requires + {packages} packages > {max} declared entries"
    )]
    CapacityExceeded {
        requires: usize,
        packages: usize,
        max: usize,
    },

    #[error("constant too long: {len} bytes of modified UTF-8 (max 65535)")]
    Utf8TooLong { len: usize },

    #[error("constant pool overflow: more than 65534 entries")]
    ConstantPoolOverflow,

    #[error("attribute too long: {len} bytes")]
    AttributeTooLong { len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
