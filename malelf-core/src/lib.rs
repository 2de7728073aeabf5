pub mod alloc;
pub mod binary;
pub mod constants;
pub mod error;
pub mod header;
pub mod options;

pub use alloc::AllocType;
pub use binary::*;
pub use error::{Error, ErrorCode, ErrorKind, FormatError, Result};
pub use header::{Architecture, Ehdr, EhdrField, EhdrTable, Endian, Header};
pub use options::BinaryOptions;
