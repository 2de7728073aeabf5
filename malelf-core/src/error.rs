use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Format-specific error codes. OS failures reuse the platform errno instead.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The file exists and is readable but is not a valid ELF image.
    NotElf = 43,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Which family an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed no file name, an empty one, or a bad table index.
    Argument,
    /// The operating system refused to find, open, map or read the file.
    Os,
    /// The content is not an ELF image this loader understands.
    Format,
}

/// Why a byte slice was rejected as an ELF header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("bad ELF magic {found:02x?}")]
    BadMagic { found: Vec<u8> },

    #[error("unrecognized ELF class {0:#x}")]
    UnknownClass(u8),

    #[error("unrecognized ELF data encoding {0:#x}")]
    UnknownEncoding(u8),

    #[error("truncated ELF header: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no file passed to be opened, nor the binary has a file name already set")]
    NoFilename,

    #[error("the file name must not be empty")]
    EmptyFilename,

    #[error("header index {index} out of range (table has {len} entries)")]
    HeaderIndex { index: usize, len: usize },

    #[error("failed to load file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open file '{}': {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoFilename | Error::EmptyFilename | Error::HeaderIndex { .. } => {
                ErrorKind::Argument
            }
            Error::Io { .. } => ErrorKind::Os,
            Error::Format { .. } => ErrorKind::Format,
        }
    }

    /// Numeric code for OS and format failures.
    ///
    /// OS failures carry the raw errno (`ENOENT`, `EACCES`, ...), format failures
    /// carry [`ErrorCode::NotElf`]. Argument misuse has no code.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Io { source, .. } => source.raw_os_error(),
            Error::Format { .. } => Some(ErrorCode::NotElf.as_i32()),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        Error::Format {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
