use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;

/// How the bytes of a binary are brought into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AllocType {
    /// Read-only mapping backed by the page cache.
    #[default]
    Mmap,
    /// The whole file read into an owned heap buffer.
    Malloc,
}

impl std::str::FromStr for AllocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mmap" | "alloc_mmap" => Ok(AllocType::Mmap),
            "malloc" | "alloc_malloc" | "heap" => Ok(AllocType::Malloc),
            _ => Err(format!("Unknown allocation type: {}", s)),
        }
    }
}

impl fmt::Display for AllocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AllocType::Mmap => "mmap",
            AllocType::Malloc => "malloc",
        };
        write!(f, "{}", name)
    }
}

/// The bytes of an open binary. Dropping it unmaps or frees them.
pub(crate) enum ByteSource {
    Mapped(Mmap),
    Heap(Vec<u8>),
}

impl ByteSource {
    pub(crate) fn acquire(file: &File, alloc_type: AllocType, len: u64) -> io::Result<Self> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "file too large to load"))?;

        match alloc_type {
            // An empty file cannot be mapped; the format check rejects it right after.
            AllocType::Mmap if len == 0 => Ok(ByteSource::Heap(Vec::new())),
            AllocType::Mmap => {
                log::debug!("Mapping {} bytes read-only", len);
                // SAFETY: the file must not be truncated or rewritten while the binary is
                // open; a shrinking file turns reads of the mapping into SIGBUS.
                let map = unsafe { Mmap::map(file)? };
                Ok(ByteSource::Mapped(map))
            }
            AllocType::Malloc => {
                // procfs and friends report a zero size but still have content.
                log::debug!("Reading {} bytes into heap buffer", len);
                let mut buf = Vec::with_capacity(len);
                let mut reader = file;
                reader.read_to_end(&mut buf)?;
                Ok(ByteSource::Heap(buf))
            }
        }
    }

    pub(crate) fn alloc_type(&self) -> AllocType {
        match self {
            ByteSource::Mapped(_) => AllocType::Mmap,
            ByteSource::Heap(_) => AllocType::Malloc,
        }
    }
}

impl Deref for ByteSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ByteSource::Mapped(map) => &map[..],
            ByteSource::Heap(buf) => &buf[..],
        }
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSource")
            .field("alloc_type", &self.alloc_type())
            .field("len", &self.len())
            .finish()
    }
}
