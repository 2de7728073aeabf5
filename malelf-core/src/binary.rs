use crate::alloc::{AllocType, ByteSource};
use crate::error::{Error, Result};
use crate::header::{Architecture, Ehdr, EhdrTable, Header};
use crate::options::BinaryOptions;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum State {
    Closed,
    Open(ByteSource),
}

/// An ELF binary on disk, either CLOSED (no bytes held) or OPEN (bytes mapped or
/// loaded, headers parsed).
#[derive(Debug)]
pub struct Binary {
    fname: Option<PathBuf>,
    alloc_type: AllocType,
    arch: Option<Architecture>,
    headers: EhdrTable,
    state: State,
}

impl Default for Binary {
    fn default() -> Self {
        Self::new()
    }
}

impl Binary {
    pub fn new() -> Self {
        Self::with_options(BinaryOptions::default())
    }

    pub fn with_options(options: BinaryOptions) -> Self {
        Self {
            fname: options.fname,
            alloc_type: options.alloc_type,
            arch: options.arch,
            headers: EhdrTable::new(),
            state: State::Closed,
        }
    }

    /// Builds a binary with default options and opens `path` right away.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut bin = Self::with_options(BinaryOptions::new().fname(path.as_ref()));
        bin.open()?;
        Ok(bin)
    }

    /// Opens the file name given at construction.
    pub fn open(&mut self) -> Result<bool> {
        self.open_inner(None)
    }

    /// Opens `fname`, which replaces the stored file name once the open succeeds.
    pub fn open_file<P: AsRef<Path>>(&mut self, fname: P) -> Result<bool> {
        self.open_inner(Some(fname.as_ref()))
    }

    fn open_inner(&mut self, fname: Option<&Path>) -> Result<bool> {
        let path = match fname.or(self.fname.as_deref()) {
            Some(path) => path.to_path_buf(),
            None => return Err(Error::NoFilename),
        };

        if path.as_os_str().is_empty() {
            return Err(Error::EmptyFilename);
        }

        if self.is_open() {
            log::debug!("Closing current binary before reopening");
            self.close();
        }

        let (source, ehdr) = Self::acquire(&path, self.alloc_type)?;
        debug_assert!(!source.is_empty());

        log::info!(
            "Opened {} ({} bytes, {}, {}, {})",
            path.display(),
            source.len(),
            ehdr.arch(),
            ehdr.endian(),
            source.alloc_type()
        );

        self.arch = Some(ehdr.arch());
        self.headers.push(ehdr);
        self.state = State::Open(source);
        self.fname = Some(path);
        Ok(true)
    }

    /// Brings the file into memory and parses its header. Any bytes already mapped or
    /// read are dropped before an error is returned.
    fn acquire(path: &Path, alloc_type: AllocType) -> Result<(ByteSource, Ehdr)> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let meta = file.metadata().map_err(|e| Error::io(path, e))?;

        if meta.is_dir() {
            return Err(Error::io(path, io::Error::from_raw_os_error(libc::EISDIR)));
        }
        if !meta.is_file() {
            return Err(Error::io(path, io::Error::from_raw_os_error(libc::ENODEV)));
        }
        let len = meta.len();

        let source = ByteSource::acquire(&file, alloc_type, len).map_err(|e| Error::io(path, e))?;

        match Ehdr::parse(&source) {
            Ok(ehdr) => Ok((source, ehdr)),
            Err(e) => {
                log::warn!("Rejecting {}: {}", path.display(), e);
                Err(Error::format(path, e))
            }
        }
    }

    /// Releases the bytes and clears the header table. The file name, allocation type
    /// and architecture stay readable. Closing a closed binary is a no-op.
    pub fn close(&mut self) -> bool {
        if let State::Open(source) = std::mem::replace(&mut self.state, State::Closed) {
            log::debug!(
                "Releasing {} bytes ({}) of {}",
                source.len(),
                source.alloc_type(),
                self.fname.as_deref().unwrap_or(Path::new("")).display()
            );
        }
        self.headers.clear();
        true
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    pub fn fname(&self) -> Option<&Path> {
        self.fname.as_deref()
    }

    /// Raw bytes of the whole file, present only while open.
    pub fn mem(&self) -> Option<&[u8]> {
        match &self.state {
            State::Open(source) => Some(&source[..]),
            State::Closed => None,
        }
    }

    pub fn size(&self) -> usize {
        self.mem().map_or(0, <[u8]>::len)
    }

    pub fn alloc_type(&self) -> AllocType {
        self.alloc_type
    }

    pub fn arch(&self) -> Option<Architecture> {
        self.arch
    }

    pub fn headers(&self) -> &EhdrTable {
        &self.headers
    }

    /// The ELF file header, while open.
    pub fn ehdr(&self) -> Option<&Ehdr> {
        self.headers.primary()
    }

    pub fn get_entry_offset(&self) -> Option<u64> {
        self.ehdr().map(|h| h.entry_point())
    }
}
