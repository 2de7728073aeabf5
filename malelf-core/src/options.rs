use crate::alloc::AllocType;
use crate::header::Architecture;
use std::path::PathBuf;

/// Construction-time settings for a [`Binary`](crate::Binary). Nothing here touches the
/// filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryOptions {
    pub fname: Option<PathBuf>,
    pub alloc_type: AllocType,
    /// Class hint; replaced by the class found in the file once it is opened.
    pub arch: Option<Architecture>,
}

impl BinaryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fname<P: Into<PathBuf>>(mut self, fname: P) -> Self {
        self.fname = Some(fname.into());
        self
    }

    pub fn alloc_type(mut self, alloc_type: AllocType) -> Self {
        self.alloc_type = alloc_type;
        self
    }

    pub fn arch(mut self, arch: Architecture) -> Self {
        self.arch = Some(arch);
        self
    }
}
