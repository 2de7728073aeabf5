//! Fixed constant set shared with callers and front ends.

use crate::alloc::AllocType;
use crate::error::ErrorCode;
use crate::header::Architecture;

pub const ALLOC_MMAP: AllocType = AllocType::Mmap;
pub const ALLOC_MALLOC: AllocType = AllocType::Malloc;

pub const ELF32: Architecture = Architecture::Elf32;
pub const ELF64: Architecture = Architecture::Elf64;

/// Error code for readable files that are not ELF images.
pub const NOT_ELF: i32 = ErrorCode::NotElf as i32;

/// `\x7fELF`
pub const MAGIC: &[u8; 4] = b"\x7fELF";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_stable() {
        assert_eq!(NOT_ELF, 43);
        assert_eq!(&MAGIC[..], &goblin::elf::header::ELFMAG[..]);
        assert_eq!(ELF32.class(), 1);
        assert_eq!(ELF64.class(), 2);
        assert_ne!(ALLOC_MMAP, ALLOC_MALLOC);
    }
}
