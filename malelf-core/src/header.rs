pub mod elf;
pub mod table;

use std::fmt;

use goblin::elf::header::{ELFCLASS32, ELFCLASS64, ELFDATA2LSB, ELFDATA2MSB};

pub use elf::Ehdr;
pub use table::EhdrTable;

pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns the virtual address of the entry point.
    fn entry_point(&self) -> u64;

    /// Returns the machine architecture identifier.
    fn machine(&self) -> u16;

    /// Returns true if this is a 64-bit binary.
    fn is_64(&self) -> bool;

    /// Returns a short human-readable name, e.g. "ELF".
    fn format_name(&self) -> &'static str;

    /// Returns true if the binary represents an executable (vs object/lib).
    fn is_executable(&self) -> bool;
}

/// ELF class, taken from the `EI_CLASS` identification byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    Elf32,
    Elf64,
}

impl Architecture {
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            ELFCLASS32 => Some(Architecture::Elf32),
            ELFCLASS64 => Some(Architecture::Elf64),
            _ => None,
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Architecture::Elf32 => ELFCLASS32,
            Architecture::Elf64 => ELFCLASS64,
        }
    }
}

impl std::str::FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elf32" | "32" => Ok(Architecture::Elf32),
            "elf64" | "64" => Ok(Architecture::Elf64),
            _ => Err(format!("Unknown architecture: {}", s)),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Architecture::Elf32 => "ELF32",
            Architecture::Elf64 => "ELF64",
        };
        write!(f, "{}", name)
    }
}

/// Byte order declared by `EI_DATA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn from_data(data: u8) -> Option<Self> {
        match data {
            ELFDATA2LSB => Some(Endian::Little),
            ELFDATA2MSB => Some(Endian::Big),
            _ => None,
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => write!(f, "little endian"),
            Endian::Big => write!(f, "big endian"),
        }
    }
}

/// A decoded header field together with its symbolic name and meaning,
/// e.g. `ET_EXEC` / `2` / "Executable file".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EhdrField {
    pub name: &'static str,
    pub value: u64,
    pub meaning: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_byte_maps_to_architecture() {
        assert_eq!(Architecture::from_class(1), Some(Architecture::Elf32));
        assert_eq!(Architecture::from_class(2), Some(Architecture::Elf64));
        assert_eq!(Architecture::from_class(0), None);
        assert_eq!(Architecture::from_class(3), None);
        assert_eq!(Architecture::Elf64.class(), 2);
    }

    #[test]
    fn architecture_parses_from_cli_spelling() {
        assert_eq!("ELF32".parse::<Architecture>(), Ok(Architecture::Elf32));
        assert_eq!("64".parse::<Architecture>(), Ok(Architecture::Elf64));
        assert!("pe".parse::<Architecture>().is_err());
    }
}
