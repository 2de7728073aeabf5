use crate::error::FormatError;
use crate::header::{Architecture, EhdrField, Endian, Header};
use byteorder::{ByteOrder, ReadBytesExt, BE, LE};
use goblin::elf::header::{
    machine_to_str, EI_ABIVERSION, EI_CLASS, EI_DATA, EI_OSABI, EI_VERSION, ELFMAG, ET_CORE,
    ET_DYN, ET_EXEC, ET_NONE, ET_REL, EV_CURRENT, SELFMAG, SIZEOF_IDENT,
};
use std::io::{self, Cursor};

/// Size in bytes of the ELF file header for the given class.
pub fn ehdr_size(arch: Architecture) -> usize {
    match arch {
        Architecture::Elf32 => goblin::elf32::header::SIZEOF_EHDR,
        Architecture::Elf64 => goblin::elf64::header::SIZEOF_EHDR,
    }
}

/// Returns true when `bytes` starts with `\x7fELF`.
pub fn has_elf_magic(bytes: &[u8]) -> bool {
    bytes.len() >= SELFMAG && &bytes[..SELFMAG] == ELFMAG
}

/// Represents the ELF (Executable and Linkable Format) file header, for either class.
///
/// This corresponds to `Elf32_Ehdr` / `Elf64_Ehdr` from the ELF specification. Address
/// and offset fields of 32-bit objects are widened to `u64`, so both classes share one
/// representation. Every multi-byte field has already been decoded with the byte order
/// declared in `e_ident[EI_DATA]`.
///
/// Reference: [ELF Specification v1.2](https://refspecs.linuxfoundation.org/elf/elf.pdf)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ehdr {
    /// ELF identification bytes (magic number and other information).
    ///
    /// The first 4 bytes are `0x7F`, `'E'`, `'L'`, `'F'`.
    /// Remaining bytes encode class (32/64-bit), endianness, version and OS/ABI.
    pub e_ident: [u8; SIZEOF_IDENT],

    /// Object file type (e.g. relocatable, executable, shared, core).
    pub e_type: u16,

    /// Target architecture (e.g. `EM_X86_64` = 62, `EM_AARCH64` = 183).
    pub e_machine: u16,

    /// Object file version (usually `EV_CURRENT` = 1).
    pub e_version: u32,

    /// Virtual address of the program entry point.
    pub e_entry: u64,

    /// File offset of the program header table.
    pub e_phoff: u64,

    /// File offset of the section header table.
    pub e_shoff: u64,

    /// Processor-specific flags.
    pub e_flags: u32,

    /// Size of this ELF header (52 for ELF32, 64 for ELF64).
    pub e_ehsize: u16,

    /// Size of one entry in the program header table.
    pub e_phentsize: u16,

    /// Number of entries in the program header table.
    pub e_phnum: u16,

    /// Size of one entry in the section header table.
    pub e_shentsize: u16,

    /// Number of entries in the section header table.
    pub e_shnum: u16,

    /// Index of the section header string table.
    pub e_shstrndx: u16,

    arch: Architecture,
    endian: Endian,
}

impl Ehdr {
    /// Validates the identification bytes of `bytes` and decodes the header that follows.
    ///
    /// Only the first [`ehdr_size`] bytes are read; anything after them is ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if !has_elf_magic(bytes) {
            return Err(FormatError::BadMagic {
                found: bytes.iter().take(SELFMAG).copied().collect(),
            });
        }

        if bytes.len() < SIZEOF_IDENT {
            return Err(FormatError::Truncated {
                needed: SIZEOF_IDENT,
                available: bytes.len(),
            });
        }

        let class = bytes[EI_CLASS];
        let arch = Architecture::from_class(class).ok_or(FormatError::UnknownClass(class))?;
        let data = bytes[EI_DATA];
        let endian = Endian::from_data(data).ok_or(FormatError::UnknownEncoding(data))?;

        let needed = ehdr_size(arch);
        if bytes.len() < needed {
            return Err(FormatError::Truncated {
                needed,
                available: bytes.len(),
            });
        }

        let mut cur = Cursor::new(&bytes[..needed]);
        let decoded = match endian {
            Endian::Little => Self::from_reader::<LE, _>(&mut cur, arch, endian),
            Endian::Big => Self::from_reader::<BE, _>(&mut cur, arch, endian),
        };

        decoded.map_err(|_| FormatError::Truncated {
            needed,
            available: bytes.len(),
        })
    }

    fn from_reader<E: ByteOrder, R: io::Read>(
        cur: &mut R,
        arch: Architecture,
        endian: Endian,
    ) -> io::Result<Ehdr> {
        let mut e_ident = [0u8; SIZEOF_IDENT];
        cur.read_exact(&mut e_ident)?;

        let e_type = cur.read_u16::<E>()?;
        let e_machine = cur.read_u16::<E>()?;
        let e_version = cur.read_u32::<E>()?;

        let (e_entry, e_phoff, e_shoff) = match arch {
            Architecture::Elf32 => (
                cur.read_u32::<E>()? as u64,
                cur.read_u32::<E>()? as u64,
                cur.read_u32::<E>()? as u64,
            ),
            Architecture::Elf64 => (
                cur.read_u64::<E>()?,
                cur.read_u64::<E>()?,
                cur.read_u64::<E>()?,
            ),
        };

        Ok(Ehdr {
            e_ident,
            e_type,
            e_machine,
            e_version,
            e_entry,
            e_phoff,
            e_shoff,
            e_flags: cur.read_u32::<E>()?,
            e_ehsize: cur.read_u16::<E>()?,
            e_phentsize: cur.read_u16::<E>()?,
            e_phnum: cur.read_u16::<E>()?,
            e_shentsize: cur.read_u16::<E>()?,
            e_shnum: cur.read_u16::<E>()?,
            e_shstrndx: cur.read_u16::<E>()?,
            arch,
            endian,
        })
    }

    pub fn arch(&self) -> Architecture {
        self.arch
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// `e_ident[EI_VERSION]`, the identification version byte.
    pub fn ident_version(&self) -> u8 {
        self.e_ident[EI_VERSION]
    }

    pub fn osabi(&self) -> u8 {
        self.e_ident[EI_OSABI]
    }

    pub fn abi_version(&self) -> u8 {
        self.e_ident[EI_ABIVERSION]
    }

    pub fn type_field(&self) -> EhdrField {
        let (name, meaning) = match self.e_type {
            ET_NONE => ("ET_NONE", "No file type"),
            ET_REL => ("ET_REL", "Relocatable file"),
            ET_EXEC => ("ET_EXEC", "Executable file"),
            ET_DYN => ("ET_DYN", "Shared object file"),
            ET_CORE => ("ET_CORE", "Core file"),
            0xfe00..=0xfeff => ("ET_LOOS", "Operating system-specific"),
            0xff00..=0xffff => ("ET_LOPROC", "Processor-specific"),
            _ => ("UNKNOWN", "Unknown file type"),
        };

        EhdrField {
            name,
            value: self.e_type as u64,
            meaning,
        }
    }

    pub fn machine_field(&self) -> EhdrField {
        EhdrField {
            name: machine_to_str(self.e_machine),
            value: self.e_machine as u64,
            meaning: "Machine architecture",
        }
    }

    pub fn version_field(&self) -> EhdrField {
        let (name, meaning) = if self.e_version == EV_CURRENT as u32 {
            ("EV_CURRENT", "Current version")
        } else if self.e_version == 0 {
            ("EV_NONE", "Invalid version")
        } else {
            ("UNKNOWN", "Unknown version")
        };

        EhdrField {
            name,
            value: self.e_version as u64,
            meaning,
        }
    }
}

impl Header for Ehdr {
    fn entry_point(&self) -> u64 {
        self.e_entry
    }

    fn machine(&self) -> u16 {
        self.e_machine
    }

    fn is_64(&self) -> bool {
        self.arch == Architecture::Elf64
    }

    fn format_name(&self) -> &'static str {
        "ELF"
    }

    fn is_executable(&self) -> bool {
        self.e_type == ET_EXEC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn ident(class: u8, data: u8) -> Vec<u8> {
        let mut v = vec![0x7f, b'E', b'L', b'F', class, data, 1, 3, 0];
        v.resize(16, 0);
        v
    }

    fn ehdr32_le() -> Vec<u8> {
        let mut v = ident(1, 1);
        v.write_u16::<LE>(ET_EXEC).unwrap();
        v.write_u16::<LE>(3).unwrap();
        v.write_u32::<LE>(1).unwrap();
        v.write_u32::<LE>(0x0804_8000).unwrap();
        v.write_u32::<LE>(52).unwrap();
        v.write_u32::<LE>(0x1000).unwrap();
        v.write_u32::<LE>(0).unwrap();
        for f in [52u16, 32, 9, 40, 30, 29] {
            v.write_u16::<LE>(f).unwrap();
        }
        v
    }

    fn ehdr64_be() -> Vec<u8> {
        let mut v = ident(2, 2);
        v.write_u16::<BE>(ET_DYN).unwrap();
        v.write_u16::<BE>(21).unwrap();
        v.write_u32::<BE>(1).unwrap();
        v.write_u64::<BE>(0x1_0000_0540).unwrap();
        v.write_u64::<BE>(64).unwrap();
        v.write_u64::<BE>(0x2_0000).unwrap();
        v.write_u32::<BE>(0x5).unwrap();
        for f in [64u16, 56, 11, 64, 37, 36] {
            v.write_u16::<BE>(f).unwrap();
        }
        v
    }

    #[test]
    fn parse_elf32_little_endian() {
        let hdr = Ehdr::parse(&ehdr32_le()).unwrap();
        assert_eq!(hdr.arch(), Architecture::Elf32);
        assert_eq!(hdr.endian(), Endian::Little);
        assert_eq!(hdr.e_type, ET_EXEC);
        assert_eq!(hdr.e_machine, 3);
        assert_eq!(hdr.e_entry, 0x0804_8000);
        assert_eq!(hdr.e_phoff, 52);
        assert_eq!(hdr.e_shoff, 0x1000);
        assert_eq!(hdr.e_ehsize, 52);
        assert_eq!(hdr.e_phnum, 9);
        assert_eq!(hdr.e_shnum, 30);
        assert_eq!(hdr.e_shstrndx, 29);
        assert_eq!(hdr.osabi(), 3);
        assert!(hdr.is_executable());
        assert!(!hdr.is_64());
    }

    #[test]
    fn parse_elf64_big_endian() {
        let hdr = Ehdr::parse(&ehdr64_be()).unwrap();
        assert_eq!(hdr.arch(), Architecture::Elf64);
        assert_eq!(hdr.endian(), Endian::Big);
        assert_eq!(hdr.e_machine, 21);
        assert_eq!(hdr.e_entry, 0x1_0000_0540);
        assert_eq!(hdr.e_shoff, 0x2_0000);
        assert_eq!(hdr.e_flags, 5);
        assert_eq!(hdr.e_phentsize, 56);
        assert_eq!(hdr.e_shentsize, 64);
        assert_eq!(hdr.e_shstrndx, 36);
        assert!(hdr.is_64());
        assert_eq!(hdr.type_field().name, "ET_DYN");
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = ehdr32_le();
        bytes.extend_from_slice(&[0xaa; 128]);
        assert_eq!(Ehdr::parse(&bytes).unwrap(), Ehdr::parse(&ehdr32_le()).unwrap());
    }

    #[test]
    fn rejects_bad_magic() {
        let err = Ehdr::parse(b"root:x:0:0:root:/root:/bin/bash\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::BadMagic {
                found: b"root".to_vec()
            }
        );
        assert!(matches!(Ehdr::parse(b""), Err(FormatError::BadMagic { .. })));
        assert!(matches!(Ehdr::parse(b"\x7fEL"), Err(FormatError::BadMagic { .. })));
    }

    #[test]
    fn rejects_unknown_class_and_encoding() {
        let mut bytes = ehdr32_le();
        bytes[EI_CLASS] = 9;
        assert_eq!(Ehdr::parse(&bytes), Err(FormatError::UnknownClass(9)));

        let mut bytes = ehdr32_le();
        bytes[EI_DATA] = 0;
        assert_eq!(Ehdr::parse(&bytes), Err(FormatError::UnknownEncoding(0)));
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = ehdr64_be();
        assert_eq!(
            Ehdr::parse(&bytes[..40]),
            Err(FormatError::Truncated {
                needed: 64,
                available: 40
            })
        );
        assert_eq!(
            Ehdr::parse(&bytes[..10]),
            Err(FormatError::Truncated {
                needed: 16,
                available: 10
            })
        );
    }

    #[test]
    fn descriptive_fields() {
        let hdr = Ehdr::parse(&ehdr32_le()).unwrap();
        let ty = hdr.type_field();
        assert_eq!(ty.name, "ET_EXEC");
        assert_eq!(ty.value, 2);
        assert_eq!(ty.meaning, "Executable file");
        assert_eq!(hdr.version_field().name, "EV_CURRENT");
        assert_eq!(hdr.machine_field().value, 3);
    }
}
