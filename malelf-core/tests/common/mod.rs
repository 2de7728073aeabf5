#![allow(dead_code)]

use byteorder::{ByteOrder, WriteBytesExt, BE, LE};
use std::io::Write;
use tempfile::NamedTempFile;

pub const EM_386: u16 = 3;
pub const EM_X86_64: u16 = 62;
pub const EM_PPC: u16 = 20;

/// A minimal ELF file header followed by `padding` bytes of filler.
pub fn elf_image(class: u8, big_endian: bool, machine: u16, padding: usize) -> Vec<u8> {
    let mut v = if big_endian {
        header::<BE>(class, 2, machine)
    } else {
        header::<LE>(class, 1, machine)
    };
    v.extend(std::iter::repeat(0xcc).take(padding));
    v
}

fn header<E: ByteOrder>(class: u8, data: u8, machine: u16) -> Vec<u8> {
    let mut v = vec![0x7f, b'E', b'L', b'F', class, data, 1, 0];
    v.resize(16, 0);
    v.write_u16::<E>(2).unwrap();
    v.write_u16::<E>(machine).unwrap();
    v.write_u32::<E>(1).unwrap();
    if class == 1 {
        v.write_u32::<E>(0x0804_9000).unwrap();
        v.write_u32::<E>(52).unwrap();
        v.write_u32::<E>(0).unwrap();
        v.write_u32::<E>(0).unwrap();
        for f in [52u16, 32, 0, 40, 0, 0] {
            v.write_u16::<E>(f).unwrap();
        }
    } else {
        v.write_u64::<E>(0x40_1000).unwrap();
        v.write_u64::<E>(64).unwrap();
        v.write_u64::<E>(0).unwrap();
        v.write_u32::<E>(0).unwrap();
        for f in [64u16, 56, 0, 64, 0, 0] {
            v.write_u16::<E>(f).unwrap();
        }
    }
    v
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(bytes).unwrap();
    tmp.flush().unwrap();
    tmp
}
