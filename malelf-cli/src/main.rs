use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use malelf_core::{AllocType, Binary, BinaryOptions, Ehdr, EhdrField, Header};
use serde::Serialize;
use tabled::{Table, Tabled};

/// ELF loader and header inspector
#[derive(Parser)]
#[command(
    name = "malelf",
    about = "Load ELF binaries and inspect their file headers",
    version,
    author
)]
struct Cli {
    /// Path to binary file
    #[arg(required = true)]
    path: std::path::PathBuf,

    /// How to bring the file into memory (mmap or malloc)
    #[arg(long, default_value_t = AllocType::Mmap)]
    alloc: AllocType,

    /// Emit JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show file name, size, class and header count
    Info,
    /// Show every field of the ELF header(s)
    Header,
}

#[derive(Serialize)]
struct InfoView {
    fname: String,
    size: usize,
    arch: String,
    alloc_type: String,
    headers: usize,
}

#[derive(Serialize, Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Meaning")]
    meaning: String,
}

impl FieldRow {
    fn plain(field: &'static str, value: impl ToString, meaning: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
            meaning: meaning.to_string(),
        }
    }

    fn described(field: &'static str, f: EhdrField) -> Self {
        Self {
            field,
            value: format!("{} ({:#x})", f.name, f.value),
            meaning: f.meaning.to_string(),
        }
    }
}

fn header_rows(ehdr: &Ehdr) -> Vec<FieldRow> {
    vec![
        FieldRow::plain("class", ehdr.arch(), "File class"),
        FieldRow::plain("data", ehdr.endian(), "Data encoding"),
        FieldRow::plain("osabi", format!("{:#x}", ehdr.osabi()), "OS/ABI identification"),
        FieldRow::plain("abiversion", ehdr.abi_version(), "ABI version"),
        FieldRow::described("type", ehdr.type_field()),
        FieldRow::described("machine", ehdr.machine_field()),
        FieldRow::described("version", ehdr.version_field()),
        FieldRow::plain("entry", format!("{:#x}", ehdr.entry_point()), "Entry point virtual address"),
        FieldRow::plain("phoff", format!("{:#x}", ehdr.e_phoff), "Program header table file offset"),
        FieldRow::plain("shoff", format!("{:#x}", ehdr.e_shoff), "Section header table file offset"),
        FieldRow::plain("flags", format!("{:#x}", ehdr.e_flags), "Processor-specific flags"),
        FieldRow::plain("ehsize", ehdr.e_ehsize, "ELF header size in bytes"),
        FieldRow::plain("phentsize", ehdr.e_phentsize, "Program header table entry size"),
        FieldRow::plain("phnum", ehdr.e_phnum, "Program header table entry count"),
        FieldRow::plain("shentsize", ehdr.e_shentsize, "Section header table entry size"),
        FieldRow::plain("shnum", ehdr.e_shnum, "Section header table entry count"),
        FieldRow::plain("shstrndx", ehdr.e_shstrndx, "Section header string table index"),
    ]
}

fn load_context(path: &std::path::Path, err: &malelf_core::Error) -> String {
    let code = err
        .code()
        .map_or_else(|| "-".to_string(), |c| c.to_string());
    format!("could not load {} (code {})", path.display(), code)
}

fn open(cli: &Cli) -> Result<Binary> {
    log::debug!("Loading {} via {}", cli.path.display(), cli.alloc);
    let mut bin = Binary::with_options(BinaryOptions::new().alloc_type(cli.alloc));
    if let Err(err) = bin.open_file(&cli.path) {
        let context = load_context(&cli.path, &err);
        return Err(err).context(context);
    }
    Ok(bin)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut bin = open(&cli)?;

    match cli.command {
        Command::Info => {
            let info = InfoView {
                fname: bin
                    .fname()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                size: bin.size(),
                arch: bin.arch().map(|a| a.to_string()).unwrap_or_default(),
                alloc_type: bin.alloc_type().to_string(),
                headers: bin.headers().len(),
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{:<12} {}", "File:".bold(), info.fname);
                println!("{:<12} {}", "Size:".bold(), info.size);
                println!("{:<12} {}", "Class:".bold(), info.arch.green());
                println!("{:<12} {}", "Alloc:".bold(), info.alloc_type);
                println!("{:<12} {}", "Headers:".bold(), info.headers);
            }
        }

        Command::Header => {
            if bin.headers().is_empty() {
                println!("No ELF header found.");
            }
            let tables: Vec<Vec<FieldRow>> = bin.headers().iter().map(header_rows).collect();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                for (i, rows) in tables.into_iter().enumerate() {
                    println!("{}", format!("ELF header #{i}").cyan().bold());
                    println!("{}", Table::new(rows));
                }
            }
        }
    }

    bin.close();
    Ok(())
}
