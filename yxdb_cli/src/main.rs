use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use yxdb_core::field_value::field_codec_for;
use yxdb_core::{FieldValue, YxdbFile};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "yxdb",
    about = "Inspect, dump, and round-trip-check YXDB files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header fields and metadata/block summary statistics
    Inspect {
        /// YXDB file to inspect
        file: PathBuf,
    },
    /// Print the decoded `<MetaInfo>` XML document
    DumpXml {
        /// YXDB file to read
        file: PathBuf,
    },
    /// Decode the block stream and print a hex dump of one Double field value
    ///
    /// Only the Double field codec is implemented; other field types decode
    /// the file but can't yet be interpreted record-by-record.
    CatBlock {
        /// YXDB file
        file: PathBuf,
        /// Byte offset into the decoded block payload to read from
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
    /// Decode then re-encode a file and report whether the bytes match
    RoundtripCheck {
        /// YXDB file
        file: PathBuf,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn load(file: &PathBuf) -> anyhow::Result<YxdbFile> {
    let bytes = fs::read(file).with_context(|| format!("reading {:?}", file))?;
    YxdbFile::decode(&bytes).with_context(|| format!("decoding {:?} as a YXDB file", file))
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_inspect(file: PathBuf) -> anyhow::Result<()> {
    let file_size = fs::metadata(&file)?.len();
    let decoded = load(&file)?;
    let h = &decoded.header;

    println!("=== YXDB File: {:?} ===", file);
    println!();
    println!("  file id              : 0x{:08x}", h.file_id);
    println!("  has spatial index    : {}", h.spatial_index_pos != 0);
    println!("  meta info length     : {} code units", h.meta_info_length);
    println!("  record block index   : offset {}", h.record_block_index_pos);
    println!("  num records          : {}", h.num_records);
    println!("  compression version  : {}", h.compression_version);
    println!("  file on disk         : {}", human_bytes(file_size));
    println!();
    println!("  record infos         : {}", decoded.metadata.record_infos.len());
    for (i, ri) in decoded.metadata.record_infos.iter().enumerate() {
        println!("    [{}] {} fields", i, ri.fields.len());
        for field in &ri.fields {
            println!(
                "        {:<24} {:<14} size={:?} scale={:?}",
                field.name,
                field.field_type.as_str(),
                field.size,
                field.scale
            );
        }
    }
    println!();
    println!("  decoded block bytes  : {}", human_bytes(decoded.blocks.len() as u64));
    println!("  block index entries  : {}", decoded.block_index.len());

    Ok(())
}

fn run_dump_xml(file: PathBuf) -> anyhow::Result<()> {
    let decoded = load(&file)?;
    // Re-render from the decoded structure rather than keeping the raw XML
    // text around, since the codec only retains the parsed form.
    let rerendered = yxdb_core::encode_metadata(&decoded.metadata);
    let units: Vec<u16> = rerendered
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let text = String::from_utf16_lossy(&units);
    print!("{}", text);
    Ok(())
}

fn run_cat_block(file: PathBuf, index: usize) -> anyhow::Result<()> {
    let decoded = load(&file)?;
    if decoded.blocks.is_empty() {
        anyhow::bail!("file has no decoded block payload");
    }

    let field_type = decoded
        .metadata
        .record_infos
        .first()
        .and_then(|ri| ri.fields.first())
        .map(|f| f.field_type)
        .unwrap_or(yxdb_core::FieldType::Unknown);
    let codec = field_codec_for(field_type);

    let slice = decoded
        .blocks
        .get(index..)
        .ok_or_else(|| anyhow::anyhow!("offset {} is past the end of the decoded block payload", index))?;

    match codec.decode(slice) {
        Ok((value, consumed)) => {
            println!("offset {} ({} bytes consumed): {:?}", index, consumed, value);
            if let FieldValue::Double(v) = value {
                println!("  as Double: {:?}", v);
            }
        }
        Err(e) => {
            println!("offset {}: field codec for {:?} could not decode: {}", index, field_type, e);
            let preview = &slice[..slice.len().min(32)];
            print!("  raw bytes:");
            for b in preview {
                print!(" {:02x}", b);
            }
            println!();
        }
    }

    Ok(())
}

fn run_roundtrip_check(file: PathBuf) -> anyhow::Result<()> {
    let original = fs::read(&file).with_context(|| format!("reading {:?}", file))?;
    let t0 = Instant::now();
    let decoded = YxdbFile::decode(&original)?;
    let reencoded = decoded.encode();
    let elapsed = t0.elapsed();

    println!("  original size   : {}", human_bytes(original.len() as u64));
    println!("  re-encoded size : {}", human_bytes(reencoded.len() as u64));
    println!("  elapsed         : {:.3}s", elapsed.as_secs_f64());

    if original == reencoded {
        println!("  result          : byte-identical");
    } else {
        let decoded_again = YxdbFile::decode(&reencoded)?;
        if decoded_again == decoded {
            println!("  result          : semantically identical (bytes differ, e.g. compression choices)");
        } else {
            anyhow::bail!("round trip is NOT semantically identical");
        }
    }

    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { file } => run_inspect(file),
        Commands::DumpXml { file } => run_dump_xml(file),
        Commands::CatBlock { file, index } => run_cat_block(file, index),
        Commands::RoundtripCheck { file } => run_roundtrip_check(file),
    }
}
