//! Human-readable and JSON renderings of a [`TiffDocument`].
//!
//! The text layout is an indented tree:
//!
//! ```text
//! Header: 49 49 2a 00 08 00 00 00
//!   ByteOrder: II (LittleEndian)
//!   Version: 42 (Classic Tiff)
//!   IFD0Offset: 8
//! IFD Image(64x32)
//!   EntriesCount: 2
//!   DE ImageWidth: Type=SHORT, Count=1, Values=64
//!   DE ImageLength: Type=SHORT, Count=1, Values=32
//!   NextIFDOffset: 0
//! ```

use std::io::{self, Write};

use crate::format::tiff::{IfdEntry, IfdRef, TiffDocument};

const INDENT: &str = "  ";

/// Sub-IFDs nested deeper than this are printed at this depth.
const MAX_INDENT_DEPTH: usize = 16;

/// Write the text tree for `document`.
///
/// At most `max_values` values are printed per entry.
pub fn write_text<W: Write>(
    out: &mut W,
    document: &TiffDocument,
    max_values: usize,
) -> io::Result<()> {
    let header = document.header();
    writeln!(out, "Header: {}", hex_spaced(document.header_bytes()))?;
    writeln!(
        out,
        "{INDENT}ByteOrder: {} ({})",
        header.byte_order.magic(),
        header.byte_order.name()
    )?;
    writeln!(
        out,
        "{INDENT}Version: {} ({})",
        document.version(),
        if document.is_bigtiff() {
            "BigTiff"
        } else {
            "Classic Tiff"
        }
    )?;
    writeln!(out, "{INDENT}IFD0Offset: {}", document.ifd0_offset())?;

    for ifd in document.ifds() {
        write_ifd(out, ifd, 0, max_values)?;
    }
    Ok(())
}

/// Write `document` as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, document: &TiffDocument) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, document)?;
    writeln!(out)
}

fn write_ifd<W: Write>(
    out: &mut W,
    ifd: IfdRef<'_>,
    depth: usize,
    max_values: usize,
) -> io::Result<()> {
    let pad = INDENT.repeat(depth.min(MAX_INDENT_DEPTH));
    match ifd.dimensions() {
        Some((width, height)) => writeln!(out, "{pad}IFD Image({width}x{height})")?,
        None => writeln!(out, "{pad}IFD")?,
    }
    writeln!(out, "{pad}{INDENT}EntriesCount: {}", ifd.entry_count())?;

    for entry in ifd.entries() {
        writeln!(out, "{pad}{INDENT}{}", entry_line(entry, max_values))?;
    }
    for sub_ifd in ifd.sub_ifds() {
        write_ifd(out, sub_ifd, depth + 1, max_values)?;
    }

    writeln!(out, "{pad}{INDENT}NextIFDOffset: {}", ifd.next_ifd_offset())
}

/// One-line summary of an entry.
pub fn entry_line(entry: &IfdEntry, max_values: usize) -> String {
    let values = entry.display_values();
    let mut shown = values
        .iter()
        .take(max_values)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    if values.len() > max_values {
        shown.push_str(&format!(" ... (+{} more)", values.len() - max_values));
    }

    let names = entry.value_names();
    if !names.is_empty() {
        shown.push_str(&format!(" ({})", names.join(", ")));
    }

    format!(
        "DE {}: Type={}, Count={}, Values={}",
        entry.tag_name(),
        entry.type_name(),
        entry.count,
        shown
    )
}

fn hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
