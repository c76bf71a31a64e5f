//! Result lines and the share inspection table.

use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use console::style;

use crate::types::{Operation, ShareInfo, ShareStatus};

/// Formats bytes into a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Prints the outcome of a split.
pub fn show_split_success(paths: &[PathBuf], required: usize, groups: u64) {
    println!();
    println!(
        "{} {}",
        style("✓").green(),
        style(format!("{} succeeded: {} shares, any {required} rebuild the file ({groups} groups)", Operation::Split, paths.len())).bold()
    );

    for path in paths {
        println!("  {}", style(path.display()).cyan());
    }
}

/// Prints the outcome of a merge.
pub fn show_merge_success(path: &Path, bytes: u64, shares: usize) {
    println!();
    println!(
        "{} {}",
        style("✓").green(),
        style(format!("{} succeeded from {shares} shares: {} ({})", Operation::Merge, path.display(), format_bytes(bytes))).bold()
    );
}

/// Builds the table `inspect` prints.
pub fn share_table(shares: &[ShareInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Share", "Required", "Chunks", "Groups", "KDF", "Compression", "Size"]);

    for info in shares {
        let name = info.path.file_name().map_or_else(|| info.path.display().to_string(), |n| n.to_string_lossy().into_owned());

        match &info.status {
            ShareStatus::Valid { parameters, required_pieces, chunks, groups } => {
                let kdf = parameters.kdf_params();
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(format!("{}/{}", parameters.share_index + 1, parameters.share_count)),
                    Cell::new(required_pieces),
                    Cell::new(chunks),
                    Cell::new(groups),
                    Cell::new(format!("argon2id m={} t={} p={}", kdf.memory, kdf.time, kdf.parallelism)),
                    Cell::new(parameters.compression()),
                    Cell::new(format_bytes(info.size)),
                ]);
            }
            ShareStatus::Malformed(reason) => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(format!("malformed: {reason}")).fg(Color::Red),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format_bytes(info.size)),
                ]);
            }
        }
    }

    table
}

/// Prints the inspection table.
pub fn show_share_info(shares: &[ShareInfo]) {
    if shares.is_empty() {
        println!("{}", style("No shares given").yellow());
        return;
    }

    println!("{}", share_table(shares));
}
