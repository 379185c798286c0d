//! YAML writer for the harvested tree.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::mapping::ToMapping;
use crate::config::OUTPUT_FILE_PREFIX;
use crate::error::Result;
use crate::types::Spectrum;

/// Whether a line opens a block scalar (`key: |-`, `- >` or `key: |2-`).
fn opens_block_scalar(trimmed: &str) -> bool {
    let Some((_, last)) = trimmed.rsplit_once(' ') else {
        return false;
    };
    let mut chars = last.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| c.is_ascii_digit() || c == '-' || c == '+')
}

/// Indent YAML sequences under their parent key.
///
/// serde_yaml_ng places `- ` items at the same indent as the parent key.
/// Each open sequence adds two spaces to the lines inside it:
///
/// ```yaml
/// # Before:          # After:
/// examples:          examples:
/// - Chair              - Chair
/// - Table              - Table
/// ```
///
/// Lines inside block scalars are shifted along with their key but never
/// read as sequence items.
fn indent_yaml_sequences(yaml: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut seq_indents: Vec<usize> = Vec::new();
    let mut block_indent: Option<usize> = None;

    for line in yaml.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            result.push(line.to_string());
            continue;
        }
        let indent = line.len() - trimmed.len();

        if let Some(opened_at) = block_indent {
            if indent > opened_at {
                result.push(format!("{}{line}", " ".repeat(seq_indents.len() * 2)));
                continue;
            }
            block_indent = None;
        }

        while let Some(&seq_indent) = seq_indents.last() {
            if indent < seq_indent || (indent == seq_indent && !trimmed.starts_with("- ")) {
                seq_indents.pop();
            } else {
                break;
            }
        }

        if trimmed.starts_with("- ") && seq_indents.last() != Some(&indent) {
            seq_indents.push(indent);
        }

        result.push(format!("{}{line}", " ".repeat(seq_indents.len() * 2)));

        if opens_block_scalar(trimmed) {
            block_indent = Some(indent);
        }
    }

    result.join("\n")
}

/// Generate the YAML document for a harvested tree.
pub fn generate_yaml(spectrum: &Spectrum) -> Result<String> {
    let yaml_string = serde_yaml_ng::to_string(&spectrum.to_mapping())?;
    let yaml_string = indent_yaml_sequences(&yaml_string);

    let lines: Vec<&str> = yaml_string.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// File name for a harvest made on `date`, e.g. `spectrum-20250101.yaml`.
#[must_use]
pub fn output_file_name(date: NaiveDate) -> String {
    format!("{OUTPUT_FILE_PREFIX}-{}.yaml", date.format("%Y%m%d"))
}

/// Save a harvested tree as a YAML file in `output_dir`.
///
/// Writes to a temp file, syncs it, then renames it into place so a crash
/// never leaves a truncated file behind.
///
/// # Returns
/// Path to the saved file
pub fn save_yaml(spectrum: &Spectrum, output_dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let file_name = output_file_name(date);
    let output_file = output_dir.join(&file_name);
    let temp_file = output_dir.join(format!(".{file_name}.tmp"));

    let content = generate_yaml(spectrum)?;

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;

    Ok(output_file)
}
