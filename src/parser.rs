use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{MaribelError, Result};
use crate::models::{CampaignRecord, DetailRecord};

// ---------------------------------------------------------------------------
// Classification and ordering
// ---------------------------------------------------------------------------

/// Reorder files so campaign files are processed before the detail files
/// that reference them, preserving relative order within each class. A file
/// whose header carries a `type` column is a detail file. Files without a
/// first line contribute nothing and are dropped.
pub fn order_files(paths: &[PathBuf], separator: char) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Err(MaribelError::FileListEmpty);
    }

    let mut campaigns = Vec::new();
    let mut details = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(MaribelError::FileNotFound(path.display().to_string()));
        }
        let Some(header) = read_first_line(path)? else {
            continue;
        };
        if has_type_column(&header, separator) {
            details.push(path.clone());
        } else {
            campaigns.push(path.clone());
        }
    }

    campaigns.extend(details);
    Ok(campaigns)
}

fn read_first_line(path: &Path) -> Result<Option<String>> {
    let file = fs::File::open(path)?;
    let mut line = String::new();
    if BufReader::new(file).read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn has_type_column(header: &str, separator: char) -> bool {
    header.split(separator).any(|col| col.trim().eq_ignore_ascii_case("type"))
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ParsedFile {
    pub campaigns: Vec<CampaignRecord>,
    pub details: Vec<DetailRecord>,
}

/// Parse one file into intermediate records. `display_name` is the
/// caller-supplied name used in error attribution; `path` may be a staging
/// location. Rows in a detail file (header has `type`) become
/// `DetailRecord`s, otherwise `CampaignRecord`s; canonical fields absent
/// from a row default to the empty string.
pub fn parse_file(path: &Path, display_name: &str, separator: char) -> Result<ParsedFile> {
    if !path.exists() {
        return Err(MaribelError::FileNotFound(display_name.to_string()));
    }
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 {
        return Err(MaribelError::EmptyFile(display_name.to_string()));
    }

    let headers: Vec<String> =
        lines[0].split(separator).map(|h| h.trim().to_lowercase()).collect();
    let is_detail = headers.iter().any(|h| h == "type");

    let mut parsed = ParsedFile::default();
    for (index, line) in lines.iter().enumerate().skip(1) {
        let line_no = index + 1;
        let values = split_row(line, separator);
        if values.len() != headers.len() {
            return Err(MaribelError::ColumnCountMismatch {
                file: display_name.to_string(),
                line: line_no,
            });
        }

        let mut row: HashMap<String, String> = HashMap::new();
        for (header, value) in headers.iter().zip(values) {
            if let Some(canonical) = remap_header(header, is_detail) {
                row.insert(canonical, value);
            }
        }

        if is_detail {
            parsed.details.push(DetailRecord {
                campaign_number: take(&mut row, "campaignnumber"),
                title: take(&mut row, "title"),
                kind: take(&mut row, "type"),
                date: take(&mut row, "date"),
                amount: take(&mut row, "amount"),
                source_file: display_name.to_string(),
                line: line_no,
            });
        } else {
            parsed.campaigns.push(CampaignRecord {
                number: take(&mut row, "number"),
                title: take(&mut row, "title"),
                source_file: display_name.to_string(),
                line: line_no,
            });
        }
    }

    Ok(parsed)
}

fn take(row: &mut HashMap<String, String>, key: &str) -> String {
    row.remove(key).unwrap_or_default()
}

/// Canonical name for one lower-cased header. A `table_column` header
/// collapses to its column part, with `code`/`number` becoming the
/// campaign-number field appropriate for the file class; headers with more
/// than two underscore-separated parts contribute nothing; plain names pass
/// through.
fn remap_header(header: &str, is_detail: bool) -> Option<String> {
    if !header.contains('_') {
        return Some(header.to_string());
    }
    let parts: Vec<&str> = header.split('_').collect();
    if parts.len() != 2 {
        return None;
    }
    let column = parts[1];
    if column == "code" || column == "number" {
        if is_detail {
            Some("campaignnumber".to_string())
        } else {
            Some("number".to_string())
        }
    } else {
        Some(column.to_string())
    }
}

/// Split one data row on the separator, ignoring separators inside
/// double-quoted spans. Fields are trimmed; quotes are kept for coercion to
/// strip later.
fn split_row(line: &str, separator: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch == separator && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());
    fields
}
