use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::dsc::info::DscInfo;
use crate::error::DscError;

pub const RECORD_TAG: &str = "<mbatch.dsc.dsc_info.DscInfo>";

const RECORD_LINES: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Truncate,
    Append,
}

pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.8}", v)
    }
}

fn format_list(values: &[f64]) -> String {
    let parts = values.iter().map(|&v| format_value(v)).collect::<Vec<_>>();
    format!("[{}]", parts.join(", "))
}

pub fn write_record<W: Write>(out: &mut W, info: &DscInfo) -> std::io::Result<()> {
    writeln!(out, "{RECORD_TAG}")?;
    writeln!(out, "{}", format_value(info.dsc()))?;
    writeln!(out, "{}", format_value(info.db()))?;
    writeln!(out, "{}", format_value(info.dw()))?;
    writeln!(out, "{}", format_list(info.feature_dsc()))?;
    writeln!(out, "{}", format_list(info.feature_db()))?;
    writeln!(out, "{}", format_list(info.feature_dw()))?;
    Ok(())
}

pub fn write_to_file(info: &DscInfo, path: &Path, mode: WriteMode) -> Result<(), DscError> {
    let file = open_for_write(path, mode)?;
    let mut out = BufWriter::new(file);
    write_record(&mut out, info)?;
    out.flush()?;
    Ok(())
}

pub fn write_all_to_file(infos: &[DscInfo], path: &Path) -> Result<(), DscError> {
    let mut out = BufWriter::new(open_for_write(path, WriteMode::Truncate)?);
    for info in infos {
        write_record(&mut out, info)?;
    }
    out.flush()?;
    Ok(())
}

fn open_for_write(path: &Path, mode: WriteMode) -> std::io::Result<File> {
    match mode {
        WriteMode::Truncate => File::create(path),
        WriteMode::Append => OpenOptions::new().create(true).append(true).open(path),
    }
}

/// Reads the first record of a file; anything after it is ignored.
pub fn read_from_file(path: &Path) -> Result<DscInfo, DscError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = parse_records(reader, Some(1))?;
    records.pop().ok_or_else(|| DscError::Record {
        line: 1,
        message: "file holds no record".to_string(),
    })
}

/// Reads every consecutive record, as produced by repeated appends.
pub fn read_all_from_file(path: &Path) -> Result<Vec<DscInfo>, DscError> {
    let reader = BufReader::new(File::open(path)?);
    parse_records(reader, None)
}

pub fn parse_records<R: BufRead>(reader: R, limit: Option<usize>) -> Result<Vec<DscInfo>, DscError> {
    let mut records = Vec::new();
    let mut block: Vec<String> = Vec::with_capacity(RECORD_LINES);
    let mut block_start = 1usize;
    for (idx, line) in reader.lines().enumerate() {
        if limit.is_some_and(|n| records.len() >= n) {
            break;
        }
        let line = line?;
        if block.is_empty() {
            if line.trim().is_empty() {
                continue;
            }
            block_start = idx + 1;
        }
        block.push(line);
        if block.len() == RECORD_LINES {
            records.push(parse_block(&block, block_start)?);
            block.clear();
        }
    }
    if !block.is_empty() && !limit.is_some_and(|n| records.len() >= n) {
        return Err(DscError::Record {
            line: block_start + block.len(),
            message: format!(
                "record truncated after {} of {RECORD_LINES} lines",
                block.len()
            ),
        });
    }
    Ok(records)
}

fn parse_block(lines: &[String], first_line: usize) -> Result<DscInfo, DscError> {
    if lines[0].trim_end() != RECORD_TAG {
        return Err(DscError::Record {
            line: first_line,
            message: format!("expected tag {RECORD_TAG}, found {:?}", lines[0]),
        });
    }
    let dsc = parse_value(&lines[1], first_line + 1)?;
    let db = parse_value(&lines[2], first_line + 2)?;
    let dw = parse_value(&lines[3], first_line + 3)?;
    let feature_dsc = parse_list(&lines[4], first_line + 4)?;
    let feature_db = parse_list(&lines[5], first_line + 5)?;
    let feature_dw = parse_list(&lines[6], first_line + 6)?;
    Ok(DscInfo::new(dsc, db, dw, feature_dsc, feature_db, feature_dw))
}

pub fn parse_value(text: &str, line: usize) -> Result<f64, DscError> {
    let t = text.trim();
    match t.to_ascii_lowercase().as_str() {
        "nan" => return Ok(f64::NAN),
        "inf" | "infinity" => return Ok(f64::INFINITY),
        "-inf" | "-infinity" => return Ok(f64::NEG_INFINITY),
        _ => {}
    }
    t.parse::<f64>().map_err(|e| DscError::Record {
        line,
        message: format!("invalid number {t:?}: {e}"),
    })
}

fn parse_list(text: &str, line: usize) -> Result<Vec<f64>, DscError> {
    let t = text.trim();
    let inner = t
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| DscError::Record {
            line,
            message: format!("expected bracketed list, found {t:?}"),
        })?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner.split(',').map(|part| parse_value(part, line)).collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/dsc/record.rs"]
mod tests;
