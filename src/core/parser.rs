//! Positional parser for SIM provisioning batch files.
//!
//! The layout comes from an upstream generator and is addressed purely by
//! line number:
//!
//! ```text
//! 1-6   header      "Quantity: 100"
//! 7     (comment)   "* INPUT VARIABLES"
//! 8-11  variables   "IMSI: 234100000000001"
//! 12    separator   "var_Out: PIN1/IMSI/PUK1/PIN2/PUK2/AAM1/KI_UMTS_ENC/ACC"
//! 13+   records     "1234,234100000000001,12345678,5678,87654321,0A,4F1D...,0001"
//! ```
//!
//! Within the first 12 lines any line containing `*` is skipped and leaves the
//! current section untouched.

use crate::domain::model::{FileData, SimRecord};
use crate::utils::error::{IngestError, Result};
use num_bigint::BigInt;
use std::ops::RangeInclusive;
use std::path::Path;

const SECTION_MARKER: char = '*';
const HEADER_LINES: RangeInclusive<usize> = 1..=6;
const VARIABLE_LINES: RangeInclusive<usize> = 8..=11;
const SEPARATOR_LINE: usize = 12;
const RECORD_FIELDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Variables,
    Records,
}

fn section_for_line(line_no: usize) -> Section {
    if HEADER_LINES.contains(&line_no) {
        Section::Header
    } else if VARIABLE_LINES.contains(&line_no) {
        Section::Variables
    } else {
        // 第 7 行沒有 '*' 時也會落在這裡
        Section::Records
    }
}

/// Reads `path` and parses it. A read failure is reported as [`IngestError::FileRead`].
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD instead of failing
/// the whole file; header lines often carry Latin-1 customer names.
pub async fn parse_file(path: &Path) -> Result<FileData> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    parse(&String::from_utf8_lossy(&bytes))
}

pub fn parse(contents: &str) -> Result<FileData> {
    let mut data = FileData::default();
    let mut section: Option<Section> = None;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line_no <= SEPARATOR_LINE {
            if line.contains(SECTION_MARKER) {
                continue;
            }
            section = Some(section_for_line(line_no));
        }

        match section {
            Some(Section::Header) => parse_header(line, &mut data),
            Some(Section::Variables) => parse_variables(line, &mut data),
            Some(Section::Records) => {
                if line_no == SEPARATOR_LINE {
                    continue;
                }
                let record = parse_record(line, line_no, &mut data)?;
                data.records.push(record);
            }
            None => {}
        }
    }

    if !data.records.is_empty() && parse_decimal(&data.header.starting_imsi).is_none() {
        tracing::warn!(
            "⚠️ Starting IMSI '{}' is not a decimal number, range checks ran against 0",
            data.header.starting_imsi
        );
    }

    tracing::debug!(
        "Parsed {} records (declared quantity {}, starting IMSI '{}')",
        data.records.len(),
        data.header.quantity,
        data.header.starting_imsi
    );

    Ok(data)
}

// "Quantity: 100"
fn parse_header(line: &str, data: &mut FileData) {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != 2 {
        return;
    }

    let key = parts[0].trim();
    let value = parts[1].trim();

    if key == "Quantity" {
        match value.parse::<usize>() {
            Ok(quantity) => data.header.quantity = quantity,
            Err(_) => tracing::warn!("Ignoring non-numeric Quantity value '{}'", value),
        }
    }
}

// "IMSI: 234100000000001"
fn parse_variables(line: &str, data: &mut FileData) {
    if !line.contains("IMSI") {
        return;
    }

    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() == 2 {
        data.header.starting_imsi = parts[1].trim().to_string();
    } else {
        tracing::warn!("Starting IMSI value not found in '{}'", line);
    }
}

fn parse_record(line: &str, line_no: usize, data: &mut FileData) -> Result<SimRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < RECORD_FIELDS {
        return Err(IngestError::Parse {
            line: line_no,
            message: format!(
                "invalid SIM record format: expected {} fields, found {}",
                RECORD_FIELDS,
                fields.len()
            ),
        });
    }

    let imsi = fields[1];
    if !imsi_in_range(&data.header.starting_imsi, imsi, data.header.quantity) {
        tracing::debug!("IMSI {} on line {} is outside the declared range", imsi, line_no);
        data.validation.invalid_imsi_range_count += 1;
    }

    Ok(SimRecord {
        pin1: fields[0].to_string(),
        imsi: imsi.to_string(),
        puk1: fields[2].to_string(),
        pin2: fields[3].to_string(),
        puk2: fields[4].to_string(),
        aam1: fields[5].to_string(),
        ki_umts_enc: fields[6].to_string(),
        acc: fields[7].to_string(),
    })
}

fn parse_decimal(value: &str) -> Option<BigInt> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Checks `imsi ∈ [starting_imsi, starting_imsi + quantity]`.
///
/// IMSIs routinely exceed 64 bits once prefixed, so the comparison is done on
/// big integers. A starting IMSI that does not parse counts as 0; an IMSI that
/// does not parse is never in range.
pub fn imsi_in_range(starting_imsi: &str, imsi: &str, quantity: usize) -> bool {
    let start = parse_decimal(starting_imsi).unwrap_or_default();
    let Some(value) = parse_decimal(imsi) else {
        return false;
    };

    let end = &start + BigInt::from(quantity);
    value >= start && value <= end
}
