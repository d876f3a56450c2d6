//! Text parsing for whitespace-delimited linkage tables.

use std::io::BufRead;

use tracing::{debug, instrument};

use super::LinkageRow;
use crate::error::{LinkageError, Result};

const FIELDS_PER_ROW: usize = 4;

#[instrument(name = "linkage.read_rows", level = "debug", err, skip(reader))]
pub(super) fn read_rows<R: BufRead>(reader: R) -> Result<Vec<LinkageRow>> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let text = line.map_err(|source| LinkageError::Read { source })?;
        let content = strip_comment(&text).trim();
        if content.is_empty() {
            continue;
        }
        let fields = parse_fields(content, index + 1)?;
        rows.push(LinkageRow::try_from_fields(rows.len(), fields)?);
    }
    debug!(rows = rows.len(), "parsed linkage rows");
    Ok(rows)
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(head, _)| head)
}

fn parse_fields(content: &str, line: usize) -> Result<[f64; FIELDS_PER_ROW]> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let [left, right, distance, size] = tokens.as_slice() else {
        return Err(LinkageError::FieldCount {
            line,
            found: tokens.len(),
        });
    };
    Ok([
        parse_number(left, line, 1)?,
        parse_number(right, line, 2)?,
        parse_number(distance, line, 3)?,
        parse_number(size, line, 4)?,
    ])
}

fn parse_number(token: &str, line: usize, column: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| LinkageError::InvalidNumber {
            line,
            column,
            token: token.to_owned(),
        })
}
