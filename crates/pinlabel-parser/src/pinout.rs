//! Pinout table (CSV) parser.
//!
//! The first line names the columns. One column holds the chip pin each
//! row describes (`GPIO`, `pin` or `name`, otherwise the first column);
//! every other column is a pin function such as `SPI` or `ADC`. A `GPIO` key
//! column is also a function column, since the port name is drawn too:
//!
//! ```text
//! GPIO,SPI,I2C,UART,PWM,ADC
//! GPIO4,,SCL,,PWM2,
//! GPIO18,SCK,,,PWM7,ADC1_CH7
//! ```

use std::collections::HashMap;

use csv::{ReaderBuilder, Trim};
use log::{debug, trace};
use pinlabel_core::pin::PinFunction;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Header names that mark the key column, in order of preference.
const KEY_COLUMNS: &[&str] = &["gpio", "pin", "name"];
/// Key column whose values are drawn as port boxes.
const PORT_COLUMN: &str = "gpio";

/// One data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinoutRow {
    key: String,
    functions: Vec<PinFunction>,
    span: Span,
}

impl PinoutRow {
    /// The chip pin this row describes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// One entry per function column, empty cells included.
    pub fn functions(&self) -> &[PinFunction] {
        &self.functions
    }

    /// Span of the row's line in the CSV source.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// A parsed pinout table.
#[derive(Debug, Clone)]
pub struct PinoutTable {
    key_column: String,
    columns: Vec<String>,
    rows: Vec<PinoutRow>,
}

impl PinoutTable {
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Names of the function columns in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[PinoutRow] {
        &self.rows
    }

    pub fn row(&self, key: &str) -> Option<&PinoutRow> {
        self.rows.iter().find(|r| r.key == key)
    }
}

/// Parses a pinout CSV.
///
/// Fields are trimmed and rows may have fewer or more fields than the
/// header; missing cells read as empty and extra cells are ignored.
///
/// # Errors
///
/// - `E200` for a record the CSV reader rejects
/// - `E201` for a row with an empty key
/// - `E202` for a key that appears twice
/// - `E203` if there is no header or no data row
///
/// # Examples
///
/// ```
/// let table = pinlabel_parser::pinout::parse_pinout("GPIO,SPI\nGPIO5,MOSI\n").unwrap();
/// assert_eq!(table.key_column(), "GPIO");
/// let functions = table.row("GPIO5").unwrap().functions();
/// assert_eq!(functions[0].value(), "GPIO5");
/// assert_eq!(functions[1].value(), "MOSI");
/// ```
pub fn parse_pinout(source: &str) -> Result<PinoutTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| csv_error(source, &err))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(empty_table("pinout table has no header row").into());
    }

    let key_index = KEY_COLUMNS
        .iter()
        .find_map(|key| headers.iter().position(|h| h.eq_ignore_ascii_case(key)))
        .unwrap_or(0);
    let key_is_port = headers[key_index].eq_ignore_ascii_case(PORT_COLUMN);
    let columns: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != key_index || key_is_port)
        .collect();

    let mut collector = DiagnosticCollector::new();
    let mut rows: Vec<PinoutRow> = Vec::new();
    let mut seen: HashMap<String, Span> = HashMap::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                collector.emit(csv_error(source, &err));
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }

        let start = record
            .position()
            .map_or(0, |pos| usize::try_from(pos.byte()).unwrap_or(source.len()));
        let span = line_span(source, start);

        let key = record.get(key_index).unwrap_or_default();
        if key.is_empty() {
            collector.emit(
                Diagnostic::error(format!("row has an empty `{}` value", headers[key_index]))
                    .with_code(ErrorCode::E201)
                    .with_label(span, "in this row"),
            );
            continue;
        }

        if let Some(first) = seen.get(key) {
            collector.emit(
                Diagnostic::error(format!("pin `{key}` is listed more than once"))
                    .with_code(ErrorCode::E202)
                    .with_label(span, "duplicate row")
                    .with_secondary_label(*first, "first listed here"),
            );
            continue;
        }
        seen.insert(key.to_string(), span);

        let functions = columns
            .iter()
            .map(|(index, column)| {
                PinFunction::new(column.as_str(), record.get(*index).unwrap_or_default())
            })
            .collect();

        trace!(key; "Pinout row");
        rows.push(PinoutRow {
            key: key.to_string(),
            functions,
            span,
        });
    }

    if rows.is_empty() && !collector.has_errors() {
        collector.emit(empty_table("pinout table has no data rows"));
    }
    collector.finish()?;

    debug!(
        key_column = headers[key_index].as_str(),
        columns = columns.len(),
        rows = rows.len();
        "Pinout table parsed"
    );
    Ok(PinoutTable {
        key_column: headers[key_index].clone(),
        columns: columns.into_iter().map(|(_, c)| c.clone()).collect(),
        rows,
    })
}

/// Span from `start` to the end of its line, line break excluded.
fn line_span(source: &str, start: usize) -> Span {
    let start = start.min(source.len());
    let end = source[start..]
        .find(['\r', '\n'])
        .map_or(source.len(), |len| start + len);
    Span::new(start..end)
}

fn csv_error(source: &str, err: &csv::Error) -> Diagnostic {
    let diagnostic = Diagnostic::error(format!("malformed pinout table: {err}"))
        .with_code(ErrorCode::E200);
    match err.position() {
        Some(pos) => {
            let start = usize::try_from(pos.byte()).unwrap_or(source.len());
            diagnostic.with_label(line_span(source, start), "in this row")
        }
        None => diagnostic,
    }
}

fn empty_table(message: &str) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::E203)
        .with_help("the first line names the columns, e.g. `GPIO,SPI,I2C,UART,PWM,ADC`")
}
