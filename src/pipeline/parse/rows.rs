use csv::{ByteRecord, ReaderBuilder};

use crate::error::ParseError;

/// Splits raw file bytes into comma separated rows. There is no header row,
/// and every row must have as many fields as the first one. Fields stay as
/// bytes; decoding is left to the field parser.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<ByteRecord>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(bytes);

    reader
        .byte_records()
        .map(|record| record.map_err(|e| ParseError::Read(e.to_string())))
        .collect()
}
