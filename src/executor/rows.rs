//! Physical row reader
//!
//! Splits a stream into rows and keeps its own physical line counter, so a
//! row's line number does not depend on line-ending style:
//! - `\n` and `\r\n` both end a line
//! - A blank line is a row with one empty cell
//! - A quoted cell may span lines; the row takes the line it starts on and
//!   the counter still advances past every line it covers
//!
//! Cells are split by the `csv` parser, one row at a time.

use std::io::{BufRead, BufReader, Read};

use crate::schema::trim_quotes;

use super::errors::{ExecutorError, ExecutorResult};

/// Reads delimited rows from a stream, one at a time
pub(crate) struct RowReader<R> {
    input: BufReader<R>,
    parser: csv::ReaderBuilder,
    /// Index of the next physical line to read (first line = 0)
    next_line: u64,
    line_buf: Vec<u8>,
    row_buf: Vec<u8>,
    raw: csv::ByteRecord,
}

impl<R: Read> RowReader<R> {
    pub(crate) fn new(stream: R, delimiter: u8) -> Self {
        let mut parser = csv::ReaderBuilder::new();
        parser
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .buffer_capacity(1024);

        Self {
            input: BufReader::new(stream),
            parser,
            next_line: 0,
            line_buf: Vec::new(),
            row_buf: Vec::new(),
            raw: csv::ByteRecord::new(),
        }
    }

    /// Physical lines consumed so far
    pub(crate) fn lines_read(&self) -> u64 {
        self.next_line
    }

    /// Reads the next row into `cells`, quote-trimmed, and returns the
    /// physical line it starts on. Returns `None` at end of stream.
    pub(crate) fn next_row(&mut self, cells: &mut Vec<String>) -> ExecutorResult<Option<u64>> {
        let line = self.next_line;
        self.row_buf.clear();

        let mut first = true;
        loop {
            self.line_buf.clear();
            let n = self
                .input
                .read_until(b'\n', &mut self.line_buf)
                .map_err(|e| ExecutorError::read_failed(self.next_line, e))?;

            if n == 0 {
                if first {
                    return Ok(None);
                }
                // Unterminated quote at end of stream
                break;
            }

            self.next_line += 1;
            if !first {
                self.row_buf.push(b'\n');
            }
            first = false;
            self.row_buf.extend_from_slice(strip_line_end(&self.line_buf));

            if !has_open_quote(&self.row_buf) {
                break;
            }
        }

        cells.clear();
        if self.row_buf.is_empty() {
            cells.push(String::new());
            return Ok(Some(line));
        }

        let mut parser = self.parser.from_reader(self.row_buf.as_slice());
        let found = parser
            .read_byte_record(&mut self.raw)
            .map_err(|e| ExecutorError::read_failed(line, e.into()))?;

        if found {
            cells.extend(
                self.raw
                    .iter()
                    .map(|cell| trim_quotes(&String::from_utf8_lossy(cell)).to_string()),
            );
        } else {
            cells.push(String::new());
        }

        Ok(Some(line))
    }
}

fn strip_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// An odd number of `"` means a quoted cell continues on the next line
fn has_open_quote(row: &[u8]) -> bool {
    row.iter().filter(|&&b| b == b'"').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(data: &str) -> Vec<(u64, Vec<String>)> {
        let mut reader = RowReader::new(data.as_bytes(), b';');
        let mut cells = Vec::new();
        let mut rows = Vec::new();
        while let Some(line) = reader.next_row(&mut cells).unwrap() {
            rows.push((line, cells.clone()));
        }
        rows
    }

    fn lines(rows: &[(u64, Vec<String>)]) -> Vec<u64> {
        rows.iter().map(|(line, _)| *line).collect()
    }

    #[test]
    fn test_lf_and_crlf_number_the_same() {
        let lf = read_all("h\n1;x\n2;y\n");
        let crlf = read_all("h\r\n1;x\r\n2;y\r\n");
        assert_eq!(lf, crlf);
        assert_eq!(lines(&crlf), vec![0, 1, 2]);
        assert_eq!(crlf[2].1, vec!["2", "y"]);
    }

    #[test]
    fn test_blank_line_is_one_empty_cell() {
        let rows = read_all("h\n1\n\n3\n");
        assert_eq!(lines(&rows), vec![0, 1, 2, 3]);
        assert_eq!(rows[2].1, vec![String::new()]);
    }

    #[test]
    fn test_blank_crlf_line() {
        let rows = read_all("h\r\n\r\n2\r\n");
        assert_eq!(lines(&rows), vec![0, 1, 2]);
        assert_eq!(rows[1].1, vec![String::new()]);
    }

    #[test]
    fn test_missing_final_newline() {
        let rows = read_all("h\n1;a");
        assert_eq!(lines(&rows), vec![0, 1]);
        assert_eq!(rows[1].1, vec!["1", "a"]);
    }

    #[test]
    fn test_quoted_cell_spanning_lines() {
        let mut reader = RowReader::new("h\n\"two\nlines\";x\n3;y\n".as_bytes(), b';');
        let mut cells = Vec::new();

        assert_eq!(reader.next_row(&mut cells).unwrap(), Some(0));
        assert_eq!(reader.next_row(&mut cells).unwrap(), Some(1));
        assert_eq!(cells, vec!["two\nlines", "x"]);
        assert_eq!(reader.next_row(&mut cells).unwrap(), Some(3));
        assert_eq!(reader.next_row(&mut cells).unwrap(), None);
        assert_eq!(reader.lines_read(), 4);
    }

    #[test]
    fn test_quoted_delimiter_and_trimming() {
        let rows = read_all("\"a;b\";'c'\n");
        assert_eq!(rows[0].1, vec!["a;b", "c"]);
    }
}
