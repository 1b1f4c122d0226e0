use super::error::{FormatError, ParseErrorKind};
use std::io::BufRead;
use std::str::SplitWhitespace;

/// Line-by-line reader that remembers the 1-based number of the last line read.
pub(crate) struct LineCursor<'a, R: BufRead> {
    reader: &'a mut R,
    line_num: usize,
    buffer: String,
}

impl<'a, R: BufRead> LineCursor<'a, R> {
    pub(crate) fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            line_num: 0,
            buffer: String::new(),
        }
    }

    /// Reads the next line without its trailing newline, paired with its line number.
    ///
    /// Returns `None` at end of file.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, &str)>, FormatError> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_num += 1;
        Ok(Some((
            self.line_num,
            self.buffer.trim_end_matches(['\n', '\r']),
        )))
    }

    /// Reads the next line, treating end of file as an error.
    pub(crate) fn expect_line(
        &mut self,
        expected: &'static str,
    ) -> Result<(usize, &str), FormatError> {
        self.next_line()?
            .ok_or(FormatError::UnexpectedEof { expected })
    }

    /// Reads the next line and wraps it for typed field extraction.
    pub(crate) fn expect_fields(
        &mut self,
        expected: &'static str,
    ) -> Result<Fields<'_>, FormatError> {
        let (line, record) = self.expect_line(expected)?;
        Ok(Fields::new(record, line))
    }
}

/// Pulls typed fields out of a whitespace-split record, reporting the line on failure.
pub(crate) struct Fields<'s> {
    tokens: SplitWhitespace<'s>,
    line: usize,
}

impl<'s> Fields<'s> {
    pub(crate) fn new(record: &'s str, line: usize) -> Self {
        Self {
            tokens: record.split_whitespace(),
            line,
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn next_str(&mut self, field: &'static str) -> Result<&'s str, FormatError> {
        self.tokens
            .next()
            .ok_or_else(|| FormatError::parse(self.line, ParseErrorKind::MissingField { field }))
    }

    pub(crate) fn next_f64(&mut self, field: &'static str) -> Result<f64, FormatError> {
        let value = self.next_str(field)?;
        parse_f64(value, field, self.line)
    }

    pub(crate) fn next_usize(&mut self, field: &'static str) -> Result<usize, FormatError> {
        let value = self.next_str(field)?;
        parse_usize(value, field, self.line)
    }

    pub(crate) fn next_xyz(&mut self, field: &'static str) -> Result<[f64; 3], FormatError> {
        Ok([
            self.next_f64(field)?,
            self.next_f64(field)?,
            self.next_f64(field)?,
        ])
    }

    pub(crate) fn skip(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.tokens.next();
        }
        self
    }
}

pub(crate) fn parse_f64(value: &str, field: &'static str, line: usize) -> Result<f64, FormatError> {
    value.parse().map_err(|_| {
        FormatError::parse(
            line,
            ParseErrorKind::InvalidFloat {
                field,
                value: value.into(),
            },
        )
    })
}

pub(crate) fn parse_usize(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<usize, FormatError> {
    value.parse().map_err(|_| {
        FormatError::parse(
            line,
            ParseErrorKind::InvalidInt {
                field,
                value: value.into(),
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cursor_counts_lines_and_strips_newlines() {
        let mut input = Cursor::new("first\r\nsecond\n");
        let mut cursor = LineCursor::new(&mut input);
        assert_eq!(cursor.next_line().unwrap(), Some((1, "first")));
        assert_eq!(cursor.next_line().unwrap(), Some((2, "second")));
        assert_eq!(cursor.next_line().unwrap(), None);
    }

    #[test]
    fn expect_line_reports_eof() {
        let mut input = Cursor::new("");
        let mut cursor = LineCursor::new(&mut input);
        assert!(matches!(
            cursor.expect_line("a header"),
            Err(FormatError::UnexpectedEof {
                expected: "a header"
            })
        ));
    }

    #[test]
    fn fields_parse_typed_values() {
        let mut fields = Fields::new("atom 1.5 -2 3e-1 7", 4);
        fields.skip(1);
        assert_eq!(fields.next_xyz("position").unwrap(), [1.5, -2.0, 0.3]);
        assert_eq!(fields.next_usize("type").unwrap(), 7);
    }

    #[test]
    fn fields_report_bad_values_with_line() {
        let mut fields = Fields::new("abc", 9);
        match fields.next_f64("energy") {
            Err(FormatError::Parse { line, kind }) => {
                assert_eq!(line, 9);
                assert_eq!(
                    kind,
                    ParseErrorKind::InvalidFloat {
                        field: "energy",
                        value: "abc".into()
                    }
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            fields.next_f64("charge"),
            Err(FormatError::Parse {
                kind: ParseErrorKind::MissingField { field: "charge" },
                ..
            })
        ));
    }
}
