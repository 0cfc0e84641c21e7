//! Single-pass field scanner over snapshot text.
//!
//! Kernel metrics text is whitespace- or colon-separated with no quoting or
//! escaping, so a forward-only cursor is enough. Every field is bounded by
//! [`FIELD_MAX_LEN`] unless a caller asks for a different limit.

use crate::error::ParseError;
use std::str::FromStr;

/// Longest accepted numeric field, in bytes.
pub const FIELD_MAX_LEN: usize = 20;

/// Forward-only position within a snapshot's text.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Text not yet consumed.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Returns the text up to the next `delimiter` and moves past it.
    ///
    /// Fails with `FieldMissing(label)` if the delimiter does not occur in
    /// the remaining text.
    pub fn next_delimited_field(
        &mut self,
        delimiter: char,
        label: &'static str,
    ) -> Result<&'a str, ParseError> {
        let rest = self.rest();
        let end = rest.find(delimiter).ok_or(ParseError::FieldMissing(label))?;
        let field = &rest[..end];
        check_len(label, field, FIELD_MAX_LEN)?;
        self.pos += end + delimiter.len_utf8();
        Ok(field)
    }

    /// Returns the next whitespace-separated token.
    ///
    /// Leading whitespace is skipped; the token ends at whitespace or at the
    /// end of the text.
    pub fn next_token(&mut self, label: &'static str) -> Result<&'a str, ParseError> {
        self.next_token_max(label, FIELD_MAX_LEN)
    }

    /// Like [`next_token`](Self::next_token) with a caller-chosen length bound.
    pub fn next_token_max(
        &mut self,
        label: &'static str,
        max: usize,
    ) -> Result<&'a str, ParseError> {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(ParseError::FieldMissing(label));
        }
        let token = &rest[..end];
        check_len(label, token, max)?;
        self.pos += end;
        Ok(token)
    }

    /// Parses the next whitespace-separated token as `T`.
    pub fn next_value<T: FromStr>(&mut self, label: &'static str) -> Result<T, ParseError> {
        let token = self.next_token(label)?;
        parse_field(label, token)
    }

    /// Parses the text up to the next `delimiter` as `T`.
    pub fn next_delimited_value<T: FromStr>(
        &mut self,
        delimiter: char,
        label: &'static str,
    ) -> Result<T, ParseError> {
        let field = self.next_delimited_field(delimiter, label)?;
        parse_field(label, field)
    }

    /// Skips leading whitespace, one token, and the whitespace after it.
    pub fn skip_token(&mut self) {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        self.pos += end;
        self.skip_whitespace();
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        self.pos += rest.len() - trimmed.len();
    }
}

fn check_len(label: &'static str, field: &str, max: usize) -> Result<(), ParseError> {
    if field.len() > max {
        return Err(ParseError::FieldTooLong {
            field: label,
            len: field.len(),
            max,
        });
    }
    Ok(())
}

/// Parses a raw field, reporting the field label on failure.
pub fn parse_field<T: FromStr>(label: &'static str, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidValue {
        field: label,
        value: raw.to_string(),
    })
}
