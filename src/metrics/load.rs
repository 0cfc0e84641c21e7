//! Load averages and the last allocated PID from /proc/loadavg.

use crate::error::ParseError;
use crate::tokenizer::Cursor;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pseudo-file holding the load averages.
pub const LOADAVG_FILE: &str = "loadavg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    /// 1-minute load average
    pub load1: f64,
    /// 5-minute load average
    pub load5: f64,
    /// 15-minute load average
    pub load15: f64,
    /// Most recently allocated process id
    pub last_pid: u32,
}

/// Parses `load1 load5 load15 running/total last_pid`.
pub fn parse_load_average(content: &str) -> Result<LoadAverage, ParseError> {
    let mut cursor = Cursor::new(content);

    let load1 = cursor.next_delimited_value(' ', "load1")?;
    let load5 = cursor.next_delimited_value(' ', "load5")?;
    let load15 = cursor.next_delimited_value(' ', "load15")?;

    // running/total tasks
    cursor.skip_token();

    let terminator = last_pid_terminator(cursor.rest());
    let last_pid = cursor.next_delimited_value(terminator, "last_pid")?;

    let load = LoadAverage {
        load1,
        load5,
        load15,
        last_pid,
    };
    debug!(load1, load5, load15, last_pid, "load average");

    Ok(load)
}

/// Depending on the kernel, the last PID is either the final item on the line
/// (newline-terminated) or followed by a space.
fn last_pid_terminator(rest: &str) -> char {
    if rest.contains(' ') {
        ' '
    } else {
        '\n'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_average() {
        let load = parse_load_average("0.12 0.34 0.56 2/345 6789\n").unwrap();
        assert_eq!(
            load,
            LoadAverage {
                load1: 0.12,
                load5: 0.34,
                load15: 0.56,
                last_pid: 6789,
            }
        );
    }

    #[test]
    fn test_trailing_space_form_matches() {
        let newline = parse_load_average("0.12 0.34 0.56 2/345 6789\n").unwrap();
        let spaced = parse_load_average("0.12 0.34 0.56 2/345 6789 ").unwrap();
        assert_eq!(newline, spaced);
    }

    #[test]
    fn test_trailing_space_with_more_content() {
        let load = parse_load_average("1.00 2.00 3.00 1/100 42 extra\n").unwrap();
        assert_eq!(load.last_pid, 42);
    }

    #[test]
    fn test_missing_last_pid() {
        let err = parse_load_average("0.12 0.34 0.56 2/345\n").unwrap_err();
        assert_eq!(err, ParseError::FieldMissing("last_pid"));

        // Neither a newline nor a space ends the PID.
        let err = parse_load_average("0.12 0.34 0.56 2/345 6789").unwrap_err();
        assert_eq!(err, ParseError::FieldMissing("last_pid"));
    }

    #[test]
    fn test_missing_load_fields() {
        assert_eq!(
            parse_load_average("").unwrap_err(),
            ParseError::FieldMissing("load1")
        );
        assert_eq!(
            parse_load_average("0.12 0.34\n").unwrap_err(),
            ParseError::FieldMissing("load5")
        );
    }

    #[test]
    fn test_invalid_load_value() {
        let err = parse_load_average("abc 0.34 0.56 2/345 6789\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { field: "load1", .. }));
    }
}
