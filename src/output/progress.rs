//! Timestamped progress lines

use std::io::{self, Write};

use chrono::Local;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// `[2024-01-31 12:00:00.000000]: message`
pub fn timestamped(msg: &str) -> String {
    format!("[{}]: {}", Local::now().format(TIMESTAMP_FORMAT), msg)
}

/// Write a timestamped line; empty messages are skipped
pub fn log_line<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    if msg.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", timestamped(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_shape() {
        let line = timestamped("finished");
        assert!(line.starts_with('['));
        assert!(line.ends_with("]: finished"));
        // [YYYY-MM-DD HH:MM:SS.ffffff]
        assert_eq!(line.find(']'), Some(27));
    }

    #[test]
    fn test_log_line_skips_empty() {
        let mut out = Vec::new();
        log_line(&mut out, "").unwrap();
        assert!(out.is_empty());

        log_line(&mut out, "running:\ndocker ps").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("]: running:\ndocker ps\n"));
    }
}
