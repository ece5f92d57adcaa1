//! `Range` header parsing for partial video responses.
//!
//! Only a single `bytes=<start>-<end>` range is understood. When the end is
//! omitted the window is capped at 5% of the file instead of running to EOF,
//! so a client has to issue several requests to read a large file.

use thiserror::Error;

use vidvault_core::error::{AppError, ErrorKind};

/// Share of the file served when the client omits the range end.
const DEFAULT_RANGE_FRACTION: f64 = 0.05;

/// Why a `Range` header could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid range format")]
    InvalidRangeFormat,
    #[error("invalid bytes format")]
    InvalidBytesFormat,
    #[error("invalid range start")]
    InvalidRangeStart,
    #[error("invalid range end")]
    InvalidRangeEnd,
    #[error("invalid range")]
    InvalidRange,
}

impl From<RangeError> for AppError {
    fn from(err: RangeError) -> Self {
        AppError::with_source(
            ErrorKind::RangeNotSatisfiable,
            format!("Invalid range header: {err}"),
            err,
        )
    }
}

/// A [`RangeError`] together with the size of the file it was checked
/// against, so responders can advertise the valid extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{error} for a file of {file_size} bytes")]
pub struct UnsatisfiableRange {
    pub error: RangeError,
    pub file_size: u64,
}

impl From<UnsatisfiableRange> for AppError {
    fn from(err: UnsatisfiableRange) -> Self {
        AppError::with_source(
            ErrorKind::RangeNotSatisfiable,
            format!("Invalid range header: {}", err.error),
            err,
        )
    }
}

/// Inclusive byte window with `start <= end < file_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindow {
    pub start: u64,
    pub end: u64,
}

impl RangeWindow {
    /// Number of bytes in the window.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A window produced by [`parse_range_header`] is never empty.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// `Content-Range` value for a file of `file_size` bytes.
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, file_size)
    }
}

/// Parse a `Range` header value against a file of `file_size` bytes.
pub fn parse_range_header(header: &str, file_size: u64) -> Result<RangeWindow, RangeError> {
    let parts: Vec<&str> = header.split('=').collect();
    if parts.len() != 2 || parts[0] != "bytes" {
        return Err(RangeError::InvalidRangeFormat);
    }

    let bounds: Vec<&str> = parts[1].split('-').collect();
    if bounds.len() != 2 {
        return Err(RangeError::InvalidBytesFormat);
    }

    let start: u64 = bounds[0]
        .parse()
        .map_err(|_| RangeError::InvalidRangeStart)?;

    let end = if bounds[1].is_empty() {
        let last = file_size.checked_sub(1).ok_or(RangeError::InvalidRange)?;
        let window = (last as f64 * DEFAULT_RANGE_FRACTION) as u64;
        last.min(start.saturating_add(window))
    } else {
        let end: u64 = bounds[1].parse().map_err(|_| RangeError::InvalidRangeEnd)?;
        if end >= file_size {
            return Err(RangeError::InvalidRangeEnd);
        }
        end
    };

    if start > end || end >= file_size {
        return Err(RangeError::InvalidRange);
    }

    Ok(RangeWindow { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: u64, end: u64) -> RangeWindow {
        RangeWindow { start, end }
    }

    #[test]
    fn test_explicit_range() {
        assert_eq!(parse_range_header("bytes=0-99", 1000), Ok(window(0, 99)));
        assert_eq!(parse_range_header("bytes=0-999", 1000), Ok(window(0, 999)));
    }

    #[test]
    fn test_open_end_serves_five_percent() {
        assert_eq!(parse_range_header("bytes=500-", 1000), Ok(window(500, 549)));
        assert_eq!(parse_range_header("bytes=0-", 1000), Ok(window(0, 49)));
    }

    #[test]
    fn test_open_end_is_clamped_to_file_size() {
        assert_eq!(parse_range_header("bytes=999-", 1000), Ok(window(999, 999)));
        assert_eq!(parse_range_header("bytes=980-", 1000), Ok(window(980, 999)));
        assert_eq!(parse_range_header("bytes=0-", 1), Ok(window(0, 0)));
    }

    #[test]
    fn test_start_after_end_is_invalid() {
        assert_eq!(
            parse_range_header("bytes=500-200", 1000),
            Err(RangeError::InvalidRange)
        );
    }

    #[test]
    fn test_start_past_file_is_invalid() {
        assert_eq!(
            parse_range_header("bytes=1000-", 1000),
            Err(RangeError::InvalidRange)
        );
        assert_eq!(
            parse_range_header(&format!("bytes={}-", u64::MAX), 1000),
            Err(RangeError::InvalidRange)
        );
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(
            parse_range_header("notbytes=0-10", 1000),
            Err(RangeError::InvalidRangeFormat)
        );
        assert_eq!(parse_range_header("", 1000), Err(RangeError::InvalidRangeFormat));
        assert_eq!(
            parse_range_header("Bytes=0-10", 1000),
            Err(RangeError::InvalidRangeFormat)
        );
        assert_eq!(
            parse_range_header("bytes=0-10=2", 1000),
            Err(RangeError::InvalidRangeFormat)
        );
        assert_eq!(
            parse_range_header("bytes=0-10-20", 1000),
            Err(RangeError::InvalidBytesFormat)
        );
        assert_eq!(
            parse_range_header("bytes=10", 1000),
            Err(RangeError::InvalidBytesFormat)
        );
        assert_eq!(
            parse_range_header("bytes=-500", 1000),
            Err(RangeError::InvalidRangeStart)
        );
        assert_eq!(
            parse_range_header("bytes=abc-10", 1000),
            Err(RangeError::InvalidRangeStart)
        );
    }

    #[test]
    fn test_end_must_be_inside_file() {
        assert_eq!(
            parse_range_header("bytes=0-1000", 1000),
            Err(RangeError::InvalidRangeEnd)
        );
        assert_eq!(
            parse_range_header("bytes=0-x", 1000),
            Err(RangeError::InvalidRangeEnd)
        );
    }

    #[test]
    fn test_empty_file_has_no_satisfiable_range() {
        assert_eq!(parse_range_header("bytes=0-", 0), Err(RangeError::InvalidRange));
        assert_eq!(
            parse_range_header("bytes=0-0", 0),
            Err(RangeError::InvalidRangeEnd)
        );
    }

    #[test]
    fn test_window_helpers() {
        let w = window(500, 549);
        assert_eq!(w.len(), 50);
        assert_eq!(w.content_range(1000), "bytes 500-549/1000");
    }

    #[test]
    fn test_converts_to_range_not_satisfiable() {
        let err: AppError = RangeError::InvalidRangeEnd.into();
        assert_eq!(err.kind, ErrorKind::RangeNotSatisfiable);
        assert!(err.message.contains("invalid range end"));

        let err: AppError = UnsatisfiableRange {
            error: RangeError::InvalidRange,
            file_size: 1000,
        }
        .into();
        assert_eq!(err.kind, ErrorKind::RangeNotSatisfiable);
        let source = err
            .source
            .as_deref()
            .and_then(|s| s.downcast_ref::<UnsatisfiableRange>())
            .unwrap();
        assert_eq!(source.file_size, 1000);
    }
}
