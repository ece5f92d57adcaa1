//! Video service and `Range` header handling.

pub mod range;
pub mod service;

pub use range::{RangeError, RangeWindow, UnsatisfiableRange, parse_range_header};
pub use service::{DownloadRequest, VideoFile, VideoRange, VideoService};
