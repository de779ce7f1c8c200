//! HTTP Range request resolution
//!
//! Single-range `bytes` parsing against the synthetic body length (RFC 7233).

/// Inclusive byte span within `[0, content_length)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: u64,
    pub end: u64,
}

impl ResolvedRange {
    /// Number of bytes in the span
    #[inline]
    pub const fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value, e.g. `bytes 64-127/128`
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Outcome of looking at a request's `Range` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeResolution {
    /// Serve the span with 206
    Satisfiable(ResolvedRange),
    /// Well-formed but outside the body - answered with 416
    Unsatisfiable,
    /// No Range header, ranges disabled, or malformed (serve the full body)
    Absent,
}

/// Resolve a `Range` header value (single range, bytes unit)
///
/// Supported formats:
/// - `bytes=start-` - From start to end of body
/// - `bytes=start-end` - Specific range, end clamped to the body
/// - `bytes=-suffix` - Last suffix bytes
///
/// Multi-range requests and other units are ignored.
///
/// # Examples
/// ```
/// use grabtest::http::range::{resolve_range, RangeResolution, ResolvedRange};
///
/// let result = resolve_range(Some("bytes=64-"), 128, true);
/// assert_eq!(result, RangeResolution::Satisfiable(ResolvedRange { start: 64, end: 127 }));
///
/// // Ranges disabled
/// let result = resolve_range(Some("bytes=64-"), 128, false);
/// assert_eq!(result, RangeResolution::Absent);
/// ```
pub fn resolve_range(
    range_header: Option<&str>,
    content_length: u64,
    accept_ranges: bool,
) -> RangeResolution {
    if !accept_ranges {
        return RangeResolution::Absent;
    }

    let Some(header) = range_header else {
        return RangeResolution::Absent;
    };

    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeResolution::Absent;
    };

    if spec.contains(',') {
        return RangeResolution::Absent;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeResolution::Absent;
    };

    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        return resolve_suffix(end_str, content_length);
    }

    resolve_standard(start_str, end_str, content_length)
}

/// Suffix range, e.g. "-500"
fn resolve_suffix(suffix_str: &str, content_length: u64) -> RangeResolution {
    let Some(suffix) = parse_position(suffix_str) else {
        return RangeResolution::Absent;
    };

    if suffix == 0 || content_length == 0 {
        return RangeResolution::Unsatisfiable;
    }

    // Suffix longer than the body selects all of it
    RangeResolution::Satisfiable(ResolvedRange {
        start: content_length.saturating_sub(suffix),
        end: content_length - 1,
    })
}

/// Standard range, e.g. "0-99" or "100-"
fn resolve_standard(start_str: &str, end_str: &str, content_length: u64) -> RangeResolution {
    let Some(start) = parse_position(start_str) else {
        return RangeResolution::Absent;
    };

    if start >= content_length {
        return RangeResolution::Unsatisfiable;
    }

    let last = content_length - 1;
    let end = if end_str.is_empty() {
        last
    } else {
        let Some(e) = parse_position(end_str) else {
            return RangeResolution::Absent;
        };
        e.min(last)
    };

    if start > end {
        return RangeResolution::Unsatisfiable;
    }

    RangeResolution::Satisfiable(ResolvedRange { start, end })
}

/// Byte position: ASCII digits only (`u64::from_str` would also take a sign)
fn parse_position(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
