//! Line streaming between source files and the bundle
//!
//! A line is a run of bytes ending in `\n`, or the unterminated tail of a file.
//! Bytes are copied untouched, so CRLF endings and non-UTF-8 content survive.

use std::io::{self, BufRead, Write};

/// Lines written versus lines dropped by [`copy_after_header`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub lines_kept: usize,
    pub lines_skipped: usize,
    pub bytes: u64,
}

/// Copies `input` to `output` unmodified. Returns the number of bytes copied.
pub fn copy_verbatim(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<u64> {
    io::copy(input, output)
}

/// Copies `input` to `output`, dropping its first `header_len` lines.
///
/// Input shorter than the header contributes nothing.
pub fn copy_after_header(
    input: &mut impl BufRead,
    output: &mut impl Write,
    header_len: usize,
) -> io::Result<CopyStats> {
    let mut stats = CopyStats::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if stats.lines_skipped < header_len {
            stats.lines_skipped += 1;
            continue;
        }
        output.write_all(&line)?;
        stats.lines_kept += 1;
        stats.bytes += line.len() as u64;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(input: &[u8], header_len: usize) -> (Vec<u8>, CopyStats) {
        let mut output = Vec::new();
        let stats = copy_after_header(&mut &input[..], &mut output, header_len).unwrap();
        (output, stats)
    }

    #[test]
    fn test_header_lines_dropped() {
        let (output, stats) = strip(b"h1\nh2\nbody\nmore\n", 2);
        assert_eq!(output, b"body\nmore\n");
        assert_eq!(stats.lines_kept, 2);
        assert_eq!(stats.lines_skipped, 2);
        assert_eq!(stats.bytes, 10);
    }

    #[test]
    fn test_zero_header_is_verbatim() {
        let (output, stats) = strip(b"a\nb", 0);
        assert_eq!(output, b"a\nb");
        assert_eq!(stats.lines_kept, 2);
    }

    #[test]
    fn test_short_input_contributes_nothing() {
        let (output, stats) = strip(b"only\ntwo\n", 16);
        assert!(output.is_empty());
        assert_eq!(stats.lines_skipped, 2);
        assert_eq!(stats.lines_kept, 0);
    }

    #[test]
    fn test_unterminated_last_line_kept() {
        let (output, _) = strip(b"header\ntail", 1);
        assert_eq!(output, b"tail");
    }

    #[test]
    fn test_crlf_and_binary_bytes_untouched() {
        let (output, _) = strip(b"h\r\n\xff\xfe body\r\n", 1);
        assert_eq!(output, b"\xff\xfe body\r\n");
    }

    #[test]
    fn test_blank_lines_count_toward_header() {
        let (output, _) = strip(b"\n\n\nx\n", 3);
        assert_eq!(output, b"x\n");
    }

    #[test]
    fn test_copy_verbatim() {
        let input = b"A\nB\nC\n";
        let mut output = Vec::new();
        let bytes = copy_verbatim(&mut &input[..], &mut output).unwrap();
        assert_eq!(bytes, 6);
        assert_eq!(output, input);
    }
}
