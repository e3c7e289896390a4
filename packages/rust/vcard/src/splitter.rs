//! Record splitter: groups input lines into `BEGIN:VCARD` … `END:VCARD` blocks.
//!
//! The splitter is a pull-based iterator over a [`BufRead`] source with two
//! states. Outside a record only blank lines are tolerated; anything else is a
//! structure error carrying the offending line number. Once an error has been
//! yielded the iterator is exhausted.

use std::io::{BufRead, Lines};
use std::path::{Path, PathBuf};

use vcf2csv_shared::{Result, Vcf2CsvError};

/// Line prefix opening a record.
pub const BEGIN_MARKER: &str = "BEGIN:VCARD";

/// Line prefix closing a record.
pub const END_MARKER: &str = "END:VCARD";

/// Raw text of one contact record, markers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBlock {
    /// Record lines, each terminated by `\n`.
    pub text: String,
    /// 1-based input line of the `BEGIN:VCARD` marker.
    pub start_line: usize,
}

impl RecordBlock {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Inside,
}

/// Iterator over the record blocks of a vCard stream.
pub struct RecordBlocks<R> {
    lines: Lines<R>,
    source: PathBuf,
    state: State,
    buffer: String,
    line_no: usize,
    start_line: usize,
    finished: bool,
}

impl<R: BufRead> RecordBlocks<R> {
    /// Split records out of `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            source: PathBuf::from("<input>"),
            state: State::Outside,
            buffer: String::new(),
            line_no: 0,
            start_line: 0,
            finished: false,
        }
    }

    /// Name the source in I/O errors.
    pub fn with_source(mut self, path: impl AsRef<Path>) -> Self {
        self.source = path.as_ref().to_path_buf();
        self
    }

    /// Number of input lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    fn advance(&mut self) -> Option<Result<RecordBlock>> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(Vcf2CsvError::io(&self.source, e))),
                None => {
                    return match self.state {
                        State::Outside => None,
                        State::Inside => Some(Err(Vcf2CsvError::structure(
                            self.start_line,
                            "unterminated record: input ended before END:VCARD",
                        ))),
                    };
                }
            };
            self.line_no += 1;

            let line = if self.line_no == 1 {
                line.strip_prefix('\u{feff}').unwrap_or(&line).to_string()
            } else {
                line
            };

            match self.state {
                State::Outside => {
                    if has_marker(&line, BEGIN_MARKER) {
                        self.state = State::Inside;
                        self.start_line = self.line_no;
                        self.push_line(&line);
                    } else if !line.trim().is_empty() {
                        return Some(Err(Vcf2CsvError::structure(
                            self.line_no,
                            "content outside a BEGIN:VCARD/END:VCARD record",
                        )));
                    }
                }
                State::Inside => {
                    if has_marker(&line, BEGIN_MARKER) {
                        return Some(Err(Vcf2CsvError::structure(
                            self.line_no,
                            format!(
                                "BEGIN:VCARD inside the record opened at line {}",
                                self.start_line
                            ),
                        )));
                    }
                    self.push_line(&line);
                    if has_marker(&line, END_MARKER) {
                        self.state = State::Outside;
                        return Some(Ok(RecordBlock {
                            text: std::mem::take(&mut self.buffer),
                            start_line: self.start_line,
                        }));
                    }
                }
            }
        }
    }

    fn push_line(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }
}

impl<R: BufRead> Iterator for RecordBlocks<R> {
    type Item = Result<RecordBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.advance();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

/// Marker names are case-insensitive.
fn has_marker(line: &str, marker: &str) -> bool {
    line.get(..marker.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<Result<RecordBlock>> {
        RecordBlocks::new(input.as_bytes()).collect()
    }

    #[test]
    fn splits_consecutive_records() {
        let input = "BEGIN:VCARD\nVERSION:2.1\nFN:Alice\nEND:VCARD\nBEGIN:VCARD\nFN:Bob\nEND:VCARD\n";
        let blocks: Vec<_> = split(input).into_iter().map(|b| b.unwrap()).collect();

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0].as_str(),
            "BEGIN:VCARD\nVERSION:2.1\nFN:Alice\nEND:VCARD\n"
        );
        assert_eq!(blocks[0].start_line, 1);
        assert_eq!(blocks[1].start_line, 5);
    }

    #[test]
    fn crlf_lines_are_normalized() {
        let input = "BEGIN:VCARD\r\nFN:Alice\r\nEND:VCARD\r\n";
        let blocks: Vec<_> = split(input).into_iter().map(|b| b.unwrap()).collect();
        assert_eq!(blocks[0].as_str(), "BEGIN:VCARD\nFN:Alice\nEND:VCARD\n");
    }

    #[test]
    fn blank_lines_between_records_are_ignored() {
        let input = "\n  \nBEGIN:VCARD\nFN:A\nEND:VCARD\n\n\nBEGIN:VCARD\nFN:B\nEND:VCARD";
        let blocks: Vec<_> = split(input).into_iter().map(|b| b.unwrap()).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start_line, 3);
        assert_eq!(blocks[1].start_line, 8);
    }

    #[test]
    fn lines_read_counts_every_consumed_line() {
        let input = "\nBEGIN:VCARD\nFN:A\nEND:VCARD\n\nBEGIN:VCARD\nFN:B\nEND:VCARD\n";
        let mut blocks = RecordBlocks::new(input.as_bytes());
        assert_eq!(blocks.by_ref().count(), 2);
        assert_eq!(blocks.lines_read(), 8);
    }

    #[test]
    fn leading_bom_is_stripped() {
        let input = "\u{feff}BEGIN:VCARD\nFN:A\nEND:VCARD\n";
        let blocks: Vec<_> = split(input).into_iter().map(|b| b.unwrap()).collect();
        assert!(blocks[0].as_str().starts_with("BEGIN:VCARD\n"));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split("").is_empty());
        assert!(split("\n\n").is_empty());
    }

    #[test]
    fn stray_content_before_record_is_an_error() {
        let results = split("garbage\nBEGIN:VCARD\nFN:A\nEND:VCARD\n");
        assert_eq!(results.len(), 1);
        let err = results.into_iter().next().unwrap().unwrap_err();
        assert!(matches!(err, Vcf2CsvError::Structure { line: 1, .. }));
    }

    #[test]
    fn stray_end_marker_is_an_error() {
        let results = split("BEGIN:VCARD\nFN:A\nEND:VCARD\nEND:VCARD\n");
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(Vcf2CsvError::Structure { line: 4, .. })
        ));
    }

    #[test]
    fn nested_begin_is_an_error() {
        let results = split("BEGIN:VCARD\nFN:A\nBEGIN:VCARD\nEND:VCARD\n");
        assert_eq!(results.len(), 1);
        let err = results.into_iter().next().unwrap().unwrap_err();
        assert!(err.to_string().contains("opened at line 1"));
    }

    #[test]
    fn unterminated_record_is_an_error() {
        let results = split("BEGIN:VCARD\nFN:A\nEND:VCARD\nBEGIN:VCARD\nFN:B\n");
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(Vcf2CsvError::Structure { line: 4, .. })
        ));
    }

    #[test]
    fn markers_match_case_insensitively() {
        let blocks: Vec<_> = split("begin:vcard\nFN:A\nend:vcard\n")
            .into_iter()
            .map(|b| b.unwrap())
            .collect();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn iterator_is_fused_after_error() {
        let mut blocks = RecordBlocks::new("oops\nBEGIN:VCARD\nFN:A\nEND:VCARD\n".as_bytes());
        assert!(blocks.next().unwrap().is_err());
        assert!(blocks.next().is_none());
        assert_eq!(blocks.lines_read(), 1);
    }

    #[test]
    fn invalid_utf8_is_reported_as_io_error() {
        let bytes: &[u8] = b"BEGIN:VCARD\nFN:\xff\xfe\nEND:VCARD\n";
        let mut blocks = RecordBlocks::new(bytes).with_source("contacts.vcf");
        let err = blocks.next().unwrap().unwrap_err();
        match err {
            Vcf2CsvError::Io { path, .. } => assert_eq!(path, PathBuf::from("contacts.vcf")),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
