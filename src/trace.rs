//! Reading branch traces.
//!
//! A trace is plain text with one resolved conditional branch per line:
//!
//! ```text
//! <program counter, hex> <outcome>
//! ```
//!
//! The outcome is `1`/`t` for taken and `0`/`n` for not-taken. The program
//! counter may carry a `0x` prefix. Blank lines and lines starting with `#`
//! are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;

use crate::branch::*;
use crate::error::*;

/// Parse a single line of a trace. Returns [None] for lines without a record.
pub fn parse_line(line_no: usize, line: &str) -> TraceResult<Option<BranchRecord>> {
    let text = line.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let (pc, outcome) = match (fields.next(), fields.next(), fields.next()) {
        (Some(pc), Some(outcome), None) => (pc, outcome),
        _ => return Err(TraceError::Malformed {
            line: line_no,
            text: text.to_string(),
        }),
    };

    let digits = pc.strip_prefix("0x")
        .or_else(|| pc.strip_prefix("0X"))
        .unwrap_or(pc);
    let pc = u32::from_str_radix(digits, 16).map_err(|_| {
        TraceError::InvalidPc { line: line_no, text: pc.to_string() }
    })?;

    let outcome = match outcome {
        "1" | "t" | "T" => Outcome::T,
        "0" | "n" | "N" => Outcome::N,
        _ => return Err(TraceError::InvalidOutcome {
            line: line_no,
            text: outcome.to_string(),
        }),
    };
    Ok(Some(BranchRecord::new(pc, outcome)))
}

/// A list of resolved conditional branches, in program order.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    pub name: String,
    pub data: Vec<BranchRecord>,
}
impl Trace {
    pub fn new(name: impl ToString, data: Vec<BranchRecord>) -> Self {
        Self { name: name.to_string(), data }
    }

    /// Read a trace from some reader.
    pub fn from_reader(name: impl ToString, reader: impl BufRead)
        -> TraceResult<Self>
    {
        let mut data = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            if let Some(record) = parse_line(idx + 1, &line?)? {
                data.push(record);
            }
        }
        let res = Self::new(name, data);
        debug!("read {} records from '{}'", res.num_entries(), res.name);
        Ok(res)
    }

    /// Read a trace from a file.
    pub fn from_file(path: impl AsRef<Path>) -> TraceResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| TraceError::Open(path.to_path_buf(), e))?;
        let name = path.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_reader(name, BufReader::new(f))
    }

    /// Return the number of records
    pub fn num_entries(&self) -> usize { self.data.len() }

    pub fn name(&self) -> &str { &self.name }

    /// Return a slice of records.
    pub fn as_slice(&self) -> &[BranchRecord] { &self.data }

    /// Return a truncated slice of records
    pub fn as_slice_trunc(&self, limit: usize) -> &[BranchRecord] {
        &self.data[..self.data.len().min(limit)]
    }
}

/// A set of trace files, read one at a time.
#[derive(Clone, Debug, Default)]
pub struct TraceSet {
    /// A list of filenames
    pub files: Vec<PathBuf>,

    pub cur: usize,
}
impl TraceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_from_slice(paths: &[impl AsRef<Path>]) -> Self {
        Self {
            files: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
            cur: 0,
        }
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        self.files.push(path.as_ref().to_path_buf());
    }
}
impl Iterator for TraceSet {
    type Item = TraceResult<Trace>;
    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.get(self.cur)?;
        self.cur += 1;
        Some(Trace::from_file(path))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_lines() {
        assert_eq!(
            parse_line(1, "3acd0 1").unwrap(),
            Some(BranchRecord::new(0x3acd0, Outcome::T))
        );
        assert_eq!(
            parse_line(1, "  0x40\tn ").unwrap(),
            Some(BranchRecord::new(0x40, Outcome::N))
        );
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(1, "# comment").unwrap(), None);
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        assert!(matches!(
            parse_line(3, "3acd0"),
            Err(TraceError::Malformed { line: 3, .. })
        ));
        assert!(matches!(
            parse_line(4, "3acd0 1 extra"),
            Err(TraceError::Malformed { line: 4, .. })
        ));
        assert!(matches!(
            parse_line(5, "xyz 1"),
            Err(TraceError::InvalidPc { line: 5, .. })
        ));
        assert!(matches!(
            parse_line(6, "1ffffffff 1"),
            Err(TraceError::InvalidPc { line: 6, .. })
        ));
        assert!(matches!(
            parse_line(7, "40 2"),
            Err(TraceError::InvalidOutcome { line: 7, .. })
        ));
    }

    #[test]
    fn read_from_reader() {
        let text = "40 1\n\n44 0\n# skipped\n48 1\n";
        let trace = Trace::from_reader("mem", Cursor::new(text)).unwrap();
        assert_eq!(trace.name(), "mem");
        assert_eq!(trace.num_entries(), 3);
        assert_eq!(trace.as_slice()[1], BranchRecord::new(0x44, Outcome::N));
        assert_eq!(trace.as_slice_trunc(2).len(), 2);
        assert_eq!(trace.as_slice_trunc(100).len(), 3);

        let err = Trace::from_reader("bad", Cursor::new("40 1\n44 x\n")).unwrap_err();
        assert!(matches!(err, TraceError::InvalidOutcome { line: 2, .. }));
    }

    #[test]
    fn missing_file() {
        let mut set = TraceSet::new();
        set.add_file("/nonexistent/trace.txt");
        let res = set.next().unwrap();
        assert!(matches!(res, Err(TraceError::Open(..))));
        assert!(set.next().is_none());
    }
}
