//! Result sink that records everything it receives.

use std::io;

use crate::nova::ResultSink;
use crate::searcher::ResultRow;

/// [`ResultSink`] keeping rows and download lines in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub rows: Vec<ResultRow>,
    pub downloads: Vec<(String, String)>,
    fail_writes: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose writes fail, like a closed stdout.
    pub fn broken() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    fn check(&self) -> io::Result<()> {
        if self.fail_writes {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        } else {
            Ok(())
        }
    }
}

impl ResultSink for RecordingSink {
    fn result(&mut self, row: &ResultRow) -> io::Result<()> {
        self.check()?;
        self.rows.push(row.clone());
        Ok(())
    }

    fn download(&mut self, link: &str, origin: &str) -> io::Result<()> {
        self.check()?;
        self.downloads.push((link.to_string(), origin.to_string()));
        Ok(())
    }
}
