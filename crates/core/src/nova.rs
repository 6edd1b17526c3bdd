//! Output side of the qBittorrent search plugin protocol.
//!
//! The host reads one result per line on stdout, fields separated by `|`,
//! and one `<link> <origin>` line for a resolved download.

use std::io::{self, Write};

use crate::searcher::{Category, ResultRow};

/// Receives what the engine reports back to the host.
pub trait ResultSink {
    /// Report one search result.
    fn result(&mut self, row: &ResultRow) -> io::Result<()>;

    /// Report a resolved download: the link to add and where it came from.
    fn download(&mut self, link: &str, origin: &str) -> io::Result<()>;
}

/// [`ResultSink`] writing the host's line format.
pub struct NovaPrinter<W: Write> {
    out: W,
}

impl<W: Write> NovaPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl NovaPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

/// Format a row as `link|name|size|seeds|leech|engine_url|desc_link`.
pub fn format_row(row: &ResultRow) -> String {
    let row = row.escape_pipes();
    [
        row.link,
        row.name,
        row.size,
        row.seeds.to_string(),
        row.leech.to_string(),
        row.engine_url,
        row.desc_link,
    ]
    .join("|")
}

impl<W: Write> ResultSink for NovaPrinter<W> {
    fn result(&mut self, row: &ResultRow) -> io::Result<()> {
        writeln!(self.out, "{}", format_row(row))?;
        self.out.flush()
    }

    fn download(&mut self, link: &str, origin: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", link, origin)?;
        self.out.flush()
    }
}

/// Capability listing the host asks for when registering the engine.
pub fn capabilities_xml(engine: &str, display_name: &str, url: &str) -> String {
    let categories = Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "<capabilities>\n  <{engine}>\n    <name>{name}</name>\n    <url>{url}</url>\n    <categories>{categories}</categories>\n  </{engine}>\n</capabilities>",
        engine = engine,
        name = xml_escape(display_name),
        url = xml_escape(url),
        categories = categories,
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
