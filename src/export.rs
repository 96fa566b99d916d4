//! Document sinks
//!
//! A sink is the last stage of a run: it receives the finished document and
//! puts it somewhere a renderer can pick it up.

use crate::{Error, Result};
use crate::preprocess::Document;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File holding the plain JSON document
pub const JSON_FILE: &str = "annotations.json";
/// Script file binding the document for a static page
pub const SCRIPT_FILE: &str = "annotations.js";
/// Name of the constant the script file defines
pub const SCRIPT_BINDING: &str = "annotationsJSON";

pub trait Sink {
    fn accept(&mut self, document: &Document) -> Result<()>;
}

/// Writes the document into an output directory, creating it if needed
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn prepare(&self) -> Result<()> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(Error::Sink(format!(
                "{} exists and is not a directory",
                self.dir.display()
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}

impl Sink for DirectorySink {
    fn accept(&mut self, document: &Document) -> Result<()> {
        self.prepare()?;
        let json = document.to_json()?;

        std::fs::write(self.dir.join(JSON_FILE), &json)?;
        std::fs::write(
            self.dir.join(SCRIPT_FILE),
            format!("const {} = {};\n", SCRIPT_BINDING, json),
        )?;

        tracing::info!("Wrote {} and {} to {}", JSON_FILE, SCRIPT_FILE, self.dir.display());
        Ok(())
    }
}

/// Writes the document as JSON to any writer, stdout by default
pub struct StdoutSink<W: Write = std::io::Stdout> {
    writer: W,
    pretty: bool,
}

impl StdoutSink {
    pub fn new(pretty: bool) -> Self {
        Self::with_writer(std::io::stdout(), pretty)
    }
}

impl<W: Write> StdoutSink<W> {
    pub fn with_writer(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for StdoutSink<W> {
    fn accept(&mut self, document: &Document) -> Result<()> {
        let json = if self.pretty {
            document.to_json_pretty()?
        } else {
            document.to_json()?
        };
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}
