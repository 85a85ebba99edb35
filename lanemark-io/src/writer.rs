//! Lane listing output and segment file input.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use lanemark_algorithms::LaneClusters;
use lanemark_core::LineSegment;

use crate::Result;

/// Writes classified lanes to any byte sink.
pub struct LaneWriter<W: Write> {
    writer: W,
}

impl<W: Write> LaneWriter<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a `left lines:` / `right lines:` listing, one
    /// `(x1, y1)\t-> (x2, y2)` line per segment.
    ///
    /// # Errors
    /// Returns an error if the sink fails.
    pub fn write_text(&mut self, lanes: &LaneClusters) -> Result<()> {
        for (title, lines) in [("left lines", &lanes.left), ("right lines", &lanes.right)] {
            writeln!(self.writer, "{title}:")?;
            for line in lines {
                writeln!(self.writer, "{}\t-> {}", line.start, line.end)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes the clusters as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or the sink fails.
    pub fn write_json(&mut self, lanes: &LaneClusters) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, lanes)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads a JSON array of `[x1, y1, x2, y2]` segments.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn read_segments<P: AsRef<Path>>(path: P) -> Result<Vec<LineSegment>> {
    let file = File::open(path)?;
    let segments = serde_json::from_reader(BufReader::new(file))?;
    Ok(segments)
}
