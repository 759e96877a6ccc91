//! Text result file sink

use crate::format::line;
use glint_core::{Check, CheckOutcome, Error, OutputSink, Result, Target};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Create (or truncate) a sink's output file, creating parent directories
pub(crate) fn create_output(sink: &str, path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::output(sink, format!("{}: {}", parent.display(), e)))?;
    }
    let file = File::create(path).map_err(|e| Error::output(sink, format!("{}: {}", path.display(), e)))?;
    debug!("Opened {} output: {}", sink, path.display());
    Ok(BufWriter::new(file))
}

/// Writes the console line format to a file, one line per outcome
pub struct TextFileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    written: usize,
}

impl TextFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for TextFileSink {
    fn name(&self) -> &str {
        "text"
    }

    fn construct(&mut self) -> Result<()> {
        self.writer = Some(create_output("text", &self.path)?);
        Ok(())
    }

    fn handle(&mut self, _target: &Target, check: &dyn Check, outcome: &CheckOutcome) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::output("text", "result file is not open"))?;
        writeln!(writer, "{}", line(check.name(), outcome))
            .and_then(|()| writer.flush())
            .map_err(|e| Error::output("text", e.to_string()))?;
        self.written += 1;
        Ok(())
    }

    fn destruct(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| Error::output("text", e.to_string()))?;
            info!("Saved {} result(s) to {}", self.written, self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::NamedCheck;
    use tempfile::TempDir;

    #[test]
    fn test_writes_one_line_per_outcome() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("out/result.txt");
        let mut sink = TextFileSink::new(&path);
        let target = Target::parse("a.test").unwrap();

        sink.construct().unwrap();
        sink.handle(&target, &NamedCheck::new("web/a"), &CheckOutcome::vulnerable("found"))
            .unwrap();
        // Flushed per line, visible before destruct
        let partial = std::fs::read_to_string(&path).unwrap();
        assert_eq!(partial, "[+] web/a found\n");

        sink.handle(&target, &NamedCheck::new("web/b"), &CheckOutcome::work_error("boom"))
            .unwrap();
        sink.destruct().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["[+] web/a found", "[!] web/b work error: boom"]);
    }

    #[test]
    fn test_handle_before_construct_fails() {
        let tmp_dir = TempDir::new().unwrap();
        let mut sink = TextFileSink::new(tmp_dir.path().join("result.txt"));
        let err = sink
            .handle(
                &Target::parse("a.test").unwrap(),
                &NamedCheck::new("web/a"),
                &CheckOutcome::vulnerable("found"),
            )
            .unwrap_err();
        assert_eq!(err.code(), "OUTPUT_ERROR");
    }
}
