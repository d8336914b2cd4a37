//! Verbatim keystroke capture.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Append-only byte sink recording every raw keyboard byte in arrival order.
///
/// The file is truncated and recreated at startup. There is no header and no
/// framing: the log is a flat byte stream suitable for input replay, and it
/// records bytes the focus-toggle classifier swallows as well as bytes that
/// reach a session.
pub struct KeystrokeLog {
    writer: BufWriter<File>,
}

impl KeystrokeLog {
    /// Truncate and open the log file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create keystroke log {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Record one keyboard byte.
    pub fn record(&mut self, byte: u8) -> Result<()> {
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    /// Flush buffered bytes to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_records_bytes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.bin");

        let mut log = KeystrokeLog::create(&path).unwrap();
        for byte in [b'l', b's', 0x01, b'\r'] {
            log.record(byte).unwrap();
        }
        log.flush().unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![b'l', b's', 0x01, b'\r']);
    }

    #[test]
    fn test_create_truncates_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.bin");
        fs::write(&path, b"stale").unwrap();

        let mut log = KeystrokeLog::create(&path).unwrap();
        log.record(b'x').unwrap();
        log.flush().unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![b'x']);
    }
}
