//! Poll-based follow of a growing log file.

use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Reads a log file line by line, waiting for more content at end of file.
///
/// Reading starts at the beginning of the file, so content written before
/// startup is delivered first. The sequence never ends on its own;
/// [`Follower::next_line`] returns `None` only after cancellation.
#[derive(Debug)]
pub struct Follower {
    reader: BufReader<std::fs::File>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl Follower {
    /// Opens `path` for following.
    ///
    /// Fails immediately if the file cannot be opened; a log that appears
    /// later is not waited for.
    pub fn open(
        path: &Path,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        tracing::debug!(file = %path.display(), "following log file");
        Ok(Self {
            reader: BufReader::new(file),
            poll_interval,
            cancel,
        })
    }

    /// Returns the next complete line, waiting for one to be appended if
    /// necessary.
    ///
    /// A trailing fragment without a newline is left unread until its
    /// terminator arrives. Returns `Ok(None)` once the cancellation token
    /// fires during a wait.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let offset = self.reader.stream_position()?;
            let mut line = String::new();
            let read = self.reader.read_line(&mut line)?;

            if read > 0 && line.ends_with('\n') {
                // Trim only the terminator; leading whitespace is
                // significant to some patterns.
                return Ok(Some(line.trim_end().to_string()));
            }

            // End of available data, possibly mid-line. Rewind so the
            // fragment is re-read whole once the writer finishes it.
            self.reader.seek(SeekFrom::Start(offset))?;

            tokio::select! {
                _ = self.cancel.cancelled() => return Ok(None),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}
