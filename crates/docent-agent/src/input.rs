//! Line sources for the interactive loop.
//!
//! Any `AsyncBufRead` is a line source. The process console uses
//! [`StdinLines`] instead: `tokio::io::stdin()` reads on the blocking pool
//! and that read cannot be cancelled, so an interrupted loop would keep the
//! runtime alive until the next Enter. `StdinLines` reads on a detached
//! thread and hands lines over a channel, which leaves nothing behind for the
//! runtime to wait on.

use std::future::Future;
use std::io::{self, BufRead};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Something the loop can pull lines from.
pub trait LineSource {
    /// Next line including its terminator, or `None` at end of input.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>>;
}

impl<R: AsyncBufRead + Unpin> LineSource for R {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.read_line(&mut line).await?;
        Ok((read > 0).then_some(line))
    }
}

/// Lines read from a blocking reader on a dedicated thread.
#[derive(Debug)]
pub struct StdinLines {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl StdinLines {
    /// Read the process's standard input.
    pub fn spawn() -> io::Result<Self> {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// Read from any blocking reader. The thread ends at end of input, on a
    /// read error, or once the receiving side is dropped.
    pub fn from_reader<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        std::thread::Builder::new()
            .name("docent-stdin".to_string())
            .spawn(move || forward_lines(reader, &tx))?;
        Ok(Self { rx })
    }
}

impl LineSource for StdinLines {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        // A closed channel means the reader thread saw end of input.
        self.rx.recv().await.transpose()
    }
}

fn forward_lines<R: BufRead>(mut reader: R, tx: &mpsc::Sender<io::Result<String>>) {
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if tx.blocking_send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
    debug!("Input reader finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_lines() {
        let mut source: &[u8] = b"first\nsecond";
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("first\n"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(source.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_thread_reader_keeps_terminators() {
        let mut source = StdinLines::from_reader(Cursor::new("a\r\nexit\n")).unwrap();
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("a\r\n"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("exit\n"));
        assert_eq!(source.next_line().await.unwrap(), None);
        // Stays at end of input.
        assert_eq!(source.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_thread_reader_forwards_errors() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::InvalidData, "not utf-8"))
            }
        }

        let mut source = StdinLines::from_reader(io::BufReader::new(Broken)).unwrap();
        let err = source.next_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(source.next_line().await.unwrap(), None);
    }
}
