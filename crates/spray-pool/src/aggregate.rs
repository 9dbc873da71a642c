//! Result aggregator
//!
//! Single consumer of the outcome stream. Each outcome is rendered once
//! (plain line or JSON record), written to the console, appended to the
//! optional sink, and tallied. A sink that fails to write is disabled after
//! one logged error so the console keeps going.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, warn};

use crate::counters::SprayCounters;
use crate::outcome::Outcome;

/// Console/sink rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `[+] <id>` / `[-] <id> <message>`
    #[default]
    Human,
    /// One self-contained JSON object per line
    Json,
}

pub struct Aggregator {
    format: OutputFormat,
    console: Box<dyn Write + Send>,
    sink: Option<Box<dyn Write + Send>>,
    counters: Arc<SprayCounters>,
}

impl Aggregator {
    pub fn new(
        format: OutputFormat,
        console: Box<dyn Write + Send>,
        counters: Arc<SprayCounters>,
    ) -> Self {
        Self {
            format,
            console,
            sink: None,
            counters,
        }
    }

    /// Also append every rendered line to `sink`.
    pub fn with_sink(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn counters(&self) -> &Arc<SprayCounters> {
        &self.counters
    }

    /// Render one outcome in the configured format.
    pub fn render(&self, outcome: &Outcome) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Human => Ok(outcome.to_line()),
            OutputFormat::Json => serde_json::to_string(outcome),
        }
    }

    /// Tally, render, and emit one outcome.
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.success {
            self.counters.record_success();
        } else {
            self.counters.record_failure();
        }

        let line = match self.render(outcome) {
            Ok(line) => line,
            Err(e) => {
                error!(identifier = %outcome.identifier, error = %e, "failed to encode outcome as JSON");
                return;
            }
        };

        if let Err(e) = writeln!(self.console, "{line}").and_then(|_| self.console.flush()) {
            warn!(error = %e, "failed to write outcome to console");
        }

        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = writeln!(sink, "{line}").and_then(|_| sink.flush()) {
                error!(error = %e, "failed to append to output file, disabling it for this run");
                self.sink = None;
            }
        }
    }

    /// Consume outcomes until every producer has dropped its sender.
    ///
    /// Returns the number of outcomes received.
    pub async fn consume(mut self, mut results: Receiver<Outcome>) -> u64 {
        let mut received = 0;
        while let Some(outcome) = results.recv().await {
            self.record(&outcome);
            received += 1;
        }
        debug!(received, "result stream closed");
        received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aad_auth::AadError;
    use std::io;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Cloneable in-memory writer so tests can read what the aggregator wrote.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn invalid_password(id: &str) -> Outcome {
        Outcome::failure(
            id,
            "Summer2023",
            AadError {
                code: "AADSTS50126".into(),
                message: "Invalid password".into(),
            },
        )
    }

    #[test]
    fn human_lines_go_to_console_and_sink() {
        let console = SharedBuffer::default();
        let sink = SharedBuffer::default();
        let counters = Arc::new(SprayCounters::new());
        let mut aggregator = Aggregator::new(
            OutputFormat::Human,
            Box::new(console.clone()),
            counters.clone(),
        )
        .with_sink(Box::new(sink.clone()));

        aggregator.record(&Outcome::success("alice@contoso.com", "Summer2023"));
        aggregator.record(&invalid_password("bob@contoso.com"));

        let expected = "[+] alice@contoso.com\n[-] bob@contoso.com Invalid password\n";
        assert_eq!(console.contents(), expected);
        assert_eq!(sink.contents(), expected, "sink must receive the same lines");
        assert_eq!(counters.succeeded(), 1);
        assert_eq!(counters.failed(), 1);
    }

    #[test]
    fn json_mode_writes_one_object_per_line() {
        let console = SharedBuffer::default();
        let counters = Arc::new(SprayCounters::new());
        let mut aggregator =
            Aggregator::new(OutputFormat::Json, Box::new(console.clone()), counters);

        aggregator.record(&Outcome::success("alice@contoso.com", "Summer2023"));
        aggregator.record(&invalid_password("bob@contoso.com"));

        let output = console.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["Successful"], true);
        assert_eq!(first["Email"], "alice@contoso.com");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["ErrorCode"], "AADSTS50126");
        assert_eq!(second["ErrorMsg"], "Invalid password");
    }

    #[test]
    fn broken_sink_is_disabled_but_outcomes_still_count() {
        let console = SharedBuffer::default();
        let counters = Arc::new(SprayCounters::new());
        let mut aggregator = Aggregator::new(
            OutputFormat::Human,
            Box::new(console.clone()),
            counters.clone(),
        )
        .with_sink(Box::new(BrokenSink));

        aggregator.record(&invalid_password("a@contoso.com"));
        aggregator.record(&invalid_password("b@contoso.com"));

        assert!(aggregator.sink.is_none(), "failing sink must be dropped");
        assert_eq!(console.contents().lines().count(), 2);
        assert_eq!(counters.failed(), 2);
    }

    #[tokio::test]
    async fn consume_drains_until_senders_drop() {
        let console = SharedBuffer::default();
        let counters = Arc::new(SprayCounters::new());
        let aggregator = Aggregator::new(
            OutputFormat::Human,
            Box::new(console.clone()),
            counters.clone(),
        );

        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(aggregator.consume(rx));
        for i in 0..4 {
            tx.send(Outcome::success(format!("u{i}@contoso.com"), "pw"))
                .await
                .unwrap();
        }
        drop(tx);

        assert_eq!(handle.await.unwrap(), 4);
        assert_eq!(counters.succeeded(), 4);
        assert_eq!(console.contents().lines().count(), 4);
    }
}
