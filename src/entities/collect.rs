use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use super::client::ExtractionClient;
use super::graph::GraphSnapshot;
use super::parse::parse_snapshot;

const CANCEL_CHECK_SLICE: Duration = Duration::from_millis(100);

pub trait GraphSource {
    fn fetch(&mut self) -> Result<GraphSnapshot>;
}

pub struct HttpSource {
    client: ExtractionClient,
    document_id: String,
}

impl HttpSource {
    pub fn new(client: ExtractionClient, document_id: String) -> Self {
        Self {
            client,
            document_id,
        }
    }
}

impl GraphSource for HttpSource {
    fn fetch(&mut self) -> Result<GraphSnapshot> {
        self.client.fetch_graph(&self.document_id)
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl GraphSource for FileSource {
    fn fetch(&mut self) -> Result<GraphSnapshot> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot {}", self.path.display()))?;
        parse_snapshot(&raw)
            .with_context(|| format!("failed to parse snapshot {}", self.path.display()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        let max_attempts = if interval.is_zero() {
            1
        } else {
            let attempts = timeout.as_millis().div_ceil(interval.as_millis());
            u32::try_from(attempts).unwrap_or(u32::MAX).max(1)
        };
        Self {
            interval,
            timeout,
            max_attempts,
        }
    }

    #[cfg(test)]
    pub fn once() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

#[derive(Debug)]
pub enum PollOutcome {
    Ready(GraphSnapshot),
    GaveUp { attempts: u32 },
    Cancelled,
}

/// Fetches until the source returns at least one node, the attempts or the
/// overall timeout run out, or `cancel` is raised. Fetch errors count as attempts.
pub fn poll_for_graph<S: GraphSource>(
    source: &mut S,
    policy: RetryPolicy,
    cancel: &AtomicBool,
) -> PollOutcome {
    let max_attempts = policy.max_attempts.max(1);
    let deadline = Instant::now() + policy.timeout;
    let mut attempts = 0;

    while attempts < max_attempts {
        if cancel.load(Ordering::Relaxed) {
            return PollOutcome::Cancelled;
        }
        if attempts > 0 && Instant::now() >= deadline {
            break;
        }

        attempts += 1;
        match source.fetch() {
            Ok(snapshot) if snapshot.has_nodes() => {
                tracing::info!(attempt = attempts, nodes = snapshot.nodes.len(), "graph available");
                return PollOutcome::Ready(snapshot);
            }
            Ok(_) => tracing::debug!(attempt = attempts, max_attempts, "graph not yet available"),
            Err(error) => {
                tracing::warn!(attempt = attempts, max_attempts, "graph fetch failed: {error:#}")
            }
        }

        if attempts == max_attempts || Instant::now() + policy.interval >= deadline {
            break;
        }
        if !sleep_unless_cancelled(policy.interval, cancel) {
            return PollOutcome::Cancelled;
        }
    }

    tracing::info!(attempts, "stopped polling for graph");
    PollOutcome::GaveUp { attempts }
}

fn sleep_unless_cancelled(duration: Duration, cancel: &AtomicBool) -> bool {
    let mut remaining = duration;
    while !remaining.is_zero() {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        let slice = remaining.min(CANCEL_CHECK_SLICE);
        thread::sleep(slice);
        remaining -= slice;
    }
    !cancel.load(Ordering::Relaxed)
}
