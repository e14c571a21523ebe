use crate::envelope::{Envelope, Payload};
use crate::error::Error;
use crate::matcher::Matcher;
use log::debug;
use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread::{self, JoinHandle};

/// Counters for one streaming pass.
///
/// `skipped` is the diagnostic for the silent-skip policy: it counts lines
/// that were present but could not be decoded (malformed JSON, torn UTF-8,
/// missing envelope fields). Blank lines are not counted anywhere.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    /// Lines that decoded into a well-formed envelope, of any kind.
    pub decoded: u64,
    /// Payloads that matched and were accepted by the consumer.
    pub emitted: u64,
    /// Non-blank lines that failed to decode and were skipped.
    pub skipped: u64,
}

/// A shared flag requesting that a streaming pass stop early.
///
/// Cancellation is cooperative: the reader checks the token between lines,
/// so a reader blocked in a channel send will not observe it until the
/// consumer drains the channel or drops the receiver.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Decode, filter, and forward telemetry events from `input` until end of
/// stream.
///
/// Reads line by line, in order. Each non-blank line either decodes into an
/// [`Envelope`] or is skipped. Envelopes that are not telemetry events
/// (`type != "evt"`) are skipped without error. For each event payload the
/// matcher accepts, the payload is sent on `out`; the send blocks until the
/// consumer takes it, so a slow consumer throttles the reader with no
/// explicit flow control.
///
/// `out` is consumed and dropped on every exit path — the consumer always
/// observes channel closure, whether the stream ended, errored, was
/// cancelled, or the consumer itself hung up. The input's lifecycle stays
/// with the caller; this function never closes or reopens it.
///
/// Reaching end of input is terminal: this is a one-shot drain of whatever
/// the file holds right now, not a follower. Callers wanting `tail -f`
/// behavior must re-invoke on a fresh stream handle.
///
/// Emission order equals input line order restricted to matching lines; no
/// payload is emitted twice or out of order.
///
/// # Errors
///
/// Returns [`Error::Read`] if the stream itself fails mid-read. A dropped
/// receiver is not an error: the pass ends with `Ok` and the stats
/// accumulated so far.
pub fn stream_events<R: Read>(
    input: R,
    matcher: &Matcher,
    out: SyncSender<Payload>,
    cancel: &CancelToken,
) -> Result<StreamStats, Error> {
    let mut reader = BufReader::new(input);
    let mut stats = StreamStats::default();
    let mut buf = Vec::new();

    loop {
        if cancel.is_cancelled() {
            break;
        }

        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.is_empty() {
            continue;
        }

        // A torn multi-byte write is a decode failure, never a stream abort.
        let Ok(line) = std::str::from_utf8(&buf) else {
            stats.skipped += 1;
            debug!("skipping non-utf8 line");
            continue;
        };

        let envelope = match Envelope::decode(line) {
            Ok(envelope) => envelope,
            Err(err) => {
                stats.skipped += 1;
                debug!("skipping undecodable line: {err}");
                continue;
            }
        };
        stats.decoded += 1;

        if !envelope.is_event() {
            continue;
        }
        if !matcher.matches(&envelope.body) {
            continue;
        }
        // Receiver dropped — the consumer is done with us.
        if out.send(envelope.body).is_err() {
            break;
        }
        stats.emitted += 1;
    }

    Ok(stats)
}

/// A running background reader: its cancellation token and join handle.
///
/// Returned by [`spawn_reader`] alongside the receiving end of the channel.
/// Dropping the handle detaches the thread; it still terminates on its own
/// once the receiver is dropped.
#[derive(Debug)]
pub struct ReaderHandle {
    cancel: CancelToken,
    thread: JoinHandle<Result<StreamStats, Error>>,
}

impl ReaderHandle {
    /// Request that the reader stop at the next line boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the reader to finish and return its result.
    ///
    /// # Errors
    ///
    /// Returns whatever [`stream_events`] returned on the reader thread.
    ///
    /// # Panics
    ///
    /// Panics if the reader thread itself panicked.
    pub fn join(self) -> Result<StreamStats, Error> {
        self.thread.join().expect("reader thread panicked")
    }
}

/// Run [`stream_events`] on a background thread over a bounded channel.
///
/// `capacity` is the channel buffer; `0` gives rendezvous semantics — every
/// send blocks until the consumer receives, the strictest form of
/// backpressure. A small buffer trades a little memory for throughput
/// without changing observable semantics.
///
/// The returned receiver yields matching payloads in input order and
/// disconnects when the pass is over. The stream value moves into the
/// reader thread and is dropped there once the pass ends; nothing is
/// closed or reopened mid-pass.
///
/// # Examples
///
/// ```no_run
/// use evtap::{Matcher, spawn_reader};
/// use std::fs::File;
///
/// let file = File::open("events.jsonl")?;
/// let (events, handle) = spawn_reader(file, Matcher::field("source", "stdout"), 0);
/// for payload in events {
///     println!("{}", payload["data"]);
/// }
/// let stats = handle.join()?;
/// println!("emitted {} of {} events", stats.emitted, stats.decoded);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn spawn_reader<R>(
    input: R,
    matcher: Matcher,
    capacity: usize,
) -> (Receiver<Payload>, ReaderHandle)
where
    R: Read + Send + 'static,
{
    let (tx, rx) = sync_channel(capacity);
    let cancel = CancelToken::new();
    let thread_cancel = cancel.clone();
    let thread = thread::spawn(move || stream_events(input, &matcher, tx, &thread_cancel));
    (rx, ReaderHandle { cancel, thread })
}
