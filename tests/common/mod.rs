#![allow(dead_code)]

use evtap::{Matcher, Payload, StreamStats, spawn_reader};
use std::fs;
use std::path::{Path, PathBuf};

/// One telemetry event line in the shape the instrumented process writes.
pub fn event_line(source: &str, pid: u64, time: f64) -> String {
    format!(
        r#"{{"type":"evt","body":{{"sourcetype":"console","id":"d55805e5c25e-echo-/bin/echo true","_time":{time},"source":"{source}","host":"d55805e5c25e","proc":"echo","cmd":"/bin/echo true","pid":{pid},"_channel":"641503557208802","data":"true"}}}}"#
    )
}

/// The four-event fixture: three `source == "stdout"` lines (two sharing
/// pid 10118), one `source == "foo"` line.
pub fn four_event_log() -> String {
    [
        event_line("stdout", 10117, 1609191683.985),
        event_line("foo", 10117, 1609191683.985),
        event_line("stdout", 10118, 1609191683.985),
        event_line("stdout", 10118, 1609191683.986),
    ]
    .join("\n")
        + "\n"
}

pub fn write_log(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("events.jsonl");
    fs::write(&path, contents).unwrap();
    path
}

/// Drain one full streaming pass over `path` with a rendezvous channel.
pub fn drain(path: &Path, matcher: Matcher) -> (Vec<Payload>, StreamStats) {
    let file = fs::File::open(path).unwrap();
    let (events, handle) = spawn_reader(file, matcher, 0);
    let payloads: Vec<Payload> = events.iter().collect();
    let stats = handle.join().unwrap();
    (payloads, stats)
}
