use crate::envelope::Envelope;
use crate::error::Error;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Count the well-formed envelopes in a log file.
///
/// One synchronous pass, no filtering: every line that decodes into an
/// [`Envelope`] counts, regardless of its `type`. Malformed and blank lines
/// are skipped with the same policy as the streaming reader and never abort
/// the count.
///
/// # Errors
///
/// Returns [`Error::Open`] if the file cannot be opened and [`Error::Read`]
/// if it fails mid-read. Individual malformed lines are not errors.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("events.jsonl");
/// let mut file = std::fs::File::create(&path)?;
/// writeln!(file, r#"{{"type":"evt","body":{{"pid":10117}}}}"#)?;
/// writeln!(file, "not json")?;
/// writeln!(file, r#"{{"type":"metric","body":{{"cpu":0.5}}}}"#)?;
///
/// assert_eq!(evtap::count(&path)?, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn count(path: impl AsRef<Path>) -> Result<usize, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut total = 0;

    loop {
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

        match std::str::from_utf8(&buf).map(Envelope::decode) {
            Ok(Ok(_)) => total += 1,
            _ => debug!("skipping undecodable line in {}", path.display()),
        }
    }

    Ok(total)
}
