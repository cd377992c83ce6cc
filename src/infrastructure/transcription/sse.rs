//! Incremental server-sent-event transcript parser
//!
//! The transcription endpoint streams lines of the form `data: <payload>`
//! separated by blank lines, terminated either by a `data: [DONE]` sentinel
//! or simply by the end of the response body. Bytes arrive in arbitrary
//! chunks, so a line may span any number of network reads; parsing operates
//! only on fully buffered lines and never loses or duplicates a partial
//! line at a chunk boundary.

use serde::Deserialize;

/// Prefix marking an event line
const DATA_PREFIX: &str = "data: ";

/// Sentinel payload that ends the stream
const DONE_SENTINEL: &str = "[DONE]";

/// One streamed event payload. Two upstream conventions are supported:
/// a flat `text` field and the chat-style `choices[0].delta.content`.
#[derive(Debug, Deserialize)]
struct EventPayload {
    text: Option<String>,
    choices: Option<Vec<EventChoice>>,
}

#[derive(Debug, Deserialize)]
struct EventChoice {
    delta: Option<EventDelta>,
}

#[derive(Debug, Deserialize)]
struct EventDelta {
    content: Option<String>,
}

impl EventPayload {
    fn into_fragment(self) -> Option<String> {
        if let Some(text) = self.text {
            return Some(text);
        }
        self.choices?
            .into_iter()
            .next()?
            .delta?
            .content
    }
}

/// Mutable per-request parser state: a byte accumulator, the accumulated
/// transcript, and the done flag. Created when a streaming request is
/// issued and discarded when it terminates.
#[derive(Debug, Default)]
pub struct StreamState {
    acc: Vec<u8>,
    transcript: String,
    done: bool,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one delivery chunk and return the transcript fragments decoded
    /// from every line completed by it, in arrival order.
    ///
    /// After the `[DONE]` sentinel has been seen the parser is inert:
    /// trailing bytes are ignored and no further fragments are produced.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }

        self.acc.extend_from_slice(chunk);

        let mut fragments = Vec::new();
        let mut consumed = 0;

        while let Some(offset) = find_newline(&self.acc[consumed..]) {
            let line_end = consumed + offset;
            let outcome = decode_line(trim_line(&self.acc[consumed..line_end]));
            consumed = line_end + 1;

            match outcome {
                LineOutcome::Sentinel => {
                    self.done = true;
                    break;
                }
                LineOutcome::Fragment(fragment) => {
                    self.transcript.push_str(&fragment);
                    fragments.push(fragment);
                }
                LineOutcome::Nothing => {}
            }
        }

        // Keep only the unconsumed tail; a partial line stays buffered
        // until its newline arrives.
        self.acc.drain(..consumed);

        fragments
    }

    /// Whether the `[DONE]` sentinel has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether any transcript text was decoded from the event stream
    pub fn saw_text(&self) -> bool {
        !self.transcript.is_empty()
    }

    /// The full accumulated transcript so far
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Consume the state, yielding the accumulated transcript
    pub fn into_transcript(self) -> String {
        self.transcript
    }
}

enum LineOutcome {
    Sentinel,
    Fragment(String),
    Nothing,
}

fn decode_line(line: &str) -> LineOutcome {
    let payload = match line.strip_prefix(DATA_PREFIX) {
        Some(rest) => rest.trim(),
        None => return LineOutcome::Nothing,
    };

    if payload == DONE_SENTINEL {
        return LineOutcome::Sentinel;
    }

    match serde_json::from_str::<EventPayload>(payload)
        .ok()
        .and_then(EventPayload::into_fragment)
    {
        Some(fragment) if !fragment.is_empty() => LineOutcome::Fragment(fragment),
        _ => LineOutcome::Nothing,
    }
}

fn find_newline(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b == b'\n')
}

fn trim_line(bytes: &[u8]) -> &str {
    let bytes = match bytes.last() {
        Some(b'\r') => &bytes[..bytes.len() - 1],
        _ => bytes,
    };
    std::str::from_utf8(bytes).unwrap_or("")
}
