//! Schema text parsing
//!
//! Small documents parse inline; anything past the size threshold is
//! handed to a worker thread so the caller's thread stays responsive.
//! [`ParseHandle::join`] blocks until the result is ready, so callers
//! that need synchronous behavior get it either way.

use crossbeam_channel::{bounded, Receiver};
use serde_json::Value;
use thiserror::Error;

/// Documents larger than this parse on a background thread
pub const BACKGROUND_PARSE_THRESHOLD: usize = 100 * 1024;

/// Errors from schema text parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse worker terminated without a result")]
    WorkerGone,
}

/// Pending result of a parse, inline or backgrounded
pub struct ParseHandle {
    inner: HandleInner,
}

enum HandleInner {
    Ready(Result<Value, ParseError>),
    Pending(Receiver<Result<Value, serde_json::Error>>),
}

impl ParseHandle {
    /// Whether the parse ran on a background thread
    pub fn is_background(&self) -> bool {
        matches!(self.inner, HandleInner::Pending(_))
    }

    /// Wait for and take the parse result
    pub fn join(self) -> Result<Value, ParseError> {
        match self.inner {
            HandleInner::Ready(result) => result,
            HandleInner::Pending(receiver) => match receiver.recv() {
                Ok(result) => result.map_err(ParseError::from),
                Err(_) => Err(ParseError::WorkerGone),
            },
        }
    }
}

/// Parse schema text, backgrounding large documents
pub fn parse_schema(json: String) -> ParseHandle {
    if json.len() <= BACKGROUND_PARSE_THRESHOLD {
        return ParseHandle {
            inner: HandleInner::Ready(serde_json::from_str(&json).map_err(ParseError::from)),
        };
    }

    log::debug!("Backgrounding parse of {} byte document", json.len());
    let (sender, receiver) = bounded(1);
    std::thread::spawn(move || {
        let result = serde_json::from_str(&json);
        let _ = sender.send(result);
    });

    ParseHandle {
        inner: HandleInner::Pending(receiver),
    }
}
