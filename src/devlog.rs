//! Structured developer traces for query compilation and execution.
//!
//! Each trace is one JSON object logged at `Trace` on `archive_core::dev`.
//! Tests can capture the traces of their own thread with [`capture`].

use serde_json::{Map, Value};
use std::cell::RefCell;
use std::marker::PhantomData;

pub const TARGET: &str = "archive_core::dev";

thread_local! {
    static CAPTURED: RefCell<Option<Vec<Value>>> = const { RefCell::new(None) };
}

/// Captures this thread's traces until dropped.
pub struct Capture {
    _thread_bound: PhantomData<*const ()>,
}

impl Capture {
    /// Traces recorded since the last call.
    pub fn take(&self) -> Vec<Value> {
        CAPTURED.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        CAPTURED.with(|c| *c.borrow_mut() = None);
    }
}

#[must_use]
pub fn capture() -> Capture {
    CAPTURED.with(|c| *c.borrow_mut() = Some(Vec::new()));
    Capture { _thread_bound: PhantomData }
}

/// Record `event` with its `fields`. A non-object `fields` lands under `"value"`.
pub fn trace(event: &str, fields: Value) {
    let capturing = CAPTURED.with(|c| c.borrow().is_some());
    if !capturing && !log::log_enabled!(target: TARGET, log::Level::Trace) {
        return;
    }
    let mut line = Map::new();
    line.insert("event".into(), Value::from(event));
    match fields {
        Value::Object(map) => line.extend(map),
        Value::Null => {}
        other => {
            line.insert("value".into(), other);
        }
    }
    let line = Value::Object(line);
    log::trace!(target: TARGET, "{line}");
    if capturing {
        CAPTURED.with(|c| {
            if let Some(buf) = c.borrow_mut().as_mut() {
                buf.push(line);
            }
        });
    }
}
