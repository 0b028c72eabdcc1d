//! glyphframe — terminal UI engine with a C ABI.
//!
//! The Rust API lives in the modules below (`Session`, `run`, the widget
//! tree). This file additionally holds the `extern "C"` entry points a
//! host-language binding drives the engine through. Each entry point:
//! 1. Wraps its body in `catch_unwind`
//! 2. Validates pointers and decodes JSON at the boundary
//! 3. Delegates to the session, state store, or layout solver
//! 4. Returns a status code: 0 or a positive value on success, -1 on error
//!    (message in `gf_get_last_error`), -2 on panic
//!
//! Strings produced by a call are staged and copied out with
//! `gf_result_len` / `gf_copy_result`.

// All `gf_*` functions are `extern "C"` entry points; raw-pointer arguments
// are part of the C contract. Pointer validity is checked (null guards)
// inside each function body before dereferencing.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

pub mod buffer;
pub mod config;
mod context;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod logging;
pub mod render;
mod scroll;
pub mod session;
pub mod state;
pub mod style;
pub mod symbols;
pub mod terminal;
pub mod text;
pub mod widgets;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

pub use buffer::{Buffer, Cell};
pub use config::{LogConfig, TerminalOptions};
pub use error::{Error, Result};
pub use event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
pub use frame::Frame;
pub use geometry::{Margin, Position, Rect, Size};
pub use layout::{Constraint, Direction, Flex, Layout};
pub use session::{run, run_with, Session};
pub use state::{ListState, ScrollbarState, StateStore, TableState};
pub use style::{Color, Modifier, Style};
pub use terminal::{CrosstermBackend, TerminalBackend, TestBackend};
pub use widgets::{StatefulWidget, Widget, WidgetNode};

use context::{
    context_read, context_write, destroy_context, init_context, set_last_error, stage_result,
};
use state::{StateKind, WidgetState};
use widgets::Paragraph;

// ============================================================================
// Safety wrapper: every FFI entry point uses this pattern
// ============================================================================

/// Wrap an FFI function body. Returns the body's code on success, -1 on
/// error, -2 on panic.
fn ffi_wrap(f: impl FnOnce() -> Result<i32>) -> i32 {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            debug!(error = %e, "ffi call failed");
            set_last_error(&e.to_string());
            -1
        }
        Err(_) => {
            set_last_error("internal panic");
            -2
        }
    }
}

/// Wrap an FFI function that returns a u32 handle. Returns 0 on error.
fn ffi_wrap_handle(f: impl FnOnce() -> Result<u32>) -> u32 {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(handle)) => handle,
        Ok(Err(e)) => {
            set_last_error(&e.to_string());
            0
        }
        Err(_) => {
            set_last_error("internal panic");
            0
        }
    }
}

/// Borrow `len` bytes at `ptr` as UTF-8. Null or empty input is "".
fn read_str<'a>(ptr: *const u8, len: u32) -> Result<&'a str> {
    if ptr.is_null() || len == 0 {
        return Ok("");
    }
    let slice = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    std::str::from_utf8(slice).map_err(|_| Error::Other("Invalid UTF-8".to_string()))
}

fn stage(result: String) -> Result<i32> {
    let len = stage_result(result)?;
    i32::try_from(len).map_err(|_| Error::Other(format!("result of {len} bytes is too large")))
}

fn write_out<T>(out: *mut T, value: T) {
    if !out.is_null() {
        unsafe {
            *out = value;
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Start a terminal session. `options` is `TerminalOptions` JSON; null or
/// empty uses the defaults with environment overrides.
#[no_mangle]
pub extern "C" fn gf_init(options: *const u8, options_len: u32) -> i32 {
    ffi_wrap(|| {
        let json = read_str(options, options_len)?;
        let options = if json.trim().is_empty() {
            TerminalOptions::from_env()
        } else {
            serde_json::from_str(json)?
        };
        init_context(Box::new(CrosstermBackend::stdout()), options)?;
        Ok(0)
    })
}

/// Headless init: the session renders into an in-memory terminal and
/// reads injected events, for tests and hosts without a terminal.
#[no_mangle]
pub extern "C" fn gf_init_headless(width: u16, height: u16) -> i32 {
    ffi_wrap(|| {
        init_context(
            Box::new(TestBackend::new(width, height)),
            TerminalOptions::default(),
        )?;
        Ok(0)
    })
}

#[no_mangle]
pub extern "C" fn gf_shutdown() -> i32 {
    ffi_wrap(|| {
        if let Some(mut ctx) = destroy_context()? {
            ctx.session.restore()?;
        }
        Ok(0)
    })
}

#[no_mangle]
pub extern "C" fn gf_get_terminal_size(width: *mut i32, height: *mut i32) -> i32 {
    ffi_wrap(|| {
        let ctx = context_read()?;
        let size = ctx.session.size()?;
        write_out(width, i32::from(size.width));
        write_out(height, i32::from(size.height));
        Ok(0)
    })
}

/// Start logging through `tracing-subscriber`. `filter` holds `EnvFilter`
/// directives; empty uses `GLYPHFRAME_LOG`. The destination comes from
/// `GLYPHFRAME_LOG_FILE`, else stderr.
#[no_mangle]
pub extern "C" fn gf_init_logging(filter: *const u8, filter_len: u32) -> i32 {
    ffi_wrap(|| {
        let filter = read_str(filter, filter_len)?;
        let mut config = TerminalOptions::from_env().log;
        if !filter.trim().is_empty() {
            config.filter = filter.to_string();
        }
        logging::init(&config)?;
        Ok(0)
    })
}

// ============================================================================
// Rendering and events
// ============================================================================

/// Render a `WidgetNode` JSON tree over the whole terminal.
#[no_mangle]
pub extern "C" fn gf_render(tree: *const u8, tree_len: u32) -> i32 {
    ffi_wrap(|| {
        let node: WidgetNode = serde_json::from_str(read_str(tree, tree_len)?)?;
        let mut guard = context_write()?;
        let ctx = &mut *guard;
        ctx.session.render(&node, &mut ctx.states)?;
        Ok(0)
    })
}

/// Wait up to `timeout_ms` for an event (negative waits indefinitely, 0
/// polls) and stage its JSON. Returns the staged length.
#[no_mangle]
pub extern "C" fn gf_poll_event(timeout_ms: i64) -> i32 {
    ffi_wrap(|| {
        let timeout = u64::try_from(timeout_ms).ok().map(Duration::from_millis);
        let event = context_write()?.session.poll_event(timeout)?;
        stage(serde_json::to_string(&event)?)
    })
}

/// Queue an event JSON for the next poll. Headless sessions only.
#[no_mangle]
pub extern "C" fn gf_inject_event(event: *const u8, event_len: u32) -> i32 {
    ffi_wrap(|| {
        let event: Event = serde_json::from_str(read_str(event, event_len)?)?;
        if !context_write()?.session.inject_event(event) {
            return Err(Error::Other(
                "event injection requires a headless session".to_string(),
            ));
        }
        Ok(0)
    })
}

// ============================================================================
// Inspection
// ============================================================================

/// Stage the last frame as text rows joined by `\n`.
#[no_mangle]
pub extern "C" fn gf_get_buffer_content() -> i32 {
    ffi_wrap(|| {
        let content = context_read()?.session.buffer_content().join("\n");
        stage(content)
    })
}

/// Stage the JSON of the cell at `(x, y)` in the last frame.
#[no_mangle]
pub extern "C" fn gf_get_cell_at(x: u16, y: u16) -> i32 {
    ffi_wrap(|| {
        let ctx = context_read()?;
        let cell = ctx
            .session
            .cell_at(x, y)
            .ok_or_else(|| Error::Other(format!("cell ({x}, {y}) is outside the buffer")))?;
        stage(serde_json::to_string(cell)?)
    })
}

/// Returns 1 and writes the position when the last frame showed a cursor,
/// 0 (and -1 coordinates) when it was hidden.
#[no_mangle]
pub extern "C" fn gf_get_cursor_position(x: *mut i32, y: *mut i32) -> i32 {
    ffi_wrap(|| match context_read()?.session.cursor_position() {
        Some(position) => {
            write_out(x, i32::from(position.x));
            write_out(y, i32::from(position.y));
            Ok(1)
        }
        None => {
            write_out(x, -1);
            write_out(y, -1);
            Ok(0)
        }
    })
}

// ============================================================================
// Layout and text measurement (no session required)
// ============================================================================

#[derive(Deserialize)]
struct SplitRequest {
    area: Rect,
    #[serde(flatten)]
    layout: Layout,
}

/// Split an area. Request JSON: `{"area": {..}, "direction", "constraints",
/// "flex", "margin", "spacing"}`. Stages the JSON array of rects.
#[no_mangle]
pub extern "C" fn gf_split(request: *const u8, request_len: u32) -> i32 {
    ffi_wrap(|| {
        let request: SplitRequest = serde_json::from_str(read_str(request, request_len)?)?;
        for constraint in &request.layout.constraints {
            constraint.validate()?;
        }
        let rects = request.layout.split(request.area);
        stage(serde_json::to_string(&rects)?)
    })
}

#[no_mangle]
pub extern "C" fn gf_text_width(ptr: *const u8, len: u32, width: *mut u32) -> i32 {
    ffi_wrap(|| {
        let measured = text::width(read_str(ptr, len)?);
        write_out(width, u32::try_from(measured).unwrap_or(u32::MAX));
        Ok(0)
    })
}

/// Rows a paragraph (JSON) needs at `width`. Returns the count.
#[no_mangle]
pub extern "C" fn gf_paragraph_line_count(paragraph: *const u8, len: u32, width: u16) -> i32 {
    ffi_wrap(|| {
        let paragraph: Paragraph = serde_json::from_str(read_str(paragraph, len)?)?;
        Ok(i32::try_from(paragraph.line_count(width)).unwrap_or(i32::MAX))
    })
}

// ============================================================================
// Widget state handles
// ============================================================================

/// Create a state of `kind` (`"list"`, `"table"`, `"scrollbar"`). Returns
/// its handle, or 0 on error.
#[no_mangle]
pub extern "C" fn gf_state_create(kind: *const u8, kind_len: u32) -> u32 {
    ffi_wrap_handle(|| {
        let kind = read_str(kind, kind_len)?;
        let kind: StateKind = serde_json::from_value(serde_json::Value::String(kind.to_string()))?;
        Ok(context_write()?.states.create(kind))
    })
}

#[no_mangle]
pub extern "C" fn gf_state_destroy(handle: u32) -> i32 {
    ffi_wrap(|| {
        context_write()?.states.remove(handle)?;
        Ok(0)
    })
}

/// Stage the JSON of the state under `handle`.
#[no_mangle]
pub extern "C" fn gf_state_get(handle: u32) -> i32 {
    ffi_wrap(|| {
        let json = serde_json::to_string(context_read()?.states.get(handle)?)?;
        stage(json)
    })
}

/// Replace the state under `handle`. The JSON's `kind` must match.
#[no_mangle]
pub extern "C" fn gf_state_set(handle: u32, state: *const u8, state_len: u32) -> i32 {
    ffi_wrap(|| {
        let state: WidgetState = serde_json::from_str(read_str(state, state_len)?)?;
        context_write()?.states.set(handle, state)?;
        Ok(0)
    })
}

// ============================================================================
// Staged results and diagnostics
// ============================================================================

#[no_mangle]
pub extern "C" fn gf_result_len() -> i32 {
    ffi_wrap(|| {
        let len = context::staged_len()?;
        Ok(i32::try_from(len).unwrap_or(i32::MAX))
    })
}

/// Copy the staged result into `buffer`, NUL-terminating when there is
/// room. Returns the number of bytes copied.
#[no_mangle]
pub extern "C" fn gf_copy_result(buffer: *mut u8, buffer_len: u32) -> i32 {
    ffi_wrap(|| {
        if buffer.is_null() || buffer_len == 0 {
            return Ok(0);
        }
        let out = unsafe { std::slice::from_raw_parts_mut(buffer, buffer_len as usize) };
        let copied = context::copy_staged(out)?;
        Ok(i32::try_from(copied).unwrap_or(i32::MAX))
    })
}

/// NUL-terminated message of the last failed call, or null. The pointer is
/// valid until the next failing call or `gf_clear_error`.
#[no_mangle]
pub extern "C" fn gf_get_last_error() -> *const c_char {
    catch_unwind(context::last_error_ptr).unwrap_or(std::ptr::null())
}

#[no_mangle]
pub extern "C" fn gf_clear_error() {
    let _ = catch_unwind(context::clear_last_error);
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::sync::{Mutex, MutexGuard};

    use super::*;

    // The context is process-global; FFI tests take turns.
    static FFI_LOCK: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        let guard = FFI_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        gf_shutdown();
        gf_clear_error();
        guard
    }

    fn call_json<R>(json: &str, f: extern "C" fn(*const u8, u32) -> R) -> R {
        f(json.as_ptr(), json.len() as u32)
    }

    fn take_result() -> String {
        let len = gf_result_len();
        assert!(len >= 0);
        let mut buf = vec![0u8; len as usize + 1];
        let copied = gf_copy_result(buf.as_mut_ptr(), buf.len() as u32);
        assert_eq!(copied, len);
        assert_eq!(buf[len as usize], 0);
        String::from_utf8(buf[..copied as usize].to_vec()).unwrap()
    }

    fn last_error() -> String {
        let ptr = gf_get_last_error();
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    #[test]
    fn test_lifecycle_errors() {
        let _guard = serial();
        assert_eq!(gf_get_buffer_content(), -1);
        assert!(last_error().contains("not initialized"));

        assert_eq!(gf_init_headless(10, 2), 0);
        assert_eq!(gf_init_headless(10, 2), -1);
        assert!(last_error().contains("already initialized"));

        gf_clear_error();
        assert!(gf_get_last_error().is_null());
        assert_eq!(gf_shutdown(), 0);
        assert_eq!(gf_shutdown(), 0);
    }

    #[test]
    fn test_render_and_inspect() {
        let _guard = serial();
        assert_eq!(gf_init_headless(6, 2), 0);

        let (mut w, mut h) = (0, 0);
        assert_eq!(gf_get_terminal_size(&mut w, &mut h), 0);
        assert_eq!((w, h), (6, 2));

        let tree = r#"{"type": "layout", "direction": "vertical",
            "constraints": [{"length": 1}, {"length": 1}],
            "children": [
                {"type": "paragraph", "text": "top", "style": {"fg": "green"}},
                {"type": "overlay", "layers": [
                    {"type": "paragraph", "text": "bottom"},
                    {"type": "cursor", "x": 2, "y": 1}
                ]}
            ]}"#;
        assert_eq!(call_json(tree, gf_render), 0);

        let len = gf_get_buffer_content();
        assert_eq!(len, 13);
        assert_eq!(take_result(), "top   \nbottom");

        assert!(gf_get_cell_at(0, 0) > 0);
        let cell: serde_json::Value = serde_json::from_str(&take_result()).unwrap();
        assert_eq!(cell["symbol"], "t");
        assert_eq!(cell["fg"], "green");
        assert_eq!(gf_get_cell_at(6, 0), -1);

        let (mut x, mut y) = (0, 0);
        assert_eq!(gf_get_cursor_position(&mut x, &mut y), 1);
        assert_eq!((x, y), (2, 1));

        assert_eq!(call_json(r#"{"type": "spinner"}"#, gf_render), -1);
        assert!(last_error().starts_with("malformed JSON"));
        gf_shutdown();
    }

    #[test]
    fn test_inject_and_poll() {
        let _guard = serial();
        assert_eq!(gf_init_headless(4, 2), 0);
        let event = r#"{"type": "key", "code": "c", "modifiers": ["ctrl"]}"#;
        assert_eq!(call_json(event, gf_inject_event), 0);

        assert!(gf_poll_event(0) > 0);
        let polled: Event = serde_json::from_str(&take_result()).unwrap();
        assert!(polled.matches("ctrl_c"));

        assert!(gf_poll_event(-1) > 0);
        assert_eq!(take_result(), r#"{"type":"none"}"#);

        assert_eq!(call_json(r#"{"type": "key", "code": "nope"}"#, gf_inject_event), -1);
        gf_shutdown();
    }

    #[test]
    fn test_state_handles() {
        let _guard = serial();
        assert_eq!(gf_init_headless(4, 2), 0);
        let handle = call_json("list", gf_state_create);
        assert!(handle > 0);
        assert_eq!(call_json("tree", gf_state_create), 0);

        let state = r#"{"kind": "list", "selected": 2}"#;
        assert_eq!(
            gf_state_set(handle, state.as_ptr(), state.len() as u32),
            0
        );
        let tree = format!(
            r#"{{"type": "stateful", "state": {handle},
                "widget": {{"type": "list", "items": ["a", "b", "c"]}}}}"#
        );
        assert_eq!(call_json(&tree, gf_render), 0);

        assert!(gf_state_get(handle) > 0);
        let json: serde_json::Value = serde_json::from_str(&take_result()).unwrap();
        assert_eq!(json["kind"], "list");
        assert_eq!(json["selected"], 2);
        assert_eq!(json["offset"], 1);

        let wrong = r#"{"kind": "table"}"#;
        assert_eq!(gf_state_set(handle, wrong.as_ptr(), wrong.len() as u32), -1);

        let mismatch = format!(
            r#"{{"type": "stateful", "state": {handle}, "widget": {{"type": "gauge"}}}}"#
        );
        assert_eq!(call_json(&mismatch, gf_render), -1);
        assert!(last_error().starts_with("Unsupported widget/state combination"));

        assert_eq!(gf_state_destroy(handle), 0);
        assert_eq!(gf_state_destroy(handle), -1);
        assert_eq!(last_error(), format!("Invalid handle: {handle}"));
        gf_shutdown();
    }

    #[test]
    fn test_split_and_measurement() {
        let _guard = serial();
        let request = r#"{"area": {"x": 0, "y": 0, "width": 10, "height": 1},
            "direction": "horizontal", "constraints": [{"length": 3}, {"fill": 1}]}"#;
        assert!(call_json(request, gf_split) > 0);
        let rects: Vec<Rect> = serde_json::from_str(&take_result()).unwrap();
        assert_eq!(rects, vec![Rect::new(0, 0, 3, 1), Rect::new(3, 0, 7, 1)]);

        let bad = r#"{"area": {"x": 0, "y": 0, "width": 10, "height": 1},
            "constraints": [{"percentage": 101}]}"#;
        assert_eq!(call_json(bad, gf_split), -1);

        let mut width = 0;
        let text = "日本a";
        assert_eq!(gf_text_width(text.as_ptr(), text.len() as u32, &mut width), 0);
        assert_eq!(width, 5);

        let paragraph = r#"{"text": "hello world", "wrap": true}"#;
        assert_eq!(
            gf_paragraph_line_count(paragraph.as_ptr(), paragraph.len() as u32, 5),
            2
        );
    }
}
