//! GfContext struct and global state accessor.
//!
//! The context owns the session and widget states driven through the C ABI.
//! A single global instance is managed via `gf_init()` / `gf_shutdown()`.
//! The last error and the staged result live outside the context so that
//! calls made before `gf_init` can still report through them.

use std::ffi::CString;
use std::ops::{Deref, DerefMut};
use std::os::raw::c_char;
use std::sync::{Mutex, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(not(test))]
use std::thread::ThreadId;

use crate::config::TerminalOptions;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::state::StateStore;
use crate::terminal::TerminalBackend;

pub struct GfContext {
    pub session: Session<Box<dyn TerminalBackend>>,
    pub states: StateStore,
}

// SAFETY: the context is only ever touched from the thread that created it;
// `ensure_thread_affinity` rejects every other thread before the lock is
// taken. The lock guards aliasing at the FFI boundary, not concurrency.
unsafe impl Send for GfContext {}
unsafe impl Sync for GfContext {}

// ============================================================================
// Global State
// ============================================================================

static CONTEXT: OnceLock<RwLock<Option<GfContext>>> = OnceLock::new();
#[cfg(not(test))]
static OWNER_THREAD: OnceLock<RwLock<Option<ThreadId>>> = OnceLock::new();

static LAST_ERROR: Mutex<Option<CString>> = Mutex::new(None);
static STAGED_RESULT: Mutex<Vec<u8>> = Mutex::new(Vec::new());

fn context_lock() -> &'static RwLock<Option<GfContext>> {
    CONTEXT.get_or_init(|| RwLock::new(None))
}

#[cfg(not(test))]
fn owner_thread_lock() -> &'static RwLock<Option<ThreadId>> {
    OWNER_THREAD.get_or_init(|| RwLock::new(None))
}

#[cfg(test)]
fn ensure_thread_affinity() -> Result<()> {
    Ok(())
}

#[cfg(not(test))]
fn ensure_thread_affinity() -> Result<()> {
    let current = std::thread::current().id();
    let owner = owner_thread_lock()
        .read()
        .map_err(|_| Error::LockPoisoned("owner_thread"))?;
    match *owner {
        Some(owner_id) if owner_id != current => Err(Error::WrongThread),
        _ => Ok(()),
    }
}

#[cfg(not(test))]
fn bind_owner_thread_current() -> Result<()> {
    let current = std::thread::current().id();
    let mut owner = owner_thread_lock()
        .write()
        .map_err(|_| Error::LockPoisoned("owner_thread"))?;
    if let Some(owner_id) = *owner {
        if owner_id != current {
            return Err(Error::WrongThread);
        }
    }
    *owner = Some(current);
    Ok(())
}

#[cfg(test)]
fn bind_owner_thread_current() -> Result<()> {
    Ok(())
}

#[cfg(not(test))]
fn clear_owner_thread() -> Result<()> {
    let mut owner = owner_thread_lock()
        .write()
        .map_err(|_| Error::LockPoisoned("owner_thread"))?;
    *owner = None;
    Ok(())
}

#[cfg(test)]
fn clear_owner_thread() -> Result<()> {
    Ok(())
}

pub struct ContextReadGuard<'a> {
    guard: RwLockReadGuard<'a, Option<GfContext>>,
}

impl Deref for ContextReadGuard<'_> {
    type Target = GfContext;

    fn deref(&self) -> &Self::Target {
        match self.guard.as_ref() {
            Some(ctx) => ctx,
            None => unreachable!("ContextReadGuard is only constructed for initialized context"),
        }
    }
}

pub struct ContextWriteGuard<'a> {
    guard: RwLockWriteGuard<'a, Option<GfContext>>,
}

impl Deref for ContextWriteGuard<'_> {
    type Target = GfContext;

    fn deref(&self) -> &Self::Target {
        match self.guard.as_ref() {
            Some(ctx) => ctx,
            None => unreachable!("ContextWriteGuard is only constructed for initialized context"),
        }
    }
}

impl DerefMut for ContextWriteGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self.guard.as_mut() {
            Some(ctx) => ctx,
            None => unreachable!("ContextWriteGuard is only constructed for initialized context"),
        }
    }
}

/// Acquire a read lock for the global context.
pub fn context_read() -> Result<ContextReadGuard<'static>> {
    ensure_thread_affinity()?;
    let guard = context_lock()
        .read()
        .map_err(|_| Error::LockPoisoned("context"))?;
    if guard.is_none() {
        return Err(Error::NotInitialized);
    }
    Ok(ContextReadGuard { guard })
}

/// Acquire a write lock for the global context.
pub fn context_write() -> Result<ContextWriteGuard<'static>> {
    ensure_thread_affinity()?;
    let guard = context_lock()
        .write()
        .map_err(|_| Error::LockPoisoned("context"))?;
    if guard.is_none() {
        return Err(Error::NotInitialized);
    }
    Ok(ContextWriteGuard { guard })
}

/// Start a session on `backend` and install it as the global context.
pub fn init_context(backend: Box<dyn TerminalBackend>, options: TerminalOptions) -> Result<()> {
    ensure_thread_affinity()?;
    let mut guard = context_lock()
        .write()
        .map_err(|_| Error::LockPoisoned("context"))?;
    if guard.is_some() {
        return Err(Error::AlreadyInitialized);
    }
    bind_owner_thread_current()?;
    let session = match Session::new(backend, options) {
        Ok(session) => session,
        Err(e) => {
            drop(guard);
            clear_owner_thread()?;
            return Err(e);
        }
    };
    *guard = Some(GfContext {
        session,
        states: StateStore::new(),
    });
    Ok(())
}

/// Remove the global context. The caller restores its session.
pub fn destroy_context() -> Result<Option<GfContext>> {
    ensure_thread_affinity()?;
    let mut guard = context_lock()
        .write()
        .map_err(|_| Error::LockPoisoned("context"))?;
    let ctx = guard.take();
    drop(guard);
    clear_owner_thread()?;
    Ok(ctx)
}

// ============================================================================
// Last error
// ============================================================================

/// Store an error message. Interior NUL bytes are replaced.
pub fn set_last_error(msg: &str) {
    let msg = CString::new(msg.replace('\0', "\u{fffd}")).unwrap_or_default();
    if let Ok(mut slot) = LAST_ERROR.lock() {
        *slot = Some(msg);
    }
}

pub fn clear_last_error() {
    if let Ok(mut slot) = LAST_ERROR.lock() {
        *slot = None;
    }
}

/// Pointer to the NUL-terminated last error, or null when there is none.
/// Valid until the next error is stored or cleared.
pub fn last_error_ptr() -> *const c_char {
    match LAST_ERROR.lock() {
        Ok(slot) => slot.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()),
        Err(_) => std::ptr::null(),
    }
}

// ============================================================================
// Staged result
// ============================================================================

/// Replace the staged result; returns its length in bytes.
pub fn stage_result(result: String) -> Result<usize> {
    let mut slot = STAGED_RESULT
        .lock()
        .map_err(|_| Error::LockPoisoned("staged_result"))?;
    *slot = result.into_bytes();
    Ok(slot.len())
}

pub fn staged_len() -> Result<usize> {
    STAGED_RESULT
        .lock()
        .map(|slot| slot.len())
        .map_err(|_| Error::LockPoisoned("staged_result"))
}

/// Copy as much of the staged result as fits into `out`, NUL-terminating
/// when there is room. Returns the number of bytes copied.
pub fn copy_staged(out: &mut [u8]) -> Result<usize> {
    let slot = STAGED_RESULT
        .lock()
        .map_err(|_| Error::LockPoisoned("staged_result"))?;
    let n = slot.len().min(out.len());
    out[..n].copy_from_slice(&slot[..n]);
    if let Some(terminator) = out.get_mut(n) {
        *terminator = 0;
    }
    Ok(n)
}
