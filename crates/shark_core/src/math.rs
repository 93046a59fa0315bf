//! Bridge between the external numerical library's error reporting and the
//! failure taxonomy.
//!
//! The library reports errors by calling a registered C handler and then
//! returning a non-zero status. [`library_error_handler`] is that handler: it
//! records the error for the current thread, and [`check_status`] turns the
//! status returned by the library call into a [`Failure`].

use std::cell::RefCell;
use std::ffi::CStr;

use libc::{c_char, c_int};
use tracing::warn;

use crate::error::{ExternalLibraryError, Failure, Result};

/// Status returned by the library on success.
pub const SUCCESS: i32 = 0;

thread_local! {
    static LAST_ERROR: RefCell<Option<ExternalLibraryError>> = const { RefCell::new(None) };
}

/// Text for a library error code, as the library's own `strerror` gives it.
#[must_use]
pub fn describe_errno(errno: i32) -> &'static str {
    match errno {
        0 => "success",
        -1 => "failure",
        -2 => "the iteration has not converged yet",
        1 => "input domain error",
        2 => "output range error",
        3 => "invalid pointer",
        4 => "invalid argument supplied by user",
        5 => "generic failure",
        6 => "factorization failed",
        7 => "sanity check failed - shouldn't happen",
        8 => "malloc failed",
        9 => "problem with user-supplied function",
        10 => "iterative process is out of control",
        11 => "exceeded max number of iterations",
        12 => "tried to divide by zero",
        13 => "invalid tolerance specified",
        14 => "failed to reach the specified tolerance",
        15 => "underflow",
        16 => "overflow",
        17 => "loss of accuracy",
        18 => "roundoff error",
        19 => "matrix/vector sizes are not conformant",
        20 => "matrix not square",
        21 => "apparent singularity detected",
        22 => "integral or series is divergent",
        23 => "the required feature is not supported by this hardware platform",
        24 => "the requested feature is not (yet) implemented",
        25 => "cache limit exceeded",
        26 => "table limit exceeded",
        27 => "iteration is not making progress towards solution",
        28 => "jacobian evaluations are not improving the solution",
        29 => "cannot reach the specified tolerance in F",
        30 => "cannot reach the specified tolerance in X",
        31 => "cannot reach the specified tolerance in gradient",
        32 => "end of file",
        _ => "unknown error code",
    }
}

/// Records an error reported by the library for the current thread and
/// returns it. A previously recorded, never collected error is replaced.
pub fn record_library_error(
    reason: &str,
    file: &str,
    line: i32,
    errno: i32,
) -> ExternalLibraryError {
    let err = ExternalLibraryError::new(reason, file, line, errno, describe_errno(errno));
    warn!(reason, file, line, errno, "numerical library reported an error");
    LAST_ERROR.with(|slot| {
        if let Some(previous) = slot.borrow_mut().replace(err.clone()) {
            warn!(error = %previous, "discarding uncollected numerical library error");
        }
    });
    err
}

/// Removes and returns the error recorded for the current thread, if any.
pub fn take_library_error() -> Option<ExternalLibraryError> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take())
}

/// Error handler to register with the numerical library.
///
/// It never unwinds into the caller: the error is only recorded, and picked
/// up by [`check_status`] once the library call returns.
///
/// # Safety
///
/// `reason` and `file` must each be null or point to a NUL-terminated string
/// that stays valid for the duration of the call.
pub unsafe extern "C" fn library_error_handler(
    reason: *const c_char,
    file: *const c_char,
    line: c_int,
    errno: c_int,
) {
    // SAFETY: forwarded from this function's contract
    let (reason, file) = unsafe { (lossy_string(reason), lossy_string(file)) };
    record_library_error(&reason, &file, line, errno);
}

unsafe fn lossy_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Turns the status returned by a library call into a result.
///
/// A failing status is reported with the error the handler recorded for it.
/// If the handler was not invoked (error handling disabled in the library), or
/// the recorded error carries another code, the error is built from the status
/// alone, with `context` as its reason.
pub fn check_status(status: i32, context: &str) -> Result<()> {
    if status == SUCCESS {
        return Ok(());
    }
    let err = match take_library_error() {
        Some(recorded) if recorded.errno() == status => recorded,
        stale => {
            if let Some(stale) = stale {
                warn!(
                    error = %stale,
                    status,
                    "discarding numerical library error recorded for another call"
                );
            }
            ExternalLibraryError::new(context, "<unknown>", 0, status, describe_errno(status))
        }
    };
    Err(Failure::from(err))
}
