//! FFI bindings for BetterRest
//!
//! This module provides C-compatible functions for calling the engine from a
//! mobile or desktop UI. Strings returned by these functions are allocated
//! here and must be released with `betterrest_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::display::{render_bedtime, ClockStyle};
use crate::engine::BedtimeEngine;
use crate::model::ModelSource;
use crate::types::WakeTime;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Engine lifecycle
// ============================================================================

/// Opaque handle to a BedtimeEngine
pub struct BedtimeEngineHandle {
    engine: BedtimeEngine,
}

/// Create an engine.
///
/// Pass NULL for `model_json` to use the packaged model, or a model artifact
/// as a JSON string to use that instead.
///
/// # Safety
/// - `model_json` must be NULL or a valid null-terminated C string.
/// - Returns a pointer that must be freed with `betterrest_engine_free`.
/// - Returns NULL if the model cannot be loaded; call `betterrest_last_error`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_engine_new(
    model_json: *const c_char,
) -> *mut BedtimeEngineHandle {
    clear_last_error();

    let source = if model_json.is_null() {
        ModelSource::Packaged
    } else {
        match cstr_to_string(model_json) {
            Some(json) => ModelSource::Json(json),
            None => {
                set_last_error("Invalid model JSON string pointer");
                return ptr::null_mut();
            }
        }
    };

    match BedtimeEngine::from_source(&source) {
        Ok(engine) => Box::into_raw(Box::new(BedtimeEngineHandle { engine })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free an engine.
///
/// # Safety
/// - `engine` must be NULL or a pointer returned by `betterrest_engine_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn betterrest_engine_free(engine: *mut BedtimeEngineHandle) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

// ============================================================================
// Estimation
// ============================================================================

/// Estimate a bedtime.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `betterrest_engine_new`.
/// - `out_hour` and `out_minute` must be valid, writable pointers.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `betterrest_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn betterrest_estimate_bedtime(
    engine: *const BedtimeEngineHandle,
    wake_hour: i32,
    wake_minute: i32,
    sleep_hours: f64,
    coffee_cups: i32,
    out_hour: *mut i32,
    out_minute: *mut i32,
) -> i32 {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return -1;
    }
    if out_hour.is_null() || out_minute.is_null() {
        set_last_error("Null output pointer");
        return -1;
    }

    let handle = &*engine;
    let wake = WakeTime::new(wake_hour, wake_minute);

    match handle.engine.estimate_bedtime(wake, sleep_hours, coffee_cups) {
        Ok(bedtime) => {
            *out_hour = bedtime.hour as i32;
            *out_minute = bedtime.minute as i32;
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Estimate a bedtime and render it as display text.
///
/// Failures render as the fallback message, so the result is always a
/// string the UI can show; the error is still recorded for
/// `betterrest_last_error`.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `betterrest_engine_new`.
/// - Returns a newly allocated string that must be freed with `betterrest_free_string`.
/// - Returns NULL only for a NULL engine.
#[no_mangle]
pub unsafe extern "C" fn betterrest_format_bedtime(
    engine: *const BedtimeEngineHandle,
    wake_hour: i32,
    wake_minute: i32,
    sleep_hours: f64,
    coffee_cups: i32,
    twelve_hour: i32,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }

    let handle = &*engine;
    let wake = WakeTime::new(wake_hour, wake_minute);
    let result = handle.engine.estimate_bedtime(wake, sleep_hours, coffee_cups);

    if let Err(e) = &result {
        set_last_error(&e.to_string());
    }

    let style = if twelve_hour != 0 {
        ClockStyle::TwelveHour
    } else {
        ClockStyle::TwentyFourHour
    };
    string_to_cstr(&render_bedtime(Some(&result), style))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by BetterRest functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a BetterRest function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn betterrest_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next BetterRest call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn betterrest_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn betterrest_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
