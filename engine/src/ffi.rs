//! FFI layer for the mobile app.
//!
//! This module provides C-compatible functions that the React Native
//! layer calls through its native bridge. All data crosses the boundary as
//! JSON strings.
//!
//! # Memory Management
//!
//! - Strings returned by `carhire_*` functions are allocated by Rust
//! - Caller must free them with `carhire_string_free`
//! - Garage pointers must be freed with `carhire_garage_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure, plus `"fieldErrors": [...]` when a
//!   form failed validation

use crate::{
    filter::filter, CarDraft, CarListing, Error, FilterCriteria, FilterOptions, Garage,
    GarageEvent, GarageSnapshot, IdGenerator, IdStrategy, ParseWarning, ValidationErrors,
};
use serde::Serialize;
use std::ffi::{c_char, CStr, CString};
use std::ptr;

/// Result wrapper for FFI responses.
#[derive(Serialize)]
#[serde(untagged)]
enum FfiResult<T: Serialize> {
    Ok {
        ok: T,
    },
    Err {
        error: String,
        #[serde(rename = "fieldErrors", skip_serializing_if = "Option::is_none")]
        field_errors: Option<ValidationErrors>,
    },
}

impl<T: Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
            field_errors: None,
        }
    }

    fn from_error(error: Error) -> Self {
        let field_errors = match &error {
            Error::Validation(errors) => Some(errors.clone()),
            _ => None,
        };
        FfiResult::Err {
            error: error.to_string(),
            field_errors,
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `carhire_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            // String contained null bytes - return error JSON
            CString::from(c"{\"error\":\"string contained null bytes\"}").into_raw()
        }
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn error_response(message: impl Into<String>) -> *mut c_char {
    to_c_string(FfiResult::<()>::err(message).to_json())
}

fn respond<T: Serialize>(result: crate::error::Result<T>) -> *mut c_char {
    match result {
        Ok(value) => to_c_string(FfiResult::ok(value).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::from_error(e).to_json()),
    }
}

/// Parse a JSON argument, or produce the error response to return.
unsafe fn parse_arg<T: serde::de::DeserializeOwned>(
    ptr: *const c_char,
    what: &str,
) -> Result<T, *mut c_char> {
    let raw = from_c_string(ptr).ok_or_else(|| error_response(format!("invalid {what} JSON")))?;
    serde_json::from_str(&raw).map_err(|e| error_response(format!("parse error: {}", e)))
}

// ============================================================================
// Filtering
// ============================================================================

#[derive(Serialize)]
struct FilterResponse<'a> {
    cars: Vec<&'a CarListing>,
    warnings: Vec<ParseWarning>,
}

/// Filter an inventory.
///
/// # Arguments
/// - `inventory_json`: JSON array of CarListing
/// - `criteria_json`: JSON FilterCriteria (missing fields mean no constraint)
///
/// # Returns
/// JSON string: `{"ok": {"cars": [...], "warnings": [...]}}` or `{"error": "message"}`
///
/// # Safety
/// - `inventory_json` and `criteria_json` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_filter(
    inventory_json: *const c_char,
    criteria_json: *const c_char,
) -> *mut c_char {
    let inventory: Vec<CarListing> = match parse_arg(inventory_json, "inventory") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let criteria: FilterCriteria = match parse_arg(criteria_json, "criteria") {
        Ok(c) => c,
        Err(response) => return response,
    };

    let response = FilterResponse {
        cars: filter(&inventory, &criteria),
        warnings: criteria.rating_warnings(),
    };
    to_c_string(FfiResult::ok(response).to_json())
}

/// Get the choices offered by the filter UI.
///
/// # Returns
/// JSON string: `{"ok": FilterOptions}`. Caller must free it with
/// `carhire_string_free`.
#[no_mangle]
pub extern "C" fn carhire_filter_options() -> *mut c_char {
    to_c_string(FfiResult::ok(FilterOptions::default()).to_json())
}

// ============================================================================
// Garage Lifecycle
// ============================================================================

/// Create a new, empty garage.
///
/// # Arguments
/// - `id_strategy`: `"timestamp"` or `"uuid"`; null selects `"timestamp"`
///
/// # Returns
/// Pointer to Garage, or null for an unknown strategy.
///
/// # Safety
/// - `id_strategy` must be a valid null-terminated C string or null
/// - Caller must free the returned pointer with `carhire_garage_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_new(id_strategy: *const c_char) -> *mut Garage {
    let strategy = match from_c_string(id_strategy) {
        None => IdStrategy::default(),
        Some(s) => match s.parse::<IdStrategy>() {
            Ok(strategy) => strategy,
            Err(_) => return ptr::null_mut(),
        },
    };

    let garage = Garage::with_ids(IdGenerator::with_strategy(strategy));
    Box::into_raw(Box::new(garage))
}

/// Free a garage.
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_free(garage: *mut Garage) {
    if !garage.is_null() {
        drop(Box::from_raw(garage));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `carhire_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn carhire_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ============================================================================
// Garage Operations
// ============================================================================

/// Apply an add/edit form submission.
///
/// # Arguments
/// - `garage`: Garage pointer
/// - `draft_json`: JSON CarDraft
/// - `is_edit_mode`: non-zero for edit
/// - `timestamp`: Timestamp in milliseconds
///
/// # Returns
/// JSON string: `{"ok": UpsertOutcome}` or `{"error": "message", "fieldErrors": [...]}`
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - `draft_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_upsert(
    garage: *mut Garage,
    draft_json: *const c_char,
    is_edit_mode: i32,
    timestamp: u64,
) -> *mut c_char {
    let garage = match garage.as_mut() {
        Some(g) => g,
        None => return error_response("null garage pointer"),
    };
    let draft: CarDraft = match parse_arg(draft_json, "draft") {
        Ok(d) => d,
        Err(response) => return response,
    };

    respond(garage.upsert(draft, is_edit_mode != 0, timestamp))
}

/// Remove a car. Unknown ids are not an error.
///
/// # Returns
/// JSON string: `{"ok": true}` if a car was removed, `{"ok": false}` otherwise
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - `id` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_remove(garage: *mut Garage, id: *const c_char) -> *mut c_char {
    let garage = match garage.as_mut() {
        Some(g) => g,
        None => return error_response("null garage pointer"),
    };
    let id = match from_c_string(id) {
        Some(s) => s,
        None => return error_response("invalid car id"),
    };

    to_c_string(FfiResult::ok(garage.remove(&id).is_some()).to_json())
}

/// Attach a photo to a car.
///
/// # Returns
/// JSON string: `{"ok": <photo count>}` or `{"error": "message", "fieldErrors": [...]}`
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - `id` and `uri` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_add_photo(
    garage: *mut Garage,
    id: *const c_char,
    uri: *const c_char,
) -> *mut c_char {
    let garage = match garage.as_mut() {
        Some(g) => g,
        None => return error_response("null garage pointer"),
    };
    let (id, uri) = match (from_c_string(id), from_c_string(uri)) {
        (Some(id), Some(uri)) => (id, uri),
        _ => return error_response("invalid car id or photo uri"),
    };

    respond(garage.add_photo(&id, uri))
}

/// Apply a garage event.
///
/// # Arguments
/// - `event_json`: JSON GarageEvent
/// - `timestamp`: Timestamp in milliseconds
///
/// # Returns
/// JSON string: `{"ok": EventOutcome}` or `{"error": "message"}`
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - `event_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_apply(
    garage: *mut Garage,
    event_json: *const c_char,
    timestamp: u64,
) -> *mut c_char {
    let garage = match garage.as_mut() {
        Some(g) => g,
        None => return error_response("null garage pointer"),
    };
    let event: GarageEvent = match parse_arg(event_json, "event") {
        Ok(e) => e,
        Err(response) => return response,
    };

    respond(garage.apply(event, timestamp))
}

/// List all cars in insertion order.
///
/// # Returns
/// JSON string: `{"ok": [OwnedCar, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_list(garage: *const Garage) -> *mut c_char {
    match garage.as_ref() {
        Some(g) => to_c_string(FfiResult::ok(g.cars()).to_json()),
        None => error_response("null garage pointer"),
    }
}

/// Search cars by brand or model.
///
/// # Returns
/// JSON string: `{"ok": [OwnedCar, ...]}` or `{"error": "message"}`
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - `query` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_search(
    garage: *const Garage,
    query: *const c_char,
) -> *mut c_char {
    let garage = match garage.as_ref() {
        Some(g) => g,
        None => return error_response("null garage pointer"),
    };
    let query = match from_c_string(query) {
        Some(q) => q,
        None => return error_response("invalid query"),
    };

    to_c_string(FfiResult::ok(garage.search(&query)).to_json())
}

/// Get the number of cars.
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_len(garage: *const Garage) -> i64 {
    match garage.as_ref() {
        Some(g) => g.len() as i64,
        None => -1,
    }
}

/// Export garage state as a snapshot.
///
/// # Returns
/// JSON string: `{"ok": GarageSnapshot}` or `{"error": "message"}`
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_export(garage: *const Garage) -> *mut c_char {
    match garage.as_ref() {
        Some(g) => to_c_string(FfiResult::ok(g.export_state()).to_json()),
        None => error_response("null garage pointer"),
    }
}

/// Import garage state from a snapshot.
///
/// # Arguments
/// - `snapshot_json`: JSON string of GarageSnapshot
///
/// # Returns
/// JSON string: `{"ok": null}` or `{"error": "message"}`
///
/// # Safety
/// - `garage` must be a valid pointer from `carhire_garage_new` or null
/// - `snapshot_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `carhire_string_free`
#[no_mangle]
pub unsafe extern "C" fn carhire_garage_import(
    garage: *mut Garage,
    snapshot_json: *const c_char,
) -> *mut c_char {
    let garage = match garage.as_mut() {
        Some(g) => g,
        None => return error_response("null garage pointer"),
    };
    let snapshot_str = match from_c_string(snapshot_json) {
        Some(s) => s,
        None => return error_response("invalid snapshot JSON"),
    };

    let result =
        GarageSnapshot::from_json(&snapshot_str).and_then(|snapshot| garage.import_state(snapshot));
    respond(result)
}

// ============================================================================
// Utility
// ============================================================================

/// Get the engine version.
///
/// # Returns
/// Static string pointer (do not free)
#[no_mangle]
pub extern "C" fn carhire_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

/// Get the snapshot format version.
#[no_mangle]
pub extern "C" fn carhire_snapshot_format_version() -> u32 {
    crate::SNAPSHOT_FORMAT_VERSION
}
