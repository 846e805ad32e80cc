// FFI bindings for C/C++/C#
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::slice;

use crate::{ConeColor, ConeDetector, DetectedCone, DetectorConfig};

/// Opaque handle to a ConeDetector instance
pub struct CTHandle {
    inner: ConeDetector,
}

/// C-compatible detection
#[repr(C)]
pub struct CDetectedCone {
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
    /// 0 = yellow, 1 = blue
    pub label: c_int,
}

/// Create a detector with the default configuration
#[no_mangle]
pub extern "C" fn conetrace_new() -> *mut CTHandle {
    Box::into_raw(Box::new(CTHandle {
        inner: ConeDetector::default(),
    }))
}

/// Create a detector from a JSON config file. Returns null on failure.
///
/// # Safety
/// config_path must be a valid null-terminated UTF-8 string
#[no_mangle]
pub unsafe extern "C" fn conetrace_new_with_config(config_path: *const c_char) -> *mut CTHandle {
    if config_path.is_null() {
        return std::ptr::null_mut();
    }

    let path = match CStr::from_ptr(config_path).to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    match DetectorConfig::from_json_file(path) {
        Ok(cfg) => Box::into_raw(Box::new(CTHandle {
            inner: ConeDetector::new(cfg),
        })),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Detect cones in a tightly packed row-major RGB buffer of `width * height * 3` bytes
///
/// # Safety
/// - handle must be a valid pointer returned from conetrace_new
/// - data must point to at least width * height * 3 readable bytes
/// - results_out will be allocated and must be freed with conetrace_free_results
#[no_mangle]
pub unsafe extern "C" fn conetrace_detect_rgb(
    handle: *const CTHandle,
    data: *const u8,
    width: u32,
    height: u32,
    results_out: *mut *mut CDetectedCone,
    count_out: *mut usize,
) -> c_int {
    if handle.is_null() || data.is_null() || results_out.is_null() || count_out.is_null() {
        return -1;
    }

    let len = width as usize * height as usize * 3;
    let buffer = slice::from_raw_parts(data, len).to_vec();
    let img = match crate::from_rgb8(width, height, buffer) {
        Ok(img) => img,
        Err(_) => return -2,
    };

    let output = (*handle).inner.run(&img);
    write_results(output.cones, results_out, count_out);
    0
}

/// Detect cones in an image file
///
/// # Safety
/// - handle must be a valid pointer returned from conetrace_new
/// - image_path must be a valid null-terminated UTF-8 string
/// - results_out will be allocated and must be freed with conetrace_free_results
#[no_mangle]
pub unsafe extern "C" fn conetrace_detect_file(
    handle: *const CTHandle,
    image_path: *const c_char,
    results_out: *mut *mut CDetectedCone,
    count_out: *mut usize,
) -> c_int {
    if handle.is_null() || image_path.is_null() || results_out.is_null() || count_out.is_null() {
        return -1;
    }

    let path = match CStr::from_ptr(image_path).to_str() {
        Ok(s) => s,
        Err(_) => return -2,
    };

    let output = match (*handle).inner.detect_file(path) {
        Ok(o) => o,
        Err(_) => return -3,
    };

    write_results(output.cones, results_out, count_out);
    0
}

/// Free results returned from conetrace_detect_*
///
/// # Safety
/// - results must be a pointer returned from conetrace_detect_rgb or conetrace_detect_file
/// - count must match the count returned alongside it
#[no_mangle]
pub unsafe extern "C" fn conetrace_free_results(results: *mut CDetectedCone, count: usize) {
    if results.is_null() {
        return;
    }
    drop(Box::from_raw(slice::from_raw_parts_mut(results, count) as *mut [CDetectedCone]));
}

/// Free a detector
///
/// # Safety
/// handle must be a valid pointer returned from conetrace_new
#[no_mangle]
pub unsafe extern "C" fn conetrace_free(handle: *mut CTHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Get library version
#[no_mangle]
pub extern "C" fn conetrace_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

unsafe fn write_results(
    cones: Vec<DetectedCone>,
    results_out: *mut *mut CDetectedCone,
    count_out: *mut usize,
) {
    let c_results = cones_to_c(cones).into_boxed_slice();
    *count_out = c_results.len();
    *results_out = Box::into_raw(c_results) as *mut CDetectedCone;
}

fn cones_to_c(cones: Vec<DetectedCone>) -> Vec<CDetectedCone> {
    cones
        .into_iter()
        .map(|c| CDetectedCone {
            x: c.bounding_box.x,
            y: c.bounding_box.y,
            width: c.bounding_box.width,
            height: c.bounding_box.height,
            label: match c.label {
                ConeColor::Yellow => 0,
                ConeColor::Blue => 1,
            },
        })
        .collect()
}
