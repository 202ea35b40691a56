//! WebAssembly bindings for crossreduce
//!
//! Exposes the reorder engine to a JavaScript host as a single buffer-in,
//! buffer-out call, matching the native `reorder` entry point.

use wasm_bindgen::prelude::*;

use crate::engine::reorder as reorder_inner;

/// Sets up the panic hook and browser-console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = crate::logging::init_logging(Some("info"), None);
}

/// Reorder the ranks described by `buffer` in place to reduce weighted
/// bilayer crossings. See the crate-level docs for the buffer layout.
///
/// Throws a JavaScript error if the buffer is malformed.
#[wasm_bindgen]
pub fn reorder_buffer(num_ranks: u32, buffer: &mut [i32]) -> Result<(), JsValue> {
    reorder_inner(num_ranks as usize, 0, 0, buffer).map_err(|e| JsValue::from_str(&e.to_string()))
}
