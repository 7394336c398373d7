//! Browser build support. Without a hook, a panic in WASM aborts silently; this routes the message
//! to the developer console instead.

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}
