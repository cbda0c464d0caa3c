//! Browser frontend: WebGL2 rendering of the scroll-driven toon scene.
//!
//! JavaScript calls [`start`] with the id of a fixed, transparent canvas that
//! sits behind the page's scrolling sections.

pub mod shaders;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod gl;

#[cfg(target_arch = "wasm32")]
pub use app::{start, WebApp};
#[cfg(target_arch = "wasm32")]
pub use gl::GlRenderer;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Runs when the module loads
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("parallax-web initialized");
}
