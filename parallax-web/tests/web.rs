#![cfg(target_arch = "wasm32")]

use parallax_web::{start, WebApp};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document.create_element("canvas").unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
}

fn launch(id: &str, variant: &str) -> WebApp {
    mount_canvas(id);
    // No gradient fetch in tests
    let config = r#"{ "gradient_url": null }"#.to_string();
    start(id, Some(variant.to_string()), Some(config)).unwrap()
}

#[wasm_bindgen_test]
fn test_start_rejects_missing_canvas() {
    assert!(start("does-not-exist", None, None).is_err());
}

#[wasm_bindgen_test]
fn test_start_rejects_unknown_variant() {
    mount_canvas("bad-variant");
    assert!(start("bad-variant", Some("cubist".to_string()), None).is_err());
}

#[wasm_bindgen_test]
fn test_sections_variant_exposes_both_colours() {
    let app = launch("sections", "sections");
    assert_eq!(app.material_color().as_deref(), Some("#ffeded"));
    assert_eq!(app.particles_color().as_deref(), Some("#ffeded"));
    assert_eq!(app.current_section(), Some(0));

    app.set_material_color("#ff0000").unwrap();
    assert_eq!(app.material_color().as_deref(), Some("#ff0000"));
    assert!(app.set_particles_color("not a colour").is_err());
}

#[wasm_bindgen_test]
fn test_classic_variant_has_no_particles() {
    let app = launch("classic", "classic");
    assert!(app.particles_color().is_none());
    assert!(app.current_section().is_none());
    assert!(app.set_parameter("materialColor", "#00ff00").is_ok());
    assert!(app.set_parameter("wireframe", "#00ff00").is_err());
}
