/// Example: print a single frame of the scene without taking over the terminal
///
/// Usage: cargo run --example snapshot -- [scroll-pages] [seconds]
use parallax_core::{Animator, SceneConfig, Variant};
use parallax_terminal::{terminal_viewport, AsciiRenderer};
use std::env;
use std::io::{self, Write};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let pages: f32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0.0);
    let seconds: f32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1.0);

    let (cols, rows) = (100u16, 32u16);
    let viewport = terminal_viewport(cols, rows);
    let mut animator = Animator::new(SceneConfig::default(), Variant::Sections, viewport, None);

    animator.on_scroll(pages * viewport.height);
    // Replay at 60 Hz so tweens and smoothing settle as they would live
    let frames = (seconds * 60.0).round() as usize;
    for _ in 0..frames {
        animator.step(1.0 / 60.0);
    }

    let mut renderer = AsciiRenderer::new(cols as usize, rows as usize);
    renderer.render_scene(animator.scene(), animator.rig());

    let mut out = io::stdout();
    renderer.draw(&mut out)?;
    writeln!(
        out,
        "\nsection {:?}, camera y {:.2}",
        animator.current_section(),
        animator.rig().camera.position.y
    )?;
    out.flush()
}
