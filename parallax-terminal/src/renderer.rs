/// ASCII rasterizer for the toon scene
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use parallax_core::{CameraRig, Color, PerspectiveCamera, Scene, Triangle};
use std::io::Write;

/// Character luminosity ramp for toon bands (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph used for particles
const PARTICLE: char = '·';

/// ASCII renderer that converts the scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::WHITE; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::WHITE);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Color)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    /// Rasterize every section mesh and particle seen from the rig
    pub fn render_scene(&mut self, scene: &Scene, rig: &CameraRig) {
        self.clear();
        let view = PerspectiveCamera::view_matrix(&rig.world_position());

        for mesh in &scene.meshes {
            let model = mesh.model_matrix();
            let material = mesh.material.borrow();
            let model_view = view * model;

            for triangle in &mesh.geometry.triangles {
                let normal = model.transform_vector(&triangle.calculate_normal());
                let tone = material.tone(normal.dot(&scene.light.direction()));
                let color = material
                    .color
                    .modulate(scene.light.color)
                    .scale(scene.light.intensity * tone);
                self.render_triangle(triangle, &model_view, &rig.camera, glyph(tone), color);
            }
        }

        if let Some(particles) = &scene.particles {
            for point in &particles.positions {
                if let Some((x, y, depth)) =
                    rig.camera
                        .project_to_screen(point, &view, self.width, self.height)
                {
                    self.plot(x as i32, y as i32, depth, PARTICLE, particles.material.color);
                }
            }
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_view: &Matrix4<f32>,
        camera: &PerspectiveCamera,
        character: char,
        color: Color,
    ) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(&vertex.position, model_view, self.width, self.height) {
                Some(coords) => *slot = coords,
                None => return, // Behind the camera
            }
        }

        self.rasterize_triangle(&screen_coords, character, color);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        if !(-1.0..=1.0).contains(&depth) {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(u8, u8, u8)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let rgb = self.color_buffer[idx].to_rgb8();
                if current != Some(rgb) {
                    let (r, g, b) = rgb;
                    writer.queue(SetForegroundColor(TermColor::Rgb { r, g, b }))?;
                    current = Some(rgb);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a toon tone in [0, 1] to a ramp character; unlit faces stay visible
fn glyph(tone: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (tone.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
