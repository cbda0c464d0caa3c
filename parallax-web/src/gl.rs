use anyhow::{anyhow, Context, Result};
use js_sys::Float32Array;
use parallax_core::{CameraRig, GradientMap, PerspectiveCamera, Renderer, Scene, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::shaders::{
    MESH_STRIDE, NORMAL_LOCATION, POINTS_FRAGMENT, POINTS_VERTEX, POSITION_LOCATION,
    TOON_FRAGMENT, TOON_VERTEX,
};

pub(crate) fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(kind).context("unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(anyhow!("shader compile failed: {}", log))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl.create_program().context("unable to create program")?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(anyhow!("program link failed: {}", log))
    }
}

fn upload(gl: &GL, data: &[f32]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().context("unable to create buffer")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let array = Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    Ok(buffer)
}

fn attribute(gl: &GL, location: u32, stride: i32, offset: i32) {
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, 3, GL::FLOAT, false, stride, offset);
}

struct Uniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
    light_intensity: Option<WebGlUniformLocation>,
    light_direction: Option<WebGlUniformLocation>,
    gradient: Option<WebGlUniformLocation>,
    has_gradient: Option<WebGlUniformLocation>,
    size: Option<WebGlUniformLocation>,
    scale: Option<WebGlUniformLocation>,
    attenuate: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            model: at("u_model"),
            view: at("u_view"),
            projection: at("u_projection"),
            color: at("u_color"),
            light_color: at("u_light_color"),
            light_intensity: at("u_light_intensity"),
            light_direction: at("u_light_direction"),
            gradient: at("u_gradient"),
            has_gradient: at("u_has_gradient"),
            size: at("u_size"),
            scale: at("u_scale"),
            attenuate: at("u_attenuate"),
        }
    }
}

struct GpuMesh {
    vao: WebGlVertexArrayObject,
    _buffer: WebGlBuffer,
    vertex_count: i32,
}

/// WebGL2 renderer for the toon scene; geometry is uploaded once at start
pub struct GlRenderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    toon: WebGlProgram,
    toon_uniforms: Uniforms,
    points: WebGlProgram,
    points_uniforms: Uniforms,
    meshes: Vec<GpuMesh>,
    particles: Option<GpuMesh>,
    gradient: Option<WebGlTexture>,
    uploaded_texels: Option<Vec<u8>>,
    /// CSS height of the canvas
    height: f32,
    pixel_ratio: f32,
}

impl GlRenderer {
    pub fn new(canvas: HtmlCanvasElement, scene: &Scene) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(js_err)?
            .context("WebGL2 not supported")?
            .dyn_into()
            .map_err(|_| anyhow!("context is not WebGL2"))?;

        let toon = link_program(&gl, TOON_VERTEX, TOON_FRAGMENT)?;
        let points = link_program(&gl, POINTS_VERTEX, POINTS_FRAGMENT)?;
        let toon_uniforms = Uniforms::locate(&gl, &toon);
        let points_uniforms = Uniforms::locate(&gl, &points);

        let mut meshes = Vec::with_capacity(scene.meshes.len());
        for mesh in &scene.meshes {
            let vao = gl.create_vertex_array().context("unable to create VAO")?;
            gl.bind_vertex_array(Some(&vao));
            let buffer = upload(&gl, &mesh.geometry.interleaved())?;
            attribute(&gl, POSITION_LOCATION, MESH_STRIDE, 0);
            attribute(&gl, NORMAL_LOCATION, MESH_STRIDE, 12);
            meshes.push(GpuMesh {
                vao,
                _buffer: buffer,
                vertex_count: mesh.geometry.vertex_count() as i32,
            });
        }

        let particles = match &scene.particles {
            Some(field) => {
                let vao = gl.create_vertex_array().context("unable to create VAO")?;
                gl.bind_vertex_array(Some(&vao));
                let buffer = upload(&gl, &field.flat_positions())?;
                attribute(&gl, POSITION_LOCATION, 0, 0);
                Some(GpuMesh {
                    vao,
                    _buffer: buffer,
                    vertex_count: field.positions.len() as i32,
                })
            }
            None => None,
        };
        gl.bind_vertex_array(None);

        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::CULL_FACE);

        Ok(Self {
            gl,
            canvas,
            toon,
            toon_uniforms,
            points,
            points_uniforms,
            meshes,
            particles,
            gradient: None,
            uploaded_texels: None,
            height: 0.0,
            pixel_ratio: 1.0,
        })
    }

    /// Keep the bound gradient texture in step with the material's gradient map
    fn sync_gradient(&mut self, map: Option<&GradientMap>) -> Result<()> {
        let texels = map.map(GradientMap::texels);
        if texels == self.uploaded_texels.as_deref() {
            return Ok(());
        }

        let Some(map) = map else {
            if let Some(texture) = self.gradient.take() {
                self.gl.delete_texture(Some(&texture));
            }
            self.uploaded_texels = None;
            return Ok(());
        };

        let gl = &self.gl;
        let texture = match self.gradient.take() {
            Some(texture) => texture,
            None => gl.create_texture().context("unable to create texture")?,
        };
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.pixel_storei(GL::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::R8 as i32,
            map.width() as i32,
            1,
            0,
            GL::RED,
            GL::UNSIGNED_BYTE,
            Some(map.texels()),
        )
        .map_err(js_err)?;

        // Nearest filtering and no mipmap chain keep the toon bands hard
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::NEAREST as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::NEAREST as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        self.gradient = Some(texture);
        self.uploaded_texels = Some(map.texels().to_vec());
        Ok(())
    }
}

impl Renderer for GlRenderer {
    type Error = anyhow::Error;

    fn resize(&mut self, viewport: &Viewport) -> Result<()> {
        let (width, height) = viewport.surface_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let style = self.canvas.style();
        style
            .set_property("width", &format!("{}px", viewport.width))
            .map_err(js_err)?;
        style
            .set_property("height", &format!("{}px", viewport.height))
            .map_err(js_err)?;
        self.gl.viewport(0, 0, width as i32, height as i32);
        self.height = viewport.height;
        self.pixel_ratio = viewport.pixel_ratio();
        Ok(())
    }

    fn render(&mut self, scene: &Scene, rig: &CameraRig, _viewport: &Viewport) -> Result<()> {
        {
            let material = scene.material.borrow();
            self.sync_gradient(material.gradient_map.as_ref())?;
        }

        let gl = &self.gl;
        let view = PerspectiveCamera::view_matrix(&rig.world_position());
        let projection = rig.camera.projection_matrix();

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        // Section meshes
        let u = &self.toon_uniforms;
        gl.use_program(Some(&self.toon));
        gl.uniform_matrix4fv_with_f32_array(u.view.as_ref(), false, view.as_slice());
        gl.uniform_matrix4fv_with_f32_array(u.projection.as_ref(), false, projection.as_slice());
        gl.uniform3fv_with_f32_array(u.light_color.as_ref(), &scene.light.color.to_array());
        gl.uniform1f(u.light_intensity.as_ref(), scene.light.intensity);
        gl.uniform3fv_with_f32_array(u.light_direction.as_ref(), scene.light.direction().as_slice());
        gl.uniform1i(u.has_gradient.as_ref(), self.gradient.is_some() as i32);
        if let Some(texture) = &self.gradient {
            gl.active_texture(GL::TEXTURE0);
            gl.bind_texture(GL::TEXTURE_2D, Some(texture));
            gl.uniform1i(u.gradient.as_ref(), 0);
        }

        for (mesh, gpu) in scene.meshes.iter().zip(&self.meshes) {
            let model = mesh.model_matrix();
            gl.uniform_matrix4fv_with_f32_array(u.model.as_ref(), false, model.as_slice());
            gl.uniform3fv_with_f32_array(u.color.as_ref(), &mesh.material.borrow().color.to_array());
            gl.bind_vertex_array(Some(&gpu.vao));
            gl.draw_arrays(GL::TRIANGLES, 0, gpu.vertex_count);
        }

        // Particles
        if let (Some(field), Some(gpu)) = (&scene.particles, &self.particles) {
            let u = &self.points_uniforms;
            gl.use_program(Some(&self.points));
            gl.uniform_matrix4fv_with_f32_array(u.view.as_ref(), false, view.as_slice());
            gl.uniform_matrix4fv_with_f32_array(u.projection.as_ref(), false, projection.as_slice());
            gl.uniform3fv_with_f32_array(u.color.as_ref(), &field.material.color.to_array());
            gl.uniform1f(u.size.as_ref(), field.material.size * self.pixel_ratio);
            gl.uniform1f(u.scale.as_ref(), self.height * 0.5);
            gl.uniform1i(u.attenuate.as_ref(), field.material.size_attenuation as i32);
            gl.bind_vertex_array(Some(&gpu.vao));
            gl.draw_arrays(GL::POINTS, 0, gpu.vertex_count);
        }

        gl.bind_vertex_array(None);
        Ok(())
    }
}
