/// Geometry primitives for the section meshes
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a triangle whose winding agrees with its vertex normals
    pub fn oriented(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        let triangle = Self::new(v0, v1, v2);
        let smooth = v0.normal + v1.normal + v2.normal;
        if triangle.raw_normal().dot(&smooth) < 0.0 {
            Self::new(v0, v2, v1)
        } else {
            triangle
        }
    }

    fn raw_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = &self.vertices;
        (v1.position - v0.position).cross(&(v2.position - v0.position))
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let n = self.raw_normal();
        let len = n.norm();
        if len < 1e-12 {
            Vector3::zeros()
        } else {
            n / len
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.raw_normal().norm() < 1e-12
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Adds a triangle unless it collapses to a line or point (cone apex)
    fn add_face(&mut self, v0: Vertex, v1: Vertex, v2: Vertex) {
        let triangle = Triangle::oriented(v0, v1, v2);
        if !triangle.is_degenerate() {
            self.add_triangle(triangle);
        }
    }

    /// Stitches a `(rows + 1) x (cols + 1)` vertex grid into quads
    fn from_grid(grid: &[Vertex], rows: usize, cols: usize) -> Self {
        let stride = cols + 1;
        let mut mesh = Self::with_capacity(rows * cols * 2);
        for j in 1..=rows {
            for i in 1..=cols {
                let a = grid[stride * j + i - 1];
                let b = grid[stride * (j - 1) + i - 1];
                let c = grid[stride * (j - 1) + i];
                let d = grid[stride * j + i];
                mesh.add_face(a, b, d);
                mesh.add_face(b, c, d);
            }
        }
        mesh
    }

    /// Torus in the XY plane around the Z axis
    pub fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Self {
        let radial_segments = radial_segments.max(2);
        let tubular_segments = tubular_segments.max(3);
        let mut grid = Vec::with_capacity((radial_segments + 1) * (tubular_segments + 1));

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;
                let position = Point3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Point3::new(radius * u.cos(), radius * u.sin(), 0.0);
                grid.push(Vertex::from_parts(position, (position - center).normalize()));
            }
        }

        Self::from_grid(&grid, radial_segments, tubular_segments)
    }

    /// Closed cone standing on the XZ plane, apex up, centred on the origin
    pub fn cone(radius: f32, height: f32, radial_segments: usize) -> Self {
        let radial_segments = radial_segments.max(3);
        let half = height / 2.0;
        let slope = radius / height;
        let mut mesh = Self::with_capacity(radial_segments * 2);

        let rim = |x: usize| {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            (sin, cos)
        };

        for x in 0..radial_segments {
            let (s0, c0) = rim(x);
            let (s1, c1) = rim(x + 1);
            let n0 = Vector3::new(s0, slope, c0).normalize();
            let n1 = Vector3::new(s1, slope, c1).normalize();
            let apex_normal = (n0 + n1).normalize();

            // Side
            mesh.add_face(
                Vertex::from_parts(Point3::new(0.0, half, 0.0), apex_normal),
                Vertex::from_parts(Point3::new(radius * s0, -half, radius * c0), n0),
                Vertex::from_parts(Point3::new(radius * s1, -half, radius * c1), n1),
            );

            // Bottom cap
            let down = -Vector3::y();
            mesh.add_face(
                Vertex::from_parts(Point3::new(0.0, -half, 0.0), down),
                Vertex::from_parts(Point3::new(radius * s0, -half, radius * c0), down),
                Vertex::from_parts(Point3::new(radius * s1, -half, radius * c1), down),
            );
        }

        mesh
    }

    /// (p, q) torus knot with a circular tube swept along the curve
    pub fn torus_knot(
        radius: f32,
        tube: f32,
        tubular_segments: usize,
        radial_segments: usize,
        p: u32,
        q: u32,
    ) -> Self {
        let tubular_segments = tubular_segments.max(3);
        let radial_segments = radial_segments.max(3);
        let (p, q) = (p.max(1) as f32, q as f32);
        let mut grid = Vec::with_capacity((tubular_segments + 1) * (radial_segments + 1));

        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * p * TAU;
            let p1 = knot_curve(u, p, q, radius);
            let p2 = knot_curve(u + 0.01, p, q, radius);

            // Frenet-like frame
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(&n);
            let n = b.cross(&t).normalize();
            let b = b.normalize();

            for j in 0..=radial_segments {
                let v = j as f32 / radial_segments as f32 * TAU;
                let cx = -tube * v.cos();
                let cy = tube * v.sin();
                let offset = n * cx + b * cy;
                let position = Point3::from(p1 + offset);
                grid.push(Vertex::from_parts(position, offset.normalize()));
            }
        }

        Self::from_grid(&grid, tubular_segments, radial_segments)
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    /// Interleaved `[px, py, pz, nx, ny, nz]` per vertex, three vertices per triangle
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.triangles.len() * 18);
        for triangle in &self.triangles {
            for v in &triangle.vertices {
                out.extend_from_slice(&[
                    v.position.x,
                    v.position.y,
                    v.position.z,
                    v.normal.x,
                    v.normal.y,
                    v.normal.z,
                ]);
            }
        }
        out
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vector3<f32> {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vector3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}
