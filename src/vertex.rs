use crate::color::Color;

/// Scratch vertex used while rebuilding the curl geometry.
///
/// Positions and texture coordinates are kept as `f64` through the rebuild;
/// the rotation in and out of curl space is applied to the same vertex twice
/// and `f32` drift is visible as seam flicker at the strip hinge. Values are
/// narrowed to `f32` only when written to the output buffers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Vertex {
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
    pub tex_x: f64,
    pub tex_y: f64,
    pub penumbra_x: f64,
    pub penumbra_y: f64,
    pub color: Color,
    pub color_factor: f32,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            pos_x: 0.0,
            pos_y: 0.0,
            pos_z: 0.0,
            tex_x: 0.0,
            tex_y: 0.0,
            penumbra_x: 0.0,
            penumbra_y: 0.0,
            color: Color::WHITE,
            color_factor: 1.0,
        }
    }
}

impl Vertex {
    /// Rotates position and penumbra direction around the z axis.
    pub fn rotate_z(&mut self, theta: f64) {
        let cos = theta.cos();
        let sin = theta.sin();

        let x = self.pos_x * cos + self.pos_y * sin;
        let y = self.pos_x * -sin + self.pos_y * cos;
        self.pos_x = x;
        self.pos_y = y;

        let px = self.penumbra_x * cos + self.penumbra_y * sin;
        let py = self.penumbra_x * -sin + self.penumbra_y * cos;
        self.penumbra_x = px;
        self.penumbra_y = py;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.pos_x += dx;
        self.pos_y += dy;
    }
}

/// Scratch vertex for the drop/self shadow strips.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ShadowVertex {
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
    pub penumbra_x: f64,
    pub penumbra_y: f64,
    /// Interpolation weight between the outer and inner shadow color.
    pub penumbra_color: f64,
}

/// A finished mesh vertex, laid out for direct upload to a vertex buffer.
///
/// The vertices form a triangle strip; [`crate::CurlMesh::front_count`] and
/// [`crate::CurlMesh::back_range`] describe the front- and back-facing draw
/// ranges within the strip.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Blend color premultiplied by the curl self-shading factor.
    pub color: [f32; 4],
    /// Final texture coordinates, scaled into the page's texture area.
    pub tex_coords: [f32; 2],
}

/// One vertex of a shadow triangle strip.
///
/// Shadow strips alternate between an inner vertex (on the mesh surface,
/// carrying the interpolated shadow color) and an outer vertex (offset by the
/// penumbra, fully transparent), producing a soft falloff band.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowStripVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let mut v = Vertex {
            pos_x: 1.0,
            penumbra_x: 1.0,
            ..Vertex::default()
        };
        v.rotate_z(std::f64::consts::FRAC_PI_2);
        assert_close(v.pos_x, 0.0);
        assert_close(v.pos_y, -1.0);
        assert_close(v.penumbra_x, 0.0);
        assert_close(v.penumbra_y, -1.0);
    }

    #[test]
    fn rotate_z_round_trip_restores_vertex() {
        let mut v = Vertex {
            pos_x: 0.25,
            pos_y: -0.75,
            penumbra_x: -1.0,
            penumbra_y: 1.0,
            ..Vertex::default()
        };
        v.rotate_z(1.2345);
        v.rotate_z(-1.2345);
        assert_close(v.pos_x, 0.25);
        assert_close(v.pos_y, -0.75);
        assert_close(v.penumbra_x, -1.0);
        assert_close(v.penumbra_y, 1.0);
    }

    #[test]
    fn translate_leaves_penumbra_alone() {
        let mut v = Vertex::default();
        v.translate(2.0, -3.0);
        assert_close(v.pos_x, 2.0);
        assert_close(v.pos_y, -3.0);
        assert_close(v.penumbra_x, 0.0);
    }
}
