//! The curl mesh engine: warps a flat page rectangle into a partial cylinder
//! along a curl line and produces triangle-strip buffers for the page surface
//! plus paired drop-shadow and self-shadow strips.

use std::f64::consts::PI;

use lyon::math::Point;
use smallvec::SmallVec;

use crate::color::lerp_rgba;
use crate::page::{PageSide, TexturePage};
use crate::renderer::MathRect;
use crate::vertex::{MeshVertex, ShadowStripVertex, ShadowVertex, Vertex};

// Colors for shadow. Inner one is the color drawn next to the surface where
// the shadowed area starts and outer one is the color the shadow fades to.
const SHADOW_INNER_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
const SHADOW_OUTER_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Bounding rectangle for [`CurlMesh`].
///
/// It consists of 4 vertices:
/// `[0]` = top-left corner;
/// `[1]` = bottom-left;
/// `[2]` = top-right;
/// `[3]` = bottom-right.
#[derive(Debug)]
pub(crate) struct MeshRectangle {
    corners: [Vertex; 4],
}

impl MeshRectangle {
    pub fn new() -> Self {
        let mut corners = [Vertex::default(); 4];

        // Shadow penumbra direction for each corner. The fake self-shadow
        // calculations use these as the fall direction reference.
        corners[0].penumbra_x = -1.0;
        corners[0].penumbra_y = 1.0;
        corners[1].penumbra_x = -1.0;
        corners[1].penumbra_y = -1.0;
        corners[2].penumbra_x = 1.0;
        corners[2].penumbra_y = 1.0;
        corners[3].penumbra_x = 1.0;
        corners[3].penumbra_y = -1.0;

        Self { corners }
    }

    pub fn corner(&self, index: usize) -> Vertex {
        self.corners[index]
    }

    /// Updates mesh bounds.
    pub fn update(&mut self, r: &MathRect) {
        let (left, right) = (r.min.x as f64, r.max.x as f64);
        let (bottom, top) = (r.min.y as f64, r.max.y as f64);

        self.corners[0].pos_x = left;
        self.corners[0].pos_y = top;
        self.corners[1].pos_x = left;
        self.corners[1].pos_y = bottom;
        self.corners[2].pos_x = right;
        self.corners[2].pos_y = top;
        self.corners[3].pos_x = right;
        self.corners[3].pos_y = bottom;
    }

    /// Re-aims the corner texture coordinates, used for sideways flipping.
    pub fn set_tex_coordinates(&mut self, left: f64, top: f64, right: f64, bottom: f64) {
        self.corners[0].tex_x = left;
        self.corners[0].tex_y = top;
        self.corners[1].tex_x = left;
        self.corners[1].tex_y = bottom;
        self.corners[2].tex_x = right;
        self.corners[2].tex_y = top;
        self.corners[3].tex_x = right;
        self.corners[3].tex_y = bottom;
    }
}

/// Page mesh implementing the actual curl geometry.
///
/// The mesh owns one [`TexturePage`] and rebuilds its vertex buffers wholesale
/// on every [`curl`](CurlMesh::curl) or [`reset`](CurlMesh::reset) call; there
/// is no incremental update. Buffers are plain [`MeshVertex`] /
/// [`ShadowStripVertex`] slices ready for `bytemuck::cast_slice` into a GPU
/// vertex buffer.
///
/// When touch handling and rendering run on different threads, wrap the mesh
/// (or the [`crate::CurlView`] that owns it) in a mutex; one logical gesture
/// drives one rebuild per frame, so a coarse lock around mutation is all the
/// synchronization this type needs.
///
/// # Examples
///
/// ```
/// use folio::CurlMesh;
/// use lyon::math::{point, Box2D};
///
/// let mut mesh = CurlMesh::new(10);
/// mesh.set_rect(&Box2D::new(point(-1.0, -1.0), point(1.0, 1.0)));
/// mesh.reset();
/// assert_eq!(mesh.front_count(), 4);
///
/// mesh.curl(point(1.0, 0.0), point(1.0, 0.0), 0.3);
/// assert!(mesh.front_count() + mesh.back_count() <= mesh.max_vertex_count());
/// ```
#[derive(Debug)]
pub struct CurlMesh {
    max_curl_splits: usize,

    rectangle: MeshRectangle,
    flip_texture: bool,
    page: TexturePage,

    // Output buffers, rebuilt wholesale by curl()/reset(). Capacity is fixed
    // at construction so steady-state rebuilds do not allocate.
    vertices: Vec<MeshVertex>,
    front_count: usize,
    back_count: usize,

    drop_shadow: Vec<ShadowVertex>,
    self_shadow: Vec<ShadowVertex>,
    drop_shadow_strip: Vec<ShadowStripVertex>,
    self_shadow_strip: Vec<ShadowStripVertex>,

    scan_lines: Vec<f64>,
}

impl CurlMesh {
    /// Creates a mesh that splits the curled area into at most
    /// `max_curl_splits` bands. The bigger the value the smoother the curl,
    /// with the cost of more polygons for drawing. Values below 1 are
    /// corrected to 1.
    pub fn new(max_curl_splits: usize) -> Self {
        let max_curl_splits = max_curl_splits.max(1);

        // There are 4 vertices from the bounding rect, max 2 from adding a
        // split line to two corners, and the curl consists of max
        // max_curl_splits lines each outputting 2 vertices.
        let max_vertices = 4 + 2 + 2 * max_curl_splits;
        let max_shadow_vertices = (max_curl_splits + 2) * 2;

        let mut rectangle = MeshRectangle::new();
        rectangle.set_tex_coordinates(0.0, 0.0, 1.0, 1.0);

        Self {
            max_curl_splits,
            rectangle,
            flip_texture: false,
            page: TexturePage::new(),
            vertices: Vec::with_capacity(max_vertices),
            front_count: 0,
            back_count: 0,
            drop_shadow: Vec::with_capacity(max_shadow_vertices),
            self_shadow: Vec::with_capacity(max_shadow_vertices),
            drop_shadow_strip: Vec::with_capacity(max_shadow_vertices * 2),
            self_shadow_strip: Vec::with_capacity(max_shadow_vertices * 2),
            scan_lines: Vec::with_capacity(max_curl_splits + 1),
        }
    }

    /// The hard cap on `front_count() + back_count()`.
    pub fn max_vertex_count(&self) -> usize {
        4 + 2 + 2 * self.max_curl_splits
    }

    /// Updates mesh bounds.
    pub fn set_rect(&mut self, rect: &MathRect) {
        self.rectangle.update(rect);
    }

    /// If true, flips the texture sideways. Used for the page that shows its
    /// verso as the viewer-facing side when displayed on the left.
    pub fn set_flip_texture(&mut self, flip_texture: bool) {
        self.flip_texture = flip_texture;
        if flip_texture {
            self.rectangle.set_tex_coordinates(1.0, 0.0, 0.0, 1.0);
        } else {
            self.rectangle.set_tex_coordinates(0.0, 0.0, 1.0, 1.0);
        }
    }

    pub fn flip_texture(&self) -> bool {
        self.flip_texture
    }

    /// The textures page for this mesh.
    pub fn texture_page(&self) -> &TexturePage {
        &self.page
    }

    pub fn texture_page_mut(&mut self) -> &mut TexturePage {
        &mut self.page
    }

    /// Resets the mesh to its initial state: a plain textured rectangle of 4
    /// vertices and no shadow. Idempotent, callable any time.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.drop_shadow.clear();
        self.self_shadow.clear();
        self.drop_shadow_strip.clear();
        self.self_shadow_strip.clear();

        for i in 0..4 {
            let mut v = self.rectangle.corner(i);
            self.scale_texture_and_color(&mut v, true);
            self.push_vertex(&v);
        }

        self.front_count = 4;
        self.back_count = 0;
    }

    /// Sets curl for this mesh.
    ///
    /// `curl_pos` is a position on the curl line (any point on a line
    /// collinear to the curl works), `curl_dir` the direction the page is
    /// being pulled, `radius` the radius of the curl cylinder.
    ///
    /// A direction that cannot be normalized, or a non-positive radius,
    /// degenerates to [`reset`](CurlMesh::reset).
    pub fn curl(&mut self, curl_pos: Point, curl_dir: Point, radius: f64) {
        let dir_len =
            ((curl_dir.x as f64) * (curl_dir.x as f64) + (curl_dir.y as f64) * (curl_dir.y as f64))
                .sqrt();
        if dir_len == 0.0 || !dir_len.is_finite() || radius <= 0.0 {
            self.reset();
            return;
        }
        let dir_x = curl_dir.x as f64 / dir_len;
        let dir_y = curl_dir.y as f64 / dir_len;
        let pos_x = curl_pos.x as f64;
        let pos_y = curl_pos.y as f64;

        // Curl angle from direction.
        let mut curl_angle = dir_x.clamp(-1.0, 1.0).acos();
        if dir_y > 0.0 {
            curl_angle = -curl_angle;
        }

        // Rotated rectangle: corners translated to curl_pos and rotated so
        // the curl direction heads right, to (1, 0). Vertices are ordered by
        // descending x so that vertex 0 carries the maximum x, using y as the
        // tie-breaker in the rare case two corners share an x coordinate.
        let mut rotated: SmallVec<[Vertex; 4]> = SmallVec::new();
        for i in 0..4 {
            let mut v = self.rectangle.corner(i);
            v.translate(-pos_x, -pos_y);
            v.rotate_z(-curl_angle);

            let mut j = 0;
            while j < rotated.len() {
                let v2 = &rotated[j];
                if v.pos_x > v2.pos_x {
                    break;
                }
                if v.pos_x == v2.pos_x && v.pos_y > v2.pos_y {
                    break;
                }
                j += 1;
            }
            rotated.insert(j, v);
        }

        // Bounding edges of the rotated rectangle as vertex index pairs, each
        // ordered so the first endpoint has the larger x. After the sort,
        // corners 0 and 1 are unambiguous, but float inaccuracy can leave
        // vertex 3 somewhere other than the corner opposing vertex 0. The true
        // diagonal is the longer one, so compare distances from vertex 0 to
        // vertices 2 and 3 and swap the edge endpoints if needed.
        let mut lines: [[usize; 2]; 4] = [[0, 1], [0, 2], [1, 3], [2, 3]];
        {
            let v0 = &rotated[0];
            let v2 = &rotated[2];
            let v3 = &rotated[3];
            let dist2 = ((v0.pos_x - v2.pos_x) * (v0.pos_x - v2.pos_x)
                + (v0.pos_y - v2.pos_y) * (v0.pos_y - v2.pos_y))
                .sqrt();
            let dist3 = ((v0.pos_x - v3.pos_x) * (v0.pos_x - v3.pos_x)
                + (v0.pos_y - v3.pos_y) * (v0.pos_y - v3.pos_y))
                .sqrt();
            if dist2 > dist3 {
                lines[1][1] = 3;
                lines[2][1] = 2;
            }
        }

        self.vertices.clear();
        self.front_count = 0;
        self.back_count = 0;
        self.drop_shadow.clear();
        self.self_shadow.clear();

        // Length of the curl arc over the half cylinder.
        let curl_length = PI * radius;

        // Scan line x positions, rightmost first. The final line sits past
        // the rotated rectangle's minimum x and picks up every vertex rolled
        // completely around the cylinder.
        self.scan_lines.clear();
        self.scan_lines.push(0.0);
        for i in 1..self.max_curl_splits {
            self.scan_lines
                .push(-curl_length * i as f64 / (self.max_curl_splits - 1) as f64);
        }
        self.scan_lines.push(rotated[3].pos_x - 1.0);

        // Start from the rightmost vertex; the first scan area effectively
        // begins at infinity.
        let mut scan_x_max = rotated[0].pos_x + 1.0;
        let scan_count = self.scan_lines.len();

        for i in 0..scan_count {
            let scan_x_min = self.scan_lines[i];
            let mut band: SmallVec<[Vertex; 8]> = SmallVec::new();

            // First pick up original rectangle corners within this scan area.
            for v in rotated.iter() {
                if v.pos_x < scan_x_min || v.pos_x > scan_x_max {
                    continue;
                }

                // A corner splits the band in two; a rotated rectangle has at
                // most one extra intersection at the corner's own x. Vertices
                // are emitted in pairs ordered by y (higher first) so the
                // triangle-strip winding stays consistent.
                let isects = intersections(&rotated, &lines, v.pos_x);
                match isects.len() {
                    1 if isects[0].pos_y > v.pos_y => {
                        band.push(isects[0]);
                        band.push(*v);
                    }
                    0 | 1 => {
                        band.push(*v);
                        band.extend(isects);
                    }
                    // More than one intersecting vertex should never happen;
                    // skip the corner entirely as a fallback.
                    _ => {}
                }
            }

            // Then the scan line's own intersections with the bounding edges.
            // Expect 0 or 2; a single hit means an original corner sits
            // exactly on the scan line and was handled above already.
            let isects = intersections(&rotated, &lines, scan_x_min);
            if isects.len() == 2 {
                if isects[0].pos_y < isects[1].pos_y {
                    band.push(isects[1]);
                    band.push(isects[0]);
                } else {
                    band.push(isects[0]);
                    band.push(isects[1]);
                }
            }

            // Map this band's vertices into cylinder space and emit them.
            for mut v in band {
                let texture_front;

                if i == 0 {
                    // Untouched flat area right of the curl.
                    texture_front = true;
                    self.front_count += 1;
                } else if i == scan_count - 1 || curl_length == 0.0 {
                    // Rolled completely past the cylinder.
                    v.pos_x = -(curl_length + v.pos_x);
                    v.pos_z = 2.0 * radius;
                    v.penumbra_x = -v.penumbra_x;
                    texture_front = false;
                    self.back_count += 1;
                } else {
                    // Here v.pos_x is within [-curl_length, 0]; wrap it
                    // around the half cylinder.
                    let rot_y = PI * (v.pos_x / curl_length);
                    v.pos_x = radius * rot_y.sin();
                    v.pos_z = radius - radius * rot_y.cos();
                    v.penumbra_x *= rot_y.cos();
                    // Map the self-shading multiplier to [0.1, 1.0].
                    v.color_factor = (0.1 + 0.9 * (rot_y.sin() + 1.0).sqrt()) as f32;
                    if v.pos_z >= radius {
                        texture_front = false;
                        self.back_count += 1;
                    } else {
                        texture_front = true;
                        self.front_count += 1;
                    }
                }

                self.scale_texture_and_color(&mut v, texture_front);

                // Move the vertex back to world coordinates.
                v.rotate_z(curl_angle);
                v.translate(pos_x, pos_y);
                self.push_vertex(&v);

                // Drop shadow is cast behind the curl.
                if v.pos_z > 0.0 && v.pos_z <= radius {
                    let sv = ShadowVertex {
                        pos_x: v.pos_x,
                        pos_y: v.pos_y,
                        pos_z: v.pos_z,
                        penumbra_x: v.pos_z / 2.0 * -dir_x,
                        penumbra_y: v.pos_z / 2.0 * -dir_y,
                        penumbra_color: v.pos_z / radius,
                    };
                    let idx = (self.drop_shadow.len() + 1) / 2;
                    self.drop_shadow.insert(idx, sv);
                }

                // Self shadow is cast partly over the mesh itself.
                if v.pos_z > radius {
                    let sv = ShadowVertex {
                        pos_x: v.pos_x,
                        pos_y: v.pos_y,
                        pos_z: v.pos_z,
                        penumbra_x: (v.pos_z - radius) / 3.0 * v.penumbra_x,
                        penumbra_y: (v.pos_z - radius) / 3.0 * v.penumbra_y,
                        penumbra_color: (v.pos_z - radius) / (2.0 * radius),
                    };
                    let idx = (self.self_shadow.len() + 1) / 2;
                    self.self_shadow.insert(idx, sv);
                }
            }

            scan_x_max = scan_x_min;
        }

        debug_assert!(self.front_count + self.back_count <= self.max_vertex_count());

        self.build_shadow_strips();
    }

    /// Finished surface vertices as one continuous triangle strip.
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Number of front-facing vertices at the start of the strip.
    pub fn front_count(&self) -> usize {
        self.front_count
    }

    /// Number of back-facing vertices at the end of the strip.
    pub fn back_count(&self) -> usize {
        self.back_count
    }

    /// The back-facing draw range within [`vertices`](CurlMesh::vertices).
    ///
    /// The range reuses the last two front vertices as the strip's hinge so
    /// the surface stays continuous without a seam.
    pub fn back_range(&self) -> std::ops::Range<usize> {
        self.front_count.saturating_sub(2)..self.front_count + self.back_count
    }

    /// Drop-shadow triangle strip (cast behind the curl onto the page below).
    pub fn drop_shadow_vertices(&self) -> &[ShadowStripVertex] {
        &self.drop_shadow_strip
    }

    /// Self-shadow triangle strip (cast by the curl onto the page itself).
    pub fn self_shadow_vertices(&self) -> &[ShadowStripVertex] {
        &self.self_shadow_strip
    }

    /// Scales texture coordinates into the page's final texture area and
    /// assigns the blend color, selecting front vs. back content per vertex.
    /// The local front-facing flag is XORed with the mesh's flip setting.
    fn scale_texture_and_color(&self, v: &mut Vertex, texture_front: bool) {
        let side = if texture_front != self.flip_texture {
            PageSide::Front
        } else {
            PageSide::Back
        };
        let (area_u, area_v) = self.page.texture_area(side);
        v.tex_x *= area_u as f64;
        v.tex_y *= area_v as f64;
        v.color = self.page.color(side);
    }

    fn push_vertex(&mut self, v: &Vertex) {
        let rgba = v.color.normalize();
        self.vertices.push(MeshVertex {
            position: [v.pos_x as f32, v.pos_y as f32, v.pos_z as f32],
            color: [
                v.color_factor * rgba[0],
                v.color_factor * rgba[1],
                v.color_factor * rgba[2],
                rgba[3],
            ],
            tex_coords: [v.tex_x as f32, v.tex_y as f32],
        });
    }

    /// Expands the collected shadow vertices into strips: an inner vertex on
    /// the surface with the interpolated shadow color, paired with an outer
    /// vertex pushed out along the penumbra and fully faded.
    fn build_shadow_strips(&mut self) {
        self.drop_shadow_strip.clear();
        for sv in &self.drop_shadow {
            let color = lerp_rgba(
                SHADOW_OUTER_COLOR,
                SHADOW_INNER_COLOR,
                sv.penumbra_color as f32,
            );
            self.drop_shadow_strip.push(ShadowStripVertex {
                position: [sv.pos_x as f32, sv.pos_y as f32, sv.pos_z as f32],
                color,
            });
            self.drop_shadow_strip.push(ShadowStripVertex {
                position: [
                    (sv.pos_x + sv.penumbra_x) as f32,
                    (sv.pos_y + sv.penumbra_y) as f32,
                    sv.pos_z as f32,
                ],
                color: SHADOW_OUTER_COLOR,
            });
        }

        self.self_shadow_strip.clear();
        for sv in &self.self_shadow {
            let color = lerp_rgba(
                SHADOW_OUTER_COLOR,
                SHADOW_INNER_COLOR,
                sv.penumbra_color as f32,
            );
            self.self_shadow_strip.push(ShadowStripVertex {
                position: [sv.pos_x as f32, sv.pos_y as f32, sv.pos_z as f32],
                color,
            });
            self.self_shadow_strip.push(ShadowStripVertex {
                position: [
                    (sv.pos_x + sv.penumbra_x) as f32,
                    (sv.pos_y + sv.penumbra_y) as f32,
                    sv.pos_z as f32,
                ],
                color: SHADOW_OUTER_COLOR,
            });
        }
    }
}

/// Calculates intersections of the rectangle's bounding edges with a scan
/// line at `scan_x`. Each edge is given with its larger-x endpoint first, so
/// the test only needs to look one way.
fn intersections(
    vertices: &SmallVec<[Vertex; 4]>,
    lines: &[[usize; 2]; 4],
    scan_x: f64,
) -> SmallVec<[Vertex; 2]> {
    let mut found: SmallVec<[Vertex; 2]> = SmallVec::new();

    for line in lines {
        let v1 = &vertices[line[0]];
        let v2 = &vertices[line[1]];

        if v1.pos_x > scan_x && v2.pos_x < scan_x {
            // Coefficient telling how far scan_x is from v2 along the edge.
            let c = (scan_x - v2.pos_x) / (v1.pos_x - v2.pos_x);
            let mut n = *v2;
            n.pos_x = scan_x;
            n.pos_y += (v1.pos_y - v2.pos_y) * c;
            n.tex_x += (v1.tex_x - v2.tex_x) * c;
            n.tex_y += (v1.tex_y - v2.tex_y) * c;
            n.penumbra_x += (v1.penumbra_x - v2.penumbra_x) * c;
            n.penumbra_y += (v1.penumbra_y - v2.penumbra_y) * c;
            found.push(n);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use lyon::math::{point, Box2D};

    fn unit_rect() -> MathRect {
        Box2D::new(point(-1.0, -1.0), point(1.0, 1.0))
    }

    fn mesh_with_rect(splits: usize) -> CurlMesh {
        let mut mesh = CurlMesh::new(splits);
        mesh.set_rect(&unit_rect());
        mesh.set_flip_texture(false);
        mesh.reset();
        mesh
    }

    #[test]
    fn reset_produces_flat_quad() {
        let mesh = mesh_with_rect(10);
        assert_eq!(mesh.front_count(), 4);
        assert_eq!(mesh.back_count(), 0);
        assert_eq!(mesh.vertices().len(), 4);
        assert!(mesh.drop_shadow_vertices().is_empty());
        assert!(mesh.self_shadow_vertices().is_empty());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut mesh = mesh_with_rect(10);
        let once = mesh.vertices().to_vec();
        mesh.reset();
        assert_eq!(mesh.vertices(), once.as_slice());
        assert_eq!(mesh.front_count(), 4);
        assert_eq!(mesh.back_count(), 0);
    }

    #[test]
    fn curl_respects_vertex_capacity() {
        for &splits in &[1usize, 2, 5, 10, 25] {
            let mut mesh = mesh_with_rect(splits);
            for &radius in &[0.05, 0.3, 0.5, 1.0] {
                for &(px, dx, dy) in &[(1.0, 1.0, 0.0), (0.5, 0.8, 0.6), (0.0, 0.3, -0.9)] {
                    mesh.curl(point(px, 0.0), point(dx, dy), radius);
                    let total = mesh.front_count() + mesh.back_count();
                    assert_eq!(total, mesh.vertices().len());
                    assert!(
                        total <= 4 + 2 + 2 * splits,
                        "splits={splits} radius={radius} total={total}"
                    );
                    assert!(
                        mesh.drop_shadow_vertices().len() <= 2 * (splits + 2) * 2,
                        "drop shadow overflow"
                    );
                }
            }
        }
    }

    #[test]
    fn degenerate_direction_matches_reset() {
        let mut mesh = mesh_with_rect(10);
        let flat = mesh.vertices().to_vec();

        mesh.curl(point(0.5, 0.0), point(0.0, 0.0), 0.4);
        assert_eq!(mesh.vertices(), flat.as_slice());
        assert_eq!(mesh.front_count(), 4);
        assert_eq!(mesh.back_count(), 0);
    }

    #[test]
    fn zero_radius_matches_reset() {
        let mut mesh = mesh_with_rect(10);
        let flat = mesh.vertices().to_vec();

        mesh.curl(point(0.5, 0.0), point(1.0, 0.0), 0.0);
        assert_eq!(mesh.vertices(), flat.as_slice());

        mesh.curl(point(0.5, 0.0), point(1.0, 0.0), -1.0);
        assert_eq!(mesh.vertices(), flat.as_slice());
    }

    #[test]
    fn curl_keeps_geometry_within_curl_length_bound() {
        // Curl at the right edge of a unit rectangle, pulling right: nothing
        // may end up further left than the curl line minus the arc length.
        let mut mesh = mesh_with_rect(10);
        let radius = 0.5;
        mesh.curl(point(1.0, 0.0), point(1.0, 0.0), radius);

        let min_x = mesh
            .vertices()
            .iter()
            .map(|v| v.position[0])
            .fold(f32::INFINITY, f32::min);
        assert!(
            min_x >= (1.0 - PI * radius) as f32 - 1e-4,
            "min_x={min_x} out of bound"
        );
    }

    #[test]
    fn curl_splits_front_and_back() {
        let mut mesh = mesh_with_rect(10);
        // Curl line through the middle of the page: part of the page stays
        // flat, part wraps over the cylinder onto its back.
        mesh.curl(point(0.0, 0.0), point(1.0, 0.0), 0.25);
        assert!(mesh.front_count() > 0);
        assert!(mesh.back_count() > 0);

        let range = mesh.back_range();
        assert_eq!(range.start, mesh.front_count() - 2);
        assert_eq!(range.end, mesh.front_count() + mesh.back_count());
    }

    #[test]
    fn curl_emits_both_shadow_kinds_mid_page() {
        let mut mesh = mesh_with_rect(10);
        mesh.curl(point(0.0, 0.0), point(1.0, 0.0), 0.25);
        // Cylinder region exists on both sides of z = radius here.
        assert!(!mesh.drop_shadow_vertices().is_empty());
        assert!(!mesh.self_shadow_vertices().is_empty());

        // Strips alternate surface vertex and faded outer vertex.
        let strip = mesh.drop_shadow_vertices();
        assert_eq!(strip.len() % 2, 0);
        for pair in strip.chunks(2) {
            assert_eq!(pair[1].color, SHADOW_OUTER_COLOR);
            assert!(pair[0].color[3] > 0.0);
        }
    }

    #[test]
    fn blend_colors_follow_flip_setting() {
        let mut mesh = mesh_with_rect(10);
        mesh.texture_page_mut()
            .set_color(Color::rgb(255, 0, 0), PageSide::Front);
        mesh.texture_page_mut()
            .set_color(Color::rgb(0, 255, 0), PageSide::Back);

        mesh.reset();
        // Unflipped flat page shows the front blend color.
        assert_eq!(mesh.vertices()[0].color, [1.0, 0.0, 0.0, 1.0]);

        mesh.set_flip_texture(true);
        mesh.reset();
        assert_eq!(mesh.vertices()[0].color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn flip_texture_mirrors_texture_coordinates() {
        let mut mesh = mesh_with_rect(10);
        mesh.set_flip_texture(true);
        mesh.reset();
        // Top-left corner now samples u = 1.
        assert_eq!(mesh.vertices()[0].tex_coords, [1.0, 0.0]);

        mesh.set_flip_texture(false);
        mesh.reset();
        assert_eq!(mesh.vertices()[0].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn texture_area_scales_coordinates() {
        let mut mesh = mesh_with_rect(10);
        mesh.texture_page_mut()
            .set_texture_area((0.5, 0.25), PageSide::Both);
        mesh.reset();
        // Bottom-right corner samples the reduced texture area.
        assert_eq!(mesh.vertices()[3].tex_coords, [0.5, 0.25]);
    }

    #[test]
    fn minimum_split_count_is_enforced() {
        let mesh = CurlMesh::new(0);
        assert_eq!(mesh.max_vertex_count(), 4 + 2 + 2);
    }
}
