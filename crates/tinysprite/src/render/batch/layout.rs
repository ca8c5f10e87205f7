//! Vertex layouts: how one quad's corners are encoded into vertex records.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, UvRect, Vec2};
use crate::paint::PackedColor;
use crate::render::transform::Affine;

use super::buffers::VERTICES_PER_QUAD;

/// Strategy for encoding a quad into vertex records.
///
/// The batcher is generic over this; each implementation pairs a vertex type
/// with the WGSL that consumes it.
pub trait VertexLayout {
    type Vertex: Pod;

    /// Per-quad transform input.
    type Params;

    /// Used in GPU object labels.
    const NAME: &'static str;
    const SHADER: &'static str;
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    /// Writes the four corners of `rect` (in [`Rect::corners`] order).
    fn write_quad(
        out: &mut [Self::Vertex; VERTICES_PER_QUAD],
        rect: Rect,
        uv: UvRect,
        params: &Self::Params,
        color: PackedColor,
    );

    fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self::Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

// ── variant A: transform applied on the CPU ───────────────────────────────

/// Vertex layout (20 bytes):
///
///  offset  0  position  [f32; 2]   loc 0
///  offset  8  uv        [f32; 2]   loc 1
///  offset 16  color     u32        loc 2 (unorm8x4)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: u32,
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // uv
        2 => Unorm8x4   // color
    ];
}

/// Positions are pre-transformed by the current affine matrix.
pub struct AffineLayout;

impl VertexLayout for AffineLayout {
    type Vertex = SpriteVertex;
    type Params = Affine;

    const NAME: &'static str = "sprite";
    const SHADER: &'static str = include_str!("../shaders/sprite.wgsl");
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &SpriteVertex::ATTRS;

    #[inline]
    fn write_quad(
        out: &mut [SpriteVertex; VERTICES_PER_QUAD],
        rect: Rect,
        uv: UvRect,
        params: &Affine,
        color: PackedColor,
    ) {
        let color = color.bits();
        for ((v, p), t) in out.iter_mut().zip(rect.corners()).zip(uv.corners()) {
            *v = SpriteVertex {
                position: params.apply(p),
                uv: t,
                color,
            };
        }
    }
}

// ── variant B: transform applied in the vertex shader ─────────────────────

/// Rotation, translation and scale for one quad, applied on the GPU as
/// `R(rotation) · (local · scale) + translation`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InstanceTransform {
    /// Radians.
    pub rotation: f32,
    pub translation: Vec2,
    pub scale: Vec2,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl InstanceTransform {
    pub const IDENTITY: InstanceTransform = InstanceTransform {
        rotation: 0.0,
        translation: Vec2::zero(),
        scale: Vec2::splat(1.0),
    };

    #[inline]
    pub const fn new(rotation: f32, tx: f32, ty: f32, sx: f32, sy: f32) -> Self {
        Self {
            rotation,
            translation: Vec2::new(tx, ty),
            scale: Vec2::new(sx, sy),
        }
    }

    /// CPU reference of the shader math, for tests and hit-testing.
    pub fn apply(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        let (s, c) = self.rotation.sin_cos();
        let (lx, ly) = (x * self.scale.x, y * self.scale.y);
        [
            lx * c - ly * s + self.translation.x,
            lx * s + ly * c + self.translation.y,
        ]
    }
}

/// Vertex layout (40 bytes):
///
///  offset  0  rotation     f32        loc 0
///  offset  4  translation  [f32; 2]   loc 1
///  offset 12  scale        [f32; 2]   loc 2
///  offset 20  position     [f32; 2]   loc 3
///  offset 28  uv           [f32; 2]   loc 4
///  offset 36  color        u32        loc 5 (unorm8x4)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceVertex {
    pub rotation: f32,
    pub translation: [f32; 2],
    pub scale: [f32; 2],
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: u32,
}

impl InstanceVertex {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32,   // rotation
        1 => Float32x2, // translation
        2 => Float32x2, // scale
        3 => Float32x2, // local position
        4 => Float32x2, // uv
        5 => Unorm8x4   // color
    ];
}

/// Raw local corners plus per-quad transform attributes.
pub struct InstanceLayout;

impl VertexLayout for InstanceLayout {
    type Vertex = InstanceVertex;
    type Params = InstanceTransform;

    const NAME: &'static str = "instance";
    const SHADER: &'static str = include_str!("../shaders/instance.wgsl");
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &InstanceVertex::ATTRS;

    #[inline]
    fn write_quad(
        out: &mut [InstanceVertex; VERTICES_PER_QUAD],
        rect: Rect,
        uv: UvRect,
        params: &InstanceTransform,
        color: PackedColor,
    ) {
        let rotation = params.rotation;
        let translation = params.translation.to_array();
        let scale = params.scale.to_array();
        let color = color.bits();
        for ((v, p), t) in out.iter_mut().zip(rect.corners()).zip(uv.corners()) {
            *v = InstanceVertex {
                rotation,
                translation,
                scale,
                position: p,
                uv: t,
                color,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_vertex_is_five_words() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 20);
        assert_eq!(AffineLayout::buffer_layout().array_stride, 20);
    }

    #[test]
    fn instance_vertex_is_ten_words() {
        assert_eq!(std::mem::size_of::<InstanceVertex>(), 40);
        assert_eq!(InstanceLayout::buffer_layout().array_stride, 40);
    }

    #[test]
    fn attribute_offsets_match_struct_layout() {
        let offs: Vec<u64> = InstanceLayout::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offs, [0, 4, 12, 20, 28, 36]);
        let offs: Vec<u64> = AffineLayout::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offs, [0, 8, 16]);
    }

    #[test]
    fn affine_write_transforms_every_corner() {
        let mut out = [SpriteVertex::zeroed(); 4];
        let mut m = Affine::IDENTITY;
        m.translate(100.0, 10.0);
        let color = PackedColor::from_rgba8(9, 8, 7, 6);
        AffineLayout::write_quad(&mut out, Rect::new(0.0, 0.0, 4.0, 2.0), UvRect::FULL, &m, color);

        let pos: Vec<[f32; 2]> = out.iter().map(|v| v.position).collect();
        assert_eq!(pos, [[100.0, 10.0], [104.0, 12.0], [100.0, 12.0], [104.0, 10.0]]);
        assert!(out.iter().all(|v| v.color == color.bits()));
    }

    #[test]
    fn instance_write_keeps_local_positions() {
        let mut out = [InstanceVertex::zeroed(); 4];
        let t = InstanceTransform::new(0.5, 30.0, 40.0, 2.0, 3.0);
        let uv = UvRect::new(0.0, 0.25, 1.0, 0.5);
        InstanceLayout::write_quad(&mut out, Rect::new(-16.0, 0.0, 32.0, 32.0), uv, &t, PackedColor::WHITE);

        assert_eq!(out[0].position, [-16.0, 0.0]);
        assert_eq!(out[1].position, [16.0, 32.0]);
        assert_eq!(out[2].uv, [0.0, 0.5]);
        assert_eq!(out[3].uv, [1.0, 0.25]);
        for v in &out {
            assert_eq!(v.rotation, 0.5);
            assert_eq!(v.translation, [30.0, 40.0]);
            assert_eq!(v.scale, [2.0, 3.0]);
        }
    }

    #[test]
    fn instance_transform_scales_before_rotating() {
        let t = InstanceTransform::new(std::f32::consts::FRAC_PI_2, 10.0, 0.0, 2.0, 1.0);
        let [x, y] = t.apply([1.0, 0.0]);
        assert!((x - 10.0).abs() < 1e-5);
        assert!((y - 2.0).abs() < 1e-5);
    }
}
