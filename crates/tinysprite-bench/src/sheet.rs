//! Procedural kitten sprite sheet: four 32×32 cells stacked vertically.

use tinysprite::coords::UvRect;
use tinysprite::paint::PackedColor;

pub const CELL: u32 = 32;
pub const FRAMES: usize = 4;
pub const WIDTH: u32 = CELL;
pub const HEIGHT: u32 = CELL * FRAMES as u32;

const TINTS: [PackedColor; FRAMES] = [
    PackedColor::from_rgba8(240, 170, 90, 255),
    PackedColor::from_rgba8(200, 200, 210, 255),
    PackedColor::from_rgba8(90, 90, 100, 255),
    PackedColor::from_rgba8(250, 230, 200, 255),
];

/// UVs of cell `frame` (wrapped into range).
pub fn frame_uv(frame: usize) -> UvRect {
    let y = (frame % FRAMES) as u32 * CELL;
    UvRect::from_frame(WIDTH, HEIGHT, 0.0, y as f32, CELL as f32, CELL as f32)
}

/// RGBA8 pixels, `WIDTH * HEIGHT * 4` bytes, transparent background.
pub fn generate() -> Vec<u8> {
    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    for (frame, tint) in TINTS.iter().enumerate() {
        let y0 = frame as u32 * CELL;
        for y in 0..CELL {
            for x in 0..CELL {
                if let Some(shade) = kitten_shade(x as f32 + 0.5, y as f32 + 0.5) {
                    let i = (((y0 + y) * WIDTH + x) * 4) as usize;
                    pixels[i..i + 4].copy_from_slice(&shaded(*tint, shade).to_rgba8());
                }
            }
        }
    }
    pixels
}

/// `tint` with its color channels scaled by `shade`; alpha is kept.
fn shaded(tint: PackedColor, shade: f32) -> PackedColor {
    let [r, g, b, a] = tint.to_rgba8();
    let s = |c: u8| (c as f32 * shade) as u8;
    PackedColor::from_rgba8(s(r), s(g), s(b), a)
}

/// Brightness of the silhouette at cell-local `(x, y)`, `None` outside it.
fn kitten_shade(x: f32, y: f32) -> Option<f32> {
    let (cx, cy, r) = (16.0, 19.0, 11.0);
    let (dx, dy) = (x - cx, y - cy);

    let eye = |ex: f32| (x - ex).powi(2) + (y - 17.0).powi(2) < 4.0;
    if eye(12.0) || eye(20.0) {
        return Some(0.15);
    }
    if dx * dx + dy * dy <= r * r {
        return Some(1.0);
    }

    // Ears: triangles above the head, apex up.
    let ear = |ax: f32| {
        let t = (y - 3.0) / 9.0;
        (0.0..=1.0).contains(&t) && (x - ax).abs() <= t * 5.0
    };
    if ear(8.5) || ear(23.5) {
        return Some(0.8);
    }
    None
}
