use rand::Rng;
use tinysprite::coords::Viewport;

pub const GRAVITY: f32 = 0.5;
pub const BOUNCE: f32 = -0.85;
/// Upper bound on the herd.
pub const MAX_KITTENS: usize = 200_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Kitten {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Radians.
    pub rotation: f32,
    /// Sprite-sheet cell.
    pub frame: usize,
}

impl Kitten {
    fn spawn(rng: &mut impl Rng, frame: usize, tilted: bool) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: rng.random::<f32>() * 10.0,
            vy: rng.random::<f32>() * 10.0 - 5.0,
            rotation: if tilted { rng.random::<f32>() - 0.5 } else { 0.0 },
            frame,
        }
    }

    /// One fixed simulation step inside `[0, w] × [0, h]`.
    fn step(&mut self, bounds: Viewport, rng: &mut impl Rng) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;

        if self.x > bounds.width {
            self.vx = -self.vx;
            self.x = bounds.width;
        } else if self.x < 0.0 {
            self.vx = -self.vx;
            self.x = 0.0;
        }

        if self.y > bounds.height {
            self.vy *= BOUNCE;
            self.y = bounds.height;
            if rng.random::<bool>() {
                self.vy -= rng.random::<f32>() * 6.0;
            }
        } else if self.y < 0.0 {
            self.vy = 0.0;
            self.y = 0.0;
        }
    }
}

#[derive(Debug, Default)]
pub struct Herd {
    kittens: Vec<Kitten>,
}

impl Herd {
    pub fn len(&self) -> usize {
        self.kittens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Kitten> {
        self.kittens.iter()
    }

    /// Adds up to `n` kittens at the origin, capped at [`MAX_KITTENS`].
    /// Returns how many were added.
    pub fn spawn(&mut self, n: usize, frame: usize, tilted: bool, rng: &mut impl Rng) -> usize {
        let n = n.min(MAX_KITTENS - self.kittens.len());
        self.kittens
            .extend((0..n).map(|_| Kitten::spawn(rng, frame, tilted)));
        n
    }

    pub fn step(&mut self, bounds: Viewport, rng: &mut impl Rng) {
        for k in &mut self.kittens {
            k.step(bounds, rng);
        }
    }
}
