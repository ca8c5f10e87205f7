//! CPU-side 2D affine transform and its save/restore stack.

/// Maximum number of saved matrices.
pub const MAX_STACK: usize = 100;

const MAT_SIZE: usize = 6;

/// 2×3 affine matrix `[a, b, c, d, e, f]` mapping
/// `(x, y) → (a·x + c·y + e, b·x + d·y + f)`.
///
/// Every mutation composes on the right, so calls apply to the current local
/// frame in the order they are issued.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine(pub [f32; MAT_SIZE]);

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    #[inline]
    pub fn translate(&mut self, x: f32, y: f32) {
        let m = &mut self.0;
        m[4] = m[0] * x + m[2] * y + m[4];
        m[5] = m[1] * x + m[3] * y + m[5];
    }

    #[inline]
    pub fn scale(&mut self, x: f32, y: f32) {
        let m = &mut self.0;
        m[0] *= x;
        m[1] *= x;
        m[2] *= y;
        m[3] *= y;
    }

    /// Rotates by `theta` radians (clockwise on screen, since +Y is down).
    #[inline]
    pub fn rotate(&mut self, theta: f32) {
        let m = &mut self.0;
        let [a, b, c, d, ..] = *m;
        let (sr, cr) = theta.sin_cos();
        m[0] = a * cr + c * sr;
        m[1] = b * cr + d * sr;
        m[2] = a * -sr + c * cr;
        m[3] = b * -sr + d * cr;
    }

    /// Maps a local point through the matrix.
    #[inline]
    pub fn apply(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        let [a, b, c, d, e, f] = self.0;
        [x * a + y * c + e, x * b + y * d + f]
    }
}

/// Current transform plus a fixed-depth save stack.
///
/// Storage is a flat `[f32; MAX_STACK * 6]` with an explicit slot pointer; the
/// stack never allocates. Callers must balance `push`/`pop` and stay within
/// [`MAX_STACK`]. Violations trip a debug assertion; release builds only keep
/// the slice bound check.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    current: Affine,
    slots: [f32; MAX_STACK * MAT_SIZE],
    sp: usize,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            current: Affine::IDENTITY,
            slots: [0.0; MAX_STACK * MAT_SIZE],
            sp: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> &Affine {
        &self.current
    }

    /// Number of saved matrices.
    #[inline]
    pub fn depth(&self) -> usize {
        self.sp / MAT_SIZE
    }

    #[inline]
    pub fn translate(&mut self, x: f32, y: f32) {
        self.current.translate(x, y);
    }

    #[inline]
    pub fn scale(&mut self, x: f32, y: f32) {
        self.current.scale(x, y);
    }

    #[inline]
    pub fn rotate(&mut self, theta: f32) {
        self.current.rotate(theta);
    }

    #[inline]
    pub fn push(&mut self) {
        debug_assert!(self.sp < self.slots.len(), "matrix stack overflow (max {MAX_STACK})");
        self.slots[self.sp..self.sp + MAT_SIZE].copy_from_slice(&self.current.0);
        self.sp += MAT_SIZE;
    }

    #[inline]
    pub fn pop(&mut self) {
        debug_assert!(self.sp >= MAT_SIZE, "matrix stack underflow");
        self.sp -= MAT_SIZE;
        self.current.0.copy_from_slice(&self.slots[self.sp..self.sp + MAT_SIZE]);
    }
}
