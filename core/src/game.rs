use rand::{RngCore, SeedableRng};

pub const SNAP_RATIO_DEFAULT: f32 = 0.22;
pub const SNAP_RATIO_MIN: f32 = 0.05;
pub const SNAP_RATIO_MAX: f32 = 0.35;

pub const KNOB_SCALE_DEFAULT: f32 = 0.2;
pub const KNOB_SCALE_MIN: f32 = 0.1;
pub const KNOB_SCALE_MAX: f32 = 0.3;

pub const EDGE_SIZE_MIN: f32 = 0.8;
pub const EDGE_SIZE_MAX: f32 = 1.2;
pub const EDGE_OFFSET_MIN: f32 = 0.35;
pub const EDGE_OFFSET_MAX: f32 = 0.65;
pub const EDGE_TILT_MAX: f32 = 0.05;

/// Upper bound on `cols * rows`; ids are stored as `u32` in snapshots.
pub const MAX_PIECES: usize = 1 << 20;

pub const DIR_UP: usize = 0;
pub const DIR_RIGHT: usize = 1;
pub const DIR_DOWN: usize = 2;
pub const DIR_LEFT: usize = 3;
pub const DIRS: [usize; 4] = [DIR_UP, DIR_RIGHT, DIR_DOWN, DIR_LEFT];

pub fn neighbor_id(id: usize, cols: usize, rows: usize, dir: usize) -> Option<usize> {
    let col = id % cols;
    let row = id / cols;
    match dir {
        DIR_UP if row > 0 => Some(id - cols),
        DIR_RIGHT if col + 1 < cols => Some(id + 1),
        DIR_DOWN if row + 1 < rows => Some(id + cols),
        DIR_LEFT if col > 0 => Some(id - 1),
        _ => None,
    }
}

pub fn opposite_dir(dir: usize) -> usize {
    match dir {
        DIR_UP => DIR_DOWN,
        DIR_RIGHT => DIR_LEFT,
        DIR_DOWN => DIR_UP,
        _ => DIR_RIGHT,
    }
}

/// Offset from a piece to its neighbor in `dir` when both sit in the solved frame.
pub fn neighbor_offset(dir: usize, piece_width: f32, piece_height: f32) -> (f32, f32) {
    match dir {
        DIR_UP => (0.0, -piece_height),
        DIR_RIGHT => (piece_width, 0.0),
        DIR_DOWN => (0.0, piece_height),
        _ => (-piece_width, 0.0),
    }
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Uniform value in `[0, 1)` built from the top 24 bits of one `u32` draw.
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    let top = rng.next_u32() >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

pub fn range<R: RngCore + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + (max - min) * unit(rng)
}

/// Counter based SplitMix32 stream.
///
/// Shapes are regenerated from a persisted seed, so the stream has to stay
/// identical across platforms and `rand` releases; the standard generators
/// make no such promise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeRng {
    state: u32,
}

impl ShapeRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl RngCore for ShapeRng {
    fn next_u32(&mut self) -> u32 {
        let out = splitmix32(self.state);
        self.state = self.state.wrapping_add(0x9E37_79B9);
        out
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand::rand_core::impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for ShapeRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
