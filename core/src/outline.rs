use std::fmt::Write;

use crate::edge::EdgeDescriptor;
use crate::layout::PieceRecord;

/// Samples taken per cubic segment when flattening a knob.
pub const CURVE_STEPS: usize = 12;
/// Half the neck width as a fraction of the piece's smaller dimension.
pub const KNOB_NECK_RATIO: f32 = 0.1;
/// Where the neck curve leaves and rejoins the straight edge.
const SHOULDER_IN: f32 = 0.2;
const SHOULDER_OUT: f32 = 0.8;
/// Peak of the head curve in units of its control depth.
const HEAD_PEAK: f32 = 2.5;
/// Deepest a knob may reach, as a fraction of the piece's smaller dimension.
/// Deeper heads on two sides that meet at a corner can cross each other.
pub const KNOB_DEPTH_MAX_RATIO: f32 = 0.22;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    fn around(points: &[(f32, f32)]) -> Self {
        let mut bounds = Bounds {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        };
        for &(x, y) in points {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        bounds
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Closed outline of one piece in piece-local coordinates (origin at the
/// top-left corner of its cell), walked clockwise on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    points: Vec<(f32, f32)>,
    edges: [Vec<(f32, f32)>; 4],
    bounds: Bounds,
}

impl Outline {
    /// Polygon vertices; the closing segment back to the first point is implied.
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Polyline of one side, from its starting corner to its ending corner.
    pub fn edge(&self, dir: usize) -> &[(f32, f32)] {
        &self.edges[dir]
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Even-odd containment test in piece-local coordinates.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        if !self.bounds.contains(x, y) {
            return false;
        }
        let mut inside = false;
        let count = self.points.len();
        let mut j = count - 1;
        for i in 0..count {
            let (xi, yi) = self.points[i];
            let (xj, yj) = self.points[j];
            if (yi > y) != (yj > y) {
                let cross_x = xj + (y - yj) * (xi - xj) / (yi - yj);
                if x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// SVG path data, offset by `origin`.
    pub fn to_svg_path(&self, origin: (f32, f32)) -> String {
        let mut path = String::new();
        for (idx, &(x, y)) in self.points.iter().enumerate() {
            let cmd = if idx == 0 { "M" } else { " L" };
            let _ = write!(
                path,
                "{cmd} {} {}",
                fmt_f32(origin.0 + x),
                fmt_f32(origin.1 + y)
            );
        }
        path.push_str(" Z");
        path
    }
}

pub fn fmt_f32(value: f32) -> String {
    format!("{:.3}", value)
}

pub fn cubic_point(
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    t: f32,
) -> (f32, f32) {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    let uuu = uu * u;
    let ttt = tt * t;
    (
        uuu * p0.0 + 3.0 * uu * t * p1.0 + 3.0 * u * tt * p2.0 + ttt * p3.0,
        uuu * p0.1 + 3.0 * uu * t * p1.1 + 3.0 * u * tt * p2.1 + ttt * p3.1,
    )
}

/// Height a knob reaches beyond (or into) its edge line, capped at
/// [`KNOB_DEPTH_MAX_RATIO`].
pub fn knob_height(piece_width: f32, piece_height: f32, knob_scale: f32, size: f32) -> f32 {
    piece_width.min(piece_height) * (knob_scale * size).min(KNOB_DEPTH_MAX_RATIO)
}

/// Control points of one knob in edge space: `u` is the fraction along the
/// edge, `v` the signed distance outward from the edge line.
///
/// The ten points are symmetric about the knob centre, so the knob built from
/// `(1 - offset, -tilt)` and walked backwards lands on the same curve.
pub fn knob_controls(
    edge: &EdgeDescriptor,
    edge_len: f32,
    min_dim: f32,
    knob_scale: f32,
) -> [(f32, f32); 10] {
    let c = edge.offset;
    let d = edge.tilt;
    let s = KNOB_NECK_RATIO * edge.size * min_dim / edge_len;
    let t = knob_height(min_dim, min_dim, knob_scale, edge.size) / HEAD_PEAK
        * edge.kind.protrusion();
    [
        (0.0, 0.0),
        (SHOULDER_IN, 0.0),
        (c + d, -t),
        (c - s, t),
        (c - 2.0 * s - d, 3.0 * t),
        (c + 2.0 * s - d, 3.0 * t),
        (c + s, t),
        (c + d, -t),
        (SHOULDER_OUT, 0.0),
        (1.0, 0.0),
    ]
}

/// Samples of one side in edge space, excluding its starting point.
fn edge_samples(
    edge: &EdgeDescriptor,
    edge_len: f32,
    min_dim: f32,
    knob_scale: f32,
) -> Vec<(f32, f32)> {
    if edge.is_flat() {
        return vec![(1.0, 0.0)];
    }
    let p = knob_controls(edge, edge_len, min_dim, knob_scale);
    let mut samples = Vec::with_capacity(CURVE_STEPS * 3);
    for seg in [[p[0], p[1], p[2], p[3]], [p[3], p[4], p[5], p[6]], [p[6], p[7], p[8], p[9]]] {
        for step in 1..=CURVE_STEPS {
            let t = step as f32 / CURVE_STEPS as f32;
            samples.push(cubic_point(seg[0], seg[1], seg[2], seg[3], t));
        }
    }
    samples
}

/// Builds the clockwise outline of `piece` from its four oriented edges.
pub fn build_outline(piece: &PieceRecord, knob_scale: f32) -> Outline {
    let w = piece.width;
    let h = piece.height;
    let min_dim = w.min(h);
    let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];

    let mut points = Vec::new();
    let mut edges: [Vec<(f32, f32)>; 4] = Default::default();
    for (dir, edge) in piece.edges.iter().enumerate() {
        let start = corners[dir];
        let end = corners[(dir + 1) % 4];
        let edge_len = if dir % 2 == 0 { w } else { h };
        let along = ((end.0 - start.0) / edge_len, (end.1 - start.1) / edge_len);
        let outward = (along.1, -along.0);

        let mut side = Vec::with_capacity(CURVE_STEPS * 3 + 1);
        side.push(start);
        for (u, v) in edge_samples(edge, edge_len, min_dim, knob_scale) {
            side.push((
                start.0 + along.0 * u * edge_len + outward.0 * v,
                start.1 + along.1 * u * edge_len + outward.1 * v,
            ));
        }
        // corners are exact even when the last sample rounds off
        if let Some(last) = side.last_mut() {
            *last = end;
        }
        points.extend_from_slice(&side[..side.len() - 1]);
        edges[dir] = side;
    }
    let bounds = Bounds::around(&points);
    Outline {
        points,
        edges,
        bounds,
    }
}
