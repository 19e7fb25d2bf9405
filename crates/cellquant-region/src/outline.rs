//! Outline tracing for the 2-D fast path
//!
//! For single-slice, single-frame stacks, objects are discovered by tracing
//! their outer boundaries instead of voxel-by-voxel flood fill. The tracer
//! walks the cracks between foreground and background pixels, producing a
//! closed polygon on the pixel-corner lattice; the polygon interior is then
//! rasterized (even-odd against pixel centers) to recover the point set.
//! Only outer boundaries are traced, so interior holes rasterize as part of
//! the object.

use cellquant_core::Hyperstack;

/// A 2-D plane extracted from one channel of a stack, used as the tracing
/// mask.
#[derive(Debug, Clone)]
pub struct MaskPlane {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl MaskPlane {
    /// Extract channel `channel` (0-based) of slice 0, frame 0.
    pub fn from_channel(stack: &Hyperstack, channel: usize) -> Self {
        let shape = stack.shape();
        let mut values = Vec::with_capacity(shape.width * shape.height);
        for y in 0..shape.height {
            for x in 0..shape.width {
                values.push(stack.voxel_unchecked(x, y, 0, 0, channel));
            }
        }
        Self {
            width: shape.width,
            height: shape.height,
            values,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel value; 0.0 outside the plane.
    #[inline]
    pub fn value(&self, x: i64, y: i64) -> f64 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0.0;
        }
        self.values[y as usize * self.width + x as usize]
    }

    /// Number of foreground pixels (value above zero).
    pub fn foreground_count(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0.0).count()
    }
}

/// Travel direction along pixel cracks, screen coordinates (y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Right,
    Down,
    Left,
    Up,
}

impl Dir {
    #[inline]
    fn step(self, (x, y): (i64, i64)) -> (i64, i64) {
        match self {
            Dir::Right => (x + 1, y),
            Dir::Down => (x, y + 1),
            Dir::Left => (x - 1, y),
            Dir::Up => (x, y - 1),
        }
    }

    #[inline]
    fn turn_left(self) -> Self {
        match self {
            Dir::Right => Dir::Up,
            Dir::Up => Dir::Left,
            Dir::Left => Dir::Down,
            Dir::Down => Dir::Right,
        }
    }

    #[inline]
    fn turn_right(self) -> Self {
        match self {
            Dir::Right => Dir::Down,
            Dir::Down => Dir::Left,
            Dir::Left => Dir::Up,
            Dir::Up => Dir::Right,
        }
    }

    /// The two pixels ahead of corner `(x, y)`: (left-of-travel,
    /// right-of-travel).
    #[inline]
    fn ahead(self, (x, y): (i64, i64)) -> ((i64, i64), (i64, i64)) {
        match self {
            Dir::Right => ((x, y - 1), (x, y)),
            Dir::Down => ((x, y), (x - 1, y)),
            Dir::Left => ((x - 1, y), (x - 1, y - 1)),
            Dir::Up => ((x - 1, y - 1), (x, y - 1)),
        }
    }
}

/// Closed crack-edge polygon on the pixel-corner lattice.
///
/// Vertices are stored at direction changes only; the polygon closes back
/// to the first vertex implicitly. Edges are always axis-aligned.
#[derive(Debug, Clone)]
pub struct Outline {
    vertices: Vec<(i64, i64)>,
}

impl Outline {
    /// Vertices of the polygon (corner coordinates, closed implicitly).
    #[inline]
    pub fn vertices(&self) -> &[(i64, i64)] {
        &self.vertices
    }

    /// Total crack length of the polygon (number of unit edges).
    pub fn perimeter(&self) -> usize {
        self.segments()
            .map(|((x1, y1), (x2, y2))| ((x2 - x1).abs() + (y2 - y1).abs()) as usize)
            .sum()
    }

    /// Inclusive pixel bounding box (min_x, min_y, max_x, max_y), or `None`
    /// for a degenerate outline.
    pub fn pixel_bounds(&self) -> Option<(i64, i64, i64, i64)> {
        if self.vertices.len() < 4 {
            return None;
        }
        let min_x = self.vertices.iter().map(|v| v.0).min()?;
        let min_y = self.vertices.iter().map(|v| v.1).min()?;
        let max_x = self.vertices.iter().map(|v| v.0).max()?;
        let max_y = self.vertices.iter().map(|v| v.1).max()?;
        Some((min_x, min_y, max_x - 1, max_y - 1))
    }

    /// Even-odd test of the pixel centered at `(x + 0.5, y + 0.5)`.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let mut crossings = 0usize;
        for ((x1, y1), (x2, y2)) in self.segments() {
            if x1 == x2 {
                // vertical segment crosses the scanline of row y when the
                // row center lies strictly between its endpoints
                let (lo, hi) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
                if lo <= y && y < hi && x1 <= x {
                    crossings += 1;
                }
            }
        }
        crossings % 2 == 1
    }

    /// Every pixel whose center lies inside the polygon, in row-major
    /// order. Interior holes are included.
    pub fn fill_pixels(&self) -> Vec<(i64, i64)> {
        let Some((_, min_y, _, max_y)) = self.pixel_bounds() else {
            return Vec::new();
        };
        let rows = (max_y - min_y + 1) as usize;
        let mut crossings: Vec<Vec<i64>> = vec![Vec::new(); rows];
        for ((x1, y1), (x2, y2)) in self.segments() {
            if x1 == x2 {
                let (lo, hi) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
                for y in lo..hi {
                    crossings[(y - min_y) as usize].push(x1);
                }
            }
        }

        let mut pixels = Vec::new();
        for (row, xs) in crossings.iter_mut().enumerate() {
            xs.sort_unstable();
            let y = min_y + row as i64;
            for pair in xs.chunks_exact(2) {
                for x in pair[0]..pair[1] {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    fn segments(&self) -> impl Iterator<Item = ((i64, i64), (i64, i64))> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// One traced object: its outer outline, the seed's mask value, and the
/// rasterized interior pixels.
#[derive(Debug, Clone)]
pub struct TracedObject {
    /// Mask value at the seed pixel (the object's label in label mode).
    pub label: f64,
    /// Outer boundary polygon.
    pub outline: Outline,
    /// Rasterized interior, row-major, holes included.
    pub pixels: Vec<(usize, usize)>,
}

/// Trace every object in the plane.
///
/// In binary mode an object is a connected set of pixels with value above
/// zero; in label mode it is a connected set of pixels sharing the seed's
/// exact value. `eight_connected` selects whether diagonally adjacent
/// pixels belong to the same object. Pixels enclosed by an earlier object's
/// outline (holes and anything nested inside them) are never re-traced.
pub fn trace_objects(plane: &MaskPlane, eight_connected: bool, label_mode: bool) -> Vec<TracedObject> {
    let width = plane.width as i64;
    let height = plane.height as i64;
    let mut claimed = vec![false; plane.width * plane.height];
    let mut objects = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y as usize * plane.width + x as usize;
            if claimed[idx] || plane.value(x, y) <= 0.0 {
                continue;
            }

            let label = plane.value(x, y);
            let inside = |px: i64, py: i64| {
                let v = plane.value(px, py);
                if label_mode { v == label } else { v > 0.0 }
            };

            let outline = trace_from(&inside, (x, y), eight_connected);
            let pixels: Vec<(usize, usize)> = outline
                .fill_pixels()
                .into_iter()
                .filter(|&(px, py)| px >= 0 && py >= 0 && px < width && py < height)
                .map(|(px, py)| (px as usize, py as usize))
                .collect();
            for &(px, py) in &pixels {
                claimed[py * plane.width + px] = true;
            }
            objects.push(TracedObject {
                label,
                outline,
                pixels,
            });
        }
    }
    objects
}

/// Walk the crack boundary clockwise (screen sense) from the top-left
/// corner of the seed pixel, keeping the object on the right of travel.
/// The seed's upper neighbor must be outside the object, which the
/// row-major scan in [`trace_objects`] guarantees.
fn trace_from(inside: &dyn Fn(i64, i64) -> bool, seed: (i64, i64), eight_connected: bool) -> Outline {
    let start = seed;
    let start_dir = Dir::Right;
    let mut pos = start;
    let mut dir = start_dir;
    let mut vertices = vec![start];

    loop {
        pos = dir.step(pos);
        let (la, ra) = dir.ahead(pos);
        let la_in = inside(la.0, la.1);
        let ra_in = inside(ra.0, ra.1);

        let next = match (la_in, ra_in) {
            (false, true) => dir,
            (true, true) => dir.turn_left(),
            (false, false) => dir.turn_right(),
            // checkerboard corner: the diagonal pixels touch only when
            // eight-connected
            (true, false) => {
                if eight_connected {
                    dir.turn_left()
                } else {
                    dir.turn_right()
                }
            }
        };
        if next != dir {
            vertices.push(pos);
        }
        dir = next;
        if pos == start && dir == start_dir {
            break;
        }
    }

    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    Outline { vertices }
}
