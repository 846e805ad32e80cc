// Border following on binary edge maps
// Moore-neighbour walk over 8-connected pixels, one contour per unclaimed start pixel

use crate::geometry::Rect;
use crate::image_impl::BinaryMask;

/// Upper bound on points per traced contour. The walk has no other
/// termination guarantee on shapes that never lead back to the start.
pub const MAX_CONTOUR_POINTS: usize = 1000;

/// Contours with this many points or fewer are dropped by the tracer.
const MIN_TRACED_POINTS: usize = 3;

// 8-connectivity, clockwise starting top-left (image y grows downward)
const DIR: [(i32, i32); 8] = [
    (-1, -1), // 0: NW
    (0, -1),  // 1: N
    (1, -1),  // 2: NE
    (1, 0),   // 3: E
    (1, 1),   // 4: SE
    (0, 1),   // 5: S
    (-1, 1),  // 6: SW
    (-1, 0),  // 7: W
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<(i32, i32)>,
}

impl Contour {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<(i32, i32)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inclusive pixel bounds, so a single point has a 1×1 box.
    /// An empty contour has an all-zero box.
    pub fn bounding_box(&self) -> Rect {
        let Some(&(x0, y0)) = self.points.first() else {
            return Rect::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for &(x, y) in &self.points[1..] {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    pub fn extend(&mut self, other: &Contour) {
        self.points.extend_from_slice(&other.points);
    }
}

/// Trace contours in a binary edge map.
///
/// Interior pixels are scanned in row-major order. Each set pixel not yet
/// claimed by an earlier walk starts a new contour; the walk itself may cross
/// already-claimed pixels. Output is in scan order of the start pixels.
pub fn trace_contours(mask: &BinaryMask) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let mut contours = Vec::new();

    if width < 3 || height < 3 {
        return contours;
    }

    let mut visited = BinaryMask::new(width, height);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if !mask.get(x, y) || visited.get(x, y) {
                continue;
            }

            let contour = follow_border(mask, &mut visited, (x as i32, y as i32));
            if contour.len() > MIN_TRACED_POINTS {
                contours.push(contour);
            }
        }
    }

    contours
}

fn follow_border(mask: &BinaryMask, visited: &mut BinaryMask, start: (i32, i32)) -> Contour {
    let width = mask.width() as i32;
    let height = mask.height() as i32;

    let mut contour = Contour::new();
    let mut cur = start;
    let mut dir = 7; // first probe lands on NW

    loop {
        visited.set(cur.0 as u32, cur.1 as u32, true);
        contour.points.push(cur);

        let mut found = false;
        for _ in 0..8 {
            dir = (dir + 1) % 8;
            let (dx, dy) = DIR[dir];
            let nx = cur.0 + dx;
            let ny = cur.1 + dy;

            if nx >= 0 && nx < width && ny >= 0 && ny < height && mask.get(nx as u32, ny as u32) {
                cur = (nx, ny);
                found = true;
                // back up so the next search sweeps around the new pixel
                dir = (dir + 6) % 8;
                break;
            }
        }

        if !found || cur == start || contour.len() >= MAX_CONTOUR_POINTS {
            break;
        }
    }

    contour
}
