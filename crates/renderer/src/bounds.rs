//! Pixel rectangles and dirty-region tracking.

/// Half-open pixel rectangle `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Whether the rectangle lies inside a `width x height` surface.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.left <= self.right && self.top <= self.bottom && self.right <= width && self.bottom <= height
    }
}

/// Unclamped box a point at `(x, y)` touches: `1.5 * radius` on every side,
/// truncated toward zero. Both ends are inclusive.
pub fn point_extent(x: u32, y: u32, radius: u32) -> [i64; 4] {
    extent_around(x, y, 1.5 * radius as f64)
}

/// Unclamped square reaching `reach` pixels from `(x, y)` on every side,
/// truncated toward zero. Both ends are inclusive.
pub fn extent_around(x: u32, y: u32, reach: f64) -> [i64; 4] {
    let (x, y) = (x as f64, y as f64);
    [
        (x - reach) as i64,
        (y - reach) as i64,
        (x + reach) as i64,
        (y + reach) as i64,
    ]
}

/// Clamp an inclusive extent to a `width x height` surface.
///
/// Returns `None` when nothing of the extent is on the surface.
pub fn clamp_extent(extent: [i64; 4], width: u32, height: u32) -> Option<Rect> {
    let [l, t, r, b] = extent;
    let left = l.max(0);
    let top = t.max(0);
    let right = (r + 1).min(width as i64);
    let bottom = (b + 1).min(height as i64);
    if left >= right || top >= bottom {
        return None;
    }
    Some(Rect::new(left as u32, top as u32, right as u32, bottom as u32))
}

/// Rectangle accumulated across stamps that have not been colorized yet.
///
/// Starts inverted so the first `include` simply takes the new extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyBounds {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl Default for DirtyBounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl DirtyBounds {
    pub fn empty() -> Self {
        Self {
            left: i64::MAX,
            top: i64::MAX,
            right: i64::MIN,
            bottom: i64::MIN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    /// Grow to cover an inclusive extent.
    pub fn include(&mut self, extent: [i64; 4]) {
        let [l, t, r, b] = extent;
        self.left = self.left.min(l);
        self.top = self.top.min(t);
        self.right = self.right.max(r);
        self.bottom = self.bottom.max(b);
    }

    /// Current bounds clamped to the surface.
    pub fn clamped(&self, width: u32, height: u32) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        clamp_extent([self.left, self.top, self.right, self.bottom], width, height)
    }

    pub fn reset(&mut self) {
        *self = Self::empty();
    }
}
