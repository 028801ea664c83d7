//! Display geometry and the mirror transform

/// Largest logical x coordinate (304 px wide panel)
pub const MAX_WIDTH: u16 = 303;

/// Largest logical y coordinate (256 px high panel)
pub const MAX_HEIGHT: u16 = 255;

/// A position in authoring coordinates, always inside the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    /// Create a point, clamping it onto the panel
    pub const fn new(x: u16, y: u16) -> Self {
        Self {
            x: if x > MAX_WIDTH { MAX_WIDTH } else { x },
            y: if y > MAX_HEIGHT { MAX_HEIGHT } else { y },
        }
    }

    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Translate by `origin`, staying on the panel
    pub fn offset(self, origin: Point) -> Self {
        Self::new(
            self.x.saturating_add(origin.x),
            self.y.saturating_add(origin.y),
        )
    }

    /// Device coordinates of this point
    ///
    /// Fields set past the panel edge mirror onto the edge.
    pub const fn mirrored(self) -> Self {
        Self {
            x: MAX_WIDTH.saturating_sub(self.x),
            y: MAX_HEIGHT.saturating_sub(self.y),
        }
    }
}

/// Screen padding in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Padding {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Padding {
    /// Create padding, shrinking opposing sides so the box never inverts
    pub fn new(left: u16, top: u16, right: u16, bottom: u16) -> Self {
        let left = left.min(MAX_WIDTH);
        let top = top.min(MAX_HEIGHT);
        Self {
            left,
            top,
            right: right.min(MAX_WIDTH - left),
            bottom: bottom.min(MAX_HEIGHT - top),
        }
    }

    pub fn uniform(pad: u16) -> Self {
        Self::new(pad, pad, pad, pad)
    }

    /// Top-left and bottom-right corners of the padded box
    pub fn bounds(&self) -> (Point, Point) {
        (
            Point::new(self.left, self.top),
            Point::new(MAX_WIDTH - self.right, MAX_HEIGHT - self.bottom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_clamps() {
        assert_eq!(Point::new(1000, 1000), Point::new(MAX_WIDTH, MAX_HEIGHT));
    }

    #[test]
    fn test_mirror() {
        let p = Point::new(15, 16).mirrored();
        assert_eq!(p.x, MAX_WIDTH - 15);
        assert_eq!(p.y, MAX_HEIGHT - 16);
        assert_eq!(Point::origin().mirrored(), Point::new(MAX_WIDTH, MAX_HEIGHT));
    }

    #[test]
    fn test_mirror_off_panel_point() {
        let p = Point { x: 400, y: 300 }.mirrored();
        assert_eq!(p, Point::origin());
    }

    #[test]
    fn test_offset_saturates() {
        let p = Point::new(300, 250).offset(Point::new(20, 20));
        assert_eq!(p, Point::new(MAX_WIDTH, MAX_HEIGHT));
    }

    #[test]
    fn test_padding_bounds() {
        let (tl, br) = Padding::new(10, 20, 30, 40).bounds();
        assert_eq!(tl, Point::new(10, 20));
        assert_eq!(br, Point::new(MAX_WIDTH - 30, MAX_HEIGHT - 40));
    }

    #[test]
    fn test_padding_never_inverts() {
        let pad = Padding::new(200, 200, 200, 200);
        let (tl, br) = pad.bounds();
        assert!(tl.x <= br.x);
        assert!(tl.y <= br.y);
    }
}
