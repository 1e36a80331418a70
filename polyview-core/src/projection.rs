/// Orthographic mapping from world space to a character grid
use nalgebra::Point3;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 2.0;

/// World units visible across the shorter side of the graph area
const VISIBLE_UNITS: f64 = 24.0;

/// Graph area on screen with the world origin at its centre
///
/// Z is dropped: there is no perspective, depth only decides draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    /// Rows per world unit. Columns per unit is this times `CELL_ASPECT`.
    pub scale: f64,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        let fit = (width as f64 / CELL_ASPECT).min(height as f64);
        Self {
            width,
            height,
            scale: (fit / VISIBLE_UNITS).max(f64::MIN_POSITIVE),
        }
    }

    pub fn centre(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Project to fractional cell coordinates; y grows downwards.
    pub fn project(&self, point: &Point3<f64>) -> (f64, f64) {
        let (cx, cy) = self.centre();
        (
            cx + point.x * self.scale * CELL_ASPECT,
            cy - point.y * self.scale,
        )
    }

    /// Whole cell containing a projected position, if it is on screen
    pub fn cell(&self, (x, y): (f64, f64)) -> Option<(usize, usize)> {
        let (col, row) = (x.floor(), y.floor());
        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some((col as usize, row as usize))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_centre() {
        let viewport = Viewport::new(96, 48);
        assert_eq!(viewport.project(&Point3::origin()), (48.0, 24.0));
        assert_eq!(viewport.cell((48.0, 24.0)), Some((48, 24)));
    }

    #[test]
    fn test_axes_and_aspect() {
        let viewport = Viewport::new(96, 48);
        assert_eq!(viewport.scale, 2.0);

        let (x, y) = viewport.project(&Point3::new(1.0, 1.0, 100.0));
        assert_eq!(x, 48.0 + 4.0);
        assert_eq!(y, 24.0 - 2.0);
    }

    #[test]
    fn test_off_screen_cells() {
        let viewport = Viewport::new(10, 10);
        assert_eq!(viewport.cell((-0.5, 3.0)), None);
        assert_eq!(viewport.cell((3.0, 10.0)), None);
        assert_eq!(viewport.cell((9.99, 0.0)), Some((9, 0)));
    }
}
