/// Character-cell renderer for paint-ordered frames
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point3;
use polyview_core::{projection::CELL_ASPECT, Frame, FrameObject, Rgb, Viewport};
use std::io::Write;

/// Fill characters for surfaces, from edge-on to facing the viewer
const SHADE_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Share of the screen width given to the graph area
const GRAPH_SHARE: f64 = 0.75;

const MAX_LINE_EXTENT: f64 = 100_000.0;

/// Grid lines are at least this many rows apart.
const MIN_GRID_ROWS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    colour: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    colour: Color::Reset,
};

pub fn terminal_colour(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Draws frames into a character grid, back to front
///
/// Later objects overwrite earlier ones, so with the frame in paint order
/// nearer objects cover farther ones. The right quarter of the screen lists
/// every point and the current operation.
pub struct SceneRenderer {
    width: usize,
    height: usize,
    viewport: Viewport,
    cells: Vec<Cell>,
    legend: Vec<(String, Color)>,
    status: String,
}

impl SceneRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let graph_width = (width as f64 * GRAPH_SHARE) as usize;
        Self {
            width,
            height,
            viewport: Viewport::new(graph_width, height),
            cells: vec![BLANK; graph_width * height],
            legend: Vec::new(),
            status: String::new(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
        self.legend.clear();
        self.status.clear();
    }

    pub fn render(&mut self, frame: &Frame) {
        self.clear();
        self.draw_axes();
        for object in &frame.objects {
            self.render_object(object);
        }

        let mut points: Vec<_> = frame
            .objects
            .iter()
            .flat_map(|o| o.object.points.iter())
            .collect();
        points.sort_by_key(|p| p.id);
        self.legend = points
            .into_iter()
            .map(|p| {
                let (x, y, z) = (p.position.x, p.position.y, p.position.z);
                (
                    format!("Point {}: ({x:.1}, {y:.1}, {z:.1})", p.id),
                    terminal_colour(p.colour),
                )
            })
            .collect();
        self.status = frame.status.clone();
    }

    fn render_object(&mut self, entry: &FrameObject) {
        let object = &entry.object;
        let projected: Vec<(f64, f64)> = object
            .points
            .iter()
            .map(|p| self.viewport.project(&p.position))
            .collect();
        let colour = terminal_colour(object.colour);

        for surface in &object.surfaces {
            let indices = &surface.0;
            let glyph = shade(
                &object.points[indices[0]].position,
                &object.points[indices[1]].position,
                &object.points[indices[2]].position,
            );
            // Fan out from the first corner; faces are planar and convex.
            for pair in indices[1..].windows(2) {
                let corners = [projected[indices[0]], projected[pair[0]], projected[pair[1]]];
                self.fill_triangle(&corners, Cell { glyph, colour });
            }
        }

        for edge in &object.edges {
            self.draw_line(projected[edge.0], projected[edge.1], Color::White);
        }

        for (point, &at) in object.points.iter().zip(&projected) {
            if let Some((col, row)) = self.viewport.cell(at) {
                self.put(col, row, Cell { glyph: 'o', colour: terminal_colour(point.colour) });
                for (offset, digit) in point.id.to_string().chars().enumerate() {
                    self.put(col + 1 + offset, row, Cell { glyph: digit, colour: Color::Grey });
                }
            }
        }
    }

    /// Dotted graph paper every whole number of world units, then the axes
    /// with a tick where each grid line crosses them.
    fn draw_axes(&mut self) {
        let (cx, cy) = self.viewport.centre();
        let (col, row) = (cx as usize, cy as usize);
        let spacing = (MIN_GRID_ROWS / self.viewport.scale).ceil().max(1.0);
        let row_step = spacing * self.viewport.scale;
        let grid_cols = grid_lines(cx, row_step * CELL_ASPECT, self.viewport.width);
        let grid_rows = grid_lines(cy, row_step, self.viewport.height);

        let dot = Cell { glyph: '.', colour: Color::DarkGrey };
        for &x in &grid_cols {
            for y in (0..self.viewport.height).step_by(2) {
                self.put(x, y, dot);
            }
        }
        for &y in &grid_rows {
            for x in (0..self.viewport.width).step_by(2) {
                self.put(x, y, dot);
            }
        }

        let axis = |glyph| Cell { glyph, colour: Color::DarkGrey };
        for x in 0..self.viewport.width {
            self.put(x, row, axis('-'));
        }
        for y in 0..self.viewport.height {
            self.put(col, y, axis('|'));
        }
        for &x in &grid_cols {
            self.put(x, row, axis('+'));
        }
        for &y in &grid_rows {
            self.put(col, y, axis('+'));
        }
        self.put(col, row, axis('+'));
    }

    fn put(&mut self, col: usize, row: usize, cell: Cell) {
        if col < self.viewport.width && row < self.viewport.height {
            self.cells[row * self.viewport.width + col] = cell;
        }
    }

    fn fill_triangle(&mut self, corners: &[(f64, f64); 3], cell: Cell) {
        let [v0, v1, v2] = *corners;

        // Bounding box, clipped to the graph area
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as usize;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.viewport.width as f64 - 1.0);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as usize;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.viewport.height as f64 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }

        for y in min_y..=max_y as usize {
            for x in min_x..=max_x as usize {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.put(x, y, cell);
                    }
                }
            }
        }
    }

    /// Bresenham line between two projected positions
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), colour: Color) {
        // Too far off screen to walk cell by cell
        if [from.0, from.1, to.0, to.1].iter().any(|v| !v.is_finite() || v.abs() > MAX_LINE_EXTENT) {
            return;
        }
        let (mut x0, mut y0) = (from.0.floor() as i64, from.1.floor() as i64);
        let (x1, y1) = (to.0.floor() as i64, to.1.floor() as i64);
        let glyph = line_glyph(x1 - x0, y1 - y0);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x0 >= 0 && y0 >= 0 {
                self.put(x0 as usize, y0 as usize, Cell { glyph, colour });
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let graph_width = self.viewport.width;
        let legend_width = self.width.saturating_sub(graph_width + 2);
        let status_rows = [
            ("Operation:".to_string(), Color::Yellow),
            (self.status.clone(), Color::White),
        ];
        let status_top = self.height.saturating_sub(status_rows.len());

        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for cell in &self.cells[y * graph_width..(y + 1) * graph_width] {
                if current != Some(cell.colour) {
                    writer.queue(SetForegroundColor(cell.colour))?;
                    current = Some(cell.colour);
                }
                writer.queue(Print(cell.glyph))?;
            }

            let (text, colour) = if y >= status_top {
                status_rows[y - status_top].clone()
            } else {
                // Row 0 is left for the header line.
                match y.checked_sub(1).and_then(|i| self.legend.get(i)) {
                    Some(line) => line.clone(),
                    None => (String::new(), Color::Reset),
                }
            };
            let text: String = text.chars().take(legend_width).collect();
            writer.queue(SetForegroundColor(colour))?;
            writer.queue(Print(format!("  {text:<legend_width$}")))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Glyph at a graph cell, for tests
    #[cfg(test)]
    fn glyph_at(&self, col: usize, row: usize) -> char {
        self.cells[row * self.viewport.width + col].glyph
    }
}

/// Fill character for a face, by how squarely it faces down the Z axis
fn shade(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> char {
    let normal = (b - a).cross(&(c - a));
    let length = normal.norm();
    if length < 1e-12 {
        return SHADE_RAMP[0];
    }
    let facing = (normal.z / length).abs();
    let index = (facing * (SHADE_RAMP.len() - 1) as f64).round() as usize;
    SHADE_RAMP[index.min(SHADE_RAMP.len() - 1)]
}

/// Cells `step` apart on both sides of `centre`, within `0..limit`
fn grid_lines(centre: f64, step: f64, limit: usize) -> Vec<usize> {
    let mut lines = Vec::new();
    if !(step.is_finite() && step > 0.0) {
        return lines;
    }
    let mut offset = step;
    while offset <= centre.max(limit as f64 - centre) {
        for at in [centre + offset, centre - offset] {
            if at >= 0.0 && at < limit as f64 {
                lines.push(at as usize);
            }
        }
        offset += step;
    }
    lines
}

fn line_glyph(dx: i64, dy: i64) -> char {
    if dx.abs() > 2 * dy.abs() {
        '-'
    } else if dy.abs() > 2 * dx.abs() {
        '|'
    } else if (dx > 0) != (dy > 0) {
        '/'
    } else {
        '\\'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
