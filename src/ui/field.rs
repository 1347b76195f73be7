use std::collections::HashMap;
use std::f64::consts::TAU;

use ratatui::prelude::*;

use asteroids::sim::{AsteroidSize, EntityView, Shape, Vector2};
use asteroids::{Snapshot, WORLD_SIZE};

const BACKGROUND: Color = Color::Rgb(5, 5, 15);

const SHIP_HULL: [((f64, f64), (f64, f64)); 3] = [
    ((-10.0, -8.0), (10.0, 0.0)),
    ((-10.0, 8.0), (10.0, 0.0)),
    ((-6.0, -6.0), (-6.0, 6.0)),
];

const SHIP_FLAME: [((f64, f64), (f64, f64)); 2] = [
    ((-6.0, -6.0), (-12.0, 0.0)),
    ((-6.0, 6.0), (-12.0, 0.0)),
];

/// Per-vertex radius multipliers, evenly spaced around the rock. Each tier
/// gets its own lumpy outline.
const LARGE_OUTLINE: [f64; 11] = [1.0, 0.82, 0.95, 0.74, 0.92, 1.0, 0.8, 0.9, 0.72, 0.96, 0.86];
const MEDIUM_OUTLINE: [f64; 9] = [0.95, 0.78, 1.0, 0.84, 0.9, 0.76, 1.0, 0.82, 0.93];
const SMALL_OUTLINE: [f64; 7] = [1.0, 0.8, 0.92, 0.75, 0.98, 0.85, 0.9];

type DotMap = HashMap<(usize, usize), u8>;

/// Maps world units onto braille dots for a `width` x `height` cell area.
struct Canvas {
    w: usize,
    h: usize,
    bw: i32,
    bh: i32,
    sx: f64,
    sy: f64,
    grid: Vec<Vec<(char, Style)>>,
}

impl Canvas {
    fn new(w: usize, h: usize) -> Self {
        let bw = (w * 2) as i32;
        let bh = (h * 4) as i32;
        let mut grid = vec![vec![(' ', Style::default().bg(BACKGROUND)); w]; h];

        // Sparse background stars
        for (yi, row) in grid.iter_mut().enumerate() {
            for (xi, cell) in row.iter_mut().enumerate() {
                let hash = ((xi * 7 + yi * 13 + 37) * 31) % 250;
                if hash < 2 {
                    let b = 35 + (hash as u8) * 15;
                    *cell = ('.', Style::default().fg(Color::Rgb(b, b, b + 8)).bg(BACKGROUND));
                }
            }
        }

        Self {
            w,
            h,
            bw,
            bh,
            sx: f64::from(bw) / WORLD_SIZE,
            sy: f64::from(bh) / WORLD_SIZE,
            grid,
        }
    }

    fn to_dots(&self, x: f64, y: f64) -> (i32, i32) {
        ((x * self.sx).floor() as i32, (y * self.sy).floor() as i32)
    }

    fn set_dot(&self, map: &mut DotMap, bx: i32, by: i32) {
        if bx < 0 || by < 0 || bx >= self.bw || by >= self.bh {
            return;
        }
        let (bx, by) = (bx as usize, by as usize);
        *map.entry((bx / 2, by / 4)).or_insert(0) |= braille_bit(bx % 2, by % 4);
    }

    fn line(&self, map: &mut DotMap, from: Vector2, to: Vector2) {
        let (x0, y0) = self.to_dots(from.x, from.y);
        let (x1, y1) = self.to_dots(to.x, to.y);
        for (px, py) in line_cells(x0, y0, x1, y1) {
            self.set_dot(map, px, py);
        }
    }

    /// Writes a dot layer in one colour, merging with braille already in a cell.
    fn write_layer(&mut self, map: &DotMap, color: Color, bold: bool) {
        let mut style = Style::default().fg(color).bg(BACKGROUND);
        if bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        for (&(cx, cy), &bits) in map {
            if cx >= self.w || cy >= self.h || bits == 0 {
                continue;
            }
            let existing = self.grid[cy][cx].0 as u32;
            let merged = if (0x2800..0x2900).contains(&existing) {
                (existing - 0x2800) as u8 | bits
            } else {
                bits
            };
            let ch = char::from_u32(0x2800 + u32::from(merged)).unwrap_or(' ');
            self.grid[cy][cx] = (ch, style);
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        self.grid
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

fn line_cells(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut cx, mut cy) = (x0, y0);
    loop {
        cells.push((cx, cy));
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
    cells
}

/// Offsets at which an entity is drawn. Anything within `radius` of an edge
/// is repeated on the opposite side so it slides across the seam.
fn mirror_offsets(position: Vector2, radius: f64) -> Vec<Vector2> {
    let shifts = |v: f64| {
        let mut out = vec![0.0];
        if v < radius {
            out.push(WORLD_SIZE);
        }
        if v > WORLD_SIZE - radius {
            out.push(-WORLD_SIZE);
        }
        out
    };
    let xs = shifts(position.x);
    let ys = shifts(position.y);
    xs.iter()
        .flat_map(|&dx| ys.iter().map(move |&dy| Vector2::new(dx, dy)))
        .collect()
}

/// Local ship-space point rotated by `rotation` and moved to `origin`.
fn place(origin: Vector2, rotation: f64, (x, y): (f64, f64)) -> Vector2 {
    let (sin, cos) = rotation.sin_cos();
    Vector2::new(origin.x + x * cos - y * sin, origin.y + x * sin + y * cos)
}

fn asteroid_color(size: AsteroidSize, seed: u64) -> Color {
    match size {
        AsteroidSize::Large => match seed % 3 {
            0 => Color::Rgb(170, 150, 120),
            1 => Color::Rgb(150, 140, 110),
            _ => Color::Rgb(160, 145, 115),
        },
        AsteroidSize::Medium => match seed % 3 {
            0 => Color::Rgb(190, 170, 140),
            1 => Color::Rgb(180, 165, 135),
            _ => Color::Rgb(185, 168, 138),
        },
        AsteroidSize::Small => match seed % 3 {
            0 => Color::Rgb(210, 190, 160),
            1 => Color::Rgb(200, 185, 155),
            _ => Color::Rgb(205, 188, 158),
        },
    }
}

fn outline(size: AsteroidSize) -> &'static [f64] {
    match size {
        AsteroidSize::Large => &LARGE_OUTLINE,
        AsteroidSize::Medium => &MEDIUM_OUTLINE,
        AsteroidSize::Small => &SMALL_OUTLINE,
    }
}

/// Outline vertices in world space, spun by the asteroid's rotation.
fn asteroid_verts(origin: Vector2, rotation: f64, size: AsteroidSize) -> Vec<Vector2> {
    let scales = outline(size);
    scales
        .iter()
        .enumerate()
        .map(|(i, scale)| {
            let angle = rotation + TAU * i as f64 / scales.len() as f64;
            place(origin, angle, (size.radius() * scale, 0.0))
        })
        .collect()
}

fn draw_asteroid(canvas: &mut Canvas, view: &EntityView, size: AsteroidSize) {
    let mut map = DotMap::new();
    for offset in mirror_offsets(view.position, view.radius) {
        let mut origin = view.position;
        origin.add(offset);
        let verts = asteroid_verts(origin, view.rotation, size);
        for i in 0..verts.len() {
            canvas.line(&mut map, verts[i], verts[(i + 1) % verts.len()]);
        }
    }
    canvas.write_layer(&map, asteroid_color(size, view.id.0), false);
}

fn draw_bullet(canvas: &mut Canvas, view: &EntityView) {
    let mut map = DotMap::new();
    for offset in mirror_offsets(view.position, view.radius) {
        let (bx, by) = canvas.to_dots(view.position.x + offset.x, view.position.y + offset.y);
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            canvas.set_dot(&mut map, bx + dx, by + dy);
        }
    }
    canvas.write_layer(&map, Color::Rgb(255, 255, 80), true);
}

fn draw_ship(canvas: &mut Canvas, snapshot: &Snapshot, view: &EntityView) {
    let Shape::Ship { thrusting, animation_frame } = view.shape else {
        return;
    };
    let mut hull = DotMap::new();
    let mut flame = DotMap::new();
    let show_hull = snapshot.hull_visible(animation_frame);
    let show_flame = snapshot.flame_visible(thrusting, animation_frame);

    for offset in mirror_offsets(view.position, view.radius) {
        let mut origin = view.position;
        origin.add(offset);
        if show_hull {
            for (a, b) in SHIP_HULL {
                canvas.line(&mut hull, place(origin, view.rotation, a), place(origin, view.rotation, b));
            }
        }
        if show_flame {
            for (a, b) in SHIP_FLAME {
                canvas.line(&mut flame, place(origin, view.rotation, a), place(origin, view.rotation, b));
            }
        }
    }

    let hull_color = if thrusting {
        Color::Rgb(100, 230, 255)
    } else {
        Color::Rgb(80, 255, 140)
    };
    canvas.write_layer(&hull, hull_color, true);

    // Flame never overwrites hull cells
    for key in hull.keys() {
        flame.remove(key);
    }
    let flicker = if animation_frame % 3 == 0 {
        Color::Rgb(255, 200, 60)
    } else {
        Color::Rgb(255, 130, 30)
    };
    canvas.write_layer(&flame, flicker, false);
}

/// Rasterises the snapshot into `height` lines of `width` braille cells.
pub fn render_field(snapshot: &Snapshot, width: usize, height: usize) -> Vec<Line<'static>> {
    let mut canvas = Canvas::new(width, height);

    for view in &snapshot.entities {
        match view.shape {
            Shape::Asteroid(size) => draw_asteroid(&mut canvas, view, size),
            Shape::Bullet => draw_bullet(&mut canvas, view),
            Shape::Ship { .. } => {}
        }
    }

    if snapshot.can_draw_player {
        if let Some(ship) = snapshot.ship() {
            draw_ship(&mut canvas, snapshot, ship);
        }
    }

    canvas.into_lines()
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids::GameSession;

    fn braille_cells(lines: &[Line<'_>]) -> usize {
        lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .filter(|span| span.content.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)))
            .count()
    }

    #[test]
    fn test_line_cells_cover_both_endpoints() {
        let cells = line_cells(0, 0, 5, 2);
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(5, 2)));
        assert_eq!(line_cells(3, 3, 3, 3), vec![(3, 3)]);
    }

    #[test]
    fn test_braille_bits_are_distinct() {
        let mut all = 0u8;
        for x in 0..2 {
            for y in 0..4 {
                let bit = braille_bit(x, y);
                assert_eq!(all & bit, 0);
                all |= bit;
            }
        }
        assert_eq!(all, 0xFF);
    }

    #[test]
    fn test_mirror_offsets_near_edges() {
        assert_eq!(mirror_offsets(Vector2::new(275.0, 275.0), 10.0).len(), 1);

        let left = mirror_offsets(Vector2::new(5.0, 275.0), 10.0);
        assert_eq!(left, vec![Vector2::ZERO, Vector2::new(WORLD_SIZE, 0.0)]);

        let corner = mirror_offsets(Vector2::new(545.0, 3.0), 10.0);
        assert_eq!(corner.len(), 4);
        assert!(corner.contains(&Vector2::new(-WORLD_SIZE, WORLD_SIZE)));
    }

    #[test]
    fn test_place_rotates_about_origin() {
        let p = place(Vector2::new(100.0, 100.0), std::f64::consts::FRAC_PI_2, (10.0, 0.0));
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_each_tier_has_its_own_irregular_outline() {
        let centre = Vector2::new(275.0, 275.0);
        let tiers = [AsteroidSize::Small, AsteroidSize::Medium, AsteroidSize::Large];
        let counts: Vec<usize> = tiers
            .iter()
            .map(|&size| asteroid_verts(centre, 0.0, size).len())
            .collect();
        assert_eq!(counts, vec![7, 9, 11]);

        for size in tiers {
            let reach: Vec<f64> = asteroid_verts(centre, 1.3, size)
                .iter()
                .map(|v| v.distance_squared(&centre).sqrt())
                .collect();
            assert!(reach.iter().all(|r| *r <= size.radius() + 1e-9), "{size:?}");
            let (min, max) = reach
                .iter()
                .fold((f64::MAX, 0.0_f64), |(lo, hi), r| (lo.min(*r), hi.max(*r)));
            assert!(max - min > 0.1 * size.radius(), "{size:?} outline is regular");
        }
    }

    #[test]
    fn test_field_has_requested_dimensions() {
        let snapshot = GameSession::with_seed(3).snapshot();
        let lines = render_field(&snapshot, 40, 20);
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|line| line.spans.len() == 40));
    }

    #[test]
    fn test_ship_is_drawn_only_when_allowed() {
        let mut snapshot = GameSession::with_seed(3).snapshot();
        snapshot.entities.retain(|view| matches!(view.shape, Shape::Ship { .. }));
        assert!(braille_cells(&render_field(&snapshot, 60, 30)) > 0);

        snapshot.can_draw_player = false;
        assert_eq!(braille_cells(&render_field(&snapshot, 60, 30)), 0);
    }
}
