//! Circular neighborhood enumeration.

use biosim_core::Coord;

/// Call `f` once for every in-bounds cell within Euclidean `radius` of `center`,
/// boundary included. Cells are visited x-major, then y ascending.
pub fn visit_neighborhood<F>(center: Coord, radius: f32, width: i32, height: i32, mut f: F)
where
    F: FnMut(Coord),
{
    if radius < 0.0 {
        return;
    }

    let reach = radius as i32;
    let (cx, cy) = (center.x as i32, center.y as i32);

    for x in (cx - reach).max(0)..=(cx + reach).min(width - 1) {
        let dx = (x - cx) as f32;
        let extent_y = (radius * radius - dx * dx).sqrt() as i32;
        for y in (cy - extent_y).max(0)..=(cy + extent_y).min(height - 1) {
            f(Coord::new(x as i16, y as i16));
        }
    }
}

/// Collect the neighborhood of `center` in visit order
pub fn neighborhood(center: Coord, radius: f32, width: i32, height: i32) -> Vec<Coord> {
    let mut cells = Vec::new();
    visit_neighborhood(center, radius, width, height, |loc| cells.push(loc));
    cells
}
