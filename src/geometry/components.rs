//! Connected components and outer boundary tracing on binary masks.
use super::mask::{Mask, NEIGH_OFFSETS};
use crate::error::GeometryError;

/// Moore neighbourhood in clockwise order (y down): E, SE, S, SW, W, NW, N, NE.
const MOORE: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Label 8-connected components; 0 is background, labels start at 1 and are
/// assigned in raster order of each component's first pixel.
pub fn label_components(mask: &Mask) -> (Vec<u32>, u32) {
    let mut labels = vec![0u32; mask.w * mask.h];
    let mut stack = Vec::new();
    let mut next = 0u32;
    for start in 0..labels.len() {
        if mask.data[start] == 0 || labels[start] != 0 {
            continue;
        }
        next += 1;
        labels[start] = next;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let x = (idx % mask.w) as isize;
            let y = (idx / mask.w) as isize;
            for (dx, dy) in NEIGH_OFFSETS {
                let (nx, ny) = (x + dx, y + dy);
                if !mask.get_signed(nx, ny) {
                    continue;
                }
                let n = mask.idx(nx as usize, ny as usize);
                if labels[n] == 0 {
                    labels[n] = next;
                    stack.push(n);
                }
            }
        }
    }
    (labels, next)
}

/// Keep only the component that contains `seed`.
pub fn select_connected_component(
    mask: &Mask,
    seed: (usize, usize),
) -> Result<Mask, GeometryError> {
    let (sx, sy) = seed;
    if sx >= mask.w || sy >= mask.h || !mask.get(sx, sy) {
        return Err(GeometryError::SeedOutsideMask {
            x: sx as i64,
            y: sy as i64,
        });
    }
    let (labels, _) = label_components(mask);
    let wanted = labels[mask.idx(sx, sy)];
    let data = labels.iter().map(|&l| (l == wanted) as u8).collect();
    Ok(Mask {
        w: mask.w,
        h: mask.h,
        data,
    })
}

/// Component containing the pixel under `seed`, or, when that pixel is clear
/// or outside the grid, the component of the set pixel nearest to `seed`
/// (first in raster order on ties).
///
/// `seed` is a sub-pixel position in mask coordinates. Only an empty mask is
/// an error.
pub fn select_nearest_component(mask: &Mask, seed: [f32; 2]) -> Result<Mask, GeometryError> {
    let (rx, ry) = (seed[0].round(), seed[1].round());
    if rx >= 0.0 && ry >= 0.0 {
        let (x, y) = (rx as usize, ry as usize);
        if x < mask.w && y < mask.h && mask.get(x, y) {
            return select_connected_component(mask, (x, y));
        }
    }
    let mut best: Option<((usize, usize), f32)> = None;
    for (x, y) in mask.pixels() {
        let dx = x as f32 - seed[0];
        let dy = y as f32 - seed[1];
        let d = dx * dx + dy * dy;
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some(((x, y), d));
        }
    }
    let (pixel, _) = best.ok_or(GeometryError::SeedOutsideMask {
        x: rx as i64,
        y: ry as i64,
    })?;
    select_connected_component(mask, pixel)
}

/// Ordered outer boundary of the first component in raster order.
///
/// Moore-neighbour tracing, clockwise, stopping when the start pixel is left
/// in the same direction as the first move. Empty for a clear mask.
pub fn trace_boundary(mask: &Mask) -> Vec<(usize, usize)> {
    let Some(start) = mask.pixels().next() else {
        return Vec::new();
    };
    let limit = 4 * mask.count() + 8;
    let mut contour = vec![start];
    let mut cur = (start.0 as isize, start.1 as isize);
    let start_s = cur;
    // west of the first raster pixel is always background
    let mut back = 4usize;
    let mut first_move: Option<usize> = None;

    for _ in 0..limit {
        let found = (1..=8)
            .map(|k| (back + k) % 8)
            .find(|&d| mask.get_signed(cur.0 + MOORE[d].0, cur.1 + MOORE[d].1));
        let Some(d) = found else {
            break;
        };
        if cur == start_s {
            match first_move {
                None => first_move = Some(d),
                Some(f) if f == d => {
                    contour.pop();
                    break;
                }
                Some(_) => {}
            }
        }
        cur = (cur.0 + MOORE[d].0, cur.1 + MOORE[d].1);
        back = if d % 2 == 0 { (d + 6) % 8 } else { (d + 5) % 8 };
        contour.push((cur.0 as usize, cur.1 as usize));
    }
    if contour.is_empty() {
        contour.push(start);
    }
    contour
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> Mask {
        let h = rows.len();
        let w = rows[0].len();
        let mut m = Mask::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                m.set(x, y, c == '#');
            }
        }
        m
    }

    #[test]
    fn labels_diagonal_neighbours_together() {
        let m = mask_from(&["#...", ".#..", "...#", "...#"]);
        let (labels, count) = label_components(&m);
        assert_eq!(count, 2);
        assert_eq!(labels[0], labels[5]);
        assert_ne!(labels[0], labels[11]);
    }

    #[test]
    fn select_keeps_seed_component_only() {
        let m = mask_from(&["##..#", "##..#", ".....", "..###"]);
        let sel = select_connected_component(&m, (4, 0)).unwrap();
        assert_eq!(sel.count(), 2);
        assert!(sel.get(4, 1));
        assert!(!sel.get(0, 0));
    }

    #[test]
    fn select_rejects_background_seed() {
        let m = mask_from(&["#.", ".."]);
        assert_eq!(
            select_connected_component(&m, (1, 1)),
            Err(GeometryError::SeedOutsideMask { x: 1, y: 1 })
        );
        assert!(select_connected_component(&m, (5, 5)).is_err());
    }

    #[test]
    fn nearest_component_used_when_seed_is_clear() {
        let m = mask_from(&["##...", "##...", ".....", ".....", "...##"]);
        let sel = select_nearest_component(&m, [4.0, 2.6]).unwrap();
        assert_eq!(sel.count(), 2);
        assert!(sel.get(3, 4) && sel.get(4, 4));
        assert!(!sel.get(0, 0));

        // equal distance to both blocks: the first in raster order wins
        let tie = select_nearest_component(&m, [2.0, 2.5]).unwrap();
        assert!(tie.get(0, 0));
        assert!(!tie.get(4, 4));
    }

    #[test]
    fn nearest_component_keeps_seed_component_and_rejects_empty_mask() {
        let m = mask_from(&["##..#", "##..#"]);
        let sel = select_nearest_component(&m, [4.2, 0.9]).unwrap();
        assert_eq!(sel.count(), 2);
        assert!(sel.get(4, 0));
        assert_eq!(
            select_nearest_component(&Mask::new(3, 3), [1.0, 1.0]),
            Err(GeometryError::SeedOutsideMask { x: 1, y: 1 })
        );
    }

    #[test]
    fn boundary_of_square_visits_perimeter_once() {
        let m = mask_from(&[".....", ".###.", ".###.", ".###.", "....."]);
        let contour = trace_boundary(&m);
        assert_eq!(contour.len(), 8);
        assert_eq!(contour[0], (1, 1));
        assert_eq!(contour[1], (2, 1));
        assert!(!contour.contains(&(2, 2)));
    }

    #[test]
    fn boundary_of_isolated_pixel_and_pair() {
        let single = mask_from(&["...", ".#.", "..."]);
        assert_eq!(trace_boundary(&single), vec![(1, 1)]);
        let pair = mask_from(&["##"]);
        assert_eq!(trace_boundary(&pair), vec![(0, 0), (1, 0)]);
        assert!(trace_boundary(&Mask::new(3, 3)).is_empty());
    }
}
