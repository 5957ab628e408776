// THEORY:
// The `ComponentExtractor` is the spatial grouping stage. It turns a binary
// `ForegroundMask` into a list of `Region`s, one per maximal 4-connected patch of
// foreground.
//
// Algorithm:
// 1.  **Raster Seeding**: pixels are visited row by row. Every foreground pixel that has
//     not yet been claimed seeds a new region, so labels follow the raster order of
//     each region's first pixel.
// 2.  **Region Growing**: from the seed, a flood fill claims every foreground pixel
//     reachable through north, south, east or west steps. Diagonal contact does not
//     connect two regions.
// 3.  **Data Aggregation**: while growing, the bounding box, area and centroid sums are
//     accumulated so no second pass over the pixels is needed.
// 4.  **Stateless Utility**: `find_regions` only looks at the mask it is given. It has
//     no memory of previous frames.

use crate::core_modules::mask::ForegroundMask;
use crate::core_modules::region::{BoundingBox, Region};

pub mod component_extractor {
    use super::*;

    const NEIGHBOURS: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

    /// Labels every 4-connected foreground component of `mask`.
    pub fn find_regions(mask: &ForegroundMask) -> Vec<Region> {
        let width = mask.width as usize;
        let height = mask.height as usize;
        let mut visited = vec![false; width * height];
        let mut regions = Vec::new();

        for row in 0..mask.height {
            for col in 0..mask.width {
                let index = row as usize * width + col as usize;
                if visited[index] || !mask.is_foreground(row, col) {
                    continue;
                }
                let label = regions.len() as u32 + 1;
                regions.push(grow_region(mask, &mut visited, row, col, label));
            }
        }

        regions
    }

    /// Flood fill from a seed pixel. Uses an explicit stack so large regions cannot
    /// overflow the call stack.
    fn grow_region(
        mask: &ForegroundMask,
        visited: &mut [bool],
        seed_row: u32,
        seed_col: u32,
        label: u32,
    ) -> Region {
        let width = mask.width as usize;
        let mut stack = vec![(seed_row, seed_col)];
        visited[seed_row as usize * width + seed_col as usize] = true;

        let mut bbox = BoundingBox {
            min_row: seed_row,
            min_col: seed_col,
            max_row: seed_row,
            max_col: seed_col,
        };
        let mut area = 0usize;
        let mut row_sum = 0u64;
        let mut col_sum = 0u64;

        while let Some((row, col)) = stack.pop() {
            area += 1;
            row_sum += row as u64;
            col_sum += col as u64;
            bbox.min_row = bbox.min_row.min(row);
            bbox.min_col = bbox.min_col.min(col);
            bbox.max_row = bbox.max_row.max(row);
            bbox.max_col = bbox.max_col.max(col);

            for (dr, dc) in NEIGHBOURS {
                let nr = row as i64 + dr;
                let nc = col as i64 + dc;
                if nr < 0 || nc < 0 || nr >= mask.height as i64 || nc >= mask.width as i64 {
                    continue;
                }
                let (nr, nc) = (nr as u32, nc as u32);
                let index = nr as usize * width + nc as usize;
                if !visited[index] && mask.is_foreground(nr, nc) {
                    visited[index] = true;
                    stack.push((nr, nc));
                }
            }
        }

        Region {
            label,
            bounding_box: bbox,
            area,
            centroid: (row_sum as f64 / area as f64, col_sum as f64 / area as f64),
        }
    }
}
