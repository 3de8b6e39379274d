//! Mapping between tile ids and their place in the tileset image.

use serde::Serialize;

use super::TileId;

/// Largest tile count the lookup table and the exports accept.
pub const MAX_TILE_COUNT: u32 = u16::MAX as u32;

/// Pixel rectangle inside the tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub columns: u32,
    pub tile_count: u32,
}

impl TileGrid {
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            return 0;
        }
        self.tile_count.div_ceil(self.columns)
    }

    /// `(column, row)` of a tile, following `id = row * columns + col`.
    pub fn position(&self, id: TileId) -> Option<(u32, u32)> {
        if id >= self.tile_count || self.columns == 0 {
            return None;
        }
        Some((id % self.columns, id / self.columns))
    }

    pub fn id_at(&self, column: u32, row: u32) -> Option<TileId> {
        if column >= self.columns {
            return None;
        }
        let id = row.checked_mul(self.columns)?.checked_add(column)?;
        (id < self.tile_count).then_some(id)
    }

    /// `None` when the id is out of range or the offset overflows `u32`.
    pub fn source_rect(&self, id: TileId) -> Option<PixelRect> {
        let (column, row) = self.position(id)?;
        let offset = |index: u32, size: u32| {
            size.checked_add(self.spacing)?
                .checked_mul(index)?
                .checked_add(self.margin)
        };
        Some(PixelRect {
            x: offset(column, self.tile_width)?,
            y: offset(row, self.tile_height)?,
            width: self.tile_width,
            height: self.tile_height,
        })
    }

    /// Smallest image that holds every tile of the grid, `None` if it
    /// does not fit in `u32`.
    pub fn required_image_size(&self) -> Option<(u32, u32)> {
        let span = |count: u32, size: u32| match count {
            0 => Some(0),
            n => n
                .checked_mul(size)?
                .checked_add((n - 1).checked_mul(self.spacing)?)?
                .checked_add(self.margin),
        };
        Some((
            span(self.columns, self.tile_width)?,
            span(self.rows(), self.tile_height)?,
        ))
    }

    /// Whether the grid is small enough to be tabulated tile by tile.
    pub fn is_tabulable(&self) -> bool {
        self.tile_count <= MAX_TILE_COUNT && self.required_image_size().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grass() -> TileGrid {
        TileGrid {
            tile_width: 16,
            tile_height: 16,
            spacing: 1,
            margin: 0,
            columns: 16,
            tile_count: 128,
        }
    }

    #[test]
    fn test_rows_round_up() {
        assert_eq!(grass().rows(), 8);
        let partial = TileGrid {
            tile_count: 129,
            ..grass()
        };
        assert_eq!(partial.rows(), 9);
    }

    #[test]
    fn test_position_and_id_at_agree() {
        let grid = grass();
        assert_eq!(grid.position(0), Some((0, 0)));
        assert_eq!(grid.position(23), Some((7, 1)));
        assert_eq!(grid.position(113), Some((1, 7)));
        assert_eq!(grid.position(128), None);

        assert_eq!(grid.id_at(7, 1), Some(23));
        assert_eq!(grid.id_at(16, 0), None);
        assert_eq!(grid.id_at(0, 8), None);
    }

    #[test]
    fn test_source_rect_skips_spacing() {
        let rect = grass().source_rect(17).unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 17,
                y: 17,
                width: 16,
                height: 16
            }
        );
    }

    #[test]
    fn test_required_image_size_matches_grass_sheet() {
        assert_eq!(grass().required_image_size(), Some((271, 135)));
        let with_margin = TileGrid {
            margin: 2,
            ..grass()
        };
        assert_eq!(with_margin.required_image_size(), Some((273, 137)));
    }

    #[test]
    fn test_zero_columns() {
        let grid = TileGrid {
            columns: 0,
            ..grass()
        };
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.position(0), None);
        assert_eq!(grid.required_image_size(), Some((0, 0)));
    }

    #[test]
    fn test_oversized_grid_does_not_overflow() {
        let tall = TileGrid {
            columns: 1,
            tile_count: u32::MAX,
            ..grass()
        };
        assert_eq!(tall.required_image_size(), None);
        assert_eq!(tall.source_rect(u32::MAX - 1), None);
        assert!(!tall.is_tabulable());

        let wide = TileGrid {
            tile_width: u32::MAX / 8,
            ..grass()
        };
        assert_eq!(wide.required_image_size(), None);
        assert!(!wide.is_tabulable());

        let many = TileGrid {
            tile_count: MAX_TILE_COUNT + 1,
            columns: 1024,
            ..grass()
        };
        assert!(many.required_image_size().is_some());
        assert!(!many.is_tabulable());
        assert!(grass().is_tabulable());
    }
}
