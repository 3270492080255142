//! Tile partitioning of the output image.
//!
//! Divides the image into square tiles that workers render independently,
//! and splits the RGBA8 output buffer into one exclusive view per tile.

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of tile's top-left corner
    pub x: u32,
    /// Y coordinate of tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels (clipped at the right edge)
    pub width: u32,
    /// Height of the tile in pixels (clipped at the bottom edge)
    pub height: u32,
    /// Row-major index of this tile in the grid
    pub index: usize,
}

/// Order in which workers claim tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileOrder {
    /// Row by row from the top-left corner
    #[default]
    Scanline,
    /// From the image center outward
    Spiral,
}

/// The tile layout of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
}

impl TileGrid {
    /// Lay out `tile_size` square tiles over a `width x height` image.
    ///
    /// `tile_size` must be non-zero.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Self {
            width,
            height,
            tile_size,
            tiles_x: width.div_ceil(tile_size),
            tiles_y: height.div_ceil(tile_size),
        }
    }

    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// Total number of tiles.
    pub fn count(&self) -> usize {
        self.tiles_x as usize * self.tiles_y as usize
    }

    /// The tile at a row-major grid index.
    pub fn tile(&self, index: usize) -> Tile {
        let x = (index % self.tiles_x as usize) as u32 * self.tile_size;
        let y = (index / self.tiles_x as usize) as u32 * self.tile_size;
        Tile {
            x,
            y,
            width: self.tile_size.min(self.width - x),
            height: self.tile_size.min(self.height - y),
            index,
        }
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.count()).map(move |index| self.tile(index))
    }

    /// Grid indices in the order workers should claim them.
    pub fn claim_order(&self, order: TileOrder) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.count()).collect();
        if order == TileOrder::Spiral {
            let center_x = self.width as f32 / 2.0;
            let center_y = self.height as f32 / 2.0;
            let distance = |index: usize| {
                let tile = self.tile(index);
                let tx = tile.x as f32 + tile.width as f32 / 2.0;
                let ty = tile.y as f32 + tile.height as f32 / 2.0;
                (tx - center_x).powi(2) + (ty - center_y).powi(2)
            };
            // Stable sort keeps scanline order between equidistant tiles
            indices.sort_by(|&a, &b| distance(a).total_cmp(&distance(b)));
        }
        indices
    }

    /// Split an RGBA8 image buffer into one exclusive view per tile.
    ///
    /// Views come back in claim order, so the n-th claim takes `views[n]`.
    /// `buffer` must hold exactly `width * height * 4` bytes.
    pub fn partition<'a>(&self, buffer: &'a mut [u8], order: TileOrder) -> Vec<TileView<'a>> {
        debug_assert_eq!(buffer.len(), self.width as usize * self.height as usize * CHANNELS);

        let mut views: Vec<TileView<'a>> = self
            .tiles()
            .map(|tile| TileView {
                tile,
                rows: Vec::with_capacity(tile.height as usize),
            })
            .collect();

        let row_bytes = self.width as usize * CHANNELS;
        let tile_bytes = self.tile_size as usize * CHANNELS;
        for (y, row) in buffer.chunks_mut(row_bytes).enumerate() {
            let first = (y / self.tile_size as usize) * self.tiles_x as usize;
            for (column, segment) in row.chunks_mut(tile_bytes).enumerate() {
                views[first + column].rows.push(segment);
            }
        }

        let mut rank = vec![0usize; views.len()];
        for (position, index) in self.claim_order(order).into_iter().enumerate() {
            rank[index] = position;
        }
        views.sort_by_key(|view| rank[view.tile.index]);

        views
    }
}

/// Exclusive mutable access to the pixels of one tile.
#[derive(Debug)]
pub struct TileView<'a> {
    tile: Tile,
    rows: Vec<&'a mut [u8]>,
}

impl TileView<'_> {
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Write a pixel at tile-local coordinates.
    pub fn put(&mut self, local_x: u32, local_y: u32, rgba: [u8; 4]) {
        let start = local_x as usize * CHANNELS;
        self.rows[local_y as usize][start..start + CHANNELS].copy_from_slice(&rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_exact_fit() {
        let grid = TileGrid::new(128, 128, 64);
        assert_eq!(grid.count(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = grid.tiles().map(|t| t.width * t.height).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_grid_partial_fit() {
        let grid = TileGrid::new(100, 30, 8);
        assert_eq!(grid.tiles_x(), 13);
        assert_eq!(grid.tiles_y(), 4);
        assert_eq!(grid.count(), 52);

        let total_pixels: u32 = grid.tiles().map(|t| t.width * t.height).sum();
        assert_eq!(total_pixels, 100 * 30);

        let corner = grid.tile(grid.count() - 1);
        assert_eq!((corner.x, corner.y, corner.width, corner.height), (96, 24, 4, 6));
    }

    #[test]
    fn test_index_to_tile() {
        let grid = TileGrid::new(32, 32, 8);
        let tile = grid.tile(6);
        assert_eq!((tile.x, tile.y), (16, 8));
        assert_eq!(tile.index, 6);
    }

    #[test]
    fn test_spiral_order() {
        let grid = TileGrid::new(192, 192, 64);
        let order = grid.claim_order(TileOrder::Spiral);
        assert_eq!(order.len(), 9); // 3x3 grid

        // First tile should be the center one
        let first = grid.tile(order[0]);
        assert_eq!((first.x, first.y), (64, 64));

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_scanline_order() {
        let grid = TileGrid::new(40, 24, 8);
        assert_eq!(grid.claim_order(TileOrder::Scanline), (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn test_partition_covers_each_byte_once() {
        let (width, height, size) = (19u32, 13u32, 5u32);
        let grid = TileGrid::new(width, height, size);
        let mut buffer = vec![0u8; (width * height) as usize * CHANNELS];

        let mut views = grid.partition(&mut buffer, TileOrder::Scanline);
        assert_eq!(views.len(), grid.count());
        for view in views.iter_mut() {
            let tile = view.tile();
            for ly in 0..tile.height {
                for lx in 0..tile.width {
                    view.put(lx, ly, [1, 1, 1, 1]);
                }
            }
        }
        drop(views);

        assert!(buffer.iter().all(|&b| b == 1));
    }

    #[test]
    fn test_partition_places_pixels() {
        let grid = TileGrid::new(10, 10, 4);
        let mut buffer = vec![0u8; 10 * 10 * CHANNELS];

        let mut views = grid.partition(&mut buffer, TileOrder::Scanline);
        // Tile 4 is column 1, row 1: pixel (4, 4) is its local (0, 0)
        views[4].put(1, 2, [9, 8, 7, 6]);
        drop(views);

        let offset = (6 * 10 + 5) * CHANNELS;
        assert_eq!(&buffer[offset..offset + 4], &[9, 8, 7, 6]);
    }

    #[test]
    fn test_partition_follows_claim_order() {
        let grid = TileGrid::new(192, 192, 64);
        let mut buffer = vec![0u8; 192 * 192 * CHANNELS];

        let mut views = grid.partition(&mut buffer, TileOrder::Spiral);
        let indices: Vec<usize> = views.iter().map(|view| view.tile().index).collect();
        assert_eq!(indices, grid.claim_order(TileOrder::Spiral));
        assert_eq!(indices[0], 4);

        // The first view handed out writes into the center tile
        views[0].put(0, 0, [5, 5, 5, 5]);
        drop(views);

        let offset = (64 * 192 + 64) * CHANNELS;
        assert_eq!(&buffer[offset..offset + 4], &[5, 5, 5, 5]);
    }
}
