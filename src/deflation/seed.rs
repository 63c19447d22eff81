//! Generation-0 seed: ten half-kites arranged in a decagonal ring

use crate::deflation::tile_set::TileSet;
use crate::geometry::point::Point;
use crate::geometry::tile::{Tile, TileKind};
use crate::io::configuration::SEED_TILE_COUNT;
use crate::io::error::{Result, invalid_parameter};
use std::f64::consts::PI;

/// Parameters of the decagonal seed ring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedRing {
    /// Shared apex of all seed tiles
    pub center: Point,
    /// Distance from the center to the base vertices
    pub size: f64,
    /// Swap the base vertices of every even-indexed tile
    ///
    /// Adjacent tiles must alternate orientation for the ring to close under
    /// the matching rules, so this is on for real tilings.
    pub mirror_alternate: bool,
}

impl SeedRing {
    /// Ring with alternate mirroring enabled
    pub const fn new(center: Point, size: f64) -> Self {
        Self {
            center,
            size,
            mirror_alternate: true,
        }
    }

    /// Check that the ring parameters describe real geometry
    ///
    /// # Errors
    ///
    /// Returns an error if the center is not finite or the size is not a
    /// positive finite number
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(invalid_parameter(
                "center",
                &self.center,
                &"center must have finite coordinates",
            ));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(invalid_parameter(
                "size",
                &self.size,
                &"ring size must be positive and finite",
            ));
        }
        Ok(())
    }

    /// The ten seed tiles in rotation order
    ///
    /// Tile `i` spans the angles `i·36°` and `(i+1)·36°`; with mirroring on,
    /// even-indexed tiles have their base vertices swapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring parameters are invalid
    pub fn tiles(&self) -> Result<Vec<Tile>> {
        self.validate()?;

        let step = 2.0 * PI / SEED_TILE_COUNT as f64;
        Ok((0..SEED_TILE_COUNT)
            .map(|rotation| {
                let mut a = self.center + Point::from_polar(self.size, rotation as f64 * step);
                let mut c =
                    self.center + Point::from_polar(self.size, (rotation + 1) as f64 * step);
                if self.mirror_alternate && rotation % 2 == 0 {
                    std::mem::swap(&mut a, &mut c);
                }
                Tile::new(a, self.center, c, TileKind::Small)
            })
            .collect())
    }

    /// All seed tiles in a single flat collection
    ///
    /// # Errors
    ///
    /// Returns an error if the ring parameters are invalid
    pub fn combined(&self) -> Result<TileSet> {
        Ok(TileSet::from_tiles(self.tiles()?))
    }

    /// One single-tile collection per seed tile, in rotation order
    ///
    /// # Errors
    ///
    /// Returns an error if the ring parameters are invalid
    pub fn sectors(&self) -> Result<Vec<TileSet>> {
        Ok(self.tiles()?.into_iter().map(TileSet::from).collect())
    }

    /// All seed tiles in one collection, nested one group per sector
    ///
    /// # Errors
    ///
    /// Returns an error if the ring parameters are invalid
    pub fn nested(&self) -> Result<TileSet> {
        Ok(TileSet::nest(self.sectors()?))
    }
}

/// Seed ring around `center` as one flat collection
///
/// Alternate tiles are mirrored. For an unmirrored ring use
/// `SeedRing { mirror_alternate: false, ..SeedRing::new(center, size) }.combined()`.
///
/// # Errors
///
/// Returns an error if `center` is not finite or `size` is not positive
pub fn generate_seed_ring(center: Point, size: f64) -> Result<TileSet> {
    SeedRing::new(center, size).combined()
}

/// Seed ring around `center` as ten independent single-tile collections
///
/// # Errors
///
/// Returns an error if `center` is not finite or `size` is not positive
pub fn generate_seed_sectors(center: Point, size: f64) -> Result<Vec<TileSet>> {
    SeedRing::new(center, size).sectors()
}

/// Seed ring around `center` as one collection nested one group per sector
///
/// # Errors
///
/// Returns an error if `center` is not finite or `size` is not positive
pub fn generate_seed_ring_nested(center: Point, size: f64) -> Result<TileSet> {
    SeedRing::new(center, size).nested()
}
