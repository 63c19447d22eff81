//! Ordered tile collections with optional nesting
//!
//! Tiles live in one flat arena in depth-first order. Nesting is recorded as a
//! list of index ranges tagged with their depth, so flattening never moves a
//! tile: it only forgets ranges.

use crate::deflation::rules::{branching_factor, substitute};
use crate::geometry::point::Point;
use crate::geometry::tile::{Tile, TileKind};
use crate::io::configuration::OUTLINE_WIDTH;
use crate::io::error::{DeflationError, Result};
use crate::render::surface::{OUTLINE_COLOR, Surface, kind_color};
use std::ops::Range;

/// A nested sub-collection, as a half-open range into the tile arena
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    /// Index of the first tile in the group
    pub start: usize,
    /// One past the index of the last tile in the group
    pub end: usize,
    /// Nesting depth, 1 for direct children of the collection
    pub depth: usize,
}

impl Group {
    /// Tile indices covered by the group
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of tiles in the group
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the group holds no tiles
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of tiles of each kind in a collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileCounts {
    /// Half-kites
    pub small: usize,
    /// Half-darts
    pub large: usize,
}

impl TileCounts {
    /// Create counts from explicit values
    pub const fn new(small: usize, large: usize) -> Self {
        Self { small, large }
    }

    /// Total number of tiles
    pub const fn total(&self) -> usize {
        self.small + self.large
    }

    /// Counts after one more generation, `None` on overflow
    ///
    /// Each small tile yields one small and one large child, each large tile
    /// yields one small and two large children.
    pub fn checked_next(&self) -> Option<Self> {
        let small = self.small.checked_add(self.large)?;
        let large = self.large.checked_mul(2)?.checked_add(self.small)?;
        Some(Self { small, large })
    }

    fn record(&mut self, kind: TileKind) {
        match kind {
            TileKind::Small => self.small += 1,
            TileKind::Large => self.large += 1,
        }
    }
}

/// An ordered, possibly nested collection of tiles
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileSet {
    tiles: Vec<Tile>,
    groups: Vec<Group>,
    generation: usize,
}

impl TileSet {
    /// Create an empty collection
    pub const fn new() -> Self {
        Self {
            tiles: Vec::new(),
            groups: Vec::new(),
            generation: 0,
        }
    }

    /// Empty flat collection with room for `capacity` tiles
    ///
    /// # Errors
    ///
    /// Returns [`DeflationError::AllocationFailed`] if the storage cannot be
    /// reserved
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::from_tiles(reserve(capacity, 0)?))
    }

    /// Create a flat collection from tiles in draw order
    pub const fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self {
            tiles,
            groups: Vec::new(),
            generation: 0,
        }
    }

    /// Build a collection whose direct children are the given collections
    ///
    /// Nesting already present in a child is kept one level deeper. The
    /// resulting generation is the highest generation among the children.
    pub fn nest(children: impl IntoIterator<Item = Self>) -> Self {
        let mut nested = Self::new();
        for child in children {
            let offset = nested.tiles.len();
            nested.groups.push(Group {
                start: offset,
                end: offset + child.tiles.len(),
                depth: 1,
            });
            nested
                .groups
                .extend(child.groups.iter().map(|group| Group {
                    start: group.start + offset,
                    end: group.end + offset,
                    depth: group.depth + 1,
                }));
            nested.generation = nested.generation.max(child.generation);
            nested.tiles.extend(child.tiles);
        }
        nested
    }

    /// Append a tile at the top level
    pub fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    /// Leaf tiles in depth-first order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Nesting ranges in pre-order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Leaf tiles covered by a group
    pub fn group_tiles(&self, group: &Group) -> &[Tile] {
        self.tiles.get(group.range()).unwrap_or(&[])
    }

    /// Number of leaf tiles
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the collection holds no tiles
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of deflations applied since generation 0
    pub const fn generation(&self) -> usize {
        self.generation
    }

    /// Whether the collection has no nesting
    pub const fn is_flat(&self) -> bool {
        self.groups.is_empty()
    }

    /// Deepest nesting level, 0 for a flat collection
    pub fn nesting_depth(&self) -> usize {
        self.groups.iter().map(|group| group.depth).max().unwrap_or(0)
    }

    /// Remove all nesting and return the leaves
    ///
    /// Flattening a flat collection is a no-op.
    pub fn flatten(&mut self) -> &[Tile] {
        self.groups.clear();
        &self.tiles
    }

    /// Remove the outermost level of nesting
    pub fn flatten_level(&mut self) {
        self.groups.retain(|group| group.depth > 1);
        for group in &mut self.groups {
            group.depth -= 1;
        }
    }

    /// Tile counts per kind
    pub fn counts(&self) -> TileCounts {
        let mut counts = TileCounts::default();
        for tile in &self.tiles {
            counts.record(tile.kind);
        }
        counts
    }

    /// Number of tiles the next generation will hold
    pub fn deflated_len(&self) -> usize {
        self.tiles
            .iter()
            .map(|tile| branching_factor(tile.kind))
            .sum()
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` when empty
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut vertices = self.tiles.iter().flat_map(Tile::vertices);
        let first = vertices.next()?;
        Some(vertices.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }

    /// Replace every tile with its substitution children, in order
    ///
    /// Nesting is preserved: each group is remapped onto the children of the
    /// tiles it covered. The new generation is built aside and only committed
    /// once every child is finite.
    ///
    /// # Errors
    ///
    /// Returns [`DeflationError::NonFiniteGeometry`] if a child vertex is NaN
    /// or infinite, or [`DeflationError::AllocationFailed`] if the next
    /// generation does not fit in memory; the collection is left unchanged in
    /// both cases
    pub fn deflate(&mut self) -> Result<&mut Self> {
        let generation = self.generation + 1;
        let track_offsets = !self.groups.is_empty();
        let mut next = reserve(self.deflated_len(), generation)?;
        let mut offsets = if track_offsets {
            reserve(self.tiles.len() + 1, generation)?
        } else {
            Vec::new()
        };

        for (tile_index, tile) in self.tiles.iter().enumerate() {
            if track_offsets {
                offsets.push(next.len());
            }
            let children = substitute(tile);
            if !children.as_slice().iter().all(Tile::is_finite) {
                return Err(DeflationError::NonFiniteGeometry {
                    generation,
                    tile_index,
                });
            }
            next.extend_from_slice(children.as_slice());
        }

        if track_offsets {
            offsets.push(next.len());
            let remap = |index: usize| offsets.get(index).copied().unwrap_or(next.len());
            for group in &mut self.groups {
                group.start = remap(group.start);
                group.end = remap(group.end);
            }
        }

        self.tiles = next;
        self.generation = generation;
        Ok(self)
    }

    /// Paint every tile in order onto a drawing surface
    ///
    /// Each tile is filled with its kind color, then its outline is stroked.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for tile in &self.tiles {
            let path = tile.vertices();
            surface.fill_triangle(&path, kind_color(tile.kind));
            surface.stroke_triangle(&path, OUTLINE_COLOR, OUTLINE_WIDTH);
        }
    }
}

fn reserve<T>(capacity: usize, generation: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|error| {
            tracing::warn!(generation, tiles = capacity, %error, "tile storage unavailable");
            DeflationError::AllocationFailed {
                generation,
                tiles: capacity,
            }
        })?;
    Ok(buffer)
}

impl From<Tile> for TileSet {
    fn from(tile: Tile) -> Self {
        Self::from_tiles(vec![tile])
    }
}

impl From<Vec<Tile>> for TileSet {
    fn from(tiles: Vec<Tile>) -> Self {
        Self::from_tiles(tiles)
    }
}

impl FromIterator<Tile> for TileSet {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        Self::from_tiles(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
