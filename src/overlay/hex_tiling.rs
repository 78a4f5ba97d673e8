use bevy::prelude::*;

use crate::math;

/// Extra rows and columns beyond the minimum needed to cover the viewport.
pub const OVERSCAN: u32 = 2;

/// Smallest accepted hexagon edge length.
const MIN_CELL_SIZE: f32 = 1.0;

/// One hexagon position in the tiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSite {
    /// Row index (outer loop).
    pub row: u32,
    /// Column index (inner loop). Odd columns sit half a hexagon lower.
    pub col: u32,
    /// Top-left corner of the hexagon's bounding box, in viewport space.
    pub anchor: Vec2,
    /// Hexagon center, in viewport space.
    pub center: Vec2,
}

/// Brick-pattern tiling of flat-topped hexagons covering a viewport.
///
/// Column anchors are `1.5 * size` apart, rows are one hexagon height
/// (`sqrt(3) * size`) apart, and odd columns are shifted down by half a
/// hexagon height so they interlock with even columns.
#[derive(Clone, Debug)]
pub struct HexTiling {
    size: f32,
    columns: u32,
    rows: u32,
    sites: Vec<CellSite>,
}

impl HexTiling {
    /// Lays out hexagons of edge length `size` over a `viewport`-sized area.
    pub fn build(viewport: Vec2, size: f32) -> Self {
        let size = if size.is_finite() {
            size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        };
        let hex_height = math::hex_height(size);
        let horizontal_spacing = size * 1.5;
        let vertical_spacing = hex_height;
        let columns = math::covering_count(viewport.x, horizontal_spacing, OVERSCAN);
        let rows = math::covering_count(viewport.y, vertical_spacing, OVERSCAN);

        let mut sites = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for col in 0..columns {
                let offset_y = if col % 2 == 0 { 0.0 } else { hex_height / 2.0 };
                let anchor = Vec2::new(
                    col as f32 * horizontal_spacing - size,
                    row as f32 * vertical_spacing + offset_y - size,
                );
                let center = Vec2::new(anchor.x + size, anchor.y + hex_height / 2.0);
                sites.push(CellSite {
                    row,
                    col,
                    anchor,
                    center,
                });
            }
        }

        Self {
            size,
            columns,
            rows,
            sites,
        }
    }

    /// Hexagon edge length the tiling was built with.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Horizontal distance between adjacent column anchors.
    pub fn horizontal_spacing(&self) -> f32 {
        self.size * 1.5
    }

    /// Vertical distance between adjacent row anchors (one hexagon height).
    pub fn vertical_spacing(&self) -> f32 {
        math::hex_height(self.size)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// All sites in row-major order.
    pub fn sites(&self) -> &[CellSite] {
        &self.sites
    }

    pub fn cell_count(&self) -> usize {
        self.sites.len()
    }
}
