//! 12-lead tile layout and hit testing.

use glam::Vec2;

use crate::lead::LeadId;

pub const LAYOUT_ROWS: [[LeadId; 4]; 3] = [
    [LeadId::I, LeadId::AVR, LeadId::V1, LeadId::V4],
    [LeadId::II, LeadId::AVL, LeadId::V2, LeadId::V5],
    [LeadId::III, LeadId::AVF, LeadId::V3, LeadId::V6],
];

pub const TILE_GUTTER_PX: f32 = 8.0;
pub const READOUT_STRIP_PX: f32 = 36.0;
pub const READOUT_PADDING_PX: f32 = 28.0;
const TILE_BASELINE_SHIFT_PX: f32 = 16.0;
const TILE_BASELINE_MARGIN_PX: f32 = 18.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub lead: LeadId,
    pub origin: Vec2,
    pub size: Vec2,
}

impl Viewport {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.size.x
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.size.y
    }

    /// Baseline y for the trace, nudged below centre and kept inside the tile.
    pub fn baseline_y(&self) -> f32 {
        let raw = self.origin.y + self.size.y * 0.5 + TILE_BASELINE_SHIFT_PX;
        let lo = self.origin.y + TILE_BASELINE_MARGIN_PX;
        let hi = self.origin.y + self.size.y - TILE_BASELINE_MARGIN_PX;
        if lo > hi {
            return self.origin.y + self.size.y * 0.5;
        }
        raw.clamp(lo, hi)
    }
}

/// Tile the surface into a 3x4 grid above the readout strip. Empty for
/// surfaces too small to hold a tile.
pub fn twelve_lead_grid(width: f32, height: f32) -> Vec<Viewport> {
    let cols = LAYOUT_ROWS[0].len() as f32;
    let rows = LAYOUT_ROWS.len() as f32;
    let usable_h = height - READOUT_STRIP_PX - READOUT_PADDING_PX;
    let tile_w = (width - TILE_GUTTER_PX * (cols + 1.0)) / cols;
    let tile_h = (usable_h - TILE_GUTTER_PX * (rows + 1.0)) / rows;
    if !(tile_w > 0.0 && tile_h > 0.0) {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(12);
    for (r, row) in LAYOUT_ROWS.iter().enumerate() {
        for (c, lead) in row.iter().enumerate() {
            out.push(Viewport {
                lead: *lead,
                origin: Vec2::new(
                    TILE_GUTTER_PX + c as f32 * (tile_w + TILE_GUTTER_PX),
                    TILE_GUTTER_PX + r as f32 * (tile_h + TILE_GUTTER_PX),
                ),
                size: Vec2::new(tile_w, tile_h),
            });
        }
    }
    out
}

pub fn lead_at_point(viewports: &[Viewport], p: Vec2) -> Option<LeadId> {
    viewports.iter().find(|vp| vp.contains(p)).map(|vp| vp.lead)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_twelve_distinct_tiles() {
        let tiles = twelve_lead_grid(1000.0, 600.0);
        assert_eq!(tiles.len(), 12);
        let mut leads: Vec<_> = tiles.iter().map(|t| t.lead).collect();
        leads.sort();
        leads.dedup();
        assert_eq!(leads.len(), 12);
    }

    #[test]
    fn hit_testing_finds_tile_centres() {
        let tiles = twelve_lead_grid(1000.0, 600.0);
        for t in &tiles {
            let centre = t.origin + t.size * 0.5;
            assert_eq!(lead_at_point(&tiles, centre), Some(t.lead));
            let y = t.baseline_y();
            assert!(y >= t.origin.y && y <= t.origin.y + t.size.y);
        }
        assert_eq!(lead_at_point(&tiles, Vec2::new(2.0, 2.0)), None);
    }

    #[test]
    fn tiny_surface_has_no_tiles() {
        assert!(twelve_lead_grid(0.0, 0.0).is_empty());
    }
}
