use bevy::prelude::*;
use rand::Rng;

use super::OverlayConfig;
use super::hex_tiling::HexTiling;
use super::proximity::{self, Cell, EvalSummary};
use super::scheduler::RefreshScheduler;
use super::surface::OverlaySurface;

/// Owns all mutable overlay state: the grid, the pointer, and the scheduler.
///
/// Input handlers call [`pointer_moved`](Self::pointer_moved),
/// [`pointer_left`](Self::pointer_left) and [`resized`](Self::resized); the
/// per-frame [`refresh`](Self::refresh) runs the evaluator at most once no
/// matter how many requests arrived.
pub struct HexOverlay<N> {
    hex_size: f32,
    active_radius: f32,
    max_activation_delay: f32,
    viewport: Vec2,
    tiling: HexTiling,
    cells: Vec<Cell<N>>,
    pointer: Vec2,
    scheduler: RefreshScheduler,
    last_summary: EvalSummary,
}

impl<N: Copy> HexOverlay<N> {
    /// Builds the initial grid and requests the first refresh.
    ///
    /// The pointer starts at the viewport center so the first paint already
    /// shows a pulse.
    pub fn new<S>(cfg: &OverlayConfig, viewport: Vec2, surface: &mut S) -> Self
    where
        S: OverlaySurface<Node = N>,
    {
        let mut overlay = Self {
            hex_size: cfg.hex_size,
            active_radius: cfg.active_radius,
            max_activation_delay: cfg.max_activation_delay,
            viewport,
            tiling: HexTiling::build(Vec2::ZERO, cfg.hex_size),
            cells: Vec::new(),
            pointer: viewport / 2.0,
            scheduler: RefreshScheduler::default(),
            last_summary: EvalSummary::default(),
        };
        overlay.rebuild(surface, viewport);
        overlay.scheduler.request_update();
        overlay
    }

    /// Discards every node and lays out a fresh grid for `viewport`.
    fn rebuild<S>(&mut self, surface: &mut S, viewport: Vec2)
    where
        S: OverlaySurface<Node = N>,
    {
        for cell in self.cells.drain(..) {
            surface.discard(cell.element);
        }

        self.viewport = viewport;
        self.tiling = HexTiling::build(viewport, self.hex_size);
        let size = self.tiling.size();
        self.cells = self
            .tiling
            .sites()
            .iter()
            .map(|site| Cell {
                element: surface.spawn_cell(site, size),
                center: site.center,
                active: false,
            })
            .collect();

        info!(
            "hex grid {}x{}: {} columns x {} rows, {} cells",
            viewport.x,
            viewport.y,
            self.tiling.columns(),
            self.tiling.rows(),
            self.tiling.cell_count()
        );
    }

    /// Records a new pointer position and requests a refresh.
    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = pos;
        self.scheduler.request_update();
    }

    /// Parks the pointer off-grid so every cell deactivates on the next refresh.
    pub fn pointer_left(&mut self) {
        self.pointer = Vec2::splat(-self.active_radius);
        self.scheduler.request_update();
    }

    /// Replaces the grid wholesale for the new viewport and requests a refresh.
    pub fn resized<S>(&mut self, surface: &mut S, viewport: Vec2)
    where
        S: OverlaySurface<Node = N>,
    {
        self.rebuild(surface, viewport);
        self.scheduler.request_update();
    }

    /// Runs the evaluator if a refresh is pending.
    ///
    /// The pending flag is cleared before evaluation, so requests made while
    /// this runs are served on the next call.
    pub fn refresh<S, R>(&mut self, surface: &mut S, rng: &mut R) -> Option<EvalSummary>
    where
        S: OverlaySurface<Node = N>,
        R: Rng,
    {
        if !self.scheduler.take() {
            return None;
        }
        let summary = proximity::evaluate(
            &mut self.cells,
            self.pointer,
            self.active_radius,
            self.max_activation_delay,
            surface,
            rng,
        );
        self.last_summary = summary;
        Some(summary)
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn tiling(&self) -> &HexTiling {
        &self.tiling
    }

    pub fn cells(&self) -> &[Cell<N>] {
        &self.cells
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Summary of the most recent evaluation pass.
    pub fn last_summary(&self) -> EvalSummary {
        self.last_summary
    }
}
