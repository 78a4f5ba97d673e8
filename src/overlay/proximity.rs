use bevy::prelude::*;
use rand::Rng;

use super::surface::OverlaySurface;
use crate::math;

/// One hexagon of the live grid.
#[derive(Clone, Debug)]
pub struct Cell<N> {
    /// Visual node owned by this cell.
    pub element: N,
    /// Center in viewport space, fixed at build time.
    pub center: Vec2,
    /// Whether the last evaluated pointer was within the activation radius.
    pub active: bool,
}

/// Per-pass counts, for logging and the debug panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalSummary {
    /// Cells within the radius after this pass.
    pub in_range: usize,
    /// Cells that went inactive → active.
    pub activated: usize,
    /// Cells that went active → inactive.
    pub deactivated: usize,
}

impl EvalSummary {
    /// True when no cell changed activation state.
    pub fn is_quiet(&self) -> bool {
        self.activated == 0 && self.deactivated == 0
    }
}

/// Syncs every cell's activation state and pulse signal with `pointer`.
///
/// In-range cells (`distance <= radius`, inclusive) always get their intensity
/// rewritten; the active marker and its random delay in `[0, max_delay)` are
/// only written on the inactive → active transition. Out-of-range cells are
/// only touched if they were active.
pub fn evaluate<S, R>(
    cells: &mut [Cell<S::Node>],
    pointer: Vec2,
    radius: f32,
    max_delay: f32,
    surface: &mut S,
    rng: &mut R,
) -> EvalSummary
where
    S: OverlaySurface,
    R: Rng,
{
    let radius_sq = radius * radius;
    let mut summary = EvalSummary::default();

    for cell in cells.iter_mut() {
        let distance_sq = math::distance_sq(pointer, cell.center);

        if distance_sq <= radius_sq {
            summary.in_range += 1;
            let intensity = math::pulse_intensity(distance_sq, radius);
            surface.set_pulse(cell.element, math::quantize_pulse(intensity));
            if !cell.active {
                cell.active = true;
                let delay = if max_delay > 0.0 {
                    rng.gen_range(0.0..max_delay)
                } else {
                    0.0
                };
                surface.mark_active(cell.element, delay);
                summary.activated += 1;
            }
        } else if cell.active {
            cell.active = false;
            surface.unmark_active(cell.element);
            surface.clear_pulse(cell.element);
            summary.deactivated += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::hex_tiling::CellSite;
    use crate::overlay::surface::recording::RecordingSurface;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const RADIUS: f32 = 200.0;
    const MAX_DELAY: f32 = 0.25;

    fn cells_at(surface: &mut RecordingSurface, centers: &[Vec2]) -> Vec<Cell<usize>> {
        centers
            .iter()
            .map(|&center| {
                let site = CellSite {
                    row: 0,
                    col: 0,
                    anchor: center - Vec2::new(26.0, 22.5),
                    center,
                };
                Cell {
                    element: surface.spawn_cell(&site, 26.0),
                    center,
                    active: false,
                }
            })
            .collect()
    }

    fn run(
        cells: &mut [Cell<usize>],
        pointer: Vec2,
        surface: &mut RecordingSurface,
    ) -> EvalSummary {
        let mut rng = StdRng::seed_from_u64(7);
        evaluate(cells, pointer, RADIUS, MAX_DELAY, surface, &mut rng)
    }

    #[test]
    fn pointer_on_center_gives_full_intensity() {
        let mut surface = RecordingSurface::default();
        let mut cells = cells_at(&mut surface, &[Vec2::new(300.0, 300.0)]);
        let summary = run(&mut cells, Vec2::new(300.0, 300.0), &mut surface);
        assert!(cells[0].active);
        assert_eq!(surface.nodes[0].pulse, Some(1.0));
        assert!(surface.nodes[0].active);
        assert_eq!(summary.activated, 1);
    }

    #[test]
    fn boundary_is_inclusive() {
        let mut surface = RecordingSurface::default();
        let mut cells = cells_at(&mut surface, &[Vec2::new(300.0, 300.0)]);
        run(&mut cells, Vec2::new(500.0, 300.0), &mut surface);
        assert!(cells[0].active, "distance == radius must be in range");
        assert_eq!(surface.nodes[0].pulse, Some(0.0));
    }

    #[test]
    fn just_outside_radius_is_inactive() {
        let mut surface = RecordingSurface::default();
        let mut cells = cells_at(&mut surface, &[Vec2::new(300.0, 300.0)]);
        run(&mut cells, Vec2::new(300.0, 300.0), &mut surface);
        run(&mut cells, Vec2::new(300.0, 501.0), &mut surface);
        assert!(!cells[0].active);
        assert!(!surface.nodes[0].active);
        assert_eq!(surface.nodes[0].pulse, None);
    }

    #[test]
    fn never_active_cell_receives_no_writes() {
        let mut surface = RecordingSurface::default();
        let mut cells = cells_at(&mut surface, &[Vec2::new(0.0, 0.0)]);
        let summary = run(&mut cells, Vec2::new(900.0, 900.0), &mut surface);
        assert_eq!(summary, EvalSummary::default());
        assert_eq!(surface.marker_writes, 0);
        assert_eq!(surface.pulse_writes, 0);
    }

    #[test]
    fn active_flag_matches_distance_everywhere() {
        let mut surface = RecordingSurface::default();
        let centers: Vec<Vec2> = (0..20)
            .flat_map(|i| (0..15).map(move |j| Vec2::new(i as f32 * 39.0, j as f32 * 45.0)))
            .collect();
        let mut cells = cells_at(&mut surface, &centers);
        for pointer in [
            Vec2::new(100.0, 100.0),
            Vec2::new(390.0, 320.0),
            Vec2::new(-RADIUS, -RADIUS),
            Vec2::new(760.0, 10.0),
        ] {
            run(&mut cells, pointer, &mut surface);
            for cell in &cells {
                let d2 = math::distance_sq(pointer, cell.center);
                let node = &surface.nodes[cell.element];
                assert_eq!(cell.active, d2 <= RADIUS * RADIUS);
                assert_eq!(node.active, cell.active);
                match node.pulse {
                    Some(p) => {
                        let expected = 1.0 - d2.sqrt() / RADIUS;
                        assert!((0.0..=1.0).contains(&p), "pulse {p} out of range");
                        assert!((p - expected).abs() <= 5e-4, "pulse {p} vs {expected}");
                    }
                    None => assert!(!cell.active),
                }
            }
        }
    }

    #[test]
    fn second_pass_only_rewrites_intensity() {
        let mut surface = RecordingSurface::default();
        let mut cells = cells_at(
            &mut surface,
            &[Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), Vec2::new(900.0, 0.0)],
        );
        let pointer = Vec2::new(10.0, 0.0);
        run(&mut cells, pointer, &mut surface);
        let markers = surface.marker_writes;
        let pulses = surface.pulse_writes;
        let before = surface.nodes.clone();

        let summary = run(&mut cells, pointer, &mut surface);
        assert!(summary.is_quiet());
        assert_eq!(surface.marker_writes, markers, "markers must not be re-added");
        assert_eq!(surface.pulse_writes, pulses + 2, "active cells rewrite intensity");
        assert_eq!(surface.nodes, before);
    }

    #[test]
    fn delay_is_drawn_once_per_activation() {
        let mut surface = RecordingSurface::default();
        let mut cells = cells_at(&mut surface, &[Vec2::new(0.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(42);
        evaluate(&mut cells, Vec2::ZERO, RADIUS, MAX_DELAY, &mut surface, &mut rng);
        let first = surface.nodes[0].delay.expect("delay assigned on activation");
        assert!((0.0..MAX_DELAY).contains(&first));

        evaluate(&mut cells, Vec2::new(5.0, 5.0), RADIUS, MAX_DELAY, &mut surface, &mut rng);
        assert_eq!(surface.nodes[0].delay, Some(first), "delay is one-shot");
    }

    #[test]
    fn zero_max_delay_activates_immediately() {
        let mut surface = RecordingSurface::default();
        let mut cells = cells_at(&mut surface, &[Vec2::new(0.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        evaluate(&mut cells, Vec2::ZERO, RADIUS, 0.0, &mut surface, &mut rng);
        assert_eq!(surface.nodes[0].delay, Some(0.0));
    }
}
