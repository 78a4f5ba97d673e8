//! Interactive hexagonal grid overlay.
//!
//! Tiles the window with flat-topped hexagons and lights up the ones near the
//! cursor. Input systems feed a single `HexOverlay` controller, which
//! coalesces requests so the proximity pass runs at most once per frame.

mod controller;
mod entities;
mod hex_tiling;
mod proximity;
mod scheduler;
mod surface;
mod systems;

use entities::{ActiveCell, ActiveOverlay, Decorative, HexCell, OverlayRoot, Pulse};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::AppState;

/// Per-plugin configuration for the overlay.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct OverlayConfig {
    /// Hexagon edge length in logical pixels.
    pub hex_size: f32,
    /// Pointer distance (logical pixels) within which a cell is active.
    pub active_radius: f32,
    /// Upper bound (exclusive) of the random activation stagger, in seconds.
    pub max_activation_delay: f32,
    /// Duration of one pulse cycle, in seconds.
    pub pulse_period: f32,
    /// Fraction of each hexagon left as a gap to its neighbours.
    pub cell_gap: f32,
    /// Bloom post-processing intensity.
    pub bloom_intensity: f32,
    /// Resting cell color.
    pub base_color: Color,
    /// Color at full intensity. Values above 1.0 feed the bloom pass.
    pub glow_color: Color,
    /// Background clear color.
    pub clear_color: Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            hex_size: 26.0,
            active_radius: 200.0,
            max_activation_delay: 0.25,
            pulse_period: 1.2,
            cell_gap: 0.08,
            bloom_intensity: 0.3,
            base_color: Color::srgb(0.02, 0.03, 0.05),
            glow_color: Color::srgb(0.0, 1.6, 3.2),
            clear_color: Color::srgb(0.01, 0.01, 0.02),
        }
    }
}

/// Hex overlay plugin: grid build at startup, pointer tracking and pulse at runtime.
pub struct OverlayPlugin(pub OverlayConfig);

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OverlayConfig>()
            .register_type::<OverlayRoot>()
            .register_type::<Decorative>()
            .register_type::<HexCell>()
            .register_type::<Pulse>()
            .register_type::<ActiveCell>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .add_systems(
                Startup,
                (systems::spawn_overlay_root, systems::build_initial_grid).chain(),
            )
            .add_systems(
                Update,
                (
                    systems::on_viewport_resized,
                    systems::on_pointer_moved,
                    systems::on_pointer_left,
                    systems::refresh_overlay,
                    systems::paint_cells,
                )
                    .chain()
                    .run_if(resource_exists::<ActiveOverlay>),
            );

        app.add_systems(
            EguiPrimaryContextPass,
            systems::draw_debug_panel
                .run_if(in_state(AppState::Debugging))
                .run_if(resource_exists::<ActiveOverlay>),
        );
    }
}
