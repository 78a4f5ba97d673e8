use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::OverlayConfig;
use super::controller::HexOverlay;

/// Marker on the container entity that parents every cell.
#[derive(Component, Reflect)]
pub struct OverlayRoot;

/// The overlay is purely visual: nothing under it takes focus or input.
#[derive(Component, Reflect)]
pub struct Decorative;

/// Marker on cell entities, with their tiling coordinates.
#[derive(Component, Reflect)]
pub struct HexCell {
    /// Tiling row.
    pub row: u32,
    /// Tiling column.
    pub col: u32,
}

/// Pulse intensity in `[0, 1]`. Present only while the cell is active.
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq)]
pub struct Pulse(pub f32);

/// Active marker. Inserted once on activation, removed on deactivation.
#[derive(Component, Reflect, Clone, Copy, Debug)]
pub struct ActiveCell {
    /// One-time stagger before the pulse animation starts (seconds).
    pub delay_secs: f32,
    /// `Time::elapsed_secs` when the cell activated.
    pub activated_at: f32,
}

/// The live overlay controller, keyed by cell entity.
#[derive(Resource)]
pub struct ActiveOverlay(pub HexOverlay<Entity>);

/// Shared render handles, created once at startup.
#[derive(Resource)]
pub struct OverlayAssets {
    /// Container entity; cells are its children.
    pub root: Entity,
    /// Unit flat-topped hexagon, scaled per cell.
    pub hex_mesh: Handle<Mesh>,
}

/// Bundled system parameters for creating and mutating cell entities.
#[derive(SystemParam)]
pub struct CellWriter<'w, 's> {
    /// Deferred entity spawn/insert/remove.
    pub commands: Commands<'w, 's>,
    /// Per-cell materials, one per hexagon so colors can vary independently.
    pub materials: ResMut<'w, Assets<ColorMaterial>>,
    /// Root entity and shared mesh.
    pub assets: Res<'w, OverlayAssets>,
    /// Overlay configuration.
    pub cfg: Res<'w, OverlayConfig>,
    /// Frame clock, stamped onto activations.
    pub time: Res<'w, Time>,
}
