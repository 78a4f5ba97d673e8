use bevy::asset::RenderAssetUsages;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::ecs::error::Result;
use bevy::mesh::Indices;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::render::view::Hdr;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow, WindowResized};
use bevy_egui::{EguiContexts, egui};
use hexx::{HexLayout, HexOrientation, PlaneMeshBuilder};

use super::OverlayConfig;
use super::controller::HexOverlay;
use super::entities::{
    ActiveCell, ActiveOverlay, CellWriter, Decorative, HexCell, OverlayAssets, OverlayRoot, Pulse,
};
use super::hex_tiling::CellSite;
use super::surface::OverlaySurface;
use crate::math;

// ── Startup ────────────────────────────────────────────────────────

/// Spawns the 2D camera, the overlay container and the shared hexagon mesh.
pub fn spawn_overlay_root(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    cfg: Res<OverlayConfig>,
) {
    commands.spawn((
        Name::new("Camera"),
        Camera2d,
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: cfg.bloom_intensity,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
    ));

    let root = commands
        .spawn((
            Name::new("HexOverlay"),
            OverlayRoot,
            Decorative,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let hex_mesh = meshes.add(hexagon_mesh());
    commands.insert_resource(OverlayAssets { root, hex_mesh });
}

/// Builds the first grid against the primary window and requests the first pass.
pub fn build_initial_grid(mut writer: CellWriter, windows: Query<&Window, With<PrimaryWindow>>) {
    let Ok(window) = windows.single() else {
        return;
    };
    let viewport = window.size();
    let cfg = OverlayConfig::clone(&writer.cfg);
    let overlay = HexOverlay::new(&cfg, viewport, &mut writer.surface(viewport));
    writer.commands.insert_resource(ActiveOverlay(overlay));
}

/// Unit-radius flat-topped hexagon in the XY plane.
fn hexagon_mesh() -> Mesh {
    let unit_layout = HexLayout {
        orientation: HexOrientation::Flat,
        scale: Vec2::splat(1.0),
        ..default()
    };
    let info = PlaneMeshBuilder::new(&unit_layout).facing(Vec3::Z).build();
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, info.vertices)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, info.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, info.uvs)
    .with_inserted_indices(Indices::U16(info.indices))
}

// ── Surface: cells as entities ─────────────────────────────────────

/// [`OverlaySurface`] backed by deferred [`Commands`].
///
/// Cell entities are children of the overlay root and carry their own
/// [`ColorMaterial`]; activation state is expressed by inserting and removing
/// [`Pulse`] and [`ActiveCell`].
pub struct CommandSurface<'a, 'w, 's> {
    writer: &'a mut CellWriter<'w, 's>,
    viewport: Vec2,
}

impl<'w, 's> CellWriter<'w, 's> {
    /// Borrows the writer as a surface for a viewport of the given size.
    pub fn surface(&mut self, viewport: Vec2) -> CommandSurface<'_, 'w, 's> {
        CommandSurface {
            writer: self,
            viewport,
        }
    }
}

impl OverlaySurface for CommandSurface<'_, '_, '_> {
    type Node = Entity;

    fn spawn_cell(&mut self, site: &CellSite, size: f32) -> Entity {
        let w = &mut *self.writer;
        let center = site.anchor + Vec2::new(size, math::hex_height(size) / 2.0);
        let pos = math::viewport_to_world(center, self.viewport);
        let scale = size * (1.0 - w.cfg.cell_gap);
        let material = w.materials.add(ColorMaterial::from_color(w.cfg.base_color));
        let root = w.assets.root;

        let entity = w
            .commands
            .spawn((
                HexCell {
                    row: site.row,
                    col: site.col,
                },
                Name::new(format!("HexCell({},{})", site.row, site.col)),
                Mesh2d(w.assets.hex_mesh.clone()),
                MeshMaterial2d(material),
                Transform::from_xyz(pos.x, pos.y, 0.0).with_scale(Vec3::new(scale, scale, 1.0)),
            ))
            .id();
        w.commands.entity(root).add_child(entity);
        entity
    }

    fn discard(&mut self, node: Entity) {
        self.writer.commands.entity(node).despawn();
    }

    fn set_pulse(&mut self, node: Entity, intensity: f32) {
        self.writer.commands.entity(node).insert(Pulse(intensity));
    }

    fn clear_pulse(&mut self, node: Entity) {
        self.writer.commands.entity(node).remove::<Pulse>();
    }

    fn mark_active(&mut self, node: Entity, delay_secs: f32) {
        let activated_at = self.writer.time.elapsed_secs();
        self.writer.commands.entity(node).insert(ActiveCell {
            delay_secs,
            activated_at,
        });
    }

    fn unmark_active(&mut self, node: Entity) {
        self.writer.commands.entity(node).remove::<ActiveCell>();
    }
}

// ── Update: input ──────────────────────────────────────────────────

/// Rebuilds the grid when the primary window changes size.
///
/// The new size is read from the window itself rather than the message payload.
pub fn on_viewport_resized(
    mut resized: MessageReader<WindowResized>,
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut overlay: ResMut<ActiveOverlay>,
    mut writer: CellWriter,
) {
    let Ok((primary, window)) = windows.single() else {
        return;
    };
    let mut hit = false;
    for ev in resized.read() {
        hit |= ev.window == primary;
    }
    if !hit {
        return;
    }
    let viewport = window.size();
    overlay.0.resized(&mut writer.surface(viewport), viewport);
}

/// Tracks the cursor over the primary window.
pub fn on_pointer_moved(
    mut moved: MessageReader<CursorMoved>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut overlay: ResMut<ActiveOverlay>,
) {
    let Ok(primary) = windows.single() else {
        return;
    };
    for ev in moved.read().filter(|ev| ev.window == primary) {
        overlay.0.pointer_moved(ev.position);
    }
}

/// Parks the pointer off-grid when the cursor leaves the primary window.
///
/// Runs after [`on_pointer_moved`], so a leave wins over moves in the same frame.
pub fn on_pointer_left(
    mut left: MessageReader<CursorLeft>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut overlay: ResMut<ActiveOverlay>,
) {
    let Ok(primary) = windows.single() else {
        return;
    };
    for _ in left.read().filter(|ev| ev.window == primary) {
        debug!("pointer left the window");
        overlay.0.pointer_left();
    }
}

// ── Update: evaluation + styling ───────────────────────────────────

/// Runs the proximity pass if anything requested one this frame.
pub fn refresh_overlay(mut overlay: ResMut<ActiveOverlay>, mut writer: CellWriter) {
    let viewport = overlay.0.viewport();
    let mut rng = rand::thread_rng();
    let Some(summary) = overlay.0.refresh(&mut writer.surface(viewport), &mut rng) else {
        return;
    };
    if !summary.is_quiet() {
        debug!(
            "pulse pass: {} in range, {} activated, {} deactivated",
            summary.in_range, summary.activated, summary.deactivated
        );
    }
}

/// Turns [`Pulse`] / [`ActiveCell`] state into material colors.
///
/// Active cells stay at the base color until their activation delay has
/// elapsed, then pulse with a strength scaled by their intensity. Cells that
/// lost [`ActiveCell`] this frame are reset to the base color.
pub fn paint_cells(
    time: Res<Time>,
    cfg: Res<OverlayConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    active_q: Query<(&MeshMaterial2d<ColorMaterial>, &Pulse, &ActiveCell)>,
    cell_q: Query<&MeshMaterial2d<ColorMaterial>, With<HexCell>>,
    mut deactivated: RemovedComponents<ActiveCell>,
) {
    let now = time.elapsed_secs();
    let base = cfg.base_color.to_srgba();
    let glow = cfg.glow_color.to_srgba();

    for (material, pulse, active) in &active_q {
        let t = now - active.activated_at - active.delay_secs;
        if t < 0.0 {
            continue;
        }
        let strength = pulse.0 * (0.55 + 0.45 * math::pulse_wave(t, cfg.pulse_period));
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.color = math::blend(base, glow, strength).into();
        }
    }

    for entity in deactivated.read() {
        if let Ok(material) = cell_q.get(entity)
            && let Some(mat) = materials.get_mut(&material.0)
        {
            mat.color = cfg.base_color;
        }
    }
}

// ── Debugging ──────────────────────────────────────────────────────

/// Grid, pointer and scheduler stats in an egui window.
pub fn draw_debug_panel(mut contexts: EguiContexts, overlay: Res<ActiveOverlay>) -> Result {
    let ctx = contexts.ctx_mut()?;
    let overlay = &overlay.0;
    let tiling = overlay.tiling();
    let viewport = overlay.viewport();
    let pointer = overlay.pointer();
    let scheduler = overlay.scheduler();
    let summary = overlay.last_summary();
    let active = overlay.cells().iter().filter(|c| c.active).count();

    egui::Window::new("Hex overlay").show(ctx, |ui| {
        ui.label(format!("viewport: {:.0} x {:.0}", viewport.x, viewport.y));
        ui.label(format!(
            "grid: {} cols x {} rows = {} cells (size {:.1})",
            tiling.columns(),
            tiling.rows(),
            tiling.cell_count(),
            tiling.size()
        ));
        ui.label(format!(
            "spacing: {:.2} h / {:.2} v",
            tiling.horizontal_spacing(),
            tiling.vertical_spacing()
        ));
        ui.label(format!("pointer: ({:.1}, {:.1})", pointer.x, pointer.y));
        ui.label(format!(
            "active: {active} (last pass: {} in range, +{} / -{})",
            summary.in_range, summary.activated, summary.deactivated
        ));
        ui.separator();
        ui.label(format!(
            "requests: {}  coalesced: {}  refreshes: {}  pending: {}",
            scheduler.requested,
            scheduler.coalesced,
            scheduler.refreshes,
            scheduler.is_pending()
        ));
    });
    Ok(())
}
