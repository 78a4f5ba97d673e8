use super::hex_tiling::CellSite;

/// Host-side sink owning the visual node of every cell.
///
/// The controller never reads geometry back from a node; it only creates,
/// mutates and discards them through this trait. Bevy's implementation lives
/// in `systems::CommandSurface`.
pub trait OverlaySurface {
    /// Handle to one visual node.
    type Node: Copy;

    /// Creates a node positioned by `site.anchor` and tagged with `size`.
    fn spawn_cell(&mut self, site: &CellSite, size: f32) -> Self::Node;

    /// Destroys a node created by [`spawn_cell`](Self::spawn_cell).
    fn discard(&mut self, node: Self::Node);

    /// Writes the pulse intensity signal (`[0, 1]`).
    fn set_pulse(&mut self, node: Self::Node, intensity: f32);

    /// Removes the pulse intensity signal.
    fn clear_pulse(&mut self, node: Self::Node);

    /// Adds the active marker with a one-time animation delay in seconds.
    fn mark_active(&mut self, node: Self::Node, delay_secs: f32);

    /// Removes the active marker.
    fn unmark_active(&mut self, node: Self::Node);
}
