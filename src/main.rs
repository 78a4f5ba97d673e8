#![warn(missing_docs)]
//! Interactive hexagonal grid overlay.
//!
//! Tiles the window with flat-topped hexagons that pulse as the cursor passes
//! near them. Cells within the activation radius glow with an intensity that
//! falls off linearly with distance, each starting after a small random delay.

pub mod math;
mod overlay;

use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use overlay::{OverlayConfig, OverlayPlugin};

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum AppState {
    /// Overlay running normally.
    #[default]
    Running,
    /// Inspector and stats panel visible (Tab to toggle).
    Debugging,
}

/// Command-line overrides for the overlay geometry.
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Hexagon edge length in logical pixels.
    #[arg(long, default_value_t = 26.0, value_parser = positive_length)]
    hex_size: f32,
    /// Pointer distance at which cells start to light up.
    #[arg(long, default_value_t = 200.0, value_parser = positive_length)]
    radius: f32,
}

#[cfg(feature = "native")]
fn positive_length(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(format!("`{s}` must be a finite length greater than zero"))
    }
}

#[cfg(feature = "native")]
fn overlay_config() -> OverlayConfig {
    use clap::Parser;

    let cli = Cli::parse();
    OverlayConfig {
        hex_size: cli.hex_size,
        active_radius: cli.radius,
        ..default()
    }
}

#[cfg(not(feature = "native"))]
fn overlay_config() -> OverlayConfig {
    OverlayConfig::default()
}

fn main() {
    let config = overlay_config();
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Pulse".into(),
            #[cfg(feature = "web")]
            fit_canvas_to_parent: true,
            #[cfg(feature = "web")]
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    }))
    .register_type::<AppState>()
    .init_state::<AppState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(OverlayPlugin(config))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(AppState::Debugging)));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<AppState>>,
    mut next: ResMut<NextState<AppState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            AppState::Running => AppState::Debugging,
            AppState::Debugging => AppState::Running,
        };
        info!("switching to {new_state:?}");
        next.set(new_state);
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults_match_overlay_defaults() {
        let cli = Cli::try_parse_from(["hex-pulse"]).unwrap();
        let defaults = OverlayConfig::default();
        assert_eq!(cli.hex_size, defaults.hex_size);
        assert_eq!(cli.radius, defaults.active_radius);
    }

    #[test]
    fn cli_accepts_overrides() {
        let cli = Cli::try_parse_from(["hex-pulse", "--hex-size", "40", "--radius", "120.5"])
            .unwrap();
        assert_eq!(cli.hex_size, 40.0);
        assert_eq!(cli.radius, 120.5);
    }

    #[test]
    fn cli_rejects_non_positive_lengths() {
        assert!(Cli::try_parse_from(["hex-pulse", "--hex-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["hex-pulse", "--radius", "-3"]).is_err());
        assert!(Cli::try_parse_from(["hex-pulse", "--radius", "inf"]).is_err());
        assert!(Cli::try_parse_from(["hex-pulse", "--hex-size", "wide"]).is_err());
    }
}
