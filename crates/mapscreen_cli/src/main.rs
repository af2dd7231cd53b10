//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mapscreen_core` linkage.
//! - Drive one headless map screen and print what a host would render.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `mapscreen_cli [config.json]`; without an argument the path comes
//! from `MAPSCREEN_CONFIG`, else defaults apply.

use mapscreen_core::{
    CommandBufferSurface, DeferredDirections, DeferredGeocoder, MapScreenConfig,
    MapScreenController, MapScreenProviders, TapGesture, Viewport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const VIEW_WIDTH: f64 = 390.0;
const VIEW_HEIGHT: f64 = 844.0;

fn main() -> ExitCode {
    println!("mapscreen_core ping={}", mapscreen_core::ping());
    println!("mapscreen_core version={}", mapscreen_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("mapscreen_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = MapScreenConfig::load(explicit.as_deref()).map_err(|err| err.to_string())?;

    let viewport =
        Viewport::new(VIEW_WIDTH, VIEW_HEIGHT).ok_or_else(|| "invalid viewport".to_string())?;
    let directions = Arc::new(DeferredDirections::new());
    let providers = MapScreenProviders {
        geocoder: Arc::new(DeferredGeocoder::new()),
        directions: directions.clone(),
        location: None,
    };
    let mut controller =
        MapScreenController::new(config, CommandBufferSurface::new(viewport), providers)
            .map_err(|err| err.to_string())?;
    controller.initialize().map_err(|err| err.to_string())?;

    // A tap at the view center asks for directions to (roughly) home.
    controller.handle_tap(TapGesture::ended(viewport.center()));

    let commands = controller.surface_mut().drain_commands();
    let commands_json = serde_json::to_string_pretty(&commands).map_err(|err| err.to_string())?;
    println!("surface commands:\n{commands_json}");

    let pending: Vec<_> = directions
        .pending()
        .into_iter()
        .map(|(request_id, request)| serde_json::json!({ "request_id": request_id, "request": request }))
        .collect();
    let pending_json = serde_json::to_string_pretty(&pending).map_err(|err| err.to_string())?;
    println!("pending directions:\n{pending_json}");
    Ok(())
}
