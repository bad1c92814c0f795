use std::sync::{Mutex, MutexGuard};

use elevation_profile_core::svg::render_svg;
use elevation_profile_core::{ChartConfig, ProfileChart, ProfileError, load};
use elevation_profile_protocol::Viewport;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use wasm_bindgen::prelude::*;

static CHART: Mutex<Option<ProfileChart>> = Mutex::new(None);

#[derive(Debug, Error)]
enum BridgeError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("invalid config: {0}")]
    Config(serde_json::Error),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no profile loaded; call update() first")]
    NotLoaded,
    #[error("chart state is poisoned")]
    Poisoned,
}

fn chart() -> Result<MutexGuard<'static, Option<ProfileChart>>, BridgeError> {
    CHART.lock().map_err(|_| BridgeError::Poisoned)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(value)?)
}

/// Bridge operations on the chart slot, kept free of JS types so they run
/// natively under test.
mod bridge {
    use super::*;

    pub(crate) fn update(slot: &mut Option<ProfileChart>, data: &[u8]) -> Result<(), BridgeError> {
        let snapshot = load(data)?;
        debug!(samples = snapshot.buffer().len(), "profile updated");
        match slot {
            Some(chart) => chart.set_snapshot(snapshot),
            None => {
                *slot = Some(ProfileChart::new(
                    snapshot,
                    ChartConfig::default(),
                    Viewport::new(0.0, 0.0),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn configure(
        slot: &mut Option<ProfileChart>,
        data: &[u8],
    ) -> Result<(), BridgeError> {
        let config = ChartConfig::from_json(data).map_err(BridgeError::Config)?;
        let chart = slot.take().ok_or(BridgeError::NotLoaded)?;
        let viewport = chart.viewport();
        let snapshot = chart.snapshot().clone();
        *slot = Some(ProfileChart::new(snapshot, config, viewport));
        Ok(())
    }

    pub(crate) fn sized(
        slot: &mut Option<ProfileChart>,
        width: f64,
        height: f64,
    ) -> Result<&mut ProfileChart, BridgeError> {
        let chart = slot.as_mut().ok_or(BridgeError::NotLoaded)?;
        let viewport = Viewport::new(width, height);
        if chart.viewport() != viewport {
            chart.resize(viewport);
        }
        Ok(chart)
    }

    pub(crate) fn pointer_move(
        slot: &mut Option<ProfileChart>,
        x: f64,
    ) -> Result<Option<String>, BridgeError> {
        let chart = slot.as_mut().ok_or(BridgeError::NotLoaded)?;
        let event = chart
            .pointer_move(x)
            .map_err(|e| BridgeError::Profile(e.into()))?;
        event.as_ref().map(to_json).transpose()
    }

    pub(crate) fn pointer_out(slot: &mut Option<ProfileChart>) -> Result<String, BridgeError> {
        let chart = slot.as_mut().ok_or(BridgeError::NotLoaded)?;
        to_json(&chart.pointer_out())
    }
}

/// Replace the profile input. Accepts every shape the core parser
/// detects (input object, bare lines, GeoJSON).
#[wasm_bindgen]
pub fn update(input_json: &str) -> Result<(), JsError> {
    Ok(bridge::update(&mut *chart()?, input_json.as_bytes())?)
}

/// Apply a `ChartConfig` given as JSON; missing fields keep defaults.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsError> {
    Ok(bridge::configure(&mut *chart()?, config_json.as_bytes())?)
}

/// Render the chart at the given size as a standalone SVG document.
#[wasm_bindgen]
pub fn render(width: f64, height: f64, dark: bool) -> Result<String, JsError> {
    let mut slot = chart()?;
    let chart = bridge::sized(&mut slot, width, height)?;
    Ok(render_svg(&chart.render(), width, height, dark))
}

/// Render the chart at the given size, returning render commands as JSON.
#[wasm_bindgen]
pub fn render_commands(width: f64, height: f64) -> Result<String, JsError> {
    let mut slot = chart()?;
    let chart = bridge::sized(&mut slot, width, height)?;
    Ok(to_json(&chart.render())?)
}

/// Resolve a horizontal pointer position. Returns the `over` event as
/// JSON, or `undefined` on a miss.
#[wasm_bindgen]
pub fn pointer_move(x: f64) -> Result<Option<String>, JsError> {
    Ok(bridge::pointer_move(&mut *chart()?, x)?)
}

/// Clear the pointer and return the `out` event as JSON.
#[wasm_bindgen]
pub fn pointer_out() -> Result<String, JsError> {
    Ok(bridge::pointer_out(&mut *chart()?)?)
}
