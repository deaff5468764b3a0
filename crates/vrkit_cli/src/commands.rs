//! Subcommand implementations. Each returns the JSON document to print.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use state_computation::{LiveAutoConnectComputation, SharedAppState, SharedState};
use std::path::Path;
use std::sync::Arc;
use vr_layout::dashboard::refresh_canonical_screen_rects;
use vr_layout::{
    convert_vr_size_to_screen_rect, try_convert_screen_rect_to_vr_layout,
    try_convert_vr_layout_to_screen_rect, LayoutRect, RectangleLayoutTool,
};
use vrkit_models::{DashboardConfig, PositionF, RectF, RectI, SizeF, SizeI, VRLayout, VRPose};

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize result")
}

pub fn texture_size(size: SizeF) -> Result<Value> {
    to_json(&convert_vr_size_to_screen_rect(size))
}

pub fn to_vr(surface: SizeI, rect: RectI) -> Result<Value> {
    let layout = try_convert_screen_rect_to_vr_layout(surface, rect)?;
    log::debug!("{:?} on {:?} -> {:?}", rect, surface, layout);
    to_json(&layout)
}

pub fn to_screen(surface: SizeI, pose: PositionF, size: SizeF) -> Result<Value> {
    let layout = VRLayout {
        pose: VRPose::new(pose.x, pose.y),
        size,
        screen_rect: convert_vr_size_to_screen_rect(size),
    };
    let rect = try_convert_vr_layout_to_screen_rect(surface, &layout)?;
    to_json(&rect)
}

pub fn place(
    container: RectF,
    size: SizeF,
    anchor: Option<PositionF>,
    occupied: &[RectF],
    floating: bool,
    count: usize,
) -> Result<Value> {
    let mut tool = RectangleLayoutTool::new(container, floating, anchor);
    tool.extend(occupied.iter().copied().map(LayoutRect::from));

    let mut positions = Vec::with_capacity(count);
    for i in 0..count {
        let position = tool
            .place(size.width, size.height)
            .with_context(|| format!("Unable to place overlay {} of {}", i + 1, count))?;
        positions.push(position);
    }

    to_json(&positions)
}

pub fn refresh_dashboard(file: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Unable to read dashboard ({})", file.display()))?;
    let mut config: DashboardConfig = serde_json::from_str(&text)
        .with_context(|| format!("Unable to parse dashboard ({})", file.display()))?;

    let refreshed = refresh_canonical_screen_rects(&mut config);
    log::info!(
        "Refreshed {} placement(s) in dashboard ({})",
        refreshed,
        config.id
    );

    to_json(&config)
}

pub fn auto_connect(file: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Unable to read state snapshots ({})", file.display()))?;
    let snapshots: Vec<SharedAppState> = serde_json::from_str(&text)
        .with_context(|| format!("Unable to parse state snapshots ({})", file.display()))?;

    let state = SharedState::new(SharedAppState::default());
    let computation = LiveAutoConnectComputation::new(state.clone());

    let signals = Arc::new(Mutex::new(Vec::new()));
    let current_step = Arc::new(Mutex::new(0usize));

    let sink = signals.clone();
    let step = current_step.clone();
    computation.on_change(move |ev| {
        let step = *step.lock();
        log::info!("Step {}: connecting to LIVE session ({:?})", step, ev.target);
        sink.lock().push(json!({ "step": step, "sessionId": ev.target }));
    });

    for (i, snapshot) in snapshots.into_iter().enumerate() {
        *current_step.lock() = i;
        state.update(|s| *s = snapshot);
    }

    computation.dispose();
    let signals = signals.lock().clone();
    Ok(Value::Array(signals))
}
