// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Stellar Sandbox
// Renders a few frames of a data-driven frame shader on a headless device.

mod headless;
mod scene;
mod shaders;

use anyhow::{Context, Result};
use headless::HeadlessDevice;
use scene::DemoScene;
use stellar_core::math::{Mat4, Vec3, FRAC_PI_4};
use stellar_core::TransformSet;
use stellar_frame::{FrameContext, FrameShader};

const DEFAULT_FRAME: &str = include_str!("../assets/forward.ron");
const FRAME_COUNT: usize = 3;
const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read frame description '{path}'"))?,
        None => DEFAULT_FRAME.to_string(),
    };

    let mut library = shaders::build_library()?;
    let skinned = library.feature_mask("Skinned")?;
    let mut device = HeadlessDevice::default();
    let mut frame = FrameShader::from_ron_str(&text, &mut library, &mut device)?;

    let mut scene = DemoScene::new(skinned);
    let result = run(&mut frame, &mut scene, &mut device);
    frame.discard(&mut device);
    result?;

    log::info!(
        "Sandbox: done, {} render target(s) still alive",
        device.live_targets()
    );
    Ok(())
}

fn run(frame: &mut FrameShader, scene: &mut DemoScene, device: &mut HeadlessDevice) -> Result<()> {
    let mut transforms = TransformSet::new();
    transforms.set_proj(Mat4::perspective_rh_zo(FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0));

    for index in 0..FRAME_COUNT {
        let time = index as f32 * FRAME_TIME;
        let eye = Vec3::new(8.0 * (0.2 * time).cos(), 4.0, 8.0 * (0.2 * time).sin());
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).context("degenerate camera")?;
        transforms.set_view(view);
        scene.update(time, eye)?;

        let mut ctx = FrameContext::new(device, &*scene, &mut transforms);
        frame
            .render(&mut ctx)
            .with_context(|| format!("frame {index} failed"))?;

        let stats = device.take_stats();
        log::info!(
            "Sandbox: frame {index}: {} pass(es), {} batch(es), {} draw(s), {} quad(s), {} constant byte(s)",
            stats.passes,
            stats.batches,
            stats.draws,
            stats.fullscreen_quads,
            stats.constant_bytes
        );
    }
    log::info!(
        "Sandbox: {} transform recomputation(s) over {FRAME_COUNT} frame(s)",
        transforms.recompute_count()
    );
    Ok(())
}
