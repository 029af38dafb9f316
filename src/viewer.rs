//! Interactive native viewer.
//!
//! Hosts the subsystem in a winit window. The redraw handler is the
//! scheduler: every tick renders one frame and requests the next redraw
//! unless the loop token has been cancelled, which is exactly the
//! self-rescheduling contract of the render loop.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use crate::animation::LoopToken;
use crate::surface::MountedScene;

/// Parameter nudge per keypress, mirroring a one-notch slider move.
const PARAM_STEP: f32 = 1.0;

/// Open an interactive window running the render loop.
///
/// Keyboard stand-ins for the three sliders: Q/A adjust speed, W/S spikes,
/// E/D processing (one notch each way, clamped to the slider range at the
/// setter). Escape or closing the window tears the subsystem down.
pub fn run(width: u32, height: u32) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("bubble")
            .with_inner_size(PhysicalSize::new(width, height))
            .build(&event_loop)?,
    );

    let size = window.inner_size();
    let mut mounted = pollster::block_on(MountedScene::initialize(
        window.clone(),
        size.width.max(1),
        size.height.max(1),
    ))?;
    let token = mounted.token();
    let started = Instant::now();

    // Kick the first tick; every subsequent one is requested by its
    // predecessor.
    window.request_redraw();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        if let Event::WindowEvent { event, .. } = event {
            match event {
                WindowEvent::CloseRequested => {
                    token.cancel();
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => {
                    // Zero sizes (minimize) are absorbed downstream.
                    mounted.resize(new_size.width, new_size.height);
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => handle_key(code, &mut mounted, &token, elwt),
                WindowEvent::RedrawRequested => {
                    let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                    mounted.render_tick(now_ms);
                    if !token.is_cancelled() {
                        window.request_redraw();
                    }
                }
                _ => {}
            }
        }
    })?;

    Ok(())
}

fn handle_key(
    code: KeyCode,
    mounted: &mut MountedScene,
    token: &LoopToken,
    elwt: &EventLoopWindowTarget<()>,
) {
    if code == KeyCode::Escape {
        token.cancel();
        elwt.exit();
        return;
    }

    let params = mounted.params_mut();
    match code {
        KeyCode::KeyQ => params.set_speed(params.speed() + PARAM_STEP),
        KeyCode::KeyA => params.set_speed(params.speed() - PARAM_STEP),
        KeyCode::KeyW => params.set_spikes(params.spikes() + PARAM_STEP),
        KeyCode::KeyS => params.set_spikes(params.spikes() - PARAM_STEP),
        KeyCode::KeyE => params.set_processing(params.processing() + PARAM_STEP),
        KeyCode::KeyD => params.set_processing(params.processing() - PARAM_STEP),
        _ => return,
    }
    log::info!(
        "params: speed {} spikes {} processing {}",
        params.speed(),
        params.spikes(),
        params.processing()
    );
}
