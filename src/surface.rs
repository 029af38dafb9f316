//! Surface binding and subsystem lifecycle.
//!
//! [`MountedScene`] is the handle the scene initializer returns: it owns the
//! surface, the GPU context, the scene, and the animation state, and exists
//! exactly for the `Running` span of the subsystem's life. Dropping it (or
//! calling [`MountedScene::teardown`]) cancels the loop token and releases
//! every GPU resource exactly once.
//!
//! The lifecycle is `Unmounted -> Initializing -> Running -> TearingDown`:
//! a failed [`MountedScene::initialize`] never reaches `Running` — partially
//! acquired resources are dropped on the error path — and the caller must
//! not schedule ticks without a handle.

use anyhow::{ensure, Context, Result};

use crate::animation::{AnimationState, LoopToken};
use crate::gpu::renderer::Renderer;
use crate::params::ParameterState;
use crate::scene::Scene;

pub struct MountedScene {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    scene: Scene,
    animation: AnimationState,
    token: LoopToken,
}

impl MountedScene {
    /// Bind the subsystem to a drawable surface of `width` x `height` pixels
    /// (already scaled by the device pixel ratio on hosts that have one).
    ///
    /// Fatal on any acquisition failure: no surface, no adapter, no device,
    /// or a zero-sized target. The caller must not enter the render loop
    /// without the returned handle.
    pub async fn initialize(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "drawable surface has no area ({}x{})",
            width,
            height
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            dx12_shader_compiler: Default::default(),
            flags: wgpu::InstanceFlags::default(),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        });

        let surface = instance
            .create_surface(target)
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::None,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;

        let required_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        };
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits,
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f: &wgpu::TextureFormat| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(device, queue, config.format, width, height);
        let scene = Scene::new(width, height);

        log::info!("bubble scene mounted at {}x{}", width, height);

        Ok(Self {
            surface,
            config,
            renderer,
            scene,
            animation: AnimationState::new(),
            token: LoopToken::new(),
        })
    }

    /// Slider-facing parameter state; writes land in the next tick.
    pub fn params_mut(&mut self) -> &mut ParameterState {
        &mut self.animation.params
    }

    /// Another handle to the loop's cancellation token.
    pub fn token(&self) -> LoopToken {
        self.token.clone()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Handle a container-size-change notification.
    ///
    /// Degenerate (zero) dimensions are ignored: prior output-buffer size and
    /// camera aspect are retained.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.renderer.device(), &self.config);
        self.renderer.resize(width, height);
        self.scene.resize(width, height);
    }

    /// Run one scheduler tick at `now_ms`: advance the animation, pose the
    /// scene, and draw one frame onto the surface.
    ///
    /// Surface loss reconfigures and skips the frame; other surface errors
    /// are absorbed with a log line. The host reschedules the next tick
    /// unless [`LoopToken::is_cancelled`] says otherwise.
    pub fn render_tick(&mut self, now_ms: f64) {
        let pose = self.animation.tick(now_ms);
        self.scene.apply(&pose);

        match self.surface.get_current_texture() {
            Ok(output) => {
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.renderer.render(&view, &self.scene);
                output.present();
            }
            Err(wgpu::SurfaceError::Lost) => {
                self.surface.configure(self.renderer.device(), &self.config);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
            }
        }
    }

    /// Cancel the render loop and release the GPU context.
    ///
    /// Consuming `self` makes the release happen exactly once; any host still
    /// holding a [`LoopToken`] observes the cancellation and stops
    /// rescheduling.
    pub fn teardown(self) {
        self.token.cancel();
        log::info!("bubble scene unmounted");
        // GPU resources (surface, device, buffers, pipelines) drop here.
    }
}
