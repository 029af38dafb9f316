use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::animation::AnimationState;
use crate::gpu::renderer::Renderer;
use crate::params::{ParameterPreset, ParameterState};
use crate::scene::Scene;
use crate::viewer;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an interactive viewer window
    View {
        /// Window width
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Window height
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
    /// Render frames to disk
    Render {
        /// Output directory for frames
        #[arg(long)]
        out: PathBuf,

        /// Frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f32,

        /// Duration in seconds
        #[arg(long, default_value_t = 2.0)]
        duration: f32,

        /// Output width
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Output height
        #[arg(long, default_value_t = 600)]
        height: u32,

        /// Speed slider value [1,10]
        #[arg(long, default_value_t = 1.0)]
        speed: f32,

        /// Spikes slider value [1,10]
        #[arg(long, default_value_t = 1.0)]
        spikes: f32,

        /// Processing slider value [1,10]
        #[arg(long, default_value_t = 1.0)]
        processing: f32,

        /// JSON parameter preset; overrides the individual slider flags
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::View { width, height } => viewer::run(width, height)?,
        Commands::Render {
            out,
            fps,
            duration,
            width,
            height,
            speed,
            spikes,
            processing,
            params,
        } => {
            let mut state = ParameterState::new();
            state.set_speed(speed);
            state.set_spikes(spikes);
            state.set_processing(processing);
            if let Some(path) = params {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read preset {:?}", path))?;
                let preset: ParameterPreset = serde_json::from_str(&contents)
                    .with_context(|| format!("failed to parse preset {:?}", path))?;
                preset.apply(&mut state);
            }
            pollster::block_on(render_offline(out, fps, duration, width, height, state))?;
        }
    }
    Ok(())
}

/// Headless frame dump: runs the tick algorithm at simulated timestamps and
/// writes each frame as a PNG. Exercises the exact per-tick math of the live
/// loop, deterministically.
async fn render_offline(
    out_dir: PathBuf,
    fps: f32,
    duration: f32,
    width: u32,
    height: u32,
    params: ParameterState,
) -> Result<()> {
    let total_frames = (duration * fps).ceil() as usize;
    anyhow::ensure!(total_frames > 0, "nothing to render (duration * fps == 0)");

    std::fs::create_dir_all(&out_dir)?;

    // WGPU Init
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None, // Headless
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| anyhow::anyhow!("No adapter found"))?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor::default(), None)
        .await?;

    let texture_desc = wgpu::TextureDescriptor {
        label: Some("Target Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    };

    let texture = device.create_texture(&texture_desc);
    let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    // Buffer for reading back data; rows padded to the 256-byte copy alignment
    let u32_size = std::mem::size_of::<u32>() as u32;
    let unpadded_bytes_per_row = u32_size * width;
    let align = 256;
    let padded_bytes_per_row_padding = (align - unpadded_bytes_per_row % align) % align;
    let padded_bytes_per_row = unpadded_bytes_per_row + padded_bytes_per_row_padding;

    let output_buffer_size = (padded_bytes_per_row * height) as wgpu::BufferAddress;
    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Output Buffer"),
        size: output_buffer_size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut renderer = Renderer::new(device, queue, texture_desc.format, width, height);
    let mut scene = Scene::new(width, height);
    let animation = AnimationState { params };

    println!("Rendering {} frames to {:?}...", total_frames, out_dir);

    for i in 0..total_frames {
        let now_ms = i as f64 * 1000.0 / fps as f64;
        let pose = animation.tick(now_ms);
        scene.apply(&pose);

        renderer.render(&texture_view, &scene);

        // Copy texture to buffer
        let mut encoder = renderer
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &output_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            texture_desc.size,
        );

        renderer.queue().submit(Some(encoder.finish()));

        // Map buffer and save
        let buffer_slice = output_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |v| tx.send(v).unwrap());
        renderer.device().poll(wgpu::Maintain::Wait);
        rx.recv()??;

        let data = buffer_slice.get_mapped_range();

        // Strip the row padding before encoding
        let mut unpadded_data = Vec::with_capacity((width * height * 4) as usize);
        for row in 0..height {
            let start = (row * padded_bytes_per_row) as usize;
            let end = start + (width * 4) as usize;
            unpadded_data.extend_from_slice(&data[start..end]);
        }

        let frame_path = out_dir.join(format!("frame_{:05}.png", i));
        image::save_buffer(
            &frame_path,
            &unpadded_data,
            width,
            height,
            image::ColorType::Rgba8,
        )?;

        drop(data);
        output_buffer.unmap();

        if i % 60 == 0 {
            print!(".");
            use std::io::Write;
            std::io::stdout().flush()?;
        }
    }
    println!("\nDone.");

    Ok(())
}
