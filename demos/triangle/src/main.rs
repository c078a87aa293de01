//! A colored triangle redrawn every frame through an identity MVP transform.

use std::mem::offset_of;
use std::process::ExitCode;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use clap::Parser;
use quadgl_core::{
    init_tracing, Checked, FrameRenderer, GeometryBuffer, HarnessConfig, IdentityTransform,
    ProgramBuilder, RenderPolicy, RunSummary, Scene, UniformBinder, Vertex, VertexAttribute,
    WindowConfig,
};
use quadgl_glutin::GlutinWindow;
use tracing::{error, info};

const VERTEX_SHADER: &str = r#"#version 110
uniform mat4 MVP;
attribute vec3 vCol;
attribute vec2 vPos;
varying vec3 color;

void main()
{
    gl_Position = MVP * vec4(vPos, 0.0, 1.0);
    color = vCol;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 110
varying vec3 color;

void main()
{
    gl_FragColor = vec4(color, 1.0);
}
"#;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ColoredVertex {
    position: [f32; 2],
    color: [f32; 3],
}

impl Vertex for ColoredVertex {
    fn attributes() -> Vec<VertexAttribute> {
        vec![
            VertexAttribute::of::<Self, [f32; 2]>("vPos", offset_of!(Self, position)),
            VertexAttribute::of::<Self, [f32; 3]>("vCol", offset_of!(Self, color)),
        ]
    }
}

const TRIANGLE: [ColoredVertex; 3] = [
    ColoredVertex {
        position: [-0.6, -0.4],
        color: [1.0, 0.0, 0.0],
    },
    ColoredVertex {
        position: [0.6, -0.4],
        color: [0.0, 1.0, 0.0],
    },
    ColoredVertex {
        position: [0.0, 0.6],
        color: [0.0, 0.0, 1.0],
    },
];

#[derive(Debug, Parser)]
#[command(about = "Draw an RGB triangle, redrawing on every event poll by default")]
struct Args {
    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    #[arg(long, default_value = "quadgl triangle")]
    title: String,

    /// `once` or `per-frame`.
    #[arg(long, default_value_t = RenderPolicy::PerFrame)]
    policy: RenderPolicy,

    #[arg(long)]
    no_vsync: bool,

    #[arg(long)]
    validate_program: bool,
}

impl From<Args> for HarnessConfig {
    fn from(args: Args) -> Self {
        Self {
            window: WindowConfig {
                width: args.width,
                height: args.height,
                title: args.title,
                vsync: !args.no_vsync,
            },
            policy: args.policy,
            validate_program: args.validate_program,
            ..Self::default()
        }
    }
}

fn run(config: &HarnessConfig) -> Result<RunSummary> {
    let (window, raw) = GlutinWindow::open(&config.window)?;
    let gl = Checked::new(&raw);

    let program = ProgramBuilder::new(gl)
        .validate(config.validate_program)
        .build(VERTEX_SHADER, FRAGMENT_SHADER);
    let geometry = GeometryBuffer::upload(gl, &program, &TRIANGLE);
    let uniforms = UniformBinder::new(gl, &program);
    let scene = Scene::new(program, geometry, uniforms, IdentityTransform::default());

    let summary = FrameRenderer::new(gl, window, config.policy)
        .with_clear_color(config.clear_color)
        .run(scene)?;
    Ok(summary)
}

fn main() -> ExitCode {
    init_tracing("info");
    let config = HarnessConfig::from(Args::parse());

    match run(&config) {
        Ok(summary) => {
            info!(frames = summary.frames_drawn, "window closed");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
