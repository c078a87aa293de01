//! Full-screen gradient drawn once, then the window idles until closed.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use quadgl_core::{
    init_tracing, Checked, FrameRenderer, FramebufferExtent, GeometryBuffer, HarnessConfig,
    ProgramBuilder, RenderPolicy, RunSummary, Scene, UniformBinder, WindowConfig,
    FULLSCREEN_QUAD,
};
use quadgl_glutin::GlutinWindow;
use tracing::{error, info};

const VERTEX_SHADER: &str = r#"#version 110
attribute vec2 vPos;

void main()
{
    gl_Position = vec4(vPos, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 110
uniform int width;
uniform int height;

void main()
{
    vec2 uv = gl_FragCoord.xy / vec2(float(width), float(height));
    gl_FragColor = vec4(uv.x, uv.y, 1.0 - uv.x, 1.0);
}
"#;

#[derive(Debug, Parser)]
#[command(about = "Draw a full-screen gradient with a single checked draw call")]
struct Args {
    /// Requested window width (logical pixels).
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested window height (logical pixels).
    #[arg(long, default_value_t = 480)]
    height: u32,

    #[arg(long, default_value = "quadgl gradient")]
    title: String,

    /// `once` or `per-frame`.
    #[arg(long, default_value_t = RenderPolicy::Once)]
    policy: RenderPolicy,

    /// Swap without waiting for vertical blank.
    #[arg(long)]
    no_vsync: bool,

    /// Run glValidateProgram after linking.
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
    let geometry = GeometryBuffer::upload(gl, &program, &FULLSCREEN_QUAD);
    let uniforms = UniformBinder::new(gl, &program);
    let scene = Scene::new(program, geometry, uniforms, FramebufferExtent);

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
            info!(
                frames = summary.frames_drawn,
                polls = summary.polls,
                "window closed"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
