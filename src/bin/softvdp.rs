use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use softvdp::{
    BlendState, ChromaType, CompositeArgs, DisplayTransport, Driver, DriverOpts, FuncId,
    MemoryTransport, MixerRender, Rect, RgbaFormat, YCbCrFormat,
};

#[derive(Parser, Debug)]
#[command(name = "softvdp", version)]
struct Cli {
    /// Driver options JSON (defaults, then `SOFTVDP_*` environment overrides when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mix a uniform YV12 frame, optionally overlay a bitmap, present it and save a PNG.
    Frame(FrameArgs),
    /// List every resolvable function id.
    Funcs(FuncsArgs),
    /// Print the API version, information string and effective options.
    Info,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Frame width in pixels.
    #[arg(long, default_value_t = 64)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 64)]
    height: u32,

    /// Luma value of every pixel.
    #[arg(long, default_value_t = 128)]
    y: u8,

    /// Cb value of every pixel.
    #[arg(long, default_value_t = 128)]
    u: u8,

    /// Cr value of every pixel.
    #[arg(long, default_value_t = 128)]
    v: u8,

    /// Composite a half-transparent red square over the center with source-over.
    #[arg(long)]
    overlay: bool,

    /// Present to this X11 window id instead of the in-memory transport.
    #[cfg(feature = "x11")]
    #[arg(long, value_parser = parse_drawable)]
    drawable: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FuncsArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let driver = make_driver(cli.config.as_deref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(&driver, args),
        Command::Funcs(args) => cmd_funcs(args),
        Command::Info => cmd_info(&driver),
    }
}

fn make_driver(config: Option<&Path>) -> anyhow::Result<Driver> {
    let Some(path) = config else {
        return Ok(Driver::from_env()?);
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    Ok(Driver::new(DriverOpts::from_json_str(&json)?))
}

#[cfg(feature = "x11")]
fn parse_drawable(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid window id '{s}': {e}"))
}

fn area(width: u32, height: u32) -> anyhow::Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .with_context(|| format!("frame size {width}x{height} overflows"))
}

fn unpremultiply_bgra_to_rgba(bgra: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bgra.len());
    for px in bgra.chunks_exact(4) {
        let a = px[3] as u16;
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let un = |c: u8| ((c as u16 * 255 + a / 2) / a).min(255) as u8;
        out.extend_from_slice(&[un(px[2]), un(px[1]), un(px[0]), px[3]]);
    }
    out
}

fn cmd_frame(driver: &Driver, args: FrameArgs) -> anyhow::Result<()> {
    let memory = Arc::new(MemoryTransport::new());
    #[allow(unused_mut)]
    let mut transport: Arc<dyn DisplayTransport> = memory.clone();
    #[allow(unused_mut)]
    let (mut drawable, mut screen) = (1, 0);
    #[cfg(feature = "x11")]
    if let Some(window) = args.drawable {
        let x11 = softvdp::X11Transport::connect(None)?;
        screen = i32::try_from(x11.default_screen()).context("screen index")?;
        transport = Arc::new(x11);
        drawable = window;
    }

    let (w, h) = (args.width, args.height);
    let luma_len = area(w, h)?;
    let chroma_len = area(w / 2, h / 2)?;
    let (device, _) = driver.device_create_x11(transport, screen)?;
    // The output surface enforces the size limit, so create it before the video planes.
    let output = driver.output_surface_create(device, RgbaFormat::B8G8R8A8, w, h)?;
    let video = driver.video_surface_create(device, ChromaType::Yuv420, w, h)?;
    let mixer = driver.video_mixer_create(device, &[], &[])?;

    let luma = vec![args.y; luma_len];
    let cr = vec![args.v; chroma_len];
    let cb = vec![args.u; chroma_len];
    driver.video_surface_put_bits_ycbcr(
        video,
        YCbCrFormat::Yv12,
        &[&luma, &cr, &cb],
        &[w, w / 2, w / 2],
    )?;
    driver.video_mixer_render(mixer, &MixerRender::new(video, output))?;

    if args.overlay {
        let (bw, bh) = (w / 2, h / 2);
        let bitmap = driver.bitmap_surface_create(device, RgbaFormat::B8G8R8A8, bw, bh, false)?;
        let red = [0u8, 0, 128, 128].repeat(area(bw, bh)?);
        driver.bitmap_surface_put_bits_native(bitmap, &red, bw * 4, None)?;
        let state = BlendState::source_over();
        let composite = CompositeArgs {
            destination_rect: Some(Rect::new(w / 4, h / 4, w / 4 + bw, h / 4 + bh)),
            ..CompositeArgs::new(&state)
        };
        driver.output_surface_render_bitmap_surface(output, bitmap, &composite)?;
        driver.bitmap_surface_destroy(bitmap)?;
    }

    let target = driver.presentation_queue_target_create_x11(device, drawable)?;
    let queue = driver.presentation_queue_create(device, target)?;
    driver.presentation_queue_display(queue, output, 0, 0, 0)?;

    let frame = driver.output_surface_pixels(output)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &unpremultiply_bgra_to_rgba(&frame.data),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    let stats = driver.presentation_queue_stats(queue)?;
    eprintln!(
        "wrote {} ({} blit(s), {} shared image(s))",
        args.out.display(),
        memory.blit_count(),
        stats.allocations
    );

    driver.presentation_queue_destroy(queue)?;
    driver.presentation_queue_target_destroy(target)?;
    driver.video_mixer_destroy(mixer)?;
    driver.output_surface_destroy(output)?;
    driver.video_surface_destroy(video)?;
    driver.device_destroy(device)?;
    Ok(())
}

fn cmd_funcs(args: FuncsArgs) -> anyhow::Result<()> {
    if args.json {
        let rows: Vec<serde_json::Value> = FuncId::all()
            .map(|id| serde_json::json!({ "id": id.as_raw(), "name": id.name() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for id in FuncId::all() {
        println!("{:>6}  {}", id.as_raw(), id.name());
    }
    Ok(())
}

fn cmd_info(driver: &Driver) -> anyhow::Result<()> {
    println!("api version: {}", driver.get_api_version());
    println!("information: {}", driver.get_information_string());
    println!("{}", serde_json::to_string_pretty(driver.opts())?);
    Ok(())
}
