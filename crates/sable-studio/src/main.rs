use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use sable_platform::assets::{AssetConfig, AssetResolver, Image, Scale};
use sable_platform::canvas::{Canvas, LineCap, Path};
use sable_platform::logging::{init_logging, LoggingConfig};
use sable_platform::paint::{Color, ColorStop, Gradient};
use sable_platform::text::TextFormat;

/// Renders a sample scene from game assets into a PNG.
#[derive(Parser, Debug)]
#[command(name = "sable-studio", about = "Resolve sable assets and render them to a PNG")]
struct Cli {
    /// Root of the primary asset lookup.
    #[arg(long, env = "SABLE_RESOURCE_ROOT")]
    resource_root: Option<PathBuf>,

    /// Prefix applied to primary lookups (no leading or trailing '/').
    #[arg(long, env = "SABLE_ASSET_PREFIX", default_value = "assets")]
    prefix: String,

    /// Fallback directory; repeat to add more, searched in order.
    #[arg(long = "dir", env = "SABLE_ASSET_DIRS", value_delimiter = ',')]
    directories: Vec<PathBuf>,

    /// Display scale images are loaded for.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Scale used to pick image variants, when it differs from --scale.
    #[arg(long)]
    asset_scale: Option<f32>,

    /// Image drawn centered on the canvas.
    #[arg(long, default_value = "logo.png")]
    image: String,

    /// Optional font used for the caption.
    #[arg(long)]
    font: Option<String>,

    /// Optional image fetched over HTTP and drawn in the top-left corner.
    #[arg(long)]
    remote: Option<String>,

    #[arg(long, default_value_t = 320)]
    width: u32,

    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Output PNG.
    #[arg(short, long, default_value = "sable.png")]
    out: PathBuf,

    /// Log filter, e.g. "debug" or "sable_platform=trace".
    #[arg(long, env = "SABLE_LOG")]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.as_str()),
        None => LoggingConfig::default(),
    });

    let config = AssetConfig {
        path_prefix: cli.prefix.clone(),
        resource_root: cli.resource_root.clone(),
        directories: cli.directories.clone(),
        asset_scale: cli.asset_scale,
    };
    let resolver = AssetResolver::from_config(&config).context("invalid asset configuration")?;

    let remote = cli
        .remote
        .as_deref()
        .map(|url| resolver.load_remote_image(url, 64.0, 64.0));

    let mut canvas = Canvas::new(cli.width, cli.height).context("creating canvas")?;
    draw_backdrop(&mut canvas)?;

    let image = resolver
        .load_image(&cli.image, Scale::new(cli.scale))
        .with_context(|| format!("loading {}", cli.image))?;
    log::info!("{}: {}x{} at {}", cli.image, image.width(), image.height(), image.scale());

    let (cx, cy) = (cli.width as f32 / 2.0, cli.height as f32 / 2.0);
    canvas.save().translate(cx, cy).rotate(0.1);
    canvas.draw_image_centered(&image, 0.0, 0.0);
    canvas.restore()?;

    if let Some(font_path) = &cli.font {
        let font = resolver
            .load_font(font_path)
            .with_context(|| format!("loading font {font_path}"))?;
        canvas
            .set_default_font(TextFormat::new(font, 18.0))
            .set_fill_color(Color::WHITE)
            .draw_text(&cli.image, 12.0, cli.height as f32 - 12.0);
    }

    if let Some(remote) = remote {
        draw_remote(&mut canvas, &remote);
    }

    let png = canvas.encode_png()?;
    std::fs::write(&cli.out, png).with_context(|| format!("writing {}", cli.out.display()))?;
    log::info!("wrote {}", cli.out.display());
    Ok(())
}

fn draw_backdrop(canvas: &mut Canvas) -> Result<()> {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let stops = vec![
        ColorStop::new(0.0, Color::from_argb(0xFF1B2838)),
        ColorStop::new(1.0, Color::from_argb(0xFF2A475E)),
    ];
    canvas.set_fill_gradient(Gradient::linear(0.0, 0.0, 0.0, h, stops)).fill_rect(0.0, 0.0, w, h);

    let mut frame = Path::new();
    frame
        .move_to(8.0, 8.0)
        .line_to(w - 8.0, 8.0)
        .line_to(w - 8.0, h - 8.0)
        .line_to(8.0, h - 8.0)
        .close();
    canvas
        .save()
        .set_stroke_color(Color::from_argb(0x80FFFFFF))
        .set_stroke_width(2.0)
        .set_line_cap(LineCap::Round)
        .stroke_path(&frame);
    canvas.restore()?;
    Ok(())
}

fn draw_remote(canvas: &mut Canvas, remote: &Image) {
    match remote.wait_timeout(Duration::from_secs(10)) {
        Some(Ok(_)) => {
            canvas.draw_image_scaled(remote, 12.0, 12.0, 64.0, 64.0);
        }
        Some(Err(err)) => log::warn!("remote image failed: {err}"),
        None => log::warn!("remote image still loading, skipped"),
    }
}
