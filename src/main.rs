use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use image::RgbaImage;

use whereis::app::{self, Scene};
use whereis::config::{Args, Mode, StatusFile};
use whereis::render::font::FontSet;
use whereis::sink::memory::MemorySink;
use whereis::sink::DisplaySink;
use whereis::source::{self, LocationSource, OfflineWeek, StatusEndpoint, WeekEndpoint};

fn load_id_card(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("Opening ID card {}", path.display()))?;
    log::info!("ID card {} is {}x{}", path.display(), image.width(), image.height());
    Ok(image.to_rgba8())
}

fn run<S: DisplaySink>(sink: &mut S, args: &Args) -> Result<()> {
    sink.init()?;
    sink.set_rotation(args.rotation);
    log::info!("Frame is {}x{} ({:?})", sink.width(), sink.height(), args.rotation);

    let fonts = FontSet::default();
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let agent = source::http_agent(args.timeout());

    match args.mode {
        Mode::Week => {
            let id_card = load_id_card(&args.id_card)?;
            let source: Box<dyn LocationSource> = match &args.offline {
                Some(path) => {
                    log::info!("Reading whereabouts from {}", path.display());
                    Box::new(OfflineWeek::new(path))
                }
                None => Box::new(WeekEndpoint::new(agent, args.week_url())),
            };
            let scene = Scene {
                title: &args.title,
                id_card: &id_card,
                today,
                fonts: &fonts,
            };
            app::run_week(source.as_ref(), sink, &scene)
        }
        Mode::Status => {
            let mut status = StatusFile::load(&args.config)?;
            let url = args.url.as_deref().context("Status mode needs --url")?;
            let id_card = load_id_card(&args.id_card)?;
            let source = StatusEndpoint::new(agent, url, status.user_id(), status.token());
            let caption = status.caption().to_string();
            let scene = Scene {
                title: &caption,
                id_card: &id_card,
                today,
                fonts: &fonts,
            };
            app::run_status(&source, sink, &scene, &mut status, args.force)?;
            Ok(())
        }
    }
}

#[cfg(feature = "rpi")]
fn run_on_panel(args: &Args) -> Result<()> {
    let mut sink = whereis::sink::epd::open_hat()?;
    run(&mut sink, args)
}

#[cfg(not(feature = "rpi"))]
fn run_on_panel(_args: &Args) -> Result<()> {
    anyhow::bail!("Built without the rpi feature, use --preview to render to a PNG")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!("{:?}", args);

    let Some(preview) = &args.preview else {
        return run_on_panel(&args);
    };

    let mut sink = MemorySink::for_panel();
    run(&mut sink, &args)?;
    if sink.frames() > 0 {
        sink.save_png(preview)?;
    } else {
        log::info!("Nothing was drawn, no preview written");
    }
    Ok(())
}
