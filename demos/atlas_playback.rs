use std::env;

use anyhow::{anyhow, Context, Result};
use log::info;
use rgb::RGBA8;
use yasa::{
    AnimationEvent, AnimationListener, AtlasLoader, AtlasSettings, MetadataFormat, Point, Size,
    SoftwareSurface, SpriteAtlas,
};

const TICK: f64 = 1. / 30.;

const METADATA: &str = r#"{
    "Sheets": [{
        "Name": "Demo",
        "Animations": [{
            "Name": "Spin",
            "Frames": [
                {"Name": "up", "x": 0, "y": 0, "width": 4, "height": 4, "Duration": 100},
                {"Name": "right", "x": 4, "y": 0, "width": 4, "height": 4, "Duration": 100},
                {"Name": "down", "x": 8, "y": 0, "width": 4, "height": 4, "Duration": 150}
            ]
        }]
    }]
}"#;

/// Three 4x4 frames, each with a single lit column or row.
fn builtin_png() -> Result<Vec<u8>> {
    let mut pixels = vec![RGBA8::default(); 12 * 4];
    for i in 0..4 {
        pixels[i * 12 + 1] = RGBA8::new(255, 255, 255, 255);
        pixels[2 * 12 + 4 + i] = RGBA8::new(255, 255, 255, 255);
        pixels[i * 12 + 8 + 2] = RGBA8::new(255, 255, 255, 255);
    }

    lodepng::encode32(&pixels, 12, 4).map_err(|e| anyhow!("Unable to encode the demo atlas: {e}"))
}

struct Printer;

impl AnimationListener for Printer {
    fn on_first_frame(&mut self, event: &AnimationEvent) {
        info!("'{}' started over", event.animation);
    }

    fn on_last_frame(&mut self, event: &AnimationEvent) {
        info!("'{}' reached its last frame", event.animation);
    }
}

fn print(surface: &SoftwareSurface) {
    let target = surface.target();
    for y in 0..target.height() {
        let line = (0..target.width())
            .map(|x| match target.pixel(x, y).map_or(0, |p| p.a) {
                0 => '.',
                _ => '#',
            })
            .collect::<String>();
        println!("{line}");
    }
    println!();
}

fn load(loader: &mut AtlasLoader) -> Result<std::rc::Rc<SpriteAtlas>> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    match args.as_slice() {
        [image, metadata] => loader
            .load_files(image, metadata)
            .with_context(|| format!("Unable to load '{image}' and '{metadata}'")),
        _ => Ok(loader.load_bytes("builtin", &builtin_png()?, METADATA.as_bytes(), MetadataFormat::Json)?),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut loader = AtlasLoader::new(AtlasSettings::default());
    let atlas = load(&mut loader)?;

    let sheet = atlas.sheets().next().context("The atlas has no sheets")?;
    let name = sheet
        .animation_names()
        .next()
        .context("The first sheet has no animations")?
        .to_owned();

    let mut clock = sheet
        .animation_clock(&name)
        .with_context(|| format!("Animation '{name}' is missing"))?;
    clock.add_listener(Printer);

    let mut surface = SoftwareSurface::new(Size::new(clock.current_width(), clock.current_height()));
    let mut shown = None;

    for _ in 0..30 {
        clock.update(TICK);
        if shown == Some(clock.index()) {
            continue;
        }

        shown = Some(clock.index());
        surface.clear();
        clock.draw(&mut surface, Point::new(0, 0));
        println!("frame {} of '{name}':", clock.index());
        print(&surface);
    }

    Ok(())
}
