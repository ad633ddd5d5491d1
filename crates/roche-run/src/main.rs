use std::error::Error;
use std::path::{Path, PathBuf};

use roche_engine::{EngineConfig, Settings, Simulation, SystemManifest};
use roche_run::{HeadlessRenderer, Runner, ScriptedInput};

const DEFAULT_PLANETS: &str = "config/planets.json";
const DEFAULT_SETTINGS: &str = "config/settings.json";
const DEFAULT_FRAMES: u64 = 10_000;

struct Args {
    planets: PathBuf,
    settings: PathBuf,
    max_frames: u64,
    realtime: bool,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args {
        planets: PathBuf::from(DEFAULT_PLANETS),
        settings: PathBuf::from(DEFAULT_SETTINGS),
        max_frames: DEFAULT_FRAMES,
        realtime: false,
    };
    let mut positional = 0;
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--frames" => {
                let value = iter.next().ok_or("--frames needs a value")?;
                args.max_frames = value.parse()?;
            }
            "--realtime" => args.realtime = true,
            _ => {
                match positional {
                    0 => args.planets = PathBuf::from(arg),
                    1 => args.settings = PathBuf::from(arg),
                    _ => return Err(format!("unexpected argument: {}", arg).into()),
                }
                positional += 1;
            }
        }
    }
    Ok(args)
}

fn load_settings(path: &Path) -> Result<Settings, Box<dyn Error>> {
    if path.exists() {
        Ok(Settings::load(path)?)
    } else {
        log::warn!("{} not found, using default settings", path.display());
        Ok(Settings::default())
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;

    let manifest = SystemManifest::load(&args.planets)?;
    let bodies = manifest.to_bodies()?;
    let settings = load_settings(&args.settings)?;

    let mut config = EngineConfig { ambient_color: manifest.ambient_color, ..EngineConfig::default() };
    settings.apply_to(&mut config)?;

    let body_count = bodies.len();
    let sim = Simulation::new(bodies, config)?;
    let mut runner = Runner::new(sim, HeadlessRenderer::new(), ScriptedInput::tour(body_count));
    runner.init(&settings.graphics, settings.video.width, settings.video.height)?;

    let frames = if args.realtime {
        runner.run_realtime(args.max_frames)
    } else {
        runner.run_fixed(args.max_frames)
    };
    log::info!(
        "Ran {} frames, simulated {:.0} s",
        frames,
        runner.simulation().epoch()
    );
    runner.shutdown();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run().map_err(|e| {
        log::error!("{}", e);
        e
    })
}
