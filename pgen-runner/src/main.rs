//! pgen Simulation Runner
//!
//! Loads a parameter file, runs one simulation to completion and writes the
//! requested outputs.
//!
//! Usage: `pgen-runner [params.json] [--png out.png] [--gif out.gif] ...`

use pgen::prelude::*;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: pgen-runner [PARAMS.json] [options]

Options:
  --png PATH           save the last rendered frame as PNG
  --gif PATH           record the run and save it as an animated GIF
  --save-params PATH   write the parameters used for the run as JSON
  --seed N             seed the spawn RNG
  --max-ticks N        stop after N ticks even if particles remain
  --canvas WxH         canvas size in pixels (default 600x400)
  --background R,G,B   canvas background color (default 25,25,25)
  --realtime           pace ticks at 16 ms instead of running flat out
  -h, --help           show this message";

#[derive(Debug, Default)]
struct Options {
    params: Option<PathBuf>,
    png: Option<PathBuf>,
    gif: Option<PathBuf>,
    save_params: Option<PathBuf>,
    seed: Option<u64>,
    max_ticks: Option<u64>,
    canvas: CanvasConfig,
    realtime: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Options>, String> {
    let mut opts = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{} needs a value", name));
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--png" => opts.png = Some(value("--png")?.into()),
            "--gif" => opts.gif = Some(value("--gif")?.into()),
            "--save-params" => opts.save_params = Some(value("--save-params")?.into()),
            "--seed" => {
                let v = value("--seed")?;
                opts.seed = Some(v.parse().map_err(|_| format!("invalid seed: {}", v))?);
            }
            "--max-ticks" => {
                let v = value("--max-ticks")?;
                opts.max_ticks = Some(v.parse().map_err(|_| format!("invalid tick count: {}", v))?);
            }
            "--canvas" => {
                let v = value("--canvas")?;
                let (w, h) = v
                    .split_once('x')
                    .and_then(|(w, h)| Some((w.parse::<u32>().ok()?, h.parse::<u32>().ok()?)))
                    .ok_or_else(|| format!("invalid canvas size: {}", v))?;
                opts.canvas.width = w;
                opts.canvas.height = h;
            }
            "--background" => {
                let v = value("--background")?;
                let rgb = v
                    .split(',')
                    .map(|c| c.trim().parse::<u8>().ok())
                    .collect::<Option<Vec<_>>>()
                    .and_then(|c| <[u8; 3]>::try_from(c).ok())
                    .ok_or_else(|| format!("invalid background color: {}", v))?;
                opts.canvas.background = rgb;
            }
            "--realtime" => opts.realtime = true,
            other if other.starts_with('-') => return Err(format!("unknown option: {}", other)),
            path => {
                if opts.params.replace(PathBuf::from(path)).is_some() {
                    return Err("only one parameter file may be given".into());
                }
            }
        }
    }
    Ok(Some(opts))
}

fn run_realtime(session: &mut Session, max_ticks: Option<u64>) -> u64 {
    let mut timer = TickTimer::new();
    timer.start();
    let mut ticks = 0;

    'run: while session.is_running() {
        for _ in 0..timer.poll(Instant::now()) {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break 'run;
            }
            session.step();
            ticks += 1;
            if !session.is_running() {
                break 'run;
            }
        }
        std::thread::sleep(timer.until_next(Instant::now()));
    }

    timer.stop();
    info!(ticks, rate = timer.rate(), "realtime run finished");
    ticks
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = match parse_args(env::args().skip(1)) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{}\n\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    let mut session = Session::new(opts.canvas);
    if let Some(seed) = opts.seed {
        session = session.with_seed(seed);
    }

    match &opts.params {
        Some(path) => {
            // Session::load_params already logs the path and cause.
            if session.load_params(path).is_err() {
                warn!("Using default parameters.");
            }
        }
        None => info!("No parameter file specified, using defaults."),
    }

    if opts.gif.is_some() {
        if let Err(e) = session.record_gif() {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    } else {
        session.start();
    }

    let ticks = if opts.realtime {
        run_realtime(&mut session, opts.max_ticks)
    } else {
        session.run_to_idle(opts.max_ticks)
    };
    info!(ticks, remaining = session.simulation().particles().len(), "run finished");
    session.stop();

    let mut failed = false;
    if let Some(path) = &opts.save_params {
        if let Err(e) = session.save_params(path) {
            error!("Failed to save parameters: {}", e);
            failed = true;
        }
    }
    if let Some(path) = &opts.png {
        if let Err(e) = session.save_image(path) {
            error!("Failed to save image: {}", e);
            failed = true;
        }
    }
    if let Some(path) = &opts.gif {
        if let Err(e) = session.finish_gif(path) {
            error!("Failed to save GIF: {}", e);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
