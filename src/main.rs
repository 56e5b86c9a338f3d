use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use indicatif::{ProgressBar, ProgressStyle};

use software_rasterizer::geometry::Fp;
use software_rasterizer::program::{InputState, Program, RasterProgram, SoundBuffer};
use software_rasterizer::scene::{load_scene, Scene, DEFAULT_SIZE};
use software_rasterizer::screenshot::{save_bmp, save_png, save_ppm};

const USAGE: &str =
    "usage: software-rasterizer <scene-file|--cornell> <out.ppm> [image-name] [--frames N] [--turn RADIANS]";

enum SceneSource {
    File(PathBuf),
    Cornell,
}

struct Args {
    scene: SceneSource,
    output: PathBuf,
    image_name: Option<String>,
    frames: usize,
    turn: Fp,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut frames = 1;
    let mut turn = 0.0;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--frames" => {
                let value = iter.next().ok_or("--frames needs a value")?;
                frames = value
                    .parse()
                    .map_err(|_| format!("invalid frame count `{}`", value))?;
            }
            "--turn" => {
                let value = iter.next().ok_or("--turn needs a value")?;
                turn = value
                    .parse()
                    .map_err(|_| format!("invalid turn `{}`", value))?;
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let scene = match positional.next().as_deref() {
        Some("--cornell") => SceneSource::Cornell,
        Some(path) => SceneSource::File(PathBuf::from(path)),
        None => return Err(USAGE.to_string()),
    };
    let output = positional.next().map(PathBuf::from).ok_or(USAGE)?;
    let image_name = positional.next();
    if frames == 0 {
        return Err("--frames must be at least 1".to_string());
    }
    Ok(Args {
        scene,
        output,
        image_name,
        frames,
        turn,
    })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let scene = match &args.scene {
        SceneSource::File(path) => load_scene(path)?,
        SceneSource::Cornell => Scene::cornell_box(DEFAULT_SIZE)?,
    };
    let mut program = RasterProgram::new(scene);
    program.initialize()?;

    let progress = ProgressBar::new(args.frames as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} frames [{elapsed_precise}]",
    )?);
    let mut sound = SoundBuffer::default();
    for frame in 0..args.frames {
        let input = InputState {
            turn_right: frame > 0 && args.turn != 0.0,
            ..InputState::default()
        };
        if let Some(stats) = program.update(&input, args.turn)? {
            log::debug!("frame {}: {:?}", frame, stats);
        }
        program.render_sound(&mut sound);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let color = &program.renderer().buffers().color;
    save_ppm(&args.output, color)?;
    log::info!("wrote {}", args.output.display());
    if let Some(name) = &args.image_name {
        let png = PathBuf::from(format!("{}.png", name));
        save_png(&png, color)?;
        log::info!("wrote {}", png.display());
        let bmp = PathBuf::from(format!("{}.bmp", name));
        save_bmp(&bmp, color)?;
        log::info!("wrote {}", bmp.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            log::error!("{}", message);
            return ExitCode::FAILURE;
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}
