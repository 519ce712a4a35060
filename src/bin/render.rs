//! nodefield headless renderer
//!
//! Runs the particle field for a number of frames and writes the last one
//! to a PNG.
//!
//! Usage:
//! `nodefield-render [--width W] [--height H] [--frames N] [--pointer X,Y]
//!  [--seed S] [--config field.json] [--background RRGGBB] [--out field.png]`
//!
//! Log level comes from `RUST_LOG` (default `info`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use flexi_logger::Logger;
    use nodefield::prelude::*;
    use std::env;
    use std::error::Error;
    use std::path::PathBuf;

    pub struct Options {
        pub width: u32,
        pub height: u32,
        pub frames: u32,
        pub pointer: Option<Vec2>,
        pub seed: Option<u64>,
        pub config: Option<PathBuf>,
        pub background: [u8; 4],
        pub out: PathBuf,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                width: 1280,
                height: 720,
                frames: 120,
                pointer: None,
                seed: None,
                config: None,
                background: [13, 17, 23, 255],
                out: PathBuf::from("field.png"),
            }
        }
    }

    fn parse_pointer(s: &str) -> Result<Vec2, String> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("pointer must be X,Y, got '{}'", s))?;
        let x: f32 = x.trim().parse().map_err(|_| format!("bad pointer x '{}'", x))?;
        let y: f32 = y.trim().parse().map_err(|_| format!("bad pointer y '{}'", y))?;
        Ok(Vec2::new(x, y))
    }

    fn parse_hex(s: &str) -> Result<[u8; 4], String> {
        let s = s.trim_start_matches('#');
        if s.len() != 6 {
            return Err(format!("background must be RRGGBB, got '{}'", s));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| format!("bad hex color '{}'", s))
        };
        Ok([channel(0)?, channel(2)?, channel(4)?, 255])
    }

    pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
        let mut opts = Options::default();

        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| format!("missing value for {}", flag))
            };
            match flag.as_str() {
                "--width" => opts.width = value()?.parse().map_err(|e| format!("--width: {}", e))?,
                "--height" => {
                    opts.height = value()?.parse().map_err(|e| format!("--height: {}", e))?
                }
                "--frames" => {
                    opts.frames = value()?.parse().map_err(|e| format!("--frames: {}", e))?
                }
                "--pointer" => opts.pointer = Some(parse_pointer(&value()?)?),
                "--seed" => {
                    opts.seed = Some(value()?.parse().map_err(|e| format!("--seed: {}", e))?)
                }
                "--config" => opts.config = Some(PathBuf::from(value()?)),
                "--background" => opts.background = parse_hex(&value()?)?,
                "--out" => opts.out = PathBuf::from(value()?),
                other => return Err(format!("unknown argument '{}'", other)),
            }
        }
        Ok(opts)
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let _logger = Logger::try_with_env_or_str("info")?
            .format(flexi_logger::detailed_format)
            .start()?;

        let opts = parse_args(env::args().skip(1))?;

        let mut config = match &opts.config {
            Some(path) => {
                log::info!("Loading field config from {}", path.display());
                FieldConfig::load(path)?
            }
            None => FieldConfig::default(),
        };
        if let Some(seed) = opts.seed {
            config = config.with_seed(seed);
        }

        let pointer = PointerState::new();
        let mut driver = FrameDriver::new(config, pointer.clone());
        let mut surface = RasterSurface::with_background(opts.width, opts.height, opts.background);

        driver.start(opts.width, opts.height);
        if let Some(p) = opts.pointer {
            pointer.set(p);
        }

        for _ in 0..opts.frames {
            driver.tick(&mut surface);
        }
        driver.stop();

        surface.save_png(&opts.out)?;
        log::info!(
            "Wrote {}x{} frame {} to {}",
            opts.width,
            opts.height,
            opts.frames,
            opts.out.display()
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        eprintln!("nodefield-render: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
