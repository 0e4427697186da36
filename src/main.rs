//! Interactive terminal driver for the viewer.
//!
//! Opens a viewer on the images given on the command line (files or
//! directories), reads one command per line from stdin and prints the frame
//! the active shell renders after each command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use vitrine::config::{AppConfig, DevicePreference};
use vitrine::constants::IMAGE_EXTENSIONS;
use vitrine::gesture::{InputEvent, Key, MouseButton, Point, Rectangle};
use vitrine::logging;
use vitrine::preload::{DecoderThread, FileSource, ImageSource, LoadError, decode_dimensions};
use vitrine::shell::{RecoveryAction, ViewerShell};
use vitrine::{
    ImageRef, ImageViewer, UnifiedShell, ViewerError, ViewerIntent, ViewerOptions, ViewerPhase,
};
use web_time::Instant;

/// Errors that end the driver.
#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("No images found; pass image files or directories")]
    NoImages,

    #[error("Invalid argument: {0}")]
    BadArgument(String),

    #[error(transparent)]
    Viewer(#[from] ViewerError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
const DEFAULT_VIEWPORT_HEIGHT: f32 = 800.0;

const HELP: &str = "\
commands:
  n | next            p | prev            g <n>   go to image n
  + | -               zoom in / out       r       rotate
  0 | reset           reset view          retry   reload failed image
  swipe left|right    wheel up|down       tap <x> <y>   double tap
  drag <dx> <dy>      hover <x> <y>       width <px>    resize viewport
  close | open        reload              config  print configuration
  save-config         help                q | quit";

/// Command line options.
struct Args {
    device: Option<DevicePreference>,
    viewport_width: f32,
    paths: Vec<PathBuf>,
}

fn parse_args() -> Result<Args, DriverError> {
    let mut args = Args {
        device: None,
        viewport_width: DEFAULT_VIEWPORT_WIDTH,
        paths: Vec::new(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mobile" => args.device = Some(DevicePreference::Mobile),
            "--desktop" => args.device = Some(DevicePreference::Desktop),
            "--width" => {
                let value = iter
                    .next()
                    .ok_or_else(|| DriverError::BadArgument("--width needs a value".into()))?;
                args.viewport_width = value
                    .parse()
                    .map_err(|_| DriverError::BadArgument(format!("bad width '{}'", value)))?;
            }
            _ => args.paths.push(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn image_ref(path: &Path) -> ImageRef {
    let alt = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ImageRef::new(path.to_string_lossy(), alt)
}

/// Expand files and directories into a sorted image list.
fn collect_images(paths: &[PathBuf]) -> Result<Vec<ImageRef>, DriverError> {
    let mut images = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            entries.sort();
            images.extend(entries.iter().map(|p| image_ref(p)));
        } else if is_image(path) {
            images.push(image_ref(path));
        } else {
            log::warn!("Skipping {:?}: not a supported image", path);
        }
    }
    if images.is_empty() {
        return Err(DriverError::NoImages);
    }
    Ok(images)
}

/// One "page": the viewer, its shell and the loader for the current image.
struct Session {
    viewer: ImageViewer,
    shell: UnifiedShell,
    source: Arc<FileSource>,
    viewport_width: f32,
}

impl Session {
    fn start(
        config: &AppConfig,
        images: Vec<ImageRef>,
        viewport_width: f32,
    ) -> Result<Self, DriverError> {
        let source = Arc::new(FileSource::new());
        let preloader = DecoderThread::spawn(source.clone())?;
        let mut viewer = ImageViewer::new(ViewerOptions::from(config))
            .with_preloader(Box::new(preloader))
            .on_open_change(|open| println!("viewer {}", if open { "opened" } else { "closed" }))
            .on_image_change(|index| println!("showing image {}", index + 1));
        viewer.set_container(Rectangle::new(
            0.0,
            0.0,
            viewport_width,
            DEFAULT_VIEWPORT_HEIGHT,
        ));
        viewer.open(images, 0, Instant::now())?;

        let shell = UnifiedShell::new(config.preferences.clone(), viewport_width);
        Ok(Self {
            viewer,
            shell,
            source,
            viewport_width,
        })
    }

    /// Load the displayed image if it is waiting for its bytes.
    fn load_current(&mut self) {
        if self.viewer.phase() != ViewerPhase::Loading {
            return;
        }
        let index = self.viewer.selected_index();
        let Some(image) = self.viewer.current_image() else {
            return;
        };
        let result = self
            .source
            .fetch(&image.url)
            .and_then(|bytes| decode_dimensions(&bytes));
        let reported = match result {
            Ok((width, height)) => {
                log::debug!("Loaded {} ({}x{})", image.url, width, height);
                self.viewer.image_loaded(index)
            }
            Err(e) => self.viewer.image_failed(index, e.to_string()),
        };
        if let Err(e) = reported {
            log::warn!("Could not record load result: {}", e);
        }
    }

    /// Run scheduled work until the viewer has nothing left due.
    fn settle(&mut self) {
        loop {
            let now = Instant::now();
            self.viewer.tick(now);
            self.shell.tick(now);
            self.load_current();

            let Some(deadline) = self.viewer.next_deadline() else {
                break;
            };
            let wait = deadline.saturating_duration_since(Instant::now());
            std::thread::sleep(wait.min(Duration::from_millis(50)));
        }
    }

    fn input(&mut self, event: InputEvent) -> bool {
        let now = Instant::now();
        self.shell.observe(&event, &self.viewer.view(), now);
        if !self.shell.routes(&event) {
            log::debug!("{} shell drops {:?}", self.shell.name(), event);
            return false;
        }
        self.viewer.handle_input(&event, now)
    }

    fn key(&mut self, key: Key) -> bool {
        self.input(InputEvent::KeyPressed { key })
    }

    fn center(&self) -> Point {
        Point::new(self.viewport_width / 2.0, DEFAULT_VIEWPORT_HEIGHT / 2.0)
    }

    fn swipe(&mut self, dx: f32) -> bool {
        let start = self.center();
        let t0 = Instant::now();
        self.input(InputEvent::TouchStart {
            touches: vec![start],
            time: t0,
        });
        self.input(InputEvent::TouchEnd {
            remaining: Vec::new(),
            lifted: Point::new(start.x + dx, start.y),
            time: t0 + Duration::from_millis(120),
        })
    }

    fn click(&mut self, at: Point, time: Instant) -> bool {
        self.input(InputEvent::PointerDown {
            button: MouseButton::Left,
            position: at,
            time,
        });
        self.input(InputEvent::PointerUp {
            button: MouseButton::Left,
            position: at,
            time: time + Duration::from_millis(40),
        })
    }

    fn double_tap(&mut self, at: Point) -> bool {
        let t0 = Instant::now();
        self.click(at, t0);
        self.click(at, t0 + Duration::from_millis(150))
    }

    fn drag(&mut self, dx: f32, dy: f32) -> bool {
        let start = self.center();
        let end = Point::new(start.x + dx, start.y + dy);
        let t0 = Instant::now();
        self.input(InputEvent::PointerDown {
            button: MouseButton::Left,
            position: start,
            time: t0,
        });
        let moved = self.input(InputEvent::PointerMove {
            position: end,
            time: t0 + Duration::from_millis(16),
        });
        self.input(InputEvent::PointerUp {
            button: MouseButton::Left,
            position: end,
            time: t0 + Duration::from_millis(400),
        });
        moved
    }

    fn print_frame(&mut self) {
        match self.shell.render(&self.viewer.view()) {
            Ok(frame) => print!("{}", frame),
            Err(e) => log::error!("Render failed: {}", e),
        }
    }
}

fn parse_point(x: Option<&str>, y: Option<&str>) -> Option<Point> {
    Some(Point::new(x?.parse().ok()?, y?.parse().ok()?))
}

/// What the loop should do after a command.
enum Outcome {
    Continue,
    Reload,
    Quit,
}

fn execute(session: &mut Session, config: &AppConfig, line: &str) -> Outcome {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Outcome::Continue;
    };
    let now = Instant::now();

    let changed = match command {
        "n" | "next" => session.key(Key::Right),
        "p" | "prev" => session.key(Key::Left),
        "+" => session.key(Key::Char('+')),
        "-" => session.key(Key::Char('-')),
        "r" | "rotate" => session.key(Key::Char('r')),
        "0" | "reset" => session.key(Key::Char('0')),
        "close" | "esc" => session.key(Key::Escape),
        "g" => match words.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => match session.viewer.go_to(n - 1, None, now) {
                Ok(moved) => moved,
                Err(e) => {
                    println!("{}", e);
                    false
                }
            },
            _ => {
                println!("usage: g <image number>");
                false
            }
        },
        "swipe" => match words.next() {
            Some("left") => session.swipe(-150.0),
            Some("right") => session.swipe(150.0),
            _ => {
                println!("usage: swipe left|right");
                false
            }
        },
        "wheel" => {
            let delta_y = if words.next() == Some("down") { 1.0 } else { -1.0 };
            let position = session.center();
            session.input(InputEvent::Wheel { delta_y, position })
        }
        "tap" => match parse_point(words.next(), words.next()) {
            Some(at) => session.double_tap(at),
            None => {
                println!("usage: tap <x> <y>");
                false
            }
        },
        "drag" => match parse_point(words.next(), words.next()) {
            Some(delta) => session.drag(delta.x, delta.y),
            None => {
                println!("usage: drag <dx> <dy>");
                false
            }
        },
        "hover" => match parse_point(words.next(), words.next()) {
            Some(at) => session.input(InputEvent::PointerMove {
                position: at,
                time: now,
            }),
            None => {
                println!("usage: hover <x> <y>");
                false
            }
        },
        "retry" => {
            let index = session.viewer.selected_index();
            session.viewer.retry(index).is_ok()
        }
        "open" => match session.viewer.set_open(true, now) {
            Ok(()) => true,
            Err(e) => {
                println!("{}", e);
                false
            }
        },
        "width" => match words.next().and_then(|w| w.parse::<f32>().ok()) {
            Some(width) => {
                session.viewport_width = width;
                session
                    .viewer
                    .set_container(Rectangle::new(0.0, 0.0, width, DEFAULT_VIEWPORT_HEIGHT));
                session.shell.set_viewport_width(width)
            }
            None => {
                println!("usage: width <px>");
                false
            }
        },
        "reload" => {
            return match session.shell.reload() {
                RecoveryAction::ReloadPage => Outcome::Reload,
            };
        }
        "config" => {
            match config.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => println!("Failed to serialize config: {}", e),
            }
            return Outcome::Continue;
        }
        "save-config" => {
            if let Err(e) = config.save_to_default_path() {
                println!("Failed to save config: {}", e);
            }
            return Outcome::Continue;
        }
        "help" | "?" => {
            println!("{}", HELP);
            println!("keys:");
            for intent in [
                ViewerIntent::Previous,
                ViewerIntent::Next,
                ViewerIntent::ZoomIn,
                ViewerIntent::ZoomOut,
                ViewerIntent::Reset,
                ViewerIntent::Rotate,
                ViewerIntent::Close,
            ] {
                println!(
                    "  {:<16} {}",
                    intent.name(),
                    config.keybindings.describe(intent)
                );
            }
            return Outcome::Continue;
        }
        "q" | "quit" | "exit" => return Outcome::Quit,
        other => {
            println!("unknown command '{}' (try 'help')", other);
            return Outcome::Continue;
        }
    };

    log::trace!("'{}' changed state: {}", line, changed);
    session.settle();
    session.print_frame();
    Outcome::Continue
}

fn run() -> Result<(), DriverError> {
    let mut config = AppConfig::load_from_default_path().unwrap_or_default();
    logging::init(config.preferences.log_level);

    let args = parse_args()?;
    if let Some(device) = args.device {
        config.preferences.device = device;
    }
    let images = collect_images(&args.paths)?;
    log::info!("Found {} images", images.len());

    let mut session = Session::start(&config, images.clone(), args.viewport_width)?;
    session.settle();
    session.print_frame();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match execute(&mut session, &config, line.trim()) {
            Outcome::Continue => {}
            Outcome::Reload => {
                log::info!("Reloading viewer");
                let width = session.viewport_width;
                session = Session::start(&config, images.clone(), width)?;
                session.settle();
                session.print_frame();
            }
            Outcome::Quit => break,
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
