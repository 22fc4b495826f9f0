extern crate rand;
extern crate gfx_core;
extern crate env_logger;
extern crate piston_window;
#[macro_use] extern crate log;
#[macro_use] extern crate clap;

use std::{io, process};
use std::path::PathBuf;

use clap::Arg;
use piston_window::{
    OpenGL,
    PistonWindow,
    WindowSettings,
    TextureSettings,
    Glyphs,
    Context,
    G2d,
    Event,
    Input,
    Button,
    ButtonArgs,
    ButtonState,
    Key,
};

mod common;
mod bounds;
mod linify;
mod sample;

use common::{Point, Segment};
use bounds::{BoundingTransform, TARGET_SIZE, MARGIN};
use linify::{Linify, Scene, TailPolicy, COLLINEAR_TOLERANCE};

fn main() {
    env_logger::init();
    match run() {
        Ok(()) =>
            info!("graceful shutdown"),
        Err(e) => {
            error!("fatal error: {:?}", e);
            process::exit(1);
        },
    }
}

#[derive(Debug)]
enum Error {
    MissingParameter(&'static str),
    InvalidParameter { name: &'static str, error: clap::Error, },
    Linify(linify::Error),
    Piston(PistonError),
}

#[derive(Debug)]
enum PistonError {
    BuildWindow(String),
    LoadFont { file: String, error: io::Error, },
    DrawText(gfx_core::factory::CombinedError),
}

impl From<linify::Error> for Error {
    fn from(error: linify::Error) -> Error {
        Error::Linify(error)
    }
}

const CONSOLE_HEIGHT: u32 = 32;
const SCREEN_WIDTH: u32 = 640;
const SCREEN_HEIGHT: u32 = 480;
const POINT_RADIUS: f64 = 5.;

fn run() -> Result<(), Error> {
    let matches = app_from_crate!()
        .arg(Arg::with_name("assets-dir")
             .short("a")
             .long("assets-dir")
             .value_name("DIR")
             .help("Graphics resources directory")
             .default_value("./assets")
             .takes_value(true))
        .arg(Arg::with_name("tolerance")
             .short("t")
             .long("tolerance")
             .value_name("AREA")
             .help("Collinearity tolerance (twice the triangle area)")
             .default_value("0.005")
             .takes_value(true))
        .arg(Arg::with_name("target-size")
             .long("target-size")
             .value_name("SIZE")
             .help("Side of the display square the path is fitted into")
             .default_value("400")
             .takes_value(true))
        .arg(Arg::with_name("margin")
             .long("margin")
             .value_name("SIZE")
             .help("Display margin around the fitted path")
             .default_value("10")
             .takes_value(true))
        .arg(Arg::with_name("random-runs")
             .short("r")
             .long("random-runs")
             .value_name("COUNT")
             .help("Use a random path of COUNT straight runs instead of the built-in contour")
             .takes_value(true))
        .arg(Arg::with_name("overwrite-tail")
             .long("overwrite-tail")
             .help("Replace the last emitted segment with the final run instead of appending it"))
        .arg(Arg::with_name("headless")
             .long("headless")
             .help("Print the segments and exit without opening a window"))
        .get_matches();

    let assets_dir = matches.value_of("assets-dir")
        .ok_or(Error::MissingParameter("assets-dir"))?;
    let settings = Settings {
        tolerance: value_t!(matches, "tolerance", f64)
            .map_err(|error| Error::InvalidParameter { name: "tolerance", error, })?,
        target_size: value_t!(matches, "target-size", f64)
            .map_err(|error| Error::InvalidParameter { name: "target-size", error, })?,
        margin: value_t!(matches, "margin", f64)
            .map_err(|error| Error::InvalidParameter { name: "margin", error, })?,
        tail: if matches.is_present("overwrite-tail") {
            TailPolicy::OverwriteLast
        } else {
            TailPolicy::Append
        },
    };
    let source = if matches.is_present("random-runs") {
        let runs = value_t!(matches, "random-runs", usize)
            .map_err(|error| Error::InvalidParameter { name: "random-runs", error, })?;
        Source::Random { runs, }
    } else {
        Source::Reference
    };

    let mut env = Env::load(source, settings)?;
    if matches.is_present("headless") {
        return Ok(());
    }

    let opengl = OpenGL::V4_1;
    let mut window: PistonWindow = WindowSettings::new("Linify", [SCREEN_WIDTH, SCREEN_HEIGHT])
        .exit_on_esc(true)
        .opengl(opengl)
        .build()
        .map_err(PistonError::BuildWindow)
        .map_err(Error::Piston)?;

    let mut font_path = PathBuf::from(assets_dir);
    font_path.push("FiraSans-Regular.ttf");
    let mut glyphs = Glyphs::new(&font_path, window.factory.clone(), TextureSettings::new())
        .map_err(|e| Error::Piston(PistonError::LoadFont {
            file: font_path.to_string_lossy().to_string(),
            error: e,
        }))?;

    while let Some(event) = window.next() {
        let maybe_result = window.draw_2d(&event, |context, g2d| {
            use piston_window::{clear, text, Transformed};
            // clear everything
            clear([0.0, 0.0, 0.0, 1.0], g2d);

            // draw path below the menu
            draw_scene(&env.linify, &env.transform, &env.view, &context.trans(0., CONSOLE_HEIGHT as f64), g2d);

            // draw menu
            text::Text::new_color([0.0, 1.0, 0.0, 1.0], 16).draw(
                &env.info_line(),
                &mut glyphs,
                &context.draw_state,
                context.transform.trans(5.0, 20.0),
                g2d
            ).map_err(PistonError::DrawText)?;

            Ok(())
        });
        if let Some(result) = maybe_result {
            let () = result.map_err(Error::Piston)?;
        }

        match event {
            Event::Input(Input::Button(ButtonArgs { button: Button::Keyboard(Key::Q), state: ButtonState::Release, .. })) =>
                break,
            Event::Input(Input::Button(ButtonArgs { button: Button::Keyboard(Key::P), state: ButtonState::Release, .. })) =>
                env.view.points = !env.view.points,
            Event::Input(Input::Button(ButtonArgs { button: Button::Keyboard(Key::S), state: ButtonState::Release, .. })) =>
                env.view.segments = !env.view.segments,
            Event::Input(Input::Button(ButtonArgs { button: Button::Keyboard(Key::R), state: ButtonState::Release, .. })) =>
                env.regenerate()?,
            _ =>
                (),
        }
    }

    Ok(())
}

fn draw_scene<S: Scene>(scene: &S, transform: &BoundingTransform, view: &View, context: &Context, g2d: &mut G2d) {
    use piston_window::{ellipse, line};

    if view.points {
        for point in scene.points() {
            let Point { x, y, } = transform.to_display(point, view.margin);
            ellipse(
                [1.0, 1.0, 1.0, 1.0],
                [x - POINT_RADIUS, y - POINT_RADIUS, POINT_RADIUS * 2., POINT_RADIUS * 2.],
                context.transform,
                g2d,
            );
        }
    }
    if view.segments {
        for segment in scene.segments() {
            line([0.0, 0.0, 1.0, 1.0], 1., transform.segment_to_display(segment, view.margin), context.transform, g2d);
        }
    }
}

fn print_lines(lines: &[Segment]) {
    for &Segment { src: Point { x: sx, y: sy, }, dst: Point { x: dx, y: dy, }, } in lines {
        println!("( {}, {} ) to ( {}, {} )", sx, sy, dx, dy);
    }
}

#[derive(Clone, Copy, Debug)]
struct Settings {
    tolerance: f64,
    target_size: f64,
    margin: f64,
    tail: TailPolicy,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            tolerance: COLLINEAR_TOLERANCE,
            target_size: TARGET_SIZE,
            margin: MARGIN,
            tail: TailPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Source {
    Reference,
    Random { runs: usize, },
}

impl Source {
    fn points(&self) -> Vec<Point> {
        match self {
            &Source::Reference =>
                sample::reference_contour(),
            &Source::Random { runs, } =>
                sample::random_path(&mut rand::thread_rng(), runs),
        }
    }
}

struct View {
    points: bool,
    segments: bool,
    margin: f64,
}

struct Env {
    source: Source,
    settings: Settings,
    linify: Linify,
    transform: BoundingTransform,
    view: View,
}

impl Env {
    fn load(source: Source, settings: Settings) -> Result<Env, Error> {
        let mut linify = Linify::new(source.points())?
            .with_tolerance(settings.tolerance)?
            .with_tail_policy(settings.tail);
        print_lines(linify.solve());
        let transform = linify.bounding_transform(settings.target_size)?;
        Ok(Env {
            source,
            settings,
            linify,
            transform,
            view: View { points: true, segments: true, margin: settings.margin, },
        })
    }

    fn regenerate(&mut self) -> Result<(), Error> {
        if let Source::Random { .. } = self.source {
            let mut linify = Linify::new(self.source.points())?
                .with_tolerance(self.settings.tolerance)?
                .with_tail_policy(self.settings.tail);
            print_lines(linify.solve());
            self.transform = linify.bounding_transform(self.settings.target_size)?;
            self.linify = linify;
        }
        Ok(())
    }

    fn info_line(&self) -> String {
        let regenerate = match self.source {
            Source::Reference =>
                "",
            Source::Random { .. } =>
                "<R> regenerate, ",
        };
        format!(
            "[ {} points, {} segments at {} ] <P> points, <S> segments, {}<Q> to exit",
            self.linify.points().len(),
            self.linify.lines().len(),
            self.linify.tolerance(),
            regenerate,
        )
    }
}
