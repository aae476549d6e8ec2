use log::*;
use whitrace::image::Image;
use whitrace::renderer::Renderer;
use whitrace::shape::Shape;
use whitrace::*;

fn usage(program: &str, opts: &getopts::Options) -> String {
    opts.usage(&format!("Usage: {} [options]", program))
}

fn opt_parse<T: std::str::FromStr>(matches: &getopts::Matches, name: &str, default: T) -> T {
    match matches.opt_str(name) {
        Some(s) => match s.parse() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("invalid value for --{}: {}", name, s);
                std::process::exit(2);
            }
        },
        None => default,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut opts = getopts::Options::new();
    opts.optopt("w", "width", "frame width in pixels", "PIXELS");
    opts.optopt("h", "height", "frame height in pixels", "PIXELS");
    opts.optopt("f", "frames", "frames to render", "N");
    opts.optopt("t", "threads", "render threads", "N");
    opts.optflag("", "help", "print this help");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", usage(&args[0], &opts));
            std::process::exit(2);
        }
    };
    if matches.opt_present("help") {
        println!("{}", usage(&args[0], &opts));
        return;
    }

    let width = opt_parse(&matches, "width", 256u32);
    let height = opt_parse(&matches, "height", 256u32);
    let frames = opt_parse(&matches, "frames", 32u32);
    let threads = opt_parse(&matches, "threads", num_cpus::get());

    let mut renderer = Renderer::new(width, height);
    renderer.set_threads(threads);
    renderer.scene = example_scenes::make_demo();
    let mut image = Image::new(width, height);

    info!(
        "{}x{}, {} frames on {} threads",
        width, height, frames, threads
    );

    let velocity = 5.0 / frames as f32;
    for frame in 0..frames {
        let start = std::time::Instant::now();
        renderer.render_frame(&mut image);
        let mean = image.mean();
        info!(
            "frame {:>3} in {:>6.1?}  mean ({:.3}, {:.3}, {:.3})",
            frame,
            start.elapsed(),
            mean.r,
            mean.g,
            mean.b
        );

        // mutate only between frames: slide the mirror sphere, tilt the
        // glass rectangle a little
        let shapes = renderer.scene.shapes_mut();
        if let Some(Shape::Sphere(sphere)) = shapes.last_mut() {
            sphere.center.x += velocity;
        }
        for shape in shapes.iter_mut() {
            if let Shape::Rectangle(rect) = shape {
                rect.rotate_y(0.01);
            }
        }
    }
}
