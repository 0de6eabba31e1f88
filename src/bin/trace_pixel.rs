use glacage::core::config::{LightingMode, RenderOptions};
use glacage::core::rng::{pixel_seed, LcgRng, RandomSource};
use glacage::core::sensor::Sensor;
use glacage::integrators::direct::DirectLightingIntegrator;
use glacage::integrators::path::PathState;
use glacage::io::exr_utils::read_exr_from_file;
use glacage::math::constants::{Float, Vector2f};
use glacage::math::spectrum::RGBSpectrum;
use glacage::scenes::cornell_box;
use std::collections::HashMap;
use std::env;

// Traces `--spp` camera paths through one pixel of the built-in scene and
// reports how they ended. An optional rendered EXR is read back so the
// stored pixel can be compared with the traced mean.
fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = RenderOptions::from_args(&args[1..]).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    if options.positional.len() < 2 {
        eprintln!("Usage: {} <x> <y> [render.exr] [--spp N] [--mode direct|total] [--attenuation halve|throughput] \
                   [--max-depth N] [--bounces N] [--seed N] [--width N] [--height N] \
                   [--texture back_wall.png]", args[0]);
        std::process::exit(1);
    }
    let x: usize = options.positional[0].parse().unwrap_or(0);
    let y: usize = options.positional[1].parse().unwrap_or(0);
    if x >= options.width || y >= options.height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, options.width, options.height);
        std::process::exit(2);
    }

    let scene = cornell_box::from_options(&options).unwrap_or_else(|e| {
        eprintln!("Failed to build the scene: {}", e);
        std::process::exit(1);
    });
    let sensor = scene.camera(0).expect("the built-in scene always has camera 0");
    let integrator = DirectLightingIntegrator::new(options.integrator.clone());
    let mut rng = LcgRng::new(pixel_seed(options.seed, x, y));

    let paths = options.integrator.samples_per_pixel;
    let mut histogram: HashMap<PathState, u32> = HashMap::new();
    let mut sum = RGBSpectrum::black();
    let mut total_bounces = 0u64;
    for _ in 0..paths {
        let jitter = rng.next_2d();
        let film = Vector2f::new((x as Float + jitter.x) / options.width as Float,
                                 (y as Float + jitter.y) / options.height as Float);
        let ray = sensor.sample_ray(&film);
        let record = match options.integrator.mode {
            LightingMode::Direct => integrator.trace_ray_record(&scene, &ray, 0, &mut rng),
            LightingMode::Total => integrator.trace_ray_total_lighting_record(&scene, &ray, 0, &mut rng),
        };
        *histogram.entry(record.termination).or_insert(0) += 1;
        sum += record.radiance;
        total_bounces += record.bounces as u64;
    }

    let inv = 1.0 / paths as Float;
    let mean = sum * inv;
    println!("pixel ({}, {}), {} paths, mode {:?}, attenuation {:?}",
             x, y, paths, options.integrator.mode, options.integrator.attenuation);
    println!("mean radiance: ({:.6}, {:.6}, {:.6})", mean[0], mean[1], mean[2]);
    println!("mean bounces: {:.3}", total_bounces as Float * inv);

    if let Some(path) = options.positional.get(2) {
        match read_exr_from_file(path) {
            Ok(render) if x < render.width() && y < render.height() => {
                let stored = render[(x, y)];
                println!("stored in {}: ({:.6}, {:.6}, {:.6})", path, stored.x, stored.y, stored.z);
            }
            Ok(render) => eprintln!("{} is {}x{}, pixel ({}, {}) is outside it",
                                    path, render.width(), render.height(), x, y),
            Err(e) => eprintln!("Failed to read {}: {}", path, e),
        }
    }

    let mut states: Vec<_> = histogram.into_iter().collect();
    states.sort_by(|a, b| b.1.cmp(&a.1));
    for (state, count) in states {
        println!("  {:<28} {:>8} ({:.1}%)", format!("{:?}", state), count, 100.0 * count as Float * inv);
    }
}
