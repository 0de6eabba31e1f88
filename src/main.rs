// Copyright 2020 TwoCookingMice

use glacage::core::config::RenderOptions;
use glacage::integrators::direct::DirectLightingIntegrator;
use glacage::io::exr_utils;
use glacage::renderers::simple::{ Renderer, SimpleRenderer };
use glacage::scenes::cornell_box;

use std::env;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = match RenderOptions::from_args(&args[1..]) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: {} <output.exr> [--spp N] [--max-depth N] [--bounces N] \
                       [--mode direct|total] [--attenuation halve|throughput] [--seed N] \
                       [--width N] [--height N] [--texture back_wall.png]", args[0]);
            std::process::exit(1);
        }
    };
    let output_path = match options.positional.first() {
        Some(path) => path.clone(),
        None => {
            eprintln!("Usage: {} <output.exr> [flags]", args[0]);
            std::process::exit(1);
        }
    };

    log::info!("Integrator: {:?}", options.integrator);
    let mut scene = match cornell_box::from_options(&options) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to build the scene: {}", e);
            std::process::exit(2);
        }
    };
    let integrator = Box::new(DirectLightingIntegrator::new(options.integrator.clone()));
    let renderer = SimpleRenderer::new(integrator, 0, options.seed);
    let image = renderer.render(&mut scene);

    if let Err(e) = exr_utils::write_exr_to_file(&image, &output_path) {
        log::error!("Failed to write {}: {}", output_path, e);
        std::process::exit(2);
    }
}
