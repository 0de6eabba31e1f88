// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::rng::{pixel_seed, LcgRng};
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::Renderer;

const BLOCK_SIZE: usize = 32;

struct Block {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    pixels: Vec<Vector3f>,
    dropped_samples: usize,
}

/// Block-parallel renderer. Workers pull square blocks off a shared
/// counter; every pixel draws from its own seeded stream, so the image does
/// not depend on the thread count.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    camera_id: usize,
    seed: u64,
    thread_count: Option<usize>,
    cancel: Option<Arc<AtomicBool>>,
    show_progress: bool,
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, camera_id: usize, seed: u64) -> Self {
        Self {
            integrator,
            camera_id,
            seed,
            thread_count: None,
            cancel: None,
            show_progress: true,
        }
    }

    pub fn with_threads(mut self, thread_count: usize) -> Self {
        self.thread_count = Some(thread_count.max(1));
        self
    }

    /// Once the flag is set no new block is started; blocks already in
    /// flight finish and unrendered pixels stay black.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn render_block(&self,
                    scene: &Scene,
                    sensor: &dyn Sensor,
                    spp: u32,
                    (x0, y0, x1, y1): (usize, usize, usize, usize)) -> Block {
        let inv_spp = 1.0 / (spp as Float);
        let mut pixels = vec![Vector3f::zeros(); (x1 - x0) * (y1 - y0)];
        let mut dropped_samples = 0;

        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = Vector2f::new(x as Float, y as Float);
                let mut rng = LcgRng::new(pixel_seed(self.seed, x, y));
                let mut color = RGBSpectrum::black();
                for _sample in 0..spp {
                    let value = self.integrator.trace_ray_forward(scene, sensor, pixel, &mut rng);
                    if value.is_finite() {
                        color += value;
                    } else {
                        dropped_samples += 1;
                    }
                }
                pixels[(x - x0) + (x1 - x0) * (y - y0)] = (color * inv_spp).to_vector();
            }
        }

        Block { x0, y0, x1, y1, pixels, dropped_samples }
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &mut Scene) -> Bitmap {
        let mut sensor = match scene.take_sensor(self.camera_id) {
            Some(sensor) => sensor,
            None => {
                log::error!("Scene has no camera {}.", self.camera_id);
                return Bitmap::new(0, 0);
            }
        };

        let (width, height) = {
            let bmp = sensor.bitmap();
            (bmp.width(), bmp.height())
        };
        if width == 0 || height == 0 {
            scene.insert_sensor(self.camera_id, sensor);
            return Bitmap::new(0, 0);
        }
        let spp = match self.integrator.samples_per_pixel() {
            0 => 1,
            v => v,
        };

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;
        let scene_ref: &Scene = scene;
        let sensor_ref: &dyn Sensor = sensor.as_ref();

        let progress = if self.show_progress {
            ProgressBar::new(total_blocks as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let thread_count = self.thread_count.unwrap_or_else(|| {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        });
        log::info!("Rendering {}x{} at {} spp on {} threads.", width, height, spp, thread_count);

        let next_block = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<Block>();
        let mut output = vec![Vector3f::zeros(); width * height];
        let mut finished_blocks = 0;
        let mut dropped_samples = 0;

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        if self.is_cancelled() {
                            break;
                        }
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * BLOCK_SIZE;
                        let y0 = (block_index / blocks_x) * BLOCK_SIZE;
                        let bounds = (x0, y0, (x0 + BLOCK_SIZE).min(width), (y0 + BLOCK_SIZE).min(height));
                        let block = self.render_block(scene_ref, sensor_ref, spp, bounds);
                        if tx.send(block).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for block in rx.iter() {
                let block_width = block.x1 - block.x0;
                for y in block.y0..block.y1 {
                    for x in block.x0..block.x1 {
                        output[x + width * y] = block.pixels[(x - block.x0) + block_width * (y - block.y0)];
                    }
                }
                dropped_samples += block.dropped_samples;
                finished_blocks += 1;
                progress.inc(1);
            }
        });
        progress.finish_and_clear();

        if finished_blocks < total_blocks {
            log::warn!("Render cancelled after {}/{} blocks.", finished_blocks, total_blocks);
        } else {
            log::info!("Render finished.");
        }
        if dropped_samples > 0 {
            log::warn!("Dropped {} non-finite samples.", dropped_samples);
        }

        let bitmap = sensor.bitmap_mut();
        for y in 0..height {
            for x in 0..width {
                bitmap[(x, y)] = output[x + width * y];
            }
        }
        let bitmap = bitmap.clone();
        scene.insert_sensor(self.camera_id, sensor);
        bitmap
    }
}
