use crate::{
    camera::Camera,
    hittable::{Hit, World},
    material::Scatter,
    ray::Ray,
    rng::{self, PixelRng, Rng},
    vec3::{Color, Float},
};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator};
use itertools::Itertools;
use rayon::prelude::*;

/// Minimum hit distance; keeps bounced rays from re-hitting their own origin.
pub const T_MIN: Float = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    /// One sequential task walking all pixels in a nested loop.
    Serial,
    /// One independent work item per pixel, scheduled by rayon.
    Parallel,
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: u64,
    pub mode: ExecMode,
}

/// Linear-space render output; row 0 is the top of the image. Encoding to a
/// displayable format is a post-process (see the output module).
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> &Color {
        &self.pixels[(y * self.width + x) as usize]
    }
}

/// Radiance arriving along `ray`, evaluated iteratively for up to
/// `max_depth` bounces.
///
/// Throughput accumulates the per-bounce attenuations; emission is scaled by
/// the throughput at the bounce where it occurs. A path that escapes the
/// scene picks up the white-to-blue background gradient; a path still alive
/// after `max_depth` bounces contributes black (hard cutoff, no Russian
/// roulette).
pub fn ray_color(ray: &Ray, world: &World, max_depth: u32, rng: &mut PixelRng) -> Color {
    let mut cur_ray = *ray;
    let mut throughput = Color::repeat(1.0);
    let mut radiance = Color::zeros();

    for _ in 0..max_depth {
        match world.hit(&cur_ray, &(T_MIN..Float::INFINITY), rng) {
            Some(hit) => {
                let emitted = hit.material.emitted(&hit);
                radiance += throughput.component_mul(&emitted);
                match hit.material.scatter(&cur_ray, &hit, rng) {
                    Some((attenuation, scattered)) => {
                        throughput = throughput.component_mul(&attenuation);
                        cur_ray = scattered;
                    }
                    // Absorbed or emissive-only: the path ends here
                    None => return radiance,
                }
            }
            None => {
                // Blend white to sky blue over the ray's vertical direction
                let unit_direction = cur_ray.direction.normalize();
                let t = 0.5 * (unit_direction.y + 1.0);
                let background = Color::repeat(1.0).lerp(&Color::new(0.5, 0.7, 1.0), t);
                return radiance + throughput.component_mul(&background);
            }
        }
    }

    Color::zeros()
}

/// Mean radiance over all samples of one pixel. Each pixel derives its own
/// generator from (seed, linear index), so the result is independent of
/// scheduling order and thread count.
fn render_pixel(world: &World, camera: &Camera, opts: &RenderOptions, index: usize) -> Color {
    let mut rng = rng::for_pixel(opts.seed, index as u64);
    let x = (index as u32 % opts.width) as Float;
    // Row 0 is the image top; viewport t grows upward
    let y = (opts.height - 1 - index as u32 / opts.width) as Float;

    let mut color = Color::zeros();
    for _ in 0..opts.samples_per_pixel {
        let s = (x + rng.gen::<Float>()) / opts.width as Float;
        let t = (y + rng.gen::<Float>()) / opts.height as Float;
        let ray = camera.get_ray(s, t, &mut rng);
        color += ray_color(&ray, world, opts.max_depth, &mut rng);
    }
    color / opts.samples_per_pixel as Float
}

/// Renders the scene into a fresh frame buffer. The scene and camera are
/// shared read-only across work items; every work item owns exactly one
/// frame-buffer cell, so the parallel mode needs no synchronization beyond
/// the final join.
pub fn render(
    world: &World,
    camera: &Camera,
    opts: &RenderOptions,
    progress: ProgressBar,
) -> FrameBuffer {
    let mut pixels = vec![Color::zeros(); (opts.width * opts.height) as usize];

    match opts.mode {
        ExecMode::Parallel => {
            pixels
                .par_iter_mut()
                .enumerate()
                .progress_with(progress)
                .for_each(|(index, pixel)| {
                    *pixel = render_pixel(world, camera, opts, index);
                });
        }
        ExecMode::Serial => {
            for (y, x) in (0..opts.height)
                .cartesian_product(0..opts.width)
                .progress_with(progress)
            {
                let index = (y * opts.width + x) as usize;
                pixels[index] = render_pixel(world, camera, opts, index);
            }
        }
    }

    FrameBuffer {
        width: opts.width,
        height: opts.height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::Sphere;
    use crate::material::{Lambertian, Lightsource, Material};
    use crate::vec3::{Point3, Vec3};
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn sky_only() -> World {
        World::build(vec![])
    }

    #[test]
    fn test_upward_ray_hits_sky_blue() {
        let ray = Ray::new(Point3::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.0);
        let c = ray_color(&ray, &sky_only(), 8, &mut rng::seeded(1));
        assert_eq!(c, Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn test_downward_ray_hits_white() {
        let ray = Ray::new(Point3::zeros(), Vec3::new(0.0, -1.0, 0.0), 0.0);
        let c = ray_color(&ray, &sky_only(), 8, &mut rng::seeded(1));
        assert_eq!(c, Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_zero_depth_contributes_black() {
        let ray = Ray::new(Point3::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.0);
        let c = ray_color(&ray, &sky_only(), 0, &mut rng::seeded(1));
        assert_eq!(c, Color::zeros());
    }

    fn options(mode: ExecMode, seed: u64) -> RenderOptions {
        RenderOptions {
            width: 4,
            height: 4,
            samples_per_pixel: 2,
            max_depth: 4,
            seed,
            mode,
        }
    }

    fn test_scene() -> (World, Camera) {
        let material: Arc<Material> = Arc::new(Lambertian::new_rgb(0.7, 0.3, 0.3).into());
        let world = World::build(vec![Sphere::new(
            Point3::new(0.0, 0.0, -3.0),
            1.0,
            material,
        )
        .into()]);
        let camera = Camera::new(
            Point3::zeros(),
            Point3::new(0.0, 0.0, -1.0),
            Vec3::y(),
            60.0,
            1.0,
            0.0,
            3.0,
            0.0,
            0.0,
        );
        (world, camera)
    }

    #[test]
    fn test_surrounding_lightsource_renders_exact_emitted_color() {
        let glow = Color::new(2.0, 0.5, 7.0);
        let material: Arc<Material> = Arc::new(Lightsource::new_color(glow).into());
        // Camera sits inside the emissive sphere: every primary ray
        // terminates on it with throughput still at one
        let world = World::build(vec![Sphere::new(Point3::zeros(), 100.0, material).into()]);
        let camera = Camera::new(
            Point3::zeros(),
            Point3::new(0.0, 0.0, -1.0),
            Vec3::y(),
            40.0,
            1.0,
            0.0,
            1.0,
            0.0,
            0.0,
        );
        let opts = RenderOptions {
            width: 2,
            height: 2,
            samples_per_pixel: 1,
            max_depth: 1,
            seed: 9,
            mode: ExecMode::Serial,
        };

        let frame = render(&world, &camera, &opts, ProgressBar::hidden());
        for pixel in frame.pixels() {
            assert_eq!(*pixel, glow);
        }
    }

    #[test]
    fn test_same_seed_renders_identically() {
        let (world, camera) = test_scene();
        let a = render(
            &world,
            &camera,
            &options(ExecMode::Parallel, 42),
            ProgressBar::hidden(),
        );
        let b = render(
            &world,
            &camera,
            &options(ExecMode::Parallel, 42),
            ProgressBar::hidden(),
        );
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_serial_and_parallel_agree() {
        let (world, camera) = test_scene();
        let serial = render(
            &world,
            &camera,
            &options(ExecMode::Serial, 42),
            ProgressBar::hidden(),
        );
        let parallel = render(
            &world,
            &camera,
            &options(ExecMode::Parallel, 42),
            ProgressBar::hidden(),
        );
        assert_eq!(serial.pixels(), parallel.pixels());
    }

    #[test]
    fn test_different_seeds_render_differently() {
        let (world, camera) = test_scene();
        let a = render(
            &world,
            &camera,
            &options(ExecMode::Serial, 1),
            ProgressBar::hidden(),
        );
        let b = render(
            &world,
            &camera,
            &options(ExecMode::Serial, 2),
            ProgressBar::hidden(),
        );
        assert_ne!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_frame_buffer_indexing() {
        let (world, camera) = test_scene();
        let frame = render(
            &world,
            &camera,
            &options(ExecMode::Serial, 42),
            ProgressBar::hidden(),
        );
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 4);
        assert_abs_diff_eq!(*frame.get(1, 2), frame.pixels()[9]);
    }
}
