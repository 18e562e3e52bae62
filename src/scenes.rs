//! Demo scene construction. The renderer core only sees the resulting
//! `World` and `Camera`; everything here is setup glue.

use std::sync::Arc;

use crate::{
    camera::Camera,
    hittable::{Boundary, ConstantMedium, Cuboid, Shape, Sphere, Triangle, World},
    material::{Dielectric, Lambertian, Lightsource, Material, Metal},
    rng::{PixelRng, Rng},
    texture::{CheckerTexture, Texture},
    vec3::{Color, Float, Point3, Vec3, Vec3Ext},
};

/// The showcase scene: a checkered ground sphere, a field of small random
/// spheres (thinned by `sphere_step`), a pyramid, a glowing ball, a handful
/// of large feature spheres, a metallic monolith and a ball of smoke.
///
/// Construction draws from the caller's generator, so the same seed always
/// produces the same scene.
pub fn cover_scene(sphere_step: usize, rng: &mut PixelRng) -> World {
    let mut shapes: Vec<Shape> = Vec::new();

    let ground_checker: Texture =
        CheckerTexture::new_colors(Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9)).into();
    let ground: Arc<Material> = Arc::new(Lambertian::new(ground_checker).into());
    shapes.push(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground).into());

    for a in (-11..11).step_by(sphere_step) {
        for b in (-11..11).step_by(sphere_step) {
            let choose_mat = rng.gen::<Float>();
            let center = Point3::new(
                a as Float + 0.9 * rng.gen::<Float>(),
                0.2,
                b as Float + 0.9 * rng.gen::<Float>(),
            );

            if choose_mat < 0.7 {
                // Diffuse, drifting upward over the shutter interval
                let albedo = Vec3::random(rng, 0.0, 1.0).component_mul(&Vec3::random(rng, 0.0, 1.0));
                let material: Arc<Material> =
                    Arc::new(Lambertian::new_rgb(albedo.x, albedo.y, albedo.z).into());
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                shapes.push(Sphere::new_moving(center, center1, 0.0, 1.0, 0.2, material).into());
            } else if choose_mat < 0.95 {
                let albedo = Vec3::random(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                let material: Arc<Material> = Arc::new(Metal::new(albedo, fuzz).into());
                shapes.push(Sphere::new(center, 0.2, material).into());
            } else {
                let material: Arc<Material> =
                    Arc::new(Dielectric::new(1.5, Color::new(1.0, 1.0, 1.0)).into());
                shapes.push(Sphere::new(center, 0.2, material).into());
            }
        }
    }

    // Pyramid
    let faces = [
        (
            Point3::new(6.5, 0.0, 1.30),
            Point3::new(6.25, 0.50, 1.05),
            Point3::new(6.5, 0.0, 0.80),
            Color::new(0.68, 0.50, 0.1),
        ),
        (
            Point3::new(6.0, 0.0, 1.30),
            Point3::new(6.25, 0.50, 1.05),
            Point3::new(6.5, 0.0, 1.30),
            Color::new(0.89, 0.73, 0.29),
        ),
        (
            Point3::new(6.5, 0.0, 0.80),
            Point3::new(6.25, 0.50, 1.05),
            Point3::new(6.0, 0.0, 0.80),
            Color::new(0.0, 0.0, 1.0),
        ),
        (
            Point3::new(6.0, 0.0, 0.80),
            Point3::new(6.25, 0.50, 1.05),
            Point3::new(6.0, 0.0, 1.30),
            Color::new(0.0, 0.0, 1.0),
        ),
    ];
    for (v0, v1, v2, color) in faces {
        let material: Arc<Material> = Arc::new(Lambertian::new_rgb(color.x, color.y, color.z).into());
        shapes.push(Triangle::new(v0, v1, v2, material).into());
    }

    // Glowing ball
    let glow: Arc<Material> = Arc::new(Lightsource::new_color(Color::new(10.0, 0.0, 10.0)).into());
    shapes.push(Sphere::new(Point3::new(4.0, 1.0, 0.0), 0.2, glow).into());

    // Large feature spheres
    let feature_checker: Texture =
        CheckerTexture::new_colors(Color::new(0.9, 0.9, 0.9), Color::new(0.4, 0.2, 0.1)).into();
    let checkered: Arc<Material> = Arc::new(Lambertian::new(feature_checker).into());
    let tinted_glass: Arc<Material> =
        Arc::new(Dielectric::new(1.5, Color::new(1.0, 0.5, 0.5)).into());
    let brown: Arc<Material> = Arc::new(Lambertian::new_rgb(0.4, 0.2, 0.1).into());
    let mirror: Arc<Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0).into());

    shapes.push(Sphere::new(Point3::new(4.0, 1.0, 2.25), 1.0, checkered.clone()).into());
    shapes.push(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, tinted_glass).into());
    shapes.push(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, brown).into());
    shapes.push(Sphere::new(Point3::new(0.0, 1.0, -2.25), 1.0, mirror).into());
    shapes.push(Sphere::new(Point3::new(-60.0, 3.0, 5.0), 4.0, checkered).into());

    // Metallic monolith
    let dull_metal: Arc<Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.25).into());
    shapes.push(
        Cuboid::new(
            Point3::new(6.5, 0.0, -1.5),
            Point3::new(7.0, 3.0, -1.0),
            dull_metal,
        )
        .into(),
    );

    // Smoke ball
    let smoke_surface: Arc<Material> = Arc::new(Lambertian::new_rgb(0.75, 0.75, 0.75).into());
    let smoke_boundary: Boundary = Sphere::new(Point3::new(5.0, 1.0, 3.5), 1.0, smoke_surface).into();
    shapes.push(ConstantMedium::new_color(smoke_boundary, 1.0, Color::new(1.0, 1.0, 1.0)).into());

    World::build(shapes)
}

pub fn cover_camera(aspect_ratio: Float) -> Camera {
    let look_from = Point3::new(13.0, 3.0, 3.0);
    let look_at = Point3::new(0.0, -1.0, 0.0);
    let focus_dist = (look_at - look_from).norm();
    Camera::new(
        look_from,
        look_at,
        Vec3::y(),
        40.0,
        aspect_ratio,
        0.04,
        focus_dist,
        0.0,
        1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    #[test]
    fn test_cover_scene_is_deterministic_per_seed() {
        let a = cover_scene(1, &mut rng::seeded(11));
        let b = cover_scene(1, &mut rng::seeded(11));
        assert_eq!(a.len(), b.len());
        assert!(!a.is_empty());
    }

    #[test]
    fn test_sphere_step_thins_the_field() {
        let dense = cover_scene(1, &mut rng::seeded(11));
        let sparse = cover_scene(4, &mut rng::seeded(11));
        assert!(sparse.len() < dense.len());
    }
}
