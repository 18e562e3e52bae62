use crate::{
    ray::Ray,
    rng::{PixelRng, Rng},
    vec3::{Float, Point3, Vec3, Vec3Ext},
};

/// Thin-lens camera with a shutter interval. All fields are derived once at
/// construction and immutable afterwards.
#[derive(Clone, Debug)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: Float,
    time0: Float,
    time1: Float,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        vup: Vec3,
        vfov_degrees: Float,
        aspect_ratio: Float,
        aperture: Float,
        focus_dist: Float,
        time0: Float,
        time1: Float,
    ) -> Self {
        let theta = vfov_degrees.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        let w = (look_from - look_at).normalize();
        let u = vup.cross(&w).normalize();
        let v = w.cross(&u);

        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner =
            look_from - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: aperture / 2.0,
            time0,
            time1,
        }
    }

    /// Ray through viewport coordinates (s, t), originating on the lens disk
    /// and stamped with a shutter-time sample.
    pub fn get_ray(&self, s: Float, t: Float, rng: &mut PixelRng) -> Ray {
        let rd = self.lens_radius * Vec3::random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;
        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
            rng.gen_range(self.time0..=self.time1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use approx::assert_abs_diff_eq;

    fn pinhole(time0: Float, time1: Float) -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::zeros(),
            Vec3::y(),
            40.0,
            16.0 / 9.0,
            0.0,
            5.0,
            time0,
            time1,
        )
    }

    #[test]
    fn test_center_ray_points_at_look_at() {
        let camera = pinhole(0.0, 0.0);
        let mut rng = rng::seeded(3);
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_abs_diff_eq!(ray.origin, Point3::new(0.0, 0.0, 5.0));
        assert_abs_diff_eq!(
            ray.direction.normalize(),
            Vec3::new(0.0, 0.0, -1.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_zero_aperture_keeps_origin_fixed() {
        let camera = pinhole(0.0, 0.0);
        let mut rng = rng::seeded(3);
        for _ in 0..16 {
            let ray = camera.get_ray(0.1, 0.9, &mut rng);
            assert_abs_diff_eq!(ray.origin, Point3::new(0.0, 0.0, 5.0));
        }
    }

    #[test]
    fn test_ray_time_samples_shutter_interval() {
        let camera = pinhole(0.25, 0.75);
        let mut rng = rng::seeded(3);
        for _ in 0..64 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!((0.25..=0.75).contains(&ray.time));
        }
    }

    #[test]
    fn test_static_shutter_stamps_constant_time() {
        let camera = pinhole(0.0, 0.0);
        let mut rng = rng::seeded(3);
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_abs_diff_eq!(ray.time, 0.0);
    }
}
