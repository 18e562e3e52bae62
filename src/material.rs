use crate::{
    ray::{HitRecord, Ray},
    rng::{PixelRng, Rng},
    texture::{SolidColor, Texture, TextureValue},
    vec3::{Color, Float, Vec3, Vec3Ext},
};
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub trait Scatter {
    /// On a scattering event, returns the per-bounce attenuation and the
    /// continuation ray. `None` means the path is absorbed here.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut PixelRng) -> Option<(Color, Ray)>;

    /// Radiance added by the surface itself, independent of attenuation.
    fn emitted(&self, rec: &HitRecord) -> Color;
}

#[enum_dispatch(Scatter)]
#[derive(Clone, Debug)]
pub enum Material {
    Lambertian,
    Metal,
    Dielectric,
    Lightsource,
    Isotropic,
}

/// Mirror `v` about the surface normal `n`.
fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Bend the unit vector `uv` through an interface with the given ratio of
/// refractive indices, following Snell's law.
fn refract(uv: &Vec3, n: &Vec3, etai_over_etat: Float) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.norm_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance at a given angle.
fn reflectance(cosine: Float, refractive_index: Float) -> Float {
    let r0 = (1.0 - refractive_index) / (1.0 + refractive_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[derive(Clone, Debug)]
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    pub fn new(albedo: Texture) -> Self {
        Self { albedo }
    }

    pub fn new_rgb(r: Float, g: Float, b: Float) -> Self {
        Self {
            albedo: SolidColor::new_rgb(r, g, b).into(),
        }
    }
}

impl Scatter for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut PixelRng) -> Option<(Color, Ray)> {
        let mut scatter_dir = rec.normal + Vec3::random_unit(rng);
        if scatter_dir.near_zero() {
            scatter_dir = rec.normal;
        }
        let scattered = Ray::new(rec.point, scatter_dir, ray_in.time);
        Some((self.albedo.value(rec.u, rec.v, &rec.point), scattered))
    }

    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::zeros()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Metal {
    albedo: Color,
    fuzz: Float,
}

impl Metal {
    pub fn new(albedo: Color, fuzz: Float) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Scatter for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut PixelRng) -> Option<(Color, Ray)> {
        let reflected = reflect(&ray_in.direction.normalize(), &rec.normal);
        let direction = reflected + self.fuzz * Vec3::random_in_unit_ball(rng);
        // A perturbed reflection pointing into the surface is absorbed
        if direction.dot(&rec.normal) > 0.0 {
            Some((self.albedo, Ray::new(rec.point, direction, ray_in.time)))
        } else {
            None
        }
    }

    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::zeros()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// refractive index over the refractive index of the enclosing media
    refractive_index: Float,
    /// Transmission tint applied to everything passing through.
    tint: Color,
}

impl Dielectric {
    pub fn new(refractive_index: Float, tint: Color) -> Self {
        Self {
            refractive_index,
            tint,
        }
    }
}

impl Scatter for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut PixelRng) -> Option<(Color, Ray)> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refractive_index
        } else {
            self.refractive_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(&rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction = if cannot_refract
            || reflectance(cos_theta, refraction_ratio) > rng.gen::<Float>()
        {
            reflect(&unit_direction, &rec.normal)
        } else {
            refract(&unit_direction, &rec.normal, refraction_ratio)
        };

        Some((self.tint, Ray::new(rec.point, direction, ray_in.time)))
    }

    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::zeros()
    }
}

/// Emits its texture sample and never scatters, terminating the path.
#[derive(Clone, Debug)]
pub struct Lightsource {
    emit: Texture,
}

impl Lightsource {
    pub fn new(emit: Texture) -> Self {
        Self { emit }
    }

    pub fn new_color(color: Color) -> Self {
        Self {
            emit: SolidColor::new(color).into(),
        }
    }
}

impl Scatter for Lightsource {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut PixelRng) -> Option<(Color, Ray)> {
        None
    }

    fn emitted(&self, rec: &HitRecord) -> Color {
        self.emit.value(rec.u, rec.v, &rec.point)
    }
}

/// Phase function of a participating medium: scatters uniformly into the
/// unit ball, with no preferred direction.
#[derive(Clone, Debug)]
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: Texture) -> Self {
        Self { albedo }
    }

    pub fn new_color(color: Color) -> Self {
        Self {
            albedo: SolidColor::new(color).into(),
        }
    }
}

impl Scatter for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut PixelRng) -> Option<(Color, Ray)> {
        let scattered = Ray::new(rec.point, Vec3::random_in_unit_ball(rng), ray_in.time);
        Some((self.albedo.value(rec.u, rec.v, &rec.point), scattered))
    }

    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::zeros()
    }
}
