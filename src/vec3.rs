use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

pub type Float = f32;

/// x: red, right
///
/// y: green, up
///
/// z: blue, forward
pub type Vec3 = nalgebra::Vector3<Float>;
pub type Point3 = Vec3;
pub type Color = Vec3;

pub trait Vec3Ext {
    fn near_zero(&self) -> bool;
    fn random<R: Rng + ?Sized>(rng: &mut R, min: Float, max: Float) -> Self;
    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn random_in_unit_ball<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn random_in_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl Vec3Ext for Vec3 {
    fn near_zero(&self) -> bool {
        // Based on https://docs.rs/almost/latest/almost/
        // Which defaults to Float::EPSILON.sqrt() as a comparison
        // to determine if a number is "almost" zero
        let e = Float::EPSILON.sqrt();
        self.x.abs() < e && self.y.abs() < e && self.z.abs() < e
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, min: Float, max: Float) -> Self {
        let range = Uniform::from(min..=max);
        Vec3::new(range.sample(rng), range.sample(rng), range.sample(rng))
    }

    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::random_in_unit_ball(rng).normalize()
    }

    fn random_in_unit_ball<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let v = Self::random(rng, -1.0, 1.0);
            if v.norm_squared() < 1.0 {
                return v;
            }
        }
    }

    /// Returns a random point in the x-y unit disk
    fn random_in_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let v = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
            if v.norm_squared() < 1.0 {
                return v;
            }
        }
    }
}
