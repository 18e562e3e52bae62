use crate::{
    material::Material,
    vec3::{Float, Point3, Vec3},
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
    /// Shutter time this ray samples. Set once when the primary ray is
    /// generated and carried unchanged through every bounce of the path.
    pub time: Float,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3, time: Float) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    pub fn at(&self, t: Float) -> Point3 {
        self.origin + self.direction * t
    }
}

/// One ray-primitive intersection, borrowing the hit material from the scene.
#[derive(Clone, Debug)]
pub struct HitRecord<'m> {
    pub point: Point3,
    pub normal: Vec3,
    pub t: Float,
    pub u: Float,
    pub v: Float,
    pub front_face: bool,
    pub material: &'m Material,
}

impl<'m> HitRecord<'m> {
    /// Builds a record with `front_face` and the shading normal resolved
    /// together: the stored normal always points against the incoming ray.
    pub fn with_face_normal(
        ray: &Ray,
        outward_normal: Vec3,
        t: Float,
        point: Point3,
        (u, v): (Float, Float),
        material: &'m Material,
    ) -> Self {
        let front_face = ray.direction.dot(&outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };
        HitRecord {
            point,
            normal,
            t,
            u,
            v,
            front_face,
            material,
        }
    }
}
