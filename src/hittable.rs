use std::{f32::consts::PI, ops::Range, sync::Arc};

use crate::{
    material::{Isotropic, Material},
    ray::{HitRecord, Ray},
    rng::{PixelRng, Rng},
    texture::Texture,
    vec3::{Float, Point3, Vec3},
};

/// Rejection threshold for near-parallel plane and triangle intersections.
/// The t-range check alone would let ±inf/NaN roots through on some paths.
const EPSILON: Float = 1e-6;

/// Offset past an entry hit when probing a medium boundary for its exit.
const BOUNDARY_BIAS: Float = 1e-4;

pub trait Hit {
    /// Closest intersection with `ray` inside `range`, or `None`. The
    /// generator is threaded through for primitives that sample stochastic
    /// events (participating media); solid geometry ignores it.
    fn hit(&self, ray: &Ray, range: &Range<Float>, rng: &mut PixelRng) -> Option<HitRecord<'_>>;
}

#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    AxisRect(AxisRect),
    Triangle(Triangle),
    Cuboid(Cuboid),
    ConstantMedium(ConstantMedium),
}

impl Hit for Shape {
    fn hit(&self, ray: &Ray, range: &Range<Float>, rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        match self {
            Shape::Sphere(s) => s.hit(ray, range, rng),
            Shape::AxisRect(r) => r.hit(ray, range, rng),
            Shape::Triangle(t) => t.hit(ray, range, rng),
            Shape::Cuboid(c) => c.hit(ray, range, rng),
            Shape::ConstantMedium(m) => m.hit(ray, range, rng),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<AxisRect> for Shape {
    fn from(r: AxisRect) -> Self {
        Shape::AxisRect(r)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}

impl From<Cuboid> for Shape {
    fn from(c: Cuboid) -> Self {
        Shape::Cuboid(c)
    }
}

impl From<ConstantMedium> for Shape {
    fn from(m: ConstantMedium) -> Self {
        Shape::ConstantMedium(m)
    }
}

/// The scene: a flat, insertion-ordered shape list, immutable for the whole
/// render and shared read-only across work items.
#[derive(Clone, Debug, Default)]
pub struct World {
    objects: Vec<Shape>,
}

impl World {
    pub fn build(objects: Vec<Shape>) -> Self {
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hit for World {
    /// Returns the unique minimal-t hit by scanning every object and
    /// shrinking the search range to the nearest hit found so far.
    fn hit(&self, ray: &Ray, range: &Range<Float>, rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        let mut nearest_hit_dist = range.end;
        let mut nearest_hit = None;

        for obj in &self.objects {
            if let Some(hit) = obj.hit(ray, &(range.start..nearest_hit_dist), rng) {
                nearest_hit_dist = hit.t;
                nearest_hit = Some(hit);
            }
        }

        nearest_hit
    }
}

/// Spherical (Mercator) UV of a point on the unit sphere: longitude/latitude
/// of the outward normal mapped to [0,1]².
fn mercator_uv(p: &Vec3) -> (Float, Float) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();
    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + PI / 2.0) / PI;
    (u, v)
}

#[derive(Clone, Debug)]
pub struct Sphere {
    center0: Point3,
    center1: Point3,
    time0: Float,
    time1: Float,
    radius: Float,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Point3, radius: Float, material: Arc<Material>) -> Self {
        Self {
            center0: center,
            center1: center,
            time0: 0.0,
            time1: 0.0,
            radius,
            material,
        }
    }

    /// A sphere translating linearly from `center0` to `center1` over
    /// `[time0, time1]`.
    pub fn new_moving(
        center0: Point3,
        center1: Point3,
        time0: Float,
        time1: Float,
        radius: Float,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    fn center(&self, time: Float) -> Point3 {
        if self.time0 == self.time1 {
            self.center0
        } else {
            self.center0
                + ((time - self.time0) / (self.time1 - self.time0)) * (self.center1 - self.center0)
        }
    }
}

impl Hit for Sphere {
    fn hit(&self, ray: &Ray, range: &Range<Float>, _rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        let center = self.center(ray.time);
        let oc = center - ray.origin;
        let a = ray.direction.norm_squared();
        let h = ray.direction.dot(&oc);
        let c = oc.norm_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        // Nearest root first, far root only if the near one is out of range
        let mut root = (h - sqrt_disc) / a;
        if !range.contains(&root) {
            root = (h + sqrt_disc) / a;
            if !range.contains(&root) {
                return None;
            }
        }

        let point = ray.at(root);
        let outward_normal = (point - center) / self.radius;
        let uv = mercator_uv(&outward_normal);
        Some(HitRecord::with_face_normal(
            ray,
            outward_normal,
            root,
            point,
            uv,
            &self.material,
        ))
    }
}

/// Which canonical plane an axis-aligned rectangle lives on, named by its
/// two in-plane axes in (first, second) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    /// In-plane (y, z), fixed x.
    Yz,
    /// In-plane (z, x), fixed y.
    Zx,
    /// In-plane (x, y), fixed z.
    Xy,
}

impl Plane {
    /// Permutes a vector into (first-planar, second-planar, normal) order.
    fn planar_basis(&self, v: &Vec3) -> (Float, Float, Float) {
        match self {
            Plane::Yz => (v.y, v.z, v.x),
            Plane::Zx => (v.z, v.x, v.y),
            Plane::Xy => (v.x, v.y, v.z),
        }
    }

    /// World-space unit normal of the plane.
    fn outward_normal(&self) -> Vec3 {
        match self {
            Plane::Yz => Vec3::x(),
            Plane::Zx => Vec3::y(),
            Plane::Xy => Vec3::z(),
        }
    }
}

/// An axis-aligned rectangle: in-plane bounds `[a0,a1]×[b0,b1]` on the
/// plane `normal-coordinate = k`. One implementation serves all three
/// orientations through the basis permutation.
#[derive(Clone, Debug)]
pub struct AxisRect {
    plane: Plane,
    a0: Float,
    a1: Float,
    b0: Float,
    b1: Float,
    k: Float,
    material: Arc<Material>,
}

impl AxisRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (Float, Float),
        (b0, b1): (Float, Float),
        k: Float,
        material: Arc<Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }
}

impl Hit for AxisRect {
    fn hit(&self, ray: &Ray, range: &Range<Float>, _rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        let (o_a, o_b, o_k) = self.plane.planar_basis(&ray.origin);
        let (d_a, d_b, d_k) = self.plane.planar_basis(&ray.direction);

        if d_k.abs() < EPSILON {
            return None; // parallel to the plane
        }

        let t = (self.k - o_k) / d_k;
        if !range.contains(&t) {
            return None;
        }

        let a = o_a + t * d_a;
        let b = o_b + t * d_b;
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        let uv = (
            (a - self.a0) / (self.a1 - self.a0),
            (b - self.b0) / (self.b1 - self.b0),
        );
        Some(HitRecord::with_face_normal(
            ray,
            self.plane.outward_normal(),
            t,
            ray.at(t),
            uv,
            &self.material,
        ))
    }
}

#[derive(Clone, Debug)]
pub struct Triangle {
    v0: Point3,
    v1: Point3,
    v2: Point3,
    material: Arc<Material>,
}

impl Triangle {
    pub fn new(v0: Point3, v1: Point3, v2: Point3, material: Arc<Material>) -> Self {
        Self {
            v0,
            v1,
            v2,
            material,
        }
    }
}

impl Hit for Triangle {
    /// Möller–Trumbore intersection.
    fn hit(&self, ray: &Ray, range: &Range<Float>, _rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let pvec = ray.direction.cross(&edge2);
        let det = edge1.dot(&pvec);
        if det.abs() < EPSILON {
            return None; // parallel to the triangle plane, or degenerate
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - self.v0;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&edge1);
        let v = ray.direction.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&qvec) * inv_det;
        if !range.contains(&t) {
            return None;
        }

        let outward_normal = edge1.cross(&edge2);
        Some(HitRecord::with_face_normal(
            ray,
            outward_normal,
            t,
            ray.at(t),
            (u, v),
            &self.material,
        ))
    }
}

/// An axis-aligned box, decomposed at construction into six rectangles that
/// all share the box's material. The hit test just dispatches to the sides.
#[derive(Clone, Debug)]
pub struct Cuboid {
    sides: [AxisRect; 6],
}

impl Cuboid {
    /// `min` and `max` are opposite corners with `min ≤ max` per axis.
    pub fn new(min: Point3, max: Point3, material: Arc<Material>) -> Self {
        assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "cuboid corners must satisfy min <= max per axis"
        );
        let sides = [
            AxisRect::new(Plane::Xy, (min.x, max.x), (min.y, max.y), max.z, material.clone()),
            AxisRect::new(Plane::Xy, (min.x, max.x), (min.y, max.y), min.z, material.clone()),
            AxisRect::new(Plane::Zx, (min.z, max.z), (min.x, max.x), max.y, material.clone()),
            AxisRect::new(Plane::Zx, (min.z, max.z), (min.x, max.x), min.y, material.clone()),
            AxisRect::new(Plane::Yz, (min.y, max.y), (min.z, max.z), max.x, material.clone()),
            AxisRect::new(Plane::Yz, (min.y, max.y), (min.z, max.z), min.x, material),
        ];
        Self { sides }
    }
}

impl Hit for Cuboid {
    fn hit(&self, ray: &Ray, range: &Range<Float>, rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        let mut nearest_hit_dist = range.end;
        let mut nearest_hit = None;
        for side in &self.sides {
            if let Some(hit) = side.hit(ray, &(range.start..nearest_hit_dist), rng) {
                nearest_hit_dist = hit.t;
                nearest_hit = Some(hit);
            }
        }
        nearest_hit
    }
}

/// The sub-volume a constant medium is bounded by.
#[derive(Clone, Debug)]
pub enum Boundary {
    Sphere(Sphere),
    Cuboid(Cuboid),
}

impl Hit for Boundary {
    fn hit(&self, ray: &Ray, range: &Range<Float>, rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        match self {
            Boundary::Sphere(s) => s.hit(ray, range, rng),
            Boundary::Cuboid(c) => c.hit(ray, range, rng),
        }
    }
}

impl From<Sphere> for Boundary {
    fn from(s: Sphere) -> Self {
        Boundary::Sphere(s)
    }
}

impl From<Cuboid> for Boundary {
    fn from(c: Cuboid) -> Self {
        Boundary::Cuboid(c)
    }
}

/// A homogeneous participating medium (fog, smoke): a ray crossing the
/// boundary either makes it all the way through or scatters at a
/// stochastically chosen interior point.
#[derive(Clone, Debug)]
pub struct ConstantMedium {
    boundary: Boundary,
    neg_inv_density: Float,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: Boundary, density: Float, albedo: Texture) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo).into(),
        }
    }

    pub fn new_color(boundary: Boundary, density: Float, albedo: crate::vec3::Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new_color(albedo).into(),
        }
    }
}

impl Hit for ConstantMedium {
    fn hit(&self, ray: &Ray, range: &Range<Float>, rng: &mut PixelRng) -> Option<HitRecord<'_>> {
        // Entry over the full ray span, exit just past the entry point
        let full_span = -Float::INFINITY..Float::INFINITY;
        let rec1 = self.boundary.hit(ray, &full_span, rng)?;
        let rec2 = self
            .boundary
            .hit(ray, &(rec1.t + BOUNDARY_BIAS..Float::INFINITY), rng)?;

        let mut t_enter = rec1.t.max(range.start);
        let t_exit = rec2.t.min(range.end);
        if t_enter >= t_exit {
            return None;
        }
        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction.norm();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * rng.gen::<Float>().ln();

        // Lower density makes the sampled distance more likely to exceed the
        // boundary span, letting the ray through untouched
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            point: ray.at(t),
            // The scattering event is interior to a homogeneous medium:
            // direction-independent, so the normal is an arbitrary placeholder
            normal: Vec3::x(),
            t,
            u: 0.0,
            v: 0.0,
            front_face: true,
            material: &self.phase_function,
        })
    }
}
