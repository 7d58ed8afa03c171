//! Built-in scene presets.
//!
//! Each preset returns the world together with a camera framed for it.

use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;
use lumen_renderer::{
    gen_f64, gen_range, make_box, Background, BvhNode, Camera, Color, Dielectric, DiffuseLight, HittableList,
    Lambertian, Material, Metal, Point3, Quad, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// Random field of small spheres around three large ones
    Spheres,
    /// Five colored quads
    Quads,
    /// Fuzzy mirror walls around a cube with a glowing top
    Mirrors,
    /// Quad Cornell box with two blocks
    Cornell,
}

/// Build the world and camera for a preset.
///
/// `seed` drives the random parts of the scene layout.
pub fn build(scene: Scene, seed: u64) -> Result<(HittableList, Camera)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (world, camera) = match scene {
        Scene::Spheres => spheres(&mut rng)?,
        Scene::Quads => quads(),
        Scene::Mirrors => mirrors(&mut rng),
        Scene::Cornell => cornell(),
    };
    log::debug!("Built {:?} scene with {} top-level objects", scene, world.len());
    Ok((world, camera.with_seed(seed)))
}

fn random_color(rng: &mut dyn RngCore, min: f64, max: f64) -> Color {
    Color::new(gen_range(rng, min, max), gen_range(rng, min, max), gen_range(rng, min, max))
}

fn spheres(rng: &mut dyn RngCore) -> Result<(HittableList, Camera)> {
    let mut world = HittableList::new();

    let ground_material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground_material)));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(rng);
            let center = Point3::new(a as f64 + 0.9 * gen_f64(rng), 0.2, b as f64 + 0.9 * gen_f64(rng));

            // Keep clear of the large metal sphere
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere_material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                Arc::new(Dielectric::new(1.5))
            };
            world.add(Arc::new(Sphere::new(center, 0.2, sphere_material)));
        }
    }

    let material1: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, material1)));

    let material2: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)));
    world.add(Arc::new(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, material2)));

    let material3: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    world.add(Arc::new(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, material3)));

    let world = HittableList::from_object(Arc::new(BvhNode::from_list(&world)?));

    let camera = Camera::new()
        .with_resolution(1200, 16.0 / 9.0)
        .with_quality(10, 50)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Background::sky());

    Ok((world, camera))
}

/// The five walls shared by the quad presets: left, back, right, top, bottom.
fn walls(materials: [Arc<dyn Material>; 5]) -> HittableList {
    let [left, back, right, upper, lower] = materials;
    let mut world = HittableList::new();

    world.add(Arc::new(Quad::new(Point3::new(-3.0, -2.0, 5.0), Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 4.0, 0.0), left)));
    world.add(Arc::new(Quad::new(Point3::new(-2.0, -2.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), back)));
    world.add(Arc::new(Quad::new(Point3::new(3.0, -2.0, 1.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), right)));
    world.add(Arc::new(Quad::new(Point3::new(-2.0, 3.0, 1.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), upper)));
    world.add(Arc::new(Quad::new(Point3::new(-2.0, -3.0, 5.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -4.0), lower)));

    world
}

fn quads() -> (HittableList, Camera) {
    let world = walls([
        Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2))),
        Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2))),
        Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0))),
        Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0))),
        Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8))),
    ]);

    let camera = Camera::new()
        .with_resolution(400, 1.0)
        .with_quality(100, 50)
        .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
        .with_background(Color::new(0.70, 0.80, 1.00));

    (world, camera)
}

/// Half the edge length of the cube inside the mirror box.
const INNER_HALF_SIZE: f64 = 2.0 / 3.0;

fn mirrors(rng: &mut dyn RngCore) -> (HittableList, Camera) {
    let albedo = Color::new(0.8, 0.8, 0.8);
    let fuzz = gen_range(rng, 0.0, 0.5);
    let mirror: Arc<dyn Material> = Arc::new(Metal::new(albedo, fuzz));
    let mut world = walls([mirror.clone(), mirror.clone(), mirror.clone(), mirror.clone(), mirror]);

    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.3)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(4.0, 4.0, 4.0)));

    // Red cube with a glowing lid, nudged toward the camera
    let center = Point3::new(0.0, 0.0, 3.0);
    let s = INNER_HALF_SIZE;
    let cube = make_box(center - Vec3::splat(s), center + Vec3::splat(s), red);
    let top = center + Vec3::new(0.0, s, 0.0);

    for (index, face) in cube.objects().iter().enumerate() {
        // make_box orders faces front, right, back, left, top, bottom
        if index != 4 {
            world.add(face.clone());
        }
    }
    world.add(Arc::new(Quad::new(
        Point3::new(top.x - s, top.y, top.z - s),
        Vec3::new(2.0 * s, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0 * s),
        light,
    )));

    let camera = Camera::new()
        .with_resolution(400, 1.0)
        .with_quality(100, 50)
        .with_position(Point3::new(5.0, 5.0, 5.0), Point3::new(s, 0.0, s), Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
        .with_background(Color::new(0.70, 0.80, 1.00));

    (world, camera)
}

fn cornell() -> (HittableList, Camera) {
    let mut world = HittableList::new();

    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(15.0, 15.0, 15.0)));

    world.add(Arc::new(Quad::new(Point3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), green)));
    world.add(Arc::new(Quad::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), red)));
    world.add(Arc::new(Quad::new(Point3::new(343.0, 554.0, 332.0), Vec3::new(-130.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -105.0), light)));
    world.add(Arc::new(Quad::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone())));
    world.add(Arc::new(Quad::new(Point3::new(555.0, 555.0, 555.0), Vec3::new(-555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -555.0), white.clone())));
    world.add(Arc::new(Quad::new(Point3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), white.clone())));

    world.add(Arc::new(make_box(Point3::new(130.0, 0.0, 65.0), Point3::new(295.0, 165.0, 230.0), white.clone())));
    world.add(Arc::new(make_box(Point3::new(265.0, 0.0, 295.0), Point3::new(430.0, 330.0, 460.0), white)));

    let camera = Camera::new()
        .with_resolution(600, 1.0)
        .with_quality(200, 50)
        .with_position(Point3::new(278.0, 278.0, -800.0), Point3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO);

    (world, camera)
}
