//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use ember_math::Vec3;
use ember_renderer::{
    Camera, CheckerTexture, ConstantMedium, Cuboid, Dielectric, DiffuseLight, FlipNormals,
    Hittable, ImageTexture, Lambertian, Material, Metal, MovingSphere, NoiseTexture, Rect,
    RotateY, Scene, SolidColor, Sphere, Texture, Translate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Which demo scene to render.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Cornell box with a glass sphere and a rotated block
    Cornell,
    /// Field of small random spheres with motion blur
    Spheres,
    /// Cornell box with two blocks of smoke
    Smoke,
    /// Marble spheres lit by a glowing sphere and a rectangle
    Noise,
    /// Image-mapped globe; needs `--texture`
    Earth,
}

/// A scene plus the camera and background that go with it.
pub struct DemoScene {
    pub scene: Scene,
    pub camera: Camera,
    pub use_sky_gradient: bool,
}

/// Shutter interval used by every demo.
const SHUTTER: (f32, f32) = (0.0, 1.0);

/// Build `kind` at the given resolution.
///
/// `texture` is the image wrapped around the globe in [`SceneKind::Earth`];
/// the other scenes ignore it.
pub fn build(
    kind: SceneKind,
    width: u32,
    height: u32,
    seed: u64,
    texture: Option<&Path>,
) -> Result<DemoScene> {
    let demo = match kind {
        SceneKind::Cornell => cornell(width, height),
        SceneKind::Spheres => spheres(width, height, seed),
        SceneKind::Smoke => smoke(width, height),
        SceneKind::Noise => noise(width, height, seed),
        SceneKind::Earth => earth(width, height, texture),
    };
    demo.with_context(|| format!("Failed to build {kind:?} scene"))
}

fn solid(r: f32, g: f32, b: f32) -> Arc<dyn Material> {
    Arc::new(Lambertian::solid(Vec3::new(r, g, b)))
}

fn cornell_camera(width: u32, height: u32) -> Camera {
    let look_from = Vec3::new(278.0, 278.0, -800.0);
    let look_at = Vec3::new(278.0, 278.0, 0.0);
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(40.0, 0.0, (look_from - look_at).length())
        .with_shutter(SHUTTER.0, SHUTTER.1);
    camera.initialize();
    camera
}

/// The five walls and the ceiling light of a 555-unit Cornell box.
///
/// Returns the objects and the light, which is also among the objects.
fn cornell_room() -> (Vec<Arc<dyn Hittable>>, Arc<dyn Hittable>) {
    let red = solid(0.65, 0.05, 0.05);
    let white = solid(0.73, 0.73, 0.73);
    let green = solid(0.12, 0.45, 0.15);
    let light_material: Arc<dyn Material> = Arc::new(DiffuseLight::solid(Vec3::splat(15.0)));

    let light: Arc<dyn Hittable> = Arc::new(FlipNormals::new(Arc::new(Rect::xz(
        213.0,
        343.0,
        227.0,
        332.0,
        554.0,
        light_material,
    ))));

    let objects: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(FlipNormals::new(Arc::new(Rect::yz(
            0.0, 555.0, 0.0, 555.0, 555.0, green,
        )))),
        Arc::new(Rect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)),
        light.clone(),
        Arc::new(FlipNormals::new(Arc::new(Rect::xz(
            0.0,
            555.0,
            0.0,
            555.0,
            555.0,
            white.clone(),
        )))),
        Arc::new(Rect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())),
        Arc::new(FlipNormals::new(Arc::new(Rect::xy(
            0.0, 555.0, 0.0, 555.0, 555.0, white,
        )))),
    ];

    (objects, light)
}

fn block(size: Vec3, angle: f32, offset: Vec3, material: Arc<dyn Material>) -> Arc<dyn Hittable> {
    let cuboid: Arc<dyn Hittable> = Arc::new(Cuboid::new(Vec3::ZERO, size, material));
    let rotated: Arc<dyn Hittable> = Arc::new(RotateY::new(cuboid, angle));
    Arc::new(Translate::new(rotated, offset))
}

fn cornell(width: u32, height: u32) -> Result<DemoScene> {
    let (mut objects, light) = cornell_room();
    let white = solid(0.73, 0.73, 0.73);

    objects.push(block(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white,
    ));

    let glass: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    objects.push(glass.clone());

    let scene = Scene::build(objects, vec![light, glass], SHUTTER.0, SHUTTER.1)?;
    Ok(DemoScene {
        scene,
        camera: cornell_camera(width, height),
        use_sky_gradient: false,
    })
}

fn smoke(width: u32, height: u32) -> Result<DemoScene> {
    let (mut objects, light) = cornell_room();
    let white = solid(0.73, 0.73, 0.73);

    let tall = block(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white.clone(),
    );
    let short = block(
        Vec3::new(165.0, 165.0, 165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    );

    objects.push(Arc::new(ConstantMedium::new(
        tall,
        0.01,
        Arc::new(SolidColor::new(Vec3::ZERO)),
    )));
    objects.push(Arc::new(ConstantMedium::new(
        short,
        0.01,
        Arc::new(SolidColor::new(Vec3::ONE)),
    )));

    let scene = Scene::build(objects, vec![light], SHUTTER.0, SHUTTER.1)?;
    Ok(DemoScene {
        scene,
        camera: cornell_camera(width, height),
        use_sky_gradient: false,
    })
}

fn spheres(width: u32, height: u32, seed: u64) -> Result<DemoScene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        10.0,
        Vec3::new(0.9, 0.9, 0.9),
        Vec3::new(0.2, 0.3, 0.1),
    ));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(checker)),
    )));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    for a in -10..10 {
        for b in -10..10 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Vec3::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                let moved = center + Vec3::new(0.0, 0.3 * rng.gen::<f32>(), 0.0);
                objects.push(Arc::new(MovingSphere::new(
                    center,
                    moved,
                    SHUTTER.0,
                    SHUTTER.1,
                    0.2,
                    Arc::new(Lambertian::new(Arc::new(SolidColor::new(albedo)))),
                )));
            } else if choose_mat < 0.95 {
                let albedo = 0.5 * (Vec3::ONE + Vec3::new(rng.gen(), rng.gen(), rng.gen()));
                let fuzz = 0.5 * rng.gen::<f32>();
                objects.push(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                objects.push(Arc::new(Sphere::new(center, 0.2, glass.clone())));
            }
        }
    }

    // Hollow glass ball: an inward-facing inner shell makes the air gap.
    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass.clone())));
    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), -0.95, glass)));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        solid(0.4, 0.2, 0.1),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Vec3::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_shutter(SHUTTER.0, SHUTTER.1);
    camera.initialize();

    let scene = Scene::build(objects, vec![], SHUTTER.0, SHUTTER.1)?;
    Ok(DemoScene {
        scene,
        camera,
        use_sky_gradient: true,
    })
}

fn outdoor_camera(width: u32, height: u32, look_from: Vec3, vfov: f32) -> Camera {
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_position(look_from, Vec3::ZERO, Vec3::Y)
        .with_lens(vfov, 0.0, look_from.length())
        .with_shutter(SHUTTER.0, SHUTTER.1);
    camera.initialize();
    camera
}

fn noise(width: u32, height: u32, seed: u64) -> Result<DemoScene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let marble: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0, &mut rng));
    let glow: Arc<dyn Material> = Arc::new(DiffuseLight::solid(Vec3::splat(4.0)));

    let lamp: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, glow.clone()));
    let panel: Arc<dyn Hittable> = Arc::new(Rect::xy(3.0, 5.0, 1.0, 3.0, -2.0, glow));

    let objects: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Lambertian::new(marble.clone())),
        )),
        Arc::new(Sphere::new(
            Vec3::new(0.0, 2.0, 0.0),
            2.0,
            Arc::new(Lambertian::new(marble)),
        )),
        lamp.clone(),
        panel.clone(),
    ];

    let scene = Scene::build(objects, vec![lamp, panel], SHUTTER.0, SHUTTER.1)?;
    Ok(DemoScene {
        scene,
        camera: outdoor_camera(width, height, Vec3::new(13.0, 2.0, 3.0), 20.0),
        use_sky_gradient: false,
    })
}

fn earth(width: u32, height: u32, texture: Option<&Path>) -> Result<DemoScene> {
    let path = texture.ok_or_else(|| anyhow!("The earth scene needs --texture <path>"))?;
    let map = ImageTexture::load(path)
        .with_context(|| format!("Failed to load texture {}", path.display()))?;
    log::debug!("Loaded globe texture from {}", path.display());

    let globe: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::ZERO,
        2.0,
        Arc::new(Lambertian::new(Arc::new(map))),
    ));

    let scene = Scene::build(vec![globe], vec![], SHUTTER.0, SHUTTER.1)?;
    Ok(DemoScene {
        scene,
        camera: outdoor_camera(width, height, Vec3::new(0.0, 0.0, 3.0), 90.0),
        use_sky_gradient: true,
    })
}
