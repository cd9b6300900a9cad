//! Slice a small scene and print the projected contours.
//!
//! Run with: cargo run -p heatslice --example sphere_section

use heatslice::{
    cuboid, uv_sphere, ActorKind, LogReporter, MeshSlicer, PlaneBasis, Point3, Reporter, Scene,
    SliceSettings, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("Sphere Section Test\n");

    let mut scene = Scene::new();
    scene.add(
        "shell",
        "brain",
        ActorKind::SurfaceMesh(uv_sphere(Point3::origin(), 10.0, 64, 33)),
    )?;
    let mut lobes = cuboid(Point3::new(-6.0, -3.0, -2.0), Point3::new(-2.0, 3.0, 2.0));
    lobes.merge(&cuboid(Point3::new(2.0, -3.0, -2.0), Point3::new(6.0, 3.0, 2.0)));
    scene.add("lobes", "region", ActorKind::SurfaceMesh(lobes))?;
    scene.add("caption", "text", ActorKind::TextOverlay("axial".into()))?;

    let reporter = LogReporter;
    reporter.scene(&scene);

    let settings = SliceSettings::from_toml_str("weld_tolerance = 1e-5")?;
    let slicer = MeshSlicer::new(settings)?;

    for (label, normal) in [
        ("Axial", Vec3::z()),
        ("Coronal", Vec3::y()),
        ("Oblique", Vec3::new(1.0, 1.0, 1.0)),
    ] {
        println!("\n--- {label} section through the origin ---");
        let plane = PlaneBasis::from_normal(Point3::origin(), normal)?;
        println!("u = {:?}, v = {:?}", plane.u().as_ref(), plane.v().as_ref());

        let output = slicer.try_slice_and_project(&plane, &scene.surfaces())?;
        reporter.slice(&output);

        for piece in output.pieces() {
            let (min_x, max_x) = piece
                .points
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p.x), hi.max(p.x))
                });
            println!(
                "  {}: {} points, closed={}, x in [{:.3}, {:.3}]",
                piece.key,
                piece.points.len(),
                piece.closed,
                min_x,
                max_x
            );
        }

        if let Some(bounds) = scene.bounds() {
            let quad = plane.to_bounding_quad(&bounds);
            println!("  display quad side: {:.3}", quad.side);
        }
    }

    let plane = PlaneBasis::from_normal(Point3::origin(), Vec3::z())?;
    let output = slicer.slice_and_project(&plane, &scene.surfaces());
    println!("\n{}", serde_json::to_string_pretty(&output.to_json())?);

    Ok(())
}
