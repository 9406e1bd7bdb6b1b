//! Example: Import a COLLADA file and inspect the scene.
//!
//! Run with: cargo run --example import_dae -- assets/robot.dae

use std::env;

use daeport_core::{import_dae, SceneData};
use daeport_math::Vec3;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: import_dae <path-to-dae-file>");
        println!("\nExample:");
        println!("  cargo run --example import_dae -- assets/robot.dae");
        return;
    }

    let path = &args[1];
    println!("Importing COLLADA file: {}", path);

    let mut scene = SceneData::new();
    match import_dae(path, &mut scene) {
        Ok(report) => {
            println!("\n=== Import ===");
            println!("Meshes: {}", scene.mesh_count());
            println!("Materials: {}", scene.material_count());
            println!("Objects: {}", scene.object_count());
            println!("Total faces: {}", scene.total_face_count());
            println!("Skipped primitives: {}", report.primitives_skipped);

            println!("\n--- Meshes ---");
            for mesh in scene.meshes() {
                println!(
                    "  {} - {} vertices, {} faces",
                    mesh.name,
                    mesh.vertex_count(),
                    mesh.face_count()
                );
                println!(
                    "       Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                    mesh.bounds.x.min,
                    mesh.bounds.y.min,
                    mesh.bounds.z.min,
                    mesh.bounds.x.max,
                    mesh.bounds.y.max,
                    mesh.bounds.z.max
                );
                println!("       Has UVs: {}", mesh.has_uvs());
            }

            println!("\n--- Objects ---");
            for object in scene.objects() {
                let pos = object.matrix_world.transform_point3(Vec3::ZERO);
                println!(
                    "  {} at ({:.2}, {:.2}, {:.2})",
                    object.name, pos.x, pos.y, pos.z
                );
            }
        }
        Err(e) => {
            eprintln!("Error importing COLLADA file: {}", e);
        }
    }
}
