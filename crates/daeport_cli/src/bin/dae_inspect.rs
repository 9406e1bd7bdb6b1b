// Import a COLLADA file and print what ended up in the scene.
// Run with: cargo run --release --bin dae_inspect -- <path_to.dae> [--options import.json] [--json]

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use daeport_core::{ColladaDocument, ColladaImporter, DiskImageLoader, ImportOptions, ImportReport, SceneData};
use daeport_math::Vec3;
use serde::Serialize;

struct Args {
    path: PathBuf,
    options: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut path = None;
    let mut options = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--options" => {
                let value = args.next().context("--options needs a file path")?;
                options = Some(PathBuf::from(value));
            }
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => bail!("Unexpected argument: {}", arg),
        }
    }

    let Some(path) = path else {
        bail!("Usage: dae_inspect <path_to.dae> [--options import.json] [--json]");
    };
    Ok(Args { path, options, json })
}

fn load_options(path: Option<&PathBuf>) -> Result<ImportOptions> {
    let Some(path) = path else {
        return Ok(ImportOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid options file {}", path.display()))
}

#[derive(Serialize)]
struct Summary {
    report: ImportReport,
    meshes: Vec<MeshSummary>,
    materials: Vec<MaterialSummary>,
    objects: Vec<ObjectSummary>,
}

#[derive(Serialize)]
struct MeshSummary {
    name: String,
    vertices: usize,
    faces: usize,
    smooth_faces: usize,
    has_uvs: bool,
}

#[derive(Serialize)]
struct MaterialSummary {
    name: String,
    diffuse_color: [f32; 3],
    texture: Option<String>,
}

#[derive(Serialize)]
struct ObjectSummary {
    name: String,
    mesh: String,
    material: Option<String>,
    position: [f32; 3],
}

fn summarize(scene: &SceneData, report: ImportReport) -> Summary {
    let meshes = scene
        .meshes()
        .into_iter()
        .map(|mesh| MeshSummary {
            name: mesh.name.clone(),
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            smooth_faces: (0..mesh.face_count()).filter(|&f| mesh.is_smooth(f)).count(),
            has_uvs: mesh.has_uvs(),
        })
        .collect();

    let materials = scene
        .materials()
        .into_iter()
        .map(|material| MaterialSummary {
            name: material.name.clone(),
            diffuse_color: material.diffuse_color.to_array(),
            texture: material.diffuse_image().map(|image| image.path.clone()),
        })
        .collect();

    let objects = scene
        .objects()
        .iter()
        .map(|object| ObjectSummary {
            name: object.name.clone(),
            mesh: object.mesh.name.clone(),
            material: object.active_material().map(|m| m.name.clone()),
            position: object.matrix_world.transform_point3(Vec3::ZERO).to_array(),
        })
        .collect();

    Summary {
        report,
        meshes,
        materials,
        objects,
    }
}

fn print_text(summary: &Summary, scene: &SceneData) {
    let report = &summary.report;
    println!("\n=== Import ===");
    println!("Geometry nodes: {}", report.geometry_nodes);
    println!(
        "Meshes: {} created, {} reused",
        report.meshes_created, report.meshes_reused
    );
    println!(
        "Materials: {} created, {} reused",
        report.materials_created, report.materials_reused
    );
    println!("Objects: {}", report.objects_linked);
    println!("Skipped primitives: {}", report.primitives_skipped);
    println!("Missing textures: {}", report.missing_textures);

    println!("\n--- Meshes ---");
    for mesh in &summary.meshes {
        println!(
            "  {} - {} vertices, {} faces ({} smooth), uvs: {}",
            mesh.name, mesh.vertices, mesh.faces, mesh.smooth_faces, mesh.has_uvs
        );
    }

    println!("\n--- Materials ---");
    for material in &summary.materials {
        let [r, g, b] = material.diffuse_color;
        match &material.texture {
            Some(texture) => println!("  {} - texture {}", material.name, texture),
            None => println!("  {} - diffuse ({:.3}, {:.3}, {:.3})", material.name, r, g, b),
        }
    }

    println!("\n--- Objects ---");
    for object in &summary.objects {
        let [x, y, z] = object.position;
        println!(
            "  {} -> {} [{}] at ({:.2}, {:.2}, {:.2})",
            object.name,
            object.mesh,
            object.material.as_deref().unwrap_or("no material"),
            x,
            y,
            z
        );
    }

    let bounds = scene.world_bounds();
    if !bounds.is_empty() {
        println!("\n--- World Bounds ---");
        println!(
            "  Min: ({:.2}, {:.2}, {:.2})",
            bounds.x.min, bounds.y.min, bounds.z.min
        );
        println!(
            "  Max: ({:.2}, {:.2}, {:.2})",
            bounds.x.max, bounds.y.max, bounds.z.max
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = parse_args()?;
    let options = load_options(args.options.as_ref())?;

    log::info!("Loading COLLADA: {}", args.path.display());
    let document = ColladaDocument::open(&args.path)
        .with_context(|| format!("Failed to parse {}", args.path.display()))?;

    let mut scene = SceneData::new();
    let report = ColladaImporter::with_options(&mut scene, DiskImageLoader::new(), options)
        .import_document(&document)
        .with_context(|| format!("Failed to import {}", args.path.display()))?;

    let summary = summarize(&scene, report);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&summary, &scene);
    }

    Ok(())
}
