//! OBJ inspection tool
//!
//! Loads a Wavefront OBJ file (and its material library) and prints a
//! summary of the parsed scene, or the whole scene as RON.
//!
//! Usage: obj_inspect model.obj [--config loader.toml] [--dump]

use std::env;
use std::process;

use wavefront_scene::foundation::logging;
use wavefront_scene::prelude::*;

struct Options {
    obj_path: String,
    config_path: Option<String>,
    dump: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut obj_path = None;
    let mut config_path = None;
    let mut dump = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dump" => dump = true,
            "--config" => {
                let path = iter.next().ok_or("--config requires a file path")?;
                config_path = Some(path.clone());
            }
            other if other.starts_with("--") => return Err(format!("Unknown option: {other}")),
            other => {
                if obj_path.replace(other.to_string()).is_some() {
                    return Err("Only one OBJ file may be given".to_string());
                }
            }
        }
    }

    let obj_path = obj_path.ok_or("Missing OBJ file path")?;
    Ok(Options { obj_path, config_path, dump })
}

fn print_summary(scene: &Scene) {
    println!("Positions:       {}", scene.positions.len());
    println!("Texture coords:  {}", scene.texture_coords.len());
    println!("Normals:         {}", scene.normals.len());
    println!("Faces:           {}", scene.faces.len());
    println!("Materials:       {}", scene.materials.len());

    for material in &scene.materials {
        let face_count = scene.face_materials.iter().filter(|name| **name == material.name).count();
        println!(
            "  {:<20} Kd {:?}  Ns {}  d {}  ({} faces)",
            material.name, material.diffuse, material.shininess, material.dissolve, face_count
        );
    }

    let untagged = scene.face_materials.iter().filter(|name| name.is_empty()).count();
    if untagged > 0 {
        println!("  {untagged} face(s) without material");
    }

    if scene.has_warnings() {
        println!("Warnings:        {}", scene.warnings.len());
        for warning in &scene.warnings {
            println!("  {warning}");
        }
    }
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &options.config_path {
        Some(path) => {
            log::info!("Using loader config {path}");
            LoaderConfig::load_from_file(path)?
        }
        None => LoaderConfig::default(),
    };

    let scene = ObjParser::with_config(config).load(&options.obj_path)?;

    if options.dump {
        println!("{}", ron::ser::to_string_pretty(&scene, ron::ser::PrettyConfig::default())?);
    } else {
        println!("Scene: {}", options.obj_path);
        print_summary(&scene);
    }
    Ok(())
}

fn main() {
    logging::init_with_level(log::LevelFilter::Info);

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Usage: obj_inspect model.obj [--config loader.toml] [--dump]");
            process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        log::error!("Failed to inspect {}: {}", options.obj_path, e);
        process::exit(1);
    }
}
