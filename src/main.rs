//! Animset CLI - Inspect `.animset` files.

use std::path::{Path, PathBuf};

use animset::{
    Animation, AnimationSet, CodecConfig, Frame, PathMode,
    codec::{ImageTable, encode_to_writer},
    decode_with,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <file.animset> [codec.json]", args[0]);
        eprintln!();
        eprintln!("Decode an animation set and print a summary.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  file.animset  Path to the animation set file");
        eprintln!("  codec.json    Optional codec configuration");
        eprintln!();
        eprintln!("An example configuration and document are printed with --example.");
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(config_path) => CodecConfig::from_json_file(config_path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }),
        None => CodecConfig::default(),
    };

    let file_path = PathBuf::from(&args[1]);
    let directory = file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let Some(file_name) = file_path.file_name().and_then(|n| n.to_str()) else {
        eprintln!("Invalid file name: {}", file_path.display());
        std::process::exit(1);
    };

    let set = decode_with(directory, file_name, &config).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", file_path.display(), e);
        std::process::exit(1);
    });

    print_summary(&file_path, &set);
}

fn print_summary(path: &Path, set: &AnimationSet) {
    let images = ImageTable::from_set(set);

    println!("Animation set: {}", path.display());
    println!("==============");
    println!("Animations: {}", set.len());
    println!("Frames: {}", set.frame_count());
    println!("Images: {}", images.len());
    println!();

    for (name, animation) in set.iter() {
        println!(
            "  {}: {} frames, duration {:.3}",
            name,
            animation.len(),
            animation.duration()
        );
    }

    if !images.is_empty() {
        println!();
        for (id, source) in images.iter() {
            println!("  [{}] {}", id, source);
        }
    }
}

fn print_example() {
    let config = CodecConfig::with_path_mode(PathMode::Verbatim);

    let mut set = AnimationSet::new();
    set.insert(
        "idle",
        Animation::new()
            .with_frame(Frame::new("sprites/idle.png", (0.0, 0.0), (16.0, 16.0), 4.0, 60.0))
            .with_frame(Frame::new("sprites/idle.png", (8.0, 0.0), (16.0, 16.0), 4.0, 60.0)),
    );

    println!("Example configuration (codec.json):");
    println!(
        "{}",
        serde_json::to_string_pretty(&CodecConfig::default()).unwrap_or_default()
    );
    println!();
    println!("Example document (idle.animset):");

    let mut out = Vec::new();
    if let Err(e) = encode_to_writer(&set, &mut out, &config, Path::new(".")) {
        eprintln!("Error writing example: {}", e);
        std::process::exit(1);
    }
    println!("{}", String::from_utf8_lossy(&out));
}
