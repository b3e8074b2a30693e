use hjsx_transformer::{transform_source, TransformOptions};
use std::fs;

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: emit_hyperscript <file.jsx> [--map]");
    let show_map = std::env::args().any(|arg| arg == "--map");
    let source = fs::read_to_string(&path).expect("Failed to read file");

    let options = TransformOptions {
        filename: Some(path.clone()),
        ..Default::default()
    };
    match transform_source(&source, &options) {
        Ok(result) => {
            println!("{}", result.code);
            if show_map {
                for mapping in result.source_map.mappings() {
                    println!(
                        "{:?} <- {:?}{}",
                        mapping.generated.range(),
                        mapping.original.range(),
                        if mapping.verbatim { "" } else { " (derived)" }
                    );
                }
            }
        }
        Err(error) => {
            eprintln!("{}: {}", path, error);
            std::process::exit(1);
        }
    }
}
