use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-changed=src/models.rs");

    if env::var_os("CARGO_FEATURE_FFI").is_none() {
        return;
    }

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("DML_COMMON_H".to_string()),
        ..Default::default()
    };

    match cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            let header = out_dir.join("dml_common.h");
            if !bindings.write_to_file(&header) {
                println!("cargo:warning=Unable to write C header to {}", header.display());
            }
        }
        Err(e) => println!("cargo:warning=Unable to generate C header: {}", e),
    }
}
