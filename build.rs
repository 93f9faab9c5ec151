use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Set to a directory to also get a copy of the header there (e.g. for Xcode)
const HEADER_DIR_ENV: &str = "PITCHSHIFT_HEADER_DIR";
const HEADER_NAME: &str = "pitchshift.h";

fn main() {
    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-env-changed={}", HEADER_DIR_ENV);

    let Ok(crate_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set; C header not generated");
        return;
    };
    let Ok(out_dir) = env::var("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set; C header not generated");
        return;
    };

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("PITCHSHIFT_H")
        .with_parse_deps(false)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=C header not generated: {}", err);
            return;
        }
    };

    write_header(&bindings, &PathBuf::from(out_dir).join(HEADER_NAME));
    if let Ok(dir) = env::var(HEADER_DIR_ENV) {
        write_header(&bindings, &PathBuf::from(dir).join(HEADER_NAME));
    }
}

fn write_header(bindings: &cbindgen::Bindings, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            println!("cargo:warning=cannot create {}: {}", parent.display(), err);
            return;
        }
    }
    // write_to_file returns whether the file changed, not whether it succeeded
    bindings.write_to_file(path);
    if !path.exists() {
        println!("cargo:warning=C header not written to {}", path.display());
    }
}
