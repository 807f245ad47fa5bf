//! Generate the C header for the FFI surface.

use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let out = PathBuf::from(&crate_dir).join("include").join("tasklist.h");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TASKLIST_H")
        .generate()
    {
        Ok(bindings) => {
            if let Some(dir) = out.parent() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    println!("cargo:warning=could not create {}: {e}", dir.display());
                    return;
                }
            }
            bindings.write_to_file(out);
        }
        Err(e) => println!("cargo:warning=cbindgen could not generate tasklist.h: {e}"),
    }
}
