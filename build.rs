use std::env;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");

    // Header generation is best-effort: hosts that vendor the crate without
    // cbindgen metadata still get a working build.
    if let Ok(bindings) = cbindgen::generate(&crate_dir) {
        bindings.write_to_file("include/vikey.h");
    }

    println!("cargo:rerun-if-changed=src/lib.rs");
}
