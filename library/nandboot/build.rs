// library/nandboot/build.rs
use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/arch/arm/jump.S");

    // ARM objects only; host builds run the unit tests.
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() != Ok("arm") {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    cc::Build::new()
        .file("src/arch/arm/jump.S")
        .flag("-march=armv4t")
        .flag("-marm")
        .compile("jump");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-lib=static=jump");
}
