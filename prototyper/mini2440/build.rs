use std::env;

const LINKER_SCRIPT: &str = "link.ld";
const START: &str = "src/start.S";

fn main() {
    println!("cargo:rerun-if-changed={LINKER_SCRIPT}");
    println!("cargo:rerun-if-changed={START}");
    println!("cargo:rerun-if-changed=board.toml");

    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() != Ok("arm") {
        return;
    }

    cc::Build::new()
        .file(START)
        .flag("-march=armv4t")
        .flag("-marm")
        .compile("start");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    println!("cargo:rustc-link-arg-bins=-L{manifest_dir}");
    println!("cargo:rustc-link-arg-bins=-T{LINKER_SCRIPT}");
}
