//! Build script to embed the build date at compile time.

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Get date from env var (CI) or current date (local dev)
    let date = env::var("BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());

    // Write to OUT_DIR for inclusion
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    fs::write(
        &dest_path,
        format!(r#"pub const BUILD_DATE: &str = "{}";"#, date),
    )
    .unwrap();

    println!("cargo:rerun-if-env-changed=BUILD_DATE");
}
