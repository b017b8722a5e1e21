use std::fs;
use std::path::Path;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir");
    let version_path = Path::new(&manifest_dir)
        .ancestors()
        .nth(2)
        .expect("workspace root above crates/<name>")
        .join("VERSION");

    println!("cargo:rerun-if-changed={}", version_path.display());

    let raw_version = fs::read_to_string(&version_path).expect("read VERSION file");
    let version = raw_version.trim();
    assert!(
        !version.is_empty()
            && version
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())),
        "VERSION must be a dotted numeric version, got {version:?}"
    );

    println!("cargo:rustc-env=TEMPLATE_SHEET_VERSION={version}");
}
