use std::env;
use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "DAYPLAN_BUILD_SHA";

/// `git describe` for the workspace, e.g. `3f2c1ab` or `3f2c1ab-dirty`.
fn describe_workspace(root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_VAR}");

    // Source tarballs have no .git; packagers pass the revision in instead.
    let sha = env::var(SHA_VAR).ok().filter(|s| !s.trim().is_empty()).or_else(|| {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        let root = Path::new(&manifest_dir).join("..");
        println!("cargo:rerun-if-changed={}", root.join(".git/HEAD").display());
        println!("cargo:rerun-if-changed={}", root.join(".git/index").display());
        describe_workspace(&root)
    });

    println!(
        "cargo:rustc-env={SHA_VAR}={}",
        sha.unwrap_or_else(|| "unknown".to_string())
    );
}
