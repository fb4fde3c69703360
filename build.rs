//! Embeds the build version as `INIKIT_VERSION`.
use std::process::Command;

fn main() {
    // An explicit INIKIT_VERSION (release builds) wins over git describe.
    if let Ok(version) = std::env::var("INIKIT_VERSION") {
        println!("cargo:rustc-env=INIKIT_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=INIKIT_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=INIKIT_VERSION");
}
