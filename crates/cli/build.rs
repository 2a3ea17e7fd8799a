use std::env;
use std::process::Command;

/// Short commit of the checkout being built, or `unknown` outside a git tree.
fn short_commit() -> String {
    let Ok(output) = Command::new("git").args(["rev-parse", "--short=7", "HEAD"]).output() else {
        return String::from("unknown");
    };
    match String::from_utf8(output.stdout) {
        Ok(hash) if output.status.success() && !hash.trim().is_empty() => hash.trim().to_owned(),
        _ => String::from("unknown"),
    }
}

fn main() {
    for path in ["../../.git/HEAD", "../../.git/refs/heads"] {
        println!("cargo:rerun-if-changed={path}");
    }

    println!("cargo:rustc-env=PTFIX_BUILD_COMMIT={}", short_commit());
    let target = env::var("TARGET").unwrap_or_else(|_| String::from("unknown"));
    println!("cargo:rustc-env=PTFIX_BUILD_TARGET={target}");
}
