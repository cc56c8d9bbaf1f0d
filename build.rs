use std::env;
use std::process::Command;

const PREFIX: &str = "FINANCE_TRACKER_BUILD";

fn main() {
    for path in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let hash = command_output("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let status = match command_output("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".to_string());
    let rustc = command_output("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string());

    emit("HASH", &hash);
    emit("STATUS", status);
    emit("TIMESTAMP", &timestamp);
    emit("TARGET", &target);
    emit("PROFILE", &profile);
    emit("RUSTC", &rustc);
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={PREFIX}_{key}={value}");
}

/// Trimmed stdout of a successful command.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
