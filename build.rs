use std::error::Error;
use std::process::Command;

use simple_error::bail;
use vergen::{BuildBuilder, CargoBuilder, Emitter, RustcBuilder, SysinfoBuilder};

fn uncommitted_count() -> usize {
    let output = match _exec_git(&["status", "-s"]) {
        Ok(output) => output,
        Err(_) => return 0,
    };
    output
        .trim()
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .count()
}

fn exec_git(args: &[&str]) -> String {
    _exec_git(args).unwrap_or(String::from(env!("CARGO_PKG_VERSION")))
}

fn _exec_git(args: &[&str]) -> Result<String, Box<dyn Error>> {
    let output = Command::new("git").args(args).output()?;
    if !output.status.success() {
        bail!("git {} exited with {}", args.join(" "), output.status);
    }
    let output = String::from_utf8(output.stdout)?;
    Ok(output.trim().to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    Emitter::default()
        .add_instructions(&BuildBuilder::all_build()?)?
        .add_instructions(&CargoBuilder::all_cargo()?)?
        .add_instructions(&RustcBuilder::all_rustc()?)?
        .add_instructions(&SysinfoBuilder::all_sysinfo()?)?
        .emit()?;

    let mut version = exec_git(&["describe", "--tags"]);
    if uncommitted_count() > 0 {
        version = format!("{version}-dirty");
    }
    println!("cargo:rustc-env=ORGDASH_VERSION={version}");

    Ok(())
}
