// build.rs

use chrono::Local;
use std::{env, fs, io, path::Path};

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    // stamped in local time, matching what the tube shows
    let build_date = Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string();

    fs::write(
        &dest_path,
        format!("pub const BUILD_DATE: &str = \"{}\";\n", build_date),
    )?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
