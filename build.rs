//! Ships `.env.example` next to the `.env` Moodify reads at startup, so a
//! fresh install has a template under `<data_local_dir>/moodify/`.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let template = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join(".env.example");
    if !template.is_file() {
        println!("cargo:warning=.env.example not found at {}", template.display());
        return Ok(());
    }

    let config_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moodify");
    fs::create_dir_all(&config_dir)?;
    fs::copy(&template, config_dir.join(".env.example"))?;

    Ok(())
}
