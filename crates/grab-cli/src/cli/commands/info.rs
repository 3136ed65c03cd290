//! `grab info <url>` – probe type and size without downloading.

use anyhow::{Context, Result};
use grab_core::{fetch_info, FileInfo};

fn print_info(info: &FileInfo) {
    println!("Type: {}", info.content_type.as_deref().unwrap_or("-"));
    match info.content_length_bytes {
        Some(len) => println!("Size: {} B", len),
        None => println!("Size: -"),
    }
}

pub async fn run_info(url: &str, json: bool) -> Result<()> {
    let info = tokio::task::spawn_blocking({
        let url = url.to_string();
        move || fetch_info(&url)
    })
    .await
    .context("probe task join")??;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_info(&info);
    }
    Ok(())
}
