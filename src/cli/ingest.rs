use std::path::PathBuf;

use crate::db::get_connection;
use crate::error::Result;
use crate::pipeline::{process_batch, BatchRequest};
use crate::settings::{get_data_dir, load_settings};

pub fn run(files: &[String], separator: Option<&str>, created_by: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let data_dir = get_data_dir();
    let mut conn = get_connection(&data_dir.join("maribel.db"))?;

    let file_paths: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    let original_names: Vec<String> = files
        .iter()
        .map(|f| {
            PathBuf::from(f)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| f.clone())
        })
        .collect();
    let creator = created_by
        .map(str::to_string)
        .or_else(|| (!settings.user_name.is_empty()).then(|| settings.user_name.clone()));

    let request = BatchRequest {
        file_paths,
        original_names,
        created_by: creator,
        separator: separator.map(str::to_string).unwrap_or(settings.separator),
    };

    let outcome = process_batch(&mut conn, &request)?;
    if !outcome.success {
        eprintln!("{}", outcome.message);
        std::process::exit(1);
    }
    println!("{}", outcome.message);
    Ok(())
}
