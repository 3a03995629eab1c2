//! services/api/src/bin/openapi.rs
//!
//! Dumps the OpenAPI document for the news API.
//!
//! Usage: `openapi [PATH]`. Without a path the document goes to
//! `openapi.json`; a path of `-` prints it to stdout for piping into other
//! tooling.

use news_api_lib::web::rest::ApiDoc;
use std::path::Path;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

/// Writes the document, creating missing parent directories first.
fn write_document(path: &Path, document: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi();
    let route_count = doc.paths.paths.len();
    let document = doc.to_pretty_json()?;

    let target = std::env::args().nth(1);
    match target.as_deref() {
        Some("-") => println!("{}", document),
        other => {
            let path = Path::new(other.unwrap_or(DEFAULT_OUTPUT));
            write_document(path, &document)?;
            eprintln!("Wrote {} routes to {}", route_count, path.display());
        }
    }
    Ok(())
}
