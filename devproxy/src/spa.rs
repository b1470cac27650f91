use log::warn;
use rocket::fs::NamedFile;
use rocket::{get, State};
use std::path::PathBuf;

/// Root of the built frontend.
#[derive(Debug, Clone)]
pub struct StaticDir(pub PathBuf);

/// Client-side routes have no file on disk, so any GET nothing else claimed
/// gets the app shell and the router takes over in the browser.
#[get("/<_..>", rank = 20)]
pub async fn spa_fallback(dir: &State<StaticDir>) -> Option<NamedFile> {
    let index = dir.0.join("index.html");
    match NamedFile::open(&index).await {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("No app shell at {}: {e}", index.display());
            None
        }
    }
}
