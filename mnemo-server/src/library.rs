//! Music library scanning
//!
//! The library is whatever supported audio files sit directly in the music
//! folder. It is rescanned on every request; there is no index.

use mnemo_common::playlist::{is_supported_audio, library_order, track_url};
use mnemo_common::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackFile {
    pub name: String,
    pub url: String,
}

/// List supported audio files in `music_dir`, creating the folder if absent
pub async fn scan_music_dir(music_dir: &Path) -> Result<Vec<TrackFile>> {
    let mut names = list_audio_names(music_dir)
        .await
        .map_err(|source| Error::Library {
            path: music_dir.to_path_buf(),
            source,
        })?;

    names.sort_by(|a, b| library_order(a, b));

    Ok(names
        .into_iter()
        .map(|name| TrackFile {
            url: track_url(&name),
            name,
        })
        .collect())
}

async fn list_audio_names(music_dir: &Path) -> std::io::Result<Vec<String>> {
    tokio::fs::create_dir_all(music_dir).await?;

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(music_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_supported_audio(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Names of the given tracks as a lookup set
pub fn name_set(files: &[TrackFile]) -> HashSet<String> {
    files.iter().map(|f| f.name.clone()).collect()
}
