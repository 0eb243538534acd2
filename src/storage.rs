use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::SavedPersona;
use crate::persona::render_value;

/// Writes personas as flat text files under a shared output directory.
/// Files are write-once and never read back by the service.
pub struct PersonaStore {
    dir: PathBuf,
}

impl PersonaStore {
    /// Create the store, making sure the output directory exists.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write a persona as `persona_<username>_<YYYYMMDD_HHMMSS>.txt` and
    /// return its filename and download URL. Two saves for the same user
    /// within one second share a filename; the last write wins.
    pub fn save(&self, username: &str, persona: &Map<String, Value>) -> Result<SavedPersona> {
        let now = Local::now();
        let filename = format!("persona_{}_{}.txt", username, now.format("%Y%m%d_%H%M%S"));

        let mut text = format!("Reddit User Persona: {username}\n");
        text.push_str(&format!(
            "Generated on: {}\n\n",
            now.format("%Y-%m-%d %H:%M:%S")
        ));

        for (key, value) in persona {
            if key == "raw_data" {
                continue;
            }
            if let Some(rendered) = render_value(value) {
                text.push_str(&format!("{}: {}\n", capitalize(key), rendered));
            }
        }

        fs::write(self.dir.join(&filename), text)?;

        Ok(SavedPersona {
            file_url: format!("/personas/{filename}"),
            filename,
        })
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
