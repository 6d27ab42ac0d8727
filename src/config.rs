// src/config.rs

use crate::physics::defects::{DefectConfig, DefectConfigError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  /// Defect-free structure, relative to the working directory
  #[serde(default = "default_perfect")]
  pub perfect_path: PathBuf,

  /// Structure containing the defects
  #[serde(default = "default_defect")]
  pub defect_path: PathBuf,

  /// Root folder of saved reports
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,

  #[serde(default = "default_true")]
  pub save_report: bool,

  #[serde(default)]
  pub matching: DefectConfig,
}

fn default_perfect() -> PathBuf {
  PathBuf::from("../perfect/POSCAR")
}

fn default_defect() -> PathBuf {
  PathBuf::from("POSCAR")
}

fn default_output_dir() -> PathBuf {
  PathBuf::from("localized-defects")
}

fn default_true() -> bool {
  true
}

impl Default for Config {
  fn default() -> Self {
    Self {
      perfect_path: default_perfect(),
      defect_path: default_defect(),
      output_dir: default_output_dir(),
      save_report: true,
      matching: DefectConfig::default(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/cdefects/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  /// Never fails: any problem falls back to defaults, described in the message.
  pub fn load_from(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader(reader) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  pub fn save_to(&self, path: &Path) -> String {
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }

    match File::create(path) {
      Ok(file) => {
        let writer = BufWriter::new(file);
        match serde_json::to_writer_pretty(writer, self) {
          Ok(_) => format!("Config saved to {:?}", path),
          Err(e) => format!("Failed to save config: {}", e),
        }
      }
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  pub fn validate(&self) -> Result<(), DefectConfigError> {
    self.matching.validate()
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "defects", "cdefects") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
