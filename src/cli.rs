// src/cli.rs

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "cdefects",
    about = "Find vacancy, substitutional and interstitial defects by comparing two POSCAR files",
    version
)]
pub struct Cli {
    /// Defect-free reference structure [default: ../perfect/POSCAR]
    #[arg(short, long, value_name = "FILE")]
    pub perfect: Option<PathBuf>,

    /// Structure containing the defects [default: POSCAR]
    #[arg(short, long, value_name = "FILE")]
    pub defect: Option<PathBuf>,

    /// Sites closer than this are the same site (Å)
    #[arg(short, long, value_name = "Å")]
    pub tolerance: Option<f64>,

    /// Width of the reported nearest-neighbor shell (Å)
    #[arg(long, value_name = "Å")]
    pub neighbor_tolerance: Option<f64>,

    /// Root folder for neighbor_atoms.dat [default: localized-defects]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the report without writing neighbor_atoms.dat
    #[arg(long)]
    pub no_save: bool,

    /// Also write the report as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Store the effective settings as the new defaults
    #[arg(long)]
    pub save_config: bool,

    /// Only print warnings and errors on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print debug messages on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command line values take precedence over the stored settings.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(p) = &self.perfect {
            config.perfect_path = p.clone();
        }
        if let Some(p) = &self.defect {
            config.defect_path = p.clone();
        }
        if let Some(t) = self.tolerance {
            config.matching.tolerance = t;
        }
        if let Some(t) = self.neighbor_tolerance {
            config.matching.neighbor_tolerance = t;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.no_save {
            config.save_report = false;
        }
        config
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "cdefects",
            "--defect",
            "V_Ga/POSCAR",
            "--tolerance",
            "0.05",
            "--no-save",
        ]);

        let cfg = cli.apply(Config::default());

        assert_eq!(cfg.defect_path, PathBuf::from("V_Ga/POSCAR"));
        assert_eq!(cfg.perfect_path, PathBuf::from("../perfect/POSCAR"));
        assert_eq!(cfg.matching.tolerance, 0.05);
        assert_eq!(cfg.matching.neighbor_tolerance, 0.001);
        assert!(!cfg.save_report);
    }

    #[test]
    fn test_defaults_untouched() {
        let cli = Cli::parse_from(["cdefects"]);
        assert_eq!(cli.apply(Config::default()), Config::default());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cdefects", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
