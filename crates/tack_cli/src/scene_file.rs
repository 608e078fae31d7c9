//! Scene file loading and the starter scene written by `tack init`

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tack_headless::{SceneSpec, SectionSpec, TargetSpec, ViewportSpec};

/// Read and parse a scene file
pub fn load(path: &Path) -> Result<SceneSpec> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SceneSpec::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// A two-section scene that exercises both edges of both sections
pub fn starter() -> SceneSpec {
    SceneSpec {
        viewport: ViewportSpec {
            width: 400.0,
            height: 600.0,
        },
        leading_space: "200px".to_string(),
        sections: vec![
            SectionSpec {
                name: Some("intro".to_string()),
                height: "900px".to_string(),
                target: TargetSpec {
                    margin_top: "20px".to_string(),
                    padding_top: "0px".to_string(),
                    height: "100px".to_string(),
                    padding_bottom: "0px".to_string(),
                },
            },
            SectionSpec {
                name: Some("details".to_string()),
                height: "1200px".to_string(),
                target: TargetSpec {
                    margin_top: "1em".to_string(),
                    padding_top: "8px".to_string(),
                    height: "64px".to_string(),
                    padding_bottom: "8px".to_string(),
                },
            },
        ],
        scroll: vec![0.0, 150.0, 400.0, 1000.0, 1500.0, 2200.0, 600.0, 0.0],
        ..SceneSpec::default()
    }
}

/// Serialize the starter scene
pub fn starter_toml() -> Result<String> {
    toml::to_string_pretty(&starter()).context("Failed to serialize starter scene")
}

/// Write the starter scene to `path`, refusing to overwrite
pub fn write_starter(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    fs::write(path, starter_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tack_headless::Scene;

    #[test]
    fn test_starter_round_trips_through_toml() {
        let text = starter_toml().unwrap();
        let spec = SceneSpec::from_toml(&text).unwrap();

        assert_eq!(spec.sections.len(), 2);
        assert_eq!(spec.sections[1].target.margin_top, "1em");
        assert_eq!(spec.scroll, starter().scroll);
    }

    #[test]
    fn test_starter_scene_produces_transitions() {
        let spec = starter();
        let mut scene = Scene::build(&spec).unwrap();
        scene.replay(&spec.scroll);

        for index in 0..2 {
            assert!(scene.history().iter().any(|e| e.section == index));
        }
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = load(Path::new("/nonexistent/scene.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
