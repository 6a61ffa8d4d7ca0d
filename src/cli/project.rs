//! Project files: the sources of an editing session and the clips marked in them
//!
//! ```toml
//! [[sources]]
//! path = "takes/first.mp4"
//! duration = 62.5          # optional, probed when missing
//! clips = [3.0, 10.5, 41.0]
//! ```
//!
//! Sources are labeled `a`..`e` in file order. Relative paths resolve
//! against the project file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::{ClipPool, SourceLibrary};
use crate::error::{ShortsError, ShortsResult};
use crate::ports::ProbePort;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub sources: Vec<ProjectSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSource {
    pub path: PathBuf,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub clips: Vec<f64>,
}

/// Sources and clip pool loaded from a project
#[derive(Debug, Clone)]
pub struct Session {
    pub library: SourceLibrary,
    pub pool: ClipPool,
}

impl ProjectFile {
    pub fn load(path: &Path) -> ShortsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ShortsError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve durations, label sources and mark every clip
    pub async fn into_session(self, base_dir: &Path, probe: &dyn ProbePort) -> ShortsResult<Session> {
        let mut media = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let path = if source.path.is_absolute() {
                source.path.clone()
            } else {
                base_dir.join(&source.path)
            };

            let duration = match source.duration {
                Some(d) => d,
                None => {
                    debug!("Probing duration of {}", path.display());
                    probe.probe_duration(&path).await?
                }
            };
            media.push((path, duration));
        }

        let library = SourceLibrary::from_media(&media)?;

        let mut pool = ClipPool::new();
        for (source, entry) in library.sources().iter().zip(&self.sources) {
            for &start in &entry.clips {
                pool.add_clip(source, start)?;
            }
        }

        info!(
            "Loaded project: {} sources, {} clips",
            library.len(),
            pool.len()
        );
        Ok(Session { library, pool })
    }
}

/// Load a project file and build its session
pub async fn load_session(path: &Path, probe: &dyn ProbePort) -> ShortsResult<Session> {
    let project = ProjectFile::load(path).map_err(|e| match e {
        ShortsError::IoError(io) => ShortsError::ProjectError {
            path: path.display().to_string(),
            message: io.to_string(),
        },
        other => other,
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    project.into_session(base_dir, probe).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use async_trait::async_trait;

    struct FixedProbe(f64);

    #[async_trait]
    impl ProbePort for FixedProbe {
        async fn probe_duration(&self, _file_path: &Path) -> Result<f64, DomainError> {
            Ok(self.0)
        }
    }

    const PROJECT: &str = r#"
[[sources]]
path = "one.mp4"
duration = 20.0
clips = [0.0, 5.0]

[[sources]]
path = "/abs/two.mp4"
clips = [1.0]

[[sources]]
path = "three.mp4"
duration = 10.0
"#;

    #[tokio::test]
    async fn test_session_from_project() {
        let project: ProjectFile = toml::from_str(PROJECT).unwrap();
        let session = project
            .into_session(Path::new("/projects/demo"), &FixedProbe(30.0))
            .await
            .unwrap();

        let sources = session.library.sources();
        assert_eq!(sources[0].id, "a");
        assert_eq!(sources[0].path, PathBuf::from("/projects/demo/one.mp4"));
        assert_eq!(sources[1].path, PathBuf::from("/abs/two.mp4"));
        assert_eq!(sources[1].duration, 30.0);

        let ids: Vec<&str> = session.pool.clips().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
    }

    #[tokio::test]
    async fn test_clip_past_end_is_rejected() {
        let project: ProjectFile = toml::from_str(
            r#"
[[sources]]
path = "a.mp4"
duration = 5.0
clips = [4.0]

[[sources]]
path = "b.mp4"
duration = 5.0

[[sources]]
path = "c.mp4"
duration = 5.0
"#,
        )
        .unwrap();

        let result = project.into_session(Path::new("."), &FixedProbe(0.0)).await;
        assert!(matches!(
            result,
            Err(ShortsError::Domain(DomainError::InvalidClip(_)))
        ));
    }

    #[tokio::test]
    async fn test_too_few_sources() {
        let project: ProjectFile =
            toml::from_str("[[sources]]\npath = \"a.mp4\"\nduration = 5.0\n").unwrap();

        let result = project.into_session(Path::new("."), &FixedProbe(0.0)).await;
        assert!(matches!(result, Err(ShortsError::Domain(DomainError::BadArgs(_)))));
    }

    #[tokio::test]
    async fn test_missing_project_file() {
        let result = load_session(Path::new("/no/such/project.toml"), &FixedProbe(0.0)).await;
        assert!(matches!(result, Err(ShortsError::ProjectError { .. })));
    }
}
