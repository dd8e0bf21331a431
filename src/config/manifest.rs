use std::{
    borrow::Cow,
    io::ErrorKind,
    path::{Path, PathBuf},
    string::FromUtf8Error,
};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::{ext::BestEffortPathExt, filesystem::PathEntry};

const MANIFEST_FILE_NAME: &str = "paths.yaml";

const SAMPLE_ROOT: &str = "root";
const SAMPLE_QUERY: &str = "root/dir1/subdir1";
const SAMPLE_PATHS: [&str; 4] = [
    "dir1/subdir1/file1.txt",
    "dir1/subdir1/file2.txt",
    "dir2/subdir2/subsubdir2/file3.txt",
    "file0.txt",
];

fn get_manifest_file_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE_NAME)
}

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// The list of paths to load into a tree, plus optional root name and query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathManifest {
    pub root: Option<String>,
    pub query: Option<String>,
    pub entries: Vec<PathEntry>,
}

impl PathManifest {
    /// Reads `paths.yaml` from `root`. A missing file is not an error.
    pub async fn read(root: &Path) -> Result<Option<Self>, ManifestError> {
        let path = get_manifest_file_path(root);
        let file_path = path.best_effort_path_display();
        match Self::from_path(path).await {
            Ok(manifest) => Ok(Some(manifest)),
            Err(ManifestError::ReadError { source, .. })
                if source.kind() == ErrorKind::NotFound =>
            {
                debug!("No manifest at {}", file_path);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, ManifestError> {
        debug!("Reading manifest file: {}", path.best_effort_path_display());
        let bytes = compio::fs::read(&path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read manifest file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    /// The built-in demonstration tree
    pub fn sample() -> Self {
        Self {
            root: Some(SAMPLE_ROOT.to_string()),
            query: Some(SAMPLE_QUERY.to_string()),
            entries: SAMPLE_PATHS.into_iter().map(PathEntry::from).collect(),
        }
    }

    fn parse_entries(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Vec<PathEntry>, ManifestError> {
        let Some(paths) = top_level.get(&key("paths")) else {
            return Ok(Vec::new());
        };
        let Yaml::Sequence(items) = paths else {
            return PathsNotListSnafu.fail();
        };

        let entries = items
            .iter()
            .filter_map(|item| {
                let entry = Self::parse_entry(item);
                if entry.is_none() {
                    warn!("Skipping invalid manifest entry: {:?}", item);
                }
                entry
            })
            .collect();

        Ok(entries)
    }

    fn parse_entry(item: &Yaml) -> Option<PathEntry> {
        match item {
            Yaml::Value(Scalar::String(path)) => Some(PathEntry::from(path.to_string())),
            Yaml::Mapping(fields) => {
                let Yaml::Value(Scalar::String(path)) = fields.get(&key("path"))? else {
                    return None;
                };
                let size = match fields.get(&key("size")) {
                    None => 0,
                    Some(Yaml::Value(Scalar::Integer(size))) => u64::try_from(*size).ok()?,
                    Some(_) => return None,
                };
                let created_at = match fields.get(&key("created_at")) {
                    None => 0,
                    Some(Yaml::Value(Scalar::Integer(created_at))) => *created_at,
                    Some(_) => return None,
                };
                Some(PathEntry::new(path.to_string(), size, created_at))
            }
            _ => None,
        }
    }

    fn parse_string(top_level: &LinkedHashMap<Yaml, Yaml>, name: &'static str) -> Option<String> {
        match top_level.get(&key(name))? {
            Yaml::Value(Scalar::String(value)) => Some(value.to_string()),
            other => {
                warn!("Ignoring non-string '{}' in manifest: {:?}", name, other);
                None
            }
        }
    }
}

impl TryFrom<&str> for PathManifest {
    type Error = ManifestError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| ManifestError::ParseError { source: e })?;
        let document = documents
            .first()
            .ok_or(ManifestError::MalformedManifest)?;
        let top_level = document
            .as_mapping()
            .ok_or(ManifestError::TopLevelNotMap)?;

        Ok(PathManifest {
            root: Self::parse_string(top_level, "root"),
            query: Self::parse_string(top_level, "query"),
            entries: Self::parse_entries(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ManifestError {
    #[snafu(display("Failed to read the manifest file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Manifest file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the manifest file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted manifest file"))]
    MalformedManifest,
    #[snafu(display("Top level of manifest should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Paths section should be a list"))]
    PathsNotList,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[compio::test]
    async fn manifest_returns_error_on_nonexistent_file() {
        let result = PathManifest::from_path(PathBuf::from("nonexistent.yaml")).await;
        assert!(matches!(result, Err(ManifestError::ReadError { .. })));
    }

    #[compio::test]
    async fn manifest_read_without_file_is_none() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let result = PathManifest::read(dir.path()).await;
        assert!(matches!(result, Ok(None)));
    }

    #[compio::test]
    async fn manifest_read_reports_unreadable_manifest() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir(dir.path().join(MANIFEST_FILE_NAME))
            .expect("Failed to create directory");

        let result = PathManifest::read(dir.path()).await;
        assert!(matches!(result, Err(ManifestError::ReadError { .. })));
    }

    #[compio::test]
    async fn manifest_read_loads_paths_yaml() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            "root: top\npaths:\n  - a/b.txt\n",
        )
        .expect("Failed to write manifest");

        let manifest = PathManifest::read(dir.path())
            .await
            .expect("Failed to read manifest")
            .expect("Manifest should be present");
        assert_eq!(manifest.root.as_deref(), Some("top"));
        assert_eq!(manifest.entries, vec![PathEntry::from("a/b.txt")]);
    }

    #[compio::test]
    async fn manifest_from_path_reads_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "query: root/dir1\npaths:\n  - dir1/file.txt").expect("Failed to write");

        let manifest = PathManifest::from_path(file.path().to_path_buf())
            .await
            .expect("Failed to read manifest");
        assert_eq!(manifest.query.as_deref(), Some("root/dir1"));
        assert_eq!(manifest.entries.len(), 1);
    }

    #[compio::test]
    async fn manifest_from_path_rejects_invalid_utf8() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(&[0xff, 0xfe, 0x00]).expect("Failed to write");

        let result = PathManifest::from_path(file.path().to_path_buf()).await;
        assert!(matches!(result, Err(ManifestError::EncodingError { .. })));
    }

    #[test]
    fn manifest_returns_error_on_invalid_yaml() {
        let result: Result<PathManifest, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn manifest_returns_error_on_empty_file() {
        let result: Result<PathManifest, _> = "".try_into();
        assert!(matches!(result, Err(ManifestError::MalformedManifest)));
    }

    #[test]
    fn manifest_returns_error_when_top_level_is_not_map() {
        let result: Result<PathManifest, _> = "- a.txt\n- b.txt".try_into();
        assert!(matches!(result, Err(ManifestError::TopLevelNotMap)));
    }

    #[test]
    fn manifest_returns_error_when_paths_is_not_list() {
        let result: Result<PathManifest, _> = "paths:\n  a: b.txt".try_into();
        assert!(matches!(result, Err(ManifestError::PathsNotList)));
    }

    #[test]
    fn manifest_handles_missing_paths_section() {
        let manifest: PathManifest = "root: top".try_into().unwrap();
        assert_eq!(manifest.root.as_deref(), Some("top"));
        assert!(manifest.entries.is_empty());
    }

    #[test]
    fn manifest_parses_string_and_mapping_entries() {
        let contents = r#"
paths:
  - dir1/subdir1/file1.txt
  - path: dir2/file2.txt
    size: 120
    created_at: 1700000000
  - path: file0.txt
"#;
        let manifest: PathManifest = contents.try_into().unwrap();
        assert_eq!(
            manifest.entries,
            vec![
                PathEntry::from("dir1/subdir1/file1.txt"),
                PathEntry::new("dir2/file2.txt", 120, 1_700_000_000),
                PathEntry::from("file0.txt"),
            ]
        );
        assert_eq!(manifest.root, None);
        assert_eq!(manifest.query, None);
    }

    #[test]
    fn manifest_skips_invalid_entries() {
        let contents = r#"
paths:
  - 123
  - path: negative.txt
    size: -5
  - size: 10
  - path: ok.txt
    created_at: "yesterday"
  - valid/file.txt
"#;
        let manifest: PathManifest = contents.try_into().unwrap();
        assert_eq!(manifest.entries, vec![PathEntry::from("valid/file.txt")]);
    }

    #[test]
    fn manifest_ignores_non_string_root() {
        let manifest: PathManifest = "root: 42\nquery: [a]".try_into().unwrap();
        assert_eq!(manifest.root, None);
        assert_eq!(manifest.query, None);
    }

    #[test]
    fn sample_manifest_builds_demo_tree() {
        let sample = PathManifest::sample();
        assert_eq!(sample.root.as_deref(), Some(SAMPLE_ROOT));
        assert_eq!(sample.query.as_deref(), Some(SAMPLE_QUERY));
        assert_eq!(sample.entries.len(), SAMPLE_PATHS.len());
    }
}
