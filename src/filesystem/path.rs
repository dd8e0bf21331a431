use snafu::{Snafu, ensure};

pub const SEPARATOR: char = '/';

/// Splits an insertion path into its segments.
///
/// Every segment has to be non-empty, so leading, trailing and doubled
/// separators are all rejected.
pub fn insertion_segments(path: &str) -> Result<Vec<&str>, PathError> {
    ensure!(!path.trim_matches(SEPARATOR).is_empty(), EmptySnafu);
    checked_segments(path)
}

/// Splits a lookup path into the root token and the directory segments below it.
///
/// One leading and one trailing separator are tolerated.
pub fn lookup_segments(path: &str) -> Result<(&str, Vec<&str>), PathError> {
    let trimmed = path.strip_prefix(SEPARATOR).unwrap_or(path);
    let trimmed = trimmed.strip_suffix(SEPARATOR).unwrap_or(trimmed);
    ensure!(!trimmed.trim_matches(SEPARATOR).is_empty(), EmptySnafu);

    let mut segments = checked_segments(trimmed)?.into_iter();
    // `checked_segments` never returns an empty list for a non-empty input
    let root = segments.next().unwrap_or_default();
    Ok((root, segments.collect()))
}

fn checked_segments(path: &str) -> Result<Vec<&str>, PathError> {
    let mut segments = Vec::new();
    for (position, segment) in path.split(SEPARATOR).enumerate() {
        ensure!(
            !segment.is_empty(),
            EmptySegmentSnafu {
                path: path.to_string(),
                position,
            }
        );
        segments.push(segment);
    }
    Ok(segments)
}

/// Extension sniffing: a final segment names a file only if it contains a dot.
pub fn looks_like_file(segment: &str) -> bool {
    segment.contains('.')
}

pub fn join(parent: &str, name: &str) -> String {
    format!("{parent}{SEPARATOR}{name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum PathError {
    #[snafu(display("Path is empty"))]
    Empty,
    #[snafu(display("Path '{}' has an empty segment at position {}", path, position))]
    EmptySegment { path: String, position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn insertion_segments_splits_on_separator() {
        let segments = insertion_segments("dir1/subdir1/file1.txt").unwrap();
        assert_eq!(segments, vec!["dir1", "subdir1", "file1.txt"]);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("///")]
    fn insertion_segments_rejects_empty_paths(#[case] path: &str) {
        assert_eq!(insertion_segments(path), Err(PathError::Empty));
    }

    #[rstest]
    #[case("/a/b.txt", 0)]
    #[case("a//b.txt", 1)]
    #[case("a/b/", 2)]
    fn insertion_segments_rejects_empty_segments(#[case] path: &str, #[case] expected: usize) {
        match insertion_segments(path) {
            Err(PathError::EmptySegment { position, .. }) => assert_eq!(position, expected),
            other => panic!("Expected EmptySegment, got {other:?}"),
        }
    }

    #[rstest]
    #[case("root/dir1/subdir1", "root", vec!["dir1", "subdir1"])]
    #[case("/root/dir1/subdir1", "root", vec!["dir1", "subdir1"])]
    #[case("root/dir1/subdir1/", "root", vec!["dir1", "subdir1"])]
    #[case("/root/", "root", vec![])]
    #[case("root", "root", vec![])]
    fn lookup_segments_tolerates_outer_separators(
        #[case] path: &str,
        #[case] root: &str,
        #[case] rest: Vec<&str>,
    ) {
        assert_eq!(lookup_segments(path).unwrap(), (root, rest));
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("//")]
    fn lookup_segments_rejects_empty_paths(#[case] path: &str) {
        assert_eq!(lookup_segments(path), Err(PathError::Empty));
    }

    #[test]
    fn lookup_segments_rejects_interior_empty_segment() {
        assert!(matches!(
            lookup_segments("root//dir1"),
            Err(PathError::EmptySegment { position: 1, .. })
        ));
    }

    #[rstest]
    #[case("file.txt", true)]
    #[case("archive.tar.gz", true)]
    #[case(".hidden", true)]
    #[case("subdir", false)]
    fn looks_like_file_sniffs_extension(#[case] segment: &str, #[case] expected: bool) {
        assert_eq!(looks_like_file(segment), expected);
    }
}
