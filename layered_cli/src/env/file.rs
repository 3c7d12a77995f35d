//! Environment file reader.
//!
//! Lines have the form `NAME=value`. Everything from `#` onwards is a
//! comment, lines without `=` are skipped, names are trimmed and trailing
//! spaces are trimmed from values. Later lines win.

use std::collections::HashMap;

use camino::Utf8Path;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Iterates over the assignments in `contents`.
pub(crate) fn assignments(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|line| {
        let code = line.split_once('#').map_or(line, |(code, _)| code);
        let (name, value) = code.split_once('=')?;
        Some((name.trim(), value.trim_end_matches(' ')))
    })
}

/// Reads `path` and merges its assignments into `cache`.
pub(crate) fn load_into(path: &Utf8Path, cache: &mut HashMap<String, String>) -> CliResult<()> {
    let contents = std::fs::read_to_string(path).map_err(|err| CliError::env_file(path, err))?;
    let before = cache.len();
    for (name, value) in assignments(&contents) {
        cache.insert(name.to_owned(), value.to_owned());
    }
    debug!(%path, added = cache.len().saturating_sub(before), "loaded environment file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("A=1", vec![("A", "1")])]
    #[case("A=1   ", vec![("A", "1")])]
    #[case("  A =1", vec![("A", "1")])]
    #[case("A=1 # note", vec![("A", "1")])]
    #[case("# A=1", vec![])]
    #[case("just text", vec![])]
    #[case("URL=a=b", vec![("URL", "a=b")])]
    #[case("EMPTY=", vec![("EMPTY", "")])]
    #[case("A=1\nB=2\n\nC=3", vec![("A", "1"), ("B", "2"), ("C", "3")])]
    fn reads_assignments(#[case] contents: &str, #[case] expected: Vec<(&str, &str)>) {
        assert_eq!(assignments(contents).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn missing_file_reports_path() {
        let mut cache = HashMap::new();
        let err = load_into(Utf8Path::new("/definitely/not/here.env"), &mut cache).err();
        assert!(matches!(err, Some(CliError::EnvFile { ref path, .. }) if path == "/definitely/not/here.env"));
    }
}
