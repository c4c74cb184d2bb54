//! Reads JSON element files into graph configs.

use std::io::Read;
use std::path::Path;

use crate::types::{GraphConfig, GraphResult};

/// Reader for JSON element files.
pub struct GraphReader;

impl GraphReader {
    /// Read a config or bare element list from a file.
    pub fn read_from_file(path: &Path) -> GraphResult<GraphConfig> {
        let config = GraphConfig::from_file(path)?;
        log::debug!(
            "Read {} element descriptions from {}",
            config.elements.len(),
            path.display()
        );
        Ok(config)
    }

    /// Read a config or bare element list from any reader.
    pub fn read_from(reader: &mut impl Read) -> GraphResult<GraphConfig> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        GraphConfig::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_bare_array() {
        let mut input = r#"[{"data":{"id":"a"}},{"data":{"source":"a","target":"a"}}]"#.as_bytes();
        let config = GraphReader::read_from(&mut input).unwrap();
        assert_eq!(config.elements.len(), 2);
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"elements":{{"nodes":[{{"data":{{"id":"n"}}}}]}},"options":{{"id_prefix":"x"}}}}"#
        )
        .unwrap();
        let config = GraphReader::read_from_file(file.path()).unwrap();
        assert_eq!(config.elements.nodes.len(), 1);
        assert_eq!(config.options.id_prefix, "x");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut input = "{nope".as_bytes();
        assert!(GraphReader::read_from(&mut input).is_err());
    }
}
