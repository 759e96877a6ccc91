//! Resolution of target and check locators into text

use glint_checks::http::HttpClient;
use glint_checks::discovery::{is_definition_file, logical_name};
use glint_core::{Error, Result, Target};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a check's source text lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Remote(String),
    Unsupported(String),
}

/// A check locator with its logical name and category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSource {
    pub name: String,
    pub category: String,
    pub location: Location,
}

impl CheckSource {
    /// Interpret a locator: `scheme://...` or a name relative to the checks dir
    pub fn parse(locator: &str, checks_dir: &Path) -> Self {
        if let Some(idx) = locator.find("://") {
            let scheme = &locator[..idx];
            let rest = &locator[idx + 3..];
            let location = match scheme {
                "file" => Location::File(PathBuf::from(rest)),
                "http" | "https" => Location::Remote(locator.to_string()),
                other => Location::Unsupported(other.to_string()),
            };
            return Self {
                name: locator.to_string(),
                category: format!("_{}", scheme),
                location,
            };
        }

        let mut path = checks_dir.join(locator);
        if !is_definition_file(&path) {
            path = path.with_extension("yaml");
        }
        let (name, category) = logical_name(&path);
        Self {
            name,
            category,
            location: Location::File(path),
        }
    }

    /// Fetch the source text
    pub fn read(&self, http: &HttpClient) -> Result<String> {
        match &self.location {
            Location::File(path) => {
                if !path.is_file() {
                    return Err(Error::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                std::fs::read_to_string(path).map_err(|e| Error::Load {
                    locator: path.display().to_string(),
                    message: e.to_string(),
                })
            }
            Location::Remote(url) => {
                debug!("Fetching check source from {}", url);
                let response = http.get(url)?;
                if !response.is_success() {
                    return Err(Error::Load {
                        locator: url.clone(),
                        message: format!("HTTP {}", response.status),
                    });
                }
                Ok(response.body)
            }
            Location::Unsupported(scheme) => Err(Error::Load {
                locator: self.name.clone(),
                message: format!("unsupported scheme: {}", scheme),
            }),
        }
    }
}

/// Non-empty trimmed lines of a list file
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Collect targets from `--url` values and `--file` lists, in order
pub fn load_targets(urls: &[String], files: &[PathBuf]) -> Result<Vec<Target>> {
    if urls.is_empty() && files.is_empty() {
        return Err(Error::Configuration("option --url/--file is required".into()));
    }
    let mut raw: Vec<String> = urls.to_vec();
    for file in files {
        raw.extend(read_lines(file)?);
    }
    raw.iter().map(|s| Target::parse(s)).collect()
}

/// Collect check locators from `--poc` values and `--poc-file` lists
pub fn check_locators(pocs: &[String], files: &[PathBuf]) -> Result<Vec<String>> {
    let mut locators: Vec<String> = pocs.to_vec();
    for file in files {
        locators.extend(read_lines(file)?);
    }
    Ok(locators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_common::config::RequestConfig;
    use tempfile::TempDir;

    #[test]
    fn test_bare_name_resolves_under_checks_dir() {
        let source = CheckSource::parse("web/git-config", Path::new("/opt/checks"));
        assert_eq!(source.name, "web/git-config");
        assert_eq!(source.category, "web");
        assert_eq!(
            source.location,
            Location::File(PathBuf::from("/opt/checks/web/git-config.yaml"))
        );

        let source = CheckSource::parse("net/ssh.yml", Path::new("/opt/checks"));
        assert_eq!(source.name, "net/ssh");
        assert_eq!(source.location, Location::File(PathBuf::from("/opt/checks/net/ssh.yml")));
    }

    #[test]
    fn test_scheme_locators() {
        let source = CheckSource::parse("https://example.com/x.yaml", Path::new("checks"));
        assert_eq!(source.category, "_https");
        assert_eq!(source.name, "https://example.com/x.yaml");
        assert!(matches!(source.location, Location::Remote(_)));

        let source = CheckSource::parse("file:///tmp/x.yaml", Path::new("checks"));
        assert_eq!(source.category, "_file");
        assert_eq!(source.location, Location::File(PathBuf::from("/tmp/x.yaml")));
    }

    #[test]
    fn test_read_errors() {
        let http = HttpClient::new(&RequestConfig::default()).unwrap();

        let missing = CheckSource::parse("web/missing", Path::new("/nonexistent"));
        assert_eq!(missing.read(&http).unwrap_err().code(), "FILE_NOT_FOUND");

        let unsupported = CheckSource::parse("ftp://host/x.yaml", Path::new("checks"));
        assert_eq!(unsupported.read(&http).unwrap_err().code(), "LOAD_ERROR");
    }

    #[test]
    fn test_load_targets_from_urls_and_files() {
        let tmp_dir = TempDir::new().unwrap();
        let list = tmp_dir.path().join("targets.txt");
        std::fs::write(&list, "  b.test \n\nhttp://c.test:8080\n").unwrap();

        let targets = load_targets(&["a.test".to_string()], &[list]).unwrap();
        let names: Vec<&str> = targets.iter().map(Target::as_str).collect();
        assert_eq!(names, vec!["a.test", "b.test", "http://c.test:8080"]);
    }

    #[test]
    fn test_targets_required() {
        let err = load_targets(&[], &[]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");

        let err = load_targets(&[], &[PathBuf::from("/nonexistent/targets.txt")]).unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
    }
}
