use std::collections::HashMap;
use std::fs;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::PathBuf;

use regex::{Captures, Regex};

use error::*;

/// Static translation from a vault top-level folder name to the folder name
/// used in the site project. Lookup misses are an ordinary branch: notes in
/// unmapped folders are simply skipped.
pub struct FolderMapping {
    folders: HashMap<String, String>,
}

impl FolderMapping {
    pub fn new() -> FolderMapping {
        FolderMapping {
            folders: HashMap::new(),
        }
    }

    pub fn insert(&mut self, source: String, dest: String) -> Result<()> {
        if self.folders.contains_key(&source) {
            bail!("Duplicate mapping rule for source folder '{}'", source);
        }
        self.folders.insert(source, dest);

        Ok(())
    }

    pub fn lookup(&self, top_level: &str) -> Option<&str> {
        self.folders.get(top_level).map(|dest| dest.as_str())
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }
}

/// Parser for `source => dest` rules, holding the compiled rule format.
pub struct RuleFormat {
    format: Regex,
}

impl RuleFormat {
    pub fn new() -> RuleFormat {
        RuleFormat {
            format: Regex::new(r"^(?P<source>.+?)\s*=>\s*(?P<dest>.+?)$").unwrap(),
        }
    }

    /// Parses a `source => dest` rule. Returns `None` for blank lines and `#`
    /// comments so rule files can be annotated.
    pub fn rule_from_string(&self, line: &str) -> Option<Result<(String, String)>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        match self.format.captures(trimmed) {
            Some(captures) => Some(create_rule(&captures)),
            None => Some(Err(Error::from(format!(
                "Malformed mapping rule '{}', expected 'source => dest'",
                trimmed
            )))),
        }
    }
}

fn create_rule(captures: &Captures) -> Result<(String, String)> {
    let source = match captures.name("source") {
        Some(source) => source.as_str().to_string(),
        None => bail!("No source folder found for mapping rule. This is a bug."),
    };
    let dest = match captures.name("dest") {
        Some(dest) => dest.as_str().to_string(),
        None => bail!("No destination folder found for mapping rule. This is a bug."),
    };

    Ok((source, dest))
}

pub fn mapping_from_file(file: &PathBuf) -> Result<FolderMapping> {
    let f = fs::File::open(file)
        .chain_err(|| format!("Unable to open mapping file {}", file.to_string_lossy()))?;
    let rule_format = RuleFormat::new();
    let mut mapping = FolderMapping::new();
    for line_result in BufReader::new(f).lines() {
        let line = line_result
            .chain_err(|| format!("Error reading mapping file {}", file.to_string_lossy()))?;
        match rule_format.rule_from_string(&line) {
            Some(rule) => {
                let (source, dest) = rule?;
                mapping.insert(source, dest)?;
            }
            None => (),
        };
    }

    Ok(mapping)
}

pub fn mapping_from_rules<'a, I>(rules: I) -> Result<FolderMapping>
where
    I: IntoIterator<Item = &'a str>,
{
    let rule_format = RuleFormat::new();
    let mut mapping = FolderMapping::new();
    for rule in rules {
        match rule_format.rule_from_string(rule) {
            Some(parsed) => {
                let (source, dest) = parsed?;
                mapping.insert(source, dest)?;
            }
            None => (),
        };
    }

    Ok(mapping)
}
