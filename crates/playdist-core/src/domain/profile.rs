//! Profile-scoped application configuration.
//!
//! `conf/application.conf` is a Java-properties file. Any key may be
//! overridden for one profile (the "framework id") by prefixing it with
//! `%<profile>.`; the qualified key wins when that profile is selected.
//!
//! ```text
//! application.name=shop
//! module.crud=${play.path}/modules/crud
//! %test.module.testrunner=${play.path}/modules/testrunner
//! %prod.http.port=80
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::error::DomainError;

const MODULE_PREFIX: &str = "module.";
const PLAY_PATH_VARIABLE: &str = "${play.path}";

/// Parsed, read-only view of one configuration file for one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    properties: BTreeMap<String, String>,
    profile: Option<String>,
    framework_home: Option<PathBuf>,
}

impl ProfileConfig {
    /// Parse properties text for the given profile id.
    ///
    /// An empty profile id behaves like no profile.
    pub fn parse(text: &str, profile: Option<&str>) -> Result<Self, DomainError> {
        let properties = parse_properties(text)?;
        let profile = profile.filter(|p| !p.is_empty()).map(str::to_string);
        debug!(
            keys = properties.len(),
            profile = profile.as_deref().unwrap_or(""),
            "Configuration parsed"
        );
        Ok(Self {
            properties,
            profile,
            framework_home: None,
        })
    }

    /// Directory substituted for `${play.path}` in module paths.
    pub fn with_framework_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.framework_home = Some(home.into());
        self
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Profile-qualified lookup, falling back to the plain key.
    pub fn get_property(&self, key: &str) -> Option<&str> {
        if let Some(profile) = &self.profile {
            if let Some(v) = self.properties.get(&format!("%{profile}.{key}")) {
                return Some(v);
            }
        }
        self.properties.get(key).map(String::as_str)
    }

    pub fn application_name(&self) -> Option<&str> {
        self.get_property("application.name")
    }

    pub fn jvm_memory(&self) -> Option<&str> {
        self.get_property("jvm.memory")
    }

    /// `application.log.system.out`; anything other than `false`/`off`
    /// counts as enabled.
    pub fn log_system_out(&self) -> Option<bool> {
        self.get_property("application.log.system.out")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "off" | "no"))
    }

    pub fn http_port(&self) -> Result<Option<u16>, DomainError> {
        match self.get_property("http.port") {
            None => Ok(None),
            Some(v) => v
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| DomainError::InvalidConfigValue {
                    key: "http.port".into(),
                    value: v.to_string(),
                }),
        }
    }

    /// `module.<name>` entries, overridden by `%<profile>.module.<name>`.
    pub fn modules(&self) -> BTreeMap<String, PathBuf> {
        let mut modules = BTreeMap::new();

        for (key, value) in &self.properties {
            if let Some(name) = key.strip_prefix(MODULE_PREFIX) {
                modules.insert(name.to_string(), self.module_path(value));
            }
        }

        if let Some(profile) = &self.profile {
            let qualified = format!("%{profile}.{MODULE_PREFIX}");
            for (key, value) in &self.properties {
                if let Some(name) = key.strip_prefix(&qualified) {
                    modules.insert(name.to_string(), self.module_path(value));
                }
            }
        }

        modules
    }

    /// Names of the modules the selected profile activates.
    pub fn active_module_names(&self) -> BTreeSet<String> {
        self.modules().into_keys().collect()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn module_path(&self, raw: &str) -> PathBuf {
        match &self.framework_home {
            Some(home) if raw.contains(PLAY_PATH_VARIABLE) => {
                PathBuf::from(raw.replace(PLAY_PATH_VARIABLE, &path_str(home)))
            }
            _ => PathBuf::from(raw),
        }
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// ── Properties syntax ─────────────────────────────────────────────────────────

fn parse_properties(text: &str) -> Result<BTreeMap<String, String>, DomainError> {
    let mut properties = BTreeMap::new();
    let mut lines = text.lines().enumerate().peekable();

    while let Some((index, raw)) = lines.next() {
        let first_line = index + 1;
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        let key = unescape(key, first_line)?;
        let value = unescape(value, first_line)?;
        properties.insert(key, value);
    }

    Ok(properties)
}

/// A trailing odd run of backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split at the first unescaped `=`, `:` or whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\x0c']);
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, DomainError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| DomainError::ConfigSyntax {
                        line,
                        message: format!("malformed \\u escape: \\u{hex}"),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = "\
# Application
application.name=shop
application.log.system.out=off
jvm.memory=-Xmx512m
http.port=9000
%prod.http.port=80

module.crud=${play.path}/modules/crud
module.ext=../ext
%test.module.testrunner=${play.path}/modules/testrunner
%test.module.ext=../ext-test
";

    #[test]
    fn plain_lookup_without_profile() {
        let cfg = ProfileConfig::parse(CONF, None).unwrap();
        assert_eq!(cfg.application_name(), Some("shop"));
        assert_eq!(cfg.http_port().unwrap(), Some(9000));
        assert_eq!(cfg.get_property("missing"), None);
    }

    #[test]
    fn qualified_key_overrides_plain_key() {
        let cfg = ProfileConfig::parse(CONF, Some("prod")).unwrap();
        assert_eq!(cfg.http_port().unwrap(), Some(80));
        assert_eq!(cfg.jvm_memory(), Some("-Xmx512m"));
    }

    #[test]
    fn empty_profile_is_no_profile() {
        let cfg = ProfileConfig::parse(CONF, Some("")).unwrap();
        assert_eq!(cfg.profile(), None);
        assert_eq!(cfg.http_port().unwrap(), Some(9000));
    }

    #[test]
    fn modules_merge_profile_entries() {
        let cfg = ProfileConfig::parse(CONF, Some("test")).unwrap();
        let modules = cfg.modules();
        assert_eq!(modules.len(), 3);
        assert_eq!(modules["ext"], PathBuf::from("../ext-test"));
        assert!(cfg.active_module_names().contains("testrunner"));
    }

    #[test]
    fn other_profiles_modules_are_ignored() {
        let cfg = ProfileConfig::parse(CONF, Some("prod")).unwrap();
        let names = cfg.active_module_names();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["crud", "ext"]);
    }

    #[test]
    fn play_path_is_substituted() {
        let cfg = ProfileConfig::parse(CONF, None)
            .unwrap()
            .with_framework_home("/opt/play");
        assert_eq!(cfg.modules()["crud"], PathBuf::from("/opt/play/modules/crud"));
    }

    #[test]
    fn log_system_out_recognises_off() {
        let cfg = ProfileConfig::parse(CONF, None).unwrap();
        assert_eq!(cfg.log_system_out(), Some(false));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let cfg = ProfileConfig::parse("http.port=abc", None).unwrap();
        assert!(matches!(
            cfg.http_port(),
            Err(DomainError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn separators_and_whitespace() {
        let cfg = ProfileConfig::parse("a = 1\nb:2\nc 3\n  d\t=\t4", None).unwrap();
        assert_eq!(cfg.get_property("a"), Some("1"));
        assert_eq!(cfg.get_property("b"), Some("2"));
        assert_eq!(cfg.get_property("c"), Some("3"));
        assert_eq!(cfg.get_property("d"), Some("4"));
    }

    #[test]
    fn continuation_lines_are_joined() {
        let cfg = ProfileConfig::parse("list=a,\\\n    b,\\\n    c\n", None).unwrap();
        assert_eq!(cfg.get_property("list"), Some("a,b,c"));
    }

    #[test]
    fn escaped_backslash_does_not_continue() {
        let cfg = ProfileConfig::parse("path=C:\\\\\nnext=x", None).unwrap();
        assert_eq!(cfg.get_property("path"), Some("C:\\"));
        assert_eq!(cfg.get_property("next"), Some("x"));
    }

    #[test]
    fn escapes_in_keys_and_values() {
        let cfg = ProfileConfig::parse("my\\ key=tab\\there\nu=\\u0041", None).unwrap();
        assert_eq!(cfg.get_property("my key"), Some("tab\there"));
        assert_eq!(cfg.get_property("u"), Some("A"));
    }

    #[test]
    fn malformed_unicode_escape_reports_line() {
        let err = ProfileConfig::parse("ok=1\nbad=\\u00zz", None).unwrap_err();
        assert_eq!(
            err,
            DomainError::ConfigSyntax {
                line: 2,
                message: "malformed \\u escape: \\u00zz".into()
            }
        );
    }

    #[test]
    fn comments_are_skipped() {
        let cfg = ProfileConfig::parse("# c\n! c\n   # indented\nk=v", None).unwrap();
        assert_eq!(cfg.len(), 1);
    }
}
