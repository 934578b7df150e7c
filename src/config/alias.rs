//! Alias target specifiers.
//!
//! Each entry of the `[aliases]` table maps a name to one of:
//!
//! ```toml
//! [aliases]
//! reset = true                              # same as the alias name
//! main = "site/main"                        # path fragment under css_root
//! fonts = "https://fonts.example.com/a.css" # remote, passed through verbatim
//! legacy = false                            # disabled
//! ```
//!
//! The loose input forms (`1`, `"1"`, `0`, `""`) are normalized once, here,
//! so the resolver only ever matches on [`AliasSpec`].

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;
use std::sync::LazyLock;

/// `scheme://...` or protocol-relative `//...`.
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:)?//").unwrap());

/// Whether `target` names a remote stylesheet.
pub fn is_url(target: &str) -> bool {
    URL_PATTERN.is_match(target)
}

/// Normalized target of one alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasSpec {
    /// Declared but switched off; never resolvable.
    Disabled,
    /// The alias name doubles as the file stem.
    SameAsName,
    /// Path fragment relative to `css_root`, with or without `.css`/`.min.css`.
    Path(String),
    /// Full or protocol-relative URL.
    Url(String),
    /// Already-resolved absolute path. Only checked for existence.
    Absolute(PathBuf),
}

impl AliasSpec {
    /// Classify a string target.
    pub fn parse(target: &str) -> Self {
        match target {
            "" | "0" => Self::Disabled,
            "1" => Self::SameAsName,
            t if is_url(t) => Self::Url(t.to_owned()),
            t => Self::Path(t.to_owned()),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl From<bool> for AliasSpec {
    fn from(enabled: bool) -> Self {
        if enabled { Self::SameAsName } else { Self::Disabled }
    }
}

impl From<&str> for AliasSpec {
    fn from(target: &str) -> Self {
        Self::parse(target)
    }
}

impl From<String> for AliasSpec {
    fn from(target: String) -> Self {
        Self::parse(&target)
    }
}

impl From<PathBuf> for AliasSpec {
    fn from(path: PathBuf) -> Self {
        Self::Absolute(path)
    }
}

/// Raw TOML forms accepted for an alias target.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpec {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for AliasSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawSpec::deserialize(deserializer)? {
            RawSpec::Flag(enabled) => enabled.into(),
            RawSpec::Number(n) => (n != 0).into(),
            RawSpec::Text(text) => Self::parse(&text),
        })
    }
}

impl Serialize for AliasSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::SameAsName => serializer.serialize_bool(true),
            Self::Path(s) | Self::Url(s) => serializer.serialize_str(s),
            Self::Absolute(p) => serializer.serialize_str(&p.to_string_lossy()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://cdn.example.com/reset.css"));
        assert!(is_url("http://example.com/a.css"));
        assert!(is_url("//fonts.example.com/css"));
        assert!(!is_url("site/main"));
        assert!(!is_url("main.css"));
        assert!(!is_url("C:main"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(AliasSpec::parse(""), AliasSpec::Disabled);
        assert_eq!(AliasSpec::parse("0"), AliasSpec::Disabled);
        assert_eq!(AliasSpec::parse("1"), AliasSpec::SameAsName);
        assert_eq!(
            AliasSpec::parse("//cdn.example.com/x.css"),
            AliasSpec::Url("//cdn.example.com/x.css".into())
        );
        assert_eq!(
            AliasSpec::parse("site/main.css"),
            AliasSpec::Path("site/main.css".into())
        );
    }

    #[test]
    fn test_deserialize_forms() {
        let table: BTreeMap<String, AliasSpec> = toml::from_str(
            r#"
a = true
b = false
c = 1
d = 0
e = "1"
f = ""
g = "site/main"
h = "https://cdn.example.com/h.css"
"#,
        )
        .unwrap();

        assert_eq!(table["a"], AliasSpec::SameAsName);
        assert_eq!(table["b"], AliasSpec::Disabled);
        assert_eq!(table["c"], AliasSpec::SameAsName);
        assert_eq!(table["d"], AliasSpec::Disabled);
        assert_eq!(table["e"], AliasSpec::SameAsName);
        assert_eq!(table["f"], AliasSpec::Disabled);
        assert_eq!(table["g"], AliasSpec::Path("site/main".into()));
        assert_eq!(
            table["h"],
            AliasSpec::Url("https://cdn.example.com/h.css".into())
        );
    }

    #[test]
    fn test_serialize_roundtrips_shape() {
        let mut table = BTreeMap::new();
        table.insert("a", AliasSpec::SameAsName);
        table.insert("b", AliasSpec::Disabled);
        table.insert("c", AliasSpec::Path("site/main".into()));
        let text = toml::to_string(&table).unwrap();
        assert!(text.contains("a = true"));
        assert!(text.contains("b = false"));
        assert!(text.contains("c = \"site/main\""));
    }
}
