use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported site language. Every page URL starts with one of these.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Cs,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Fr, Locale::Cs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Cs => "cs",
        }
    }

    /// Name of the language in that language, for the switcher.
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::Cs => "Čeština",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Locale> {
        match segment {
            "en" => Some(Locale::En),
            "fr" => Some(Locale::Fr),
            "cs" => Some(Locale::Cs),
            _ => None,
        }
    }

    /// Split a request path into its locale prefix and the remainder.
    ///
    /// `/fr/upload` gives `(Fr, "/upload")`, `/cs` gives `(Cs, "/")`.
    /// Paths without a known prefix give `None`.
    pub fn split_path(path: &str) -> Option<(Locale, &str)> {
        let trimmed = path.strip_prefix('/')?;
        let (first, rest) = match trimmed.find('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, "/"),
        };
        Locale::from_segment(first).map(|locale| (locale, if rest.is_empty() { "/" } else { rest }))
    }

    /// Build a locale-prefixed path. `path` must start with `/`.
    pub fn href(&self, path: &str) -> String {
        if path == "/" || path.is_empty() {
            format!("/{}", self.as_str())
        } else {
            format!("/{}{}", self.as_str(), path)
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_segment(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unsupported locale: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_path_recognizes_prefixes() {
        assert_eq!(Locale::split_path("/fr/upload"), Some((Locale::Fr, "/upload")));
        assert_eq!(Locale::split_path("/cs"), Some((Locale::Cs, "/")));
        assert_eq!(Locale::split_path("/en/"), Some((Locale::En, "/")));
        assert_eq!(Locale::split_path("/de/upload"), None);
        assert_eq!(Locale::split_path("/"), None);
    }

    #[test]
    fn href_joins_prefix() {
        assert_eq!(Locale::Fr.href("/"), "/fr");
        assert_eq!(Locale::Cs.href("/admin/queue"), "/cs/admin/queue");
    }
}
