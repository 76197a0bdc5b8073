//! Content language selection.
//!
//! Blogs, tags, sections and projects store a Chinese and an English version
//! of their text fields. A [`Language`] picks one of them.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::FolioError;

/// Supported content languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Simplified Chinese.
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    /// English (United States).
    #[serde(rename = "en-US")]
    EnUs,
}

impl Language {
    /// Returns the language tag, e.g. `zh-CN`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZhCn => "zh-CN",
            Self::EnUs => "en-US",
        }
    }

    /// Picks the value matching this language.
    #[must_use]
    pub fn pick<'a, T: ?Sized>(self, chinese: &'a T, english: &'a T) -> &'a T {
        match self {
            Self::ZhCn => chinese,
            Self::EnUs => english,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh-CN" => Ok(Self::ZhCn),
            "en-US" => Ok(Self::EnUs),
            other => Err(FolioError::validation(format!(
                "unsupported language: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("zh-CN".parse::<Language>().ok(), Some(Language::ZhCn));
        assert_eq!("en-US".parse::<Language>().ok(), Some(Language::EnUs));
        assert!("fr-FR".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_pick() {
        assert_eq!(Language::ZhCn.pick("你好", "hello"), "你好");
        assert_eq!(Language::EnUs.pick("你好", "hello"), "hello");
    }

    #[test]
    fn test_language_serde() {
        assert_eq!(serde_json::to_string(&Language::EnUs).unwrap(), "\"en-US\"");
        assert_eq!(Language::default(), Language::ZhCn);
    }
}
