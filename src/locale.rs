use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Language/region a rule catalog is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Locale {
    /// Simplified Chinese, mainland China.
    #[default]
    #[serde(rename = "zh_CN")]
    ZhCn,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh_CN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = Error;

    /// Accepts `zh`, `zh_CN`, `zh-CN` and `zh-Hans-CN` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "zh" | "zh-cn" | "zh-hans" | "zh-hans-cn" => Ok(Locale::ZhCn),
            _ => Err(Error::UnsupportedLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_chinese_tags() {
        for tag in ["zh", "zh_CN", "zh-CN", "zh-Hans-CN", " ZH_cn "] {
            assert_eq!(tag.parse::<Locale>(), Ok(Locale::ZhCn), "{tag}");
        }
    }

    #[test]
    fn rejects_other_languages() {
        assert_eq!("en_US".parse::<Locale>(), Err(Error::UnsupportedLocale("en_US".into())));
    }
}
