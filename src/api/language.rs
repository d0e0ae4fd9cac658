use std::str::FromStr;

/// Summarization language tag accepted by the service.
///
/// The service understands exactly four tags; anything else degrades to
/// English rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Zh,
    ZhTw,
    ZhCn,
}

impl Language {
    pub const SUPPORTED: [Language; 4] = [
        Language::En,
        Language::Zh,
        Language::ZhTw,
        Language::ZhCn,
    ];

    /// Wire tag sent to the summarize endpoint.
    pub fn as_tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::ZhTw => "zh-TW",
            Language::ZhCn => "zh-CN",
        }
    }

    /// Parse a tag, falling back to English for unsupported values.
    pub fn parse(tag: &str) -> Language {
        match tag {
            "en" => Language::En,
            "zh" => Language::Zh,
            "zh-TW" => Language::ZhTw,
            "zh-CN" => Language::ZhCn,
            _ => Language::En,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Language::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_round_trip() {
        for lang in Language::SUPPORTED {
            assert_eq!(Language::parse(lang.as_tag()), lang);
        }
    }

    #[test]
    fn unsupported_tags_fall_back_to_english() {
        assert_eq!(Language::parse("fr"), Language::En);
        assert_eq!(Language::parse(""), Language::En);
        assert_eq!(Language::parse("ZH-TW"), Language::En);
    }

    #[test]
    fn from_str_never_fails() {
        let lang: Language = "de".parse().unwrap();
        assert_eq!(lang, Language::En);
    }
}
