use std::fmt;
use std::str::FromStr;

/// Output languages offered by the language selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Assamese,
    Bengali,
    Bhojpuri,
    Gujarati,
    Hindi,
    Kannada,
    Khortha,
    Malayalam,
    Marathi,
    Odia,
    Punjabi,
    Rajasthani,
    Tamil,
    Telugu,
    Urdu,
}

impl Language {
    pub const ALL: [Language; 16] = [
        Language::English,
        Language::Assamese,
        Language::Bengali,
        Language::Bhojpuri,
        Language::Gujarati,
        Language::Hindi,
        Language::Kannada,
        Language::Khortha,
        Language::Malayalam,
        Language::Marathi,
        Language::Odia,
        Language::Punjabi,
        Language::Rajasthani,
        Language::Tamil,
        Language::Telugu,
        Language::Urdu,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Assamese => "Assamese",
            Language::Bengali => "Bengali",
            Language::Bhojpuri => "Bhojpuri",
            Language::Gujarati => "Gujarati",
            Language::Hindi => "Hindi",
            Language::Kannada => "Kannada",
            Language::Khortha => "Khortha",
            Language::Malayalam => "Malayalam",
            Language::Marathi => "Marathi",
            Language::Odia => "Odia",
            Language::Punjabi => "Punjabi",
            Language::Rajasthani => "Rajasthani",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Urdu => "Urdu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownLanguage(needle.to_string()))
    }
}
