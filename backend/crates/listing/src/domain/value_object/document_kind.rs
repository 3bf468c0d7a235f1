use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    Deed,
    Survey,
    Appraisal,
    Title,
    Other,
}

impl DocumentKind {
    pub const fn code(&self) -> &'static str {
        match self {
            DocumentKind::Deed => "DEED",
            DocumentKind::Survey => "SURVEY",
            DocumentKind::Appraisal => "APPRAISAL",
            DocumentKind::Title => "TITLE",
            DocumentKind::Other => "OTHER",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "DEED" => Some(DocumentKind::Deed),
            "SURVEY" => Some(DocumentKind::Survey),
            "APPRAISAL" => Some(DocumentKind::Appraisal),
            "TITLE" => Some(DocumentKind::Title),
            "OTHER" => Some(DocumentKind::Other),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
