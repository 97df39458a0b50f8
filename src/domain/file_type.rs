use std::fmt;

/// Declared type of an uploaded document. Exactly these three kinds are
/// supported; anything else is rejected before a job is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
}

impl FileType {
    /// Maps a lower-cased filename extension to a supported type.
    /// `doc` is accepted as an alias for `docx`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_supported_extensions_case_insensitively() {
        assert_eq!(FileType::from_extension("PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_extension("docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_extension("doc"), Some(FileType::Docx));
        assert_eq!(FileType::from_extension("txt"), Some(FileType::Txt));
    }

    #[test]
    fn rejects_unknown_extensions() {
        assert_eq!(FileType::from_extension("xlsx"), None);
        assert_eq!(FileType::from_extension("png"), None);
        assert_eq!(FileType::from_extension(""), None);
    }
}
