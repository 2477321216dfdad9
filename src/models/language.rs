use std::path::Path;

/// Advisory language tag for an open file, derived from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageId {
    Html,
    Css,
    JavaScript,
    TypeScript,
    Json,
    Python,
    Ruby,
    Php,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Swift,
    Kotlin,
    Yaml,
    Toml,
    Xml,
    Shell,
    Sql,
    Markdown,
}

impl LanguageId {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str())? {
            "html" | "htm" => Some(Self::Html),
            "css" | "scss" | "less" => Some(Self::Css),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" | "tsx" => Some(Self::TypeScript),
            "json" => Some(Self::Json),
            "py" | "pyi" => Some(Self::Python),
            "rb" => Some(Self::Ruby),
            "php" => Some(Self::Php),
            "java" => Some(Self::Java),
            "c" | "h" => Some(Self::C),
            "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => Some(Self::Cpp),
            "cs" => Some(Self::CSharp),
            "go" => Some(Self::Go),
            "rs" => Some(Self::Rust),
            "swift" => Some(Self::Swift),
            "kt" | "kts" => Some(Self::Kotlin),
            "yml" | "yaml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "xml" | "svg" => Some(Self::Xml),
            "sh" | "bash" | "zsh" => Some(Self::Shell),
            "sql" => Some(Self::Sql),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn language_id(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Json => "json",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Xml => "xml",
            Self::Shell => "shell",
            Self::Sql => "sql",
            Self::Markdown => "markdown",
        }
    }

    /// Tag used when the extension is unknown or missing.
    pub fn tag_for_path(path: &Path) -> &'static str {
        Self::from_path(path)
            .map(Self::language_id)
            .unwrap_or("plaintext")
    }
}
