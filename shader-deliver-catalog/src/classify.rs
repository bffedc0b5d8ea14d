//! Shader-model classification by source name.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static SM20B_REGEX: OnceLock<Regex> = OnceLock::new();
static SM30_REGEX: OnceLock<Regex> = OnceLock::new();

fn sm20b_regex() -> &'static Regex {
    SM20B_REGEX.get_or_init(|| {
        Regex::new(r"^.+(ps|vs)2.+").expect("Failed to compile shader model 2 regex")
    })
}

fn sm30_regex() -> &'static Regex {
    SM30_REGEX.get_or_init(|| {
        Regex::new(r"^.+(ps|vs)3.+").expect("Failed to compile shader model 3 regex")
    })
}

/// Version bucket a shader belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderModel {
    /// `ps20b` / `vs20b` style names
    Sm20b,
    /// `ps30` / `vs30` style names
    Sm30,
    /// Everything else
    Other,
}

impl ShaderModel {
    /// Classify a canonical shader name. Rules are checked in order and the
    /// first match wins, so a name carrying both markers lands in `20b`.
    pub fn classify(name: &str) -> Self {
        if sm20b_regex().is_match(name) {
            ShaderModel::Sm20b
        } else if sm30_regex().is_match(name) {
            ShaderModel::Sm30
        } else {
            ShaderModel::Other
        }
    }

    /// Bucket key used in the shader list and passed to the compiler as `-ver`.
    pub fn bucket(self) -> &'static str {
        match self {
            ShaderModel::Sm20b => "20b",
            ShaderModel::Sm30 => "30",
            ShaderModel::Other => "other",
        }
    }
}

impl fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket())
    }
}
