//! Model value object representing a CodeMax model variant

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available CodeMax models (Value Object)
///
/// Each variant maps to a backend model id and a system-prompt variant.
/// `CodeMaxPro` and `CodeMaxBeta` share the same backend model and differ
/// only in the persona they are instructed to adopt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Fast, stable variant
    CodeMax13,
    /// Architect variant on the pro backend
    CodeMaxPro,
    /// Experimental variant on the pro backend
    CodeMaxBeta,
    /// Any other backend model id, sent verbatim
    Custom(String),
}

impl Model {
    /// User-facing key used on the command line and in config files.
    pub fn key(&self) -> &str {
        match self {
            Model::CodeMax13 => "codemax-1.3",
            Model::CodeMaxPro => "codemax-pro",
            Model::CodeMaxBeta => "codemax-beta",
            Model::Custom(s) => s,
        }
    }

    /// Model id sent to the provider.
    pub fn backend_id(&self) -> &str {
        match self {
            Model::CodeMax13 => "gemini-3-flash-preview",
            Model::CodeMaxPro | Model::CodeMaxBeta => "gemini-3-pro-preview",
            Model::Custom(s) => s,
        }
    }

    /// Human-readable name shown next to model messages.
    pub fn display_name(&self) -> &str {
        match self {
            Model::CodeMax13 => "CodeMax v1.3",
            Model::CodeMaxPro => "CodeMax Pro",
            Model::CodeMaxBeta => "CodeMax Beta",
            Model::Custom(s) => s,
        }
    }

    /// Persona variant named in the system instruction.
    pub fn variant(&self) -> &'static str {
        match self {
            Model::CodeMax13 | Model::Custom(_) => "v1.3 stable",
            Model::CodeMaxPro => "PRO Architect",
            Model::CodeMaxBeta => "BETA Experimental",
        }
    }

    /// The built-in variants, in menu order.
    pub fn known_models() -> Vec<Model> {
        vec![Model::CodeMax13, Model::CodeMaxPro, Model::CodeMaxBeta]
    }
}

impl Default for Model {
    /// Returns the default model (CodeMax Pro)
    fn default() -> Self {
        Model::CodeMaxPro
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "codemax-1.3" | "gemini-3-flash-preview" => Model::CodeMax13,
            "codemax-pro" | "gemini-3-pro-preview" => Model::CodeMaxPro,
            "codemax-beta" => Model::CodeMaxBeta,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
