//! Recipe options: named, enumerable build-time choices.
//!
//! A recipe declares its options up front (name, admissible domain,
//! default). During configuration a recipe may *remove* an option that is
//! meaningless for the target -- a removed option disappears from the
//! effective set and from the package id, exactly as if it had never been
//! declared.

use serde::{Deserialize, Serialize};

/// Errors raised while seeding or assigning options.
#[derive(thiserror::Error, Debug)]
pub enum OptionError {
    /// The option name was never declared by the recipe.
    #[error("Unknown option: {0}")]
    Unknown(String),

    /// The assigned value is outside the declared domain.
    #[error("Invalid value '{value}' for option '{name}' (allowed: {allowed})")]
    OutOfDomain {
        /// Option name.
        name: String,
        /// The rejected value.
        value: String,
        /// Human-readable rendering of the admissible values.
        allowed: String,
    },
}

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean choice (shared, fPIC, header_only, ...).
    Bool(bool),
    /// Free-form enumerated choice.
    Str(String),
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl std::str::FromStr for OptionValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" | "True" => Ok(Self::Bool(true)),
            "false" | "False" => Ok(Self::Bool(false)),
            other => Ok(Self::Str(other.to_string())),
        }
    }
}

/// The admissible domain of a declared option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    /// `true` or `false`.
    Bool,
    /// A fixed list of string values.
    Enum(Vec<String>),
}

impl Domain {
    fn admits(&self, value: &OptionValue) -> bool {
        match (self, value) {
            (Self::Bool, OptionValue::Bool(_)) => true,
            (Self::Enum(allowed), OptionValue::Str(s)) => allowed.iter().any(|a| a == s),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Bool => "true, false".to_string(),
            Self::Enum(allowed) => allowed.join(", "),
        }
    }
}

/// A declared option: name, domain and default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Option name as consumers spell it (`shared`, `fPIC`, ...).
    pub name: String,
    /// Admissible values.
    pub domain: Domain,
    /// Default value, applied when the user does not override.
    pub default: OptionValue,
}

impl OptionDecl {
    /// Declare a boolean option.
    pub fn boolean(name: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            domain: Domain::Bool,
            default: OptionValue::Bool(default),
        }
    }
}

/// The effective option set for one packaging run.
///
/// Iteration follows declaration order, so rendered output (package ids,
/// `kiln info`) is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    decls: Vec<OptionDecl>,
    values: Vec<(String, OptionValue)>,
}

impl OptionSet {
    /// Seed the set from recipe declarations, every option at its default.
    pub fn seed(decls: &[OptionDecl]) -> Self {
        let values = decls
            .iter()
            .map(|d| (d.name.clone(), d.default.clone()))
            .collect();
        Self {
            decls: decls.to_vec(),
            values,
        }
    }

    /// Assign an option, validating name and domain.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::Unknown`] for undeclared names and
    /// [`OptionError::OutOfDomain`] for inadmissible values.
    pub fn set(&mut self, name: &str, value: OptionValue) -> Result<(), OptionError> {
        let decl = self
            .decls
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| OptionError::Unknown(name.to_string()))?;

        if !decl.domain.admits(&value) {
            return Err(OptionError::OutOfDomain {
                name: name.to_string(),
                value: value.to_string(),
                allowed: decl.domain.describe(),
            });
        }

        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.values.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// Remove an option from the effective set.
    ///
    /// Removing an absent option is a no-op, so recipes can drop a
    /// platform-specific option unconditionally.
    pub fn remove(&mut self, name: &str) {
        self.values.retain(|(n, _)| n != name);
    }

    /// Whether the option is present in the effective set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(n, _)| n == name)
    }

    /// Look up an option value.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up a boolean option; absent or non-boolean options read as `false`.
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(OptionValue::Bool(true)))
    }

    /// Iterate `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of options in the effective set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the effective set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls() -> Vec<OptionDecl> {
        vec![
            OptionDecl::boolean("shared", false),
            OptionDecl::boolean("fPIC", true),
            OptionDecl {
                name: "backend".to_string(),
                domain: Domain::Enum(vec!["gtk2".to_string(), "gtk3".to_string()]),
                default: OptionValue::Str("gtk3".to_string()),
            },
        ]
    }

    #[test]
    fn test_seed_applies_defaults() {
        let opts = OptionSet::seed(&decls());
        assert!(!opts.get_bool("shared"));
        assert!(opts.get_bool("fPIC"));
        assert_eq!(
            opts.get("backend"),
            Some(&OptionValue::Str("gtk3".to_string()))
        );
    }

    #[test]
    fn test_set_validates_domain() {
        let mut opts = OptionSet::seed(&decls());
        opts.set("shared", OptionValue::Bool(true)).unwrap();
        assert!(opts.get_bool("shared"));

        let err = opts
            .set("backend", OptionValue::Str("qt".to_string()))
            .unwrap_err();
        assert!(matches!(err, OptionError::OutOfDomain { .. }));
    }

    #[test]
    fn test_set_rejects_undeclared() {
        let mut opts = OptionSet::seed(&decls());
        assert!(matches!(
            opts.set("lto", OptionValue::Bool(true)),
            Err(OptionError::Unknown(_))
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut opts = OptionSet::seed(&decls());
        opts.remove("fPIC");
        assert!(!opts.contains("fPIC"));
        // Second removal must not panic or change anything.
        opts.remove("fPIC");
        assert_eq!(opts.len(), 2);
    }

    #[test]
    fn test_iteration_order_is_declaration_order() {
        let opts = OptionSet::seed(&decls());
        let names: Vec<&str> = opts.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["shared", "fPIC", "backend"]);
    }

    #[test]
    fn test_value_parsing() {
        assert_eq!("true".parse::<OptionValue>(), Ok(OptionValue::Bool(true)));
        assert_eq!("False".parse::<OptionValue>(), Ok(OptionValue::Bool(false)));
        assert_eq!(
            "gtk3".parse::<OptionValue>(),
            Ok(OptionValue::Str("gtk3".to_string()))
        );
    }
}
