use std::collections::BTreeMap;

use evo_core::EvoError;
use serde::{Deserialize, Serialize};

/// A single attribute value in the genotype's dynamic bag. Unknown keys
/// round-trip through every operator and the compiler without a schema
/// change — mutators and the backend can introduce new ones freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    List(Vec<String>),
    Traits(BTreeMap<String, f64>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::List(xs) => Some(xs.as_slice()),
            _ => None,
        }
    }

    pub fn as_traits(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            AttributeValue::Traits(m) => Some(m),
            _ => None,
        }
    }
}

/// Recognized conventional attribute keys. Anything else is preserved
/// verbatim and surfaced in the compiler's "Additional Attributes" block.
pub const KEY_AGE: &str = "age";
pub const KEY_OCCUPATION: &str = "occupation";
pub const KEY_BACKSTORY: &str = "backstory";
pub const KEY_CORE_VALUES: &str = "core_values";
pub const KEY_HOBBIES: &str = "hobbies";
pub const KEY_PERSONALITY_TRAITS: &str = "personality_traits";
pub const KEY_COMMUNICATION_STYLE: &str = "communication_style";
pub const KEY_TOPICAL_FOCUS: &str = "topical_focus";
pub const KEY_INTERACTION_POLICY: &str = "interaction_policy";
pub const KEY_GOALS: &str = "goals";

const RECOGNIZED_KEYS: &[&str] = &[
    KEY_AGE,
    KEY_OCCUPATION,
    KEY_BACKSTORY,
    KEY_CORE_VALUES,
    KEY_HOBBIES,
    KEY_PERSONALITY_TRAITS,
    KEY_COMMUNICATION_STYLE,
    KEY_TOPICAL_FOCUS,
    KEY_INTERACTION_POLICY,
    KEY_GOALS,
];

/// The evolvable unit: a unique name plus an open attribute bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genotype {
    pub name: String,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Genotype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(key.into(), value);
    }

    pub fn is_recognized(key: &str) -> bool {
        RECOGNIZED_KEYS.contains(&key)
    }

    /// Unrecognized keys, in a stable order, for the compiler's
    /// "Additional Attributes" section.
    pub fn extra_keys(&self) -> Vec<&str> {
        self.attributes
            .keys()
            .map(String::as_str)
            .filter(|k| !Self::is_recognized(k))
            .collect()
    }

    /// Boundary validation: a non-empty name and, if present, an `age`
    /// within [18, 80]. Called at population init and after reproduction;
    /// never inside a setter, since the dynamic bag has no fixed setters.
    pub fn validate(&self) -> Result<(), EvoError> {
        if self.name.trim().is_empty() {
            return Err(EvoError::InvariantViolation(
                "genotype name must not be empty".into(),
            ));
        }
        if let Some(age) = self.get(KEY_AGE).and_then(AttributeValue::as_int) {
            if !(18..=80).contains(&age) {
                return Err(EvoError::InvariantViolation(format!(
                    "age {age} out of bounds [18,80]"
                )));
            }
        }
        Ok(())
    }
}

/// Humanizes a snake_case attribute key for display: `topical_focus` ->
/// `Topical Focus`.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanizes_snake_case() {
        assert_eq!(humanize_key("topical_focus"), "Topical Focus");
        assert_eq!(humanize_key("goals"), "Goals");
    }

    #[test]
    fn rejects_empty_name() {
        let g = Genotype::new("");
        assert!(g.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_age() {
        let mut g = Genotype::new("A");
        g.set(KEY_AGE, AttributeValue::Int(12));
        assert!(g.validate().is_err());
        g.set(KEY_AGE, AttributeValue::Int(40));
        assert!(g.validate().is_ok());
    }

    #[test]
    fn extra_keys_preserved() {
        let mut g = Genotype::new("A");
        g.set("favorite_color", AttributeValue::Text("teal".into()));
        assert_eq!(g.extra_keys(), vec!["favorite_color"]);
    }
}
