use crate::genotype::{
    humanize_key, AttributeValue, Genotype, KEY_BACKSTORY, KEY_COMMUNICATION_STYLE,
    KEY_CORE_VALUES, KEY_GOALS, KEY_HOBBIES, KEY_INTERACTION_POLICY, KEY_OCCUPATION,
    KEY_PERSONALITY_TRAITS, KEY_TOPICAL_FOCUS,
};
use crate::phenotype::Phenotype;

/// Pure, deterministic genotype -> phenotype rendering. Same input always
/// produces byte-identical output; missing recognized attributes are
/// silently skipped, never an error.
pub fn compile(genotype: &Genotype) -> Phenotype {
    Phenotype {
        system_prompt: build_system_prompt(genotype),
        policy_instructions: build_policy_instructions(genotype),
    }
}

fn build_system_prompt(g: &Genotype) -> String {
    let mut out = String::new();

    out.push_str(&format!("You are {}.\n\n", g.name));

    if let Some(age) = g.get("age").and_then(AttributeValue::as_int) {
        out.push_str(&format!("Age: {age}\n"));
    }
    if let Some(occupation) = g.get(KEY_OCCUPATION).and_then(AttributeValue::as_text) {
        out.push_str(&format!("Occupation: {occupation}\n"));
    }
    if let Some(backstory) = g.get(KEY_BACKSTORY).and_then(AttributeValue::as_text) {
        out.push_str(&format!("Backstory: {backstory}\n"));
    }

    if let Some(values) = g.get(KEY_CORE_VALUES).and_then(AttributeValue::as_list) {
        if !values.is_empty() {
            out.push_str(&format!("Core values: {}\n", values.join(", ")));
        }
    }
    if let Some(hobbies) = g.get(KEY_HOBBIES).and_then(AttributeValue::as_list) {
        if !hobbies.is_empty() {
            out.push_str(&format!("Hobbies: {}\n", hobbies.join(", ")));
        }
    }

    if let Some(traits) = g
        .get(KEY_PERSONALITY_TRAITS)
        .and_then(AttributeValue::as_traits)
    {
        if !traits.is_empty() {
            out.push_str("Personality traits:\n");
            for (trait_name, intensity) in traits {
                out.push_str(&format!("- {trait_name}: {intensity:.2}\n"));
            }
        }
    }

    if let Some(style) = g
        .get(KEY_COMMUNICATION_STYLE)
        .and_then(AttributeValue::as_text)
    {
        out.push_str(&format!("Communication style: {style}\n"));
    }

    if let Some(extra) = build_extra_attributes(g) {
        out.push_str("\nAdditional Attributes:\n");
        out.push_str(&extra);
    }

    out
}

fn build_policy_instructions(g: &Genotype) -> String {
    let mut out = String::new();

    if let Some(goals) = g.get(KEY_GOALS).and_then(AttributeValue::as_list) {
        if let Some(primary) = goals.first() {
            out.push_str(&format!("Primary goal: {primary}\n"));
        }
    }
    if let Some(focus) = g.get(KEY_TOPICAL_FOCUS).and_then(AttributeValue::as_text) {
        out.push_str(&format!("Topical focus: {focus}\n"));
    }
    if let Some(policy) = g
        .get(KEY_INTERACTION_POLICY)
        .and_then(AttributeValue::as_text)
    {
        out.push_str(&format!("Interaction rule: {policy}\n"));
    }

    out.push_str("Consistency rule: stay in character across the whole episode.\n");

    out
}

/// Any attribute not in the recognized set is appended verbatim with its
/// key humanized, so mutators/backend-introduced attributes always make it
/// into the phenotype even though the compiler doesn't know their meaning.
fn build_extra_attributes(g: &Genotype) -> Option<String> {
    let keys = g.extra_keys();
    if keys.is_empty() {
        return None;
    }

    let mut out = String::new();
    for key in keys {
        let value = g.get(key).expect("key came from extra_keys()");
        let rendered = render_value(value);
        out.push_str(&format!("- {}: {}\n", humanize_key(key), rendered));
    }
    Some(out)
}

fn render_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Int(n) => n.to_string(),
        AttributeValue::Float(f) => f.to_string(),
        AttributeValue::Bool(b) => b.to_string(),
        AttributeValue::Text(s) => s.clone(),
        AttributeValue::List(xs) => xs.join(", "),
        AttributeValue::Traits(m) => m
            .iter()
            .map(|(k, v)| format!("{k}={v:.2}"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
