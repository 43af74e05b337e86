/// A column type split into the pieces the generator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedType {
    /// Lowercased, trimmed type text.
    pub raw_type: String,
    /// Type mapping key: no length/precision modifiers, no `unsigned`.
    pub base_type: String,
    pub is_unsigned: bool,
    /// Full `enum(...)`/`set(...)` definition with its original casing.
    pub enum_values: String,
}

/// MySQL stores booleans as `tinyint(1)`; that modifier is kept.
const BOOLEAN_ALIAS: &str = "tinyint(1)";

pub fn normalize_type(type_text: &str) -> NormalizedType {
    let trimmed = type_text.trim();
    let raw_type = trimmed.to_lowercase();

    for kind in ["enum", "set"] {
        if raw_type.starts_with(&format!("{}(", kind)) {
            return NormalizedType {
                raw_type,
                base_type: kind.to_string(),
                is_unsigned: false,
                enum_values: trimmed.to_string(),
            };
        }
    }

    let is_unsigned = raw_type.contains("unsigned");
    let without_sign = collapse_whitespace(&raw_type.replace("unsigned", ""));

    let base_type = if without_sign.starts_with(BOOLEAN_ALIAS) {
        BOOLEAN_ALIAS.to_string()
    } else {
        collapse_whitespace(&strip_modifiers(&without_sign))
    };

    NormalizedType {
        raw_type,
        base_type,
        is_unsigned,
        enum_values: String::new(),
    }
}

/// Removes every parenthesized group, e.g. `numeric(10,2)` -> `numeric`.
fn strip_modifiers(s: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Collapses runs of whitespace (newlines and tabs included) to one space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
