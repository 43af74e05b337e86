//! SQL to Go type mapping.
//!
//! Rules are tried in order and the first whose pattern is a substring of the
//! type wins, so the narrower integer types must come before `int` and the
//! `tinyint(1)` boolean alias before `tinyint`.

/// Go type a rule produces.
#[derive(Debug, Clone, Copy)]
enum GoType {
    Fixed(&'static str),
    Integer {
        signed: &'static str,
        unsigned: &'static str,
    },
}

impl GoType {
    fn resolve(self, unsigned: bool) -> &'static str {
        match self {
            GoType::Fixed(name) => name,
            GoType::Integer { unsigned: u, .. } if unsigned => u,
            GoType::Integer { signed, .. } => signed,
        }
    }
}

struct TypeRule {
    patterns: &'static [&'static str],
    go_type: GoType,
    /// Never emitted as a pointer, even for nullable columns.
    skip_null_wrap: bool,
}

impl TypeRule {
    const fn new(patterns: &'static [&'static str], go_type: GoType) -> Self {
        Self {
            patterns,
            go_type,
            skip_null_wrap: false,
        }
    }

    const fn never_null(mut self) -> Self {
        self.skip_null_wrap = true;
        self
    }

    fn matches(&self, sql_type: &str) -> bool {
        self.patterns.iter().any(|p| sql_type.contains(p))
    }
}

const fn integer(signed: &'static str, unsigned: &'static str) -> GoType {
    GoType::Integer { signed, unsigned }
}

pub const STRING_TYPE: &str = "string";
pub const TIME_TYPE: &str = "time.Time";
pub const JSON_TYPE: &str = "datatypes.JSON";

const TYPE_RULES: &[TypeRule] = &[
    TypeRule::new(&["tinyint(1)"], GoType::Fixed("bool")),
    TypeRule::new(&["bigint"], integer("int64", "uint64")),
    TypeRule::new(&["mediumint"], integer("int32", "uint32")),
    TypeRule::new(&["smallint"], integer("int16", "uint16")),
    TypeRule::new(&["tinyint"], integer("int8", "uint8")),
    TypeRule::new(&["int"], integer("int", "uint")),
    TypeRule::new(
        &["varchar", "text", "char", "character"],
        GoType::Fixed(STRING_TYPE),
    ),
    TypeRule::new(&["decimal", "numeric"], GoType::Fixed("float64")),
    TypeRule::new(&["float", "double"], GoType::Fixed("float64")),
    TypeRule::new(&["bool"], GoType::Fixed("bool")),
    TypeRule::new(&["date", "time"], GoType::Fixed(TIME_TYPE)).never_null(),
    TypeRule::new(&["json"], GoType::Fixed(JSON_TYPE)).never_null(),
];

/// Base Go type for `sql_type` and whether it must stay unwrapped.
/// Unknown types fall back to `string`.
pub fn resolve_go_type(sql_type: &str, unsigned: bool) -> (&'static str, bool) {
    TYPE_RULES
        .iter()
        .find(|rule| rule.matches(sql_type))
        .map(|rule| (rule.go_type.resolve(unsigned), rule.skip_null_wrap))
        .unwrap_or((STRING_TYPE, false))
}

/// Go field type for a column: nullable columns become pointers unless the
/// type is a string, a timestamp or JSON.
pub fn map_sql_type_to_go(sql_type: &str, nullable: bool, unsigned: bool) -> String {
    let (base_type, skip_null_wrap) = resolve_go_type(&sql_type.to_lowercase(), unsigned);

    if nullable && !skip_null_wrap && base_type != STRING_TYPE {
        format!("*{}", base_type)
    } else {
        base_type.to_string()
    }
}
