use std::collections::HashSet;

use crate::{
    db::column_type::collapse_whitespace,
    models::schema::{Column, ForeignKey, TableSchema},
};

use super::types::{map_sql_type_to_go, JSON_TYPE, TIME_TYPE};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Go package of the generated file.
    pub package: String,
    /// Embed `gorm.Model` at the top of every struct.
    pub include_base_model: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            package: "models".to_string(),
            include_base_model: false,
        }
    }
}

/// `user_profile_id` -> `UserProfileId`.
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Makes free text safe inside a Go struct tag literal.
fn tag_text(s: &str) -> String {
    s.replace(['`', '"'], "'")
}

/// Body of the `gorm:"..."` tag for one column.
///
/// Keys appear in a fixed order: `column`, `type`, `primaryKey`,
/// `autoIncrement`, `not null`, `unsigned`, `default`, `comment`. Defaults lose
/// their surrounding quotes and comments have whitespace runs collapsed. In
/// both, any inner backtick or double quote is rewritten to `'` since either
/// would end the Go tag literal early.
pub fn column_tag(col: &Column) -> String {
    let mut tag = format!("column:{}", col.name);

    if !col.enum_values.is_empty() {
        tag.push_str(&format!(";type:{}", col.enum_values));
    }
    if col.is_primary_key {
        tag.push_str(";primaryKey");
    }
    if col.is_auto_increment {
        tag.push_str(";autoIncrement");
    }
    if !col.nullable {
        tag.push_str(";not null");
    }
    if col.is_unsigned {
        tag.push_str(";unsigned");
    }
    if let Some(default) = &col.default_value {
        let default = default.trim_matches(|c| c == '\'' || c == '"');
        tag.push_str(&format!(";default:{}", tag_text(default)));
    }
    if !col.comment.is_empty() {
        tag.push_str(&format!(";comment:{}", tag_text(&collapse_whitespace(&col.comment))));
    }

    tag
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationField {
    pub name: String,
    pub target: String,
    pub foreign_key: String,
    pub references: String,
}

/// One struct field per foreign key, named after the key column. A name that
/// clashes with an existing field gets the referenced struct name appended;
/// if that clashes too the relation is left out.
pub fn relation_fields(columns: &[Column], foreign_keys: &[ForeignKey]) -> Vec<RelationField> {
    let mut used: HashSet<String> = columns.iter().map(|c| to_pascal_case(&c.name)).collect();
    let mut fields = Vec::with_capacity(foreign_keys.len());

    for fk in foreign_keys {
        let column_field = to_pascal_case(&fk.column);
        let target = to_pascal_case(&fk.referenced_table);

        let mut name = to_pascal_case(fk.column.strip_suffix("_id").unwrap_or(&fk.column));
        if name.is_empty() || name == column_field {
            name = target.clone();
        }
        if used.contains(&name) {
            name.push_str(&target);
        }
        if !used.insert(name.clone()) {
            continue;
        }

        fields.push(RelationField {
            name,
            target,
            foreign_key: column_field,
            references: to_pascal_case(&fk.referenced_column),
        });
    }

    fields
}

/// Renders a complete Go source file holding the model for `schema`.
pub fn render_model(schema: &TableSchema, options: &RenderOptions) -> String {
    let struct_name = to_pascal_case(&schema.table_name);
    let const_name = format!("TableName_{}", struct_name);

    let fields: Vec<(String, String, String)> = schema
        .columns
        .iter()
        .map(|col| {
            (
                to_pascal_case(&col.name),
                map_sql_type_to_go(&col.base_type, col.nullable, col.is_unsigned),
                column_tag(col),
            )
        })
        .collect();

    let needs_time = fields.iter().any(|(_, ty, _)| ty.contains(TIME_TYPE));
    let needs_datatypes = fields.iter().any(|(_, ty, _)| ty.contains(JSON_TYPE));

    let mut out = format!("package {}\n\n", options.package);

    if needs_time || needs_datatypes || options.include_base_model {
        out.push_str("import (\n");
        if needs_time {
            out.push_str("\t\"time\"\n");
        }
        if needs_datatypes {
            out.push_str("\t\"gorm.io/datatypes\"\n");
        }
        if options.include_base_model {
            out.push_str("\t\"gorm.io/gorm\"\n");
        }
        out.push_str(")\n\n");
    }

    out.push_str(&format!(
        "const {} = \"{}\"\n\n",
        const_name, schema.table_name
    ));
    out.push_str(&format!("type {} struct {{\n", struct_name));

    if options.include_base_model {
        out.push_str("\tgorm.Model\n");
    }

    for (name, ty, tag) in &fields {
        out.push_str(&format!("\t{} {} `gorm:\"{}\"`\n", name, ty, tag));
    }

    for rel in relation_fields(&schema.columns, &schema.foreign_keys) {
        out.push_str(&format!(
            "\t{} *{} `gorm:\"foreignKey:{};references:{}\"`\n",
            rel.name, rel.target, rel.foreign_key, rel.references
        ));
    }

    out.push_str("}\n\n");
    out.push_str(&format!("func ({}) TableName() string {{\n", struct_name));
    out.push_str(&format!("\treturn {}\n", const_name));
    out.push_str("}\n");

    out
}
