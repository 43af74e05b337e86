//! Foreign keys implied by column names.
//!
//! A column `<base>_id` is taken to reference `id` in the first existing
//! table among `<base>`, `<base>s` and, when `<base>` ends in `y`,
//! `<bas>ies`. A table never references itself this way.

use std::collections::HashSet;

use crate::models::schema::{Column, ForeignKey};

const ID_SUFFIX: &str = "_id";

fn candidate_tables(base: &str) -> Vec<String> {
    let mut candidates = vec![base.to_string(), format!("{}s", base)];
    if let Some(stem) = base.strip_suffix('y') {
        candidates.push(format!("{}ies", stem));
    }
    candidates
}

pub fn infer_foreign_keys(table: &str, columns: &[Column], tables: &[String]) -> Vec<ForeignKey> {
    let known: HashSet<&str> = tables.iter().map(String::as_str).collect();

    columns
        .iter()
        .filter_map(|col| {
            let base = col.name.strip_suffix(ID_SUFFIX)?;
            candidate_tables(base)
                .into_iter()
                .filter(|candidate| candidate != table)
                .find(|candidate| known.contains(candidate.as_str()))
                .map(|candidate| ForeignKey::new(&col.name, &candidate, "id"))
        })
        .collect()
}

/// Declared keys first, in order, then each inferred key whose
/// (column, table, column) triple has not been seen yet.
pub fn merge_foreign_keys(existing: Vec<ForeignKey>, inferred: Vec<ForeignKey>) -> Vec<ForeignKey> {
    let mut seen: HashSet<ForeignKey> = existing.iter().cloned().collect();
    let mut merged = existing;

    for fk in inferred {
        if seen.insert(fk.clone()) {
            merged.push(fk);
        }
    }
    merged
}
