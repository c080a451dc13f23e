use super::fields::{FieldSet, Record};

pub fn render_json(records: &[Record], fields: &FieldSet) -> serde_json::Result<String> {
    let projected: Vec<_> = records.iter().map(|r| r.project(fields)).collect();
    serde_json::to_string_pretty(&projected)
}
