use super::fields::{FieldSet, Record};

pub fn render_yaml(records: &[Record], fields: &FieldSet) -> Result<String, serde_yaml_ng::Error> {
    let projected: Vec<_> = records.iter().map(|r| r.project(fields)).collect();
    serde_yaml_ng::to_string(&projected)
}
