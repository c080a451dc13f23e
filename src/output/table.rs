use super::fields::{FieldSet, Record};
use tabled::{builder::Builder, settings::Style};

/// Renders records as a grid with one column per selected field.
pub fn render_table(records: &[Record], fields: &FieldSet) -> String {
    let mut builder = Builder::default();
    builder.push_record(fields.names().into_iter().map(String::from));

    for record in records {
        builder.push_record(
            fields
                .as_slice()
                .iter()
                .map(|field| record.get(*field).to_cell()),
        );
    }

    builder.build().with(Style::rounded()).to_string()
}
