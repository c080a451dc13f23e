//! CSV renderer.
//!
//! Fields containing commas, double quotes, or newlines are quoted (RFC 4180).

use super::fields::{FieldSet, Record};

pub fn render_csv(records: &[Record], fields: &FieldSet) -> String {
    let mut out = String::new();

    out.push_str(&fields.names().join(","));
    out.push('\n');

    for record in records {
        let row: Vec<String> = fields
            .as_slice()
            .iter()
            .map(|field| escape_csv_field(&record.get(*field).to_cell()))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Double quotes within a quoted field are escaped by doubling them.
fn escape_csv_field(s: &str) -> String {
    let needs_quoting = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');

    if needs_quoting {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Package, Vulnerability};

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_render_csv_rows() {
        let vuln = Vulnerability::new(42, "XSS, stored", Package::plugin("akismet"));
        let records = vec![Record::flatten(&vuln).for_machine()];
        let fields = FieldSet::parse("id,title,fixed_in").unwrap();

        let csv = render_csv(&records, &fields);

        assert_eq!(csv, "id,title,fixed_in\n42,\"XSS, stored\",\n");
    }

    #[test]
    fn test_render_csv_header_only_when_empty() {
        let fields = FieldSet::parse("id,title").unwrap();
        assert_eq!(render_csv(&[], &fields), "id,title\n");
    }
}
