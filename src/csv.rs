// src/csv.rs
//
// CSV/TSV writing for the student list (clipboard copy, file export).

use std::io::{self, Write};

use crate::model::Record;

pub const HEADERS: [&str; 5] = ["Full name", "Class", "Date of birth", "Created", "Id"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delim {
    Csv,
    Tsv,
}

impl Delim {
    pub fn sep(self) -> char {
        match self { Delim::Csv => ',', Delim::Tsv => '\t' }
    }
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one row, quoting cells that need it.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{sep}")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// Cells as the list view shows them.
pub fn record_row(r: &Record) -> [String; 5] {
    [
        r.full_name.clone(),
        r.class_name.clone(),
        r.dob_display(),
        r.created_display(),
        r.id.clone(),
    ]
}

/// Full table as text: optional header line, then one line per record.
pub fn to_export_string(records: &[&Record], include_headers: bool, delim: Delim) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let sep = delim.sep();

    // Writes into a Vec cannot fail.
    if include_headers {
        let _ = write_row(&mut buf, &HEADERS, sep);
    }
    for r in records {
        let _ = write_row(&mut buf, &record_row(r), sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, class: &str) -> Record {
        Record {
            id: "7".into(),
            full_name: name.into(),
            class_name: class.into(),
            dob: "2008-05-04".into(),
            created_at: None,
        }
    }

    #[test]
    fn quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["plain", "a,b", "say \"hi\""], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "plain,\"a,b\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn export_with_and_without_headers() {
        let a = rec("Nguyễn Văn Minh", "12A1");
        let b = rec("Lê, Thị C", "10C");
        let rows = vec![&a, &b];

        let tsv = to_export_string(&rows, false, Delim::Tsv);
        assert_eq!(tsv, "Nguyễn Văn Minh\t12A1\t04/05/2008\tN/A\t7\nLê, Thị C\t10C\t04/05/2008\tN/A\t7\n");

        let csv = to_export_string(&rows, true, Delim::Csv);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Full name,Class,Date of birth,Created,Id"));
        assert_eq!(lines.nth(1), Some("\"Lê, Thị C\",10C,04/05/2008,N/A,7"));
    }
}
