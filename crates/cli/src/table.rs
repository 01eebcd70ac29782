//! Bordered text tables for status output.

/// A table with a header row.
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);
        (0..columns)
            .map(|i| {
                std::iter::once(&self.header)
                    .chain(&self.rows)
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let separator = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );
        let line = |row: &[String]| {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let pad = w - cell.chars().count();
                    format!(" {}{} ", cell, " ".repeat(pad))
                })
                .collect();
            format!("|{}|", cells.join("|"))
        };

        let mut out = vec![separator.clone(), line(&self.header), separator.clone()];
        out.extend(self.rows.iter().map(|row| line(row)));
        out.push(separator);
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pads_columns() {
        let mut table = Table::new(["Position", "File name"]);
        table.row(["1", "a-long-name.png"]);
        table.row(["2", "b.png"]);

        let expected = "\
+----------+-----------------+
| Position | File name       |
+----------+-----------------+
| 1        | a-long-name.png |
| 2        | b.png           |
+----------+-----------------+";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_render_counts_characters_not_bytes() {
        let mut table = Table::new(["Title"]);
        table.row(["Kätzchen"]);
        assert!(table.render().contains("| Kätzchen |"));
    }
}
