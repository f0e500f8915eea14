//! Plain-text table rendering for the console shell

use tunebook_common::db::TuneRow;

/// Columns the shell can project a [`TuneRow`] onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    BookNumber,
    Title,
    TuneType,
}

impl Column {
    fn header(self) -> &'static str {
        match self {
            Column::BookNumber => "book_number",
            Column::Title => "title",
            Column::TuneType => "tune_type",
        }
    }

    fn cell(self, row: &TuneRow) -> String {
        match self {
            Column::BookNumber => row.book_number.to_string(),
            Column::Title => row.title.clone().unwrap_or_default(),
            Column::TuneType => row.tune_type.clone().unwrap_or_default(),
        }
    }

    fn right_aligned(self) -> bool {
        matches!(self, Column::BookNumber)
    }
}

/// Render `rows` projected onto `columns`, one line per row, header first
///
/// Every line ends with a newline; trailing padding is trimmed.
pub fn render_rows<'a>(rows: impl IntoIterator<Item = &'a TuneRow>, columns: &[Column]) -> String {
    let cells: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| columns.iter().map(|c| c.cell(row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|line| line[i].chars().count())
                .chain(std::iter::once(column.header().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
    for line in std::iter::once(&header).chain(cells.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(columns)
            .zip(&widths)
            .map(|((text, column), &width)| pad(text, width, column.right_aligned()))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Render value counts as two aligned columns
pub fn render_counts(counts: &[(String, usize)]) -> String {
    let width = counts
        .iter()
        .map(|(value, _)| value.chars().count())
        .max()
        .unwrap_or(0);

    counts
        .iter()
        .map(|(value, n)| format!("{}  {}\n", pad(value, width, false), n))
        .collect()
}

fn pad(text: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
    if right {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}
