use std::fmt::Formatter;

/// A range reference in A1 notation, e.g. `'MoodTracker'!A:I`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(pub String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<A1Notation> for String {
    fn from(a1_notation: A1Notation) -> Self {
        a1_notation.0
    }
}

impl From<String> for A1Notation {
    fn from(s: String) -> Self {
        A1Notation(s)
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl A1Notation {
    /// Whole columns `first..=last` (zero-based) of a sheet.
    pub fn columns(sheet_title: &str, first: u32, last: u32) -> Self {
        A1Notation(format!(
            "{}!{}:{}",
            quote_sheet_title(sheet_title),
            column_letters(first),
            column_letters(last)
        ))
    }

    /// Cells `first..=last` (zero-based columns) of a single 1-based row.
    pub fn row(sheet_title: &str, row: u32, first: u32, last: u32) -> Self {
        A1Notation(format!(
            "{}!{}{row}:{}{row}",
            quote_sheet_title(sheet_title),
            column_letters(first),
            column_letters(last),
        ))
    }

    pub fn sheet_title(&self) -> Option<String> {
        let (title, _) = self.0.rsplit_once('!')?;
        let unquoted = title
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .map(|t| t.replace("''", "'"));
        Some(unquoted.unwrap_or_else(|| title.to_string()))
    }
}

/// Zero-based column index to letters: 0 -> A, 25 -> Z, 26 -> AA.
pub fn column_letters(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = index as u64 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Sheet titles are always quoted; embedded quotes are doubled.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}
