/// Serializes rows as CSV text
///
/// The dialect is deliberately small: cells are quoted only when they
/// contain a comma, a double quote, or a line feed; quotes are doubled
/// inside quoted cells; rows join with a line feed.
///
/// ### Arguments
///
/// * `rows` - The table to encode, row by row
///
/// ### Returns
///
/// The encoded text, without a trailing newline
pub fn to_csv(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape_cell(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_cell(cell: &str) -> String {
    if cell.contains(['"', ',', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Parses CSV text into rows of cells
///
/// Accepts `\r\n`, `\n`, and a bare `\r` as row breaks. Quoted cells may
/// span line breaks; a doubled quote inside a quoted cell encodes one
/// literal quote. The parser never fails: malformed quoting degrades to
/// whatever cells the state machine yields, and ragged rows are left for
/// the import routines to validate.
///
/// A cell only comes into existence once a character is read at its
/// position, so input ending right after a comma or a row break does not
/// grow a trailing empty cell or row, and a single blank final line is
/// dropped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut slot_started = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        slot_started = true;
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => {
                    row.push(std::mem::take(&mut cell));
                    slot_started = false;
                }
                '\n' | '\r' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                    slot_started = false;
                }
                _ => cell.push(ch),
            }
        }
    }

    // Only a slot some character actually reached becomes a cell
    if slot_started {
        row.push(cell);
    }
    if !row.is_empty() {
        rows.push(row);
    }
    if rows
        .last()
        .is_some_and(|last| last.len() == 1 && last[0].is_empty())
    {
        rows.pop();
    }
    rows
}

/// Case-insensitive access to parsed CSV rows by header name
///
/// Header names are trimmed, lowercased, and stripped of a leading byte
/// order mark, so files exported from spreadsheet tools resolve the same
/// as files this crate wrote itself.
pub struct HeaderMap {
    headers: Vec<String>,
}

impl HeaderMap {
    pub fn new(header_row: &[String]) -> Self {
        let headers = header_row
            .iter()
            .map(|h| {
                h.trim()
                    .trim_start_matches(['\u{FEFF}', '\u{FFFE}'])
                    .to_lowercase()
            })
            .collect();
        Self { headers }
    }

    /// The number of recognized header columns
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Whether the named column is present
    pub fn contains(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.headers.iter().any(|h| *h == wanted)
    }

    /// Returns the trimmed cell under the named column, or "" when the
    /// column or the cell is missing
    pub fn get<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        let wanted = name.to_lowercase();
        match self.headers.iter().position(|h| *h == wanted) {
            Some(index) => row.get(index).map(|cell| cell.trim()).unwrap_or(""),
            None => "",
        }
    }
}
