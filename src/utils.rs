//! Column-letter codec, color packing, and A1-notation parsing helpers.

/// Convert a 1-based column number to its letter form (1 -> "A", 27 -> "AA").
pub fn column_number_to_letter(column: u32) -> String {
    let mut column = column;
    let mut name = String::new();
    while column > 0 {
        let rem = ((column - 1) % 26) as u8;
        name.insert(0, (b'A' + rem) as char);
        column = (column - 1) / 26;
    }
    name
}

/// Convert column letters to a 1-based column number ("A" -> 1, "AA" -> 27).
///
/// Lowercase letters are accepted; anything else returns `None`.
pub fn column_letter_to_number(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut value: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        value = value.checked_mul(26)?.checked_add(digit)?;
    }
    Some(value)
}

/// Pack an RGB triple into the BGR color integer the host application uses.
pub fn rgb_to_color(r: u8, g: u8, b: u8) -> u32 {
    r as u32 + g as u32 * 256 + b as u32 * 65536
}

/// A1-style address for a (column, row) pair, both 1-based.
pub fn cell_address(column: u32, row: u32) -> String {
    format!("{}{}", column_number_to_letter(column), row)
}

/// Rectangular cell bounds, all coordinates 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBounds {
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

impl RangeBounds {
    pub fn cell(col: u32, row: u32) -> Self {
        Self {
            start_col: col,
            start_row: row,
            end_col: col,
            end_row: row,
        }
    }

    /// Normalize so that start <= end on both axes.
    pub fn normalized(self) -> Self {
        Self {
            start_col: self.start_col.min(self.end_col),
            start_row: self.start_row.min(self.end_row),
            end_col: self.start_col.max(self.end_col),
            end_row: self.start_row.max(self.end_row),
        }
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    pub fn intersects(&self, other: &RangeBounds) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }

    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn column_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    /// A1 form: single cells render as "A1", rectangles as "A1:B2".
    pub fn to_address(&self) -> String {
        if self.start_col == self.end_col && self.start_row == self.end_row {
            cell_address(self.start_col, self.start_row)
        } else {
            format!(
                "{}:{}",
                cell_address(self.start_col, self.start_row),
                cell_address(self.end_col, self.end_row)
            )
        }
    }
}

/// A parsed A1-notation reference. Whole-column and whole-row forms carry no
/// row/column extent of their own; the engine clamps them to the sheet's used
/// area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedRange {
    Cells(RangeBounds),
    Columns { start: u32, end: u32 },
    Rows { start: u32, end: u32 },
}

/// Parse a single cell reference like "B7" (absolute markers tolerated).
pub fn parse_cell_ref(text: &str) -> Option<(u32, u32)> {
    let text = text.replace('$', "");
    let split = text.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = text.split_at(split);
    let col = column_letter_to_number(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((col, row))
}

/// Parse an A1-notation range: "A1", "A1:B10", "A:C", or "2:5".
pub fn parse_range_ref(address: &str) -> Option<ParsedRange> {
    let address = address.trim().replace('$', "");
    if address.is_empty() {
        return None;
    }

    let Some((left, right)) = address.split_once(':') else {
        let (col, row) = parse_cell_ref(&address)?;
        return Some(ParsedRange::Cells(RangeBounds::cell(col, row)));
    };

    if let (Some(start), Some(end)) = (column_letter_to_number(left), column_letter_to_number(right))
    {
        return Some(ParsedRange::Columns {
            start: start.min(end),
            end: start.max(end),
        });
    }
    if let (Ok(start), Ok(end)) = (left.parse::<u32>(), right.parse::<u32>()) {
        if start == 0 || end == 0 {
            return None;
        }
        return Some(ParsedRange::Rows {
            start: start.min(end),
            end: start.max(end),
        });
    }

    let (start_col, start_row) = parse_cell_ref(left)?;
    let (end_col, end_row) = parse_cell_ref(right)?;
    Some(ParsedRange::Cells(
        RangeBounds {
            start_col,
            start_row,
            end_col,
            end_row,
        }
        .normalized(),
    ))
}
