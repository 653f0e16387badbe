//! Row/column labels for the 16-column memory grid.

/// Number of cells per rendered row.
pub const COLUMNS: usize = 16;
/// Hex digits used for column labels.
pub const COLUMN_LABEL_WIDTH: usize = 1;
/// Hex digits used for row labels.
pub const ROW_LABEL_WIDTH: usize = 3;

/// Formats `value` as zero-padded uppercase hex of at least `width` digits.
#[must_use]
pub fn format_hex(value: usize, width: usize) -> String {
    format!("{value:0width$X}")
}

/// Labels `0`..`F` for the grid columns.
#[must_use]
pub fn column_labels() -> Vec<String> {
    (0..COLUMNS)
        .map(|column| format_hex(column, COLUMN_LABEL_WIDTH))
        .collect()
}

/// One label per row of `size / 16` rows.
#[must_use]
pub fn row_labels(size: usize) -> Vec<String> {
    (0..size / COLUMNS)
        .map(|row| format_hex(row, ROW_LABEL_WIDTH))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{column_labels, format_hex, row_labels};

    #[test]
    fn column_labels_cover_one_hex_digit() {
        let labels = column_labels();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels.first().map(String::as_str), Some("0"));
        assert_eq!(labels.last().map(String::as_str), Some("F"));
    }

    #[test]
    fn row_labels_are_three_digit_row_indexes() {
        let labels = row_labels(1024);
        assert_eq!(labels.len(), 64);
        assert_eq!(labels[0], "000");
        assert_eq!(labels[10], "00A");
        assert_eq!(labels[63], "03F");
    }

    #[test]
    fn format_hex_pads_and_uppercases() {
        assert_eq!(format_hex(0xA, 2), "0A");
        assert_eq!(format_hex(0xFF, 2), "FF");
        assert_eq!(format_hex(0x1234, 2), "1234");
    }
}
