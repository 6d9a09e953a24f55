use sheet_bridge::utils::{
    ParsedRange, RangeBounds, cell_address, column_letter_to_number, column_number_to_letter,
    parse_cell_ref, parse_range_ref, rgb_to_color,
};

#[test]
fn column_letters_round_trip() {
    assert_eq!(column_number_to_letter(1), "A");
    assert_eq!(column_number_to_letter(26), "Z");
    assert_eq!(column_number_to_letter(27), "AA");
    assert_eq!(column_number_to_letter(702), "ZZ");
    assert_eq!(column_number_to_letter(703), "AAA");

    assert_eq!(column_letter_to_number("A"), Some(1));
    assert_eq!(column_letter_to_number("Z"), Some(26));
    assert_eq!(column_letter_to_number("AA"), Some(27));
    assert_eq!(column_letter_to_number("zz"), Some(702));
    assert_eq!(column_letter_to_number(""), None);
    assert_eq!(column_letter_to_number("A1"), None);

    assert_eq!(cell_address(1, 1), "A1");
    assert_eq!(cell_address(28, 42), "AB42");
}

#[test]
fn rgb_packs_into_bgr_integer() {
    assert_eq!(rgb_to_color(0, 0, 0), 0);
    assert_eq!(rgb_to_color(255, 0, 0), 255);
    assert_eq!(rgb_to_color(0, 255, 0), 65_280);
    assert_eq!(rgb_to_color(0, 0, 255), 16_711_680);
    for (r, g, b) in [(1u8, 2u8, 3u8), (255, 255, 255), (17, 0, 200)] {
        assert_eq!(
            rgb_to_color(r, g, b),
            r as u32 + g as u32 * 256 + b as u32 * 65536
        );
    }
}

#[test]
fn parses_cell_references() {
    assert_eq!(parse_cell_ref("A1"), Some((1, 1)));
    assert_eq!(parse_cell_ref("AB42"), Some((28, 42)));
    assert_eq!(parse_cell_ref("$C$9"), Some((3, 9)));
    assert_eq!(parse_cell_ref("A0"), None);
    assert_eq!(parse_cell_ref("42"), None);
    assert_eq!(parse_cell_ref(""), None);
}

#[test]
fn parses_rectangular_ranges() {
    assert_eq!(
        parse_range_ref("A1:B10"),
        Some(ParsedRange::Cells(RangeBounds {
            start_col: 1,
            start_row: 1,
            end_col: 2,
            end_row: 10,
        }))
    );
    // Reversed corners normalize.
    assert_eq!(parse_range_ref("B10:A1"), parse_range_ref("A1:B10"));
    assert_eq!(
        parse_range_ref("C3"),
        Some(ParsedRange::Cells(RangeBounds::cell(3, 3)))
    );
}

#[test]
fn parses_whole_column_and_row_ranges() {
    assert_eq!(
        parse_range_ref("A:C"),
        Some(ParsedRange::Columns { start: 1, end: 3 })
    );
    assert_eq!(
        parse_range_ref("C:A"),
        Some(ParsedRange::Columns { start: 1, end: 3 })
    );
    assert_eq!(
        parse_range_ref("2:5"),
        Some(ParsedRange::Rows { start: 2, end: 5 })
    );
    assert_eq!(parse_range_ref("0:3"), None);
}

#[test]
fn rejects_malformed_addresses() {
    assert_eq!(parse_range_ref(""), None);
    assert_eq!(parse_range_ref("???"), None);
    assert_eq!(parse_range_ref("A1:B"), None);
    assert_eq!(parse_range_ref("1A"), None);
}

#[test]
fn bounds_address_rendering() {
    assert_eq!(RangeBounds::cell(1, 1).to_address(), "A1");
    assert_eq!(
        RangeBounds {
            start_col: 1,
            start_row: 1,
            end_col: 2,
            end_row: 2,
        }
        .to_address(),
        "A1:B2"
    );
}
