use pretty_assertions::assert_eq;
use sciloc::converter::{
    convert_csv_to_msg, convert_font_to_png_dir, convert_msg_to_csv, convert_png_dir_to_font,
    convert_text_to_tsv, convert_tsv_to_text, verify_msg_file,
};
use sciloc::prelude::*;
use std::collections::BTreeMap;
use tempfile::tempdir;

fn sample_font() -> FontTable {
    let mut grids = BTreeMap::new();
    grids.insert(5, GlyphGrid::from_rows(&[vec![true, false, true], vec![false, true, false]]));
    grids.insert(
        9,
        GlyphGrid::from_rows(&[vec![true; 10], vec![false; 10], vec![true; 10]]),
    );
    FontTable::from_grids(&grids, 0x87, 12).unwrap()
}

#[test]
fn test_font_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("font.000");
    let font = sample_font();

    write_font(&path, &font).unwrap();
    let read = read_font(&path).unwrap();
    assert_eq!(read, font);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(build_font_bytes(&read).unwrap(), bytes);
}

#[test]
fn test_font_gap_fill() {
    let font = sample_font();
    assert_eq!(font.num_chars(), 10);
    assert_eq!(font.drawable_count(), 2);

    let parsed = parse_font_bytes(&build_font_bytes(&font).unwrap()).unwrap();
    for index in (0..5).chain(6..9) {
        let glyph = parsed.glyph(index).unwrap();
        assert_eq!((glyph.width, glyph.height), (0, 0));
        assert!(glyph.bitmap.is_empty());
    }
    assert_eq!(parsed.glyph(9).unwrap().bitmap.len(), 2 * 3);
}

#[test]
fn test_font_png_directory_round_trip() {
    let dir = tempdir().unwrap();
    let font_path = dir.path().join("font.000");
    let png_dir = dir.path().join("font.000_png");
    let rebuilt_dir = dir.path().join("rebuilt");
    write_font(&font_path, &sample_font()).unwrap();

    let written = convert_font_to_png_dir(&font_path, &png_dir).unwrap();
    assert_eq!(written, 2);
    assert!(png_dir.join("5.png").exists());
    assert!(png_dir.join("9.png").exists());

    let rebuilt_path = convert_png_dir_to_font(&png_dir, &rebuilt_dir, 0x87, 12).unwrap();
    assert_eq!(read_font(&rebuilt_path).unwrap(), sample_font());
}

#[test]
fn test_msg_offsets_point_at_texts() {
    let mut table = MessageTable::new();
    table.records.push(MessageRecord::new(1, 1, 0, 1, "A"));
    table.records.push(MessageRecord::new(1, 2, 0, 1, "BB"));

    let bytes = build_msg_bytes(&table).unwrap();
    assert_eq!(bytes.len(), 12 + 2 * 11 + 2 + 3);
    // data_size covers everything after its own field
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 31);

    for (i, text) in [&b"A\0"[..], &b"BB\0"[..]].iter().enumerate() {
        let record = 12 + i * 11;
        let offset = usize::from(u16::from_le_bytes([bytes[record + 5], bytes[record + 6]]));
        let start = 2 + offset;
        assert_eq!(&bytes[start..start + text.len()], *text);
    }
}

#[test]
fn test_msg_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("100.msg");

    let mut table = MessageTable::new();
    table.last_id = 7;
    let mut referenced = MessageRecord::new(3, 0, 0, 2, "");
    referenced.talker = 99;
    referenced.ref_noun = 3;
    referenced.ref_sequence = 1;
    table.records.push(MessageRecord::new(3, 0, 0, 1, "Hello there."));
    table.records.push(referenced);
    table.refresh_offsets(&FallbackChain::with_primary(Codepage::Windows1255)).unwrap();

    write_msg(&path, &table).unwrap();
    let read = read_msg(&path).unwrap();
    assert_eq!(read, table);
    assert_eq!(build_msg_bytes(&read).unwrap(), std::fs::read(&path).unwrap());
}

#[test]
fn test_hebrew_survives_default_read_write() {
    let dir = tempdir().unwrap();
    let msg_path = dir.path().join("100.msg");
    let text_path = dir.path().join("text.100");

    let mut table = MessageTable::new();
    table.records.push(MessageRecord::new(1, 1, 0, 1, "Hello"));
    write_msg(&msg_path, &table).unwrap();

    let mut table = read_msg(&msg_path).unwrap();
    table.records[0].text = "שלום".to_string();
    write_msg(&msg_path, &table).unwrap();
    let reread = read_msg(&msg_path).unwrap();
    assert_eq!(reread.records[0].text, "שלום");
    write_msg(&msg_path, &reread).unwrap();
    assert_eq!(read_msg(&msg_path).unwrap(), reread);

    write_text(&text_path, &TextResource::from_strings(["שלום", "עולם"])).unwrap();
    let resource = read_text(&text_path).unwrap().resource;
    assert_eq!(resource.strings, vec!["שלום", "עולם"]);
    let bytes = std::fs::read(&text_path).unwrap();
    write_text(&text_path, &resource).unwrap();
    assert_eq!(std::fs::read(&text_path).unwrap(), bytes);
}

#[test]
fn test_msg_csv_round_trip_and_verify() {
    let dir = tempdir().unwrap();
    let msg_path = dir.path().join("200.msg");
    let csv_dir = dir.path().join("csv");
    let rebuilt_path = dir.path().join("200_new.msg");

    let mut table = MessageTable::new();
    table.records.push(MessageRecord::new(1, 0, 0, 1, "A line, with a comma"));
    table.records.push(MessageRecord::new(1, 0, 0, 2, "Two\nlines \"quoted\""));
    write_msg(&msg_path, &table).unwrap();

    let chain = FallbackChain::with_primary(Codepage::Windows1255);
    let (csv_path, count) = convert_msg_to_csv(&msg_path, &csv_dir, &chain).unwrap();
    assert_eq!(count, 2);
    assert_eq!(csv_path, csv_dir.join("200_messages.csv"));

    let rebuilt = convert_csv_to_msg(&csv_path, &rebuilt_path, &table, &chain).unwrap();
    assert_eq!(rebuilt.len(), 2);
    assert_eq!(
        std::fs::read(&rebuilt_path).unwrap(),
        std::fs::read(&msg_path).unwrap()
    );

    let report = verify_msg_file(&csv_path, &rebuilt_path, &chain).unwrap();
    assert!(report.passed());
    assert_eq!(report.compared, 2);
}

#[test]
fn test_text_tsv_round_trip() {
    let dir = tempdir().unwrap();
    let text_path = dir.path().join("300.tex");
    let tsv_dir = dir.path().join("tsv");
    let out_dir = dir.path().join("out");

    let resource = TextResource::from_strings(["Look", "", "Multi\nline"]);
    write_text(&text_path, &resource).unwrap();

    let (tsv_path, count, diagnostics) =
        convert_text_to_tsv(&text_path, &tsv_dir, Codepage::Windows1252).unwrap();
    assert_eq!(count, 3);
    assert!(diagnostics.is_empty());

    let chain = FallbackChain::with_primary(Codepage::Windows1255);
    let built = convert_tsv_to_text(&tsv_path, &out_dir, &chain, true).unwrap();
    assert_eq!(built.entries, 3);
    assert_eq!(
        std::fs::read(&built.text_path).unwrap(),
        std::fs::read(&text_path).unwrap()
    );

    let selectors = read_text(built.selector_path.unwrap()).unwrap().resource;
    assert_eq!(selectors.strings, vec![String::new(); 3]);
}

#[test]
fn test_batch_with_one_bad_file() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();

    let mut table = MessageTable::new();
    table.records.push(MessageRecord::new(1, 1, 1, 1, "ok"));
    write_msg(source.path().join("1.msg"), &table).unwrap();
    std::fs::create_dir(source.path().join("sub")).unwrap();
    write_msg(source.path().join("sub").join("2.msg"), &table).unwrap();
    // Header claims records that are not there
    std::fs::write(source.path().join("3.msg"), [0x0F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5, 0]).unwrap();
    std::fs::write(source.path().join("notes.txt"), "ignored").unwrap();

    let files = find_resource_files(source.path(), ResourceKind::Message);
    assert_eq!(files.len(), 3);

    let chain = FallbackChain::with_primary(Codepage::Cp862);
    let result = batch_convert(
        &files,
        source.path(),
        dest.path(),
        |path, out_dir| {
            let (_, count) = convert_msg_to_csv(path, out_dir, &chain)?;
            Ok(format!("{count} messages"))
        },
        |_| {},
    );

    assert_eq!(result.success_count, 2);
    assert_eq!(result.fail_count, 1);
    assert!(dest.path().join("1_messages.csv").exists());
    assert!(dest.path().join("sub").join("2_messages.csv").exists());
}
