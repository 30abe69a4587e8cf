// Load → classify → save round trips through real files.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use platelunch_dedup::{classify, generate_links, LinkTemplate};
use platelunch_io::{load, save, LoadOptions, SaveOptions, SheetError};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

fn write_input(path: &Path) {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 0, "<COMPANY_name>").unwrap();
    ws.write_string(0, 1, " Company_Phone ").unwrap();
    ws.write_string(0, 2, "City").unwrap();

    ws.write_string(1, 0, "Ono Grindz").unwrap();
    ws.write_number(1, 1, 8085551234.0).unwrap();
    ws.write_string(1, 2, "Hilo").unwrap();
    // row 2 left empty
    ws.write_string(3, 0, "ono grindz").unwrap();
    ws.write_string(3, 1, "(808) 555-1234").unwrap();
    ws.write_string(3, 2, "Hilo").unwrap();

    ws.write_string(4, 0, "Da Kine").unwrap();
    ws.write_string(4, 1, "808-555-9876").unwrap();

    ws.write_string(5, 0, "aloha Poke").unwrap();
    ws.write_string(5, 1, "808-555-9876").unwrap();
    workbook.save(path).unwrap();
}

fn read_back(path: &Path) -> Vec<Vec<Data>> {
    let mut wb = open_workbook_auto(path).unwrap();
    let name = wb.sheet_names()[0].clone();
    let range = wb.worksheet_range(&name).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

#[test]
fn xlsx_load_strips_headers_and_empty_rows() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    write_input(&input);

    let (table, stats) = load(&input, &LoadOptions::default()).unwrap();
    assert_eq!(stats.empty_rows_dropped, 1);
    assert_eq!(table.records.len(), 4);
    assert_eq!(table.records[0].phone, "8085551234");
    assert_eq!(table.records[0].extra, vec!["Hilo".to_string()]);
    assert_eq!(table.layout.headers()[0], "COMPANY_name");
}

#[test]
fn xlsx_save_sorts_and_links() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    let output = dir.path().join("output.xlsx");
    write_input(&input);

    let (table, _) = load(&input, &LoadOptions::default()).unwrap();
    let out = classify(table.records);
    assert_eq!(out.exact_count, 2);
    assert_eq!(out.partial.len(), 2);

    let (records, _) = generate_links(out.records, &LinkTemplate::default());
    let result = save(&table.layout, records, &out.partial, &SaveOptions::default(), &output).unwrap();
    assert_eq!(result.rows_written, 3);
    assert_eq!(result.links_written, 3);
    assert_eq!(result.rows_highlighted, 2);

    let rows = read_back(&output);
    assert_eq!(
        rows[0],
        vec![
            Data::String("COMPANY_name".into()),
            Data::String("Company_Phone".into()),
            Data::String("City".into()),
            Data::String("Instagram_link".into()),
        ]
    );
    let names: Vec<String> = rows[1..].iter().map(|r| r[0].to_string()).collect();
    assert_eq!(names, vec!["aloha Poke", "Da Kine", "Ono Grindz"]);
    // Phones stay text, never numbers
    assert_eq!(rows[3][1], Data::String("8085551234".into()));
    assert_eq!(rows[1][3], Data::String("Instagram".into()));
}

#[test]
fn csv_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.csv");
    let output = dir.path().join("output.csv");
    std::fs::write(
        &input,
        "COMPANY_name,Company_Phone,Instagram_link\nZippy's,808-555-0101,\nAla Moana Poke,8085550102,https://instagram.com/amp\n,,\n",
    )
    .unwrap();

    let (table, stats) = load(&input, &LoadOptions::default()).unwrap();
    assert_eq!(stats.empty_rows_dropped, 1);
    assert_eq!(table.records[1].link.as_deref(), Some("https://instagram.com/amp"));

    save(&table.layout, table.records, &[], &SaveOptions::default(), &output).unwrap();
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "COMPANY_name,Company_Phone,Instagram_link\nAla Moana Poke,8085550102,https://instagram.com/amp\nZippy's,808-555-0101,\n"
    );
}

#[test]
fn missing_input_is_open_error() {
    let dir = tempdir().unwrap();
    let err = load(&dir.path().join("nope.xlsx"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, SheetError::Open { .. }));
}

#[test]
fn unknown_sheet_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    write_input(&input);
    let options = LoadOptions {
        sheet: Some("Listings".into()),
        ..Default::default()
    };
    let err = load(&input, &options).unwrap_err();
    assert!(matches!(err, SheetError::SheetNotFound(name) if name == "Listings"));
}

#[test]
fn legacy_workbook_output_refused() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.csv");
    std::fs::write(&input, "COMPANY_name,Company_Phone\nA,1\n").unwrap();
    let (table, _) = load(&input, &LoadOptions::default()).unwrap();
    let err = save(&table.layout, table.records, &[], &SaveOptions::default(), &dir.path().join("out.xls"))
        .unwrap_err();
    assert!(matches!(err, SheetError::UnsupportedFormat(_)));
}
