use std::collections::BTreeSet;
use std::fs;

use calamine::{DataType, Reader, open_workbook_auto};
use gradesheet::ProcessError;
use gradesheet::engine;
use gradesheet::io::excel_read;
use gradesheet::model::{Session, SheetLayout};
use gradesheet::report;
use gradesheet::roster::{self, RosterOptions};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (row_index, row) in rows.iter().enumerate() {
        for (column_index, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            sheet
                .write_string(row_index as u32, column_index as u16, *cell)
                .expect("cell written");
        }
    }
    workbook.save_to_buffer().expect("workbook serialised")
}

fn build_session(results_rows: &[&[&str]], roster_rows: &[&[&str]]) -> Session {
    let results = excel_read::read_table(&workbook_bytes(results_rows)).expect("results decoded");
    let roster =
        roster::parse(&workbook_bytes(roster_rows), RosterOptions::default()).expect("roster parsed");
    let selected_groups: BTreeSet<String> = roster.groups().into_iter().collect();

    Session {
        results: Some(results),
        roster: Some(roster),
        selected_groups,
        ..Session::default()
    }
}

fn sample_results_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["ФИО", "Лекционный тест 1", "Лабораторный тест 1", "Итоговый тест"],
        vec!["Иванов Иван", "8,5", "9", "-"],
        vec!["Смирнова Анна", "10", "7", "6"],
    ]
}

fn sample_roster_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Журнал курса"],
        vec!["ФИО", "Группа"],
        vec!["Иванов Иван", "Группа 101"],
        vec!["Петров Пётр", "Группа 102"],
        vec!["Смирнова Анна", "Группа 101"],
    ]
}

fn as_slices<'a>(rows: &'a [Vec<&'a str>]) -> Vec<&'a [&'a str]> {
    rows.iter().map(|row| row.as_slice()).collect()
}

#[test]
fn end_to_end_reports_split_groups_into_sheets() {
    let results_rows = sample_results_rows();
    let roster_rows = sample_roster_rows();
    let session = build_session(&as_slices(&results_rows), &as_slices(&roster_rows));

    let outcome = engine::process(&session).expect("processing succeeded");
    assert_eq!(outcome.files.len(), 3);
    assert_eq!(outcome.matched_count, 2);
    assert_eq!(outcome.unmatched_count, 1);

    let dir = tempdir().expect("temporary directory");
    for file in &outcome.files {
        fs::write(dir.path().join(&file.filename), &file.bytes).expect("report written");
    }

    let lecture_path = dir.path().join("Лекции_результаты.xlsx");
    let mut workbook = open_workbook_auto(&lecture_path).expect("report opened");
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec!["Группа 101", "Группа 102"]
    );

    let range = workbook
        .worksheet_range("Группа 101")
        .expect("sheet present")
        .expect("sheet decoded");
    assert_eq!(range.get_value((0, 0)), Some(&DataType::String("ФИО".to_string())));
    assert_eq!(range.get_value((0, 1)), Some(&DataType::String("Группа".to_string())));
    assert_eq!(
        range.get_value((0, 2)),
        Some(&DataType::String("Лекционный тест 1".to_string()))
    );
    assert_eq!(
        range.get_value((1, 0)),
        Some(&DataType::String("Иванов Иван".to_string()))
    );
    assert_eq!(range.get_value((1, 2)), Some(&DataType::Float(4.0)));
    assert_eq!(
        range.get_value((2, 0)),
        Some(&DataType::String("Смирнова Анна".to_string()))
    );
    assert_eq!(range.get_value((2, 2)), Some(&DataType::Float(5.0)));

    let range = workbook
        .worksheet_range("Группа 102")
        .expect("sheet present")
        .expect("sheet decoded");
    assert_eq!(
        range.get_value((1, 0)),
        Some(&DataType::String("Петров Пётр".to_string()))
    );
    assert_eq!(range.get_value((1, 2)), Some(&DataType::String("н".to_string())));
}

#[test]
fn flat_layout_puts_all_groups_on_one_sheet() {
    let results_rows = sample_results_rows();
    let roster_rows = sample_roster_rows();
    let mut session = build_session(&as_slices(&results_rows), &as_slices(&roster_rows));
    session.layout = SheetLayout::Flat;

    let outcome = engine::process(&session).expect("processing succeeded");

    let dir = tempdir().expect("temporary directory");
    for file in &outcome.files {
        fs::write(dir.path().join(&file.filename), &file.bytes).expect("report written");
    }

    let lecture_path = dir.path().join("Лекции_результаты.xlsx");
    let mut workbook = open_workbook_auto(&lecture_path).expect("report opened");
    assert_eq!(workbook.sheet_names().to_vec(), vec!["Лекции"]);

    let range = workbook
        .worksheet_range("Лекции")
        .expect("sheet present")
        .expect("sheet decoded");
    assert_eq!(
        range.get_value((1, 0)),
        Some(&DataType::String("Иванов Иван".to_string()))
    );
    assert_eq!(
        range.get_value((2, 0)),
        Some(&DataType::String("Петров Пётр".to_string()))
    );
    assert_eq!(
        range.get_value((3, 0)),
        Some(&DataType::String("Смирнова Анна".to_string()))
    );
    assert_eq!(
        range.get_value((2, 1)),
        Some(&DataType::String("Группа 102".to_string()))
    );

    let final_path = dir.path().join("Итоговые_результаты.xlsx");
    let mut workbook = open_workbook_auto(&final_path).expect("report opened");
    assert_eq!(workbook.sheet_names().to_vec(), vec!["Итоговые"]);
}

#[test]
fn reports_never_mention_unselected_groups() {
    let results_rows = sample_results_rows();
    let roster_rows = sample_roster_rows();
    let mut session = build_session(&as_slices(&results_rows), &as_slices(&roster_rows));
    session.selected_groups = ["Группа 101".to_string()].into_iter().collect();

    let outcome = engine::process(&session).expect("processing succeeded");
    assert_eq!(outcome.matched_count, 2);
    assert_eq!(outcome.unmatched_count, 0);

    let dir = tempdir().expect("temporary directory");
    for file in &outcome.files {
        fs::write(dir.path().join(&file.filename), &file.bytes).expect("report written");
    }

    for file in &outcome.files {
        let mut workbook =
            open_workbook_auto(dir.path().join(&file.filename)).expect("report opened");
        assert_eq!(workbook.sheet_names().to_vec(), vec!["Группа 101"]);

        let range = workbook
            .worksheet_range("Группа 101")
            .expect("sheet present")
            .expect("sheet decoded");
        for row in range.rows().skip(1) {
            assert_eq!(row[1], DataType::String("Группа 101".to_string()));
            assert_ne!(row[0], DataType::String("Петров Пётр".to_string()));
        }
    }
}

#[test]
fn sheet_names_truncate_to_the_excel_limit() {
    let results_rows = sample_results_rows();
    let roster_rows = vec![
        vec!["Журнал курса"],
        vec!["ФИО", "Группа"],
        vec!["Иванов Иван", "Математическое-моделирование-2023"],
    ];
    let session = build_session(&as_slices(&results_rows), &as_slices(&roster_rows));

    let outcome = engine::process(&session).expect("processing succeeded");

    let dir = tempdir().expect("temporary directory");
    for file in &outcome.files {
        fs::write(dir.path().join(&file.filename), &file.bytes).expect("report written");
    }

    let lecture_path = dir.path().join("Лекции_результаты.xlsx");
    let workbook = open_workbook_auto(&lecture_path).expect("report opened");
    let names = workbook.sheet_names().to_vec();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].chars().count(), 31);
    assert_eq!(names[0], "Математическое-моделирование-20");
}

#[test]
fn results_without_a_header_row_fail_to_decode() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    let bytes = workbook.save_to_buffer().expect("workbook serialised");

    let error = excel_read::read_table(&bytes).expect_err("header row required");
    assert!(matches!(error, ProcessError::InvalidSheet(_)));
}

#[test]
fn sheet_names_replace_forbidden_characters() {
    assert_eq!(report::sanitize_sheet_name("Group: A/B"), "Group_ A_B");
    assert_eq!(report::sanitize_sheet_name("Группа [1]"), "Группа _1_");
    assert_eq!(report::sanitize_sheet_name("   "), "Sheet");
}
