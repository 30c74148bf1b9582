use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::fixtures::{area_rows, authority_rows, rows};
use uni_social::reports::export::write_csv;
use uni_social::reports::{ReportId, ReportSpec};

#[test]
fn test_cells_use_placeholders() {
    let spec = ReportSpec::area_demand();
    let data = area_rows();

    let cells: Vec<Vec<String>> = data
        .iter()
        .map(|row| spec.columns.iter().map(|c| row.cell(c)).collect())
        .collect();

    assert_eq!(cells[0], vec!["Matemáticas", "12", "3"]);
    assert_eq!(cells[1], vec!["Física", "7", "2"]);
    assert_eq!(cells[2], vec!["Química", "0", "0"]);
}

#[test]
fn test_missing_text_field_renders_dash() {
    let spec = ReportSpec::authority_ranking();
    let data = rows(json!([{ "score_autoridad": 10 }]));
    let cells: Vec<String> = spec.columns.iter().map(|c| data[0].cell(c)).collect();
    assert_eq!(cells, vec!["-", "-", "10"]);
}

#[test]
fn test_area_demand_sum_and_average_cards() {
    let summary = ReportSpec::area_demand().summarize(&area_rows());
    let values: Vec<(&str, &str)> = summary
        .metrics
        .iter()
        .map(|m| (m.label, m.value.as_str()))
        .collect();

    assert_eq!(
        values,
        vec![
            ("Áreas", "3"),
            ("Máx. solicitudes", "12"),
            ("Total solicitudes", "19"),
            ("Tutores promedio", "1.7"),
            ("Área más demandada", "Matemáticas"),
        ]
    );
}

#[test]
fn test_csv_export_has_rank_column() {
    let spec = ReportId::AuthorityRanking.spec();
    let mut buffer = Vec::new();
    let written = write_csv(&spec, &authority_rows(), &mut buffer).unwrap();
    assert_eq!(written, 2);

    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "#,Referente,Correo,Score");
    assert_eq!(lines[1], "1,Ana,a@x.edu,50");
    assert_eq!(lines[2], "2,Bo,b@x.edu,80");
}

#[test]
fn test_report_ids_parse_from_cli_names() {
    assert_eq!("authority".parse::<ReportId>().unwrap(), ReportId::AuthorityRanking);
    assert_eq!("areas".parse::<ReportId>().unwrap(), ReportId::AreaDemand);
    assert_eq!(ReportId::AreaDemand.to_string(), "demanda-areas");
    assert!("ventas".parse::<ReportId>().is_err());
}
