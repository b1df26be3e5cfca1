//! Tests for the curate module

use super::*;
use crate::flatten::{Cell, Row, TabularBatch};
use pretty_assertions::assert_eq;
use test_case::test_case;

const PROJECT_X_ID: &str = "b099a835-5470-55a5-8d50-dd922dc43746";

fn row(cells: &[(&str, Cell)]) -> Row {
    cells.iter().cloned().collect()
}

// ============================================================================
// Column Name Normalization
// ============================================================================

#[test_case("Código do Projeto", "codigo_do_projeto" ; "accents and spaces")]
#[test_case("Valor_Total_do_Orçamento", "valor_total_do_orcamento" ; "cedilla")]
#[test_case("Valor Total (R$)", "valor_total_r" ; "punctuation run")]
#[test_case("__Status__", "status" ; "trimmed underscores")]
#[test_case("item_id", "item_id" ; "already normal")]
#[test_case("Área--Temática  2", "area_tematica_2" ; "mixed separators")]
fn test_normalize_column_name(input: &str, expected: &str) {
    assert_eq!(normalize_column_name(input), expected);
}

// ============================================================================
// Stable Identifier
// ============================================================================

#[test]
fn test_stable_id_is_deterministic() {
    assert_eq!(stable_id("Project X").to_string(), PROJECT_X_ID);
    assert_eq!(stable_id("  project x ").to_string(), PROJECT_X_ID);
    assert_eq!(stable_id("PROJECT X"), stable_id("project x"));
    assert_ne!(stable_id("project y"), stable_id("project x"));
}

// ============================================================================
// Monetary Aggregation
// ============================================================================

#[test_case(Some("1.000,50 | 2.000,25"), 3000.75 ; "thousands and decimals")]
#[test_case(Some("abc | 10,00"), 10.0 ; "unparseable part skipped")]
#[test_case(Some("10 | 20 | 30"), 60.0 ; "integers")]
#[test_case(Some("5,5"), 5.5 ; "single value")]
#[test_case(Some(" | "), 0.0 ; "only separators")]
#[test_case(Some(""), 0.0 ; "empty")]
#[test_case(None, 0.0 ; "null")]
fn test_sum_pipe_delimited(input: Option<&str>, expected: f64) {
    assert!((sum_pipe_delimited(input) - expected).abs() < 1e-9);
}

// ============================================================================
// Curator
// ============================================================================

#[test]
fn test_curate_row_uses_item_name_key() {
    let curator = Curator::default();
    let curated = curator.curate_row(&row(&[
        ("item_id", "1".into()),
        ("item_name", "  Project X".into()),
        ("Valor_Total_do_Orçamento", "1.000,50 | 2.000,25".into()),
        ("Responsável", "Ana".into()),
    ]));

    assert_eq!(
        curated.columns().collect::<Vec<_>>(),
        vec![
            "item_id",
            "item_name",
            "valor_total_do_orcamento",
            "responsavel",
            "id_projeto"
        ]
    );
    assert_eq!(curated.get_text(PROJECT_ID), Some(PROJECT_X_ID));
    assert_eq!(
        curated.get("valor_total_do_orcamento"),
        Some(&Cell::Number(3000.75))
    );
    assert_eq!(curated.get_text("item_name"), Some("  Project X"));
}

#[test]
fn test_curate_row_prefers_project_code() {
    let curator = Curator::default();
    let with_code = curator.curate_row(&row(&[
        ("item_name", "Some name".into()),
        ("Código_do_Projeto", "Project X".into()),
    ]));
    assert_eq!(with_code.get_text(PROJECT_ID), Some(PROJECT_X_ID));

    let blank_code = curator.curate_row(&row(&[
        ("item_name", "project x".into()),
        ("Código_do_Projeto", "   ".into()),
    ]));
    assert_eq!(blank_code.get_text(PROJECT_ID), Some(PROJECT_X_ID));
}

#[test]
fn test_curate_row_without_key_has_null_id() {
    let curated = Curator::default().curate_row(&row(&[("item_name", Cell::Null)]));
    assert_eq!(curated.get(PROJECT_ID), Some(&Cell::Null));
}

#[test]
fn test_curate_row_id_is_pure_function_of_key() {
    let curator = Curator::default();
    let a = curator.curate_row(&row(&[("item_id", "1".into()), ("item_name", "P".into())]));
    let b = curator.curate_row(&row(&[
        ("item_id", "2".into()),
        ("item_name", "p ".into()),
        ("extra", "x".into()),
    ]));
    assert_eq!(a.get(PROJECT_ID), b.get(PROJECT_ID));
}

#[test]
fn test_curate_row_normalization_collisions_get_suffixes() {
    let curated = Curator::default().curate_row(&row(&[
        ("item_name", "p".into()),
        ("Valor Total", "a".into()),
        ("valor_total", "b".into()),
        ("VALOR-TOTAL", "c".into()),
    ]));

    assert_eq!(curated.get_text("valor_total"), Some("a"));
    assert_eq!(curated.get_text("valor_total_1"), Some("b"));
    assert_eq!(curated.get_text("valor_total_2"), Some("c"));
}

#[test]
fn test_curate_monetary_null_becomes_zero() {
    let curated = Curator::default().curate_row(&row(&[
        ("item_name", "p".into()),
        ("valor_total_da_avaliacao", Cell::Null),
        ("valor_total_coinvestimento", "".into()),
    ]));

    assert_eq!(
        curated.get("valor_total_da_avaliacao"),
        Some(&Cell::Number(0.0))
    );
    assert_eq!(
        curated.get("valor_total_coinvestimento"),
        Some(&Cell::Number(0.0))
    );
}

#[test]
fn test_curate_batch_fills_missing_monetary_columns() {
    let batch = TabularBatch::new(vec![
        row(&[("item_name", "a".into()), ("valor_total_do_orcamento", "10".into())]),
        row(&[("item_name", "b".into())]),
    ]);

    let curated = Curator::default().curate(&batch);
    assert_eq!(
        curated.rows[1].get("valor_total_do_orcamento"),
        Some(&Cell::Number(0.0))
    );
    assert!(!curated.rows[1].contains("valor_total_da_avaliacao"));
}

#[test]
fn test_custom_curation_config() {
    let curator = Curator::new(CurationConfig {
        monetary_columns: vec!["custo".to_string()],
        project_code_columns: vec!["sigla".to_string()],
    });

    let curated = curator.curate_row(&row(&[
        ("item_name", "ignored".into()),
        ("Sigla", "Project X".into()),
        ("Custo", "1,5 | 1,5".into()),
        ("valor_total_do_orcamento", "7".into()),
    ]));

    assert_eq!(curated.get_text(PROJECT_ID), Some(PROJECT_X_ID));
    assert_eq!(curated.get("custo"), Some(&Cell::Number(3.0)));
    assert_eq!(curated.get_text("valor_total_do_orcamento"), Some("7"));
}

#[test]
fn test_default_config() {
    let config = CurationConfig::default();
    assert_eq!(config.monetary_columns.len(), 3);
    assert_eq!(
        config.project_code_columns,
        vec!["codigo_do_projeto", "codigo_projeto"]
    );
}
