//! Curation settings

use serde::{Deserialize, Serialize};

/// Column holding the derived stable identifier
pub const PROJECT_ID: &str = "id_projeto";

/// Default monetary allow-list (normalized names)
pub const DEFAULT_MONETARY_COLUMNS: [&str; 3] = [
    "valor_total_do_orcamento",
    "valor_total_da_avaliacao",
    "valor_total_coinvestimento",
];

/// Default project-code columns (normalized names)
pub const DEFAULT_PROJECT_CODE_COLUMNS: [&str; 2] = ["codigo_do_projeto", "codigo_projeto"];

/// Which columns the curator treats specially
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Pipe-delimited monetary columns summed into a float
    #[serde(default = "default_monetary_columns")]
    pub monetary_columns: Vec<String>,

    /// Candidate business-key columns, tried in order
    #[serde(default = "default_project_code_columns")]
    pub project_code_columns: Vec<String>,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            monetary_columns: default_monetary_columns(),
            project_code_columns: default_project_code_columns(),
        }
    }
}

fn default_monetary_columns() -> Vec<String> {
    DEFAULT_MONETARY_COLUMNS.map(String::from).to_vec()
}

fn default_project_code_columns() -> Vec<String> {
    DEFAULT_PROJECT_CODE_COLUMNS.map(String::from).to_vec()
}
