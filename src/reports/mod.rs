use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub mod export;
pub mod summary;
pub mod viewer;

pub use summary::{coerce_number, MetricValue, ReportSummary};
pub use viewer::{Alert, DownloadOutcome, ReportState, ReportViewer};

/// Reports exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportId {
    AuthorityRanking,
    AreaDemand,
}

impl ReportId {
    pub const ALL: [ReportId; 2] = [ReportId::AuthorityRanking, ReportId::AreaDemand];

    /// Identifier used in the backend URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportId::AuthorityRanking => "referentes",
            ReportId::AreaDemand => "demanda-areas",
        }
    }

    pub fn spec(&self) -> ReportSpec {
        match self {
            ReportId::AuthorityRanking => ReportSpec::authority_ranking(),
            ReportId::AreaDemand => ReportSpec::area_demand(),
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "referentes" | "authority" | "autoridad" => Ok(ReportId::AuthorityRanking),
            "demanda-areas" | "areas" | "demanda" => Ok(ReportId::AreaDemand),
            other => Err(format!("unknown report '{}' (expected authority or areas)", other)),
        }
    }
}

/// One row of a report preview, as sent by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportRow(Map<String, Value>);

impl ReportRow {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field coerced the way the summary cards coerce it
    pub fn number(&self, field: &str) -> f64 {
        coerce_number(self.get(field))
    }

    /// Field as plain text, None when missing or null
    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Cell content for a column, with the placeholder for missing values
    pub fn cell(&self, column: &Column) -> String {
        match column.kind {
            ColumnKind::Text => self.text(column.field).unwrap_or_else(|| "-".to_string()),
            ColumnKind::Numeric => summary::format_number(self.number(column.field)),
        }
    }
}

impl From<Map<String, Value>> for ReportRow {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// How a column is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(field: &'static str, header: &'static str) -> Self {
        Self { field, header, kind: ColumnKind::Text }
    }

    pub const fn numeric(field: &'static str, header: &'static str) -> Self {
        Self { field, header, kind: ColumnKind::Numeric }
    }
}

/// Aggregate shown as a summary card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Count,
    Max(&'static str),
    Average(&'static str),
    Sum(&'static str),
    Top,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub kind: MetricKind,
}

/// Declarative description of a report viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    pub id: ReportId,
    pub title: &'static str,
    pub description: &'static str,
    pub columns: Vec<Column>,
    /// Field of the first row shown as the "top" entity
    pub top_field: &'static str,
    /// Field used by the headline max/average aggregates
    pub score_field: &'static str,
    pub metrics: Vec<Metric>,
    pub empty_message: &'static str,
}

impl ReportSpec {
    /// Referents ranked by authority score
    pub fn authority_ranking() -> Self {
        Self {
            id: ReportId::AuthorityRanking,
            title: "Ranking de Referentes",
            description: "Usuarios con mayor autoridad académica",
            columns: vec![
                Column::text("referente", "Referente"),
                Column::text("correo", "Correo"),
                Column::numeric("score_autoridad", "Score"),
            ],
            top_field: "referente",
            score_field: "score_autoridad",
            metrics: vec![
                Metric { label: "Referentes", kind: MetricKind::Count },
                Metric { label: "Score máximo", kind: MetricKind::Max("score_autoridad") },
                Metric { label: "Score promedio", kind: MetricKind::Average("score_autoridad") },
                Metric { label: "Top referente", kind: MetricKind::Top },
            ],
            empty_message: "No hay referentes para mostrar.",
        }
    }

    /// Tutoring demand per knowledge area
    pub fn area_demand() -> Self {
        Self {
            id: ReportId::AreaDemand,
            title: "Demanda por Área",
            description: "Solicitudes de tutoría frente a tutores disponibles",
            columns: vec![
                Column::text("area_conocimiento", "Área"),
                Column::numeric("total_solicitudes_area", "Solicitudes"),
                Column::numeric("total_tutores_disponibles", "Tutores"),
            ],
            top_field: "area_conocimiento",
            score_field: "total_solicitudes_area",
            metrics: vec![
                Metric { label: "Áreas", kind: MetricKind::Count },
                Metric { label: "Máx. solicitudes", kind: MetricKind::Max("total_solicitudes_area") },
                Metric { label: "Total solicitudes", kind: MetricKind::Sum("total_solicitudes_area") },
                Metric {
                    label: "Tutores promedio",
                    kind: MetricKind::Average("total_tutores_disponibles"),
                },
                Metric { label: "Área más demandada", kind: MetricKind::Top },
            ],
            empty_message: "No hay datos de demanda por área.",
        }
    }

    pub fn summarize(&self, rows: &[ReportRow]) -> ReportSummary {
        ReportSummary::compute(self, rows)
    }
}
