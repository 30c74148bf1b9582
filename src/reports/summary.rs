use serde_json::Value;

use super::{MetricKind, ReportRow, ReportSpec};

/// Coerce a JSON field to a number with JavaScript `Number(x) || 0` semantics
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_js_number(s),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            // A single element stringifies to itself; `true` becomes "true" which is NaN
            [Value::Null] => 0.0,
            [Value::Bool(_)] => f64::NAN,
            [single] => coerce_number(Some(single)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    };

    // NaN and -0 are falsy
    if n.is_nan() || n == 0.0 {
        0.0
    } else {
        n
    }
}

fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// String-to-number conversion following the JavaScript grammar; NaN on failure
fn parse_js_number(raw: &str) -> f64 {
    let s = raw.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        let mut acc = 0.0_f64;
        for c in digits.chars() {
            match c.to_digit(radix) {
                Some(d) => acc = acc * radix as f64 + d as f64,
                None => return f64::NAN,
            }
        }
        return acc;
    }

    // Rust also accepts "inf"/"nan" spellings, JavaScript does not
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-');
    if !s.chars().all(allowed) || !s.chars().any(|c| c.is_ascii_digit()) {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a number like JavaScript's `String(n)` for the values we display
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let label = if n > 0.0 { "Infinity" } else { "-Infinity" };
        label.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form; JavaScript always signs a positive exponent
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else {
        format!("{}", n)
    }
}

/// Format with exactly one decimal like `Number.prototype.toFixed(1)`
pub fn format_one_decimal(n: f64) -> String {
    if n.is_nan() || n.is_infinite() {
        return format_number(n);
    }
    if n.abs() >= 1e21 {
        return format_number(n);
    }
    if n == 0.0 {
        return "0.0".to_string();
    }

    // Exact halfway values are multiples of 0.25 with an odd quarter count;
    // toFixed rounds those away from zero where `{:.1}` rounds to even.
    let quarters = n.abs() * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let rounded = (n.abs() * 10.0).ceil() / 10.0;
        let sign = if n < 0.0 { "-" } else { "" };
        return format!("{}{:.1}", sign, rounded);
    }

    format!("{:.1}", n)
}

/// A computed summary card
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub label: &'static str,
    pub value: String,
}

/// Aggregates derived from the current report collection
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub count: usize,
    pub max: f64,
    /// One decimal, or "0" when there are no rows
    pub average: String,
    /// Top entity, or "N/A" when there are no rows
    pub top: String,
    pub metrics: Vec<MetricValue>,
}

impl ReportSummary {
    pub fn compute(spec: &ReportSpec, rows: &[ReportRow]) -> Self {
        let metrics = spec
            .metrics
            .iter()
            .map(|metric| MetricValue {
                label: metric.label,
                value: match metric.kind {
                    MetricKind::Count => rows.len().to_string(),
                    MetricKind::Max(field) => format_number(max_of(rows, field)),
                    MetricKind::Average(field) => average_of(rows, field),
                    MetricKind::Sum(field) => format_number(sum_of(rows, field)),
                    MetricKind::Top => top_of(rows, spec.top_field),
                },
            })
            .collect();

        Self {
            count: rows.len(),
            max: max_of(rows, spec.score_field),
            average: average_of(rows, spec.score_field),
            top: top_of(rows, spec.top_field),
            metrics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

pub fn sum_of(rows: &[ReportRow], field: &str) -> f64 {
    rows.iter().map(|r| r.number(field)).sum()
}

pub fn max_of(rows: &[ReportRow], field: &str) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter()
        .map(|r| r.number(field))
        .fold(f64::NEG_INFINITY, f64::max)
}

pub fn average_of(rows: &[ReportRow], field: &str) -> String {
    if rows.is_empty() {
        return "0".to_string();
    }
    format_one_decimal(sum_of(rows, field) / rows.len() as f64)
}

pub fn top_of(rows: &[ReportRow], field: &str) -> String {
    rows.first()
        .and_then(|r| r.text(field))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "N/A".to_string())
}
