use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Gauge,
    Counter,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::Counter => "counter",
        }
    }
}

/// Identity of a metric family: name, help text, label names and type.
#[derive(Debug, PartialEq, Eq)]
pub struct Desc {
    fq_name: String,
    help: String,
    variable_labels: Vec<&'static str>,
    value_type: ValueType,
}

impl Desc {
    pub fn new(
        fq_name: impl Into<String>,
        help: impl Into<String>,
        variable_labels: &[&'static str],
        value_type: ValueType,
    ) -> Arc<Self> {
        Arc::new(Self {
            fq_name: fq_name.into(),
            help: help.into(),
            variable_labels: variable_labels.to_vec(),
            value_type,
        })
    }

    pub fn gauge(
        fq_name: impl Into<String>,
        help: impl Into<String>,
        variable_labels: &[&'static str],
    ) -> Arc<Self> {
        Self::new(fq_name, help, variable_labels, ValueType::Gauge)
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn variable_labels(&self) -> &[&'static str] {
        &self.variable_labels
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

/// Joins the non-empty parts with `_`.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// One value of a family, with label values in the order of the desc's labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    desc: Arc<Desc>,
    label_values: Vec<String>,
    value: f64,
}

impl Sample {
    pub fn new(desc: &Arc<Desc>, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(
            desc.variable_labels.len(),
            label_values.len(),
            "label cardinality mismatch for {}",
            desc.fq_name
        );
        Self {
            desc: desc.clone(),
            label_values,
            value,
        }
    }

    pub fn desc(&self) -> &Arc<Desc> {
        &self.desc
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .variable_labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}
