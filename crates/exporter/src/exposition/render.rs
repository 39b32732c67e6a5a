use std::fmt::Write;
use std::sync::Arc;

use super::desc::{Desc, Sample};

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders samples in text exposition format.
///
/// Families come out in `descs` order; families without samples are skipped.
/// Samples whose desc is not listed are dropped.
pub fn render(descs: &[Arc<Desc>], samples: &[Sample]) -> String {
    let mut out = String::with_capacity(128 * descs.len());

    for desc in descs {
        let mut family: Vec<&Sample> = samples
            .iter()
            .filter(|s| Arc::ptr_eq(s.desc(), desc))
            .collect();
        if family.is_empty() {
            continue;
        }
        family.sort_by(|a, b| a.label_values().cmp(b.label_values()));

        let name = desc.fq_name();
        let _ = writeln!(out, "# HELP {name} {}", escape_help(desc.help()));
        let _ = writeln!(out, "# TYPE {name} {}", desc.value_type().as_str());
        for sample in family {
            out.push_str(name);
            write_labels(&mut out, desc.variable_labels(), sample.label_values());
            let _ = writeln!(out, " {}", format_value(sample.value()));
        }
    }

    out
}

fn write_labels(out: &mut String, names: &[&'static str], values: &[String]) {
    if names.is_empty() {
        return;
    }
    out.push('{');
    for (i, (name, value)) in names.iter().zip(values).enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{name}=\"{}\"", escape_label_value(value));
    }
    out.push('}');
}

fn escape_label_value(v: &str) -> String {
    v.replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('\n', r"\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', r"\\").replace('\n', r"\n")
}

pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}
