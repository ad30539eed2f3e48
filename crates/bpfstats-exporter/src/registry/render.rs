//! Prometheus text exposition helpers.

use std::fmt::Write;

use bpfstats_core::LabelSet;

/// Escape a label value.
pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// `{k="v",...}`, or nothing for an empty set. Names were validated when the
/// value was written and go out as-is.
pub(crate) fn label_block(labels: &LabelSet) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let body = labels
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{body}}}")
}

pub(crate) fn write_sample(out: &mut String, name: &str, labels: &LabelSet, value: i64) {
    let _ = writeln!(out, "{}{} {}", name, label_block(labels), value);
}

pub(crate) fn write_type(out: &mut String, name: &str, kind: &str) {
    let _ = writeln!(out, "# TYPE {name} {kind}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_backslashes_newlines() {
        assert_eq!(escape_label("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }

    #[test]
    fn empty_labels_render_bare_name() {
        let mut out = String::new();
        write_sample(&mut out, "up", &LabelSet::new(), 1);
        assert_eq!(out, "up 1\n");
    }
}
