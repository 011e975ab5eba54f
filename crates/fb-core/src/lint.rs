//! Lint diagnostics for form definitions.
//!
//! Reports structural issues without modifying the form. The editor shows
//! them next to the offending element.

use crate::form::FormDefinition;
use crate::id::ElementId;
use crate::model::{ElementKind, FormElement};
use serde::Serialize;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// The exported form will misbehave.
    Warning,
    /// Style suggestion.
    Info,
}

/// A single lint diagnostic for a form element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintDiagnostic {
    /// The element this diagnostic refers to.
    pub element_id: ElementId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "empty-label", "dangling-dependency").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the form and return diagnostics in render order.
#[must_use]
pub fn lint_form(form: &FormDefinition) -> Vec<LintDiagnostic> {
    let ids: HashSet<ElementId> = form.elements.iter().map(|el| el.id).collect();
    let mut diags = Vec::new();
    for el in form.elements.ordered() {
        lint_label(el, &mut diags);
        lint_options(el, &mut diags);
        lint_dependencies(el, &ids, &mut diags);
        lint_bounds(el, &mut diags);
    }
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn push(
    diags: &mut Vec<LintDiagnostic>,
    el: &FormElement,
    severity: LintSeverity,
    rule: &'static str,
    message: String,
) {
    diags.push(LintDiagnostic {
        element_id: el.id,
        message,
        severity,
        rule,
    });
}

fn lint_label(el: &FormElement, diags: &mut Vec<LintDiagnostic>) {
    if el.props.label.trim().is_empty() {
        push(
            diags,
            el,
            LintSeverity::Warning,
            "empty-label",
            format!("`{}` field has no label.", el.kind.tag()),
        );
    }
}

fn lint_options(el: &FormElement, diags: &mut Vec<LintDiagnostic>) {
    let Some(options) = el.kind.options() else {
        return;
    };
    if options.is_empty() {
        push(
            diags,
            el,
            LintSeverity::Warning,
            "no-options",
            format!("`{}` has no options to choose from.", el.props.label),
        );
        return;
    }
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.as_str()) {
            push(
                diags,
                el,
                LintSeverity::Info,
                "duplicate-option",
                format!("Option `{option}` appears more than once in `{}`.", el.props.label),
            );
        }
    }
}

fn lint_dependencies(
    el: &FormElement,
    ids: &HashSet<ElementId>,
    diags: &mut Vec<LintDiagnostic>,
) {
    for dep in &el.props.dependencies {
        if dep.element_id == el.id {
            push(
                diags,
                el,
                LintSeverity::Warning,
                "self-dependency",
                format!("`{}` depends on itself.", el.props.label),
            );
        } else if !ids.contains(&dep.element_id) {
            push(
                diags,
                el,
                LintSeverity::Warning,
                "dangling-dependency",
                format!(
                    "`{}` depends on `{}`, which is not in this form.",
                    el.props.label, dep.element_id
                ),
            );
        }
    }
}

fn lint_bounds(el: &FormElement, diags: &mut Vec<LintDiagnostic>) {
    if let Some(v) = &el.props.validation {
        let length_inverted = matches!((v.min_length, v.max_length), (Some(lo), Some(hi)) if lo > hi);
        let range_inverted = matches!((v.min, v.max), (Some(lo), Some(hi)) if lo > hi);
        if length_inverted || range_inverted {
            push(
                diags,
                el,
                LintSeverity::Warning,
                "inverted-bounds",
                format!("`{}` has a minimum above its maximum.", el.props.label),
            );
        }
    }
    if let ElementKind::Date {
        min_date: Some(lo),
        max_date: Some(hi),
    }
    | ElementKind::DatePicker {
        min_date: Some(lo),
        max_date: Some(hi),
    } = &el.kind
        && lo > hi
    {
        push(
            diags,
            el,
            LintSeverity::Warning,
            "inverted-bounds",
            format!("`{}` has a minimum date after its maximum.", el.props.label),
        );
    }
}
