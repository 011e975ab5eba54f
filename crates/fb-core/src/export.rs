//! Export: FormDefinition → JSON text or a standalone HTML document.
//!
//! HTML fragments are chosen from the kind registry's `Markup`, walking the
//! elements in render order. Kinds without a registry entry emit nothing.

use crate::catalog::{self, Markup};
use crate::form::FormDefinition;
use crate::model::{ElementKind, FormElement};
use std::fmt::Write;

/// Pretty-printed JSON of the whole form.
pub fn export_json(form: &FormDefinition) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(form)
}

/// Parse a form previously produced by `export_json`.
pub fn import_json(text: &str) -> Result<FormDefinition, serde_json::Error> {
    let mut form: FormDefinition = serde_json::from_str(text)?;
    form.elements.normalize();
    Ok(form)
}

/// A self-contained HTML document rendering the form.
#[must_use]
pub fn export_html(form: &FormDefinition) -> String {
    let mut out = String::with_capacity(2048);
    let title = escape(&form.title);
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "  <meta charset=\"utf-8\" />");
    let _ = writeln!(out, "  <title>{title}</title>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<form>");
    let _ = writeln!(out, "  <h2>{title}</h2>");
    let _ = writeln!(out, "  <p>{}</p>", escape(&form.description));
    for element in form.elements.ordered() {
        emit_element(&mut out, element);
    }
    let _ = writeln!(out, "  <button type=\"submit\">Submit</button>");
    let _ = writeln!(out, "</form>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn emit_element(out: &mut String, el: &FormElement) {
    let Some(spec) = catalog::spec(el.kind.tag()) else {
        log::debug!("export: skipping element {} of unknown kind", el.id);
        return;
    };
    let id = escape(el.id.as_str());
    let label = escape(&el.props.label);
    let marker = if el.props.required { " *" } else { "" };
    let required = if el.props.required { " required" } else { "" };
    let placeholder = el
        .props
        .placeholder
        .as_deref()
        .map(|p| format!(" placeholder=\"{}\"", escape(p)))
        .unwrap_or_default();
    let options = el.kind.options().map(|o| o.as_slice()).unwrap_or_default();

    out.push_str("  <div class=\"form-group\">\n");
    match spec.markup {
        Markup::Input(input_type) => {
            let _ = writeln!(out, "    <label for=\"{id}\">{label}{marker}</label>");
            let _ = writeln!(
                out,
                "    <input type=\"{input_type}\" id=\"{id}\" name=\"{id}\"{placeholder}{}{required} />",
                constraint_attrs(el)
            );
        }
        Markup::TextArea => {
            let _ = writeln!(out, "    <label for=\"{id}\">{label}{marker}</label>");
            let _ = writeln!(
                out,
                "    <textarea id=\"{id}\" name=\"{id}\"{placeholder}{}{required}></textarea>",
                constraint_attrs(el)
            );
        }
        Markup::Select => {
            let multiple = if el.kind.is_multiple() { " multiple" } else { "" };
            let _ = writeln!(out, "    <label for=\"{id}\">{label}{marker}</label>");
            let _ = writeln!(
                out,
                "    <select id=\"{id}\" name=\"{id}\"{multiple}{required}>"
            );
            for option in options {
                let option = escape(option);
                let _ = writeln!(out, "      <option value=\"{option}\">{option}</option>");
            }
            out.push_str("    </select>\n");
        }
        Markup::RadioGroup => {
            out.push_str("    <fieldset>\n");
            let _ = writeln!(out, "      <legend>{label}{marker}</legend>");
            for (i, option) in options.iter().enumerate() {
                let option = escape(option);
                // one required radio makes the whole group required
                let req = if i == 0 { required } else { "" };
                let _ = writeln!(
                    out,
                    "      <label><input type=\"radio\" name=\"{id}\" value=\"{option}\"{req} /> {option}</label>"
                );
            }
            out.push_str("    </fieldset>\n");
        }
        Markup::CheckboxGroup => {
            out.push_str("    <fieldset>\n");
            let _ = writeln!(out, "      <legend>{label}{marker}</legend>");
            // no `required` on the boxes: it would force every box to be ticked
            for option in options {
                let option = escape(option);
                let _ = writeln!(
                    out,
                    "      <label><input type=\"checkbox\" name=\"{id}[]\" value=\"{option}\" /> {option}</label>"
                );
            }
            out.push_str("    </fieldset>\n");
        }
        Markup::FileInput { accept } => {
            let multiple = if el.kind.is_multiple() { " multiple" } else { "" };
            let _ = writeln!(out, "    <label for=\"{id}\">{label}{marker}</label>");
            let _ = writeln!(
                out,
                "    <input type=\"file\" id=\"{id}\" name=\"{id}\" accept=\"{accept}\"{multiple}{required} />"
            );
        }
    }
    out.push_str("  </div>\n");
}

/// `minlength`/`maxlength`/`pattern` from validation rules, plus `min`/`max`:
/// date bounds on date kinds, numeric bounds on number inputs only.
fn constraint_attrs(el: &FormElement) -> String {
    let mut attrs = String::new();
    let validation = el.props.validation.as_ref();
    if let Some(v) = validation {
        if let Some(n) = v.min_length {
            let _ = write!(attrs, " minlength=\"{n}\"");
        }
        if let Some(n) = v.max_length {
            let _ = write!(attrs, " maxlength=\"{n}\"");
        }
        if let Some(p) = &v.pattern {
            let _ = write!(attrs, " pattern=\"{}\"", escape(p));
        }
    }
    match &el.kind {
        ElementKind::Date { min_date, max_date } | ElementKind::DatePicker { min_date, max_date } => {
            if let Some(min) = min_date {
                let _ = write!(attrs, " min=\"{}\"", escape(min));
            }
            if let Some(max) = max_date {
                let _ = write!(attrs, " max=\"{}\"", escape(max));
            }
        }
        ElementKind::Number => {
            if let Some(n) = validation.and_then(|v| v.min) {
                let _ = write!(attrs, " min=\"{n}\"");
            }
            if let Some(n) = validation.and_then(|v| v.max) {
                let _ = write!(attrs, " max=\"{n}\"");
            }
        }
        _ => {}
    }
    attrs
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ElementId, FormId};
    use crate::model::{ElementPatch, ElementProps, Validation};

    fn form_with(tags: &[&str]) -> FormDefinition {
        let mut form = FormDefinition::new(FormId::intern("form-export"));
        for (i, tag) in tags.iter().enumerate() {
            let el = catalog::template(tag)
                .unwrap()
                .instantiate(ElementId::intern(&format!("{tag}-{i}")));
            form.elements.insert(el, None);
        }
        form
    }

    #[test]
    fn html_is_a_document_in_render_order() {
        let mut form = form_with(&["email", "textarea"]);
        form.elements.move_to(ElementId::intern("textarea-1"), 0);
        let html = export_html(&form);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Untitled Form</h2>"));
        let textarea = html.find("<textarea").unwrap();
        let email = html.find("type=\"email\"").unwrap();
        assert!(textarea < email);
        assert!(html.contains("<button type=\"submit\">Submit</button>"));
    }

    #[test]
    fn required_marker_and_attribute() {
        let mut form = form_with(&["text"]);
        let id = ElementId::intern("text-0");
        form.elements.update(
            id,
            &ElementPatch {
                required: Some(true),
                ..ElementPatch::default()
            },
        );
        let html = export_html(&form);
        assert!(html.contains("Text Field *</label>"));
        assert!(html.contains("placeholder=\"Enter text...\" required />"));
    }

    #[test]
    fn choice_kinds() {
        let form = form_with(&["multiselect", "radio", "checkbox", "select"]);
        let html = export_html(&form);
        assert!(html.contains("<select id=\"multiselect-0\" name=\"multiselect-0\" multiple>"));
        assert!(html.contains("<select id=\"select-3\" name=\"select-3\">"));
        assert_eq!(html.matches("type=\"radio\" name=\"radio-1\"").count(), 3);
        assert_eq!(html.matches("name=\"checkbox-2[]\"").count(), 2);
        assert!(html.contains("<option value=\"Option 1\">Option 1</option>"));
    }

    #[test]
    fn file_kinds_restrict_accept() {
        let html = export_html(&form_with(&["image", "file"]));
        assert!(html.contains("accept=\"image/*\" multiple"));
        assert!(html.contains("accept=\"*/*\" multiple"));
    }

    #[test]
    fn unknown_kind_emits_nothing() {
        let mut form = form_with(&[]);
        form.elements.insert(
            FormElement::new(
                ElementId::intern("mystery"),
                ElementKind::Unknown,
                ElementProps {
                    label: "Mystery".into(),
                    ..ElementProps::default()
                },
            ),
            None,
        );
        let html = export_html(&form);
        assert!(!html.contains("Mystery"));
        assert!(!html.contains("form-group"));
    }

    #[test]
    fn text_is_escaped() {
        let mut form = form_with(&[]);
        form.title = "<script>\"x\"</script>".into();
        let html = export_html(&form);
        assert!(html.contains("&lt;script&gt;&quot;x&quot;&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn date_bounds_become_attributes() {
        let mut form = form_with(&["date"]);
        form.elements.update(
            ElementId::intern("date-0"),
            &ElementPatch {
                min_date: Some("2024-01-01".into()),
                ..ElementPatch::default()
            },
        );
        assert!(export_html(&form).contains("min=\"2024-01-01\""));
    }

    fn require(form: &mut FormDefinition, id: &str) {
        form.elements.update(
            ElementId::intern(id),
            &ElementPatch {
                required: Some(true),
                ..ElementPatch::default()
            },
        );
    }

    #[test]
    fn required_radio_group_marks_first_input_only() {
        let mut form = form_with(&["radio"]);
        require(&mut form, "radio-0");
        let html = export_html(&form);
        assert!(html.contains("<legend>Radio Options *</legend>"));
        assert_eq!(html.matches(" required").count(), 1);
        assert!(html.contains("value=\"Option 1\" required />"));
    }

    #[test]
    fn required_checkbox_group_marks_legend_only() {
        let mut form = form_with(&["checkbox"]);
        require(&mut form, "checkbox-0");
        let html = export_html(&form);
        assert!(html.contains("<legend>Checkbox Option *</legend>"));
        assert_eq!(html.matches(" required").count(), 0);
    }

    #[test]
    fn required_textarea_select_and_file() {
        let mut form = form_with(&["textarea", "select", "file"]);
        for id in ["textarea-0", "select-1", "file-2"] {
            require(&mut form, id);
        }
        let html = export_html(&form);
        assert!(html.contains("placeholder=\"Enter your message...\" required></textarea>"));
        assert!(html.contains("<select id=\"select-1\" name=\"select-1\" required>"));
        assert!(html.contains("accept=\"*/*\" multiple required />"));
        assert_eq!(html.matches(" *</label>").count(), 3);
    }

    #[test]
    fn date_picker_is_a_date_input() {
        let html = export_html(&form_with(&["date_picker"]));
        assert!(html.contains("<input type=\"date\" id=\"date_picker-0\""));
    }

    #[test]
    fn auto_select_with_multiple_is_a_multiple_select() {
        let mut form = form_with(&["auto_select"]);
        form.elements.update(
            ElementId::intern("auto_select-0"),
            &ElementPatch {
                multiple: Some(true),
                ..ElementPatch::default()
            },
        );
        let html = export_html(&form);
        assert!(html.contains("<select id=\"auto_select-0\" name=\"auto_select-0\" multiple>"));
    }

    #[test]
    fn date_bounds_win_over_numeric_bounds() {
        let mut form = form_with(&["date"]);
        form.elements.update(
            ElementId::intern("date-0"),
            &ElementPatch {
                min_date: Some("2024-01-01".into()),
                validation: Some(Validation {
                    min: Some(3.0),
                    max: Some(9.0),
                    ..Validation::default()
                }),
                ..ElementPatch::default()
            },
        );
        let html = export_html(&form);
        assert_eq!(html.matches(" min=").count(), 1);
        assert!(html.contains(" min=\"2024-01-01\""));
        assert!(!html.contains(" max="));
    }

    #[test]
    fn numeric_bounds_only_on_number_inputs() {
        let mut form = form_with(&["number", "text"]);
        let bounds = ElementPatch {
            validation: Some(Validation {
                min: Some(1.0),
                max: Some(10.0),
                max_length: Some(20),
                ..Validation::default()
            }),
            ..ElementPatch::default()
        };
        form.elements.update(ElementId::intern("number-0"), &bounds);
        form.elements.update(ElementId::intern("text-1"), &bounds);
        let html = export_html(&form);
        assert_eq!(html.matches(" min=\"1\" max=\"10\"").count(), 1);
        assert_eq!(html.matches(" maxlength=\"20\"").count(), 2);
        let text = html.find("id=\"text-1\"").unwrap();
        assert!(!html[text..].contains(" min="));
    }
}
