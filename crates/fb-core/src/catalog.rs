//! Element template catalog.
//!
//! One registry entry per element kind: palette metadata, default
//! properties, and the markup the HTML exporter emits for it. The palette
//! and the exporter both read from `KINDS`, so the two never disagree.

use crate::id::ElementId;
use crate::model::{ElementKind, ElementProps, FormElement, Options};
use smallvec::SmallVec;
use std::sync::LazyLock;

/// How an element kind renders in exported HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Labeled `<input type="…">`.
    Input(&'static str),
    TextArea,
    /// Labeled `<select>`, `multiple` when the element accepts several values.
    Select,
    /// Fieldset of radio inputs grouped by element id.
    RadioGroup,
    /// Fieldset of checkboxes named `<id>[]`.
    CheckboxGroup,
    /// File input restricted to `accept`.
    FileInput { accept: &'static str },
}

/// Registry entry for one element kind.
pub struct KindSpec {
    pub tag: &'static str,
    pub display_label: &'static str,
    pub icon: &'static str,
    pub markup: Markup,
    defaults: fn() -> (ElementKind, ElementProps),
}

/// A palette entry: kind plus the property set new elements start with.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTemplate {
    pub kind: ElementKind,
    pub display_label: &'static str,
    pub icon: &'static str,
    pub default_properties: ElementProps,
}

impl ElementTemplate {
    /// Build a fresh element from this template. Position is assigned by the store.
    pub fn instantiate(&self, id: ElementId) -> FormElement {
        FormElement::new(id, self.kind.clone(), self.default_properties.clone())
    }
}

fn props(label: &str, placeholder: Option<&str>) -> ElementProps {
    ElementProps {
        label: label.to_string(),
        placeholder: placeholder.map(str::to_string),
        ..ElementProps::default()
    }
}

fn options(n: usize) -> Options {
    (1..=n).map(|i| format!("Option {i}")).collect::<SmallVec<_>>()
}

/// Every kind the editor knows, in palette order.
pub static KINDS: [KindSpec; 14] = [
    KindSpec {
        tag: "text",
        display_label: "Text Input",
        icon: "mdi-form-textbox",
        markup: Markup::Input("text"),
        defaults: || (ElementKind::Text, props("Text Field", Some("Enter text..."))),
    },
    KindSpec {
        tag: "textarea",
        display_label: "Text Area",
        icon: "mdi-text",
        markup: Markup::TextArea,
        defaults: || {
            (
                ElementKind::Textarea,
                props("Message", Some("Enter your message...")),
            )
        },
    },
    KindSpec {
        tag: "number",
        display_label: "Number Input",
        icon: "mdi-numeric",
        markup: Markup::Input("number"),
        defaults: || (ElementKind::Number, props("Number", Some("Enter number..."))),
    },
    KindSpec {
        tag: "email",
        display_label: "Email Input",
        icon: "mdi-email",
        markup: Markup::Input("email"),
        defaults: || {
            (
                ElementKind::Email,
                props("Email Address", Some("Enter email...")),
            )
        },
    },
    KindSpec {
        tag: "password",
        display_label: "Password Input",
        icon: "mdi-form-textbox-password",
        markup: Markup::Input("password"),
        defaults: || {
            (
                ElementKind::Password,
                props("Password", Some("Enter password...")),
            )
        },
    },
    KindSpec {
        tag: "date",
        display_label: "Date Input",
        icon: "mdi-calendar-edit",
        markup: Markup::Input("date"),
        defaults: || {
            (
                ElementKind::Date {
                    min_date: None,
                    max_date: None,
                },
                props("Date", None),
            )
        },
    },
    KindSpec {
        tag: "date_picker",
        display_label: "Date Picker",
        icon: "mdi-calendar-month",
        markup: Markup::Input("date"),
        defaults: || {
            (
                ElementKind::DatePicker {
                    min_date: None,
                    max_date: None,
                },
                props("Date", None),
            )
        },
    },
    KindSpec {
        tag: "select",
        display_label: "Select Dropdown",
        icon: "mdi-format-list-bulleted",
        markup: Markup::Select,
        defaults: || {
            (
                ElementKind::Select {
                    options: options(3),
                    multiple: false,
                },
                props("Select Option", None),
            )
        },
    },
    KindSpec {
        tag: "auto_select",
        display_label: "Auto Complete",
        icon: "mdi-list-box-outline",
        markup: Markup::Select,
        defaults: || {
            (
                ElementKind::AutoSelect {
                    options: options(3),
                    multiple: false,
                },
                props("Auto Complete", None),
            )
        },
    },
    KindSpec {
        tag: "multiselect",
        display_label: "Multi Select",
        icon: "mdi-format-list-checks",
        markup: Markup::Select,
        defaults: || {
            (
                ElementKind::MultiSelect {
                    options: options(3),
                },
                props("Select Options", None),
            )
        },
    },
    KindSpec {
        tag: "radio",
        display_label: "Radio Button",
        icon: "mdi-radiobox-marked",
        markup: Markup::RadioGroup,
        defaults: || {
            (
                ElementKind::Radio {
                    options: options(3),
                    inline: false,
                },
                props("Radio Options", None),
            )
        },
    },
    KindSpec {
        tag: "checkbox",
        display_label: "Checkbox",
        icon: "mdi-checkbox-marked",
        markup: Markup::CheckboxGroup,
        defaults: || {
            (
                ElementKind::Checkbox {
                    options: options(2),
                    inline: false,
                },
                props("Checkbox Option", None),
            )
        },
    },
    KindSpec {
        tag: "image",
        display_label: "Image Upload",
        icon: "mdi-image",
        markup: Markup::FileInput { accept: "image/*" },
        defaults: || {
            (
                ElementKind::Image {
                    multiple: true,
                    max_files: Some(3),
                    src: None,
                    alt: None,
                },
                props("Upload Image", None),
            )
        },
    },
    KindSpec {
        tag: "file",
        display_label: "File Upload",
        icon: "mdi-file-upload",
        markup: Markup::FileInput { accept: "*/*" },
        defaults: || {
            (
                ElementKind::File {
                    multiple: true,
                    max_files: Some(3),
                },
                props("Upload File", None),
            )
        },
    },
];

static TEMPLATES: LazyLock<Vec<ElementTemplate>> = LazyLock::new(|| {
    KINDS
        .iter()
        .map(|spec| {
            let (kind, default_properties) = (spec.defaults)();
            ElementTemplate {
                kind,
                display_label: spec.display_label,
                icon: spec.icon,
                default_properties,
            }
        })
        .collect()
});

/// Registry entry for a kind tag, if the tag is known.
pub fn spec(tag: &str) -> Option<&'static KindSpec> {
    KINDS.iter().find(|s| s.tag == tag)
}

/// The palette, in display order.
pub fn templates() -> &'static [ElementTemplate] {
    &TEMPLATES
}

/// Palette entry for a kind tag.
pub fn template(tag: &str) -> Option<&'static ElementTemplate> {
    templates().iter().find(|t| t.kind.tag() == tag)
}
