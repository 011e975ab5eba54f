//! Core data model for form definitions.
//!
//! A form is an ordered set of `FormElement` values. Each element has a
//! `kind` (a tagged union carrying only the fields that kind understands)
//! and a set of `ElementProps` shared by every kind. Elements serialize
//! flat, so stored JSON reads `{"id", "type", "position", "label", ...}`.

use crate::id::ElementId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Option list for choice kinds (select, radio, checkbox).
pub type Options = SmallVec<[String; 4]>;

// ─── Kinds ───────────────────────────────────────────────────────────────

/// What kind of field an element is, with its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Text,
    Textarea,
    Number,
    Email,
    Password,
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_date: Option<String>,
    },
    DatePicker {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_date: Option<String>,
    },
    Select {
        #[serde(default)]
        options: Options,
        #[serde(default)]
        multiple: bool,
    },
    AutoSelect {
        #[serde(default)]
        options: Options,
        #[serde(default)]
        multiple: bool,
    },
    #[serde(rename = "multiselect")]
    MultiSelect {
        #[serde(default)]
        options: Options,
    },
    Radio {
        #[serde(default)]
        options: Options,
        #[serde(default)]
        inline: bool,
    },
    Checkbox {
        #[serde(default)]
        options: Options,
        #[serde(default)]
        inline: bool,
    },
    Image {
        #[serde(default)]
        multiple: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_files: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    File {
        #[serde(default)]
        multiple: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_files: Option<u32>,
    },
    /// A tag this build does not recognize (read back from storage).
    #[serde(other)]
    Unknown,
}

impl ElementKind {
    /// The `type` tag as stored and exported.
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Textarea => "textarea",
            ElementKind::Number => "number",
            ElementKind::Email => "email",
            ElementKind::Password => "password",
            ElementKind::Date { .. } => "date",
            ElementKind::DatePicker { .. } => "date_picker",
            ElementKind::Select { .. } => "select",
            ElementKind::AutoSelect { .. } => "auto_select",
            ElementKind::MultiSelect { .. } => "multiselect",
            ElementKind::Radio { .. } => "radio",
            ElementKind::Checkbox { .. } => "checkbox",
            ElementKind::Image { .. } => "image",
            ElementKind::File { .. } => "file",
            ElementKind::Unknown => "unknown",
        }
    }

    /// Option list, for kinds that have one.
    pub fn options(&self) -> Option<&Options> {
        match self {
            ElementKind::Select { options, .. }
            | ElementKind::AutoSelect { options, .. }
            | ElementKind::MultiSelect { options }
            | ElementKind::Radio { options, .. }
            | ElementKind::Checkbox { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Whether the field accepts more than one value.
    pub fn is_multiple(&self) -> bool {
        match self {
            ElementKind::MultiSelect { .. } => true,
            ElementKind::Select { multiple, .. }
            | ElementKind::AutoSelect { multiple, .. }
            | ElementKind::Image { multiple, .. }
            | ElementKind::File { multiple, .. } => *multiple,
            _ => false,
        }
    }
}

// ─── Shared properties ───────────────────────────────────────────────────

/// Layout width class of an element within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Width {
    #[default]
    Full,
    TwoThirds,
    Half,
    Third,
    Quarter,
}

impl Width {
    /// Share of the row this width class occupies.
    pub fn fraction(self) -> f64 {
        match self {
            Width::Full => 1.0,
            Width::TwoThirds => 2.0 / 3.0,
            Width::Half => 0.5,
            Width::Third => 1.0 / 3.0,
            Width::Quarter => 0.25,
        }
    }

    /// Width class nearest to a row fraction.
    pub fn from_fraction(fraction: f64) -> Self {
        [
            Width::Quarter,
            Width::Third,
            Width::Half,
            Width::TwoThirds,
            Width::Full,
        ]
        .into_iter()
        .min_by(|a, b| {
            (a.fraction() - fraction)
                .abs()
                .total_cmp(&(b.fraction() - fraction).abs())
        })
        .unwrap_or_default()
    }
}

/// Input validation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyAction {
    Show,
    Hide,
    Enable,
    Disable,
    UpdateOptions,
}

/// Conditional rule: when `element_id`'s value meets `condition`, apply `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub element_id: ElementId,
    pub condition: Condition,
    pub value: serde_json::Value,
    pub action: DependencyAction,
    /// Replacement options for `UpdateOptions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<serde_json::Value>,
}

/// Properties every element carries regardless of kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProps {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub width: Width,
    #[serde(default)]
    pub new_row: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

// ─── Elements ────────────────────────────────────────────────────────────

/// A single field of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    pub id: ElementId,

    #[serde(flatten)]
    pub kind: ElementKind,

    /// Zero-based render rank within the owning form.
    pub position: usize,

    #[serde(flatten)]
    pub props: ElementProps,
}

impl FormElement {
    pub fn new(id: ElementId, kind: ElementKind, props: ElementProps) -> Self {
        Self {
            id,
            kind,
            position: 0,
            props,
        }
    }

    pub fn label(&self) -> &str {
        &self.props.label
    }
}

// ─── Patches ─────────────────────────────────────────────────────────────

/// Partial property update. Fields left `None` are untouched.
///
/// Kind-specific fields only land on kinds that carry them; a `maxFiles`
/// patch on a text field is dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub width: Option<Width>,
    pub new_row: Option<bool>,
    pub validation: Option<Validation>,
    pub dependencies: Option<Vec<Dependency>>,
    pub value: Option<serde_json::Value>,
    pub options: Option<Options>,
    pub multiple: Option<bool>,
    pub inline: Option<bool>,
    pub max_files: Option<u32>,
    pub src: Option<String>,
    pub alt: Option<String>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

fn merge<T: Clone>(slot: &mut T, patch: &Option<T>) {
    if let Some(v) = patch {
        *slot = v.clone();
    }
}

fn merge_opt<T: Clone>(slot: &mut Option<T>, patch: &Option<T>) {
    if let Some(v) = patch {
        *slot = Some(v.clone());
    }
}

impl ElementPatch {
    pub fn is_empty(&self) -> bool {
        *self == ElementPatch::default()
    }

    /// Shallow-merge this patch into `element`. `id` and `position` are never touched.
    pub fn apply(&self, element: &mut FormElement) {
        let props = &mut element.props;
        merge(&mut props.label, &self.label);
        merge_opt(&mut props.placeholder, &self.placeholder);
        merge(&mut props.required, &self.required);
        merge(&mut props.width, &self.width);
        merge(&mut props.new_row, &self.new_row);
        merge_opt(&mut props.validation, &self.validation);
        merge(&mut props.dependencies, &self.dependencies);
        merge_opt(&mut props.value, &self.value);

        match &mut element.kind {
            ElementKind::Select { options, multiple }
            | ElementKind::AutoSelect { options, multiple } => {
                merge(options, &self.options);
                merge(multiple, &self.multiple);
            }
            ElementKind::MultiSelect { options } => merge(options, &self.options),
            ElementKind::Radio { options, inline } | ElementKind::Checkbox { options, inline } => {
                merge(options, &self.options);
                merge(inline, &self.inline);
            }
            ElementKind::Image {
                multiple,
                max_files,
                src,
                alt,
            } => {
                merge(multiple, &self.multiple);
                merge_opt(max_files, &self.max_files);
                merge_opt(src, &self.src);
                merge_opt(alt, &self.alt);
            }
            ElementKind::File {
                multiple,
                max_files,
            } => {
                merge(multiple, &self.multiple);
                merge_opt(max_files, &self.max_files);
            }
            ElementKind::Date { min_date, max_date }
            | ElementKind::DatePicker { min_date, max_date } => {
                merge_opt(min_date, &self.min_date);
                merge_opt(max_date, &self.max_date);
            }
            ElementKind::Text
            | ElementKind::Textarea
            | ElementKind::Number
            | ElementKind::Email
            | ElementKind::Password
            | ElementKind::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    fn select(label: &str) -> FormElement {
        FormElement::new(
            ElementId::intern(label),
            ElementKind::Select {
                options: smallvec!["a".to_string(), "b".to_string()],
                multiple: false,
            },
            ElementProps {
                label: label.to_string(),
                ..ElementProps::default()
            },
        )
    }

    #[test]
    fn element_serializes_flat() {
        let el = select("country");
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["label"], "country");
        assert_eq!(json["options"][1], "b");
        assert_eq!(json["position"], 0);
        assert_eq!(json["newRow"], false);
        assert_eq!(json["width"], "full");
    }

    #[test]
    fn element_deserializes_browser_layout() {
        let json = r#"{
            "id": "element-1",
            "type": "image",
            "label": "Upload Image",
            "required": true,
            "width": "two-thirds",
            "newRow": false,
            "position": 2,
            "multiple": true,
            "maxFiles": 3
        }"#;
        let el: FormElement = serde_json::from_str(json).unwrap();
        assert_eq!(el.position, 2);
        assert_eq!(el.props.width, Width::TwoThirds);
        assert!(el.props.required);
        assert_eq!(
            el.kind,
            ElementKind::Image {
                multiple: true,
                max_files: Some(3),
                src: None,
                alt: None,
            }
        );
    }

    #[test]
    fn unknown_type_tag_is_kept_as_unknown() {
        let json = r#"{"id":"e","type":"signature","label":"Sign","position":0}"#;
        let el: FormElement = serde_json::from_str(json).unwrap();
        assert_eq!(el.kind, ElementKind::Unknown);
        assert_eq!(el.label(), "Sign");
    }

    #[test]
    fn patch_merges_shallowly() {
        let mut el = select("country");
        el.props.placeholder = Some("Pick one".into());
        let patch = ElementPatch {
            label: Some("Country".into()),
            multiple: Some(true),
            ..ElementPatch::default()
        };
        patch.apply(&mut el);
        assert_eq!(el.label(), "Country");
        assert_eq!(el.props.placeholder.as_deref(), Some("Pick one"));
        assert!(el.kind.is_multiple());
        assert_eq!(el.kind.options().map(|o| o.len()), Some(2));
    }

    #[test]
    fn patch_drops_fields_the_kind_lacks() {
        let mut el = FormElement::new(
            ElementId::intern("name"),
            ElementKind::Text,
            ElementProps::default(),
        );
        let before = el.clone();
        let patch: ElementPatch = serde_json::from_str(r#"{"maxFiles": 9}"#).unwrap();
        patch.apply(&mut el);
        assert_eq!(el, before);
    }

    #[test]
    fn empty_patch_is_identity() {
        let mut el = select("s");
        let before = el.clone();
        assert!(ElementPatch::default().is_empty());
        ElementPatch::default().apply(&mut el);
        assert_eq!(el, before);
    }

    #[test]
    fn width_fraction_roundtrip() {
        for w in [
            Width::Full,
            Width::TwoThirds,
            Width::Half,
            Width::Third,
            Width::Quarter,
        ] {
            assert_eq!(Width::from_fraction(w.fraction()), w);
        }
        assert_eq!(Width::from_fraction(0.3), Width::Third);
    }
}
