use crate::cn;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

pub type Attributes = IndexMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Core,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Html => "dash_html_components",
            Namespace::Core => "dash_core_components",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Children(pub Vec<Node>);

impl Children {
    pub fn none() -> Self {
        Self::default()
    }
}

impl From<&str> for Children {
    fn from(value: &str) -> Self {
        Self(vec![value.into()])
    }
}

impl From<String> for Children {
    fn from(value: String) -> Self {
        Self(vec![value.into()])
    }
}

impl From<Element> for Children {
    fn from(value: Element) -> Self {
        Self(vec![value.into()])
    }
}

impl<T: Into<Node>> From<Vec<T>> for Children {
    fn from(value: Vec<T>) -> Self {
        Self(value.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub namespace: Namespace,
    pub kind: &'static str,
    pub id: Option<String>,
    pub class_name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(namespace: Namespace, kind: &'static str) -> Self {
        Self {
            namespace,
            kind,
            id: None,
            class_name: String::new(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn html(kind: &'static str) -> Self {
        Self::new(Namespace::Html, kind)
    }

    pub fn core(kind: &'static str) -> Self {
        Self::new(Namespace::Core, kind)
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_children(mut self, children: impl Into<Children>) -> Self {
        self.children = children.into().0;
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Adds pass-through attributes; names already set by the builder are kept.
    pub fn with_extra(mut self, extra: Attributes) -> Self {
        for (name, value) in extra {
            if name == "id" || name == "className" || name == "children" {
                log::debug!("{}: ignoring reserved extra attribute {}", self.kind, name);
                continue;
            }
            self.attributes.entry(name).or_insert(value);
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Dash layout JSON: `{"type", "namespace", "props"}`.
    pub fn to_json(&self) -> Value {
        let mut props = Map::new();
        if !self.children.is_empty() {
            let children = self
                .children
                .iter()
                .map(|child| match child {
                    Node::Element(element) => element.to_json(),
                    Node::Text(text) => Value::String(text.clone()),
                })
                .collect();
            props.insert("children".to_string(), Value::Array(children));
        }
        if let Some(id) = &self.id {
            props.insert("id".to_string(), Value::String(id.clone()));
        }
        if !self.class_name.is_empty() {
            props.insert("className".to_string(), Value::String(self.class_name.clone()));
        }
        for (name, value) in &self.attributes {
            props.insert(name.clone(), value.clone());
        }

        json!({
            "type": self.kind,
            "namespace": self.namespace.as_str(),
            "props": Value::Object(props),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Size {
    Sm,
    #[default]
    Md,
    Lg,
}

impl Size {
    pub fn as_str(self) -> &'static str {
        match self {
            Size::Sm => "sm",
            Size::Md => "md",
            Size::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Default,
    Outline,
    Ghost,
    Destructive,
}

impl ButtonVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonVariant::Default => "default",
            ButtonVariant::Outline => "outline",
            ButtonVariant::Ghost => "ghost",
            ButtonVariant::Destructive => "destructive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ButtonProps {
    pub id: Option<String>,
    pub variant: ButtonVariant,
    pub size: Size,
    pub disabled: bool,
    /// Shows a spinner and disables the button.
    pub loading: bool,
    pub class_name: String,
    pub n_clicks: u64,
    pub extra: Attributes,
}

pub fn button(children: impl Into<Children>, props: ButtonProps) -> Element {
    let class_name = cn![
        "duk-button",
        format!("duk-button--{}", props.variant.as_str()),
        format!("duk-button--{}", props.size.as_str()),
        &props.class_name,
    ];

    let mut children: Children = children.into();
    if props.loading {
        let mut content = vec![Node::from(
            Element::html("Span")
                .with_class("inline-block animate-spin mr-2")
                .with_children("⏳"),
        )];
        content.extend(children.0);
        children = Children::from(
            Element::html("Div")
                .with_class("flex items-center")
                .with_children(content),
        );
    }

    Element::html("Button")
        .with_id(props.id)
        .with_class(class_name)
        .with_children(children)
        .attr("disabled", props.disabled || props.loading)
        .attr("n_clicks", props.n_clicks)
        .with_extra(props.extra)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeVariant {
    #[default]
    Default,
    Secondary,
    Outline,
    Destructive,
}

impl BadgeVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeVariant::Default => "default",
            BadgeVariant::Secondary => "secondary",
            BadgeVariant::Outline => "outline",
            BadgeVariant::Destructive => "destructive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BadgeProps {
    pub id: Option<String>,
    pub variant: BadgeVariant,
    pub size: Size,
    pub class_name: String,
    pub extra: Attributes,
}

pub fn badge(children: impl Into<Children>, props: BadgeProps) -> Element {
    let class_name = cn![
        "duk-badge",
        format!("duk-badge--{}", props.variant.as_str()),
        format!("duk-badge--{}", props.size.as_str()),
        &props.class_name,
    ];

    Element::html("Span")
        .with_id(props.id)
        .with_class(class_name)
        .with_children(children)
        .with_extra(props.extra)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardVariant {
    #[default]
    Default,
    Outlined,
    Elevated,
}

impl CardVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            CardVariant::Default => "default",
            CardVariant::Outlined => "outlined",
            CardVariant::Elevated => "elevated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardProps {
    pub id: Option<String>,
    pub variant: CardVariant,
    pub class_name: String,
    pub extra: Attributes,
}

pub fn card(children: impl Into<Children>, props: CardProps) -> Element {
    let variant_class = (props.variant != CardVariant::Default)
        .then(|| format!("duk-card--{}", props.variant.as_str()));

    Element::html("Div")
        .with_id(props.id)
        .with_class(cn!["duk-card", variant_class, &props.class_name])
        .with_children(children)
        .with_extra(props.extra)
}

/// Options shared by the structural sub-components (card sections, input
/// group, error text).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionProps {
    pub id: Option<String>,
    pub class_name: String,
    pub extra: Attributes,
}

fn section(
    kind: &'static str,
    base_class: &str,
    children: impl Into<Children>,
    props: SectionProps,
) -> Element {
    Element::html(kind)
        .with_id(props.id)
        .with_class(cn![base_class, &props.class_name])
        .with_children(children)
        .with_extra(props.extra)
}

pub fn card_header(children: impl Into<Children>, props: SectionProps) -> Element {
    section("Div", "duk-card-header", children, props)
}

pub fn card_title(children: impl Into<Children>, props: SectionProps) -> Element {
    section("H3", "duk-card-title", children, props)
}

pub fn card_description(children: impl Into<Children>, props: SectionProps) -> Element {
    section("P", "duk-card-description", children, props)
}

pub fn card_content(children: impl Into<Children>, props: SectionProps) -> Element {
    section("Div", "duk-card-content", children, props)
}

pub fn card_footer(children: impl Into<Children>, props: SectionProps) -> Element {
    section("Div", "duk-card-footer", children, props)
}

pub fn input_group(children: impl Into<Children>, props: SectionProps) -> Element {
    section("Div", "duk-input-group", children, props)
}

pub fn input_error(children: impl Into<Children>, props: SectionProps) -> Element {
    section("P", "duk-input-error", children, props)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelProps {
    pub id: Option<String>,
    /// Id of the input this label describes.
    pub html_for: Option<String>,
    pub class_name: String,
    pub extra: Attributes,
}

pub fn label(children: impl Into<Children>, props: LabelProps) -> Element {
    let mut element = Element::html("Label")
        .with_id(props.id)
        .with_class(cn!["duk-label", &props.class_name])
        .with_children(children);
    if let Some(html_for) = props.html_for {
        element = element.attr("htmlFor", html_for);
    }
    element.with_extra(props.extra)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Tel,
    Url,
    Search,
    Date,
    Time,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Password => "password",
            InputType::Number => "number",
            InputType::Tel => "tel",
            InputType::Url => "url",
            InputType::Search => "search",
            InputType::Date => "date",
            InputType::Time => "time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputProps {
    pub id: Option<String>,
    pub input_type: InputType,
    pub value: String,
    pub placeholder: String,
    pub disabled: bool,
    pub error: bool,
    pub class_name: String,
    pub extra: Attributes,
}

pub fn input(props: InputProps) -> Element {
    let class_name = cn![
        "duk-input",
        props.error.then_some("duk-input--error"),
        &props.class_name,
    ];

    Element::core("Input")
        .with_id(props.id)
        .with_class(class_name)
        .attr("type", props.input_type.as_str())
        .attr("value", props.value)
        .attr("placeholder", props.placeholder)
        .attr("disabled", props.disabled)
        .with_extra(props.extra)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectProps {
    pub id: Option<String>,
    pub options: Vec<SelectOption>,
    /// Selected value, or a list of values when `multi` is set.
    pub value: Option<Value>,
    pub multi: bool,
    pub searchable: bool,
    pub clearable: bool,
    pub placeholder: String,
    pub disabled: bool,
    pub class_name: String,
    pub extra: Attributes,
}

impl Default for SelectProps {
    fn default() -> Self {
        Self {
            id: None,
            options: Vec::new(),
            value: None,
            multi: false,
            searchable: true,
            clearable: true,
            placeholder: "Select...".to_string(),
            disabled: false,
            class_name: String::new(),
            extra: Attributes::new(),
        }
    }
}

pub fn select(props: SelectProps) -> Element {
    let options: Vec<Value> = props
        .options
        .into_iter()
        .map(|option| json!({ "label": option.label, "value": option.value }))
        .collect();

    Element::core("Dropdown")
        .with_id(props.id)
        .with_class(cn!["duk-select", &props.class_name])
        .attr("options", options)
        .attr("value", props.value.unwrap_or(Value::Null))
        .attr("multi", props.multi)
        .attr("searchable", props.searchable)
        .attr("clearable", props.clearable)
        .attr("placeholder", props.placeholder)
        .attr("disabled", props.disabled)
        .with_extra(props.extra)
}

#[cfg(test)]
mod tests {
    use super::{
        badge, button, card, card_content, card_description, card_footer, card_header,
        card_title, input, input_error, input_group, label, select, Attributes, BadgeProps,
        BadgeVariant, ButtonProps, ButtonVariant, CardProps, CardVariant, Children, Element,
        InputProps, InputType, LabelProps, Namespace, Node, SectionProps, SelectOption,
        SelectProps, Size,
    };
    use serde_json::{json, Value};

    fn extra(entries: &[(&str, Value)]) -> Attributes {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn button_defaults() {
        let element = button("Click me", ButtonProps::default());
        assert_eq!(element.kind, "Button");
        assert_eq!(element.namespace, Namespace::Html);
        assert_eq!(
            element.class_name,
            "duk-button duk-button--default duk-button--md"
        );
        assert_eq!(element.children, vec![Node::Text("Click me".to_string())]);
        assert_eq!(element.attribute("disabled"), Some(&json!(false)));
        assert_eq!(element.attribute("n_clicks"), Some(&json!(0)));
    }

    #[test]
    fn button_variant_size_and_extra_classes() {
        let element = button(
            "Delete",
            ButtonProps {
                id: Some("delete-btn".to_string()),
                variant: ButtonVariant::Destructive,
                size: Size::Lg,
                class_name: "w-full".to_string(),
                ..ButtonProps::default()
            },
        );
        assert_eq!(element.id.as_deref(), Some("delete-btn"));
        assert_eq!(
            element.class_name,
            "duk-button duk-button--destructive duk-button--lg w-full"
        );
    }

    #[test]
    fn loading_button_wraps_children_and_disables() {
        let element = button(
            "Saving",
            ButtonProps {
                loading: true,
                ..ButtonProps::default()
            },
        );
        assert_eq!(element.attribute("disabled"), Some(&json!(true)));
        let Node::Element(wrapper) = &element.children[0] else {
            panic!("expected wrapper element");
        };
        assert_eq!(wrapper.kind, "Div");
        assert_eq!(wrapper.class_name, "flex items-center");
        let Node::Element(spinner) = &wrapper.children[0] else {
            panic!("expected spinner element");
        };
        assert_eq!(spinner.class_name, "inline-block animate-spin mr-2");
        assert_eq!(wrapper.children[1], Node::Text("Saving".to_string()));
    }

    #[test]
    fn extra_attributes_pass_through_without_overriding() {
        let element = button(
            "Go",
            ButtonProps {
                disabled: true,
                extra: extra(&[
                    ("title", json!("Submit form")),
                    ("disabled", json!(false)),
                    ("className", json!("ignored")),
                ]),
                ..ButtonProps::default()
            },
        );
        assert_eq!(element.attribute("title"), Some(&json!("Submit form")));
        assert_eq!(element.attribute("disabled"), Some(&json!(true)));
        assert_eq!(element.attribute("className"), None);
        assert!(!element.class_name.contains("ignored"));
    }

    #[test]
    fn badge_classes() {
        let element = badge(
            "New",
            BadgeProps {
                variant: BadgeVariant::Secondary,
                size: Size::Sm,
                ..BadgeProps::default()
            },
        );
        assert_eq!(element.kind, "Span");
        assert_eq!(
            element.class_name,
            "duk-badge duk-badge--secondary duk-badge--sm"
        );
    }

    #[test]
    fn card_omits_default_variant_class() {
        assert_eq!(card(Children::none(), CardProps::default()).class_name, "duk-card");
        let elevated = card(
            Children::none(),
            CardProps {
                variant: CardVariant::Elevated,
                class_name: "p-4".to_string(),
                ..CardProps::default()
            },
        );
        assert_eq!(elevated.class_name, "duk-card duk-card--elevated p-4");
    }

    #[test]
    fn card_sections() {
        let layout = card(
            vec![
                card_header(
                    vec![
                        card_title("Title", SectionProps::default()),
                        card_description("Details", SectionProps::default()),
                    ],
                    SectionProps::default(),
                ),
                card_content("Body", SectionProps::default()),
                card_footer(
                    "Footer",
                    SectionProps {
                        class_name: "justify-end".to_string(),
                        ..SectionProps::default()
                    },
                ),
            ],
            CardProps::default(),
        );
        let kinds: Vec<(&str, &str)> = layout
            .children
            .iter()
            .filter_map(|child| match child {
                Node::Element(element) => Some((element.kind, element.class_name.as_str())),
                Node::Text(_) => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Div", "duk-card-header"),
                ("Div", "duk-card-content"),
                ("Div", "duk-card-footer justify-end"),
            ]
        );
        let Node::Element(header) = &layout.children[0] else {
            panic!("expected header element");
        };
        let Node::Element(title) = &header.children[0] else {
            panic!("expected title element");
        };
        assert_eq!((title.kind, title.class_name.as_str()), ("H3", "duk-card-title"));
    }

    #[test]
    fn input_and_form_helpers() {
        let field = input(InputProps {
            id: Some("email".to_string()),
            input_type: InputType::Email,
            placeholder: "your@email.com".to_string(),
            error: true,
            ..InputProps::default()
        });
        assert_eq!(field.namespace, Namespace::Core);
        assert_eq!(field.kind, "Input");
        assert_eq!(field.class_name, "duk-input duk-input--error");
        assert_eq!(field.attribute("type"), Some(&json!("email")));
        assert_eq!(field.attribute("value"), Some(&json!("")));
        assert!(field.children.is_empty());

        let plain = input(InputProps::default());
        assert_eq!(plain.class_name, "duk-input");

        let caption = label(
            "Email",
            LabelProps {
                html_for: Some("email".to_string()),
                ..LabelProps::default()
            },
        );
        assert_eq!(caption.class_name, "duk-label");
        assert_eq!(caption.attribute("htmlFor"), Some(&json!("email")));

        let group = input_group(
            vec![
                caption,
                field,
                input_error("Invalid email", SectionProps::default()),
            ],
            SectionProps::default(),
        );
        assert_eq!(group.class_name, "duk-input-group");
        assert_eq!(group.children.len(), 3);
    }

    #[test]
    fn select_defaults_and_options() {
        let dropdown = select(SelectProps {
            id: Some("country".to_string()),
            options: vec![
                SelectOption::new("USA", "us"),
                SelectOption::new("Canada", "ca"),
            ],
            ..SelectProps::default()
        });
        assert_eq!(dropdown.kind, "Dropdown");
        assert_eq!(dropdown.class_name, "duk-select");
        assert_eq!(dropdown.attribute("placeholder"), Some(&json!("Select...")));
        assert_eq!(dropdown.attribute("searchable"), Some(&json!(true)));
        assert_eq!(dropdown.attribute("clearable"), Some(&json!(true)));
        assert_eq!(dropdown.attribute("multi"), Some(&json!(false)));
        assert_eq!(dropdown.attribute("value"), Some(&Value::Null));
        assert_eq!(
            dropdown.attribute("options"),
            Some(&json!([
                { "label": "USA", "value": "us" },
                { "label": "Canada", "value": "ca" },
            ]))
        );
    }

    #[test]
    fn serializes_to_dash_layout() {
        let element = Element::html("Div")
            .with_id(Some("root".to_string()))
            .with_class("flex")
            .with_children(vec![Node::from("hello"), Element::html("Br").into()]);
        assert_eq!(
            element.to_json(),
            json!({
                "type": "Div",
                "namespace": "dash_html_components",
                "props": {
                    "children": [
                        "hello",
                        { "type": "Br", "namespace": "dash_html_components", "props": {} },
                    ],
                    "id": "root",
                    "className": "flex",
                },
            })
        );
    }
}
