use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Top-of-file comment, followed by a blank line.
    Heading(String),
    /// Comment preceded by a blank line.
    Section(String),
    Comment(String),
    Rule(Rule),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    blocks: Vec<Block>,
}

impl Stylesheet {
    pub fn new(heading: &str) -> Self {
        Self {
            blocks: vec![Block::Heading(heading.to_string())],
        }
    }

    pub fn section(&mut self, title: &str) {
        self.blocks.push(Block::Section(title.to_string()));
    }

    pub fn comment(&mut self, text: &str) {
        self.blocks.push(Block::Comment(text.to_string()));
    }

    pub fn rule<I, P, V>(&mut self, selector: String, declarations: I)
    where
        I: IntoIterator<Item = (P, V)>,
        P: Into<String>,
        V: Into<String>,
    {
        self.blocks.push(Block::Rule(Rule {
            selector,
            declarations: declarations
                .into_iter()
                .map(|(property, value)| Declaration {
                    property: property.into(),
                    value: value.into(),
                })
                .collect(),
        }));
    }

    pub fn class_rule<I, P, V>(&mut self, class: &str, declarations: I)
    where
        I: IntoIterator<Item = (P, V)>,
        P: Into<String>,
        V: Into<String>,
    {
        self.rule(class_selector(class), declarations);
    }

    pub fn utility(&mut self, class: &str, property: &str, value: &str) {
        self.class_rule(class, [(property, value)]);
    }

    /// Rule scoped to a pseudo-class, e.g. `.hover\:opacity-80:hover`.
    pub fn state_rule<I, P, V>(&mut self, class: &str, pseudo: &str, declarations: I)
    where
        I: IntoIterator<Item = (P, V)>,
        P: Into<String>,
        V: Into<String>,
    {
        self.rule(format!("{}:{}", class_selector(class), pseudo), declarations);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Rule(rule) => Some(rule),
            _ => None,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.rules().count()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, block) in self.blocks.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            match block {
                Block::Heading(title) => write!(f, "/* {} */\n", title)?,
                Block::Section(title) => write!(f, "\n/* {} */", title)?,
                Block::Comment(text) => write!(f, "/* {} */", text)?,
                Block::Rule(rule) => write!(f, "{}", rule)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.selector)?;
        for declaration in &self.declarations {
            write!(f, "{}: {}; ", declaration.property, declaration.value)?;
        }
        f.write_str("}")
    }
}

pub fn class_selector(class: &str) -> String {
    format!(".{}", escape_selector(class))
}

fn escape_selector(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len() * 2);

    for ch in class.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ':' => escaped.push_str("\\:"),
            '/' => escaped.push_str("\\/"),
            '.' => escaped.push_str("\\."),
            '[' => escaped.push_str("\\["),
            ']' => escaped.push_str("\\]"),
            '%' => escaped.push_str("\\%"),
            '!' => escaped.push_str("\\!"),
            '#' => escaped.push_str("\\#"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::{class_selector, Stylesheet};

    #[test]
    fn renders_heading_sections_and_rules() {
        let mut sheet = Stylesheet::new("Layout Utilities");
        sheet.utility("block", "display", "block");
        sheet.section("Flexbox");
        sheet.utility("flex-row", "flex-direction", "row");

        assert_eq!(
            sheet.render(),
            "/* Layout Utilities */\n\n.block { display: block; }\n\n/* Flexbox */\n.flex-row { flex-direction: row; }"
        );
        assert_eq!(sheet.rule_count(), 2);
    }

    #[test]
    fn joins_multiple_declarations() {
        let mut sheet = Stylesheet::default();
        sheet.class_rule(
            "mx-auto",
            [("margin-left", "auto"), ("margin-right", "auto")],
        );
        assert_eq!(
            sheet.render(),
            ".mx-auto { margin-left: auto; margin-right: auto; }"
        );
    }

    #[test]
    fn escapes_variant_separators() {
        assert_eq!(class_selector("hover:opacity-80"), ".hover\\:opacity-80");
        assert_eq!(class_selector("w-1/2"), ".w-1\\/2");
        assert_eq!(class_selector("p-0.5"), ".p-0\\.5");

        let mut sheet = Stylesheet::default();
        sheet.state_rule("active:scale-95", "active", [("transform", "scale(0.95)")]);
        assert_eq!(
            sheet.render(),
            ".active\\:scale-95:active { transform: scale(0.95); }"
        );
    }
}
