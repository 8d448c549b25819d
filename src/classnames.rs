//! ```
//! use duk::{cn, ClassInput};
//!
//! let active = true;
//! let classes = cn![
//!     "duk-button",
//!     active.then_some("active"),
//!     ClassInput::map([("duk-button--lg", true), ("duk-button--sm", false)]),
//!     vec!["mr-2", "ml-2"],
//! ];
//! assert_eq!(classes, "duk-button active duk-button--lg mr-2 ml-2");
//! ```

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassInput {
    Token(String),
    /// `None`, `false` or an empty string; contributes nothing.
    Falsy,
    /// Keys are emitted in insertion order when their flag is set.
    Map(IndexMap<String, bool>),
    Seq(Vec<ClassInput>),
}

impl ClassInput {
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(name, enabled)| (name.into(), enabled))
                .collect(),
        )
    }

    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Falsy => true,
            Self::Token(token) => token.is_empty(),
            Self::Map(_) | Self::Seq(_) => false,
        }
    }
}

impl From<&str> for ClassInput {
    fn from(value: &str) -> Self {
        Self::Token(value.to_string())
    }
}

impl From<String> for ClassInput {
    fn from(value: String) -> Self {
        Self::Token(value)
    }
}

impl From<&String> for ClassInput {
    fn from(value: &String) -> Self {
        Self::Token(value.clone())
    }
}

impl<T: Into<ClassInput>> From<Option<T>> for ClassInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Falsy, Into::into)
    }
}

impl<T: Into<ClassInput>> From<Vec<T>> for ClassInput {
    fn from(value: Vec<T>) -> Self {
        Self::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, bool>> for ClassInput {
    fn from(value: IndexMap<String, bool>) -> Self {
        Self::Map(value)
    }
}

pub fn compose(inputs: &[ClassInput]) -> String {
    let mut classes: Vec<String> = Vec::with_capacity(inputs.len());

    for input in inputs {
        if input.is_falsy() {
            continue;
        }
        match input {
            ClassInput::Token(token) => classes.push(token.clone()),
            ClassInput::Map(entries) => {
                for (name, enabled) in entries {
                    if *enabled && !name.is_empty() {
                        classes.push(name.clone());
                    }
                }
            }
            ClassInput::Seq(items) => {
                let nested = compose(items);
                if !nested.is_empty() {
                    classes.push(nested);
                }
            }
            ClassInput::Falsy => {}
        }
    }

    classes.join(" ")
}

/// Composes class names from any mix of `ClassInput` conversions.
#[macro_export]
macro_rules! cn {
    () => {
        ::std::string::String::new()
    };
    ($($input:expr),+ $(,)?) => {
        $crate::classnames::compose(&[$($crate::classnames::ClassInput::from($input)),+])
    };
}
