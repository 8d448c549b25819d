use crate::config::Theme;
use crate::stylesheet::Stylesheet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered `(suffix, value)` pairs. Slices keep declaration order, so every
/// expansion is reproducible byte for byte.
///
/// Computed numbers (opacity steps, rem sizes) use Rust's shortest float form:
/// `opacity: 1` and `width: 1rem`, never `1.0`.
pub type UtilityTable<V> = [(&'static str, V)];

pub const SPACING_SCALE: &UtilityTable<&str> = &[
    ("0", "0"),
    ("1", "0.25rem"),
    ("2", "0.5rem"),
    ("3", "0.75rem"),
    ("4", "1rem"),
    ("5", "1.25rem"),
    ("6", "1.5rem"),
    ("8", "2rem"),
    ("10", "2.5rem"),
    ("12", "3rem"),
    ("16", "4rem"),
    ("20", "5rem"),
    ("24", "6rem"),
];

pub const SPACING_PROPERTIES: &UtilityTable<&str> = &[("p", "padding"), ("m", "margin")];

/// Property suffixes per side; `x` and `y` expand to two declarations.
pub const SPACING_SIDES: &UtilityTable<&[&str]> = &[
    ("", &[""]),
    ("t", &["-top"]),
    ("r", &["-right"]),
    ("b", &["-bottom"]),
    ("l", &["-left"]),
    ("x", &["-left", "-right"]),
    ("y", &["-top", "-bottom"]),
];

const DISPLAYS: &UtilityTable<&str> = &[
    ("block", "block"),
    ("inline-block", "inline-block"),
    ("inline", "inline"),
    ("flex", "flex"),
    ("inline-flex", "inline-flex"),
    ("grid", "grid"),
    ("inline-grid", "inline-grid"),
    ("hidden", "none"),
];

const FLEX_FLOW: &UtilityTable<(&str, &str)> = &[
    ("flex-row", ("flex-direction", "row")),
    ("flex-col", ("flex-direction", "column")),
    ("flex-wrap", ("flex-wrap", "wrap")),
    ("flex-nowrap", ("flex-wrap", "nowrap")),
];

const JUSTIFY_CONTENT: &UtilityTable<&str> = &[
    ("justify-start", "flex-start"),
    ("justify-end", "flex-end"),
    ("justify-center", "center"),
    ("justify-between", "space-between"),
    ("justify-around", "space-around"),
    ("justify-evenly", "space-evenly"),
];

const ALIGN_ITEMS: &UtilityTable<&str> = &[
    ("items-start", "flex-start"),
    ("items-end", "flex-end"),
    ("items-center", "center"),
    ("items-baseline", "baseline"),
    ("items-stretch", "stretch"),
];

const ALIGN_SELF: &UtilityTable<&str> = &[
    ("self-auto", "auto"),
    ("self-start", "flex-start"),
    ("self-end", "flex-end"),
    ("self-center", "center"),
    ("self-stretch", "stretch"),
];

const FLEX: &UtilityTable<&str> = &[
    ("flex-1", "1 1 0%"),
    ("flex-auto", "1 1 auto"),
    ("flex-initial", "0 1 auto"),
    ("flex-none", "none"),
];

const GAP_SCALE: &UtilityTable<&str> = &[
    ("1", "0.25rem"),
    ("2", "0.5rem"),
    ("3", "0.75rem"),
    ("4", "1rem"),
    ("6", "1.5rem"),
    ("8", "2rem"),
];

const GAP_AXES: &UtilityTable<&str> = &[("gap", "gap"), ("gap-x", "column-gap"), ("gap-y", "row-gap")];

const GRID_COLUMNS: u32 = 12;

const FONT_SIZES: &UtilityTable<&str> = &[
    ("xs", "0.75rem"),
    ("sm", "0.875rem"),
    ("base", "1rem"),
    ("lg", "1.125rem"),
    ("xl", "1.25rem"),
    ("2xl", "1.5rem"),
    ("3xl", "1.875rem"),
    ("4xl", "2.25rem"),
];

const FONT_WEIGHTS: &UtilityTable<&str> = &[
    ("normal", "400"),
    ("medium", "500"),
    ("semibold", "600"),
    ("bold", "700"),
];

const TEXT_ALIGNS: &[&str] = &["left", "center", "right", "justify"];

const TEXT_KEYWORDS: &UtilityTable<(&str, &str)> = &[
    ("uppercase", ("text-transform", "uppercase")),
    ("lowercase", ("text-transform", "lowercase")),
    ("capitalize", ("text-transform", "capitalize")),
    ("leading-tight", ("line-height", "1.25")),
    ("leading-normal", ("line-height", "1.5")),
    ("leading-relaxed", ("line-height", "1.75")),
    ("underline", ("text-decoration", "underline")),
    ("line-through", ("text-decoration", "line-through")),
    ("no-underline", ("text-decoration", "none")),
];

pub const COLOR_TOKENS: &UtilityTable<&str> = &[
    ("primary", "var(--color-primary)"),
    ("secondary", "var(--color-secondary)"),
    ("accent", "var(--color-accent)"),
    ("background", "var(--color-background)"),
    ("foreground", "var(--color-foreground)"),
    ("muted", "var(--color-muted)"),
    ("muted-foreground", "var(--color-muted-foreground)"),
    ("border", "var(--color-border)"),
    ("destructive", "var(--color-destructive)"),
];

const COLOR_PROPERTIES: &UtilityTable<&str> = &[
    ("text", "color"),
    ("bg", "background-color"),
    ("border", "border-color"),
];

const OPACITY_STEPS: &[u32] = &[0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

const BORDER_WIDTHS: &UtilityTable<&str> = &[
    ("border", "1px"),
    ("border-0", "0"),
    ("border-2", "2px"),
    ("border-4", "4px"),
];

const BORDER_SIDES: &UtilityTable<&str> = &[
    ("t", "top"),
    ("r", "right"),
    ("b", "bottom"),
    ("l", "left"),
];

const BORDER_STYLES: &[&str] = &["solid", "dashed", "dotted", "none"];

const RADIUS: &UtilityTable<&str> = &[
    ("sm", "0.25rem"),
    ("md", "0.5rem"),
    ("lg", "1rem"),
    ("full", "9999px"),
    ("none", "0"),
];

const SHADOWS: &UtilityTable<&str> = &[
    ("sm", "var(--shadow-sm)"),
    ("md", "var(--shadow-md)"),
    ("lg", "var(--shadow-lg)"),
    ("xl", "var(--shadow-xl)"),
    ("none", "none"),
];

const TRANSITION_TIMING: &str = "cubic-bezier(0.4, 0, 0.2, 1)";

const TRANSITIONS: &UtilityTable<&str> = &[
    (
        "transition",
        "color, background-color, border-color, text-decoration-color, fill, stroke, opacity, box-shadow, transform, filter, backdrop-filter",
    ),
    ("transition-all", "all"),
    (
        "transition-colors",
        "color, background-color, border-color, text-decoration-color, fill, stroke",
    ),
];

const DURATIONS: &[u32] = &[75, 100, 150, 200, 300, 500];

/// `(section, pseudo-class, [(class, declarations)])`
type StateGroup = (
    &'static str,
    &'static str,
    &'static [(&'static str, &'static [(&'static str, &'static str)])],
);

const STATES: &[StateGroup] = &[
    (
        "Hover states",
        "hover",
        &[
            ("hover:opacity-80", &[("opacity", "0.8")]),
            ("hover:opacity-90", &[("opacity", "0.9")]),
            (
                "hover:bg-primary",
                &[("background-color", "hsl(var(--color-primary))")],
            ),
            (
                "hover:bg-secondary",
                &[("background-color", "hsl(var(--color-secondary))")],
            ),
            (
                "hover:bg-accent",
                &[("background-color", "hsl(var(--color-accent))")],
            ),
            (
                "hover:bg-muted",
                &[("background-color", "hsl(var(--color-muted))")],
            ),
        ],
    ),
    (
        "Focus states",
        "focus",
        &[
            (
                "focus:ring",
                &[
                    ("outline", "2px solid hsl(var(--color-ring))"),
                    ("outline-offset", "2px"),
                ],
            ),
            (
                "focus:ring-2",
                &[("box-shadow", "0 0 0 2px hsl(var(--color-ring))")],
            ),
        ],
    ),
    (
        "Active states",
        "active",
        &[("active:scale-95", &[("transform", "scale(0.95)")])],
    ),
    (
        "Disabled states",
        "disabled",
        &[
            ("disabled:opacity-50", &[("opacity", "0.5")]),
            ("disabled:pointer-events-none", &[("pointer-events", "none")]),
        ],
    ),
];

const SIZE_STEPS: &[u32] = &[1, 2, 3, 4, 5, 6, 8, 10, 12, 16, 20, 24];

const SIZE_KEYWORDS: &UtilityTable<&str> = &[("full", "100%"), ("auto", "auto")];

const MAX_WIDTHS: &UtilityTable<&str> = &[
    ("xs", "20rem"),
    ("sm", "24rem"),
    ("md", "28rem"),
    ("lg", "32rem"),
    ("xl", "36rem"),
    ("2xl", "42rem"),
    ("full", "100%"),
];

const POSITIONS: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];

const INSETS: &UtilityTable<&[&str]> = &[
    ("inset-0", &["top", "right", "bottom", "left"]),
    ("inset-x-0", &["left", "right"]),
    ("inset-y-0", &["top", "bottom"]),
];

const SIDES: &[&str] = &["top", "right", "bottom", "left"];

const Z_INDEXES: &[u32] = &[0, 10, 20, 30, 40, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Spacing,
    Layout,
    Typography,
    Colors,
    Borders,
    Effects,
    States,
    Sizing,
    Position,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Spacing,
        Category::Layout,
        Category::Typography,
        Category::Colors,
        Category::Borders,
        Category::Effects,
        Category::States,
        Category::Sizing,
        Category::Position,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Spacing => "spacing",
            Category::Layout => "layout",
            Category::Typography => "typography",
            Category::Colors => "colors",
            Category::Borders => "borders",
            Category::Effects => "effects",
            Category::States => "states",
            Category::Sizing => "sizing",
            Category::Position => "position",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.css", self.name())
    }

    pub fn stylesheet(self) -> Stylesheet {
        match self {
            Category::Spacing => spacing_stylesheet(),
            Category::Layout => layout_stylesheet(),
            Category::Typography => typography_stylesheet(),
            Category::Colors => color_stylesheet(),
            Category::Borders => border_stylesheet(),
            Category::Effects => effect_stylesheet(),
            Category::States => state_stylesheet(),
            Category::Sizing => sizing_stylesheet(),
            Category::Position => position_stylesheet(),
        }
    }

    pub fn generate(self) -> String {
        self.stylesheet().render()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn generate_spacing() -> String {
    Category::Spacing.generate()
}

pub fn generate_layout() -> String {
    Category::Layout.generate()
}

pub fn generate_typography() -> String {
    Category::Typography.generate()
}

pub fn generate_colors() -> String {
    Category::Colors.generate()
}

pub fn generate_borders() -> String {
    Category::Borders.generate()
}

pub fn generate_effects() -> String {
    Category::Effects.generate()
}

pub fn generate_states() -> String {
    Category::States.generate()
}

pub fn generate_sizing() -> String {
    Category::Sizing.generate()
}

pub fn generate_position() -> String {
    Category::Position.generate()
}

fn spacing_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Spacing Utilities (Padding & Margin)");

    for (prop_short, prop_full) in SPACING_PROPERTIES {
        for (side_short, side_suffixes) in SPACING_SIDES {
            for (size_name, size_value) in SPACING_SCALE {
                let class = format!("{}{}-{}", prop_short, side_short, size_name);
                sheet.class_rule(
                    &class,
                    side_suffixes
                        .iter()
                        .map(|suffix| (format!("{}{}", prop_full, suffix), *size_value)),
                );
            }
        }
    }

    sheet.class_rule("mx-auto", [("margin-left", "auto"), ("margin-right", "auto")]);
    sheet.class_rule("my-auto", [("margin-top", "auto"), ("margin-bottom", "auto")]);
    sheet
}

fn layout_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Layout Utilities");

    for (class, value) in DISPLAYS {
        sheet.utility(class, "display", value);
    }

    sheet.section("Flexbox");
    for (class, (property, value)) in FLEX_FLOW {
        sheet.utility(class, property, value);
    }
    for (class, value) in JUSTIFY_CONTENT {
        sheet.utility(class, "justify-content", value);
    }
    for (class, value) in ALIGN_ITEMS {
        sheet.utility(class, "align-items", value);
    }
    for (class, value) in ALIGN_SELF {
        sheet.utility(class, "align-self", value);
    }
    for (class, value) in FLEX {
        sheet.utility(class, "flex", value);
    }

    for (size, value) in GAP_SCALE {
        for (prefix, property) in GAP_AXES {
            sheet.utility(&format!("{}-{}", prefix, size), property, value);
        }
    }

    sheet.section("Grid");
    for columns in 1..=GRID_COLUMNS {
        sheet.utility(
            &format!("grid-cols-{}", columns),
            "grid-template-columns",
            &format!("repeat({}, minmax(0, 1fr))", columns),
        );
    }
    sheet
}

fn typography_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Typography Utilities");

    for (name, value) in FONT_SIZES {
        sheet.utility(&format!("text-{}", name), "font-size", value);
    }
    for (name, value) in FONT_WEIGHTS {
        sheet.utility(&format!("font-{}", name), "font-weight", value);
    }
    for align in TEXT_ALIGNS {
        sheet.utility(&format!("text-{}", align), "text-align", align);
    }
    for (class, (property, value)) in TEXT_KEYWORDS {
        sheet.utility(class, property, value);
    }
    sheet
}

fn color_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Color Utilities");

    for (prefix, property) in COLOR_PROPERTIES {
        for (name, value) in COLOR_TOKENS {
            sheet.utility(
                &format!("{}-{}", prefix, name),
                property,
                &format!("hsl({})", value),
            );
        }
    }

    for step in OPACITY_STEPS {
        sheet.utility(
            &format!("opacity-{}", step),
            "opacity",
            &(f64::from(*step) / 100.0).to_string(),
        );
    }
    sheet
}

fn border_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Border Utilities");

    for (class, value) in BORDER_WIDTHS {
        sheet.utility(class, "border-width", value);
    }
    for (short, side) in BORDER_SIDES {
        sheet.utility(
            &format!("border-{}", short),
            &format!("border-{}-width", side),
            "1px",
        );
    }
    for style in BORDER_STYLES {
        sheet.utility(&format!("border-{}", style), "border-style", style);
    }
    for (name, value) in RADIUS {
        sheet.utility(&format!("rounded-{}", name), "border-radius", value);
    }
    sheet.utility("rounded", "border-radius", "0.25rem");
    sheet
}

fn effect_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Effect Utilities");

    for (name, value) in SHADOWS {
        sheet.utility(&format!("shadow-{}", name), "box-shadow", value);
    }
    sheet.utility("shadow", "box-shadow", "var(--shadow-md)");

    for (class, properties) in TRANSITIONS {
        sheet.class_rule(
            class,
            [
                ("transition-property", *properties),
                ("transition-timing-function", TRANSITION_TIMING),
                ("transition-duration", "150ms"),
            ],
        );
    }
    for duration in DURATIONS {
        sheet.utility(
            &format!("duration-{}", duration),
            "transition-duration",
            &format!("{}ms", duration),
        );
    }
    sheet
}

fn state_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("State Utilities");

    for (idx, (title, pseudo, rules)) in STATES.iter().enumerate() {
        if idx == 0 {
            sheet.comment(title);
        } else {
            sheet.section(title);
        }
        for (class, declarations) in rules.iter() {
            sheet.state_rule(class, pseudo, declarations.iter().copied());
        }
    }
    sheet
}

fn sizing_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Sizing Utilities");

    for (prefix, property, screen) in [("w", "width", "100vw"), ("h", "height", "100vh")] {
        for (name, value) in SIZE_KEYWORDS {
            sheet.utility(&format!("{}-{}", prefix, name), property, value);
        }
        sheet.utility(&format!("{}-screen", prefix), property, screen);
        for step in SIZE_STEPS {
            sheet.utility(
                &format!("{}-{}", prefix, step),
                property,
                &format!("{}rem", f64::from(*step) * 0.25),
            );
        }
    }

    sheet.utility("min-w-0", "min-width", "0");
    sheet.utility("min-w-full", "min-width", "100%");
    for (name, value) in MAX_WIDTHS {
        sheet.utility(&format!("max-w-{}", name), "max-width", value);
    }
    sheet.utility("min-h-screen", "min-height", "100vh");
    sheet.utility("min-h-full", "min-height", "100%");
    sheet
}

fn position_stylesheet() -> Stylesheet {
    let mut sheet = Stylesheet::new("Position Utilities");

    for position in POSITIONS {
        sheet.utility(position, "position", position);
    }
    for (class, sides) in INSETS {
        sheet.class_rule(class, sides.iter().map(|side| (*side, "0")));
    }
    for side in SIDES {
        sheet.utility(&format!("{}-0", side), side, "0");
    }
    for z in Z_INDEXES {
        sheet.utility(&format!("z-{}", z), "z-index", &z.to_string());
    }
    sheet
}

/// `:root` custom properties backing the `var(--…)` references above.
pub fn variables_stylesheet(theme: &Theme) -> Stylesheet {
    let mut sheet = Stylesheet::new(&format!("Theme Variables ({})", theme.name));
    let mut declarations = Vec::new();

    for (name, value) in &theme.colors {
        declarations.push((format!("--color-{}", token_name(name)), value.clone()));
    }
    for (name, value) in &theme.radius {
        declarations.push((format!("--radius-{}", token_name(name)), value.clone()));
    }
    for (name, value) in &theme.shadows {
        declarations.push((format!("--shadow-{}", token_name(name)), value.clone()));
    }

    sheet.rule(":root".to_string(), declarations);
    sheet
}

pub fn generate_variables(theme: &Theme) -> String {
    variables_stylesheet(theme).render()
}

fn token_name(name: &str) -> String {
    name.replace('_', "-")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub bytes: usize,
    pub rules: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes every category under `<assets>/utilities/`, in [`Category::ALL`] order.
pub fn write_utilities(assets_root: &Path) -> Result<Vec<GeneratedFile>, GenerateError> {
    let dir = assets_root.join("utilities");
    fs::create_dir_all(&dir).map_err(|source| GenerateError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    Category::ALL
        .iter()
        .map(|category| write_stylesheet(&dir.join(category.file_name()), &category.stylesheet()))
        .collect()
}

pub fn write_variables(assets_root: &Path, theme: &Theme) -> Result<GeneratedFile, GenerateError> {
    fs::create_dir_all(assets_root).map_err(|source| GenerateError::CreateDir {
        path: assets_root.to_path_buf(),
        source,
    })?;
    write_stylesheet(&assets_root.join("variables.css"), &variables_stylesheet(theme))
}

fn write_stylesheet(path: &Path, sheet: &Stylesheet) -> Result<GeneratedFile, GenerateError> {
    let css = sheet.render();
    fs::write(path, &css).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} ({} rules)", path.display(), sheet.rule_count());
    Ok(GeneratedFile {
        path: path.to_path_buf(),
        bytes: css.len(),
        rules: sheet.rule_count(),
    })
}
