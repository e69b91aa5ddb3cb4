//! Table style variants and their class names.

use std::fmt;

/// Table density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TableSize {
    pub fn token(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Small => "table-small",
            Self::Medium => "table-medium",
            Self::Large => "table-large",
        }
    }
}

/// Table visual variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableVariant {
    #[default]
    Default,
    Striped,
    Bordered,
}

impl TableVariant {
    pub fn token(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Striped => "striped",
            Self::Bordered => "bordered",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Default => "table-default",
            Self::Striped => "table-striped",
            Self::Bordered => "table-bordered",
        }
    }
}

/// Width below which the table switches to its stacked layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableBreakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Xl2,
    Xl3,
    Xl4,
    Xl5,
    #[default]
    Xl6,
    Xl7,
}

impl TableBreakpoint {
    pub fn token(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
            Self::Xl2 => "2xl",
            Self::Xl3 => "3xl",
            Self::Xl4 => "4xl",
            Self::Xl5 => "5xl",
            Self::Xl6 => "6xl",
            Self::Xl7 => "7xl",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Xs => "table-xs",
            Self::Sm => "table-sm",
            Self::Md => "table-md",
            Self::Lg => "table-lg",
            Self::Xl => "table-xl",
            Self::Xl2 => "table-2xl",
            Self::Xl3 => "table-3xl",
            Self::Xl4 => "table-4xl",
            Self::Xl5 => "table-5xl",
            Self::Xl6 => "table-6xl",
            Self::Xl7 => "table-7xl",
        }
    }

    /// Parses a breakpoint token such as `"2xl"`.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "xs" => Self::Xs,
            "sm" => Self::Sm,
            "md" => Self::Md,
            "lg" => Self::Lg,
            "xl" => Self::Xl,
            "2xl" => Self::Xl2,
            "3xl" => Self::Xl3,
            "4xl" => Self::Xl4,
            "5xl" => Self::Xl5,
            "6xl" => Self::Xl6,
            "7xl" => Self::Xl7,
            _ => return None,
        })
    }
}

/// Combined style variants of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TableStyle {
    pub size: TableSize,
    pub variant: TableVariant,
    pub breakpoint: TableBreakpoint,
}

impl TableStyle {
    const BASE: &'static str = "table";

    pub fn size(mut self, size: TableSize) -> Self {
        self.size = size;
        self
    }

    pub fn variant(mut self, variant: TableVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn breakpoint(mut self, breakpoint: TableBreakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    /// Class list for the table element, with `extra` classes appended.
    pub fn class_list(&self, extra: Option<&str>) -> String {
        let mut classes = vec![
            Self::BASE,
            self.size.class_name(),
            self.variant.class_name(),
            self.breakpoint.class_name(),
        ];
        if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
            classes.push(extra);
        }
        classes.join(" ")
    }
}

impl fmt::Display for TableStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_list(None))
    }
}
