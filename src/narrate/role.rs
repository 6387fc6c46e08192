//! Element tag → spoken role label.
//!
//! The mapping is an ordered table evaluated top to bottom; the first rule
//! whose pattern occurs in the tag wins.  Matching is a case-sensitive
//! substring test, so `RadioButton` and `ImageButton` both hit the `Button`
//! rule before the more specific rows are reached.

/// One row of a role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRule {
    pub pattern: &'static str,
    pub label: &'static str,
}

const fn rule(pattern: &'static str, label: &'static str) -> RoleRule {
    RoleRule { pattern, label }
}

/// Rules used unless a caller supplies its own table.
pub const STANDARD_ROLES: &[RoleRule] = &[
    rule("Button", "button"),
    rule("EditText", "edit field"),
    rule("CheckBox", "checkbox"),
    rule("RadioButton", "radio button"),
    rule("Switch", "switch"),
    rule("TextView", "static text"),
    rule("ImageView", "image"),
    rule("ListView", "list"),
    rule("GridView", "grid"),
    rule("WebView", "embedded document"),
];

/// An ordered, first-match-wins role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleTable {
    rules: &'static [RoleRule],
}

impl RoleTable {
    pub const fn new(rules: &'static [RoleRule]) -> Self {
        Self { rules }
    }

    pub const fn standard() -> Self {
        Self::new(STANDARD_ROLES)
    }

    /// Label for `tag`, or `""` when no rule matches.
    pub fn classify(&self, tag: &str) -> &'static str {
        self.rules
            .iter()
            .find(|r| tag.contains(r.pattern))
            .map_or("", |r| r.label)
    }

    pub fn rules(&self) -> &'static [RoleRule] {
        self.rules
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Classify `tag` with the standard table.
pub fn classify_role(tag: &str) -> &'static str {
    RoleTable::standard().classify(tag)
}
