//! Emitted text units
//!
//! Translators return fragments instead of writing straight into the output
//! buffer. Each fragment is tagged with the section it belongs to; the
//! assembler concatenates sections in a fixed order and never interleaves
//! them.

use serde::Serialize;

/// Logical section of the generated interface file
///
/// Declaration order is emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Enums,
    Handles,
    Templates,
    Typedefs,
    Classes,
    FreeFunctions,
    Aliases,
}

/// One translated block of interface text, with its optional type-hint twin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub section: Section,
    /// Interface-definition text
    pub text: String,
    /// Parallel stub text, empty when the construct has no hint form
    pub hint: String,
}

impl Fragment {
    pub fn new(section: Section, text: impl Into<String>) -> Self {
        Self {
            section,
            text: text.into(),
            hint: String::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.hint.is_empty()
    }
}

/// Fragments of one module, grouped by section
#[derive(Debug, Default, Clone)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
}

impl FragmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: Fragment) {
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    pub fn extend(&mut self, fragments: impl IntoIterator<Item = Fragment>) {
        for fragment in fragments {
            self.push(fragment);
        }
    }

    /// Interface text of one section, concatenated in push order
    pub fn section_text(&self, section: Section) -> String {
        self.fragments
            .iter()
            .filter(|f| f.section == section)
            .map(|f| f.text.as_str())
            .collect()
    }

    /// Hint text of one section, concatenated in push order
    pub fn section_hints(&self, section: Section) -> String {
        self.fragments
            .iter()
            .filter(|f| f.section == section)
            .map(|f| f.hint.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sections_do_not_interleave() {
        let mut set = FragmentSet::new();
        set.push(Fragment::new(Section::Classes, "class A;\n"));
        set.push(Fragment::new(Section::Enums, "enum E {};\n"));
        set.push(Fragment::new(Section::Classes, "class B;\n"));

        assert_eq!(set.section_text(Section::Classes), "class A;\nclass B;\n");
        assert_eq!(set.section_text(Section::Enums), "enum E {};\n");
        assert_eq!(set.section_text(Section::Typedefs), "");
    }

    #[test]
    fn test_empty_fragment_not_kept() {
        let mut set = FragmentSet::new();
        set.push(Fragment::new(Section::Enums, ""));
        assert!(set.is_empty());

        set.push(Fragment::new(Section::Enums, "").with_hint("class E(IntEnum): ...\n"));
        assert_eq!(set.len(), 1);
    }
}
