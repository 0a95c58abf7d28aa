//! Enum translation
//!
//! Emits the raw enum block, a named integer-enum proxy so client code can
//! reach members through a type, and the matching stub text. Every named
//! enum is registered run-wide; reference-stripping of enum return types
//! and by-reference output handling both depend on that registry.
//!
//! Member values need care: a member whose initializer names an earlier
//! member is an alias, and the members after it restart from their position
//! minus the aliases seen, reproducing the numbering of the one enum family
//! that interleaves aliases with plain members.

use crate::context::{RunState, TranslationContext};
use crate::cpp::CppEnum;
use crate::fragments::{Fragment, Section};
use crate::hints::render_enum_hint;

/// The emitted initializer of one enum member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValue {
    /// Plain or computed integer
    Literal(i64),
    /// Alias referring to an earlier member by name
    Alias(String),
    /// Initializer expression carried through untouched
    Raw(String),
}

impl MemberValue {
    pub fn render(&self) -> String {
        match self {
            MemberValue::Literal(v) => v.to_string(),
            MemberValue::Alias(name) => name.clone(),
            MemberValue::Raw(text) => text.clone(),
        }
    }
}

/// Resolve the emitted value of every member of one enum
pub fn member_values(e: &CppEnum) -> Vec<(String, MemberValue)> {
    let mut values = Vec::new();
    let mut aliases_seen = 0i64;
    for (index, entry) in e.entries.iter().enumerate() {
        let value = match &entry.value {
            Some(text) => {
                if let Some(literal) = parse_int_literal(text) {
                    MemberValue::Literal(literal)
                } else if e.entries[..index].iter().any(|m| m.name == *text) {
                    aliases_seen += 1;
                    MemberValue::Alias(text.clone())
                } else {
                    MemberValue::Raw(text.clone())
                }
            }
            None => MemberValue::Literal(index as i64 - aliases_seen),
        };
        values.push((entry.name.clone(), value));
    }
    values
}

fn parse_int_literal(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    trimmed.parse::<i64>().ok()
}

/// Translate all enums of one module into a single fragment
pub fn translate_enums(ctx: &mut TranslationContext, enums: &[CppEnum]) -> Fragment {
    let mut text = String::from("/* public enums */\n");
    let mut proxies = String::new();
    let mut hint = String::new();

    for e in enums {
        let name = e.name.clone().unwrap_or_default();
        if let Some(enum_name) = &e.name {
            ctx.run.enums.insert(enum_name.clone());
        }
        let values = member_values(e);

        text.push_str(&raw_enum(&name, &values));

        if let Some(enum_name) = &e.name {
            proxies.push_str(&format!("\nclass {}(IntEnum):\n", enum_name));
            for (member, value) in &values {
                proxies.push_str(&format!("\t{} = {}\n", member, value.render()));
            }
            for (member, _) in &values {
                proxies.push_str(&format!("{} = {}.{}\n", member, enum_name, member));
            }

            let members: Vec<String> = values.iter().map(|(m, _)| m.clone()).collect();
            hint.push_str(&render_enum_hint(e, &members));
        }
    }
    text.push_str("/* end public enums declaration */\n\n");

    if !proxies.is_empty() {
        text.push_str("/* python proxy classes for enums */\n%pythoncode {\n");
        text.push_str(&proxies);
        text.push_str("};\n/* end python proxy for enums */\n\n");
    }

    Fragment::new(Section::Enums, text).with_hint(hint)
}

/// Enum block for a class body
///
/// Same renumbering as the module level, and the names still join the
/// run-wide registry. The integer proxies stay out: %pythoncode is not
/// legal inside a class declaration.
pub fn class_enum_block(ctx: &mut TranslationContext, enums: &[CppEnum]) -> String {
    let mut text = String::from("/* public enums */\n");
    for e in enums {
        if let Some(enum_name) = &e.name {
            ctx.run.enums.insert(enum_name.clone());
        }
        let name = e.name.clone().unwrap_or_default();
        text.push_str(&raw_enum(&name, &member_values(e)));
    }
    text.push_str("/* end public enums declaration */\n\n");
    text
}

fn raw_enum(name: &str, values: &[(String, MemberValue)]) -> String {
    let mut text = format!("enum {} {{\n", name);
    for (member, value) in values {
        text.push_str(&format!("\t{} = {},\n", member, value.render()));
    }
    text.push_str("};\n\n");
    text
}

/// The run-wide by-reference enum file, regenerated in full each run
pub fn byref_enum_templates(run: &RunState) -> String {
    let mut text = String::from("/* enums passed by reference and returned as output values */\n");
    text.push_str("%include<typemaps.i>\n\n");
    for enum_name in &run.byref_enums {
        text.push_str(&format!(
            "%apply Standard_Integer &OutValue {{ {} & }};\n",
            enum_name
        ));
    }
    text
}
