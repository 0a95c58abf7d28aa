//! Type-hint stub rendering
//!
//! Every interface file gets a parallel stub file describing the same
//! surface in annotation form. Translators hand over structured hint
//! records; rendering decides overload markers, optional wrapping, and
//! tuple returns in one place.

use crate::cpp::CppEnum;

/// One parameter of a hinted method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamHint {
    pub name: String,
    /// Already mapped to the hint type vocabulary
    pub type_text: String,
    /// Carries a default value; wrapped in Optional when rendered
    pub optional: bool,
}

/// One method of a hinted class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodHint {
    pub name: String,
    pub is_static: bool,
    pub is_constructor: bool,
    pub params: Vec<ParamHint>,
    /// Hint return types; empty renders as None, several as a tuple
    pub returns: Vec<String>,
}

/// One class of the stub file
#[derive(Debug, Clone, Default)]
pub struct ClassHint {
    pub name: String,
    /// Base class, when it is hintable
    pub ancestor: Option<String>,
    pub methods: Vec<MethodHint>,
}

/// Map a cleaned C++ type spelling to the stub vocabulary
pub fn python_type(type_text: &str) -> String {
    let trimmed = type_text.trim();
    match trimmed {
        "" | "void" => "None".to_string(),
        "char *" | "const char *" | "Standard_CString" => "str".to_string(),
        "double" => "float".to_string(),
        "int" | "size_t" => "int".to_string(),
        "std::string" => "str".to_string(),
        other => other.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// The stub-file prologue: typing imports plus one wildcard import per
/// dependency module.
pub fn hint_header(dependencies: &[String]) -> String {
    let mut text = String::from("from enum import IntEnum\n");
    text.push_str("from typing import overload, Any, NewType, Optional, Tuple\n\n");
    for dependency in dependencies {
        text.push_str(&format!("from OCC.Core.{} import *\n", dependency));
    }
    text.push('\n');
    text
}

/// Render one enum as an integer-enum stub plus member aliases
pub fn render_enum_hint(e: &CppEnum, members: &[String]) -> String {
    let Some(name) = &e.name else {
        return String::new();
    };
    let mut text = format!("class {}(IntEnum):\n", name);
    for member in members {
        text.push_str(&format!("\t{}: int = ...\n", member));
    }
    text.push('\n');
    for member in members {
        text.push_str(&format!("{} = {}.{}\n", member, name, member));
    }
    text.push('\n');
    text
}

/// Opaque stand-in for a typedef the stub cannot model
pub fn render_opaque_hint(alias: &str) -> String {
    format!("{} = NewType(\"{}\", Any)\n", alias, alias)
}

/// Render one class stub
///
/// Constructors collapse into `__init__`; sibling methods sharing a name
/// get the overload marker; operator spellings are unrepresentable in stub
/// form and are left out.
pub fn render_class_hint(class: &ClassHint) -> String {
    let mut text = match &class.ancestor {
        Some(ancestor) => format!("class {}({}):\n", class.name, ancestor),
        None => format!("class {}:\n", class.name),
    };

    let hintable: Vec<&MethodHint> = class
        .methods
        .iter()
        .filter(|m| !m.name.contains("operator") && !m.name.contains(' '))
        .collect();

    if hintable.is_empty() {
        text.push_str("\tpass\n\n");
        return text;
    }

    let constructors: Vec<&&MethodHint> = hintable.iter().filter(|m| m.is_constructor).collect();
    let overloaded_init = constructors.len() > 1;
    for ctor in &constructors {
        if overloaded_init {
            text.push_str("\t@overload\n");
        }
        text.push_str(&format!(
            "\tdef __init__({}) -> None: ...\n",
            render_params(&ctor.params, true)
        ));
    }

    for method in hintable.iter().filter(|m| !m.is_constructor) {
        let siblings = hintable
            .iter()
            .filter(|m| !m.is_constructor && m.name == method.name)
            .count();
        if siblings > 1 {
            text.push_str("\t@overload\n");
        }
        if method.is_static {
            text.push_str("\t@staticmethod\n");
        }
        let params = render_params(&method.params, !method.is_static);
        text.push_str(&format!(
            "\tdef {}({}) -> {}: ...\n",
            method.name,
            params,
            render_returns(&method.returns)
        ));
    }
    text.push('\n');
    text
}

fn render_params(params: &[ParamHint], with_self: bool) -> String {
    let mut parts = Vec::new();
    if with_self {
        parts.push("self".to_string());
    }
    for (index, param) in params.iter().enumerate() {
        let name = if param.name.is_empty() {
            format!("arg_{}", index)
        } else {
            param.name.clone()
        };
        let hint_type = python_type(&param.type_text);
        if param.optional {
            parts.push(format!("{}: Optional[{}] = None", name, hint_type));
        } else {
            parts.push(format!("{}: {}", name, hint_type));
        }
    }
    parts.join(", ")
}

fn render_returns(returns: &[String]) -> String {
    let mapped: Vec<String> = returns.iter().map(|r| python_type(r)).collect();
    match mapped.len() {
        0 => "None".to_string(),
        1 => mapped[0].clone(),
        _ => format!("Tuple[{}]", mapped.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn method(name: &str) -> MethodHint {
        MethodHint {
            name: name.to_string(),
            is_static: false,
            is_constructor: false,
            params: Vec::new(),
            returns: Vec::new(),
        }
    }

    #[test]
    fn test_python_type_mapping() {
        assert_eq!(python_type("float"), "float");
        assert_eq!(python_type("const char *"), "str");
        assert_eq!(python_type("void"), "None");
        assert_eq!(python_type("gp_Pnt"), "gp_Pnt");
    }

    #[test]
    fn test_header_imports_dependencies() {
        let header = hint_header(&["Standard".to_string(), "gp".to_string()]);
        assert!(header.contains("from enum import IntEnum"));
        assert!(header.contains("from OCC.Core.Standard import *"));
        assert!(header.contains("from OCC.Core.gp import *"));
    }

    #[test]
    fn test_simple_class_stub() {
        let mut ctor = method("gp_Pnt");
        ctor.is_constructor = true;
        let mut distance = method("Distance");
        distance.params.push(ParamHint {
            name: "Other".to_string(),
            type_text: "gp_Pnt".to_string(),
            optional: false,
        });
        distance.returns.push("float".to_string());
        let class = ClassHint {
            name: "gp_Pnt".to_string(),
            ancestor: None,
            methods: vec![ctor, distance],
        };

        let stub = render_class_hint(&class);
        assert!(stub.starts_with("class gp_Pnt:\n"));
        assert!(stub.contains("\tdef __init__(self) -> None: ...\n"));
        assert!(stub.contains("\tdef Distance(self, Other: gp_Pnt) -> float: ...\n"));
        assert!(!stub.contains("@overload"));
    }

    #[test]
    fn test_overloaded_constructors() {
        let mut first = method("gp_Pnt");
        first.is_constructor = true;
        let mut second = method("gp_Pnt");
        second.is_constructor = true;
        second.params.push(ParamHint {
            name: "Xp".to_string(),
            type_text: "float".to_string(),
            optional: false,
        });
        let class = ClassHint {
            name: "gp_Pnt".to_string(),
            ancestor: None,
            methods: vec![first, second],
        };

        let stub = render_class_hint(&class);
        assert_eq!(stub.matches("@overload").count(), 2);
        assert!(stub.contains("def __init__(self, Xp: float) -> None: ..."));
    }

    #[test]
    fn test_static_method_marker() {
        let mut confusion = method("Confusion");
        confusion.is_static = true;
        confusion.returns.push("float".to_string());
        let class = ClassHint {
            name: "Precision".to_string(),
            ancestor: None,
            methods: vec![confusion],
        };

        let stub = render_class_hint(&class);
        assert!(stub.contains("\t@staticmethod\n\tdef Confusion() -> float: ...\n"));
    }

    #[test]
    fn test_optional_and_tuple_returns() {
        let mut coord = method("Coord");
        coord.params.push(ParamHint {
            name: "theIndex".to_string(),
            type_text: "int".to_string(),
            optional: true,
        });
        coord.returns.push("float".to_string());
        coord.returns.push("float".to_string());
        let class = ClassHint {
            name: "gp_XYZ".to_string(),
            ancestor: None,
            methods: vec![coord],
        };

        let stub = render_class_hint(&class);
        assert!(stub.contains("theIndex: Optional[int] = None"));
        assert!(stub.contains("-> Tuple[float, float]: ..."));
    }

    #[test]
    fn test_ancestor_rendered() {
        let class = ClassHint {
            name: "Geom_Line".to_string(),
            ancestor: Some("Geom_Curve".to_string()),
            methods: Vec::new(),
        };
        assert!(render_class_hint(&class).starts_with("class Geom_Line(Geom_Curve):\n"));
    }

    #[test]
    fn test_enum_hint() {
        let e = CppEnum::new(Some("TopAbs_Orientation".to_string()));
        let members = vec!["TopAbs_FORWARD".to_string(), "TopAbs_REVERSED".to_string()];
        let stub = render_enum_hint(&e, &members);
        assert!(stub.contains("class TopAbs_Orientation(IntEnum):"));
        assert!(stub.contains("\tTopAbs_FORWARD: int = ...\n"));
        assert!(stub.contains("TopAbs_FORWARD = TopAbs_Orientation.TopAbs_FORWARD\n"));
    }

    #[test]
    fn test_opaque_typedef_hint() {
        assert_eq!(
            render_opaque_hint("gp_TrsfNLerp"),
            "gp_TrsfNLerp = NewType(\"gp_TrsfNLerp\", Any)\n"
        );
    }
}
