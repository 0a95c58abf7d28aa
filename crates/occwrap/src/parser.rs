//! Header parsing
//!
//! Adapts tree-sitter's C++ grammar to the generator's data model. The
//! preprocessor has already cleaned macro noise out of the text, so what
//! arrives here is close to plain C++ declarations. Only declarations are
//! extracted; bodies, expressions, and anything below the member level are
//! ignored.

use crate::cpp::{
    Access, CppAncestor, CppClass, CppEnum, CppEnumEntry, CppMethod, CppParam, CppProperty,
    ParsedHeader,
};
use crate::diagnostics::{WrapError, WrapResult};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parse one preprocessed header into the structured model
///
/// A parser that produces no tree at all is unrecoverable: the error carries
/// the full adapted content so the offending input can be inspected.
pub fn parse_header(file: &Path, content: &str) -> WrapResult<ParsedHeader> {
    let mut parser = Parser::new();
    let language = tree_sitter_cpp::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| WrapError::other(format!("cannot load C++ grammar: {}", e)))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| WrapError::fatal_parse(file, content))?;

    let lowering = Lowering { source: content };
    let mut parsed = ParsedHeader::default();
    lowering.lower_scope(tree.root_node(), &mut parsed);
    Ok(parsed)
}

struct Lowering<'a> {
    source: &'a str,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Walk one declaration scope, recursing through preprocessor
    /// conditionals (header guards wrap whole files) and namespaces.
    fn lower_scope(&self, node: Node, parsed: &mut ParsedHeader) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "preproc_ifdef" | "preproc_if" | "preproc_else" | "preproc_elif" => {
                    self.lower_scope(child, parsed);
                }
                "namespace_definition" | "linkage_specification" => {
                    if let Some(body) = child.child_by_field_name("body") {
                        self.lower_scope(body, parsed);
                    }
                }
                "type_definition" => {
                    if let Some((alias, target)) = self.lower_typedef(child) {
                        parsed.typedefs.insert(alias, target);
                    }
                }
                "alias_declaration" => {
                    if let Some((alias, target)) = self.lower_alias(child) {
                        parsed.typedefs.insert(alias, target);
                    }
                }
                "enum_specifier" => {
                    if let Some(e) = self.lower_enum(child) {
                        parsed.enums.push(e);
                    }
                }
                "class_specifier" | "struct_specifier" => {
                    if let Some(class) = self.lower_class(child) {
                        parsed.classes.insert(class.name.clone(), class);
                    }
                }
                "template_declaration" => {
                    self.lower_template(child, parsed);
                }
                "declaration" => {
                    self.lower_top_level_declaration(child, parsed);
                }
                "function_definition" => {
                    if let Some(f) = self.lower_member(child, "", None) {
                        parsed.functions.push(f);
                    }
                }
                _ => {}
            }
        }
    }

    /// A top-level declaration is a free function, or a class/enum
    /// definition the grammar folded into a declaration node.
    fn lower_top_level_declaration(&self, node: Node, parsed: &mut ParsedHeader) {
        if let Some(type_node) = node.child_by_field_name("type") {
            match type_node.kind() {
                "enum_specifier" => {
                    if let Some(e) = self.lower_enum(type_node) {
                        parsed.enums.push(e);
                    }
                    return;
                }
                "class_specifier" | "struct_specifier" => {
                    if let Some(class) = self.lower_class(type_node) {
                        parsed.classes.insert(class.name.clone(), class);
                    }
                    return;
                }
                _ => {}
            }
        }
        if find_function_declarator(node).is_some() {
            if let Some(f) = self.lower_member(node, "", None) {
                parsed.functions.push(f);
            }
        }
    }

    /// Template classes are recorded but never wrapped directly; their
    /// instantiations arrive through typedefs. Template free functions are
    /// recorded so the method filter can drop them by flag.
    fn lower_template(&self, node: Node, parsed: &mut ParsedHeader) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "class_specifier" | "struct_specifier" => {
                    if let Some(mut class) = self.lower_class(child) {
                        class.is_template = true;
                        parsed.classes.insert(class.name.clone(), class);
                    }
                }
                "function_definition" | "declaration" => {
                    if let Some(mut f) = self.lower_member(child, "", None) {
                        f.is_template = true;
                        parsed.functions.push(f);
                    }
                }
                _ => {}
            }
        }
    }

    fn lower_typedef(&self, node: Node) -> Option<(String, String)> {
        let type_node = node.child_by_field_name("type")?;
        let declarator = node.child_by_field_name("declarator")?;
        let alias = innermost_identifier(declarator).map(|n| self.text(n).to_string())?;

        let mut target = self.text(type_node).to_string();
        let declarator_text = self.text(declarator);
        if declarator_text != alias {
            // function-pointer and array typedefs keep their decoration,
            // minus the alias name itself
            let decoration = declarator_text.replacen(&alias, "", 1);
            let decoration = decoration.trim();
            if !decoration.is_empty() {
                target.push(' ');
                target.push_str(decoration);
            }
        }
        Some((alias, squeeze_spaces(&target)))
    }

    fn lower_alias(&self, node: Node) -> Option<(String, String)> {
        let alias = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())?;
        let target = node
            .child_by_field_name("type")
            .map(|n| squeeze_spaces(self.text(n)))?;
        Some((alias, target))
    }

    fn lower_enum(&self, node: Node) -> Option<CppEnum> {
        let body = node.child_by_field_name("body")?;
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());
        let mut result = CppEnum::new(name);
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() != "enumerator" {
                continue;
            }
            let Some(entry_name) = child.child_by_field_name("name") else {
                continue;
            };
            let mut entry = CppEnumEntry::new(self.text(entry_name));
            if let Some(value) = child.child_by_field_name("value") {
                entry.value = Some(self.text(value).trim().to_string());
            }
            result.entries.push(entry);
        }
        Some(result)
    }

    fn lower_class(&self, node: Node) -> Option<CppClass> {
        let body = node.child_by_field_name("body")?;
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let mut class = CppClass::new(&name);

        if let Some(bases) = node
            .children(&mut node.walk())
            .find(|c| c.kind() == "base_class_clause")
        {
            self.lower_bases(bases, node.kind(), &mut class);
        }

        // members default to private in a class, public in a struct
        let mut access = if node.kind() == "struct_specifier" {
            Access::Public
        } else {
            Access::Private
        };
        let mut pending_doc: Option<String> = None;

        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "access_specifier" => {
                    let keyword = self.text(child).trim_end_matches(':').trim();
                    if let Some(parsed) = Access::from_keyword(keyword) {
                        access = parsed;
                    }
                }
                "comment" => {
                    pending_doc = doxygen_brief(self.text(child)).or(pending_doc);
                }
                "field_declaration"
                | "declaration"
                | "function_definition"
                | "constructor_or_destructor_declaration"
                | "constructor_or_destructor_definition" => {
                    self.lower_class_member(child, &name, access, pending_doc.take(), &mut class);
                }
                "template_declaration" => {
                    let mut inner_cursor = child.walk();
                    for inner in child.children(&mut inner_cursor) {
                        if matches!(inner.kind(), "declaration" | "function_definition") {
                            if let Some(mut m) =
                                self.lower_member(inner, &name, pending_doc.take())
                            {
                                m.access = access;
                                m.is_template = true;
                                class.methods.push(m);
                            }
                        }
                    }
                }
                "friend_declaration" => {
                    let mut inner_cursor = child.walk();
                    for inner in child.children(&mut inner_cursor) {
                        if matches!(inner.kind(), "declaration" | "function_definition") {
                            if let Some(mut m) = self.lower_member(inner, &name, None) {
                                m.access = access;
                                m.is_friend = true;
                                class.methods.push(m);
                            }
                        }
                    }
                }
                "type_definition" => {
                    if access == Access::Public {
                        if let Some((alias, target)) = self.lower_typedef(child) {
                            class.typedefs.insert(alias, target);
                        }
                    }
                }
                "alias_declaration" => {
                    if access == Access::Public {
                        if let Some((alias, target)) = self.lower_alias(child) {
                            class.typedefs.insert(alias, target);
                        }
                    }
                }
                "enum_specifier" => {
                    if let Some(mut e) = self.lower_enum(child) {
                        e.access = access;
                        class.enums.push(e);
                    }
                }
                "class_specifier" | "struct_specifier" => {
                    if let Some(nested_name) = child.child_by_field_name("name") {
                        class.nested_classes.push(self.text(nested_name).to_string());
                    }
                }
                _ => {}
            }
            if child.kind() != "comment" {
                pending_doc = None;
            }
        }

        class.is_abstract = class.methods.iter().any(|m| m.is_pure_virtual);
        Some(class)
    }

    fn lower_bases(&self, clause: Node, class_kind: &str, class: &mut CppClass) {
        let default_access = if class_kind == "struct_specifier" {
            Access::Public
        } else {
            Access::Private
        };
        let mut access = default_access;
        let mut is_virtual = false;
        let mut cursor = clause.walk();
        for child in clause.children(&mut cursor) {
            match child.kind() {
                "access_specifier" => {
                    if let Some(parsed) =
                        Access::from_keyword(self.text(child).trim_end_matches(':'))
                    {
                        access = parsed;
                    }
                }
                "virtual" | "virtual_specifier" => is_virtual = true,
                "type_identifier" | "qualified_identifier" | "template_type" => {
                    class.ancestors.push(CppAncestor {
                        name: squeeze_spaces(self.text(child)),
                        access,
                        is_virtual,
                    });
                    access = default_access;
                    is_virtual = false;
                }
                _ => {}
            }
        }
    }

    fn lower_class_member(
        &self,
        node: Node,
        class_name: &str,
        access: Access,
        doc: Option<String>,
        class: &mut CppClass,
    ) {
        // a type defined in member position arrives as a declaration with
        // the definition as its type node and no declarator
        if let Some(type_node) = node.child_by_field_name("type") {
            match type_node.kind() {
                "enum_specifier" if type_node.child_by_field_name("body").is_some() => {
                    if let Some(mut e) = self.lower_enum(type_node) {
                        e.access = access;
                        class.enums.push(e);
                    }
                    return;
                }
                "class_specifier" | "struct_specifier"
                    if type_node.child_by_field_name("body").is_some() =>
                {
                    if let Some(nested_name) = type_node.child_by_field_name("name") {
                        class.nested_classes.push(self.text(nested_name).to_string());
                    }
                    return;
                }
                _ => {}
            }
        }
        if find_function_declarator(node).is_some() {
            if let Some(mut method) = self.lower_member(node, class_name, doc) {
                method.access = access;
                class.methods.push(method);
            }
        } else if node.kind() == "field_declaration" {
            if let Some(mut property) = self.lower_property(node) {
                property.access = access;
                class.properties.push(property);
            }
        }
    }

    /// Lower a method, constructor, destructor, or free function
    fn lower_member(&self, node: Node, class_name: &str, doc: Option<String>) -> Option<CppMethod> {
        let declarator = find_function_declarator(node)?;
        // identifier, field_identifier, destructor_name, operator_name, and
        // conversion operators all keep their literal text as the name
        let name_node = declarator.child_by_field_name("declarator")?;
        let name = squeeze_spaces(self.text(name_node));

        let mut method = CppMethod::new(&name);
        method.doc = doc;
        method.is_destructor = name.starts_with('~');
        method.is_constructor = !method.is_destructor && name == class_name;

        if !method.is_constructor && !method.is_destructor {
            method.return_type = self.member_type_text(node, declarator);
        }

        let node_text = self.text(node);
        method.is_pure_virtual = pure_virtual_text(node_text);
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "virtual" | "virtual_function_specifier" => method.is_virtual = true,
                "storage_class_specifier" => {
                    if self.text(child) == "static" {
                        method.is_static = true;
                    }
                }
                _ => {}
            }
        }
        if method.is_pure_virtual {
            method.is_virtual = true;
        }

        if let Some(params) = declarator.child_by_field_name("parameters") {
            let mut param_cursor = params.walk();
            for child in params.children(&mut param_cursor) {
                match child.kind() {
                    "parameter_declaration" | "optional_parameter_declaration" => {
                        if let Some(param) = self.lower_param(child) {
                            method.params.push(param);
                        }
                    }
                    _ => {}
                }
            }
        }

        // trailing const qualifier sits inside the function declarator
        let mut decl_cursor = declarator.walk();
        for child in declarator.children(&mut decl_cursor) {
            if child.kind() == "type_qualifier" && self.text(child) == "const" {
                method.is_const = true;
            }
        }

        Some(method)
    }

    fn lower_param(&self, node: Node) -> Option<CppParam> {
        let type_node = node.child_by_field_name("type")?;
        let mut type_text = String::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "type_qualifier" && child.start_byte() < type_node.start_byte() {
                type_text.push_str(self.text(child));
                type_text.push(' ');
            }
        }
        type_text.push_str(self.text(type_node));

        let mut name = String::new();
        let mut extent = None;
        if let Some(declarator) = node.child_by_field_name("declarator") {
            let markers = declarator_markers(declarator);
            if !markers.is_empty() {
                type_text.push(' ');
                type_text.push_str(&markers);
            }
            if let Some(id) = innermost_identifier(declarator) {
                name = self.text(id).to_string();
            }
            extent = array_size(declarator).map(|n| self.text(n).trim().to_string());
        }

        let mut param = CppParam::new(name, squeeze_spaces(&type_text));
        param.array_size = extent;
        if let Some(default) = node.child_by_field_name("default_value") {
            param.default_value = Some(self.text(default).trim().to_string());
        }
        Some(param)
    }

    fn lower_property(&self, node: Node) -> Option<CppProperty> {
        let type_node = node.child_by_field_name("type")?;
        let declarator = node.child_by_field_name("declarator")?;
        let name = innermost_identifier(declarator).map(|n| self.text(n).to_string())?;

        let mut type_text = String::new();
        let mut is_constant = false;
        let mut is_static = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "type_qualifier" if child.start_byte() < type_node.start_byte() => {
                    is_constant = is_constant || self.text(child) == "const";
                    type_text.push_str(self.text(child));
                    type_text.push(' ');
                }
                "storage_class_specifier" => {
                    if self.text(child) == "static" {
                        is_static = true;
                    }
                }
                _ => {}
            }
        }
        type_text.push_str(self.text(type_node));
        let markers = declarator_markers(declarator);
        if !markers.is_empty() {
            type_text.push(' ');
            type_text.push_str(&markers);
        }

        let mut property = CppProperty::new(name, squeeze_spaces(&type_text));
        property.is_constant = is_constant;
        property.is_static = is_static;
        property.array_size = array_size(declarator).map(|n| self.text(n).trim().to_string());
        Some(property)
    }

    /// Return type text: qualifiers before the type, the type itself, and
    /// any pointer/reference decoration between it and the parameter list.
    fn member_type_text(&self, node: Node, declarator: Node) -> String {
        let Some(type_node) = node.child_by_field_name("type") else {
            return String::new();
        };
        let mut text = String::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "type_qualifier" && child.start_byte() < type_node.start_byte() {
                text.push_str(self.text(child));
                text.push(' ');
            }
        }
        text.push_str(self.text(type_node));

        // walk from the outer declarator down to the function declarator,
        // collecting reference/pointer markers
        if let Some(outer) = node.child_by_field_name("declarator") {
            let mut markers = String::new();
            let mut current = outer;
            while current.id() != declarator.id() {
                match current.kind() {
                    "reference_declarator" => markers.push('&'),
                    "pointer_declarator" => markers.push('*'),
                    _ => {}
                }
                let Some(next) = current
                    .child_by_field_name("declarator")
                    .or_else(|| current.named_child(current.named_child_count().saturating_sub(1)))
                else {
                    break;
                };
                current = next;
            }
            if !markers.is_empty() {
                text.push(' ');
                text.push_str(&markers);
            }
        }
        squeeze_spaces(&text)
    }
}

/// Find the function declarator under a declaration-like node, looking
/// through reference/pointer/init wrappers.
fn find_function_declarator(node: Node) -> Option<Node> {
    let declarator = node.child_by_field_name("declarator")?;
    let mut current = declarator;
    loop {
        if current.kind() == "function_declarator" {
            return Some(current);
        }
        match current.kind() {
            "reference_declarator" | "pointer_declarator" | "init_declarator"
            | "parenthesized_declarator" => {
                let next = current.child_by_field_name("declarator").or_else(|| {
                    let mut cursor = current.walk();
                    let found = current
                        .children(&mut cursor)
                        .find(|c| c.kind().ends_with("declarator"));
                    found
                })?;
                current = next;
            }
            _ => return None,
        }
    }
}

/// The identifier naming a declarator, however deeply wrapped
fn innermost_identifier(node: Node) -> Option<Node> {
    match node.kind() {
        "identifier" | "field_identifier" | "type_identifier" => Some(node),
        _ => {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            for child in children {
                if let Some(found) = innermost_identifier(child) {
                    return Some(found);
                }
            }
            None
        }
    }
}

/// Pointer/reference markers carried by a declarator chain
fn declarator_markers(node: Node) -> String {
    let mut markers = String::new();
    let mut current = Some(node);
    while let Some(n) = current {
        match n.kind() {
            "reference_declarator" => markers.push('&'),
            "pointer_declarator" => markers.push('*'),
            _ => {}
        }
        current = n.child_by_field_name("declarator").or_else(|| {
            let mut cursor = n.walk();
            let found = n.children(&mut cursor).find(|c| c.kind().ends_with("declarator"));
            found
        });
    }
    markers
}

/// Array extent of an array declarator, when present
fn array_size(node: Node) -> Option<Node> {
    if node.kind() == "array_declarator" {
        return node.child_by_field_name("size");
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for child in children {
        if let Some(found) = array_size(child) {
            return Some(found);
        }
    }
    None
}

/// `= 0` at the end of a declaration marks a pure virtual method
fn pure_virtual_text(text: &str) -> bool {
    let trimmed = text.trim_end().trim_end_matches(';').trim_end();
    trimmed.ends_with("= 0") || trimmed.ends_with("=0")
}

/// A doxygen brief comment, prefix stripped
fn doxygen_brief(comment: &str) -> Option<String> {
    let trimmed = comment.trim();
    if let Some(rest) = trimmed.strip_prefix("//!") {
        let brief = rest.trim();
        if brief.is_empty() {
            None
        } else {
            Some(brief.to_string())
        }
    } else {
        None
    }
}

/// Collapse runs of whitespace into single spaces
fn squeeze_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(content: &str) -> ParsedHeader {
        parse_header(Path::new("test.hxx"), content).unwrap()
    }

    #[test]
    fn test_simple_class() {
        let parsed = parse(
            "class gp_Pnt {\npublic:\n  gp_Pnt();\n  double Distance (const gp_Pnt & Other) const;\n};\n",
        );
        let class = &parsed.classes["gp_Pnt"];
        assert_eq!(class.methods.len(), 2);
        assert!(class.methods[0].is_constructor);
        let distance = &class.methods[1];
        assert_eq!(distance.name, "Distance");
        assert_eq!(distance.return_type, "double");
        assert!(distance.is_const);
        assert_eq!(distance.params[0].type_text, "const gp_Pnt &");
        assert_eq!(distance.params[0].name, "Other");
    }

    #[test]
    fn test_class_inside_header_guard() {
        let parsed = parse(
            "#ifndef _gp_Pnt_HeaderFile\n#define _gp_Pnt_HeaderFile\nclass gp_Pnt {\npublic:\n  gp_Pnt();\n};\n#endif\n",
        );
        assert!(parsed.classes.contains_key("gp_Pnt"));
    }

    #[test]
    fn test_inheritance_with_access() {
        let parsed = parse("class Geom_Line : public Geom_Curve {\npublic:\n  Geom_Line();\n};\n");
        let class = &parsed.classes["Geom_Line"];
        assert_eq!(class.ancestors.len(), 1);
        assert_eq!(class.ancestors[0].name, "Geom_Curve");
        assert_eq!(class.ancestors[0].access, Access::Public);
    }

    #[test]
    fn test_access_partitions() {
        let parsed = parse(
            "class Geom_Axis {\npublic:\n  void Reverse();\nprotected:\n  Geom_Axis();\nprivate:\n  void Hidden();\n};\n",
        );
        let class = &parsed.classes["Geom_Axis"];
        let reverse = class.methods.iter().find(|m| m.name == "Reverse").unwrap();
        assert_eq!(reverse.access, Access::Public);
        let ctor = class.methods.iter().find(|m| m.is_constructor).unwrap();
        assert_eq!(ctor.access, Access::Protected);
        let hidden = class.methods.iter().find(|m| m.name == "Hidden").unwrap();
        assert_eq!(hidden.access, Access::Private);
    }

    #[test]
    fn test_pure_virtual_marks_abstract() {
        let parsed = parse(
            "class Geom_Curve : public Geom_Geometry {\npublic:\n  virtual void Reverse() = 0;\n};\n",
        );
        let class = &parsed.classes["Geom_Curve"];
        assert!(class.is_abstract);
        assert!(class.methods[0].is_pure_virtual);
        assert!(class.methods[0].is_virtual);
    }

    #[test]
    fn test_static_method() {
        let parsed = parse(
            "class Precision {\npublic:\n  static double Confusion();\n};\n",
        );
        let class = &parsed.classes["Precision"];
        assert!(class.methods[0].is_static);
    }

    #[test]
    fn test_default_value() {
        let parsed = parse(
            "class Geom_Circle {\npublic:\n  void SetRadius (const double R = 1.0);\n};\n",
        );
        let param = &parsed.classes["Geom_Circle"].methods[0].params[0];
        assert_eq!(param.default_value.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_enum() {
        let parsed = parse("enum TopAbs_Orientation { TopAbs_FORWARD, TopAbs_REVERSED = 3 };\n");
        assert_eq!(parsed.enums.len(), 1);
        let e = &parsed.enums[0];
        assert_eq!(e.name.as_deref(), Some("TopAbs_Orientation"));
        assert_eq!(e.entries[0].name, "TopAbs_FORWARD");
        assert_eq!(e.entries[0].value, None);
        assert_eq!(e.entries[1].value.as_deref(), Some("3"));
    }

    #[test]
    fn test_typedef_template() {
        let parsed =
            parse("typedef NCollection_Array1<Standard_Real> TColStd_Array1OfReal;\n");
        assert_eq!(
            parsed.typedefs["TColStd_Array1OfReal"],
            "NCollection_Array1<Standard_Real>"
        );
    }

    #[test]
    fn test_handle_template_param() {
        let parsed = parse(
            "class Geom_Line {\npublic:\n  void SetCurve (const opencascade::handle<Geom_Curve> & C);\n};\n",
        );
        let param = &parsed.classes["Geom_Line"].methods[0].params[0];
        assert_eq!(param.type_text, "const opencascade::handle<Geom_Curve> &");
    }

    #[test]
    fn test_destructor_detected() {
        let parsed = parse("class Geom_Line {\npublic:\n  ~Geom_Line();\n};\n");
        let class = &parsed.classes["Geom_Line"];
        assert!(class.methods[0].is_destructor);
    }

    #[test]
    fn test_operator_name() {
        let parsed = parse(
            "class gp_Vec {\npublic:\n  bool operator== (const gp_Vec & Other) const;\n};\n",
        );
        let class = &parsed.classes["gp_Vec"];
        assert_eq!(class.methods[0].name, "operator==");
    }

    #[test]
    fn test_free_function() {
        let parsed = parse("int HashCode (const double Real, const int Upper);\n");
        assert_eq!(parsed.functions.len(), 1);
        assert_eq!(parsed.functions[0].name, "HashCode");
        assert_eq!(parsed.functions[0].params.len(), 2);
    }

    #[test]
    fn test_doxygen_brief_attached() {
        let parsed = parse(
            "class gp_Pnt {\npublic:\n  //! Computes the distance between two points.\n  double Distance (const gp_Pnt & Other) const;\n};\n",
        );
        let method = &parsed.classes["gp_Pnt"].methods[0];
        assert_eq!(
            method.doc.as_deref(),
            Some("Computes the distance between two points.")
        );
    }

    #[test]
    fn test_template_class_flagged() {
        let parsed = parse(
            "template <class TheItemType> class NCollection_Array1 {\npublic:\n  void Clear();\n};\n",
        );
        let class = &parsed.classes["NCollection_Array1"];
        assert!(class.is_template);
    }

    #[test]
    fn test_reference_return_type() {
        let parsed = parse(
            "class TopoDS_Shape {\npublic:\n  const TopLoc_Location & Location() const;\n};\n",
        );
        let method = &parsed.classes["TopoDS_Shape"].methods[0];
        assert_eq!(method.return_type, "const TopLoc_Location &");
    }

    #[test]
    fn test_property_with_array() {
        let parsed = parse("class Geom_Box {\npublic:\n  double coords[3];\n  int kind;\n};\n");
        let class = &parsed.classes["Geom_Box"];
        assert_eq!(class.properties.len(), 2);
        let coords = class.properties.iter().find(|p| p.name == "coords").unwrap();
        assert_eq!(coords.array_size.as_deref(), Some("3"));
    }

    #[test]
    fn test_nested_enum_and_class() {
        let parsed = parse(
            "class BRepMesh_Context {\npublic:\n  enum Mode { Fast, Accurate };\n  class Inner {};\n};\n",
        );
        let class = &parsed.classes["BRepMesh_Context"];
        assert_eq!(class.enums.len(), 1);
        assert_eq!(class.nested_classes, vec!["Inner"]);
    }
}
