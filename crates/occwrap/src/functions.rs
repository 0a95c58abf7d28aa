//! Method and free-function translation
//!
//! One pass per function, three terminal outcomes: dropped, routed to a
//! shim, or emitted as a standard signature line with its documentation
//! feature. The exclusion ladder runs in a fixed order; the first rule that
//! fires wins.

use crate::context::TranslationContext;
use crate::cpp::CppMethod;
use crate::hints::{MethodHint, ParamHint};
use crate::params::{
    adapt_default_value, adapt_function_name, adapt_param_type, adapt_return_type, fix_type,
    render_param, ParamRole,
};
use crate::shims::{
    equality_shim, from_string_shim, getter_setter_shim, hash_shim, in_place_shim,
    inequality_shim, json_dump_shim, to_string_shim, InPlaceOp, Shim,
};

/// Operator symbols with no binding representation
const DISALLOWED_OPERATORS: &[&str] = &["++", "()", "[]", "<<", "^", "!"];

/// Return types that trigger getter/setter synthesis
const BYREF_PRIMITIVES: &[(&str, &str)] = &[
    ("Standard_Integer &", "Standard_Integer"),
    ("Standard_Real &", "Standard_Real"),
    ("Standard_Boolean &", "Standard_Boolean"),
    ("Standard_Integer&", "Standard_Integer"),
    ("Standard_Real&", "Standard_Real"),
    ("Standard_Boolean&", "Standard_Boolean"),
];

/// Terminal translation state of one function
#[derive(Debug, Clone)]
pub enum FunctionOutcome {
    /// Not representable; nothing emitted
    Dropped,
    /// Routed to an adapter block
    Shim(Shim),
    /// Ordinary signature line plus documentation feature
    Standard { text: String, hint: MethodHint },
}

impl FunctionOutcome {
    pub fn text(&self) -> &str {
        match self {
            FunctionOutcome::Dropped => "",
            FunctionOutcome::Shim(shim) => &shim.text,
            FunctionOutcome::Standard { text, .. } => text,
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, FunctionOutcome::Dropped)
    }
}

/// Translate one method or free function
pub fn translate_function(ctx: &mut TranslationContext, f: &CppMethod) -> FunctionOutcome {
    if f.is_template || f.is_destructor {
        return FunctionOutcome::Dropped;
    }

    let function_name = adapt_function_name(&f.name);
    if function_name.contains("operator Handle") {
        return FunctionOutcome::Dropped;
    }

    if let Some(symbol) = f.operator_symbol() {
        if DISALLOWED_OPERATORS.contains(&symbol) {
            return FunctionOutcome::Dropped;
        }
        if let Some(shim) = operator_shim(f, symbol) {
            return FunctionOutcome::Shim(shim);
        }
        if symbol == "==" || symbol == "!=" || InPlaceOp::from_symbol(symbol).is_some() {
            // supported operator with no usable parameter
            return FunctionOutcome::Dropped;
        }
    }

    if f.params.len() == 1 {
        let param_type = f.params[0].type_text.replace('&', "");
        if param_type.contains("Standard_OStream") {
            return FunctionOutcome::Shim(to_string_shim(&function_name));
        }
        if param_type.contains("std::istream") || param_type.contains("Standard_IStream") {
            return FunctionOutcome::Shim(from_string_shim(&function_name));
        }
    }
    if function_name == "DumpJson" {
        return FunctionOutcome::Shim(json_dump_shim());
    }

    if f.return_type.contains("TYPENAME") {
        return FunctionOutcome::Dropped;
    }
    if function_name == "DEFINE_STANDARD_RTTIEXT" || function_name == "Handle" {
        return FunctionOutcome::Dropped;
    }

    standard_function(ctx, f, &function_name)
}

/// Shim routing for the supported operator kinds
fn operator_shim(f: &CppMethod, symbol: &str) -> Option<Shim> {
    let param_type = f.params.first()?.type_text.replace('&', "");
    match symbol {
        "==" => Some(equality_shim(&param_type)),
        "!=" => Some(inequality_shim(&param_type)),
        _ => InPlaceOp::from_symbol(symbol).map(|op| in_place_shim(op, &param_type)),
    }
}

fn standard_function(
    ctx: &mut TranslationContext,
    f: &CppMethod,
    function_name: &str,
) -> FunctionOutcome {
    let mut return_type = if f.is_constructor {
        String::new()
    } else {
        adapt_return_type(ctx, &f.return_type)
    };
    if f.is_static && !return_type.contains("static") {
        return_type = format!("static {}", return_type);
    }

    // a mutable primitive reference return becomes a getter/setter pair
    for (byref, value_type) in BYREF_PRIMITIVES {
        if return_type == *byref {
            let mut params_typed = Vec::new();
            let mut param_names = Vec::new();
            for param in &f.params {
                let adapted = adapt_param_type(ctx, &param.type_text);
                params_typed.push(format!("{} {}", adapted, param.name));
                param_names.push(param.name.clone());
            }
            return FunctionOutcome::Shim(getter_setter_shim(
                function_name,
                value_type,
                &params_typed,
                &param_names,
            ));
        }
    }

    let mut rendered_params = Vec::new();
    let mut out_values = Vec::new();
    for param in &f.params {
        let rendered = render_param(ctx, param);
        if rendered.poisoned {
            return FunctionOutcome::Dropped;
        }
        if let ParamRole::OutValue(hint_type) = rendered.role {
            out_values.push(hint_type.to_string());
        }
        rendered_params.push(rendered);
    }

    let mut text = format!(
        "\t\t/****************** {} ******************/\n",
        function_name
    );
    text.push_str(&format!(
        "\t\t%feature(\"compactdefaultargs\") {};\n",
        function_name
    ));
    text.push_str(&function_docstring(ctx, f, function_name, &return_type));
    text.push_str("\t\t");
    if !return_type.is_empty() {
        text.push_str(&return_type);
        text.push(' ');
    }
    text.push_str(function_name);
    text.push_str(" (");
    let joined: Vec<&str> = rendered_params.iter().map(|p| p.text.as_str()).collect();
    text.push_str(&joined.join(","));
    text.push_str(");\n");

    if function_name == "HashCode" && f.params.len() == 1 {
        text.push_str(&hash_shim().text);
    }

    let text = text.replace("const const", "const");

    let hint = method_hint(f, function_name, &return_type, &out_values);
    ctx.run.methods_done += 1;
    FunctionOutcome::Standard { text, hint }
}

/// The documentation feature bound to the next declaration
fn function_docstring(
    ctx: &mut TranslationContext,
    f: &CppMethod,
    function_name: &str,
    return_type: &str,
) -> String {
    let mut body = String::new();
    if let Some(doc) = &f.doc {
        body.push_str("\t* ");
        body.push_str(&clean_doxygen(doc));
        body.push('\n');
    }
    for param in &f.params {
        let mut param_type = fix_type(&adapt_param_type(ctx, &param.type_text));
        if param_type.contains("gp_") {
            param_type = param_type.replace('&', "");
        }
        let param_type = param_type.trim();
        body.push_str(&format!("\t:param {}:", param.name));
        if let Some(default) = &param.default_value {
            body.push_str(&format!(" default value is {}", adapt_default_value(default)));
        }
        body.push('\n');
        body.push_str(&format!("\t:type {}: {}\n", param.name, param_type));
    }
    body.push_str("\t:rtype:");
    if return_type.is_empty() || return_type == "void" {
        body.push_str(" None\n");
    } else {
        let mut ret = return_type.replace('&', "");
        ret = ret.replace("virtual", "");
        ret = fix_type(&ret);
        ret = ret.replace("static ", "");
        body.push_str(&format!(" {}\n", ret.trim()));
    }
    format!(
        "\t\t%feature(\"autodoc\", \"{}\") {};\n",
        body.trim(),
        function_name
    )
}

/// Doxygen brief cleanup for embedding inside a quoted feature string
fn clean_doxygen(doc: &str) -> String {
    let mut cleaned = doc.replace('"', "'");
    cleaned = cleaned.replace("??", "");
    cleaned = cleaned.replace("\\ <br>", " ");
    cleaned = cleaned.replace("<br>", " ");
    cleaned = cleaned.replace("<me>", "<self>");
    cleaned = cleaned.replace("\\return", "Returns");
    cleaned = cleaned.replace('\r', "");
    cleaned = cleaned.replace('\n', " ");
    cleaned = cleaned.replace("TRUE", "True");
    cleaned = cleaned.replace("FALSE", "False");
    cleaned = cleaned.replace("@return", "returns");
    while cleaned.contains("  ") {
        cleaned = cleaned.replace("  ", " ");
    }
    cleaned = cleaned.replace("Returns the algorithm", "Missing detailed docstring");
    cleaned.trim().to_string()
}

/// Structured hint record consumed by the stub assembler
fn method_hint(
    f: &CppMethod,
    function_name: &str,
    return_type: &str,
    out_values: &[String],
) -> MethodHint {
    let mut params = Vec::new();
    for param in &f.params {
        let hint_type = fix_type(&param.type_text).replace(['&', '*'], "");
        params.push(ParamHint {
            name: param.name.clone(),
            type_text: hint_type.trim().to_string(),
            optional: param.default_value.is_some(),
        });
    }

    let mut returns = Vec::new();
    if !f.is_constructor && !return_type.is_empty() && return_type != "void" {
        let mut ret = return_type.replace(['&', '*'], "");
        ret = ret.replace("static ", "");
        ret = ret.replace("virtual ", "");
        returns.push(fix_type(&ret).trim().to_string());
    }
    returns.extend(out_values.iter().cloned());

    MethodHint {
        name: function_name.to_string(),
        is_static: f.is_static,
        is_constructor: f.is_constructor,
        params,
        returns,
    }
}

/// Free functions are translated for their side effects on the dependency
/// and statistics state, sorted by name the way methods are, but their text
/// is never assembled into the output.
pub fn translate_free_functions(ctx: &mut TranslationContext, functions: &[CppMethod]) -> String {
    let mut sorted: Vec<&CppMethod> = functions.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let mut text = String::new();
    for f in sorted {
        let outcome = translate_function(ctx, f);
        text.push_str(outcome.text());
    }
    text
}
