//! Collection wrapper emission
//!
//! The collection-definition macros register (wrapper name, element
//! container) pairs run-wide. A wrapper class is emitted by the module
//! whose name prefixes the wrapper name, exactly once, as a reference
//! counted subclass of its container with the container's accessor
//! methods re-exposed.

use crate::context::TranslationContext;
use crate::fragments::{Fragment, Section};
use crate::hints::{render_class_hint, ClassHint};
use indexmap::IndexMap;

const HARRAY1_WRAPPER: &str = "
class HClassName : public _Array1Type_, public Standard_Transient {
  public:
    HClassName(const Standard_Integer theLower, const Standard_Integer theUpper);
    HClassName(const Standard_Integer theLower, const Standard_Integer theUpper, const _Array1Type_::value_type& theValue);
    HClassName(const _Array1Type_& theOther);
    const _Array1Type_& Array1();
    _Array1Type_& ChangeArray1();
};
%make_alias(HClassName)

";

const HARRAY2_WRAPPER: &str = "
class HClassName : public _Array2Type_, public Standard_Transient {
  public:
    HClassName(const Standard_Integer theRowLow, const Standard_Integer theRowUpp, const Standard_Integer theColLow, const Standard_Integer theColUpp);
    HClassName(const Standard_Integer theRowLow, const Standard_Integer theRowUpp, const Standard_Integer theColLow, const Standard_Integer theColUpp, const _Array2Type_::value_type& theValue);
    HClassName(const _Array2Type_& theOther);
    const _Array2Type_& Array2();
    _Array2Type_& ChangeArray2();
};
%make_alias(HClassName)

";

const HSEQUENCE_WRAPPER: &str = "
class HClassName : public _SequenceType_, public Standard_Transient {
  public:
    HClassName();
    HClassName(const _SequenceType_& theOther);
    const _SequenceType_& Sequence();
    void Append (const _SequenceType_::value_type& theItem);
    void Append (_SequenceType_& theSequence);
    _SequenceType_& ChangeSequence();
};
%make_alias(HClassName)

";

/// Emit the collection wrappers owned by the current module
///
/// Wrappers sit at the end of the classes section. The registered element
/// container spelling is normalized before substitution because the macro
/// arguments may have been wrapped across source lines.
pub fn collection_wrappers(ctx: &TranslationContext) -> Fragment {
    let module = ctx.module();
    let mut text = String::new();
    let mut hint = String::new();

    text.push_str(&family_block(
        "/* harray1 classes */",
        HARRAY1_WRAPPER,
        "_Array1Type_",
        module,
        &ctx.run.harray1,
        &mut hint,
    ));
    text.push_str(&family_block(
        "/* harray2 classes */",
        HARRAY2_WRAPPER,
        "_Array2Type_",
        module,
        &ctx.run.harray2,
        &mut hint,
    ));
    text.push_str(&family_block(
        "/* hsequence classes */",
        HSEQUENCE_WRAPPER,
        "_SequenceType_",
        module,
        &ctx.run.hsequence,
        &mut hint,
    ));

    Fragment::new(Section::Classes, text).with_hint(hint)
}

fn family_block(
    banner: &str,
    template: &str,
    marker: &str,
    module: &str,
    registry: &IndexMap<String, String>,
    hint: &mut String,
) -> String {
    let prefix = format!("{}_", module);
    let mut block = banner.to_string();
    for (wrapper, element) in registry {
        if !wrapper.starts_with(&prefix) {
            continue;
        }
        let element = normalize(element);
        block.push_str(
            &template
                .replace("HClassName", wrapper)
                .replace(marker, &element),
        );
        hint.push_str(&wrapper_hint(wrapper, &element));
    }
    block.push('\n');
    block
}

/// Collapse runs of whitespace to single spaces
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stub class for one wrapper; a templated container spelling cannot be
/// named in a stub, so those wrappers derive from nothing
fn wrapper_hint(wrapper: &str, element: &str) -> String {
    let ancestor = if element.contains('<') {
        None
    } else {
        Some(element.to_string())
    };
    render_class_hint(&ClassHint {
        name: wrapper.to_string(),
        ancestor,
        methods: Vec::new(),
    })
}
