//! Parsed C++ data model
//!
//! Types produced by the header parser and consumed by the translators.
//! Everything is carried as source text: the generator classifies and
//! rewrites type spellings, it never resolves them.

use indexmap::IndexMap;
use serde::Serialize;

/// C++ member access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    /// Parse an access-specifier keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim() {
            "public" => Some(Access::Public),
            "protected" => Some(Access::Protected),
            "private" => Some(Access::Private),
            _ => None,
        }
    }

    /// Keyword spelling, as emitted into inheritance clauses
    pub fn keyword(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

/// One base class of a parsed class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppAncestor {
    /// Base class name as written (template arguments included)
    pub name: String,
    /// Inheritance access
    pub access: Access,
    /// Virtual inheritance
    pub is_virtual: bool,
}

impl CppAncestor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: Access::Public,
            is_virtual: false,
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// One parameter of a method or free function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppParam {
    /// Parameter name ("" when unnamed)
    pub name: String,
    /// Full type text, qualifiers and reference/pointer markers included
    pub type_text: String,
    /// Default value text when present
    pub default_value: Option<String>,
    /// Array extent text for `T name[N]` parameters
    pub array_size: Option<String>,
}

impl CppParam {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            default_value: None,
            array_size: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A method, constructor, destructor, or free function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppMethod {
    /// Name as written (operators keep their `operator` spelling)
    pub name: String,
    /// Return type text; empty for constructors and destructors
    pub return_type: String,
    /// Parameters in declaration order
    pub params: Vec<CppParam>,
    /// Member access; free functions are Public
    pub access: Access,
    /// Constructor flag
    pub is_constructor: bool,
    /// Destructor flag
    pub is_destructor: bool,
    pub is_static: bool,
    pub is_virtual: bool,
    /// Pure virtual (`= 0`)
    pub is_pure_virtual: bool,
    /// Declared inside a template_declaration
    pub is_template: bool,
    /// Friend declaration inside a class body
    pub is_friend: bool,
    /// Trailing const qualifier
    pub is_const: bool,
    /// Leading doxygen brief, when one preceded the declaration
    pub doc: Option<String>,
}

impl CppMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: String::new(),
            params: Vec::new(),
            access: Access::Public,
            is_constructor: false,
            is_destructor: false,
            is_static: false,
            is_virtual: false,
            is_pure_virtual: false,
            is_template: false,
            is_friend: false,
            is_const: false,
            doc: None,
        }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_param(mut self, param: CppParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn as_constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    pub fn as_destructor(mut self) -> Self {
        self.is_destructor = true;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn as_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The operator symbol when this is an operator method
    ///
    /// `operator==` yields `==`; non-operators yield None. `operator` followed
    /// by a type name (conversion operators) yields the type name.
    pub fn operator_symbol(&self) -> Option<&str> {
        self.name
            .strip_prefix("operator")
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One member of an enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppEnumEntry {
    pub name: String,
    /// Initializer text as written; None when the member carries no `=`
    pub value: Option<String>,
}

impl CppEnumEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// An enum declaration, named or anonymous
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppEnum {
    /// None for anonymous enums
    pub name: Option<String>,
    pub entries: Vec<CppEnumEntry>,
    /// Access when nested in a class; Public at namespace scope
    pub access: Access,
}

impl CppEnum {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            entries: Vec::new(),
            access: Access::Public,
        }
    }

    pub fn with_entry(mut self, entry: CppEnumEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// A data member of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppProperty {
    pub name: String,
    /// Full type text
    pub type_text: String,
    pub access: Access,
    pub is_static: bool,
    /// `const`-qualified or constexpr member
    pub is_constant: bool,
    /// Array extent text for `T name[N]` members
    pub array_size: Option<String>,
}

impl CppProperty {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            access: Access::Public,
            is_static: false,
            is_constant: false,
            array_size: None,
        }
    }
}

/// A parsed class or struct
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CppClass {
    pub name: String,
    /// Base classes in declaration order; the generator only ever emits
    /// the first two
    pub ancestors: Vec<CppAncestor>,
    pub methods: Vec<CppMethod>,
    pub properties: Vec<CppProperty>,
    pub enums: Vec<CppEnum>,
    /// Class-scope typedefs, alias → target, declaration order
    pub typedefs: IndexMap<String, String>,
    /// Names of classes declared inside this class body
    pub nested_classes: Vec<String>,
    /// At least one pure virtual method
    pub is_abstract: bool,
    /// Declared under a template_declaration
    pub is_template: bool,
}

impl CppClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            enums: Vec::new(),
            typedefs: IndexMap::new(),
            nested_classes: Vec::new(),
            is_abstract: false,
            is_template: false,
        }
    }

    pub fn with_ancestor(mut self, ancestor: CppAncestor) -> Self {
        self.ancestors.push(ancestor);
        self
    }

    pub fn with_method(mut self, method: CppMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Public constructors declared on the class
    pub fn public_constructors(&self) -> impl Iterator<Item = &CppMethod> {
        self.methods
            .iter()
            .filter(|m| m.is_constructor && m.access == Access::Public)
    }

    /// Any constructor regardless of access
    pub fn has_any_constructor(&self) -> bool {
        self.methods.iter().any(|m| m.is_constructor)
    }

    /// Public methods that are neither constructors nor destructors
    pub fn public_methods(&self) -> impl Iterator<Item = &CppMethod> {
        self.methods.iter().filter(|m| {
            m.access == Access::Public && !m.is_constructor && !m.is_destructor
        })
    }

    /// The destructor, when one is declared
    pub fn destructor(&self) -> Option<&CppMethod> {
        self.methods.iter().find(|m| m.is_destructor)
    }
}

/// Everything extracted from one header file
#[derive(Debug, Clone, Default)]
pub struct ParsedHeader {
    /// Namespace-scope typedefs, alias → target
    pub typedefs: IndexMap<String, String>,
    pub enums: Vec<CppEnum>,
    /// Classes keyed by name, declaration order
    pub classes: IndexMap<String, CppClass>,
    pub functions: Vec<CppMethod>,
}

/// The merged view of all headers of one module
#[derive(Debug, Clone, Default)]
pub struct ModuleIr {
    pub typedefs: IndexMap<String, String>,
    pub enums: Vec<CppEnum>,
    pub classes: IndexMap<String, CppClass>,
    pub free_functions: Vec<CppMethod>,
    /// Header file names that survived filtering, in processing order
    pub headers: Vec<String>,
}

impl ModuleIr {
    /// Merge one parsed header into the module view
    ///
    /// Typedefs and classes overwrite earlier definitions of the same name;
    /// enums and free functions concatenate.
    pub fn merge(&mut self, header_name: &str, parsed: ParsedHeader) {
        for (alias, target) in parsed.typedefs {
            self.typedefs.insert(alias, target);
        }
        self.enums.extend(parsed.enums);
        for (name, class) in parsed.classes {
            self.classes.insert(name, class);
        }
        self.free_functions.extend(parsed.functions);
        self.headers.push(header_name.to_string());
    }
}
