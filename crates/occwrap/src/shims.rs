//! Generated adapter code
//!
//! Some C++ constructs have no direct binding equivalent: overloaded
//! operators, stream-writing methods, methods returning a mutable reference
//! to a primitive. Each gets a small extension block wrapping the construct
//! behind a callable the binding layer can express. One builder per shim
//! kind, each returning the finished block.

/// What a shim stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimKind {
    Equality,
    Inequality,
    InPlaceAdd,
    InPlaceSub,
    InPlaceMul,
    InPlaceDiv,
    ToString,
    FromString,
    JsonDump,
    GetterSetter,
    Hash,
}

/// One generated extension block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shim {
    pub kind: ShimKind,
    pub text: String,
}

impl Shim {
    fn new(kind: ShimKind, text: String) -> Self {
        Self { kind, text }
    }
}

/// `operator==` wrapper plus its `__eq__` binding
///
/// The binding swallows type errors and answers false, so comparing against
/// an unrelated value behaves like ordinary equality instead of raising.
pub fn equality_shim(param_type: &str) -> Shim {
    let text = format!(
        "
        %extend{{
            bool __eq_wrapper__({param_type} other) {{
            if (*self==other) return true;
            else return false;
            }}
        }}
        %pythoncode {{
        def __eq__(self, right):
            try:
                return self.__eq_wrapper__(right)
            except:
                return False
        }}
"
    );
    Shim::new(ShimKind::Equality, text)
}

/// `operator!=` wrapper plus its `__ne__` binding
pub fn inequality_shim(param_type: &str) -> Shim {
    let text = format!(
        "
        %extend{{
            bool __ne_wrapper__({param_type} other) {{
            if (*self!=other) return true;
            else return false;
            }}
        }}
        %pythoncode {{
        def __ne__(self, right):
            try:
                return self.__ne_wrapper__(right)
            except:
                return True
        }}
"
    );
    Shim::new(ShimKind::Inequality, text)
}

/// The four supported compound-assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InPlaceOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl InPlaceOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+=" => Some(InPlaceOp::Add),
            "-=" => Some(InPlaceOp::Sub),
            "*=" => Some(InPlaceOp::Mul),
            "/=" => Some(InPlaceOp::Div),
            _ => None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            InPlaceOp::Add => "+=",
            InPlaceOp::Sub => "-=",
            InPlaceOp::Mul => "*=",
            InPlaceOp::Div => "/=",
        }
    }

    /// Binding-side method name, without the double underscores
    fn dunder(&self) -> &'static str {
        match self {
            InPlaceOp::Add => "iadd",
            InPlaceOp::Sub => "isub",
            InPlaceOp::Mul => "imul",
            InPlaceOp::Div => "itruediv",
        }
    }

    fn kind(&self) -> ShimKind {
        match self {
            InPlaceOp::Add => ShimKind::InPlaceAdd,
            InPlaceOp::Sub => ShimKind::InPlaceSub,
            InPlaceOp::Mul => ShimKind::InPlaceMul,
            InPlaceOp::Div => ShimKind::InPlaceDiv,
        }
    }
}

/// Compound-assignment wrapper plus its in-place dunder binding
///
/// The binding returns self, which is what makes the in-place form chain
/// correctly on the target side.
pub fn in_place_shim(op: InPlaceOp, param_type: &str) -> Shim {
    let symbol = op.symbol();
    let dunder = op.dunder();
    let text = format!(
        "
        %extend{{
            void __{dunder}_wrapper__({param_type} other) {{
            *self {symbol} other;
            }}
        }}
        %pythoncode {{
        def __{dunder}__(self, right):
            self.__{dunder}_wrapper__(right)
            return self
        }}
"
    );
    Shim::new(op.kind(), text)
}

/// Wrap a method writing to an output stream as a string-returning method
pub fn to_string_shim(method_name: &str) -> Shim {
    let text = format!(
        "
        %feature(\"autodoc\", \"1\");
        %extend{{
            std::string {method_name}ToString() {{
            std::stringstream s;
            self->{method_name}(s);
            return s.str();}}
        }};
"
    );
    Shim::new(ShimKind::ToString, text)
}

/// Wrap a method reading from an input stream as a string-taking method
pub fn from_string_shim(method_name: &str) -> Shim {
    let text = format!(
        "
        %feature(\"autodoc\", \"1\");
        %extend{{
            void {method_name}FromString(std::string src) {{
            std::stringstream s(src);
            self->{method_name}(s);}}
        }};
"
    );
    Shim::new(ShimKind::FromString, text)
}

/// Wrap the JSON dump method as a string-returning method
pub fn json_dump_shim() -> Shim {
    let text = "
        %feature(\"autodoc\", \"1\");
        %extend{
            std::string DumpJsonToString(int depth=-1) {
            std::stringstream s;
            self->DumpJson(s, depth);
            return s.str();}
        };
"
    .to_string();
    Shim::new(ShimKind::JsonDump, text)
}

/// Getter/setter pair for a method returning a mutable primitive reference
///
/// `value_type` is the primitive without its reference marker. The getter
/// keeps the original parameter list; the setter appends a trailing value
/// parameter assigned through the returned reference.
pub fn getter_setter_shim(
    method_name: &str,
    value_type: &str,
    params_typed: &[String],
    param_names: &[String],
) -> Shim {
    let getter_params = params_typed.join(",");
    let mut setter_parts = params_typed.to_vec();
    setter_parts.push(format!("{} value", value_type));
    let setter_params = setter_parts.join(",");
    let names = param_names.join(",");
    let text = format!(
        "
        %feature(\"autodoc\",\"1\");
        %extend {{
            {value_type} Get{method_name}({getter_params}) {{
            return ({value_type}) $self->{method_name}({names});
            }}
        }};
        %feature(\"autodoc\",\"1\");
        %extend {{
            void Set{method_name}({setter_params}) {{
            $self->{method_name}({names})=value;
            }}
        }};\n"
    );
    Shim::new(ShimKind::GetterSetter, text)
}

/// Hash binding wired through the native hash method
pub fn hash_shim() -> Shim {
    let text = "
        %extend {
            Standard_Integer __hash__() {
            return $self->HashCode(2147483647);
            }
        };
"
    .to_string();
    Shim::new(ShimKind::Hash, text)
}
