use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{quote, quote_spanned};
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, FnArg, ImplItem, ItemImpl,
    Lit, LitBool, LitInt, LitStr, ReturnType, Token, Type, UnOp, Visibility, parse_macro_input,
};

type TokenStream2 = proc_macro2::TokenStream;

/// Derive reflection and inspector metadata for a struct with named fields.
///
/// Struct attributes: `#[inspect(serializable, show, hide, object_reference,
/// framework_root, methods)]`. `methods` pulls in the properties and
/// buttons declared by an `#[inspect_methods]` impl block.
///
/// Field attributes:
///
/// ```ignore
/// #[derive(Inspect)]
/// #[inspect(serializable, methods)]
/// struct Player {
///     #[inspect(base)]
///     actor: Actor,
///     #[inspect(box_group = "Stats", min = 0.0, max = 100.0)]
///     pub health: f32,
///     #[inspect(tab(path = "Stats/Combat", title = "Combat"), show_if = "armed")]
///     pub damage: f32,
///     #[inspect(info_box(text = "=damage * 2", kind = "warning"))]
///     pub crit: f32,
///     #[serde(skip)]
///     pub armed: bool,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_inspect(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_inspect(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Inspect cannot be derived for generic types",
        ));
    }
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Inspect can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Inspect can only be derived for structs; use InspectEnum for enums",
            ));
        }
    };

    let type_attrs = parse_type_attrs(&input.attrs)?;

    let mut base_field = None;
    let mut member_infos = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();
    let mut nested_arms = Vec::new();
    let mut nested_mut_arms = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let fname = ident.to_string();
        let ty = &field.ty;
        let attrs = parse_member_attrs(&field.attrs, Site::Field)?;

        if attrs.base {
            if base_field.is_some() {
                return Err(syn::Error::new_spanned(ident, "only one field can be the base"));
            }
            base_field = Some((ident, ty));
            continue;
        }

        let public = matches!(field.vis, Visibility::Public(_));
        let synthesized = fname.starts_with('_');
        let serialize = attrs.serialize;
        let non_serialized = attrs.non_serialized || serde_skips(&field.attrs)?;
        let annotations = &attrs.annotations;

        member_infos.push(quote! {
            redlilium_inspector::MemberInfo {
                name: #fname,
                kind: redlilium_inspector::MemberKind::Field,
                flags: redlilium_inspector::MemberFlags {
                    public: #public,
                    is_static: false,
                    synthesized: #synthesized,
                    serialize: #serialize,
                    non_serialized: #non_serialized,
                    readable: true,
                    writable: true,
                },
                value_type: redlilium_inspector::field::__private::TypeProbe::<#ty>::new().value_type(),
                annotations: ::std::vec![#(#annotations),*],
            }
        });
        get_arms.push(quote! {
            #fname => ::core::option::Option::Some(
                redlilium_inspector::field::__private::FieldRef(&self.#ident).read()
            )
        });
        set_arms.push(quote! {
            #fname => {
                let found = value.type_label();
                if redlilium_inspector::field::__private::FieldMut(&mut self.#ident).write(value) {
                    ::core::result::Result::Ok(())
                } else {
                    ::core::result::Result::Err(redlilium_inspector::ReflectError::TypeMismatch {
                        member: ::std::string::String::from(#fname),
                        found,
                    })
                }
            }
        });
        nested_arms.push(quote! {
            #fname => redlilium_inspector::field::__private::FieldRef(&self.#ident).reflect()
        });
        nested_mut_arms.push(quote! {
            #fname => redlilium_inspector::field::__private::FieldMut(&mut self.#ident).reflect_mut()
        });
    }

    let TypeAttrs {
        serializable,
        show,
        hide,
        object_reference,
        framework_root,
        methods,
    } = type_attrs;

    let extend_methods = methods.then(|| {
        quote! {
            members.extend(<#name as redlilium_inspector::InspectMethods>::method_members());
        }
    });
    let base_info = match base_field {
        Some((_, ty)) => quote! {
            ::core::option::Option::Some(
                <#ty as redlilium_inspector::Typed>::static_type_info
                    as fn() -> &'static redlilium_inspector::TypeInfo
            )
        },
        None => quote! { ::core::option::Option::None },
    };
    let base_fns = base_field.map(|(ident, _)| {
        quote! {
            fn base(&self) -> ::core::option::Option<&dyn redlilium_inspector::Reflect> {
                ::core::option::Option::Some(&self.#ident)
            }

            fn base_mut(&mut self) -> ::core::option::Option<&mut dyn redlilium_inspector::Reflect> {
                ::core::option::Option::Some(&mut self.#ident)
            }
        }
    });

    let (get_fallback, set_fallback, method_fns) = if methods {
        (
            quote! { redlilium_inspector::InspectMethods::get_property(self, name) },
            quote! {
                match redlilium_inspector::InspectMethods::set_property(self, name, value) {
                    ::core::option::Option::Some(result) => result,
                    ::core::option::Option::None => ::core::result::Result::Err(
                        redlilium_inspector::ReflectError::NoSuchMember(::std::string::String::from(name)),
                    ),
                }
            },
            quote! {
                fn invoke(&mut self, name: &str) -> ::core::result::Result<redlilium_inspector::Value, redlilium_inspector::ReflectError> {
                    redlilium_inspector::InspectMethods::invoke_method(self, name).ok_or_else(|| {
                        redlilium_inspector::ReflectError::MissingMethod(::std::string::String::from(name))
                    })
                }

                fn draw_hook(
                    &mut self,
                    name: &str,
                    ui: &mut dyn redlilium_inspector::InspectorBackend,
                ) -> ::core::result::Result<(), redlilium_inspector::ReflectError> {
                    if redlilium_inspector::InspectMethods::draw_hook(self, name, ui) {
                        ::core::result::Result::Ok(())
                    } else {
                        ::core::result::Result::Err(redlilium_inspector::ReflectError::MissingMethod(
                            ::std::string::String::from(name),
                        ))
                    }
                }
            },
        )
    } else {
        (
            quote! { ::core::option::Option::None },
            quote! {
                {
                    let _ = value;
                    ::core::result::Result::Err(
                        redlilium_inspector::ReflectError::NoSuchMember(::std::string::String::from(name)),
                    )
                }
            },
            quote! {},
        )
    };

    let to_value = if object_reference {
        quote! { redlilium_inspector::Value::ObjectRef(::core::option::Option::Some(::std::string::String::from(#name_str))) }
    } else {
        quote! { redlilium_inspector::Value::Opaque(#name_str) }
    };

    Ok(quote! {
        impl redlilium_inspector::Typed for #name {
            fn static_type_info() -> &'static redlilium_inspector::TypeInfo {
                static INFO: ::std::sync::LazyLock<redlilium_inspector::TypeInfo> =
                    ::std::sync::LazyLock::new(|| {
                        #[allow(unused_imports)]
                        use redlilium_inspector::field::__private::{ProbeType as _, ProbeTypeFallback as _};
                        #[allow(unused_mut)]
                        let mut members: ::std::vec::Vec<redlilium_inspector::MemberInfo> =
                            ::std::vec![#(#member_infos),*];
                        #extend_methods
                        redlilium_inspector::TypeInfo {
                            name: #name_str,
                            flags: redlilium_inspector::TypeFlags {
                                serializable: #serializable,
                                show: #show,
                                hide: #hide,
                                framework_root: #framework_root,
                                object_reference: #object_reference,
                            },
                            members,
                            base: #base_info,
                        }
                    });
                &INFO
            }
        }

        impl redlilium_inspector::Reflect for #name {
            fn type_info(&self) -> &'static redlilium_inspector::TypeInfo {
                <Self as redlilium_inspector::Typed>::static_type_info()
            }

            #[allow(unused_imports)]
            fn get_member(&self, name: &str) -> ::core::option::Option<redlilium_inspector::Value> {
                use redlilium_inspector::field::__private::{ReadField as _, ReadFieldFallback as _};
                match name {
                    #(#get_arms,)*
                    _ => #get_fallback,
                }
            }

            #[allow(unused_imports)]
            fn set_member(
                &mut self,
                name: &str,
                value: redlilium_inspector::Value,
            ) -> ::core::result::Result<(), redlilium_inspector::ReflectError> {
                use redlilium_inspector::field::__private::{WriteField as _, WriteFieldFallback as _};
                match name {
                    #(#set_arms,)*
                    _ => #set_fallback,
                }
            }

            #[allow(unused_imports)]
            fn nested(&self, name: &str) -> ::core::option::Option<&dyn redlilium_inspector::Reflect> {
                use redlilium_inspector::field::__private::{ReadField as _, ReadFieldFallback as _};
                match name {
                    #(#nested_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_imports)]
            fn nested_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn redlilium_inspector::Reflect> {
                use redlilium_inspector::field::__private::{WriteField as _, WriteFieldFallback as _};
                match name {
                    #(#nested_mut_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            #base_fns

            #method_fns

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }

        impl redlilium_inspector::FieldValue for #name {
            fn value_type() -> redlilium_inspector::ValueType {
                redlilium_inspector::ValueType::Composite(<#name as redlilium_inspector::Typed>::static_type_info)
            }

            fn to_value(&self) -> redlilium_inspector::Value {
                #to_value
            }

            fn from_value(_value: redlilium_inspector::Value) -> ::core::option::Option<Self> {
                ::core::option::Option::None
            }

            fn apply_value(&mut self, _value: redlilium_inspector::Value) -> bool {
                false
            }

            fn as_reflect(&self) -> ::core::option::Option<&dyn redlilium_inspector::Reflect> {
                ::core::option::Option::Some(self)
            }

            fn as_reflect_mut(&mut self) -> ::core::option::Option<&mut dyn redlilium_inspector::Reflect> {
                ::core::option::Option::Some(self)
            }
        }
    })
}

/// Derive `FieldValue` for an enum of unit variants, shown as a dropdown.
///
/// ```ignore
/// #[derive(Clone, Copy, InspectEnum)]
/// enum Mode {
///     Walk,
///     Run,
/// }
/// ```
#[proc_macro_derive(InspectEnum)]
pub fn derive_inspect_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(name, "InspectEnum can only be derived for enums")
            .to_compile_error()
            .into();
    };
    if let Some(variant) = data.variants.iter().find(|v| !v.fields.is_empty()) {
        return syn::Error::new_spanned(variant, "InspectEnum variants cannot carry data")
            .to_compile_error()
            .into();
    }

    let idents: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let names: Vec<_> = idents.iter().map(|v| v.to_string()).collect();
    let indices: Vec<_> = (0..idents.len()).collect();

    let expanded = quote! {
        impl redlilium_inspector::FieldValue for #name {
            fn value_type() -> redlilium_inspector::ValueType {
                redlilium_inspector::ValueType::Enum(&[#(#names),*])
            }

            fn to_value(&self) -> redlilium_inspector::Value {
                redlilium_inspector::Value::Enum {
                    index: match self {
                        #(Self::#idents => #indices,)*
                    },
                    variants: &[#(#names),*],
                }
            }

            fn from_value(value: redlilium_inspector::Value) -> ::core::option::Option<Self> {
                let index = match value {
                    redlilium_inspector::Value::Enum { index, .. } => index,
                    redlilium_inspector::Value::Int(index) => usize::try_from(index).ok()?,
                    redlilium_inspector::Value::Str(text) => match text.as_str() {
                        #(#names => #indices,)*
                        _ => return ::core::option::Option::None,
                    },
                    _ => return ::core::option::Option::None,
                };
                match index {
                    #(#indices => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    expanded.into()
}

/// Expose an impl block's annotated methods to the inspector.
///
/// - `#[inspect(button)]`, `#[inspect(button = "Text")]` or
///   `#[inspect(button(text = "..", mode = "editor"))]`: a button that calls
///   the method.
/// - `#[inspect(show)]` / `#[inspect(serialize)]` on a `&self` getter: a
///   property, writable through `setter = "set_x"`.
/// - `#[inspect(gui)]` on `fn(&mut self, &mut dyn InspectorBackend)`: a
///   custom draw hook usable from `on_gui`.
///
/// Every zero-argument method of the block can be called by name from
/// conditions, validators and `on_value_changed`. The struct must opt in with
/// `#[inspect(methods)]`.
#[proc_macro_attribute]
pub fn inspect_methods(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(item as ItemImpl);
    match expand_methods(&mut input) {
        Ok(generated) => quote! {
            #input
            #generated
        }
        .into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_methods(input: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[inspect_methods] does not support generic impls",
        ));
    }
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[inspect_methods] must be placed on an inherent impl",
        ));
    }
    let self_ty = input.self_ty.clone();

    let mut members = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();
    let mut invoke_arms = Vec::new();
    let mut hook_arms = Vec::new();

    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let attrs = parse_member_attrs(&method.attrs, Site::Method)?;
        method.attrs.retain(|a| !a.path().is_ident("inspect"));

        let sig = &method.sig;
        let ident = &sig.ident;
        let mname = ident.to_string();
        let receiver = match sig.inputs.first() {
            Some(FnArg::Receiver(r)) if r.reference.is_some() => Some(r.mutability.is_some()),
            _ => None,
        };
        let plain = sig.generics.params.is_empty() && sig.asyncness.is_none();
        let zero_args = receiver.is_some() && sig.inputs.len() == 1 && plain;
        let ret_ty: Option<&Type> = match &sig.output {
            ReturnType::Type(_, ty) => Some(ty),
            ReturnType::Default => None,
        };

        if zero_args {
            let call = match ret_ty {
                Some(_) => quote! {
                    let result = self.#ident();
                    ::core::option::Option::Some(redlilium_inspector::field::__private::FieldRef(&result).read())
                },
                None => quote! {
                    self.#ident();
                    ::core::option::Option::Some(redlilium_inspector::Value::Null)
                },
            };
            invoke_arms.push(quote! { #mname => { #call } });
        }

        if attrs.gui {
            if receiver.is_none() || sig.inputs.len() != 2 || !plain {
                return Err(syn::Error::new_spanned(
                    sig,
                    "gui hooks take `&mut self` and `&mut dyn InspectorBackend`",
                ));
            }
            hook_arms.push(quote! {
                #mname => {
                    self.#ident(ui);
                    true
                }
            });
        }

        let public = matches!(method.vis, Visibility::Public(_));
        let annotations = &attrs.annotations;
        let value_type = match ret_ty {
            Some(ty) => quote! {
                redlilium_inspector::field::__private::TypeProbe::<#ty>::new().value_type()
            },
            None => quote! { redlilium_inspector::ValueType::Unit },
        };

        if attrs.button {
            if !zero_args {
                return Err(syn::Error::new_spanned(
                    sig,
                    "buttons must be methods taking only `&self` or `&mut self`",
                ));
            }
            members.push(quote! {
                redlilium_inspector::MemberInfo {
                    name: #mname,
                    kind: redlilium_inspector::MemberKind::Method,
                    flags: redlilium_inspector::MemberFlags {
                        public: #public,
                        ..::core::default::Default::default()
                    },
                    value_type: #value_type,
                    annotations: ::std::vec![#(#annotations),*],
                }
            });
            continue;
        }

        if attrs.show || attrs.serialize || attrs.setter.is_some() {
            let Some(ty) = ret_ty.filter(|_| zero_args && receiver == Some(false)) else {
                return Err(syn::Error::new_spanned(
                    sig,
                    "properties must be getters taking only `&self` and returning a value",
                ));
            };
            let serialize = attrs.serialize;
            let writable = attrs.setter.is_some();
            members.push(quote! {
                redlilium_inspector::MemberInfo {
                    name: #mname,
                    kind: redlilium_inspector::MemberKind::Property,
                    flags: redlilium_inspector::MemberFlags {
                        public: #public,
                        serialize: #serialize,
                        readable: true,
                        writable: #writable,
                        ..::core::default::Default::default()
                    },
                    value_type: #value_type,
                    annotations: ::std::vec![#(#annotations),*],
                }
            });
            get_arms.push(quote! {
                #mname => {
                    let value = self.#ident();
                    ::core::option::Option::Some(redlilium_inspector::field::__private::FieldRef(&value).read())
                }
            });
            if let Some(setter) = &attrs.setter {
                set_arms.push(quote! {
                    #mname => {
                        let found = value.type_label();
                        ::core::option::Option::Some(
                            match redlilium_inspector::field::__private::from_value::<#ty>(value) {
                                ::core::option::Option::Some(value) => {
                                    self.#setter(value);
                                    ::core::result::Result::Ok(())
                                }
                                ::core::option::Option::None => ::core::result::Result::Err(
                                    redlilium_inspector::ReflectError::TypeMismatch {
                                        member: ::std::string::String::from(#mname),
                                        found,
                                    },
                                ),
                            },
                        )
                    }
                });
            }
        } else if !attrs.annotations.is_empty() && !attrs.gui {
            return Err(syn::Error::new_spanned(
                sig,
                "annotated methods must be marked `button`, `show` or `serialize`",
            ));
        }
    }

    Ok(quote! {
        impl redlilium_inspector::InspectMethods for #self_ty {
            #[allow(unused_imports)]
            fn method_members() -> ::std::vec::Vec<redlilium_inspector::MemberInfo> {
                use redlilium_inspector::field::__private::{ProbeType as _, ProbeTypeFallback as _};
                ::std::vec![#(#members),*]
            }

            #[allow(unused_imports)]
            fn get_property(&self, name: &str) -> ::core::option::Option<redlilium_inspector::Value> {
                use redlilium_inspector::field::__private::{ReadField as _, ReadFieldFallback as _};
                match name {
                    #(#get_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: redlilium_inspector::Value,
            ) -> ::core::option::Option<::core::result::Result<(), redlilium_inspector::ReflectError>> {
                match name {
                    #(#set_arms,)*
                    _ => {
                        let _ = value;
                        ::core::option::Option::None
                    }
                }
            }

            #[allow(unused_imports)]
            fn invoke_method(&mut self, name: &str) -> ::core::option::Option<redlilium_inspector::Value> {
                use redlilium_inspector::field::__private::{ReadField as _, ReadFieldFallback as _};
                match name {
                    #(#invoke_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn draw_hook(&mut self, name: &str, ui: &mut dyn redlilium_inspector::InspectorBackend) -> bool {
                let _ = &ui;
                match name {
                    #(#hook_arms,)*
                    _ => false,
                }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Attribute parsing
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TypeAttrs {
    serializable: bool,
    show: bool,
    hide: bool,
    object_reference: bool,
    framework_root: bool,
    methods: bool,
}

fn parse_type_attrs(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("inspect")) {
        attr.parse_nested_meta(|meta| {
            let flag = if meta.path.is_ident("serializable") {
                &mut out.serializable
            } else if meta.path.is_ident("show") {
                &mut out.show
            } else if meta.path.is_ident("hide") {
                &mut out.hide
            } else if meta.path.is_ident("object_reference") {
                &mut out.object_reference
            } else if meta.path.is_ident("framework_root") {
                &mut out.framework_root
            } else if meta.path.is_ident("methods") {
                &mut out.methods
            } else {
                return Err(meta.error("unknown type-level inspect option"));
            };
            *flag = true;
            Ok(())
        })?;
    }
    Ok(out)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Site {
    Field,
    Method,
}

#[derive(Default)]
struct MemberAttrs {
    annotations: Vec<TokenStream2>,
    serialize: bool,
    non_serialized: bool,
    base: bool,
    show: bool,
    button: bool,
    gui: bool,
    setter: Option<syn::Ident>,
}

/// `::core::line!()` resolved at `span`, i.e. the line the attribute was
/// written on.
fn line_at(span: Span) -> TokenStream2 {
    quote_spanned!(span=> ::core::line!())
}

fn annotation(span: Span, kind: TokenStream2) -> TokenStream2 {
    let line = line_at(span);
    quote! {
        redlilium_inspector::Annotation::new(#line, redlilium_inspector::AnnotationKind::#kind)
    }
}

fn opt_string(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(s) => quote! { ::core::option::Option::Some(::std::string::String::from(#s)) },
        None => quote! { ::core::option::Option::None },
    }
}

fn lit_string(meta: &ParseNestedMeta) -> syn::Result<String> {
    Ok(meta.value()?.parse::<LitStr>()?.value())
}

fn number(meta: &ParseNestedMeta) -> syn::Result<f64> {
    let expr: Expr = meta.value()?.parse()?;
    eval_number(&expr)
}

fn eval_number(expr: &Expr) -> syn::Result<f64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Float(f), ..
        }) => f.base10_parse(),
        Expr::Lit(ExprLit { lit: Lit::Int(i), .. }) => i.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => eval_number(expr).map(|v| -v),
        other => Err(syn::Error::new_spanned(other, "expected a number literal")),
    }
}

fn float_tokens(value: f64) -> TokenStream2 {
    let magnitude = value.abs();
    if value.is_sign_negative() {
        quote!(-#magnitude)
    } else {
        quote!(#magnitude)
    }
}

fn has_value(meta: &ParseNestedMeta) -> bool {
    meta.input.peek(Token![=])
}

fn parse_member_attrs(attrs: &[Attribute], site: Site) -> syn::Result<MemberAttrs> {
    let mut out = MemberAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("inspect")) {
        attr.parse_nested_meta(|meta| parse_member_option(&meta, site, &mut out))?;
    }
    Ok(out)
}

fn parse_member_option(meta: &ParseNestedMeta, site: Site, out: &mut MemberAttrs) -> syn::Result<()> {
    let span = meta.path.span();
    let key = meta
        .path
        .get_ident()
        .map(|i| i.to_string())
        .ok_or_else(|| meta.error("expected an inspect option"))?;

    let field_only = matches!(key.as_str(), "base" | "non_serialized");
    let method_only = matches!(key.as_str(), "button" | "gui" | "setter");
    if (field_only && site == Site::Method) || (method_only && site == Site::Field) {
        return Err(meta.error(format!("`{key}` is not allowed here")));
    }

    match key.as_str() {
        "show" => {
            out.show = true;
            out.annotations.push(annotation(span, quote!(Show)));
        }
        "hide" => out.annotations.push(annotation(span, quote!(Hide))),
        "read_only" => out.annotations.push(annotation(span, quote!(ReadOnly))),
        "serialize" => out.serialize = true,
        "non_serialized" => out.non_serialized = true,
        "base" => out.base = true,
        "gui" => out.gui = true,
        "setter" => {
            let name: LitStr = meta.value()?.parse()?;
            out.setter = Some(syn::Ident::new(&name.value(), name.span()));
        }
        "label" => {
            let text = lit_string(meta)?;
            out.annotations.push(annotation(
                span,
                quote!(Label(::std::string::String::from(#text))),
            ));
        }
        "group" | "box_group" | "vertical" | "horizontal" | "foldout" | "tab" => {
            let kind = match key.as_str() {
                "group" => quote!(Placeholder),
                "box_group" => quote!(Box),
                "vertical" => quote!(Vertical),
                "horizontal" => quote!(Horizontal),
                "foldout" => quote!(Foldout),
                _ => quote!(Tab),
            };
            let group = parse_group(meta, kind)?;
            out.annotations.push(annotation(span, quote!(Group(#group))));
        }
        "show_if" | "hide_if" | "enable_if" | "disable_if" => {
            let variant = match key.as_str() {
                "show_if" => quote!(ShowIf),
                "hide_if" => quote!(HideIf),
                "enable_if" => quote!(EnableIf),
                _ => quote!(DisableIf),
            };
            let condition = parse_condition(meta)?;
            out.annotations
                .push(annotation(span, quote!(#variant(#condition))));
        }
        "info_box" => {
            let info = parse_info_box(meta)?;
            out.annotations.push(annotation(span, info));
        }
        "button" => {
            out.button = true;
            let button = parse_button(meta)?;
            out.annotations.push(annotation(span, button));
        }
        "on_gui" => {
            let (mut pre, mut post) = (None, None);
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("pre") {
                    pre = Some(lit_string(&inner)?);
                } else if inner.path.is_ident("post") {
                    post = Some(lit_string(&inner)?);
                } else {
                    return Err(inner.error("expected `pre` or `post`"));
                }
                Ok(())
            })?;
            let (pre, post) = (opt_string(&pre), opt_string(&post));
            out.annotations
                .push(annotation(span, quote!(OnGui { pre: #pre, post: #post })));
        }
        "on_value_changed" => {
            let callback = lit_string(meta)?;
            out.annotations.push(annotation(
                span,
                quote!(OnValueChanged(::std::string::String::from(#callback))),
            ));
        }
        "min" | "max" => {
            let value = float_tokens(number(meta)?);
            let variant = if key == "min" { quote!(Min) } else { quote!(Max) };
            out.annotations.push(annotation(
                span,
                quote!(Validate(redlilium_inspector::Validator::#variant(#value))),
            ));
        }
        "required" => {
            let message = if has_value(meta) {
                Some(lit_string(meta)?)
            } else {
                None
            };
            let message = opt_string(&message);
            out.annotations.push(annotation(
                span,
                quote!(Validate(redlilium_inspector::Validator::Required { message: #message })),
            ));
        }
        "validate" => {
            let (mut callback, mut message) = (None, None);
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("callback") {
                    callback = Some(lit_string(&inner)?);
                } else if inner.path.is_ident("message") {
                    message = Some(lit_string(&inner)?);
                } else {
                    return Err(inner.error("expected `callback` or `message`"));
                }
                Ok(())
            })?;
            let callback = callback.ok_or_else(|| meta.error("validate needs a `callback`"))?;
            let message = opt_string(&message);
            out.annotations.push(annotation(
                span,
                quote!(Validate(redlilium_inspector::Validator::Input {
                    callback: ::std::string::String::from(#callback),
                    message: #message,
                })),
            ));
        }
        _ => return Err(meta.error(format!("unknown inspect option `{key}`"))),
    }
    Ok(())
}

/// `box_group = "Path"` or `box_group(path = "Path", title = "..",
/// show_title = false, back_color = 0xRRGGBBAA)`.
fn parse_group(meta: &ParseNestedMeta, kind: TokenStream2) -> syn::Result<TokenStream2> {
    let mut path = None;
    let mut title = None;
    let mut show_title = true;
    let mut back_color: Option<u32> = None;

    if has_value(meta) {
        path = Some(lit_string(meta)?);
    } else {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("path") {
                path = Some(lit_string(&inner)?);
            } else if inner.path.is_ident("title") {
                title = Some(lit_string(&inner)?);
            } else if inner.path.is_ident("show_title") {
                show_title = inner.value()?.parse::<LitBool>()?.value;
            } else if inner.path.is_ident("back_color") {
                back_color = Some(inner.value()?.parse::<LitInt>()?.base10_parse()?);
            } else {
                return Err(inner.error("unknown group option"));
            }
            Ok(())
        })?;
    }

    let path = path.ok_or_else(|| meta.error("group needs a `path`"))?;
    let title = opt_string(&title);
    let back_color = match back_color {
        Some(c) => quote!(::core::option::Option::Some(#c)),
        None => quote!(::core::option::Option::None),
    };
    Ok(quote! {
        redlilium_inspector::GroupAnnotation {
            kind: redlilium_inspector::GroupKind::#kind,
            path: ::std::string::String::from(#path),
            title: #title,
            show_title: #show_title,
            back_color: #back_color,
        }
    })
}

/// `show_if = "member"` or `show_if(member = "mode", equals = "Fast")`.
fn parse_condition(meta: &ParseNestedMeta) -> syn::Result<TokenStream2> {
    let mut member = None;
    let mut equals = None;
    if has_value(meta) {
        member = Some(lit_string(meta)?);
    } else {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("member") {
                member = Some(lit_string(&inner)?);
            } else if inner.path.is_ident("equals") {
                equals = Some(lit_string(&inner)?);
            } else {
                return Err(inner.error("expected `member` or `equals`"));
            }
            Ok(())
        })?;
    }
    let member = member.ok_or_else(|| meta.error("condition needs a `member`"))?;
    let equals = opt_string(&equals);
    Ok(quote! {
        redlilium_inspector::Condition {
            member: ::std::string::String::from(#member),
            equals: #equals,
        }
    })
}

fn message_kind(text: &LitStr) -> syn::Result<TokenStream2> {
    match text.value().as_str() {
        "info" => Ok(quote!(Info)),
        "warning" => Ok(quote!(Warning)),
        "error" => Ok(quote!(Error)),
        _ => Err(syn::Error::new_spanned(
            text,
            "expected \"info\", \"warning\" or \"error\"",
        )),
    }
}

/// `info_box = "text"` or `info_box(text = "..", kind = "warning")`.
fn parse_info_box(meta: &ParseNestedMeta) -> syn::Result<TokenStream2> {
    let mut text = None;
    let mut kind = quote!(Info);
    if has_value(meta) {
        text = Some(lit_string(meta)?);
    } else {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("text") {
                text = Some(lit_string(&inner)?);
            } else if inner.path.is_ident("kind") {
                kind = message_kind(&inner.value()?.parse()?)?;
            } else {
                return Err(inner.error("expected `text` or `kind`"));
            }
            Ok(())
        })?;
    }
    let text = text.ok_or_else(|| meta.error("info_box needs `text`"))?;
    Ok(quote! {
        InfoBox {
            text: ::std::string::String::from(#text),
            kind: redlilium_inspector::MessageKind::#kind,
        }
    })
}

/// `button`, `button = "Text"` or `button(text = "..", mode = "editor")`.
fn parse_button(meta: &ParseNestedMeta) -> syn::Result<TokenStream2> {
    let mut text = None;
    let mut mode = quote!(Always);
    if has_value(meta) {
        text = Some(lit_string(meta)?);
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("text") {
                text = Some(lit_string(&inner)?);
            } else if inner.path.is_ident("mode") {
                let value: LitStr = inner.value()?.parse()?;
                mode = match value.value().as_str() {
                    "always" => quote!(Always),
                    "editor" => quote!(Editor),
                    "playmode" => quote!(Playmode),
                    _ => {
                        return Err(syn::Error::new_spanned(
                            &value,
                            "expected \"always\", \"editor\" or \"playmode\"",
                        ));
                    }
                };
            } else {
                return Err(inner.error("expected `text` or `mode`"));
            }
            Ok(())
        })?;
    }
    let text = opt_string(&text);
    Ok(quote! {
        Button {
            text: #text,
            mode: redlilium_inspector::ButtonMode::#mode,
        }
    })
}

/// Whether a `#[serde(...)]` attribute skips the field.
fn serde_skips(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                skip = true;
            }
            if has_value(&meta) {
                meta.value()?.parse::<Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                content.parse::<TokenStream2>()?;
            }
            Ok(())
        })?;
    }
    Ok(skip)
}
