use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Error, Generics, Ident, Path, Type};

///
/// RecordInput
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
struct RecordInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, RecordField>,

    /// Structural copy with overrides is supported.
    #[darling(default)]
    copy: bool,

    /// The record has no canonical constructor.
    #[darling(default)]
    no_constructor: bool,
}

///
/// RecordField
///

#[derive(Debug, FromField)]
#[darling(attributes(record))]
struct RecordField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    default: bool,

    default_with: Option<Path>,

    #[darling(default)]
    readonly: bool,

    #[darling(default)]
    skip: bool,
}

impl RecordField {
    fn ident(&self) -> Result<&Ident, Error> {
        self.ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(&self.ty, "Record fields must be named"))
    }

    fn nullable(&self) -> bool {
        is_path_ident(&self.ty, "Option")
    }

    const fn has_default(&self) -> bool {
        self.default || self.default_with.is_some()
    }

    fn default_expr(&self) -> TokenStream {
        match &self.default_with {
            Some(path) => quote!(#path()),
            None => quote!(::core::default::Default::default()),
        }
    }
}

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };
    let record = match RecordInput::from_derive_input(&input) {
        Ok(record) => record,
        Err(err) => return err.write_errors(),
    };

    expand(&record).unwrap_or_else(|err| err.to_compile_error())
}

fn expand(record: &RecordInput) -> Result<TokenStream, Error> {
    let ident = &record.ident;
    if !record.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &record.generics,
            "Record cannot be derived for generic types",
        ));
    }

    let Data::Struct(fields) = &record.data else {
        return Err(Error::new_spanned(
            ident,
            "Record can only be derived for structs with named fields",
        ));
    };
    let fields = &fields.fields;

    let model = model(record, fields)?;
    let construct = if record.no_constructor {
        quote!()
    } else {
        construct(fields)?
    };
    let copy_with = if record.copy {
        copy_with(fields)?
    } else {
        quote!()
    };
    let field_consts = fields
        .iter()
        .map(|field| field_const(ident, field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        impl ::patchof::Record for #ident {
            #model
            #construct
            #copy_with
        }

        impl ::patchof::model::NestedValue for #ident {
            type Record = Self;

            fn as_record(&self) -> ::core::option::Option<&Self> {
                ::core::option::Option::Some(self)
            }

            fn as_record_mut(&mut self) -> ::core::option::Option<&mut Self> {
                ::core::option::Option::Some(self)
            }

            fn from_record(record: Self) -> Self {
                record
            }
        }

        impl #ident {
            #(#field_consts)*
        }
    })
}

fn model(record: &RecordInput, fields: &[RecordField]) -> Result<TokenStream, Error> {
    let ident_str = record.ident.to_string();
    let constructible = !record.no_constructor;
    let copyable = record.copy;

    let params = fields
        .iter()
        .filter(|field| !field.skip)
        .map(|field| {
            let name = field.ident()?.to_string();
            let has_default = field.has_default();

            Ok(quote! {
                ::patchof::model::ParamModel {
                    name: #name,
                    has_default: #has_default,
                }
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(quote! {
        const MODEL: &'static ::patchof::model::RecordModel = &::patchof::model::RecordModel {
            path: ::core::concat!(::core::module_path!(), "::", #ident_str),
            params: &[#(#params),*],
            constructible: #constructible,
            copyable: #copyable,
        };
    })
}

fn construct(fields: &[RecordField]) -> Result<TokenStream, Error> {
    let inits = fields
        .iter()
        .map(|field| {
            let fid = field.ident()?;
            let name = fid.to_string();
            let ty = &field.ty;

            let init = if field.skip {
                field.default_expr()
            } else if field.has_default() {
                let default = field.default_expr();
                quote! {
                    match args.take::<#ty>(#name)? {
                        ::core::option::Option::Some(value) => value,
                        ::core::option::Option::None => #default,
                    }
                }
            } else {
                quote! {
                    args.take::<#ty>(#name)?.ok_or_else(|| {
                        ::patchof::PatchError::unbound_parameter(
                            <Self as ::patchof::Record>::MODEL.path,
                            #name,
                        )
                    })?
                }
            };

            Ok(quote!(#fid: #init))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let unused = fields.iter().all(|field| field.skip).then(|| quote!(let _ = args;));

    Ok(quote! {
        fn construct(
            args: &mut ::patchof::args::Args,
        ) -> ::core::result::Result<Self, ::patchof::PatchError> {
            #unused
            ::core::result::Result::Ok(Self { #(#inits),* })
        }
    })
}

fn copy_with(fields: &[RecordField]) -> Result<TokenStream, Error> {
    let inits = fields
        .iter()
        .map(|field| {
            let fid = field.ident()?;
            let name = fid.to_string();
            let ty = &field.ty;

            let init = if field.skip {
                quote!(::core::clone::Clone::clone(&self.#fid))
            } else {
                quote! {
                    match args.take::<#ty>(#name)? {
                        ::core::option::Option::Some(value) => value,
                        ::core::option::Option::None => ::core::clone::Clone::clone(&self.#fid),
                    }
                }
            };

            Ok(quote!(#fid: #init))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let unused = fields.iter().all(|field| field.skip).then(|| quote!(let _ = args;));

    Ok(quote! {
        fn copy_with(
            &self,
            args: &mut ::patchof::args::Args,
        ) -> ::core::result::Result<Self, ::patchof::PatchError> {
            #unused
            ::core::result::Result::Ok(Self { #(#inits),* })
        }
    })
}

// one `Field` constant per struct field, named after the field in
// SCREAMING_SNAKE_CASE
fn field_const(ident: &Ident, field: &RecordField) -> Result<TokenStream, Error> {
    let fid = field.ident()?;
    let name = fid.to_string();
    let ty = &field.ty;
    let constant = format_ident!("{}", name.to_case(Case::Constant));

    let get_mut = if field.readonly {
        quote!(::core::option::Option::None)
    } else {
        quote! {{
            fn get_mut(record: &mut #ident) -> &mut #ty {
                &mut record.#fid
            }
            ::core::option::Option::Some(get_mut as fn(&mut #ident) -> &mut #ty)
        }}
    };

    let null = if field.nullable() {
        quote! {{
            fn null() -> #ty {
                ::core::option::Option::None
            }
            ::core::option::Option::Some(null as fn() -> #ty)
        }}
    } else {
        quote!(::core::option::Option::None)
    };

    Ok(quote! {
        pub const #constant: ::patchof::model::Field<#ident, #ty> = {
            fn get(record: &#ident) -> &#ty {
                &record.#fid
            }

            ::patchof::model::Field::new(#name, get, #get_mut, #null)
        };
    })
}

fn is_path_ident(ty: &Type, ident: &str) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == ident)
}

///
/// TESTS
///
