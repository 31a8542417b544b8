// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Derive macro for `configs_parser::Configurable`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive `configs_parser::Configurable` and `configs_parser::ConfigValue`.
///
/// Field attributes:
/// - `#[config("KEY,notEmpty")]` sets the annotation;
/// - `#[config(skip)]` leaves the field out of the walk;
/// - `#[config(readonly)]` reports the field as not settable.
///
/// Fields without an attribute have an empty annotation.
#[proc_macro_derive(Configurable, attributes(config))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_configurable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_configurable(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Configurable can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Configurable requires named fields",
            ));
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;
        if options.skip {
            continue;
        }
        let name = LitStr::new(
            ident.to_string().trim_start_matches("r#"),
            proc_macro2::Span::call_site(),
        );
        let annotation = options
            .annotation
            .unwrap_or_else(|| LitStr::new("", proc_macro2::Span::call_site()));
        let entry = if options.readonly {
            quote! { ::configs_parser::Field::locked(#name, #annotation) }
        } else {
            quote! { ::configs_parser::Field::new(#name, #annotation, &mut self.#ident) }
        };
        entries.push(entry);
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::configs_parser::Configurable for #name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::configs_parser::Field<'_>> {
                ::std::vec![#(#entries),*]
            }
        }

        impl #impl_generics ::configs_parser::ConfigValue for #name #ty_generics #where_clause {
            fn tag() -> ::configs_parser::TypeTag {
                ::configs_parser::TypeTag::of::<Self>(::configs_parser::Kind::Record)
            }

            fn type_tag(&self) -> ::configs_parser::TypeTag {
                <Self as ::configs_parser::ConfigValue>::tag()
            }

            fn set(
                &mut self,
                value: ::configs_parser::Value,
            ) -> ::std::result::Result<(), ::configs_parser::ConfigsError> {
                *self = ::configs_parser::downcast_value::<Self>(value)?;
                ::std::result::Result::Ok(())
            }

            fn as_record(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::configs_parser::Configurable> {
                ::std::option::Option::Some(self)
            }
        }
    })
}

#[derive(Default)]
struct FieldOptions {
    annotation: Option<LitStr>,
    skip: bool,
    readonly: bool,
}

fn parse_field_options(attrs: &[Attribute]) -> Result<FieldOptions, syn::Error> {
    let mut options = FieldOptions::default();
    for attr in attrs {
        if !attr.path().is_ident("config") {
            continue;
        }
        if let Ok(annotation) = attr.parse_args::<LitStr>() {
            if options.annotation.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate config annotation"));
            }
            options.annotation = Some(annotation);
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("readonly") {
                options.readonly = true;
                return Ok(());
            }
            Err(meta.error("unsupported config attribute on field"))
        })?;
    }
    Ok(options)
}
