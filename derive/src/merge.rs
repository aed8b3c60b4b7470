use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, PathArguments, Result, Type, spanned::Spanned,
};

pub(crate) fn expand_merge(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`Merge` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`Merge` may only be derived on structs with named fields.",
        ))?
    };

    let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("merge")) else {
        Err(Error::new(
            input.span(),
            "`Merge` requires a `#[merge(Target)]` attribute naming the merged type.",
        ))?
    };

    let target: Type = attr.parse_args()?;

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    let assignments = fields.iter().map(|FieldMetadata { name, target_name }| {
        quote! {
            if let Some(value) = &self.#name {
                target.#target_name = ::core::clone::Clone::clone(value);
            }
        }
    });

    let name = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics Merge<#target> for #name #type_generics #where_clause {
            #[allow(unused_variables)]
            fn merge_into(&self, target: &mut #target) {
                #(#assignments)*
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    target_name: Ident,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let Type::Path(path) = &field.ty else {
            Err(Error::new_spanned(
                &field.ty,
                "Field must have a type annotation.",
            ))?
        };

        let Some(segment) = path.path.segments.last() else {
            Err(Error::new_spanned(
                &path.path.segments,
                "Field must have a type annotation.",
            ))?
        };

        if segment.ident != "Option" {
            Err(Error::new_spanned(
                &segment.ident,
                "Merged field must have type `Option<T>`.",
            ))?
        }

        if !matches!(segment.arguments, PathArguments::AngleBracketed(_)) {
            Err(Error::new_spanned(
                &segment.arguments,
                "Field of type `Option<T>` must have a generic parameter.",
            ))?
        }

        // A field may be merged into a differently named field of the target.
        let target_name = match field.attrs.iter().find(|a| a.path().is_ident("merge")) {
            Some(attr) => attr.parse_args::<Ident>()?,
            None => name.clone(),
        };

        Ok(Self { name, target_name })
    }
}
