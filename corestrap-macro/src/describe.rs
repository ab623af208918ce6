use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, DeriveInput, Expr, Meta};

pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_describe_impl(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn generate_describe_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let type_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let priorities = input
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("service"))
        .map(parse_priority)
        .collect::<syn::Result<Vec<_>>>()?;

    let descriptors = priorities.iter().map(|priority| {
        quote! {
            ::corestrap::ServiceDescriptor::new(#priority)
        }
    });

    Ok(quote! {
        impl #impl_generics ::corestrap::Describe for #type_name #ty_generics #where_clause {
            fn descriptors() -> &'static [::corestrap::ServiceDescriptor] {
                const DESCRIPTORS: &[::corestrap::ServiceDescriptor] = &[
                    #(#descriptors),*
                ];
                DESCRIPTORS
            }
        }
    })
}

/// `#[service]` or `#[service(priority = <i32 expr>)]`
fn parse_priority(attr: &Attribute) -> syn::Result<TokenStream2> {
    if let Meta::Path(_) = &attr.meta {
        return Ok(quote!(0));
    }

    let mut priority: Option<Expr> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("priority") {
            if priority.is_some() {
                return Err(meta.error("duplicate `priority`"));
            }
            priority = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported service attribute, expected `priority`"))
        }
    })?;

    Ok(match priority {
        Some(expr) => quote!(#expr),
        None => quote!(0),
    })
}
