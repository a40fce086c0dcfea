use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{DeriveInput, LitStr, Path};

struct Args {
    routing_key: LitStr,
    krate: Path,
}

pub fn expand(args: TokenStream, input: DeriveInput) -> TokenStream {
    let Args { routing_key: key, krate } = match parse_args(args) {
        Ok(args) => args,
        Err(err) => return err.into_compile_error(),
    };
    if let Err(reason) = check_shape(&key.value()) {
        return syn::Error::new_spanned(&key, reason).into_compile_error();
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        #input

        #[automatically_derived]
        impl #impl_generics #krate::RoutingKeyProvider for #name #ty_generics #where_clause {
            const ROUTING_KEY: &'static str = #key;
        }
    }
}

fn parse_args(args: TokenStream) -> syn::Result<Args> {
    let mut key = None;
    let mut krate = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("routing_key") {
            key = Some(meta.value()?.parse::<LitStr>()?);
            Ok(())
        } else if meta.path.is_ident("crate") {
            krate = Some(meta.value()?.parse::<LitStr>()?.parse::<Path>()?);
            Ok(())
        } else {
            Err(meta.error("unsupported domain_event argument, expected `routing_key` or `crate`"))
        }
    });
    parser.parse2(args)?;

    let routing_key = key.ok_or_else(|| {
        syn::Error::new(proc_macro2::Span::call_site(), "domain_event requires `routing_key = \"...\"`")
    })?;
    let krate = krate.unwrap_or_else(|| syn::parse_quote!(::evroute_topology));
    Ok(Args { routing_key, krate })
}

/// Mirrors the runtime parser: empty means opt-out, otherwise two or more non-empty segments.
fn check_shape(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Ok(());
    }
    if raw.split('.').any(str::is_empty) {
        return Err("routing key segments must not be empty");
    }
    if raw.split('.').count() < 2 {
        return Err("routing key needs an entity path and an event type, e.g. `user.created`");
    }
    Ok(())
}
