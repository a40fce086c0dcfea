#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the evroute crates.
//!
//! * [`evroute_error`] turns a plain enum into a `thiserror` error with context support.
//! * [`domain_event`] declares the routing key of an event kind and checks its shape
//!   while the crate is being compiled.
//!
//! Examples are `ignore`d here because the generated code refers to crates that depend on
//! this one; the same snippets are exercised by the consuming crates' tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>` and, for each
///   variant with a source field, to `Result<T, SourceError>`.
/// * `From<SourceError>` for variants with a source field.
/// * `From<&'static str>` / `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Applied to an enum with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants carrying a source (`source` field, `#[source]` or `#[from]`) must also carry
///    a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use evroute_derive::evroute_error;
/// use std::borrow::Cow;
///
/// #[evroute_error]
/// pub enum ManifestError {
///     #[error("Manifest I/O{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn evroute_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Declares the broker routing key of a domain event kind.
///
/// Implements `evroute_topology::RoutingKeyProvider` for the annotated type. A non-empty
/// key must consist of at least two non-empty dot-separated segments, otherwise compilation
/// fails at the key literal. An empty key declares a kind that opts out of broker routing.
///
/// The generated impl names `::evroute_topology`. Crates that reach the topology crate
/// through another path pass it with `crate = "..."`, e.g. `crate = "evroute::topology"`.
///
/// # Example
///
/// ```rust,ignore
/// #[evroute_derive::domain_event(routing_key = "billing.invoice.created")]
/// #[derive(Debug, Clone)]
/// pub struct InvoiceCreated {
///     pub invoice_id: u64,
/// }
///
/// #[evroute::domain_event(routing_key = "billing.invoice.voided", crate = "evroute::topology")]
/// pub struct InvoiceVoided;
/// ```
#[proc_macro_attribute]
pub fn domain_event(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::event::expand(args.into(), input).into()
}
