use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod scopes;

use scopes::ParsedScopes;

/// Declare the scopes a query type supports as a fieldless enum.
///
/// Each variant is one scope, named after the variant in snake_case unless renamed.
///
/// # Example
///
/// ```text
/// #[derive(Scopes)]
/// #[scope(query = "articles")]        // optional: register with the inventory
/// enum ArticleScope {
///     Published,                      // "published"
///     ByAuthor,                       // "by_author"
///     #[scope(rename = "tagged_with")]
///     Tagged,                         // "tagged_with"
/// }
///
/// // Generated:
/// // - impl sifter::ScopeNames for ArticleScope (SCOPES, from_scope_name, scope_name)
/// // - a sifter::ScopeRegistration for "articles" when `query` is given
/// ```
#[proc_macro_derive(Scopes, attributes(scope))]
pub fn derive_scopes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedScopes::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
