use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

pub(crate) struct ParsedScopes {
    name: Ident,
    query: Option<String>,
    variants: Vec<ParsedVariant>,
}

struct ParsedVariant {
    ident: Ident,
    scope: String,
}

impl ParsedScopes {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(&input.generics, "Scopes cannot be derived for generic enums"));
        }

        let data = match &input.data {
            Data::Enum(data) => data,
            _ => return Err(Error::new(input.ident.span(), "Scopes can only be derived for enums")),
        };

        let mut query = None;
        for attr in &input.attrs {
            if attr.path().is_ident("scope") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("query") {
                        let value: LitStr = meta.value()?.parse()?;
                        if value.value().is_empty() {
                            return Err(meta.error("query type name cannot be empty"));
                        }
                        query = Some(value.value());
                        Ok(())
                    } else {
                        Err(meta.error("unsupported scope attribute; expected `query = \"...\"`"))
                    }
                })?;
            }
        }

        let mut variants: Vec<ParsedVariant> = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(Error::new_spanned(
                    &variant.fields,
                    "Scopes variants cannot carry fields; arguments are passed at apply time",
                ));
            }

            let scope = variant_rename(&variant.attrs)?.unwrap_or_else(|| to_snake_case(&variant.ident.unraw().to_string()));
            if scope.is_empty() {
                return Err(Error::new(variant.ident.span(), "scope name cannot be empty"));
            }
            if variants.iter().any(|existing| existing.scope == scope) {
                return Err(Error::new(
                    variant.ident.span(),
                    format!("duplicate scope name '{scope}'"),
                ));
            }

            variants.push(ParsedVariant {
                ident: variant.ident.clone(),
                scope,
            });
        }

        Ok(Self {
            name: input.ident.clone(),
            query,
            variants,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let idents: Vec<&Ident> = self.variants.iter().map(|v| &v.ident).collect();
        let scopes: Vec<&str> = self.variants.iter().map(|v| v.scope.as_str()).collect();

        let registration = self.query.as_ref().map(|query| {
            quote! {
                ::sifter::inventory::submit! {
                    ::sifter::ScopeRegistration {
                        type_name: stringify!(#name),
                        query_type: #query,
                        scopes: <#name as ::sifter::ScopeNames>::SCOPES,
                    }
                }
            }
        });

        quote! {
            impl ::sifter::ScopeNames for #name {
                const SCOPES: &'static [&'static str] = &[#(#scopes),*];

                fn from_scope_name(name: &str) -> ::core::option::Option<Self> {
                    match name {
                        #(#scopes => ::core::option::Option::Some(Self::#idents),)*
                        _ => ::core::option::Option::None,
                    }
                }

                fn scope_name(&self) -> &'static str {
                    match *self {
                        #(Self::#idents => #scopes,)*
                    }
                }
            }

            #registration
        }
    }
}

fn variant_rename(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut rename = None;
    for attr in attrs {
        if attr.path().is_ident("scope") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported scope attribute; expected `rename = \"...\"`"))
                }
            })?;
        }
    }
    Ok(rename)
}

/// `ByAuthor` -> `by_author`, `HTTPOnly` -> `http_only`.
fn to_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_cases_variant_names() {
        assert_eq!(to_snake_case("Published"), "published");
        assert_eq!(to_snake_case("ByAuthor"), "by_author");
        assert_eq!(to_snake_case("HTTPOnly"), "http_only");
        assert_eq!(to_snake_case("Top10Posts"), "top10_posts");
        assert_eq!(to_snake_case("Already_Snake"), "already_snake");
    }

    #[test]
    fn parses_enum_with_rename_and_query() {
        let input: DeriveInput = syn::parse_quote! {
            #[scope(query = "articles")]
            enum ArticleScope {
                Published,
                #[scope(rename = "tagged_with")]
                Tagged,
            }
        };
        let parsed = ParsedScopes::from_input(&input).unwrap();
        assert_eq!(parsed.query.as_deref(), Some("articles"));
        let scopes: Vec<&str> = parsed.variants.iter().map(|v| v.scope.as_str()).collect();
        assert_eq!(scopes, ["published", "tagged_with"]);

        let emitted = parsed.emit().to_string();
        assert!(emitted.contains("ScopeRegistration"));
    }

    #[test]
    fn rejects_structs_fields_and_duplicates() {
        let input: DeriveInput = syn::parse_quote! { struct NotAnEnum; };
        assert!(ParsedScopes::from_input(&input).is_err());

        let input: DeriveInput = syn::parse_quote! { enum WithData { ByAuthor(String) } };
        assert!(ParsedScopes::from_input(&input).is_err());

        let input: DeriveInput = syn::parse_quote! {
            enum Dupes {
                Active,
                #[scope(rename = "active")]
                AlsoActive,
            }
        };
        let err = ParsedScopes::from_input(&input).err().expect("duplicate names should fail");
        assert!(err.to_string().contains("duplicate scope name 'active'"));
    }

    #[test]
    fn rejects_generics_and_unknown_keys() {
        let input: DeriveInput = syn::parse_quote! { enum Generic<const N: usize> { Active } };
        let err = ParsedScopes::from_input(&input).err().expect("generic enums should fail");
        assert!(err.to_string().contains("generic enums"));

        let input: DeriveInput = syn::parse_quote! {
            #[scope(table = "articles")]
            enum UnknownContainerKey { Active }
        };
        let err = ParsedScopes::from_input(&input).err().expect("unknown container key should fail");
        assert!(err.to_string().contains("expected `query"));

        let input: DeriveInput = syn::parse_quote! {
            enum UnknownVariantKey {
                #[scope(skip)]
                Hidden,
            }
        };
        let err = ParsedScopes::from_input(&input).err().expect("unknown variant key should fail");
        assert!(err.to_string().contains("expected `rename"));

        let input: DeriveInput = syn::parse_quote! {
            #[scope(query = "")]
            enum EmptyQuery { Active }
        };
        assert!(ParsedScopes::from_input(&input).is_err());
    }

    #[test]
    fn registration_is_optional() {
        let input: DeriveInput = syn::parse_quote! { enum Plain { Recent } };
        let emitted = ParsedScopes::from_input(&input).unwrap().emit().to_string();
        assert!(!emitted.contains("ScopeRegistration"));
        assert!(emitted.contains("\"recent\""));
    }
}
