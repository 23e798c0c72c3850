use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro that documents the CSV columns a row struct serializes to.
///
/// For each named field, records:
/// - Column name (respects #[serde(rename = "...")])
/// - Required (true unless the type is Option<T>)
/// - Description (from doc comments)
///
/// Fields marked #[serde(skip)] or #[serde(skip_serializing)] are omitted.
///
/// Generates a `csv_columns() -> &'static [CsvColumn]` method; `CsvColumn`
/// must be in scope at the derive site.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("CsvSchema only supports structs with named fields"),
        },
        _ => panic!("CsvSchema only supports structs"),
    };

    let column_info: Vec<_> = fields
        .iter()
        .filter(|field| !is_skipped(&field.attrs))
        .map(|field| {
            let field_name = field.ident.as_ref().unwrap().to_string();
            let column_name = serde_rename(&field.attrs).unwrap_or(field_name);
            let required = !is_option_type(&field.ty);
            let doc = doc_comment(&field.attrs);
            (column_name, required, doc)
        })
        .collect();

    let column_entries = column_info.iter().map(|(name, required, desc)| {
        quote! {
            CsvColumn {
                name: #name,
                required: #required,
                description: #desc,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn csv_columns() -> &'static [CsvColumn] {
                static COLUMNS: &[CsvColumn] = &[
                    #(#column_entries),*
                ];
                COLUMNS
            }
        }
    };

    TokenStream::from(expanded)
}

fn serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value = meta.value()?;
                let lit: Lit = value.parse()?;
                if let Lit::Str(lit_str) = lit {
                    rename = Some(lit_str.value());
                }
            } else if meta.input.peek(syn::token::Paren) {
                // rename_all(...) and friends carry nested lists we don't read
                let _ = meta.input.parse::<proc_macro2::TokenTree>();
            } else if meta.input.peek(syn::Token![=]) {
                let _ = meta.value()?.parse::<Lit>();
            }
            Ok(())
        });
    }
    rename
}

fn is_skipped(attrs: &[syn::Attribute]) -> bool {
    let mut skipped = false;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                skipped = true;
            } else if meta.input.peek(syn::Token![=]) {
                let _ = meta.value()?.parse::<Lit>();
            }
            Ok(())
        });
    }
    skipped
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
