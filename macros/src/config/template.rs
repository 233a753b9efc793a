//! Template generation for the Config derive macro.

use proc_macro2::TokenStream;
use quote::quote;

use super::field::FieldInfo;

/// Generate template code (TokenStream) for fields.
pub fn generate_template_code(fields: &[&FieldInfo]) -> TokenStream {
    let field_codes: Vec<TokenStream> = fields.iter().map(|f| field_template_code(f)).collect();

    quote! {
        #(#field_codes)*
    }
}

/// Generate TOML template code for a single field.
fn field_template_code(info: &FieldInfo) -> TokenStream {
    let field_name = &info.name;
    let toml_name = &info.toml_name;

    // Nested sections render their own header with the sub-struct's doc;
    // the field doc would duplicate it
    if info.sub {
        let field_ty = &info.ty;
        return quote! {
            out.push('\n');
            out.push_str(&<#field_ty>::template_with_header());
        };
    }

    // Doc comment lines become `# ` comments above the field
    let doc_code = if let Some(ref doc) = info.doc {
        let doc_lines: Vec<_> = doc.lines().map(|l| format!("# {}\n", l.trim())).collect();
        let doc_str = doc_lines.join("");
        quote! { out.push_str(#doc_str); }
    } else {
        quote! {}
    };

    let ty_str = type_to_string(&info.ty);
    let is_optional = ty_str.starts_with("Option<");

    // Optional fields without an explicit default are commented out
    if is_optional && info.default.is_none() {
        let line = format!("# {} = \"\"\n", toml_name);
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    // Explicit default value (compile-time known)
    if let Some(ref default_val) = info.default {
        let formatted = format_default_for_type(default_val, &ty_str);
        let line = format!("{} = {}\n", toml_name, formatted);
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    // Fall back to Default::default() serialized at runtime
    quote! {
        #doc_code
        out.push_str(#toml_name);
        out.push_str(" = ");
        out.push_str(&toml::Value::try_from(default.#field_name.clone())
            .map(|v| v.to_string())
            .unwrap_or_default());
        out.push('\n');
    }
}

/// Convert syn::Type to string representation.
fn type_to_string(ty: &syn::Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}

/// Format default value based on field type.
///
/// String-like types get quoted, numeric and bool are used as-is.
fn format_default_for_type(value: &str, ty: &str) -> String {
    match ty {
        "String" | "PathBuf" => format!("\"{}\"", value),
        "bool" | "u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64"
        | "isize" | "f32" | "f64" => value.to_string(),
        _ if ty.starts_with("Vec<") || ty.starts_with("Option<") => value.to_string(),
        // Enum-valued fields serialize as strings
        _ => format!("\"{}\"", value),
    }
}
