use deluxe::ExtractAttributes;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{GenericArgument, PathArguments, Type};

use crate::codegen::schema::{generate_column, generate_default_sql, ColumnSpec};

pub struct Output {
    pub primary_key: Option<PrimaryKey>,
    pub default_fields: Vec<TokenStream>,
    pub columns: Vec<TokenStream>,
    pub insert_args: Vec<TokenStream>,
    pub update_args: Vec<TokenStream>,
    pub dependencies: Vec<syn::Ident>,
}

pub struct PrimaryKey {
    pub field: syn::Ident,
    pub column: String,
    pub nullable: bool,
}

#[derive(ExtractAttributes, Default, Debug)]
#[deluxe(attributes(field), default)]
struct ModelField {
    primary_key: Option<bool>,
    auto: Option<bool>,
    unique: Option<bool>,
    index: Option<bool>,
    size: Option<usize>,
    default: Option<TokenStream>,
    foreign_key: Option<TokenStream>,
    on_delete: Option<String>,
    column: Option<String>,
    positive: Option<bool>,
    auto_now: Option<bool>,
    url: Option<bool>,
}

pub fn process_fields(
    fields: &syn::punctuated::Punctuated<syn::Field, syn::Token![,]>,
) -> syn::Result<Output> {
    let mut output = Output {
        primary_key: None,
        default_fields: Vec::new(),
        columns: Vec::new(),
        insert_args: Vec::new(),
        update_args: Vec::new(),
        dependencies: Vec::new(),
    };

    for field in fields {
        let attributes = ModelField::extract_attributes(&mut field.clone())?;
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "Model fields must be named"))?;
        let column = attributes
            .column
            .clone()
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());
        let inner_type = extract_inner_type(&field.ty)?;
        let nullable = is_nullable(&field.ty);
        let is_pk = attributes.primary_key.unwrap_or(false);
        let is_auto = attributes.auto.unwrap_or(false);
        let auto_now = attributes.auto_now.unwrap_or(false);

        if is_pk {
            output.primary_key = Some(PrimaryKey {
                field: field_name.clone(),
                column: column.clone(),
                nullable,
            });
        }

        let value = if auto_now {
            quote! { autoparts_catalogue::utils::now() }
        } else {
            quote! { self.#field_name.clone() }
        };
        let assign = quote! { autoparts_catalogue::db::query::Kwargs::assign(#column, #value) };
        if !(is_pk && is_auto) {
            output.insert_args.push(assign.clone());
        }
        if !is_pk {
            output.update_args.push(assign);
        }

        let foreign_key = match &attributes.foreign_key {
            Some(fk) => {
                let (model, target) = parse_foreign_key(fk)?;
                output.dependencies.push(model.clone());
                Some((model, target))
            }
            None => None,
        };

        let default_sql = generate_default_sql(&attributes.default, &inner_type, field)?;
        let spec = ColumnSpec {
            column: &column,
            inner_type: &inner_type,
            size: attributes.size,
            primary_key: is_pk,
            auto: is_auto,
            nullable,
            unique: attributes.unique.unwrap_or(false),
            index: attributes.index.unwrap_or(false),
            positive: attributes.positive.unwrap_or(false),
            url: attributes.url.unwrap_or(false),
            default_sql,
            foreign_key,
            on_delete: attributes.on_delete.as_deref(),
        };
        output.columns.push(generate_column(&spec, field)?);

        let default_value =
            generate_default_field(&attributes.default, &inner_type, nullable, field)?;
        output
            .default_fields
            .push(quote! { #field_name: #default_value });
    }

    Ok(output)
}

fn parse_foreign_key(fk: &TokenStream) -> syn::Result<(syn::Ident, String)> {
    let text = fk.to_string().replace(' ', "");
    match text.split_once('.') {
        Some((model, column)) if !model.is_empty() && !column.is_empty() => {
            Ok((format_ident!("{}", model), column.to_string()))
        }
        _ => Err(syn::Error::new_spanned(
            fk,
            "Invalid foreign key format, expected `Model.column`",
        )),
    }
}

// Default for Rust `Default` impl
fn generate_default_field(
    default: &Option<TokenStream>,
    inner_type: &str,
    nullable: bool,
    field: &syn::Field,
) -> syn::Result<TokenStream> {
    let is_text = matches!(inner_type, "String" | "Text" | "Date" | "DateTime");

    let default_value = match default {
        Some(tokens) => {
            let value = default_text(tokens);
            let value = match (inner_type, value.as_str()) {
                ("Date", "now") => quote! { autoparts_catalogue::utils::today() },
                ("DateTime", "now") => quote! { autoparts_catalogue::utils::now() },
                ("Boolean", "true") => quote! { 1 },
                ("Boolean", "false") => quote! { 0 },
                (_, "now") => {
                    return Err(syn::Error::new_spanned(
                        field,
                        "The keyword 'now' only works with Date or DateTime type!",
                    ))
                }
                ("Boolean", _) => {
                    return Err(syn::Error::new_spanned(
                        field,
                        "Invalid boolean default value, use 'true' or 'false'!",
                    ))
                }
                _ if is_text => quote! { String::from(#value) },
                _ => quote! { #tokens },
            };
            if nullable {
                quote! { Some(#value) }
            } else {
                value
            }
        }
        None if nullable => quote! { None },
        None => match inner_type {
            "Float" => quote! { 0.0 },
            "Boolean" | "Integer" | "SmallInteger" | "BigInteger" => quote! { 0 },
            _ if is_text => quote! { String::default() },
            other => {
                return Err(syn::Error::new_spanned(
                    field,
                    format!("Unsupported type for default value: {other}"),
                ))
            }
        },
    };

    Ok(default_value)
}

/// Text of a `default = ..` value: the contents of a string literal, or the
/// tokens themselves for `true`, `0` and the like.
pub fn default_text(tokens: &TokenStream) -> String {
    match syn::parse2::<syn::LitStr>(tokens.clone()) {
        Ok(literal) => literal.value(),
        Err(_) => tokens.to_string(),
    }
}

pub fn is_nullable(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"))
}

pub fn extract_inner_type(field_type: &Type) -> syn::Result<String> {
    if let Type::Path(type_path) = field_type {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner_type)) = args.args.first() {
                        return extract_inner_type(inner_type);
                    }
                }
            }
            return Ok(segment.ident.to_string());
        }
    }
    Err(syn::Error::new_spanned(field_type, "Unsupported field type"))
}
