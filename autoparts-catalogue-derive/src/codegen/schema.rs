use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

pub struct ColumnSpec<'a> {
    pub column: &'a str,
    pub inner_type: &'a str,
    pub size: Option<usize>,
    pub primary_key: bool,
    pub auto: bool,
    pub nullable: bool,
    pub unique: bool,
    pub index: bool,
    pub positive: bool,
    pub url: bool,
    pub default_sql: Option<String>,
    pub foreign_key: Option<(Ident, String)>,
    pub on_delete: Option<&'a str>,
}

fn generate_sql_type(
    field_type: &str,
    option_size: Option<usize>,
    field: &syn::Field,
) -> syn::Result<TokenStream> {
    let sql_type = match field_type {
        "Text" => quote! { Text },
        "Float" => quote! { Float },
        "Integer" => quote! { Integer },
        "SmallInteger" => quote! { SmallInteger },
        "BigInteger" => quote! { BigInteger },
        "Boolean" => quote! { Boolean },
        "Date" => quote! { Date },
        "DateTime" => quote! { DateTime },
        "String" => {
            let size = option_size.unwrap_or(255);
            quote! { Varchar(#size) }
        }
        ty => {
            return Err(syn::Error::new_spanned(
                field,
                format!(
                    "Unexpected field type: '{ty}'. Expected one of: 'Integer', 'SmallInteger', \
                     'BigInteger', 'String', 'Float', 'Text', 'Date', 'Boolean', 'DateTime'."
                ),
            ))
        }
    };
    Ok(quote! { autoparts_catalogue::db::schema::SqlType::#sql_type })
}

fn generate_on_delete(on_delete: Option<&str>, field: &syn::Field) -> syn::Result<TokenStream> {
    let variant = match on_delete.unwrap_or("cascade") {
        "cascade" => quote! { Cascade },
        "set_null" => quote! { SetNull },
        "restrict" => quote! { Restrict },
        other => {
            return Err(syn::Error::new_spanned(
                field,
                format!("Unknown on_delete '{other}', use 'cascade', 'set_null' or 'restrict'"),
            ))
        }
    };
    Ok(quote! { autoparts_catalogue::db::schema::OnDelete::#variant })
}

/// `Column { .. }` constant describing one field.
pub fn generate_column(spec: &ColumnSpec<'_>, field: &syn::Field) -> syn::Result<TokenStream> {
    let ColumnSpec {
        column,
        primary_key,
        auto,
        nullable,
        unique,
        index,
        positive,
        url,
        ..
    } = spec;
    let sql_type = generate_sql_type(spec.inner_type, spec.size, field)?;

    let default = match &spec.default_sql {
        Some(value) => quote! { Some(#value) },
        None => quote! { None },
    };

    let foreign_key = match &spec.foreign_key {
        Some((model, target)) => {
            let on_delete = generate_on_delete(spec.on_delete, field)?;
            quote! {
                Some(autoparts_catalogue::db::schema::ForeignKey {
                    table: <#model as autoparts_catalogue::db::model::Model>::NAME,
                    column: #target,
                    on_delete: #on_delete,
                })
            }
        }
        None => quote! { None },
    };

    Ok(quote! {
        autoparts_catalogue::db::schema::Column {
            name: #column,
            sql_type: #sql_type,
            primary_key: #primary_key,
            auto: #auto,
            nullable: #nullable,
            unique: #unique,
            index: #index,
            positive: #positive,
            url: #url,
            default: #default,
            foreign_key: #foreign_key,
        }
    })
}

// Default for SQL
pub fn generate_default_sql(
    option_default: &Option<TokenStream>,
    field_type: &str,
    field: &syn::Field,
) -> syn::Result<Option<String>> {
    let Some(default_value) = option_default else {
        return Ok(None);
    };
    let default_value = crate::process::default_text(default_value);

    let sql = match (field_type, default_value.as_str()) {
        ("Date", "now") => "current_date".to_string(),
        ("DateTime", "now") => "current_timestamp".to_string(),
        (_, "now") => {
            return Err(syn::Error::new_spanned(
                field,
                "'now' is work only with Date or DateTime",
            ))
        }
        ("Boolean", "true") => "1".to_string(),
        ("Boolean", "false") => "0".to_string(),
        ("Boolean", _) => {
            return Err(syn::Error::new_spanned(
                field,
                "'Boolean' type allow only 'true' or 'false' value",
            ))
        }
        ("String" | "Text" | "Date" | "DateTime", value) => {
            format!("'{}'", value.replace('\'', "''"))
        }
        (_, value) => value.to_string(),
    };
    Ok(Some(sql))
}
