pub mod schema;

use deluxe::ExtractAttributes;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Ident};

use crate::process::Output;

/// Struct-level `#[model(...)]` options.
#[derive(ExtractAttributes, Default, Debug)]
#[deluxe(attributes(model), default)]
pub struct ModelAttrs {
    pub table: Option<String>,
    pub db: Option<String>,
    pub ordering: Option<String>,
    pub unique_together: Vec<String>,
    pub verbose_name: Option<String>,
    pub verbose_name_plural: Option<String>,
}

impl ModelAttrs {
    pub fn extract(input: &mut DeriveInput) -> syn::Result<Self> {
        Ok(Self::extract_attributes(input)?)
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn generate_model(name: &Ident, attrs: ModelAttrs, output: Output) -> syn::Result<TokenStream> {
    let Output {
        primary_key,
        default_fields,
        columns,
        insert_args,
        update_args,
        dependencies,
    } = output;

    let primary_key = primary_key.ok_or_else(|| {
        syn::Error::new_spanned(name, "Model needs a field marked `#[field(primary_key = true)]`")
    })?;
    let pk_column = &primary_key.column;
    let pk_field = &primary_key.field;
    let pk_value = if primary_key.nullable {
        quote! { self.#pk_field }
    } else {
        quote! { Some(self.#pk_field) }
    };

    let model_name = name.to_string();
    let table = attrs
        .table
        .unwrap_or_else(|| model_name.to_lowercase());
    let db = match &attrs.db {
        Some(db) => quote! { Some(#db) },
        None => quote! { None },
    };
    let ordering = attrs.ordering.as_deref().map(split_list).unwrap_or_default();
    let unique_together = attrs
        .unique_together
        .iter()
        .map(|group| {
            let columns = split_list(group);
            quote! { &[#(#columns),*] }
        })
        .collect::<Vec<_>>();
    let verbose_name = attrs.verbose_name.unwrap_or_else(|| model_name.clone());
    let verbose_name_plural = attrs
        .verbose_name_plural
        .unwrap_or_else(|| format!("{verbose_name}s"));

    Ok(quote! {
        impl autoparts_catalogue::db::model::Model for #name {
            const NAME: &'static str = #table;
            const MODEL: &'static str = #model_name;
            const PK: &'static str = #pk_column;
            const DB: Option<&'static str> = #db;
            const ORDERING: &'static [&'static str] = &[#(#ordering),*];
            const UNIQUE_TOGETHER: &'static [&'static [&'static str]] = &[#(#unique_together),*];
            const VERBOSE_NAME: &'static str = #verbose_name;
            const VERBOSE_NAME_PLURAL: &'static str = #verbose_name_plural;
            const COLUMNS: &'static [autoparts_catalogue::db::schema::Column] = &[#(#columns),*];
            const DEPENDS_ON: &'static [&'static str] = &[
                #(<#dependencies as autoparts_catalogue::db::model::Model>::NAME),*
            ];

            fn pk(&self) -> Option<i32> {
                #pk_value
            }

            fn insert_args(&self) -> Vec<autoparts_catalogue::db::query::Kwargs> {
                vec![#(#insert_args),*]
            }

            fn update_args(&self) -> Vec<autoparts_catalogue::db::query::Kwargs> {
                vec![#(#update_args),*]
            }
        }

        impl Default for #name {
            fn default() -> Self {
                Self {#(#default_fields),*}
            }
        }

        autoparts_catalogue::inventory::submit! {
            autoparts_catalogue::db::MigrationRegistrar {
                table: <#name as autoparts_catalogue::db::model::Model>::NAME,
                db: <#name as autoparts_catalogue::db::model::Model>::DB,
                depends_on: <#name as autoparts_catalogue::db::model::Model>::DEPENDS_ON,
                migrate_fn: <#name as autoparts_catalogue::db::model::Model>::migrate,
                schema_fn: <#name as autoparts_catalogue::db::model::Model>::schema,
            }
        }
    })
}
