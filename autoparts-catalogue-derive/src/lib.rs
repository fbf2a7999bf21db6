use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod codegen;
mod process;

/// Derives `autoparts_catalogue::db::model::Model`.
///
/// Struct options: `#[model(table = "..", db = "..", ordering = "a, -b",
/// unique_together = ["a, b"], verbose_name = "..", verbose_name_plural = "..")]`.
///
/// Field options: `#[field(primary_key, auto, size, unique, index, default,
/// foreign_key = Model.column, on_delete = "cascade", column = "..",
/// positive, auto_now, url)]`.
#[proc_macro_derive(Model, attributes(field, model))]
pub fn model_derive(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);
    expand(&mut input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &mut DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let attrs = codegen::ModelAttrs::extract(input)?;
    let name = input.ident.clone();

    let fields = match input.data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &name,
                    "Model derive macro only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &name,
                "Model derive macro only supports structs",
            ))
        }
    };

    let output = process::process_fields(fields)?;
    codegen::generate_model(&name, attrs, output)
}
