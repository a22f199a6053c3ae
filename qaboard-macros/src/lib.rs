use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, Lit, PathArguments,
    Type,
};

#[proc_macro_derive(InputForm, attributes(form, field))]
pub fn derive_input_form(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // Extract form metadata from #[form(...)]
    let form_meta = extract_form_meta(&input.attrs);

    // Extract field schemas from struct fields
    let field_schemas: Vec<proc_macro2::TokenStream> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields
                .named
                .iter()
                .map(|f| {
                    let name = f.ident.as_ref().unwrap().to_string();

                    let inferred_type = infer_field_type(&f.ty);
                    let (label, description, type_override, default) = extract_field_meta(&f.attrs);
                    let required = !is_option_type(&f.ty);

                    // Use override if provided, otherwise infer
                    let final_field_type = type_override.unwrap_or(inferred_type);

                    // Fall back to a title-cased field name when no label is given
                    let label = if label.is_empty() {
                        title_case(&name)
                    } else {
                        label
                    };

                    quote! {
                        qaboard_sdk::FieldSchema {
                            name: #name.to_string(),
                            field_type: #final_field_type,
                            label: #label.to_string(),
                            description: #description.to_string(),
                            required: #required,
                            default: #default,
                        }
                    }
                })
                .collect(),
            _ => panic!("InputForm only supports named fields"),
        },
        _ => panic!("InputForm only supports structs"),
    };

    let struct_name = &input.ident;
    let form_id = &form_meta.id;
    let form_name = &form_meta.name;
    let form_desc = &form_meta.description;

    let expanded = quote! {
        impl qaboard_sdk::InputForm for #struct_name {
            fn metadata() -> qaboard_sdk::FormMetadata {
                qaboard_sdk::FormMetadata {
                    id: #form_id.to_string(),
                    name: #form_name.to_string(),
                    description: #form_desc.to_string(),
                }
            }

            fn fields() -> Vec<qaboard_sdk::FieldSchema> {
                vec![#(#field_schemas),*]
            }
        }
    };

    TokenStream::from(expanded)
}

struct FormMeta {
    id: String,
    name: String,
    description: String,
}

fn extract_form_meta(attrs: &[Attribute]) -> FormMeta {
    for attr in attrs {
        if attr.path().is_ident("form") {
            let mut id = String::new();
            let mut name = String::new();
            let mut description = String::new();

            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        id = s.value();
                    }
                } else if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        name = s.value();
                    }
                } else if meta.path.is_ident("description") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        description = s.value();
                    }
                }
                Ok(())
            });

            return FormMeta {
                id,
                name,
                description,
            };
        }
    }

    panic!("Missing #[form(...)] attribute");
}

fn extract_field_meta(
    attrs: &[Attribute],
) -> (
    String,
    String,
    Option<proc_macro2::TokenStream>,
    proc_macro2::TokenStream,
) {
    let mut label = String::new();
    let mut description = String::new();
    let mut widget = None;
    let mut options = None;
    let mut min = None;
    let mut max = None;
    let mut default = None;

    for attr in attrs {
        if attr.path().is_ident("field") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("label") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        label = s.value();
                    }
                } else if meta.path.is_ident("description") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        description = s.value();
                    }
                } else if meta.path.is_ident("widget") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        widget = Some(s.value());
                    }
                } else if meta.path.is_ident("options") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        options = Some(s.value());
                    }
                } else if meta.path.is_ident("min") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        min = s.value().parse::<i64>().ok();
                    }
                } else if meta.path.is_ident("max") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        max = s.value().parse::<i64>().ok();
                    }
                } else if meta.path.is_ident("default") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        default = Some(s.value());
                    }
                }
                Ok(())
            });
        }
    }

    // Build field type from parsed values
    let field_type_token = widget.map(|w| match w.as_str() {
        "text" => quote! { qaboard_sdk::FieldType::Text },
        "textarea" => quote! { qaboard_sdk::FieldType::TextArea },
        "number" => {
            let min_token = min.map(|m| quote! { Some(#m) }).unwrap_or(quote! { None });
            let max_token = max.map(|m| quote! { Some(#m) }).unwrap_or(quote! { None });
            quote! { qaboard_sdk::FieldType::Number { min: #min_token, max: #max_token } }
        }
        "select" => {
            let opts: Vec<String> = options
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            quote! { qaboard_sdk::FieldType::Select { options: vec![#(#opts.to_string()),*] } }
        }
        "document" => quote! { qaboard_sdk::FieldType::DocumentRef },
        _ => quote! { qaboard_sdk::FieldType::Text },
    });

    let default_token = default
        .map(|d| quote! { Some(#d.to_string()) })
        .unwrap_or(quote! { None });

    (label, description, field_type_token, default_token)
}

fn infer_field_type(ty: &Type) -> proc_macro2::TokenStream {
    // Check if it's Option<T>
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner_ty)) = args.args.first() {
                        return infer_field_type_inner(inner_ty);
                    }
                }
            } else {
                return infer_field_type_inner(ty);
            }
        }
    }

    quote! { qaboard_sdk::FieldType::Text }
}

fn infer_field_type_inner(ty: &Type) -> proc_macro2::TokenStream {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            let type_name = segment.ident.to_string();
            match type_name.as_str() {
                "String" => quote! { qaboard_sdk::FieldType::Text },
                "usize" | "u32" | "u64" | "i32" | "i64" => {
                    quote! { qaboard_sdk::FieldType::Number { min: None, max: None } }
                }
                _ => quote! { qaboard_sdk::FieldType::Text },
            }
        } else {
            quote! { qaboard_sdk::FieldType::Text }
        }
    } else {
        quote! { qaboard_sdk::FieldType::Text }
    }
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
