//! 实体派生宏实现

use crate::utils::{extract_name_from_attr, field_has_attribute, registration_ident};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result};

/// 实体字段声明
struct EntityField {
    name: String,
    ident: syn::Ident,
    column: Option<String>,
    id: bool,
}

/// 实现 #[derive(Entity)] 宏
pub fn derive_entity_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(&input.generics, "实体不支持泛型参数"));
    }

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(struct_name, "#[derive(Entity)] 只能用于结构体"));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(struct_name, "#[derive(Entity)] 需要具名字段"));
    };

    let table = extract_name_from_attr(&input.attrs, "table")?;
    let table_tag = match table {
        Some(Some(name)) => quote! {
            .with_tag(::infrastructure_common::Tag::Table(#name.to_string()))
        },
        Some(None) => {
            return Err(Error::new_spanned(
                struct_name,
                "#[table] 需要声明表名: #[table(name = \"...\")]",
            ))
        }
        // 缺少表名在启动时报告为实体元数据错误
        None => quote! {},
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let name = ident.to_string();
        let column = extract_name_from_attr(&field.attrs, "column")?
            .map(|column| column.unwrap_or_else(|| name.clone()));
        fields.push(EntityField {
            name,
            ident,
            column,
            id: field_has_attribute(field, "id"),
        });
    }

    let field_descriptors = fields.iter().map(|field| {
        let name = &field.name;
        let column = field
            .column
            .as_ref()
            .map(|column| quote! { .column(#column) });
        let id = field.id.then(|| quote! { .id() });
        quote! {
            .with_field(::infrastructure_common::FieldDescriptor::new(#name) #column #id)
        }
    });

    let field_values = fields
        .iter()
        .filter(|field| field.column.is_some())
        .map(|field| {
            let name = &field.name;
            let ident = &field.ident;
            quote! {
                (#name, ::infrastructure_common::Value::from(::std::clone::Clone::clone(&self.#ident)))
            }
        });

    let registration_fn = registration_ident("entity", struct_name);

    Ok(quote! {
        impl ::di_abstractions::Registrable for #struct_name {
            fn type_definition() -> ::di_abstractions::TypeDefinition {
                ::di_abstractions::TypeDefinition::new(
                    ::infrastructure_common::TypeDescriptor::concrete(
                        ::infrastructure_common::TypeInfo::of::<Self>(),
                    )
                    #table_tag
                    #(#field_descriptors)*
                )
            }
        }

        impl ::di_abstractions::Entity for #struct_name {
            fn field_values(&self) -> ::std::vec::Vec<(&'static str, ::infrastructure_common::Value)> {
                ::std::vec![#(#field_values),*]
            }
        }

        #[ctor::ctor]
        fn #registration_fn() {
            ::di_impl::TypeInventory::submit_type::<#struct_name>();
        }
    })
}
