//! 仓储接口宏实现
//!
//! `#[repository]` 标注在继承 `CrudRepository<Id, Entity>` 的 trait 上，生成:
//! - `dyn Trait` 的类型定义（接口描述符、泛型参数、代理工厂）
//! - 仓储分发代理对该 trait 的实现，方法名由蛇形转换为驼峰后分发

use crate::utils::{registration_ident, to_camel_case};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    Error, FnArg, GenericArgument, Ident, ItemTrait, Pat, PathArguments, Result, Token,
    TraitBound, TraitItem, Type, TypeParamBound,
};

const MARKER_TRAITS: [&str; 4] = ["Send", "Sync", "Sized", "Unpin"];

/// `#[repository(id = Type, entity = Type)]` 参数，继承的接口不是 `CrudRepository` 时使用
#[derive(Default)]
pub struct RepositoryArgs {
    pub id: Option<Type>,
    pub entity: Option<Type>,
}

impl Parse for RepositoryArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = RepositoryArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: Type = input.parse()?;
            match key.to_string().as_str() {
                "id" => args.id = Some(value),
                "entity" => args.entity = Some(value),
                _ => return Err(Error::new_spanned(key, "#[repository] 只支持 id 与 entity 参数")),
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// 实现 #[repository] 宏
pub fn repository_impl(args: RepositoryArgs, item: ItemTrait) -> Result<TokenStream> {
    let trait_ident = &item.ident;

    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(&item.generics, "仓储接口不支持泛型参数"));
    }

    let parents: Vec<&TraitBound> = item
        .supertraits
        .iter()
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(bound) => Some(bound),
            _ => None,
        })
        .filter(|bound| {
            bound.path.segments.last().map_or(false, |segment| {
                !MARKER_TRAITS.contains(&segment.ident.to_string().as_str())
            })
        })
        .collect();

    let (id_type, entity_type) = match (args.id, args.entity) {
        (Some(id), Some(entity)) => (id, entity),
        (None, None) => crud_type_arguments(&parents).ok_or_else(|| {
            Error::new_spanned(
                trait_ident,
                "仓储接口必须继承 CrudRepository<Id, Entity>, 或通过 #[repository(id = ..., entity = ...)] 声明",
            )
        })?,
        _ => {
            return Err(Error::new_spanned(
                trait_ident,
                "#[repository] 需要同时声明 id 与 entity",
            ))
        }
    };

    let parent_paths = parents.iter().map(|bound| &bound.path);
    let proxy_methods = item
        .items
        .iter()
        .filter_map(|trait_item| match trait_item {
            TraitItem::Fn(method) if method.default.is_none() => Some(method),
            _ => None,
        })
        .map(|method| {
            let signature = &method.sig;
            let query_name = to_camel_case(&signature.ident.to_string());
            let arguments = signature
                .inputs
                .iter()
                .filter_map(|input| match input {
                    FnArg::Typed(typed) => Some(typed),
                    FnArg::Receiver(_) => None,
                })
                .map(|typed| match &*typed.pat {
                    Pat::Ident(pat) => {
                        let ident = &pat.ident;
                        Ok(quote! { ::infrastructure_common::Value::from(#ident) })
                    }
                    other => Err(Error::new_spanned(other, "仓储方法参数必须是简单标识符")),
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(quote! {
                #signature {
                    self.invoke(#query_name, &[#(#arguments),*])
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let registration_fn = registration_ident("repository", trait_ident);

    Ok(quote! {
        #item

        impl ::di_abstractions::Registrable for dyn #trait_ident {
            fn type_definition() -> ::di_abstractions::TypeDefinition {
                ::di_abstractions::TypeDefinition::new(
                    ::infrastructure_common::TypeDescriptor::interface(
                        ::infrastructure_common::TypeInfo::of::<dyn #trait_ident>(),
                    )
                    #(.with_interface(::infrastructure_common::TypeInfo::of::<dyn #parent_paths>()))*
                    .with_type_arguments(::std::vec![
                        ::infrastructure_common::TypeInfo::of::<#id_type>(),
                        ::infrastructure_common::TypeInfo::of::<#entity_type>(),
                    ]),
                )
                .with_proxy_factory(|target, metadata| {
                    ::di_abstractions::interface_bean::<dyn #trait_ident>(::std::sync::Arc::new(
                        ::di_impl::RepositoryProxy::<#id_type, #entity_type>::new(target, metadata),
                    ))
                })
            }
        }

        impl ::di_abstractions::Interface for dyn #trait_ident {}

        impl #trait_ident for ::di_impl::RepositoryProxy<#id_type, #entity_type> {
            #(#proxy_methods)*
        }

        #[ctor::ctor]
        fn #registration_fn() {
            ::di_impl::TypeInventory::submit_type::<dyn #trait_ident>();
        }
    })
}

/// 从 `CrudRepository<Id, Entity>` 父接口中提取泛型参数
fn crud_type_arguments(parents: &[&TraitBound]) -> Option<(Type, Type)> {
    parents.iter().find_map(|bound| {
        let segment = bound.path.segments.last()?;
        if segment.ident != "CrudRepository" {
            return None;
        }
        let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
            return None;
        };
        let types: Vec<&Type> = arguments
            .args
            .iter()
            .filter_map(|argument| match argument {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect();
        match types.as_slice() {
            [id, entity] => Some(((*id).clone(), (*entity).clone())),
            _ => None,
        }
    })
}
