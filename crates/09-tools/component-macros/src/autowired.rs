//! setter 注入宏实现
//!
//! `#[autowired]` 标注在组件的 impl 块上，收集其中带 `#[autowire]` 的方法，
//! 为组件生成 `AutowirePoints` 实现。

use crate::utils::{extract_arc_inner, is_trait_object};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, FnArg, ImplItem, ImplItemFn, ItemImpl, Result, ReturnType, Type};

/// 实现 #[autowired] 宏
pub fn autowired_impl(mut item: ItemImpl) -> Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(Error::new_spanned(path, "#[autowired] 只能用于固有 impl 块"));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(&item.generics, "#[autowired] 不支持泛型 impl 块"));
    }

    let self_ty = item.self_ty.clone();
    let mut injectors = Vec::new();

    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let before = method.attrs.len();
        method.attrs.retain(|attr| !attr.path().is_ident("autowire"));
        if method.attrs.len() == before {
            continue;
        }
        injectors.push(injection_point(method)?);
    }

    Ok(quote! {
        #item

        impl ::di_abstractions::AutowirePoints for #self_ty {
            fn autowire_points(
                definition: ::di_abstractions::TypeDefinition,
            ) -> ::di_abstractions::TypeDefinition {
                definition
                    #(#injectors)*
            }
        }
    })
}

/// 生成单个注入点: 方法描述符加注入函数
///
/// 参数个数不为一时仍然生成描述符，由容器在装配时报告错误
fn injection_point(method: &ImplItemFn) -> Result<TokenStream> {
    let method_ident = &method.sig.ident;
    let method_name = method_ident.to_string();

    match method.sig.inputs.first() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(Error::new_spanned(
                &method.sig,
                "#[autowire] 方法必须以 &self 作为接收者",
            ))
        }
    }
    if !matches!(method.sig.output, ReturnType::Default) {
        return Err(Error::new_spanned(&method.sig.output, "#[autowire] 方法不能有返回值"));
    }

    let parameters: Vec<&Type> = method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(typed) => Some(&*typed.ty),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let dependency_types: Vec<&Type> = parameters
        .iter()
        .map(|&ty| extract_arc_inner(ty).unwrap_or(ty))
        .collect();

    let descriptor = quote! {
        ::infrastructure_common::MethodDescriptor::new(
            #method_name,
            ::std::vec![#(::infrastructure_common::TypeInfo::of::<#dependency_types>()),*],
        )
        .with_tag(::infrastructure_common::Tag::Autowire)
    };

    let injector = match parameters.as_slice() {
        [parameter] => {
            let Some(dependency) = extract_arc_inner(parameter) else {
                return Err(Error::new_spanned(
                    parameter,
                    "#[autowire] 参数类型必须是 Arc<dyn Trait> 或 Arc<Type>",
                ));
            };
            let resolve = if is_trait_object(dependency) {
                quote! { ::di_abstractions::expect_interface::<#dependency>(&dependency)? }
            } else {
                quote! { ::di_abstractions::expect_component::<#dependency>(&dependency)? }
            };
            quote! {
                |bean, dependency| {
                    let target = ::di_abstractions::expect_component::<Self>(bean)?;
                    target.#method_ident(#resolve);
                    ::std::result::Result::Ok(())
                }
            }
        }
        _ => quote! {
            |_, _| {
                ::std::result::Result::Err(::infrastructure_common::ContainerError::wiring(
                    ::std::any::type_name::<Self>(),
                    #method_name,
                    "注入方法必须且只能声明一个参数",
                ))
            }
        },
    };

    Ok(quote! {
        .with_injector(#descriptor, #injector)
    })
}
