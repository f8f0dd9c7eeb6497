//! 组件派生宏实现

use crate::utils::registration_ident;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parenthesized, punctuated::Punctuated, Data, DeriveInput, Error, Result, Token, Type,
};

/// 组件配置参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 实现的接口，按声明顺序
    pub implements: Vec<Type>,
    /// 是否带有 `#[autowired]` 注入点
    pub autowired: bool,
}

impl ComponentArgs {
    /// 从 `#[component(...)]` 属性解析参数
    pub fn from_attributes(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut args = ComponentArgs::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("component")) {
            if matches!(attr.meta, syn::Meta::Path(_)) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("implements") {
                    let content;
                    parenthesized!(content in meta.input);
                    let interfaces = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.implements.extend(interfaces);
                    Ok(())
                } else if meta.path.is_ident("autowired") {
                    args.autowired = true;
                    Ok(())
                } else {
                    Err(meta.error("#[component] 只支持 implements(...) 与 autowired 参数"))
                }
            })?;
        }

        Ok(args)
    }
}

/// 实现 #[derive(Component)] 宏
pub fn derive_component_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(&input.generics, "组件不支持泛型参数"));
    }
    if !matches!(input.data, Data::Struct(_)) {
        return Err(Error::new_spanned(struct_name, "#[derive(Component)] 只能用于结构体"));
    }

    let args = ComponentArgs::from_attributes(&input.attrs)?;

    for interface in &args.implements {
        if !crate::utils::is_trait_object(interface) {
            return Err(Error::new_spanned(
                interface,
                "implements(...) 需要 trait 对象类型, 例如 dyn Clock",
            ));
        }
    }

    let casts = args.implements.iter().map(|interface| {
        quote! {
            .implements(::infrastructure_common::TypeInfo::of::<#interface>(), |bean| {
                ::di_abstractions::downcast_component::<Self>(bean)
                    .map(|component| ::di_abstractions::interface_bean::<#interface>(component))
            })
        }
    });

    let autowire_points = args.autowired.then(|| {
        quote! {
            let definition = <Self as ::di_abstractions::AutowirePoints>::autowire_points(definition);
        }
    });

    let registration_fn = registration_ident("component", struct_name);

    Ok(quote! {
        impl ::di_abstractions::Registrable for #struct_name {
            fn type_definition() -> ::di_abstractions::TypeDefinition {
                let definition = ::di_abstractions::TypeDefinition::new(
                    ::infrastructure_common::TypeDescriptor::concrete(
                        ::infrastructure_common::TypeInfo::of::<Self>(),
                    )
                    .with_tag(::infrastructure_common::Tag::Component),
                )
                .with_constructor(|| {
                    ::std::result::Result::Ok(::di_abstractions::component_bean(
                        ::std::sync::Arc::new(<Self as ::std::default::Default>::default()),
                    ))
                })
                #(#casts)*;
                #autowire_points
                definition
            }
        }

        impl ::di_abstractions::Component for #struct_name {}

        #[ctor::ctor]
        fn #registration_fn() {
            ::di_impl::TypeInventory::submit_type::<#struct_name>();
        }
    })
}
