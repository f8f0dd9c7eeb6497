//! 普通接口宏实现

use crate::utils::registration_ident;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemTrait, Result};

/// 实现 #[interface] 宏
///
/// 只登记接口本身；实现由带 `implements(dyn Trait)` 的组件按能力提供
pub fn interface_impl(item: ItemTrait) -> Result<TokenStream> {
    let trait_ident = &item.ident;

    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(&item.generics, "接口不支持泛型参数"));
    }

    let registration_fn = registration_ident("interface", trait_ident);

    Ok(quote! {
        #item

        impl ::di_abstractions::Registrable for dyn #trait_ident {
            fn type_definition() -> ::di_abstractions::TypeDefinition {
                ::di_abstractions::TypeDefinition::new(
                    ::infrastructure_common::TypeDescriptor::interface(
                        ::infrastructure_common::TypeInfo::of::<dyn #trait_ident>(),
                    ),
                )
            }
        }

        impl ::di_abstractions::Interface for dyn #trait_ident {}

        #[ctor::ctor]
        fn #registration_fn() {
            ::di_impl::TypeInventory::submit_type::<dyn #trait_ident>();
        }
    })
}
