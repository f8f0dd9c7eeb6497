//! 宏工具函数

use proc_macro2::Span;
use syn::{Attribute, Field, GenericArgument, Ident, LitStr, PathArguments, Result, Type};

/// 生成程序启动时提交类型定义的函数名
pub fn registration_ident(kind: &str, type_name: &Ident) -> Ident {
    let name = format!(
        "__lorn_di_register_{}_{}",
        kind,
        to_snake_case(&type_name.to_string())
    );
    Ident::new(&name, Span::call_site())
}

/// 检查是否带有指定属性
pub fn has_attribute(attrs: &[Attribute], attr_name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(attr_name))
}

/// 检查字段是否有特定属性
pub fn field_has_attribute(field: &Field, attr_name: &str) -> bool {
    has_attribute(&field.attrs, attr_name)
}

/// 从属性中提取 `name = "..."` 的值
///
/// 属性不存在时返回 `Ok(None)`；属性存在但没有参数时返回 `Ok(Some(None))`
pub fn extract_name_from_attr(attrs: &[Attribute], attr_name: &str) -> Result<Option<Option<String>>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident(attr_name)) else {
        return Ok(None);
    };

    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(Some(None));
    }

    let mut name = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let value: LitStr = meta.value()?.parse()?;
            name = Some(value.value());
            Ok(())
        } else {
            Err(meta.error(format!("#[{}] 只支持 name = \"...\" 参数", attr_name)))
        }
    })?;
    Ok(Some(name))
}

/// 从 `Arc<T>` 中提取 `T`
pub fn extract_arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// 是否为 trait 对象类型
pub fn is_trait_object(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) => true,
        Type::Paren(paren) => is_trait_object(&paren.elem),
        Type::Group(group) => is_trait_object(&group.elem),
        _ => false,
    }
}

/// 将驼峰命名转换为蛇形命名
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            // 检查前一个字符是否为小写，或者下一个字符是否为小写
            let prev_is_lower = chars.get(i - 1).map_or(false, |c| c.is_lowercase());
            let next_is_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());

            if prev_is_lower || next_is_lower {
                result.push('_');
            }
        }
        result.push(ch.to_lowercase().next().unwrap_or(ch));
    }

    result
}

/// 将蛇形命名转换为驼峰命名
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for ch in s.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(ch.to_uppercase().next().unwrap_or(ch));
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("ProductService"), "product_service");
        assert_eq!(to_snake_case("HTTPClient"), "http_client");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("find_by_price_greater"), "findByPriceGreater");
        assert_eq!(
            to_camel_case("find_by_name_not_equal_or_price_less"),
            "findByNameNotEqualOrPriceLess"
        );
        assert_eq!(to_camel_case("list_all"), "listAll");
        assert_eq!(to_camel_case("alreadyCamel"), "alreadyCamel");
    }

    #[test]
    fn test_extract_arc_inner() {
        let ty: Type = parse_quote!(std::sync::Arc<dyn Clock>);
        let inner = extract_arc_inner(&ty).unwrap();
        assert!(is_trait_object(inner));

        let ty: Type = parse_quote!(Arc<Product>);
        assert!(!is_trait_object(extract_arc_inner(&ty).unwrap()));

        let ty: Type = parse_quote!(Box<dyn Clock>);
        assert!(extract_arc_inner(&ty).is_none());
    }

    #[test]
    fn test_extract_name_from_attr() {
        let field: Field = parse_quote! {
            #[column(name = "PRICE")]
            price: f64
        };
        assert_eq!(
            extract_name_from_attr(&field.attrs, "column").unwrap(),
            Some(Some("PRICE".to_string()))
        );
        assert!(field_has_attribute(&field, "column"));
        assert_eq!(extract_name_from_attr(&field.attrs, "id").unwrap(), None);

        let field: Field = parse_quote! {
            #[column]
            price: f64
        };
        assert_eq!(
            extract_name_from_attr(&field.attrs, "column").unwrap(),
            Some(None)
        );
    }
}
