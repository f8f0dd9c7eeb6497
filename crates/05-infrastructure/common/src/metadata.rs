//! 元数据定义
//!
//! 提供类型描述符、声明标记以及字段、方法签名等静态元数据。
//! 描述符在编译期（宏）或手动注册时生成，生成后不可变。

use serde::Serialize;

/// 类型信息
///
/// `name` 为容器内的类型标识: 具体类型使用完整的类型名（含泛型参数），
/// trait 对象擦除为 trait 路径（去掉 `dyn`、泛型参数与附加约束）；
/// `full_name` 保留原始类型名便于诊断。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeInfo {
    /// 类型标识
    pub name: String,
    /// 原始类型名称
    pub full_name: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: erase_type_name(full_name),
            full_name: full_name.to_string(),
        }
    }

    /// 从类型名称创建类型信息（用于手动注册）
    pub fn named(name: impl Into<String>) -> Self {
        let full_name = name.into();
        Self {
            name: erase_type_name(&full_name),
            full_name,
        }
    }

    /// 获取简短的类型名称（不包含模块路径，保留泛型参数）
    pub fn short_name(&self) -> &str {
        let path_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..path_end].rfind("::").map_or(0, |index| index + 2);
        &self.name[start..]
    }

    /// 是否位于指定命名空间下
    ///
    /// 按路径段匹配: `demo` 匹配 `demo::Product`，但不匹配 `demos::Product`。
    /// 空命名空间匹配所有类型。
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        let namespace = namespace.trim_end_matches("::");
        if namespace.is_empty() || self.name == namespace {
            return true;
        }
        self.name
            .strip_prefix(namespace)
            .map_or(false, |rest| rest.starts_with("::"))
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// 计算类型标识
///
/// 只有 trait 对象会擦除 `dyn` 前缀、泛型参数与附加约束，
/// 因此 `dyn CrudRepository<i32, Product>` 与 `dyn CrudRepository<i64, User>` 共用一个标识；
/// 具体类型的不同泛型实例各自独立。
pub fn erase_type_name(type_name: &str) -> String {
    let trimmed = type_name.trim();
    let Some(trait_path) = trimmed.strip_prefix("dyn ") else {
        return trimmed.to_string();
    };
    let end = trait_path
        .find(|c: char| c == '<' || c.is_whitespace())
        .unwrap_or(trait_path.len());
    trait_path[..end].to_string()
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// 具体类型
    Concrete,
    /// 接口（trait）
    Interface,
}

/// 声明标记
///
/// 容器只识别以下标记，`Other` 原样保留但不参与任何处理。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    /// 标记具体类型需要实例化为单例
    Component,
    /// 标记根仓储接口
    Repository,
    /// 标记 setter 为注入点
    Autowire,
    /// 实体对应的表名
    Table(String),
    /// 字段对应的列名
    Column(String),
    /// 主键字段
    Id,
    /// 未识别的标记
    Other(String),
}

/// 字段描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// 字段名称
    pub name: String,
    /// 字段标记
    pub tags: Vec<Tag>,
}

impl FieldDescriptor {
    /// 创建新的字段描述符
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    /// 添加标记
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// 设置列名
    pub fn column(self, column: impl Into<String>) -> Self {
        self.with_tag(Tag::Column(column.into()))
    }

    /// 标记为主键
    pub fn id(self) -> Self {
        self.with_tag(Tag::Id)
    }

    /// 获取列名
    pub fn column_name(&self) -> Option<&str> {
        self.tags.iter().find_map(|tag| match tag {
            Tag::Column(column) => Some(column.as_str()),
            _ => None,
        })
    }

    /// 是否为主键
    pub fn is_id(&self) -> bool {
        self.tags.contains(&Tag::Id)
    }
}

/// 方法签名描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    /// 方法名称
    pub name: String,
    /// 参数类型列表
    pub parameters: Vec<TypeInfo>,
    /// 方法标记
    pub tags: Vec<Tag>,
}

impl MethodDescriptor {
    /// 创建新的方法描述符
    pub fn new(name: impl Into<String>, parameters: Vec<TypeInfo>) -> Self {
        Self {
            name: name.into(),
            parameters,
            tags: Vec::new(),
        }
    }

    /// 添加标记
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// 是否为注入点
    pub fn is_autowire(&self) -> bool {
        self.tags.contains(&Tag::Autowire)
    }
}

/// 类型描述符
///
/// 类型目录返回的不可变类型身份信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// 类型信息
    pub info: TypeInfo,
    /// 类型种类
    pub kind: TypeKind,
    /// 类型标记
    pub tags: Vec<Tag>,
    /// 声明的字段
    pub fields: Vec<FieldDescriptor>,
    /// 声明的方法签名
    pub methods: Vec<MethodDescriptor>,
    /// 具体类型实现的接口，或接口继承的父接口
    pub interfaces: Vec<TypeInfo>,
    /// 父仓储接口的泛型参数（依次为 Id 类型、实体类型）
    pub type_arguments: Vec<TypeInfo>,
}

impl TypeDescriptor {
    fn new(info: TypeInfo, kind: TypeKind) -> Self {
        Self {
            info,
            kind,
            tags: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            interfaces: Vec::new(),
            type_arguments: Vec::new(),
        }
    }

    /// 创建具体类型描述符
    pub fn concrete(info: TypeInfo) -> Self {
        Self::new(info, TypeKind::Concrete)
    }

    /// 创建接口描述符
    pub fn interface(info: TypeInfo) -> Self {
        Self::new(info, TypeKind::Interface)
    }

    /// 添加标记
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// 添加字段
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// 添加方法签名
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 添加实现或继承的接口
    pub fn with_interface(mut self, interface: TypeInfo) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// 设置泛型参数
    pub fn with_type_arguments(mut self, arguments: Vec<TypeInfo>) -> Self {
        self.type_arguments = arguments;
        self
    }

    /// 类型标识
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// 是否为接口
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 是否带有组件标记
    pub fn is_component(&self) -> bool {
        self.tags.contains(&Tag::Component)
    }

    /// 是否直接带有仓储标记
    pub fn is_repository(&self) -> bool {
        self.tags.contains(&Tag::Repository)
    }

    /// 表名
    pub fn table_name(&self) -> Option<&str> {
        self.tags.iter().find_map(|tag| match tag {
            Tag::Table(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// 是否直接实现或继承指定接口
    pub fn declares_interface(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|info| info.name == interface)
    }

    /// 注入点方法
    pub fn autowire_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|method| method.is_autowire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Marker<T> {}
    struct Sample;

    #[test]
    fn test_erase_type_name() {
        assert_eq!(erase_type_name("dyn demo::Repo<i32, demo::Product>"), "demo::Repo");
        assert_eq!(erase_type_name("dyn demo::Repo + core::marker::Send"), "demo::Repo");
        assert_eq!(erase_type_name("i32"), "i32");
        assert_eq!(erase_type_name("demo::Holder<u8>"), "demo::Holder<u8>");
    }

    struct Holder<T>(T);

    #[test]
    fn test_generic_instances_have_distinct_identity() {
        let small = TypeInfo::of::<Holder<u8>>();
        let wide = TypeInfo::of::<Holder<u16>>();
        assert_ne!(small.name, wide.name);
        assert_eq!(small.short_name(), "Holder<u8>");
        assert!(small.is_in_namespace(small.name.split("::").next().unwrap()));
    }

    #[test]
    fn test_type_info_identity_ignores_generics() {
        let a = TypeInfo::of::<dyn Marker<i32>>();
        let b = TypeInfo::of::<dyn Marker<String>>();
        assert_eq!(a.name, b.name);
        assert_ne!(a.full_name, b.full_name);
        assert_eq!(a.short_name(), "Marker");
    }

    #[test]
    fn test_namespace_matching() {
        let info = TypeInfo::of::<Sample>();
        let crate_name = info.name.split("::").next().unwrap().to_string();

        assert!(info.is_in_namespace(""));
        assert!(info.is_in_namespace(&crate_name));
        assert!(info.is_in_namespace(&format!("{}::", crate_name)));
        assert!(!info.is_in_namespace(&format!("{}s", crate_name)));
    }

    #[test]
    fn test_field_descriptor_tags() {
        let field = FieldDescriptor::new("id")
            .column("ID")
            .id()
            .with_tag(Tag::Other("Transient".into()));

        assert_eq!(field.column_name(), Some("ID"));
        assert!(field.is_id());
    }
}
