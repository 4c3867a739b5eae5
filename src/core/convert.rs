//! Argument conversion: type-erased values and the converter registry.
//!
//! A converter turns one raw string token into a typed value. Exactly one
//! converter may be registered per value type; the registry is populated
//! before dispatch begins and read-only afterwards.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::CommandContext;

/// A type-erased argument value produced by a converter.
///
/// Values are cheaply clonable and shared between the parser result, the
/// handler invocation and any event listeners holding on to a context.
///
/// # Examples
///
/// ```
/// use chat_commands::core::ArgValue;
///
/// let value = ArgValue::new(42i32);
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
/// assert!(value.is::<i32>());
/// assert!(!value.is::<String>());
/// ```
#[derive(Clone)]
pub struct ArgValue(Arc<dyn Any + Send + Sync>);

impl ArgValue {
    /// Wrap a typed value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the value as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Check whether the value is of a concrete type.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// The [`TypeId`] of the wrapped value.
    pub fn value_type(&self) -> TypeId {
        (*self.0).type_id()
    }
}

impl std::fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ArgValue").field(&self.value_type()).finish()
    }
}

/// Converts a raw string token into a typed [`ArgValue`].
///
/// One implementation exists per value type. `try_convert` returns `None`
/// when the input cannot be converted; the parser turns that into a
/// structured failure naming [`type_label`](ArgumentConverter::type_label).
pub trait ArgumentConverter: Send + Sync {
    /// The type this converter produces.
    fn converted_type(&self) -> TypeId;

    /// Human-readable label for the produced type, used in error messages
    /// (e.g. `"number [0 to 255]"`).
    fn type_label(&self) -> &str;

    /// Attempt to convert one token into a typed value.
    fn try_convert(&self, ctx: &CommandContext, input: &str) -> Option<ArgValue>;
}

/// Registry mapping value types to their converters.
///
/// First registration wins: registering a second converter for the same
/// type logs a warning and keeps the existing one, so built-ins registered
/// ahead of user converters cannot be silently replaced.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Arc<dyn ArgumentConverter>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in converters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::converters::register_builtin_converters(&mut registry);
        registry
    }

    /// Register a converter for its declared type.
    ///
    /// Returns `true` if the converter was registered, `false` if one
    /// already existed for the type (the first registration is kept).
    pub fn register<C: ArgumentConverter + 'static>(&mut self, converter: C) -> bool {
        self.register_arc(Arc::new(converter))
    }

    /// Register an already shared converter.
    pub fn register_arc(&mut self, converter: Arc<dyn ArgumentConverter>) -> bool {
        let ty = converter.converted_type();
        if self.converters.contains_key(&ty) {
            warn!(
                "Cannot register converter '{}' as a converter for its type already exists",
                converter.type_label()
            );
            return false;
        }

        debug!("Registered argument converter '{}'", converter.type_label());
        self.converters.insert(ty, converter);
        true
    }

    /// Register every converter in a collection.
    pub fn register_from(&mut self, converters: impl IntoIterator<Item = Arc<dyn ArgumentConverter>>) {
        for converter in converters {
            self.register_arc(converter);
        }
    }

    /// Check whether a converter exists for a type.
    pub fn has<T: Any>(&self) -> bool {
        self.has_type(TypeId::of::<T>())
    }

    /// Check whether a converter exists for a type id.
    pub fn has_type(&self, ty: TypeId) -> bool {
        self.converters.contains_key(&ty)
    }

    /// Get the converter for a type, if any.
    pub fn get<T: Any>(&self) -> Option<&Arc<dyn ArgumentConverter>> {
        self.get_type(TypeId::of::<T>())
    }

    /// Get the converter for a type id, if any.
    pub fn get_type(&self, ty: TypeId) -> Option<&Arc<dyn ArgumentConverter>> {
        self.converters.get(&ty)
    }

    /// The number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

/// Ordered, typed argument values handed to a command handler.
///
/// Values appear in declaration order, one per declared argument; a variadic
/// argument contributes a single list value.
///
/// # Examples
///
/// ```ignore
/// fn handler(ctx: &CommandContext, args: &ParsedArgs) {
///     let target: &String = args.get(0).unwrap();
///     let minutes: &u32 = args.get(1).unwrap();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParsedArgs {
    values: Vec<ArgValue>,
}

impl ParsedArgs {
    /// Create an empty argument list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap parser output.
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    /// The number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the value at `index` as a concrete type.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref()
    }

    /// Borrow the value at `index` as a variadic list.
    pub fn list(&self, index: usize) -> Option<&[ArgValue]> {
        self.values
            .get(index)?
            .downcast_ref::<Vec<ArgValue>>()
            .map(|v| v.as_slice())
    }

    /// Borrow the value at `index` as a variadic list of a concrete type.
    ///
    /// Returns `None` if the value is not a list or any element has a
    /// different type.
    pub fn list_of<T: Any>(&self, index: usize) -> Option<Vec<&T>> {
        self.list(index)?
            .iter()
            .map(|v| v.downcast_ref::<T>())
            .collect()
    }

    /// Get the raw value at `index`.
    pub fn value(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    /// Iterate over the raw values.
    pub fn iter(&self) -> impl Iterator<Item = &ArgValue> {
        self.values.iter()
    }
}
