//! Object representation for values handed to the host.

use std::fmt;

/// Placeholder shown where an object identity would normally appear.
/// It is a literal, never a real address or id.
pub const PLACEHOLDER_ID: u32 = 42;

/// Types that can describe themselves for diagnostics.
///
/// The default rendering is `#<TypeName:42>`. The name is the Rust type's
/// last path segment with any generic arguments dropped. Implementors may
/// override [`Inspect::type_name`] when that is not what should be displayed.
pub trait Inspect {
    fn type_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        let path = full.split('<').next().unwrap_or(full);
        path.rsplit("::").next().unwrap_or(path)
    }

    fn inspect(&self) -> String {
        format!("#<{}:{}>", self.type_name(), PLACEHOLDER_ID)
    }
}

/// An otherwise empty nominal type whose only behaviour is its representation.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Example;

impl Example {
    pub fn new() -> Self {
        Self
    }
}

impl Inspect for Example {}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use super::*;

    mod inner {
        #[allow(dead_code)]
        pub struct Thing;
    }

    struct Wrapper<T>(PhantomData<T>);

    impl<T> Inspect for Wrapper<T> {}

    struct Renamed;

    impl Inspect for Renamed {
        fn type_name(&self) -> &'static str {
            "Widget"
        }
    }

    #[test]
    fn example_renders_fixed_placeholder() {
        assert_eq!(Example::new().inspect(), "#<Example:42>");
        assert_eq!(format!("{:?}", Example), "#<Example:42>");
    }

    #[test]
    fn type_name_strips_module_path() {
        assert_eq!(Example.type_name(), "Example");
    }

    #[test]
    fn generic_arguments_are_dropped_from_type_name() {
        let wrapper: Wrapper<inner::Thing> = Wrapper(PhantomData);
        assert_eq!(wrapper.type_name(), "Wrapper");
        assert_eq!(wrapper.inspect(), "#<Wrapper:42>");
        let nested: Wrapper<Wrapper<Example>> = Wrapper(PhantomData);
        assert_eq!(nested.inspect(), "#<Wrapper:42>");
    }

    #[test]
    fn overridden_type_name_is_used() {
        assert_eq!(Renamed.inspect(), "#<Widget:42>");
    }

    #[test]
    fn trait_objects_keep_concrete_name() {
        let boxed: Box<dyn Inspect> = Box::new(Example);
        assert_eq!(boxed.inspect(), "#<Example:42>");
    }
}
