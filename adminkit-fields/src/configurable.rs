//! Accessor generation for configuration structs.
//!
//! `configurable!` turns a list of property declarations into a getter and a
//! chained setter per property:
//!
//! ```rust,ignore
//! configurable!(FieldBase {
//!     /// Display label.
//!     ref label / set_label: String => label;
//!     copy list / set_list: bool => list;
//! });
//! ```
//!
//! `ref` getters borrow, `copy` getters return by value. The path after `=>`
//! may walk into an embedded struct (`base.label`). Setters take
//! `impl Into<T>` and return `&mut Self`.

macro_rules! configurable {
    (@getter ref $(#[$meta:meta])* $getter:ident, $ty:ty, $($path:ident).+) => {
        $(#[$meta])*
        pub fn $getter(&self) -> &$ty {
            &self.$($path).+
        }
    };
    (@getter copy $(#[$meta:meta])* $getter:ident, $ty:ty, $($path:ident).+) => {
        $(#[$meta])*
        pub fn $getter(&self) -> $ty {
            self.$($path).+
        }
    };
    ($owner:ty {
        $(
            $(#[$meta:meta])*
            $mode:ident $getter:ident / $setter:ident : $ty:ty => $($path:ident).+ ;
        )*
    }) => {
        impl $owner {
            $(
                configurable!(@getter $mode $(#[$meta])* $getter, $ty, $($path).+);

                #[doc = concat!("Set `", stringify!($getter), "`, returning `self` for chaining.")]
                pub fn $setter(&mut self, value: impl Into<$ty>) -> &mut Self {
                    self.$($path).+ = value.into();
                    self
                }
            )*
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Default)]
    struct Inner {
        title: String,
    }

    #[derive(Default)]
    struct Sample {
        inner: Inner,
        enabled: bool,
    }

    configurable!(Sample {
        ref title / set_title: String => inner.title;
        copy enabled / set_enabled: bool => enabled;
    });

    #[test]
    fn setter_then_getter_returns_value() {
        let mut s = Sample::default();
        s.set_title("hello").set_enabled(true);
        assert_eq!(s.title(), "hello");
        assert!(s.enabled());
    }

    #[test]
    fn setter_overwrites() {
        let mut s = Sample::default();
        s.set_title("a");
        s.set_title(String::from("b"));
        assert_eq!(s.title(), "b");
    }
}
