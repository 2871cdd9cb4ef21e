//! `define_port_error!`: declare a port error enum with snake_case constructors.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum StoreError {
//!         Missing { id: String } => "missing {id}",
//!         Closed => "closed",
//!     }
//! }
//! let err = StoreError::missing("abc");
//! ```
//!
//! Constructor parameters take `impl Into<T>` so call sites can pass `&str`.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@fields $variant [] [] $( $field : $ty, )*);
    };

    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @fields
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Missing { id: String } => "missing {id}",
            Waited { waited_ms: u64 } => "waited {waited_ms} ms",
            Mixed { id: String, attempts: u32 } => "{id} after {attempts} attempts",
            Closed => "closed",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(SamplePortError::missing("abc").to_string(), "missing abc");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(
            SamplePortError::waited(1000_u64),
            SamplePortError::Waited { waited_ms: 1000 }
        );
    }

    #[test]
    fn mixed_fields_render_in_order() {
        assert_eq!(
            SamplePortError::mixed("abc", 3_u32).to_string(),
            "abc after 3 attempts"
        );
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::closed(), SamplePortError::Closed);
    }
}
