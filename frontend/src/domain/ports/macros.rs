//! Defines helper macros for generating domain port error enums.
//!
//! Each variant gets a snake_case constructor whose parameters accept
//! `impl Into<T>`, so adapters can write `Error::decode(err.to_string())` or
//! `Error::transport(503_u16, "Service Unavailable")` directly.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
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
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExampleSourceError {
            Unreachable { message: String } => "unreachable: {message}",
            Rejected { status: u16 } => "rejected with {status}",
            Described { status: u16, status_text: String } => "{status} {status_text}",
            Empty => "empty",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExampleSourceError::unreachable("connection refused");
        assert_eq!(err.to_string(), "unreachable: connection refused");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExampleSourceError::rejected(404_u16);
        assert_eq!(err, ExampleSourceError::Rejected { status: 404 });
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExampleSourceError::described(503_u16, "Service Unavailable");
        assert_eq!(err.to_string(), "503 Service Unavailable");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ExampleSourceError::empty().to_string(), "empty");
    }
}
