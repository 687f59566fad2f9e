//! Helper macro for declaring port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
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
    define_port_error! {
        pub enum LedgerProbeError {
            Offline => "ledger offline",
            Rejected { message: String } => "ledger rejected entry: {message}",
            Status { status: u16, message: String } => "ledger returned {status}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_argument_free_constructors() {
        assert_eq!(LedgerProbeError::offline(), LedgerProbeError::Offline);
        assert_eq!(LedgerProbeError::offline().to_string(), "ledger offline");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = LedgerProbeError::rejected("duplicate badge");
        assert_eq!(err.to_string(), "ledger rejected entry: duplicate badge");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = LedgerProbeError::status(409_u16, "conflict");
        assert_eq!(err.to_string(), "ledger returned 409: conflict");
    }
}
