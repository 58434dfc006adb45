/// Declare a provider struct.
///
/// Plain fields are leaf dependencies handed out as clones. A `..base: Base {}`
/// block delegates the listed types to the nested provider `Base`, which lets
/// a config-only provider be embedded into the full one.
#[macro_export]
macro_rules! provider {
    (
        $(#[$meta:meta])*
        $vis:vis $ident:ident {
            $( $field:ident: $ty:ty, )*
            $( .. $base_field:ident: $base:ty { $( $base_ty:ty ),* $(,)? } )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $ident {
            _cache: $crate::TypeMap,
            $( $field: $ty, )*
            $( $base_field: $base, )*
        }

        impl $crate::Provider for $ident {
            fn cache(&mut self) -> &mut $crate::TypeMap {
                &mut self._cache
            }
        }

        $(
            impl $crate::Build<$ident> for $ty {
                fn build(provider: &mut $ident) -> Self {
                    ::core::clone::Clone::clone(&provider.$field)
                }
            }
        )*

        $($(
            impl $crate::Build<$ident> for $base_ty {
                fn build(provider: &mut $ident) -> Self {
                    $crate::Provides::provide(&mut provider.$base_field)
                }
            }
        )*)*
    };
}
