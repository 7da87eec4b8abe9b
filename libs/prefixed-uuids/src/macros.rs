//! Macros for declaring entity tables.

/// Declares a module of entity constants bound to their prefixes.
///
/// This generates a module containing:
/// - One `Entity` constant per entry
/// - A `prefixes()` function returning the `PrefixInfo` list for
///   [`Registry::new`](crate::Registry::new)
///
/// # Example
///
/// ```ignore
/// define_entities! {
///     pub mod entities {
///         USER = 1 => "user",
///         POST = 2 => "post",
///     }
/// }
///
/// let registry = Registry::new(entities::prefixes())?;
/// let token = registry.serialize(entities::USER, id);
/// ```
#[macro_export]
macro_rules! define_entities {
    (
        $vis:vis mod $module:ident {
            $( $name:ident = $value:literal => $prefix:literal ),+ $(,)?
        }
    ) => {
        $vis mod $module {
            $(
                #[allow(dead_code)]
                pub const $name: $crate::Entity = $crate::Entity::new($value);
            )+

            /// Prefix registrations for every entity in this module.
            #[allow(dead_code)]
            pub fn prefixes() -> ::std::vec::Vec<$crate::PrefixInfo> {
                ::std::vec![$( $crate::PrefixInfo::new($name, $prefix) ),+]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::Registry;

    crate::define_entities! {
        mod shop {
            CUSTOMER = 1 => "cus",
            ORDER = 2 => "ord",
            LINE_ITEM = 3 => "li",
        }
    }

    #[test]
    fn test_define_entities_constants() {
        assert_eq!(shop::CUSTOMER.value(), 1);
        assert_eq!(shop::LINE_ITEM.value(), 3);
    }

    #[test]
    fn test_define_entities_feeds_registry() {
        let registry = Registry::new(shop::prefixes()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.prefix_of(shop::ORDER), Some("ord"));
        assert_eq!(registry.entity_of("li"), Some(shop::LINE_ITEM));
    }

    #[test]
    fn test_all_prefixes_unique() {
        let prefixes = shop::prefixes();
        let unique: std::collections::HashSet<_> = prefixes.iter().map(|p| &p.prefix).collect();
        assert_eq!(prefixes.len(), unique.len(), "Duplicate prefixes found!");
    }
}
