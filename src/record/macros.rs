//! Declarative record definitions.

/// Declares a struct and derives its [`Record`](crate::record::Record) impl
/// from the field list. Field order is schema order; `=> "Label"` attaches a
/// human heading.
///
/// ```
/// sdui_projection::record! {
///     #[derive(Debug, Clone)]
///     pub struct Dessert {
///         pub name: String => "Dessert (100g serving)",
///         pub calories: i64,
///         pub fat: f64,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $label:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::record::Record for $name {
            fn schema() -> $crate::record::Schema {
                $crate::record::Schema::new(vec![
                    $(
                        $crate::record::FieldDef::new(
                            stringify!($field),
                            <$ty as $crate::record::FieldType>::KIND,
                        )
                        $(.with_label($label))?
                    ),*
                ])
            }

            fn fields(&self) -> Vec<$crate::record::Field> {
                vec![
                    $(
                        $crate::record::Field::new(
                            stringify!($field),
                            $crate::record::FieldType::to_value(&self.$field),
                        )
                    ),*
                ]
            }
        }
    };
}
