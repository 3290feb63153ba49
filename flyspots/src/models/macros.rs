/// Declares a `u64` identifier newtype for a stored record.
///
/// The type serializes as a bare number, prints as one, and converts to and
/// from `u64`. Doc attributes written before the name land on the struct.
/// IDs start at 1; `checked_next` returns `None` once `u64::MAX` is reached.
///
/// ```
/// flyspots::define_id_type! {
///     /// Identifier of a logged flight.
///     FlightId
/// }
///
/// let id = FlightId::new(41);
/// assert_eq!(id.checked_next(), Some(FlightId(42)));
/// assert_eq!(FlightId(u64::MAX).checked_next(), None);
/// assert_eq!(serde_json::to_string(&id).unwrap(), "41");
/// ```
#[macro_export]
macro_rules! define_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(value: u64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> u64 {
                self.0
            }

            /// The ID after this one, or `None` when the ID space is used up.
            pub fn checked_next(&self) -> Option<Self> {
                self.0.checked_add(1).map($name)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::convert::From<u64> for $name {
            fn from(value: u64) -> Self {
                $name(value)
            }
        }

        impl ::std::convert::From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}
