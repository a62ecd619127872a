use super::diagnostics::{AttributePath, Diagnostics};

/// A plan-time attribute value.
///
/// Deferred plan evaluation can leave an attribute `Unknown`; that is
/// distinct from an explicit `Null`. Required-field extraction turns
/// `Unknown` into a deferred-value diagnostic instead of a missing-value
/// one, so the engine can retry after the value resolves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attr<T> {
    /// The value is not yet known to the engine.
    Unknown,
    /// The attribute is unset.
    #[default]
    Null,
    Known(T),
}

impl<T> Attr<T> {
    #[must_use]
    pub fn known(value: T) -> Self {
        Attr::Known(value)
    }

    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Attr::Known(v),
            None => Attr::Null,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Attr::Unknown)
    }

    #[must_use]
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Attr::Known(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_known(self) -> Option<T> {
        match self {
            Attr::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Extract a required value, recording the appropriate diagnostic
    /// when it is unknown or unset.
    pub fn require(self, attribute: &str, diags: &mut Diagnostics) -> Option<T> {
        match self {
            Attr::Known(v) => Some(v),
            Attr::Unknown => {
                diags.add_attribute_error(
                    AttributePath::root(attribute),
                    format!("Value for `{attribute}` is not yet known"),
                    "The provider cannot be configured from a deferred value. \
                     Apply the configuration that produces this value first.",
                );
                None
            }
            Attr::Null => {
                diags.add_attribute_error(
                    AttributePath::root(attribute),
                    format!("Missing required attribute `{attribute}`"),
                    format!(
                        "`{attribute}` must be set in the provider configuration \
                         or through its environment fallback."
                    ),
                );
                None
            }
        }
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        Attr::from_option(value)
    }
}
