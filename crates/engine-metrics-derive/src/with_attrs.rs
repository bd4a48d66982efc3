use syn::{Attribute, DeriveInput, Field};

/// Accessor for the `attrs` field, shared between struct-level and field-level nodes.
pub(crate) trait WithAttrs {
    fn attrs(&self) -> &[Attribute];
}

impl WithAttrs for DeriveInput {
    fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }
}

impl WithAttrs for Field {
    fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }
}
