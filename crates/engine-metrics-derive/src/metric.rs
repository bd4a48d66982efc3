use proc_macro2::TokenStream;
use quote::{format_ident, quote, ToTokens};
use syn::{Field, LitStr, Type};

/// A single metric field inside a `#[derive(Metrics)]` struct.
pub(crate) struct Metric<'a> {
    field: &'a Field,
    description: String,
    rename: Option<LitStr>,
}

impl<'a> Metric<'a> {
    pub(crate) fn new(field: &'a Field, description: String, rename: Option<LitStr>) -> Self {
        Self { field, description, rename }
    }

    /// The wire name of the metric: the rename if given, otherwise the field identifier.
    pub(crate) fn name(&self) -> String {
        match &self.rename {
            Some(rename) => rename.value(),
            None => self.field.ident.as_ref().expect("named field").to_string(),
        }
    }

    fn full_name(&self, scope: &str, separator: &str) -> String {
        format!("{scope}{separator}{}", self.name())
    }

    fn ty(&self) -> &Type {
        &self.field.ty
    }

    fn kind(&self) -> &'static str {
        let ty_str = self.ty().to_token_stream().to_string();
        if ty_str.contains("Counter") {
            "counter"
        } else if ty_str.contains("Histogram") {
            "histogram"
        } else {
            "gauge"
        }
    }

    /// `field: metrics::counter!(full_name)` (or gauge/histogram equivalent), for the
    /// static-scope `Default` impl.
    pub(crate) fn register_stmt(&self, scope: &str, separator: &str) -> TokenStream {
        let field_name = self.field.ident.as_ref().expect("named field");
        let full_name = self.full_name(scope, separator);
        let register = format_ident!("{}", self.kind());
        quote! {
            #field_name: metrics::#register!(#full_name),
        }
    }

    /// `field: metrics::counter!(format!("{scope}{sep}{name}"))`, for the dynamic-scope
    /// `new` constructor, where `scope` is a runtime parameter named `scope`.
    pub(crate) fn register_stmt_dynamic(&self, separator: &str) -> TokenStream {
        let field_name = self.field.ident.as_ref().expect("named field");
        let name = self.name();
        let register = format_ident!("{}", self.kind());
        quote! {
            #field_name: metrics::#register!(format!("{scope}{sep}{name}", sep = #separator, name = #name)),
        }
    }

    /// Same as [`Self::register_stmt`] but using a caller-supplied label set, for the
    /// dynamic-scope `new_with_labels` constructor.
    pub(crate) fn register_stmt_with_labels(&self, separator: &str) -> TokenStream {
        let field_name = self.field.ident.as_ref().expect("named field");
        let name = self.name();
        let register = format_ident!("{}", self.kind());
        quote! {
            #field_name: metrics::#register!(format!("{scope}{sep}{name}", sep = #separator, name = #name), labels.clone().into_labels()),
        }
    }

    /// `metrics::describe_counter!(full_name, description)`, for static scopes.
    pub(crate) fn describe_stmt(&self, scope: &str, separator: &str) -> TokenStream {
        let full_name = self.full_name(scope, separator);
        let description = &self.description;
        let describe = format_ident!("describe_{}", self.kind());
        quote! {
            metrics::#describe!(#full_name, #description);
        }
    }

    /// Same as [`Self::describe_stmt`] but with the scope supplied at runtime.
    pub(crate) fn describe_stmt_dynamic(&self, separator: &str) -> TokenStream {
        let name = self.name();
        let description = &self.description;
        let describe = format_ident!("describe_{}", self.kind());
        quote! {
            metrics::#describe!(format!("{scope}{sep}{name}", sep = #separator, name = #name), #description);
        }
    }
}
