use once_cell::sync::Lazy;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use regex::Regex;
use syn::{
    punctuated::Punctuated, Attribute, Data, DeriveInput, Error, Expr, Field, Lit, LitBool,
    LitStr, Meta, MetaNameValue, Result, Token,
};

use crate::{metric::Metric, with_attrs::WithAttrs};

static METRIC_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_:.][a-zA-Z0-9_:.]*$").unwrap());

const SUPPORTED_SEPARATORS: &[&str] = &[".", "_", ":"];

enum MetricField<'a> {
    Included(Metric<'a>),
    Skipped(&'a Field),
}

/// Either a compile-time fixed scope (`#[metrics(scope = "engine.payload_builder")]`) or a
/// scope supplied by the caller at construction time (`#[metrics(dynamic = true)]`).
enum MetricsScope {
    Static(LitStr),
    Dynamic,
}

struct MetricsAttr {
    scope: MetricsScope,
    separator: Option<LitStr>,
}

impl MetricsAttr {
    const DEFAULT_SEPARATOR: &'static str = ".";

    fn separator(&self) -> String {
        match &self.separator {
            Some(sep) => sep.value(),
            None => Self::DEFAULT_SEPARATOR.to_owned(),
        }
    }
}

pub(crate) fn derive(node: &DeriveInput) -> Result<TokenStream> {
    let ty = &node.ident;
    let ident_name = ty.to_string();
    let vis = &node.vis;

    let attr = parse_metrics_attr(node)?;
    let separator = attr.separator();
    let fields = parse_metric_fields(node)?;

    let (included, skipped): (Vec<_>, Vec<_>) = fields
        .iter()
        .partition(|f| matches!(f, MetricField::Included(_)));
    let included: Vec<&Metric<'_>> = included
        .into_iter()
        .map(|f| match f {
            MetricField::Included(m) => m,
            MetricField::Skipped(_) => unreachable!(),
        })
        .collect();
    let skipped_fields: Vec<&Field> = skipped
        .into_iter()
        .map(|f| match f {
            MetricField::Skipped(field) => *field,
            MetricField::Included(_) => unreachable!(),
        })
        .collect();
    let skipped_idents: Vec<_> = skipped_fields.iter().map(|f| &f.ident).collect();

    let register_and_describe = match attr.scope {
        MetricsScope::Static(scope) => {
            let scope_str = scope.value();
            let registers = included.iter().map(|m| m.register_stmt(&scope_str, &separator));
            let describes = included.iter().map(|m| m.describe_stmt(&scope_str, &separator));

            quote! {
                impl Default for #ty {
                    fn default() -> Self {
                        #ty::describe();
                        Self {
                            #(#registers)*
                            #(#skipped_idents: Default::default(),)*
                        }
                    }
                }

                impl #ty {
                    /// Describes all metrics declared on this struct with the metrics
                    /// recorder currently installed globally.
                    #vis fn describe() {
                        #(#describes)*
                    }
                }
            }
        }
        MetricsScope::Dynamic => {
            let defaults = included.iter().map(|m| m.register_stmt_dynamic(&separator));
            let labeled_defaults =
                included.iter().map(|m| m.register_stmt_with_labels(&separator));
            let describes = included.iter().map(|m| m.describe_stmt_dynamic(&separator));

            quote! {
                impl #ty {
                    /// Create new instance of metrics with provided scope.
                    #vis fn new(scope: &str) -> Self {
                        #ty::describe(scope);
                        let _ = scope;
                        Self {
                            #(#defaults)*
                            #(#skipped_idents: Default::default(),)*
                        }
                    }

                    /// Create new instance of metrics with provided labels, scoped dynamically.
                    #vis fn new_with_labels(scope: &str, labels: impl metrics::IntoLabels + Clone) -> Self {
                        Self {
                            #(#labeled_defaults)*
                            #(#skipped_idents: Default::default(),)*
                        }
                    }

                    /// Describes all metrics declared on this struct under `scope`.
                    #vis fn describe(scope: &str) {
                        #(#describes)*
                    }
                }
            }
        }
    };

    Ok(quote! {
        #register_and_describe

        impl std::fmt::Debug for #ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(#ident_name).finish()
            }
        }
    })
}

fn parse_metrics_attr(node: &DeriveInput) -> Result<MetricsAttr> {
    let metrics_attr = parse_single_required_attr(node, "metrics")?;

    let parsed =
        metrics_attr.parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)?;

    let (mut scope, mut separator, mut dynamic) = (None, None, None);

    for kv in parsed {
        let lit = match kv.value {
            Expr::Lit(ref expr) => &expr.lit,
            _ => continue,
        };

        if kv.path.is_ident("scope") {
            if scope.is_some() {
                return Err(Error::new_spanned(kv, "duplicate `scope` value"));
            }
            let scope_lit = parse_str_lit(lit)?;
            validate_metric_name(&scope_lit)?;
            scope = Some(scope_lit);
        } else if kv.path.is_ident("separator") {
            if separator.is_some() {
                return Err(Error::new_spanned(kv, "duplicate `separator` value"));
            }
            let separator_lit = parse_str_lit(lit)?;
            if !SUPPORTED_SEPARATORS.contains(&&*separator_lit.value()) {
                return Err(Error::new_spanned(
                    kv,
                    format!(
                        "unsupported `separator` value, supported: {}",
                        SUPPORTED_SEPARATORS
                            .iter()
                            .map(|sep| format!("`{sep}`"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                ));
            }
            separator = Some(separator_lit);
        } else if kv.path.is_ident("dynamic") {
            if dynamic.is_some() {
                return Err(Error::new_spanned(kv, "duplicate `dynamic` flag"));
            }
            dynamic = Some(parse_bool_lit(lit)?.value);
        } else {
            return Err(Error::new_spanned(kv, "unsupported attribute entry"));
        }
    }

    let scope = match (scope, dynamic) {
        (Some(scope), None) | (Some(scope), Some(false)) => MetricsScope::Static(scope),
        (None, Some(true)) => MetricsScope::Dynamic,
        (Some(_), Some(_)) => {
            return Err(Error::new_spanned(node, "`scope = ..` conflicts with `dynamic = true`"))
        }
        _ => {
            return Err(Error::new_spanned(node, "either `scope = ..` or `dynamic = true` must be set"))
        }
    };

    Ok(MetricsAttr { scope, separator })
}

fn parse_metric_fields(node: &DeriveInput) -> Result<Vec<MetricField<'_>>> {
    let Data::Struct(ref data) = node.data else {
        return Err(Error::new_spanned(node, "only structs are supported"));
    };

    let mut metrics = Vec::with_capacity(data.fields.len());

    for field in &data.fields {
        let (mut describe, mut rename, mut skip) = (None, None, false);

        if let Some(metric_attr) = parse_single_attr(field, "metric")? {
            let parsed =
                metric_attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;

            for meta in parsed {
                match meta {
                    Meta::Path(path) if path.is_ident("skip") => skip = true,
                    Meta::NameValue(kv) => {
                        let lit = match kv.value {
                            Expr::Lit(ref expr) => &expr.lit,
                            _ => continue,
                        };

                        if kv.path.is_ident("describe") {
                            if describe.is_some() {
                                return Err(Error::new_spanned(kv, "duplicate `describe` value"));
                            }
                            describe = Some(parse_str_lit(lit)?);
                        } else if kv.path.is_ident("rename") {
                            if rename.is_some() {
                                return Err(Error::new_spanned(kv, "duplicate `rename` value"));
                            }
                            let rename_lit = parse_str_lit(lit)?;
                            validate_metric_name(&rename_lit)?;
                            rename = Some(rename_lit);
                        } else {
                            return Err(Error::new_spanned(kv, "unsupported attribute entry"));
                        }
                    }
                    _ => return Err(Error::new_spanned(meta, "unsupported attribute entry")),
                }
            }
        }

        if skip {
            metrics.push(MetricField::Skipped(field));
            continue;
        }

        let description = match describe {
            Some(lit_str) => lit_str.value(),
            None => match parse_docs_to_string(field)? {
                Some(docs_str) => docs_str,
                None => {
                    return Err(Error::new_spanned(
                        field,
                        "either a doc comment or `describe = ..` must be set",
                    ))
                }
            },
        };

        metrics.push(MetricField::Included(Metric::new(field, description, rename)));
    }

    Ok(metrics)
}

fn validate_metric_name(name: &LitStr) -> Result<()> {
    if METRIC_NAME_RE.is_match(&name.value()) {
        Ok(())
    } else {
        Err(Error::new_spanned(name, format!("value must match regex {}", METRIC_NAME_RE.as_str())))
    }
}

fn parse_single_attr<'a, T: WithAttrs + ToTokens>(
    token: &'a T,
    ident: &str,
) -> Result<Option<&'a Attribute>> {
    let mut attr_iter = token.attrs().iter().filter(|a| a.path().is_ident(ident));

    if let Some(attr) = attr_iter.next() {
        if let Some(next_attr) = attr_iter.next() {
            Err(Error::new_spanned(next_attr, format!("duplicate `#[{ident}(..)]` attribute")))
        } else {
            Ok(Some(attr))
        }
    } else {
        Ok(None)
    }
}

fn parse_single_required_attr<'a, T: WithAttrs + ToTokens>(
    token: &'a T,
    ident: &str,
) -> Result<&'a Attribute> {
    if let Some(attr) = parse_single_attr(token, ident)? {
        Ok(attr)
    } else {
        Err(Error::new_spanned(token, format!("`#[{ident}(..)]` attribute must be provided")))
    }
}

fn parse_docs_to_string<T: WithAttrs>(token: &T) -> Result<Option<String>> {
    let mut doc_str = None;

    for attr in token.attrs() {
        if let syn::Meta::NameValue(ref meta) = attr.meta {
            if let Expr::Lit(ref lit) = meta.value {
                if let Lit::Str(ref doc) = lit.lit {
                    let doc_value = doc.value().trim().to_string();
                    doc_str = Some(
                        doc_str
                            .map(|prev: String| format!("{prev} {doc_value}"))
                            .unwrap_or(doc_value),
                    );
                }
            }
        }
    }

    Ok(doc_str)
}

fn parse_str_lit(lit: &Lit) -> Result<LitStr> {
    match lit {
        Lit::Str(lit_str) => Ok(lit_str.to_owned()),
        _ => Err(Error::new_spanned(lit, "value must be a string literal")),
    }
}

fn parse_bool_lit(lit: &Lit) -> Result<LitBool> {
    match lit {
        Lit::Bool(lit_bool) => Ok(lit_bool.to_owned()),
        _ => Err(Error::new_spanned(lit, "value must be a boolean literal")),
    }
}
