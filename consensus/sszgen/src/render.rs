use crate::{Config, Error, Extractor, SourceIndex, TypeCache, TypeItem};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};
use slog::{debug, info, warn, Logger};
use ssz_schema::{OverlayKind, Schema};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use syn::{Attribute, Fields, GenericArgument, Item, ItemEnum, ItemStruct, PathArguments, Type, UseTree};

/// Names imported by the prelude of every generated module.
const PRELUDE: &[&str] = &["Bitlist", "Bitvector", "U256"];

const HEADER: &str = "// This file was generated by sszgen. Do not edit it by hand.\n\n";

/// Renders the SSZ types of `module` as Rust source.
///
/// The output contains every `use` item and type alias of `module`, plus each rendered struct or
/// enum (with `#[ssz(..)]` attributes removed) followed by its `Encode`, `Decode` and `TreeHash`
/// implementations. Items keep their declaration order, so the output is deterministic.
///
/// Non-`pub` struct fields are not encoded and are set to `Default::default()` when decoding.
pub fn render(
    index: &SourceIndex,
    cache: &TypeCache,
    config: &Config,
    module: &str,
    log: &Logger,
) -> Result<String, Error> {
    let (module, source) = index
        .module_entry(module)
        .ok_or_else(|| Error::UnresolvedType {
            path: module.to_string(),
            name: module.to_string(),
        })?;

    let names: Vec<&str> = match &config.type_names {
        Some(names) => names
            .iter()
            .map(String::as_str)
            .filter(|name| {
                let found = matches!(
                    source.type_item(name),
                    Some(TypeItem::Struct(_)) | Some(TypeItem::Enum(_))
                );
                if !found {
                    warn!(log, "Configured type not found"; "module" => module, "type" => *name);
                }
                found
            })
            .collect(),
        None => source.exported_types(),
    };

    let mut extractor = Extractor::new(index, cache, log.clone());
    let mut schemas = HashMap::with_capacity(names.len());
    for name in &names {
        schemas.insert(*name, extractor.extract(module, name)?);
    }

    let generator = Generator::new(index, config)?;
    let mut items = vec![];

    for item in source.items() {
        match item {
            Item::Use(item) if !imports_only_prelude(&item.tree) => items.push(quote!(#item)),
            Item::Type(item) => {
                let mut item = item.clone();
                strip_ssz_attrs(&mut item.attrs);
                items.push(quote!(#item));
            }
            Item::Struct(item) => {
                if let Some(schema) = schemas.get(item.ident.to_string().as_str()) {
                    items.push(generator.container(module, item, schema)?);
                }
            }
            Item::Enum(item) => {
                if let Some(schema) = schemas.get(item.ident.to_string().as_str()) {
                    items.push(generator.union(module, item, schema)?);
                }
            }
            _ => (),
        }
    }

    let ssz = &generator.ssz;
    let prelude = quote! {
        #[allow(unused_imports)]
        use #ssz::{Bitlist, Bitvector, U256};
    };

    let mut out = String::new();
    if config.header {
        out.push_str(HEADER);
    }
    out.push_str(&prelude.to_string());
    for item in items {
        out.push_str("\n\n");
        out.push_str(&item.to_string());
    }
    out.push('\n');

    info!(log, "Rendered module"; "module" => module, "types" => names.len());

    Ok(out)
}

/// As per `render`, writing the output to `path`.
///
/// Nothing is written unless rendering succeeds.
pub fn render_to_file<P: AsRef<Path>>(
    index: &SourceIndex,
    cache: &TypeCache,
    config: &Config,
    module: &str,
    path: P,
    log: &Logger,
) -> Result<(), Error> {
    let text = render(index, cache, config, module, log)?;
    fs::write(path.as_ref(), text)?;

    debug!(log, "Wrote generated module"; "module" => module, "path" => %path.as_ref().display());

    Ok(())
}

fn imports_only_prelude(tree: &UseTree) -> bool {
    match tree {
        UseTree::Path(path) => imports_only_prelude(&path.tree),
        UseTree::Name(name) => PRELUDE.contains(&name.ident.to_string().as_str()),
        UseTree::Group(group) => group.items.iter().all(imports_only_prelude),
        UseTree::Rename(_) | UseTree::Glob(_) => false,
    }
}

fn strip_ssz_attrs(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !attr.path().is_ident("ssz"));
}

fn lit(n: usize) -> Literal {
    Literal::usize_unsuffixed(n)
}

/// `expr?;`, with `annotate` applied to any error.
fn annotated(expr: TokenStream, annotate: &TokenStream) -> TokenStream {
    if annotate.is_empty() {
        quote!(#expr?;)
    } else {
        quote!(#expr.map_err(|e| e #annotate)?;)
    }
}

fn peel(ty: &Type) -> &Type {
    match ty {
        Type::Paren(ty) => peel(&ty.elem),
        Type::Group(ty) => peel(&ty.elem),
        ty => ty,
    }
}

/// Returns `T` if `ty` is `wrapper<T>`.
fn generic_arg<'t>(ty: &'t Type, wrapper: &str) -> Option<&'t Type> {
    let segment = match peel(ty) {
        Type::Path(path) => path.path.segments.last()?,
        _ => return None,
    };

    if segment.ident != wrapper {
        return None;
    }

    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first()? {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        },
        _ => None,
    }
}

/// A Rust type, along with the module it is written in.
#[derive(Clone, Copy)]
struct Ty<'a> {
    module: &'a str,
    ty: &'a Type,
}

impl<'a> Ty<'a> {
    fn mismatch(self, expected: &str) -> Error {
        let ty = self.ty;
        Error::UnsupportedSchema {
            name: quote!(#ty).to_string(),
            reason: format!("expected {}", expected),
        }
    }

    fn boxed(self) -> Result<Ty<'a>, Error> {
        generic_arg(self.ty, "Box")
            .map(|ty| Ty {
                module: self.module,
                ty,
            })
            .ok_or_else(|| self.mismatch("a Box"))
    }

    /// Returns the element type and `true` if the sequence is an array rather than a `Vec`.
    fn sequence(self) -> Result<(Ty<'a>, bool), Error> {
        let module = self.module;
        match peel(self.ty) {
            Type::Array(array) => Ok((
                Ty {
                    module,
                    ty: &array.elem,
                },
                true,
            )),
            ty => generic_arg(ty, "Vec")
                .map(|ty| (Ty { module, ty }, false))
                .ok_or_else(|| self.mismatch("an array or Vec")),
        }
    }
}

/// Encoding statements which append to `buf`.
struct Statements {
    tokens: TokenStream,
    /// `true` if any statement uses `?`.
    fallible: bool,
}

/// Emits code specialized to a schema, walking the schema alongside the Rust type it came from.
struct Generator<'a> {
    index: &'a SourceIndex,
    ssz: syn::Path,
    tree_hash: syn::Path,
}

impl<'a> Generator<'a> {
    fn new(index: &'a SourceIndex, config: &Config) -> Result<Self, Error> {
        Ok(Self {
            index,
            ssz: config.ssz_path()?,
            tree_hash: config.tree_hash_path()?,
        })
    }

    /// Follows a path to the type alias it names.
    fn alias(&self, t: Ty<'a>) -> Result<Ty<'a>, Error> {
        let index = self.index;

        let target = match peel(t.ty) {
            Type::Path(path) => index.resolve(t.module, &path.path).and_then(|key| {
                let (module, source) = index.module_entry(&key.module)?;
                match source.type_item(&key.name)? {
                    TypeItem::Alias(alias) => Some(Ty {
                        module,
                        ty: &alias.ty,
                    }),
                    _ => None,
                }
            }),
            _ => None,
        };

        target.ok_or_else(|| t.mismatch("a type alias"))
    }

    fn encode(
        &self,
        schema: &Schema,
        t: Ty<'a>,
        v: &TokenStream,
        depth: usize,
        annotate: &TokenStream,
    ) -> Result<Statements, Error> {
        let ssz = &self.ssz;

        match schema {
            Schema::Byte => Ok(Statements {
                tokens: quote!(buf.push(*#v);),
                fallible: false,
            }),
            Schema::Bool | Schema::Uint(_) | Schema::Container(_) | Schema::Union(_) => {
                Ok(Statements {
                    tokens: annotated(quote!(#ssz::Encode::ssz_append(#v, buf)), annotate),
                    fallible: true,
                })
            }
            Schema::Pointer(referent) => {
                self.encode(referent, t.boxed()?, &quote!((&**#v)), depth, annotate)
            }
            Schema::Overlay(overlay) => {
                let check = match overlay.kind() {
                    OverlayKind::Plain => {
                        return self.encode(overlay.underlying(), self.alias(t)?, v, depth, annotate)
                    }
                    OverlayKind::Bitlist { max_bits } => {
                        let max_bits = lit(max_bits);
                        annotated(quote!(#v.check_max(#max_bits)), annotate)
                    }
                    OverlayKind::Bitvector { bits } => {
                        let bits = lit(bits);
                        annotated(quote!(#v.check_len(#bits)), annotate)
                    }
                };

                Ok(Statements {
                    tokens: quote! {
                        #check
                        buf.extend_from_slice(#v.as_raw_bytes());
                    },
                    fallible: true,
                })
            }
            Schema::Vector { element, len } => {
                let (element_t, is_array) = t.sequence()?;
                let len = lit(*len);
                let check = if is_array {
                    None
                } else {
                    Some(annotated(quote!(#ssz::check_vector_len(#v.len(), #len)), annotate))
                };
                self.encode_items(element, element_t, v, check, depth, annotate)
            }
            Schema::List { element, max_len } => {
                let (element_t, _) = t.sequence()?;
                let max_len = lit(*max_len);
                let check = annotated(quote!(#ssz::check_list_len(#v.len(), #max_len)), annotate);
                self.encode_items(element, element_t, v, Some(check), depth, annotate)
            }
        }
    }

    fn encode_items(
        &self,
        element: &Schema,
        element_t: Ty<'a>,
        v: &TokenStream,
        check: Option<TokenStream>,
        depth: usize,
        annotate: &TokenStream,
    ) -> Result<Statements, Error> {
        let ssz = &self.ssz;
        let checked = check.is_some();
        let check = check.unwrap_or_default();

        if let Schema::Byte = element {
            return Ok(Statements {
                tokens: quote! {
                    #check
                    buf.extend_from_slice(&#v[..]);
                },
                fallible: checked,
            });
        }

        let i = format_ident!("i{}", depth);
        let item = format_ident!("item{}", depth);

        if element.is_variable_size() {
            let encoder = format_ident!("encoder{}", depth);
            let inner = self
                .encode(element, element_t, &quote!(#item), depth + 1, &TokenStream::new())?
                .tokens;

            Ok(Statements {
                tokens: quote! {
                    #check
                    {
                        let mut #encoder = #ssz::SszEncoder::container(
                            buf,
                            #v.len() * #ssz::BYTES_PER_LENGTH_OFFSET,
                        );
                        for (#i, #item) in #v.iter().enumerate() {
                            #encoder
                                .append_parameterized(false, |buf| {
                                    #inner
                                    Ok(())
                                })
                                .map_err(|e| e.at_index(#i) #annotate)?;
                        }
                        #encoder.finalize();
                    }
                },
                fallible: true,
            })
        } else {
            let inner = self.encode(
                element,
                element_t,
                &quote!(#item),
                depth + 1,
                &quote!(.at_index(#i) #annotate),
            )?;
            let body = inner.tokens;

            let tokens = if inner.fallible {
                quote! {
                    #check
                    for (#i, #item) in #v.iter().enumerate() {
                        #body
                    }
                }
            } else {
                quote! {
                    #check
                    for #item in #v.iter() {
                        #body
                    }
                }
            };

            Ok(Statements {
                tokens,
                fallible: checked || inner.fallible,
            })
        }
    }

    /// An expression for the encoded length of `v`.
    fn len(&self, schema: &Schema, t: Ty<'a>, v: &TokenStream, depth: usize) -> Result<TokenStream, Error> {
        let ssz = &self.ssz;

        if !schema.is_variable_size() {
            let len = lit(schema.fixed_size());
            return Ok(quote!(#len));
        }

        match schema {
            Schema::Pointer(referent) => self.len(referent, t.boxed()?, &quote!((&**#v)), depth),
            Schema::Overlay(overlay) => match overlay.kind() {
                OverlayKind::Plain => self.len(overlay.underlying(), self.alias(t)?, v, depth),
                OverlayKind::Bitlist { .. } | OverlayKind::Bitvector { .. } => {
                    Ok(quote!(#v.as_raw_bytes().len()))
                }
            },
            Schema::Vector { element, .. } | Schema::List { element, .. } => {
                let (element_t, _) = t.sequence()?;

                if element.is_variable_size() {
                    let item = format_ident!("item{}", depth);
                    let inner = self.len(element, element_t, &quote!(#item), depth + 1)?;
                    Ok(quote! {
                        #v.iter()
                            .map(|#item| #ssz::BYTES_PER_LENGTH_OFFSET + #inner)
                            .sum::<usize>()
                    })
                } else {
                    let size = lit(element.fixed_size());
                    Ok(quote!(#v.len() * #size))
                }
            }
            Schema::Container(_)
            | Schema::Union(_)
            | Schema::Bool
            | Schema::Byte
            | Schema::Uint(_) => Ok(quote!(#ssz::Encode::ssz_bytes_len(#v))),
        }
    }

    /// An expression decoding the bytes in `slice`, evaluating to a `Result`.
    fn decode(&self, schema: &Schema, t: Ty<'a>, slice: &Ident, depth: usize) -> Result<TokenStream, Error> {
        let ssz = &self.ssz;

        match schema {
            Schema::Bool | Schema::Byte | Schema::Uint(_) | Schema::Container(_) | Schema::Union(_) => {
                Ok(quote!(#ssz::Decode::from_ssz_bytes(#slice)))
            }
            Schema::Pointer(referent) => {
                let inner = self.decode(referent, t.boxed()?, slice, depth)?;
                Ok(quote!(#inner.map(Box::new)))
            }
            Schema::Overlay(overlay) => match overlay.kind() {
                OverlayKind::Plain => self.decode(overlay.underlying(), self.alias(t)?, slice, depth),
                OverlayKind::Bitlist { max_bits } => {
                    let max_bits = lit(max_bits);
                    Ok(quote!(#ssz::Bitlist::from_raw_bytes(#slice, #max_bits)))
                }
                OverlayKind::Bitvector { bits } => {
                    let bits = lit(bits);
                    Ok(quote!(#ssz::Bitvector::from_raw_bytes(#slice, #bits)))
                }
            },
            Schema::Vector { element, len } => {
                let (element_t, is_array) = t.sequence()?;
                let len = lit(*len);

                if let Schema::Byte = **element {
                    return Ok(if is_array {
                        quote!(#ssz::Decode::from_ssz_bytes(#slice))
                    } else {
                        quote!(#ssz::check_vector_len(#slice.len(), #len).map(|()| #slice.to_vec()))
                    });
                }

                let item_slice = format_ident!("slice{}", depth);
                let inner = self.decode(element, element_t, &item_slice, depth + 1)?;
                let size = lit(element.fixed_size());
                let items = quote!(#ssz::decode_vector_with(#slice, #len, #size, |#item_slice| #inner));

                if is_array {
                    Ok(quote! {
                        #items.and_then(|items| {
                            <[_; #len]>::try_from(items)
                                .map_err(|items| #ssz::Error::size_violation(items.len(), #len))
                        })
                    })
                } else {
                    Ok(items)
                }
            }
            Schema::List { element, max_len } => {
                let (element_t, _) = t.sequence()?;
                let max_len = lit(*max_len);

                if let Schema::Byte = **element {
                    return Ok(quote! {
                        #ssz::check_list_len(#slice.len(), #max_len).map(|()| #slice.to_vec())
                    });
                }

                let item_slice = format_ident!("slice{}", depth);
                let inner = self.decode(element, element_t, &item_slice, depth + 1)?;

                if element.is_variable_size() {
                    Ok(quote! {
                        #ssz::decode_variable_length_items_with(#slice, Some(#max_len), |#item_slice| #inner)
                    })
                } else {
                    let size = lit(element.fixed_size());
                    Ok(quote! {
                        #ssz::decode_fixed_length_items_with(#slice, #size, Some(#max_len), |#item_slice| #inner)
                    })
                }
            }
        }
    }

    /// An expression for the hash tree root of `v`, evaluating to a `Result`.
    fn root(&self, schema: &Schema, t: Ty<'a>, v: &TokenStream, depth: usize) -> Result<TokenStream, Error> {
        let tree_hash = &self.tree_hash;

        match schema {
            Schema::Bool | Schema::Byte | Schema::Uint(_) | Schema::Container(_) | Schema::Union(_) => {
                Ok(quote!(#tree_hash::TreeHash::tree_hash_root(#v)))
            }
            Schema::Pointer(referent) => self.root(referent, t.boxed()?, &quote!((&**#v)), depth),
            Schema::Overlay(overlay) => match overlay.kind() {
                OverlayKind::Plain => self.root(overlay.underlying(), self.alias(t)?, v, depth),
                OverlayKind::Bitlist { max_bits } => {
                    let max_bits = lit(max_bits);
                    Ok(quote!(#tree_hash::bitlist_root(#v, #max_bits)))
                }
                OverlayKind::Bitvector { bits } => {
                    let bits = lit(bits);
                    Ok(quote!(#tree_hash::bitvector_root(#v, #bits)))
                }
            },
            Schema::Vector { element, len } => {
                let len = lit(*len);
                self.sequence_root(element, t, v, quote!(vector_root), quote!(vector_root_with), len, depth)
            }
            Schema::List { element, max_len } => {
                let max_len = lit(*max_len);
                self.sequence_root(element, t, v, quote!(list_root), quote!(list_root_with), max_len, depth)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn sequence_root(
        &self,
        element: &Schema,
        t: Ty<'a>,
        v: &TokenStream,
        packed: TokenStream,
        with: TokenStream,
        bound: Literal,
        depth: usize,
    ) -> Result<TokenStream, Error> {
        let tree_hash = &self.tree_hash;
        let (element_t, _) = t.sequence()?;

        if element.is_basic() {
            Ok(quote!(#tree_hash::#packed(&#v[..], #bound)))
        } else {
            let item = format_ident!("item{}", depth);
            let inner = self.root(element, element_t, &quote!(#item), depth + 1)?;
            Ok(quote!(#tree_hash::#with(&#v[..], #bound, |#item| #inner)))
        }
    }

    /// The struct definition followed by its `Encode`, `Decode` and `TreeHash` impls.
    fn container(&self, module: &'a str, item: &'a ItemStruct, schema: &Schema) -> Result<TokenStream, Error> {
        let ssz = &self.ssz;
        let tree_hash = &self.tree_hash;
        let name = &item.ident;

        let container = match schema {
            Schema::Container(container) => container,
            other => {
                return Err(Error::UnsupportedSchema {
                    name: name.to_string(),
                    reason: format!("expected a container, found {}", other.type_name()),
                })
            }
        };

        let is_fixed = !schema.is_variable_size();
        let fixed = lit(container.fixed_region_len());
        let ssz_fixed_len = if is_fixed {
            quote!(#fixed)
        } else {
            quote!(#ssz::BYTES_PER_LENGTH_OFFSET)
        };

        let slice = format_ident!("slice");
        let mut appends = vec![];
        let mut lens = vec![];
        let mut registers = vec![];
        let mut decodes = vec![];
        let mut inits = vec![];
        let mut roots = vec![];

        for (n, field) in container.fields().iter().enumerate() {
            let (ident, ty) = item
                .fields
                .iter()
                .find_map(|f| match &f.ident {
                    Some(ident) if *ident == field.name => Some((ident, &f.ty)),
                    _ => None,
                })
                .ok_or_else(|| Error::UnsupportedSchema {
                    name: name.to_string(),
                    reason: format!("no field named {}", field.name),
                })?;

            let t = Ty { module, ty };
            let v = quote!((&self.#ident));
            let field_name = &field.name;
            let field_fixed = !field.schema.is_variable_size();

            let statements = self
                .encode(&field.schema, t, &v, 0, &TokenStream::new())?
                .tokens;
            appends.push(quote! {
                encoder
                    .append_parameterized(#field_fixed, |buf| {
                        #statements
                        Ok(())
                    })
                    .map_err(|e| e.in_field(#field_name))?;
            });

            if !field_fixed {
                lens.push(self.len(&field.schema, t, &v, 0)?);
            }

            let slot = lit(field.schema.ssz_fixed_len());
            registers.push(quote!(builder.register_type_parameterized(#field_fixed, #slot)?;));

            let var = format_ident!("field{}", n);
            let decode = self.decode(&field.schema, t, &slice, 0)?;
            decodes.push(quote! {
                let #var = decoder
                    .decode_next_with(|#slice| #decode)
                    .map_err(|e| e.in_field(#field_name))?;
            });
            inits.push(quote!(#ident: #var));

            let root = self.root(&field.schema, t, &v, 0)?;
            roots.push(quote!(#root.map_err(|e| e.in_field(#field_name))?));
        }

        // Fields which are not part of the schema.
        for ident in item.fields.iter().filter_map(|f| f.ident.as_ref()) {
            if !container.fields().iter().any(|field| *ident == field.name) {
                inits.push(quote!(#ident: Default::default()));
            }
        }

        let mut definition = item.clone();
        strip_ssz_attrs(&mut definition.attrs);
        for field in definition.fields.iter_mut() {
            strip_ssz_attrs(&mut field.attrs);
        }

        Ok(quote! {
            #definition

            impl #ssz::Encode for #name {
                fn is_ssz_fixed_len() -> bool {
                    #is_fixed
                }

                fn ssz_fixed_len() -> usize {
                    #ssz_fixed_len
                }

                fn ssz_bytes_len(&self) -> usize {
                    #fixed #(+ #lens)*
                }

                fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), #ssz::Error> {
                    let start = buf.len();
                    let mut encoder = #ssz::SszEncoder::container(buf, #fixed);

                    #(#appends)*

                    let buf = encoder.finalize();
                    debug_assert_eq!(buf.len() - start, #ssz::Encode::ssz_bytes_len(self));

                    Ok(())
                }
            }

            impl #ssz::Decode for #name {
                fn is_ssz_fixed_len() -> bool {
                    #is_fixed
                }

                fn ssz_fixed_len() -> usize {
                    #ssz_fixed_len
                }

                fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, #ssz::Error> {
                    if bytes.len() < #fixed {
                        return Err(#ssz::Error::size_violation(bytes.len(), #fixed));
                    }

                    let mut builder = #ssz::SszDecoderBuilder::new(bytes);
                    #(#registers)*
                    let mut decoder = builder.build()?;

                    #(#decodes)*

                    Ok(Self {
                        #(#inits,)*
                    })
                }
            }

            impl #tree_hash::TreeHash for #name {
                fn tree_hash_type() -> #tree_hash::TreeHashType {
                    #tree_hash::TreeHashType::Container
                }

                fn tree_hash_packed_encoding(&self) -> #tree_hash::PackedEncoding {
                    unreachable!("Container should never be packed.")
                }

                fn tree_hash_packing_factor() -> usize {
                    unreachable!("Container should never be packed.")
                }

                fn tree_hash_root(&self) -> Result<#tree_hash::Hash256, #tree_hash::Error> {
                    #tree_hash::container_root(&[
                        #(#roots,)*
                    ])
                }
            }
        })
    }

    /// The enum definition followed by its `Encode`, `Decode` and `TreeHash` impls.
    fn union(&self, module: &'a str, item: &'a ItemEnum, schema: &Schema) -> Result<TokenStream, Error> {
        let ssz = &self.ssz;
        let tree_hash = &self.tree_hash;
        let name = &item.ident;

        let union = match schema {
            Schema::Union(union) if union.variants().len() == item.variants.len() => union,
            other => {
                return Err(Error::UnsupportedSchema {
                    name: name.to_string(),
                    reason: format!("does not match {}", other.type_name()),
                })
            }
        };

        let body = format_ident!("body");
        let mut lens = vec![];
        let mut appends = vec![];
        let mut decodes = vec![];
        let mut roots = vec![];

        for (selector, (variant, syn_variant)) in
            union.variants().iter().zip(&item.variants).enumerate()
        {
            let ident = &syn_variant.ident;
            let variant_name = &variant.name;
            let selector = Literal::u8_unsuffixed(selector as u8);

            match (&variant.schema, &syn_variant.fields) {
                (None, Fields::Unit) => {
                    lens.push(quote!(#name::#ident => #ssz::BYTES_PER_UNION_SELECTOR));
                    appends.push(quote!(#name::#ident => buf.push(#selector)));
                    decodes.push(quote! {
                        #selector => if #body.is_empty() {
                            Ok(#name::#ident)
                        } else {
                            Err(#ssz::Error::size_violation(#body.len(), 0))
                        }
                    });
                    roots.push(quote! {
                        #name::#ident => #tree_hash::mix_in_selector(&#tree_hash::Hash256::zero(), #selector)
                    });
                }
                (Some(schema), Fields::Unnamed(fields)) if fields.unnamed.len() == 1 => {
                    let t = Ty {
                        module,
                        ty: &fields.unnamed[0].ty,
                    };
                    let v = quote!(v0);

                    if schema.is_variable_size() {
                        let len = self.len(schema, t, &v, 0)?;
                        lens.push(quote!(#name::#ident(v0) => #ssz::BYTES_PER_UNION_SELECTOR + #len));
                    } else {
                        let len = lit(schema.fixed_size());
                        lens.push(quote!(#name::#ident(_) => #ssz::BYTES_PER_UNION_SELECTOR + #len));
                    }

                    let statements = self
                        .encode(schema, t, &v, 0, &quote!(.in_field(#variant_name)))?
                        .tokens;
                    appends.push(quote! {
                        #name::#ident(v0) => {
                            buf.push(#selector);
                            #statements
                        }
                    });

                    let decode = self.decode(schema, t, &body, 0)?;
                    decodes.push(quote! {
                        #selector => #decode
                            .map(#name::#ident)
                            .map_err(|e| e.in_field(#variant_name))
                    });

                    let root = self.root(schema, t, &v, 0)?;
                    roots.push(quote! {
                        #name::#ident(v0) => {
                            let root = #root.map_err(|e| e.in_field(#variant_name))?;
                            #tree_hash::mix_in_selector(&root, #selector)
                        }
                    });
                }
                _ => {
                    return Err(Error::UnsupportedSchema {
                        name: format!("{}::{}", name, ident),
                        reason: "variant does not match its schema".to_string(),
                    })
                }
            }
        }

        let mut definition = item.clone();
        strip_ssz_attrs(&mut definition.attrs);
        for variant in definition.variants.iter_mut() {
            strip_ssz_attrs(&mut variant.attrs);
            for field in variant.fields.iter_mut() {
                strip_ssz_attrs(&mut field.attrs);
            }
        }

        Ok(quote! {
            #definition

            impl #ssz::Encode for #name {
                fn is_ssz_fixed_len() -> bool {
                    false
                }

                fn ssz_bytes_len(&self) -> usize {
                    match self {
                        #(#lens,)*
                    }
                }

                fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), #ssz::Error> {
                    match self {
                        #(#appends,)*
                    }

                    Ok(())
                }
            }

            impl #ssz::Decode for #name {
                fn is_ssz_fixed_len() -> bool {
                    false
                }

                fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, #ssz::Error> {
                    let (selector, #body) = #ssz::split_union_bytes(bytes)?;

                    match u8::from(selector) {
                        #(#decodes,)*
                        other => Err(#ssz::ErrorKind::UnionSelectorInvalid(other).into()),
                    }
                }
            }

            impl #tree_hash::TreeHash for #name {
                fn tree_hash_type() -> #tree_hash::TreeHashType {
                    #tree_hash::TreeHashType::Container
                }

                fn tree_hash_packed_encoding(&self) -> #tree_hash::PackedEncoding {
                    unreachable!("Container should never be packed.")
                }

                fn tree_hash_packing_factor() -> usize {
                    unreachable!("Container should never be packed.")
                }

                fn tree_hash_root(&self) -> Result<#tree_hash::Hash256, #tree_hash::Error> {
                    match self {
                        #(#roots,)*
                    }
                }
            }
        })
    }
}
