use crate::{Error, SourceIndex, TypeCache, TypeItem, TypeKey};
use quote::quote;
use slog::{debug, Logger};
use ssz_schema::{Field, Schema, Variant};
use std::vec;
use syn::{
    Attribute, Expr, ExprLit, Fields, GenericArgument, Generics, Lit, LitStr, PathArguments, Type,
    Visibility,
};

/// One level of a (possibly nested) `Vec`, `Bitlist` or `Bitvector`, outermost first.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Dimension {
    Vector(usize),
    List(usize),
}

/// Builds `Schema`s from the declarations in a `SourceIndex`, caching each extracted type.
pub struct Extractor<'a> {
    index: &'a SourceIndex,
    cache: &'a TypeCache,
    log: Logger,
    /// The types currently being extracted, outermost first.
    stack: Vec<TypeKey>,
}

impl<'a> Extractor<'a> {
    pub fn new(index: &'a SourceIndex, cache: &'a TypeCache, log: Logger) -> Self {
        Self {
            index,
            cache,
            log,
            stack: vec![],
        }
    }

    /// Returns the schema of the struct, enum or alias `name` declared in `module`.
    pub fn extract(&mut self, module: &str, name: &str) -> Result<Schema, Error> {
        let unresolved = || Error::UnresolvedType {
            path: module.to_string(),
            name: name.to_string(),
        };

        self.index
            .module(module)
            .ok_or_else(unresolved)?
            .type_item(name)
            .ok_or_else(unresolved)?;

        self.extract_key(TypeKey::new(module, name))
    }

    fn extract_key(&mut self, key: TypeKey) -> Result<Schema, Error> {
        if let Some(schema) = self.cache.get(&key) {
            debug!(self.log, "Schema cache hit"; "type" => %key);
            return Ok(schema);
        }

        if self.stack.contains(&key) {
            let path = self
                .stack
                .iter()
                .map(|key| key.name.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::CyclicType {
                path,
                name: key.name,
            });
        }

        let index = self.index;
        let item = index
            .module(&key.module)
            .and_then(|module| module.type_item(&key.name))
            .ok_or_else(|| Error::UnresolvedType {
                path: key.module.clone(),
                name: key.name.clone(),
            })?;

        debug!(self.log, "Extracting type"; "type" => %key);

        self.stack.push(key.clone());
        let result = self.item_schema(&key, item);
        self.stack.pop();

        Ok(self.cache.insert(key, result?))
    }

    fn item_schema(&mut self, key: &TypeKey, item: TypeItem<'a>) -> Result<Schema, Error> {
        let name = &key.name;

        match item {
            TypeItem::Struct(item) => {
                check_no_generics(name, &item.generics)?;

                let named = match &item.fields {
                    Fields::Named(fields) => &fields.named,
                    _ => {
                        return Err(Error::UnsupportedType {
                            path: name.clone(),
                            ty: "tuple or unit struct".to_string(),
                        })
                    }
                };

                let mut fields = Vec::with_capacity(named.len());
                for field in named {
                    let ident = match (&field.vis, &field.ident) {
                        (Visibility::Public(_), Some(ident)) => ident.to_string(),
                        _ => continue,
                    };

                    let path = format!("{}.{}", name, ident);
                    let schema = self.annotated_schema(&key.module, &field.ty, &field.attrs, &path)?;
                    fields.push(Field::new(ident, schema));
                }

                Ok(Schema::container(name.clone(), fields)?)
            }
            TypeItem::Enum(item) => {
                check_no_generics(name, &item.generics)?;

                let mut variants = Vec::with_capacity(item.variants.len());
                for variant in &item.variants {
                    let path = format!("{}::{}", name, variant.ident);
                    let schema = match &variant.fields {
                        Fields::Unit => None,
                        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                            let field = &fields.unnamed[0];
                            Some(self.annotated_schema(&key.module, &field.ty, &field.attrs, &path)?)
                        }
                        _ => {
                            return Err(Error::UnsupportedType {
                                path,
                                ty: "variant with named or multiple fields".to_string(),
                            })
                        }
                    };
                    variants.push(Variant::new(variant.ident.to_string(), schema));
                }

                Ok(Schema::union(name.clone(), variants)?)
            }
            TypeItem::Alias(item) => {
                check_no_generics(name, &item.generics)?;
                let underlying = self.annotated_schema(&key.module, &item.ty, &item.attrs, name)?;
                Ok(Schema::alias(name.clone(), underlying))
            }
        }
    }

    /// Returns the schema of `ty`, sized by any `#[ssz(..)]` annotation in `attrs`.
    fn annotated_schema(
        &mut self,
        module: &str,
        ty: &Type,
        attrs: &[Attribute],
        path: &str,
    ) -> Result<Schema, Error> {
        let mut dims = parse_annotation(attrs, path)?.into_iter();
        let schema = self.type_schema(module, ty, &mut dims, path)?;

        if dims.next().is_some() {
            return Err(malformed(
                path,
                "annotation has more dimensions than the type",
            ));
        }

        Ok(schema)
    }

    fn type_schema(
        &mut self,
        module: &str,
        ty: &Type,
        dims: &mut vec::IntoIter<Dimension>,
        path: &str,
    ) -> Result<Schema, Error> {
        match ty {
            Type::Paren(ty) => self.type_schema(module, &ty.elem, dims, path),
            Type::Group(ty) => self.type_schema(module, &ty.elem, dims, path),
            Type::Array(array) => {
                let len = literal_len(&array.len).ok_or_else(|| unsupported(path, ty))?;
                let element = self.type_schema(module, &array.elem, dims, path)?;
                Ok(Schema::vector(element, len)?)
            }
            Type::Path(type_path) if type_path.qself.is_none() => {
                self.path_schema(module, &type_path.path, ty, dims, path)
            }
            _ => Err(unsupported(path, ty)),
        }
    }

    fn path_schema(
        &mut self,
        module: &str,
        type_path: &syn::Path,
        ty: &Type,
        dims: &mut vec::IntoIter<Dimension>,
        path: &str,
    ) -> Result<Schema, Error> {
        let segment = type_path
            .segments
            .last()
            .ok_or_else(|| unsupported(path, ty))?;
        let name = segment.ident.to_string();
        let single = type_path.segments.len() == 1;

        match &segment.arguments {
            PathArguments::None => {
                let schema = match name.as_str() {
                    "bool" if single => Schema::Bool,
                    "u8" if single => Schema::Byte,
                    "u16" if single => Schema::uint(16)?,
                    "u32" if single => Schema::uint(32)?,
                    "u64" if single => Schema::uint(64)?,
                    "u128" if single => Schema::uint(128)?,
                    "usize" | "isize" | "i8" | "i16" | "i32" | "i64" | "i128" | "f32" | "f64"
                    | "char" | "str" | "String"
                        if single =>
                    {
                        return Err(unsupported(path, ty))
                    }
                    "U256" => Schema::uint(256)?,
                    "Bitlist" => match dims.next() {
                        Some(Dimension::List(max_bits)) => Schema::bitlist("Bitlist", max_bits)?,
                        _ => return Err(malformed(path, "Bitlist requires a max annotation")),
                    },
                    "Bitvector" => match dims.next() {
                        Some(Dimension::Vector(bits)) => Schema::bitvector("Bitvector", bits)?,
                        _ => return Err(malformed(path, "Bitvector requires a size annotation")),
                    },
                    _ => {
                        let key = self.index.resolve(module, type_path).ok_or_else(|| {
                            Error::UnresolvedType {
                                path: path.to_string(),
                                name: path_string(type_path),
                            }
                        })?;
                        return self.extract_key(key);
                    }
                };

                Ok(schema)
            }
            PathArguments::AngleBracketed(args) => {
                let inner = match args.args.iter().collect::<Vec<_>>().as_slice() {
                    [GenericArgument::Type(inner)] => inner,
                    _ => return Err(unsupported(path, ty)),
                };

                match name.as_str() {
                    "Vec" => {
                        let dim = dims.next().ok_or_else(|| {
                            malformed(path, "Vec requires a size or max annotation")
                        })?;
                        let element = self.type_schema(module, inner, dims, path)?;

                        match dim {
                            Dimension::Vector(len) => Ok(Schema::vector(element, len)?),
                            Dimension::List(max_len) => Ok(Schema::list(element, max_len)?),
                        }
                    }
                    "Box" => Ok(Schema::pointer(self.type_schema(module, inner, dims, path)?)),
                    _ => Err(unsupported(path, ty)),
                }
            }
            PathArguments::Parenthesized(_) => Err(unsupported(path, ty)),
        }
    }
}

fn check_no_generics(name: &str, generics: &Generics) -> Result<(), Error> {
    if generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::UnsupportedType {
            path: name.to_string(),
            ty: "generic type".to_string(),
        })
    }
}

fn literal_len(expr: &Expr) -> Option<usize> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse().ok(),
        _ => None,
    }
}

fn path_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn unsupported(path: &str, ty: &Type) -> Error {
    Error::UnsupportedType {
        path: path.to_string(),
        ty: quote!(#ty).to_string(),
    }
}

fn malformed(path: &str, reason: impl Into<String>) -> Error {
    Error::MalformedAnnotation {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Reads the `size` and `max` entries of any `#[ssz(..)]` attributes.
fn parse_annotation(attrs: &[Attribute], path: &str) -> Result<Vec<Dimension>, Error> {
    let mut size = None;
    let mut max = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("ssz")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("size") {
                size = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("max") {
                max = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("expected `size` or `max`"))
            }
        })
        .map_err(|e| malformed(path, e.to_string()))?;
    }

    dimensions(size.as_deref(), max.as_deref()).map_err(|reason| malformed(path, reason))
}

/// Combines `size` and `max` entries into dimensions, outermost first.
///
/// Each `?` in `size` takes the next entry of `max`. Without a `size`, every `max` entry is a
/// list dimension.
fn dimensions(size: Option<&str>, max: Option<&str>) -> Result<Vec<Dimension>, String> {
    let mut maxes = match max {
        Some(max) => max
            .split(',')
            .map(parse_len)
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![],
    }
    .into_iter();

    let dims = match size {
        Some(size) => size
            .split(',')
            .map(|entry| {
                if entry.trim() == "?" {
                    maxes
                        .next()
                        .map(Dimension::List)
                        .ok_or_else(|| format!("no max for \"?\" in size {:?}", size))
                } else {
                    parse_len(entry).map(Dimension::Vector)
                }
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => maxes.by_ref().map(Dimension::List).collect(),
    };

    if maxes.next().is_some() {
        return Err("max has more entries than the \"?\" entries of size".to_string());
    }

    Ok(dims)
}

fn parse_len(entry: &str) -> Result<usize, String> {
    match entry.trim().parse::<usize>() {
        Ok(0) => Err("lengths must be non-zero".to_string()),
        Ok(len) => Ok(len),
        Err(_) => Err(format!("invalid length {:?}", entry.trim())),
    }
}
