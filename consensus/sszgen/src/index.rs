use crate::Error;
use std::collections::HashMap;
use std::fmt;
use syn::{Item, ItemEnum, ItemStruct, ItemType, UseTree, Visibility};

/// Identifies a type by the module it is declared in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub module: String,
    pub name: String,
}

impl TypeKey {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// A type declaration which may appear in a schema.
#[derive(Debug, Clone, Copy)]
pub enum TypeItem<'a> {
    Struct(&'a ItemStruct),
    Enum(&'a ItemEnum),
    Alias(&'a ItemType),
}

/// The parsed items of a single module.
pub struct Module {
    items: Vec<Item>,
    types: HashMap<String, usize>,
    imports: HashMap<String, Vec<String>>,
}

impl Module {
    fn parse(name: &str, source: &str) -> Result<Self, Error> {
        let file = syn::parse_file(source).map_err(|e| Error::Parse {
            module: name.to_string(),
            error: e.to_string(),
        })?;

        let mut types = HashMap::new();
        let mut imports = HashMap::new();

        for (i, item) in file.items.iter().enumerate() {
            match item {
                Item::Struct(item) => {
                    types.insert(item.ident.to_string(), i);
                }
                Item::Enum(item) => {
                    types.insert(item.ident.to_string(), i);
                }
                Item::Type(item) => {
                    types.insert(item.ident.to_string(), i);
                }
                Item::Use(item) => flatten_use(&item.tree, &mut vec![], &mut imports),
                _ => (),
            }
        }

        Ok(Self {
            items: file.items,
            types,
            imports,
        })
    }

    /// All items, in declaration order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn type_item(&self, name: &str) -> Option<TypeItem<'_>> {
        match self.items.get(*self.types.get(name)?)? {
            Item::Struct(item) => Some(TypeItem::Struct(item)),
            Item::Enum(item) => Some(TypeItem::Enum(item)),
            Item::Type(item) => Some(TypeItem::Alias(item)),
            _ => None,
        }
    }

    /// The full path imported under `name` by a `use` item, if any.
    pub fn import(&self, name: &str) -> Option<&[String]> {
        self.imports.get(name).map(Vec::as_slice)
    }

    /// The names of the `pub` structs and enums, in declaration order.
    pub fn exported_types(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Item::Struct(ItemStruct {
                    vis: Visibility::Public(_),
                    ident,
                    ..
                })
                | Item::Enum(ItemEnum {
                    vis: Visibility::Public(_),
                    ident,
                    ..
                }) => self
                    .types
                    .get_key_value(&ident.to_string())
                    .map(|(name, _)| name.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn flatten_use(tree: &UseTree, prefix: &mut Vec<String>, imports: &mut HashMap<String, Vec<String>>) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            flatten_use(&path.tree, prefix, imports);
            prefix.pop();
        }
        UseTree::Name(name) if name.ident != "self" => {
            let mut path = prefix.clone();
            path.push(name.ident.to_string());
            imports.insert(name.ident.to_string(), path);
        }
        UseTree::Rename(rename) => {
            let mut path = prefix.clone();
            path.push(rename.ident.to_string());
            imports.insert(rename.rename.to_string(), path);
        }
        UseTree::Group(group) => {
            for tree in &group.items {
                flatten_use(tree, prefix, imports);
            }
        }
        UseTree::Name(_) | UseTree::Glob(_) => (),
    }
}

/// Limits the length of a chain of re-exports.
const MAX_IMPORT_DEPTH: usize = 8;

/// The parsed source of every module that may be referenced by a schema.
#[derive(Default)]
pub struct SourceIndex {
    modules: HashMap<String, Module>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(module name, source text)` pairs.
    pub fn from_sources<I, M, S>(sources: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (M, S)>,
        M: Into<String>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for (name, source) in sources {
            index.add_module(name, source.as_ref())?;
        }
        Ok(index)
    }

    /// Parse `source` and add it as module `name`, replacing any existing module of that name.
    pub fn add_module(&mut self, name: impl Into<String>, source: &str) -> Result<(), Error> {
        let name = name.into();
        let module = Module::parse(&name, source)?;
        self.modules.insert(name, module);
        Ok(())
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// As per `module`, but also returns the name as stored in the index.
    pub(crate) fn module_entry(&self, name: &str) -> Option<(&str, &Module)> {
        self.modules
            .get_key_value(name)
            .map(|(name, module)| (name.as_str(), module))
    }

    /// Find the declaration that `path` refers to when written inside `module`.
    ///
    /// Module names are `::`-separated paths relative to the crate root, e.g. `phase0` or
    /// `phase0::inner`. A single-segment path is looked up in `module` then in its imports.
    /// Leading `crate`, `self` and `super` segments are anchored at the crate root, `module` and
    /// the parent of `module` respectively. Other multi-segment paths are tried below `module`
    /// first, then from the crate root.
    pub fn resolve(&self, module: &str, path: &syn::Path) -> Option<TypeKey> {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();

        self.resolve_segments(module, &segments, 0)
    }

    fn resolve_segments(&self, module: &str, segments: &[String], depth: usize) -> Option<TypeKey> {
        let (name, prefix) = segments.split_last()?;

        if prefix.is_empty() {
            let current = self.modules.get(module)?;
            return if current.type_item(name).is_some() {
                Some(TypeKey::new(module, name.as_str()))
            } else if depth < MAX_IMPORT_DEPTH {
                let import = current.import(name)?;
                self.resolve_segments(module, import, depth + 1)
            } else {
                None
            };
        }

        let mut base: Vec<&str> = module_path(module);
        let mut rest = prefix;
        let anchored = match prefix[0].as_str() {
            "crate" => {
                base.clear();
                rest = &prefix[1..];
                true
            }
            "self" => {
                rest = &prefix[1..];
                true
            }
            "super" => {
                while let Some((first, tail)) = rest.split_first() {
                    if first != "super" {
                        break;
                    }
                    base.pop()?;
                    rest = tail;
                }
                true
            }
            _ => false,
        };

        let candidates = if anchored {
            vec![join_module(&base, rest)]
        } else {
            vec![join_module(&base, rest), join_module(&[], rest)]
        };

        candidates.into_iter().find_map(|candidate| {
            let (key, found) = self.modules.get_key_value(&candidate)?;
            found.type_item(name)?;
            Some(TypeKey::new(key.as_str(), name.as_str()))
        })
    }
}

fn module_path(module: &str) -> Vec<&str> {
    module.split("::").filter(|s| !s.is_empty()).collect()
}

fn join_module(base: &[&str], rest: &[String]) -> String {
    base.iter()
        .copied()
        .chain(rest.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("::")
}
