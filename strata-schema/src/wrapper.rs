use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use prost::Message;
use prost_reflect::{DescriptorPool, EnumDescriptor, FileDescriptor, MessageDescriptor};
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::errors::{Result, SchemaError};
use crate::type_registry::TypeRegistry;

/// An immutable, self-contained set of protobuf file descriptors.
///
/// Every import of every file is part of the set, each file appears once,
/// and files are kept dependency-first. The wrapper exposes the set as a
/// `FileDescriptorSet`, the fully-qualified names of all message and enum
/// types it declares (nested ones included), and a [`TypeRegistry`] over them.
#[derive(Debug, Clone)]
pub struct TypeRegistryWrapper {
    files: Vec<FileDescriptorProto>,
    names: BTreeSet<String>,
    pool: DescriptorPool,
}

impl TypeRegistryWrapper {
    pub fn new_builder() -> TypeRegistryWrapperBuilder {
        TypeRegistryWrapperBuilder::default()
    }

    /// Rebuilds a wrapper from a descriptor set whose imports are all
    /// contained in the set itself. Files may appear in any order.
    pub fn from_file_descriptor_set(set: FileDescriptorSet) -> Result<Self> {
        let files = sort_by_dependencies(set.file)?;
        Self::from_sorted(files)
    }

    /// Rebuilds a wrapper from an encoded `google.protobuf.FileDescriptorSet`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::from_file_descriptor_set(FileDescriptorSet::decode(bytes)?)
    }

    fn from_sorted(files: Vec<FileDescriptorProto>) -> Result<Self> {
        let mut pool = DescriptorPool::new();
        pool.add_file_descriptor_protos(files.iter().cloned())?;

        let names: BTreeSet<String> = pool
            .all_messages()
            .map(|message| message.full_name().to_owned())
            .chain(pool.all_enums().map(|e| e.full_name().to_owned()))
            .collect();
        info!(
            files = files.len(),
            types = names.len(),
            "built type registry"
        );

        Ok(TypeRegistryWrapper { files, names, pool })
    }

    pub fn file_descriptor_set(&self) -> FileDescriptorSet {
        FileDescriptorSet {
            file: self.files.clone(),
        }
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        self.file_descriptor_set().encode_to_vec()
    }

    pub fn files(&self) -> &[FileDescriptorProto] {
        &self.files
    }

    /// Fully-qualified names of every message and enum in the set.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn get(&self) -> TypeRegistry {
        TypeRegistry::new(self.pool.clone())
    }

    /// `sha256:<hex>` of the encoded descriptor set.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.encode_to_vec());
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }
}

impl TryFrom<FileDescriptorSet> for TypeRegistryWrapper {
    type Error = SchemaError;

    fn try_from(set: FileDescriptorSet) -> Result<Self> {
        Self::from_file_descriptor_set(set)
    }
}

/// Accumulates file descriptors together with everything they import.
#[derive(Debug, Default)]
pub struct TypeRegistryWrapperBuilder {
    files: IndexMap<String, FileDescriptor>,
    seen: HashSet<String>,
}

impl TypeRegistryWrapperBuilder {
    /// Adds each file and its transitive imports. Files already added, by
    /// name, are skipped, so diamonds and repeated calls are harmless.
    pub fn add<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = FileDescriptor>,
    {
        for file in files {
            self.insert(file);
        }
        self
    }

    /// Adds the file declaring `message`.
    pub fn add_message(self, message: &MessageDescriptor) -> Self {
        self.add([message.parent_file()])
    }

    /// Adds the file declaring `enumeration`.
    pub fn add_enum(self, enumeration: &EnumDescriptor) -> Self {
        self.add([enumeration.parent_file()])
    }

    fn insert(&mut self, file: FileDescriptor) {
        if !self.seen.insert(file.name().to_owned()) {
            return;
        }
        for dependency in file.dependencies() {
            self.insert(dependency);
        }
        debug!(file = %file.name(), "added file descriptor");
        self.files.insert(file.name().to_owned(), file);
    }

    /// Fails if the collected files cannot form one consistent pool, e.g.
    /// when two files declare the same type.
    pub fn build(self) -> Result<TypeRegistryWrapper> {
        let files = self
            .files
            .into_values()
            .map(|file| file.file_descriptor_proto().clone())
            .collect();
        TypeRegistryWrapper::from_sorted(files)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Orders `files` so that each file comes after everything it imports.
fn sort_by_dependencies(files: Vec<FileDescriptorProto>) -> Result<Vec<FileDescriptorProto>> {
    let mut by_name = IndexMap::with_capacity(files.len());
    for file in files {
        let name = file.name().to_owned();
        if by_name.insert(name.clone(), file).is_some() {
            return Err(SchemaError::DescriptorValidation(format!(
                "file {name} appears more than once"
            )));
        }
    }

    let mut marks = vec![Mark::Unvisited; by_name.len()];
    let mut order = Vec::with_capacity(by_name.len());
    for (index, file) in by_name.values().enumerate() {
        visit(&by_name, index, file, &mut marks, &mut order)?;
    }

    let mut slots: Vec<Option<FileDescriptorProto>> = by_name.into_values().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect())
}

fn visit(
    files: &IndexMap<String, FileDescriptorProto>,
    index: usize,
    file: &FileDescriptorProto,
    marks: &mut [Mark],
    order: &mut Vec<usize>,
) -> Result<()> {
    match marks[index] {
        Mark::Done => return Ok(()),
        Mark::InProgress => {
            return Err(SchemaError::DescriptorValidation(format!(
                "import cycle through {}",
                file.name()
            )))
        }
        Mark::Unvisited => {}
    }

    marks[index] = Mark::InProgress;
    for dependency in &file.dependency {
        let (dependency_index, _, dependency_file) =
            files.get_full(dependency.as_str()).ok_or_else(|| {
                SchemaError::DescriptorValidation(format!(
                    "{} imports {}, which is not in the descriptor set",
                    file.name(),
                    dependency
                ))
            })?;
        visit(files, dependency_index, dependency_file, marks, order)?;
    }
    marks[index] = Mark::Done;
    order.push(index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_reflect::ReflectMessage;

    fn file(name: &str, dependencies: &[&str]) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_owned()),
            dependency: dependencies.iter().map(|d| d.to_string()).collect(),
            syntax: Some("proto3".to_owned()),
            ..Default::default()
        }
    }

    fn names_of(files: &[FileDescriptorProto]) -> Vec<&str> {
        files.iter().map(|f| f.name()).collect()
    }

    #[test]
    fn sorts_imports_first() {
        let sorted = sort_by_dependencies(vec![
            file("c.proto", &["b.proto", "a.proto"]),
            file("b.proto", &["a.proto"]),
            file("a.proto", &[]),
        ])
        .unwrap();
        assert_eq!(names_of(&sorted), vec!["a.proto", "b.proto", "c.proto"]);
    }

    #[test]
    fn rejects_missing_import() {
        let result = sort_by_dependencies(vec![file("b.proto", &["a.proto"])]);
        assert!(matches!(result, Err(SchemaError::DescriptorValidation(msg)) if msg.contains("a.proto")));
    }

    #[test]
    fn rejects_import_cycle() {
        let result = sort_by_dependencies(vec![
            file("a.proto", &["b.proto"]),
            file("b.proto", &["a.proto"]),
        ]);
        assert!(matches!(result, Err(SchemaError::DescriptorValidation(msg)) if msg.contains("cycle")));
    }

    #[test]
    fn rejects_duplicate_file() {
        let result = sort_by_dependencies(vec![file("a.proto", &[]), file("a.proto", &[])]);
        assert!(matches!(result, Err(SchemaError::DescriptorValidation(_))));
    }

    #[test]
    fn adding_twice_keeps_one_file() {
        let timestamp = prost_types::Timestamp::default().descriptor();
        let wrapper = TypeRegistryWrapper::new_builder()
            .add_message(&timestamp)
            .add_message(&timestamp)
            .add([timestamp.parent_file()])
            .build()
            .unwrap();
        assert_eq!(wrapper.files().len(), 1);
    }

    #[test]
    fn fingerprint_follows_content() {
        let empty = TypeRegistryWrapper::new_builder().build().unwrap();
        let timestamp = TypeRegistryWrapper::new_builder()
            .add_message(&prost_types::Timestamp::default().descriptor())
            .build()
            .unwrap();
        assert!(timestamp.fingerprint().starts_with("sha256:"));
        assert_eq!(timestamp.fingerprint().len(), "sha256:".len() + 64);
        assert_ne!(empty.fingerprint(), timestamp.fingerprint());

        let rebuilt = TypeRegistryWrapper::decode(&timestamp.encode_to_vec()).unwrap();
        assert_eq!(rebuilt.fingerprint(), timestamp.fingerprint());
    }
}
