//! Decoded form values and uploaded files.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::{BoundaryError, Result};
use crate::form::charset;

/// A file part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    filename: String,
    body: Bytes,
    content_type: Option<String>,
    headers: HashMap<String, String>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        body: impl Into<Bytes>,
        content_type: Option<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            body: body.into(),
            content_type,
            headers,
        }
    }

    /// Form field this file was submitted under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Client-supplied filename. Untrusted.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Raw payload.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Declared `Content-Type` of the part, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Part headers, lower-cased names.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Decode the payload with `encoding` (e.g. `"utf-8"`).
    pub fn text(&self, encoding: &str) -> Result<String> {
        charset::decode(&self.body, encoding).ok_or(BoundaryError::InvalidEncoding {
            detail: "Invalid file encoding",
        })
    }
}

/// Insertion-ordered name → values multimap with a hashed name index.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Multi<T> {
    entries: Vec<(String, Vec<T>)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Multi<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Multi<T> {
    fn get(&self, name: &str) -> Option<&[T]> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].1.as_slice())
    }

    fn push(&mut self, name: String, value: T) {
        match self.index.get(&name) {
            Some(&position) => self.entries[position].1.push(value),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, vec![value]));
            }
        }
    }
}

/// Multi-valued, read-only view of a decoded form.
///
/// Field values and files live in separate namespaces; iteration, `len` and
/// `contains` only see field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Multi<String>,
    files: Multi<UploadedFile>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered field and file lists.
    pub fn from_parts<F, U>(fields: F, files: U) -> Self
    where
        F: IntoIterator<Item = (String, String)>,
        U: IntoIterator<Item = UploadedFile>,
    {
        let mut form = Self::new();
        for (name, value) in fields {
            form.push_field(name, value);
        }
        for file in files {
            form.push_file(file);
        }
        form
    }

    pub(crate) fn push_field(&mut self, name: String, value: String) {
        self.fields.push(name, value);
    }

    pub(crate) fn push_file(&mut self, file: UploadedFile) {
        self.files.push(file.name.clone(), file);
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    /// First value for `name`, or `default`.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Every value for `name`, in arrival order.
    pub fn getlist(&self, name: &str) -> Vec<&str> {
        self.fields
            .get(name)
            .map(|values| values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// First file uploaded under `name`.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).and_then(<[UploadedFile]>::first)
    }

    /// Every file uploaded under `name`, in arrival order.
    pub fn filelist(&self, name: &str) -> &[UploadedFile] {
        self.files.get(name).unwrap_or_default()
    }

    /// All files grouped by field name.
    pub fn files(&self) -> impl Iterator<Item = (&str, &[UploadedFile])> {
        self.files
            .entries
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Field names in first-arrival order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.get(name).is_some()
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.fields.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormData {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.keys())
    }
}
