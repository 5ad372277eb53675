use std::ops::Range;

use codespan_reporting::files::{self, Files};
use link_utils::{define_index, newtypes::IndexVec};

// === SpanManager === //

#[derive(Debug, Default)]
pub struct SpanManager {
    files: IndexVec<FileIndex, SourceFile>,
}

#[derive(Debug)]
struct SourceFile {
    name: String,
    text: String,

    /// Byte offsets at which each line starts. The first entry is always `0`.
    line_starts: Vec<usize>,
}

impl SpanManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>) -> FileIndex {
        let text = text.into();
        let line_starts = files::line_starts(&text).collect();

        self.files.push(SourceFile {
            name: name.into(),
            text,
            line_starts,
        })
    }

    pub fn find_file(&self, name: &str) -> Option<FileIndex> {
        self.files
            .enumerate()
            .find(|(_, file)| file.name == name)
            .map(|(idx, _)| idx)
    }

    fn get(&self, file: FileIndex) -> Result<&SourceFile, files::Error> {
        self.files.get(file).ok_or(files::Error::FileMissing)
    }
}

impl<'a> Files<'a> for SpanManager {
    type FileId = FileIndex;
    type Name = &'a str;
    type Source = &'a str;

    fn name(&'a self, id: Self::FileId) -> Result<Self::Name, files::Error> {
        Ok(&self.get(id)?.name)
    }

    fn source(&'a self, id: Self::FileId) -> Result<Self::Source, files::Error> {
        Ok(&self.get(id)?.text)
    }

    fn line_index(&'a self, id: Self::FileId, byte_index: usize) -> Result<usize, files::Error> {
        let file = self.get(id)?;

        Ok(match file.line_starts.binary_search(&byte_index) {
            Ok(line) => line,
            Err(line) => line - 1,
        })
    }

    fn line_range(
        &'a self,
        id: Self::FileId,
        line_index: usize,
    ) -> Result<Range<usize>, files::Error> {
        let file = self.get(id)?;
        let max = file.line_starts.len() - 1;

        let start = *file
            .line_starts
            .get(line_index)
            .ok_or(files::Error::LineTooLarge {
                given: line_index,
                max,
            })?;

        let end = file
            .line_starts
            .get(line_index + 1)
            .copied()
            .unwrap_or(file.text.len());

        Ok(start..end)
    }
}

// === Span === //

define_index! {
    pub struct FileIndex: u32;
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct Span {
    pub file: FileIndex,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(file: FileIndex, range: Range<usize>) -> Self {
        let (start, end) = if range.start <= range.end {
            (range.start, range.end)
        } else {
            (range.end, range.start)
        };

        Self {
            file,
            start: start as u32,
            end: end as u32,
        }
    }

    pub fn range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}
