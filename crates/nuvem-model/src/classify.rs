//! MIME-type classification into display buckets.
//!
//! The cascade order is fixed and observable: a type matching several
//! families lands in whichever predicate runs first. Tests assert on this
//! order, so reordering the arms is a breaking change.

use nuvem_entity::File;

/// Display bucket for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
    /// Exactly `application/pdf`.
    Pdf,
    /// Text and word-processing formats.
    Document,
    /// Spreadsheet formats.
    Spreadsheet,
    /// Presentation formats.
    Presentation,
    /// Compressed archives.
    Archive,
    /// Everything else, including unknown types.
    Other,
}

impl FileKind {
    /// All kinds, in cascade order.
    pub const ALL: [FileKind; 8] = [
        FileKind::Image,
        FileKind::Video,
        FileKind::Pdf,
        FileKind::Document,
        FileKind::Spreadsheet,
        FileKind::Presentation,
        FileKind::Archive,
        FileKind::Other,
    ];

    /// Section heading for the bucket.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Image => "Images",
            Self::Video => "Videos",
            Self::Pdf => "PDFs",
            Self::Document => "Documents",
            Self::Spreadsheet => "Spreadsheets",
            Self::Presentation => "Presentations",
            Self::Archive => "Archives",
            Self::Other => "Other files",
        }
    }
}

/// Classify a MIME type through the fixed predicate cascade. The first
/// matching predicate wins; a missing type is `Other`.
pub fn classify_mime(mime: Option<&str>) -> FileKind {
    let Some(mime) = mime else {
        return FileKind::Other;
    };

    if mime.starts_with("image/") {
        FileKind::Image
    } else if mime.starts_with("video/") {
        FileKind::Video
    } else if mime == "application/pdf" {
        FileKind::Pdf
    } else if mime.starts_with("text/")
        || mime.contains("word")
        || mime.contains("document")
        || mime == "application/msword"
        || mime == "application/rtf"
        || mime.contains("opendocument.text")
    {
        FileKind::Document
    } else if mime.contains("sheet")
        || mime.contains("excel")
        || mime.contains("spreadsheet")
        || mime == "application/vnd.ms-excel"
        || mime.contains("opendocument.spreadsheet")
    {
        FileKind::Spreadsheet
    } else if mime.contains("presentation")
        || mime.contains("powerpoint")
        || mime == "application/vnd.ms-powerpoint"
        || mime.contains("opendocument.presentation")
    {
        FileKind::Presentation
    } else if mime.contains("zip")
        || mime.contains("rar")
        || mime.contains("7z")
        || mime.contains("compressed")
        || mime.contains("tar")
        || mime.contains("gzip")
    {
        FileKind::Archive
    } else {
        FileKind::Other
    }
}

/// Files partitioned into display buckets, bucket order preserved.
#[derive(Debug, Clone, Default)]
pub struct FileBuckets {
    pub images: Vec<File>,
    pub videos: Vec<File>,
    pub pdfs: Vec<File>,
    pub documents: Vec<File>,
    pub spreadsheets: Vec<File>,
    pub presentations: Vec<File>,
    pub archives: Vec<File>,
    pub others: Vec<File>,
}

impl FileBuckets {
    /// Total number of files across all buckets.
    pub fn total(&self) -> usize {
        self.images.len()
            + self.videos.len()
            + self.pdfs.len()
            + self.documents.len()
            + self.spreadsheets.len()
            + self.presentations.len()
            + self.archives.len()
            + self.others.len()
    }

    /// The bucket for a given kind.
    pub fn bucket(&self, kind: FileKind) -> &[File] {
        match kind {
            FileKind::Image => &self.images,
            FileKind::Video => &self.videos,
            FileKind::Pdf => &self.pdfs,
            FileKind::Document => &self.documents,
            FileKind::Spreadsheet => &self.spreadsheets,
            FileKind::Presentation => &self.presentations,
            FileKind::Archive => &self.archives,
            FileKind::Other => &self.others,
        }
    }
}

/// Partition files into buckets. Total partition: every input file lands
/// in exactly one bucket, within-bucket order matching input order.
pub fn classify_files_by_kind(files: &[File]) -> FileBuckets {
    let mut buckets = FileBuckets::default();
    for file in files {
        let target = match classify_mime(file.mime_type.as_deref()) {
            FileKind::Image => &mut buckets.images,
            FileKind::Video => &mut buckets.videos,
            FileKind::Pdf => &mut buckets.pdfs,
            FileKind::Document => &mut buckets.documents,
            FileKind::Spreadsheet => &mut buckets.spreadsheets,
            FileKind::Presentation => &mut buckets.presentations,
            FileKind::Archive => &mut buckets.archives,
            FileKind::Other => &mut buckets.others,
        };
        target.push(file.clone());
    }
    buckets
}
